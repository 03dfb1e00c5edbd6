mod builder;
mod node;
mod parallel_builder;
pub mod resolver;

pub use builder::{GraphBuilder, SkippedFile};
pub use node::{
    ExportFact, FileId, FileKind, FileNode, ImportFact, ImportedName, SourceFacts, StyleFacts,
};
pub use parallel_builder::ParallelGraphBuilder;
pub use resolver::{ImportResolver, ModuleResolver, OxcModuleResolver, ResolutionStats};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// A resolved import edge between two files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportEdge {
    pub imported: ImportedName,
    pub type_only: bool,
}

/// The dependency graph of every scanned file
///
/// Nodes are created once during ingestion. After that the only mutation is
/// the resolution pass filling in `ImportFact::resolved` and mirroring those
/// edges into the petgraph structure.
#[derive(Debug, Default)]
pub struct Graph {
    /// Resolved import edges, used for structural queries
    inner: DiGraph<FileId, ImportEdge>,

    /// Map from FileId to node index
    node_map: HashMap<FileId, NodeIndex>,

    /// File nodes keyed by identity
    files: HashMap<FileId, FileNode>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a code file; re-adding the same id replaces the previous node
    pub fn add_code_node(&mut self, id: FileId, mut facts: SourceFacts) -> FileId {
        facts.imports.retain(|import| !import.specifier.is_empty());
        facts.literal_strings.retain(|s| !s.is_empty());
        for import in &mut facts.imports {
            import.resolved = None;
        }
        self.insert(FileNode::code(id, facts))
    }

    /// Add a style file with its defined class/id identifiers
    pub fn add_style_node(&mut self, id: FileId, identifiers: BTreeMap<String, usize>) -> FileId {
        self.insert(FileNode::style(id, identifiers))
    }

    fn insert(&mut self, node: FileNode) -> FileId {
        let id = node.id.clone();
        if !self.node_map.contains_key(&id) {
            let idx = self.inner.add_node(id.clone());
            self.node_map.insert(id.clone(), idx);
        }
        self.files.insert(id.clone(), node);
        id
    }

    pub fn get(&self, id: &FileId) -> Option<&FileNode> {
        self.files.get(id)
    }

    /// Look up a node by path
    pub fn get_by_path(&self, path: &Path) -> Option<&FileNode> {
        self.files.get(path)
    }

    pub fn contains(&self, id: &FileId) -> bool {
        self.files.contains_key(id)
    }

    pub fn contains_path(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    pub fn files(&self) -> impl Iterator<Item = &FileNode> {
        self.files.values()
    }

    pub fn file_ids(&self) -> impl Iterator<Item = &FileId> {
        self.files.keys()
    }

    pub fn code_files(&self) -> impl Iterator<Item = &FileNode> {
        self.files.values().filter(|f| f.is_code())
    }

    pub fn style_files(&self) -> impl Iterator<Item = &FileNode> {
        self.files.values().filter(|f| f.is_style())
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Total number of import facts across all code files
    pub fn import_count(&self) -> usize {
        self.files.values().map(|f| f.imports.len()).sum()
    }

    /// Number of resolved import edges
    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// Files that import `id` through a resolved edge
    pub fn importers_of(&self, id: &FileId) -> Vec<&FileId> {
        let Some(&idx) = self.node_map.get(id) else {
            return Vec::new();
        };

        let mut importers: Vec<&FileId> = self
            .inner
            .edges_directed(idx, petgraph::Direction::Incoming)
            .filter_map(|edge| self.inner.node_weight(edge.source()))
            .collect();
        importers.sort();
        importers.dedup();
        importers
    }

    /// Get the underlying petgraph for advanced operations
    pub fn inner(&self) -> &DiGraph<FileId, ImportEdge> {
        &self.inner
    }

    pub fn node_index(&self, id: &FileId) -> Option<NodeIndex> {
        self.node_map.get(id).copied()
    }

    pub(crate) fn files_mut(&mut self) -> impl Iterator<Item = &mut FileNode> {
        self.files.values_mut()
    }

    pub(crate) fn clear_import_edges(&mut self) {
        self.inner.clear_edges();
    }

    pub(crate) fn add_import_edge(&mut self, from: &FileId, to: &FileId, edge: ImportEdge) {
        if let (Some(&from_idx), Some(&to_idx)) = (self.node_map.get(from), self.node_map.get(to)) {
            self.inner.add_edge(from_idx, to_idx, edge);
        }
    }
}
