use crate::graph::{FileId, Graph, ImportedName};
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
use tracing::{debug, trace};

/// Which exports of a file are consumed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportUsage {
    /// Only these export names are imported somewhere
    Specific(HashSet<String>),
    /// A namespace import or `export *` consumed every export
    AllUsed,
}

impl ExportUsage {
    pub fn is_used(&self, name: &str) -> bool {
        match self {
            ExportUsage::Specific(names) => names.contains(name),
            ExportUsage::AllUsed => true,
        }
    }

    pub fn is_all_used(&self) -> bool {
        matches!(self, ExportUsage::AllUsed)
    }

    /// Record one import against this entry
    fn record(&mut self, imported: &ImportedName) {
        match imported {
            ImportedName::SideEffect => {}
            ImportedName::Namespace => *self = ExportUsage::AllUsed,
            ImportedName::Named(name) => {
                if let ExportUsage::Specific(names) = self {
                    names.insert(name.clone());
                }
            }
        }
    }
}

impl Default for ExportUsage {
    fn default() -> Self {
        ExportUsage::Specific(HashSet::new())
    }
}

/// Outcome of a reachability sweep
#[derive(Debug, Clone, Default)]
pub struct Reachability {
    reachable: HashSet<FileId>,
    usage: HashMap<FileId, ExportUsage>,
}

impl Reachability {
    pub fn is_reachable(&self, id: &FileId) -> bool {
        self.reachable.contains(id)
    }

    pub fn reachable(&self) -> &HashSet<FileId> {
        &self.reachable
    }

    /// Export liveness of a file; `None` when nothing ever imported it
    pub fn usage(&self, id: &FileId) -> Option<&ExportUsage> {
        self.usage.get(id)
    }

    pub fn usage_map(&self) -> &HashMap<FileId, ExportUsage> {
        &self.usage
    }
}

/// Breadth-first liveness sweep over resolved import edges
pub struct ReachabilityAnalyzer;

impl ReachabilityAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Compute reachable files and export liveness from `entries`
    ///
    /// Entries absent from the graph are ignored. Each entry's own exports are
    /// treated as public API. Every file is dequeued once, so the sweep is
    /// linear in files plus imports.
    pub fn sweep(&self, graph: &Graph, entries: &BTreeSet<FileId>) -> Reachability {
        let mut reachable: HashSet<FileId> = HashSet::new();
        let mut usage: HashMap<FileId, ExportUsage> = HashMap::new();
        let mut queue: VecDeque<&FileId> = VecDeque::new();

        for entry in entries {
            let Some(node) = graph.get(entry) else {
                trace!("Entry not in graph: {}", entry);
                continue;
            };
            if reachable.insert(node.id.clone()) {
                usage.insert(
                    node.id.clone(),
                    ExportUsage::Specific(
                        node.export_names().into_iter().map(String::from).collect(),
                    ),
                );
                queue.push_back(&node.id);
            }
        }

        while let Some(current) = queue.pop_front() {
            let Some(node) = graph.get(current) else {
                continue;
            };

            for import in &node.imports {
                let Some(target) = import.resolved.as_ref() else {
                    continue;
                };
                let Some(target_node) = graph.get(target) else {
                    continue;
                };

                if reachable.insert(target_node.id.clone()) {
                    trace!("{} -> {}", current, target_node.id);
                    queue.push_back(&target_node.id);
                }

                usage
                    .entry(target_node.id.clone())
                    .or_default()
                    .record(&import.imported);
            }
        }

        debug!(
            "Reachability: {} of {} files reachable",
            reachable.len(),
            graph.file_count()
        );

        Reachability { reachable, usage }
    }
}

impl Default for ReachabilityAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
