//! Import resolution
//!
//! Turns the textual module specifier of every import into a graph identity.
//! Resolution misses are not errors: an import that points at a package
//! outside the scanned tree, or at nothing at all, simply does not take part
//! in reachability.

use super::{FileId, Graph, ImportEdge};
use oxc_resolver::{ResolveOptions, Resolver};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Maps `(originating directory, specifier)` to an absolute file path
pub trait ModuleResolver {
    fn resolve(&self, from_dir: &Path, specifier: &str) -> Option<PathBuf>;
}

/// Node/bundler style resolution backed by `oxc_resolver`
pub struct OxcModuleResolver {
    resolver: Resolver,
}

impl OxcModuleResolver {
    pub fn new(root: &Path) -> Self {
        let resolver = Resolver::new(ResolveOptions {
            roots: vec![root.to_path_buf()],
            extensions: [
                ".ts", ".tsx", ".mts", ".cts", ".js", ".jsx", ".mjs", ".cjs", ".json", ".d.ts",
                ".css", ".scss", ".less",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            condition_names: ["node", "import", "require", "types", "style"]
                .into_iter()
                .map(String::from)
                .collect(),
            // ESM TypeScript sources import "./foo.js" while the file on disk is foo.ts
            extension_alias: vec![
                (
                    ".js".into(),
                    vec![".ts".into(), ".tsx".into(), ".js".into(), ".jsx".into()],
                ),
                (".mjs".into(), vec![".mts".into(), ".mjs".into()]),
                (".cjs".into(), vec![".cts".into(), ".cjs".into()]),
            ],
            ..Default::default()
        });

        Self { resolver }
    }
}

impl ModuleResolver for OxcModuleResolver {
    fn resolve(&self, from_dir: &Path, specifier: &str) -> Option<PathBuf> {
        match self.resolver.resolve(from_dir, specifier) {
            Ok(resolution) => Some(resolution.path().to_path_buf()),
            Err(e) => {
                trace!("Failed to resolve '{}' from {}: {:?}", specifier, from_dir.display(), e);
                None
            }
        }
    }
}

/// Counters describing one resolution pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolutionStats {
    /// Imports that now point at a graph node
    pub resolved: usize,
    /// Imports the resolver found, but outside the scanned set
    pub external: usize,
    /// Imports the resolver could not find at all
    pub unresolved: usize,
}

impl std::fmt::Display for ResolutionStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} resolved, {} external, {} unresolved",
            self.resolved, self.external, self.unresolved
        )
    }
}

/// Runs a `ModuleResolver` over every import of every code file
pub struct ImportResolver<'r> {
    resolver: &'r dyn ModuleResolver,
}

impl<'r> ImportResolver<'r> {
    pub fn new(resolver: &'r dyn ModuleResolver) -> Self {
        Self { resolver }
    }

    /// Annotate imports in place and rebuild the edge set
    ///
    /// Idempotent: every run starts from a clean edge set and overwrites each
    /// `resolved` field.
    pub fn resolve(&self, graph: &mut Graph) -> ResolutionStats {
        let mut stats = ResolutionStats::default();

        // Phase 1: decide every target against the immutable node set
        let mut decisions: Vec<(FileId, Vec<Option<FileId>>)> = Vec::new();
        for node in graph.code_files() {
            let from_dir = node.id.parent_dir();
            let targets = node
                .imports
                .iter()
                .map(|import| match self.resolver.resolve(from_dir, &import.specifier) {
                    Some(path) if graph.contains_path(&path) => {
                        stats.resolved += 1;
                        Some(FileId::new(path))
                    }
                    Some(path) => {
                        trace!("External import '{}' -> {}", import.specifier, path.display());
                        stats.external += 1;
                        None
                    }
                    None => {
                        stats.unresolved += 1;
                        None
                    }
                })
                .collect();
            decisions.push((node.id.clone(), targets));
        }

        // Phase 2: write them back and mirror the edges
        let mut decisions: std::collections::HashMap<FileId, Vec<Option<FileId>>> =
            decisions.into_iter().collect();
        let mut edges = Vec::new();
        for node in graph.files_mut() {
            let Some(targets) = decisions.remove(&node.id) else {
                continue;
            };
            for (import, target) in node.imports.iter_mut().zip(targets) {
                if let Some(target) = &target {
                    edges.push((
                        node.id.clone(),
                        target.clone(),
                        ImportEdge {
                            imported: import.imported.clone(),
                            type_only: import.type_only,
                        },
                    ));
                }
                import.resolved = target;
            }
        }

        graph.clear_import_edges();
        for (from, to, edge) in &edges {
            graph.add_import_edge(from, to, edge.clone());
        }

        debug!("Import resolution: {}", stats);
        stats
    }
}
