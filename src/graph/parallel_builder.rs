// Parallel graph builder using rayon

use super::builder::{Extractors, GraphBuilder, ParsedFacts};
use super::{Graph, SkippedFile};
use crate::discovery::SourceFile;
use crate::parser::ExtractError;
use rayon::prelude::*;
use tracing::info;

/// Parallel graph builder for faster ingestion
///
/// Files are read and parsed on the rayon pool into owned facts. Insertion
/// into the graph happens afterwards on the calling thread, in input order.
pub struct ParallelGraphBuilder {
    extractors: Extractors,
    include_style_ids: bool,
}

impl ParallelGraphBuilder {
    pub fn new() -> Self {
        Self {
            extractors: Extractors::default(),
            include_style_ids: false,
        }
    }

    pub fn with_dynamic_imports(mut self, enabled: bool) -> Self {
        self.extractors.script = self.extractors.script.with_dynamic_imports(enabled);
        self
    }

    pub fn with_style_ids(mut self, enabled: bool) -> Self {
        self.include_style_ids = enabled;
        self
    }

    /// Build graph from source files using parallel parsing
    pub fn build_from_files(&self, files: &[SourceFile]) -> (Graph, Vec<SkippedFile>) {
        info!("Parsing {} files in parallel...", files.len());

        let results: Vec<Result<ParsedFacts, ExtractError>> = files
            .par_iter()
            .map(|file| self.extractors.parse_path(file))
            .collect();

        let mut builder = GraphBuilder::new().with_style_ids(self.include_style_ids);
        for (file, parsed) in files.iter().zip(results) {
            builder.ingest(&file.path, parsed);
        }

        let (graph, skipped) = builder.finish();
        info!(
            "Ingested {} files ({} imports), skipped {}",
            graph.file_count(),
            graph.import_count(),
            skipped.len()
        );
        (graph, skipped)
    }
}

impl Default for ParallelGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
