use super::{FileId, Graph, SourceFacts, StyleFacts};
use crate::discovery::SourceFile;
use crate::parser::{ExtractError, FactExtractor, ScriptParser, StyleParser};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A file that could not be ingested
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Facts for one file, produced before graph insertion
#[derive(Debug)]
pub(crate) enum ParsedFacts {
    Code(SourceFacts),
    Style(StyleFacts),
}

/// Shared extractors used by both the sequential and parallel builders
#[derive(Debug, Clone, Default)]
pub(crate) struct Extractors {
    pub script: ScriptParser,
    pub style: StyleParser,
}

impl Extractors {
    pub fn parse_path(&self, file: &SourceFile) -> Result<ParsedFacts, ExtractError> {
        let contents = std::fs::read_to_string(&file.path).map_err(|source| ExtractError::Read {
            path: file.path.clone(),
            source,
        })?;
        self.parse_contents(file, &contents)
    }

    pub fn parse_contents(
        &self,
        file: &SourceFile,
        contents: &str,
    ) -> Result<ParsedFacts, ExtractError> {
        if file.file_type.is_code() {
            debug!("Parsing script file: {}", file.path.display());
            self.script.extract(&file.path, contents).map(ParsedFacts::Code)
        } else {
            debug!("Parsing style file: {}", file.path.display());
            self.style.extract(&file.path, contents).map(ParsedFacts::Style)
        }
    }
}

/// Builder for constructing the dependency graph one file at a time
///
/// Files that fail to read or parse are logged, remembered in
/// [`GraphBuilder::skipped`], and left out of the graph.
pub struct GraphBuilder {
    /// The graph being built
    graph: Graph,

    extractors: Extractors,

    /// Feed `#id` selectors to the engine alongside classes
    include_style_ids: bool,

    skipped: Vec<SkippedFile>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self {
            graph: Graph::new(),
            extractors: Extractors::default(),
            include_style_ids: false,
            skipped: Vec::new(),
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

    /// Read, parse and ingest a discovered file
    pub fn process_file(&mut self, file: &SourceFile) {
        let parsed = self.extractors.parse_path(file);
        self.ingest(&file.path, parsed);
    }

    /// Parse and ingest in-memory contents under `path`
    pub fn add_source(&mut self, path: impl Into<PathBuf>, contents: &str) {
        let path = path.into();
        let Some(file) = SourceFile::from_path(path.clone()) else {
            self.skip(&path, ExtractError::Unsupported(path.clone()).to_string());
            return;
        };
        let parsed = self.extractors.parse_contents(&file, contents);
        self.ingest(&file.path, parsed);
    }

    pub(crate) fn ingest(&mut self, path: &Path, parsed: Result<ParsedFacts, ExtractError>) {
        let id = FileId::from(path);
        match parsed {
            Ok(ParsedFacts::Code(facts)) => {
                self.graph.add_code_node(id, facts);
            }
            Ok(ParsedFacts::Style(facts)) => {
                let identifiers = facts.identifiers(self.include_style_ids);
                self.graph.add_style_node(id, identifiers);
            }
            Err(e) => self.skip(path, e.to_string()),
        }
    }

    fn skip(&mut self, path: &Path, reason: String) {
        warn!("Skipping {}: {}", path.display(), reason);
        self.skipped.push(SkippedFile {
            path: path.to_path_buf(),
            reason,
        });
    }

    /// Files left out so far
    pub fn skipped(&self) -> &[SkippedFile] {
        &self.skipped
    }

    /// Finish ingestion; resolution happens separately
    pub fn build(self) -> Graph {
        self.graph
    }

    /// Finish ingestion and hand back the skipped list too
    pub fn finish(self) -> (Graph, Vec<SkippedFile>) {
        (self.graph, self.skipped)
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
