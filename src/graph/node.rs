use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

/// Unique identifier for a file in the graph
///
/// Always an absolute path. Two ids are equal iff their paths are equal; no
/// case folding or symlink resolution happens here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(PathBuf);

impl FileId {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    /// Directory containing the file, used as the origin for resolution
    pub fn parent_dir(&self) -> &Path {
        self.0.parent().unwrap_or(&self.0)
    }

    /// Path relative to `base` with `/` separators
    pub fn relative_to(&self, base: &Path) -> String {
        let rel = self.0.strip_prefix(base).unwrap_or(&self.0);
        rel.to_string_lossy().replace('\\', "/")
    }
}

impl std::fmt::Display for FileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

impl From<PathBuf> for FileId {
    fn from(path: PathBuf) -> Self {
        Self(path)
    }
}

impl From<&Path> for FileId {
    fn from(path: &Path) -> Self {
        Self(path.to_path_buf())
    }
}

impl Borrow<Path> for FileId {
    fn borrow(&self) -> &Path {
        &self.0
    }
}

/// Kind of file node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileKind {
    /// JavaScript / TypeScript module
    Code,
    /// Style sheet
    Style,
}

impl FileKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            FileKind::Code => "code",
            FileKind::Style => "style",
        }
    }
}

/// What an import asks for from its target module
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImportedName {
    /// `import "./polyfill"` - runs the module, binds nothing
    SideEffect,
    /// `import * as ns from "./mod"` - every export counts as used
    Namespace,
    /// A single export; default imports use `"default"`
    Named(String),
}

impl ImportedName {
    pub fn named(name: impl Into<String>) -> Self {
        ImportedName::Named(name.into())
    }

    pub fn as_str(&self) -> &str {
        match self {
            ImportedName::SideEffect => "",
            ImportedName::Namespace => "*",
            ImportedName::Named(name) => name,
        }
    }
}

impl std::fmt::Display for ImportedName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportedName::SideEffect => write!(f, "<side-effect>"),
            other => write!(f, "{}", other.as_str()),
        }
    }
}

/// A single import binding of a code file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportFact {
    /// Module specifier as written, e.g. `./utils` or `react`
    pub specifier: String,

    /// Target file, set by the resolution pass when it is part of the graph
    pub resolved: Option<FileId>,

    pub imported: ImportedName,

    /// Binding name in the importing file (empty for side-effect imports)
    pub local_name: String,

    pub type_only: bool,

    /// 1-based line of the import statement
    pub line: usize,
}

impl ImportFact {
    pub fn new(specifier: impl Into<String>, imported: ImportedName) -> Self {
        Self {
            specifier: specifier.into(),
            resolved: None,
            imported,
            local_name: String::new(),
            type_only: false,
            line: 0,
        }
    }

    pub fn side_effect(specifier: impl Into<String>) -> Self {
        Self::new(specifier, ImportedName::SideEffect)
    }

    pub fn namespace(specifier: impl Into<String>) -> Self {
        Self::new(specifier, ImportedName::Namespace)
    }

    pub fn named(specifier: impl Into<String>, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            local_name: name.clone(),
            ..Self::new(specifier, ImportedName::Named(name))
        }
    }

    pub fn with_local(mut self, local: impl Into<String>) -> Self {
        self.local_name = local.into();
        self
    }

    pub fn with_type_only(mut self, type_only: bool) -> Self {
        self.type_only = type_only;
        self
    }

    pub fn at_line(mut self, line: usize) -> Self {
        self.line = line;
        self
    }
}

/// A single exported name of a code file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportFact {
    /// Public name, `"default"` for default exports
    pub exported_name: String,

    /// Local binding behind the export, when there is one
    pub local_name: Option<String>,

    pub type_only: bool,

    /// 1-based line of the export
    pub line: usize,
}

impl ExportFact {
    pub fn new(exported_name: impl Into<String>) -> Self {
        Self {
            exported_name: exported_name.into(),
            local_name: None,
            type_only: false,
            line: 0,
        }
    }

    pub fn default_export() -> Self {
        Self::new("default")
    }

    pub fn with_local(mut self, local: impl Into<String>) -> Self {
        self.local_name = Some(local.into());
        self
    }

    pub fn with_type_only(mut self, type_only: bool) -> Self {
        self.type_only = type_only;
        self
    }

    pub fn at_line(mut self, line: usize) -> Self {
        self.line = line;
        self
    }
}

/// Facts extracted from one code file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceFacts {
    pub imports: Vec<ImportFact>,
    pub exports: Vec<ExportFact>,
    pub literal_strings: HashSet<String>,
}

/// Facts extracted from one style sheet, keyed by name with the first line seen
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleFacts {
    pub classes: BTreeMap<String, usize>,
    pub ids: BTreeMap<String, usize>,
}

impl StyleFacts {
    /// Identifiers fed to the engine; ids only when requested
    pub fn identifiers(&self, include_ids: bool) -> BTreeMap<String, usize> {
        let mut identifiers = self.classes.clone();
        if include_ids {
            for (name, line) in &self.ids {
                identifiers.entry(name.clone()).or_insert(*line);
            }
        }
        identifiers
    }
}

/// A file in the dependency graph
#[derive(Debug, Clone)]
pub struct FileNode {
    pub id: FileId,
    pub kind: FileKind,
    pub imports: Vec<ImportFact>,
    pub exports: Vec<ExportFact>,
    pub literal_strings: HashSet<String>,
    pub style_identifiers: BTreeMap<String, usize>,
}

impl FileNode {
    pub fn code(id: FileId, facts: SourceFacts) -> Self {
        Self {
            id,
            kind: FileKind::Code,
            imports: facts.imports,
            exports: facts.exports,
            literal_strings: facts.literal_strings,
            style_identifiers: BTreeMap::new(),
        }
    }

    pub fn style(id: FileId, identifiers: BTreeMap<String, usize>) -> Self {
        Self {
            id,
            kind: FileKind::Style,
            imports: Vec::new(),
            exports: Vec::new(),
            literal_strings: HashSet::new(),
            style_identifiers: identifiers,
        }
    }

    pub fn is_code(&self) -> bool {
        self.kind == FileKind::Code
    }

    pub fn is_style(&self) -> bool {
        self.kind == FileKind::Style
    }

    /// Distinct export names in declaration order
    pub fn export_names(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.exports
            .iter()
            .map(|e| e.exported_name.as_str())
            .filter(|name| seen.insert(*name))
            .collect()
    }

    /// First export fact declaring `name`
    pub fn export(&self, name: &str) -> Option<&ExportFact> {
        self.exports.iter().find(|e| e.exported_name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_to_uses_forward_slashes() {
        let id = FileId::new("/project/src/entry.ts");
        assert_eq!(id.relative_to(Path::new("/project")), "src/entry.ts");
        assert_eq!(id.parent_dir(), Path::new("/project/src"));
    }

    #[test]
    fn test_export_names_are_distinct() {
        let facts = SourceFacts {
            exports: vec![
                ExportFact::new("a"),
                ExportFact::new("b"),
                ExportFact::new("a"),
            ],
            ..Default::default()
        };
        let node = FileNode::code(FileId::new("/p/a.ts"), facts);
        assert_eq!(node.export_names(), vec!["a", "b"]);
    }

    #[test]
    fn test_style_identifiers_exclude_ids_by_default() {
        let mut facts = StyleFacts::default();
        facts.classes.insert("card".to_string(), 1);
        facts.ids.insert("header".to_string(), 4);

        assert_eq!(facts.identifiers(false).len(), 1);
        assert!(facts.identifiers(true).contains_key("header"));
    }
}
