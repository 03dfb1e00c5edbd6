use crate::config::{Config, PatternSet};
use crate::graph::{FileId, Graph};
use serde_json::Value;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Selects entry files by matching root-relative paths against globs
pub struct EntryPointDetector {
    patterns: PatternSet,
    base: PathBuf,
}

impl EntryPointDetector {
    /// Patterns are matched against paths relative to `base`
    pub fn new<S: AsRef<str>>(patterns: &[S], base: &Path) -> Self {
        Self {
            patterns: PatternSet::new(patterns),
            base: base.to_path_buf(),
        }
    }

    /// Configured entry patterns, plus `package.json` entries when enabled
    pub fn from_config(config: &Config, root: &Path) -> Self {
        let mut patterns = config.entry.clone();
        if config.package_entries {
            let extra = package_entry_patterns(root);
            if !extra.is_empty() {
                debug!("package.json adds entry patterns: {:?}", extra);
            }
            patterns.extend(extra);
        }
        Self::new(&patterns, root)
    }

    pub fn patterns(&self) -> &[String] {
        self.patterns.patterns()
    }

    pub fn is_entry(&self, id: &FileId) -> bool {
        self.patterns.matches_path(id.path(), &self.base)
    }

    /// Every graph node matching at least one pattern
    pub fn detect(&self, graph: &Graph) -> BTreeSet<FileId> {
        let entries: BTreeSet<FileId> = graph
            .file_ids()
            .filter(|id| self.is_entry(id))
            .cloned()
            .collect();

        info!("Detected {} entry points", entries.len());
        for entry in &entries {
            debug!("Entry point: {}", entry.relative_to(&self.base));
        }
        entries
    }
}

/// Entry paths declared in `<root>/package.json`
///
/// Reads `main`, `module`, `types`, `typings`, `bin` (string or map) and the
/// string leaves of `exports`. A missing or malformed manifest yields nothing.
pub fn package_entry_patterns(root: &Path) -> Vec<String> {
    let Ok(contents) = std::fs::read_to_string(root.join("package.json")) else {
        return Vec::new();
    };
    let manifest: Value = match serde_json::from_str(&contents) {
        Ok(value) => value,
        Err(e) => {
            debug!("Ignoring invalid package.json: {}", e);
            return Vec::new();
        }
    };

    let mut patterns = Vec::new();
    for field in ["main", "module", "types", "typings"] {
        if let Some(path) = manifest.get(field).and_then(Value::as_str) {
            patterns.push(path.to_string());
        }
    }

    match manifest.get("bin") {
        Some(Value::String(path)) => patterns.push(path.clone()),
        Some(Value::Object(map)) => {
            patterns.extend(map.values().filter_map(Value::as_str).map(String::from))
        }
        _ => {}
    }

    if let Some(exports) = manifest.get("exports") {
        collect_string_leaves(exports, &mut patterns);
    }

    let mut seen = std::collections::HashSet::new();
    patterns
        .into_iter()
        .map(|p| p.trim_start_matches("./").to_string())
        .filter(|p| !p.is_empty() && seen.insert(p.clone()))
        .collect()
}

fn collect_string_leaves(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::String(s) => out.push(s.clone()),
        Value::Array(items) => items.iter().for_each(|v| collect_string_leaves(v, out)),
        Value::Object(map) => map.values().for_each(|v| collect_string_leaves(v, out)),
        _ => {}
    }
}
