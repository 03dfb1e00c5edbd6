use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::path::Path;
use tracing::warn;

/// Compiled set of project-relative glob patterns
///
/// `*` never crosses a `/`; use `**` for that. A leading `./` on a pattern is
/// ignored so `./src/index.ts` and `src/index.ts` mean the same thing.
#[derive(Debug, Clone)]
pub struct PatternSet {
    patterns: Vec<String>,
    set: GlobSet,
}

impl PatternSet {
    /// Compile patterns, logging and skipping invalid ones
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Self {
        let mut builder = GlobSetBuilder::new();
        let mut kept = Vec::new();

        for pattern in patterns {
            let pattern = normalize(pattern.as_ref());
            if pattern.is_empty() {
                continue;
            }
            match GlobBuilder::new(pattern).literal_separator(true).build() {
                Ok(glob) => {
                    builder.add(glob);
                    kept.push(pattern.to_string());
                }
                Err(e) => warn!("Ignoring invalid pattern '{}': {}", pattern, e),
            }
        }

        let set = builder.build().unwrap_or_else(|e| {
            warn!("Failed to compile pattern set: {}", e);
            GlobSet::empty()
        });

        Self {
            patterns: kept,
            set,
        }
    }

    pub fn empty() -> Self {
        Self {
            patterns: Vec::new(),
            set: GlobSet::empty(),
        }
    }

    /// Match a `/`-separated path relative to the project root
    pub fn is_match(&self, relative: &str) -> bool {
        self.set.is_match(normalize(relative))
    }

    /// Match `path` after making it relative to `base`
    pub fn matches_path(&self, path: &Path, base: &Path) -> bool {
        let relative = path.strip_prefix(base).unwrap_or(path);
        self.is_match(&relative.to_string_lossy().replace('\\', "/"))
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

fn normalize(pattern: &str) -> &str {
    pattern.trim().trim_start_matches("./")
}
