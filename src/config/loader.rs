use super::PatternSet;
use miette::{IntoDiagnostic, Result, WrapErr};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Entry patterns used when neither the config nor the CLI provides any
pub const DEFAULT_ENTRY_PATTERNS: &[&str] = &[
    "src/index.*",
    "src/main.*",
    "src/cli.*",
    "vite.config.*",
    "next.config.*",
    "bun.lock",
    "package.json",
];

/// Configuration for a dead-code scan
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directories to scan, relative to the project root
    pub targets: Vec<PathBuf>,

    /// Globs of root-relative paths to skip during discovery
    pub exclude: Vec<String>,

    /// Entry point globs, matched against root-relative paths
    pub entry: Vec<String>,

    /// Globs of files whose findings are never reported
    pub retain_patterns: Vec<String>,

    /// Add `package.json` main/module/types/bin/exports to the entry patterns
    pub package_entries: bool,

    /// Report configuration
    pub report: ReportConfig,

    /// Detection configuration
    pub detection: DetectionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Output format: terminal, json, sarif
    pub format: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Report files unreachable from every entry point
    pub dead_files: bool,

    /// Report exports of reachable files nobody imports
    pub unused_exports: bool,

    /// Report style classes never referenced from reachable code
    pub unused_styles: bool,

    /// Follow `import("m")` and `require("m")` with literal arguments
    pub dynamic_imports: bool,

    /// Skip interfaces and type aliases when reporting unused exports
    pub ignore_type_exports: bool,

    /// Check `#id` selectors too, not only classes
    pub style_ids: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            targets: vec![],
            exclude: vec![
                "node_modules/**".to_string(),
                "dist/**".to_string(),
                "build/**".to_string(),
                "coverage/**".to_string(),
                "**/node_modules/**".to_string(),
            ],
            entry: DEFAULT_ENTRY_PATTERNS.iter().map(|p| p.to_string()).collect(),
            retain_patterns: vec![],
            package_entries: true,
            report: ReportConfig::default(),
            detection: DetectionConfig::default(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: "terminal".to_string(),
        }
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            dead_files: true,
            unused_exports: true,
            unused_styles: true,
            dynamic_imports: true,
            ignore_type_exports: false,
            style_ids: false,
        }
    }
}

impl Config {
    /// Load configuration from a file (YAML or TOML)
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        match extension {
            "yml" | "yaml" => serde_yaml::from_str(&contents)
                .into_diagnostic()
                .wrap_err("Failed to parse YAML config"),
            "toml" => toml::from_str(&contents)
                .into_diagnostic()
                .wrap_err("Failed to parse TOML config"),
            _ => {
                if let Ok(config) = serde_yaml::from_str(&contents) {
                    Ok(config)
                } else {
                    toml::from_str(&contents)
                        .into_diagnostic()
                        .wrap_err("Failed to parse config file")
                }
            }
        }
    }

    /// Try to load configuration from default locations
    pub fn from_default_locations(project_root: &Path) -> Result<Self> {
        let default_names = [
            ".deadcode.yml",
            ".deadcode.yaml",
            ".deadcode.toml",
            "deadcode.yml",
            "deadcode.yaml",
            "deadcode.toml",
        ];

        for name in &default_names {
            let path = project_root.join(name);
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Compiled exclusion globs
    pub fn exclude_set(&self) -> PatternSet {
        PatternSet::new(&self.exclude)
    }

    /// Compiled retain globs
    pub fn retain_set(&self) -> PatternSet {
        PatternSet::new(&self.retain_patterns)
    }

    /// Whether `path` is excluded from discovery
    pub fn should_exclude(&self, path: &Path, root: &Path) -> bool {
        self.exclude_set().matches_path(path, root)
    }

    /// Whether findings in `path` are suppressed
    pub fn should_retain(&self, path: &Path, root: &Path) -> bool {
        self.retain_set().matches_path(path, root)
    }
}
