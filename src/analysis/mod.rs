mod cycles;
mod entry_points;
mod reachability;
mod style_usage;

pub use cycles::{CycleDetector, CycleInfo, CycleStats};
pub use entry_points::{package_entry_patterns, EntryPointDetector};
pub use reachability::{ExportUsage, Reachability, ReachabilityAnalyzer};
pub use style_usage::{LiteralPool, StyleUsageAnalyzer};

use crate::graph::{FileId, Graph};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::Path;

/// Confidence level for a finding
///
/// Everything here is static analysis; the level reflects how likely it is
/// that something the engine cannot see (string-built imports, runtime class
/// names) still uses the item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    /// Matching is purely textual, e.g. a class name in a reachable sheet
    Low,
    /// Nothing imports the name, but namespace-like access is possible
    Medium,
    /// No import path reaches the item at all
    High,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::Low => "low",
            Confidence::Medium => "medium",
            Confidence::High => "high",
        }
    }

    /// Score from 0.0 to 1.0 for sorting/filtering
    pub fn score(&self) -> f64 {
        match self {
            Confidence::Low => 0.25,
            Confidence::Medium => 0.50,
            Confidence::High => 0.75,
        }
    }

    /// Parse a `--min-confidence` value, defaulting to low
    pub fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "high" => Confidence::High,
            "medium" => Confidence::Medium,
            _ => Confidence::Low,
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Types of dead code issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeadCodeIssue {
    /// File is unreachable from every entry point
    DeadFile,

    /// Export of a reachable file is never imported
    UnusedExport,

    /// Style class (or id) never referenced by reachable code
    UnusedStyleClass,
}

impl DeadCodeIssue {
    pub fn default_severity(&self) -> Severity {
        match self {
            DeadCodeIssue::DeadFile => Severity::Warning,
            DeadCodeIssue::UnusedExport => Severity::Warning,
            DeadCodeIssue::UnusedStyleClass => Severity::Info,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            DeadCodeIssue::DeadFile => "DC001",
            DeadCodeIssue::UnusedExport => "DC002",
            DeadCodeIssue::UnusedStyleClass => "DC003",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeadCodeIssue::DeadFile => "dead-file",
            DeadCodeIssue::UnusedExport => "unused-export",
            DeadCodeIssue::UnusedStyleClass => "unused-style-class",
        }
    }

    /// Parse the `as_str` form back
    pub fn from_str_name(name: &str) -> Option<Self> {
        match name {
            "dead-file" => Some(DeadCodeIssue::DeadFile),
            "unused-export" => Some(DeadCodeIssue::UnusedExport),
            "unused-style-class" => Some(DeadCodeIssue::UnusedStyleClass),
            _ => None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            DeadCodeIssue::DeadFile => "Dead file",
            DeadCodeIssue::UnusedExport => "Unused export",
            DeadCodeIssue::UnusedStyleClass => "Unused style class",
        }
    }
}

/// Severity levels for dead code issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single reportable finding
#[derive(Debug, Clone, PartialEq)]
pub struct DeadCode {
    pub file: FileId,

    pub issue: DeadCodeIssue,

    /// Export or class name; `None` for dead files
    pub name: Option<String>,

    /// 1-based line, 0 when not applicable
    pub line: usize,

    pub severity: Severity,

    pub confidence: Confidence,

    pub message: String,
}

impl DeadCode {
    pub fn dead_file(file: FileId) -> Self {
        Self {
            message: "File is not reachable from any entry point".to_string(),
            ..Self::new(file, DeadCodeIssue::DeadFile, None, 0)
        }
        .with_confidence(Confidence::High)
    }

    pub fn unused_export(export: &DeadExport) -> Self {
        let kind = if export.type_only { "Type export" } else { "Export" };
        Self {
            message: format!("{} '{}' is never imported", kind, export.export_name),
            ..Self::new(
                export.file.clone(),
                DeadCodeIssue::UnusedExport,
                Some(export.export_name.clone()),
                export.line,
            )
        }
        .with_confidence(Confidence::Medium)
    }

    pub fn unused_style(style: &DeadStyle) -> Self {
        let (message, confidence) = if style.file_reachable {
            (
                format!("Class '{}' is never referenced", style.class_name),
                Confidence::Low,
            )
        } else {
            (
                format!(
                    "Class '{}' is defined in an unreachable style sheet",
                    style.class_name
                ),
                Confidence::High,
            )
        };
        Self {
            message,
            ..Self::new(
                style.file.clone(),
                DeadCodeIssue::UnusedStyleClass,
                Some(style.class_name.clone()),
                style.line,
            )
        }
        .with_confidence(confidence)
    }

    fn new(file: FileId, issue: DeadCodeIssue, name: Option<String>, line: usize) -> Self {
        Self {
            file,
            issue,
            name,
            line,
            severity: issue.default_severity(),
            confidence: Confidence::Medium,
            message: String::new(),
        }
    }

    pub fn with_confidence(mut self, confidence: Confidence) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Name shown in reports: the symbol, or the file name for dead files
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => self
                .file
                .path()
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| self.file.to_string()),
        }
    }
}

/// Unused export of a reachable file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeadExport {
    pub file: FileId,
    pub export_name: String,
    pub line: usize,
    pub type_only: bool,
}

/// Unreferenced style identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeadStyle {
    pub file: FileId,
    pub class_name: String,
    pub line: usize,
    /// Whether the owning sheet itself is reachable
    pub file_reachable: bool,
}

/// Which finding kinds to turn into [`DeadCode`] values
#[derive(Debug, Clone, Copy)]
pub struct FindingFilter {
    pub dead_files: bool,
    pub unused_exports: bool,
    pub unused_styles: bool,
    pub ignore_type_exports: bool,
}

impl Default for FindingFilter {
    fn default() -> Self {
        Self {
            dead_files: true,
            unused_exports: true,
            unused_styles: true,
            ignore_type_exports: false,
        }
    }
}

impl From<&crate::config::DetectionConfig> for FindingFilter {
    fn from(detection: &crate::config::DetectionConfig) -> Self {
        Self {
            dead_files: detection.dead_files,
            unused_exports: detection.unused_exports,
            unused_styles: detection.unused_styles,
            ignore_type_exports: detection.ignore_type_exports,
        }
    }
}

/// Result of one scan: dead files, dead exports and dead style identifiers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeadCodeReport {
    pub dead_files: Vec<FileId>,
    pub dead_exports: Vec<DeadExport>,
    pub dead_css_classes: Vec<DeadStyle>,
}

impl DeadCodeReport {
    /// Derive all three lists from a finished sweep
    ///
    /// Output is sorted by file; exports keep declaration order and style
    /// identifiers keep name order within a file.
    pub fn assemble(graph: &Graph, reachability: &Reachability) -> Self {
        let mut dead_files: Vec<FileId> = graph
            .file_ids()
            .filter(|id| !reachability.is_reachable(id))
            .cloned()
            .collect();
        dead_files.sort();

        let mut reachable_code: Vec<_> = graph
            .code_files()
            .filter(|node| reachability.is_reachable(&node.id))
            .collect();
        reachable_code.sort_by(|a, b| a.id.cmp(&b.id));

        let mut dead_exports = Vec::new();
        for node in reachable_code {
            let usage = reachability.usage(&node.id);
            for name in node.export_names() {
                let used = usage.is_some_and(|u| u.is_used(name));
                if used {
                    continue;
                }
                let fact = node.export(name);
                dead_exports.push(DeadExport {
                    file: node.id.clone(),
                    export_name: name.to_string(),
                    line: fact.map_or(0, |f| f.line),
                    type_only: fact.is_some_and(|f| f.type_only),
                });
            }
        }

        let dead_css_classes = StyleUsageAnalyzer::new().find_dead_styles(graph, reachability);

        Self {
            dead_files,
            dead_exports,
            dead_css_classes,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.dead_files.is_empty()
            && self.dead_exports.is_empty()
            && self.dead_css_classes.is_empty()
    }

    /// Flatten into findings, sorted by file, then line
    pub fn to_findings(&self, filter: FindingFilter) -> Vec<DeadCode> {
        let mut findings = Vec::new();

        if filter.dead_files {
            findings.extend(self.dead_files.iter().cloned().map(DeadCode::dead_file));
        }
        if filter.unused_exports {
            findings.extend(
                self.dead_exports
                    .iter()
                    .filter(|e| !(filter.ignore_type_exports && e.type_only))
                    .map(DeadCode::unused_export),
            );
        }
        if filter.unused_styles {
            findings.extend(self.dead_css_classes.iter().map(DeadCode::unused_style));
        }

        findings.sort_by(|a, b| {
            a.file
                .cmp(&b.file)
                .then(a.line.cmp(&b.line))
                .then(a.issue.cmp(&b.issue))
        });
        findings
    }

    /// Dead files as paths relative to `base`
    pub fn dead_file_paths(&self, base: &Path) -> Vec<String> {
        self.dead_files.iter().map(|f| f.relative_to(base)).collect()
    }
}

/// Run the sweep and assemble the report in one call
pub fn find_dead_code(graph: &Graph, entries: &BTreeSet<FileId>) -> (DeadCodeReport, Reachability) {
    let reachability = ReachabilityAnalyzer::new().sweep(graph, entries);
    let report = DeadCodeReport::assemble(graph, &reachability);
    (report, reachability)
}
