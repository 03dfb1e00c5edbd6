use crate::analysis::{Confidence, DeadCode, DeadCodeIssue, Severity};
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// JSON reporter for programmatic output
pub struct JsonReporter {
    output_path: Option<PathBuf>,
    base: PathBuf,
}

impl JsonReporter {
    pub fn new(output_path: Option<PathBuf>, base: &Path) -> Self {
        Self {
            output_path,
            base: base.to_path_buf(),
        }
    }

    pub fn render(&self, findings: &[DeadCode]) -> Result<String> {
        let report = JsonReport::from_findings(findings, &self.base);
        serde_json::to_string_pretty(&report).into_diagnostic()
    }

    pub fn report(&self, findings: &[DeadCode]) -> Result<()> {
        let json = self.render(findings)?;
        super::emit(self.output_path.as_deref(), &json, "Report")
    }
}

#[derive(Serialize)]
struct JsonReport {
    version: &'static str,
    total_issues: usize,
    dead_files: Vec<String>,
    dead_exports: Vec<JsonExport>,
    dead_css_classes: Vec<JsonStyleClass>,
    issues: Vec<JsonIssue>,
    summary: JsonSummary,
}

#[derive(Serialize)]
struct JsonExport {
    file: String,
    export_name: String,
}

#[derive(Serialize)]
struct JsonStyleClass {
    file: String,
    class_name: String,
}

#[derive(Serialize)]
struct JsonIssue {
    code: &'static str,
    kind: &'static str,
    severity: &'static str,
    confidence: &'static str,
    confidence_score: f64,
    message: String,
    file: String,
    line: usize,
    name: Option<String>,
}

#[derive(Serialize)]
struct JsonSummary {
    errors: usize,
    warnings: usize,
    infos: usize,
    by_confidence: JsonConfidenceSummary,
}

#[derive(Serialize)]
struct JsonConfidenceSummary {
    high: usize,
    medium: usize,
    low: usize,
}

impl JsonReport {
    fn from_findings(findings: &[DeadCode], base: &Path) -> Self {
        let mut errors = 0;
        let mut warnings = 0;
        let mut infos = 0;
        let mut high = 0;
        let mut medium = 0;
        let mut low = 0;

        let mut dead_files = Vec::new();
        let mut dead_exports = Vec::new();
        let mut dead_css_classes = Vec::new();

        let issues: Vec<JsonIssue> = findings
            .iter()
            .map(|dc| {
                match dc.severity {
                    Severity::Error => errors += 1,
                    Severity::Warning => warnings += 1,
                    Severity::Info => infos += 1,
                }
                match dc.confidence {
                    Confidence::High => high += 1,
                    Confidence::Medium => medium += 1,
                    Confidence::Low => low += 1,
                }

                let file = dc.file.relative_to(base);
                let name = dc.name.clone().unwrap_or_default();
                match dc.issue {
                    DeadCodeIssue::DeadFile => dead_files.push(file.clone()),
                    DeadCodeIssue::UnusedExport => dead_exports.push(JsonExport {
                        file: file.clone(),
                        export_name: name,
                    }),
                    DeadCodeIssue::UnusedStyleClass => dead_css_classes.push(JsonStyleClass {
                        file: file.clone(),
                        class_name: name,
                    }),
                }

                JsonIssue {
                    code: dc.issue.code(),
                    kind: dc.issue.as_str(),
                    severity: dc.severity.as_str(),
                    confidence: dc.confidence.as_str(),
                    confidence_score: dc.confidence.score(),
                    message: dc.message.clone(),
                    file,
                    line: dc.line,
                    name: dc.name.clone(),
                }
            })
            .collect();

        Self {
            version: "1.0",
            total_issues: findings.len(),
            dead_files,
            dead_exports,
            dead_css_classes,
            issues,
            summary: JsonSummary {
                errors,
                warnings,
                infos,
                by_confidence: JsonConfidenceSummary { high, medium, low },
            },
        }
    }
}
