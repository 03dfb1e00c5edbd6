use crate::analysis::{DeadCode, DeadCodeIssue, Severity};
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// SARIF reporter for CI/CD integration (GitHub code scanning and friends)
pub struct SarifReporter {
    output_path: Option<PathBuf>,
    base: PathBuf,
}

impl SarifReporter {
    pub fn new(output_path: Option<PathBuf>, base: &Path) -> Self {
        Self {
            output_path,
            base: base.to_path_buf(),
        }
    }

    pub fn render(&self, findings: &[DeadCode]) -> Result<String> {
        let sarif = SarifReport::from_findings(findings, &self.base);
        serde_json::to_string_pretty(&sarif).into_diagnostic()
    }

    pub fn report(&self, findings: &[DeadCode]) -> Result<()> {
        let json = self.render(findings)?;
        super::emit(self.output_path.as_deref(), &json, "SARIF report")
    }
}

/// SARIF 2.1.0 format
#[derive(Serialize)]
struct SarifReport {
    #[serde(rename = "$schema")]
    schema: &'static str,
    version: &'static str,
    runs: Vec<SarifRun>,
}

#[derive(Serialize)]
struct SarifRun {
    tool: SarifTool,
    results: Vec<SarifResult>,
}

#[derive(Serialize)]
struct SarifTool {
    driver: SarifDriver,
}

#[derive(Serialize)]
struct SarifDriver {
    name: &'static str,
    version: &'static str,
    #[serde(rename = "informationUri", skip_serializing_if = "Option::is_none")]
    information_uri: Option<&'static str>,
    rules: Vec<SarifRule>,
}

#[derive(Serialize)]
struct SarifRule {
    id: &'static str,
    name: &'static str,
    #[serde(rename = "shortDescription")]
    short_description: SarifMessage,
    #[serde(rename = "defaultConfiguration")]
    default_configuration: SarifConfiguration,
}

#[derive(Serialize)]
struct SarifConfiguration {
    level: &'static str,
}

#[derive(Serialize)]
struct SarifResult {
    #[serde(rename = "ruleId")]
    rule_id: &'static str,
    #[serde(rename = "ruleIndex")]
    rule_index: usize,
    level: &'static str,
    message: SarifMessage,
    locations: Vec<SarifLocation>,
}

#[derive(Serialize)]
struct SarifMessage {
    text: String,
}

#[derive(Serialize)]
struct SarifLocation {
    #[serde(rename = "physicalLocation")]
    physical_location: SarifPhysicalLocation,
}

#[derive(Serialize)]
struct SarifPhysicalLocation {
    #[serde(rename = "artifactLocation")]
    artifact_location: SarifArtifactLocation,
    #[serde(skip_serializing_if = "Option::is_none")]
    region: Option<SarifRegion>,
}

#[derive(Serialize)]
struct SarifArtifactLocation {
    uri: String,
}

#[derive(Serialize)]
struct SarifRegion {
    #[serde(rename = "startLine")]
    start_line: usize,
}

const RULE_ORDER: [DeadCodeIssue; 3] = [
    DeadCodeIssue::DeadFile,
    DeadCodeIssue::UnusedExport,
    DeadCodeIssue::UnusedStyleClass,
];

fn sarif_level(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "error",
        Severity::Warning => "warning",
        Severity::Info => "note",
    }
}

fn rule_description(issue: DeadCodeIssue) -> &'static str {
    match issue {
        DeadCodeIssue::DeadFile => "File is not reachable from any entry point",
        DeadCodeIssue::UnusedExport => "Export of a reachable file is never imported",
        DeadCodeIssue::UnusedStyleClass => "Style class is never referenced by reachable code",
    }
}

impl SarifReport {
    fn from_findings(findings: &[DeadCode], base: &Path) -> Self {
        let rules = RULE_ORDER
            .iter()
            .map(|issue| SarifRule {
                id: issue.code(),
                name: issue.as_str(),
                short_description: SarifMessage {
                    text: rule_description(*issue).to_string(),
                },
                default_configuration: SarifConfiguration {
                    level: sarif_level(issue.default_severity()),
                },
            })
            .collect();

        let results: Vec<SarifResult> = findings
            .iter()
            .map(|dc| SarifResult {
                rule_id: dc.issue.code(),
                rule_index: RULE_ORDER.iter().position(|i| *i == dc.issue).unwrap_or(0),
                level: sarif_level(dc.severity),
                message: SarifMessage {
                    text: dc.message.clone(),
                },
                locations: vec![SarifLocation {
                    physical_location: SarifPhysicalLocation {
                        artifact_location: SarifArtifactLocation {
                            uri: dc.file.relative_to(base),
                        },
                        region: (dc.line > 0).then_some(SarifRegion {
                            start_line: dc.line,
                        }),
                    },
                }],
            })
            .collect();

        SarifReport {
            schema: "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/master/Schemata/sarif-schema-2.1.0.json",
            version: "2.1.0",
            runs: vec![SarifRun {
                tool: SarifTool {
                    driver: SarifDriver {
                        name: "deadcode-linter",
                        version: env!("CARGO_PKG_VERSION"),
                        information_uri: Some(env!("CARGO_PKG_REPOSITORY")).filter(|uri| !uri.is_empty()),
                        rules,
                    },
                },
                results,
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::DeadStyle;
    use crate::graph::FileId;

    #[test]
    fn test_sarif_rules_and_results() {
        let findings = vec![
            DeadCode::dead_file(FileId::new("/p/src/dead.ts")),
            DeadCode::unused_style(&DeadStyle {
                file: FileId::new("/p/src/a.css"),
                class_name: "ghost".to_string(),
                line: 7,
                file_reachable: true,
            }),
        ];

        let json = SarifReporter::new(None, Path::new("/p"))
            .render(&findings)
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        let run = &value["runs"][0];
        assert_eq!(value["version"], "2.1.0");
        assert_eq!(run["tool"]["driver"]["rules"].as_array().unwrap().len(), 3);
        assert_eq!(run["results"][0]["ruleId"], "DC001");
        assert!(run["results"][0]["locations"][0]["physicalLocation"]
            .get("region")
            .is_none());
        assert_eq!(run["results"][1]["ruleId"], "DC003");
        assert_eq!(run["results"][1]["ruleIndex"], 2);
        assert_eq!(run["results"][1]["level"], "note");
        assert_eq!(
            run["results"][1]["locations"][0]["physicalLocation"]["region"]["startLine"],
            7
        );
    }
}
