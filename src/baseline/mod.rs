//! Baseline support
//!
//! A baseline records the findings of one run so later runs report only what
//! is new. Findings are matched by file, issue kind and name; line numbers
//! are ignored so unrelated edits do not resurrect old findings.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use thiserror::Error;

use crate::analysis::DeadCode;

/// Baseline errors
#[derive(Error, Debug)]
pub enum BaselineError {
    #[error("Failed to read baseline file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse baseline: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error("Baseline version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
}

/// Current baseline format version
const BASELINE_VERSION: u32 = 1;

/// A fingerprint for a finding that can be matched across runs
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IssueFingerprint {
    /// File path relative to the project root, `/`-separated
    pub file: String,
    /// Issue kind, e.g. `unused-export`
    pub issue: String,
    /// Export or class name; empty for dead files
    pub name: String,
}

impl IssueFingerprint {
    pub fn from_dead_code(dc: &DeadCode, project_root: &Path) -> Self {
        Self {
            file: dc.file.relative_to(project_root),
            issue: dc.issue.as_str().to_string(),
            name: dc.name.clone().unwrap_or_default(),
        }
    }
}

/// A baseline containing known findings to ignore
#[derive(Debug, Serialize, Deserialize)]
pub struct Baseline {
    /// Baseline format version
    pub version: u32,
    /// Seconds since the Unix epoch when the baseline was written
    pub created_at: u64,
    /// Known findings
    pub issues: Vec<IssueFingerprint>,

    #[serde(skip)]
    index: HashSet<IssueFingerprint>,
}

impl Baseline {
    /// Create a new baseline from findings
    pub fn from_findings(findings: &[DeadCode], project_root: &Path) -> Self {
        let mut issues: Vec<IssueFingerprint> = findings
            .iter()
            .map(|dc| IssueFingerprint::from_dead_code(dc, project_root))
            .collect();
        issues.sort_by(|a, b| {
            (&a.file, &a.issue, &a.name).cmp(&(&b.file, &b.issue, &b.name))
        });
        issues.dedup();

        let created_at = std::time::SystemTime::now()
            .duration_since(std::time::SystemTime::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();

        let index = issues.iter().cloned().collect();
        Self {
            version: BASELINE_VERSION,
            created_at,
            issues,
            index,
        }
    }

    /// Load a baseline from a file
    pub fn load(path: &Path) -> Result<Self, BaselineError> {
        let file = fs::File::open(path)?;
        let reader = BufReader::new(file);
        let mut baseline: Self = serde_json::from_reader(reader)?;

        if baseline.version != BASELINE_VERSION {
            return Err(BaselineError::VersionMismatch {
                expected: BASELINE_VERSION,
                found: baseline.version,
            });
        }

        baseline.index = baseline.issues.iter().cloned().collect();
        Ok(baseline)
    }

    /// Save baseline to a file
    pub fn save(&self, path: &Path) -> Result<(), BaselineError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Findings not recorded in the baseline
    pub fn filter_new<'a>(
        &self,
        findings: &'a [DeadCode],
        project_root: &Path,
    ) -> Vec<&'a DeadCode> {
        findings
            .iter()
            .filter(|dc| !self.is_baselined(dc, project_root))
            .collect()
    }

    pub fn is_baselined(&self, dc: &DeadCode, project_root: &Path) -> bool {
        self.index
            .contains(&IssueFingerprint::from_dead_code(dc, project_root))
    }

    /// Get statistics about baseline coverage
    pub fn stats(&self, findings: &[DeadCode], project_root: &Path) -> BaselineStats {
        let baselined = findings
            .iter()
            .filter(|dc| self.is_baselined(dc, project_root))
            .count();

        BaselineStats {
            total_in_baseline: self.issues.len(),
            baselined_found: baselined,
            new_issues: findings.len() - baselined,
        }
    }
}

/// Statistics about baseline comparison
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaselineStats {
    /// Total findings recorded in baseline
    pub total_in_baseline: usize,
    /// Number of current findings that match baseline
    pub baselined_found: usize,
    /// Number of new findings not in baseline
    pub new_issues: usize,
}

impl std::fmt::Display for BaselineStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} new issues ({} baselined, {} in baseline file)",
            self.new_issues, self.baselined_found, self.total_in_baseline
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::DeadExport;
    use crate::graph::FileId;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn unused_export(file: &str, name: &str, line: usize) -> DeadCode {
        DeadCode::unused_export(&DeadExport {
            file: FileId::new(file),
            export_name: name.to_string(),
            line,
            type_only: false,
        })
    }

    #[test]
    fn test_fingerprint_ignores_line() {
        let project_root = PathBuf::from("/project");
        let dc = unused_export("/project/src/utils.ts", "helper", 10);
        let fp = IssueFingerprint::from_dead_code(&dc, &project_root);

        assert_eq!(fp.file, "src/utils.ts");
        assert_eq!(fp.issue, "unused-export");

        let moved = unused_export("/project/src/utils.ts", "helper", 90);
        assert_eq!(IssueFingerprint::from_dead_code(&moved, &project_root), fp);

        let dead_file = DeadCode::dead_file(FileId::new("/project/src/utils.ts"));
        assert_ne!(IssueFingerprint::from_dead_code(&dead_file, &project_root), fp);
    }

    #[test]
    fn test_baseline_save_load() {
        let temp_dir = TempDir::new().unwrap();
        let baseline_path = temp_dir.path().join("nested/baseline.json");
        let project_root = PathBuf::from("/project");

        let findings = vec![
            unused_export("/project/src/a.ts", "a", 1),
            unused_export("/project/src/b.ts", "b", 2),
            DeadCode::dead_file(FileId::new("/project/src/c.ts")),
        ];

        let baseline = Baseline::from_findings(&findings, &project_root);
        baseline.save(&baseline_path).unwrap();

        let loaded = Baseline::load(&baseline_path).unwrap();
        assert_eq!(loaded.issues.len(), 3);
        assert!(loaded.is_baselined(&findings[2], &project_root));
    }

    #[test]
    fn test_version_mismatch() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("baseline.json");
        std::fs::write(&path, r#"{"version": 99, "created_at": 0, "issues": []}"#).unwrap();

        assert!(matches!(
            Baseline::load(&path),
            Err(BaselineError::VersionMismatch { found: 99, .. })
        ));
    }

    #[test]
    fn test_baseline_filter() {
        let project_root = PathBuf::from("/project");
        let findings = vec![
            unused_export("/project/src/a.ts", "ClassA", 10),
            unused_export("/project/src/b.ts", "ClassB", 20),
        ];

        let baseline = Baseline::from_findings(&findings[..1], &project_root);

        let new_findings = baseline.filter_new(&findings, &project_root);
        assert_eq!(new_findings.len(), 1);
        assert_eq!(new_findings[0].name.as_deref(), Some("ClassB"));

        let stats = baseline.stats(&findings, &project_root);
        assert_eq!(stats.new_issues, 1);
        assert_eq!(stats.baselined_found, 1);
    }
}
