//! CLI integration tests
//!
//! These tests verify that the CLI works correctly with various options.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Get the path to the test fixtures directory
fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn cli() -> Command {
    let mut cmd = Command::cargo_bin("deadcode-linter").expect("binary should build");
    cmd.env("NO_COLOR", "1");
    cmd
}

/// Copy the basic fixture into a scratch directory
fn scratch_fixture() -> TempDir {
    let temp = TempDir::new().unwrap();
    let src = fixtures_path().join("basic/src");
    std::fs::create_dir_all(temp.path().join("src")).unwrap();
    for entry in std::fs::read_dir(&src).unwrap() {
        let entry = entry.unwrap();
        std::fs::copy(entry.path(), temp.path().join("src").join(entry.file_name())).unwrap();
    }
    temp
}

fn json_scan(path: &Path, extra: &[&str]) -> serde_json::Value {
    let output = cli()
        .args(["scan", "-q", "--entry", "**/entry.*", "--format", "json", "-p"])
        .arg(path)
        .args(extra)
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_cli_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("deadcode-linter"))
        .stdout(predicate::str::contains("--parallel"))
        .stdout(predicate::str::contains("prune"));
}

#[test]
fn test_cli_version() {
    cli()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_missing_project_fails() {
    cli()
        .args(["-q", "-p", "/definitely/not/a/project"])
        .assert()
        .failure();
}

// ============================================================================
// Scan
// ============================================================================

#[test]
fn test_default_command_prints_terminal_report() {
    cli()
        .args(["-q", "--entry", "**/entry.*", "-p"])
        .arg(fixtures_path().join("basic"))
        .assert()
        .success()
        .stdout(predicate::str::contains("--- Dead Files (Unreachable) ---"))
        .stdout(predicate::str::contains("src/dead.ts"))
        .stdout(predicate::str::contains("unusedHelper"))
        .stdout(predicate::str::contains("really-unused"));
}

#[test]
fn test_json_report() {
    let report = json_scan(&fixtures_path().join("basic"), &[]);

    assert_eq!(report["dead_files"], serde_json::json!(["src/dead.ts"]));
    assert_eq!(report["dead_exports"][0]["file"], "src/utils.ts");
    assert_eq!(report["dead_exports"][0]["export_name"], "unusedHelper");
    assert_eq!(report["dead_css_classes"][0]["class_name"], "really-unused");
    assert_eq!(report["total_issues"], 3);
}

#[test]
fn test_parallel_matches_sequential() {
    let root = fixtures_path().join("basic");
    let sequential = json_scan(&root, &[]);
    let parallel = json_scan(&root, &["--parallel"]);
    assert_eq!(sequential["issues"], parallel["issues"]);
}

#[test]
fn test_min_confidence_filters_findings() {
    let report = json_scan(&fixtures_path().join("basic"), &["--min-confidence", "high"]);

    // Only the dead file is high confidence
    assert_eq!(report["total_issues"], 1);
    assert_eq!(report["issues"][0]["code"], "DC001");
}

#[test]
fn test_retain_pattern_hides_findings() {
    let report = json_scan(&fixtures_path().join("basic"), &["--retain", "src/dead.ts"]);
    assert_eq!(report["dead_files"], serde_json::json!([]));
}

#[test]
fn test_sarif_output_file() {
    let temp = TempDir::new().unwrap();
    let output = temp.path().join("report.sarif");

    cli()
        .args(["-q", "--entry", "**/entry.*", "--format", "sarif", "-p"])
        .arg(fixtures_path().join("basic"))
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    let sarif: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(sarif["version"], "2.1.0");
    let rule_ids: Vec<_> = sarif["runs"][0]["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["ruleId"].as_str().unwrap().to_string())
        .collect();
    assert!(rule_ids.contains(&"DC001".to_string()));
    assert!(rule_ids.contains(&"DC002".to_string()));
    assert!(rule_ids.contains(&"DC003".to_string()));
}

#[test]
fn test_config_file_in_project_root() {
    let temp = scratch_fixture();
    std::fs::write(
        temp.path().join(".deadcode.yml"),
        "entry:\n  - \"src/entry.ts\"\ndetection:\n  unused_styles: false\n",
    )
    .unwrap();

    let output = cli()
        .args(["-q", "--format", "json", "-p"])
        .arg(temp.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["dead_files"], serde_json::json!(["src/dead.ts"]));
    assert_eq!(report["dead_css_classes"], serde_json::json!([]));
}

#[test]
fn test_baseline_round_trip() {
    let temp = scratch_fixture();
    let baseline = temp.path().join("baseline.json");

    cli()
        .args(["-q", "--entry", "**/entry.*", "--format", "json", "-p"])
        .arg(temp.path())
        .arg("--generate-baseline")
        .arg(&baseline)
        .assert()
        .success();
    assert!(baseline.exists());

    // A new dead file appears after the baseline was taken
    std::fs::write(temp.path().join("src/newer.ts"), "export const n = 1;\n").unwrap();

    let report = json_scan(temp.path(), &["--baseline", baseline.to_str().unwrap()]);
    assert_eq!(report["total_issues"], 1);
    assert_eq!(report["dead_files"], serde_json::json!(["src/newer.ts"]));
}

#[test]
fn test_detect_cycles() {
    let temp = scratch_fixture();
    std::fs::write(temp.path().join("src/ping.ts"), "import './pong';\n").unwrap();
    std::fs::write(temp.path().join("src/pong.ts"), "import './ping';\n").unwrap();

    cli()
        .args(["-q", "--entry", "**/entry.*", "--detect-cycles", "-p"])
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("1 dead cycles found (2 files)"))
        .stdout(predicate::str::contains("src/ping.ts"));
}

// ============================================================================
// Prune
// ============================================================================

#[test]
fn test_prune_dry_run_keeps_files() {
    let temp = scratch_fixture();

    cli()
        .args(["prune", "-q", "--dry-run", "--entry", "**/entry.*", "-p"])
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("src/dead.ts"));

    assert!(temp.path().join("src/dead.ts").exists());
}

#[test]
fn test_prune_force_deletes_dead_files() {
    let temp = scratch_fixture();
    let undo = temp.path().join("undo.sh");

    cli()
        .args(["prune", "-q", "--force", "--entry", "**/entry.*", "-p"])
        .arg(temp.path())
        .arg("--undo-script")
        .arg(&undo)
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted 1 files"));

    assert!(!temp.path().join("src/dead.ts").exists());
    assert!(temp.path().join("src/utils.ts").exists());
    assert!(std::fs::read_to_string(undo).unwrap().contains("deadValue"));
}
