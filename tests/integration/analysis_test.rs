//! Integration tests for the analysis pipeline
//!
//! These tests run full scans (discovery, extraction, resolution, sweep)
//! against the fixture project and small scratch projects.

use deadcode_linter::analysis::{Confidence, DeadCodeIssue, DeadCodeReport};
use deadcode_linter::config::Config;
use deadcode_linter::scan::{run_scan, ScanOptions, ScanOutcome};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Get the path to the test fixtures directory
fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn entry_config(pattern: &str) -> Config {
    Config {
        entry: vec![pattern.to_string()],
        package_entries: false,
        ..Config::default()
    }
}

fn scan(config: &Config, root: &Path) -> ScanOutcome {
    run_scan(config, root, ScanOptions::default()).expect("scan should succeed")
}

fn write(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, contents).unwrap();
}

fn dead_files(outcome: &ScanOutcome) -> Vec<String> {
    outcome.report.dead_file_paths(&outcome.root)
}

fn dead_exports(outcome: &ScanOutcome) -> Vec<(String, String)> {
    outcome
        .report
        .dead_exports
        .iter()
        .map(|e| (e.file.relative_to(&outcome.root), e.export_name.clone()))
        .collect()
}

fn dead_classes(outcome: &ScanOutcome) -> Vec<(String, String)> {
    outcome
        .report
        .dead_css_classes
        .iter()
        .map(|c| (c.file.relative_to(&outcome.root), c.class_name.clone()))
        .collect()
}

// ============================================================================
// Fixture project
// ============================================================================

#[test]
fn test_basic_fixture_end_to_end() {
    let outcome = scan(&entry_config("**/entry.*"), &fixtures_path().join("basic"));

    assert_eq!(dead_files(&outcome), vec!["src/dead.ts"]);
    assert_eq!(
        dead_exports(&outcome),
        vec![("src/utils.ts".to_string(), "unusedHelper".to_string())]
    );
    assert_eq!(
        dead_classes(&outcome),
        vec![("src/style.css".to_string(), "really-unused".to_string())]
    );
}

#[test]
fn test_basic_fixture_findings() {
    let outcome = scan(&entry_config("**/entry.*"), &fixtures_path().join("basic"));

    let kinds: Vec<_> = outcome.findings.iter().map(|f| f.issue).collect();
    assert_eq!(kinds.len(), 3);
    assert!(kinds.contains(&DeadCodeIssue::DeadFile));
    assert!(kinds.contains(&DeadCodeIssue::UnusedExport));
    assert!(kinds.contains(&DeadCodeIssue::UnusedStyleClass));

    let style = outcome
        .findings
        .iter()
        .find(|f| f.issue == DeadCodeIssue::UnusedStyleClass)
        .unwrap();
    // Sheet is reachable, so the match is only textual
    assert_eq!(style.confidence, Confidence::Low);
    assert_eq!(style.line, 9);
}

#[test]
fn test_scan_is_deterministic() {
    let config = entry_config("**/entry.*");
    let root = fixtures_path().join("basic");

    let first = scan(&config, &root);
    let second = scan(&config, &root);
    assert_eq!(first.report, second.report);
    assert_eq!(first.findings, second.findings);
}

#[test]
fn test_no_entry_match_reports_everything_dead() {
    let outcome = scan(&entry_config("nothing/here.ts"), &fixtures_path().join("basic"));

    assert!(outcome.entries.is_empty());
    assert_eq!(outcome.report.dead_files.len(), 4);
    assert!(outcome.report.dead_exports.is_empty());
    // Every identifier of an unreachable sheet is dead
    assert_eq!(outcome.report.dead_css_classes.len(), 3);
}

// ============================================================================
// Reachability semantics
// ============================================================================

#[test]
fn test_side_effect_import_marks_reachable_only() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "src/index.ts", "import './polyfill';\n");
    write(temp.path(), "src/polyfill.ts", "export const installed = true;\n");

    let outcome = scan(&entry_config("src/index.ts"), temp.path());

    assert!(dead_files(&outcome).is_empty());
    assert_eq!(
        dead_exports(&outcome),
        vec![("src/polyfill.ts".to_string(), "installed".to_string())]
    );
}

#[test]
fn test_namespace_import_uses_all_exports() {
    let temp = TempDir::new().unwrap();
    write(
        temp.path(),
        "src/index.ts",
        "import * as math from './math';\nconsole.log(math.add(1, 2));\n",
    );
    write(
        temp.path(),
        "src/math.ts",
        "export const add = (a: number, b: number) => a + b;\nexport const sub = (a: number, b: number) => a - b;\n",
    );

    let outcome = scan(&entry_config("src/index.ts"), temp.path());
    assert!(outcome.report.is_empty());
}

#[test]
fn test_reexport_chain_is_followed() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "src/index.ts", "import { a } from './barrel';\nconsole.log(a);\n");
    write(temp.path(), "src/barrel.ts", "export { a, b } from './impl';\n");
    write(temp.path(), "src/impl.ts", "export const a = 1;\nexport const b = 2;\nexport const c = 3;\n");

    let outcome = scan(&entry_config("src/index.ts"), temp.path());

    assert!(dead_files(&outcome).is_empty());
    assert_eq!(
        dead_exports(&outcome),
        vec![
            ("src/barrel.ts".to_string(), "b".to_string()),
            ("src/impl.ts".to_string(), "c".to_string()),
        ]
    );
}

#[test]
fn test_star_reexport_keeps_target_alive() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "src/index.ts", "export * from './impl';\n");
    write(temp.path(), "src/impl.ts", "export const a = 1;\nexport function b() {}\n");

    let outcome = scan(&entry_config("src/index.ts"), temp.path());
    assert!(outcome.report.is_empty());
}

#[test]
fn test_imports_from_dead_files_do_not_count() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "src/index.ts", "import { used } from './lib';\nused();\n");
    write(temp.path(), "src/lib.ts", "export function used() {}\nexport function other() {}\n");
    write(temp.path(), "src/orphan.ts", "import { other } from './lib';\nother();\n");

    let outcome = scan(&entry_config("src/index.ts"), temp.path());

    assert_eq!(dead_files(&outcome), vec!["src/orphan.ts"]);
    assert_eq!(
        dead_exports(&outcome),
        vec![("src/lib.ts".to_string(), "other".to_string())]
    );
}

#[test]
fn test_dynamic_imports_toggle() {
    let temp = TempDir::new().unwrap();
    write(
        temp.path(),
        "src/index.js",
        "const page = () => import('./lazy');\nconst legacy = require('./legacy');\n",
    );
    write(temp.path(), "src/lazy.js", "export default function Lazy() {}\n");
    write(temp.path(), "src/legacy.js", "module.exports = {};\n");

    let outcome = scan(&entry_config("src/index.js"), temp.path());
    assert!(dead_files(&outcome).is_empty());

    let mut config = entry_config("src/index.js");
    config.detection.dynamic_imports = false;
    let outcome = scan(&config, temp.path());
    assert_eq!(dead_files(&outcome), vec!["src/lazy.js", "src/legacy.js"]);
}

#[test]
fn test_js_extension_resolves_to_typescript_source() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "src/index.ts", "import { x } from './util.js';\nconsole.log(x);\n");
    write(temp.path(), "src/util.ts", "export const x = 1;\n");

    let outcome = scan(&entry_config("src/index.ts"), temp.path());
    assert_eq!(outcome.resolution.resolved, 1);
    assert!(outcome.report.is_empty());
}

#[test]
fn test_directory_index_and_external_packages() {
    let temp = TempDir::new().unwrap();
    write(
        temp.path(),
        "src/index.ts",
        "import React from 'react';\nimport { Button } from './components';\nconsole.log(React, Button);\n",
    );
    write(temp.path(), "src/components/index.ts", "export { Button } from './Button';\n");
    write(temp.path(), "src/components/Button.tsx", "export function Button() { return <button />; }\n");

    let outcome = scan(&entry_config("src/index.ts"), temp.path());

    assert_eq!(outcome.resolution.unresolved + outcome.resolution.external, 1);
    assert!(outcome.report.is_empty());
}

// ============================================================================
// Style usage
// ============================================================================

#[test]
fn test_unreachable_stylesheet_reports_every_class() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "src/index.ts", "const cls = 'a';\n");
    write(temp.path(), "src/unused.css", ".a { }\n.b { }\n");

    let outcome = scan(&entry_config("src/index.ts"), temp.path());

    assert_eq!(dead_files(&outcome), vec!["src/unused.css"]);
    assert_eq!(
        dead_classes(&outcome),
        vec![
            ("src/unused.css".to_string(), "a".to_string()),
            ("src/unused.css".to_string(), "b".to_string()),
        ]
    );
    assert!(outcome
        .findings
        .iter()
        .filter(|f| f.issue == DeadCodeIssue::UnusedStyleClass)
        .all(|f| f.confidence == Confidence::High));
}

#[test]
fn test_pseudo_classes_never_reported_as_dead() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "src/index.ts", "import './s.css';\nconst c = 'btn';\n");
    write(
        temp.path(),
        "src/s.css",
        ".btn:hover { }\n.btn:not(.off) { }\nli:nth-child(2n) { }\n",
    );

    let outcome = scan(&entry_config("src/index.ts"), temp.path());

    assert_eq!(
        dead_classes(&outcome),
        vec![("src/s.css".to_string(), "off".to_string())]
    );
}

#[test]
fn test_class_tokens_match_whole_words_only() {
    let temp = TempDir::new().unwrap();
    write(
        temp.path(),
        "src/index.tsx",
        "import './app.css';\nexport const App = () => <div className=\"foo bar\" />;\n",
    );
    write(temp.path(), "src/app.css", ".foo { }\n.bar { }\n.foobar { }\n");

    let outcome = scan(&entry_config("src/index.tsx"), temp.path());
    assert_eq!(
        dead_classes(&outcome),
        vec![("src/app.css".to_string(), "foobar".to_string())]
    );
}

#[test]
fn test_style_ids_are_opt_in() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "src/index.ts", "import './app.css';\n");
    write(temp.path(), "src/app.css", "#header { }\n");

    let outcome = scan(&entry_config("src/index.ts"), temp.path());
    assert!(outcome.report.dead_css_classes.is_empty());

    let mut config = entry_config("src/index.ts");
    config.detection.style_ids = true;
    let outcome = scan(&config, temp.path());
    assert_eq!(
        dead_classes(&outcome),
        vec![("src/app.css".to_string(), "header".to_string())]
    );
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_package_json_main_is_an_entry() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "package.json", r#"{ "main": "./lib/main.js" }"#);
    write(temp.path(), "lib/main.js", "require('./dep');\n");
    write(temp.path(), "lib/dep.js", "module.exports = 1;\n");

    let config = Config {
        entry: vec![],
        ..Config::default()
    };
    let outcome = scan(&config, temp.path());
    assert!(outcome.report.dead_files.is_empty());
}

#[test]
fn test_excluded_directories_are_not_scanned() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "src/index.ts", "export {};\n");
    write(temp.path(), "dist/bundle.js", "console.log('built');\n");
    write(temp.path(), "node_modules/pkg/index.js", "module.exports = 1;\n");

    let outcome = scan(&entry_config("src/index.ts"), temp.path());
    assert_eq!(outcome.stats.total(), 1);
}

#[test]
fn test_type_exports_can_be_ignored() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "src/index.ts", "import './types';\n");
    write(
        temp.path(),
        "src/types.ts",
        "export interface Props { id: string }\nexport const value = 1;\n",
    );

    let outcome = scan(&entry_config("src/index.ts"), temp.path());
    assert_eq!(outcome.findings.len(), 2);

    let mut config = entry_config("src/index.ts");
    config.detection.ignore_type_exports = true;
    let outcome = scan(&config, temp.path());
    let names: Vec<_> = outcome.findings.iter().filter_map(|f| f.name.clone()).collect();
    assert_eq!(names, vec!["value"]);
}

#[test]
fn test_report_assembly_is_pure() {
    let outcome = scan(&entry_config("**/entry.*"), &fixtures_path().join("basic"));
    let rebuilt = DeadCodeReport::assemble(&outcome.graph, &outcome.reachability);
    assert_eq!(rebuilt, outcome.report);
}
