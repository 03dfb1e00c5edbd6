//! Fact extraction tests
//!
//! Exercise the script and style extractors through the public
//! `FactExtractor` interface, the way the graph builder uses them.

use deadcode_linter::graph::{GraphBuilder, ImportedName, SourceFacts, StyleFacts};
use deadcode_linter::parser::{FactExtractor, ScriptParser, StyleParser};
use std::path::{Path, PathBuf};

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn script(path: &str, source: &str) -> SourceFacts {
    ScriptParser::new()
        .extract(Path::new(path), source)
        .expect("script should parse")
}

fn style(path: &str, source: &str) -> StyleFacts {
    StyleParser::new()
        .extract(Path::new(path), source)
        .expect("style should parse")
}

fn export_names(facts: &SourceFacts) -> Vec<&str> {
    facts.exports.iter().map(|e| e.exported_name.as_str()).collect()
}

#[test]
fn test_fixture_entry_facts() {
    let path = fixtures_path().join("basic/src/entry.ts");
    let source = std::fs::read_to_string(&path).unwrap();
    let facts = ScriptParser::new().extract(&path, &source).unwrap();

    assert_eq!(facts.imports.len(), 2);
    assert_eq!(facts.imports[0].specifier, "./utils");
    assert_eq!(facts.imports[0].imported, ImportedName::named("helper"));
    assert_eq!(facts.imports[1].specifier, "./style.css");
    assert_eq!(facts.imports[1].imported, ImportedName::SideEffect);

    assert_eq!(export_names(&facts), vec!["render"]);
    assert!(facts.literal_strings.contains("used container"));
}

#[test]
fn test_fixture_stylesheet_facts() {
    let path = fixtures_path().join("basic/src/style.css");
    let source = std::fs::read_to_string(&path).unwrap();
    let facts = StyleParser::new().extract(&path, &source).unwrap();

    let classes: Vec<_> = facts.classes.keys().map(String::as_str).collect();
    assert_eq!(classes, vec!["container", "really-unused", "used"]);
    assert_eq!(facts.classes["container"], 5);
}

#[test]
fn test_import_forms_across_dialects() {
    let source = r#"
import Default, { a as b, type C } from "./mod";
import * as ns from "./ns";
import "./side";
export * from "./star";
export { d } from "./re";
"#;

    for path in ["file.js", "file.ts", "file.tsx"] {
        let source = if path == "file.js" {
            source.replace(", type C", "")
        } else {
            source.to_string()
        };
        let facts = script(path, &source);

        let specifiers: Vec<_> = facts.imports.iter().map(|i| i.specifier.as_str()).collect();
        assert!(specifiers.contains(&"./mod"), "{path}");
        assert!(specifiers.contains(&"./ns"), "{path}");
        assert!(specifiers.contains(&"./side"), "{path}");
        assert!(specifiers.contains(&"./star"), "{path}");
        assert!(specifiers.contains(&"./re"), "{path}");

        let default_import = facts
            .imports
            .iter()
            .find(|i| i.specifier == "./mod" && i.imported == ImportedName::named("default"));
        assert!(default_import.is_some(), "{path}");

        let aliased = facts
            .imports
            .iter()
            .find(|i| i.imported == ImportedName::named("a"))
            .unwrap();
        assert_eq!(aliased.local_name, "b");

        assert_eq!(export_names(&facts), vec!["d"], "{path}");
    }
}

#[test]
fn test_commonjs_and_dynamic_imports() {
    let facts = script(
        "loader.cjs",
        "const fs = require('fs');\nasync function load() { return import('./chunk'); }\n",
    );
    let specifiers: Vec<_> = facts
        .imports
        .iter()
        .filter(|i| i.imported == ImportedName::Namespace)
        .map(|i| i.specifier.as_str())
        .collect();
    assert_eq!(specifiers, vec!["fs", "./chunk"]);

    let facts = ScriptParser::new()
        .with_dynamic_imports(false)
        .extract(Path::new("loader.cjs"), "require('fs');\n")
        .unwrap();
    assert!(facts.imports.is_empty());
}

#[test]
fn test_typescript_declaration_exports() {
    let facts = script(
        "api.ts",
        r#"
export abstract class Base {}
export enum Kind { A, B }
export namespace Utils { export const x = 1; }
export declare function ambient(): void;
export type Alias = string;
export interface Shape { area(): number }
export const { first, second: renamed } = { first: 1, second: 2 };
export default Base;
"#,
    );

    let names = export_names(&facts);
    for expected in ["Base", "Kind", "Utils", "ambient", "Alias", "Shape", "first", "renamed", "default"] {
        assert!(names.contains(&expected), "missing {expected}: {names:?}");
    }
    assert!(!names.contains(&"x"));

    let shape = facts.exports.iter().find(|e| e.exported_name == "Shape").unwrap();
    assert!(shape.type_only);
    let base = facts.exports.iter().find(|e| e.exported_name == "Base").unwrap();
    assert!(!base.type_only);
}

#[test]
fn test_broken_source_keeps_partial_facts() {
    let facts = script(
        "broken.ts",
        "import { ok } from './ok';\nexport const fine = 1;\nfunction (((\n",
    );
    assert_eq!(facts.imports.len(), 1);
    assert!(export_names(&facts).contains(&"fine"));
}

#[test]
fn test_style_selectors_and_escapes() {
    let facts = style(
        "tailwind.css",
        r#"
.sm\:flex { display: flex; }
@media (min-width: 640px) {
  .card:not(.hidden) > #main { color: red; }
}
"#,
    );

    let classes: Vec<_> = facts.classes.keys().map(String::as_str).collect();
    assert_eq!(classes, vec!["card", "hidden", "sm:flex"]);
    assert!(facts.ids.contains_key("main"));
}

#[test]
fn test_preprocessed_stylesheets() {
    let facts = style(
        "theme.scss",
        r#"
$brand: #fff;
// .commented-out { }
.nav {
  &:hover { color: $brand; }
  .item { padding: 0; }
}
"#,
    );
    let classes: Vec<_> = facts.classes.keys().map(String::as_str).collect();
    assert_eq!(classes, vec!["item", "nav"]);

    let facts = style("theme.less", "@color: red;\n.btn { color: @color; }\n/* .gone { } */\n");
    let classes: Vec<_> = facts.classes.keys().map(String::as_str).collect();
    assert_eq!(classes, vec!["btn"]);
}

#[test]
fn test_builder_skips_unsupported_files() {
    let mut builder = GraphBuilder::new();
    builder.add_source("/p/src/index.ts", "export const a = 1;\n");
    builder.add_source("/p/README.md", "# readme\n");

    let (graph, skipped) = builder.finish();
    assert_eq!(graph.file_count(), 1);
    assert_eq!(skipped.len(), 1);
    assert_eq!(skipped[0].path, PathBuf::from("/p/README.md"));
}
