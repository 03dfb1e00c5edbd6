use super::common::{
    has_child_kind, named_child_of_kind, node_line, node_text, preorder, unquote, ExtractError,
    FactExtractor,
};
use crate::graph::{ExportFact, ImportFact, ImportedName, SourceFacts};
use std::path::Path;
use tracing::debug;
use tree_sitter::{Language, Node, Parser as TsParser};

/// Grammar used for a script file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptDialect {
    JavaScript,
    TypeScript,
    Tsx,
}

impl ScriptDialect {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "js" | "jsx" | "mjs" | "cjs" => Some(ScriptDialect::JavaScript),
            "ts" | "mts" | "cts" => Some(ScriptDialect::TypeScript),
            "tsx" => Some(ScriptDialect::Tsx),
            _ => None,
        }
    }

    fn language(&self) -> Language {
        match self {
            ScriptDialect::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            ScriptDialect::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            ScriptDialect::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }
}

/// JavaScript / TypeScript fact extractor using tree-sitter
///
/// Collects static imports, re-exports, exports and every string literal.
/// A fresh tree-sitter parser is created per file so one extractor can be
/// shared across threads.
#[derive(Debug, Clone)]
pub struct ScriptParser {
    /// Treat `import("m")` / `require("m")` with a literal argument as imports
    dynamic_imports: bool,
}

impl ScriptParser {
    pub fn new() -> Self {
        Self {
            dynamic_imports: true,
        }
    }

    pub fn with_dynamic_imports(mut self, enabled: bool) -> Self {
        self.dynamic_imports = enabled;
        self
    }

    /// Parse source text with an explicit dialect
    pub fn parse_source(
        &self,
        path: &Path,
        contents: &str,
        dialect: ScriptDialect,
    ) -> Result<SourceFacts, ExtractError> {
        let mut parser = TsParser::new();
        parser.set_language(&dialect.language())?;

        let tree = parser
            .parse(contents, None)
            .ok_or_else(|| ExtractError::NoTree(path.to_path_buf()))?;
        let root = tree.root_node();

        if root.has_error() {
            debug!("Syntax errors in {}, keeping partial facts", path.display());
        }

        let mut facts = SourceFacts::default();
        for node in preorder(root) {
            match node.kind() {
                "import_statement" => self.extract_import(node, contents, &mut facts),
                "export_statement" if !inside_namespace(node) => {
                    self.extract_export(node, contents, &mut facts)
                }
                "call_expression" if self.dynamic_imports => {
                    self.extract_dynamic_import(node, contents, &mut facts)
                }
                "string" => {
                    facts
                        .literal_strings
                        .insert(unquote(node_text(node, contents)).to_string());
                }
                _ => {}
            }
        }

        Ok(facts)
    }

    fn extract_import(&self, node: Node, source: &str, facts: &mut SourceFacts) {
        let line = node_line(node);
        let statement_type_only = has_child_kind(node, "type") || has_child_kind(node, "typeof");

        // import x = require("m")
        if let Some(require) = named_child_of_kind(node, "import_require_clause") {
            if let Some(spec) = require.child_by_field_name("source") {
                let local = named_child_of_kind(require, "identifier")
                    .map(|n| node_text(n, source))
                    .unwrap_or_default();
                facts.imports.push(
                    ImportFact::namespace(unquote(node_text(spec, source)))
                        .with_local(local)
                        .with_type_only(statement_type_only)
                        .at_line(line),
                );
            }
            return;
        }

        let Some(spec) = node.child_by_field_name("source") else {
            return;
        };
        let specifier = unquote(node_text(spec, source));
        let before = facts.imports.len();

        if let Some(clause) = named_child_of_kind(node, "import_clause") {
            let mut cursor = clause.walk();
            for part in clause.named_children(&mut cursor) {
                match part.kind() {
                    "identifier" => facts.imports.push(
                        ImportFact::named(specifier, "default")
                            .with_local(node_text(part, source))
                            .with_type_only(statement_type_only)
                            .at_line(line),
                    ),
                    "namespace_import" => {
                        let local = named_child_of_kind(part, "identifier")
                            .map(|n| node_text(n, source))
                            .unwrap_or_default();
                        facts.imports.push(
                            ImportFact::namespace(specifier)
                                .with_local(local)
                                .with_type_only(statement_type_only)
                                .at_line(line),
                        );
                    }
                    "named_imports" => {
                        let mut spec_cursor = part.walk();
                        for item in part.named_children(&mut spec_cursor) {
                            if item.kind() != "import_specifier" {
                                continue;
                            }
                            let Some(name) = item.child_by_field_name("name") else {
                                continue;
                            };
                            let imported = unquote(node_text(name, source));
                            let local = item
                                .child_by_field_name("alias")
                                .map(|n| node_text(n, source))
                                .unwrap_or(imported);
                            let type_only = statement_type_only || has_child_kind(item, "type");
                            facts.imports.push(
                                ImportFact::named(specifier, imported)
                                    .with_local(local)
                                    .with_type_only(type_only)
                                    .at_line(line),
                            );
                        }
                    }
                    _ => {}
                }
            }
        }

        // `import "./x"` and `import {} from "./x"` bind nothing
        if facts.imports.len() == before {
            facts.imports.push(
                ImportFact::side_effect(specifier)
                    .with_type_only(statement_type_only)
                    .at_line(line),
            );
        }
    }

    fn extract_export(&self, node: Node, source: &str, facts: &mut SourceFacts) {
        let line = node_line(node);
        let statement_type_only = has_child_kind(node, "type");
        let specifier = node
            .child_by_field_name("source")
            .map(|n| unquote(node_text(n, source)));

        // export default ... / export = ...
        if has_child_kind(node, "default") || has_child_kind(node, "=") {
            let local = node
                .child_by_field_name("declaration")
                .and_then(|d| d.child_by_field_name("name"))
                .or_else(|| {
                    node.child_by_field_name("value")
                        .filter(|v| v.kind() == "identifier")
                })
                .map(|n| node_text(n, source));
            let mut export = ExportFact::default_export().at_line(line);
            if let Some(local) = local {
                export = export.with_local(local);
            }
            facts.exports.push(export);
            return;
        }

        if let Some(declaration) = node.child_by_field_name("declaration") {
            self.extract_declaration_exports(declaration, source, line, facts);
            return;
        }

        if let Some(clause) = named_child_of_kind(node, "export_clause") {
            let mut cursor = clause.walk();
            for item in clause.named_children(&mut cursor) {
                if item.kind() != "export_specifier" {
                    continue;
                }
                let Some(name) = item.child_by_field_name("name") else {
                    continue;
                };
                let local = unquote(node_text(name, source));
                let exported = item
                    .child_by_field_name("alias")
                    .map(|n| unquote(node_text(n, source)))
                    .unwrap_or(local);
                let type_only = statement_type_only || has_child_kind(item, "type");

                if let Some(specifier) = specifier {
                    // export { a as b } from "./m" re-exports a binding of ./m
                    facts.imports.push(
                        ImportFact::named(specifier, local)
                            .with_local(exported)
                            .with_type_only(type_only)
                            .at_line(line),
                    );
                    facts.exports.push(
                        ExportFact::new(exported)
                            .with_type_only(type_only)
                            .at_line(line),
                    );
                } else {
                    facts.exports.push(
                        ExportFact::new(exported)
                            .with_local(local)
                            .with_type_only(type_only)
                            .at_line(line),
                    );
                }
            }
            return;
        }

        // export * from "./m" / export * as ns from "./m"
        let namespace_export = named_child_of_kind(node, "namespace_export");
        if has_child_kind(node, "*") || namespace_export.is_some() {
            if let Some(specifier) = specifier {
                let namespace = namespace_export
                    .and_then(|ns| ns.named_child(0))
                    .map(|n| unquote(node_text(n, source)));
                let mut import = ImportFact::namespace(specifier)
                    .with_type_only(statement_type_only)
                    .at_line(line);
                if let Some(ns) = namespace {
                    import = import.with_local(ns);
                    facts.exports.push(
                        ExportFact::new(ns)
                            .with_type_only(statement_type_only)
                            .at_line(line),
                    );
                }
                facts.imports.push(import);
            }
        }
    }

    fn extract_declaration_exports(
        &self,
        declaration: Node,
        source: &str,
        line: usize,
        facts: &mut SourceFacts,
    ) {
        match declaration.kind() {
            "lexical_declaration" | "variable_declaration" => {
                let mut cursor = declaration.walk();
                for declarator in declaration.named_children(&mut cursor) {
                    if declarator.kind() != "variable_declarator" {
                        continue;
                    }
                    let Some(name) = declarator.child_by_field_name("name") else {
                        continue;
                    };
                    for binding in pattern_bindings(name, source) {
                        facts.exports.push(
                            ExportFact::new(binding)
                                .with_local(binding)
                                .at_line(line),
                        );
                    }
                }
            }
            "ambient_declaration" => {
                // export declare const x: T; export declare function f(): void;
                let mut cursor = declaration.walk();
                let inner: Vec<Node> = declaration.named_children(&mut cursor).collect();
                for child in inner {
                    self.extract_declaration_exports(child, source, line, facts);
                }
            }
            "interface_declaration" | "type_alias_declaration" => {
                if let Some(name) = declaration.child_by_field_name("name") {
                    let name = node_text(name, source);
                    facts.exports.push(
                        ExportFact::new(name)
                            .with_local(name)
                            .with_type_only(true)
                            .at_line(line),
                    );
                }
            }
            _ => {
                // functions, generators, classes, enums, namespaces, signatures
                if let Some(name) = declaration.child_by_field_name("name") {
                    let name = node_text(name, source);
                    facts.exports.push(
                        ExportFact::new(name)
                            .with_local(name)
                            .at_line(line),
                    );
                }
            }
        }
    }

    fn extract_dynamic_import(&self, node: Node, source: &str, facts: &mut SourceFacts) {
        let Some(function) = node.child_by_field_name("function") else {
            return;
        };
        let is_loader = match function.kind() {
            "import" => true,
            "identifier" => node_text(function, source) == "require",
            _ => false,
        };
        if !is_loader {
            return;
        }

        let Some(arguments) = node.child_by_field_name("arguments") else {
            return;
        };
        if let Some(first) = arguments.named_child(0).filter(|a| a.kind() == "string") {
            facts.imports.push(
                ImportFact::namespace(unquote(node_text(first, source))).at_line(node_line(node)),
            );
        }
    }
}

/// Exports inside `namespace X {}` or `declare module "m" {}` belong to that block
fn inside_namespace(node: Node) -> bool {
    let mut current = node.parent();
    while let Some(parent) = current {
        if matches!(parent.kind(), "internal_module" | "module") {
            return true;
        }
        current = parent.parent();
    }
    false
}

/// Names bound by a declarator name, including destructuring patterns
fn pattern_bindings<'s>(pattern: Node, source: &'s str) -> Vec<&'s str> {
    if pattern.kind() == "identifier" {
        return vec![node_text(pattern, source)];
    }

    preorder(pattern)
        .filter(|n| {
            matches!(
                n.kind(),
                "identifier" | "shorthand_property_identifier_pattern"
            )
        })
        // `{ a: b }` binds b, not the key a
        .filter(|n| {
            n.parent()
                .and_then(|p| {
                    (p.kind() == "pair_pattern")
                        .then(|| p.child_by_field_name("key"))
                        .flatten()
                })
                .map_or(true, |key| key.id() != n.id())
        })
        // `{ a = 1 }` defaults are expressions, keep only the left side
        .filter(|n| {
            !n.parent().is_some_and(|p| {
                matches!(p.kind(), "assignment_pattern" | "object_assignment_pattern")
                    && p.child_by_field_name("right").map(|r| r.id()) == Some(n.id())
            })
        })
        .map(|n| node_text(n, source))
        .collect()
}

impl FactExtractor for ScriptParser {
    type Facts = SourceFacts;

    fn extract(&self, path: &Path, contents: &str) -> Result<SourceFacts, ExtractError> {
        let dialect = ScriptDialect::from_path(path)
            .ok_or_else(|| ExtractError::Unsupported(path.to_path_buf()))?;
        self.parse_source(path, contents, dialect)
    }
}

impl Default for ScriptParser {
    fn default() -> Self {
        Self::new()
    }
}
