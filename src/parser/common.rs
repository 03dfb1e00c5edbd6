use std::path::{Path, PathBuf};
use thiserror::Error;
use tree_sitter::{Node, TreeCursor};

/// Errors raised while turning file contents into facts
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to load grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),
    #[error("Parser produced no syntax tree for {0}")]
    NoTree(PathBuf),
    #[error("Unsupported file type: {0}")]
    Unsupported(PathBuf),
}

/// Trait for file-type specific fact extractors
///
/// Implementations must tolerate syntax errors and return whatever facts
/// they could recover.
pub trait FactExtractor {
    type Facts;

    fn extract(&self, path: &Path, contents: &str) -> Result<Self::Facts, ExtractError>;
}

/// Extract text from a node
pub fn node_text<'a>(node: Node<'_>, source: &'a str) -> &'a str {
    &source[node.start_byte()..node.end_byte()]
}

/// 1-based line of a node
pub fn node_line(node: Node<'_>) -> usize {
    node.start_position().row + 1
}

/// Whether `node` has a direct, possibly anonymous, child of `kind`
pub fn has_child_kind(node: Node<'_>, kind: &str) -> bool {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).any(|child| child.kind() == kind);
    found
}

/// First direct named child of `kind`
pub fn named_child_of_kind<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    let found = node.named_children(&mut cursor).find(|child| child.kind() == kind);
    found
}

/// Text of a string literal node without its quotes
pub fn unquote(raw: &str) -> &str {
    let bytes = raw.as_bytes();
    if bytes.len() >= 2 {
        let first = bytes[0];
        let last = bytes[bytes.len() - 1];
        if (first == b'"' || first == b'\'' || first == b'`') && first == last {
            return &raw[1..raw.len() - 1];
        }
    }
    raw
}

/// Pre-order iterator over a subtree driven by a single tree cursor
///
/// No recursion, so deeply nested expressions cannot exhaust the stack.
pub fn preorder(node: Node<'_>) -> Preorder<'_> {
    Preorder {
        cursor: node.walk(),
        done: false,
    }
}

pub struct Preorder<'t> {
    cursor: TreeCursor<'t>,
    done: bool,
}

impl<'t> Iterator for Preorder<'t> {
    type Item = Node<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let current = self.cursor.node();

        if self.cursor.goto_first_child() {
            return Some(current);
        }

        loop {
            if self.cursor.goto_next_sibling() {
                return Some(current);
            }
            if !self.cursor.goto_parent() {
                self.done = true;
                return Some(current);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unquote() {
        assert_eq!(unquote("\"./utils\""), "./utils");
        assert_eq!(unquote("'foo bar'"), "foo bar");
        assert_eq!(unquote("`tpl`"), "tpl");
        assert_eq!(unquote("\"mismatched'"), "\"mismatched'");
        assert_eq!(unquote("\""), "\"");
    }
}
