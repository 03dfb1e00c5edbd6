use super::{DeadStyle, Reachability};
use crate::graph::Graph;
use std::collections::HashSet;
use tracing::debug;

/// Every literal string of reachable code, plus the whitespace-separated
/// tokens of literals that contain whitespace
#[derive(Debug, Default)]
pub struct LiteralPool<'g> {
    strings: HashSet<&'g str>,
}

impl<'g> LiteralPool<'g> {
    pub fn from_reachable(graph: &'g Graph, reachability: &Reachability) -> Self {
        let mut strings = HashSet::new();
        for node in graph
            .code_files()
            .filter(|node| reachability.is_reachable(&node.id))
        {
            for literal in &node.literal_strings {
                strings.insert(literal.as_str());
                if literal.contains(char::is_whitespace) {
                    strings.extend(literal.split_whitespace());
                }
            }
        }
        Self { strings }
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.strings.contains(identifier)
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

/// Matches style identifiers against literal strings of reachable code
///
/// Matching is textual: a class counts as used when its exact name appears
/// as a whole literal or as one token of a literal.
pub struct StyleUsageAnalyzer;

impl StyleUsageAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Unused identifiers of every style file, sorted by file then name
    pub fn find_dead_styles(&self, graph: &Graph, reachability: &Reachability) -> Vec<DeadStyle> {
        let pool = LiteralPool::from_reachable(graph, reachability);
        debug!("Literal pool holds {} strings", pool.len());

        let mut sheets: Vec<_> = graph.style_files().collect();
        sheets.sort_by(|a, b| a.id.cmp(&b.id));

        let mut dead = Vec::new();
        for sheet in sheets {
            let file_reachable = reachability.is_reachable(&sheet.id);
            for (name, line) in &sheet.style_identifiers {
                if file_reachable && pool.contains(name) {
                    continue;
                }
                dead.push(DeadStyle {
                    file: sheet.id.clone(),
                    class_name: name.clone(),
                    line: *line,
                    file_reachable,
                });
            }
        }
        dead
    }
}

impl Default for StyleUsageAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
