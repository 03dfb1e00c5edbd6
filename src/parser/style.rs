use super::common::{node_line, node_text, preorder, ExtractError, FactExtractor};
use crate::graph::StyleFacts;
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;
use tracing::debug;
use tree_sitter::Parser as TsParser;

/// Style sheet fact extractor
///
/// Plain CSS goes through tree-sitter-css. SCSS and Less nest rules and
/// interpolate selectors in ways the CSS grammar rejects, so they are scanned
/// for selector preludes instead.
#[derive(Debug, Clone, Default)]
pub struct StyleParser;

impl StyleParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse plain CSS
    pub fn parse_css(&self, path: &Path, contents: &str) -> Result<StyleFacts, ExtractError> {
        let mut parser = TsParser::new();
        parser.set_language(&tree_sitter_css::LANGUAGE.into())?;

        let tree = parser
            .parse(contents, None)
            .ok_or_else(|| ExtractError::NoTree(path.to_path_buf()))?;
        let root = tree.root_node();

        // The grammar has no identifier escapes (`.sm\:flex`), and error
        // recovery can swallow whole rules; the prelude scanner handles both
        if root.has_error() || contents.contains('\\') {
            debug!("Scanning {} without the CSS grammar", path.display());
            return Ok(self.parse_preprocessed(contents));
        }

        let mut facts = StyleFacts::default();
        for node in preorder(root) {
            // pseudo-class names are `class_name` nodes too
            let parent = node.parent().map(|p| p.kind());
            let target = match (node.kind(), parent) {
                ("class_name", Some("class_selector")) => &mut facts.classes,
                ("id_name", Some("id_selector")) => &mut facts.ids,
                _ => continue,
            };
            let name = unescape(node_text(node, contents));
            if !name.is_empty() {
                target.entry(name).or_insert_with(|| node_line(node));
            }
        }

        Ok(facts)
    }

    /// Scan SCSS / Less selector preludes
    pub fn parse_preprocessed(&self, contents: &str) -> StyleFacts {
        let cleaned = blank_out_non_selectors(contents);
        let cleaned = interpolation_regex().replace_all(&cleaned, |caps: &regex::Captures| {
            " ".repeat(caps[0].len())
        });

        let mut facts = StyleFacts::default();
        let mut prelude_start = 0;
        for (offset, ch) in cleaned.char_indices() {
            match ch {
                '{' => {
                    let prelude = &cleaned[prelude_start..offset];
                    if !prelude.trim_start().starts_with('@') {
                        let base_line = cleaned[..prelude_start].matches('\n').count() + 1;
                        collect_selectors(prelude, base_line, &mut facts);
                    }
                    prelude_start = offset + 1;
                }
                ';' | '}' => prelude_start = offset + 1,
                _ => {}
            }
        }

        facts
    }
}

impl FactExtractor for StyleParser {
    type Facts = StyleFacts;

    fn extract(&self, path: &Path, contents: &str) -> Result<StyleFacts, ExtractError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("css") => self.parse_css(path, contents),
            Some("scss") | Some("less") => Ok(self.parse_preprocessed(contents)),
            _ => Err(ExtractError::Unsupported(path.to_path_buf())),
        }
    }
}

fn collect_selectors(prelude: &str, base_line: usize, facts: &mut StyleFacts) {
    for (regex, target) in [
        (class_regex(), &mut facts.classes),
        (id_regex(), &mut facts.ids),
    ] {
        for caps in regex.captures_iter(prelude) {
            let Some(m) = caps.get(1) else { continue };
            let line = base_line + prelude[..m.start()].matches('\n').count();
            target.entry(unescape(m.as_str())).or_insert(line);
        }
    }
}

fn class_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\.(-?[A-Za-z_][\w\-]*(?:\\.[\w\-]*)*)")
            .expect("valid class regex")
    })
}

fn id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"#(-?[A-Za-z_][\w\-]*)").expect("valid id regex")
    })
}

fn interpolation_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // #{$var} in SCSS, @{var} in Less
    RE.get_or_init(|| Regex::new(r"[#@]\{[^}]*\}").expect("valid interpolation regex"))
}

/// Replace comments, string contents and attribute selectors with spaces,
/// keeping newlines so offsets map to lines
fn blank_out_non_selectors(contents: &str) -> String {
    let blank = |c: char| if c == '\n' { '\n' } else { ' ' };

    let mut out = String::with_capacity(contents.len());
    let mut chars = contents.chars().peekable();
    let mut quote: Option<char> = None;
    let mut brackets = 0usize;

    while let Some(ch) = chars.next() {
        if let Some(q) = quote {
            if ch == '\\' {
                out.push(' ');
                if let Some(escaped) = chars.next() {
                    out.push(blank(escaped));
                }
            } else if ch == q {
                quote = None;
                out.push(if brackets > 0 { ' ' } else { ch });
            } else {
                out.push(blank(ch));
            }
            continue;
        }

        if brackets > 0 {
            match ch {
                '"' | '\'' => quote = Some(ch),
                '[' => brackets += 1,
                ']' => brackets -= 1,
                _ => {}
            }
            out.push(if brackets == 0 { ch } else { blank(ch) });
            continue;
        }

        match (ch, chars.peek().copied()) {
            ('"' | '\'', _) => {
                quote = Some(ch);
                out.push(ch);
            }
            ('[', _) => {
                brackets = 1;
                out.push(ch);
            }
            ('/', Some('*')) => {
                chars.next();
                out.push_str("  ");
                let mut prev = '\0';
                for c in chars.by_ref() {
                    out.push(blank(c));
                    if prev == '*' && c == '/' {
                        break;
                    }
                    prev = c;
                }
            }
            // `//` line comments, but not the `//` inside `url(http://...)`
            ('/', Some('/')) if !out.ends_with(':') => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        out.push('\n');
                        break;
                    }
                    out.push(' ');
                }
            }
            _ => out.push(ch),
        }
    }

    out
}

/// Resolve CSS escapes: `\:` becomes `:` and `\31 ` becomes `1`
pub fn unescape(raw: &str) -> String {
    if !raw.contains('\\') {
        return raw.to_string();
    }

    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }

        let mut hex = String::new();
        while hex.len() < 6 {
            match chars.peek() {
                Some(c) if c.is_ascii_hexdigit() => {
                    hex.push(*c);
                    chars.next();
                }
                _ => break,
            }
        }

        if hex.is_empty() {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
            continue;
        }

        // a single whitespace terminates a hex escape
        if chars.peek().is_some_and(|c| c.is_whitespace()) {
            chars.next();
        }
        let decoded = u32::from_str_radix(&hex, 16)
            .ok()
            .and_then(char::from_u32)
            .unwrap_or(char::REPLACEMENT_CHARACTER);
        out.push(decoded);
    }
    out
}
