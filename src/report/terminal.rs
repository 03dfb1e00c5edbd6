use crate::analysis::{Confidence, DeadCode, DeadCodeIssue, Severity};
use colored::Colorize;
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Terminal reporter with colored output
///
/// Findings are printed in three sections (dead files, unused exports,
/// unused style classes), the last two grouped by file.
pub struct TerminalReporter {
    base: PathBuf,
    /// Show confidence markers in output
    show_confidence: bool,
}

impl TerminalReporter {
    pub fn new(base: &Path) -> Self {
        Self {
            base: base.to_path_buf(),
            show_confidence: true,
        }
    }

    pub fn with_confidence(mut self, show: bool) -> Self {
        self.show_confidence = show;
        self
    }

    pub fn write_report<W: Write>(&self, findings: &[DeadCode], out: &mut W) -> io::Result<()> {
        let by_issue = |issue: DeadCodeIssue| -> Vec<&DeadCode> {
            findings.iter().filter(|f| f.issue == issue).collect()
        };

        let dead_files = by_issue(DeadCodeIssue::DeadFile);
        if dead_files.is_empty() {
            writeln!(out, "{}", "\n--- No Dead Files Found ---".green())?;
        } else {
            writeln!(out, "{}", "\n--- Dead Files (Unreachable) ---".red().bold())?;
            for item in dead_files {
                writeln!(
                    out,
                    "{}{}",
                    self.confidence_badge(item),
                    item.file.relative_to(&self.base)
                )?;
            }
        }

        self.write_grouped(
            out,
            by_issue(DeadCodeIssue::UnusedExport),
            "\n--- Unused Exports (in reachable files) ---".yellow().bold(),
            "\n--- No Unused Exports Found ---",
        )?;
        self.write_grouped(
            out,
            by_issue(DeadCodeIssue::UnusedStyleClass),
            "\n--- Unused CSS Classes ---".cyan().bold(),
            "\n--- No Unused CSS Classes Found ---",
        )?;

        writeln!(out)?;
        self.write_summary(out, findings)
    }

    fn write_grouped<W: Write>(
        &self,
        out: &mut W,
        items: Vec<&DeadCode>,
        header: colored::ColoredString,
        empty: &str,
    ) -> io::Result<()> {
        if items.is_empty() {
            return writeln!(out, "{}", empty.green());
        }

        writeln!(out, "{}", header)?;
        let mut by_file: BTreeMap<String, Vec<&DeadCode>> = BTreeMap::new();
        for item in items {
            by_file
                .entry(item.file.relative_to(&self.base))
                .or_default()
                .push(item);
        }

        for (file, items) in by_file {
            writeln!(out, "{}", format!("{}:", file).bold())?;
            for item in items {
                let location = if item.line > 0 {
                    format!(" {}", format!("(line {})", item.line).dimmed())
                } else {
                    String::new()
                };
                writeln!(
                    out,
                    "  - {}{}{}",
                    self.confidence_badge(item),
                    item.display_name().red(),
                    location
                )?;
            }
        }
        Ok(())
    }

    fn confidence_badge(&self, item: &DeadCode) -> String {
        if !self.show_confidence {
            return String::new();
        }
        let marker = match item.confidence {
            Confidence::High => "◉".bright_green(),
            Confidence::Medium => "○".yellow(),
            Confidence::Low => "◌".red(),
        };
        format!("{} ", marker)
    }

    fn write_summary<W: Write>(&self, out: &mut W, findings: &[DeadCode]) -> io::Result<()> {
        if findings.is_empty() {
            return writeln!(out, "{}", "No dead code found!".green().bold());
        }

        let mut warnings = 0;
        let mut infos = 0;
        let mut errors = 0;
        let mut high = 0;
        let mut medium = 0;
        let mut low = 0;

        for item in findings {
            match item.severity {
                Severity::Error => errors += 1,
                Severity::Warning => warnings += 1,
                Severity::Info => infos += 1,
            }
            match item.confidence {
                Confidence::High => high += 1,
                Confidence::Medium => medium += 1,
                Confidence::Low => low += 1,
            }
        }

        writeln!(out, "{}", "─".repeat(60).dimmed())?;

        let mut severity_parts = Vec::new();
        if errors > 0 {
            severity_parts.push(format!("{} errors", errors).red().to_string());
        }
        if warnings > 0 {
            severity_parts.push(format!("{} warnings", warnings).yellow().to_string());
        }
        if infos > 0 {
            severity_parts.push(format!("{} info", infos).blue().to_string());
        }
        writeln!(
            out,
            "Found {} issues: {}",
            findings.len(),
            severity_parts.join(", ")
        )?;

        if self.show_confidence {
            writeln!(out)?;
            writeln!(out, "{}", "By Confidence:".dimmed())?;
            if high > 0 {
                writeln!(out, "  {} {}", "◉".bright_green(), format!("{} high", high).bright_green())?;
            }
            if medium > 0 {
                writeln!(out, "  {} {}", "○".yellow(), format!("{} medium", medium).yellow())?;
            }
            if low > 0 {
                writeln!(out, "  {} {}", "◌".red(), format!("{} low", low).red())?;
            }
        }

        writeln!(out)?;
        if low > 0 {
            writeln!(
                out,
                "{}",
                "⚠ Low confidence classes may be built at runtime (template strings, lookups)"
                    .yellow()
            )?;
        }
        writeln!(
            out,
            "{}",
            "Tip: Run `deadcode-linter prune` to delete dead files".dimmed()
        )?;
        writeln!(
            out,
            "{}",
            "Tip: Use --min-confidence high to filter low confidence results".dimmed()
        )
    }
}
