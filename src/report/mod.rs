mod json;
mod sarif;
mod terminal;

pub use json::JsonReporter;
pub use sarif::SarifReporter;
pub use terminal::TerminalReporter;

use crate::analysis::DeadCode;
use miette::{IntoDiagnostic, Result};
use std::path::{Path, PathBuf};

/// Output format for reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Terminal,
    Json,
    Sarif,
}

impl ReportFormat {
    /// Parse the `report.format` config value
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "terminal" | "text" => Some(ReportFormat::Terminal),
            "json" => Some(ReportFormat::Json),
            "sarif" => Some(ReportFormat::Sarif),
            _ => None,
        }
    }
}

/// Reporter for outputting dead code analysis results
pub struct Reporter {
    format: ReportFormat,
    output_path: Option<PathBuf>,
    /// Paths are shown relative to this directory
    base: PathBuf,
}

impl Reporter {
    pub fn new(format: ReportFormat, output_path: Option<PathBuf>) -> Self {
        Self {
            format,
            output_path,
            base: PathBuf::new(),
        }
    }

    pub fn with_base(mut self, base: &Path) -> Self {
        self.base = base.to_path_buf();
        self
    }

    /// Report the dead code findings
    pub fn report(&self, findings: &[DeadCode]) -> Result<()> {
        match self.format {
            ReportFormat::Terminal => {
                let reporter = TerminalReporter::new(&self.base);
                let mut stdout = std::io::stdout().lock();
                reporter.write_report(findings, &mut stdout).into_diagnostic()
            }
            ReportFormat::Json => {
                let reporter = JsonReporter::new(self.output_path.clone(), &self.base);
                reporter.report(findings)
            }
            ReportFormat::Sarif => {
                let reporter = SarifReporter::new(self.output_path.clone(), &self.base);
                reporter.report(findings)
            }
        }
    }
}

/// Write serialized output to a file, or print it
fn emit(output_path: Option<&Path>, contents: &str, label: &str) -> Result<()> {
    if let Some(path) = output_path {
        std::fs::write(path, contents).into_diagnostic()?;
        println!("{} written to: {}", label, path.display());
    } else {
        println!("{}", contents);
    }
    Ok(())
}
