use crate::analysis::{DeadCode, DeadCodeIssue};
use crate::refactor::undo::UndoScript;
use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, Confirm, MultiSelect};
use miette::{IntoDiagnostic, Result};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Deletes dead files with user confirmation
pub struct SafeDeleter {
    interactive: bool,
    dry_run: bool,
    force: bool,
    undo_script_path: Option<PathBuf>,
    base: PathBuf,
}

/// Outcome of a prune run
#[derive(Debug, Default)]
pub struct DeleteSummary {
    pub deleted: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, String)>,
}

impl DeleteSummary {
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

impl SafeDeleter {
    pub fn new(base: &Path) -> Self {
        Self {
            interactive: false,
            dry_run: false,
            force: false,
            undo_script_path: None,
            base: base.to_path_buf(),
        }
    }

    /// Pick files one by one instead of confirming the whole batch
    pub fn with_interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Skip confirmation
    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn with_undo_script(mut self, path: Option<PathBuf>) -> Self {
        self.undo_script_path = path;
        self
    }

    /// Delete the dead files among `findings`
    ///
    /// Other finding kinds are ignored. A file that cannot be removed is
    /// reported and the remaining files are still processed.
    pub fn delete(&self, findings: &[DeadCode]) -> Result<DeleteSummary> {
        let mut files: Vec<&Path> = findings
            .iter()
            .filter(|dc| dc.issue == DeadCodeIssue::DeadFile)
            .map(|dc| dc.file.path())
            .collect();
        files.sort();
        files.dedup();

        if files.is_empty() {
            println!("{}", "No dead files to delete.".green());
            return Ok(DeleteSummary::default());
        }

        println!("{}", "\n--- Files to be deleted ---".red().bold());
        for file in &files {
            println!("{}", self.display(file));
        }

        if self.dry_run {
            println!();
            println!(
                "{}",
                format!("Dry run - {} files would be deleted", files.len()).dimmed()
            );
            return Ok(DeleteSummary::default());
        }

        let selected = if self.interactive {
            self.interactive_select(&files)?
        } else if self.force {
            files
        } else {
            self.batch_confirm(files)?
        };

        if selected.is_empty() {
            println!("{}", "Deletion cancelled.".yellow());
            return Ok(DeleteSummary::default());
        }

        self.remove_files(&selected)
    }

    fn interactive_select<'a>(&self, files: &[&'a Path]) -> Result<Vec<&'a Path>> {
        let items: Vec<String> = files.iter().map(|f| self.display(f)).collect();

        println!();
        println!("{}", "Select files to delete:".cyan().bold());
        println!("{}", "(Space to toggle, Enter to confirm)".dimmed());

        let selections = MultiSelect::with_theme(&ColorfulTheme::default())
            .items(&items)
            .interact()
            .into_diagnostic()?;

        Ok(selections.into_iter().map(|i| files[i]).collect())
    }

    fn batch_confirm<'a>(&self, files: Vec<&'a Path>) -> Result<Vec<&'a Path>> {
        println!();
        let confirm = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Delete these {} files?", files.len()))
            .default(false)
            .interact()
            .into_diagnostic()?;

        Ok(if confirm { files } else { Vec::new() })
    }

    fn remove_files(&self, files: &[&Path]) -> Result<DeleteSummary> {
        let mut undo_script = self.undo_script_path.as_ref().map(|_| UndoScript::new());
        let mut summary = DeleteSummary::default();

        println!();
        println!("{}", "Deleting dead files...".cyan().bold());

        for &file in files {
            if let Some(script) = undo_script.as_mut() {
                match std::fs::read_to_string(file) {
                    Ok(contents) => script.record_file_state(file, &contents),
                    Err(e) => warn!("Cannot record {} for undo: {}", file.display(), e),
                }
            }

            match std::fs::remove_file(file) {
                Ok(()) => {
                    println!("  {} Deleted {}", "✓".green(), self.display(file));
                    summary.deleted.push(file.to_path_buf());
                }
                Err(e) => {
                    println!(
                        "  {} Failed to delete {}: {}",
                        "✗".red(),
                        self.display(file),
                        e
                    );
                    summary.failed.push((file.to_path_buf(), e.to_string()));
                }
            }
        }

        if let (Some(script), Some(path)) = (undo_script, &self.undo_script_path) {
            script.write(path)?;
            println!();
            println!("{} Undo script saved to: {}", "→".dimmed(), path.display());
        }

        println!();
        println!(
            "{}",
            format!(
                "Deleted {} files ({} failed)",
                summary.deleted.len(),
                summary.failed.len()
            )
            .bold()
        );
        Ok(summary)
    }

    fn display(&self, file: &Path) -> String {
        file.strip_prefix(&self.base)
            .unwrap_or(file)
            .to_string_lossy()
            .replace('\\', "/")
    }
}
