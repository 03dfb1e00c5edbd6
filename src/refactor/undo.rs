use miette::{IntoDiagnostic, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

const HEREDOC_MARKER: &str = "DEADCODE_LINTER_EOF";

/// Generates a bash script that recreates deleted files
pub struct UndoScript {
    /// Original file contents before deletion
    file_states: BTreeMap<PathBuf, String>,
}

impl UndoScript {
    pub fn new() -> Self {
        Self {
            file_states: BTreeMap::new(),
        }
    }

    /// Record the state of a file before deletion; the first record wins
    pub fn record_file_state(&mut self, path: &Path, contents: &str) {
        self.file_states
            .entry(path.to_path_buf())
            .or_insert_with(|| contents.to_string());
    }

    pub fn render(&self) -> String {
        let mut script = String::new();

        script.push_str("#!/bin/bash\n");
        script.push_str("# deadcode-linter undo script\n");
        script.push_str("# Run to restore files deleted by `deadcode-linter prune`\n\n");
        script.push_str("set -e\n\n");
        script.push_str("echo 'Restoring deleted files...'\n\n");

        for (file_path, contents) in &self.file_states {
            let quoted = shell_quote(&file_path.display().to_string());

            script.push_str(&format!("# Restore {}\n", file_path.display()));
            script.push_str(&format!("mkdir -p \"$(dirname {})\"\n", quoted));
            // Quoted heredoc: contents are written verbatim
            script.push_str(&format!("cat > {} << '{}'\n", quoted, HEREDOC_MARKER));
            script.push_str(contents);
            if !contents.ends_with('\n') {
                script.push('\n');
            }
            script.push_str(HEREDOC_MARKER);
            script.push('\n');
            script.push_str(&format!("echo '  Restored: '{}\n\n", quoted));
        }

        script.push_str("echo 'Done! All files restored.'\n");
        script
    }

    /// Write the undo script to a file
    pub fn write(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.render()).into_diagnostic()?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(path).into_diagnostic()?.permissions();
            perms.set_mode(0o755);
            std::fs::set_permissions(path, perms).into_diagnostic()?;
        }

        Ok(())
    }

    /// Get the number of files recorded
    pub fn file_count(&self) -> usize {
        self.file_states.len()
    }
}

impl Default for UndoScript {
    fn default() -> Self {
        Self::new()
    }
}

fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "'\\''"))
}
