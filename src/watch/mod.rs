//! Watch mode
//!
//! Monitors the project for source changes and re-runs the scan after each
//! debounced batch of relevant events.

use colored::Colorize;
use notify::RecursiveMode;
use notify_debouncer_mini::{new_debouncer, DebouncedEventKind};
use std::path::Path;
use std::sync::mpsc::channel;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Watch mode errors
#[derive(Error, Debug)]
pub enum WatchError {
    #[error("Failed to create file watcher: {0}")]
    WatcherError(#[from] notify::Error),
    #[error("Failed to receive events: {0}")]
    RecvError(#[from] std::sync::mpsc::RecvError),
}

const WATCHED_EXTENSIONS: &[&str] = &[
    "js", "jsx", "mjs", "cjs", "ts", "mts", "cts", "tsx", "css", "scss", "less",
];

/// Files outside the scanned extensions that still change the result
const WATCHED_FILES: &[&str] = &[
    "package.json",
    ".deadcode.yml",
    ".deadcode.yaml",
    ".deadcode.toml",
    "deadcode.yml",
    "deadcode.yaml",
    "deadcode.toml",
];

const SKIPPED_DIRS: &[&str] = &["node_modules", "dist", "build", ".git"];

/// File watcher for continuous analysis
pub struct FileWatcher {
    /// Debounce duration in milliseconds
    debounce_ms: u64,
}

impl FileWatcher {
    pub fn new() -> Self {
        Self { debounce_ms: 500 }
    }

    pub fn with_debounce_ms(mut self, ms: u64) -> Self {
        self.debounce_ms = ms;
        self
    }

    /// Check if a path should trigger a rescan
    pub fn should_trigger(&self, path: &Path) -> bool {
        let skipped = path.components().any(|c| {
            c.as_os_str()
                .to_str()
                .is_some_and(|name| SKIPPED_DIRS.contains(&name))
        });
        if skipped {
            return false;
        }

        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if WATCHED_FILES.contains(&name) {
                return true;
            }
        }

        path.extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .is_some_and(|ext| WATCHED_EXTENSIONS.contains(&ext.as_str()))
    }

    /// Watch `path` recursively, calling `on_change` once up front and after
    /// every relevant batch of changes. Returning `false` stops watching.
    pub fn watch<F>(&self, path: &Path, mut on_change: F) -> Result<(), WatchError>
    where
        F: FnMut() -> bool,
    {
        let (tx, rx) = channel();

        let mut debouncer = new_debouncer(Duration::from_millis(self.debounce_ms), tx)?;
        debouncer.watcher().watch(path, RecursiveMode::Recursive)?;

        println!();
        println!("{}", "👁  Watch mode active. Press Ctrl+C to stop.".cyan().bold());
        println!("{}", format!("   Watching: {}", path.display()).dimmed());
        println!();

        if !on_change() {
            return Ok(());
        }

        loop {
            match rx.recv()? {
                Ok(events) => {
                    let relevant: Vec<_> = events
                        .iter()
                        .filter(|e| {
                            matches!(
                                e.kind,
                                DebouncedEventKind::Any | DebouncedEventKind::AnyContinuous
                            ) && self.should_trigger(&e.path)
                        })
                        .collect();

                    if relevant.is_empty() {
                        debug!("Ignoring {} irrelevant events", events.len());
                        continue;
                    }

                    println!();
                    println!(
                        "{}",
                        format!(
                            "🔄 Changes detected in {} file(s), rescanning...",
                            relevant.len()
                        )
                        .yellow()
                    );
                    for event in relevant.iter().take(5) {
                        if let Some(name) = event.path.file_name() {
                            println!("   • {}", name.to_string_lossy().dimmed());
                        }
                    }
                    if relevant.len() > 5 {
                        println!("   • ... and {} more", relevant.len() - 5);
                    }
                    println!();

                    if !on_change() {
                        break;
                    }
                }
                Err(e) => {
                    eprintln!("{}: {:?}", "Watch error".red(), e);
                }
            }
        }

        Ok(())
    }
}

impl Default for FileWatcher {
    fn default() -> Self {
        Self::new()
    }
}
