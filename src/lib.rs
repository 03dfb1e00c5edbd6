//! deadcode-linter - dead code detection for JavaScript/TypeScript projects
//!
//! Finds files no entry point can reach, exports nothing imports, and style
//! classes no reachable source mentions.
//!
//! # Architecture
//!
//! The pipeline consists of:
//! 1. **File Discovery** - Find script (`.js`, `.ts`, ...) and style (`.css`, `.scss`, `.less`) files
//! 2. **Fact Extraction** - Parse files with tree-sitter into import/export/literal facts
//! 3. **Graph Building** - One node per file, edges from resolved imports
//! 4. **Entry Point Detection** - Match files against entry globs and `package.json`
//! 5. **Reachability Sweep** - Breadth-first walk tracking which exports are used
//! 6. **Reporting** - Terminal, JSON or SARIF output

pub mod analysis;
pub mod baseline;
pub mod config;
pub mod discovery;
pub mod graph;
pub mod parser;
pub mod refactor;
pub mod report;
pub mod scan;
pub mod watch;

pub use analysis::{find_dead_code, Confidence, DeadCode, DeadCodeIssue, DeadCodeReport, EntryPointDetector, ReachabilityAnalyzer};
pub use config::Config;
pub use discovery::FileFinder;
pub use graph::{FileId, Graph, GraphBuilder};
pub use refactor::SafeDeleter;
pub use report::{ReportFormat, Reporter};
pub use scan::{run_scan, ScanOptions, ScanOutcome};
