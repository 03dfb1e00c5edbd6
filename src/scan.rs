//! One full scan: discovery, ingestion, resolution, entry selection, sweep
//! and finding assembly.

use crate::analysis::{find_dead_code, DeadCode, DeadCodeReport, EntryPointDetector, FindingFilter, Reachability};
use crate::config::Config;
use crate::discovery::{FileFinder, FileStats};
use crate::graph::{
    FileId, Graph, GraphBuilder, ImportResolver, OxcModuleResolver, ParallelGraphBuilder,
    ResolutionStats, SkippedFile,
};
use indicatif::{ProgressBar, ProgressStyle};
use miette::{IntoDiagnostic, Result, WrapErr};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::info;

/// How to run a scan
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanOptions {
    /// Parse files on the rayon pool
    pub parallel: bool,
    /// Show a progress bar while parsing sequentially
    pub progress: bool,
}

/// Everything a scan produced
pub struct ScanOutcome {
    /// Canonical project root; all reported paths are relative to it
    pub root: PathBuf,
    pub stats: FileStats,
    pub graph: Graph,
    pub entries: BTreeSet<FileId>,
    pub resolution: ResolutionStats,
    pub reachability: Reachability,
    pub report: DeadCodeReport,
    /// Findings after detection toggles and retain patterns
    pub findings: Vec<DeadCode>,
    pub skipped: Vec<SkippedFile>,
    pub parse_time: Duration,
}

/// Scan the project at `path`
pub fn run_scan(config: &Config, path: &Path, options: ScanOptions) -> Result<ScanOutcome> {
    // One spelling per file, so node identities never collide
    let root = std::fs::canonicalize(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("Cannot open project directory {}", path.display()))?;

    info!("Discovering files...");
    let files = FileFinder::new(config).find_files(&root)?;
    let stats = FileStats::from_files(&files);
    info!(
        "Found {} files ({} script, {} style)",
        stats.total(),
        stats.script_files,
        stats.style_files
    );

    let parse_start = Instant::now();
    let (mut graph, skipped) = if options.parallel {
        ParallelGraphBuilder::new()
            .with_dynamic_imports(config.detection.dynamic_imports)
            .with_style_ids(config.detection.style_ids)
            .build_from_files(&files)
    } else {
        let pb = if options.progress {
            ProgressBar::new(files.len() as u64)
        } else {
            ProgressBar::hidden()
        };
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
                .into_diagnostic()?
                .progress_chars("#>-"),
        );

        info!("Parsing files...");
        let mut builder = GraphBuilder::new()
            .with_dynamic_imports(config.detection.dynamic_imports)
            .with_style_ids(config.detection.style_ids);
        for file in &files {
            builder.process_file(file);
            pb.inc(1);
        }
        pb.finish_and_clear();
        builder.finish()
    };
    let parse_time = parse_start.elapsed();

    info!("Resolving imports...");
    let resolver = OxcModuleResolver::new(&root);
    let resolution = ImportResolver::new(&resolver).resolve(&mut graph);
    info!("Imports: {}", resolution);

    let entries = EntryPointDetector::from_config(config, &root).detect(&graph);

    info!("Running reachability sweep...");
    let (report, reachability) = find_dead_code(&graph, &entries);
    info!(
        "Reachability: {} of {} files reachable",
        reachability.reachable().len(),
        graph.file_count()
    );

    let retain = config.retain_set();
    let findings: Vec<DeadCode> = report
        .to_findings(FindingFilter::from(&config.detection))
        .into_iter()
        .filter(|dc| !retain.matches_path(dc.file.path(), &root))
        .collect();

    Ok(ScanOutcome {
        root,
        stats,
        graph,
        entries,
        resolution,
        reachability,
        report,
        findings,
        skipped,
        parse_time,
    })
}
