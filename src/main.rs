use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use miette::Result;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};

use deadcode_linter::analysis::{Confidence, CycleDetector, DeadCodeIssue};
use deadcode_linter::baseline::Baseline;
use deadcode_linter::config::Config;
use deadcode_linter::refactor::SafeDeleter;
use deadcode_linter::report::{ReportFormat, Reporter};
use deadcode_linter::scan::{run_scan, ScanOptions, ScanOutcome};
use deadcode_linter::watch::FileWatcher;

/// deadcode-linter - find dead files, unused exports and unused CSS classes
#[derive(Parser, Debug)]
#[command(name = "deadcode-linter")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    scan: ScanArgs,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Report dead code (default)
    Scan(ScanArgs),
    /// Delete dead files
    Prune(PruneArgs),
}

#[derive(Args, Debug, Clone)]
struct ScanArgs {
    /// Path to the project directory to analyze
    #[arg(short, long, default_value = ".")]
    path: PathBuf,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Target directories to analyze, relative to the project (repeatable)
    #[arg(short, long)]
    target: Vec<PathBuf>,

    /// Entry point globs, replacing the configured ones (repeatable)
    #[arg(long)]
    entry: Vec<String>,

    /// Patterns to exclude (repeatable)
    #[arg(short, long)]
    exclude: Vec<String>,

    /// Patterns to retain - never report as dead (repeatable)
    #[arg(short, long)]
    retain: Vec<String>,

    /// Output format [default: report.format from config, else terminal]
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Output file (for json/sarif formats)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Parse files in parallel
    #[arg(long)]
    parallel: bool,

    /// Minimum confidence level to report (low, medium, high)
    #[arg(long, default_value = "low")]
    min_confidence: String,

    /// Report closed import cycles among dead files
    #[arg(long)]
    detect_cycles: bool,

    /// Baseline file; only findings missing from it are reported
    #[arg(long, value_name = "FILE")]
    baseline: Option<PathBuf>,

    /// Write the current findings to a baseline file
    #[arg(long, value_name = "FILE")]
    generate_baseline: Option<PathBuf>,

    /// Watch mode - rescan whenever sources change
    #[arg(long)]
    watch: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode - only output results
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Args, Debug, Clone)]
struct PruneArgs {
    #[command(flatten)]
    scan: ScanArgs,

    /// Delete without asking for confirmation
    #[arg(short, long)]
    force: bool,

    /// Choose the files to delete one by one
    #[arg(long)]
    interactive: bool,

    /// Show what would be deleted without making changes
    #[arg(long)]
    dry_run: bool,

    /// Write a bash script that restores the deleted files
    #[arg(long, value_name = "FILE")]
    undo_script: Option<PathBuf>,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum OutputFormat {
    Terminal,
    Json,
    Sarif,
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Terminal => ReportFormat::Terminal,
            OutputFormat::Json => ReportFormat::Json,
            OutputFormat::Sarif => ReportFormat::Sarif,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let command = cli.command.unwrap_or(Command::Scan(cli.scan));
    let args = match &command {
        Command::Scan(args) => args,
        Command::Prune(prune) => &prune.scan,
    };

    init_logging(args.verbose, args.quiet);
    info!("deadcode-linter v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(args)?;

    match &command {
        Command::Scan(args) if args.watch => run_watch_mode(config, args.clone()),
        Command::Scan(args) => run_scan_command(&config, args),
        Command::Prune(prune) => run_prune_command(&config, prune),
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(args: &ScanArgs) -> Result<Config> {
    let mut config = if let Some(config_path) = &args.config {
        Config::from_file(config_path)?
    } else {
        Config::from_default_locations(&args.path)?
    };

    // Override with CLI arguments
    if !args.target.is_empty() {
        config.targets = args.target.clone();
    }
    if !args.entry.is_empty() {
        config.entry = args.entry.clone();
    }
    if !args.exclude.is_empty() {
        config.exclude.extend(args.exclude.clone());
    }
    if !args.retain.is_empty() {
        config.retain_patterns.extend(args.retain.clone());
    }

    Ok(config)
}

fn scan_project(config: &Config, args: &ScanArgs) -> Result<Option<ScanOutcome>> {
    if args.parallel && !args.quiet {
        println!("{}", "⚡ Parallel mode: parsing files on all cores...".cyan());
    }

    let outcome = run_scan(
        config,
        &args.path,
        ScanOptions {
            parallel: args.parallel,
            progress: !args.quiet,
        },
    )?;

    if outcome.stats.total() == 0 {
        if !args.quiet {
            println!("{}", "No JavaScript, TypeScript or style files found.".yellow());
        }
        return Ok(None);
    }

    if args.parallel && !args.quiet {
        println!(
            "{}",
            format!(
                "⚡ Parsed {} files in {:.2}s",
                outcome.stats.total(),
                outcome.parse_time.as_secs_f64()
            )
            .green()
        );
    }

    if !outcome.skipped.is_empty() {
        warn!("{} files could not be parsed and were skipped", outcome.skipped.len());
    }
    if outcome.entries.is_empty() {
        warn!("No entry points matched; every file will be reported dead");
    }

    Ok(Some(outcome))
}

fn run_scan_command(config: &Config, args: &ScanArgs) -> Result<()> {
    let start_time = Instant::now();

    let Some(outcome) = scan_project(config, args)? else {
        return Ok(());
    };
    let root = outcome.root.as_path();

    // Filter by confidence
    let min_conf = Confidence::parse(&args.min_confidence);
    let findings: Vec<_> = outcome
        .findings
        .iter()
        .filter(|dc| dc.confidence >= min_conf)
        .cloned()
        .collect();

    if args.detect_cycles {
        let cycle_detector = CycleDetector::new();
        let dead_cycles =
            cycle_detector.find_dead_cycles(&outcome.graph, outcome.reachability.reachable());

        if dead_cycles.is_empty() {
            println!("{}", "No dead import cycles found.".green());
        } else {
            let stats = cycle_detector.get_cycle_stats(&outcome.graph, outcome.reachability.reachable());
            println!();
            println!("{}", "🧟 Dead Import Cycles".red().bold());
            println!(
                "  {} dead cycles found ({} files)",
                stats.num_dead_cycles, stats.total_files_in_cycles
            );
            if stats.largest_cycle_size > 2 {
                println!(
                    "  Largest cycle: {} mutually importing files",
                    stats.largest_cycle_size
                );
            }
            for (i, cycle) in dead_cycles.iter().take(5).enumerate() {
                println!();
                println!(
                    "  {}",
                    format!("Cycle #{} ({} files):", i + 1, cycle.size).dimmed()
                );
                for member in cycle.members.iter().take(5) {
                    println!("    - {}", member.relative_to(root));
                }
                if cycle.members.len() > 5 {
                    println!("    ... and {} more", cycle.members.len() - 5);
                }
            }
            if dead_cycles.len() > 5 {
                println!();
                println!("  ... and {} more cycles", dead_cycles.len() - 5);
            }
        }
    }

    if let Some(baseline_path) = &args.generate_baseline {
        info!("Generating baseline file...");
        let baseline = Baseline::from_findings(&findings, root);
        match baseline.save(baseline_path) {
            Ok(()) if args.quiet => {}
            Ok(()) => println!(
                "{}",
                format!(
                    "📋 Baseline written to {} ({} issues)",
                    baseline_path.display(),
                    baseline.issues.len()
                )
                .green()
            ),
            Err(e) => eprintln!("{}: Failed to generate baseline: {}", "Error".red(), e),
        }
    }

    let findings = match &args.baseline {
        Some(baseline_path) => match Baseline::load(baseline_path) {
            Ok(baseline) => {
                let stats = baseline.stats(&findings, root);
                if !args.quiet {
                    println!("{}", format!("📋 Baseline: {}", stats).cyan());
                }

                let new_issues: Vec<_> = baseline
                    .filter_new(&findings, root)
                    .into_iter()
                    .cloned()
                    .collect();

                if new_issues.is_empty() && stats.baselined_found > 0 && !args.quiet {
                    println!("{}", "✓ No new dead code issues found!".green());
                }
                new_issues
            }
            Err(e) => {
                eprintln!("{}: Failed to load baseline: {}", "Warning".yellow(), e);
                findings
            }
        },
        None => findings,
    };

    let format = match args.format {
        Some(format) => format.into(),
        None => ReportFormat::parse(&config.report.format).unwrap_or_else(|| {
            warn!("Unknown report format '{}', using terminal", config.report.format);
            ReportFormat::Terminal
        }),
    };
    Reporter::new(format, args.output.clone())
        .with_base(root)
        .report(&findings)?;

    info!("Analysis completed in {:.2}s", start_time.elapsed().as_secs_f64());
    Ok(())
}

fn run_prune_command(config: &Config, prune: &PruneArgs) -> Result<()> {
    let Some(outcome) = scan_project(config, &prune.scan)? else {
        return Ok(());
    };

    let dead_files: Vec<_> = outcome
        .findings
        .into_iter()
        .filter(|dc| dc.issue == DeadCodeIssue::DeadFile)
        .collect();

    let summary = SafeDeleter::new(&outcome.root)
        .with_interactive(prune.interactive)
        .with_dry_run(prune.dry_run)
        .with_force(prune.force)
        .with_undo_script(prune.undo_script.clone())
        .delete(&dead_files)?;

    if summary.has_failures() {
        return Err(miette::miette!(
            "{} of {} files could not be deleted",
            summary.failed.len(),
            summary.failed.len() + summary.deleted.len()
        ));
    }
    Ok(())
}

fn run_watch_mode(config: Config, args: ScanArgs) -> Result<()> {
    let watcher = FileWatcher::new();
    let path = args.path.clone();

    watcher
        .watch(&path, move || {
            match run_scan_command(&config, &args) {
                Ok(()) => {
                    println!();
                    println!("{}", "✓ Analysis complete. Waiting for changes...".green());
                }
                Err(e) => eprintln!("{}: {}", "Analysis error".red(), e),
            }
            true
        })
        .map_err(|e| miette::miette!("Watch error: {}", e))
}
