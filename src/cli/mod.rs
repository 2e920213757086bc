//! # CLI Module
//!
//! Command-line interface for the photo archive.
//!
//! ## Usage
//! ```bash
//! # Sort once, then keep watching the inbox
//! photo-archive sort --source ~/Inbox --target ~/Archive
//!
//! # Show what would happen without touching anything
//! photo-archive sort --source ~/Inbox --target ~/Archive --dry-run --no-watch
//!
//! # Deduplicate using findimagedupes output (dry run unless --apply)
//! photo-archive dedup --directory ~/Archive --input dupes.txt --apply
//!
//! # Print capture dates
//! photo-archive list ~/Inbox
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use console::{style, Term};
use crossbeam_channel::unbounded;
use indicatif::{ProgressBar, ProgressStyle};
use photo_archive::core::config::{ArchiveConfig, DEFAULT_IGNORE_PATTERNS};
use photo_archive::core::dedup::{
    deduplicate_all_with_events, parse_delimiter, read_duplicate_groups,
};
use photo_archive::core::filesystem::{FileSystem, LoggingFileSystem, RealFileSystem};
use photo_archive::core::metadata::{ExifMetadataOracle, MetadataOracle};
use photo_archive::core::paths;
use photo_archive::core::scanner::{IgnoreMatcher, ScanConfig, SourceScanner};
use photo_archive::core::sorter::{SortOutcome, SortReport, Sorter};
use photo_archive::core::watcher::{SourceWatcher, WatchEvent, WatcherConfig};
use photo_archive::core::ArchiveAlgorithm;
use photo_archive::error::{ConfigError, Result};
use photo_archive::events::{null_sender, DedupEvent, Event, EventChannel, SortEvent};
use serde::Serialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::thread;
use tracing::{info, warn};

/// Photo Archive - sort photos and videos by capture date
#[derive(Parser, Debug)]
#[command(name = "photo-archive")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Sort media files from a source directory into the archive
    Sort {
        /// Directory to read photos and videos from
        #[arg(short, long)]
        source: PathBuf,

        /// Archive directory
        #[arg(short, long)]
        target: PathBuf,

        /// Additional glob patterns to ignore
        #[arg(long = "ignore")]
        ignore: Vec<String>,

        /// Only log what would be done
        #[arg(long)]
        dry_run: bool,

        /// Exit after the initial run instead of watching the source
        #[arg(long)]
        no_watch: bool,

        /// Include hidden files
        #[arg(long)]
        include_hidden: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Deduplicate the archive using groups from an external duplicate finder
    Dedup {
        /// Archive directory to deduplicate
        #[arg(short, long)]
        directory: PathBuf,

        /// File with one group of duplicates per line
        #[arg(short, long)]
        input: PathBuf,

        /// Single character separating the paths of a group
        #[arg(long, default_value = " ")]
        delimiter: String,

        /// Perform the deletions and relinks instead of a dry run
        #[arg(long)]
        apply: bool,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// List the capture date of every media file in a directory
    List {
        /// Directory to list
        directory: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON output for scripting
    Json,
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Sort {
            source,
            target,
            ignore,
            dry_run,
            no_watch,
            include_hidden,
            verbose,
        } => {
            photo_archive::init_tracing(log_directive(verbose));
            let config = ArchiveConfig::builder()
                .source_root(absolute(&source)?)
                .archive_root(absolute(&target)?)
                .ignore_patterns(
                    DEFAULT_IGNORE_PATTERNS
                        .iter()
                        .map(|p| p.to_string())
                        .chain(ignore)
                        .collect(),
                )
                .dry_run(dry_run)
                .include_hidden(include_hidden)
                .watch(!no_watch)
                .build()?;
            run_sort(&config)
        }
        Commands::Dedup {
            directory,
            input,
            delimiter,
            apply,
            output,
            verbose,
        } => {
            photo_archive::init_tracing(log_directive(verbose));
            run_dedup(&absolute(&directory)?, &input, &delimiter, apply, output)
        }
        Commands::List { directory } => {
            photo_archive::init_tracing(log_directive(false));
            run_list(&directory)
        }
    }
}

fn log_directive(verbose: bool) -> &'static str {
    if verbose {
        "photo_archive=debug"
    } else {
        "photo_archive=info"
    }
}

/// Absolute, lexically normalized form of a user-supplied path
fn absolute(path: &Path) -> Result<PathBuf> {
    let absolute = paths::absolute(path).map_err(|e| ConfigError::ResolvePath {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(absolute)
}

fn run_sort(config: &ArchiveConfig) -> Result<()> {
    let term = Term::stderr();
    term.write_line(&format!(
        "{} {} {} {}",
        style("Photo Archive").bold().cyan(),
        style(config.source_root.display()).dim(),
        style("-->").dim(),
        style(config.archive_root.display()).dim()
    ))
    .ok();
    if config.dry_run {
        term.write_line(&format!("{}", style("Dry run: nothing will be written").yellow()))
            .ok();
    }

    let sorter = Sorter::new(ArchiveAlgorithm::from_config(config));
    sorter.init()?;

    let ignores = IgnoreMatcher::from_config(config)?;
    let scan =
        SourceScanner::new(ScanConfig::default(), ignores.clone()).scan(&config.source_root)?;
    for error in &scan.errors {
        warn!("{}", error);
    }

    let report = sort_with_progress(&sorter, &scan.files);
    print_sort_summary(&term, &report);

    if config.watch {
        watch_source(config, &sorter, ignores)?;
    }

    Ok(())
}

fn sort_with_progress(sorter: &Sorter, files: &[PathBuf]) -> SortReport {
    let (sender, receiver) = EventChannel::new();

    let progress = ProgressBar::new(files.len() as u64);
    if let Ok(bar_style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
    {
        progress.set_style(bar_style.progress_chars("█▓░"));
    }

    let progress_clone = progress.clone();
    let event_thread = thread::spawn(move || {
        for event in receiver.iter() {
            match event {
                Event::Sort(SortEvent::Progress(p)) => {
                    progress_clone.set_position(p.completed as u64);
                    progress_clone.set_message(
                        p.current_path
                            .file_name()
                            .unwrap_or_default()
                            .to_string_lossy()
                            .into_owned(),
                    );
                }
                Event::Sort(SortEvent::Completed { .. }) => progress_clone.finish_and_clear(),
                _ => {}
            }
        }
    });

    let report = sorter.sort_all(files, &sender);

    // Drop sender to signal event thread to finish
    drop(sender);
    event_thread.join().ok();
    report
}

fn print_sort_summary(term: &Term, report: &SortReport) {
    term.write_line(&format!(
        "{} Sorted {} files in {:.1}s",
        style("✓").green().bold(),
        style(report.sorted.len()).cyan(),
        report.duration_ms as f64 / 1000.0
    ))
    .ok();
    term.write_line(&format!(
        "  {} skipped (not a photo or video)",
        style(report.skipped.len()).dim()
    ))
    .ok();

    if !report.failed.is_empty() {
        term.write_line(&format!(
            "  {} failed:",
            style(report.failed.len()).red().bold()
        ))
        .ok();
        for failure in &report.failed {
            term.write_line(&format!(
                "    {} {}",
                style(failure.path.display()).red(),
                style(&failure.message).dim()
            ))
            .ok();
        }
    }
}

/// Sort files as they appear in the source tree, until the process is stopped
fn watch_source(config: &ArchiveConfig, sorter: &Sorter, ignores: IgnoreMatcher) -> Result<()> {
    let (tx, rx) = unbounded();
    let mut watcher = SourceWatcher::new(WatcherConfig::default(), ignores, move |event| {
        let _ = tx.send(event);
    })?;
    watcher.watch(&config.source_root)?;
    info!("watching {} for new files", config.source_root.display());

    let events = null_sender();
    for event in rx {
        match event {
            WatchEvent::FileChanged(path) => {
                if !path.is_file() {
                    continue;
                }
                if let SortOutcome::Failed(message) = sorter.sort_one(&path, &events) {
                    warn!("{}: {}", path.display(), message);
                }
            }
            WatchEvent::Error(message) => warn!("watch error: {}", message),
        }
    }

    Ok(())
}

fn run_dedup(
    archive_root: &Path,
    input: &Path,
    delimiter: &str,
    apply: bool,
    output: OutputFormat,
) -> Result<()> {
    let delimiter = parse_delimiter(delimiter)?;
    let file = File::open(input).map_err(|e| ConfigError::Open {
        path: input.to_path_buf(),
        source: e,
    })?;
    // Group paths are resolved like --directory so relative finder output matches
    let groups = read_duplicate_groups(BufReader::new(file), delimiter)?
        .iter()
        .map(|group| group.iter().map(|p| absolute(p)).collect::<Result<Vec<_>>>())
        .collect::<Result<Vec<_>>>()?;

    let fs: Box<dyn FileSystem> = if apply {
        Box::new(RealFileSystem::new())
    } else {
        Box::new(LoggingFileSystem::new())
    };

    let (sender, receiver) = EventChannel::new();
    let event_thread = thread::spawn(move || {
        receiver
            .iter()
            .filter_map(|event| match event {
                Event::Dedup(DedupEvent::GroupPlanned { group_index, task }) => {
                    Some((group_index, task))
                }
                _ => None,
            })
            .collect::<Vec<_>>()
    });

    let result = deduplicate_all_with_events(archive_root, &groups, fs.as_ref(), &sender);
    drop(sender);
    let planned = event_thread.join().unwrap_or_default();

    match output {
        OutputFormat::Pretty => print_pretty_plan(&planned, apply),
        OutputFormat::Json => print_json_plan(&planned, apply),
    }

    let summary = result?;
    let term = Term::stderr();
    term.write_line(&format!(
        "{} {} groups, {} links recreated, {} files {}",
        style("✓").green().bold(),
        style(summary.groups_processed).cyan(),
        style(summary.links_recreated).cyan(),
        style(summary.files_deleted).cyan(),
        if apply { "deleted" } else { "would be deleted" }
    ))
    .ok();
    if !apply {
        term.write_line(&format!(
            "{}",
            style("Dry run: re-run with --apply to deduplicate.").dim()
        ))
        .ok();
    }

    Ok(())
}

fn print_pretty_plan(planned: &[(usize, photo_archive::core::DedupTask)], apply: bool) {
    let term = Term::stdout();
    for (group_index, task) in planned {
        term.write_line(&format!(
            "{} {}",
            style(format!("Group {}:", group_index + 1)).bold(),
            style(task.to_keep.display()).green()
        ))
        .ok();
        for link in &task.recreate_links {
            term.write_line(&format!("    {} {}", style("↪").cyan(), link.display()))
                .ok();
        }
        for deleted in &task.delete_files {
            let marker = if apply { "✗" } else { "○" };
            term.write_line(&format!("    {} {}", style(marker).red(), deleted.display()))
                .ok();
        }
    }
}

#[derive(Serialize)]
struct JsonPlan<'a> {
    applied: bool,
    groups: Vec<JsonGroup<'a>>,
}

#[derive(Serialize)]
struct JsonGroup<'a> {
    index: usize,
    #[serde(flatten)]
    task: &'a photo_archive::core::DedupTask,
}

fn print_json_plan(planned: &[(usize, photo_archive::core::DedupTask)], apply: bool) {
    let plan = JsonPlan {
        applied: apply,
        groups: planned
            .iter()
            .map(|(index, task)| JsonGroup {
                index: *index,
                task,
            })
            .collect(),
    };

    match serde_json::to_string_pretty(&plan) {
        Ok(json) => println!("{}", json),
        Err(e) => warn!("failed to serialize plan: {}", e),
    }
}

fn run_list(directory: &Path) -> Result<()> {
    let scan = SourceScanner::new(ScanConfig::default(), IgnoreMatcher::new::<&str>(&[])?)
        .scan(directory)?;
    let oracle = ExifMetadataOracle::new();

    for path in &scan.files {
        match oracle.media_kind(path) {
            Ok(Some(kind)) => match oracle.capture_date(path) {
                Ok(date) => println!("{} ({:?}): {}", path.display(), kind, date),
                Err(e) => println!("{}: could not determine capture date: {}", path.display(), e),
            },
            Ok(None) => {}
            Err(e) => println!("{}: {}", path.display(), e),
        }
    }

    Ok(())
}
