//! Command-line interface.
//!
//! This module handles:
//! - Argument parsing
//! - Merging arguments with the configuration file
//! - Logging setup
//! - Running the organizer and reporting the result

use crate::category::ExtensionTable;
use crate::config::Config;
use crate::events::TracingSink;
use crate::logging;
use crate::organizer::{OrganizeOptions, organize};
use crate::output::{JsonReport, OutputFormatter};
use crate::stats;
use anyhow::{Context, Result};
use clap::Parser;
use glob::Pattern;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

/// File Organizer - sort files into category folders by extension
#[derive(Parser, Debug)]
#[command(name = "file-organizer", version, about)]
pub struct Cli {
    /// Directory to organize (default: current directory)
    pub directory: Option<PathBuf>,

    /// Perform a dry run without moving files (no log file is written
    /// inside the organized directory)
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Recursively organize files in subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    /// Show category folder sizes after organizing
    #[arg(short, long)]
    pub stats: bool,

    /// Configuration file
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Do not create missing category folders
    #[arg(long)]
    pub no_create_folders: bool,

    /// Directory for run log files
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Do not write a log file
    #[arg(long)]
    pub no_log_file: bool,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,

    /// Verbose output
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    pub quiet: bool,

    /// List the categories and their extensions, then exit
    #[arg(long)]
    pub list_categories: bool,
}

/// Fully resolved settings for one invocation.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub directory: PathBuf,
    pub options: OrganizeOptions,
    pub stats: bool,
    pub json: bool,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
    /// Top-level folders left out of the size statistics.
    pub stats_skip: Vec<String>,
}

impl RunSettings {
    /// Merges the command line over the configuration file.
    ///
    /// Flags can only switch behavior on (or folder creation off); values
    /// given on the command line replace configured ones.
    pub fn resolve(cli: &Cli, config: &Config) -> Result<Self> {
        let directory = match &cli.directory {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().context("Cannot determine current directory")?,
        };

        let log_level = if cli.verbose {
            "debug".to_string()
        } else if cli.quiet {
            "warn".to_string()
        } else {
            config.logging.level.clone()
        };

        let mut log_dir = if cli.no_log_file || !config.logging.file {
            None
        } else {
            Some(
                cli.log_dir
                    .clone()
                    .unwrap_or_else(|| config.logging.directory.clone()),
            )
        };
        let log_dir_in_root = log_dir
            .as_deref()
            .and_then(|dir| relative_log_dir(&directory, dir));

        // A dry run must leave the organized tree untouched.
        if cli.dry_run && log_dir_in_root.is_some() {
            log_dir = None;
        }

        let mut exclude = config.exclude_patterns()?;
        let mut stats_skip = Vec::new();
        if let Some(relative) = &log_dir_in_root {
            if let Ok(pattern) = Pattern::new(&Pattern::escape(&relative.to_string_lossy())) {
                exclude.push(pattern);
            }
            if let Some(first) = relative.components().next()
                && relative.components().count() == 1
            {
                stats_skip.push(first.as_os_str().to_string_lossy().to_string());
            }
        }

        Ok(Self {
            options: OrganizeOptions {
                dry_run: cli.dry_run,
                recursive: cli.recursive || config.organize.recursive,
                create_category_folders: !cli.no_create_folders
                    && config.organize.create_category_folders,
                exclude,
            },
            directory,
            stats: cli.stats,
            json: cli.json,
            log_level,
            log_dir,
            stats_skip,
        })
    }
}

/// The log directory relative to `root`, when it lives inside it.
fn relative_log_dir(root: &Path, log_dir: &Path) -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    let relative = absolute(&cwd, log_dir)
        .strip_prefix(absolute(&cwd, root))
        .ok()?
        .to_path_buf();
    if relative.as_os_str().is_empty() {
        return None;
    }
    Some(relative)
}

/// Canonicalizes the longest existing prefix of `path`; the log directory
/// may not exist yet.
fn absolute(cwd: &Path, path: &Path) -> PathBuf {
    let path = if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    };
    if let Ok(canonical) = path.canonicalize() {
        return canonical;
    }
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => absolute(cwd, parent).join(name),
        _ => path,
    }
}

/// Runs the application for parsed arguments.
pub fn run(cli: Cli) -> Result<()> {
    if cli.list_categories {
        print!(
            "{}",
            OutputFormatter::categories_table(ExtensionTable::standard())
        );
        return Ok(());
    }

    let config = Config::load(cli.config.as_deref()).context("Error loading configuration")?;
    let settings = RunSettings::resolve(&cli, &config)?;

    let log_path = logging::init(&settings.log_level, settings.log_dir.as_deref())?;
    if let Some(path) = &log_path {
        tracing::debug!(path = %path.display(), "Logging to file");
    }

    info!(
        "Starting file organization in: {}",
        settings.directory.display()
    );
    info!(
        "Options: dry_run={}, recursive={}",
        settings.options.dry_run, settings.options.recursive
    );
    if settings.options.dry_run {
        info!("DRY RUN MODE: No files will be moved");
    }

    let started = Instant::now();
    let mut sink = TracingSink;
    let report = organize(&settings.directory, &settings.options, &mut sink).map_err(|e| {
        tracing::error!("Organization failed");
        e
    })?;
    let elapsed = started.elapsed().as_secs_f64();
    info!("Organization completed in {:.2} seconds", elapsed);

    let sizes = if settings.stats && !settings.options.dry_run {
        let skip: Vec<&str> = settings.stats_skip.iter().map(String::as_str).collect();
        let sizes = stats::folder_sizes(&settings.directory, &skip).with_context(|| {
            format!(
                "Failed to read folder sizes in {}",
                settings.directory.display()
            )
        })?;

        info!("Category statistics:");
        for (folder, size) in &sizes {
            info!("  {}: {}", folder, stats::format_size(*size));
        }
        Some(sizes)
    } else {
        None
    };

    if settings.json {
        OutputFormatter::print_json(&JsonReport {
            directory: settings.directory.display().to_string(),
            dry_run: settings.options.dry_run,
            elapsed_seconds: elapsed,
            report: &report,
            folder_sizes: sizes.as_ref(),
        })?;
        return Ok(());
    }

    if settings.options.dry_run {
        OutputFormatter::dry_run_notice("No files were modified.");
    }
    OutputFormatter::print_summary(&report);
    if let Some(sizes) = &sizes {
        OutputFormatter::print_sizes(sizes);
    }

    Ok(())
}
