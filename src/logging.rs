//! Subscriber setup for the binary.
//!
//! Console output goes to stderr so stdout stays free for the report. Each
//! run also gets its own plain-text log file,
//! `<dir>/file_organizer_YYYYMMDD_HHMMSS.log`.

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Name of the log file for a run started at `now`.
pub fn log_file_name(now: chrono::DateTime<chrono::Local>) -> String {
    format!("file_organizer_{}.log", now.format("%Y%m%d_%H%M%S"))
}

/// Installs the global subscriber.
///
/// `RUST_LOG` wins over `level`. When `log_dir` is given the directory is
/// created if needed and the path of the new log file is returned.
pub fn init(level: &str, log_dir: Option<&Path>) -> Result<Option<PathBuf>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .with_context(|| format!("Invalid log level '{}'", level))?;

    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let (file_layer, log_path) = match log_dir {
        Some(dir) => {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
            let path = dir.join(log_file_name(chrono::Local::now()));
            let file = File::create(&path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            let layer = fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(false);
            (Some(layer), Some(path))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file_layer)
        .try_init()
        .context("Failed to install the log subscriber")?;

    Ok(log_path)
}
