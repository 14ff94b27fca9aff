//! Run events and the sinks that receive them.
//!
//! The organizer never logs on its own. Everything worth reporting during a
//! run is described by an [`OrganizeEvent`] and handed to an [`EventSink`]
//! supplied by the caller. The binary forwards events to `tracing` through
//! [`TracingSink`]; tests collect them in a `Vec<OrganizeEvent>`.

use crate::category::Category;
use crate::organizer::OrganizeReport;
use std::fmt;
use std::path::PathBuf;

/// Why a counted file was left where it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The entry is a symbolic link.
    SymbolicLink,
    /// The file name has no extension.
    NoExtension,
    /// The file already sits in its category folder.
    AlreadyOrganized,
}

impl SkipReason {
    pub fn describe(&self) -> &'static str {
        match self {
            SkipReason::SymbolicLink => "symbolic link",
            SkipReason::NoExtension => "file without extension",
            SkipReason::AlreadyOrganized => "file already in the correct folder",
        }
    }
}

/// Something that happened during an organize run.
#[derive(Debug, Clone, PartialEq)]
pub enum OrganizeEvent {
    /// The run passed its precondition checks.
    Started {
        directory: PathBuf,
        dry_run: bool,
        recursive: bool,
    },
    /// The run was rejected before touching any file.
    Aborted { directory: PathBuf, reason: String },
    /// A category folder was created under the organize root.
    CategoryCreated { category: Category, path: PathBuf },
    /// A file was moved.
    Moved {
        source: PathBuf,
        destination: PathBuf,
        category: Category,
    },
    /// Dry run: a file would have been moved.
    WouldMove {
        source: PathBuf,
        destination: PathBuf,
        category: Category,
    },
    /// A file was counted but left untouched.
    Skipped { path: PathBuf, reason: SkipReason },
    /// Moving a file failed; the file is counted as skipped.
    MoveFailed {
        source: PathBuf,
        destination: PathBuf,
        error: String,
    },
    /// Part of the tree could not be read during a recursive walk.
    WalkFailed { path: Option<PathBuf>, error: String },
    /// The run completed.
    Finished(OrganizeReport),
}

/// Shows `dir/file` for a destination, the way it reads in a log line.
fn short_destination(destination: &std::path::Path) -> String {
    let file = destination
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    match destination
        .parent()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().to_string())
    {
        Some(dir) => format!("{}/{}", dir, file),
        None => file,
    }
}

impl fmt::Display for OrganizeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Started {
                directory,
                dry_run,
                recursive,
            } => write!(
                f,
                "Organizing {} (dry_run={}, recursive={})",
                directory.display(),
                dry_run,
                recursive
            ),
            Self::Aborted { reason, .. } => write!(f, "{}", reason),
            Self::CategoryCreated { category, .. } => {
                write!(f, "Created category directory: {}", category)
            }
            Self::Moved {
                source,
                destination,
                ..
            } => write!(
                f,
                "Moved '{}' to '{}'",
                source.display(),
                short_destination(destination)
            ),
            Self::WouldMove {
                source,
                destination,
                ..
            } => write!(
                f,
                "Would move '{}' to '{}'",
                source.display(),
                short_destination(destination)
            ),
            Self::Skipped { path, reason } => {
                write!(f, "Skipping {}: {}", reason.describe(), path.display())
            }
            Self::MoveFailed { source, error, .. } => {
                write!(f, "Error moving file '{}': {}", source.display(), error)
            }
            Self::WalkFailed { path, error } => match path {
                Some(path) => write!(f, "Could not read {}: {}", path.display(), error),
                None => write!(f, "Could not read directory entry: {}", error),
            },
            Self::Finished(report) => write!(
                f,
                "Processed {} files: {} organized, {} skipped",
                report.total_files, report.organized_files, report.skipped_files
            ),
        }
    }
}

/// Receives the events of an organize run.
pub trait EventSink {
    fn record(&mut self, event: OrganizeEvent);
}

/// Collects events in memory.
impl EventSink for Vec<OrganizeEvent> {
    fn record(&mut self, event: OrganizeEvent) {
        self.push(event);
    }
}

/// Forwards events to `tracing` with structured fields.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn record(&mut self, event: OrganizeEvent) {
        match &event {
            OrganizeEvent::Started {
                directory,
                dry_run,
                recursive,
            } => tracing::info!(
                directory = %directory.display(),
                dry_run,
                recursive,
                "{}",
                event
            ),
            OrganizeEvent::Aborted { directory, .. } => {
                tracing::error!(directory = %directory.display(), "{}", event)
            }
            OrganizeEvent::CategoryCreated { category, path } => tracing::info!(
                category = %category,
                path = %path.display(),
                "{}",
                event
            ),
            OrganizeEvent::Moved {
                source,
                destination,
                category,
            }
            | OrganizeEvent::WouldMove {
                source,
                destination,
                category,
            } => tracing::info!(
                src = %source.display(),
                dest = %destination.display(),
                category = %category,
                "{}",
                event
            ),
            OrganizeEvent::Skipped { path, reason } => tracing::info!(
                path = %path.display(),
                reason = reason.describe(),
                "{}",
                event
            ),
            OrganizeEvent::MoveFailed {
                source,
                destination,
                error,
            } => tracing::error!(
                src = %source.display(),
                dest = %destination.display(),
                error = %error,
                "{}",
                event
            ),
            OrganizeEvent::WalkFailed { .. } => tracing::warn!("{}", event),
            OrganizeEvent::Finished(report) => tracing::info!(
                total = report.total_files,
                organized = report.organized_files,
                skipped = report.skipped_files,
                "{}",
                event
            ),
        }
    }
}
