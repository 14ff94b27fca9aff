//! file-organizer - sort the files of a directory into category folders
//!
//! Files are classified by extension against a fixed table (`images`,
//! `documents`, `audio`, `video`, `archives`, `code`, `others`) and moved
//! into folders of that name under the organized directory. Runs can be
//! simulated with a dry run, and every decision is reported as an event to a
//! caller-supplied sink.

pub mod category;
pub mod cli;
pub mod config;
pub mod error;
pub mod events;
pub mod logging;
pub mod organizer;
pub mod output;
pub mod stats;

pub use category::{Category, ExtensionTable, classify};
pub use config::Config;
pub use error::{ConfigError, OrganizeError, OrganizeResult};
pub use events::{EventSink, OrganizeEvent, SkipReason, TracingSink};
pub use organizer::{FileOrganizer, OrganizeOptions, OrganizeReport, organize};

pub use cli::{Cli, run};
