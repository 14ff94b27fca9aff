//! Configuration file support.
//!
//! Defaults for the command-line options, logging settings and exclusion
//! filters can be kept in a TOML file:
//!
//! ```toml
//! [organize]
//! recursive = false
//! create_category_folders = true
//!
//! [logging]
//! directory = "logs"
//! level = "info"
//! file = true
//!
//! [filters]
//! exclude = ["Thumbs.db", "node_modules/**"]
//! ```
//!
//! Every section and key is optional.

use crate::error::ConfigError;
use glob::Pattern;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name looked up in the current directory.
pub const LOCAL_CONFIG_FILE: &str = ".file-organizer.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub organize: OrganizeSettings,
    pub logging: LoggingSettings,
    pub filters: FilterSettings,
}

/// Defaults for an organize run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrganizeSettings {
    pub recursive: bool,
    pub create_category_folders: bool,
}

impl Default for OrganizeSettings {
    fn default() -> Self {
        Self {
            recursive: false,
            create_category_folders: true,
        }
    }
}

/// Where and how much to log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Directory receiving the per-run log files.
    pub directory: PathBuf,
    /// Default level filter, overridden by `RUST_LOG` and `-v`/`-q`.
    pub level: String,
    /// Whether to write a log file at all.
    pub file: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("logs"),
            level: "info".to_string(),
            file: true,
        }
    }
}

/// Entries left alone by every run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSettings {
    /// Glob patterns matched against paths relative to the organized directory.
    pub exclude: Vec<String>,
}

impl Config {
    /// Loads configuration, falling back to defaults.
    ///
    /// Lookup order:
    /// 1. `config_path`, if given (must exist)
    /// 2. `.file-organizer.toml` in the current directory
    /// 3. `~/.config/file-organizer/config.toml`
    /// 4. built-in defaults
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_config.is_file() {
            return Self::load_from_file(&local_config);
        }

        if let Ok(home) = std::env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("file-organizer")
                .join("config.toml");
            if home_config.is_file() {
                return Self::load_from_file(&home_config);
            }
        }

        Ok(Self::default())
    }

    /// Loads and validates one configuration file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;

        // Fail early on bad patterns rather than at run time
        config.exclude_patterns()?;
        Ok(config)
    }

    /// Compiles the exclusion globs.
    pub fn exclude_patterns(&self) -> Result<Vec<Pattern>, ConfigError> {
        self.filters
            .exclude
            .iter()
            .map(|pattern| {
                Pattern::new(pattern).map_err(|e| ConfigError::InvalidPattern {
                    pattern: pattern.clone(),
                    reason: e.msg.to_string(),
                })
            })
            .collect()
    }
}
