//! Configuration file handling.
//!
//! Settings come from `~/.symtrack/config.toml` (or `--config`), with
//! command-line flags taking precedence.

use std::fs;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use serde::{Deserialize, Serialize};

use crate::services::LogStore;
use crate::types::{Result, SymtrackError};

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Symptom log location. Defaults to `~/.symtrack/symptom_log.json`.
    pub data_file: Option<PathBuf>,

    /// Enable debug logging by default.
    pub verbose: bool,
}

impl Config {
    /// `~/.symtrack/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        BaseDirs::new().map(|dirs| dirs.home_dir().join(".symtrack").join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, the default location is
    /// used if present, and built-in defaults otherwise.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Parse a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            SymtrackError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
            .map_err(|e| SymtrackError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Pick the data file: override, then config, then the store default.
    pub fn data_file(&self, cli_override: Option<PathBuf>) -> Result<PathBuf> {
        match cli_override.or_else(|| self.data_file.clone()) {
            Some(path) => Ok(path),
            None => LogStore::default_path(),
        }
    }
}
