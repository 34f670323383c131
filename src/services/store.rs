//! JSON file store for the symptom log
//!
//! The whole log lives in one pretty-printed JSON object keyed by date,
//! by default at `~/.symtrack/symptom_log.json`. Each command loads a
//! fresh snapshot; writes go through a temp file and an atomic rename.

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use fs2::FileExt;
use tracing::{debug, warn};

use crate::types::{parse_log_date, DayLog, LogEntry, Result, SymptomLog, SymtrackError};

/// File-backed symptom log
pub struct LogStore {
    path: PathBuf,
}

impl LogStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// `~/.symtrack/symptom_log.json`
    pub fn default_path() -> Result<PathBuf> {
        let base_dirs = BaseDirs::new()
            .ok_or_else(|| SymtrackError::Config("Cannot determine home directory".into()))?;
        Ok(base_dirs
            .home_dir()
            .join(".symtrack")
            .join("symptom_log.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load the log. Missing, unreadable or corrupt files yield an empty log.
    pub fn load(&self) -> SymptomLog {
        match self.try_load() {
            Ok(Some(log)) => log,
            Ok(None) => {
                debug!("No log file at {}", self.path.display());
                SymptomLog::new()
            }
            Err(e) => {
                warn!("{}", e);
                SymptomLog::new()
            }
        }
    }

    /// Load the log, telling an absent file (`Ok(None)`) apart from one
    /// that cannot be read or parsed (`Err`).
    /// Uses a shared file lock for concurrent read safety.
    pub fn try_load(&self) -> Result<Option<SymptomLog>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = self.read_locked().map_err(|e| {
            SymtrackError::Store(format!(
                "Failed to read log file {}: {}",
                self.path.display(),
                e
            ))
        })?;

        serde_json::from_str(&content).map(Some).map_err(|e| {
            SymtrackError::Store(format!(
                "Corrupted log file {}: {}",
                self.path.display(),
                e
            ))
        })
    }

    fn read_locked(&self) -> Result<String> {
        let file = File::open(&self.path)?;
        file.lock_shared()
            .map_err(|e| SymtrackError::Store(format!("Failed to acquire read lock: {}", e)))?;

        let mut content = String::new();
        let read = std::io::BufReader::new(&file).read_to_string(&mut content);
        let _ = file.unlock();
        read?;

        Ok(content)
    }

    /// Save using atomic write (temp file + rename) with exclusive lock.
    pub fn save(&self, log: &SymptomLog) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(log)
            .map_err(|e| SymtrackError::Parse(format!("Serialization failed: {}", e)))?;

        let temp_path = self.path.with_extension("json.tmp");

        {
            let mut file = File::create(&temp_path)
                .map_err(|e| SymtrackError::Store(format!("Failed to create temp file: {}", e)))?;
            file.write_all(content.as_bytes())
                .map_err(|e| SymtrackError::Store(format!("Failed to write temp file: {}", e)))?;
            file.sync_all()
                .map_err(|e| SymtrackError::Store(format!("Failed to sync temp file: {}", e)))?;
        }

        let target = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)?;

        target
            .lock_exclusive()
            .map_err(|e| SymtrackError::Store(format!("Failed to acquire write lock: {}", e)))?;

        fs::rename(&temp_path, &self.path)
            .map_err(|e| SymtrackError::Store(format!("Failed to rename temp file: {}", e)))?;

        let _ = target.unlock();
        debug!("Saved {} dates to {}", log.len(), self.path.display());
        Ok(())
    }

    /// Record `entry` as the only entry for `date`, replacing earlier saves.
    ///
    /// Refuses to write when the existing file cannot be parsed, so a
    /// damaged log is never overwritten with a near-empty one.
    pub fn record(&self, date: &str, entry: LogEntry) -> Result<()> {
        if parse_log_date(date).is_none() {
            return Err(SymtrackError::InvalidInput(format!(
                "date '{}' is not a valid YYYY-MM-DD date",
                date
            )));
        }

        let mut log = self.try_load()?.unwrap_or_default();
        log.replace(date, entry);
        self.save(&log)
    }

    /// Entries for one date (empty if nothing was logged)
    pub fn entries_for(&self, date: &str) -> DayLog {
        self.load().get(date).cloned().unwrap_or_default()
    }

    /// All logged dates, in file order
    pub fn dates(&self) -> Vec<String> {
        self.load().dates().map(String::from).collect()
    }
}
