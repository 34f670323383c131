//! `symtrack log` subcommand for recording a day's symptoms

use clap::Args;
use tracing::info;

use crate::services::LogStore;
use crate::types::{LogEntry, Result, SymtrackError};

/// Record symptoms for a date
#[derive(Args, Debug)]
pub struct RecordArgs {
    /// Date to log (YYYY-MM-DD, default today)
    #[arg(long)]
    pub date: Option<String>,

    /// Symptom observed (repeat for several)
    #[arg(short, long = "symptom", value_name = "NAME")]
    pub symptoms: Vec<String>,

    /// Day of the current cycle
    #[arg(long)]
    pub cycle_day: Option<u32>,

    /// Free-text comment
    #[arg(long)]
    pub comment: Option<String>,
}

impl RecordArgs {
    pub fn run(self, store: &LogStore) -> Result<()> {
        let entry = self.build_entry();
        let date = self.date.unwrap_or_else(super::today);

        store.record(&date, entry.clone())?;
        info!(
            "Logged {} symptom(s) for {}",
            entry.symptoms.len(),
            date
        );

        // Print the saved entry to stdout
        let json = serde_json::to_string_pretty(&entry)
            .map_err(|e| SymtrackError::Parse(e.to_string()))?;
        println!("{}", json);

        Ok(())
    }

    /// Blank symptom names are dropped; names are trimmed.
    fn build_entry(&self) -> LogEntry {
        let symptoms = self
            .symptoms
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        LogEntry::new(symptoms, self.cycle_day, self.comment.as_deref())
    }
}
