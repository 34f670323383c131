mod record;
mod render;

use std::path::PathBuf;

use chrono::Local;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::services::{Aggregator, LogStore};
use crate::types::{parse_log_date, Result, SymtrackError, DATETIME_FORMAT, DATE_FORMAT};
use record::RecordArgs;

/// Personal symptom log with dashboard statistics
#[derive(Parser)]
#[command(name = "symtrack")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Config file (default: ~/.symtrack/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Symptom log file
    #[arg(long, global = true, env = "SYMTRACK_DATA_FILE", value_name = "PATH")]
    data_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Record symptoms for a date (replaces that date's entry)
    Log(RecordArgs),

    /// Show the entries for a date
    Show {
        /// Date to show (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List all logged dates
    Dates {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show dashboard statistics (default)
    Dashboard {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show when a symptom occurred over time
    Trend {
        /// Symptom name (case-insensitive substring match)
        symptom: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show symptom patterns per cycle day
    Cycles {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Report where the log lives and whether it exists
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Serialize)]
struct StatusReport {
    status: &'static str,
    timestamp: String,
    data_file: PathBuf,
    data_file_exists: bool,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        let Cli {
            config,
            data_file,
            verbose,
            quiet,
            command,
        } = self;

        let config = Config::load(config.as_deref())?;
        init_logging(log_level(verbose || config.verbose, quiet));

        let store = LogStore::new(config.data_file(data_file)?);
        debug!("Using log file {}", store.path().display());

        match command.unwrap_or(Commands::Dashboard { json: false }) {
            Commands::Log(args) => args.run(&store)?,
            Commands::Show { date, json } => {
                let date = match date {
                    Some(d) => validated_date(d)?,
                    None => today(),
                };
                let day = store.entries_for(&date);
                if json {
                    print_json(&day)?;
                } else {
                    print!("{}", render::day(&date, &day));
                }
            }
            Commands::Dates { json } => {
                let dates = store.dates();
                if json {
                    print_json(&dates)?;
                } else {
                    for date in dates {
                        println!("{}", date);
                    }
                }
            }
            Commands::Dashboard { json } => {
                let stats = Aggregator::dashboard(&store.load());
                if json {
                    print_json(&stats)?;
                } else {
                    print!("{}", render::dashboard(&stats));
                }
            }
            Commands::Trend { symptom, json } => {
                let trend = Aggregator::symptom_trend(&store.load(), &symptom);
                if json {
                    print_json(&trend)?;
                } else {
                    print!("{}", render::trend(&symptom, &trend));
                }
            }
            Commands::Cycles { json } => {
                let analysis = Aggregator::cycle_day_analysis(&store.load());
                if json {
                    print_json(&analysis)?;
                } else {
                    print!("{}", render::cycles(&analysis));
                }
            }
            Commands::Status { json } => {
                let report = StatusReport {
                    status: "healthy",
                    timestamp: Local::now().format(DATETIME_FORMAT).to_string(),
                    data_file: store.path().to_path_buf(),
                    data_file_exists: store.exists(),
                };
                if json {
                    print_json(&report)?;
                } else {
                    println!("status:      {}", report.status);
                    println!("timestamp:   {}", report.timestamp);
                    println!("data file:   {}", report.data_file.display());
                    println!("file exists: {}", report.data_file_exists);
                }
            }
        }

        Ok(())
    }
}

/// Returns the log level based on verbosity flags.
fn log_level(verbose: bool, quiet: bool) -> tracing::Level {
    if quiet {
        tracing::Level::ERROR
    } else if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    }
}

/// Compact stderr logging; `RUST_LOG` overrides the flag-derived level.
fn init_logging(level: tracing::Level) {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}

fn today() -> String {
    Local::now().format(DATE_FORMAT).to_string()
}

fn validated_date(date: String) -> Result<String> {
    if parse_log_date(&date).is_some() {
        Ok(date)
    } else {
        Err(SymtrackError::InvalidInput(format!(
            "date '{}' is not a valid YYYY-MM-DD date",
            date
        )))
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json =
        serde_json::to_string_pretty(value).map_err(|e| SymtrackError::Parse(e.to_string()))?;
    println!("{}", json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_no_args() {
        let cli = Cli::try_parse_from(["symtrack"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_cli_parse_dashboard_json() {
        let cli = Cli::try_parse_from(["symtrack", "dashboard", "--json"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Dashboard { json: true })
        ));
    }

    #[test]
    fn test_cli_parse_trend() {
        let cli = Cli::try_parse_from(["symtrack", "trend", "head"]).unwrap();
        match cli.command {
            Some(Commands::Trend { symptom, json }) => {
                assert_eq!(symptom, "head");
                assert!(!json);
            }
            _ => panic!("expected trend command"),
        }
    }

    #[test]
    fn test_cli_parse_trend_requires_symptom() {
        assert!(Cli::try_parse_from(["symtrack", "trend"]).is_err());
    }

    #[test]
    fn test_cli_parse_global_data_file_after_subcommand() {
        let cli =
            Cli::try_parse_from(["symtrack", "cycles", "--data-file", "/tmp/log.json"]).unwrap();
        assert_eq!(cli.data_file, Some(PathBuf::from("/tmp/log.json")));
        assert!(matches!(cli.command, Some(Commands::Cycles { json: false })));
    }

    #[test]
    fn test_cli_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["symtrack", "-v", "-q", "dates"]).is_err());
    }

    #[test]
    fn test_log_level() {
        assert_eq!(log_level(false, false), tracing::Level::INFO);
        assert_eq!(log_level(true, false), tracing::Level::DEBUG);
        assert_eq!(log_level(true, true), tracing::Level::ERROR);
    }

    #[test]
    fn test_validated_date() {
        assert_eq!(validated_date("2025-10-03".into()).unwrap(), "2025-10-03");
        assert!(validated_date("10/03/2025".into()).is_err());
    }
}
