// CLI module - Command-line front end for the log store

mod output;

pub use output::print_error;

use crate::config::{absolutize, Config};
use crate::error::{LogkeepError, Result};
use crate::store::{
    is_valid_severity, parse_timestamp, Level, LogEntry, LogQuery, LogStore,
};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// logkeep - Level and date partitioned log storage
#[derive(Parser)]
#[command(name = "logkeep")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to a TOML or JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Storage root, overrides io.log_directory
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Store one entry per message
    Write {
        /// Messages to store
        #[arg(required = true)]
        messages: Vec<String>,

        /// Log level (DEBUG, INFO, WARN, ERROR, FATAL or 1-5)
        #[arg(short, long)]
        level: String,

        /// Severity from 1 (lowest) to 7 (highest)
        #[arg(short, long, default_value = "1")]
        severity: i64,

        /// Origin of the entry, e.g. a source file or module
        #[arg(short = 'o', long, default_value = "")]
        location: String,
    },

    /// Query stored entries
    Read {
        /// Creation time to search for (RFC 3339 or 2024-01-02T03-04-05Z)
        #[arg(short, long)]
        created_at: String,

        /// Level to search, ALL for every level
        #[arg(short, long, default_value = "ALL")]
        level: String,

        /// Only entries with this severity
        #[arg(short, long)]
        severity: Option<i64>,

        /// Only entries with exactly this message
        #[arg(short, long)]
        message: Option<String>,

        /// Only entries with exactly this location
        #[arg(short = 'o', long)]
        location: Option<String>,

        /// Print entries as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the level registry
    Levels,
}

impl Cli {
    /// Run the CLI application
    pub async fn run() -> Result<()> {
        let cli = Cli::parse();
        cli.execute().await
    }

    /// Execute the parsed command
    async fn execute(&self) -> Result<()> {
        if let Commands::Levels = self.command {
            output::print_levels();
            return Ok(());
        }

        let config = self.load_config()?;
        let store = LogStore::new(config.storage_root());

        match &self.command {
            Commands::Write {
                messages,
                level,
                severity,
                location,
            } => {
                let level: Level = level.parse()?;
                let severity = validate_severity(*severity)?;

                let mut stored = Vec::with_capacity(messages.len());
                for message in messages {
                    let entry = LogEntry::new(level, severity, message.clone(), location.clone());
                    stored.push(store.write(&entry).await?);
                }

                let noun = if stored.len() == 1 { "entry" } else { "entries" };
                output::print_success_msg(&format!("Stored {} {}", stored.len(), noun));
                output::print_entries(&stored);
                output::print_counts(&store.counter().snapshot());
                Ok(())
            }

            Commands::Read {
                created_at,
                level,
                severity,
                message,
                location,
                json,
            } => {
                let query = LogQuery {
                    created_at: Some(parse_created_at(created_at)?),
                    level: level.parse()?,
                    severity: severity.map(validate_severity).transpose()?.unwrap_or(0),
                    message: message.clone().unwrap_or_default(),
                    location: location.clone().unwrap_or_default(),
                };

                let mut entries = store.read(&query).await?;
                if let Some(limit) = config.result_limit() {
                    entries.truncate(limit);
                }

                if *json {
                    output::print_json(&entries)
                } else {
                    output::print_entries(&entries);
                    Ok(())
                }
            }

            Commands::Levels => Ok(()),
        }
    }

    /// Resolve the configuration from `--config`, the env var or the
    /// default path, with `--root` taking precedence over the file
    fn load_config(&self) -> Result<Config> {
        let path = Config::locate(self.config.as_deref());

        let mut config = match &self.root {
            Some(root) if self.config.is_none() && !path.exists() => Config::with_root(root),
            _ => Config::from_file(&path)?,
        };

        if let Some(root) = &self.root {
            config.io.log_directory = absolutize(root)?;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Check a severity is in 1..=7
fn validate_severity(severity: i64) -> Result<u8> {
    u8::try_from(severity)
        .ok()
        .filter(|s| is_valid_severity(*s))
        .ok_or(LogkeepError::InvalidSeverity(severity))
}

/// Parse a timestamp given on the command line
///
/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS` taken as UTC, or the
/// on-disk header format.
fn parse_created_at(raw: &str) -> Result<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Ok(Utc.from_utc_datetime(&naive));
    }

    parse_timestamp(raw).map_err(|_| LogkeepError::InvalidTimestamp(raw.to_string()))
}
