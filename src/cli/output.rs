// Output formatting and display for CLI

use crate::error::{LogkeepError, Result};
use crate::store::{format_timestamp, Level, LogEntry};
use colored::*;
use std::collections::BTreeMap;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

/// Print an error message to stderr
pub fn print_error(error: &str) {
    eprintln!("{} {}", "✗ Error:".red().bold(), error);
}

/// Print a success message
pub fn print_success_msg(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print entries as a table
pub fn print_entries(entries: &[LogEntry]) {
    if entries.is_empty() {
        println!("{}", "No matching log entries".yellow());
        return;
    }

    #[derive(Tabled)]
    struct EntryRow {
        #[tabled(rename = "Created")]
        created: String,
        #[tabled(rename = "Level")]
        level: String,
        #[tabled(rename = "Severity")]
        severity: u8,
        #[tabled(rename = "Location")]
        location: String,
        #[tabled(rename = "Message")]
        message: String,
    }

    let rows: Vec<EntryRow> = entries
        .iter()
        .map(|e| EntryRow {
            created: e
                .created_at
                .as_ref()
                .map(format_timestamp)
                .unwrap_or_else(|| "-".to_string()),
            level: format_level_colored(e.level),
            severity: e.severity,
            location: truncate(&e.location, 24),
            message: truncate(&e.message, 60),
        })
        .collect();

    let mut table = Table::new(rows);
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));

    println!("\n{}\n", table);
    println!(
        "{}",
        format!("Total: {} entr{}", entries.len(), if entries.len() == 1 { "y" } else { "ies" })
            .dimmed()
            .italic()
    );
}

/// Print entries as pretty JSON
pub fn print_json(entries: &[LogEntry]) -> Result<()> {
    let json = serde_json::to_string_pretty(entries)
        .map_err(|e| LogkeepError::SerializationError(e.to_string()))?;
    println!("{}", json);
    Ok(())
}

/// Print the per-level write counters
pub fn print_counts(counts: &BTreeMap<Level, u64>) {
    let summary: Vec<String> = counts
        .iter()
        .map(|(level, count)| format!("{}={}", format_level_colored(*level), count))
        .collect();
    println!("  {}: {}", "Written".bold(), summary.join(" "));
}

/// Print every level with its numeric code
pub fn print_levels() {
    println!("\n{}", "Levels".bold().underline());
    println!();
    println!("  {:<6} {}", "0".bold(), "ALL (query only)".dimmed());
    for level in Level::STORED {
        println!("  {:<6} {}", level.code().to_string().bold(), format_level_colored(level));
    }
    println!();
}

fn format_level_colored(level: Level) -> String {
    match level {
        Level::All => level.name().normal().to_string(),
        Level::Debug => level.name().dimmed().to_string(),
        Level::Info => level.name().blue().to_string(),
        Level::Warn => level.name().yellow().to_string(),
        Level::Error => level.name().red().to_string(),
        Level::Fatal => level.name().red().bold().to_string(),
    }
}

/// Truncate a string to a maximum length, adding an ellipsis if needed
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
