use crate::store::level::Level;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lowest valid severity
pub const MIN_SEVERITY: u8 = 1;
/// Highest valid severity
pub const MAX_SEVERITY: u8 = 7;

/// Whether a severity lies in the valid 1..=7 range
pub fn is_valid_severity(severity: u8) -> bool {
    (MIN_SEVERITY..=MAX_SEVERITY).contains(&severity)
}

/// A single stored log entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Set by the store at write time, ignored on input
    pub created_at: Option<DateTime<Utc>>,
    pub level: Level,
    /// Priority 1 (lowest) to 7 (highest), independent of level
    pub severity: u8,
    pub message: String,
    /// Origin of the entry, typically a file or module of the caller
    pub location: String,
}

impl LogEntry {
    /// Build an entry to be written; `created_at` is filled in by the store
    pub fn new(
        level: Level,
        severity: u8,
        message: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            created_at: None,
            level,
            severity,
            message: message.into(),
            location: location.into(),
        }
    }
}

/// Filter criteria for a read. A field left at its zero value does not
/// constrain the match, except `created_at`: an unset timestamp disables
/// the search and yields no results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogQuery {
    pub created_at: Option<DateTime<Utc>>,
    /// `All` scans every level directory
    pub level: Level,
    /// Outside 1..=7 means any severity
    pub severity: u8,
    /// Empty means any message
    pub message: String,
    /// Empty means any location
    pub location: String,
}

impl LogQuery {
    pub fn at(created_at: DateTime<Utc>) -> Self {
        Self {
            created_at: Some(created_at),
            ..Self::default()
        }
    }

    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn severity(mut self, severity: u8) -> Self {
        self.severity = severity;
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// Test a decoded entry against every constraining field
    pub fn matches(&self, entry: &LogEntry) -> bool {
        if let Some(created_at) = self.created_at {
            if entry.created_at != Some(created_at) {
                return false;
            }
        }

        if is_valid_severity(self.severity) && self.severity != entry.severity {
            return false;
        }

        if self.level.is_stored() && self.level != entry.level {
            return false;
        }

        if !self.message.is_empty() && self.message != entry.message {
            return false;
        }

        if !self.location.is_empty() && self.location != entry.location {
            return false;
        }

        true
    }
}
