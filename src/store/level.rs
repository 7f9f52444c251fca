use crate::error::{LogkeepError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lowest level code that may be attached to a stored entry
pub const MIN_LOG_LEVEL: i64 = 1;
/// Highest level code that may be attached to a stored entry
pub const MAX_LOG_LEVEL: i64 = 5;

/// Coarse log category. Every stored level owns one directory under the
/// storage root; `All` is a query-only wildcard.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
    #[default]
    All = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
    Fatal = 5,
}

impl Level {
    /// Levels that can be written, in directory scan order
    pub const STORED: [Level; 5] = [
        Level::Debug,
        Level::Info,
        Level::Warn,
        Level::Error,
        Level::Fatal,
    ];

    /// Look up a level by its numeric code
    pub fn from_code(code: i64) -> Result<Self> {
        match code {
            0 => Ok(Level::All),
            1 => Ok(Level::Debug),
            2 => Ok(Level::Info),
            3 => Ok(Level::Warn),
            4 => Ok(Level::Error),
            5 => Ok(Level::Fatal),
            other => Err(LogkeepError::InvalidLevel(other)),
        }
    }

    pub fn code(self) -> i64 {
        self as i64
    }

    pub fn name(self) -> &'static str {
        match self {
            Level::All => "ALL",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Fatal => "FATAL",
        }
    }

    /// Whether an entry carrying this level may be stored
    pub fn is_stored(self) -> bool {
        (MIN_LOG_LEVEL..=MAX_LOG_LEVEL).contains(&self.code())
    }

    /// Directory name under the storage root. Same as [`Level::name`].
    pub fn directory(self) -> &'static str {
        self.name()
    }

    /// Directories a query at this level has to scan
    pub fn search_scope(self) -> Vec<Level> {
        if self == Level::All {
            Self::STORED.to_vec()
        } else {
            vec![self]
        }
    }
}

/// Resolve a numeric level to its registry name
pub fn level_name(code: i64) -> Result<&'static str> {
    Level::from_code(code).map(Level::name)
}

/// Resolve a numeric level to the directory it is stored under
pub fn directory_for(code: i64) -> Result<&'static str> {
    Level::from_code(code).map(Level::directory)
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Level {
    type Err = LogkeepError;

    /// Accepts a name (case-insensitive, `WARNING` as an alias of `WARN`)
    /// or a numeric code.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if let Ok(code) = trimmed.parse::<i64>() {
            return Level::from_code(code);
        }

        match trimmed.to_ascii_uppercase().as_str() {
            "ALL" => Ok(Level::All),
            "DEBUG" => Ok(Level::Debug),
            "INFO" => Ok(Level::Info),
            "WARN" | "WARNING" => Ok(Level::Warn),
            "ERROR" => Ok(Level::Error),
            "FATAL" => Ok(Level::Fatal),
            _ => Err(LogkeepError::UnknownLevelName(trimmed.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_names() {
        assert_eq!(level_name(0).unwrap(), "ALL");
        assert_eq!(level_name(1).unwrap(), "DEBUG");
        assert_eq!(level_name(2).unwrap(), "INFO");
        assert_eq!(level_name(3).unwrap(), "WARN");
        assert_eq!(level_name(4).unwrap(), "ERROR");
        assert_eq!(level_name(5).unwrap(), "FATAL");
    }

    #[test]
    fn test_level_out_of_range() {
        assert!(matches!(level_name(6), Err(LogkeepError::InvalidLevel(6))));
        assert!(matches!(level_name(-1), Err(LogkeepError::InvalidLevel(-1))));
        assert!(matches!(directory_for(42), Err(LogkeepError::InvalidLevel(42))));
    }

    #[test]
    fn test_directory_matches_name() {
        for level in Level::STORED {
            assert_eq!(directory_for(level.code()).unwrap(), level.name());
        }
    }

    #[test]
    fn test_all_is_not_stored() {
        assert!(!Level::All.is_stored());
        assert!(Level::STORED.iter().all(|l| l.is_stored()));
    }

    #[test]
    fn test_search_scope() {
        assert_eq!(Level::All.search_scope(), Level::STORED.to_vec());
        assert_eq!(Level::Error.search_scope(), vec![Level::Error]);
    }

    #[test]
    fn test_parse_level() {
        assert_eq!("info".parse::<Level>().unwrap(), Level::Info);
        assert_eq!("WARNING".parse::<Level>().unwrap(), Level::Warn);
        assert_eq!("4".parse::<Level>().unwrap(), Level::Error);
        assert!(matches!(
            "verbose".parse::<Level>(),
            Err(LogkeepError::UnknownLevelName(_))
        ));
        assert!(matches!("9".parse::<Level>(), Err(LogkeepError::InvalidLevel(9))));
    }
}
