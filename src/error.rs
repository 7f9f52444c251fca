use thiserror::Error;

/// Main error type for the logkeep store
#[derive(Debug, Error)]
pub enum LogkeepError {
    // Entry validation errors
    #[error("Invalid log level: {0} (expected 0 to 5)")]
    InvalidLevel(i64),

    #[error("Unknown log level name: {0}")]
    UnknownLevelName(String),

    #[error("Invalid severity: {0} (expected 1 to 7)")]
    InvalidSeverity(i64),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    // Codec errors
    #[error("Malformed log line: {0}")]
    MalformedLine(String),

    // Storage errors
    #[error("Storage IO error: {0}")]
    StorageIo(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid configuration file: {0}")]
    InvalidConfig(String),

    #[error("Missing required configuration field: {0}")]
    MissingConfigField(String),

    #[error("Configuration validation failed: {0}")]
    ConfigValidationError(String),

    // IO errors (automatically converted from std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for logkeep operations
pub type Result<T> = std::result::Result<T, LogkeepError>;
