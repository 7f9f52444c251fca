use crate::error::{LogkeepError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming the config file
pub const CONFIG_PATH_ENV: &str = "LOGKEEP_CONFIG_PATH";

/// Config file used when neither a flag nor the env var names one
pub const DEFAULT_CONFIG_PATH: &str = "config/config.toml";

/// Service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    pub io: IoConfig,

    #[serde(default)]
    pub results: ResultsConfig,
}

/// Settings for the HTTP front end. Not read by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: String,

    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            allowed_origins: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IoConfig {
    /// Storage root; level directories are created beneath it
    pub log_directory: PathBuf,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultsConfig {
    /// Maximum entries rendered per read, 0 for no limit
    #[serde(default)]
    pub limit: u64,
}

fn default_port() -> String {
    "8080".to_string()
}

impl Config {
    /// Build a config that only names a storage root
    pub fn with_root<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            io: IoConfig {
                log_directory: root.into(),
            },
            ..Self::default()
        }
    }

    /// Pick the config file: explicit path, then the env var, then the default
    pub fn locate(explicit: Option<&Path>) -> PathBuf {
        if let Some(path) = explicit {
            return path.to_path_buf();
        }

        match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.is_empty() => PathBuf::from(path),
            _ => PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Load a configuration file (supports TOML and JSON)
    pub fn from_file(path: &Path) -> Result<Config> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            LogkeepError::ConfigError(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        let extension = path.extension().and_then(|s| s.to_str()).unwrap_or("");

        let mut config = match extension {
            "toml" => Self::parse_toml(&contents)?,
            "json" => Self::parse_json(&contents)?,
            _ => {
                return Err(LogkeepError::InvalidConfig(format!(
                    "Unsupported file format: {}. Use .toml or .json",
                    extension
                )))
            }
        };

        config.io.log_directory = expand_env_in_path(&config.io.log_directory);
        config.validate()?;
        config.io.log_directory = absolutize(&config.io.log_directory)?;

        Ok(config)
    }

    fn parse_toml(contents: &str) -> Result<Config> {
        toml::from_str(contents)
            .map_err(|e| LogkeepError::InvalidConfig(format!("Failed to parse TOML: {}", e)))
    }

    fn parse_json(contents: &str) -> Result<Config> {
        serde_json::from_str(contents)
            .map_err(|e| LogkeepError::InvalidConfig(format!("Failed to parse JSON: {}", e)))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.io.log_directory.as_os_str().is_empty() {
            return Err(LogkeepError::MissingConfigField(
                "io.log_directory".to_string(),
            ));
        }

        if self.io.log_directory.is_file() {
            return Err(LogkeepError::ConfigValidationError(format!(
                "Log directory is a file: {}",
                self.io.log_directory.display()
            )));
        }

        if self.server.port.parse::<u16>().is_err() {
            return Err(LogkeepError::ConfigValidationError(format!(
                "Invalid port: {}",
                self.server.port
            )));
        }

        Ok(())
    }

    /// Storage root for the store
    pub fn storage_root(&self) -> &Path {
        &self.io.log_directory
    }

    /// Result limit as an optional count
    pub fn result_limit(&self) -> Option<usize> {
        match self.results.limit {
            0 => None,
            limit => Some(limit as usize),
        }
    }
}

/// Make a path absolute against the current directory
pub fn absolutize(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }

    let cwd = std::env::current_dir().map_err(|e| {
        LogkeepError::ConfigError(format!("Failed to resolve current directory: {}", e))
    })?;
    Ok(cwd.join(path))
}

/// Expand `$VAR` and `${VAR}` references in a string
fn expand_env_in_string(s: &str) -> String {
    let mut result = s.to_string();

    for (key, value) in std::env::vars() {
        result = result.replace(&format!("${{{}}}", key), &value);
        result = result.replace(&format!("${}", key), &value);
    }

    result
}

fn expand_env_in_path(path: &Path) -> PathBuf {
    PathBuf::from(expand_env_in_string(&path.to_string_lossy()))
}
