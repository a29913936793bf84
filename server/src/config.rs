//! Configuration management for the server.

use std::env;
use std::path::PathBuf;

/// Default location of the ledger file.
pub const DEFAULT_DATA_FILE: &str = "inventory.json";

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
    /// JSON file holding the ledger; `None` keeps the ledger in memory only
    pub data_file: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        let port = lookup("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidPort)?;

        let in_memory = match lookup("IN_MEMORY") {
            None => false,
            Some(value) => parse_flag(&value).ok_or(ConfigError::InvalidFlag("IN_MEMORY"))?,
        };

        let data_file = if in_memory {
            None
        } else {
            let path = lookup("DATA_FILE").unwrap_or_else(|| DEFAULT_DATA_FILE.to_string());
            if path.trim().is_empty() {
                return Err(ConfigError::EmptyDataFile);
            }
            Some(PathBuf::from(path))
        };

        Ok(Self {
            host,
            port,
            data_file,
        })
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid PORT value")]
    InvalidPort,

    #[error("Invalid boolean value for {0}")]
    InvalidFlag(&'static str),

    #[error("DATA_FILE must not be empty; set IN_MEMORY=true to run without a file")]
    EmptyDataFile,
}
