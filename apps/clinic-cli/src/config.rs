//! Centralized configuration for the clinic CLI.
//!
//! Environment variables are loaded and validated at startup so that a bad
//! seed path fails before any command runs.

use std::env;
use std::path::PathBuf;

/// Log output format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    fn from_str(s: &str) -> Self {
        if s.eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Pretty
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
#[error("Configuration error for {field}: {message}")]
pub struct ConfigError {
    pub field: &'static str,
    pub message: String,
}

/// CLI configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Log format (`LOG_FORMAT`, default pretty)
    pub log_format: LogFormat,
    /// JSON seed file (`SEED_PATH`); the bundled demo data is used when unset
    pub seed_path: Option<PathBuf>,
}

impl Config {
    /// Load and validate configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(env::var("LOG_FORMAT").ok(), env::var("SEED_PATH").ok())
    }

    fn from_vars(log_format: Option<String>, seed_path: Option<String>) -> Result<Self, ConfigError> {
        let log_format = LogFormat::from_str(log_format.as_deref().unwrap_or("pretty"));

        let seed_path = seed_path.filter(|s| !s.is_empty()).map(PathBuf::from);
        if let Some(path) = &seed_path {
            if !path.is_file() {
                return Err(ConfigError {
                    field: "SEED_PATH",
                    message: format!("'{}' is not a readable file", path.display()),
                });
            }
        }

        Ok(Self {
            log_format,
            seed_path,
        })
    }
}
