//! Environment-driven server configuration.
//!
//! Every setting has a default; only malformed values are errors.

use cubetime_core::default_log_level;
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

pub const HOST_VAR: &str = "CUBETIME_HOST";
pub const PORT_VAR: &str = "CUBETIME_PORT";
pub const DB_PATH_VAR: &str = "CUBETIME_DB_PATH";
pub const LOG_LEVEL_VAR: &str = "CUBETIME_LOG_LEVEL";
pub const LOG_DIR_VAR: &str = "CUBETIME_LOG_DIR";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_DB_PATH: &str = "cubetime.sqlite3";
const DEFAULT_LOG_DIR_NAME: &str = "logs";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid {key} value `{value}`: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("cannot resolve working directory for default log dir: {0}")]
    WorkingDir(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub log_level: String,
    pub log_dir: PathBuf,
}

impl Config {
    /// Loads settings from the process environment (after `.env`, if any).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads settings through `lookup`, which returns `None` for unset keys.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let port = match read(PORT_VAR) {
            Some(value) => value.parse::<u16>().map_err(|err| ConfigError::Invalid {
                key: PORT_VAR,
                value: value.clone(),
                reason: err.to_string(),
            })?,
            None => DEFAULT_PORT,
        };

        let log_dir = match read(LOG_DIR_VAR) {
            Some(value) => {
                let path = PathBuf::from(&value);
                if !path.is_absolute() {
                    return Err(ConfigError::Invalid {
                        key: LOG_DIR_VAR,
                        value,
                        reason: "must be an absolute path".to_string(),
                    });
                }
                path
            }
            None => env::current_dir()?.join(DEFAULT_LOG_DIR_NAME),
        };

        Ok(Self {
            host: read(HOST_VAR).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            db_path: read(DB_PATH_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH)),
            log_level: read(LOG_LEVEL_VAR).unwrap_or_else(|| default_log_level().to_string()),
            log_dir,
        })
    }

    /// Socket address the HTTP listener binds to.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let raw = format!("{}:{}", self.host, self.port);
        raw.parse().map_err(|err: std::net::AddrParseError| ConfigError::Invalid {
            key: HOST_VAR,
            value: self.host.clone(),
            reason: err.to_string(),
        })
    }
}
