//! Environment-driven configuration.
//!
//! Database settings use the same variable names as the deployed function app:
//! `SERVER`, `DATABASE`, `USER`, `PASSWORD` and `SSLMODE`.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

const ARTIFACT_DIR_NAME: &str = "station_poller";
const DEFAULT_VENDOR_TIMEOUT_SECS: u64 = 60;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Environment variable {0} is not set")]
    MissingVar(&'static str),

    #[error("Environment variable {name} has an invalid value '{value}'")]
    InvalidVar { name: &'static str, value: String },

    #[error("Could not determine system cache directory")]
    DirResolution,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseConfig {
    pub host: String,
    pub database: String,
    pub username: String,
    pub password: String,
    /// One of the libpq `sslmode` values, e.g. `require`.
    pub ssl_mode: String,
    pub max_connections: u32,
    pub connect_timeout: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PollerConfig {
    pub database: DatabaseConfig,
    /// Where `raw_data.json` and `parsed.data` are written.
    pub artifact_dir: PathBuf,
    /// Base URL of the vendor-API gateway, if polls go over HTTP.
    pub gateway_url: Option<String>,
    pub vendor_timeout: Duration,
}

impl PollerConfig {
    /// Loads configuration from the process environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env file is fine; real deployments set the variables directly.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads configuration through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &'static str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let require = |name: &'static str| get(name).ok_or(ConfigError::MissingVar(name));
        let seconds = |name: &'static str, default: u64| match get(name) {
            None => Ok(Duration::from_secs(default)),
            Some(value) => value
                .parse()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::InvalidVar { name, value }),
        };

        let database = DatabaseConfig {
            host: require("SERVER")?,
            database: require("DATABASE")?,
            username: require("USER")?,
            password: require("PASSWORD")?,
            ssl_mode: require("SSLMODE")?,
            max_connections: 1,
            connect_timeout: seconds("DATABASE_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS)?,
        };

        let artifact_dir = match get("ARTIFACT_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => default_artifact_dir()?,
        };

        Ok(Self {
            database,
            artifact_dir,
            gateway_url: get("VENDOR_GATEWAY_URL"),
            vendor_timeout: seconds("VENDOR_TIMEOUT_SECS", DEFAULT_VENDOR_TIMEOUT_SECS)?,
        })
    }
}

pub fn default_artifact_dir() -> Result<PathBuf, ConfigError> {
    dirs::cache_dir()
        .map(|dir| dir.join(ARTIFACT_DIR_NAME))
        .ok_or(ConfigError::DirResolution)
}
