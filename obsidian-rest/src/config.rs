//! Configuration loaded from the environment
//!
//! All settings come from environment variables, optionally seeded from a
//! `.env` file. Only `OBSIDIAN_API_KEY` is required.

use std::path::Path;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 27124;
pub const DEFAULT_PROTOCOL: &str = "https";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Configuration error, raised only at startup
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },

    #[error("Failed to load env file {path}: {message}")]
    EnvFile { path: String, message: String },
}

/// Connection settings for the Local REST API
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionProfile {
    pub api_key: String,
    pub host: String,
    pub port: u16,
    pub protocol: String,
    pub verify_ssl: bool,
    pub timeout: Duration,
}

impl ConnectionProfile {
    /// Profile with default host, port and protocol for the given key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            protocol: DEFAULT_PROTOCOL.to_string(),
            verify_ssl: false,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.protocol, self.host, self.port)
    }
}

/// Process configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub connection: ConnectionProfile,
    pub log_level: String,
    pub debug: bool,
}

impl Config {
    /// Load `.env` (or `env_file` when given), then read the environment
    pub fn load(env_file: Option<&Path>) -> Result<Self, ConfigError> {
        match env_file {
            Some(path) => {
                dotenvy::from_path(path).map_err(|e| ConfigError::EnvFile {
                    path: path.display().to_string(),
                    message: e.to_string(),
                })?;
            }
            None => {
                // A missing .env is fine
                dotenvy::dotenv().ok();
            }
        }
        Self::from_env()
    }

    /// Read configuration from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("OBSIDIAN_API_KEY")
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing("OBSIDIAN_API_KEY"))?;

        let host = lookup("OBSIDIAN_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match lookup("OBSIDIAN_PORT") {
            Some(value) => value.trim().parse::<u16>().map_err(|_| ConfigError::Invalid {
                name: "OBSIDIAN_PORT",
                value,
            })?,
            None => DEFAULT_PORT,
        };

        let protocol = lookup("OBSIDIAN_PROTOCOL")
            .map(|p| p.to_lowercase())
            .unwrap_or_else(|| DEFAULT_PROTOCOL.to_string());
        if protocol != "http" && protocol != "https" {
            return Err(ConfigError::Invalid {
                name: "OBSIDIAN_PROTOCOL",
                value: protocol,
            });
        }

        let timeout = match lookup("OBSIDIAN_TIMEOUT") {
            Some(value) => value.trim().parse::<u64>().map_err(|_| ConfigError::Invalid {
                name: "OBSIDIAN_TIMEOUT",
                value,
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let verify_ssl = flag(lookup("OBSIDIAN_VERIFY_SSL"));
        let debug = flag(lookup("DEBUG"));
        let log_level = lookup("LOG_LEVEL")
            .map(|l| l.to_lowercase())
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        Ok(Config {
            connection: ConnectionProfile {
                api_key,
                host,
                port,
                protocol,
                verify_ssl,
                timeout: Duration::from_secs(timeout),
            },
            log_level,
            debug,
        })
    }

    /// Log filter directive, `debug` when the debug flag is set
    pub fn log_filter(&self) -> &str {
        if self.debug {
            "debug"
        } else {
            &self.log_level
        }
    }
}

fn flag(value: Option<String>) -> bool {
    value.is_some_and(|v| v.eq_ignore_ascii_case("true"))
}
