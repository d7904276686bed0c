//! Configuration file support for promptbase.
//!
//! Loads `promptbase.toml` from the working directory (or `--config`) and
//! merges it under command-line flags and environment variables.

use anyhow::{anyhow, Context, Result};
use promptbase_logging::LogFormat;
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;

/// The config file name
pub const CONFIG_FILE_NAME: &str = "promptbase.toml";

pub const DEFAULT_PORT: u16 = 8501;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Settings read from `promptbase.toml`
#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Connection string of the prompt store
    pub database_url: Option<String>,
    /// Address to listen on
    pub bind: Option<IpAddr>,
    pub port: Option<u16>,
    pub log_level: Option<String>,
    /// `pretty`, `json` or `compact`
    pub log_format: Option<String>,
}

impl FileConfig {
    /// Load configuration from `path`.
    ///
    /// Returns:
    /// - `Ok(Some(config))` if file exists and parses successfully
    /// - `Ok(None)` if file does not exist
    /// - `Err(...)` if file exists but fails to parse (hard error)
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let config: FileConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        Ok(Some(config))
    }
}

/// Values given on the command line (or through their environment variables).
#[derive(Debug, Default)]
pub struct Overrides {
    pub database_url: Option<String>,
    pub bind: Option<IpAddr>,
    pub port: Option<u16>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
}

/// Effective settings after merging every source.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// `None` when no source provided one; opening the store then fails.
    pub database_url: Option<String>,
    pub addr: SocketAddr,
    pub log_level: String,
    pub log_format: LogFormat,
}

impl Settings {
    /// Priority: command line / environment > config file > defaults
    ///
    /// Fails when the file names a log format that does not exist.
    pub fn resolve(overrides: Overrides, file: Option<FileConfig>) -> Result<Self> {
        let file = file.unwrap_or_default();

        let database_url = overrides
            .database_url
            .or(file.database_url)
            .filter(|url| !url.trim().is_empty());
        let bind = overrides
            .bind
            .or(file.bind)
            .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST));
        let port = overrides.port.or(file.port).unwrap_or(DEFAULT_PORT);
        let log_level = overrides
            .log_level
            .or(file.log_level)
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());
        let log_format = match (overrides.log_format, file.log_format) {
            (Some(format), _) => format,
            (None, Some(name)) => name
                .parse::<LogFormat>()
                .map_err(|e| anyhow!("Invalid log_format in config file: {}", e))?,
            (None, None) => LogFormat::default(),
        };

        Ok(Self {
            database_url,
            addr: SocketAddr::new(bind, port),
            log_level,
            log_format,
        })
    }
}
