//! Configuration layer: typed settings with layered precedence (file → env).

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;


const LOCAL_CONFIG_BASENAME: &str = "foglio";
const ENV_PREFIX: &str = "FOGLIO";

const DEFAULT_CACHE_TTL_SECONDS: u64 = 1200;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 8;
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("configuration error: {0}")]
    Source(#[from] config::ConfigError),
}

/// Root settings for the content repository.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentConfig {
    pub backend: BackendSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Which storage medium backs the repository.
///
/// Both variants satisfy the same lookup/filter contract; deployments pick
/// one here rather than in code.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BackendSettings {
    Files {
        dir: PathBuf,
        #[serde(default = "default_cache_ttl_seconds")]
        cache_ttl_seconds: u64,
    },
    Database {
        url: String,
        #[serde(default = "default_db_max_connections")]
        max_connections: u32,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Json,
    #[default]
    Compact,
}

impl ContentConfig {
    /// Load settings from an optional TOML file, then apply `FOGLIO_*`
    /// environment overrides on top.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigLoadError> {
        let builder = match path {
            Some(path) => Config::builder().add_source(File::from(path)),
            None => Config::builder()
                .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false)),
        };

        builder
            .add_source(
                // Nested keys use "__"; the prefix stays a single underscore
                // (FOGLIO_LOGGING__LEVEL), so pin the prefix separator
                // explicitly instead of inheriting the nesting one.
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
            .map_err(Into::into)
    }
}

fn default_cache_ttl_seconds() -> u64 {
    DEFAULT_CACHE_TTL_SECONDS
}

fn default_db_max_connections() -> u32 {
    DEFAULT_DB_MAX_CONNECTIONS
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}
