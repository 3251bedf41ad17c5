//! Configuration loading from disk.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::defaults::DefaultsError;
use crate::config::schema::BackendConfig;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to apply defaults: {0}")]
    Defaults(#[from] DefaultsError),
}

/// Document format of a configuration source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigFormat {
    /// Pick the format from the file extension; TOML unless `.json`.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ConfigFormat::Json,
            _ => ConfigFormat::Toml,
        }
    }
}

/// Deserialize a configuration document without applying defaults.
pub fn parse_config(content: &str, format: ConfigFormat) -> Result<BackendConfig, ConfigError> {
    let config = match format {
        ConfigFormat::Toml => toml::from_str(content)?,
        ConfigFormat::Json => serde_json::from_str(content)?,
    };
    Ok(config)
}

/// Load a configuration file and fill in defaults.
pub fn load_config(path: &Path) -> Result<BackendConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut config = parse_config(&content, ConfigFormat::from_path(path))?;

    config.configure_defaults()?;

    tracing::debug!(
        path = %path.display(),
        processors = config.processors.len(),
        stream_processors = config.stream_processors.len(),
        gateways = config.gateways.len(),
        "Configuration loaded"
    );
    Ok(config)
}
