//! `civic_map.toml` loading.

use std::path::{Path, PathBuf};

use civic_map_ward_models::CivicMapConfig;
use thiserror::Error;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV_VAR: &str = "CIVIC_MAP_CONFIG";

/// Configuration file used when [`CONFIG_ENV_VAR`] is unset.
pub const DEFAULT_CONFIG_PATH: &str = "civic_map.toml";

/// Errors from reading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("Failed to read config {path}: {source}")]
    Io {
        /// Path that failed.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The file is not valid TOML for [`CivicMapConfig`].
    #[error("Invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Resolves the configuration path: `explicit` if given, otherwise
/// [`CONFIG_ENV_VAR`], otherwise [`DEFAULT_CONFIG_PATH`].
#[must_use]
pub fn config_path(explicit: Option<&Path>) -> PathBuf {
    explicit.map_or_else(
        || {
            std::env::var(CONFIG_ENV_VAR)
                .map_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from)
        },
        Path::to_path_buf,
    )
}

/// Loads the configuration file at `path`.
///
/// A missing file yields the defaults.
///
/// # Errors
///
/// Returns [`ConfigError`] if the file cannot be read or parsed.
pub fn load(path: &Path) -> Result<CivicMapConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(contents) => parse(&contents),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::info!("No config at {}, using defaults", path.display());
            Ok(CivicMapConfig::default())
        }
        Err(source) => Err(ConfigError::Io {
            path: path.display().to_string(),
            source,
        }),
    }
}

/// Parses configuration TOML.
///
/// # Errors
///
/// Returns [`ConfigError::Toml`] if the text is not a valid config.
pub fn parse(contents: &str) -> Result<CivicMapConfig, ConfigError> {
    Ok(toml::de::from_str(contents)?)
}
