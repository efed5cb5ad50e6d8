//! # Config Loader
//!
//! Reads the optional `config.toml` that sets the default parser and runner
//! options. Every key may be omitted; unknown keys are rejected so typos surface.

use crate::{
    constants::{CONFIG_DIR_NAME, CONFIG_FILENAME, CONFIG_PATH_ENV},
    models::ShellConfig,
};
use std::{
    ffi::OsString,
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Represents errors that can occur while loading the configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("Could not read config file at '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid TOML or does not match the expected layout.
    #[error("Failed to parse TOML file at '{path}': {source}")]
    TomlParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    /// Inline TOML content could not be parsed.
    #[error("Invalid configuration: {0}")]
    InvalidToml(#[from] toml::de::Error),
}

/// Parses configuration from TOML text.
pub fn parse_config(content: &str) -> Result<ShellConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Loads the configuration stored at `path`.
pub fn load_config(path: &Path) -> Result<ShellConfig, ConfigError> {
    log::debug!("Loading configuration from '{}'", path.display());
    let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Like [`load_config`], but a missing file yields the default configuration.
pub fn load_config_or_default(path: &Path) -> Result<ShellConfig, ConfigError> {
    if !path.exists() {
        log::warn!(
            "Config file '{}' not found, using defaults.",
            path.display()
        );
        return Ok(ShellConfig::default());
    }
    load_config(path)
}

/// `$TYPESHELL_CONFIG` if set, else `<config dir>/typeshell/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    resolve_config_path(std::env::var_os(CONFIG_PATH_ENV), dirs::config_dir())
}

/// Picks the config file from an override value and the system config directory.
/// An empty override counts as unset.
pub fn resolve_config_path(
    override_path: Option<OsString>,
    config_dir: Option<PathBuf>,
) -> Option<PathBuf> {
    match override_path {
        Some(path) if !path.is_empty() => Some(PathBuf::from(path)),
        _ => config_dir.map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILENAME)),
    }
}
