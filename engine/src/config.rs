//! Loading checker settings from a TOML document.
//!
//! Hosts keep per-user plugin settings in a small TOML file. A missing
//! file is not an error; the plugin runs with the stock mypy settings
//! until the user writes one. Read and parse failures are reported so
//! the host can warn and fall back to [`CheckerConfig::default`].

use std::io;
use std::path::Path;

use sidelight_types::CheckerConfig;

/// Failure while reading or parsing a settings file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("reading config: {0}")]
    Read(#[from] io::Error),
    /// The document is not valid TOML or fails [`CheckerConfig`] validation.
    #[error("parsing config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Parses a TOML document into a [`CheckerConfig`].
///
/// An empty document yields the defaults. Unknown keys are ignored so a
/// settings file shared with other plugins still parses.
pub fn parse_config(text: &str) -> Result<CheckerConfig, ConfigError> {
    Ok(toml::from_str(text)?)
}

/// Loads checker settings from `path`.
///
/// A missing file yields the default configuration.
pub fn load_config(path: &Path) -> Result<CheckerConfig, ConfigError> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            tracing::debug!("No config at {:?}, using defaults", path);
            return Ok(CheckerConfig::default());
        }
        Err(err) => {
            tracing::warn!("Failed to read config at {:?}: {err}", path);
            return Err(err.into());
        }
    };

    match parse_config(&text) {
        Ok(config) => Ok(config),
        Err(err) => {
            tracing::warn!("Failed to parse config at {:?}: {err}", path);
            Err(err)
        }
    }
}
