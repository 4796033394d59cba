//! Loads [`AppConfig`] from a TOML file.

use std::path::Path;

use tracing::debug;

use crate::domain::config::{AppConfig, ConfigError};

/// Reads and validates the config at `path`, returning
/// [`AppConfig::default()`] if the file does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// [`ConfigError::Parse`] if the TOML is malformed or a region is invalid, and
/// the errors of [`AppConfig::validate`].
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let cfg = match std::fs::read_to_string(path) {
        Ok(content) => toml::from_str(&content)?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "config file not found; using defaults");
            AppConfig::default()
        }
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    cfg.validate()?;
    Ok(cfg)
}
