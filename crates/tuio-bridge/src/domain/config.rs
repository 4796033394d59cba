//! Bridge configuration schema.
//!
//! [`AppConfig`] is the single source of truth for runtime settings.  It is
//! read from an optional TOML file (see
//! [`crate::infrastructure::config_file`]) and then overridden by CLI flags.
//!
//! ```toml
//! log_level = "debug"
//!
//! [network]
//! bind_address = "0.0.0.0"
//! port = 3333
//!
//! [[zones]]
//! name = "left"
//! region = { x = 0.0, y = 0.0, x2 = 0.5, y2 = 1.0 }
//!
//! [[zones]]
//! name = "right"
//! region = { x = 0.5, y = 0.0, x2 = 1.0, y2 = 1.0 }
//! ```
//!
//! Fields annotated with `#[serde(default = "...")]` fall back to the helper's
//! value when absent, so an empty file is a valid configuration.  Region
//! bounds are validated while deserializing.

use std::collections::HashSet;
use std::net::SocketAddr;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use tuio_core::protocol::messages::TUIO_DEFAULT_PORT;
use tuio_core::Region;

/// Name of the zone used when no zones are configured.
pub const FULL_SURFACE_ZONE: &str = "surface";

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed, including invalid region bounds.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// `bind_address` and `port` do not form a socket address.
    #[error("invalid bind address '{0}'")]
    InvalidBindAddress(String),

    /// Two zones share a name.
    #[error("zone '{0}' is defined more than once")]
    DuplicateZone(String),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level bridge configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    /// `tracing` level used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub network: NetworkConfig,
    /// Logical zones the surface is split into.  Empty means one zone
    /// covering the whole surface.
    #[serde(default)]
    pub zones: Vec<ZoneConfig>,
}

/// Where the UDP listener binds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NetworkConfig {
    /// IP address to bind to.  `"0.0.0.0"` binds all interfaces.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// UDP port TUIO trackers send to.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// One named sub-rectangle of the touch surface.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ZoneConfig {
    pub name: String,
    pub region: Region,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}
fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    TUIO_DEFAULT_PORT
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            network: NetworkConfig::default(),
            zones: Vec::new(),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
        }
    }
}

impl NetworkConfig {
    /// The socket address to bind.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBindAddress`] if `bind_address` is not an
    /// IP address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let raw = format!("{}:{}", self.bind_address, self.port);
        raw.parse().map_err(|_| ConfigError::InvalidBindAddress(raw))
    }
}

impl AppConfig {
    /// Checks constraints that deserialization alone cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBindAddress`] or
    /// [`ConfigError::DuplicateZone`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.network.socket_addr()?;
        let mut seen = HashSet::new();
        for zone in &self.zones {
            if !seen.insert(zone.name.as_str()) {
                return Err(ConfigError::DuplicateZone(zone.name.clone()));
            }
        }
        Ok(())
    }

    /// The zones to run, substituting one full-surface zone when none are
    /// configured.
    pub fn effective_zones(&self) -> Vec<ZoneConfig> {
        if self.zones.is_empty() {
            vec![ZoneConfig {
                name: FULL_SURFACE_ZONE.to_string(),
                region: Region::FULL,
            }]
        } else {
            self.zones.clone()
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_listens_on_tuio_port() {
        // Arrange / Act
        let cfg = AppConfig::default();

        // Assert
        assert_eq!(cfg.network.socket_addr().unwrap().to_string(), "0.0.0.0:3333");
        assert_eq!(cfg.log_level, "info");
        assert!(cfg.zones.is_empty());
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let cfg: AppConfig = toml::from_str("").expect("empty config is valid");
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn test_zones_deserialize_from_inline_tables() {
        // Arrange
        let toml_str = r#"
log_level = "debug"

[network]
port = 4444

[[zones]]
name = "left"
region = { x = 0.0, y = 0.0, x2 = 0.5, y2 = 1.0 }

[[zones]]
name = "right"
region = { x = 0.5, y = 0.0, x2 = 1.0, y2 = 1.0 }
"#;

        // Act
        let cfg: AppConfig = toml::from_str(toml_str).expect("deserialize");

        // Assert
        assert_eq!(cfg.log_level, "debug");
        assert_eq!(cfg.network.port, 4444);
        assert_eq!(cfg.network.bind_address, "0.0.0.0");
        assert_eq!(cfg.zones.len(), 2);
        assert_eq!(cfg.zones[1].name, "right");
        assert_eq!(cfg.zones[1].region, Region::new(0.5, 0.0, 1.0, 1.0).unwrap());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_inverted_region_is_a_parse_error() {
        let toml_str = r#"
[[zones]]
name = "broken"
region = { x = 0.8, y = 0.0, x2 = 0.2, y2 = 1.0 }
"#;
        let result: Result<AppConfig, toml::de::Error> = toml::from_str(toml_str);
        let err = result.expect_err("x >= x2 must be rejected");
        assert!(err.to_string().contains("empty along the x axis"), "got {err}");
    }

    #[test]
    fn test_out_of_range_region_is_rejected() {
        let toml_str = r#"
[[zones]]
name = "big"
region = { x = 0.0, y = 0.0, x2 = 1.5, y2 = 1.0 }
"#;
        assert!(toml::from_str::<AppConfig>(toml_str).is_err());
    }

    #[test]
    fn test_duplicate_zone_names_fail_validation() {
        let mut cfg = AppConfig::default();
        for _ in 0..2 {
            cfg.zones.push(ZoneConfig {
                name: "twin".to_string(),
                region: Region::FULL,
            });
        }
        assert!(matches!(cfg.validate(), Err(ConfigError::DuplicateZone(name)) if name == "twin"));
    }

    #[test]
    fn test_invalid_bind_address_fails_validation() {
        let mut cfg = AppConfig::default();
        cfg.network.bind_address = "not.an.ip".to_string();
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidBindAddress(_))));
    }

    #[test]
    fn test_effective_zones_defaults_to_full_surface() {
        let zones = AppConfig::default().effective_zones();
        assert_eq!(zones.len(), 1);
        assert_eq!(zones[0].name, FULL_SURFACE_ZONE);
        assert_eq!(zones[0].region, Region::FULL);
    }

    #[test]
    fn test_config_round_trips_through_toml() {
        let mut cfg = AppConfig::default();
        cfg.zones.push(ZoneConfig {
            name: "top".to_string(),
            region: Region::new(0.0, 0.0, 1.0, 0.5).unwrap(),
        });

        let text = toml::to_string(&cfg).expect("serialize");
        let restored: AppConfig = toml::from_str(&text).expect("deserialize");

        assert_eq!(cfg, restored);
    }
}
