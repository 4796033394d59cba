//! Domain layer for tuio-bridge.
//!
//! Pure types with no I/O: the configuration schema and the JSON records the
//! bridge emits.  Reading the config file happens in the infrastructure layer.

pub mod config;
pub mod messages;

pub use config::{AppConfig, ConfigError, NetworkConfig, ZoneConfig};
pub use messages::{TouchEventJson, TouchJson};
