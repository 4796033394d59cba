//! Infrastructure layer for tuio-bridge.
//!
//! Everything that performs I/O: reading the config file, the UDP socket,
//! and writing events to stdout.

pub mod config_file;
pub mod event_writer;
pub mod udp_listener;

pub use config_file::load_config;
pub use udp_listener::{run_bridge, serve, Inbound};
