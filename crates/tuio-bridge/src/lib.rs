//! tuio-bridge library crate.
//!
//! Listens for TUIO 2D-cursor traffic on UDP, runs it through one
//! [`tuio_core::TouchPipeline`] per configured zone and writes the resulting
//! touch events to stdout as JSON lines.
//!
//! # Architecture (clean architecture)
//!
//! ```text
//! TUIO tracker (OSC over UDP)
//!         ↓
//! [tuio-bridge]
//!   ├── domain/           AppConfig schema, TouchEventJson
//!   ├── application/      ZoneRouter: packet → per-zone pipelines → events
//!   └── infrastructure/
//!         ├── config_file/   TOML loading
//!         ├── udp_listener/  receive loop + single pipeline task
//!         └── event_writer/  JSON lines
//!         ↓
//! stdout
//! ```
//!
//! - `domain` has no I/O.
//! - `application` depends on `domain` and `tuio-core` only.
//! - `infrastructure` depends on all other layers plus `tokio`.

/// Domain layer: configuration and event types (no I/O).
pub mod domain;

/// Application layer: zone routing.
pub mod application;

/// Infrastructure layer: config file, UDP socket and output.
pub mod infrastructure;
