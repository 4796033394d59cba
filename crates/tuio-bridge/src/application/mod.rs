//! Application layer for tuio-bridge.
//!
//! Knows *what* to do with a decoded packet (run it through every zone and
//! collect JSON events) but performs no I/O itself.

pub mod zone_router;

pub use zone_router::{JsonEventSink, ZoneRouter};
