//! Zone routing: one touch pipeline per configured zone.
//!
//! Every packet is offered to every zone.  Each zone applies its own region
//! transform and keeps its own lifecycle state, so a finger crossing from one
//! zone into another ends in the first and starts in the second.
//!
//! ```text
//!                  ┌──► zone "left"  (Region, LifecycleEngine) ──┐
//! OscPacket ───────┤                                              ├──► Vec<TouchEventJson>
//!                  └──► zone "right" (Region, LifecycleEngine) ──┘
//! ```
//!
//! Everything here is synchronous and free of I/O; the infrastructure layer
//! owns the socket and the output stream.

use tracing::debug;

use tuio_core::protocol::messages::OscPacket;
use tuio_core::{Frame, Region, Touch, TouchPhase, TouchPipeline, TouchSink};

use crate::domain::config::ZoneConfig;
use crate::domain::messages::{TouchEventJson, TouchJson};

/// A [`TouchSink`] that turns dispatch calls into [`TouchEventJson`] records
/// for one zone.
pub struct JsonEventSink<'a> {
    zone: &'a str,
    events: &'a mut Vec<TouchEventJson>,
}

impl<'a> JsonEventSink<'a> {
    pub fn new(zone: &'a str, events: &'a mut Vec<TouchEventJson>) -> Self {
        Self { zone, events }
    }
}

impl TouchSink for JsonEventSink<'_> {
    fn dispatch(&mut self, phase: TouchPhase, changed: &[Touch], live: &[Touch]) {
        self.events.push(TouchEventJson {
            zone: self.zone.to_string(),
            phase,
            changed: changed.iter().map(TouchJson::from).collect(),
            touches: live.iter().map(TouchJson::from).collect(),
        });
    }
}

struct Zone {
    name: String,
    pipeline: TouchPipeline,
}

/// Fans packets out to the configured zones.
pub struct ZoneRouter {
    zones: Vec<Zone>,
}

impl ZoneRouter {
    /// Builds one pipeline per zone.  A zone covering the whole surface gets
    /// no transform at all.
    pub fn new(zones: &[ZoneConfig]) -> Self {
        let zones = zones
            .iter()
            .map(|zone| {
                let pipeline = if zone.region == Region::FULL {
                    TouchPipeline::new()
                } else {
                    TouchPipeline::with_region(zone.region)
                };
                debug!(zone = %zone.name, region = ?zone.region, "zone configured");
                Zone {
                    name: zone.name.clone(),
                    pipeline,
                }
            })
            .collect();
        Self { zones }
    }

    pub fn zone_names(&self) -> impl Iterator<Item = &str> {
        self.zones.iter().map(|z| z.name.as_str())
    }

    /// Offers one decoded packet from `origin` to every zone and returns the
    /// resulting events, zone by zone in configuration order.
    pub fn route(&mut self, origin: &str, packet: &OscPacket) -> Vec<TouchEventJson> {
        let mut events = Vec::new();
        match packet {
            OscPacket::Bundle(bundle) => {
                let frame = Frame::from_bundle(bundle);
                for zone in &mut self.zones {
                    let mut sink = JsonEventSink::new(&zone.name, &mut events);
                    zone.pipeline.submit_frame(&frame, &mut sink);
                }
            }
            OscPacket::Message(msg) => {
                for zone in &mut self.zones {
                    let mut sink = JsonEventSink::new(&zone.name, &mut events);
                    zone.pipeline.submit_message(origin, msg, &mut sink);
                }
            }
        }
        events
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
