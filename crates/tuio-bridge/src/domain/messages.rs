//! JSON records written for every dispatched touch change.
//!
//! One [`TouchEventJson`] is produced per zone and phase of a tick and written
//! as a single line:
//!
//! ```json
//! {"zone":"left","type":"touchstart","changed":[{"id":12,"source":0,"session":12,"x":0.52,"y":0.06,"vx":0.0,"vy":0.0,"accel":0.0,"target":null}],"touches":[…]}
//! ```
//!
//! `type` uses the DOM touch-event names so a browser-side consumer can
//! forward records without translation.

use serde::{Deserialize, Serialize};

use tuio_core::{Touch, TouchPhase};

/// A single touch as seen by event consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TouchJson {
    /// Globally unique touch id (source index and session id packed).
    pub id: u64,
    /// Registry index of the source that reported the touch.
    pub source: u32,
    /// Session id as sent by the tracker.
    pub session: i32,
    /// Position in zone-local coordinates (0..1).
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub accel: f32,
    /// Cached dispatch target, if one was resolved.
    pub target: Option<u64>,
}

impl From<&Touch> for TouchJson {
    fn from(touch: &Touch) -> Self {
        Self {
            id: touch.id.raw(),
            source: touch.id.source_index().0,
            session: touch.id.session_id(),
            x: touch.x,
            y: touch.y,
            vx: touch.vx,
            vy: touch.vy,
            accel: touch.accel,
            target: touch.target.map(|t| t.0),
        }
    }
}

/// One dispatched phase of one zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TouchEventJson {
    pub zone: String,
    #[serde(rename = "type")]
    pub phase: TouchPhase,
    /// Touches affected by this event.
    pub changed: Vec<TouchJson>,
    /// Every live touch of the zone after the tick.
    pub touches: Vec<TouchJson>,
}

// ── Tests ─────────────────────────────────────────────────────────────────────
