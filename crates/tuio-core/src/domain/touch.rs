//! Touch point entity and its lifecycle states.

use serde::{Deserialize, Serialize};

use crate::domain::identity::TouchId;
use crate::protocol::messages::CursorSet;

/// Coordinate value of a touch that has been declared alive but has not yet
/// received a `set` message.
pub const UNPLACED: f32 = -1.0;

/// Where a touch is in its lifecycle.
///
/// ```text
/// New ──(reported as started)──► Active ──(missing from alive)──► Dead
///                                                                  │
///                                          (reported as ended, removed)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TouchState {
    /// Created this tick; not yet reported.
    New,
    /// Reported as started; still listed by its source.
    Active,
    /// No longer listed by its source; reported as ended on this tick.
    Dead,
}

/// The three kinds of change a tick can report, in emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TouchPhase {
    #[serde(rename = "touchend")]
    End,
    #[serde(rename = "touchstart")]
    Start,
    #[serde(rename = "touchmove")]
    Move,
}

impl TouchPhase {
    /// All phases in the order a tick emits them.
    pub const EMISSION_ORDER: [TouchPhase; 3] = [TouchPhase::End, TouchPhase::Start, TouchPhase::Move];

    /// DOM-style event name for this phase.
    pub fn event_name(self) -> &'static str {
        match self {
            TouchPhase::End => "touchend",
            TouchPhase::Start => "touchstart",
            TouchPhase::Move => "touchmove",
        }
    }
}

/// Opaque handle to whatever the dispatch side resolved a touch to (a DOM
/// element, a window, a widget id…).  The engine only stores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetHandle(pub u64);

/// One tracked touch point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Touch {
    pub id: TouchId,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub accel: f32,
    pub prev_x: f32,
    pub prev_y: f32,
    pub prev_vx: f32,
    pub prev_vy: f32,
    pub state: TouchState,
    pub target: Option<TargetHandle>,
    /// Set when a `set` message updated this touch during the current tick.
    #[serde(skip)]
    pub(crate) updated: bool,
}

impl Touch {
    /// Creates a freshly seen touch with no position yet.
    pub fn new(id: TouchId) -> Self {
        Self {
            id,
            x: UNPLACED,
            y: UNPLACED,
            vx: UNPLACED,
            vy: UNPLACED,
            accel: 0.0,
            prev_x: UNPLACED,
            prev_y: UNPLACED,
            prev_vx: UNPLACED,
            prev_vy: UNPLACED,
            state: TouchState::New,
            target: None,
            updated: false,
        }
    }

    /// Shifts the current motion into the `prev_*` fields and applies `set`.
    pub fn apply_set(&mut self, set: &CursorSet) {
        self.prev_x = self.x;
        self.prev_y = self.y;
        self.prev_vx = self.vx;
        self.prev_vy = self.vy;

        self.x = set.x;
        self.y = set.y;
        self.vx = set.vx;
        self.vy = set.vy;
        if let Some(accel) = set.accel {
            self.accel = accel;
        }
        self.updated = true;
    }

    /// `true` once the touch has received at least one `set`.
    pub fn is_placed(&self) -> bool {
        self.x != UNPLACED || self.y != UNPLACED
    }

    /// `true` if the position differs from the previous one on either axis.
    pub fn has_moved(&self) -> bool {
        self.x != self.prev_x || self.y != self.prev_y
    }
}
