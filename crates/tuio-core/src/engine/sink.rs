//! A [`TouchSink`] that keeps everything it is given.
//!
//! Useful for tests, benches and replay tooling where the dispatched calls
//! themselves are the output.

use crate::domain::touch::{TargetHandle, Touch, TouchPhase};
use crate::engine::pipeline::TouchSink;

/// One recorded [`TouchSink::dispatch`] call.
#[derive(Debug, Clone, PartialEq)]
pub struct Dispatched {
    pub phase: TouchPhase,
    pub changed: Vec<Touch>,
    pub live: Vec<Touch>,
}

/// Records dispatch calls in order.
///
/// When built with [`RecordingSink::assigning_targets`] it also hands out
/// increasing target handles, starting at 1, to every touch that asks.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub calls: Vec<Dispatched>,
    next_target: Option<u64>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assigning_targets() -> Self {
        Self {
            calls: Vec::new(),
            next_target: Some(1),
        }
    }

    /// Recorded phases, in dispatch order.
    pub fn phases(&self) -> Vec<TouchPhase> {
        self.calls.iter().map(|c| c.phase).collect()
    }

    /// Session ids reported for `phase`, across all recorded calls.
    pub fn session_ids(&self, phase: TouchPhase) -> Vec<i32> {
        self.calls
            .iter()
            .filter(|c| c.phase == phase)
            .flat_map(|c| c.changed.iter().map(|t| t.id.session_id()))
            .collect()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl TouchSink for RecordingSink {
    fn dispatch(&mut self, phase: TouchPhase, changed: &[Touch], live: &[Touch]) {
        self.calls.push(Dispatched {
            phase,
            changed: changed.to_vec(),
            live: live.to_vec(),
        });
    }

    fn resolve_target(&mut self, _touch: &Touch) -> Option<TargetHandle> {
        let next = self.next_target.as_mut()?;
        let handle = TargetHandle(*next);
        *next += 1;
        Some(handle)
    }
}
