//! Transport-facing entry points and the dispatch seam.
//!
//! A [`TouchPipeline`] bundles everything one logical surface needs: the
//! optional region transform, the bundle assembler for message-at-a-time
//! transports, and the lifecycle engine.  Change-sets go out through a
//! [`TouchSink`] supplied per call, so the pipeline never owns its consumer.

use tracing::trace;

use crate::domain::region::Region;
use crate::domain::touch::{TargetHandle, Touch, TouchPhase};
use crate::engine::assembler::BundleAssembler;
use crate::engine::lifecycle::{ChangeSet, LifecycleEngine};
use crate::protocol::classify::classify;
use crate::protocol::frame::Frame;
use crate::protocol::messages::{OscMessage, OscPacket};

/// Receiver of touch changes.
///
/// Called once per non-empty phase of a tick, in the order ended, started,
/// moved.  `live` is the whole touch table after the tick, which lets an
/// implementation group touches by shared target.
#[cfg_attr(test, mockall::automock)]
pub trait TouchSink {
    fn dispatch(&mut self, phase: TouchPhase, changed: &[Touch], live: &[Touch]);

    /// Picks the target of a touch that does not have one yet.
    ///
    /// The returned handle is cached on the touch and carried by every later
    /// event for it.
    fn resolve_target(&mut self, _touch: &Touch) -> Option<TargetHandle> {
        None
    }
}

/// One logical touch surface.
#[derive(Debug, Default)]
pub struct TouchPipeline {
    assembler: BundleAssembler,
    region: Option<Region>,
    engine: LifecycleEngine,
}

impl TouchPipeline {
    /// A pipeline covering the whole surface, with no transform.
    pub fn new() -> Self {
        Self::default()
    }

    /// A pipeline that only sees cursors inside `region`, in its local
    /// coordinates.
    pub fn with_region(region: Region) -> Self {
        Self {
            region: Some(region),
            ..Self::default()
        }
    }

    pub fn region(&self) -> Option<&Region> {
        self.region.as_ref()
    }

    pub fn engine(&self) -> &LifecycleEngine {
        &self.engine
    }

    /// Applies a complete frame and dispatches what changed.
    pub fn submit_frame<S: TouchSink + ?Sized>(&mut self, frame: &Frame, sink: &mut S) -> ChangeSet {
        let mut changes = match &self.region {
            Some(region) => self.engine.process_frame(&region.apply(frame)),
            None => self.engine.process_frame(frame),
        };
        if changes.is_empty() {
            return changes;
        }

        self.resolve_targets(&mut changes, sink);

        let live: Vec<Touch> = self.engine.touches().cloned().collect();
        for (phase, touches) in changes.phases() {
            if !touches.is_empty() {
                trace!(phase = phase.event_name(), count = touches.len(), "dispatching");
                sink.dispatch(phase, touches, &live);
            }
        }
        changes
    }

    /// Feeds a single OSC message from `origin`.
    ///
    /// Returns the change-set when the message completed a frame, `None`
    /// while a frame is still being collected or the message was ignored.
    pub fn submit_message<S: TouchSink + ?Sized>(
        &mut self,
        origin: &str,
        msg: &OscMessage,
        sink: &mut S,
    ) -> Option<ChangeSet> {
        let cursor = classify(msg)?;
        let frame = self.assembler.push(origin, cursor)?;
        Some(self.submit_frame(&frame, sink))
    }

    /// Routes a decoded packet: bundles are frames, bare messages go through
    /// the assembler.
    pub fn submit_packet<S: TouchSink + ?Sized>(
        &mut self,
        origin: &str,
        packet: &OscPacket,
        sink: &mut S,
    ) -> Option<ChangeSet> {
        match packet {
            OscPacket::Bundle(bundle) => Some(self.submit_frame(&Frame::from_bundle(bundle), sink)),
            OscPacket::Message(msg) => self.submit_message(origin, msg, sink),
        }
    }

    fn resolve_targets<S: TouchSink + ?Sized>(&mut self, changes: &mut ChangeSet, sink: &mut S) {
        for touch in changes
            .started
            .iter_mut()
            .chain(changes.moved.iter_mut())
            .filter(|t| t.target.is_none())
        {
            if let Some(target) = sink.resolve_target(touch) {
                touch.target = Some(target);
                self.engine.assign_target(touch.id, target);
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
