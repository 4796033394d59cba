//! Lifecycle engine: turns frames into ordered touch change-sets.
//!
//! The engine owns the touch table and the source registry.  Each accepted
//! frame is one tick:
//!
//! 1. Resolve the frame's source and `fseq`; stale frames (`fseq` not greater
//!    than the last accepted one *for that source*) are dropped untouched.
//! 2. `alive` – the listed ids are the complete set of live touches for the
//!    reporting source.  Its other touches die; unknown ids are created.
//!    Touches owned by other sources are never looked at.
//! 3. `set` – shift current motion into `prev_*`, store the new values,
//!    creating the touch on demand.
//! 4. One scan over the table: dead touches are reported as ended and
//!    removed, new ones as started, updated active ones that changed position
//!    as moved.
//!
//! A frame is always applied completely or not at all.

use std::collections::{BTreeMap, HashSet};

use tracing::{debug, trace};

use crate::domain::identity::{IdentityError, SourceIndex, TouchId};
use crate::domain::source::SourceRegistry;
use crate::domain::touch::{TargetHandle, Touch, TouchPhase, TouchState};
use crate::protocol::frame::Frame;
use crate::protocol::messages::{CursorMessage, CursorSet};

/// Everything one tick changed, grouped by phase.
///
/// Within each list touches are ordered by [`TouchId`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeSet {
    pub ended: Vec<Touch>,
    pub started: Vec<Touch>,
    pub moved: Vec<Touch>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.ended.is_empty() && self.started.is_empty() && self.moved.is_empty()
    }

    /// Total number of touches across all three lists.
    pub fn len(&self) -> usize {
        self.ended.len() + self.started.len() + self.moved.len()
    }

    /// The three lists in emission order: ended, started, moved.
    pub fn phases(&self) -> [(TouchPhase, &[Touch]); 3] {
        [
            (TouchPhase::End, self.ended.as_slice()),
            (TouchPhase::Start, self.started.as_slice()),
            (TouchPhase::Move, self.moved.as_slice()),
        ]
    }
}

/// Owner of all touch state.
#[derive(Debug, Default)]
pub struct LifecycleEngine {
    registry: SourceRegistry,
    touches: BTreeMap<TouchId, Touch>,
}

impl LifecycleEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one complete frame and returns what changed.
    ///
    /// Stale frames and frames without `fseq` return an empty change-set and
    /// leave the engine untouched.
    pub fn process_frame(&mut self, frame: &Frame) -> ChangeSet {
        let source = frame.source_name();
        let Some(fseq) = frame.fseq() else {
            debug!(source, messages = frame.len(), "ignoring frame without fseq");
            return ChangeSet::default();
        };

        let last = self.registry.last_fseq(source);
        if fseq <= last {
            debug!(source, fseq, last, "discarding stale frame");
            return ChangeSet::default();
        }

        let index = self.registry.register_if_unseen(source);
        self.registry.set_last_fseq(source, fseq);
        trace!(source, fseq, "applying frame");

        for msg in &frame.messages {
            match msg {
                CursorMessage::Alive(ids) => self.apply_alive(index, ids),
                CursorMessage::Set(set) => self.apply_set(index, set),
                CursorMessage::Source(_) | CursorMessage::Fseq(_) => {}
            }
        }

        self.collect_changes()
    }

    fn apply_alive(&mut self, index: SourceIndex, session_ids: &[i32]) {
        let listed: HashSet<TouchId> = session_ids
            .iter()
            .map(|sid| TouchId::combine(index, *sid))
            .collect();

        // A touch that was never reported as started is forgotten instead of
        // being ended, so no `ended` is ever emitted without a `started`.
        let mut unreported = Vec::new();
        for touch in self
            .touches
            .values_mut()
            .filter(|t| t.id.source_index() == index && !listed.contains(&t.id))
        {
            match touch.state {
                TouchState::New => unreported.push(touch.id),
                TouchState::Active | TouchState::Dead => touch.state = TouchState::Dead,
            }
        }
        for id in unreported {
            self.touches.remove(&id);
        }

        for id in listed {
            let touch = self.touches.entry(id).or_insert_with(|| Touch::new(id));
            if touch.state == TouchState::Dead {
                touch.state = TouchState::Active;
            }
        }
    }

    fn apply_set(&mut self, index: SourceIndex, set: &CursorSet) {
        let id = TouchId::combine(index, set.session_id);
        self.touches
            .entry(id)
            .or_insert_with(|| Touch::new(id))
            .apply_set(set);
    }

    /// Turns the states left by one frame into a change-set.
    ///
    /// A touch counts as moved only when a `set` updated it this tick and
    /// its position changed.  Frames that repeat `alive` without a `set` for
    /// a touch report no move for it.
    fn collect_changes(&mut self) -> ChangeSet {
        let mut changes = ChangeSet::default();
        self.touches.retain(|_, touch| {
            let updated = std::mem::take(&mut touch.updated);
            match touch.state {
                TouchState::Dead => {
                    changes.ended.push(touch.clone());
                    return false;
                }
                TouchState::New => {
                    touch.state = TouchState::Active;
                    changes.started.push(touch.clone());
                }
                TouchState::Active => {
                    if updated && touch.has_moved() {
                        changes.moved.push(touch.clone());
                    }
                }
            }
            true
        });
        changes
    }

    /// Caches the dispatch target of a live touch.
    ///
    /// Returns `false` if no such touch exists.
    pub fn assign_target(&mut self, id: TouchId, target: TargetHandle) -> bool {
        match self.touches.get_mut(&id) {
            Some(touch) => {
                touch.target = Some(target);
                true
            }
            None => false,
        }
    }

    /// Resolves the global id of a session on a registered source.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::UnregisteredSource`] if no frame from
    /// `source` has been accepted yet.
    pub fn touch_id(&self, source: &str, session_id: i32) -> Result<TouchId, IdentityError> {
        self.registry.touch_id(source, session_id)
    }

    pub fn touch(&self, id: TouchId) -> Option<&Touch> {
        self.touches.get(&id)
    }

    /// Live touches ordered by id.
    pub fn touches(&self) -> impl Iterator<Item = &Touch> {
        self.touches.values()
    }

    pub fn len(&self) -> usize {
        self.touches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.touches.is_empty()
    }

    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn set(id: i32, x: f32, y: f32) -> CursorMessage {
        CursorMessage::Set(CursorSet {
            session_id: id,
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            accel: None,
        })
    }

    fn frame(source: &str, body: Vec<CursorMessage>, fseq: i64) -> Frame {
        let mut messages = vec![CursorMessage::Source(source.to_string())];
        messages.extend(body);
        messages.push(CursorMessage::Fseq(fseq));
        Frame::new(messages)
    }

    fn ids(touches: &[Touch]) -> Vec<i32> {
        touches.iter().map(|t| t.id.session_id()).collect()
    }

    #[test]
    fn test_frame_without_fseq_is_a_no_op() {
        let mut engine = LifecycleEngine::new();
        let changes = engine.process_frame(&Frame::new(vec![
            CursorMessage::Source("s".into()),
            CursorMessage::Alive(vec![1]),
        ]));
        assert!(changes.is_empty());
        assert!(engine.is_empty());
        assert!(engine.registry().is_empty());
    }

    #[test]
    fn test_stale_frame_changes_nothing() {
        // Arrange
        let mut engine = LifecycleEngine::new();
        engine.process_frame(&frame("s", vec![CursorMessage::Alive(vec![1]), set(1, 0.1, 0.1)], 10));

        // Act – same and older fseq, both of which would end touch 1
        let same = engine.process_frame(&frame("s", vec![CursorMessage::Alive(vec![])], 10));
        let older = engine.process_frame(&frame("s", vec![CursorMessage::Alive(vec![])], 9));

        // Assert
        assert!(same.is_empty());
        assert!(older.is_empty());
        assert_eq!(engine.len(), 1);
        assert_eq!(engine.registry().last_fseq("s"), 10);
    }

    #[test]
    fn test_non_positive_fseq_on_fresh_source_is_stale() {
        let mut engine = LifecycleEngine::new();
        let changes = engine.process_frame(&frame("s", vec![CursorMessage::Alive(vec![1])], 0));
        assert!(changes.is_empty());
        assert!(engine.registry().is_empty(), "stale frames must not register sources");
    }

    #[test]
    fn test_alive_then_set_starts_touch_with_position() {
        let mut engine = LifecycleEngine::new();
        let changes = engine.process_frame(&frame(
            "s",
            vec![CursorMessage::Alive(vec![12]), set(12, 0.52, 0.06)],
            2390,
        ));

        assert_eq!(ids(&changes.started), vec![12]);
        assert!(changes.moved.is_empty(), "a new touch is started, not moved");
        let touch = &changes.started[0];
        assert_eq!((touch.x, touch.y), (0.52, 0.06));
        assert_eq!(touch.state, TouchState::Active);
    }

    #[test]
    fn test_set_without_alive_creates_touch() {
        let mut engine = LifecycleEngine::new();
        let changes = engine.process_frame(&frame("s", vec![set(3, 0.5, 0.5)], 1));
        assert_eq!(ids(&changes.started), vec![3]);
    }

    #[test]
    fn test_move_on_a_single_axis_is_reported() {
        let mut engine = LifecycleEngine::new();
        engine.process_frame(&frame("s", vec![CursorMessage::Alive(vec![1]), set(1, 0.1, 0.1)], 1));

        let changes = engine.process_frame(&frame(
            "s",
            vec![CursorMessage::Alive(vec![1]), set(1, 0.1, 0.2)],
            2,
        ));

        assert_eq!(ids(&changes.moved), vec![1]);
        assert_eq!((changes.moved[0].prev_x, changes.moved[0].prev_y), (0.1, 0.1));
    }

    #[test]
    fn test_frame_without_set_does_not_repeat_move() {
        let mut engine = LifecycleEngine::new();
        engine.process_frame(&frame("s", vec![CursorMessage::Alive(vec![1]), set(1, 0.1, 0.1)], 1));
        let moved = engine.process_frame(&frame(
            "s",
            vec![CursorMessage::Alive(vec![1]), set(1, 0.3, 0.3)],
            2,
        ));
        assert_eq!(moved.moved.len(), 1);

        let idle = engine.process_frame(&frame("s", vec![CursorMessage::Alive(vec![1])], 3));

        assert!(idle.is_empty());
    }

    #[test]
    fn test_set_to_same_position_is_not_a_move() {
        let mut engine = LifecycleEngine::new();
        engine.process_frame(&frame("s", vec![CursorMessage::Alive(vec![1]), set(1, 0.1, 0.1)], 1));
        engine.process_frame(&frame("s", vec![CursorMessage::Alive(vec![1]), set(1, 0.2, 0.2)], 2));
        let changes = engine.process_frame(&frame(
            "s",
            vec![CursorMessage::Alive(vec![1]), set(1, 0.2, 0.2)],
            3,
        ));
        assert!(changes.moved.is_empty());
    }

    #[test]
    fn test_missing_from_alive_ends_touch_and_removes_it() {
        let mut engine = LifecycleEngine::new();
        engine.process_frame(&frame("s", vec![CursorMessage::Alive(vec![1, 2]), set(1, 0.1, 0.1), set(2, 0.2, 0.2)], 1));

        let changes = engine.process_frame(&frame("s", vec![CursorMessage::Alive(vec![2])], 2));

        assert_eq!(ids(&changes.ended), vec![1]);
        assert_eq!(changes.ended[0].state, TouchState::Dead);
        assert!(changes.started.is_empty());
        assert_eq!(engine.len(), 1);
        let gone = engine.touch_id("s", 1).unwrap();
        assert!(engine.touch(gone).is_none());
    }

    #[test]
    fn test_alive_is_scoped_to_reporting_source() {
        // Arrange – one touch on each of two sources
        let mut engine = LifecycleEngine::new();
        engine.process_frame(&frame("a", vec![CursorMessage::Alive(vec![1]), set(1, 0.1, 0.1)], 1));
        engine.process_frame(&frame("b", vec![CursorMessage::Alive(vec![1]), set(1, 0.9, 0.9)], 1));

        // Act – source a reports nothing alive
        let changes = engine.process_frame(&frame("a", vec![CursorMessage::Alive(vec![])], 2));

        // Assert – only a's touch ends
        assert_eq!(changes.ended.len(), 1);
        assert_eq!(changes.ended[0].id, engine.touch_id("a", 1).unwrap());
        assert!(engine.touch(engine.touch_id("b", 1).unwrap()).is_some());
    }

    #[test]
    fn test_same_session_id_on_two_sources_is_two_touches() {
        let mut engine = LifecycleEngine::new();
        engine.process_frame(&frame("a", vec![CursorMessage::Alive(vec![7])], 1));
        engine.process_frame(&frame("b", vec![CursorMessage::Alive(vec![7])], 1));
        assert_eq!(engine.len(), 2);
    }

    #[test]
    fn test_sources_progress_independently() {
        let mut engine = LifecycleEngine::new();
        engine.process_frame(&frame("a", vec![CursorMessage::Alive(vec![1])], 1000));

        let changes = engine.process_frame(&frame("b", vec![CursorMessage::Alive(vec![1])], 1));

        assert_eq!(changes.started.len(), 1);
        assert_eq!(engine.registry().last_fseq("a"), 1000);
        assert_eq!(engine.registry().last_fseq("b"), 1);
    }

    #[test]
    fn test_frame_without_source_uses_default_source() {
        let mut engine = LifecycleEngine::new();
        let changes = engine.process_frame(&Frame::new(vec![
            CursorMessage::Alive(vec![4]),
            CursorMessage::Fseq(1),
        ]));
        assert_eq!(changes.started.len(), 1);
        assert!(engine.touch_id("_default", 4).is_ok());
    }

    #[test]
    fn test_touch_killed_and_relisted_in_same_frame_survives() {
        let mut engine = LifecycleEngine::new();
        engine.process_frame(&frame("s", vec![CursorMessage::Alive(vec![1])], 1));

        let changes = engine.process_frame(&frame(
            "s",
            vec![CursorMessage::Alive(vec![]), CursorMessage::Alive(vec![1])],
            2,
        ));

        assert!(changes.is_empty());
        assert_eq!(engine.len(), 1);
    }

    #[test]
    fn test_touch_created_and_dropped_in_same_frame_is_never_reported() {
        let mut engine = LifecycleEngine::new();
        let changes = engine.process_frame(&frame(
            "s",
            vec![CursorMessage::Alive(vec![1]), CursorMessage::Alive(vec![])],
            1,
        ));
        assert!(changes.is_empty());
        assert!(engine.is_empty());
    }

    #[test]
    fn test_changes_are_ordered_by_id() {
        let mut engine = LifecycleEngine::new();
        let changes = engine.process_frame(&frame("s", vec![CursorMessage::Alive(vec![30, 10, 20])], 1));
        assert_eq!(ids(&changes.started), vec![10, 20, 30]);
    }

    #[test]
    fn test_assign_target_is_kept_across_ticks() {
        let mut engine = LifecycleEngine::new();
        engine.process_frame(&frame("s", vec![CursorMessage::Alive(vec![1]), set(1, 0.1, 0.1)], 1));
        let id = engine.touch_id("s", 1).unwrap();

        assert!(engine.assign_target(id, TargetHandle(99)));
        let changes = engine.process_frame(&frame("s", vec![CursorMessage::Alive(vec![1]), set(1, 0.2, 0.1)], 2));

        assert_eq!(changes.moved[0].target, Some(TargetHandle(99)));
        assert!(!engine.assign_target(TouchId::combine(SourceIndex(5), 1), TargetHandle(1)));
    }

    #[test]
    fn test_touch_id_for_unknown_source_fails() {
        let engine = LifecycleEngine::new();
        assert_eq!(
            engine.touch_id("nobody", 1),
            Err(IdentityError::UnregisteredSource("nobody".into()))
        );
    }

    #[test]
    fn test_phases_follow_emission_order() {
        let changes = ChangeSet::default();
        let order: Vec<TouchPhase> = changes.phases().iter().map(|(p, _)| *p).collect();
        assert_eq!(order, TouchPhase::EMISSION_ORDER.to_vec());
    }
}
