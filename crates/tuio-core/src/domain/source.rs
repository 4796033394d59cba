//! Source registry: every upstream emitter the engine has heard from.
//!
//! A TUIO source is one tracker (a tablet running TuioPad, a camera running
//! reacTIVision, …).  Each source numbers its frames independently, so the
//! registry keeps the last accepted `fseq` per source.  Sources are never
//! removed: there is one per physical input device and they are expected to
//! live as long as the process.

use std::collections::HashMap;

use tracing::debug;

use crate::domain::identity::{IdentityError, SourceIndex, TouchId};

/// Bookkeeping for one source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub name: String,
    pub index: SourceIndex,
    /// Highest frame sequence number accepted so far (0 before any frame).
    pub last_fseq: i64,
}

/// Registry of all sources seen since start-up.
#[derive(Debug, Default)]
pub struct SourceRegistry {
    /// Indexed by `SourceIndex`.
    sources: Vec<Source>,
    by_name: HashMap<String, SourceIndex>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the index for `name`, assigning the next free one if the name
    /// has not been seen before.
    pub fn register_if_unseen(&mut self, name: &str) -> SourceIndex {
        if let Some(index) = self.by_name.get(name) {
            return *index;
        }
        let index = SourceIndex(self.sources.len() as u32);
        self.sources.push(Source {
            name: name.to_string(),
            index,
            last_fseq: 0,
        });
        self.by_name.insert(name.to_string(), index);
        debug!(source = name, %index, "registered new TUIO source");
        index
    }

    pub fn index_of(&self, name: &str) -> Option<SourceIndex> {
        self.by_name.get(name).copied()
    }

    /// Last accepted frame sequence number; 0 for a source never seen.
    pub fn last_fseq(&self, name: &str) -> i64 {
        self.get(name).map_or(0, |source| source.last_fseq)
    }

    /// Records `fseq` as the last accepted frame of `name`, registering the
    /// source first if necessary.
    pub fn set_last_fseq(&mut self, name: &str, fseq: i64) {
        let index = self.register_if_unseen(name);
        self.sources[index.0 as usize].last_fseq = fseq;
    }

    /// Allocates the global touch id for `session_id` of source `name`.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::UnregisteredSource`] if `name` was never
    /// registered.
    pub fn touch_id(&self, name: &str, session_id: i32) -> Result<TouchId, IdentityError> {
        self.index_of(name)
            .map(|index| TouchId::combine(index, session_id))
            .ok_or_else(|| IdentityError::UnregisteredSource(name.to_string()))
    }

    pub fn get(&self, name: &str) -> Option<&Source> {
        self.index_of(name).map(|index| &self.sources[index.0 as usize])
    }

    /// All sources in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Source> {
        self.sources.iter()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}
