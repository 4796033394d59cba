//! A complete TUIO frame: everything one source reported for one tick.

use crate::protocol::classify::classify;
use crate::protocol::messages::{CursorMessage, OscBundle, OscMessage, DEFAULT_SOURCE_NAME};

/// An ordered sequence of 2D-cursor messages forming one snapshot.
///
/// A well-formed frame optionally starts with `source` and ends with `fseq`.
/// Frames are not validated on construction; the lifecycle engine treats a
/// frame without `fseq` as a no-op.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    pub messages: Vec<CursorMessage>,
}

impl Frame {
    pub fn new(messages: Vec<CursorMessage>) -> Self {
        Self { messages }
    }

    /// Builds a frame from raw OSC messages, keeping only those the
    /// classifier recognises.
    pub fn from_osc<'a>(messages: impl IntoIterator<Item = &'a OscMessage>) -> Self {
        Self::new(messages.into_iter().filter_map(classify).collect())
    }

    /// Builds a frame from every message in `bundle`, including nested ones.
    pub fn from_bundle(bundle: &OscBundle) -> Self {
        Self::from_osc(bundle.flatten())
    }

    /// Name of the source this frame belongs to.
    ///
    /// Only a leading `source` message counts; otherwise the frame belongs to
    /// [`DEFAULT_SOURCE_NAME`].
    pub fn source_name(&self) -> &str {
        match self.messages.first() {
            Some(CursorMessage::Source(name)) => name,
            _ => DEFAULT_SOURCE_NAME,
        }
    }

    /// The frame sequence number, taken from the last `fseq` message.
    pub fn fseq(&self) -> Option<i64> {
        self.messages.iter().rev().find_map(|msg| match msg {
            CursorMessage::Fseq(n) => Some(*n),
            _ => None,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }
}

impl From<Vec<CursorMessage>> for Frame {
    fn from(messages: Vec<CursorMessage>) -> Self {
        Self::new(messages)
    }
}
