//! Global touch identifiers.
//!
//! Session ids are only unique within one source.  A [`TouchId`] packs the
//! source index into the high 32 bits and the session id into the low 32
//! bits of a `u64`:
//!
//! ```text
//!  63            32 31             0
//! [ source index  ][  session id   ]
//! ```
//!
//! The two fields never overlap, so distinct `(source, session)` pairs always
//! produce distinct ids regardless of the session id values a tracker uses.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable, 0-based index assigned to a source on first sight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceIndex(pub u32);

impl fmt::Display for SourceIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Globally unique touch identifier.
///
/// Ordering follows the packed value: all touches of source 0 sort before
/// those of source 1, and within a source they sort by session id bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TouchId(u64);

impl TouchId {
    /// Combines a source index and a source-local session id.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tuio_core::domain::identity::{SourceIndex, TouchId};
    ///
    /// let id = TouchId::combine(SourceIndex(1), 12);
    /// assert_eq!(id.source_index(), SourceIndex(1));
    /// assert_eq!(id.session_id(), 12);
    /// assert_ne!(id, TouchId::combine(SourceIndex(0), 12));
    /// ```
    pub const fn combine(source: SourceIndex, session_id: i32) -> Self {
        TouchId(((source.0 as u64) << 32) | (session_id as u32 as u64))
    }

    pub const fn source_index(self) -> SourceIndex {
        SourceIndex((self.0 >> 32) as u32)
    }

    pub const fn session_id(self) -> i32 {
        self.0 as u32 as i32
    }

    /// The packed 64-bit value.
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TouchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.source_index(), self.session_id())
    }
}

/// Errors raised when an identifier is requested incorrectly.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentityError {
    /// An id was requested for a source the registry has never seen.
    ///
    /// The lifecycle engine always registers a source before allocating ids
    /// for it, so this indicates a caller bug rather than bad input.
    #[error("source {0:?} has not been registered")]
    UnregisteredSource(String),
}
