//! Bundle assembler: rebuilds frames from loose messages.
//!
//! Some transports hand over OSC messages one at a time instead of whole
//! bundles.  The assembler groups them back into frames, one pending group per
//! transport origin:
//!
//! ```text
//!            source                     alive | set
//!   Idle ─────────────► Collecting ◄──────────────┐
//!    ▲                      │  └──────────────────┘
//!    └──────── fseq ────────┘   (emit frame, clear group)
//! ```
//!
//! A `source` arriving while a group is open replaces it; the interrupted
//! frame is discarded.  `alive`, `set` and `fseq` arriving while idle are
//! dropped.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::protocol::frame::Frame;
use crate::protocol::messages::CursorMessage;

/// A frame under construction.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingBundle {
    /// Source named by the opening `source` message.
    pub source: String,
    /// Messages collected so far, starting with that `source` message.
    pub messages: Vec<CursorMessage>,
}

/// Per-origin frame reassembly.
///
/// The origin is whatever the transport uses to tell emitters apart, such as
/// the sender's socket address.  Loose `alive`/`set` messages do not name a
/// source themselves, so the origin decides which pending group they join.
#[derive(Debug, Default)]
pub struct BundleAssembler {
    pending: HashMap<String, PendingBundle>,
}

impl BundleAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one message from `origin`.
    ///
    /// Returns the completed frame when `msg` is the `fseq` that closes an
    /// open group.
    pub fn push(&mut self, origin: &str, msg: CursorMessage) -> Option<Frame> {
        match msg {
            CursorMessage::Source(ref name) => {
                let group = PendingBundle {
                    source: name.clone(),
                    messages: vec![msg.clone()],
                };
                if let Some(abandoned) = self.pending.insert(origin.to_string(), group) {
                    debug!(
                        origin,
                        source = %abandoned.source,
                        messages = abandoned.messages.len(),
                        "discarding unfinished frame"
                    );
                }
                None
            }
            CursorMessage::Alive(_) | CursorMessage::Set(_) => {
                match self.pending.get_mut(origin) {
                    Some(group) => group.messages.push(msg),
                    None => trace!(origin, keyword = msg.keyword(), "dropping message outside a frame"),
                }
                None
            }
            CursorMessage::Fseq(_) => match self.pending.remove(origin) {
                Some(mut group) => {
                    group.messages.push(msg);
                    Some(Frame::new(group.messages))
                }
                None => {
                    trace!(origin, "dropping fseq without an open frame");
                    None
                }
            },
        }
    }

    /// `true` while a group is open for `origin`.
    pub fn is_collecting(&self, origin: &str) -> bool {
        self.pending.contains_key(origin)
    }

    pub fn pending(&self, origin: &str) -> Option<&PendingBundle> {
        self.pending.get(origin)
    }
}
