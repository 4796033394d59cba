//! # tuio-core
//!
//! Turns a TUIO 1.1 2D-cursor stream into touch lifecycle events.
//!
//! The crate is transport-agnostic: it decodes OSC packets handed to it, but
//! never opens a socket.  Dispatching the resulting events is left to a
//! [`TouchSink`] supplied by the host.
//!
//! - **`protocol`** – OSC 1.0 codec, the [`CursorMessage`] vocabulary and
//!   [`Frame`], one `source … fseq` group of messages.
//! - **`domain`** – source registry, globally unique [`TouchId`]s, the
//!   [`Touch`] entity and the [`Region`] transform.
//! - **`engine`** – the bundle assembler for message-at-a-time transports,
//!   the [`LifecycleEngine`] and the [`TouchPipeline`] that ties them
//!   together.
//!
//! ```rust
//! use tuio_core::{CursorMessage, Frame, RecordingSink, TouchPhase, TouchPipeline};
//!
//! let mut pipeline = TouchPipeline::new();
//! let mut sink = RecordingSink::new();
//! pipeline.submit_frame(
//!     &Frame::new(vec![
//!         CursorMessage::Source("pad".into()),
//!         CursorMessage::Alive(vec![1]),
//!         CursorMessage::Fseq(1),
//!     ]),
//!     &mut sink,
//! );
//! assert_eq!(sink.phases(), vec![TouchPhase::Start]);
//! ```

pub mod domain;
pub mod engine;
pub mod protocol;

pub use domain::identity::{IdentityError, SourceIndex, TouchId};
pub use domain::region::{adjust_to_region, Region, RegionError};
pub use domain::touch::{TargetHandle, Touch, TouchPhase, TouchState};
pub use engine::lifecycle::{ChangeSet, LifecycleEngine};
pub use engine::pipeline::{TouchPipeline, TouchSink};
pub use engine::sink::RecordingSink;
pub use protocol::codec::{decode_packet, encode_packet, CodecError};
pub use protocol::frame::Frame;
pub use protocol::messages::{CursorMessage, CursorSet, OscMessage, OscPacket};
