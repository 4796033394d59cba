//! Touch engine: frame assembly, lifecycle tracking and dispatch.
//!
//! Data flows one way:
//!
//! ```text
//! OscMessage ──► BundleAssembler ──┐
//!                                  ├──► Region ──► LifecycleEngine ──► TouchSink
//! OscBundle  ──────► Frame ────────┘
//! ```
//!
//! [`TouchPipeline`] wires the stages together for one logical surface.

pub mod assembler;
pub mod lifecycle;
pub mod pipeline;
pub mod sink;

pub use assembler::{BundleAssembler, PendingBundle};
pub use lifecycle::{ChangeSet, LifecycleEngine};
pub use pipeline::{TouchPipeline, TouchSink};
pub use sink::{Dispatched, RecordingSink};
