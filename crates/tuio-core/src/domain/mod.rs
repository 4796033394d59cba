//! Domain entities for the touch engine.
//!
//! Pure data and rules with no I/O: source bookkeeping, touch identity, the
//! touch entity itself and the region transform.  Everything here can be
//! unit-tested without a transport or a dispatch target.

pub mod identity;
pub mod region;
pub mod source;
pub mod touch;

pub use identity::{IdentityError, SourceIndex, TouchId};
pub use region::{adjust_to_region, Region, RegionError};
pub use source::{Source, SourceRegistry};
pub use touch::{TargetHandle, Touch, TouchPhase, TouchState, UNPLACED};
