//! Region transform: map one rectangle of a touch surface onto a full,
//! independent logical surface.
//!
//! A [`Region`] is given in the same normalized 0..1 space as TUIO cursor
//! positions.  Applying it to a frame keeps only the cursors inside the
//! rectangle (bounds inclusive), rescales their positions so the rectangle
//! spans 0..1, and removes the cursors seen outside it from the alive list.
//! Cursors without a `set` in the frame stay alive.  The transform
//! is pure, so several regions can be applied to the same frame to split one
//! surface into zones that each feed their own lifecycle engine.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::protocol::frame::Frame;
use crate::protocol::messages::{CursorMessage, CursorSet};

/// Errors returned when constructing an invalid [`Region`].
#[derive(Debug, Error, PartialEq)]
pub enum RegionError {
    /// A bound is NaN or infinite.
    #[error("region bounds must be finite")]
    NotFinite,

    /// A bound lies outside the normalized 0..1 space.
    #[error("region bounds must lie within 0..1 (got x={x}, y={y}, x2={x2}, y2={y2})")]
    OutOfRange { x: f32, y: f32, x2: f32, y2: f32 },

    /// The far edge is not strictly beyond the near edge on `axis`.
    #[error("region is empty along the {axis} axis ({low} >= {high})")]
    Empty { axis: char, low: f32, high: f32 },
}

/// Raw bounds as they appear in configuration files.
#[derive(Debug, Clone, Copy, Deserialize)]
struct RegionBounds {
    x: f32,
    y: f32,
    x2: f32,
    y2: f32,
}

impl TryFrom<RegionBounds> for Region {
    type Error = RegionError;

    fn try_from(b: RegionBounds) -> Result<Self, Self::Error> {
        Region::new(b.x, b.y, b.x2, b.y2)
    }
}

/// A validated sub-rectangle `[x, x2] × [y, y2]` of the unit square.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RegionBounds")]
pub struct Region {
    x: f32,
    y: f32,
    x2: f32,
    y2: f32,
}

impl Region {
    /// The whole surface; applying it leaves positions unchanged.
    pub const FULL: Region = Region {
        x: 0.0,
        y: 0.0,
        x2: 1.0,
        y2: 1.0,
    };

    /// Creates a region from its top-left `(x, y)` and bottom-right
    /// `(x2, y2)` corners.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError`] if a bound is not finite, lies outside 0..1,
    /// or the rectangle has zero or negative extent on either axis.
    pub fn new(x: f32, y: f32, x2: f32, y2: f32) -> Result<Self, RegionError> {
        if ![x, y, x2, y2].iter().all(|v| v.is_finite()) {
            return Err(RegionError::NotFinite);
        }
        if ![x, y, x2, y2].iter().all(|v| (0.0..=1.0).contains(v)) {
            return Err(RegionError::OutOfRange { x, y, x2, y2 });
        }
        if x >= x2 {
            return Err(RegionError::Empty {
                axis: 'x',
                low: x,
                high: x2,
            });
        }
        if y >= y2 {
            return Err(RegionError::Empty {
                axis: 'y',
                low: y,
                high: y2,
            });
        }
        Ok(Self { x, y, x2, y2 })
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn x2(&self) -> f32 {
        self.x2
    }

    pub fn y2(&self) -> f32 {
        self.y2
    }

    /// `true` if `(x, y)` lies inside the region, edges included.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        (self.x..=self.x2).contains(&x) && (self.y..=self.y2).contains(&y)
    }

    /// Converts a surface position into region-local 0..1 coordinates.
    pub fn to_local(&self, x: f32, y: f32) -> (f32, f32) {
        (
            (x - self.x) / (self.x2 - self.x),
            (y - self.y) / (self.y2 - self.y),
        )
    }

    /// Rewrites `frame` into this region's local coordinate space.
    ///
    /// - `set` inside the region: position rescaled, message kept.
    /// - `set` outside the region: message dropped.
    /// - `alive`: ids whose `set` was dropped are removed; ids without any
    ///   `set` in this frame are kept, since trackers only send `set` for
    ///   cursors that changed.
    /// - `source` / `fseq`: unchanged.
    pub fn apply(&self, frame: &Frame) -> Frame {
        // `alive` normally precedes the `set` messages, so decide which ids
        // are excluded before rewriting anything.
        let excluded: HashSet<i32> = frame
            .messages
            .iter()
            .filter_map(|msg| match msg {
                CursorMessage::Set(set) if !self.contains(set.x, set.y) => Some(set.session_id),
                _ => None,
            })
            .collect();

        let messages = frame
            .messages
            .iter()
            .filter_map(|msg| match msg {
                CursorMessage::Set(set) => {
                    if !self.contains(set.x, set.y) {
                        return None;
                    }
                    let (x, y) = self.to_local(set.x, set.y);
                    Some(CursorMessage::Set(CursorSet { x, y, ..*set }))
                }
                CursorMessage::Alive(ids) => Some(CursorMessage::Alive(
                    ids.iter().copied().filter(|id| !excluded.contains(id)).collect(),
                )),
                other => Some(other.clone()),
            })
            .collect();

        Frame::new(messages)
    }
}

impl Default for Region {
    fn default() -> Self {
        Region::FULL
    }
}

/// Returns a frame rewriter bound to `region`.
///
/// ```rust
/// use tuio_core::domain::region::{adjust_to_region, Region};
/// use tuio_core::protocol::{CursorMessage, CursorSet, Frame};
///
/// let to_left_half = adjust_to_region(Region::new(0.0, 0.0, 0.5, 1.0).unwrap());
/// let right = CursorSet { session_id: 1, x: 0.9, y: 0.5, vx: 0.0, vy: 0.0, accel: None };
/// let frame = to_left_half(Frame::new(vec![
///     CursorMessage::Alive(vec![1, 2]),
///     CursorMessage::Set(right),
///     CursorMessage::Fseq(2),
/// ]));
/// assert_eq!(frame.messages[0], CursorMessage::Alive(vec![2]));
/// ```
pub fn adjust_to_region(region: Region) -> impl Fn(Frame) -> Frame {
    move |frame| region.apply(&frame)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
