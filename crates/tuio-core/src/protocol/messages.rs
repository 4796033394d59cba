//! OSC packet types and the TUIO 2D-cursor message vocabulary.
//!
//! Two layers of types live here:
//!
//! - **OSC layer** – [`OscPacket`], [`OscBundle`], [`OscMessage`] and
//!   [`OscArg`] model what arrives on the wire (OSC 1.0).  They know nothing
//!   about TUIO.
//! - **TUIO layer** – [`CursorMessage`] is the closed set of 2D-cursor
//!   messages the touch engine understands.  Anything that cannot be turned
//!   into one of its variants is protocol noise.
//!
//! The conversion between the two is done by [`crate::protocol::classify`].

use serde::{Deserialize, Serialize};

// ── Protocol constants ────────────────────────────────────────────────────────

/// Address suffix identifying the TUIO 2D-cursor profile (`/tuio/2Dcur`).
pub const CURSOR_PROFILE_SUFFIX: &str = "2Dcur";

/// Canonical address used when encoding 2D-cursor messages.
pub const CURSOR_PROFILE_ADDRESS: &str = "/tuio/2Dcur";

/// UDP port TUIO trackers send to unless configured otherwise.
pub const TUIO_DEFAULT_PORT: u16 = 3333;

/// Source name used for frames that carry no `source` message.
pub const DEFAULT_SOURCE_NAME: &str = "_default";

// ── OSC layer ─────────────────────────────────────────────────────────────────

/// An NTP-style OSC time tag: seconds since 1900 plus a 32-bit fraction.
///
/// The value `(0, 1)` is the special "immediately" tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeTag {
    pub seconds: u32,
    pub fraction: u32,
}

impl TimeTag {
    /// The "execute immediately" time tag.
    pub const IMMEDIATE: TimeTag = TimeTag {
        seconds: 0,
        fraction: 1,
    };
}

/// One typed OSC argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OscArg {
    /// `i` – 32-bit big-endian two's complement integer.
    Int(i32),
    /// `f` – 32-bit IEEE 754 float.
    Float(f32),
    /// `s` – null-terminated, 4-byte padded ASCII string.
    Str(String),
    /// `b` – length-prefixed byte blob.
    Blob(Vec<u8>),
    /// `h` – 64-bit integer.
    Long(i64),
    /// `d` – 64-bit IEEE 754 float.
    Double(f64),
    /// `t` – OSC time tag.
    Time(TimeTag),
    /// `T` / `F` – boolean carried in the type tag only.
    Bool(bool),
    /// `N` – nil.
    Nil,
    /// `I` – infinitum / impulse.
    Impulse,
}

impl OscArg {
    /// Returns the argument as an integer when it holds a whole number.
    ///
    /// Some trackers send session ids and frame numbers as floats, so
    /// integral floats are accepted as well.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            OscArg::Int(v) => Some(i64::from(*v)),
            OscArg::Long(v) => Some(*v),
            OscArg::Float(v) if v.fract() == 0.0 && v.is_finite() => Some(*v as i64),
            OscArg::Double(v) if v.fract() == 0.0 && v.is_finite() => Some(*v as i64),
            _ => None,
        }
    }

    /// Returns the argument as an `f32` when it holds any number.
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            OscArg::Float(v) => Some(*v),
            OscArg::Double(v) => Some(*v as f32),
            OscArg::Int(v) => Some(*v as f32),
            OscArg::Long(v) => Some(*v as f32),
            _ => None,
        }
    }

    /// Returns the argument as a string slice.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            OscArg::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The OSC type tag character for this argument.
    pub fn type_tag(&self) -> char {
        match self {
            OscArg::Int(_) => 'i',
            OscArg::Float(_) => 'f',
            OscArg::Str(_) => 's',
            OscArg::Blob(_) => 'b',
            OscArg::Long(_) => 'h',
            OscArg::Double(_) => 'd',
            OscArg::Time(_) => 't',
            OscArg::Bool(true) => 'T',
            OscArg::Bool(false) => 'F',
            OscArg::Nil => 'N',
            OscArg::Impulse => 'I',
        }
    }
}

/// A single OSC message: an address pattern plus its arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OscMessage {
    pub address: String,
    pub args: Vec<OscArg>,
}

impl OscMessage {
    pub fn new(address: impl Into<String>, args: Vec<OscArg>) -> Self {
        Self {
            address: address.into(),
            args,
        }
    }
}

/// An OSC bundle: a time tag plus nested packets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OscBundle {
    pub time_tag: TimeTag,
    pub elements: Vec<OscPacket>,
}

impl OscBundle {
    /// Returns every message in this bundle, descending into nested bundles
    /// depth-first so the original message order is preserved.
    pub fn flatten(&self) -> Vec<&OscMessage> {
        let mut out = Vec::new();
        collect_messages(&self.elements, &mut out);
        out
    }
}

fn collect_messages<'a>(elements: &'a [OscPacket], out: &mut Vec<&'a OscMessage>) {
    for element in elements {
        match element {
            OscPacket::Message(msg) => out.push(msg),
            OscPacket::Bundle(bundle) => collect_messages(&bundle.elements, out),
        }
    }
}

/// Anything that can be carried in one UDP datagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OscPacket {
    Message(OscMessage),
    Bundle(OscBundle),
}

// ── TUIO 2D-cursor layer ──────────────────────────────────────────────────────

/// Payload of a `set` message: one cursor's position and motion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CursorSet {
    /// Source-local session id.
    pub session_id: i32,
    /// Normalized horizontal position (0..1).
    pub x: f32,
    /// Normalized vertical position (0..1).
    pub y: f32,
    /// Horizontal velocity.
    pub vx: f32,
    /// Vertical velocity.
    pub vy: f32,
    /// Motion acceleration (`m`), when the tracker sent one.
    pub accel: Option<f32>,
}

/// The closed set of TUIO 2D-cursor messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CursorMessage {
    /// `source <name>` – identifies the emitter of the surrounding frame.
    Source(String),
    /// `alive <s_id>*` – every session id the source considers active.
    Alive(Vec<i32>),
    /// `set s x y X Y [m]` – the state of one cursor.
    Set(CursorSet),
    /// `fseq <n>` – frame sequence number; terminates a frame.
    Fseq(i64),
}

impl CursorMessage {
    /// The TUIO keyword for this message.
    pub fn keyword(&self) -> &'static str {
        match self {
            CursorMessage::Source(_) => "source",
            CursorMessage::Alive(_) => "alive",
            CursorMessage::Set(_) => "set",
            CursorMessage::Fseq(_) => "fseq",
        }
    }

    /// Converts back into an OSC message on the canonical 2D-cursor address.
    pub fn to_osc(&self) -> OscMessage {
        let mut args = vec![OscArg::Str(self.keyword().to_string())];
        match self {
            CursorMessage::Source(name) => args.push(OscArg::Str(name.clone())),
            CursorMessage::Alive(ids) => args.extend(ids.iter().map(|id| OscArg::Int(*id))),
            CursorMessage::Set(set) => {
                args.push(OscArg::Int(set.session_id));
                args.push(OscArg::Float(set.x));
                args.push(OscArg::Float(set.y));
                args.push(OscArg::Float(set.vx));
                args.push(OscArg::Float(set.vy));
                if let Some(accel) = set.accel {
                    args.push(OscArg::Float(accel));
                }
            }
            CursorMessage::Fseq(n) => match i32::try_from(*n) {
                Ok(v) => args.push(OscArg::Int(v)),
                Err(_) => args.push(OscArg::Long(*n)),
            },
        }
        OscMessage::new(CURSOR_PROFILE_ADDRESS, args)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_i64_accepts_integral_floats() {
        assert_eq!(OscArg::Float(12.0).as_i64(), Some(12));
        assert_eq!(OscArg::Float(12.5).as_i64(), None);
        assert_eq!(OscArg::Long(1 << 40).as_i64(), Some(1 << 40));
        assert_eq!(OscArg::Str("12".into()).as_i64(), None);
    }

    #[test]
    fn test_as_f32_accepts_every_numeric_type() {
        assert_eq!(OscArg::Int(3).as_f32(), Some(3.0));
        assert_eq!(OscArg::Double(0.25).as_f32(), Some(0.25));
        assert_eq!(OscArg::Nil.as_f32(), None);
    }

    #[test]
    fn test_flatten_preserves_depth_first_order() {
        // Arrange
        let msg = |n: i32| OscPacket::Message(OscMessage::new("/a", vec![OscArg::Int(n)]));
        let bundle = OscBundle {
            time_tag: TimeTag::IMMEDIATE,
            elements: vec![
                msg(1),
                OscPacket::Bundle(OscBundle {
                    time_tag: TimeTag::IMMEDIATE,
                    elements: vec![msg(2), msg(3)],
                }),
                msg(4),
            ],
        };

        // Act
        let flat: Vec<i32> = bundle
            .flatten()
            .iter()
            .filter_map(|m| m.args[0].as_i64())
            .map(|n| n as i32)
            .collect();

        // Assert
        assert_eq!(flat, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_set_to_osc_includes_acceleration_only_when_present() {
        let mut set = CursorSet {
            session_id: 7,
            x: 0.5,
            y: 0.25,
            vx: 0.0,
            vy: 0.0,
            accel: None,
        };
        assert_eq!(CursorMessage::Set(set).to_osc().args.len(), 6);

        set.accel = Some(0.0);
        let osc = CursorMessage::Set(set).to_osc();
        assert_eq!(osc.address, CURSOR_PROFILE_ADDRESS);
        assert_eq!(osc.args.len(), 7);
        assert_eq!(osc.args[0], OscArg::Str("set".into()));
    }

    #[test]
    fn test_large_fseq_is_encoded_as_long() {
        let osc = CursorMessage::Fseq(i64::from(i32::MAX) + 1).to_osc();
        assert_eq!(osc.args[1], OscArg::Long(i64::from(i32::MAX) + 1));
    }
}
