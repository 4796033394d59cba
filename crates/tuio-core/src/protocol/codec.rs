//! Binary codec for OSC 1.0 packets as used by TUIO trackers.
//!
//! Wire format:
//! ```text
//! message: [address: osc-string][type tags: osc-string ",..."][args...]
//! bundle:  ["#bundle\0"][time tag: u32 seconds, u32 fraction]
//!          ([element size: i32][element: message | bundle])*
//! ```
//! An osc-string is ASCII, null-terminated and zero-padded to a multiple of
//! four bytes.  All numbers are big-endian.  Every element is 4-byte aligned.

use crate::protocol::messages::{OscArg, OscBundle, OscMessage, OscPacket, TimeTag};
use thiserror::Error;

/// Leading bytes of every OSC bundle.
const BUNDLE_TAG: &[u8; 8] = b"#bundle\0";

/// Bundles nested deeper than this are rejected instead of recursed into.
pub const MAX_BUNDLE_DEPTH: usize = 16;

/// Errors that can occur while encoding or decoding OSC packets.
#[derive(Debug, Error, PartialEq)]
pub enum CodecError {
    /// The byte slice ends before a field that must be present.
    #[error("insufficient data: need at least {needed} bytes, got {available}")]
    InsufficientData { needed: usize, available: usize },

    /// OSC packets and bundle elements are always a multiple of 4 bytes long.
    #[error("packet length {0} is not a multiple of 4")]
    Unaligned(usize),

    /// The first byte is neither `/` (message) nor `#` (bundle).
    #[error("not an OSC packet: leading byte 0x{0:02X}")]
    NotOsc(u8),

    /// An osc-string has no null terminator inside the buffer.
    #[error("unterminated string at offset {0}")]
    UnterminatedString(usize),

    /// An osc-string is not valid UTF-8.
    #[error("invalid UTF-8 in string at offset {0}")]
    InvalidUtf8(usize),

    /// The type tag string does not start with `,`.
    #[error("type tag string must start with ',' (got {0:?})")]
    MalformedTypeTags(String),

    /// A type tag this codec does not understand.
    #[error("unknown type tag '{0}'")]
    UnknownTypeTag(char),

    /// A bundle element declares a size that does not fit the bundle.
    #[error("invalid bundle element size {size} at offset {offset}")]
    InvalidElementSize { size: i32, offset: usize },

    /// Bundles are nested deeper than [`MAX_BUNDLE_DEPTH`].
    #[error("bundle nesting exceeds {MAX_BUNDLE_DEPTH} levels")]
    TooDeep,

    /// A string to be encoded contains a null byte.
    #[error("string contains an interior null byte: {0:?}")]
    InteriorNul(String),
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Decodes one OSC packet (message or bundle) occupying all of `bytes`.
///
/// # Errors
///
/// Returns [`CodecError`] if the bytes are not a well-formed OSC packet.
///
/// # Examples
///
/// ```rust
/// use tuio_core::protocol::codec::{decode_packet, encode_packet};
/// use tuio_core::protocol::messages::{OscArg, OscMessage, OscPacket};
///
/// let packet = OscPacket::Message(OscMessage::new(
///     "/tuio/2Dcur",
///     vec![OscArg::Str("fseq".into()), OscArg::Int(7)],
/// ));
/// let bytes = encode_packet(&packet).unwrap();
/// assert_eq!(decode_packet(&bytes).unwrap(), packet);
/// ```
pub fn decode_packet(bytes: &[u8]) -> Result<OscPacket, CodecError> {
    decode_element(bytes, 0)
}

/// Encodes an OSC packet into its wire representation.
///
/// # Errors
///
/// Returns [`CodecError::InteriorNul`] if an address or string argument
/// contains a null byte, which cannot be represented as an osc-string.
pub fn encode_packet(packet: &OscPacket) -> Result<Vec<u8>, CodecError> {
    let mut buf = Vec::with_capacity(64);
    encode_into(&mut buf, packet)?;
    Ok(buf)
}

// ── Decoding ──────────────────────────────────────────────────────────────────

fn decode_element(bytes: &[u8], depth: usize) -> Result<OscPacket, CodecError> {
    let first = *bytes.first().ok_or(CodecError::InsufficientData {
        needed: 4,
        available: 0,
    })?;
    if bytes.len() % 4 != 0 {
        return Err(CodecError::Unaligned(bytes.len()));
    }
    match first {
        b'/' => decode_message(bytes).map(OscPacket::Message),
        b'#' => decode_bundle(bytes, depth).map(OscPacket::Bundle),
        other => Err(CodecError::NotOsc(other)),
    }
}

fn decode_bundle(bytes: &[u8], depth: usize) -> Result<OscBundle, CodecError> {
    if depth >= MAX_BUNDLE_DEPTH {
        return Err(CodecError::TooDeep);
    }
    require_len(bytes, 16)?;
    if &bytes[..8] != BUNDLE_TAG {
        return Err(CodecError::NotOsc(bytes[0]));
    }
    let time_tag = TimeTag {
        seconds: read_u32(bytes, 8)?,
        fraction: read_u32(bytes, 12)?,
    };

    let mut elements = Vec::new();
    let mut off = 16;
    while off < bytes.len() {
        let size = read_i32(bytes, off)?;
        let start = off + 4;
        let valid = size > 0
            && size % 4 == 0
            && start
                .checked_add(size as usize)
                .is_some_and(|end| end <= bytes.len());
        if !valid {
            return Err(CodecError::InvalidElementSize { size, offset: off });
        }
        let end = start + size as usize;
        elements.push(decode_element(&bytes[start..end], depth + 1)?);
        off = end;
    }

    Ok(OscBundle { time_tag, elements })
}

fn decode_message(bytes: &[u8]) -> Result<OscMessage, CodecError> {
    let (address, mut off) = read_padded_string(bytes, 0)?;

    // Pre-1.0 senders may omit the type tag string entirely.
    if off >= bytes.len() {
        return Ok(OscMessage::new(address, Vec::new()));
    }
    let (tag_string, tags_end) = read_padded_string(bytes, off)?;
    let Some(tags) = tag_string.strip_prefix(',') else {
        return Err(CodecError::MalformedTypeTags(tag_string.clone()));
    };
    off = tags_end;

    let mut args = Vec::with_capacity(tags.len());
    for tag in tags.chars() {
        let arg = match tag {
            'i' => {
                let v = read_i32(bytes, off)?;
                off += 4;
                OscArg::Int(v)
            }
            'f' => {
                let v = f32::from_bits(read_u32(bytes, off)?);
                off += 4;
                OscArg::Float(v)
            }
            's' | 'S' => {
                let (s, next) = read_padded_string(bytes, off)?;
                off = next;
                OscArg::Str(s)
            }
            'b' => {
                let len = read_i32(bytes, off)?;
                let start = off + 4;
                let len = usize::try_from(len)
                    .map_err(|_| CodecError::InvalidElementSize { size: len, offset: off })?;
                require_len(bytes, start + len)?;
                off = start + padded(len);
                OscArg::Blob(bytes[start..start + len].to_vec())
            }
            'h' => {
                let v = read_u64(bytes, off)? as i64;
                off += 8;
                OscArg::Long(v)
            }
            'd' => {
                let v = f64::from_bits(read_u64(bytes, off)?);
                off += 8;
                OscArg::Double(v)
            }
            't' => {
                let v = TimeTag {
                    seconds: read_u32(bytes, off)?,
                    fraction: read_u32(bytes, off + 4)?,
                };
                off += 8;
                OscArg::Time(v)
            }
            'T' => OscArg::Bool(true),
            'F' => OscArg::Bool(false),
            'N' => OscArg::Nil,
            'I' => OscArg::Impulse,
            other => return Err(CodecError::UnknownTypeTag(other)),
        };
        args.push(arg);
    }

    Ok(OscMessage::new(address, args))
}

// ── Encoding ──────────────────────────────────────────────────────────────────

fn encode_into(buf: &mut Vec<u8>, packet: &OscPacket) -> Result<(), CodecError> {
    match packet {
        OscPacket::Message(msg) => encode_message(buf, msg),
        OscPacket::Bundle(bundle) => {
            buf.extend_from_slice(BUNDLE_TAG);
            buf.extend_from_slice(&bundle.time_tag.seconds.to_be_bytes());
            buf.extend_from_slice(&bundle.time_tag.fraction.to_be_bytes());
            for element in &bundle.elements {
                // Reserve the size slot, encode, then patch the size in.
                let size_at = buf.len();
                buf.extend_from_slice(&[0; 4]);
                encode_into(buf, element)?;
                let size = (buf.len() - size_at - 4) as i32;
                buf[size_at..size_at + 4].copy_from_slice(&size.to_be_bytes());
            }
            Ok(())
        }
    }
}

fn encode_message(buf: &mut Vec<u8>, msg: &OscMessage) -> Result<(), CodecError> {
    write_padded_string(buf, &msg.address)?;

    let mut tags = String::with_capacity(msg.args.len() + 1);
    tags.push(',');
    tags.extend(msg.args.iter().map(OscArg::type_tag));
    write_padded_string(buf, &tags)?;

    for arg in &msg.args {
        match arg {
            OscArg::Int(v) => buf.extend_from_slice(&v.to_be_bytes()),
            OscArg::Float(v) => buf.extend_from_slice(&v.to_bits().to_be_bytes()),
            OscArg::Str(s) => write_padded_string(buf, s)?,
            OscArg::Blob(data) => {
                buf.extend_from_slice(&(data.len() as i32).to_be_bytes());
                buf.extend_from_slice(data);
                buf.resize(buf.len() + padded(data.len()) - data.len(), 0);
            }
            OscArg::Long(v) => buf.extend_from_slice(&v.to_be_bytes()),
            OscArg::Double(v) => buf.extend_from_slice(&v.to_bits().to_be_bytes()),
            OscArg::Time(t) => {
                buf.extend_from_slice(&t.seconds.to_be_bytes());
                buf.extend_from_slice(&t.fraction.to_be_bytes());
            }
            OscArg::Bool(_) | OscArg::Nil | OscArg::Impulse => {}
        }
    }
    Ok(())
}

// ── Utility helpers ───────────────────────────────────────────────────────────

/// Rounds `len` up to the next multiple of 4.
fn padded(len: usize) -> usize {
    (len + 3) & !3
}

fn require_len(buf: &[u8], needed: usize) -> Result<(), CodecError> {
    if buf.len() < needed {
        Err(CodecError::InsufficientData {
            needed,
            available: buf.len(),
        })
    } else {
        Ok(())
    }
}

fn read_u32(buf: &[u8], offset: usize) -> Result<u32, CodecError> {
    require_len(buf, offset + 4)?;
    Ok(u32::from_be_bytes([
        buf[offset],
        buf[offset + 1],
        buf[offset + 2],
        buf[offset + 3],
    ]))
}

fn read_i32(buf: &[u8], offset: usize) -> Result<i32, CodecError> {
    read_u32(buf, offset).map(|v| v as i32)
}

fn read_u64(buf: &[u8], offset: usize) -> Result<u64, CodecError> {
    let hi = read_u32(buf, offset)?;
    let lo = read_u32(buf, offset + 4)?;
    Ok((u64::from(hi) << 32) | u64::from(lo))
}

/// Reads a null-terminated, 4-byte padded string.
/// Returns the string and the offset of the first byte after its padding.
fn read_padded_string(buf: &[u8], offset: usize) -> Result<(String, usize), CodecError> {
    let rest = buf.get(offset..).unwrap_or_default();
    let nul = rest
        .iter()
        .position(|b| *b == 0)
        .ok_or(CodecError::UnterminatedString(offset))?;
    let s = std::str::from_utf8(&rest[..nul])
        .map_err(|_| CodecError::InvalidUtf8(offset))?
        .to_string();
    // The terminator counts towards the padded length.
    let next = offset + padded(nul + 1);
    require_len(buf, next)?;
    Ok((s, next))
}

/// Writes `s` followed by 1–4 null bytes so the total is 4-byte aligned.
fn write_padded_string(buf: &mut Vec<u8>, s: &str) -> Result<(), CodecError> {
    if s.as_bytes().contains(&0) {
        return Err(CodecError::InteriorNul(s.to_string()));
    }
    buf.extend_from_slice(s.as_bytes());
    let total = padded(s.len() + 1);
    buf.resize(buf.len() + total - s.len(), 0);
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
