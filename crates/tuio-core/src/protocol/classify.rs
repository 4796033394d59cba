//! Message classifier: OSC message → [`CursorMessage`].
//!
//! Only messages on an address ending in `2Dcur` are considered.  The first
//! argument is the TUIO keyword; the remaining arguments are parsed according
//! to that keyword.  Anything that does not fit is protocol noise and yields
//! `None` – it is never an error.

use tracing::trace;

use crate::protocol::messages::{CursorMessage, CursorSet, OscArg, OscMessage, CURSOR_PROFILE_SUFFIX};

/// Returns `true` if `address` belongs to the 2D-cursor profile.
pub fn is_cursor_address(address: &str) -> bool {
    address.ends_with(CURSOR_PROFILE_SUFFIX)
}

/// Classifies one OSC message.
///
/// Returns `None` for messages from other profiles, unknown keywords and
/// messages whose arguments are missing or of the wrong type.
///
/// # Examples
///
/// ```rust
/// use tuio_core::protocol::classify::classify;
/// use tuio_core::protocol::messages::{CursorMessage, OscArg, OscMessage};
///
/// let msg = OscMessage::new("/tuio/2Dcur", vec![OscArg::Str("fseq".into()), OscArg::Int(9)]);
/// assert_eq!(classify(&msg), Some(CursorMessage::Fseq(9)));
///
/// let blob = OscMessage::new("/tuio/2Dblb", vec![OscArg::Str("fseq".into()), OscArg::Int(9)]);
/// assert_eq!(classify(&blob), None);
/// ```
pub fn classify(msg: &OscMessage) -> Option<CursorMessage> {
    if !is_cursor_address(&msg.address) {
        trace!(address = %msg.address, "ignoring message outside the 2Dcur profile");
        return None;
    }

    let Some(keyword) = msg.args.first().and_then(OscArg::as_str) else {
        trace!(address = %msg.address, "ignoring 2Dcur message without keyword");
        return None;
    };
    let args = &msg.args[1..];

    let parsed = match keyword.to_ascii_lowercase().as_str() {
        "source" => args
            .first()
            .and_then(OscArg::as_str)
            .map(|name| CursorMessage::Source(name.to_string())),
        "alive" => parse_alive(args).map(CursorMessage::Alive),
        "set" => parse_set(args).map(CursorMessage::Set),
        "fseq" => args.first().and_then(OscArg::as_i64).map(CursorMessage::Fseq),
        _ => None,
    };

    if parsed.is_none() {
        trace!(keyword, "ignoring unrecognised or malformed 2Dcur message");
    }
    parsed
}

/// Every id must parse; a partially readable alive list would silently end
/// the touches whose ids were lost.
fn parse_alive(args: &[OscArg]) -> Option<Vec<i32>> {
    args.iter().map(session_id).collect()
}

fn parse_set(args: &[OscArg]) -> Option<CursorSet> {
    let session_id = session_id(args.first()?)?;
    let x = args.get(1)?.as_f32()?;
    let y = args.get(2)?.as_f32()?;
    let vx = args.get(3)?.as_f32()?;
    let vy = args.get(4)?.as_f32()?;
    let accel = args.get(5).and_then(OscArg::as_f32);
    Some(CursorSet {
        session_id,
        x,
        y,
        vx,
        vy,
        accel,
    })
}

fn session_id(arg: &OscArg) -> Option<i32> {
    arg.as_i64().and_then(|v| i32::try_from(v).ok())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn cur(args: Vec<OscArg>) -> OscMessage {
        OscMessage::new("/tuio/2Dcur", args)
    }

    fn s(v: &str) -> OscArg {
        OscArg::Str(v.to_string())
    }

    #[test]
    fn test_source_message() {
        let msg = cur(vec![s("source"), s("TuioPad@10.0.0.1")]);
        assert_eq!(
            classify(&msg),
            Some(CursorMessage::Source("TuioPad@10.0.0.1".into()))
        );
    }

    #[test]
    fn test_empty_alive_is_valid() {
        assert_eq!(classify(&cur(vec![s("alive")])), Some(CursorMessage::Alive(vec![])));
    }

    #[test]
    fn test_alive_preserves_id_order() {
        let msg = cur(vec![s("alive"), OscArg::Int(13), OscArg::Int(12)]);
        assert_eq!(classify(&msg), Some(CursorMessage::Alive(vec![13, 12])));
    }

    #[test]
    fn test_alive_with_unreadable_id_is_dropped_whole() {
        let msg = cur(vec![s("alive"), OscArg::Int(13), s("x")]);
        assert_eq!(classify(&msg), None);
    }

    #[test]
    fn test_set_with_acceleration() {
        // Arrange
        let msg = cur(vec![
            s("set"),
            OscArg::Int(12),
            OscArg::Float(0.5),
            OscArg::Float(0.25),
            OscArg::Float(0.1),
            OscArg::Float(-0.1),
            OscArg::Float(0.0),
        ]);

        // Act
        let parsed = classify(&msg);

        // Assert
        assert_eq!(
            parsed,
            Some(CursorMessage::Set(CursorSet {
                session_id: 12,
                x: 0.5,
                y: 0.25,
                vx: 0.1,
                vy: -0.1,
                accel: Some(0.0),
            }))
        );
    }

    #[test]
    fn test_set_without_acceleration() {
        let msg = cur(vec![
            s("set"),
            OscArg::Int(1),
            OscArg::Float(0.5),
            OscArg::Float(0.5),
            OscArg::Float(0.0),
            OscArg::Float(0.0),
        ]);
        match classify(&msg) {
            Some(CursorMessage::Set(set)) => assert_eq!(set.accel, None),
            other => panic!("expected set, got {other:?}"),
        }
    }

    #[test]
    fn test_set_with_missing_fields_is_noise() {
        let msg = cur(vec![s("set"), OscArg::Int(1), OscArg::Float(0.5)]);
        assert_eq!(classify(&msg), None);
    }

    #[test]
    fn test_keyword_is_case_insensitive() {
        let msg = cur(vec![s("FSEQ"), OscArg::Int(4)]);
        assert_eq!(classify(&msg), Some(CursorMessage::Fseq(4)));
    }

    #[test]
    fn test_other_profiles_are_ignored() {
        let msg = OscMessage::new("/tuio/2Dobj", vec![s("alive"), OscArg::Int(1)]);
        assert_eq!(classify(&msg), None);
    }

    #[test]
    fn test_unknown_keyword_is_ignored() {
        assert_eq!(classify(&cur(vec![s("frobnicate")])), None);
    }

    #[test]
    fn test_message_without_keyword_is_ignored() {
        assert_eq!(classify(&cur(vec![])), None);
        assert_eq!(classify(&cur(vec![OscArg::Int(1)])), None);
    }

    #[test]
    fn test_out_of_range_session_id_is_rejected() {
        let msg = cur(vec![s("alive"), OscArg::Long(i64::from(i32::MAX) + 1)]);
        assert_eq!(classify(&msg), None);
    }
}
