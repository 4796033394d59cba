//! Protocol module: OSC packet codec, TUIO 2D-cursor messages and frames.

pub mod classify;
pub mod codec;
pub mod frame;
pub mod messages;

pub use classify::classify;
pub use codec::{decode_packet, encode_packet, CodecError};
pub use frame::Frame;
pub use messages::*;
