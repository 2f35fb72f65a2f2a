//! Frame payload decoding.
//!
//! Two interchangeable decode strategies convert a raw payload (an opaque
//! binary blob or one line of JSON text) into a [`Frame`]. The strategy is
//! selected by the session's [`WireFormat`] and never changes mid-session.
//!
//! A decode failure aborts the entire frame (zero objects reach a
//! consumer) but is non-fatal to the session: the caller logs the error
//! and continues reading on the same connection.

pub mod binary;
pub mod json;

use crate::error::DecodeError;
use crate::types::{Frame, WireFormat};

/// Decode one wire-level payload into a frame using the given format.
pub fn decode(format: WireFormat, payload: &[u8]) -> Result<Frame, DecodeError> {
    match format {
        WireFormat::MsgPack => binary::decode(payload),
        WireFormat::JsonLines => json::decode(payload),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_selects_the_right_strategy() {
        let frame = Frame::empty();

        let packed = binary::encode(&frame).unwrap();
        assert_eq!(decode(WireFormat::MsgPack, &packed).unwrap(), frame);

        let line = br#"{"objects": []}"#;
        assert_eq!(decode(WireFormat::JsonLines, line).unwrap(), frame);
    }
}
