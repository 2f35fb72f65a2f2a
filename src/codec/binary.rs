//! Binary frame payload codec.
//!
//! Payloads are MessagePack maps keyed by field name, a self-describing
//! structured encoding with a top-level `objects` list. Map-keyed encoding
//! (`to_vec_named`) is used rather than positional tuples so the payload
//! carries its own field names, matching what cross-language producers
//! emit.

use crate::error::DecodeError;
use crate::types::Frame;

const FORMAT: &str = "msgpack";

/// Decode a MessagePack payload into a frame.
///
/// Any missing key, wrong scalar type, or malformed container aborts the
/// whole frame.
pub fn decode(payload: &[u8]) -> Result<Frame, DecodeError> {
    rmp_serde::from_slice(payload)
        .map_err(|e| DecodeError::Malformed { format: FORMAT, details: e.to_string() })
}

/// Encode a frame as a map-keyed MessagePack payload.
///
/// Inverse of [`decode`] for well-formed frames; used by tests and by
/// simulation tooling that feeds the engine.
pub fn encode(frame: &Frame) -> Result<Vec<u8>, DecodeError> {
    rmp_serde::to_vec_named(frame)
        .map_err(|e| DecodeError::Encode { format: FORMAT, details: e.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SensorObject;
    use proptest::prelude::*;

    fn sample_object(object_id: &str) -> SensorObject {
        SensorObject {
            timestamp: "2025-04-09T22:35:11".to_string(),
            sensor_id: "sensor1".to_string(),
            source_id: "src1".to_string(),
            x: 1.0,
            y: 2.0,
            z: 3.0,
            x_dir: 0.1,
            y_dir: 0.2,
            z_dir: 0.3,
            range: 100.0,
            range_rate: 5.0,
            power: 10.0,
            azimuth: 15.0,
            elevation: 20.0,
            object_id: object_id.to_string(),
            x_size: 2.0,
            y_size: 3.0,
            z_size: 4.0,
            confidence: 0.9,
        }
    }

    #[test]
    fn round_trip_preserves_a_sample_frame() {
        let frame = Frame { objects: vec![sample_object("1"), sample_object("BEACON123")] };
        let payload = encode(&frame).unwrap();
        assert_eq!(decode(&payload).unwrap(), frame);
    }

    #[test]
    fn garbage_payload_is_malformed() {
        let err = decode(b"\xc1\xc1\xc1not msgpack").unwrap_err();
        assert!(matches!(err, DecodeError::Malformed { format: "msgpack", .. }));
    }

    #[test]
    fn truncated_payload_is_malformed() {
        let frame = Frame { objects: vec![sample_object("7")] };
        let payload = encode(&frame).unwrap();
        let err = decode(&payload[..payload.len() / 2]).unwrap_err();
        assert!(matches!(err, DecodeError::Malformed { .. }));
    }

    prop_compose! {
        fn arb_object()(
            timestamp in "[ -~]{0,24}",
            sensor_id in "\\w{1,8}",
            source_id in "\\w{1,8}",
            object_id in "\\w{1,12}",
            scalars in prop::array::uniform15(-1.0e6f32..1.0e6f32),
        ) -> SensorObject {
            SensorObject {
                timestamp,
                sensor_id,
                source_id,
                x: scalars[0],
                y: scalars[1],
                z: scalars[2],
                x_dir: scalars[3],
                y_dir: scalars[4],
                z_dir: scalars[5],
                range: scalars[6],
                range_rate: scalars[7],
                power: scalars[8],
                azimuth: scalars[9],
                elevation: scalars[10],
                object_id,
                x_size: scalars[11],
                y_size: scalars[12],
                z_size: scalars[13],
                confidence: scalars[14],
            }
        }
    }

    proptest! {
        #[test]
        fn round_trip_holds_for_all_well_formed_frames(
            objects in prop::collection::vec(arb_object(), 0..8)
        ) {
            let frame = Frame { objects };
            let payload = encode(&frame).unwrap();
            prop_assert_eq!(decode(&payload).unwrap(), frame);
        }
    }
}
