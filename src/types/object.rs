//! Sensor object and frame record types.
//!
//! A [`Frame`] is one complete sampling-instant unit of sensor data as
//! delivered over the wire; a [`SensorObject`] is one detected entity's
//! measurement record within it. Frames are immutable once decoded and are
//! never retained past consumer dispatch; there is no cross-frame
//! aggregation or caching in this engine.

use serde::{Deserialize, Serialize};

/// One detected entity within a single frame.
///
/// Field population is all-or-nothing per frame: if any required field is
/// absent or malformed, the enclosing frame decode fails as a unit.
///
/// All numeric fields are IEEE-754 single precision and pass through
/// verbatim; no rounding or unit conversion is performed. `timestamp` is
/// producer-supplied and opaque; it is never reparsed or validated here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorObject {
    /// Producer-supplied capture timestamp, opaque to the engine.
    pub timestamp: String,

    /// Identifier of the emitting sensor.
    #[serde(rename = "sensorId")]
    pub sensor_id: String,

    /// Identifier of the data source.
    #[serde(rename = "sourceId")]
    pub source_id: String,

    /// Position components.
    #[serde(rename = "X")]
    pub x: f32,
    #[serde(rename = "Y")]
    pub y: f32,
    #[serde(rename = "Z")]
    pub z: f32,

    /// Unit-free directional components.
    #[serde(rename = "Xdir")]
    pub x_dir: f32,
    #[serde(rename = "Ydir")]
    pub y_dir: f32,
    #[serde(rename = "Zdir")]
    pub z_dir: f32,

    pub range: f32,
    #[serde(rename = "rangeRate")]
    pub range_rate: f32,
    pub power: f32,
    pub azimuth: f32,
    pub elevation: f32,

    /// Object identifier. The format varies across producers: a bare
    /// numeric token or a label-with-suffix form such as `"BEACON123"`.
    /// The engine does not interpret it; interpretation belongs to
    /// consumer strategies.
    #[serde(rename = "objectId")]
    pub object_id: String,

    /// Extent components.
    #[serde(rename = "Xsize")]
    pub x_size: f32,
    #[serde(rename = "Ysize")]
    pub y_size: f32,
    #[serde(rename = "Zsize")]
    pub z_size: f32,

    /// Producer-supplied detection confidence. No range is enforced.
    pub confidence: f32,
}

/// An ordered sequence of sensor objects captured at one sampling instant.
///
/// Order as received is preserved; no deduplication or sorting is applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub objects: Vec<SensorObject>,
}

impl Frame {
    /// An empty frame with no detected objects.
    pub fn empty() -> Self {
        Self { objects: Vec::new() }
    }

    /// Number of objects captured in this frame.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether this frame contains no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_key_names_are_preserved() {
        let object = SensorObject {
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
            object_id: "42".to_string(),
            x_size: 2.0,
            y_size: 3.0,
            z_size: 4.0,
            confidence: 0.9,
        };

        let json = serde_json::to_value(&object).unwrap();
        let map = json.as_object().unwrap();

        for key in [
            "timestamp",
            "sensorId",
            "sourceId",
            "X",
            "Y",
            "Z",
            "Xdir",
            "Ydir",
            "Zdir",
            "range",
            "rangeRate",
            "power",
            "azimuth",
            "elevation",
            "objectId",
            "Xsize",
            "Ysize",
            "Zsize",
            "confidence",
        ] {
            assert!(map.contains_key(key), "missing wire key '{key}'");
        }
        assert_eq!(map.len(), 19);
    }

    #[test]
    fn empty_frame_has_no_objects() {
        let frame = Frame::empty();
        assert!(frame.is_empty());
        assert_eq!(frame.len(), 0);
    }
}
