//! JSON-lines frame payload codec.
//!
//! Each payload is one UTF-8 JSON object of the shape
//! `{"objects": [{field: value, ...}, ...]}` with case-sensitive field
//! names. Fields are extracted by explicit key lookup so that a missing
//! key and a present-but-mistyped value report as distinct failures
//! ([`DecodeError::FieldMissing`] vs [`DecodeError::TypeMismatch`]).

use serde_json::{Map, Value};

use crate::error::DecodeError;
use crate::types::{Frame, SensorObject};

const FORMAT: &str = "json";

/// Decode one JSON payload line into a frame.
pub fn decode(payload: &[u8]) -> Result<Frame, DecodeError> {
    let text = std::str::from_utf8(payload).map_err(|e| DecodeError::Malformed {
        format: FORMAT,
        details: format!("payload is not valid UTF-8: {e}"),
    })?;

    let value: Value = serde_json::from_str(text)
        .map_err(|e| DecodeError::Malformed { format: FORMAT, details: e.to_string() })?;

    let root = value
        .as_object()
        .ok_or(DecodeError::TypeMismatch { field: "<root>".to_string(), expected: "object" })?;

    let objects = match root.get("objects") {
        Some(Value::Array(items)) => items,
        Some(_) => {
            return Err(DecodeError::TypeMismatch { field: "objects".to_string(), expected: "array" });
        }
        None => return Err(DecodeError::FieldMissing { field: "objects".to_string() }),
    };

    let objects = objects.iter().map(decode_object).collect::<Result<Vec<_>, _>>()?;
    Ok(Frame { objects })
}

fn decode_object(value: &Value) -> Result<SensorObject, DecodeError> {
    let map = value.as_object().ok_or(DecodeError::TypeMismatch {
        field: "objects[]".to_string(),
        expected: "object",
    })?;

    Ok(SensorObject {
        timestamp: get_string(map, "timestamp")?,
        sensor_id: get_string(map, "sensorId")?,
        source_id: get_string(map, "sourceId")?,
        x: get_f32(map, "X")?,
        y: get_f32(map, "Y")?,
        z: get_f32(map, "Z")?,
        x_dir: get_f32(map, "Xdir")?,
        y_dir: get_f32(map, "Ydir")?,
        z_dir: get_f32(map, "Zdir")?,
        range: get_f32(map, "range")?,
        range_rate: get_f32(map, "rangeRate")?,
        power: get_f32(map, "power")?,
        azimuth: get_f32(map, "azimuth")?,
        elevation: get_f32(map, "elevation")?,
        object_id: get_string(map, "objectId")?,
        x_size: get_f32(map, "Xsize")?,
        y_size: get_f32(map, "Ysize")?,
        z_size: get_f32(map, "Zsize")?,
        confidence: get_f32(map, "confidence")?,
    })
}

fn get_string(map: &Map<String, Value>, field: &str) -> Result<String, DecodeError> {
    match map.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(DecodeError::TypeMismatch { field: field.to_string(), expected: "string" }),
        None => Err(DecodeError::FieldMissing { field: field.to_string() }),
    }
}

fn get_f32(map: &Map<String, Value>, field: &str) -> Result<f32, DecodeError> {
    match map.get(field) {
        // Values pass through verbatim at single precision, no rounding
        // beyond the f64 -> f32 narrowing inherent to JSON numbers.
        Some(Value::Number(n)) => match n.as_f64() {
            Some(v) => Ok(v as f32),
            None => Err(DecodeError::TypeMismatch { field: field.to_string(), expected: "number" }),
        },
        Some(_) => Err(DecodeError::TypeMismatch { field: field.to_string(), expected: "number" }),
        None => Err(DecodeError::FieldMissing { field: field.to_string() }),
    }
}
