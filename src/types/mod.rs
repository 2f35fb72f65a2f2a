//! Core record types for telemetry frames.

mod object;
mod wire;

pub use object::{Frame, SensorObject};
pub use wire::WireFormat;
