//! Consumer dispatch strategies.
//!
//! Exactly one strategy is active per session, chosen by the invoking
//! command. Dispatch is synchronous: the ingestion loop does not read the
//! next frame until `consume` returns, so unconsumed frames are never
//! buffered.

use std::io::{self, Write};

use tracing::{debug, warn};

use crate::types::Frame;

/// A processing strategy applied to each decoded frame.
pub trait Consumer: Send {
    /// Process one frame. Must complete before the next frame is read.
    ///
    /// Consumers receive the frame by shared reference and never mutate
    /// it; the frame is discarded once dispatch returns.
    fn consume(&mut self, frame: &Frame);
}

/// Which consumer strategy to run, as selected on the command surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumerKind {
    /// Every field of every object, arrival order.
    Full,
    /// Timestamp, sensor, object id, range, azimuth, elevation only.
    Minimal,
    /// Beacon id suffix and range for `BEACON`-labelled objects.
    Beacon,
}

impl ConsumerKind {
    /// Map a single-character command selector to a strategy.
    ///
    /// Returns `None` for unknown selectors; quitting is handled by the
    /// session owner, not here.
    pub fn from_selector(selector: char) -> Option<Self> {
        match selector {
            'f' => Some(ConsumerKind::Full),
            'm' => Some(ConsumerKind::Minimal),
            'b' => Some(ConsumerKind::Beacon),
            _ => None,
        }
    }
}

/// Extract the beacon numeric suffix from an object id.
///
/// Returns the maximal trailing digit run for ids containing the literal
/// `BEACON`, and `None` otherwise. An id that mentions `BEACON` but has no
/// trailing digits is rejected rather than reported with an empty suffix.
pub fn beacon_suffix(object_id: &str) -> Option<&str> {
    if !object_id.contains("BEACON") {
        return None;
    }
    let prefix = object_id.trim_end_matches(|c: char| c.is_ascii_digit());
    let suffix = &object_id[prefix.len()..];
    if suffix.is_empty() { None } else { Some(suffix) }
}

/// Emits every field of every object, human-readable.
pub struct FullDump<W = io::Stdout> {
    out: W,
}

impl FullDump<io::Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> FullDump<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    fn write_frame(&mut self, frame: &Frame) -> io::Result<()> {
        for object in &frame.objects {
            writeln!(self.out, "Timestamp: {}", object.timestamp)?;
            writeln!(self.out, "Sensor: {}", object.sensor_id)?;
            writeln!(self.out, "Source: {}", object.source_id)?;
            writeln!(
                self.out,
                "Position (X, Y, Z): ({}, {}, {})",
                object.x, object.y, object.z
            )?;
            writeln!(
                self.out,
                "Direction (Xdir, Ydir, Zdir): ({}, {}, {})",
                object.x_dir, object.y_dir, object.z_dir
            )?;
            writeln!(self.out, "Range: {}", object.range)?;
            writeln!(self.out, "Range Rate: {}", object.range_rate)?;
            writeln!(self.out, "Power: {}", object.power)?;
            writeln!(self.out, "Azimuth: {}", object.azimuth)?;
            writeln!(self.out, "Elevation: {}", object.elevation)?;
            writeln!(self.out, "ID: {}", object.object_id)?;
            writeln!(
                self.out,
                "Size (Xsize, Ysize, Zsize): ({}, {}, {})",
                object.x_size, object.y_size, object.z_size
            )?;
            writeln!(self.out, "Confidence: {}", object.confidence)?;
            writeln!(self.out, "----------------------------------------")?;
        }
        Ok(())
    }
}

impl<W: Write + Send> Consumer for FullDump<W> {
    fn consume(&mut self, frame: &Frame) {
        if let Err(e) = self.write_frame(frame) {
            warn!(error = %e, "full dump write failed");
        }
    }
}

/// Emits only timestamp, sensor, object id, range, azimuth, and elevation.
pub struct MinimalDump<W = io::Stdout> {
    out: W,
}

impl MinimalDump<io::Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> MinimalDump<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    fn write_frame(&mut self, frame: &Frame) -> io::Result<()> {
        for object in &frame.objects {
            writeln!(
                self.out,
                "[{}] sensor={} object={} range={} azimuth={} elevation={}",
                object.timestamp,
                object.sensor_id,
                object.object_id,
                object.range,
                object.azimuth,
                object.elevation
            )?;
        }
        Ok(())
    }
}

impl<W: Write + Send> Consumer for MinimalDump<W> {
    fn consume(&mut self, frame: &Frame) {
        if let Err(e) = self.write_frame(frame) {
            warn!(error = %e, "minimal dump write failed");
        }
    }
}

/// Emits `(numeric suffix, range)` for `BEACON`-labelled objects.
///
/// Objects whose id does not contain `BEACON` are silently skipped, as are
/// `BEACON` ids without a trailing digit run (logged at debug).
pub struct BeaconExtract<W = io::Stdout> {
    out: W,
}

impl BeaconExtract<io::Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> BeaconExtract<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    fn write_frame(&mut self, frame: &Frame) -> io::Result<()> {
        for object in &frame.objects {
            match beacon_suffix(&object.object_id) {
                Some(suffix) => {
                    writeln!(self.out, "beacon {} range {}", suffix, object.range)?;
                }
                None if object.object_id.contains("BEACON") => {
                    debug!(object_id = %object.object_id, "beacon id without numeric suffix; skipped");
                }
                None => {}
            }
        }
        Ok(())
    }
}

impl<W: Write + Send> Consumer for BeaconExtract<W> {
    fn consume(&mut self, frame: &Frame) {
        if let Err(e) = self.write_frame(frame) {
            warn!(error = %e, "beacon extract write failed");
        }
    }
}
