//! Async Rust client for streamed radar telemetry.
//!
//! Radarlink ingests sensor-object frames over TCP from a simulation or
//! bridge process, frames the byte stream under two wire formats
//! (length-prefixed MessagePack and newline-delimited JSON), decodes each
//! frame into structured records, and hands them to a pluggable consumer,
//! surviving network failures by reconnecting with a fixed delay.
//!
//! # Features
//!
//! - **Two wire formats**: length-prefixed binary and JSON lines, selected
//!   per session and never mixed.
//! - **Never-give-up reconnect**: fixed-delay unbounded retry by default,
//!   boundable via [`RetryPolicy`].
//! - **Synchronous dispatch**: each frame is fully consumed before the
//!   next is read; no frame buffering.
//! - **Scoped bridge lifecycle**: the external bridge process is spawned
//!   at session start and stopped on shutdown.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use radarlink::{IngestConfig, MinimalDump, Radarlink};
//!
//! #[tokio::main]
//! async fn main() -> radarlink::Result<()> {
//!     let session = Radarlink::connect(IngestConfig::json_lines()).await?;
//!     let handle = session.spawn(MinimalDump::stdout());
//!
//!     tokio::time::sleep(std::time::Duration::from_secs(30)).await;
//!     let stats = handle.shutdown().await;
//!     println!("ingested {} frames", stats.frames);
//!     Ok(())
//! }
//! ```

pub mod bridge;
pub mod codec;
pub mod config;
pub mod connection;
pub mod consumer;
pub mod driver;
mod error;
pub mod framing;
pub mod source;
pub mod types;

// Core exports
pub use bridge::{BridgeConfig, BridgeProcess};
pub use config::{IngestConfig, RetryPolicy};
pub use consumer::{BeaconExtract, Consumer, ConsumerKind, FullDump, MinimalDump, beacon_suffix};
pub use driver::{Driver, SessionHandle, SessionStats};
pub use error::{DecodeError, IngestError, Result};
pub use framing::FrameReader;
pub use source::{FrameSource, SocketSource};
pub use types::{Frame, SensorObject, WireFormat};

use tracing::info;

/// Install a process-wide tracing subscriber honouring `RUST_LOG`.
///
/// Convenience for demo binaries and tests; applications embedding the
/// crate should install their own subscriber instead. Safe to call more
/// than once.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

/// Unified entry point for ingestion sessions.
///
/// # Examples
///
/// ## Connect to an already-running source
/// ```rust,no_run
/// use radarlink::{FullDump, IngestConfig, Radarlink};
///
/// # #[tokio::main]
/// # async fn main() -> radarlink::Result<()> {
/// let session = Radarlink::connect(IngestConfig::msgpack()).await?;
/// let handle = session.spawn(FullDump::stdout());
/// # Ok(())
/// # }
/// ```
///
/// ## Launch the bridge process alongside the session
/// ```rust,no_run
/// use radarlink::{BeaconExtract, BridgeConfig, IngestConfig, Radarlink};
///
/// # #[tokio::main]
/// # async fn main() -> radarlink::Result<()> {
/// let config = IngestConfig::json_lines()
///     .with_bridge(BridgeConfig::new("python3").with_args(["radar_bridge.py"]));
/// let session = Radarlink::launch(config).await?;
/// let handle = session.spawn(BeaconExtract::stdout());
/// # Ok(())
/// # }
/// ```
pub struct Radarlink;

impl Radarlink {
    /// Connect to a telemetry source that is already reachable.
    ///
    /// Acquires the session's first connection, retrying per the
    /// configured policy. With the default unbounded policy this only
    /// returns once connected.
    pub async fn connect(config: IngestConfig) -> Result<IngestSession> {
        let source = SocketSource::connect(&config).await?;
        info!(endpoint = %config.endpoint, format = %config.wire_format, "ingest session ready");
        Ok(IngestSession { source, bridge: None })
    }

    /// Spawn the configured bridge process, wait out its warm-up, then
    /// connect.
    ///
    /// The bridge's lifetime is tied to the session: shutting the session
    /// down stops the bridge, and dropping the session kills it.
    pub async fn launch(config: IngestConfig) -> Result<IngestSession> {
        let bridge_config = config
            .bridge
            .clone()
            .ok_or_else(|| IngestError::config("launch requires a bridge section"))?;
        let bridge = BridgeProcess::spawn(&bridge_config).await?;

        let source = SocketSource::connect(&config).await?;
        info!(endpoint = %config.endpoint, format = %config.wire_format, "ingest session ready");
        Ok(IngestSession { source, bridge: Some(bridge) })
    }
}

/// A connected but not yet running ingestion session.
#[derive(Debug)]
pub struct IngestSession {
    source: SocketSource,
    bridge: Option<BridgeProcess>,
}

impl IngestSession {
    /// The wire format this session speaks.
    pub fn wire_format(&self) -> WireFormat {
        self.source.wire_format()
    }

    /// The telemetry source `host:port`.
    pub fn endpoint(&self) -> &str {
        self.source.endpoint()
    }

    /// Start the ingestion loop with the given consumer strategy.
    pub fn spawn<C: Consumer + 'static>(self, consumer: C) -> SessionHandle {
        let mut handle = Driver::spawn(self.source, consumer);
        if let Some(bridge) = self.bridge {
            handle.attach_bridge(bridge);
        }
        handle
    }
}
