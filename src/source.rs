//! Frame source seam and the TCP socket implementation.

use async_trait::async_trait;
use tokio::net::TcpStream;
use tracing::{debug, warn};

use crate::codec;
use crate::config::IngestConfig;
use crate::connection::ConnectionManager;
use crate::error::Result;
use crate::framing::FrameReader;
use crate::types::{Frame, WireFormat};

/// Trait for telemetry frame sources.
///
/// Abstracts over where frames come from so the ingestion loop can be
/// driven from a live socket in production and from scripted sources in
/// tests.
#[async_trait]
pub trait FrameSource: Send + 'static {
    /// Produce the next decoded frame.
    ///
    /// Connection losses are handled inside the source (reconnect, then
    /// keep reading); a returned error is either a per-frame decode
    /// failure, which the caller logs and skips, or an exhausted bounded
    /// retry budget, which ends the session.
    async fn next_frame(&mut self) -> Result<Frame>;

    /// The wire format this source speaks.
    fn wire_format(&self) -> WireFormat;
}

/// Frame source reading from a TCP connection to the simulation bridge.
///
/// Owns the connection lifecycle: frames are read off the current
/// connection until a loss is signalled, at which point the socket is torn
/// down and the whole cycle restarts from a fresh connection after the
/// configured delay. Partial bytes from the old connection are discarded,
/// never stitched across reconnects.
#[derive(Debug)]
pub struct SocketSource {
    manager: ConnectionManager,
    reader: Option<FrameReader<TcpStream>>,
    format: WireFormat,
    max_frame_bytes: u32,
}

impl SocketSource {
    /// Connect to the configured endpoint and hold the session's first
    /// connection.
    ///
    /// With the default unbounded retry policy this waits for the source
    /// to appear; with a bounded policy it can fail with
    /// [`crate::IngestError::Connect`].
    pub async fn connect(config: &IngestConfig) -> Result<Self> {
        let mut manager = ConnectionManager::new(config.endpoint.clone(), config.retry.clone());
        let stream = manager.acquire().await?;
        let reader = FrameReader::new(stream, config.wire_format, config.max_frame_bytes);
        Ok(Self {
            manager,
            reader: Some(reader),
            format: config.wire_format,
            max_frame_bytes: config.max_frame_bytes,
        })
    }

    /// The configured `host:port`.
    pub fn endpoint(&self) -> &str {
        self.manager.endpoint()
    }

    /// Number of connections established so far, including the first.
    pub fn connections(&self) -> u64 {
        self.manager.connections()
    }
}

#[async_trait]
impl FrameSource for SocketSource {
    async fn next_frame(&mut self) -> Result<Frame> {
        loop {
            if self.reader.is_none() {
                let stream = self.manager.acquire().await?;
                self.reader = Some(FrameReader::new(stream, self.format, self.max_frame_bytes));
            }
            let Some(reader) = self.reader.as_mut() else {
                continue;
            };

            let payload = match reader.next_payload().await {
                Ok(payload) => payload,
                Err(e) if e.is_connection_loss() => {
                    warn!(error = %e, "connection lost; reconnecting");
                    // Tear down; the next iteration acquires afresh.
                    self.reader = None;
                    continue;
                }
                Err(e) => return Err(e),
            };

            match codec::decode(self.format, &payload) {
                Ok(frame) => {
                    debug!(objects = frame.len(), "decoded frame");
                    return Ok(frame);
                }
                // Per-frame failure: surface it, but keep the connection.
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn wire_format(&self) -> WireFormat {
        self.format
    }
}
