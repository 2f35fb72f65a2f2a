//! Frame boundary detection over a byte stream.
//!
//! Two framing strategies locate frame boundaries in the raw stream:
//!
//! ```text
//! Length-prefixed:  [4-byte big-endian length][length bytes of payload]...
//! Line-delimited:   [UTF-8 JSON text]\n[UTF-8 JSON text]\n...
//! ```
//!
//! The reader owns one connection's buffered byte stream and yields exactly
//! one opaque payload per call. It never stitches bytes across connections:
//! when a loss is signalled, the caller drops the whole reader and builds a
//! fresh one on the next connection, discarding any partial bytes.

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};
use tracing::trace;

use crate::error::{IngestError, Result};
use crate::types::WireFormat;

/// Reads complete frame payloads from an established transport.
///
/// Generic over the transport so framing can be exercised against
/// in-memory streams in tests.
#[derive(Debug)]
pub struct FrameReader<R> {
    inner: BufReader<R>,
    format: WireFormat,
    max_frame_bytes: u32,
}

impl<R: AsyncRead + Unpin> FrameReader<R> {
    /// Wrap an established transport in a frame reader.
    pub fn new(transport: R, format: WireFormat, max_frame_bytes: u32) -> Self {
        Self { inner: BufReader::new(transport), format, max_frame_bytes }
    }

    /// The wire format this reader frames for.
    pub fn format(&self) -> WireFormat {
        self.format
    }

    /// Read bytes until one complete frame payload is available.
    ///
    /// Errors are connection-level: [`IngestError::ConnectionLost`] when the
    /// peer closes or errors at a frame boundary, [`IngestError::IncompleteFrame`]
    /// when it does so mid-payload, and [`IngestError::OversizedFrame`] when a
    /// length prefix exceeds the configured cap. All of them mean the
    /// connection must be abandoned.
    pub async fn next_payload(&mut self) -> Result<Vec<u8>> {
        match self.format {
            WireFormat::MsgPack => self.read_length_prefixed().await,
            WireFormat::JsonLines => self.read_line().await,
        }
    }

    async fn read_length_prefixed(&mut self) -> Result<Vec<u8>> {
        let mut prefix = [0u8; 4];
        self.inner
            .read_exact(&mut prefix)
            .await
            .map_err(|e| IngestError::connection_lost_with("eof before length prefix", e))?;

        let frame_size = u32::from_be_bytes(prefix);
        if frame_size > self.max_frame_bytes {
            return Err(IngestError::OversizedFrame { size: frame_size, limit: self.max_frame_bytes });
        }
        trace!(frame_size, "expecting frame payload");

        // Accumulate across partial reads; recv may return fewer bytes
        // than requested.
        let mut payload = vec![0u8; frame_size as usize];
        let mut received = 0;
        while received < payload.len() {
            match self.inner.read(&mut payload[received..]).await {
                Ok(0) => return Err(IngestError::incomplete_frame(payload.len(), received)),
                Ok(n) => received += n,
                Err(e) => {
                    return Err(IngestError::IncompleteFrame {
                        expected: payload.len(),
                        received,
                        source: Some(e),
                    });
                }
            }
        }

        Ok(payload)
    }

    async fn read_line(&mut self) -> Result<Vec<u8>> {
        let mut line = Vec::new();
        let n = self
            .inner
            .read_until(b'\n', &mut line)
            .await
            .map_err(|e| IngestError::connection_lost_with("read error before delimiter", e))?;

        if n == 0 {
            return Err(IngestError::connection_lost("eof at frame boundary"));
        }
        if line.last() != Some(&b'\n') {
            // Peer closed before the delimiter; the partial line is discarded.
            return Err(IngestError::connection_lost("eof before delimiter"));
        }
        line.pop();

        if line.is_empty() {
            return Err(IngestError::connection_lost("empty frame payload"));
        }

        trace!(len = line.len(), "framed one line payload");
        Ok(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAX: u32 = 1024;

    fn length_prefixed(payload: &[u8]) -> Vec<u8> {
        let mut wire = (payload.len() as u32).to_be_bytes().to_vec();
        wire.extend_from_slice(payload);
        wire
    }

    #[tokio::test]
    async fn yields_each_length_prefixed_payload() {
        let mut wire = length_prefixed(b"first");
        wire.extend(length_prefixed(b"second"));

        let mut reader = FrameReader::new(wire.as_slice(), WireFormat::MsgPack, MAX);
        assert_eq!(reader.next_payload().await.unwrap(), b"first");
        assert_eq!(reader.next_payload().await.unwrap(), b"second");

        let err = reader.next_payload().await.unwrap_err();
        assert!(matches!(err, IngestError::ConnectionLost { .. }));
    }

    #[tokio::test]
    async fn truncated_length_prefix_is_connection_loss() {
        let wire: &[u8] = &[0x00, 0x00];
        let mut reader = FrameReader::new(wire, WireFormat::MsgPack, MAX);
        let err = reader.next_payload().await.unwrap_err();
        assert!(matches!(err, IngestError::ConnectionLost { .. }));
    }

    #[tokio::test]
    async fn truncated_payload_is_incomplete_frame() {
        // Prefix promises 100 bytes but only 10 arrive before EOF.
        let mut wire = 100u32.to_be_bytes().to_vec();
        wire.extend_from_slice(&[0xAA; 10]);

        let mut reader = FrameReader::new(wire.as_slice(), WireFormat::MsgPack, MAX);
        let err = reader.next_payload().await.unwrap_err();
        match err {
            IngestError::IncompleteFrame { expected, received, .. } => {
                assert_eq!(expected, 100);
                assert_eq!(received, 10);
            }
            other => panic!("expected IncompleteFrame, got {other}"),
        }
        assert!(
            IngestError::incomplete_frame(100, 10).is_connection_loss(),
            "incomplete frames must trigger reconnect"
        );
    }

    #[tokio::test]
    async fn oversized_length_prefix_is_rejected() {
        let wire = (MAX + 1).to_be_bytes().to_vec();
        let mut reader = FrameReader::new(wire.as_slice(), WireFormat::MsgPack, MAX);
        let err = reader.next_payload().await.unwrap_err();
        assert!(matches!(err, IngestError::OversizedFrame { .. }));
        assert!(err.is_connection_loss());
    }

    #[tokio::test]
    async fn yields_each_line_without_delimiter() {
        let wire: &[u8] = b"{\"objects\": []}\n{\"objects\": [1]}\n";
        let mut reader = FrameReader::new(wire, WireFormat::JsonLines, MAX);
        assert_eq!(reader.next_payload().await.unwrap(), b"{\"objects\": []}");
        assert_eq!(reader.next_payload().await.unwrap(), b"{\"objects\": [1]}");

        let err = reader.next_payload().await.unwrap_err();
        assert!(matches!(err, IngestError::ConnectionLost { .. }));
    }

    #[tokio::test]
    async fn partial_line_at_eof_is_connection_loss() {
        let wire: &[u8] = b"{\"objects\":";
        let mut reader = FrameReader::new(wire, WireFormat::JsonLines, MAX);
        let err = reader.next_payload().await.unwrap_err();
        assert!(matches!(err, IngestError::ConnectionLost { .. }));
    }

    #[tokio::test]
    async fn empty_line_is_connection_loss() {
        let wire: &[u8] = b"\n";
        let mut reader = FrameReader::new(wire, WireFormat::JsonLines, MAX);
        let err = reader.next_payload().await.unwrap_err();
        assert!(matches!(err, IngestError::ConnectionLost { .. }));
    }
}
