//! Error types for telemetry ingestion.
//!
//! All errors implement the `std::error::Error` trait and carry structured
//! context. The taxonomy mirrors the failure modes of the ingestion engine:
//!
//! - **Connect**: socket create/connect failure; retried per [`crate::config::RetryPolicy`]
//!   and only surfaced once a bounded retry budget is exhausted.
//! - **ConnectionLost / IncompleteFrame / OversizedFrame**: the peer closed or
//!   errored mid-frame; the current connection is abandoned and re-acquired.
//! - **Decode**: a single frame's payload was malformed; that frame is
//!   discarded and the session continues on the same connection.
//! - **Bridge / Config**: bridge process and configuration failures.
//!
//! No error is fatal to a running session; shutdown happens only through
//! [`crate::driver::SessionHandle::shutdown`].

use thiserror::Error;

/// Result type alias for ingestion operations.
pub type Result<T, E = IngestError> = std::result::Result<T, E>;

/// Main error type for telemetry ingestion.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum IngestError {
    #[error("failed to connect to {endpoint} after {attempts} attempts")]
    Connect {
        endpoint: String,
        attempts: u32,
        #[source]
        source: std::io::Error,
    },

    #[error("connection lost: {context}")]
    ConnectionLost {
        context: &'static str,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("peer closed mid-frame: received {received} of {expected} payload bytes")]
    IncompleteFrame {
        expected: usize,
        received: usize,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("frame length {size} exceeds limit of {limit} bytes")]
    OversizedFrame { size: u32, limit: u32 },

    #[error("frame decode failed")]
    Decode(#[from] DecodeError),

    #[error("bridge process error: {context}")]
    Bridge {
        context: String,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("configuration error: {context}")]
    Config {
        context: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

/// Per-frame decode failure.
///
/// A decode failure aborts the enclosing frame as a unit: partially
/// populated objects never reach a consumer.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum DecodeError {
    #[error("required field '{field}' missing")]
    FieldMissing { field: String },

    #[error("field '{field}' has wrong type (expected {expected})")]
    TypeMismatch { field: String, expected: &'static str },

    #[error("malformed {format} payload: {details}")]
    Malformed { format: &'static str, details: String },

    #[error("{format} encode failed: {details}")]
    Encode { format: &'static str, details: String },
}

impl IngestError {
    /// Returns whether this error is recoverable by retrying the operation.
    pub fn is_retryable(&self) -> bool {
        match self {
            IngestError::Connect { .. } => true,
            IngestError::ConnectionLost { .. } => true,
            IngestError::IncompleteFrame { .. } => true,
            IngestError::OversizedFrame { .. } => true,
            IngestError::Decode(_) => false,
            IngestError::Bridge { .. } => false,
            IngestError::Config { .. } => false,
        }
    }

    /// Returns whether this error means the current connection is unusable.
    ///
    /// An incomplete frame is treated identically to a lost connection: the
    /// socket is torn down and framing restarts on a fresh connection. An
    /// oversized length prefix means the stream is out of sync, which is
    /// indistinguishable from corruption, so the connection is dropped too.
    pub fn is_connection_loss(&self) -> bool {
        matches!(
            self,
            IngestError::ConnectionLost { .. }
                | IngestError::IncompleteFrame { .. }
                | IngestError::OversizedFrame { .. }
        )
    }

    /// Helper constructor for connection loss without an underlying I/O error.
    pub fn connection_lost(context: &'static str) -> Self {
        IngestError::ConnectionLost { context, source: None }
    }

    /// Helper constructor for connection loss caused by an I/O error.
    pub fn connection_lost_with(context: &'static str, source: std::io::Error) -> Self {
        IngestError::ConnectionLost { context, source: Some(source) }
    }

    /// Helper constructor for an incomplete frame body.
    pub fn incomplete_frame(expected: usize, received: usize) -> Self {
        IngestError::IncompleteFrame { expected, received, source: None }
    }

    /// Helper constructor for bridge process failures.
    pub fn bridge(context: impl Into<String>, source: std::io::Error) -> Self {
        IngestError::Bridge { context: context.into(), source: Some(source) }
    }

    /// Helper constructor for configuration failures.
    pub fn config(context: impl Into<String>) -> Self {
        IngestError::Config { context: context.into(), source: None }
    }

    /// Helper constructor for configuration failures with a source error.
    pub fn config_with(
        context: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        IngestError::Config { context: context.into(), source: Some(source) }
    }
}
