//! Socket lifecycle management.

use tokio::net::TcpStream;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::config::RetryPolicy;
use crate::error::{IngestError, Result};

/// Owns connect and reconnect for one ingestion session.
///
/// `acquire` never gives up under the default policy: on any connect error
/// it logs, waits the fixed delay, and tries again until the session is
/// cancelled from outside. Teardown is simply dropping the stream; the
/// manager keeps no state across attempts beyond a reconnect counter for
/// log context.
#[derive(Debug)]
pub struct ConnectionManager {
    endpoint: String,
    retry: RetryPolicy,
    connections: u64,
}

impl ConnectionManager {
    pub fn new(endpoint: impl Into<String>, retry: RetryPolicy) -> Self {
        Self { endpoint: endpoint.into(), retry, connections: 0 }
    }

    /// The configured `host:port`.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Number of connections established so far in this session.
    pub fn connections(&self) -> u64 {
        self.connections
    }

    /// Establish a connection, retrying per the policy.
    ///
    /// Returns an error only when the policy bounds the attempt count and
    /// the bound is exhausted.
    pub async fn acquire(&mut self) -> Result<TcpStream> {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match TcpStream::connect(&self.endpoint).await {
                Ok(stream) => {
                    self.connections += 1;
                    info!(
                        endpoint = %self.endpoint,
                        connection = self.connections,
                        "connected to telemetry source"
                    );
                    return Ok(stream);
                }
                Err(e) => {
                    if let Some(max) = self.retry.max_attempts {
                        if attempt >= max {
                            return Err(IngestError::Connect {
                                endpoint: self.endpoint.clone(),
                                attempts: attempt,
                                source: e,
                            });
                        }
                    }
                    warn!(
                        endpoint = %self.endpoint,
                        attempt,
                        error = %e,
                        "connect failed; retrying in {:?}",
                        self.retry.delay()
                    );
                    sleep(self.retry.delay()).await;
                }
            }
        }
    }
}
