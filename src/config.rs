//! Ingestion session configuration.
//!
//! All knobs are serde-derived so a session can be described in a YAML
//! file as well as built in code:
//!
//! ```yaml
//! endpoint: "192.168.10.10:4035"
//! wire_format: msg_pack
//! retry:
//!   delay_ms: 5000
//! bridge:
//!   command: python3
//!   args: ["radar_bridge.py"]
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::bridge::BridgeConfig;
use crate::error::{IngestError, Result};
use crate::types::WireFormat;

/// Default endpoint of the simulation server for the binary stream.
pub const DEFAULT_MSGPACK_ENDPOINT: &str = "192.168.10.10:4035";

/// Default endpoint of the local bridge relay for the JSON-lines stream.
pub const DEFAULT_JSON_ENDPOINT: &str = "127.0.0.1:5000";

const DEFAULT_RECONNECT_DELAY_MS: u64 = 5_000;
const DEFAULT_MAX_FRAME_BYTES: u32 = 1024 * 1024;

/// Reconnect behaviour of the connection manager.
///
/// The default preserves the never-give-up contract: a fixed delay between
/// attempts and no upper bound. Deployments that need a failure mode can
/// set `max_attempts` to bound the loop without changing the core
/// contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Fixed delay between connect attempts, in milliseconds.
    pub delay_ms: u64,

    /// Maximum number of connect attempts; `None` retries forever.
    pub max_attempts: Option<u32>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { delay_ms: DEFAULT_RECONNECT_DELAY_MS, max_attempts: None }
    }
}

impl RetryPolicy {
    /// A bounded policy for deployments that must eventually fail.
    pub fn bounded(delay: Duration, max_attempts: u32) -> Self {
        Self { delay_ms: delay.as_millis() as u64, max_attempts: Some(max_attempts) }
    }

    /// The fixed inter-attempt delay.
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// Configuration for one ingestion session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// `host:port` of the telemetry source.
    pub endpoint: String,

    /// Wire format of the stream; selects framing and decode together.
    pub wire_format: WireFormat,

    /// Reconnect behaviour.
    pub retry: RetryPolicy,

    /// Upper bound on a single frame payload. Length prefixes beyond this
    /// are treated as stream corruption and force a reconnect.
    pub max_frame_bytes: u32,

    /// Bridge process to spawn alongside the session, if any.
    pub bridge: Option<BridgeConfig>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_MSGPACK_ENDPOINT.to_string(),
            wire_format: WireFormat::MsgPack,
            retry: RetryPolicy::default(),
            max_frame_bytes: DEFAULT_MAX_FRAME_BYTES,
            bridge: None,
        }
    }
}

impl IngestConfig {
    /// Defaults for the length-prefixed binary stream from the simulation
    /// server.
    pub fn msgpack() -> Self {
        Self::default()
    }

    /// Defaults for the newline-delimited JSON stream from the local
    /// bridge relay.
    pub fn json_lines() -> Self {
        Self {
            endpoint: DEFAULT_JSON_ENDPOINT.to_string(),
            wire_format: WireFormat::JsonLines,
            ..Self::default()
        }
    }

    /// Point the session at a different telemetry source.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Override the reconnect behaviour.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Attach a bridge process to the session lifecycle.
    pub fn with_bridge(mut self, bridge: BridgeConfig) -> Self {
        self.bridge = Some(bridge);
        self
    }

    /// Load a configuration from a YAML file.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            IngestError::config_with(format!("failed to read {}", path.display()), Box::new(e))
        })?;
        Self::from_yaml(&text)
    }

    /// Parse a configuration from YAML text.
    pub fn from_yaml(text: &str) -> Result<Self> {
        serde_yaml_ng::from_str(text)
            .map_err(|e| IngestError::config_with("invalid session YAML", Box::new(e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_observed_deployment() {
        let config = IngestConfig::default();
        assert_eq!(config.endpoint, "192.168.10.10:4035");
        assert_eq!(config.wire_format, WireFormat::MsgPack);
        assert_eq!(config.retry.delay(), Duration::from_secs(5));
        assert_eq!(config.retry.max_attempts, None);

        let json = IngestConfig::json_lines();
        assert_eq!(json.endpoint, "127.0.0.1:5000");
        assert_eq!(json.wire_format, WireFormat::JsonLines);
    }

    #[test]
    fn yaml_round_trip() {
        let config = IngestConfig::json_lines()
            .with_retry(RetryPolicy::bounded(Duration::from_millis(250), 3));
        let yaml = serde_yaml_ng::to_string(&config).unwrap();
        let parsed = IngestConfig::from_yaml(&yaml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn partial_yaml_falls_back_to_defaults() {
        let parsed = IngestConfig::from_yaml("endpoint: \"10.0.0.1:9000\"\n").unwrap();
        assert_eq!(parsed.endpoint, "10.0.0.1:9000");
        assert_eq!(parsed.wire_format, WireFormat::MsgPack);
        assert_eq!(parsed.max_frame_bytes, 1024 * 1024);
    }

    #[test]
    fn invalid_yaml_is_a_config_error() {
        let err = IngestConfig::from_yaml("wire_format: carrier_pigeon\n").unwrap_err();
        assert!(matches!(err, IngestError::Config { .. }));
        assert!(!err.is_retryable());
    }
}
