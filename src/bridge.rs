//! Bridge process lifecycle.
//!
//! The telemetry source is produced by an external bridge program that
//! must be running before the first connect attempt. The bridge is treated
//! as a scoped resource: spawned at session start, stopped on every exit
//! path. `kill_on_drop` covers paths that never reach an explicit
//! [`BridgeProcess::stop`].

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::process::{Child, Command};
use tokio::time::sleep;
use tracing::{debug, info};

use crate::error::{IngestError, Result};

const DEFAULT_WARMUP_MS: u64 = 2_000;

fn default_warmup_ms() -> u64 {
    DEFAULT_WARMUP_MS
}

/// How to launch the external bridge program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Program to execute.
    pub command: String,

    /// Arguments passed to the program.
    #[serde(default)]
    pub args: Vec<String>,

    /// Wait after spawning before the endpoint is assumed reachable.
    #[serde(default = "default_warmup_ms")]
    pub warmup_ms: u64,
}

impl BridgeConfig {
    pub fn new(command: impl Into<String>) -> Self {
        Self { command: command.into(), args: Vec::new(), warmup_ms: DEFAULT_WARMUP_MS }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// The post-spawn warm-up delay.
    pub fn warmup(&self) -> Duration {
        Duration::from_millis(self.warmup_ms)
    }
}

/// A running bridge process.
#[derive(Debug)]
pub struct BridgeProcess {
    child: Child,
    command: String,
}

impl BridgeProcess {
    /// Launch the bridge and wait out its warm-up.
    ///
    /// Returns once the bridge should be reachable at the session
    /// endpoint. The child is configured to be killed if the handle is
    /// dropped without an explicit [`stop`].
    ///
    /// [`stop`]: BridgeProcess::stop
    pub async fn spawn(config: &BridgeConfig) -> Result<Self> {
        info!(command = %config.command, args = ?config.args, "starting bridge process");
        let child = Command::new(&config.command)
            .args(&config.args)
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                IngestError::bridge(format!("failed to spawn '{}'", config.command), e)
            })?;

        debug!(warmup = ?config.warmup(), "waiting for bridge warm-up");
        sleep(config.warmup()).await;

        Ok(Self { child, command: config.command.clone() })
    }

    /// OS process id, if the bridge is still running.
    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }

    /// Signal the bridge to stop and reap it.
    pub async fn stop(mut self) -> Result<()> {
        debug!(command = %self.command, "stopping bridge process");
        self.child
            .start_kill()
            .map_err(|e| IngestError::bridge("failed to signal bridge process", e))?;
        let status = self
            .child
            .wait()
            .await
            .map_err(|e| IngestError::bridge("failed to reap bridge process", e))?;
        info!(command = %self.command, %status, "bridge process stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn short_lived_sleep() -> BridgeConfig {
        BridgeConfig::new("sleep").with_args(["30"])
    }

    #[tokio::test]
    async fn spawn_waits_out_the_warmup_then_stop_reaps() {
        let mut config = short_lived_sleep();
        config.warmup_ms = 10;

        let started = std::time::Instant::now();
        let bridge = BridgeProcess::spawn(&config).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(10));
        assert!(bridge.id().is_some());

        bridge.stop().await.unwrap();
    }

    #[tokio::test]
    async fn spawn_failure_is_a_bridge_error() {
        let config = BridgeConfig::new("definitely-not-a-real-binary-2a7f");
        let err = BridgeProcess::spawn(&config).await.unwrap_err();
        assert!(matches!(err, IngestError::Bridge { .. }));
        assert!(!err.is_retryable());
    }

    #[test]
    fn warmup_defaults_when_omitted_from_yaml() {
        let config: BridgeConfig =
            serde_yaml_ng::from_str("command: python3\nargs: [radar_bridge.py]\n").unwrap();
        assert_eq!(config.warmup(), Duration::from_secs(2));
        assert_eq!(config.args, vec!["radar_bridge.py"]);
    }
}
