//! Driver spawns and manages the ingestion task.

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, trace, warn};

use crate::bridge::BridgeProcess;
use crate::consumer::Consumer;
use crate::error::IngestError;
use crate::source::FrameSource;

/// Counters for one ingestion session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Frames decoded and dispatched.
    pub frames: u64,
    /// Sensor objects across all dispatched frames.
    pub objects: u64,
    /// Frames discarded due to decode failure.
    pub decode_failures: u64,
}

/// Handle to a running ingestion session.
///
/// Dropping the handle does not stop the session; call [`shutdown`]
/// (the external quit signal) to cancel the task and await it. Quitting
/// mid-frame abandons in-flight state without flushing.
///
/// [`shutdown`]: SessionHandle::shutdown
pub struct SessionHandle {
    stats: watch::Receiver<SessionStats>,
    cancel: CancellationToken,
    task: JoinHandle<()>,
    bridge: Option<BridgeProcess>,
}

impl SessionHandle {
    /// Latest session counters.
    pub fn stats(&self) -> SessionStats {
        self.stats.borrow().clone()
    }

    /// Watch receiver for session counters, for callers that want to
    /// await changes rather than poll.
    pub fn stats_watch(&self) -> watch::Receiver<SessionStats> {
        self.stats.clone()
    }

    /// Token cancelled when the session stops.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Whether the ingestion task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stop the session and wait for the ingestion task to exit.
    ///
    /// Also stops an attached bridge process, so the quit path releases
    /// every session resource.
    pub async fn shutdown(self) -> SessionStats {
        self.cancel.cancel();
        if let Err(e) = self.task.await {
            error!(error = %e, "ingestion task panicked");
        }
        if let Some(bridge) = self.bridge {
            if let Err(e) = bridge.stop().await {
                warn!(error = %e, "failed to stop bridge process");
            }
        }
        self.stats.borrow().clone()
    }

    pub(crate) fn attach_bridge(&mut self, bridge: BridgeProcess) {
        self.bridge = Some(bridge);
    }
}

/// Driver spawns the per-session ingestion task.
///
/// One task runs the whole cycle: acquire connection, read one frame,
/// decode, dispatch, repeat. Each step blocks the session until complete;
/// there is no overlap between reading the next frame and dispatching the
/// previous one.
pub struct Driver;

impl Driver {
    /// Spawn the ingestion task for the given source and consumer.
    pub fn spawn<S, C>(source: S, consumer: C) -> SessionHandle
    where
        S: FrameSource,
        C: Consumer + 'static,
    {
        let (stats_tx, stats_rx) = watch::channel(SessionStats::default());
        let cancel = CancellationToken::new();
        let cancel_task = cancel.clone();

        let task = tokio::spawn(async move {
            Self::ingest_task(source, consumer, stats_tx, cancel_task).await;
        });

        SessionHandle { stats: stats_rx, cancel, task, bridge: None }
    }

    async fn ingest_task<S, C>(
        mut source: S,
        mut consumer: C,
        stats_tx: watch::Sender<SessionStats>,
        cancel: CancellationToken,
    ) where
        S: FrameSource,
        C: Consumer,
    {
        info!(format = %source.wire_format(), "ingestion task started");
        let mut stats = SessionStats::default();

        loop {
            // Cancellation is the only quit signal; it also interrupts the
            // blocking read and the reconnect delay inside the source.
            let result = tokio::select! {
                _ = cancel.cancelled() => {
                    info!("ingestion cancelled");
                    break;
                }
                result = source.next_frame() => result,
            };

            match result {
                Ok(frame) => {
                    stats.frames += 1;
                    stats.objects += frame.len() as u64;
                    trace!(frame = stats.frames, objects = frame.len(), "dispatching frame");

                    // Synchronous dispatch: the next read starts only after
                    // the consumer returns.
                    consumer.consume(&frame);
                    let _ = stats_tx.send(stats.clone());
                }
                Err(IngestError::Decode(e)) => {
                    // Malformed payload aborts that frame only; the session
                    // continues on the same connection.
                    stats.decode_failures += 1;
                    warn!(error = %e, "frame decode failed; discarding frame");
                    let _ = stats_tx.send(stats.clone());
                }
                Err(e) => {
                    error!(error = %e, "frame source failed; stopping session");
                    break;
                }
            }
        }

        info!(
            frames = stats.frames,
            objects = stats.objects,
            decode_failures = stats.decode_failures,
            "ingestion task ended"
        );
    }
}
