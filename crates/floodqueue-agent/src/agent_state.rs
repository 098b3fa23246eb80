use std::sync::Arc;
use std::time::Duration;

use floodqueue::Queue;

/// A point-in-time view of a queue's counters and fill level, suitable for
/// logging or forwarding to an external telemetry sink.
///
/// The wire format for forwarding this elsewhere is deliberately out of
/// scope here — this is just the snapshot type the agent crate builds from
/// [`Queue::metrics`](floodqueue::Queue::metrics).
#[derive(Debug, Clone, Copy)]
pub struct MetricsSnapshot {
    pub appends_accepted: u64,
    pub appends_dropped: u64,
    pub pops: u64,
    pub resizes: u64,
    pub resize_failures: u64,
    pub messages_freed_by_destroy: u64,
    pub queue_len: usize,
    pub capacity: usize,
    pub level: floodqueue::LevelState,
}

impl MetricsSnapshot {
    fn capture(queue: &Queue) -> Self {
        let metrics = queue.metrics();
        Self {
            appends_accepted: metrics.appends_accepted(),
            appends_dropped: metrics.appends_dropped(),
            pops: metrics.pops(),
            resizes: metrics.resizes(),
            resize_failures: metrics.resize_failures(),
            messages_freed_by_destroy: metrics.messages_freed_by_destroy(),
            queue_len: queue.len().unwrap_or(0),
            capacity: queue.capacity_snapshot(),
            level: queue.level_snapshot(),
        }
    }
}

/// Periodically logs a [`MetricsSnapshot`] at `info!` until told to stop.
///
/// A minimal stand-in for the agent's broader state-reporting subsystem;
/// real deployments would forward this snapshot to the manager instead of
/// (or in addition to) logging it.
pub struct AgentState {
    queue: Arc<Queue>,
}

impl AgentState {
    /// Wraps a shared queue for telemetry reporting.
    #[must_use]
    pub fn new(queue: Arc<Queue>) -> Self {
        Self { queue }
    }

    /// Captures the current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot::capture(&self.queue)
    }

    /// Logs [`Self::snapshot`] once at `info!`.
    pub fn log_snapshot(&self) {
        let snapshot = self.snapshot();
        tracing::info!(
            accepted = snapshot.appends_accepted,
            dropped = snapshot.appends_dropped,
            pops = snapshot.pops,
            resizes = snapshot.resizes,
            queue_len = snapshot.queue_len,
            capacity = snapshot.capacity,
            level = ?snapshot.level,
            "queue telemetry"
        );
    }

    /// Runs [`Self::log_snapshot`] every `period` until `shutdown` is set.
    pub fn run_periodic_report(&self, period: Duration, shutdown: &std::sync::atomic::AtomicBool) {
        use std::sync::atomic::Ordering;
        while !shutdown.load(Ordering::Relaxed) {
            self.log_snapshot();
            std::thread::sleep(period);
        }
    }
}
