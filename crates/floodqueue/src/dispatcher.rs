use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::level::Edges;
use crate::queue::Queue;
use crate::rate_limiter::RateLimiter;
use crate::transport::Transport;

/// The four configurable notification bodies, one per edge kind.
///
/// `{warn_level}` and `{normal_level}` are substituted with the queue's
/// configured thresholds wherever a template uses them; templates that
/// don't reference a placeholder are left untouched.
#[derive(Debug, Clone)]
pub struct NotificationTemplates {
    pub warn: String,
    pub full: String,
    pub flood: String,
    pub normal: String,
}

impl Default for NotificationTemplates {
    fn default() -> Self {
        Self {
            warn: "Agent buffer at {warn_level}% or more of capacity.".to_owned(),
            full: "Agent buffer is full, incoming events may be dropped.".to_owned(),
            flood: "Agent buffer has been full past tolerance, dropping events.".to_owned(),
            normal: "Agent buffer back to normal ({normal_level}% or below).".to_owned(),
        }
    }
}

/// Single-consumer loop: pops a message, emits any owed level
/// notifications, hands the payload to the transport, then paces itself.
///
/// Generic over the transport and rate limiter so tests can swap in
/// in-memory doubles without touching the loop body.
pub struct Dispatcher<T, R> {
    queue: Arc<Queue>,
    transport: T,
    rate_limiter: R,
    mq_id: u8,
    templates: NotificationTemplates,
}

impl<T, R> Dispatcher<T, R>
where
    T: Transport,
    R: RateLimiter,
{
    /// Builds a dispatcher over `queue`, handing payloads to `transport`
    /// and pacing iterations with `rate_limiter`. `mq_id` is the one-byte
    /// local-queue identifier prefixed onto every control notification.
    pub fn new(queue: Arc<Queue>, transport: T, rate_limiter: R, mq_id: u8) -> Self {
        Self {
            queue,
            transport,
            rate_limiter,
            mq_id,
            templates: NotificationTemplates::default(),
        }
    }

    /// Overrides the default notification bodies.
    #[must_use]
    pub fn with_templates(mut self, templates: NotificationTemplates) -> Self {
        self.templates = templates;
        self
    }

    /// Runs the loop until `shutdown` is set.
    ///
    /// Since [`Queue::pop_blocking`] cannot be cancelled from inside the
    /// queue, `shutdown` is only observed between iterations — a final
    /// blocked `pop_blocking` call still needs an appended message (or a
    /// queue drop breaking the wait) to return.
    pub fn run(&self, shutdown: &AtomicBool) {
        while !shutdown.load(Ordering::Relaxed) {
            self.run_once();
        }
    }

    /// Runs exactly one iteration of the loop. Exposed directly for tests
    /// that want deterministic single-step control.
    pub fn run_once(&self) {
        let t0 = Instant::now();

        let msg = self.queue.pop_blocking();
        let edges = self.queue.take_edges();
        self.dispatch_edges(edges);

        if let Err(error) = self.transport.send(msg.as_bytes()) {
            tracing::warn!(%error, "transport send failed, message considered delivered");
        }

        self.rate_limiter.wait_remaining(t0);
    }

    fn dispatch_edges(&self, edges: Edges) {
        if edges.warn {
            self.notify(&self.templates.warn, true);
        }
        if edges.full {
            self.notify(&self.templates.full, true);
        }
        if edges.flood {
            self.notify(&self.templates.flood, true);
        }
        if edges.normal {
            self.notify(&self.templates.normal, false);
        }
    }

    fn notify(&self, template: &str, is_pressure: bool) {
        let config = self.queue.config();
        let text = template
            .replace("{warn_level}", &config.warn_level.to_string())
            .replace("{normal_level}", &config.normal_level.to_string());
        let formatted = format!("{}:wazuh-agent:{}", self.mq_id as char, text);

        if is_pressure {
            tracing::warn!(notification = %formatted, "queue level notification");
        } else {
            tracing::info!(notification = %formatted, "queue level notification");
        }

        if let Err(error) = self.transport.send(formatted.as_bytes()) {
            tracing::warn!(%error, "failed to send level notification");
        }
    }
}
