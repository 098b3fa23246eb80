use std::sync::Arc;

use floodqueue::{AppendError, Message, Queue};

/// Thin handle an event-collection source holds onto the shared queue.
///
/// Collectors are the producer side of the queue: they call
/// [`AgentCollector::collect`] from whatever thread observes an event and
/// treat [`AppendError::Dropped`] as ordinary back-pressure, not a failure
/// worth propagating further up.
#[derive(Clone)]
pub struct AgentCollector {
    queue: Arc<Queue>,
}

impl AgentCollector {
    /// Wraps a shared queue for producer-side use.
    #[must_use]
    pub fn new(queue: Arc<Queue>) -> Self {
        Self { queue }
    }

    /// Submits `payload` for dispatch.
    ///
    /// Returns `false` if the queue dropped the message under pressure;
    /// callers that only care about whether the event was accepted can
    /// ignore the `Result` entirely and use this.
    pub fn collect(&self, payload: impl Into<Message>) -> bool {
        self.queue.append(payload.into()).is_ok()
    }

    /// Submits `payload`, surfacing the underlying error for callers that
    /// want to distinguish a drop from an allocation failure.
    ///
    /// # Errors
    ///
    /// Returns [`AppendError`] on rejection; see [`Queue::append`].
    pub fn try_collect(&self, payload: impl Into<Message>) -> Result<(), AppendError> {
        self.queue.append(payload.into())
    }
}
