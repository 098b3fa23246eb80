use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters exposed to the surrounding agent-state module.
///
/// All fields use `Relaxed` ordering: these are purely statistical counters
/// with no control-flow dependency and no happens-before relationship to
/// guard (unlike the ring's head/tail, which go through the queue's mutex).
#[derive(Debug, Default)]
pub struct Metrics {
    appends_accepted: AtomicU64,
    appends_dropped: AtomicU64,
    pops: AtomicU64,
    resizes: AtomicU64,
    resize_failures: AtomicU64,
    messages_freed_by_destroy: AtomicU64,
}

impl Metrics {
    /// Creates a fresh, zeroed set of counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_accepted(&self) {
        self.appends_accepted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_dropped(&self) {
        self.appends_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_pop(&self) {
        self.pops.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_resize(&self) {
        self.resizes.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_resize_failure(&self) {
        self.resize_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_freed_by_destroy(&self, count: u64) {
        self.messages_freed_by_destroy
            .fetch_add(count, Ordering::Relaxed);
    }

    /// Total number of appends that were accepted into the ring.
    #[must_use]
    pub fn appends_accepted(&self) -> u64 {
        self.appends_accepted.load(Ordering::Relaxed)
    }

    /// Total number of appends rejected because the queue was full.
    #[must_use]
    pub fn appends_dropped(&self) -> u64 {
        self.appends_dropped.load(Ordering::Relaxed)
    }

    /// Total number of messages popped by the dispatcher.
    #[must_use]
    pub fn pops(&self) -> u64 {
        self.pops.load(Ordering::Relaxed)
    }

    /// Total number of successful capacity growths.
    #[must_use]
    pub fn resizes(&self) -> u64 {
        self.resizes.load(Ordering::Relaxed)
    }

    /// Total number of failed growth attempts (allocation failure).
    #[must_use]
    pub fn resize_failures(&self) -> u64 {
        self.resize_failures.load(Ordering::Relaxed)
    }

    /// Total number of messages released by [`Queue::destroy`](crate::Queue::destroy).
    #[must_use]
    pub fn messages_freed_by_destroy(&self) -> u64 {
        self.messages_freed_by_destroy.load(Ordering::Relaxed)
    }

    /// `appends_attempted = appends_accepted + appends_dropped`.
    #[must_use]
    pub fn appends_attempted(&self) -> u64 {
        self.appends_accepted() + self.appends_dropped()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attempted_sums_accepted_and_dropped() {
        let m = Metrics::new();
        m.record_accepted();
        m.record_accepted();
        m.record_dropped();
        assert_eq!(m.appends_attempted(), 3);
        assert_eq!(m.appends_accepted(), 2);
        assert_eq!(m.appends_dropped(), 1);
    }
}
