use std::sync::{Condvar, Mutex};
use std::time::Instant;

use crate::config::Config;
use crate::error::{AppendError, QueueError};
use crate::level::{Edges, Fill, LevelMachine, LevelState};
use crate::message::Message;
use crate::metrics::Metrics;
use crate::ring::Ring;

struct QueueInner {
    ring: Ring,
    level: LevelMachine,
}

fn fill_of(ring: &Ring) -> Fill {
    Fill {
        fill_percent: ring.fill_percent(),
        is_full: ring.is_full(),
    }
}

/// A thread-safe, bounded, dynamically-growing message queue.
///
/// Binds a [`Ring`] and a [`LevelMachine`] behind one [`Mutex`] and one
/// not-empty [`Condvar`]. Producers call [`Queue::append`] from any number
/// of threads; exactly one consumer thread is expected to call
/// [`Queue::pop_blocking`] in a loop.
pub struct Queue {
    inner: Mutex<QueueInner>,
    not_empty: Condvar,
    config: Config,
    metrics: Metrics,
}

impl Queue {
    /// Validates `config` and allocates a fresh, empty queue in `Normal`.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::InvalidConfig`] if any configured bound is
    /// violated. This is fatal for a monitoring agent: it cannot start
    /// with a queue it cannot construct.
    pub fn init(config: Config) -> Result<Self, QueueError> {
        let config = config.validate()?;
        if config.tolerance.is_zero() {
            tracing::warn!(
                "tolerance is 0s: the queue escalates to Flood on the first append \
                 still observed Full"
            );
        }

        let ring = Ring::new(config.initial_capacity());
        let level = LevelMachine::new(config.warn_level, config.normal_level, config.tolerance);

        Ok(Self {
            inner: Mutex::new(QueueInner { ring, level }),
            not_empty: Condvar::new(),
            config,
            metrics: Metrics::new(),
        })
    }

    /// The validated configuration this queue was built with.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Accumulated counters for this queue's lifetime.
    #[must_use]
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Appends `msg`, growing the ring first if pressure warrants it.
    ///
    /// Never blocks on fullness: a queue that is still full after an
    /// attempted growth drops the message rather than waiting for the
    /// consumer. The level machine is evaluated against the count as it
    /// stands *before* this message would be added, so a burst that fills
    /// the ring is only observed as `Full` on the append that finds no
    /// room left — not on the one that happens to be the last to fit.
    ///
    /// # Errors
    ///
    /// Returns [`AppendError::Dropped`] if the queue is full and could not
    /// grow further. The message is discarded in that case; callers treat
    /// this as non-fatal back-pressure, not an I/O error.
    pub fn append(&self, msg: Message) -> Result<(), AppendError> {
        let mut inner = self.inner.lock().unwrap();

        let pre_push_fill = fill_of(&inner.ring);
        self.maybe_grow(&mut inner, pre_push_fill);

        inner.level.evaluate(fill_of(&inner.ring), Instant::now());

        if inner.ring.is_full() {
            self.metrics.record_dropped();
            tracing::debug!("queue full, message dropped");
            return Err(AppendError::Dropped);
        }

        inner.ring.push(msg).map_err(|_| AppendError::Dropped)?;
        self.metrics.record_accepted();

        drop(inner);
        self.not_empty.notify_one();
        Ok(())
    }

    /// Grows the ring under pressure: triggered while already in `Warning`,
    /// or while in `Normal` but `pre_push_fill` already meets `warn_level`
    /// (the append that would otherwise transition into `Warning` grows
    /// first instead of lagging a step behind it). Below `max_capacity`,
    /// doubles toward it (never below `min_capacity`). A failed resize is
    /// logged and left at the current capacity — `append` may still drop
    /// on this call.
    fn maybe_grow(&self, inner: &mut QueueInner, pre_push_fill: Fill) {
        let under_pressure = match inner.level.state() {
            LevelState::Warning => true,
            LevelState::Normal => {
                pre_push_fill.fill_percent >= u32::from(self.config.warn_level)
            }
            LevelState::Full | LevelState::Flood => false,
        };
        if !under_pressure {
            return;
        }

        let capacity = inner.ring.capacity();
        if capacity >= self.config.max_capacity {
            return;
        }

        let target = capacity
            .saturating_mul(2)
            .clamp(self.config.min_capacity, self.config.max_capacity);
        if target <= capacity {
            return;
        }

        match inner.ring.resize(target) {
            Ok(()) => {
                self.metrics.record_resize();
                tracing::info!(from = capacity, to = target, "queue grown under pressure");
            }
            Err(error) => {
                self.metrics.record_resize_failure();
                tracing::warn!(%error, target, "queue growth failed, continuing at current capacity");
            }
        }
    }

    /// Blocks until a message is available, then pops and returns it.
    ///
    /// Tolerates spurious wakeups via the standard `while`-around-`wait`
    /// pattern. The caller owns the returned [`Message`] outright.
    #[must_use]
    pub fn pop_blocking(&self) -> Message {
        let mut inner = self.inner.lock().unwrap();
        loop {
            if inner.ring.is_empty() {
                inner = self.not_empty.wait(inner).unwrap();
                continue;
            }
            // Evaluate against the pre-pop count: downward transitions are
            // observed for the fill level the consumer is about to relieve,
            // not the level it leaves behind.
            inner.level.evaluate(fill_of(&inner.ring), Instant::now());
            if let Some(msg) = inner.ring.pop() {
                self.metrics.record_pop();
                return msg;
            }
        }
    }

    /// Atomically reads and clears all pending level-transition edges.
    pub fn take_edges(&self) -> Edges {
        self.inner.lock().unwrap().level.take_edges()
    }

    /// Number of messages currently buffered.
    ///
    /// Always `Some` in this port: a `Queue` only exists once
    /// [`Queue::init`] has succeeded, so the source's `-1`-when-
    /// uninitialized sentinel has no reachable state to model here. Kept
    /// as `Option` for contract parity with the source's
    /// `w_agentd_get_buffer_lenght`.
    #[must_use]
    pub fn len(&self) -> Option<usize> {
        Some(self.inner.lock().unwrap().ring.count())
    }

    /// Point-in-time fullness snapshot.
    #[must_use]
    pub fn is_full_snapshot(&self) -> bool {
        self.inner.lock().unwrap().ring.is_full()
    }

    /// Point-in-time emptiness snapshot.
    #[must_use]
    pub fn is_empty_snapshot(&self) -> bool {
        self.inner.lock().unwrap().ring.is_empty()
    }

    /// Current fill-level state, for diagnostics and tests.
    #[must_use]
    pub fn level_snapshot(&self) -> LevelState {
        self.inner.lock().unwrap().level.state()
    }

    /// Current allocated ring capacity, for diagnostics and tests.
    #[must_use]
    pub fn capacity_snapshot(&self) -> usize {
        self.inner.lock().unwrap().ring.capacity()
    }

    /// Drains and releases every buffered message, resetting the level
    /// machine to `Normal`. Returns the number of messages freed.
    ///
    /// Unlike the source's `buffer_destroy`, this does not consume the
    /// `Queue`: the source allows re-`init` of the same named buffer after
    /// `destroy`, which this port models as a reusable reset rather than a
    /// move, so a caller sharing the `Queue` behind an `Arc` need not
    /// reconstruct it.
    pub fn destroy(&self) -> usize {
        let mut inner = self.inner.lock().unwrap();
        let freed = inner.ring.drain_all();
        self.metrics.record_freed_by_destroy(freed as u64);
        inner.level.reset();
        freed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn tiny_config() -> Config {
        Config {
            warn_level: 75,
            normal_level: 25,
            tolerance: std::time::Duration::from_millis(50),
            usable: 3,
            events_per_sec: 1000.0,
            min_capacity: 4,
            max_capacity: 4,
        }
    }

    #[test]
    fn fifo_order_preserved() {
        let queue = Queue::init(tiny_config()).unwrap();
        queue.append(Message::from("a")).unwrap();
        queue.append(Message::from("b")).unwrap();
        assert_eq!(queue.pop_blocking().as_bytes(), b"a");
        assert_eq!(queue.pop_blocking().as_bytes(), b"b");
    }

    #[test]
    fn scenario_capacity_equals_min_burst_drops_exactly_one() {
        // usable = 3 (capacity 4), min == max so no growth is possible.
        let queue = Queue::init(tiny_config()).unwrap();
        let mut accepted = 0;
        let mut dropped = 0;
        for _ in 0..4 {
            match queue.append(Message::from("x")) {
                Ok(()) => accepted += 1,
                Err(AppendError::Dropped) => dropped += 1,
                Err(AppendError::Alloc) => unreachable!(),
            }
        }
        assert_eq!(accepted, 3);
        assert_eq!(dropped, 1);
        assert_eq!(
            queue.metrics().appends_attempted(),
            queue.metrics().appends_accepted() + queue.metrics().appends_dropped()
        );
    }

    #[test]
    fn scenario_max_capacity_full_never_attempts_growth() {
        let config = Config {
            min_capacity: 4,
            max_capacity: 4,
            usable: 3,
            ..tiny_config()
        };
        let queue = Queue::init(config).unwrap();
        for _ in 0..3 {
            queue.append(Message::from("x")).unwrap();
        }
        assert!(queue.is_full_snapshot());
        assert_eq!(queue.capacity_snapshot(), 4);
        assert!(matches!(
            queue.append(Message::from("y")),
            Err(AppendError::Dropped)
        ));
        assert_eq!(queue.capacity_snapshot(), 4);
        assert_eq!(queue.metrics().resizes(), 0);
    }

    #[test]
    fn growth_triggers_on_the_same_append_that_would_enter_warning() {
        let config = Config {
            warn_level: 50,
            normal_level: 10,
            tolerance: std::time::Duration::from_secs(600),
            usable: 3, // capacity 4, usable=3
            events_per_sec: 1000.0,
            min_capacity: 4,
            max_capacity: 64,
        };
        let queue = Queue::init(config).unwrap();
        // First append: pre-push fill 0/3 = 0% < warn(50) -> stays Normal.
        queue.append(Message::from("a")).unwrap();
        // Second append: pre-push fill 1/3 = 33% < warn(50) -> stays Normal.
        queue.append(Message::from("b")).unwrap();
        assert_eq!(queue.level_snapshot(), LevelState::Normal);
        // Third append: pre-push fill 2/3 = 66% >= warn(50) while still
        // Normal, so growth is attempted on this very append rather than
        // one append late. The resize relieves the pressure before the
        // state machine evaluates, so the state never leaves Normal.
        queue.append(Message::from("c")).unwrap();
        assert!(queue.capacity_snapshot() > 4);
        assert_eq!(queue.metrics().resizes(), 1);
        assert_eq!(queue.level_snapshot(), LevelState::Normal);
    }

    #[test]
    fn scenario_zero_tolerance_escalates_on_next_append_while_full() {
        let config = Config {
            warn_level: 50,
            normal_level: 10,
            tolerance: std::time::Duration::ZERO,
            usable: 1, // capacity 2
            events_per_sec: 1000.0,
            min_capacity: 2,
            max_capacity: 2,
        };
        let queue = Queue::init(config).unwrap();
        // Fills the single usable slot; pre-push fill was still 0%, so
        // the state machine hasn't observed fullness yet.
        queue.append(Message::from("a")).unwrap();
        assert_eq!(queue.level_snapshot(), LevelState::Normal);

        // Pre-push fill is now 100% (the ring is already full) -> Full.
        // Still dropped: there is no room and min == max so no growth.
        let _ = queue.append(Message::from("b"));
        assert_eq!(queue.level_snapshot(), LevelState::Full);

        // Still full, and tolerance is zero, so this evaluate escalates
        // straight to Flood.
        let _ = queue.append(Message::from("c"));
        assert_eq!(queue.level_snapshot(), LevelState::Flood);
    }

    #[test]
    fn destroy_frees_messages_and_resets_to_normal() {
        let queue = Queue::init(tiny_config()).unwrap();
        queue.append(Message::from("a")).unwrap();
        queue.append(Message::from("b")).unwrap();
        assert_eq!(queue.destroy(), 2);
        assert_eq!(queue.len(), Some(0));
        assert_eq!(queue.level_snapshot(), LevelState::Normal);
        assert_eq!(queue.metrics().messages_freed_by_destroy(), 2);
    }

    #[test]
    fn pop_blocking_wakes_on_concurrent_append() {
        let queue = Arc::new(Queue::init(tiny_config()).unwrap());
        let consumer = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || queue.pop_blocking())
        };
        thread::sleep(std::time::Duration::from_millis(20));
        queue.append(Message::from("woken")).unwrap();
        let msg = consumer.join().unwrap();
        assert_eq!(msg.as_bytes(), b"woken");
    }
}
