use std::time::{Duration, Instant};

/// Paces the dispatcher loop to a target rate.
///
/// Blocking by design: the dispatcher runs on a real OS thread, not inside
/// an async runtime, so pacing is a plain `std::thread::sleep` rather than
/// an awaited timer.
pub trait RateLimiter: Send + Sync {
    /// Sleeps for whatever is left of the target period since `loop_start`.
    /// Returns immediately if the period has already elapsed.
    fn wait_remaining(&self, loop_start: Instant);
}

/// Compensating-sleep rate limiter targeting a fixed period.
///
/// Each call measures how much of `period` is left since `loop_start` and
/// sleeps exactly that long, so loop-body work (transport calls, lock
/// acquisition) is subtracted from the sleep rather than added on top of a
/// fixed delay.
#[derive(Debug, Clone, Copy)]
pub struct IntervalRateLimiter {
    period: Duration,
}

impl IntervalRateLimiter {
    /// Creates a limiter targeting `period` between loop iterations.
    #[must_use]
    pub fn new(period: Duration) -> Self {
        Self { period }
    }

    /// Creates a limiter targeting `events_per_sec` iterations per second.
    #[must_use]
    pub fn from_events_per_sec(events_per_sec: f64) -> Self {
        Self::new(Duration::from_secs_f64(1.0 / events_per_sec))
    }
}

impl RateLimiter for IntervalRateLimiter {
    fn wait_remaining(&self, loop_start: Instant) {
        let elapsed = loop_start.elapsed();
        if let Some(remaining) = self.period.checked_sub(elapsed) {
            if !remaining.is_zero() {
                std::thread::sleep(remaining);
            }
        }
    }
}

/// A no-op limiter for tests and benchmarks that want no pacing at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPacing;

impl RateLimiter for NoPacing {
    fn wait_remaining(&self, _loop_start: Instant) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sleeps_roughly_the_remaining_period() {
        let limiter = IntervalRateLimiter::new(Duration::from_millis(30));
        let t0 = Instant::now();
        std::thread::sleep(Duration::from_millis(10));
        limiter.wait_remaining(t0);
        let total = t0.elapsed();
        assert!(total >= Duration::from_millis(28), "total was {total:?}");
    }

    #[test]
    fn does_not_sleep_when_period_already_elapsed() {
        let limiter = IntervalRateLimiter::new(Duration::from_millis(5));
        let t0 = Instant::now();
        std::thread::sleep(Duration::from_millis(10));
        let before = Instant::now();
        limiter.wait_remaining(t0);
        assert!(before.elapsed() < Duration::from_millis(5));
    }

    #[test]
    fn very_high_rate_means_no_sleep() {
        let limiter = IntervalRateLimiter::from_events_per_sec(1_000_000.0);
        let t0 = Instant::now();
        let before = Instant::now();
        limiter.wait_remaining(t0);
        assert!(before.elapsed() < Duration::from_millis(5));
    }

    #[test]
    fn no_pacing_never_sleeps() {
        let limiter = NoPacing;
        let before = Instant::now();
        limiter.wait_remaining(Instant::now());
        assert!(before.elapsed() < Duration::from_millis(1));
    }
}
