use std::time::Duration;

use crate::error::ConfigError;

/// Immutable configuration for a [`Queue`](crate::Queue).
///
/// Validated once in [`Config::validate`], which [`Queue::init`](crate::Queue::init)
/// calls before allocating anything. Mirrors the monitoring agent's
/// `agent.*` configuration keys.
#[derive(Debug, Clone, Copy)]
pub struct Config {
    /// Fill percentage (1..=100) at which the queue enters `Warning`.
    pub warn_level: u8,
    /// Fill percentage (0..warn_level) at or below which `Normal` resumes.
    pub normal_level: u8,
    /// Dwell time in `Full` before escalating to `Flood`.
    pub tolerance: Duration,
    /// Usable slots requested by configuration; allocated capacity is `usable + 1`.
    pub usable: usize,
    /// Consumer rate cap in events per second. Must be strictly positive.
    pub events_per_sec: f64,
    /// Lower bound for dynamic growth. Never shrinks below this.
    pub min_capacity: usize,
    /// Upper bound for dynamic growth. Never grows past this.
    pub max_capacity: usize,
}

impl Config {
    /// Validates every field and returns a ready-to-use `Config`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on the first violated bound. This is the
    /// only place config validation happens — `Queue::init` treats a
    /// `ConfigError` as fatal, matching the source's `exit(1)` on invalid
    /// startup configuration.
    pub fn validate(self) -> Result<Self, ConfigError> {
        if !(1..=100).contains(&self.warn_level) {
            return Err(ConfigError::WarnLevel(self.warn_level));
        }
        if self.normal_level >= self.warn_level {
            return Err(ConfigError::NormalLevel {
                normal_level: self.normal_level,
                warn_level: self.warn_level,
            });
        }
        if self.tolerance > Duration::from_secs(600) {
            return Err(ConfigError::Tolerance(self.tolerance));
        }
        if self.usable == 0 {
            return Err(ConfigError::Usable(self.usable));
        }
        if !(self.events_per_sec.is_finite() && self.events_per_sec > 0.0) {
            return Err(ConfigError::EventsPerSec(self.events_per_sec));
        }
        if self.min_capacity < 2 || self.min_capacity > self.max_capacity {
            return Err(ConfigError::CapacityBounds {
                min: self.min_capacity,
                max: self.max_capacity,
            });
        }
        if self.usable + 1 > self.max_capacity {
            return Err(ConfigError::CapacityBounds {
                min: self.usable + 1,
                max: self.max_capacity,
            });
        }
        Ok(self)
    }

    /// Allocated ring capacity for this config (usable slots + 1 reserved slot).
    #[must_use]
    pub fn initial_capacity(&self) -> usize {
        self.usable + 1
    }

    /// Target pacing period for the dispatcher: `1 / events_per_sec`.
    #[must_use]
    pub fn pacing_period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.events_per_sec)
    }
}

impl Default for Config {
    /// Matches the monitoring agent's historical defaults: `warn_level=90`,
    /// `normal_level=70`, `tolerance=120s`, `usable=5000`, `events_per_sec=500`.
    fn default() -> Self {
        Self {
            warn_level: 90,
            normal_level: 70,
            tolerance: Duration::from_secs(120),
            usable: 5_000,
            events_per_sec: 500.0,
            min_capacity: 64,
            max_capacity: 262_144,
        }
    }
}
