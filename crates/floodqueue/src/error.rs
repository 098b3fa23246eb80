use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while validating a [`Config`](crate::Config).
///
/// Returned by `Config::validate` and surfaced through `Queue::init`;
/// invalid configuration is fatal — the agent cannot start.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ConfigError {
    /// `warn_level` must be in `1..=100`.
    #[error("warn_level must be between 1 and 100, got {0}")]
    WarnLevel(u8),
    /// `normal_level` must be strictly below `warn_level`.
    #[error("normal_level ({normal_level}) must be below warn_level ({warn_level})")]
    NormalLevel { normal_level: u8, warn_level: u8 },
    /// `tolerance` must be at most 600 seconds.
    #[error("tolerance must be at most 600s, got {0:?}")]
    Tolerance(Duration),
    /// `usable` must be nonzero.
    #[error("usable slot count must be nonzero, got {0}")]
    Usable(usize),
    /// `events_per_sec` must be finite and strictly positive.
    #[error("events_per_sec must be a positive finite number, got {0}")]
    EventsPerSec(f64),
    /// `min_capacity`/`max_capacity` are inconsistent or too small.
    #[error("capacity bounds invalid: min={min} max={max}")]
    CapacityBounds { min: usize, max: usize },
}

/// Errors returned by [`Ring`](crate::ring::Ring) operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RingError {
    /// `push` was called while the ring was already full.
    #[error("ring is full (capacity {capacity})")]
    Full { capacity: usize },
    /// `resize` target capacity could not hold the live messages.
    #[error("resize target {target} too small for {count} live messages")]
    ResizeTooSmall { target: usize, count: usize },
    /// Growing the backing storage failed (out of memory).
    ///
    /// Not currently producible: `resize` allocates with `Vec::with_capacity`,
    /// which aborts rather than returning an error on an allocation failure.
    /// Kept so a future `try_reserve`-based `resize` can report this without
    /// an API break.
    #[error("failed to allocate {target} slots")]
    Alloc { target: usize },
}

/// Errors returned by [`Queue::append`](crate::Queue::append).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AppendError {
    /// The queue is full and could not grow further; the message was
    /// discarded.
    #[error("queue full, message dropped")]
    Dropped,
    /// Copying the message into the ring failed (out of memory).
    ///
    /// Not currently producible: the `Message` handed to `append` is
    /// already owned by the caller, so storing it is a move into the ring
    /// slot, not a fallible copy. `Queue::append` maps every `Ring::push`
    /// error to [`AppendError::Dropped`] instead — `push` can only fail
    /// with [`RingError::Full`](crate::RingError::Full), which the caller
    /// has already ruled out by the time it pushes. Kept for parity with
    /// this error category in the wider error taxonomy.
    #[error("failed to store message")]
    Alloc,
}

/// Errors returned when constructing a [`Queue`](crate::Queue).
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum QueueError {
    /// The supplied configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}
