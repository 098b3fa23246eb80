//! Thread-safe, bounded, dynamically-growing message queue with an
//! anti-flood fill-level state machine and a rate-limited dispatcher.
//!
//! Producers call [`Queue::append`] from any number of threads; a single
//! consumer thread drains the queue through [`Queue::pop_blocking`] or the
//! higher-level [`Dispatcher`] loop, which also owns pacing
//! ([`RateLimiter`]) and payload handoff ([`Transport`]).
//!
//! ```
//! use floodqueue::{Config, Message, Queue};
//!
//! let queue = Queue::init(Config::default()).unwrap();
//! queue.append(Message::from("hello")).unwrap();
//! assert_eq!(queue.pop_blocking().as_bytes(), b"hello");
//! ```

mod config;
mod dispatcher;
mod error;
mod invariants;
mod level;
mod message;
mod metrics;
mod queue;
mod rate_limiter;
mod ring;
mod transport;

pub use config::Config;
pub use dispatcher::{Dispatcher, NotificationTemplates};
pub use error::{AppendError, ConfigError, QueueError, RingError};
pub use level::{Edges, Fill, LevelState};
pub use message::Message;
pub use metrics::Metrics;
pub use queue::Queue;
pub use rate_limiter::{IntervalRateLimiter, NoPacing, RateLimiter};
pub use transport::{Transport, TransportError};
