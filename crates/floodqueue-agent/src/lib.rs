//! Monitoring-agent wiring on top of [`floodqueue`]: transports, on-disk
//! configuration loading, a producer-side collector handle, and a
//! telemetry-snapshot helper.
//!
//! The [`floodqueue-agent-demo`](../bin/demo.rs) binary wires all of these
//! together with real OS threads for a producer, a dispatcher, and a
//! periodic telemetry reporter.

mod agent_state;
mod collector;
mod raw_config;
mod transports;

pub use agent_state::{AgentState, MetricsSnapshot};
pub use collector::AgentCollector;
pub use raw_config::{ConfigLoadError, RawConfig};
pub use transports::{NullTransport, RecordingTransport, StdoutTransport};
