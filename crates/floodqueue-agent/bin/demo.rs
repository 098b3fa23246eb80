//! Demo wiring: a handful of producer threads, one dispatcher thread, and a
//! periodic telemetry reporter sharing one [`Queue`] behind an `Arc`.
//!
//! Run with `cargo run -p floodqueue-agent --bin floodqueue-agent-demo`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use floodqueue::{Config, Dispatcher, IntervalRateLimiter, Message, Queue};
use floodqueue_agent::{AgentCollector, AgentState, StdoutTransport};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config {
        warn_level: 75,
        normal_level: 25,
        tolerance: Duration::from_secs(2),
        usable: 32,
        events_per_sec: 50.0,
        min_capacity: 64,
        max_capacity: 4096,
    };
    let queue = Arc::new(Queue::init(config).expect("valid demo configuration"));

    let shutdown = Arc::new(AtomicBool::new(false));

    let dispatcher_handle = {
        let queue = Arc::clone(&queue);
        let rate_limiter = IntervalRateLimiter::from_events_per_sec(config.events_per_sec);
        let shutdown = Arc::clone(&shutdown);
        std::thread::spawn(move || {
            let dispatcher = Dispatcher::new(queue, StdoutTransport, rate_limiter, b'1');
            dispatcher.run(&shutdown);
        })
    };

    let telemetry_handle = {
        let state = AgentState::new(Arc::clone(&queue));
        let shutdown = Arc::clone(&shutdown);
        std::thread::spawn(move || {
            state.run_periodic_report(Duration::from_secs(1), &shutdown);
        })
    };

    let producer_handles: Vec<_> = (0..4)
        .map(|producer_id| {
            let collector = AgentCollector::new(Arc::clone(&queue));
            std::thread::spawn(move || {
                for i in 0..200 {
                    collector.collect(Message::from(
                        format!("producer-{producer_id}-event-{i}").as_str(),
                    ));
                    std::thread::sleep(Duration::from_millis(2));
                }
            })
        })
        .collect();

    for handle in producer_handles {
        handle.join().expect("producer thread panicked");
    }

    std::thread::sleep(Duration::from_millis(200));
    shutdown.store(true, Ordering::Relaxed);
    // Unblock a dispatcher that is waiting on an empty queue so it can
    // observe the shutdown flag and return.
    queue.append(Message::from("shutdown-sentinel")).ok();

    dispatcher_handle.join().expect("dispatcher thread panicked");
    telemetry_handle.join().expect("telemetry thread panicked");
}
