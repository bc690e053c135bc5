//! Delayed publishes, detached subscribers, and zero-payload signals.

use std::time::Duration;

use evbus::{Dispatch, EventBus};

#[derive(Debug, Clone)]
struct WaveStarted {
    index: u32,
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let bus = EventBus::new();

    bus.subscribe(
        |e: &WaveStarted| println!("[ui] wave {} incoming", e.index),
        10,
        Dispatch::Inline,
    );
    // Audio runs detached: the publisher does not wait for it.
    bus.subscribe(
        |e: &WaveStarted| println!("[audio] horn for wave {}", e.index),
        0,
        Dispatch::Spawned,
    );
    bus.subscribe_signal(|| println!("[signal] intermission over"), 0, Dispatch::Inline);

    bus.publish(WaveStarted { index: 1 });

    // Suspends only this task; other tasks keep running meanwhile.
    bus.publish_after(WaveStarted { index: 2 }, Duration::from_millis(300)).await;
    bus.publish_signal_after(Duration::from_millis(100)).await;

    // Give the detached audio handler a moment before the process exits.
    tokio::time::sleep(Duration::from_millis(50)).await;
}
