//! Priority ordering, conditional, and one-shot subscriptions on one bus.
//!
//! Run with `RUST_LOG=evbus=debug` to see the verbose lifecycle trace.

use evbus::{Dispatch, EventBus};

#[derive(Debug, Clone)]
struct Damage {
    target: &'static str,
    amount: u32,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::init();

    let bus = EventBus::new();
    bus.set_verbose(true);

    // Armor reacts before the combat log line (higher priority).
    bus.subscribe(
        |e: &Damage| println!("[armor] soaking part of {} damage", e.amount),
        10,
        Dispatch::Inline,
    );
    bus.subscribe(
        |e: &Damage| println!("[log] {} took {}", e.target, e.amount),
        0,
        Dispatch::Inline,
    );

    // Death announcement: only for big hits, and only once.
    bus.subscribe_once_if(
        |e: &Damage| e.amount >= 100,
        |e: &Damage| println!("[death] {} is down", e.target),
        -10,
        Dispatch::Inline,
    );

    bus.publish(Damage { target: "slime", amount: 12 });
    bus.publish(Damage { target: "hero", amount: 130 });
    // The announcement is already spent; only armor and log fire now.
    bus.publish(Damage { target: "hero", amount: 200 });
}
