//! # evbus
//!
//! **evbus** is a typed in-process publish/subscribe event bus for game
//! loops and other single-host runtimes, built on tokio.
//!
//! Subscribers register a callback for a payload type; publishers broadcast
//! payload values to every matching subscriber with priority ordering,
//! optional one-shot semantics, predicate filtering, an optional
//! pre-dispatch delay, and per-subscriber detached execution.
//!
//! ## Architecture
//! ```text
//!   subscribe::<E>(handler, priority, dispatch)
//!        │
//!        ▼
//! ┌───────────────────────────────────────────────┐
//! │ EventBus (cheap clone, shared registry)       │
//! │   Registry: TypeId(E) ─► [Record, Record, …]  │
//! │   (registration order, ids from a counter)    │
//! └──────┬────────────────────────────────────────┘
//!        │ publish::<E>(event) / publish_after(event, delay)
//!        ▼
//!   snapshot sorted by priority desc (stable)
//!        ├─► condition false   ─► skip (keeps registration)
//!        ├─► Dispatch::Inline  ─► handler(&event) on the publisher's path
//!        ├─► Dispatch::Spawned ─► tokio::spawn (fire-and-forget)
//!        ▼
//!   prune one-time records that fired
//! ```
//!
//! ## Guarantees
//! - Handlers fire in descending priority; equal priorities keep
//!   registration order.
//! - A one-time handler fires at most once, then is removed; while its
//!   condition rejects payloads it stays registered.
//! - Handler panics are caught per invocation, reported through the `log`
//!   facade as [`CallbackFailure`], and never reach the publisher or later
//!   handlers.
//! - Publishing with no subscribers, unsubscribing an unknown handler, and
//!   clearing an empty type are silent no-ops.
//!
//! ## Non-guarantees
//! - No join/await/cancel for spawned handlers or pending delayed publishes;
//!   once scheduled they run to completion or failure.
//! - No timeout on handler execution.
//! - Registry access is serialized by a mutex, but the design targets a
//!   single logical writer (the host's update path), not contended
//!   multi-threaded registration.
//!
//! ## Example
//! ```rust
//! use evbus::{Dispatch, EventBus};
//!
//! #[derive(Debug, Clone)]
//! struct PlayerDamaged { amount: u32 }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let bus = EventBus::new();
//!
//!     // Fires first (priority 10), in-line on the publisher's path.
//!     bus.subscribe(|e: &PlayerDamaged| println!("ouch: {}", e.amount), 10, Dispatch::Inline);
//!
//!     // Fires only for lethal hits, and only once.
//!     bus.subscribe_once_if(
//!         |e: &PlayerDamaged| e.amount >= 100,
//!         |_: &PlayerDamaged| println!("game over"),
//!         0,
//!         Dispatch::Inline,
//!     );
//!
//!     bus.publish(PlayerDamaged { amount: 3 });
//!     bus.publish(PlayerDamaged { amount: 120 });
//! }
//! ```

mod bus;
mod error;
mod handler;
mod registry;
mod signal;

// ---- Public re-exports ----

pub use bus::EventBus;
pub use error::CallbackFailure;
pub use handler::{Dispatch, Event, Handler};
pub use signal::Signal;
