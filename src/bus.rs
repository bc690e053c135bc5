//! # EventBus: typed publish/subscribe with priority dispatch.
//!
//! [`EventBus`] keys subscriptions by payload type. Publishing a value of
//! type `E` dispatches it to every handler subscribed for `E`, highest
//! priority first, with ties fired in registration order.
//!
//! ## Dispatch flow
//! ```text
//! publish(event)                publish_after(event, delay)
//!      │                              │
//!      │                       tokio::time::sleep(delay)  (suspends only the
//!      │                              │                    publishing task)
//!      ▼                              ▼
//!  Registry::snapshot ◄── taken after the delay, sorted by priority desc
//!      │
//!      ├─► condition false   ──► skipped (not fired, stays registered)
//!      ├─► Dispatch::Inline  ──► handler(&event) on the publisher's path
//!      ├─► Dispatch::Spawned ──► tokio::spawn(handler, event.clone())
//!      │                         (fire-and-forget, no JoinHandle kept)
//!      ▼
//!  Registry::prune ── one-time records that actually fired are removed
//! ```
//!
//! Handler panics are caught per invocation, reported as
//! [`CallbackFailure`] through the `log` facade, and never reach the
//! publisher or later handlers in the same publish call.

use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;

use crate::error::CallbackFailure;
use crate::handler::{Dispatch, Event, Handler};
use crate::registry::{Condition, Record, Registry};

/// Typed in-process publish/subscribe bus.
///
/// Cheap to clone; clones share one registry. Construct one bus per isolated
/// event domain and hand clones to producers and consumers — there is no
/// process-wide instance.
///
/// ## Example
/// ```rust
/// use evbus::{Dispatch, EventBus};
///
/// #[derive(Debug, Clone)]
/// struct Damage { amount: u32 }
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let bus = EventBus::new();
///     bus.subscribe(|e: &Damage| println!("took {}", e.amount), 0, Dispatch::Inline);
///     bus.publish(Damage { amount: 3 });
/// }
/// ```
#[derive(Clone, Default)]
pub struct EventBus {
    shared: Arc<Shared>,
}

#[derive(Default)]
struct Shared {
    registry: Registry,
    verbose: AtomicBool,
}

impl EventBus {
    /// Creates an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables the verbose lifecycle trace
    /// (subscribe/unsubscribe/publish `debug!` lines, target `evbus`).
    ///
    /// Affects every clone of this bus. Callback failures are reported
    /// regardless of this flag.
    pub fn set_verbose(&self, on: bool) {
        self.shared.verbose.store(on, Ordering::Relaxed);
    }

    /// True when the verbose lifecycle trace is enabled.
    #[must_use]
    pub fn is_verbose(&self) -> bool {
        self.shared.verbose.load(Ordering::Relaxed)
    }

    /// Registers `handler` for payload type `E`.
    ///
    /// Higher `priority` fires first; equal priorities fire in registration
    /// order. The same callback may be subscribed multiple times and fires
    /// once per registration. Returns the handle to pass to
    /// [`unsubscribe`](Self::unsubscribe).
    pub fn subscribe<E, H>(&self, handler: H, priority: i32, dispatch: Dispatch) -> Handler<E>
    where
        E: Event,
        H: Into<Handler<E>>,
    {
        self.register(handler.into(), priority, dispatch, false, None)
    }

    /// Registers a handler that is removed right after its first invocation,
    /// whether the callback succeeds or panics.
    pub fn subscribe_once<E, H>(&self, handler: H, priority: i32, dispatch: Dispatch) -> Handler<E>
    where
        E: Event,
        H: Into<Handler<E>>,
    {
        self.register(handler.into(), priority, dispatch, true, None)
    }

    /// Registers a handler gated by `condition`: at dispatch time the
    /// predicate is evaluated against the published payload and the handler
    /// fires only when it returns true. A false condition counts as "not
    /// fired" — the registration stays in place.
    pub fn subscribe_if<E, C, H>(
        &self,
        condition: C,
        handler: H,
        priority: i32,
        dispatch: Dispatch,
    ) -> Handler<E>
    where
        E: Event,
        C: Fn(&E) -> bool + Send + Sync + 'static,
        H: Into<Handler<E>>,
    {
        self.register(
            handler.into(),
            priority,
            dispatch,
            false,
            Some(Arc::new(condition)),
        )
    }

    /// One-time and conditional: the registration stays in place across
    /// publishes whose payloads fail `condition`, fires on the first payload
    /// that passes, and is removed only then.
    pub fn subscribe_once_if<E, C, H>(
        &self,
        condition: C,
        handler: H,
        priority: i32,
        dispatch: Dispatch,
    ) -> Handler<E>
    where
        E: Event,
        C: Fn(&E) -> bool + Send + Sync + 'static,
        H: Into<Handler<E>>,
    {
        self.register(
            handler.into(),
            priority,
            dispatch,
            true,
            Some(Arc::new(condition)),
        )
    }

    fn register<E: Event>(
        &self,
        handler: Handler<E>,
        priority: i32,
        dispatch: Dispatch,
        once: bool,
        condition: Option<Condition<E>>,
    ) -> Handler<E> {
        let record = Record {
            id: self.shared.registry.next_id(),
            handler: handler.clone(),
            priority,
            dispatch,
            once,
            condition,
        };
        self.shared.registry.insert(record);
        if self.is_verbose() {
            log::debug!(
                target: "evbus",
                "subscribed to {} (priority={priority}, dispatch={dispatch:?}, once={once})",
                E::name(),
            );
        }
        handler
    }

    /// Removes every registration of `handler` for `E`.
    ///
    /// Matching is by callback object: clones of the handle returned by the
    /// subscribe methods compare equal. Silent no-op when nothing matches or
    /// `E` was never subscribed to.
    pub fn unsubscribe<E: Event>(&self, handler: &Handler<E>) {
        let removed = self.shared.registry.remove_handler(handler);
        if self.is_verbose() {
            log::debug!(
                target: "evbus",
                "unsubscribed {removed} record(s) from {}",
                E::name(),
            );
        }
    }

    /// Removes every registration for `E`. Silent no-op when there are none.
    pub fn unsubscribe_all<E: Event>(&self) {
        let removed = self.shared.registry.clear::<E>();
        if self.is_verbose() {
            log::debug!(
                target: "evbus",
                "cleared {removed} record(s) for {}",
                E::name(),
            );
        }
    }

    /// True when at least one handler is registered for `E`.
    #[must_use]
    pub fn has_subscribers<E: Event>(&self) -> bool {
        self.shared.registry.has::<E>()
    }

    /// Dispatches `event` to every matching subscriber, highest priority
    /// first.
    ///
    /// Inline handlers run on this call path before the next record is
    /// considered. Spawned handlers are handed to the tokio runtime and run
    /// concurrently with each other and with the caller's continuation; this
    /// method does not wait for them. Publishing with no subscribers is a
    /// silent no-op.
    ///
    /// Must be called from within a tokio runtime when any matching
    /// subscriber uses [`Dispatch::Spawned`].
    pub fn publish<E: Event>(&self, event: E) {
        if self.is_verbose() {
            log::debug!(target: "evbus", "publishing {}", E::name());
        }
        let Some(snapshot) = self.shared.registry.snapshot::<E>() else {
            return;
        };

        let mut fired_once = Vec::new();
        for record in snapshot {
            if let Some(condition) = &record.condition {
                if !condition(&event) {
                    continue;
                }
            }
            match record.dispatch {
                Dispatch::Spawned => {
                    let handler = record.handler.clone();
                    let payload = event.clone();
                    tokio::spawn(async move {
                        let call = AssertUnwindSafe(async move { handler.call(&payload) });
                        if let Err(panic) = call.catch_unwind().await {
                            CallbackFailure::from_panic(E::name(), Dispatch::Spawned, panic)
                                .report();
                        }
                    });
                }
                Dispatch::Inline => {
                    let call =
                        std::panic::catch_unwind(AssertUnwindSafe(|| record.handler.call(&event)));
                    if let Err(panic) = call {
                        CallbackFailure::from_panic(E::name(), Dispatch::Inline, panic).report();
                    }
                }
            }
            // Spawned one-time records count as fired once scheduled.
            if record.once {
                fired_once.push(record.id);
            }
        }

        if !fired_once.is_empty() {
            self.shared.registry.prune::<E>(&fired_once);
        }
    }

    /// Suspends the calling task for `delay`, then dispatches like
    /// [`publish`](Self::publish).
    ///
    /// Only this call's continuation waits; unrelated tasks keep running.
    /// The dispatch snapshot is taken after the delay, so handlers
    /// subscribed or removed during the wait are respected. A zero delay
    /// dispatches immediately with no suspension.
    pub async fn publish_after<E: Event>(&self, event: E, delay: Duration) {
        if delay > Duration::ZERO {
            if self.is_verbose() {
                log::debug!(target: "evbus", "publishing {} after {delay:?}", E::name());
            }
            tokio::time::sleep(delay).await;
        }
        self.publish(event);
    }
}
