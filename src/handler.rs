//! # Handlers: subscriber callbacks and their execution mode.
//!
//! A [`Handler`] wraps the subscriber callback in a shared pointer and
//! doubles as the subscription handle: the value returned by the subscribe
//! methods is a clone of the stored callback, and [`EventBus::unsubscribe`]
//! matches registrations by callback object (clones of one handle compare
//! equal, independently created handlers never do).
//!
//! [`Dispatch`] selects where the callback runs during a publish: on the
//! publisher's own call path, or on a detached tokio task.
//!
//! [`EventBus::unsubscribe`]: crate::EventBus::unsubscribe

use std::fmt;
use std::sync::Arc;

/// Bound required of every payload published on the bus.
///
/// Blanket-implemented for any `Clone + Send + Sync + 'static` type, so a
/// plain `#[derive(Clone)]` payload struct is enough. Distinct payload types
/// are distinct subscription keys.
pub trait Event: Clone + Send + Sync + 'static {
    /// Type name used in diagnostics.
    fn name() -> &'static str {
        std::any::type_name::<Self>()
    }
}

impl<T: Clone + Send + Sync + 'static> Event for T {}

/// How a subscriber's callback executes during dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dispatch {
    /// Run in-line on the publisher's call path, before the next subscriber.
    #[default]
    Inline,
    /// Hand off to a detached tokio task (fire-and-forget): the callback runs
    /// concurrently with later subscribers and with the publisher's
    /// continuation, and the bus keeps no handle to it.
    Spawned,
}

impl fmt::Display for Dispatch {
    /// Formats as the failure tag used in reports: `sync` or `async`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dispatch::Inline => f.write_str("sync"),
            Dispatch::Spawned => f.write_str("async"),
        }
    }
}

/// Shared subscriber callback; also the subscription handle.
///
/// Closures convert via `From`, so the subscribe methods accept them
/// directly. Keep the returned handle (or a clone) to unsubscribe later; the
/// same handle may also be registered again, and fires once per
/// registration.
pub struct Handler<E> {
    callback: Arc<dyn Fn(&E) + Send + Sync>,
}

impl<E> Handler<E> {
    /// Wraps a callback.
    pub fn new(callback: impl Fn(&E) + Send + Sync + 'static) -> Self {
        Self {
            callback: Arc::new(callback),
        }
    }

    /// Invokes the callback with a payload.
    pub(crate) fn call(&self, event: &E) {
        (self.callback)(event)
    }

    /// True when both handles point at the same callback object.
    #[must_use]
    pub fn same(&self, other: &Handler<E>) -> bool {
        Arc::ptr_eq(&self.callback, &other.callback)
    }
}

impl<E> Clone for Handler<E> {
    fn clone(&self) -> Self {
        Self {
            callback: Arc::clone(&self.callback),
        }
    }
}

impl<E, F> From<F> for Handler<E>
where
    F: Fn(&E) + Send + Sync + 'static,
{
    fn from(callback: F) -> Self {
        Handler::new(callback)
    }
}

impl<E> fmt::Debug for Handler<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_are_the_same_callback() {
        let a = Handler::new(|_: &u32| {});
        let b = a.clone();
        assert!(a.same(&b));
        assert!(b.same(&a));
    }

    #[test]
    fn test_independent_handlers_differ() {
        let a = Handler::new(|_: &u32| {});
        let b = Handler::new(|_: &u32| {});
        assert!(!a.same(&b));
    }

    #[test]
    fn test_dispatch_failure_tags() {
        assert_eq!(Dispatch::Inline.to_string(), "sync");
        assert_eq!(Dispatch::Spawned.to_string(), "async");
    }
}
