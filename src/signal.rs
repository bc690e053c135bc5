//! # Signals: zero-payload events.
//!
//! A parameterless "something happened" notification is modeled as a
//! dedicated empty payload type, [`Signal`], so it routes through the same
//! typed registry and dispatch path as every other event. The methods here
//! are sugar adapting zero-argument closures; `unsubscribe`,
//! `unsubscribe_all` and `has_subscribers` need no adapters — instantiate
//! the generic methods with `Signal`.

use std::time::Duration;

use crate::bus::EventBus;
use crate::handler::{Dispatch, Handler};

/// Empty payload for parameterless signal events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Signal;

impl EventBus {
    /// [`subscribe`](Self::subscribe) for zero-payload signals.
    pub fn subscribe_signal<F>(&self, callback: F, priority: i32, dispatch: Dispatch) -> Handler<Signal>
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.subscribe(move |_: &Signal| callback(), priority, dispatch)
    }

    /// [`subscribe_once`](Self::subscribe_once) for zero-payload signals.
    pub fn subscribe_once_signal<F>(
        &self,
        callback: F,
        priority: i32,
        dispatch: Dispatch,
    ) -> Handler<Signal>
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.subscribe_once(move |_: &Signal| callback(), priority, dispatch)
    }

    /// [`subscribe_if`](Self::subscribe_if) for zero-payload signals.
    pub fn subscribe_if_signal<C, F>(
        &self,
        condition: C,
        callback: F,
        priority: i32,
        dispatch: Dispatch,
    ) -> Handler<Signal>
    where
        C: Fn() -> bool + Send + Sync + 'static,
        F: Fn() + Send + Sync + 'static,
    {
        self.subscribe_if(
            move |_: &Signal| condition(),
            move |_: &Signal| callback(),
            priority,
            dispatch,
        )
    }

    /// [`publish`](Self::publish) for zero-payload signals.
    pub fn publish_signal(&self) {
        self.publish(Signal);
    }

    /// [`publish_after`](Self::publish_after) for zero-payload signals.
    pub async fn publish_signal_after(&self, delay: Duration) {
        self.publish_after(Signal, delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_signal_subscribers_fire_on_signal_publish() {
        let bus = EventBus::new();
        let count = Arc::new(AtomicUsize::new(0));
        let bump = Arc::clone(&count);
        let handle = bus.subscribe_signal(
            move || {
                bump.fetch_add(1, Ordering::SeqCst);
            },
            0,
            Dispatch::Inline,
        );

        bus.publish_signal();
        bus.publish_signal();
        assert_eq!(count.load(Ordering::SeqCst), 2);

        bus.unsubscribe(&handle);
        bus.publish_signal();
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_once_signal_is_spent_after_first_publish() {
        let bus = EventBus::new();
        let count = Arc::new(AtomicUsize::new(0));
        let bump = Arc::clone(&count);
        bus.subscribe_once_signal(
            move || {
                bump.fetch_add(1, Ordering::SeqCst);
            },
            0,
            Dispatch::Inline,
        );

        bus.publish_signal();
        bus.publish_signal();
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(!bus.has_subscribers::<Signal>());
    }

    #[test]
    fn test_conditional_signal_respects_the_gate() {
        let bus = EventBus::new();
        let open = Arc::new(AtomicBool::new(false));
        let count = Arc::new(AtomicUsize::new(0));
        let gate = Arc::clone(&open);
        let bump = Arc::clone(&count);
        bus.subscribe_if_signal(
            move || gate.load(Ordering::SeqCst),
            move || {
                bump.fetch_add(1, Ordering::SeqCst);
            },
            0,
            Dispatch::Inline,
        );

        bus.publish_signal();
        assert_eq!(count.load(Ordering::SeqCst), 0);

        open.store(true, Ordering::SeqCst);
        bus.publish_signal();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_delayed_signal_publish() {
        let bus = EventBus::new();
        let count = Arc::new(AtomicUsize::new(0));
        let bump = Arc::clone(&count);
        bus.subscribe_signal(
            move || {
                bump.fetch_add(1, Ordering::SeqCst);
            },
            0,
            Dispatch::Inline,
        );

        bus.publish_signal_after(std::time::Duration::from_millis(20)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
