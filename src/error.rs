//! # Callback failure reporting.
//!
//! The bus has exactly one error kind: [`CallbackFailure`], a subscriber
//! callback that panicked during dispatch. Failures are caught at the
//! dispatch site, reported through the `log` facade, and never propagated to
//! the publisher or to later subscribers in the same publish call.
//!
//! Everything else — unsubscribing a never-registered handler, publishing
//! with no subscribers, clearing an already-empty registry — is a defined
//! no-op, not an error. Publish and subscribe calls return no status.

use std::any::Any;

use thiserror::Error;

use crate::handler::Dispatch;

/// A subscriber callback panicked while handling a published event.
///
/// Never returned to callers; captured per invocation and fed to the logging
/// collaborator with the event type name and the panic detail.
#[non_exhaustive]
#[derive(Error, Debug, Clone)]
#[error("{dispatch} handler for `{event}` panicked: {detail}")]
pub struct CallbackFailure {
    /// Name of the event type being dispatched.
    pub event: &'static str,
    /// Whether the callback ran in-line (`sync`) or detached (`async`).
    pub dispatch: Dispatch,
    /// Panic payload rendered as text.
    pub detail: String,
}

impl CallbackFailure {
    /// Captures a caught panic payload.
    pub(crate) fn from_panic(
        event: &'static str,
        dispatch: Dispatch,
        payload: Box<dyn Any + Send>,
    ) -> Self {
        let detail = if let Some(s) = payload.downcast_ref::<&'static str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "opaque panic payload".to_string()
        };
        Self {
            event,
            dispatch,
            detail,
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self.dispatch {
            Dispatch::Inline => "sync_callback_failure",
            Dispatch::Spawned => "async_callback_failure",
        }
    }

    /// Returns a human-readable message with details about the failure.
    pub fn as_message(&self) -> String {
        self.to_string()
    }

    /// Reports the failure through the logging collaborator.
    pub(crate) fn report(&self) {
        log::error!(target: "evbus", "{self}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_str_panic_payload_is_rendered() {
        let failure = CallbackFailure::from_panic("Tick", Dispatch::Inline, Box::new("boom"));
        assert_eq!(failure.detail, "boom");
        assert_eq!(
            failure.as_message(),
            "sync handler for `Tick` panicked: boom"
        );
    }

    #[test]
    fn test_string_panic_payload_is_rendered() {
        let failure = CallbackFailure::from_panic(
            "Tick",
            Dispatch::Spawned,
            Box::new(format!("code {}", 7)),
        );
        assert_eq!(failure.detail, "code 7");
        assert_eq!(
            failure.as_message(),
            "async handler for `Tick` panicked: code 7"
        );
    }

    #[test]
    fn test_opaque_panic_payload() {
        let failure = CallbackFailure::from_panic("Tick", Dispatch::Inline, Box::new(42_u8));
        assert_eq!(failure.detail, "opaque panic payload");
    }

    #[test]
    fn test_labels() {
        let sync = CallbackFailure::from_panic("Tick", Dispatch::Inline, Box::new("x"));
        let spawned = CallbackFailure::from_panic("Tick", Dispatch::Spawned, Box::new("x"));
        assert_eq!(sync.as_label(), "sync_callback_failure");
        assert_eq!(spawned.as_label(), "async_callback_failure");
    }
}
