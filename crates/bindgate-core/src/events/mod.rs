//! Structured diagnostics events for admission and binding.
//!
//! The pipeline reports every rejection and every isolated binding
//! failure to an [`AdmissionObserver`]. Deployments wire the observer to
//! their metrics or audit channel; the default [`NullObserver`] drops
//! events, leaving tracing logs as the only output. Observers receive
//! the same events in production and developer mode; only log verbosity
//! differs between the two.

use serde::Serialize;

use crate::admission::RejectReason;

/// A parameter was rejected during admission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectionEvent {
    /// The rejected parameter name.
    pub name: String,
    /// Why it was rejected.
    pub reason: RejectReason,
}

impl RejectionEvent {
    /// Build an event for a rejected name.
    #[must_use]
    pub fn new(name: &str, reason: RejectReason) -> Self {
        Self {
            name: name.to_string(),
            reason,
        }
    }

    /// The pattern text involved in a pattern-based rejection, if any.
    #[must_use]
    pub fn offending_pattern(&self) -> Option<&str> {
        self.reason.offending_pattern()
    }
}

/// An individual set-operation failed during binding.
///
/// The failure was isolated: the batch continued past it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BindingFailureEvent {
    /// The parameter whose application failed.
    pub name: String,
    /// The target-supplied failure description.
    pub message: String,
}

/// Sink for structured admission and binding diagnostics.
///
/// Implementations must be cheap and infallible: they run on the hot
/// admission path of every unit of work. Both callbacks default to
/// no-ops so an observer can subscribe to one kind of event only.
pub trait AdmissionObserver: Send + Sync {
    /// A parameter was rejected during admission.
    fn parameter_rejected(&self, _event: &RejectionEvent) {}

    /// An individual binding attempt failed and was isolated.
    fn binding_failed(&self, _event: &BindingFailureEvent) {}
}

/// The default observer: drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl AdmissionObserver for NullObserver {}
