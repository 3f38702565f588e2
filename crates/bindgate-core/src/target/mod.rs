//! The binding target and its optional capability set.
//!
//! The pipeline never reflects over the target. It consumes a narrow
//! interface: [`BindTarget::try_set`] performs the actual property-set
//! operation, and a handful of optional capabilities let a target veto
//! names or values, receive developer-mode failure notifications, or
//! decline parameter binding entirely.
//!
//! Capabilities are modeled as probe methods returning `Option<&dyn _>`
//! with a `None` default. A target opts in by overriding the probe, and
//! callers get a type-safe "as capability" view with no downcasting.

use thiserror::Error;

use crate::param::Parameter;

/// Error raised by an individual property-set operation.
///
/// A `BindingError` is always isolated to its entry: the applier records
/// it and continues with the next admitted parameter.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum BindingError {
    /// The target has no property addressed by this name.
    #[error("no such property: {name}")]
    NoSuchProperty {
        /// The property path that failed to resolve.
        name: String,
    },

    /// The value could not be applied to the resolved property.
    #[error("cannot apply value to '{name}': {reason}")]
    ValueRejected {
        /// The property path.
        name: String,
        /// Why the value was not applicable.
        reason: String,
    },

    /// Any other target-specific failure.
    #[error("{message}")]
    Other {
        /// Target-supplied failure description.
        message: String,
    },
}

/// A target that vetoes parameter names.
pub trait NameFilter {
    /// Whether the target accepts this parameter name.
    fn acceptable_name(&self, name: &str) -> bool;
}

/// A target that vetoes parameter values.
pub trait ValueFilter {
    /// Whether the target accepts this parameter value.
    fn acceptable_value(&self, value: &str) -> bool;
}

/// A target that wants developer-mode binding-failure notifications.
pub trait FailureSink {
    /// Called once per isolated binding failure, in developer mode only.
    fn binding_failure(&mut self, name: &str, error: &BindingError);
}

/// The mutable object graph parameters are bound into.
///
/// Only [`try_set`] is required. The capability probes default to
/// `None`/`false`; targets override the ones they implement.
///
/// [`try_set`]: BindTarget::try_set
pub trait BindTarget {
    /// Attempt to set the named value on the target.
    ///
    /// Receives the full parameter, including every scalar of a
    /// multi-valued one, regardless of which representation admission
    /// checked.
    ///
    /// # Errors
    ///
    /// Returns a [`BindingError`] when this single set-operation fails.
    /// The error never aborts the surrounding batch.
    fn try_set(&mut self, param: &Parameter) -> Result<(), BindingError>;

    /// Probe for the name-veto capability.
    fn as_name_filter(&self) -> Option<&dyn NameFilter> {
        None
    }

    /// Probe for the value-veto capability.
    fn as_value_filter(&self) -> Option<&dyn ValueFilter> {
        None
    }

    /// Probe for the developer-notification capability.
    fn as_failure_sink(&mut self) -> Option<&mut dyn FailureSink> {
        None
    }

    /// Whether the target opts out of parameter binding entirely.
    ///
    /// When `true`, processing applies nothing and returns an empty
    /// report.
    fn declines_binding(&self) -> bool {
        false
    }
}
