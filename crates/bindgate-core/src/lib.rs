//! Parameter admission and binding pipeline.
//!
//! Given an untrusted, ordered collection of (name, value) pairs,
//! `bindgate-core` decides which pairs are safe to bind onto a mutable
//! target object graph, in what order, and applies them one at a time
//! while isolating per-entry failures. It is the last line of defense
//! against mass-assignment and expression-injection attacks: a caller
//! supplying a parameter name that resolves to an internal method, a
//! deeply nested property path, or a value matching a forbidden
//! pattern.
//!
//! # Architecture
//!
//! ```text
//! raw pairs --> AdmissionPipeline --> admitted map --> BindingApplier --> target
//!               (NameGate, ValueGate,                  (per-entry
//!                PatternSet snapshots,                  failure
//!                optional ordering)                     isolation)
//! ```
//!
//! - [`pattern`] — compiled allow/deny regex sets with atomic snapshot
//!   replacement
//! - [`param`] — the immutable [`Parameter`] and ordered
//!   [`ParameterMap`]
//! - [`admission`] — name/value gates, shallow-first ordering, and the
//!   pure filtering pipeline
//! - [`apply`] — best-effort batch application with a result-per-item
//!   report
//! - [`target`] — the [`BindTarget`] seam and its optional capabilities
//! - [`events`] — structured diagnostics for rejections and failures
//! - [`config`] / [`guard`] — deployment configuration and the
//!   [`ParameterGuard`] composition root
//!
//! # Security Model
//!
//! - Admission is permissive by default but every always-on guard fails
//!   toward rejection: reserved control-token names (when enabled) and
//!   over-long names are dropped regardless of any allow-list.
//! - Invalid configured patterns are fatal at load time; the guard
//!   never falls back to an accept-all posture.
//! - Rejections and binding failures are data, never exceptions: no
//!   condition in this crate aborts the surrounding unit of work.
//! - Pattern sets are immutable snapshots behind atomically swapped
//!   references, keeping the hot admission path lock-free under
//!   concurrent configuration reloads.
//!
//! # Example
//!
//! ```
//! use bindgate_core::config::GuardConfig;
//! use bindgate_core::guard::ParameterGuard;
//! use bindgate_core::param::{Parameter, ParameterMap};
//! use bindgate_core::target::{BindTarget, BindingError};
//!
//! struct Profile {
//!     name: Option<String>,
//! }
//!
//! impl BindTarget for Profile {
//!     fn try_set(&mut self, param: &Parameter) -> Result<(), BindingError> {
//!         match param.name() {
//!             "name" => {
//!                 self.name = param.value().map(str::to_string);
//!                 Ok(())
//!             },
//!             other => Err(BindingError::NoSuchProperty {
//!                 name: other.to_string(),
//!             }),
//!         }
//!     }
//! }
//!
//! let config = GuardConfig {
//!     dmi_enabled: true,
//!     ..GuardConfig::default()
//! };
//! let guard = ParameterGuard::from_config(config)?;
//!
//! let params: ParameterMap = [
//!     Parameter::new("name", "Alice"),
//!     Parameter::new("method:delete", "1"),
//! ]
//! .into_iter()
//! .collect();
//!
//! let mut profile = Profile { name: None };
//! let report = guard.process(&params, &mut profile);
//!
//! assert_eq!(report.applied(), 1);
//! assert_eq!(profile.name.as_deref(), Some("Alice"));
//! # Ok::<(), bindgate_core::config::ConfigError>(())
//! ```

pub mod admission;
pub mod apply;
pub mod config;
pub mod events;
pub mod guard;
pub mod param;
pub mod pattern;
pub mod target;

pub use admission::{AdmissionDecision, AdmissionPipeline, NameGate, RejectReason, ValueGate};
pub use apply::{ApplyFailure, ApplyReport, BindingApplier};
pub use config::{ConfigError, GuardConfig};
pub use events::{AdmissionObserver, BindingFailureEvent, NullObserver, RejectionEvent};
pub use guard::ParameterGuard;
pub use param::{Parameter, ParameterMap};
pub use pattern::{PatternError, PatternSet, PatternSlot};
pub use target::{BindTarget, BindingError, FailureSink, NameFilter, ValueFilter};
