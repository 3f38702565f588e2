//! Parameter admission: the decision half of the pipeline.
//!
//! Admission decides which untrusted (name, value) pairs may be bound
//! onto a target, without touching the target. The pieces compose
//! leaf-first:
//!
//! ```text
//! ParameterMap --> NameGate --> ValueGate --> admitted ParameterMap
//!                  (reserved    (empty         (insertion or
//!                   token,       short-circuit,  shallow-first order)
//!                   length,      deny, allow,
//!                   deny, allow, target veto)
//!                   target veto)
//! ```
//!
//! # Security Model
//!
//! - Names carry always-on guards (reserved control tokens when
//!   enabled, length limit) on top of the configurable pattern sets;
//!   values are fully permissive unless a deployment opts into
//!   restriction.
//! - Every rejection is returned as data ([`AdmissionDecision`]) and
//!   reported to the diagnostics observer; nothing in this module can
//!   abort the surrounding batch.
//! - Gates snapshot the pattern configuration once per batch, so a
//!   concurrent reload never splits a batch across two pattern sets.

mod decision;
mod name;
mod ordering;
mod pipeline;
mod value;


pub use decision::{AdmissionDecision, RejectReason};
pub use name::NameGate;
pub use ordering::{shallow_first, structural_depth};
pub use pipeline::AdmissionPipeline;
pub use value::ValueGate;
