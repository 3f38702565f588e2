//! Value admission: decides whether a parameter *value* may proceed.

use std::sync::Arc;

use tracing::{debug, warn};

use super::decision::{AdmissionDecision, RejectReason};
use crate::config::GuardConfig;
use crate::param::{Parameter, normalize_space};
use crate::pattern::PatternSet;
use crate::target::BindTarget;

/// Per-batch value admission gate.
///
/// Evaluates the parameter's primary scalar: empty or absent values are
/// inert and accepted unconditionally, then the deny-list, allow-list,
/// and target veto run in order. An unconfigured set passes everything;
/// values have no always-on checks of their own (names carry the
/// reserved-token and length guards).
///
/// Multi-valued parameters are checked through their primary scalar
/// only; the target later receives the full payload. Pattern checks
/// bound the *shape* of traffic, they do not enumerate every value.
#[derive(Debug, Clone)]
pub struct ValueGate {
    dev_mode: bool,
    deny: Option<Arc<PatternSet>>,
    allow: Option<Arc<PatternSet>>,
}

impl ValueGate {
    /// Build a gate from deployment flags and pattern snapshots.
    #[must_use]
    pub fn new(
        config: &GuardConfig,
        deny: Option<Arc<PatternSet>>,
        allow: Option<Arc<PatternSet>>,
    ) -> Self {
        Self {
            dev_mode: config.dev_mode,
            deny,
            allow,
        }
    }

    /// Decide whether the parameter's value may proceed.
    pub fn evaluate(&self, param: &Parameter, target: &dyn BindTarget) -> AdmissionDecision {
        let Some(value) = param.value() else {
            return AdmissionDecision::Accepted;
        };
        if value.is_empty() {
            return AdmissionDecision::Accepted;
        }

        if let Some(deny) = &self.deny {
            if let Some(pattern) = deny.first_match(value) {
                self.log_rejection(param.name(), value, &format!("matches denied pattern [{pattern}]"));
                return AdmissionDecision::Rejected(RejectReason::ValueDenied {
                    pattern: pattern.to_string(),
                });
            }
        }

        if let Some(allow) = &self.allow {
            if !allow.is_match(value) {
                self.log_rejection(
                    param.name(),
                    value,
                    &format!("didn't match accepted patterns {allow}"),
                );
                return AdmissionDecision::Rejected(RejectReason::ValueNotAllowed {
                    patterns: allow.to_string(),
                });
            }
        }

        if let Some(filter) = target.as_value_filter() {
            if !filter.acceptable_value(value) {
                debug!(
                    "target vetoed value of parameter [{}]",
                    normalize_space(param.name())
                );
                return AdmissionDecision::Rejected(RejectReason::ValueVetoed);
            }
        }

        AdmissionDecision::Accepted
    }

    fn log_rejection(&self, name: &str, value: &str, detail: &str) {
        if self.dev_mode {
            warn!(
                "value [{}] of parameter [{}] {detail} and will be dropped",
                normalize_space(value),
                normalize_space(name)
            );
        } else {
            debug!(
                "value [{}] of parameter [{}] {detail} and will be dropped",
                normalize_space(value),
                normalize_space(name)
            );
        }
    }
}
