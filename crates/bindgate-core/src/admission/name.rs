//! Name admission: decides whether a parameter *name* may proceed.

use std::sync::{Arc, LazyLock};

use regex::{Regex, RegexBuilder};
use tracing::{debug, trace, warn};

use super::decision::{AdmissionDecision, RejectReason};
use crate::config::GuardConfig;
use crate::param::normalize_space;
use crate::pattern::PatternSet;
use crate::target::BindTarget;

/// Names matching this pattern address dispatch machinery (dynamic
/// method invocation), not data fields, and are dropped outright when
/// the guard is enabled.
static RESERVED_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    RegexBuilder::new("^(action|method):.*")
        .case_insensitive(true)
        .build()
        .expect("invalid reserved token pattern")
});

/// Per-batch name admission gate.
///
/// Built once per pipeline invocation from the guard's flags and a
/// snapshot of the name pattern slots, so every entry in a batch sees
/// the same configuration even while a reload swaps the slots.
///
/// Checks run in fixed order, short-circuiting on the first rejection:
/// reserved-token guard, length limit, deny-list, allow-list, target
/// veto, bindable-field metadata.
#[derive(Debug, Clone)]
pub struct NameGate {
    max_name_length: usize,
    dmi_enabled: bool,
    require_annotations: bool,
    dev_mode: bool,
    deny: Option<Arc<PatternSet>>,
    allow: Option<Arc<PatternSet>>,
}

impl NameGate {
    /// Build a gate from deployment flags and pattern snapshots.
    #[must_use]
    pub fn new(
        config: &GuardConfig,
        deny: Option<Arc<PatternSet>>,
        allow: Option<Arc<PatternSet>>,
    ) -> Self {
        Self {
            max_name_length: config.max_name_length,
            dmi_enabled: config.dmi_enabled,
            require_annotations: config.require_annotations,
            dev_mode: config.dev_mode,
            deny,
            allow,
        }
    }

    /// Decide whether the name may proceed.
    pub fn evaluate(&self, name: &str, target: &dyn BindTarget) -> AdmissionDecision {
        if self.dmi_enabled && RESERVED_TOKEN.is_match(name) {
            trace!(
                "dropping reserved control token name: {}",
                normalize_space(name)
            );
            return AdmissionDecision::Rejected(RejectReason::ReservedToken);
        }

        if name.len() > self.max_name_length {
            warn!(
                "parameter [{}] is too long, allowed length is [{}]",
                normalize_space(name),
                self.max_name_length
            );
            return AdmissionDecision::Rejected(RejectReason::NameTooLong {
                length: name.len(),
                max: self.max_name_length,
            });
        }

        if let Some(deny) = &self.deny {
            if let Some(pattern) = deny.first_match(name) {
                self.log_rejection(name, &format!("matches denied pattern [{pattern}]"));
                return AdmissionDecision::Rejected(RejectReason::NameDenied {
                    pattern: pattern.to_string(),
                });
            }
        }

        if let Some(allow) = &self.allow {
            if !allow.is_match(name) {
                self.log_rejection(name, &format!("didn't match accepted patterns {allow}"));
                return AdmissionDecision::Rejected(RejectReason::NameNotAllowed {
                    patterns: allow.to_string(),
                });
            }
        }

        if let Some(filter) = target.as_name_filter() {
            if !filter.acceptable_name(name) {
                debug!("target vetoed parameter name [{}]", normalize_space(name));
                return AdmissionDecision::Rejected(RejectReason::NameVetoed);
            }
        }

        if self.require_annotations && !is_declared_bindable(name, target) {
            // Unreachable until the metadata check below is implemented;
            // kept so the flag's semantics have a single home.
            return AdmissionDecision::Rejected(RejectReason::NameVetoed);
        }

        if self.dev_mode {
            debug!(
                "parameter [{}] was accepted and will be bound onto the target",
                normalize_space(name)
            );
        }
        AdmissionDecision::Accepted
    }

    fn log_rejection(&self, name: &str, detail: &str) {
        if self.dev_mode {
            warn!("parameter [{}] {detail}", normalize_space(name));
        } else {
            debug!("parameter [{}] {detail}", normalize_space(name));
        }
    }
}

/// Whether the name appears in the target's declared bindable-field
/// metadata.
///
/// Extension point for the `require_annotations` flag. Targets do not
/// yet expose field metadata, so every name passes.
// TODO: check the name against target-declared bindable-field metadata
// once `BindTarget` grows a capability that exposes it.
fn is_declared_bindable(_name: &str, _target: &dyn BindTarget) -> bool {
    true
}
