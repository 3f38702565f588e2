//! The admission pipeline: name and value gates over a whole batch.

use tracing::debug;

use super::name::NameGate;
use super::ordering::shallow_first;
use super::value::ValueGate;
use crate::events::{AdmissionObserver, RejectionEvent};
use crate::param::{Parameter, ParameterMap};
use crate::target::BindTarget;

/// The main decision engine: filters a parameter map down to the
/// admitted entries, in policy order.
///
/// A pipeline is built per invocation from gates that already snapshot
/// the pattern configuration, so its working state is request-local and
/// a concurrent configuration reload cannot split a batch across two
/// pattern sets.
///
/// Filtering is a pure decision step: it never mutates the target and
/// yields identical output for identical input and configuration, so it
/// is safe to call speculatively or repeatedly.
#[derive(Debug, Clone)]
pub struct AdmissionPipeline {
    ordered: bool,
    name_gate: NameGate,
    value_gate: ValueGate,
}

impl AdmissionPipeline {
    /// Assemble a pipeline from its gates.
    #[must_use]
    pub fn new(ordered: bool, name_gate: NameGate, value_gate: ValueGate) -> Self {
        Self {
            ordered,
            name_gate,
            value_gate,
        }
    }

    /// Filter the input map down to the admitted entries.
    ///
    /// Name admission runs first (cheaper and more often decisive), then
    /// value admission; both must accept. Output preserves insertion
    /// order, or shallow-before-deep order when ordering is enabled.
    /// Every rejection is reported to the observer; none interrupts the
    /// batch.
    pub fn filter(
        &self,
        params: &ParameterMap,
        target: &dyn BindTarget,
        observer: &dyn AdmissionObserver,
    ) -> ParameterMap {
        let mut entries: Vec<&Parameter> = params.iter().collect();
        if self.ordered {
            entries.sort_by(|a, b| shallow_first(a.name(), b.name()));
        }

        let mut admitted = ParameterMap::new();
        for param in entries {
            let decision = self.name_gate.evaluate(param.name(), target);
            if let Some(reason) = decision.reason() {
                observer.parameter_rejected(&RejectionEvent::new(param.name(), reason.clone()));
                continue;
            }

            let decision = self.value_gate.evaluate(param, target);
            if let Some(reason) = decision.reason() {
                observer.parameter_rejected(&RejectionEvent::new(param.name(), reason.clone()));
                continue;
            }

            admitted.insert(param.clone());
        }

        debug!(
            "admitted {} of {} parameters",
            admitted.len(),
            params.len()
        );
        admitted
    }
}
