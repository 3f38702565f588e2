//! Best-effort batch application of admitted parameters.
//!
//! The applier walks the admitted map in order and attempts each
//! set-operation exactly once. A failing entry never aborts the batch
//! and never rolls back earlier successes: a malformed single field
//! must not deny binding of every other valid field in the same unit of
//! work. Failures are collected per item into the [`ApplyReport`]
//! rather than propagated as errors.

use tracing::{debug, error};

use crate::events::{AdmissionObserver, BindingFailureEvent};
use crate::param::{ParameterMap, normalize_space};
use crate::target::{BindTarget, BindingError};

/// One isolated binding failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyFailure {
    name: String,
    error: BindingError,
}

impl ApplyFailure {
    /// The parameter whose application failed.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The error the target returned.
    #[must_use]
    pub fn error(&self) -> &BindingError {
        &self.error
    }
}

/// Outcome of applying a batch of admitted parameters.
///
/// The applied count is the number of successful set-operations; the
/// failures list holds the isolated per-entry errors in batch order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    applied: usize,
    failures: Vec<ApplyFailure>,
}

impl ApplyReport {
    /// Number of parameters successfully applied.
    #[must_use]
    pub fn applied(&self) -> usize {
        self.applied
    }

    /// The isolated failures, in batch order.
    #[must_use]
    pub fn failures(&self) -> &[ApplyFailure] {
        &self.failures
    }

    /// Total entries attempted (each exactly once).
    #[must_use]
    pub fn attempted(&self) -> usize {
        self.applied + self.failures.len()
    }

    /// Whether every attempted entry applied cleanly.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Applies admitted parameters to the binding target.
#[derive(Debug, Clone, Copy)]
pub struct BindingApplier {
    dev_mode: bool,
}

impl BindingApplier {
    /// Create an applier.
    ///
    /// Developer mode surfaces each failure back to the target's
    /// failure sink and raises the log level; it never changes what is
    /// attempted or recorded.
    #[must_use]
    pub const fn new(dev_mode: bool) -> Self {
        Self { dev_mode }
    }

    /// Apply every admitted entry to the target, in map order.
    ///
    /// Each entry is attempted exactly once; there are no retries and
    /// no rollback. Failures are recorded in the report, reported to
    /// the observer, and (in developer mode) pushed to the target's
    /// failure sink.
    pub fn apply(
        &self,
        target: &mut dyn BindTarget,
        admitted: &ParameterMap,
        observer: &dyn AdmissionObserver,
    ) -> ApplyReport {
        let mut report = ApplyReport::default();

        for param in admitted.iter() {
            match target.try_set(param) {
                Ok(()) => report.applied += 1,
                Err(err) => {
                    if self.dev_mode {
                        error!(
                            "failed to set parameter [{}]: {err}",
                            normalize_space(param.name())
                        );
                        if let Some(sink) = target.as_failure_sink() {
                            sink.binding_failure(param.name(), &err);
                        }
                    } else {
                        debug!(
                            "failed to set parameter [{}]: {err}",
                            normalize_space(param.name())
                        );
                    }
                    observer.binding_failed(&BindingFailureEvent {
                        name: param.name().to_string(),
                        message: err.to_string(),
                    });
                    report.failures.push(ApplyFailure {
                        name: param.name().to_string(),
                        error: err,
                    });
                },
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::events::NullObserver;
    use crate::param::Parameter;
    use crate::target::FailureSink;

    /// Target that fails on configured names and records the rest.
    struct FlakyTarget {
        fail_on: Vec<String>,
        set: Vec<String>,
        notified: Vec<String>,
        sink_enabled: bool,
    }

    impl FlakyTarget {
        fn failing_on(names: &[&str]) -> Self {
            Self {
                fail_on: names.iter().map(ToString::to_string).collect(),
                set: Vec::new(),
                notified: Vec::new(),
                sink_enabled: false,
            }
        }
    }

    impl BindTarget for FlakyTarget {
        fn try_set(&mut self, param: &Parameter) -> Result<(), BindingError> {
            if self.fail_on.iter().any(|n| n == param.name()) {
                return Err(BindingError::NoSuchProperty {
                    name: param.name().to_string(),
                });
            }
            self.set.push(param.name().to_string());
            Ok(())
        }

        fn as_failure_sink(&mut self) -> Option<&mut dyn FailureSink> {
            if self.sink_enabled {
                Some(self)
            } else {
                None
            }
        }
    }

    impl FailureSink for FlakyTarget {
        fn binding_failure(&mut self, name: &str, _error: &BindingError) {
            self.notified.push(name.to_string());
        }
    }

    struct CollectingObserver {
        failures: Mutex<Vec<BindingFailureEvent>>,
    }

    impl AdmissionObserver for CollectingObserver {
        fn binding_failed(&self, event: &BindingFailureEvent) {
            self.failures.lock().unwrap().push(event.clone());
        }
    }

    fn three_params() -> ParameterMap {
        [
            Parameter::new("first", "1"),
            Parameter::new("second", "2"),
            Parameter::new("third", "3"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn middle_failure_is_isolated() {
        let mut target = FlakyTarget::failing_on(&["second"]);
        let report = BindingApplier::new(false).apply(&mut target, &three_params(), &NullObserver);

        assert_eq!(report.applied(), 2);
        assert_eq!(report.attempted(), 3);
        assert_eq!(target.set, vec!["first", "third"]);
        assert_eq!(report.failures().len(), 1);
        assert_eq!(report.failures()[0].name(), "second");
    }

    #[test]
    fn clean_batch_reports_no_failures() {
        let mut target = FlakyTarget::failing_on(&[]);
        let report = BindingApplier::new(false).apply(&mut target, &three_params(), &NullObserver);

        assert!(report.is_clean());
        assert_eq!(report.applied(), 3);
    }

    #[test]
    fn observer_sees_each_failure() {
        let mut target = FlakyTarget::failing_on(&["first", "third"]);
        let observer = CollectingObserver {
            failures: Mutex::new(Vec::new()),
        };
        let report = BindingApplier::new(false).apply(&mut target, &three_params(), &observer);

        assert_eq!(report.applied(), 1);
        let seen = observer.failures.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].name, "first");
        assert_eq!(seen[1].name, "third");
    }

    #[test]
    fn dev_mode_notifies_target_failure_sink() {
        let mut target = FlakyTarget::failing_on(&["second"]);
        target.sink_enabled = true;
        BindingApplier::new(true).apply(&mut target, &three_params(), &NullObserver);
        assert_eq!(target.notified, vec!["second"]);
    }

    #[test]
    fn production_mode_skips_target_notification() {
        let mut target = FlakyTarget::failing_on(&["second"]);
        target.sink_enabled = true;
        BindingApplier::new(false).apply(&mut target, &three_params(), &NullObserver);
        assert!(target.notified.is_empty());
    }
}
