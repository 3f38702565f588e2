//! The parameter guard: composition root and produced interface.
//!
//! A [`ParameterGuard`] is built once per deployment from a
//! [`GuardConfig`], then invoked synchronously for every inbound unit
//! of work: [`filter`] decides, [`apply`] binds, [`process`] composes
//! the two. The guard's flags are immutable for its lifetime; only the
//! four pattern slots can be replaced at runtime, and those swaps are
//! atomic snapshot publications that in-flight batches never observe
//! half-done.
//!
//! [`filter`]: ParameterGuard::filter
//! [`apply`]: ParameterGuard::apply
//! [`process`]: ParameterGuard::process

use std::sync::Arc;

use tracing::{debug, warn};

use crate::admission::{AdmissionPipeline, NameGate, ValueGate};
use crate::apply::{ApplyReport, BindingApplier};
use crate::config::{ConfigError, GuardConfig};
use crate::events::{AdmissionObserver, NullObserver};
use crate::param::ParameterMap;
use crate::pattern::{PatternError, PatternSet, PatternSlot};
use crate::target::BindTarget;

/// Admission and binding guard for untrusted parameters.
pub struct ParameterGuard {
    config: GuardConfig,
    name_deny: PatternSlot,
    name_allow: PatternSlot,
    value_deny: PatternSlot,
    value_allow: PatternSlot,
    observer: Arc<dyn AdmissionObserver>,
}

impl std::fmt::Debug for ParameterGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // observer is a trait object with no Debug bound.
        f.debug_struct("ParameterGuard")
            .field("config", &self.config)
            .field("name_deny", &self.name_deny)
            .field("name_allow", &self.name_allow)
            .field("value_deny", &self.value_deny)
            .field("value_allow", &self.value_allow)
            .finish_non_exhaustive()
    }
}

impl Default for ParameterGuard {
    /// A guard with default configuration: no pattern sets, default
    /// length limit, every feature flag off.
    fn default() -> Self {
        Self {
            config: GuardConfig::default(),
            name_deny: PatternSlot::empty(),
            name_allow: PatternSlot::empty(),
            value_deny: PatternSlot::empty(),
            value_allow: PatternSlot::empty(),
            observer: Arc::new(NullObserver),
        }
    }
}

impl ParameterGuard {
    /// Build a guard from deployment configuration, compiling all four
    /// pattern strings.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if validation fails or any configured
    /// pattern does not compile. A pattern failure is fatal to this
    /// configuration unit; the guard never starts with a silently
    /// emptied set.
    pub fn from_config(config: GuardConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let name_deny = compile_slot(config.denied_name_patterns.as_deref())?;
        let name_allow = compile_slot(config.accepted_name_patterns.as_deref())?;
        let value_deny = compile_slot(config.denied_value_patterns.as_deref())?;
        let value_allow = compile_slot(config.accepted_value_patterns.as_deref())?;
        Ok(Self {
            config,
            name_deny,
            name_allow,
            value_deny,
            value_allow,
            observer: Arc::new(NullObserver),
        })
    }

    /// Attach a diagnostics observer.
    ///
    /// The observer receives every rejection and isolated binding
    /// failure, in production and developer mode alike.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn AdmissionObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// The guard's configuration flags.
    #[must_use]
    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    /// Filter a parameter map down to the admitted entries.
    ///
    /// Pure decision step: no target mutation, identical output for
    /// identical input and configuration.
    pub fn filter(&self, params: &ParameterMap, target: &dyn BindTarget) -> ParameterMap {
        self.pipeline().filter(params, target, self.observer.as_ref())
    }

    /// Apply already-admitted parameters to the target.
    ///
    /// Per-entry failures are isolated; the returned report carries the
    /// applied count and the failures in batch order.
    pub fn apply(&self, target: &mut dyn BindTarget, admitted: &ParameterMap) -> ApplyReport {
        BindingApplier::new(self.config.dev_mode).apply(target, admitted, self.observer.as_ref())
    }

    /// Filter then apply: the full admission and binding pass.
    ///
    /// A target that declines binding gets an empty report and is never
    /// touched.
    pub fn process(&self, params: &ParameterMap, target: &mut dyn BindTarget) -> ApplyReport {
        if target.declines_binding() {
            debug!("target declines parameter binding");
            return ApplyReport::default();
        }
        debug!("binding parameters: {}", params.log_display());
        let admitted = self.filter(params, &*target);
        self.apply(target, &admitted)
    }

    /// Atomically replace the denied-name pattern set.
    ///
    /// # Errors
    ///
    /// Returns a [`PatternError`] if the new patterns do not compile;
    /// the previous set stays in place.
    pub fn replace_denied_name_patterns(&self, patterns: &str) -> Result<(), PatternError> {
        replace_slot(&self.name_deny, "denied name", patterns)
    }

    /// Atomically replace the accepted-name pattern set.
    ///
    /// # Errors
    ///
    /// Returns a [`PatternError`] if the new patterns do not compile;
    /// the previous set stays in place.
    pub fn replace_accepted_name_patterns(&self, patterns: &str) -> Result<(), PatternError> {
        replace_slot(&self.name_allow, "accepted name", patterns)
    }

    /// Atomically replace the denied-value pattern set.
    ///
    /// # Errors
    ///
    /// Returns a [`PatternError`] if the new patterns do not compile;
    /// the previous set stays in place.
    pub fn replace_denied_value_patterns(&self, patterns: &str) -> Result<(), PatternError> {
        replace_slot(&self.value_deny, "denied value", patterns)
    }

    /// Atomically replace the accepted-value pattern set.
    ///
    /// # Errors
    ///
    /// Returns a [`PatternError`] if the new patterns do not compile;
    /// the previous set stays in place.
    pub fn replace_accepted_value_patterns(&self, patterns: &str) -> Result<(), PatternError> {
        replace_slot(&self.value_allow, "accepted value", patterns)
    }

    /// Assemble the per-invocation pipeline from current snapshots.
    fn pipeline(&self) -> AdmissionPipeline {
        AdmissionPipeline::new(
            self.config.ordered,
            NameGate::new(&self.config, self.name_deny.load(), self.name_allow.load()),
            ValueGate::new(&self.config, self.value_deny.load(), self.value_allow.load()),
        )
    }
}

/// Compile an optional configured pattern string into a slot.
fn compile_slot(patterns: Option<&str>) -> Result<PatternSlot, ConfigError> {
    let slot = PatternSlot::empty();
    if let Some(text) = patterns {
        slot.replace(Some(PatternSet::compile(text)?));
    }
    Ok(slot)
}

/// Compile and publish a replacement set, logging the transition.
///
/// Replacing a live set is an administrative action worth warning
/// about: widening a pattern set can change the deployment's safety
/// posture.
fn replace_slot(slot: &PatternSlot, what: &str, patterns: &str) -> Result<(), PatternError> {
    let set = PatternSet::compile(patterns)?;
    let previous = slot.load();
    slot.replace(Some(set));
    match previous {
        Some(old) => warn!("replacing {what} patterns {old} with [{patterns}]"),
        None => debug!("setting {what} patterns to [{patterns}]"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::param::Parameter;
    use crate::target::BindingError;

    /// Target that records applied parameters into a plain map.
    #[derive(Default)]
    struct Recorder {
        set: Vec<(String, String)>,
        declines: bool,
    }

    impl BindTarget for Recorder {
        fn try_set(&mut self, param: &Parameter) -> Result<(), BindingError> {
            self.set.push((
                param.name().to_string(),
                param.value().unwrap_or("").to_string(),
            ));
            Ok(())
        }

        fn declines_binding(&self) -> bool {
            self.declines
        }
    }

    fn params(pairs: &[(&str, &str)]) -> ParameterMap {
        pairs
            .iter()
            .map(|(n, v)| Parameter::new(*n, *v))
            .collect()
    }

    #[test]
    fn from_config_rejects_bad_pattern() {
        let config = GuardConfig {
            denied_name_patterns: Some("[unclosed".to_string()),
            ..GuardConfig::default()
        };
        let err = ParameterGuard::from_config(config).unwrap_err();
        assert!(matches!(err, ConfigError::Pattern(_)), "got {err:?}");
    }

    #[test]
    fn process_applies_admitted_parameters() {
        let guard = ParameterGuard::default();
        let mut target = Recorder::default();
        let report = guard.process(&params(&[("a", "1"), ("b", "2")]), &mut target);

        assert_eq!(report.applied(), 2);
        assert!(report.is_clean());
        assert_eq!(target.set.len(), 2);
    }

    #[test]
    fn declining_target_is_never_touched() {
        let guard = ParameterGuard::default();
        let mut target = Recorder {
            declines: true,
            ..Recorder::default()
        };
        let report = guard.process(&params(&[("a", "1")]), &mut target);

        assert_eq!(report.applied(), 0);
        assert_eq!(report.attempted(), 0);
        assert!(target.set.is_empty());
    }

    #[test]
    fn filter_is_deterministic() {
        let config = GuardConfig {
            denied_name_patterns: Some("^debug\\..*".to_string()),
            ordered: true,
            ..GuardConfig::default()
        };
        let guard = ParameterGuard::from_config(config).unwrap();
        let target = Recorder::default();
        let input = params(&[
            ("items[0].price", "9"),
            ("debug.trace", "on"),
            ("items", "3"),
            ("id", "7"),
        ]);

        let first = guard.filter(&input, &target);
        let second = guard.filter(&input, &target);
        assert_eq!(first, second);
        assert_eq!(
            first.names().collect::<Vec<_>>(),
            vec!["id", "items", "items[0].price"]
        );
    }

    #[test]
    fn pattern_replacement_is_visible_to_later_filters() {
        let guard = ParameterGuard::default();
        let target = Recorder::default();
        let input = params(&[("role", "admin"), ("note", "hi")]);

        assert_eq!(guard.filter(&input, &target).len(), 2);

        guard.replace_denied_name_patterns("^role$").unwrap();
        let filtered = guard.filter(&input, &target);
        assert_eq!(filtered.names().collect::<Vec<_>>(), vec!["note"]);
    }

    #[test]
    fn failed_replacement_keeps_previous_set() {
        let config = GuardConfig {
            denied_name_patterns: Some("^role$".to_string()),
            ..GuardConfig::default()
        };
        let guard = ParameterGuard::from_config(config).unwrap();
        let target = Recorder::default();
        let input = params(&[("role", "admin")]);

        assert!(guard.replace_denied_name_patterns("[unclosed").is_err());
        assert!(guard.filter(&input, &target).is_empty());
    }

    #[test]
    fn dev_mode_reaches_identical_decisions() {
        let base = GuardConfig {
            dmi_enabled: true,
            denied_name_patterns: Some("^secret.*".to_string()),
            accepted_value_patterns: Some("[\\w ]*".to_string()),
            ..GuardConfig::default()
        };
        let dev = GuardConfig {
            dev_mode: true,
            ..base.clone()
        };
        let prod_guard = ParameterGuard::from_config(base).unwrap();
        let dev_guard = ParameterGuard::from_config(dev).unwrap();
        let target = Recorder::default();

        let input = params(&[
            ("action:run", "1"),
            ("secret_token", "x"),
            ("comment", "hello world"),
            ("payload", "<script>"),
        ]);

        assert_eq!(
            prod_guard.filter(&input, &target),
            dev_guard.filter(&input, &target)
        );
    }
}
