//! Compiled pattern sets for admission decisions.
//!
//! A [`PatternSet`] is an immutable collection of case-insensitive regular
//! expressions compiled from a comma-delimited configuration string. Sets
//! come in two postures: deny (a match rejects the candidate) and allow
//! (a miss rejects the candidate); the posture lives in the admission
//! gates, not here. The set retains each pattern's original text so a
//! rejection can name the offending pattern in diagnostics.
//!
//! [`PatternSlot`] holds an optional compiled set behind an atomically
//! swapped reference: many in-flight admission checks read immutable
//! snapshots lock-free while a configuration reload publishes a complete
//! replacement set. Readers never observe a partially rebuilt set.

use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use regex::{Regex, RegexBuilder};
use thiserror::Error;

/// Error raised when a pattern string cannot be compiled.
///
/// A compile failure is fatal to the configuration unit that supplied the
/// pattern: the caller must not fall back to an accept-all posture.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PatternError {
    /// A sub-pattern is not a valid regular expression.
    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The offending pattern text as supplied.
        pattern: String,
        /// The underlying regex compile error.
        source: regex::Error,
    },
}

/// A single compiled pattern, keeping the original text for diagnostics.
#[derive(Debug, Clone)]
struct CompiledPattern {
    /// The pattern text as supplied in configuration.
    text: String,
    /// The compiled, anchored, case-insensitive regex.
    regex: Regex,
}

impl CompiledPattern {
    /// Compile one pattern segment.
    ///
    /// Matching is case-insensitive and must cover the entire candidate:
    /// the segment is anchored as `^(?:pat)$` so that `admin` does not
    /// match `administrator`.
    fn compile(text: &str) -> Result<Self, PatternError> {
        let regex = RegexBuilder::new(&format!("^(?:{text})$"))
            .case_insensitive(true)
            .build()
            .map_err(|source| PatternError::InvalidPattern {
                pattern: text.to_string(),
                source,
            })?;
        Ok(Self {
            text: text.to_string(),
            regex,
        })
    }
}

/// An immutable set of compiled matching rules.
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    patterns: Vec<CompiledPattern>,
}

impl PatternSet {
    /// Compile a comma-delimited list of regular expressions.
    ///
    /// Segments are trimmed and empty segments are skipped, so `"a,,b"`
    /// and `" a , b "` both yield two patterns. Each pattern must match
    /// the entire candidate, case-insensitively. Note that the comma is
    /// a plain delimiter with no escape mechanism: a regex that itself
    /// contains a comma (such as `a{1,3}`) cannot be expressed here.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::InvalidPattern`] for the first segment
    /// that fails to compile.
    pub fn compile(comma_delimited: &str) -> Result<Self, PatternError> {
        let patterns = comma_delimited
            .split(',')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .map(CompiledPattern::compile)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// Whether the set contains no patterns at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Number of compiled patterns in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Whether any pattern matches the candidate in full.
    #[must_use]
    pub fn is_match(&self, candidate: &str) -> bool {
        self.first_match(candidate).is_some()
    }

    /// The text of the first pattern matching the candidate, if any.
    ///
    /// Used by the admission gates to surface the offending (or, for an
    /// allow-list, the satisfying) pattern in rejection diagnostics.
    #[must_use]
    pub fn first_match(&self, candidate: &str) -> Option<&str> {
        self.patterns
            .iter()
            .find(|p| p.regex.is_match(candidate))
            .map(|p| p.text.as_str())
    }

    /// The original pattern texts, in configuration order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(|p| p.text.as_str())
    }
}

impl fmt::Display for PatternSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, p) in self.patterns.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", p.text)?;
        }
        write!(f, "]")
    }
}

/// An atomically swappable holder for an optional [`PatternSet`].
///
/// Four slots exist per deployment (name/value x deny/allow), each
/// independently configurable and independently absent. An absent set is
/// distinguished from a configured one: a missing deny set denies
/// nothing, a missing allow set allows everything.
///
/// Readers call [`PatternSlot::load`] and get an immutable snapshot they
/// keep for the duration of a batch; writers publish a complete
/// replacement via [`PatternSlot::replace`]. The swap is a single atomic
/// pointer exchange, so the hot admission path stays lock-free and a
/// reload never exposes a half-built set.
#[derive(Debug, Default)]
pub struct PatternSlot {
    inner: ArcSwapOption<PatternSet>,
}

impl PatternSlot {
    /// Create an unconfigured slot.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a slot holding an already compiled set.
    ///
    /// A set with zero patterns is stored as unconfigured, matching the
    /// configuration contract where an empty pattern string means "no
    /// set".
    #[must_use]
    pub fn holding(set: PatternSet) -> Self {
        let slot = Self::default();
        slot.replace(Some(set));
        slot
    }

    /// Load the current snapshot.
    ///
    /// The returned `Arc` pins the snapshot: a concurrent [`replace`]
    /// does not affect a batch that already loaded its view.
    ///
    /// [`replace`]: PatternSlot::replace
    #[must_use]
    pub fn load(&self) -> Option<Arc<PatternSet>> {
        self.inner.load_full()
    }

    /// Atomically publish a replacement set.
    ///
    /// Passing `None`, or a set with zero patterns, leaves the slot
    /// unconfigured. Returns `true` if a previous set was replaced,
    /// which callers use to warn on runtime replacement.
    pub fn replace(&self, set: Option<PatternSet>) -> bool {
        let next = set.filter(|s| !s.is_empty()).map(Arc::new);
        self.inner.swap(next).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_splits_trims_and_skips_empty_segments() {
        let set = PatternSet::compile(" foo , ,bar,").unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.texts().collect::<Vec<_>>(), vec!["foo", "bar"]);
    }

    #[test]
    fn compile_empty_string_yields_empty_set() {
        let set = PatternSet::compile("").unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn compile_rejects_invalid_regex() {
        let err = PatternSet::compile("valid.*,[unclosed").unwrap_err();
        match err {
            PatternError::InvalidPattern { pattern, .. } => {
                assert_eq!(pattern, "[unclosed");
            },
        }
    }

    #[test]
    fn matching_is_case_insensitive() {
        let set = PatternSet::compile("secret.*").unwrap();
        assert!(set.is_match("SECRET_key"));
        assert!(set.is_match("secret_key"));
    }

    #[test]
    fn matching_requires_full_string() {
        let set = PatternSet::compile("admin").unwrap();
        assert!(set.is_match("admin"));
        assert!(!set.is_match("administrator"));
        assert!(!set.is_match("superadmin"));
    }

    #[test]
    fn first_match_reports_pattern_text() {
        let set = PatternSet::compile("foo.*,bar.*").unwrap();
        assert_eq!(set.first_match("barbell"), Some("bar.*"));
        assert_eq!(set.first_match("nothing here"), None);
    }

    #[test]
    fn display_lists_pattern_texts() {
        let set = PatternSet::compile("a.*,b").unwrap();
        assert_eq!(set.to_string(), "[a.*, b]");
    }

    #[test]
    fn slot_starts_unconfigured() {
        let slot = PatternSlot::empty();
        assert!(slot.load().is_none());
    }

    #[test]
    fn slot_replace_publishes_complete_snapshot() {
        let slot = PatternSlot::empty();
        let replaced = slot.replace(Some(PatternSet::compile("x.*").unwrap()));
        assert!(!replaced);

        let snapshot = slot.load().unwrap();
        assert!(snapshot.is_match("xyz"));

        // A loaded snapshot is pinned across a concurrent replacement.
        let replaced = slot.replace(Some(PatternSet::compile("y.*").unwrap()));
        assert!(replaced);
        assert!(snapshot.is_match("xyz"));
        assert!(slot.load().unwrap().is_match("yak"));
    }

    #[test]
    fn slot_treats_zero_pattern_set_as_unconfigured() {
        let slot = PatternSlot::holding(PatternSet::compile("a").unwrap());
        slot.replace(Some(PatternSet::default()));
        assert!(slot.load().is_none());
    }
}
