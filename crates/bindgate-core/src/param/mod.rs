//! Request parameters and the ordered parameter map.
//!
//! A [`Parameter`] is an immutable (name, values) pair as extracted from
//! an inbound unit of work. How the pairs are sourced is the caller's
//! concern; this module only models them. Admission checks and
//! diagnostics consume the *primary* scalar (the first value); the
//! binding target receives the full parameter, values and all.
//!
//! [`ParameterMap`] is the ordered, unique-key collection the pipeline
//! consumes and produces. It is built fresh per unit of work and never
//! shared across concurrent invocations.

use std::fmt;

use indexmap::IndexMap;

/// An immutable parameter: a name and one or more string scalars.
///
/// Constructed once from input and never mutated. Multi-valued
/// parameters (repeated fields) carry all their scalars; the first one
/// is the primary representation used for admission checks and logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    name: String,
    values: Vec<String>,
}

impl Parameter {
    /// Create a single-valued parameter.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: vec![value.into()],
        }
    }

    /// Create a multi-valued parameter.
    ///
    /// An empty value list is allowed and models an absent value: the
    /// primary scalar is then `None` and value admission accepts the
    /// parameter unconditionally.
    pub fn multi(name: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// The parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The primary scalar: the first value, if any.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.values.first().map(String::as_str)
    }

    /// All scalar values.
    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Whether the parameter carries more than one scalar.
    #[must_use]
    pub fn is_multiple(&self) -> bool {
        self.values.len() > 1
    }
}

impl fmt::Display for Parameter {
    /// Renders `name => value` with whitespace-normalized text, the form
    /// used in debug listings of a whole map.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} => {}",
            normalize_space(&self.name),
            normalize_space(self.value().unwrap_or(""))
        )
    }
}

/// An ordered mapping from parameter name to [`Parameter`].
///
/// Keys are unique; inserting a duplicate name replaces the previous
/// entry (last write wins) while keeping the original position.
/// Iteration order is insertion order; the pipeline produces a
/// depth-ordered map instead when ordering is enabled.
#[derive(Debug, Clone, Default)]
pub struct ParameterMap {
    entries: IndexMap<String, Parameter>,
}

impl ParameterMap {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a parameter, keyed by its name.
    ///
    /// A duplicate name replaces the previous value and keeps the
    /// original position.
    pub fn insert(&mut self, param: Parameter) {
        self.entries.insert(param.name.clone(), param);
    }

    /// Look up a parameter by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.entries.get(name)
    }

    /// Whether a parameter with this name is present.
    #[must_use]
    pub fn contains_name(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Parameter names in map order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Entries in map order.
    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.entries.values()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// A one-line `name => value` listing for debug logs.
    ///
    /// Values are whitespace-normalized so multi-line payloads cannot
    /// forge extra log lines.
    #[must_use]
    pub fn log_display(&self) -> String {
        if self.is_empty() {
            return "NONE".to_string();
        }
        let mut out = String::new();
        for (i, param) in self.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            out.push_str(&param.to_string());
        }
        out
    }
}

impl PartialEq for ParameterMap {
    /// Order-sensitive equality: two maps are equal only if they hold
    /// the same entries in the same order. Used to assert that filtering
    /// is deterministic.
    fn eq(&self, other: &Self) -> bool {
        self.entries.iter().eq(other.entries.iter())
    }
}

impl Eq for ParameterMap {}

impl FromIterator<Parameter> for ParameterMap {
    fn from_iter<I: IntoIterator<Item = Parameter>>(iter: I) -> Self {
        let mut map = Self::new();
        for param in iter {
            map.insert(param);
        }
        map
    }
}

/// Trim and collapse all runs of whitespace to single spaces.
///
/// Applied to every piece of untrusted text before it reaches a log
/// line, so embedded newlines cannot forge log records.
#[must_use]
pub(crate) fn normalize_space(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_space = false;
    for c in input.chars() {
        if c.is_whitespace() {
            pending_space = !out.is_empty();
        } else {
            if pending_space {
                out.push(' ');
                pending_space = false;
            }
            out.push(c);
        }
    }
    out
}
