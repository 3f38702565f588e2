//! Shallow-before-deep ordering of parameter names.
//!
//! When binding nested or indexed structures, parent containers must
//! exist before children can be addressed into them. Counting the
//! structural characters in a name is the cheapest correct
//! approximation of that dependency order: it needs no parsing of the
//! path expression itself.

use std::cmp::Ordering;

/// Count of structural characters in a name: the path separator `.`
/// and the indexing opener `[`, wherever they occur.
#[must_use]
pub fn structural_depth(name: &str) -> usize {
    name.chars().filter(|c| matches!(c, '.' | '[')).count()
}

/// Comparator ordering names shallow-before-deep.
///
/// Fewer structural characters sorts first; ties break by ordinary
/// lexical comparison, giving a stable total order.
#[must_use]
pub fn shallow_first(a: &str, b: &str) -> Ordering {
    structural_depth(a)
        .cmp(&structural_depth(b))
        .then_with(|| a.cmp(b))
}
