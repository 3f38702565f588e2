//! Fuzz harness for `PatternSet` compilation and matching.
//!
//! Exercises the compiler with arbitrary comma-delimited configuration
//! strings and the matcher with arbitrary candidates, ensuring no
//! panics on malformed regex syntax, pathological nesting, or
//! non-ASCII input. Compile failures are expected outcomes; only a
//! panic is a finding.

#![no_main]
use bindgate_core::PatternSet;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: (&str, &str)| {
    let (patterns, candidate) = data;
    if let Ok(set) = PatternSet::compile(patterns) {
        let _ = set.is_match(candidate);
        let _ = set.first_match(candidate);
        let _ = set.to_string();
    }
});
