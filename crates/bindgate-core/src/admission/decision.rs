//! Admission decision types.

use std::fmt;

use serde::Serialize;

/// The outcome of one admission check.
///
/// Rejection is expected, data-shaped control flow: it is returned,
/// logged, and counted, never raised as an error. Nothing in the
/// admission path can abort the surrounding batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdmissionDecision {
    /// The parameter may proceed.
    Accepted,
    /// The parameter is dropped, with the reason retained for
    /// diagnostics.
    Rejected(RejectReason),
}

impl AdmissionDecision {
    /// Whether the decision admits the parameter.
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }

    /// The rejection reason, if the decision rejects.
    #[must_use]
    pub fn reason(&self) -> Option<&RejectReason> {
        match self {
            Self::Accepted => None,
            Self::Rejected(reason) => Some(reason),
        }
    }
}

/// Why a parameter was rejected.
///
/// Pattern-based variants retain the pattern text involved in the
/// decision so operators can see which configured rule fired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[non_exhaustive]
pub enum RejectReason {
    /// The name addresses a reserved control token (`action:`/`method:`
    /// prefix) while the control-token guard is enabled.
    ReservedToken,

    /// The name exceeds the configured length limit.
    NameTooLong {
        /// Actual name length in bytes.
        length: usize,
        /// Configured maximum.
        max: usize,
    },

    /// The name matches a denied pattern.
    NameDenied {
        /// The matching deny pattern.
        pattern: String,
    },

    /// A name allow-list is configured and the name matches none of it.
    NameNotAllowed {
        /// Display form of the configured allow-list.
        patterns: String,
    },

    /// The binding target vetoed the name.
    NameVetoed,

    /// The value matches a denied pattern.
    ValueDenied {
        /// The matching deny pattern.
        pattern: String,
    },

    /// A value allow-list is configured and the value matches none of
    /// it.
    ValueNotAllowed {
        /// Display form of the configured allow-list.
        patterns: String,
    },

    /// The binding target vetoed the value.
    ValueVetoed,
}

impl RejectReason {
    /// The pattern text involved in a pattern-based rejection.
    ///
    /// For a deny rejection this is the matching pattern; for an
    /// allow-list miss it is the display form of the configured set.
    #[must_use]
    pub fn offending_pattern(&self) -> Option<&str> {
        match self {
            Self::NameDenied { pattern } | Self::ValueDenied { pattern } => Some(pattern),
            Self::NameNotAllowed { patterns } | Self::ValueNotAllowed { patterns } => {
                Some(patterns)
            },
            _ => None,
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReservedToken => write!(f, "name addresses a reserved control token"),
            Self::NameTooLong { length, max } => {
                write!(f, "name length {length} exceeds limit {max}")
            },
            Self::NameDenied { pattern } => {
                write!(f, "name matches denied pattern '{pattern}'")
            },
            Self::NameNotAllowed { patterns } => {
                write!(f, "name matches no accepted pattern in {patterns}")
            },
            Self::NameVetoed => write!(f, "target vetoed the name"),
            Self::ValueDenied { pattern } => {
                write!(f, "value matches denied pattern '{pattern}'")
            },
            Self::ValueNotAllowed { patterns } => {
                write!(f, "value matches no accepted pattern in {patterns}")
            },
            Self::ValueVetoed => write!(f, "target vetoed the value"),
        }
    }
}
