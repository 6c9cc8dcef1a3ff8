//! Severity levels for diagnostics.
//!
//! Severity ranks how strongly a finding should influence downstream
//! tooling, from internal faults down to stylistic suggestions.

use std::fmt;

use serde::Serialize;

/// The severity level of a diagnostic.
///
/// Only [`Severity::Critical`] and semantic [`Severity::Error`] findings
/// make a document invalid; warnings, info, and hints are advisory and
/// never block execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Severity {
    /// An internal fault or unusable document root.
    ///
    /// Critical findings mean the pass could not reason about the
    /// document at all.
    Critical,

    /// A rule violation that must be fixed.
    Error,

    /// An advisory finding that should be reviewed.
    ///
    /// Capability gaps and unknown vocabulary are warnings: validating
    /// against a lower-capability target informs, it never blocks.
    Warning,

    /// Neutral information about the document.
    Info,

    /// A suggestion for improvement.
    Hint,
}

impl Severity {
    /// Returns `true` for `Critical` and `Error` severities.
    pub fn is_error(&self) -> bool {
        matches!(self, Severity::Critical | Severity::Error)
    }

    /// Returns `true` for the `Warning` severity.
    pub fn is_warning(&self) -> bool {
        matches!(self, Severity::Warning)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Critical => write!(f, "critical"),
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
            Severity::Hint => write!(f, "hint"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_error() {
        assert!(Severity::Critical.is_error());
        assert!(Severity::Error.is_error());
        assert!(!Severity::Warning.is_error());
        assert!(!Severity::Info.is_error());
        assert!(!Severity::Hint.is_error());
    }

    #[test]
    fn test_display() {
        assert_eq!(Severity::Critical.to_string(), "critical");
        assert_eq!(Severity::Hint.to_string(), "hint");
    }
}
