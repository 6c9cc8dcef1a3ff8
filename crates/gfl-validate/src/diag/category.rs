//! Diagnostic categories.
//!
//! Categories group findings by the subsystem that owns them. Every
//! error code carries its category, and code strings are prefixed with
//! the category name (`SEMANTIC_CONTRACT_MISMATCH`).

use std::fmt;

use serde::Serialize;

/// The subsystem a diagnostic belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Category {
    /// Malformed document structure (unusable root shape).
    Syntax,
    /// Block rules, references, contracts, vocabulary.
    Semantic,
    /// Wrong scalar or collection shape for a field.
    Type,
    /// Reserved for the plugin execution engine.
    Plugin,
    /// Schema files and custom type resolution.
    Schema,
    /// Reserved for performance advisories from adjacent subsystems.
    Performance,
    /// Reserved for security advisories from adjacent subsystems.
    Security,
}

impl Category {
    /// The code prefix for this category (`"SEMANTIC"`, `"TYPE"`, ...).
    pub fn prefix(&self) -> &'static str {
        match self {
            Category::Syntax => "SYNTAX",
            Category::Semantic => "SEMANTIC",
            Category::Type => "TYPE",
            Category::Plugin => "PLUGIN",
            Category::Schema => "SCHEMA",
            Category::Performance => "PERFORMANCE",
            Category::Security => "SECURITY",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.prefix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixes() {
        assert_eq!(Category::Syntax.prefix(), "SYNTAX");
        assert_eq!(Category::Semantic.prefix(), "SEMANTIC");
        assert_eq!(Category::Schema.prefix(), "SCHEMA");
    }

    #[test]
    fn test_display_matches_prefix() {
        assert_eq!(Category::Type.to_string(), "TYPE");
    }
}
