//! Suggested fixes attached to diagnostics.

use gfl_ast::SourceLocation;

/// A suggested fix for a diagnostic.
///
/// A fix pairs a human-readable description with an optional replacement
/// text and the location it applies to. Editors can offer the
/// replacement directly; the description stands alone for CLI output.
#[derive(Debug, Clone, PartialEq)]
pub struct Fix {
    description: String,
    replacement: Option<String>,
    location: Option<SourceLocation>,
}

impl Fix {
    /// Create a fix with just a description.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            replacement: None,
            location: None,
        }
    }

    /// Attach replacement text.
    pub fn with_replacement(mut self, replacement: impl Into<String>) -> Self {
        self.replacement = Some(replacement.into());
        self
    }

    /// Attach the location the fix applies to.
    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }

    /// The human-readable description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The replacement text, if any.
    pub fn replacement(&self) -> Option<&str> {
        self.replacement.as_deref()
    }

    /// The location the fix applies to, if any.
    pub fn location(&self) -> Option<&SourceLocation> {
        self.location.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fix_builder() {
        let fix = Fix::new("replace 'maximise' with 'maximize'")
            .with_replacement("maximize")
            .with_location(SourceLocation::new(4, 9));

        assert_eq!(fix.description(), "replace 'maximise' with 'maximize'");
        assert_eq!(fix.replacement(), Some("maximize"));
        assert_eq!(fix.location().unwrap().line(), 4);
    }
}
