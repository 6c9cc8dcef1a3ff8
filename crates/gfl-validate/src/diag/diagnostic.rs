//! The core diagnostic type.
//!
//! A [`Diagnostic`] is one validation finding: severity, code, message,
//! optional source location, free-form context, suggested fixes, and
//! related codes.

use std::fmt;

use indexmap::IndexMap;

use gfl_ast::SourceLocation;

use crate::diag::{Category, ErrorCode, Fix, Severity};

/// A single validation finding.
///
/// Diagnostics are built with the consuming `with_*` methods, or mutated
/// in place with `add_*` when chaining off
/// [`ValidationReport::add`](crate::diag::ValidationReport::add):
///
/// ```
/// # use gfl_validate::diag::{ErrorCode, ValidationReport};
/// let mut report = ValidationReport::new();
/// report
///     .add_error("count must be a positive integer", ErrorCode::InvalidFieldValue)
///     .add_context("field", "count")
///     .add_context("block", "design");
/// ```
#[derive(Debug, Clone)]
pub struct Diagnostic {
    severity: Severity,
    code: ErrorCode,
    message: String,
    location: Option<SourceLocation>,
    context: IndexMap<String, String>,
    fixes: Vec<Fix>,
    related: Vec<ErrorCode>,
}

impl Diagnostic {
    /// Create a diagnostic with an explicit severity.
    pub fn new(severity: Severity, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            location: None,
            context: IndexMap::new(),
            fixes: Vec::new(),
            related: Vec::new(),
        }
    }

    /// Create a critical diagnostic.
    pub fn critical(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Critical, code, message)
    }

    /// Create an error diagnostic.
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, code, message)
    }

    /// Create a warning diagnostic.
    pub fn warning(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, code, message)
    }

    /// Create an info diagnostic.
    pub fn info(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Info, code, message)
    }

    /// Create a hint diagnostic.
    pub fn hint(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Hint, code, message)
    }

    /// The severity of this finding.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// The error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// The category, derived from the code.
    pub fn category(&self) -> Category {
        self.code.category()
    }

    /// The primary message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The source location, if known.
    pub fn location(&self) -> Option<&SourceLocation> {
        self.location.as_ref()
    }

    /// Free-form context entries, in insertion order.
    pub fn context(&self) -> &IndexMap<String, String> {
        &self.context
    }

    /// Suggested fixes.
    pub fn fixes(&self) -> &[Fix] {
        &self.fixes
    }

    /// Codes of related findings.
    pub fn related(&self) -> &[ErrorCode] {
        &self.related
    }

    /// Set the source location.
    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }

    /// Add a context entry.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Add a suggested fix.
    pub fn with_fix(mut self, fix: Fix) -> Self {
        self.fixes.push(fix);
        self
    }

    /// Add a related code.
    pub fn with_related(mut self, code: ErrorCode) -> Self {
        self.related.push(code);
        self
    }

    /// Add a context entry in place; returns `self` for chaining.
    pub fn add_context(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> &mut Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Add a suggested fix in place; returns `self` for chaining.
    pub fn add_fix(&mut self, fix: Fix) -> &mut Self {
        self.fixes.push(fix);
        self
    }

    /// Flatten this diagnostic to the legacy `"location: message (code)"`
    /// form used by older consumers.
    pub fn legacy_format(&self) -> String {
        match &self.location {
            Some(location) => format!("{}: {} ({})", location, self.message, self.code),
            None => format!("{} ({})", self.message, self.code),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format: "error[SEMANTIC_MISSING_FIELD]: message"
        write!(f, "{}[{}]: {}", self.severity, self.code, self.message)
    }
}

impl std::error::Error for Diagnostic {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_derived_from_code() {
        let diag = Diagnostic::error(ErrorCode::ContractMismatch, "mismatch");
        assert_eq!(diag.category(), Category::Semantic);

        let diag = Diagnostic::error(ErrorCode::Mismatch, "wrong shape");
        assert_eq!(diag.category(), Category::Type);
    }

    #[test]
    fn test_builder_chain() {
        let diag = Diagnostic::error(ErrorCode::MissingField, "missing 'tool'")
            .with_location(SourceLocation::new(2, 1))
            .with_context("block", "experiment")
            .with_fix(Fix::new("add a 'tool' field"))
            .with_related(ErrorCode::UnknownVocabulary);

        assert_eq!(diag.location().unwrap().line(), 2);
        assert_eq!(diag.context().get("block").map(String::as_str), Some("experiment"));
        assert_eq!(diag.fixes().len(), 1);
        assert_eq!(diag.related(), &[ErrorCode::UnknownVocabulary]);
    }

    #[test]
    fn test_in_place_chaining() {
        let mut diag = Diagnostic::error(ErrorCode::InvalidFieldValue, "bad value");
        diag.add_context("field", "count")
            .add_fix(Fix::new("use a positive integer"));

        assert_eq!(diag.context().len(), 1);
        assert_eq!(diag.fixes().len(), 1);
    }

    #[test]
    fn test_display() {
        let diag = Diagnostic::warning(ErrorCode::UnknownBlock, "unknown block 'experimnt'");
        assert_eq!(
            diag.to_string(),
            "warning[SEMANTIC_UNKNOWN_BLOCK]: unknown block 'experimnt'"
        );
    }

    #[test]
    fn test_legacy_format() {
        let diag = Diagnostic::error(ErrorCode::MissingField, "missing 'tool'")
            .with_location(SourceLocation::new(3, 5));
        assert_eq!(
            diag.legacy_format(),
            "line 3, column 5: missing 'tool' (SEMANTIC_MISSING_FIELD)"
        );

        let diag = Diagnostic::error(ErrorCode::MissingField, "missing 'tool'");
        assert_eq!(diag.legacy_format(), "missing 'tool' (SEMANTIC_MISSING_FIELD)");
    }
}
