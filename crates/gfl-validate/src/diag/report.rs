//! The aggregate validation report.
//!
//! A [`ValidationReport`] accumulates diagnostics over one validation
//! pass and exposes derived views afterwards: severity and category
//! filters, per-severity statistics, the overall validity verdict, and a
//! legacy flat-string rendering.

use serde::Serialize;

use crate::diag::{Category, Diagnostic, ErrorCode, Severity};

/// Counts of diagnostics per severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Statistics {
    pub critical: usize,
    pub errors: usize,
    pub warnings: usize,
    pub info: usize,
    pub hints: usize,
    pub total: usize,
}

/// An ordered collection of diagnostics from one validation pass.
///
/// The report is created per pass, appended to during that pass, and
/// read-only afterwards. It is not synchronized; callers wanting
/// parallel validation run one validator instance per worker.
#[derive(Debug, Default)]
pub struct ValidationReport {
    diagnostics: Vec<Diagnostic>,
}

impl ValidationReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a diagnostic.
    ///
    /// Returns a mutable reference to the stored diagnostic so callers
    /// can chain `add_context`/`add_fix`.
    pub fn add(&mut self, diagnostic: Diagnostic) -> &mut Diagnostic {
        log::debug!(code = diagnostic.code().as_str(), severity = diagnostic.severity().to_string().as_str(); "diagnostic emitted");
        self.diagnostics.push(diagnostic);
        self.diagnostics
            .last_mut()
            .expect("diagnostic was just pushed")
    }

    /// Append an error-severity diagnostic.
    pub fn add_error(
        &mut self,
        message: impl Into<String>,
        code: ErrorCode,
    ) -> &mut Diagnostic {
        self.add(Diagnostic::error(code, message))
    }

    /// All diagnostics, in emission order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Diagnostics with `Critical` or `Error` severity.
    pub fn errors(&self) -> Vec<&Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity().is_error())
            .collect()
    }

    /// Diagnostics with `Warning` severity.
    pub fn warnings(&self) -> Vec<&Diagnostic> {
        self.by_severity(Severity::Warning)
    }

    /// Diagnostics with the given severity.
    pub fn by_severity(&self, severity: Severity) -> Vec<&Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity() == severity)
            .collect()
    }

    /// Diagnostics with the given category.
    pub fn by_category(&self, category: Category) -> Vec<&Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.category() == category)
            .collect()
    }

    /// Per-severity counts.
    pub fn statistics(&self) -> Statistics {
        let mut stats = Statistics::default();
        for diagnostic in &self.diagnostics {
            match diagnostic.severity() {
                Severity::Critical => stats.critical += 1,
                Severity::Error => stats.errors += 1,
                Severity::Warning => stats.warnings += 1,
                Severity::Info => stats.info += 1,
                Severity::Hint => stats.hints += 1,
            }
            stats.total += 1;
        }
        stats
    }

    /// Whether the document may proceed to execution.
    ///
    /// A document is valid when the report holds no `Critical` finding
    /// and no `Semantic` finding at `Error` severity. Warnings, info,
    /// and hints never affect validity.
    pub fn is_valid(&self) -> bool {
        !self.diagnostics.iter().any(|d| {
            d.severity() == Severity::Critical
                || (d.severity() == Severity::Error && d.category() == Category::Semantic)
        })
    }

    /// Flatten `Critical` and `Error` diagnostics to the legacy
    /// `"location: message (code)"` strings for older consumers.
    pub fn to_legacy_format(&self) -> Vec<String> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity().is_error())
            .map(Diagnostic::legacy_format)
            .collect()
    }

    /// Number of diagnostics.
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Whether the report is empty.
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }
}
