//! Diagnostics model for GFL validation.
//!
//! This module provides the finding types produced by every validation
//! phase:
//! - Stable, category-prefixed error codes
//! - Five severity levels from `Critical` down to `Hint`
//! - Rich per-finding context and suggested fixes
//! - An aggregate [`ValidationReport`] with filtered views and statistics
//!
//! # Overview
//!
//! Validators never fail on data problems; every expected failure becomes
//! a [`Diagnostic`] appended to the pass's [`ValidationReport`]. The
//! report is created per validation pass, mutated only during that pass,
//! and read-only afterwards.
//!
//! # Example
//!
//! ```
//! # use gfl_validate::diag::{Diagnostic, ErrorCode, ValidationReport};
//!
//! let mut report = ValidationReport::new();
//! report
//!     .add_error("design block is missing required field 'model'", ErrorCode::MissingField)
//!     .add_context("block", "design");
//!
//! assert!(!report.is_valid());
//! assert_eq!(report.errors().len(), 1);
//! ```

mod category;
mod diagnostic;
mod error_code;
mod fix;
mod report;
mod severity;

pub use category::Category;
pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use fix::Fix;
pub use report::{Statistics, ValidationReport};
pub use severity::Severity;
