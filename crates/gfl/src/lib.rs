//! GFL - semantic validation for a declarative genomic workflow language.
//!
//! GFL documents describe wet-lab and in-silico pipelines through blocks
//! like `experiment`, `analyze`, `design`, and `optimize`. This crate is
//! the public entry point: it parses a document into the typed AST,
//! validates it against the block rules, and negotiates the document's
//! feature requirements against a target engine's capability set.
//!
//! # Examples
//!
//! ```rust
//! use gfl::{EngineCapabilitySet, validate_source};
//!
//! let source = "
//! experiment:
//!   tool: CRISPR_cas9
//!   type: gene_editing
//!   params:
//!     replicates: 3
//! ";
//!
//! let report = validate_source(source, &EngineCapabilitySet::standard()).unwrap();
//! assert!(report.is_valid());
//! ```

mod error;

pub use error::GflError;

pub use gfl_ast::{Node, NodeKind, SourceLocation, Spanned, from_yaml_str};
pub use gfl_validate::{
    BlockKind, Category, Diagnostic, EngineCapabilitySet, ErrorCode, Feature, Severity,
    Statistics, ValidationReport, Validator,
};

use std::fs;
use std::path::Path;

use log::debug;

/// Validate an already-parsed document against a capability set.
pub fn validate(ast: &Spanned<Node>, capabilities: &EngineCapabilitySet) -> ValidationReport {
    Validator::new(capabilities.clone()).validate_ast(ast)
}

/// Validate an already-parsed document against the standard capability
/// set.
pub fn validate_with_defaults(ast: &Spanned<Node>) -> ValidationReport {
    Validator::with_defaults().validate_ast(ast)
}

/// Parse source text and validate it against a capability set.
///
/// Schema import paths resolve relative to the process working
/// directory; use [`validate_file`] when the document lives on disk.
pub fn validate_source(
    source: &str,
    capabilities: &EngineCapabilitySet,
) -> Result<ValidationReport, GflError> {
    let ast = from_yaml_str(source)?;
    Ok(validate(&ast, capabilities))
}

/// Read, parse, and validate a document from disk.
///
/// Schema import paths resolve relative to the document's directory.
pub fn validate_file(
    path: &Path,
    capabilities: &EngineCapabilitySet,
) -> Result<ValidationReport, GflError> {
    debug!(path = path.display().to_string().as_str(); "validating file");
    let source = fs::read_to_string(path).map_err(|source| GflError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let ast = from_yaml_str(&source)?;
    Ok(Validator::new(capabilities.clone()).validate_ast_from(&ast, path))
}
