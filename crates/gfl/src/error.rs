//! Top-level error type for the facade entry points.
//!
//! Validation itself never fails — findings land in the report. These
//! errors cover the steps before validation: reading a source file and
//! turning it into an AST.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from the `gfl` entry points.
#[derive(Error, Debug)]
pub enum GflError {
    /// The source file could not be read.
    #[error("cannot read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The source text is not a well-formed document.
    #[error(transparent)]
    Ast(#[from] gfl_ast::AstError),
}
