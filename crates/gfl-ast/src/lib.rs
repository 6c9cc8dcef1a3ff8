//! # GFL AST
//!
//! Typed AST and source location types for the GFL genomic-workflow
//! language. The upstream parser produces a [`Node`] tree; the
//! validation engine in `gfl-validate` consumes it.
//!
//! This crate is deliberately small: it owns only the data types shared
//! between the parser and the validator, mirroring the split between
//! syntax production and semantic analysis.

mod location;
mod node;
mod yaml;

pub use location::{SourceLocation, Spanned};
pub use node::{Node, NodeKind};
pub use yaml::{AstError, from_yaml_str, from_yaml_value};
