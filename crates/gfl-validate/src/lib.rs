//! Semantic validation and capability negotiation for GFL documents.
//!
//! GFL is a declarative DSL for genomic workflows: blocks like
//! `experiment`, `analyze`, `design`, and `optimize` describe pipeline
//! steps. This crate checks a parsed document against the block rules,
//! resolves entity and hypothesis references, compares declared IO
//! contracts between blocks, and reports which features the target
//! engine does not support. All findings accumulate in a
//! [`ValidationReport`]; the validator never fails on data problems.
//!
//! ```
//! use gfl_ast::from_yaml_str;
//! use gfl_validate::{EngineCapabilitySet, Validator};
//!
//! let ast = from_yaml_str("experiment:\n  tool: CRISPR_cas9\n  type: gene_editing\n").unwrap();
//! let report = Validator::new(EngineCapabilitySet::standard()).validate_ast(&ast);
//! assert!(report.is_valid());
//! ```

mod blocks;
mod capability;
mod contract;
pub mod diag;
mod micro;
mod registry;
mod schema;
mod session;

pub use blocks::BlockKind;
pub use capability::{CapabilityInfo, EngineCapabilitySet, Feature};
pub use contract::{BlockContract, ContractEntry, types_compatible};
pub use diag::{Category, Diagnostic, ErrorCode, Fix, Severity, Statistics, ValidationReport};
pub use micro::{Choice, EntityRef, Injection, Range};
pub use registry::{EntityRegistry, HypothesisRegistry};
pub use schema::{
    AttributeSpec, BUILTIN_BASE_TYPES, SchemaDefinition, SchemaRegistry, is_builtin_base_type,
};
pub use session::Validator;
