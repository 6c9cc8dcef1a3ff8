//! Error codes for the GFL diagnostic system.
//!
//! Codes are organized by category:
//! - `SYNTAX_*` — unusable document structure and internal faults
//! - `SEMANTIC_*` — block rules, references, contracts, capabilities
//! - `TYPE_*` — wrong scalar or collection shapes
//! - `SCHEMA_*` — schema files and custom type resolution
//!
//! Every code knows its [`Category`] and renders as the category-prefixed
//! string, so the invariant "codes are non-empty and category-prefixed"
//! holds by construction.

use std::fmt;

use serde::Serialize;

use crate::diag::Category;

/// Stable identifiers for every kind of finding the validator produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorCode {
    // =========================================================================
    // Syntax (SYNTAX_*)
    // =========================================================================
    /// The document root is not a mapping.
    MalformedRoot,

    /// An unexpected internal fault was caught at the orchestrator
    /// boundary. Always `Critical`; diagnostics collected before the
    /// fault are preserved.
    InternalError,

    // =========================================================================
    // Semantic (SEMANTIC_*)
    // =========================================================================
    /// No recognized top-level block in the document.
    EmptyDocument,

    /// An unrecognized top-level key. Tolerated with a warning.
    UnknownBlock,

    /// A block is missing one of its required fields.
    MissingField,

    /// A field is present but its value violates a block rule.
    InvalidFieldValue,

    /// A tool, type, or strategy outside the known vocabulary.
    /// Vocabularies are soft-checked: always a warning.
    UnknownVocabulary,

    /// A tool/type pair that is recognized individually but implausible
    /// together.
    ImplausibleToolType,

    /// Producer output and consumer input declare incompatible types.
    ContractMismatch,

    /// An entity reference uses a kind outside {pathway, complex}.
    UnknownEntityKind,

    /// An entity reference names a pathway/complex that is not declared.
    UndefinedEntityReference,

    /// `validates_hypothesis` names an undeclared hypothesis id.
    UndefinedHypothesis,

    /// The document uses a feature the target engine does not support.
    /// Always a warning.
    UnsupportedFeature,

    /// A used feature depends on another feature the engine lacks.
    MissingFeatureDependency,

    /// An objective declares both `maximize` and `minimize`, or neither.
    ConflictingObjective,

    /// A `range(min, max)` expression with `min >= max` or unparsable
    /// bounds.
    InvalidRange,

    /// A `choice([...])` expression with no alternatives.
    EmptyChoice,

    /// A `${...}` parameter injection with invalid identifier syntax.
    InvalidInjection,

    /// A metadata block carrying fewer than two descriptive fields.
    SparseMetadata,

    /// A design candidate count large enough to be worth flagging.
    LargeCandidateCount,

    // =========================================================================
    // Type (TYPE_*)
    // =========================================================================
    /// A field has the wrong scalar or collection shape.
    Mismatch,

    // =========================================================================
    // Schema (SCHEMA_*)
    // =========================================================================
    /// A schema file could not be read.
    IoError,

    /// A schema file could not be parsed as YAML, or its root shape is
    /// wrong.
    ParseError,

    /// A single schema entry is malformed and was skipped.
    MalformedEntry,

    /// A custom contract type does not resolve to any loaded schema.
    UnresolvedType,

    /// A custom type chain does not terminate at a built-in base type.
    CircularDefinition,

    /// A contract entry lacks an attribute its schema marks required.
    RequiredAttributeMissing,

    /// A contract attribute does not equal the literal value its schema
    /// expects.
    AttributeValueMismatch,
}

impl ErrorCode {
    /// The category this code belongs to.
    pub fn category(&self) -> Category {
        use ErrorCode::*;
        match self {
            MalformedRoot | InternalError => Category::Syntax,
            EmptyDocument | UnknownBlock | MissingField | InvalidFieldValue
            | UnknownVocabulary | ImplausibleToolType | ContractMismatch | UnknownEntityKind
            | UndefinedEntityReference | UndefinedHypothesis | UnsupportedFeature
            | MissingFeatureDependency | ConflictingObjective | InvalidRange | EmptyChoice
            | InvalidInjection | SparseMetadata | LargeCandidateCount => Category::Semantic,
            Mismatch => Category::Type,
            IoError | ParseError | MalformedEntry | UnresolvedType | CircularDefinition
            | RequiredAttributeMissing | AttributeValueMismatch => Category::Schema,
        }
    }

    /// The full category-prefixed code string (e.g.
    /// `"SEMANTIC_CONTRACT_MISMATCH"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            // Syntax
            ErrorCode::MalformedRoot => "SYNTAX_MALFORMED_ROOT",
            ErrorCode::InternalError => "SYNTAX_INTERNAL_ERROR",
            // Semantic
            ErrorCode::EmptyDocument => "SEMANTIC_EMPTY_DOCUMENT",
            ErrorCode::UnknownBlock => "SEMANTIC_UNKNOWN_BLOCK",
            ErrorCode::MissingField => "SEMANTIC_MISSING_FIELD",
            ErrorCode::InvalidFieldValue => "SEMANTIC_INVALID_FIELD_VALUE",
            ErrorCode::UnknownVocabulary => "SEMANTIC_UNKNOWN_VOCABULARY",
            ErrorCode::ImplausibleToolType => "SEMANTIC_IMPLAUSIBLE_TOOL_TYPE",
            ErrorCode::ContractMismatch => "SEMANTIC_CONTRACT_MISMATCH",
            ErrorCode::UnknownEntityKind => "SEMANTIC_UNKNOWN_ENTITY_KIND",
            ErrorCode::UndefinedEntityReference => "SEMANTIC_UNDEFINED_ENTITY_REFERENCE",
            ErrorCode::UndefinedHypothesis => "SEMANTIC_UNDEFINED_HYPOTHESIS",
            ErrorCode::UnsupportedFeature => "SEMANTIC_UNSUPPORTED_FEATURE",
            ErrorCode::MissingFeatureDependency => "SEMANTIC_MISSING_FEATURE_DEPENDENCY",
            ErrorCode::ConflictingObjective => "SEMANTIC_CONFLICTING_OBJECTIVE",
            ErrorCode::InvalidRange => "SEMANTIC_INVALID_RANGE",
            ErrorCode::EmptyChoice => "SEMANTIC_EMPTY_CHOICE",
            ErrorCode::InvalidInjection => "SEMANTIC_INVALID_INJECTION",
            ErrorCode::SparseMetadata => "SEMANTIC_SPARSE_METADATA",
            ErrorCode::LargeCandidateCount => "SEMANTIC_LARGE_CANDIDATE_COUNT",
            // Type
            ErrorCode::Mismatch => "TYPE_MISMATCH",
            // Schema
            ErrorCode::IoError => "SCHEMA_IO_ERROR",
            ErrorCode::ParseError => "SCHEMA_PARSE_ERROR",
            ErrorCode::MalformedEntry => "SCHEMA_MALFORMED_ENTRY",
            ErrorCode::UnresolvedType => "SCHEMA_UNRESOLVED_TYPE",
            ErrorCode::CircularDefinition => "SCHEMA_CIRCULAR_DEFINITION",
            ErrorCode::RequiredAttributeMissing => "SCHEMA_REQUIRED_ATTRIBUTE_MISSING",
            ErrorCode::AttributeValueMismatch => "SCHEMA_ATTRIBUTE_VALUE_MISMATCH",
        }
    }

    /// A short description of what this code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::MalformedRoot => "document root is not a mapping",
            ErrorCode::InternalError => "unexpected internal fault",
            ErrorCode::EmptyDocument => "no recognized top-level block",
            ErrorCode::UnknownBlock => "unrecognized top-level block",
            ErrorCode::MissingField => "required field missing",
            ErrorCode::InvalidFieldValue => "field value violates a block rule",
            ErrorCode::UnknownVocabulary => "value outside the known vocabulary",
            ErrorCode::ImplausibleToolType => "implausible tool/type combination",
            ErrorCode::ContractMismatch => "incompatible IO contract types",
            ErrorCode::UnknownEntityKind => "unknown entity reference kind",
            ErrorCode::UndefinedEntityReference => "entity reference has no declaration",
            ErrorCode::UndefinedHypothesis => "hypothesis id has no declaration",
            ErrorCode::UnsupportedFeature => "feature unsupported by target engine",
            ErrorCode::MissingFeatureDependency => "feature dependency unsupported by engine",
            ErrorCode::ConflictingObjective => "objective must pick exactly one direction",
            ErrorCode::InvalidRange => "invalid range expression",
            ErrorCode::EmptyChoice => "choice expression has no alternatives",
            ErrorCode::InvalidInjection => "invalid parameter injection token",
            ErrorCode::SparseMetadata => "metadata block is sparse",
            ErrorCode::LargeCandidateCount => "unusually large candidate count",
            ErrorCode::Mismatch => "wrong value shape",
            ErrorCode::IoError => "schema file could not be read",
            ErrorCode::ParseError => "schema file could not be parsed",
            ErrorCode::MalformedEntry => "malformed schema entry skipped",
            ErrorCode::UnresolvedType => "custom type has no loaded schema",
            ErrorCode::CircularDefinition => "custom type chain does not terminate",
            ErrorCode::RequiredAttributeMissing => "required schema attribute missing",
            ErrorCode::AttributeValueMismatch => "schema attribute value mismatch",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: &[ErrorCode] = &[
        ErrorCode::MalformedRoot,
        ErrorCode::InternalError,
        ErrorCode::EmptyDocument,
        ErrorCode::UnknownBlock,
        ErrorCode::MissingField,
        ErrorCode::InvalidFieldValue,
        ErrorCode::UnknownVocabulary,
        ErrorCode::ImplausibleToolType,
        ErrorCode::ContractMismatch,
        ErrorCode::UnknownEntityKind,
        ErrorCode::UndefinedEntityReference,
        ErrorCode::UndefinedHypothesis,
        ErrorCode::UnsupportedFeature,
        ErrorCode::MissingFeatureDependency,
        ErrorCode::ConflictingObjective,
        ErrorCode::InvalidRange,
        ErrorCode::EmptyChoice,
        ErrorCode::InvalidInjection,
        ErrorCode::SparseMetadata,
        ErrorCode::LargeCandidateCount,
        ErrorCode::Mismatch,
        ErrorCode::IoError,
        ErrorCode::ParseError,
        ErrorCode::MalformedEntry,
        ErrorCode::UnresolvedType,
        ErrorCode::CircularDefinition,
        ErrorCode::RequiredAttributeMissing,
        ErrorCode::AttributeValueMismatch,
    ];

    #[test]
    fn test_codes_are_category_prefixed() {
        for code in ALL {
            let prefix = code.category().prefix();
            assert!(
                code.as_str().starts_with(prefix),
                "{} does not start with {}",
                code.as_str(),
                prefix
            );
            assert!(!code.as_str().is_empty());
        }
    }

    #[test]
    fn test_code_strings_are_unique() {
        for (i, a) in ALL.iter().enumerate() {
            for b in &ALL[i + 1..] {
                assert_ne!(a.as_str(), b.as_str());
            }
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(
            ErrorCode::ContractMismatch.to_string(),
            "SEMANTIC_CONTRACT_MISMATCH"
        );
        assert_eq!(ErrorCode::Mismatch.to_string(), "TYPE_MISMATCH");
    }
}
