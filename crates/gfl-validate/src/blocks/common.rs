//! Shared field checks used by every block validator.
//!
//! All helpers follow the same contract: probe the shape, emit a
//! diagnostic on violation, return `None` so the caller can skip
//! dependent checks and continue with sibling fields.

use indexmap::IndexMap;

use gfl_ast::{Node, Spanned};

use crate::capability::Feature;
use crate::contract::BlockContract;
use crate::diag::{Diagnostic, ErrorCode};
use crate::micro;
use crate::session::Pass;

/// A block body must be a mapping.
pub(crate) fn block_map<'a>(
    node: &'a Spanned<Node>,
    block: &str,
    pass: &mut Pass,
) -> Option<&'a IndexMap<String, Spanned<Node>>> {
    match node.as_map() {
        Some(map) => Some(map),
        None => {
            pass.report.add(
                Diagnostic::error(
                    ErrorCode::Mismatch,
                    format!("block '{}' must be a mapping, found {}", block, node.kind()),
                )
                .with_location(node.location().clone())
                .with_context("block", block),
            );
            None
        }
    }
}

/// A required field must be present.
pub(crate) fn require<'a>(
    map: &'a IndexMap<String, Spanned<Node>>,
    field: &str,
    block: &str,
    node: &Spanned<Node>,
    pass: &mut Pass,
) -> Option<&'a Spanned<Node>> {
    match map.get(field) {
        Some(value) => Some(value),
        None => {
            pass.report.add(
                Diagnostic::error(
                    ErrorCode::MissingField,
                    format!("block '{}' is missing required field '{}'", block, field),
                )
                .with_location(node.location().clone())
                .with_context("block", block)
                .with_context("field", field),
            );
            None
        }
    }
}

fn type_mismatch(node: &Spanned<Node>, field: &str, block: &str, wanted: &str, pass: &mut Pass) {
    pass.report.add(
        Diagnostic::error(
            ErrorCode::Mismatch,
            format!(
                "'{}' in block '{}' must be a {}, found {}",
                field, block, wanted, node.kind()
            ),
        )
        .with_location(node.location().clone())
        .with_context("block", block)
        .with_context("field", field),
    );
}

pub(crate) fn expect_str<'a>(
    node: &'a Spanned<Node>,
    field: &str,
    block: &str,
    pass: &mut Pass,
) -> Option<&'a str> {
    match node.as_str() {
        Some(s) => Some(s),
        None => {
            type_mismatch(node, field, block, "string", pass);
            None
        }
    }
}

pub(crate) fn expect_map<'a>(
    node: &'a Spanned<Node>,
    field: &str,
    block: &str,
    pass: &mut Pass,
) -> Option<&'a IndexMap<String, Spanned<Node>>> {
    match node.as_map() {
        Some(map) => Some(map),
        None => {
            type_mismatch(node, field, block, "mapping", pass);
            None
        }
    }
}

pub(crate) fn expect_list<'a>(
    node: &'a Spanned<Node>,
    field: &str,
    block: &str,
    pass: &mut Pass,
) -> Option<&'a [Spanned<Node>]> {
    match node.as_list() {
        Some(list) => Some(list),
        None => {
            type_mismatch(node, field, block, "list", pass);
            None
        }
    }
}

/// An integer strictly greater than zero.
pub(crate) fn positive_int(
    node: &Spanned<Node>,
    field: &str,
    block: &str,
    pass: &mut Pass,
) -> Option<i64> {
    let Some(value) = node.as_int() else {
        type_mismatch(node, field, block, "integer", pass);
        return None;
    };
    if value <= 0 {
        pass.report.add(
            Diagnostic::error(
                ErrorCode::InvalidFieldValue,
                format!(
                    "'{}' in block '{}' must be a positive integer, found {}",
                    field, block, value
                ),
            )
            .with_location(node.location().clone())
            .with_context("block", block)
            .with_context("field", field),
        );
        return None;
    }
    Some(value)
}

/// A number strictly greater than zero.
pub(crate) fn positive_number(
    node: &Spanned<Node>,
    field: &str,
    block: &str,
    pass: &mut Pass,
) -> Option<f64> {
    let Some(value) = node.as_number() else {
        type_mismatch(node, field, block, "number", pass);
        return None;
    };
    if value <= 0.0 {
        pass.report.add(
            Diagnostic::error(
                ErrorCode::InvalidFieldValue,
                format!(
                    "'{}' in block '{}' must be a positive number, found {}",
                    field, block, value
                ),
            )
            .with_location(node.location().clone())
            .with_context("block", block)
            .with_context("field", field),
        );
        return None;
    }
    Some(value)
}

pub(crate) fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// A field that must hold an identifier-shaped string.
pub(crate) fn expect_identifier<'a>(
    node: &'a Spanned<Node>,
    field: &str,
    block: &str,
    pass: &mut Pass,
) -> Option<&'a str> {
    let value = expect_str(node, field, block, pass)?;
    if !is_identifier(value) {
        pass.report.add(
            Diagnostic::error(
                ErrorCode::InvalidFieldValue,
                format!(
                    "'{}' in block '{}' must be an identifier, found '{}'",
                    field, block, value
                ),
            )
            .with_location(node.location().clone())
            .with_context("block", block)
            .with_context("field", field),
        );
        return None;
    }
    Some(value)
}

/// Whether a string value is exempt from type checks because it is a
/// parameter injection or an entity reference, resolving it as a side
/// effect.
///
/// Malformed `${...}` shapes are reported rather than skipped; they are
/// injection attempts, not ordinary values.
pub(crate) fn resolve_symbolic_value(node: &Spanned<Node>, block: &str, pass: &mut Pass) -> bool {
    let Some(value) = node.as_str() else {
        return false;
    };

    if micro::looks_like_injection(value) {
        pass.require(Feature::ParameterInjection);
        if micro::injection(value).is_none() {
            pass.report.add(
                Diagnostic::error(
                    ErrorCode::InvalidInjection,
                    format!(
                        "'{}' in block '{}' is not a valid parameter injection; expected '${{identifier}}'",
                        value, block
                    ),
                )
                .with_location(node.location().clone())
                .with_context("block", block),
            );
        }
        return true;
    }

    if let Some(reference) = micro::entity_ref(value) {
        pass.require(Feature::EntityReferences);
        let Pass {
            entities, report, ..
        } = pass;
        entities.resolve(&reference, node.location(), report);
        return true;
    }

    false
}

/// Recursively scan a subtree for `${...}` tokens, reporting malformed
/// ones. Used by `optimize.run` where injections may appear at any depth.
pub(crate) fn scan_injections(node: &Spanned<Node>, block: &str, pass: &mut Pass) {
    match node.inner() {
        Node::Str(value) => {
            if micro::looks_like_injection(value) {
                pass.require(Feature::ParameterInjection);
                if micro::injection(value).is_none() {
                    pass.report.add(
                        Diagnostic::error(
                            ErrorCode::InvalidInjection,
                            format!(
                                "'{}' in block '{}' is not a valid parameter injection; expected '${{identifier}}'",
                                value, block
                            ),
                        )
                        .with_location(node.location().clone())
                        .with_context("block", block),
                    );
                }
            }
        }
        Node::List(items) => {
            for item in items {
                scan_injections(item, block, pass);
            }
        }
        Node::Map(entries) => {
            for value in entries.values() {
                scan_injections(value, block, pass);
            }
        }
        _ => {}
    }
}

/// An `objective` mapping must name exactly one of `maximize` and
/// `minimize`. Used by both the design and optimize validators.
pub(crate) fn check_objective(node: &Spanned<Node>, block: &str, pass: &mut Pass) {
    let Some(map) = expect_map(node, "objective", block, pass) else {
        return;
    };
    let maximize = map.contains_key("maximize");
    let minimize = map.contains_key("minimize");
    match (maximize, minimize) {
        (true, true) => {
            pass.report.add(
                Diagnostic::error(
                    ErrorCode::ConflictingObjective,
                    format!(
                        "objective in block '{}' names both 'maximize' and 'minimize'; pick one",
                        block
                    ),
                )
                .with_location(node.location().clone())
                .with_context("block", block),
            );
        }
        (false, false) => {
            pass.report.add(
                Diagnostic::error(
                    ErrorCode::MissingField,
                    format!(
                        "objective in block '{}' must name 'maximize' or 'minimize'",
                        block
                    ),
                )
                .with_location(node.location().clone())
                .with_context("block", block),
            );
        }
        _ => {
            let target = if maximize { "maximize" } else { "minimize" };
            if let Some(value) = map.get(target) {
                expect_str(value, target, block, pass);
            }
        }
    }
}

/// Sub-validation shared by pipeline blocks: the optional `contract`
/// mapping and the optional `validates_hypothesis` id.
pub(crate) fn contract_and_hypothesis(
    map: &IndexMap<String, Spanned<Node>>,
    block: &str,
    pass: &mut Pass,
) {
    if let Some(node) = map.get("contract") {
        pass.require(Feature::IoContracts);
        let contract = BlockContract::parse(node, block, &mut pass.report);
        if !contract.is_empty() {
            let Pass {
                contracts,
                schemas,
                report,
                ..
            } = pass;
            contracts.register(block, contract, schemas, report);
        }
    }

    if let Some(node) = map.get("validates_hypothesis") {
        pass.require(Feature::HypothesisValidation);
        if let Some(id) = expect_str(node, "validates_hypothesis", block, pass) {
            let id = id.to_owned();
            let Pass {
                hypotheses, report, ..
            } = pass;
            hypotheses.resolve(&id, node.location(), report);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("final_guides"));
        assert!(is_identifier("_x9"));
        assert!(!is_identifier("9lives"));
        assert!(!is_identifier("two words"));
        assert!(!is_identifier(""));
    }
}
