//! Validator for the `design` block.
//!
//! Design blocks ask a model to propose candidate sequences. The same
//! field rules apply to the `design_params` section of a
//! `guided_discovery` block, which omits `count` and `output`.

use indexmap::IndexMap;

use gfl_ast::{Node, Spanned};

use crate::capability::Feature;
use crate::diag::{Diagnostic, ErrorCode};
use crate::session::Pass;

use super::common;

/// Candidate counts above this draw a Hint; large batches are legal but
/// usually a typo for a smaller number.
const CANDIDATE_COUNT_HINT: i64 = 1000;

pub(crate) fn validate_design(node: &Spanned<Node>, pass: &mut Pass) {
    const BLOCK: &str = "design";
    let Some(map) = common::block_map(node, BLOCK, pass) else {
        return;
    };
    validate_design_fields(map, node, BLOCK, true, pass);
    common::contract_and_hypothesis(map, BLOCK, pass);
}

/// The design field rules, parameterized over whether `count`/`output`
/// are required (they are not inside `guided_discovery.design_params`).
pub(crate) fn validate_design_fields(
    map: &IndexMap<String, Spanned<Node>>,
    node: &Spanned<Node>,
    block: &str,
    full: bool,
    pass: &mut Pass,
) {
    if let Some(entity) = common::require(map, "entity", block, node, pass)
        && !common::resolve_symbolic_value(entity, block, pass)
    {
        common::expect_str(entity, "entity", block, pass);
    }

    if let Some(model) = common::require(map, "model", block, node, pass) {
        common::expect_str(model, "model", block, pass);
    }

    if let Some(objective) = common::require(map, "objective", block, node, pass) {
        common::check_objective(objective, block, pass);
    }

    if full {
        if let Some(count) = common::require(map, "count", block, node, pass)
            && let Some(count) = common::positive_int(count, "count", block, pass)
            && count > CANDIDATE_COUNT_HINT
        {
            pass.report.add(
                Diagnostic::hint(
                    ErrorCode::LargeCandidateCount,
                    format!(
                        "block '{}' requests {} candidates; batches above {} are unusual",
                        block, count, CANDIDATE_COUNT_HINT
                    ),
                )
                .with_context("block", block)
                .with_context("count", count.to_string()),
            );
        }

        if let Some(output) = common::require(map, "output", block, node, pass) {
            common::expect_identifier(output, "output", block, pass);
        }
    }

    if let Some(constraints) = map.get("constraints")
        && let Some(items) = common::expect_list(constraints, "constraints", block, pass)
    {
        for (index, item) in items.iter().enumerate() {
            if item.as_str().is_none() {
                pass.report.add(
                    Diagnostic::error(
                        ErrorCode::Mismatch,
                        format!(
                            "constraint {} in block '{}' must be a string, found {}",
                            index,
                            block,
                            item.kind()
                        ),
                    )
                    .with_location(item.location().clone())
                    .with_context("block", block)
                    .with_context("field", "constraints"),
                );
            }
        }
    }

    if map.get("design_type").and_then(|n| n.as_str()) == Some("inverse_design") {
        pass.require(Feature::InverseDesign);
        validate_inverse_design(map, node, block, pass);
    }
}

/// `design_type: inverse_design` requires the target description and the
/// foundation model that will invert it.
fn validate_inverse_design(
    map: &IndexMap<String, Spanned<Node>>,
    node: &Spanned<Node>,
    block: &str,
    pass: &mut Pass,
) {
    match map.get("target_properties") {
        Some(target) => {
            common::expect_map(target, "target_properties", block, pass);
        }
        None => {
            pass.report.add(
                Diagnostic::error(
                    ErrorCode::MissingField,
                    format!(
                        "inverse design in block '{}' requires a 'target_properties' mapping",
                        block
                    ),
                )
                .with_location(node.location().clone())
                .with_context("block", block)
                .with_context("field", "target_properties"),
            );
        }
    }

    match map.get("foundation_model") {
        Some(model) => {
            common::expect_str(model, "foundation_model", block, pass);
        }
        None => {
            pass.report.add(
                Diagnostic::error(
                    ErrorCode::MissingField,
                    format!(
                        "inverse design in block '{}' requires a 'foundation_model' string",
                        block
                    ),
                )
                .with_location(node.location().clone())
                .with_context("block", block)
                .with_context("field", "foundation_model"),
            );
        }
    }
}
