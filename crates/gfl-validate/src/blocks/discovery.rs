//! Validators for the `refine_data` and `guided_discovery` blocks.

use gfl_ast::{Node, Spanned};

use crate::diag::{Diagnostic, ErrorCode};
use crate::session::Pass;

use super::common;
use super::design;
use super::optimize;

pub(crate) fn validate_refine_data(node: &Spanned<Node>, pass: &mut Pass) {
    const BLOCK: &str = "refine_data";
    let Some(map) = common::block_map(node, BLOCK, pass) else {
        return;
    };

    let Some(config_node) = common::require(map, "refinement_config", BLOCK, node, pass) else {
        return;
    };
    let Some(config) = common::expect_map(config_node, "refinement_config", BLOCK, pass) else {
        return;
    };

    if let Some(kind) = common::require(config, "refinement_type", BLOCK, config_node, pass) {
        common::expect_str(kind, "refinement_type", BLOCK, pass);
    }
    if let Some(noise) = config.get("noise_level")
        && noise.as_number().is_none()
    {
        pass.report.add(
            Diagnostic::error(
                ErrorCode::Mismatch,
                format!(
                    "'noise_level' in block '{}' must be a number, found {}",
                    BLOCK,
                    noise.kind()
                ),
            )
            .with_location(noise.location().clone())
            .with_context("block", BLOCK)
            .with_context("field", "noise_level"),
        );
    }
    if let Some(resolution) = config.get("target_resolution") {
        common::expect_str(resolution, "target_resolution", BLOCK, pass);
    }
}

pub(crate) fn validate_guided_discovery(node: &Spanned<Node>, pass: &mut Pass) {
    const BLOCK: &str = "guided_discovery";
    let Some(map) = common::block_map(node, BLOCK, pass) else {
        return;
    };

    if let Some(params_node) = common::require(map, "design_params", BLOCK, node, pass)
        && let Some(params) = common::expect_map(params_node, "design_params", BLOCK, pass)
    {
        // Design rules minus count/output, which the cycle controls.
        design::validate_design_fields(params, params_node, BLOCK, false, pass);
        if let Some(per_cycle) = common::require(params, "candidates_per_cycle", BLOCK, params_node, pass)
        {
            common::positive_int(per_cycle, "candidates_per_cycle", BLOCK, pass);
        }
    }

    if let Some(params_node) = common::require(map, "active_learning_params", BLOCK, node, pass)
        && let Some(params) = common::expect_map(params_node, "active_learning_params", BLOCK, pass)
    {
        // The optimize rules apply here, minus search_space/run, which
        // the cycle supplies.
        if let Some(strategy) = common::require(params, "strategy", BLOCK, params_node, pass) {
            optimize::validate_strategy(strategy, params, params_node, BLOCK, pass);
        }
        if let Some(objective) = params.get("objective") {
            common::check_objective(objective, BLOCK, pass);
        }
        if let Some(budget) = params.get("budget") {
            optimize::validate_budget(budget, BLOCK, pass);
        }
        if let Some(per_cycle) =
            common::require(params, "experiments_per_cycle", BLOCK, params_node, pass)
        {
            common::positive_int(per_cycle, "experiments_per_cycle", BLOCK, pass);
        }
    }

    if let Some(budget_node) = common::require(map, "budget", BLOCK, node, pass) {
        validate_cycle_budget(budget_node, BLOCK, pass);
    }

    if let Some(output) = common::require(map, "output", BLOCK, node, pass) {
        common::expect_identifier(output, "output", BLOCK, pass);
    }

    common::contract_and_hypothesis(map, BLOCK, pass);
}

/// A discovery budget needs at least one stopping criterion.
fn validate_cycle_budget(node: &Spanned<Node>, block: &str, pass: &mut Pass) {
    const CRITERIA: &[&str] = &["max_cycles", "convergence_threshold", "target_objective_value"];

    let Some(budget) = common::expect_map(node, "budget", block, pass) else {
        return;
    };

    if !CRITERIA.iter().any(|key| budget.contains_key(*key)) {
        pass.report.add(
            Diagnostic::error(
                ErrorCode::MissingField,
                format!(
                    "budget in block '{}' needs at least one of 'max_cycles', 'convergence_threshold', 'target_objective_value'",
                    block
                ),
            )
            .with_location(node.location().clone())
            .with_context("block", block)
            .with_context("field", "budget"),
        );
        return;
    }

    if let Some(cycles) = budget.get("max_cycles") {
        common::positive_int(cycles, "max_cycles", block, pass);
    }
    if let Some(threshold) = budget.get("convergence_threshold") {
        common::positive_number(threshold, "convergence_threshold", block, pass);
    }
    if let Some(target) = budget.get("target_objective_value")
        && target.as_number().is_none()
    {
        pass.report.add(
            Diagnostic::error(
                ErrorCode::Mismatch,
                format!(
                    "'target_objective_value' in block '{}' must be a number, found {}",
                    block,
                    target.kind()
                ),
            )
            .with_location(target.location().clone())
            .with_context("block", block)
            .with_context("field", "target_objective_value"),
        );
    }
}
