//! Validator for the `optimize` block.
//!
//! Optimize blocks sweep a search space under a budget, running a
//! nested experiment or analysis per iteration.

use indexmap::IndexMap;

use gfl_ast::{Node, Spanned};

use crate::capability::Feature;
use crate::diag::{Diagnostic, ErrorCode};
use crate::micro;
use crate::session::Pass;

use super::common;
use super::experiment;

pub(crate) fn validate_optimize(node: &Spanned<Node>, pass: &mut Pass) {
    const BLOCK: &str = "optimize";
    let Some(map) = common::block_map(node, BLOCK, pass) else {
        return;
    };

    if let Some(space) = common::require(map, "search_space", BLOCK, node, pass)
        && let Some(entries) = common::expect_map(space, "search_space", BLOCK, pass)
    {
        for (name, value) in entries {
            validate_search_dimension(name, value, BLOCK, pass);
        }
    }

    if let Some(strategy) = common::require(map, "strategy", BLOCK, node, pass) {
        validate_strategy(strategy, map, node, BLOCK, pass);
    }

    if let Some(objective) = common::require(map, "objective", BLOCK, node, pass) {
        common::check_objective(objective, BLOCK, pass);
    }

    if let Some(budget) = common::require(map, "budget", BLOCK, node, pass) {
        validate_budget(budget, BLOCK, pass);
    }

    if let Some(run) = common::require(map, "run", BLOCK, node, pass) {
        validate_run(run, BLOCK, pass);
    }

    common::contract_and_hypothesis(map, BLOCK, pass);
}

/// One search-space dimension: `range(min, max)` with `min < max`, or a
/// non-empty `choice([...])`. Injections are symbolic and pass through.
fn validate_search_dimension(name: &str, value: &Spanned<Node>, block: &str, pass: &mut Pass) {
    let Some(text) = value.as_str() else {
        pass.report.add(
            Diagnostic::error(
                ErrorCode::Mismatch,
                format!(
                    "search dimension '{}' in block '{}' must be a string expression, found {}",
                    name,
                    block,
                    value.kind()
                ),
            )
            .with_location(value.location().clone())
            .with_context("block", block)
            .with_context("field", name),
        );
        return;
    };

    if common::resolve_symbolic_value(value, block, pass) {
        return;
    }

    if let Some(range) = micro::range(text) {
        if range.min >= range.max {
            pass.report.add(
                Diagnostic::error(
                    ErrorCode::InvalidRange,
                    format!(
                        "search dimension '{}' in block '{}' has an empty range: min {} must be below max {}",
                        name, block, range.min, range.max
                    ),
                )
                .with_location(value.location().clone())
                .with_context("block", block)
                .with_context("field", name),
            );
        }
        return;
    }

    if let Some(choice) = micro::choice(text) {
        if choice.values.is_empty() {
            pass.report.add(
                Diagnostic::error(
                    ErrorCode::EmptyChoice,
                    format!(
                        "search dimension '{}' in block '{}' offers no choices",
                        name, block
                    ),
                )
                .with_location(value.location().clone())
                .with_context("block", block)
                .with_context("field", name),
            );
        }
        return;
    }

    pass.report.add(
        Diagnostic::error(
            ErrorCode::InvalidFieldValue,
            format!(
                "search dimension '{}' in block '{}' must be 'range(min, max)' or 'choice([...])', found '{}'",
                name, block, text
            ),
        )
        .with_location(value.location().clone())
        .with_context("block", block)
        .with_context("field", name),
    );
}

/// The `strategy` mapping requires a `name`; `ActiveLearning` requires
/// its configuration mapping and a sibling `surrogate_model`.
pub(crate) fn validate_strategy(
    node: &Spanned<Node>,
    parent: &IndexMap<String, Spanned<Node>>,
    parent_node: &Spanned<Node>,
    block: &str,
    pass: &mut Pass,
) {
    let Some(strategy) = common::expect_map(node, "strategy", block, pass) else {
        return;
    };
    let Some(name) = common::require(strategy, "name", block, node, pass)
        .and_then(|n| common::expect_str(n, "strategy.name", block, pass))
    else {
        return;
    };

    if name != "ActiveLearning" {
        return;
    }
    pass.require(Feature::ActiveLearning);

    match strategy.get("active_learning") {
        Some(config) => validate_active_learning(config, block, pass),
        None => {
            pass.report.add(
                Diagnostic::error(
                    ErrorCode::MissingField,
                    format!(
                        "ActiveLearning strategy in block '{}' requires an 'active_learning' mapping",
                        block
                    ),
                )
                .with_location(node.location().clone())
                .with_context("block", block)
                .with_context("field", "active_learning"),
            );
        }
    }

    match parent.get("surrogate_model") {
        Some(model) => {
            common::expect_str(model, "surrogate_model", block, pass);
        }
        None => {
            pass.report.add(
                Diagnostic::error(
                    ErrorCode::MissingField,
                    format!(
                        "ActiveLearning strategy in block '{}' requires a sibling 'surrogate_model'",
                        block
                    ),
                )
                .with_location(parent_node.location().clone())
                .with_context("block", block)
                .with_context("field", "surrogate_model"),
            );
        }
    }
}

fn validate_active_learning(node: &Spanned<Node>, block: &str, pass: &mut Pass) {
    let Some(config) = common::expect_map(node, "active_learning", block, pass) else {
        return;
    };

    if let Some(f) = common::require(config, "acquisition_function", block, node, pass) {
        common::expect_str(f, "acquisition_function", block, pass);
    }
    if let Some(f) = common::require(config, "initial_experiments", block, node, pass) {
        common::positive_int(f, "initial_experiments", block, pass);
    }
    if let Some(f) = common::require(config, "max_uncertainty", block, node, pass)
        && f.as_number().is_none()
    {
        pass.report.add(
            Diagnostic::error(
                ErrorCode::Mismatch,
                format!(
                    "'max_uncertainty' in block '{}' must be a number, found {}",
                    block,
                    f.kind()
                ),
            )
            .with_location(f.location().clone())
            .with_context("block", block)
            .with_context("field", "max_uncertainty"),
        );
    }
    if let Some(f) = common::require(config, "convergence_threshold", block, node, pass) {
        common::positive_number(f, "convergence_threshold", block, pass);
    }
}

/// Whether a string is a duration like `72h` (digits then s/m/h/d).
fn is_duration(text: &str) -> bool {
    let Some(digits) = text.strip_suffix(['s', 'm', 'h', 'd']) else {
        return false;
    };
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Recognized budget keys with per-key typing; unknown keys warn.
pub(crate) fn validate_budget(node: &Spanned<Node>, block: &str, pass: &mut Pass) {
    let Some(budget) = common::expect_map(node, "budget", block, pass) else {
        return;
    };
    if budget.is_empty() {
        pass.report.add(
            Diagnostic::error(
                ErrorCode::InvalidFieldValue,
                format!("budget in block '{}' must not be empty", block),
            )
            .with_location(node.location().clone())
            .with_context("block", block)
            .with_context("field", "budget"),
        );
        return;
    }

    for (key, value) in budget {
        match key.as_str() {
            "max_experiments" => {
                common::positive_int(value, "max_experiments", block, pass);
            }
            "max_cost" | "convergence_threshold" => {
                common::positive_number(value, key, block, pass);
            }
            "max_time" => {
                let ok = value.as_str().is_some_and(is_duration);
                if !ok {
                    pass.report.add(
                        Diagnostic::error(
                            ErrorCode::InvalidFieldValue,
                            format!(
                                "'max_time' in block '{}' must be a duration like '72h' (digits plus s/m/h/d)",
                                block
                            ),
                        )
                        .with_location(value.location().clone())
                        .with_context("block", block)
                        .with_context("field", "max_time"),
                    );
                }
            }
            other => {
                pass.report.add(
                    Diagnostic::warning(
                        ErrorCode::UnknownVocabulary,
                        format!("unknown budget key '{}' in block '{}'", other, block),
                    )
                    .with_location(value.location().clone())
                    .with_context("block", block)
                    .with_context("field", other),
                );
            }
        }
    }
}

/// The `run` mapping nests exactly one of `experiment`/`analyze`, which
/// is validated with the ordinary block rules. Any string anywhere in
/// the subtree may carry a `${...}` token.
fn validate_run(node: &Spanned<Node>, block: &str, pass: &mut Pass) {
    let Some(run) = common::expect_map(node, "run", block, pass) else {
        return;
    };

    match (run.get("experiment"), run.get("analyze")) {
        (Some(nested), None) => experiment::validate_experiment(nested, pass),
        (None, Some(nested)) => experiment::validate_analyze(nested, pass),
        (Some(_), Some(_)) => {
            pass.report.add(
                Diagnostic::error(
                    ErrorCode::InvalidFieldValue,
                    format!(
                        "run in block '{}' must nest exactly one of 'experiment' and 'analyze', found both",
                        block
                    ),
                )
                .with_location(node.location().clone())
                .with_context("block", block)
                .with_context("field", "run"),
            );
        }
        (None, None) => {
            pass.report.add(
                Diagnostic::error(
                    ErrorCode::MissingField,
                    format!(
                        "run in block '{}' must nest one of 'experiment' and 'analyze'",
                        block
                    ),
                )
                .with_location(node.location().clone())
                .with_context("block", block)
                .with_context("field", "run"),
            );
        }
    }

    common::scan_injections(node, block, pass);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_duration() {
        assert!(is_duration("72h"));
        assert!(is_duration("5d"));
        assert!(is_duration("900s"));
        assert!(!is_duration("72"));
        assert!(!is_duration("h"));
        assert!(!is_duration("72hh"));
        assert!(!is_duration("7.5h"));
        assert!(!is_duration(""));
    }
}
