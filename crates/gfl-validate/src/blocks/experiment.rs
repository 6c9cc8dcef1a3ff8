//! Validators for the `experiment` and `analyze` blocks.
//!
//! Tool, type, and strategy vocabularies are soft-checked: an unknown
//! name is a Warning, never an Error, because wet-lab tooling outpaces
//! any fixed list.

use gfl_ast::{Node, Spanned};

use crate::diag::{Diagnostic, ErrorCode};
use crate::session::Pass;

use super::common;

/// Tools the validator knows about.
const KNOWN_TOOLS: &[&str] = &[
    "CRISPR_cas9",
    "CRISPR_cas12",
    "CRISPR_base_editor",
    "CRISPR_prime_editor",
    "RNAi",
    "antisense_oligo",
    "sequencing",
    "mass_spec",
    "microscopy",
];

/// Experiment types the validator knows about.
const KNOWN_TYPES: &[&str] = &[
    "gene_editing",
    "knockout",
    "knockdown",
    "overexpression",
    "sequencing",
    "imaging",
    "proteomics",
];

/// Experiment types each known tool plausibly performs.
fn plausible_types(tool: &str) -> &'static [&'static str] {
    match tool {
        "CRISPR_cas9" | "CRISPR_cas12" => &["gene_editing", "knockout"],
        "CRISPR_base_editor" | "CRISPR_prime_editor" => &["gene_editing"],
        "RNAi" | "antisense_oligo" => &["knockdown"],
        "sequencing" => &["sequencing"],
        "mass_spec" => &["proteomics"],
        "microscopy" => &["imaging"],
        _ => &[],
    }
}

/// Analysis strategies the validator knows about.
const KNOWN_STRATEGIES: &[&str] = &[
    "differential_expression",
    "variant_calling",
    "pathway_enrichment",
    "clustering",
    "dimensionality_reduction",
    "quality_control",
    "custom",
];

fn vocabulary_warning(
    node: &Spanned<Node>,
    field: &str,
    block: &str,
    value: &str,
    known: &[&str],
    pass: &mut Pass,
) {
    if known.contains(&value) {
        return;
    }
    pass.report.add(
        Diagnostic::warning(
            ErrorCode::UnknownVocabulary,
            format!("unknown {} '{}' in block '{}'", field, value, block),
        )
        .with_location(node.location().clone())
        .with_context("block", block)
        .with_context("field", field)
        .with_context("value", value),
    );
}

pub(crate) fn validate_experiment(node: &Spanned<Node>, pass: &mut Pass) {
    const BLOCK: &str = "experiment";
    let Some(map) = common::block_map(node, BLOCK, pass) else {
        return;
    };

    let tool = common::require(map, "tool", BLOCK, node, pass)
        .and_then(|n| common::expect_str(n, "tool", BLOCK, pass).map(|s| (n, s.to_owned())));
    let exp_type = common::require(map, "type", BLOCK, node, pass)
        .and_then(|n| common::expect_str(n, "type", BLOCK, pass).map(|s| (n, s.to_owned())));

    if let Some((n, tool)) = &tool {
        vocabulary_warning(n, "tool", BLOCK, tool, KNOWN_TOOLS, pass);
    }
    if let Some((n, exp_type)) = &exp_type {
        vocabulary_warning(n, "type", BLOCK, exp_type, KNOWN_TYPES, pass);
    }

    // Pairing is only judged when both names are in vocabulary.
    if let (Some((_, tool)), Some((n, exp_type))) = (&tool, &exp_type)
        && KNOWN_TOOLS.contains(&tool.as_str())
        && KNOWN_TYPES.contains(&exp_type.as_str())
        && !plausible_types(tool).contains(&exp_type.as_str())
    {
        pass.report.add(
            Diagnostic::warning(
                ErrorCode::ImplausibleToolType,
                format!(
                    "tool '{}' is not typically used for '{}' experiments",
                    tool, exp_type
                ),
            )
            .with_location(n.location().clone())
            .with_context("block", BLOCK)
            .with_context("tool", tool)
            .with_context("type", exp_type),
        );
    }

    if let Some(params_node) = map.get("params")
        && let Some(params) = common::expect_map(params_node, "params", BLOCK, pass)
    {
        for (name, value) in params {
            validate_param(name, value, pass);
        }
    }

    common::contract_and_hypothesis(map, BLOCK, pass);
}

/// Per-name checks for experiment parameters.
///
/// Values that parse as `${...}` injections or `kind(name)` entity
/// references are symbolic and skip the type checks entirely.
fn validate_param(name: &str, value: &Spanned<Node>, pass: &mut Pass) {
    const BLOCK: &str = "experiment";
    if common::resolve_symbolic_value(value, BLOCK, pass) {
        return;
    }
    match name {
        "replicates" => {
            common::positive_int(value, name, BLOCK, pass);
        }
        "concentration" | "moi" | "duration_hours" => {
            common::positive_number(value, name, BLOCK, pass);
        }
        "temperature" => {
            if value.as_number().is_none() {
                pass.report.add(
                    Diagnostic::error(
                        ErrorCode::Mismatch,
                        format!(
                            "'{}' in block '{}' must be a number, found {}",
                            name,
                            BLOCK,
                            value.kind()
                        ),
                    )
                    .with_location(value.location().clone())
                    .with_context("block", BLOCK)
                    .with_context("field", name),
                );
            }
        }
        "target_gene" | "cell_line" | "vector" => {
            common::expect_str(value, name, BLOCK, pass);
        }
        // Unknown parameter names are passed through untouched.
        _ => {}
    }
}

pub(crate) fn validate_analyze(node: &Spanned<Node>, pass: &mut Pass) {
    const BLOCK: &str = "analyze";
    let Some(map) = common::block_map(node, BLOCK, pass) else {
        return;
    };

    if let Some(n) = common::require(map, "strategy", BLOCK, node, pass)
        && let Some(strategy) = common::expect_str(n, "strategy", BLOCK, pass)
    {
        let strategy = strategy.to_owned();
        vocabulary_warning(n, "strategy", BLOCK, &strategy, KNOWN_STRATEGIES, pass);
    }

    if let Some(thresholds_node) = map.get("thresholds")
        && let Some(thresholds) = common::expect_map(thresholds_node, "thresholds", BLOCK, pass)
    {
        for (name, value) in thresholds {
            if !common::resolve_symbolic_value(value, BLOCK, pass) && value.as_number().is_none() {
                pass.report.add(
                    Diagnostic::error(
                        ErrorCode::Mismatch,
                        format!(
                            "threshold '{}' in block '{}' must be a number, found {}",
                            name,
                            BLOCK,
                            value.kind()
                        ),
                    )
                    .with_location(value.location().clone())
                    .with_context("block", BLOCK)
                    .with_context("field", name),
                );
            }
        }
    }

    common::contract_and_hypothesis(map, BLOCK, pass);
}
