//! Validators for the structural blocks: `rules`, `hypothesis`,
//! `timeline`, `branch`, `metadata`, the entity sections
//! (`pathways`/`complexes`), and the genomic annotation lists
//! (`loci`/`transcripts`/`proteins`).

use gfl_ast::{Node, Spanned};

use crate::diag::{Diagnostic, ErrorCode};
use crate::session::Pass;

use super::common;

pub(crate) fn validate_rules(node: &Spanned<Node>, pass: &mut Pass) {
    const BLOCK: &str = "rules";
    let Some(items) = node.as_list() else {
        pass.report.add(
            Diagnostic::error(
                ErrorCode::Mismatch,
                format!("block '{}' must be a list of rules, found {}", BLOCK, node.kind()),
            )
            .with_location(node.location().clone())
            .with_context("block", BLOCK),
        );
        return;
    };

    for (index, item) in items.iter().enumerate() {
        let Some(rule) = item.as_map() else {
            pass.report.add(
                Diagnostic::error(
                    ErrorCode::Mismatch,
                    format!("rule {} must be a mapping, found {}", index, item.kind()),
                )
                .with_location(item.location().clone())
                .with_context("block", BLOCK),
            );
            continue;
        };
        if let Some(id) = common::require(rule, "id", BLOCK, item, pass) {
            common::expect_str(id, "id", BLOCK, pass);
        }
        if let Some(cond) = common::require(rule, "if", BLOCK, item, pass) {
            common::expect_map(cond, "if", BLOCK, pass);
        }
        if let Some(action) = common::require(rule, "then", BLOCK, item, pass) {
            common::expect_map(action, "then", BLOCK, pass);
        }
    }
}

pub(crate) fn validate_hypothesis(node: &Spanned<Node>, pass: &mut Pass) {
    const BLOCK: &str = "hypothesis";
    let Some(map) = common::block_map(node, BLOCK, pass) else {
        return;
    };

    if let Some(id) = common::require(map, "id", BLOCK, node, pass) {
        common::expect_str(id, "id", BLOCK, pass);
    }
    if let Some(description) = common::require(map, "description", BLOCK, node, pass) {
        common::expect_str(description, "description", BLOCK, pass);
    }
    if let Some(cond) = common::require(map, "if", BLOCK, node, pass) {
        common::expect_list(cond, "if", BLOCK, pass);
    }
    if let Some(outcome) = common::require(map, "then", BLOCK, node, pass) {
        common::expect_list(outcome, "then", BLOCK, pass);
    }
}

pub(crate) fn validate_timeline(node: &Spanned<Node>, pass: &mut Pass) {
    const BLOCK: &str = "timeline";
    let Some(map) = common::block_map(node, BLOCK, pass) else {
        return;
    };

    let Some(events_node) = common::require(map, "events", BLOCK, node, pass) else {
        return;
    };
    let Some(events) = common::expect_list(events_node, "events", BLOCK, pass) else {
        return;
    };

    for (index, event) in events.iter().enumerate() {
        let Some(fields) = event.as_map() else {
            pass.report.add(
                Diagnostic::error(
                    ErrorCode::Mismatch,
                    format!("event {} must be a mapping, found {}", index, event.kind()),
                )
                .with_location(event.location().clone())
                .with_context("block", BLOCK),
            );
            continue;
        };
        if let Some(at) = common::require(fields, "at", BLOCK, event, pass) {
            common::expect_str(at, "at", BLOCK, pass);
        }
        if let Some(actions) = common::require(fields, "actions", BLOCK, event, pass) {
            common::expect_list(actions, "actions", BLOCK, pass);
        }
        if let Some(expectations) = fields.get("expectations") {
            common::expect_list(expectations, "expectations", BLOCK, pass);
        }
    }
}

pub(crate) fn validate_branch(node: &Spanned<Node>, pass: &mut Pass) {
    const BLOCK: &str = "branch";
    let Some(map) = common::block_map(node, BLOCK, pass) else {
        return;
    };
    common::require(map, "if", BLOCK, node, pass);
    common::require(map, "then", BLOCK, node, pass);
}

/// Metadata keys whose presence makes a document traceable.
const CORE_METADATA: &[&str] = &["experiment_id", "researcher", "date", "description"];

pub(crate) fn validate_metadata(node: &Spanned<Node>, pass: &mut Pass) {
    const BLOCK: &str = "metadata";
    let Some(map) = common::block_map(node, BLOCK, pass) else {
        return;
    };

    let present = CORE_METADATA
        .iter()
        .filter(|key| map.contains_key(**key))
        .count();
    if present < 2 {
        pass.report.add(
            Diagnostic::hint(
                ErrorCode::SparseMetadata,
                "metadata is sparse; consider recording experiment_id, researcher, date, description",
            )
            .with_location(node.location().clone())
            .with_context("block", BLOCK),
        );
    }
}

/// `pathways` and `complexes` are mappings of name → definition.
/// Collection into the entity registry happened before dispatch; this
/// only checks shape.
pub(crate) fn validate_entity_section(node: &Spanned<Node>, block: &str, pass: &mut Pass) {
    let Some(entries) = common::block_map(node, block, pass) else {
        return;
    };
    for (name, definition) in entries {
        if definition.as_map().is_none() {
            pass.report.add(
                Diagnostic::error(
                    ErrorCode::Mismatch,
                    format!(
                        "'{}' in block '{}' must be a mapping, found {}",
                        name,
                        block,
                        definition.kind()
                    ),
                )
                .with_location(definition.location().clone())
                .with_context("block", block)
                .with_context("entity", name),
            );
        }
    }
}

/// `loci`, `transcripts`, and `proteins` are lists of annotated records,
/// each with at least an `id`.
pub(crate) fn validate_annotation_list(node: &Spanned<Node>, block: &str, pass: &mut Pass) {
    let Some(items) = node.as_list() else {
        pass.report.add(
            Diagnostic::error(
                ErrorCode::Mismatch,
                format!("block '{}' must be a list, found {}", block, node.kind()),
            )
            .with_location(node.location().clone())
            .with_context("block", block),
        );
        return;
    };

    for (index, item) in items.iter().enumerate() {
        let Some(record) = item.as_map() else {
            pass.report.add(
                Diagnostic::error(
                    ErrorCode::Mismatch,
                    format!(
                        "entry {} in block '{}' must be a mapping, found {}",
                        index,
                        block,
                        item.kind()
                    ),
                )
                .with_location(item.location().clone())
                .with_context("block", block),
            );
            continue;
        };
        if let Some(id) = common::require(record, "id", block, item, pass) {
            common::expect_str(id, "id", block, pass);
        }
    }
}
