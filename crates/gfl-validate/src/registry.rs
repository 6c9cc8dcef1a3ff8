//! Pass-scoped registries for entity and hypothesis references.
//!
//! Before block validation runs, one collection pass gathers the
//! top-level `pathways`/`complexes` declarations and the `hypothesis`
//! id. Block validators then resolve `kind(name)` tokens and
//! `validates_hypothesis` fields against these registries.

use indexmap::IndexMap;

use gfl_ast::{Node, SourceLocation, Spanned};

use crate::diag::{Diagnostic, ErrorCode, ValidationReport};
use crate::micro::EntityRef;

/// Declared pathways and complexes, by category section.
#[derive(Debug, Default)]
pub struct EntityRegistry {
    categories: IndexMap<String, IndexMap<String, Spanned<Node>>>,
}

impl EntityRegistry {
    /// The section a reference kind points into, if the kind is known.
    ///
    /// `pathway(...)` resolves against the `pathways` section and
    /// `complex(...)` against `complexes`.
    pub fn section_for_kind(kind: &str) -> Option<&'static str> {
        match kind {
            "pathway" => Some("pathways"),
            "complex" => Some("complexes"),
            _ => None,
        }
    }

    /// Gather entity declarations from the document root.
    ///
    /// Non-mapping sections are skipped here; the block validators
    /// report their shape separately.
    pub fn collect(document: &Node) -> Self {
        let mut registry = Self::default();
        for section in ["pathways", "complexes"] {
            let Some(node) = document.get(section) else {
                continue;
            };
            let Some(entries) = node.as_map() else {
                continue;
            };
            let names: IndexMap<String, Spanned<Node>> = entries
                .iter()
                .map(|(name, def)| (name.clone(), def.clone()))
                .collect();
            log::debug!(section = section, count = names.len(); "entities collected");
            registry.categories.insert(section.to_owned(), names);
        }
        registry
    }

    /// Whether the document declares this section at all.
    pub fn has_section(&self, section: &str) -> bool {
        self.categories.contains_key(section)
    }

    /// Whether a named entity exists in a section.
    pub fn contains(&self, section: &str, name: &str) -> bool {
        self.categories
            .get(section)
            .is_some_and(|names| names.contains_key(name))
    }

    /// Resolve one `kind(name)` reference, reporting failures.
    pub fn resolve(
        &self,
        reference: &EntityRef,
        location: &SourceLocation,
        report: &mut ValidationReport,
    ) {
        let Some(section) = Self::section_for_kind(&reference.kind) else {
            report.add(
                Diagnostic::error(
                    ErrorCode::UnknownEntityKind,
                    format!(
                        "unknown entity kind '{}'; supported kinds are 'pathway' and 'complex'",
                        reference.kind
                    ),
                )
                .with_location(location.clone())
                .with_context("kind", &reference.kind),
            );
            return;
        };

        if !self.has_section(section) {
            report.add(
                Diagnostic::error(
                    ErrorCode::UndefinedEntityReference,
                    format!(
                        "reference to {} '{}' but the document declares no '{}' section",
                        reference.kind, reference.name, section
                    ),
                )
                .with_location(location.clone())
                .with_context("kind", &reference.kind)
                .with_context("name", &reference.name),
            );
            return;
        }

        if !self.contains(section, &reference.name) {
            report.add(
                Diagnostic::error(
                    ErrorCode::UndefinedEntityReference,
                    format!(
                        "{} '{}' is not declared in the '{}' section",
                        reference.kind, reference.name, section
                    ),
                )
                .with_location(location.clone())
                .with_context("kind", &reference.kind)
                .with_context("name", &reference.name),
            );
        }
    }
}

/// Hypothesis ids declared by the document's `hypothesis` block.
#[derive(Debug, Default)]
pub struct HypothesisRegistry {
    ids: IndexMap<String, Spanned<Node>>,
}

impl HypothesisRegistry {
    /// Gather the hypothesis id from the document root.
    pub fn collect(document: &Node) -> Self {
        let mut registry = Self::default();
        if let Some(block) = document.get("hypothesis")
            && let Some(id) = block.get("id").and_then(|n| n.as_str().map(String::from))
        {
            registry.ids.insert(id, block.clone());
        }
        registry
    }

    /// Whether an id is declared.
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains_key(id)
    }

    /// Resolve one `validates_hypothesis` id, reporting failures.
    ///
    /// Ids are compared literally; no pattern syntax applies.
    pub fn resolve(
        &self,
        id: &str,
        location: &SourceLocation,
        report: &mut ValidationReport,
    ) {
        if !self.contains(id) {
            report.add(
                Diagnostic::error(
                    ErrorCode::UndefinedHypothesis,
                    format!("hypothesis '{}' is not declared by this document", id),
                )
                .with_location(location.clone())
                .with_context("hypothesis", id),
            );
        }
    }
}
