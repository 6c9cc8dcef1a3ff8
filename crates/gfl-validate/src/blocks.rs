//! Block validators and the kind-dispatch table.
//!
//! Every recognized top-level key maps to a [`BlockKind`]; dispatch is
//! an exhaustive `match`, so adding a block kind without wiring its
//! validator fails to compile.

mod common;
mod design;
mod discovery;
mod experiment;
mod optimize;
mod structure;

use gfl_ast::{Node, Spanned};

use crate::capability::Feature;
use crate::session::Pass;

/// A recognized top-level block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Experiment,
    Analyze,
    Design,
    Optimize,
    Branch,
    Metadata,
    Rules,
    Hypothesis,
    Timeline,
    Pathways,
    Complexes,
    RefineData,
    GuidedDiscovery,
    Loci,
    Transcripts,
    Proteins,
    ImportSchemas,
}

impl BlockKind {
    /// Map a top-level key to its block kind.
    pub fn from_key(key: &str) -> Option<Self> {
        Some(match key {
            "experiment" => Self::Experiment,
            "analyze" => Self::Analyze,
            "design" => Self::Design,
            "optimize" => Self::Optimize,
            "branch" => Self::Branch,
            "metadata" => Self::Metadata,
            "rules" => Self::Rules,
            "hypothesis" => Self::Hypothesis,
            "timeline" => Self::Timeline,
            "pathways" => Self::Pathways,
            "complexes" => Self::Complexes,
            "refine_data" => Self::RefineData,
            "guided_discovery" => Self::GuidedDiscovery,
            "loci" => Self::Loci,
            "transcripts" => Self::Transcripts,
            "proteins" => Self::Proteins,
            "import_schemas" => Self::ImportSchemas,
            _ => return None,
        })
    }

    /// The document key this kind is written as.
    pub fn key(self) -> &'static str {
        match self {
            Self::Experiment => "experiment",
            Self::Analyze => "analyze",
            Self::Design => "design",
            Self::Optimize => "optimize",
            Self::Branch => "branch",
            Self::Metadata => "metadata",
            Self::Rules => "rules",
            Self::Hypothesis => "hypothesis",
            Self::Timeline => "timeline",
            Self::Pathways => "pathways",
            Self::Complexes => "complexes",
            Self::RefineData => "refine_data",
            Self::GuidedDiscovery => "guided_discovery",
            Self::Loci => "loci",
            Self::Transcripts => "transcripts",
            Self::Proteins => "proteins",
            Self::ImportSchemas => "import_schemas",
        }
    }

    /// The capability a document requires by using this block.
    pub fn feature(self) -> Feature {
        match self {
            Self::Experiment => Feature::ExperimentBlock,
            Self::Analyze => Feature::AnalyzeBlock,
            Self::Design => Feature::DesignBlock,
            Self::Optimize => Feature::OptimizeBlock,
            Self::Branch => Feature::BranchBlock,
            Self::Metadata => Feature::MetadataBlock,
            Self::Rules => Feature::RulesBlock,
            Self::Hypothesis => Feature::HypothesisBlock,
            Self::Timeline => Feature::TimelineBlock,
            Self::Pathways => Feature::PathwaysBlock,
            Self::Complexes => Feature::ComplexesBlock,
            Self::RefineData => Feature::RefineDataBlock,
            Self::GuidedDiscovery => Feature::GuidedDiscoveryBlock,
            Self::Loci => Feature::LociBlock,
            Self::Transcripts => Feature::TranscriptsBlock,
            Self::Proteins => Feature::ProteinsBlock,
            Self::ImportSchemas => Feature::SchemaImports,
        }
    }
}

/// Dispatch one top-level block to its validator.
pub(crate) fn validate_block(kind: BlockKind, node: &Spanned<Node>, pass: &mut Pass) {
    pass.require(kind.feature());
    match kind {
        BlockKind::Experiment => experiment::validate_experiment(node, pass),
        BlockKind::Analyze => experiment::validate_analyze(node, pass),
        BlockKind::Design => design::validate_design(node, pass),
        BlockKind::Optimize => optimize::validate_optimize(node, pass),
        BlockKind::Branch => structure::validate_branch(node, pass),
        BlockKind::Metadata => structure::validate_metadata(node, pass),
        BlockKind::Rules => structure::validate_rules(node, pass),
        BlockKind::Hypothesis => structure::validate_hypothesis(node, pass),
        BlockKind::Timeline => structure::validate_timeline(node, pass),
        BlockKind::Pathways => structure::validate_entity_section(node, "pathways", pass),
        BlockKind::Complexes => structure::validate_entity_section(node, "complexes", pass),
        BlockKind::RefineData => discovery::validate_refine_data(node, pass),
        BlockKind::GuidedDiscovery => discovery::validate_guided_discovery(node, pass),
        BlockKind::Loci => structure::validate_annotation_list(node, "loci", pass),
        BlockKind::Transcripts => structure::validate_annotation_list(node, "transcripts", pass),
        BlockKind::Proteins => structure::validate_annotation_list(node, "proteins", pass),
        // Imports were loaded before dispatch; nothing left to check.
        BlockKind::ImportSchemas => {}
    }
}
