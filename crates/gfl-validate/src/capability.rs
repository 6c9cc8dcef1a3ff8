//! Capability catalogue and engine capability sets.
//!
//! GFL runs on execution engines with very different feature surfaces: a
//! basic runner understands plain experiment/analyze pipelines, while an
//! experimental engine accepts multi-omic blocks. This module provides:
//!
//! - [`Feature`] — the static catalogue of DSL capabilities
//! - [`CapabilityInfo`] — per-feature dependency list, version tag, and
//!   experimental flag
//! - [`EngineCapabilitySet`] — the named feature sets engines advertise
//!
//! Capability gaps are advisory: validating a document against a
//! lower-capability target emits warnings, never errors. An otherwise
//! correct document stays valid.

use std::collections::HashSet;
use std::fmt;

/// One optional DSL capability whose support varies by target engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    // Block kinds
    ExperimentBlock,
    AnalyzeBlock,
    DesignBlock,
    OptimizeBlock,
    BranchBlock,
    MetadataBlock,
    RulesBlock,
    HypothesisBlock,
    TimelineBlock,
    PathwaysBlock,
    ComplexesBlock,
    RefineDataBlock,
    GuidedDiscoveryBlock,
    LociBlock,
    TranscriptsBlock,
    ProteinsBlock,
    // Cross-block constructs
    ParameterInjection,
    EntityReferences,
    HypothesisValidation,
    IoContracts,
    SchemaImports,
    CustomTypes,
    ActiveLearning,
    InverseDesign,
    MultiOmicIntegration,
}

/// Static description of one capability.
#[derive(Debug, Clone, Copy)]
pub struct CapabilityInfo {
    /// The capability being described.
    pub feature: Feature,
    /// Features this one needs, one level deep.
    ///
    /// Dependency lists are pre-flattened by the catalogue author;
    /// consumers do not chase them transitively.
    pub dependencies: &'static [Feature],
    /// The DSL version that introduced the capability.
    pub since: &'static str,
    /// Whether the capability is still experimental.
    pub experimental: bool,
}

impl Feature {
    /// Every capability in the catalogue.
    pub fn all() -> &'static [Feature] {
        use Feature::*;
        &[
            ExperimentBlock,
            AnalyzeBlock,
            DesignBlock,
            OptimizeBlock,
            BranchBlock,
            MetadataBlock,
            RulesBlock,
            HypothesisBlock,
            TimelineBlock,
            PathwaysBlock,
            ComplexesBlock,
            RefineDataBlock,
            GuidedDiscoveryBlock,
            LociBlock,
            TranscriptsBlock,
            ProteinsBlock,
            ParameterInjection,
            EntityReferences,
            HypothesisValidation,
            IoContracts,
            SchemaImports,
            CustomTypes,
            ActiveLearning,
            InverseDesign,
            MultiOmicIntegration,
        ]
    }

    /// The stable tag for this feature (`"LOCI_BLOCK"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Feature::ExperimentBlock => "EXPERIMENT_BLOCK",
            Feature::AnalyzeBlock => "ANALYZE_BLOCK",
            Feature::DesignBlock => "DESIGN_BLOCK",
            Feature::OptimizeBlock => "OPTIMIZE_BLOCK",
            Feature::BranchBlock => "BRANCH_BLOCK",
            Feature::MetadataBlock => "METADATA_BLOCK",
            Feature::RulesBlock => "RULES_BLOCK",
            Feature::HypothesisBlock => "HYPOTHESIS_BLOCK",
            Feature::TimelineBlock => "TIMELINE_BLOCK",
            Feature::PathwaysBlock => "PATHWAYS_BLOCK",
            Feature::ComplexesBlock => "COMPLEXES_BLOCK",
            Feature::RefineDataBlock => "REFINE_DATA_BLOCK",
            Feature::GuidedDiscoveryBlock => "GUIDED_DISCOVERY_BLOCK",
            Feature::LociBlock => "LOCI_BLOCK",
            Feature::TranscriptsBlock => "TRANSCRIPTS_BLOCK",
            Feature::ProteinsBlock => "PROTEINS_BLOCK",
            Feature::ParameterInjection => "PARAMETER_INJECTION",
            Feature::EntityReferences => "ENTITY_REFERENCES",
            Feature::HypothesisValidation => "HYPOTHESIS_VALIDATION",
            Feature::IoContracts => "IO_CONTRACTS",
            Feature::SchemaImports => "SCHEMA_IMPORTS",
            Feature::CustomTypes => "CUSTOM_TYPES",
            Feature::ActiveLearning => "ACTIVE_LEARNING",
            Feature::InverseDesign => "INVERSE_DESIGN",
            Feature::MultiOmicIntegration => "MULTI_OMIC_INTEGRATION",
        }
    }

    /// Look up a feature by its tag, case-insensitively.
    pub fn from_name(name: &str) -> Option<Feature> {
        Feature::all()
            .iter()
            .copied()
            .find(|f| f.as_str().eq_ignore_ascii_case(name))
    }

    /// The catalogue entry for this feature.
    pub fn info(&self) -> CapabilityInfo {
        use Feature::*;
        let (dependencies, since, experimental): (&'static [Feature], &'static str, bool) =
            match self {
                ExperimentBlock => (&[], "v1.0", false),
                AnalyzeBlock => (&[], "v1.0", false),
                BranchBlock => (&[], "v1.0", false),
                MetadataBlock => (&[], "v1.0", false),
                DesignBlock => (&[], "v1.1", false),
                OptimizeBlock => (&[], "v1.1", false),
                RulesBlock => (&[], "v1.1", false),
                HypothesisBlock => (&[], "v1.1", false),
                TimelineBlock => (&[], "v1.1", false),
                PathwaysBlock => (&[], "v1.1", false),
                ComplexesBlock => (&[], "v1.1", false),
                ParameterInjection => (&[], "v1.1", false),
                EntityReferences => (&[PathwaysBlock, ComplexesBlock], "v1.1", false),
                HypothesisValidation => (&[HypothesisBlock], "v1.1", false),
                IoContracts => (&[], "v1.1", false),
                RefineDataBlock => (&[], "v1.2", false),
                GuidedDiscoveryBlock => (&[DesignBlock, OptimizeBlock], "v1.2", false),
                LociBlock => (&[], "v1.2", false),
                SchemaImports => (&[IoContracts], "v1.2", false),
                CustomTypes => (&[SchemaImports, IoContracts], "v1.2", false),
                ActiveLearning => (&[OptimizeBlock], "v1.2", false),
                InverseDesign => (&[DesignBlock], "v1.2", false),
                TranscriptsBlock => (&[], "v1.3", true),
                ProteinsBlock => (&[], "v1.3", true),
                MultiOmicIntegration => (&[LociBlock], "v1.3", true),
            };
        CapabilityInfo {
            feature: *self,
            dependencies,
            since,
            experimental,
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A named set of features a target engine supports.
///
/// The built-in tiers extend each other, so
/// `basic ⊆ standard ⊆ advanced ⊆ experimental` holds by construction.
#[derive(Debug, Clone)]
pub struct EngineCapabilitySet {
    name: String,
    features: HashSet<Feature>,
}

impl EngineCapabilitySet {
    /// The minimal tier: plain experiment/analyze pipelines.
    pub fn basic() -> Self {
        use Feature::*;
        Self {
            name: "basic".to_owned(),
            features: [ExperimentBlock, AnalyzeBlock, BranchBlock, MetadataBlock]
                .into_iter()
                .collect(),
        }
    }

    /// The default tier: declarative modeling and IO contracts.
    pub fn standard() -> Self {
        use Feature::*;
        let mut set = Self::basic();
        set.name = "standard".to_owned();
        set.features.extend([
            DesignBlock,
            OptimizeBlock,
            RulesBlock,
            HypothesisBlock,
            TimelineBlock,
            PathwaysBlock,
            ComplexesBlock,
            ParameterInjection,
            EntityReferences,
            HypothesisValidation,
            IoContracts,
        ]);
        set
    }

    /// The full stable surface: schema imports, guided discovery, loci.
    pub fn advanced() -> Self {
        use Feature::*;
        let mut set = Self::standard();
        set.name = "advanced".to_owned();
        set.features.extend([
            RefineDataBlock,
            GuidedDiscoveryBlock,
            LociBlock,
            SchemaImports,
            CustomTypes,
            ActiveLearning,
            InverseDesign,
        ]);
        set
    }

    /// Everything, including experimental capabilities.
    pub fn experimental() -> Self {
        use Feature::*;
        let mut set = Self::advanced();
        set.name = "experimental".to_owned();
        set.features
            .extend([TranscriptsBlock, ProteinsBlock, MultiOmicIntegration]);
        set
    }

    /// A custom set with an explicit feature list.
    pub fn custom(name: impl Into<String>, features: impl IntoIterator<Item = Feature>) -> Self {
        Self {
            name: name.into(),
            features: features.into_iter().collect(),
        }
    }

    /// Look up a built-in tier by name.
    pub fn named(name: &str) -> Option<Self> {
        match name {
            "basic" => Some(Self::basic()),
            "standard" => Some(Self::standard()),
            "advanced" => Some(Self::advanced()),
            "experimental" => Some(Self::experimental()),
            _ => None,
        }
    }

    /// The set name (`"standard"`, or the custom name).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The supported features.
    pub fn features(&self) -> &HashSet<Feature> {
        &self.features
    }

    /// Whether the engine supports a feature.
    pub fn supports(&self, feature: Feature) -> bool {
        self.features.contains(&feature)
    }

    /// The subset of `feature`'s dependencies this engine lacks.
    ///
    /// One level only; dependency lists in the catalogue are
    /// pre-flattened.
    pub fn missing_dependencies(&self, feature: Feature) -> Vec<Feature> {
        feature
            .info()
            .dependencies
            .iter()
            .copied()
            .filter(|dep| !self.supports(*dep))
            .collect()
    }

    /// The features in `required` this engine does not support,
    /// preserving the input order.
    pub fn unsupported<'a>(
        &self,
        required: impl IntoIterator<Item = &'a Feature>,
    ) -> Vec<Feature> {
        required
            .into_iter()
            .copied()
            .filter(|f| !self.supports(*f))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_catalogue_has_25_features() {
        assert_eq!(Feature::all().len(), 25);
    }

    #[test]
    fn test_tiers_are_monotonic() {
        let basic = EngineCapabilitySet::basic();
        let standard = EngineCapabilitySet::standard();
        let advanced = EngineCapabilitySet::advanced();
        let experimental = EngineCapabilitySet::experimental();

        assert!(basic.features().is_subset(standard.features()));
        assert!(standard.features().is_subset(advanced.features()));
        assert!(advanced.features().is_subset(experimental.features()));
    }

    #[test]
    fn test_experimental_tier_is_complete() {
        let experimental = EngineCapabilitySet::experimental();
        for feature in Feature::all() {
            assert!(experimental.supports(*feature), "{feature} missing");
        }
    }

    #[test]
    fn test_dependencies_are_in_catalogue_order() {
        let basic = EngineCapabilitySet::basic();
        // ActiveLearning needs OptimizeBlock, which basic lacks.
        assert_eq!(
            basic.missing_dependencies(Feature::ActiveLearning),
            vec![Feature::OptimizeBlock]
        );
        // Advanced has everything ActiveLearning needs.
        let advanced = EngineCapabilitySet::advanced();
        assert!(advanced.missing_dependencies(Feature::ActiveLearning).is_empty());
    }

    #[test]
    fn test_unsupported_preserves_order() {
        let basic = EngineCapabilitySet::basic();
        let required = [
            Feature::LociBlock,
            Feature::ExperimentBlock,
            Feature::CustomTypes,
        ];
        assert_eq!(
            basic.unsupported(required.iter()),
            vec![Feature::LociBlock, Feature::CustomTypes]
        );
    }

    #[test]
    fn test_from_name_is_case_insensitive() {
        assert_eq!(Feature::from_name("loci_block"), Some(Feature::LociBlock));
        assert_eq!(Feature::from_name("LOCI_BLOCK"), Some(Feature::LociBlock));
        assert_eq!(Feature::from_name("warp_drive"), None);
    }

    #[test]
    fn test_named_tiers() {
        assert_eq!(EngineCapabilitySet::named("basic").unwrap().name(), "basic");
        assert!(EngineCapabilitySet::named("galactic").is_none());
    }

    #[test]
    fn test_experimental_flags_match_tier() {
        // Every experimental-flagged feature is absent from advanced.
        let advanced = EngineCapabilitySet::advanced();
        for feature in Feature::all() {
            if feature.info().experimental {
                assert!(!advanced.supports(*feature), "{feature} should be experimental-only");
            }
        }
    }

    proptest! {
        /// For every feature, `missing_dependencies` over a set S is
        /// exactly `dependencies \ S`.
        #[test]
        fn prop_missing_dependencies_is_set_difference(mask in prop::collection::vec(any::<bool>(), 25)) {
            let supported: Vec<Feature> = Feature::all()
                .iter()
                .zip(&mask)
                .filter(|(_, keep)| **keep)
                .map(|(f, _)| *f)
                .collect();
            let set = EngineCapabilitySet::custom("probe", supported.clone());

            for feature in Feature::all() {
                let missing = set.missing_dependencies(*feature);
                for dep in feature.info().dependencies {
                    let expect_missing = !supported.contains(dep);
                    prop_assert_eq!(missing.contains(dep), expect_missing);
                }
                // Nothing outside the dependency list ever shows up.
                for m in &missing {
                    prop_assert!(feature.info().dependencies.contains(m));
                }
            }
        }
    }
}
