//! The validator and its per-pass state.
//!
//! A [`Validator`] is configured once with a capability set and reused
//! across documents. Every [`Validator::validate_ast`] call owns a
//! fresh [`Pass`]: report, schema registry, entity and hypothesis
//! registries, and the contract table all start empty, so no state
//! leaks between documents. The validator itself is not internally
//! locked; callers wanting parallelism use one instance per worker.

use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use gfl_ast::{Node, Spanned};

use crate::blocks::{self, BlockKind};
use crate::capability::{EngineCapabilitySet, Feature};
use crate::contract::ContractTable;
use crate::diag::{Diagnostic, ErrorCode, ValidationReport};
use crate::registry::{EntityRegistry, HypothesisRegistry};
use crate::schema::SchemaRegistry;

/// All state scoped to one validation pass.
pub(crate) struct Pass {
    pub(crate) report: ValidationReport,
    pub(crate) schemas: SchemaRegistry,
    pub(crate) entities: EntityRegistry,
    pub(crate) hypotheses: HypothesisRegistry,
    pub(crate) contracts: ContractTable,
    required: Vec<Feature>,
}

impl Pass {
    fn new() -> Self {
        Self {
            report: ValidationReport::new(),
            schemas: SchemaRegistry::new(),
            entities: EntityRegistry::default(),
            hypotheses: HypothesisRegistry::default(),
            contracts: ContractTable::new(),
            required: Vec::new(),
        }
    }

    /// Record that the document uses a feature, keeping document order.
    pub(crate) fn require(&mut self, feature: Feature) {
        if !self.required.contains(&feature) {
            self.required.push(feature);
        }
    }
}

/// Reusable semantic validator for GFL documents.
pub struct Validator {
    capabilities: EngineCapabilitySet,
}

impl Validator {
    /// Create a validator targeting the given engine capabilities.
    pub fn new(capabilities: EngineCapabilitySet) -> Self {
        Self { capabilities }
    }

    /// Create a validator targeting the standard capability set.
    pub fn with_defaults() -> Self {
        Self::new(EngineCapabilitySet::standard())
    }

    /// The capability set this validator checks against.
    pub fn capabilities(&self) -> &EngineCapabilitySet {
        &self.capabilities
    }

    /// Validate a document whose source location is unknown.
    ///
    /// Schema import paths resolve relative to the process working
    /// directory.
    pub fn validate_ast(&self, ast: &Spanned<Node>) -> ValidationReport {
        self.run(ast, None)
    }

    /// Validate a document read from `source`; schema import paths
    /// resolve relative to the source file's directory.
    pub fn validate_ast_from(&self, ast: &Spanned<Node>, source: &Path) -> ValidationReport {
        self.run(ast, source.parent().map(Path::to_path_buf))
    }

    fn run(&self, ast: &Spanned<Node>, base_dir: Option<PathBuf>) -> ValidationReport {
        let mut pass = Pass::new();
        log::debug!(capabilities = self.capabilities.name(); "validation pass started");

        // Validators report data problems as diagnostics and never
        // panic on them; a panic here is an internal fault, surfaced
        // once without discarding the findings collected so far.
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            self.run_pass(&mut pass, ast, base_dir.as_deref());
        }));
        if let Err(payload) = outcome {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| (*s).to_owned())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic payload".to_owned());
            pass.report.add(Diagnostic::critical(
                ErrorCode::InternalError,
                format!("internal validator fault: {}", message),
            ));
        }

        let stats = pass.report.statistics();
        log::debug!(
            errors = stats.errors,
            warnings = stats.warnings,
            total = stats.total;
            "validation pass finished"
        );
        pass.report
    }

    fn run_pass(&self, pass: &mut Pass, ast: &Spanned<Node>, base_dir: Option<&Path>) {
        let Some(root) = ast.as_map() else {
            pass.report.add(
                Diagnostic::critical(
                    ErrorCode::MalformedRoot,
                    format!("document root must be a mapping, found {}", ast.kind()),
                )
                .with_location(ast.location().clone()),
            );
            return;
        };

        // Imports load before anything else; contract checks need the
        // schemas resolvable.
        if let Some(imports) = root.get("import_schemas") {
            self.load_imports(pass, imports, base_dir);
        }

        let recognized: Vec<(BlockKind, &Spanned<Node>)> = root
            .iter()
            .filter_map(|(key, node)| BlockKind::from_key(key).map(|kind| (kind, node)))
            .collect();

        if recognized.is_empty() {
            pass.report.add(
                Diagnostic::error(
                    ErrorCode::EmptyDocument,
                    "document contains no recognized GFL blocks",
                )
                .with_location(ast.location().clone()),
            );
        }
        for (key, node) in root {
            if BlockKind::from_key(key).is_none() {
                pass.report.add(
                    Diagnostic::warning(
                        ErrorCode::UnknownBlock,
                        format!("unknown top-level block '{}'", key),
                    )
                    .with_location(node.location().clone())
                    .with_context("block", key),
                );
            }
        }

        pass.entities = EntityRegistry::collect(ast);
        pass.hypotheses = HypothesisRegistry::collect(ast);

        for (kind, node) in recognized {
            blocks::validate_block(kind, node, pass);
        }

        self.check_capabilities(pass);
    }

    fn load_imports(&self, pass: &mut Pass, imports: &Spanned<Node>, base_dir: Option<&Path>) {
        pass.require(Feature::SchemaImports);
        let Some(paths) = imports.as_list() else {
            pass.report.add(
                Diagnostic::error(
                    ErrorCode::Mismatch,
                    format!(
                        "'import_schemas' must be a list of paths, found {}",
                        imports.kind()
                    ),
                )
                .with_location(imports.location().clone()),
            );
            return;
        };

        for entry in paths {
            let Some(path) = entry.as_str() else {
                pass.report.add(
                    Diagnostic::error(
                        ErrorCode::Mismatch,
                        format!("schema import path must be a string, found {}", entry.kind()),
                    )
                    .with_location(entry.location().clone()),
                );
                continue;
            };
            let resolved = match base_dir {
                Some(dir) => dir.join(path),
                None => PathBuf::from(path),
            };
            pass.schemas.load(&resolved, &mut pass.report);
        }

        if !pass.schemas.is_empty() {
            pass.require(Feature::CustomTypes);
        }
    }

    /// Compare the features the document used against the target
    /// capability set. Gaps inform, they never block: everything here
    /// is a Warning.
    fn check_capabilities(&self, pass: &mut Pass) {
        for feature in pass.required.clone() {
            if !self.capabilities.supports(feature) {
                pass.report.add(
                    Diagnostic::warning(
                        ErrorCode::UnsupportedFeature,
                        format!(
                            "feature {} is not supported by the '{}' capability set",
                            feature.as_str(),
                            self.capabilities.name()
                        ),
                    )
                    .with_context("feature", feature.as_str())
                    .with_context("capability_set", self.capabilities.name()),
                );
            }
            for missing in self.capabilities.missing_dependencies(feature) {
                pass.report.add(
                    Diagnostic::warning(
                        ErrorCode::MissingFeatureDependency,
                        format!(
                            "feature {} depends on {}, which the '{}' capability set lacks",
                            feature.as_str(),
                            missing.as_str(),
                            self.capabilities.name()
                        ),
                    )
                    .with_context("feature", feature.as_str())
                    .with_context("dependency", missing.as_str()),
                );
            }
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::with_defaults()
    }
}
