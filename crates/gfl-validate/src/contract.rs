//! IO contract parsing and compatibility checking.
//!
//! Blocks may declare a `contract` with named `inputs` and `outputs`.
//! Contracts are opt-in: a block without one is never checked. When a
//! later block's input name matches an earlier block's output name, the
//! two entries are compared — type compatibility first (exact match,
//! then schema resolution to base types, then a fixed base-type table),
//! then boolean attribute agreement.
//!
//! Comparison is directional, producer output to consumer input, and
//! never reflexive.

use indexmap::IndexMap;

use gfl_ast::{Node, Spanned};

use crate::diag::{Diagnostic, ErrorCode, ValidationReport};
use crate::schema::SchemaRegistry;

/// One declared input or output: a type name plus free-form attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct ContractEntry {
    pub data_type: String,
    pub attributes: IndexMap<String, Node>,
}

/// A block's declared inputs and outputs, by data name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockContract {
    pub inputs: IndexMap<String, ContractEntry>,
    pub outputs: IndexMap<String, ContractEntry>,
}

impl BlockContract {
    /// Parse a block's `contract` node.
    ///
    /// Parsing is lenient in the same way schema loading is: a
    /// malformed entry emits a diagnostic and is skipped, the rest of
    /// the contract survives.
    pub fn parse(node: &Spanned<Node>, block: &str, report: &mut ValidationReport) -> Self {
        let mut contract = Self::default();
        let Some(sections) = node.as_map() else {
            report.add(
                Diagnostic::error(
                    ErrorCode::Mismatch,
                    format!("'contract' in block '{}' must be a mapping", block),
                )
                .with_location(node.location().clone())
                .with_context("block", block),
            );
            return contract;
        };

        for (direction, entries) in [
            ("inputs", &mut contract.inputs),
            ("outputs", &mut contract.outputs),
        ] {
            let Some(section) = sections.get(direction) else {
                continue;
            };
            let Some(declared) = section.as_map() else {
                report.add(
                    Diagnostic::error(
                        ErrorCode::Mismatch,
                        format!(
                            "contract '{}' in block '{}' must be a mapping of data names",
                            direction, block
                        ),
                    )
                    .with_location(section.location().clone())
                    .with_context("block", block),
                );
                continue;
            };
            for (name, value) in declared {
                match parse_entry(value) {
                    Some(entry) => {
                        entries.insert(name.clone(), entry);
                    }
                    None => {
                        report.add(
                            Diagnostic::error(
                                ErrorCode::Mismatch,
                                format!(
                                    "contract entry '{}' in block '{}' must be a type name or a mapping with a 'type' string",
                                    name, block
                                ),
                            )
                            .with_location(value.location().clone())
                            .with_context("block", block)
                            .with_context("data", name),
                        );
                    }
                }
            }
        }
        contract
    }

    /// Whether this contract declares anything at all.
    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty() && self.outputs.is_empty()
    }
}

/// An entry is either a bare type string or `{type, attributes?}`.
fn parse_entry(node: &Spanned<Node>) -> Option<ContractEntry> {
    if let Some(data_type) = node.as_str() {
        return Some(ContractEntry {
            data_type: data_type.to_owned(),
            attributes: IndexMap::new(),
        });
    }

    let map = node.as_map()?;
    let data_type = map.get("type")?.as_str()?.to_owned();
    let attributes = match map.get("attributes") {
        Some(attrs) => attrs
            .as_map()?
            .iter()
            .map(|(k, v)| (k.clone(), v.inner().clone()))
            .collect(),
        None => IndexMap::new(),
    };
    Some(ContractEntry {
        data_type,
        attributes,
    })
}

/// Consumers a producer base type can feed.
fn compatible_targets(base: &str) -> &'static [&'static str] {
    match base {
        "FASTQ" => &["FASTQ", "TEXT"],
        "FASTA" => &["FASTA", "TEXT"],
        "BAM" => &["BAM", "SAM", "BINARY"],
        "SAM" => &["SAM", "BAM", "TEXT"],
        "VCF" => &["VCF", "TEXT"],
        "CSV" => &["CSV", "TEXT"],
        "JSON" => &["JSON", "TEXT"],
        "TEXT" => &["TEXT"],
        "BINARY" => &["BINARY"],
        _ => &[],
    }
}

/// Whether a producer's output type can feed a consumer's input type.
///
/// Exact name matches (including matching custom types) pass first;
/// otherwise both sides resolve through the schema registry to their
/// base types and the base-type table decides. A side that does not
/// resolve is incompatible.
pub fn types_compatible(output: &str, input: &str, schemas: &SchemaRegistry) -> bool {
    if output == input {
        return true;
    }
    let (Some(out_base), Some(in_base)) = (
        schemas.resolve_base_type(output),
        schemas.resolve_base_type(input),
    ) else {
        return false;
    };
    out_base == in_base || compatible_targets(out_base).contains(&in_base)
}

/// Check one producer→consumer pair over their shared data names.
///
/// Only input names the producer also outputs are compared; absence on
/// either side skips silently.
pub fn check_link(
    producer: &str,
    producer_contract: &BlockContract,
    consumer: &str,
    consumer_contract: &BlockContract,
    schemas: &SchemaRegistry,
    report: &mut ValidationReport,
) {
    for (name, input) in &consumer_contract.inputs {
        let Some(output) = producer_contract.outputs.get(name) else {
            continue;
        };

        if !types_compatible(&output.data_type, &input.data_type, schemas) {
            report.add(
                Diagnostic::error(
                    ErrorCode::ContractMismatch,
                    format!(
                        "block '{}' produces '{}' as {} but block '{}' consumes it as {}",
                        producer, name, output.data_type, consumer, input.data_type
                    ),
                )
                .with_context("producer", producer)
                .with_context("consumer", consumer)
                .with_context("data", name)
                .with_context("output_type", &output.data_type)
                .with_context("input_type", &input.data_type),
            );
            continue;
        }

        // A consumer that requires a boolean attribute to be true must
        // see it true on the producer side. Non-boolean attribute
        // disagreements are deliberately not reported; contract
        // attributes double as free-form metadata.
        for (attr, value) in &input.attributes {
            if value.as_bool() != Some(true) {
                continue;
            }
            if output.attributes.get(attr).and_then(Node::as_bool) != Some(true) {
                report.add(
                    Diagnostic::error(
                        ErrorCode::ContractMismatch,
                        format!(
                            "block '{}' requires '{}' of '{}' to be {} but block '{}' does not guarantee it",
                            consumer, attr, name, value, producer
                        ),
                    )
                    .with_context("producer", producer)
                    .with_context("consumer", consumer)
                    .with_context("data", name)
                    .with_context("attribute", attr),
                );
            }
        }
    }
}

/// Enforce schema-declared attribute constraints on one contract entry.
///
/// When the entry's type names a loaded schema, every `required`
/// attribute must be present, and an attribute with a declared
/// `expected` literal must equal it exactly.
pub fn check_schema_attributes(
    block: &str,
    data: &str,
    entry: &ContractEntry,
    schemas: &SchemaRegistry,
    report: &mut ValidationReport,
) {
    let Some(schema) = schemas.get(&entry.data_type) else {
        return;
    };

    for (attr, spec) in &schema.attributes {
        let value = entry.attributes.get(attr);
        if spec.required && value.is_none() {
            report.add(
                Diagnostic::error(
                    ErrorCode::RequiredAttributeMissing,
                    format!(
                        "'{}' in block '{}' is declared as {} which requires attribute '{}'",
                        data, block, schema.name, attr
                    ),
                )
                .with_context("block", block)
                .with_context("data", data)
                .with_context("schema", &schema.name)
                .with_context("attribute", attr),
            );
            continue;
        }
        if let (Some(expected), Some(actual)) = (&spec.expected, value)
            && actual != expected
        {
            report.add(
                Diagnostic::error(
                    ErrorCode::AttributeValueMismatch,
                    format!(
                        "'{}' in block '{}' sets attribute '{}' to {} but schema {} expects {}",
                        data, block, attr, actual, schema.name, expected
                    ),
                )
                .with_context("block", block)
                .with_context("data", data)
                .with_context("schema", &schema.name)
                .with_context("attribute", attr),
            );
        }
    }
}

/// Pass-scoped contract symbol table, keyed by block name.
///
/// Blocks register in document order; each registration first checks
/// the new block's inputs against every earlier block's outputs and
/// enforces schema attributes on both directions.
#[derive(Debug, Default)]
pub struct ContractTable {
    contracts: IndexMap<String, BlockContract>,
}

impl ContractTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a block's contract, checking it against earlier blocks.
    pub fn register(
        &mut self,
        block: &str,
        contract: BlockContract,
        schemas: &SchemaRegistry,
        report: &mut ValidationReport,
    ) {
        for (name, entry) in contract.inputs.iter().chain(contract.outputs.iter()) {
            if schemas.resolve_base_type(&entry.data_type).is_none() {
                report.add(
                    Diagnostic::warning(
                        ErrorCode::UnresolvedType,
                        format!(
                            "'{}' in block '{}' uses type '{}' which is neither built in nor defined by an imported schema",
                            name, block, entry.data_type
                        ),
                    )
                    .with_context("block", block)
                    .with_context("data", name)
                    .with_context("type", &entry.data_type),
                );
            }
            check_schema_attributes(block, name, entry, schemas, report);
        }
        for (producer, producer_contract) in &self.contracts {
            check_link(producer, producer_contract, block, &contract, schemas, report);
        }
        log::debug!(
            block = block,
            inputs = contract.inputs.len(),
            outputs = contract.outputs.len();
            "contract registered"
        );
        self.contracts.insert(block.to_owned(), contract);
    }

    /// Look up a registered contract.
    pub fn get(&self, block: &str) -> Option<&BlockContract> {
        self.contracts.get(block)
    }

    /// Drop all registered contracts.
    pub fn clear(&mut self) {
        self.contracts.clear();
    }

    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gfl_ast::from_yaml_str;

    fn entry(data_type: &str) -> ContractEntry {
        ContractEntry {
            data_type: data_type.to_owned(),
            attributes: IndexMap::new(),
        }
    }

    fn entry_with(data_type: &str, attrs: &[(&str, Node)]) -> ContractEntry {
        ContractEntry {
            data_type: data_type.to_owned(),
            attributes: attrs
                .iter()
                .map(|(k, v)| ((*k).to_owned(), v.clone()))
                .collect(),
        }
    }

    #[test]
    fn test_parse_contract() {
        let node = from_yaml_str(
            r#"
inputs:
  reads: FASTQ
outputs:
  alignment:
    type: BAM
    attributes:
      sorted: true
"#,
        )
        .unwrap();
        let mut report = ValidationReport::new();
        let contract = BlockContract::parse(&node, "experiment", &mut report);

        assert!(report.is_empty());
        assert_eq!(contract.inputs["reads"].data_type, "FASTQ");
        let alignment = &contract.outputs["alignment"];
        assert_eq!(alignment.data_type, "BAM");
        assert_eq!(alignment.attributes["sorted"], Node::Bool(true));
    }

    #[test]
    fn test_parse_skips_malformed_entry() {
        let node = from_yaml_str(
            r#"
outputs:
  good: VCF
  bad: 42
"#,
        )
        .unwrap();
        let mut report = ValidationReport::new();
        let contract = BlockContract::parse(&node, "analyze", &mut report);

        assert!(contract.outputs.contains_key("good"));
        assert!(!contract.outputs.contains_key("bad"));
        assert_eq!(report.errors().len(), 1);
        assert_eq!(report.errors()[0].code(), ErrorCode::Mismatch);
    }

    #[test]
    fn test_base_type_table() {
        let schemas = SchemaRegistry::new();
        assert!(types_compatible("BAM", "SAM", &schemas));
        assert!(types_compatible("SAM", "BAM", &schemas));
        assert!(types_compatible("BAM", "BINARY", &schemas));
        assert!(types_compatible("FASTQ", "TEXT", &schemas));
        assert!(types_compatible("VCF", "VCF", &schemas));
        assert!(!types_compatible("VCF", "JSON", &schemas));
        assert!(!types_compatible("TEXT", "FASTQ", &schemas));
    }

    #[test]
    fn test_compatible_link_with_boolean_attribute() {
        let mut producer = BlockContract::default();
        producer.outputs.insert(
            "alignment".to_owned(),
            entry_with("BAM", &[("sorted", Node::Bool(true))]),
        );
        let mut consumer = BlockContract::default();
        consumer.inputs.insert(
            "alignment".to_owned(),
            entry_with("SAM", &[("sorted", Node::Bool(true))]),
        );

        let schemas = SchemaRegistry::new();
        let mut report = ValidationReport::new();
        check_link("align", &producer, "call", &consumer, &schemas, &mut report);
        assert!(report.is_empty());
    }

    #[test]
    fn test_type_mismatch_reports_both_blocks() {
        let mut producer = BlockContract::default();
        producer.outputs.insert("variants".to_owned(), entry("VCF"));
        let mut consumer = BlockContract::default();
        consumer.inputs.insert("variants".to_owned(), entry("JSON"));

        let schemas = SchemaRegistry::new();
        let mut report = ValidationReport::new();
        check_link("call", &producer, "annotate", &consumer, &schemas, &mut report);

        assert_eq!(report.errors().len(), 1);
        let diag = report.errors()[0];
        assert_eq!(diag.code(), ErrorCode::ContractMismatch);
        assert!(diag.message().contains("call"));
        assert!(diag.message().contains("annotate"));
        assert!(diag.message().contains("variants"));
        assert!(diag.message().contains("VCF"));
        assert!(diag.message().contains("JSON"));
    }

    #[test]
    fn test_required_boolean_attribute_must_hold() {
        let mut producer = BlockContract::default();
        producer.outputs.insert("alignment".to_owned(), entry("BAM"));
        let mut consumer = BlockContract::default();
        consumer.inputs.insert(
            "alignment".to_owned(),
            entry_with("BAM", &[("sorted", Node::Bool(true))]),
        );

        let schemas = SchemaRegistry::new();
        let mut report = ValidationReport::new();
        check_link("align", &producer, "call", &consumer, &schemas, &mut report);

        assert_eq!(report.errors().len(), 1);
        assert_eq!(report.errors()[0].code(), ErrorCode::ContractMismatch);
    }

    #[test]
    fn test_non_boolean_attribute_mismatch_is_silent() {
        let mut producer = BlockContract::default();
        producer.outputs.insert(
            "alignment".to_owned(),
            entry_with("BAM", &[("aligner", Node::from("bwa"))]),
        );
        let mut consumer = BlockContract::default();
        consumer.inputs.insert(
            "alignment".to_owned(),
            entry_with("BAM", &[("aligner", Node::from("minimap2"))]),
        );

        let schemas = SchemaRegistry::new();
        let mut report = ValidationReport::new();
        check_link("align", &producer, "call", &consumer, &schemas, &mut report);
        assert!(report.is_empty());
    }

    #[test]
    fn test_missing_names_skip_silently() {
        let mut producer = BlockContract::default();
        producer.outputs.insert("alignment".to_owned(), entry("BAM"));
        let mut consumer = BlockContract::default();
        consumer.inputs.insert("reads".to_owned(), entry("FASTQ"));

        let schemas = SchemaRegistry::new();
        let mut report = ValidationReport::new();
        check_link("align", &producer, "trim", &consumer, &schemas, &mut report);
        assert!(report.is_empty());
    }

    fn registry_with_sorted_bam() -> SchemaRegistry {
        use std::io::Write;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("types.yml");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(
            br#"
schemas:
  SortedBam:
    type: BAM
    attributes:
      sorted:
        type: boolean
        required: true
        expected: true
"#,
        )
        .unwrap();
        let mut registry = SchemaRegistry::new();
        let mut report = ValidationReport::new();
        assert!(registry.load(&path, &mut report));
        registry
    }

    #[test]
    fn test_custom_types_resolve_through_schemas() {
        let schemas = registry_with_sorted_bam();
        assert!(types_compatible("SortedBam", "SAM", &schemas));
        assert!(types_compatible("BAM", "SortedBam", &schemas));
        assert!(!types_compatible("SortedBam", "Unknown", &schemas));
    }

    #[test]
    fn test_schema_required_attribute_enforced() {
        let schemas = registry_with_sorted_bam();
        let mut report = ValidationReport::new();

        check_schema_attributes("call", "alignment", &entry("SortedBam"), &schemas, &mut report);
        assert_eq!(report.errors().len(), 1);
        assert_eq!(report.errors()[0].code(), ErrorCode::RequiredAttributeMissing);
    }

    #[test]
    fn test_schema_expected_value_enforced() {
        let schemas = registry_with_sorted_bam();
        let mut report = ValidationReport::new();

        let wrong = entry_with("SortedBam", &[("sorted", Node::Bool(false))]);
        check_schema_attributes("call", "alignment", &wrong, &schemas, &mut report);
        assert_eq!(report.errors().len(), 1);
        assert_eq!(report.errors()[0].code(), ErrorCode::AttributeValueMismatch);

        let mut report = ValidationReport::new();
        let right = entry_with("SortedBam", &[("sorted", Node::Bool(true))]);
        check_schema_attributes("call", "alignment", &right, &schemas, &mut report);
        assert!(report.is_empty());
    }

    #[test]
    fn test_table_checks_later_blocks_against_earlier() {
        let mut producer = BlockContract::default();
        producer.outputs.insert("variants".to_owned(), entry("VCF"));
        let mut consumer = BlockContract::default();
        consumer.inputs.insert("variants".to_owned(), entry("JSON"));

        let schemas = SchemaRegistry::new();
        let mut report = ValidationReport::new();
        let mut table = ContractTable::new();
        table.register("call", producer, &schemas, &mut report);
        assert!(report.is_empty());

        table.register("annotate", consumer, &schemas, &mut report);
        assert_eq!(report.errors().len(), 1);
        assert_eq!(report.errors()[0].code(), ErrorCode::ContractMismatch);
        assert_eq!(table.len(), 2);
    }
}
