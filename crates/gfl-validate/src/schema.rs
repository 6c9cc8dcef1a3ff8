//! Schema registry for external custom-type definitions.
//!
//! GFL documents can import schema files that define custom contract
//! types on top of the built-in base types:
//!
//! ```yaml
//! schemas:
//!   SortedBam:
//!     type: BAM
//!     description: Coordinate-sorted alignment file
//!     attributes:
//!       sorted:
//!         type: boolean
//!         required: true
//!         expected: true
//! ```
//!
//! Loading is lenient: each malformed entry emits a diagnostic and is
//! skipped, so one bad schema never hides the rest of the file. Only an
//! IO or YAML parse failure is fatal for a file.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;

use gfl_ast::Node;

use crate::diag::{Diagnostic, ErrorCode, ValidationReport};

/// Built-in contract base types every engine understands.
pub const BUILTIN_BASE_TYPES: &[&str] = &[
    "FASTQ", "FASTA", "BAM", "SAM", "VCF", "CSV", "JSON", "TEXT", "BINARY",
];

/// Whether `name` is one of the built-in base types.
pub fn is_builtin_base_type(name: &str) -> bool {
    BUILTIN_BASE_TYPES.contains(&name)
}

/// Constraints on one attribute of a custom type.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeSpec {
    /// Declared attribute type (`"boolean"`, `"string"`, ...).
    pub attr_type: String,
    /// Whether contracts of this type must carry the attribute.
    pub required: bool,
    /// A literal value the attribute must equal exactly, if declared.
    pub expected: Option<Node>,
}

/// One custom type definition loaded from a schema file.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDefinition {
    pub name: String,
    pub base_type: String,
    pub attributes: IndexMap<String, AttributeSpec>,
    pub description: Option<String>,
}

impl SchemaDefinition {
    /// Whether the base type refers to another custom type rather than a
    /// built-in.
    pub fn has_custom_base(&self) -> bool {
        !is_builtin_base_type(&self.base_type)
    }
}

/// Serde shape of one schema entry on disk.
#[derive(Debug, Deserialize)]
struct RawSchema {
    #[serde(rename = "type")]
    base_type: String,
    #[serde(default)]
    attributes: IndexMap<String, RawAttribute>,
    #[serde(default)]
    description: Option<String>,
}

/// An attribute is either a bare type string or a full constraint map.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawAttribute {
    TypeOnly(String),
    Full {
        #[serde(rename = "type")]
        attr_type: String,
        #[serde(default)]
        required: bool,
        #[serde(default)]
        expected: Option<serde_yaml::Value>,
    },
}

/// Name → definition map plus the set of already-loaded files.
///
/// The registry is pass-scoped: [`SchemaRegistry::clear`] runs at the
/// start of every validation pass because imports vary per document.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schemas: IndexMap<String, SchemaDefinition>,
    loaded: HashSet<PathBuf>,
}

impl SchemaRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a schema file, appending findings to `report`.
    ///
    /// Returns `false` only on IO or YAML parse failure; malformed
    /// entries are skipped individually. Loading an already-loaded path
    /// again is a no-op returning `true`.
    pub fn load(&mut self, path: &Path, report: &mut ValidationReport) -> bool {
        let canonical = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        if self.loaded.contains(&canonical) {
            log::debug!(path = canonical.display().to_string().as_str(); "schema file already loaded");
            return true;
        }

        let source = match fs::read_to_string(path) {
            Ok(source) => source,
            Err(err) => {
                report.add(
                    Diagnostic::error(
                        ErrorCode::IoError,
                        format!("cannot read schema file '{}': {}", path.display(), err),
                    )
                    .with_context("path", path.display().to_string()),
                );
                return false;
            }
        };

        let root: serde_yaml::Value = match serde_yaml::from_str(&source) {
            Ok(root) => root,
            Err(err) => {
                report.add(
                    Diagnostic::error(
                        ErrorCode::ParseError,
                        format!("schema file '{}' is not valid YAML: {}", path.display(), err),
                    )
                    .with_context("path", path.display().to_string()),
                );
                return false;
            }
        };

        let Some(entries) = root
            .as_mapping()
            .and_then(|m| m.get("schemas"))
            .and_then(serde_yaml::Value::as_mapping)
        else {
            report.add(
                Diagnostic::error(
                    ErrorCode::ParseError,
                    format!(
                        "schema file '{}' must be a mapping with a 'schemas' mapping",
                        path.display()
                    ),
                )
                .with_context("path", path.display().to_string()),
            );
            return false;
        };

        for (key, value) in entries {
            let Some(name) = key.as_str() else {
                report.add(
                    Diagnostic::error(
                        ErrorCode::MalformedEntry,
                        format!("schema name in '{}' is not a string", path.display()),
                    )
                    .with_context("path", path.display().to_string()),
                );
                continue;
            };
            match self.parse_entry(name, value.clone()) {
                Ok(schema) => {
                    log::debug!(schema = name; "schema loaded");
                    self.schemas.insert(name.to_owned(), schema);
                }
                Err(reason) => {
                    report.add(
                        Diagnostic::error(
                            ErrorCode::MalformedEntry,
                            format!("schema '{}' is malformed and was skipped: {}", name, reason),
                        )
                        .with_context("schema", name)
                        .with_context("path", path.display().to_string()),
                    );
                }
            }
        }

        // A chain that never reaches a built-in base type can only come
        // from the file just loaded.
        self.check_termination(report);

        self.loaded.insert(canonical);
        true
    }

    fn parse_entry(&self, name: &str, value: serde_yaml::Value) -> Result<SchemaDefinition, String> {
        let raw: RawSchema = serde_yaml::from_value(value).map_err(|e| e.to_string())?;
        if raw.base_type.is_empty() {
            return Err("'type' must be a non-empty string".to_owned());
        }

        let mut attributes = IndexMap::with_capacity(raw.attributes.len());
        for (attr_name, attr) in raw.attributes {
            let spec = match attr {
                RawAttribute::TypeOnly(attr_type) => AttributeSpec {
                    attr_type,
                    required: false,
                    expected: None,
                },
                RawAttribute::Full {
                    attr_type,
                    required,
                    expected,
                } => {
                    let expected = match expected {
                        Some(value) => Some(
                            gfl_ast::from_yaml_value(value)
                                .map_err(|e| format!("attribute '{}': {}", attr_name, e))?,
                        ),
                        None => None,
                    };
                    AttributeSpec {
                        attr_type,
                        required,
                        expected,
                    }
                }
            };
            attributes.insert(attr_name, spec);
        }

        Ok(SchemaDefinition {
            name: name.to_owned(),
            base_type: raw.base_type,
            attributes,
            description: raw.description,
        })
    }

    fn check_termination(&self, report: &mut ValidationReport) {
        for name in self.schemas.keys() {
            if self.resolve_base_type(name).is_none() {
                report.add(
                    Diagnostic::warning(
                        ErrorCode::CircularDefinition,
                        format!(
                            "custom type '{}' does not resolve to a built-in base type",
                            name
                        ),
                    )
                    .with_context("schema", name),
                );
            }
        }
    }

    /// Look up a loaded schema by name.
    pub fn get(&self, name: &str) -> Option<&SchemaDefinition> {
        self.schemas.get(name)
    }

    /// Whether a schema with this name is loaded.
    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// Resolve a type name to its built-in base type.
    ///
    /// Built-in names resolve to themselves. Custom names follow their
    /// `base_type` chain; a chain that cycles or dead-ends on an unknown
    /// custom name yields `None`.
    pub fn resolve_base_type<'a>(&'a self, name: &'a str) -> Option<&'a str> {
        let mut current = name;
        let mut visited: HashSet<&str> = HashSet::new();
        loop {
            if is_builtin_base_type(current) {
                return Some(current);
            }
            if !visited.insert(current) {
                return None;
            }
            current = &self.schemas.get(current)?.base_type;
        }
    }

    /// Remove all schemas and forget loaded paths.
    ///
    /// Runs at the start of every validation pass.
    pub fn clear(&mut self) {
        self.schemas.clear();
        self.loaded.clear();
    }

    /// Number of loaded schemas.
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Whether the registry holds no schemas.
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_schema_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    const SORTED_BAM: &str = r#"
schemas:
  SortedBam:
    type: BAM
    description: Coordinate-sorted alignment file
    attributes:
      sorted:
        type: boolean
        required: true
        expected: true
  VariantTable:
    type: CSV
    attributes:
      delimiter: string
"#;

    #[test]
    fn test_load_and_get() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_schema_file(&dir, "types.yml", SORTED_BAM);

        let mut registry = SchemaRegistry::new();
        let mut report = ValidationReport::new();
        assert!(registry.load(&path, &mut report));
        assert!(report.is_empty());

        let schema = registry.get("SortedBam").unwrap();
        assert_eq!(schema.base_type, "BAM");
        assert_eq!(schema.description.as_deref(), Some("Coordinate-sorted alignment file"));
        let sorted = &schema.attributes["sorted"];
        assert!(sorted.required);
        assert_eq!(sorted.expected, Some(Node::Bool(true)));

        // Shorthand attribute form.
        let table = registry.get("VariantTable").unwrap();
        let delim = &table.attributes["delimiter"];
        assert_eq!(delim.attr_type, "string");
        assert!(!delim.required);
    }

    #[test]
    fn test_reload_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_schema_file(&dir, "types.yml", SORTED_BAM);

        let mut registry = SchemaRegistry::new();
        let mut report = ValidationReport::new();
        assert!(registry.load(&path, &mut report));
        let count = registry.len();

        assert!(registry.load(&path, &mut report));
        assert_eq!(registry.len(), count);
        assert!(report.is_empty());
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let mut registry = SchemaRegistry::new();
        let mut report = ValidationReport::new();
        assert!(!registry.load(Path::new("/nonexistent/types.yml"), &mut report));
        assert_eq!(report.errors().len(), 1);
        assert_eq!(report.errors()[0].code(), ErrorCode::IoError);
    }

    #[test]
    fn test_invalid_yaml_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_schema_file(&dir, "bad.yml", "schemas: [unclosed");

        let mut registry = SchemaRegistry::new();
        let mut report = ValidationReport::new();
        assert!(!registry.load(&path, &mut report));
        assert_eq!(report.errors()[0].code(), ErrorCode::ParseError);
    }

    #[test]
    fn test_missing_schemas_key_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_schema_file(&dir, "bad.yml", "types:\n  A:\n    type: BAM\n");

        let mut registry = SchemaRegistry::new();
        let mut report = ValidationReport::new();
        assert!(!registry.load(&path, &mut report));
        assert_eq!(report.errors()[0].code(), ErrorCode::ParseError);
    }

    #[test]
    fn test_malformed_entry_is_skipped_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_schema_file(
            &dir,
            "partial.yml",
            r#"
schemas:
  Good:
    type: VCF
  Bad:
    attributes: not-a-mapping
"#,
        );

        let mut registry = SchemaRegistry::new();
        let mut report = ValidationReport::new();
        assert!(registry.load(&path, &mut report));

        assert!(registry.contains("Good"));
        assert!(!registry.contains("Bad"));
        let malformed: Vec<_> = report
            .diagnostics()
            .iter()
            .filter(|d| d.code() == ErrorCode::MalformedEntry)
            .collect();
        assert_eq!(malformed.len(), 1);
    }

    #[test]
    fn test_resolve_base_type_through_chain() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_schema_file(
            &dir,
            "chain.yml",
            r#"
schemas:
  SortedBam:
    type: BAM
  DedupedBam:
    type: SortedBam
"#,
        );

        let mut registry = SchemaRegistry::new();
        let mut report = ValidationReport::new();
        assert!(registry.load(&path, &mut report));

        assert_eq!(registry.resolve_base_type("DedupedBam"), Some("BAM"));
        assert_eq!(registry.resolve_base_type("SortedBam"), Some("BAM"));
        assert_eq!(registry.resolve_base_type("BAM"), Some("BAM"));
        assert_eq!(registry.resolve_base_type("Unknown"), None);
    }

    #[test]
    fn test_cycle_yields_none_and_warning() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_schema_file(
            &dir,
            "cycle.yml",
            r#"
schemas:
  A:
    type: B
  B:
    type: A
"#,
        );

        let mut registry = SchemaRegistry::new();
        let mut report = ValidationReport::new();
        assert!(registry.load(&path, &mut report));

        assert_eq!(registry.resolve_base_type("A"), None);
        let cycles: Vec<_> = report
            .diagnostics()
            .iter()
            .filter(|d| d.code() == ErrorCode::CircularDefinition)
            .collect();
        assert_eq!(cycles.len(), 2);
        // Cycle findings are warnings; the document stays valid.
        assert!(report.is_valid());
    }

    #[test]
    fn test_clear_forgets_loaded_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_schema_file(&dir, "types.yml", SORTED_BAM);

        let mut registry = SchemaRegistry::new();
        let mut report = ValidationReport::new();
        registry.load(&path, &mut report);
        assert!(!registry.is_empty());

        registry.clear();
        assert!(registry.is_empty());
        // After clear the same path loads fresh again.
        assert!(registry.load(&path, &mut report));
        assert_eq!(registry.len(), 2);
    }
}
