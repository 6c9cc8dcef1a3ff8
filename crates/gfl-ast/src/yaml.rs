//! Bridge from YAML documents to [`Node`] trees.
//!
//! GFL documents and schema files are YAML on disk. This module converts
//! a parsed [`serde_yaml::Value`] into the typed [`Node`] tree the
//! validator consumes. It stands in for the upstream GFL parser in tests
//! and tooling; it performs no GFL-specific interpretation.

use indexmap::IndexMap;
use thiserror::Error;

use crate::location::Spanned;
use crate::node::Node;

/// Errors converting YAML into a [`Node`] tree.
#[derive(Debug, Error)]
pub enum AstError {
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("mapping key is not a string (found {found})")]
    NonStringKey { found: &'static str },

    #[error("unrepresentable number: {0}")]
    UnrepresentableNumber(String),
}

/// Parse a YAML document into a [`Node`] tree.
///
/// `serde_yaml` does not expose per-node positions, so every node carries
/// the document start location. A position-tracking parser can build the
/// same tree with real locations.
pub fn from_yaml_str(source: &str) -> Result<Spanned<Node>, AstError> {
    let value: serde_yaml::Value = serde_yaml::from_str(source)?;
    Ok(Spanned::detached(from_yaml_value(value)?))
}

/// Convert one YAML value into a [`Node`].
pub fn from_yaml_value(value: serde_yaml::Value) -> Result<Node, AstError> {
    match value {
        serde_yaml::Value::Null => Ok(Node::Null),
        serde_yaml::Value::Bool(b) => Ok(Node::Bool(b)),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Node::Int(i))
            } else if let Some(f) = n.as_f64() {
                Ok(Node::Float(f))
            } else {
                Err(AstError::UnrepresentableNumber(n.to_string()))
            }
        }
        serde_yaml::Value::String(s) => Ok(Node::Str(s)),
        serde_yaml::Value::Sequence(items) => {
            let mut nodes = Vec::with_capacity(items.len());
            for item in items {
                nodes.push(Spanned::detached(from_yaml_value(item)?));
            }
            Ok(Node::List(nodes))
        }
        serde_yaml::Value::Mapping(mapping) => {
            let mut entries = IndexMap::with_capacity(mapping.len());
            for (key, val) in mapping {
                let key = match key {
                    serde_yaml::Value::String(s) => s,
                    other => {
                        return Err(AstError::NonStringKey {
                            found: yaml_kind(&other),
                        });
                    }
                };
                entries.insert(key, Spanned::detached(from_yaml_value(val)?));
            }
            Ok(Node::Map(entries))
        }
        serde_yaml::Value::Tagged(tagged) => from_yaml_value(tagged.value),
    }
}

fn yaml_kind(value: &serde_yaml::Value) -> &'static str {
    match value {
        serde_yaml::Value::Null => "null",
        serde_yaml::Value::Bool(_) => "boolean",
        serde_yaml::Value::Number(_) => "number",
        serde_yaml::Value::String(_) => "string",
        serde_yaml::Value::Sequence(_) => "sequence",
        serde_yaml::Value::Mapping(_) => "mapping",
        serde_yaml::Value::Tagged(_) => "tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalars() {
        let doc = from_yaml_str("value: 3").unwrap();
        assert_eq!(doc.get("value").unwrap().as_int(), Some(3));

        let doc = from_yaml_str("value: 0.25").unwrap();
        assert_eq!(doc.get("value").unwrap().as_number(), Some(0.25));

        let doc = from_yaml_str("value: true").unwrap();
        assert_eq!(doc.get("value").unwrap().as_bool(), Some(true));
    }

    #[test]
    fn test_nested_document() {
        let doc = from_yaml_str(
            r#"
experiment:
  tool: CRISPR_cas9
  params:
    replicates: 3
"#,
        )
        .unwrap();

        let experiment = doc.get("experiment").unwrap();
        assert_eq!(
            experiment.get("tool").and_then(|n| n.as_str().map(String::from)),
            Some("CRISPR_cas9".to_owned())
        );
        let params = experiment.get("params").unwrap();
        assert_eq!(params.get("replicates").unwrap().as_int(), Some(3));
    }

    #[test]
    fn test_sequence() {
        let doc = from_yaml_str("items: [a, b, c]").unwrap();
        let items = doc.get("items").unwrap().as_list().unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[1].as_str(), Some("b"));
    }

    #[test]
    fn test_mapping_order_preserved() {
        let doc = from_yaml_str("z: 1\na: 2\nm: 3").unwrap();
        let keys: Vec<_> = doc.as_map().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_non_string_key_rejected() {
        let err = from_yaml_str("1: value").unwrap_err();
        assert!(matches!(err, AstError::NonStringKey { .. }));
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        assert!(from_yaml_str("key: [unclosed").is_err());
    }
}
