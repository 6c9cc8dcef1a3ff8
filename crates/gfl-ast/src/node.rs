//! The discriminated AST value type for GFL documents.
//!
//! The upstream parser emits a tree of [`Node`]s. Validators pattern-match
//! on the variants instead of probing untyped maps, so a missing shape
//! check is a compile-time exhaustiveness error rather than a runtime
//! surprise.

use std::fmt;

use indexmap::IndexMap;

use crate::location::{SourceLocation, Spanned};

/// One value in a GFL document tree.
///
/// Maps preserve document order: later validation phases compare blocks
/// in the order the author wrote them.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Spanned<Node>>),
    Map(IndexMap<String, Spanned<Node>>),
}

/// The shape of a [`Node`], used in diagnostic messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Null,
    Bool,
    Int,
    Float,
    Str,
    List,
    Map,
}

impl NodeKind {
    /// A human-readable name for this shape.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Null => "null",
            NodeKind::Bool => "boolean",
            NodeKind::Int => "integer",
            NodeKind::Float => "number",
            NodeKind::Str => "string",
            NodeKind::List => "list",
            NodeKind::Map => "mapping",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Node {
    /// The shape of this node.
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Null => NodeKind::Null,
            Node::Bool(_) => NodeKind::Bool,
            Node::Int(_) => NodeKind::Int,
            Node::Float(_) => NodeKind::Float,
            Node::Str(_) => NodeKind::Str,
            Node::List(_) => NodeKind::List,
            Node::Map(_) => NodeKind::Map,
        }
    }

    /// The string value, if this node is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The boolean value, if this node is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Node::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The integer value, if this node is an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Node::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// The numeric value, widening integers to floats.
    ///
    /// Integers are usable wherever a number is expected; the reverse
    /// does not hold.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Node::Int(i) => Some(*i as f64),
            Node::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// The list items, if this node is a list.
    pub fn as_list(&self) -> Option<&[Spanned<Node>]> {
        match self {
            Node::List(items) => Some(items),
            _ => None,
        }
    }

    /// The mapping entries, if this node is a mapping.
    pub fn as_map(&self) -> Option<&IndexMap<String, Spanned<Node>>> {
        match self {
            Node::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Look up a key in a mapping node.
    ///
    /// Returns `None` for non-mapping nodes as well as missing keys.
    pub fn get(&self, key: &str) -> Option<&Spanned<Node>> {
        self.as_map().and_then(|entries| entries.get(key))
    }

    /// Whether this node is a mapping containing the key.
    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Null => write!(f, "null"),
            Node::Bool(b) => write!(f, "{}", b),
            Node::Int(i) => write!(f, "{}", i),
            Node::Float(x) => write!(f, "{}", x),
            Node::Str(s) => write!(f, "{}", s),
            Node::List(items) => write!(f, "[{} items]", items.len()),
            Node::Map(entries) => write!(f, "{{{} entries}}", entries.len()),
        }
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::Str(value.to_owned())
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Node::Str(value)
    }
}

impl From<i64> for Node {
    fn from(value: i64) -> Self {
        Node::Int(value)
    }
}

impl From<f64> for Node {
    fn from(value: f64) -> Self {
        Node::Float(value)
    }
}

impl From<bool> for Node {
    fn from(value: bool) -> Self {
        Node::Bool(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_map() -> Node {
        let mut entries = IndexMap::new();
        entries.insert(
            "tool".to_owned(),
            Spanned::new(Node::from("CRISPR_cas9"), SourceLocation::new(2, 3)),
        );
        entries.insert(
            "replicates".to_owned(),
            Spanned::detached(Node::Int(3)),
        );
        Node::Map(entries)
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(Node::Null.kind().as_str(), "null");
        assert_eq!(Node::Int(1).kind().as_str(), "integer");
        assert_eq!(Node::from("x").kind().as_str(), "string");
        assert_eq!(Node::List(vec![]).kind().as_str(), "list");
    }

    #[test]
    fn test_get_on_mapping() {
        let map = sample_map();
        let tool = map.get("tool").unwrap();
        assert_eq!(tool.as_str(), Some("CRISPR_cas9"));
        assert_eq!(tool.location().line(), 2);
        assert!(map.get("missing").is_none());
    }

    #[test]
    fn test_get_on_scalar_is_none() {
        assert!(Node::Int(5).get("tool").is_none());
        assert!(!Node::Null.has("tool"));
    }

    #[test]
    fn test_as_number_widens_ints() {
        assert_eq!(Node::Int(3).as_number(), Some(3.0));
        assert_eq!(Node::Float(0.5).as_number(), Some(0.5));
        assert_eq!(Node::from("3").as_number(), None);
    }

    #[test]
    fn test_map_preserves_insertion_order() {
        let map = sample_map();
        let keys: Vec<_> = map.as_map().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["tool", "replicates"]);
    }
}
