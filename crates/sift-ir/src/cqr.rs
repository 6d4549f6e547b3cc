//! The Common Query Representation (CQR) interchange form.
//!
//! CQR is the JSON shape used to move queries between tools: a leaf is
//! `{"query": …, "fields": […], "options": {"exploded": …, "truncated": …}}`
//! and an inner node is `{"operator": …, "children": […]}` with optional
//! pass-through `options`. The CQR parser accepts this shape and the CQR
//! backend emits it, so a query can round-trip without loss.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Options attached to a CQR leaf.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordOptions {
    /// Whether a MeSH heading matches its descendants.
    #[serde(default)]
    pub exploded: bool,
    /// Whether the term carries a wildcard.
    #[serde(default)]
    pub truncated: bool,
}

/// One node of a CQR document.
///
/// The two shapes are distinguished purely by their keys: anything with an
/// `operator` is a Boolean node, anything with a `query` is a keyword leaf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CqrNode {
    /// An operator applied to child nodes.
    Boolean {
        /// The operator, stored exactly as written (consumers may use `OR`).
        operator: String,
        /// Operand nodes.
        children: Vec<CqrNode>,
        /// Pass-through annotations.
        #[serde(default, skip_serializing_if = "Map::is_empty")]
        options: Map<String, Value>,
    },
    /// A keyword leaf.
    Keyword {
        /// The search term.
        query: String,
        /// Canonical fields to search.
        #[serde(default)]
        fields: Vec<String>,
        /// Exploded/truncated markers.
        #[serde(default)]
        options: KeywordOptions,
    },
}

impl CqrNode {
    /// Creates a keyword leaf.
    pub fn keyword(
        query: impl Into<String>,
        fields: Vec<String>,
        exploded: bool,
        truncated: bool,
    ) -> Self {
        Self::Keyword {
            query: query.into(),
            fields,
            options: KeywordOptions {
                exploded,
                truncated,
            },
        }
    }

    /// Creates a Boolean node.
    pub fn boolean(operator: impl Into<String>, children: Vec<CqrNode>) -> Self {
        Self::Boolean {
            operator: operator.into(),
            children,
            options: Map::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaf_parses_without_operator_key() {
        let node: CqrNode = serde_json::from_str(
            r#"{"query": "heart attack", "fields": ["title"], "options": {"exploded": false, "truncated": true}}"#,
        )
        .unwrap();
        match node {
            CqrNode::Keyword {
                query, options, ..
            } => {
                assert_eq!(query, "heart attack");
                assert!(options.truncated);
                assert!(!options.exploded);
            }
            CqrNode::Boolean { .. } => panic!("expected a keyword leaf"),
        }
    }

    #[test]
    fn boolean_parses_with_children() {
        let node: CqrNode = serde_json::from_str(
            r#"{"operator": "OR", "children": [{"query": "a", "fields": ["title"]}]}"#,
        )
        .unwrap();
        match node {
            CqrNode::Boolean {
                operator, children, ..
            } => {
                assert_eq!(operator, "OR");
                assert_eq!(children.len(), 1);
            }
            CqrNode::Keyword { .. } => panic!("expected a boolean node"),
        }
    }

    #[test]
    fn leaf_defaults_apply() {
        let node: CqrNode = serde_json::from_str(r#"{"query": "a"}"#).unwrap();
        assert_eq!(
            node,
            CqrNode::keyword("a", Vec::new(), false, false)
        );
    }

    #[test]
    fn serialization_round_trips() {
        let node = CqrNode::boolean(
            "and",
            vec![
                CqrNode::keyword("a", vec!["title".into()], false, false),
                CqrNode::keyword("b*", vec!["text".into()], false, true),
            ],
        );
        let json = serde_json::to_string(&node).unwrap();
        let back: CqrNode = serde_json::from_str(&json).unwrap();
        assert_eq!(node, back);
    }
}
