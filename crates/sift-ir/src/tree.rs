//! The canonical Boolean query tree.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single search term inside a strategy.
///
/// A keyword carries the phrase to search, the canonical fields to search it
/// in, whether a MeSH heading should be exploded to its descendants, and
/// whether the term was truncated with a wildcard. Keywords are created by a
/// dialect parser and never modified afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyword {
    /// The textual term, possibly phrase-quoted, possibly containing `*`.
    #[serde(rename = "query")]
    pub query_string: String,

    /// Canonical fields to search. Empty only when an enclosing group is
    /// expected to supply fields.
    pub fields: Vec<String>,

    /// Whether a MeSH heading matches all of its tree descendants.
    #[serde(default)]
    pub exploded: bool,

    /// Whether the term contained a wildcard character at parse time.
    #[serde(default)]
    pub truncated: bool,
}

impl Keyword {
    /// Creates a keyword searching `query_string` in `fields`.
    pub fn new(query_string: impl Into<String>, fields: Vec<String>) -> Self {
        Self {
            query_string: query_string.into(),
            fields,
            exploded: false,
            truncated: false,
        }
    }
}

/// A Boolean query grouping keywords and sub-queries under one operator.
///
/// The tree is prefix-shaped: one operator per node, applied to all of the
/// node's keywords and children together, so a query is never ambiguous.
/// The empty operator is permitted only as a pass-through wrapper around a
/// single child; backends flatten it away.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BooleanQuery {
    /// A Boolean operator (`and`, `or`, `not`, `adj`, `adj2`, …).
    pub operator: String,

    /// Keywords grouped directly under this operator.
    pub keywords: Vec<Keyword>,

    /// Nested sub-queries.
    pub children: Vec<BooleanQuery>,

    /// Pass-through annotations carried from and to the CQR form.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub options: Map<String, Value>,
}

impl BooleanQuery {
    /// Creates an empty query with the given operator.
    pub fn with_operator(operator: impl Into<String>) -> Self {
        Self {
            operator: operator.into(),
            ..Self::default()
        }
    }

    /// Whether this node is a pass-through wrapper with nothing of its own.
    pub fn is_wrapper(&self) -> bool {
        self.operator.is_empty() && self.keywords.is_empty()
    }

    /// Extracts every query term in depth-first order.
    pub fn terms(&self) -> Vec<String> {
        let mut terms: Vec<String> = self
            .keywords
            .iter()
            .map(|k| k.query_string.clone())
            .collect();
        for child in &self.children {
            terms.extend(child.terms());
        }
        terms
    }

    /// Extracts every field reference in depth-first order, with repeats.
    pub fn fields(&self) -> Vec<String> {
        let mut fields: Vec<String> = self
            .keywords
            .iter()
            .flat_map(|k| k.fields.iter().cloned())
            .collect();
        for child in &self.children {
            fields.extend(child.fields());
        }
        fields
    }

    /// Counts how often each field is referenced across the whole query.
    pub fn field_count(&self) -> HashMap<String, usize> {
        let mut counts = HashMap::new();
        for field in self.fields() {
            *counts.entry(field).or_insert(0) += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields;

    fn keyword(text: &str, fields: &[&str]) -> Keyword {
        Keyword::new(text, fields.iter().map(|f| f.to_string()).collect())
    }

    fn sample() -> BooleanQuery {
        BooleanQuery {
            operator: "or".into(),
            keywords: vec![keyword("OSA", &[fields::TITLE, fields::ABSTRACT])],
            children: vec![BooleanQuery {
                operator: "and".into(),
                keywords: vec![
                    keyword("sleep*", &[fields::TITLE]),
                    keyword("apnoea*", &[fields::TITLE]),
                ],
                ..BooleanQuery::default()
            }],
            ..BooleanQuery::default()
        }
    }

    #[test]
    fn terms_cover_children() {
        assert_eq!(sample().terms(), vec!["OSA", "sleep*", "apnoea*"]);
    }

    #[test]
    fn fields_repeat_per_keyword() {
        assert_eq!(
            sample().fields(),
            vec!["title", "text", "title", "title"]
        );
    }

    #[test]
    fn field_count_aggregates() {
        let counts = sample().field_count();
        assert_eq!(counts["title"], 3);
        assert_eq!(counts["text"], 1);
    }

    #[test]
    fn wrapper_detection() {
        let mut query = BooleanQuery::default();
        query.children.push(sample());
        assert!(query.is_wrapper());
        assert!(!sample().is_wrapper());
    }

    #[test]
    fn keyword_serde_uses_query_key() {
        let json = serde_json::to_value(keyword("heart", &[fields::TITLE])).unwrap();
        assert_eq!(json["query"], "heart");
        assert_eq!(json["fields"][0], "title");
    }
}
