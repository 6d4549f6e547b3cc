//! Compiler from the canonical tree to the Elasticsearch query DSL.
//!
//! The output is wrapped as `{query: {constant_score: {filter: …}}}` so the
//! engine skips scoring entirely; Boolean retrieval has no use for it. The
//! operator mapping is `or → should`, `and → filter`, `not → must_not`
//! (rewritten into a positive and a negative side), and `adjN → span_near`.

use std::sync::Arc;

use serde_json::{json, Map, Value};
use sift_ir::{BooleanQuery, Keyword};

use crate::{
    error::BackendError,
    mesh::MeshProvider,
    Backend, CompiledQuery,
};

/// The Elasticsearch compiler.
///
/// A [`MeshProvider`] supplied at construction turns exploded MeSH headings
/// into sibling keywords for every descendant; without one, exploded
/// keywords compile as-is. The default slop governs a bare `adj` with no
/// distance.
pub struct ElasticsearchBackend {
    mesh: Option<Arc<dyn MeshProvider>>,
    default_slop: u64,
}

impl Default for ElasticsearchBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ElasticsearchBackend {
    /// A compiler with no MeSH tree and a default slop of 0.
    pub fn new() -> Self {
        Self {
            mesh: None,
            default_slop: 0,
        }
    }

    /// Attaches a MeSH tree for explosion.
    pub fn with_mesh_provider(mut self, provider: Arc<dyn MeshProvider>) -> Self {
        self.mesh = Some(provider);
        self
    }

    /// Sets the slop used for a bare `adj` operator.
    pub fn with_default_slop(mut self, slop: u64) -> Self {
        self.default_slop = slop;
        self
    }

    /// Lowers one group of the tree.
    fn group(&self, query: &BooleanQuery) -> Result<Value, BackendError> {
        if query.is_wrapper() && query.children.len() == 1 {
            return self.group(&query.children[0]);
        }

        let keywords = self.explode(&query.keywords)?;
        let operator = query.operator.to_lowercase();

        if is_adjacency(&operator) {
            return self.adjacency(&operator, &keywords, &query.children);
        }

        match operator.as_str() {
            "or" => self.boolean_group("should", &keywords, &query.children),
            "and" => self.boolean_group("filter", &keywords, &query.children),
            "not" => self.negation(&keywords, &query.children),
            "" => Err(BackendError::MissingOperator),
            // Anything else passes through as the group label.
            _ => self.boolean_group(&query.operator, &keywords, &query.children),
        }
    }

    /// Emits `{bool: {<grouping>: [clauses…], disable_coord: true}}`.
    fn boolean_group(
        &self,
        grouping: &str,
        keywords: &[Keyword],
        children: &[BooleanQuery],
    ) -> Result<Value, BackendError> {
        let mut clauses = Vec::with_capacity(keywords.len() + children.len());
        for keyword in keywords {
            clauses.push(keyword_clause(keyword)?);
        }
        for child in children {
            clauses.push(self.group(child)?);
        }
        Ok(bool_group(grouping, clauses))
    }

    /// Rewrites a `not` node into a negative and a positive side under a
    /// single filter, choosing the first operand as the positive one.
    fn negation(
        &self,
        keywords: &[Keyword],
        children: &[BooleanQuery],
    ) -> Result<Value, BackendError> {
        let (positives, negatives) = if children.len() > 1 && keywords.is_empty() {
            let positives = vec![self.group(&children[0])?];
            let negatives = children[1..]
                .iter()
                .map(|child| self.group(child))
                .collect::<Result<Vec<_>, _>>()?;
            (positives, negatives)
        } else if keywords.len() > 1 && children.is_empty() {
            let positives = vec![keyword_clause(&keywords[0])?];
            let negatives = keywords[1..]
                .iter()
                .map(keyword_clause)
                .collect::<Result<Vec<_>, _>>()?;
            (positives, negatives)
        } else if keywords.len() == 1 && !children.is_empty() {
            let positives = vec![keyword_clause(&keywords[0])?];
            let negatives = children
                .iter()
                .map(|child| self.group(child))
                .collect::<Result<Vec<_>, _>>()?;
            (positives, negatives)
        } else {
            return Err(BackendError::NotOperands);
        };

        Ok(bool_group(
            "filter",
            vec![
                bool_group("must_not", negatives),
                bool_group("filter", positives),
            ],
        ))
    }

    /// Lowers an `adjN` group into per-field `span_near` queries.
    ///
    /// Each immediate keyword and each `or`-grouped child contributes one
    /// span clause per field; fields are then cross-multiplied into one
    /// unordered `span_near` each, wrapped together in a `bool.should`.
    fn adjacency(
        &self,
        operator: &str,
        keywords: &[Keyword],
        children: &[BooleanQuery],
    ) -> Result<Value, BackendError> {
        let slop = self.slop(operator)?;

        // BTreeMap keeps the per-field output order stable.
        let mut per_field: std::collections::BTreeMap<String, Vec<Value>> = Default::default();
        let mut add = |keyword: &Keyword| -> Result<(), BackendError> {
            if keyword.fields.is_empty() {
                return Err(BackendError::MissingFields(keyword.query_string.clone()));
            }
            for field in &keyword.fields {
                per_field
                    .entry(field.clone())
                    .or_default()
                    .push(span_clause(field, keyword));
            }
            Ok(())
        };

        for keyword in keywords {
            add(keyword)?;
        }
        for child in children {
            let child_operator = child.operator.to_lowercase();
            let promoted_leaf = child.operator.is_empty() && child.children.is_empty();
            if child_operator != "or" && !promoted_leaf {
                return Err(BackendError::UnsupportedSlopChild(child.operator.clone()));
            }
            for keyword in self.explode(&child.keywords)? {
                add(&keyword)?;
            }
        }

        let spans: Vec<Value> = per_field
            .into_values()
            .map(|clauses| {
                json!({
                    "span_near": {
                        "clauses": clauses,
                        "slop": slop,
                        "in_order": false,
                    }
                })
            })
            .collect();

        Ok(json!({ "bool": { "should": spans } }))
    }

    /// Parses the adjacency distance from the operator suffix.
    fn slop(&self, operator: &str) -> Result<u64, BackendError> {
        let digits = &operator[3..];
        if digits.is_empty() {
            return Ok(self.default_slop);
        }
        digits
            .parse::<u64>()
            .ok()
            .filter(|n| (1..=99).contains(n))
            .ok_or_else(|| BackendError::InvalidAdjacency(operator.to_string()))
    }

    /// Expands exploded MeSH keywords through the tree provider, inserting
    /// one sibling keyword per descendant with the same fields.
    fn explode(&self, keywords: &[Keyword]) -> Result<Vec<Keyword>, BackendError> {
        let Some(provider) = &self.mesh else {
            return Ok(keywords.to_vec());
        };

        let mut expanded = Vec::with_capacity(keywords.len());
        for keyword in keywords {
            expanded.push(keyword.clone());
            if keyword.exploded {
                for descendant in provider.descendants(&keyword.query_string)? {
                    expanded.push(Keyword {
                        query_string: descendant,
                        fields: keyword.fields.clone(),
                        exploded: false,
                        truncated: false,
                    });
                }
            }
        }
        Ok(expanded)
    }
}

impl Backend for ElasticsearchBackend {
    fn compile(&self, query: &BooleanQuery) -> Result<CompiledQuery, BackendError> {
        let body = self.group(query)?;
        Ok(CompiledQuery::Elasticsearch(json!({
            "query": { "constant_score": { "filter": body } }
        })))
    }
}

/// Lowers one keyword outside of adjacency.
///
/// The clause shape depends on the field count and the query content: a
/// wildcard becomes a `query_string` clause, a phrase a `match_phrase`, and
/// a plain term a `match`; multiple fields fan out into a `bool.should`.
fn keyword_clause(keyword: &Keyword) -> Result<Value, BackendError> {
    let text = &keyword.query_string;

    match keyword.fields.as_slice() {
        [] => Err(BackendError::MissingFields(text.clone())),
        [field] => {
            if text.contains(['*', '?']) {
                Ok(query_string_clause(field, text))
            } else if text.contains(' ') {
                Ok(fielded("match_phrase", field, text))
            } else {
                Ok(fielded("match", field, text))
            }
        }
        fields => {
            let clauses: Vec<Value> = if text.contains(['*', '?', '~']) {
                fields
                    .iter()
                    .map(|field| query_string_clause(field, text))
                    .collect()
            } else if text.contains(' ') {
                fields
                    .iter()
                    .map(|field| fielded("match_phrase", field, text))
                    .collect()
            } else {
                fields
                    .iter()
                    .map(|field| fielded("match", field, text))
                    .collect()
            };
            Ok(json!({ "bool": { "should": clauses } }))
        }
    }
}

/// Lowers one keyword to a span clause on one field for adjacency.
fn span_clause(field: &str, keyword: &Keyword) -> Value {
    let text = &keyword.query_string;

    if text.contains(['*', '?']) {
        json!({ "span_multi": { "match": { "wildcard": fielded_value(field, text) } } })
    } else if keyword.truncated {
        // Truncation survived parsing but the wildcard character did not, so
        // a prefix match is the closest span.
        json!({ "span_multi": { "match": { "prefix": fielded_value(field, text) } } })
    } else if text.contains(' ') {
        let words: Vec<Value> = text
            .split_whitespace()
            .map(|word| json!({ "span_term": fielded_value(field, word) }))
            .collect();
        json!({ "span_near": { "clauses": words, "slop": 1, "in_order": true } })
    } else {
        json!({ "span_term": fielded_value(field, text) })
    }
}

/// `{bool: {<grouping>: clauses, disable_coord: true}}` with a runtime
/// grouping name.
fn bool_group(grouping: &str, clauses: Vec<Value>) -> Value {
    let mut body = Map::new();
    body.insert(grouping.to_string(), Value::Array(clauses));
    body.insert("disable_coord".to_string(), Value::Bool(true));
    let mut outer = Map::new();
    outer.insert("bool".to_string(), Value::Object(body));
    Value::Object(outer)
}

fn query_string_clause(field: &str, text: &str) -> Value {
    json!({
        "query_string": {
            "query": format!("{field}:{text}"),
            "analyze_wildcard": true,
            "split_on_whitespace": false,
        }
    })
}

/// `{kind: {field: value}}` with a runtime field name.
fn fielded(kind: &str, field: &str, value: &str) -> Value {
    let mut outer = Map::new();
    outer.insert(kind.to_string(), fielded_value(field, value));
    Value::Object(outer)
}

/// `{field: value}` with a runtime field name.
fn fielded_value(field: &str, value: &str) -> Value {
    let mut object = Map::new();
    object.insert(field.to_string(), Value::String(value.to_string()));
    Value::Object(object)
}

fn is_adjacency(operator: &str) -> bool {
    operator
        .strip_prefix("adj")
        .is_some_and(|rest| rest.chars().all(|c| c.is_ascii_digit()))
}
