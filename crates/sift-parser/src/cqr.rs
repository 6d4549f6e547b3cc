//! Parser for CQR JSON documents.

use sift_ir::{
    cqr::CqrNode,
    fields, BooleanQuery, FieldMapping, Keyword,
};

use crate::{error::ParseError, QueryTransformer};

/// The CQR default: fielded leaves pass through untouched, bare leaves search
/// title and abstract.
pub fn cqr_mapping() -> FieldMapping {
    let mut mapping = FieldMapping::new();
    mapping.insert(
        "default".into(),
        vec![fields::TITLE.to_string(), fields::ABSTRACT.to_string()],
    );
    mapping
}

/// Transforms CQR JSON documents into the canonical tree.
///
/// The structure maps one-to-one; the only work is filling missing leaf
/// fields from `default` and carrying options through verbatim.
#[derive(Debug, Default, Clone, Copy)]
pub struct CqrTransformer;

impl QueryTransformer for CqrTransformer {
    fn transform_nested(
        &self,
        query: &str,
        mapping: &FieldMapping,
    ) -> Result<BooleanQuery, ParseError> {
        let node: CqrNode = serde_json::from_str(query)?;
        Ok(to_query(&node, mapping))
    }
}

fn to_query(node: &CqrNode, mapping: &FieldMapping) -> BooleanQuery {
    match node {
        CqrNode::Boolean {
            operator,
            children,
            options,
        } => {
            let mut query = BooleanQuery::with_operator(operator.clone());
            query.options = options.clone();
            for child in children {
                match child {
                    CqrNode::Keyword { .. } => query.keywords.push(to_keyword(child, mapping)),
                    CqrNode::Boolean { .. } => query.children.push(to_query(child, mapping)),
                }
            }
            query
        }
        // A bare leaf document becomes a single-keyword disjunction.
        CqrNode::Keyword { .. } => BooleanQuery {
            operator: "or".to_string(),
            keywords: vec![to_keyword(node, mapping)],
            ..BooleanQuery::default()
        },
    }
}

fn to_keyword(node: &CqrNode, mapping: &FieldMapping) -> Keyword {
    let CqrNode::Keyword {
        query,
        fields,
        options,
    } = node
    else {
        unreachable!("to_keyword is only called on keyword leaves");
    };

    let fields = if fields.is_empty() {
        mapping.get("default").cloned().unwrap_or_default()
    } else {
        fields.clone()
    };

    Keyword {
        query_string: query.clone(),
        fields,
        exploded: options.exploded,
        truncated: options.truncated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transform(document: &str) -> BooleanQuery {
        CqrTransformer
            .transform_nested(document, &cqr_mapping())
            .unwrap()
    }

    #[test]
    fn boolean_document_maps_structurally() {
        let query = transform(
            r#"{
                "operator": "or",
                "children": [
                    {"query": "MMSE*", "fields": ["title", "text"], "options": {"exploded": false, "truncated": true}},
                    {"operator": "and", "children": [
                        {"query": "mini", "fields": ["title"]},
                        {"query": "mental", "fields": ["title"]}
                    ]}
                ]
            }"#,
        );
        assert_eq!(query.operator, "or");
        assert_eq!(query.keywords.len(), 1);
        assert!(query.keywords[0].truncated);
        assert_eq!(query.children.len(), 1);
        assert_eq!(query.children[0].operator, "and");
        assert_eq!(query.children[0].keywords.len(), 2);
    }

    #[test]
    fn uppercase_operator_is_preserved() {
        let query = transform(r#"{"operator": "OR", "children": [{"query": "a"}]}"#);
        assert_eq!(query.operator, "OR");
    }

    #[test]
    fn missing_leaf_fields_fill_from_default() {
        let query = transform(r#"{"operator": "and", "children": [{"query": "a"}]}"#);
        assert_eq!(
            query.keywords[0].fields,
            vec![fields::TITLE, fields::ABSTRACT]
        );
    }

    #[test]
    fn bare_leaf_becomes_a_disjunction() {
        let query = transform(r#"{"query": "heart", "fields": ["title"]}"#);
        assert_eq!(query.operator, "or");
        assert_eq!(query.keywords.len(), 1);
        assert_eq!(query.keywords[0].fields, vec![fields::TITLE]);
    }

    #[test]
    fn node_options_carry_through() {
        let query = transform(
            r#"{"operator": "and", "options": {"category": "diagnosis"}, "children": [{"query": "a"}]}"#,
        );
        assert_eq!(query.options["category"], "diagnosis");
    }

    #[test]
    fn malformed_document_is_an_error() {
        let err = CqrTransformer
            .transform_nested("{not json", &cqr_mapping())
            .unwrap_err();
        assert!(matches!(err, ParseError::Cqr(_)));
    }
}
