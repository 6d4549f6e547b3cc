//! Emitter for Terrier query strings.

use sift_ir::{BooleanQuery, Keyword};

use crate::{error::BackendError, Backend, CompiledQuery};

/// The Terrier emitter.
///
/// Conjunctions mark their terms required with `+field:term`, proximity
/// groups become quoted phrases with a `~N` distance, and everything else is
/// a space-separated parenthesized clause.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerrierBackend;

impl TerrierBackend {
    /// A new Terrier emitter.
    pub fn new() -> Self {
        Self
    }
}

impl Backend for TerrierBackend {
    fn compile(&self, query: &BooleanQuery) -> Result<CompiledQuery, BackendError> {
        Ok(CompiledQuery::Terrier(compile_query(query)))
    }
}

fn compile_query(query: &BooleanQuery) -> String {
    let operator = query.operator.to_lowercase();
    if operator == "and" {
        let mut out = String::from("(");
        out.push_str(&join_keywords(&query.keywords, "+"));
        for child in &query.children {
            out.push_str(&compile_query(child));
        }
        out.push(')');
        out
    } else if operator.len() > 3 && operator.starts_with("adj") {
        let mut out = String::from(" \"");
        out.push_str(&join_keywords(&query.keywords, ""));
        for child in &query.children {
            out.push_str(&compile_query(child));
        }
        let distance = &operator[3..];
        out.push_str(&format!("\"~{distance} "));
        out
    } else {
        let mut out = String::from("(");
        out.push_str(&join_keywords(&query.keywords, ""));
        for child in &query.children {
            out.push_str(&compile_query(child));
        }
        out.push(')');
        out
    }
}

fn join_keywords(keywords: &[Keyword], prefix: &str) -> String {
    let mut terms = Vec::new();
    for keyword in keywords {
        for field in &keyword.fields {
            terms.push(format!("{prefix}{field}:{}", keyword.query_string));
        }
    }
    terms.join(" ")
}

#[cfg(test)]
mod tests {
    use sift_ir::fields;

    use super::*;

    fn keyword(text: &str, field_list: &[&str]) -> Keyword {
        Keyword::new(text, field_list.iter().map(|f| f.to_string()).collect())
    }

    fn compile(query: &BooleanQuery) -> String {
        let CompiledQuery::Terrier(text) = TerrierBackend::new().compile(query).unwrap() else {
            panic!("expected a Terrier query");
        };
        text
    }

    #[test]
    fn conjunction_requires_terms() {
        let query = BooleanQuery {
            operator: "and".into(),
            keywords: vec![
                keyword("heart", &[fields::TITLE]),
                keyword("attack", &[fields::TITLE]),
            ],
            ..BooleanQuery::default()
        };
        assert_eq!(compile(&query), "(+title:heart +title:attack)");
    }

    #[test]
    fn disjunction_lists_terms() {
        let query = BooleanQuery {
            operator: "or".into(),
            keywords: vec![
                keyword("heart", &[fields::TITLE]),
                keyword("attack", &[fields::TITLE]),
            ],
            ..BooleanQuery::default()
        };
        assert_eq!(compile(&query), "(title:heart title:attack)");
    }

    #[test]
    fn adjacency_emits_a_sloppy_phrase() {
        let query = BooleanQuery {
            operator: "adj3".into(),
            keywords: vec![
                keyword("sleep", &[fields::TITLE]),
                keyword("apnea", &[fields::TITLE]),
            ],
            ..BooleanQuery::default()
        };
        assert_eq!(compile(&query), " \"title:sleep title:apnea\"~3 ");
    }

    #[test]
    fn every_field_contributes_a_term() {
        let query = BooleanQuery {
            operator: "or".into(),
            keywords: vec![keyword("stroke", &[fields::TITLE, fields::ABSTRACT])],
            ..BooleanQuery::default()
        };
        assert_eq!(compile(&query), "(title:stroke text:stroke)");
    }

    #[test]
    fn leaf_count_matches_the_tree() {
        let inner = BooleanQuery {
            operator: "or".into(),
            keywords: vec![
                keyword("a", &[fields::TITLE]),
                keyword("b", &[fields::TITLE]),
            ],
            ..BooleanQuery::default()
        };
        let query = BooleanQuery {
            operator: "and".into(),
            keywords: vec![keyword("c", &[fields::TITLE])],
            children: vec![inner],
            ..BooleanQuery::default()
        };
        let out = compile(&query);
        assert_eq!(out.matches("title:").count(), query.terms().len());
    }
}
