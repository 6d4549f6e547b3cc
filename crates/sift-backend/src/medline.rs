//! Emitter for line-numbered Medline search strategies.

use sift_ir::{fields, BooleanQuery, Keyword};

use crate::{error::BackendError, Backend, CompiledQuery};

/// Reverse mappings from a sorted canonical field set to the Ovid two-letter
/// code used on emission.
const REVERSE_TAGS: &[(&str, &[&str])] = &[
    (
        "mp",
        &[fields::MESH_HEADINGS, fields::ABSTRACT, fields::TITLE],
    ),
    ("ti,ab", &[fields::ABSTRACT, fields::TITLE]),
    ("ab", &[fields::ABSTRACT]),
    ("ti", &[fields::TITLE]),
    ("tw", &[fields::TEXT_WORD]),
    ("pt", &[fields::PUBLICATION_TYPE]),
    ("fs", &[fields::FLOATING_MESH_HEADINGS]),
    ("au", &[fields::AUTHORS]),
    ("jn", &[fields::JOURNAL]),
    ("ed", &[fields::PUBLICATION_DATE]),
    ("af", &[fields::ALL_FIELDS]),
];

/// The Medline emitter.
///
/// A depth-first walk numbers every keyword line, then each group
/// contributes a summary line combining its operand line numbers: the
/// short `or/1-6` form when they are contiguous, the long `1 or 2 or 3`
/// form otherwise.
#[derive(Debug, Default, Clone, Copy)]
pub struct MedlineBackend;

impl MedlineBackend {
    /// A new Medline emitter.
    pub fn new() -> Self {
        Self
    }
}

impl Backend for MedlineBackend {
    fn compile(&self, query: &BooleanQuery) -> Result<CompiledQuery, BackendError> {
        let mut out = String::new();
        compile_query(query, 1, &mut out);
        Ok(CompiledQuery::Medline(out))
    }
}

/// Emits one group, returning the next unused line number.
fn compile_query(query: &BooleanQuery, mut level: usize, out: &mut String) -> usize {
    if query.is_wrapper() {
        for child in &query.children {
            level = compile_query(child, level, out);
        }
        return level;
    }

    let mut operands = Vec::new();

    for child in &query.children {
        level = compile_query(child, level, out);
        operands.push(level - 1);
    }

    for keyword in &query.keywords {
        out.push_str(&format!("{level}. {}\n", render_keyword(keyword)));
        operands.push(level);
        level += 1;
    }

    if !operands.is_empty() {
        let contiguous = operands.windows(2).all(|pair| pair[1] == pair[0] + 1);
        if contiguous && operands.len() > 2 {
            out.push_str(&format!(
                "{level}. {}/{}-{}\n",
                query.operator,
                operands[0],
                operands[operands.len() - 1]
            ));
        } else {
            let joined = operands
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(&format!(" {} ", query.operator));
            out.push_str(&format!("{level}. {joined}\n"));
        }
    }
    level + 1
}

fn render_keyword(keyword: &Keyword) -> String {
    let text = &keyword.query_string;

    if let [field] = keyword.fields.as_slice() {
        if matches!(
            field.as_str(),
            fields::MESH_HEADINGS | fields::MESH_SUBHEADING
        ) {
            return if keyword.exploded {
                format!("exp {text}/")
            } else {
                format!("{text}/")
            };
        }
    }

    match reverse_tag(&keyword.fields) {
        Some(tag) => format!("{text}.{tag}."),
        None => {
            log::warn!(
                "could not map fields {:?} for `{text}` to a Medline code",
                keyword.fields
            );
            format!("{text}..")
        }
    }
}

fn reverse_tag(field_list: &[String]) -> Option<&'static str> {
    let mut sorted: Vec<&str> = field_list.iter().map(String::as_str).collect();
    sorted.sort_unstable();
    sorted.dedup();
    REVERSE_TAGS
        .iter()
        .find(|(_, mapped)| {
            let mut mapped: Vec<&str> = mapped.to_vec();
            mapped.sort_unstable();
            mapped == sorted
        })
        .map(|(tag, _)| *tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keyword(text: &str, field_list: &[&str]) -> Keyword {
        Keyword::new(text, field_list.iter().map(|f| f.to_string()).collect())
    }

    fn compile(query: &BooleanQuery) -> String {
        let CompiledQuery::Medline(text) = MedlineBackend::new().compile(query).unwrap() else {
            panic!("expected a Medline strategy");
        };
        text
    }

    fn mp_keyword(text: &str) -> Keyword {
        keyword(
            text,
            &[fields::MESH_HEADINGS, fields::ABSTRACT, fields::TITLE],
        )
    }

    #[test]
    fn nine_operand_disjunction_uses_the_short_form() {
        let query = BooleanQuery {
            operator: "or".into(),
            keywords: (0..9).map(|i| mp_keyword(&format!("kw{i}"))).collect(),
            ..BooleanQuery::default()
        };
        let out = compile(&query);
        assert!(out.contains("1. kw0.mp.\n"));
        assert!(out.contains("9. kw8.mp.\n"));
        assert!(out.ends_with("10. or/1-9\n"));
    }

    #[test]
    fn two_operands_use_the_long_form() {
        let query = BooleanQuery {
            operator: "and".into(),
            keywords: vec![mp_keyword("a"), mp_keyword("b")],
            ..BooleanQuery::default()
        };
        assert!(compile(&query).ends_with("3. 1 and 2\n"));
    }

    #[test]
    fn non_contiguous_operands_use_the_long_form() {
        let disjunction = |a: &str, b: &str, c: &str| BooleanQuery {
            operator: "or".into(),
            keywords: vec![mp_keyword(a), mp_keyword(b), mp_keyword(c)],
            ..BooleanQuery::default()
        };
        let query = BooleanQuery {
            operator: "and".into(),
            keywords: vec![mp_keyword("g")],
            children: vec![disjunction("a", "b", "c"), disjunction("d", "e", "f")],
            ..BooleanQuery::default()
        };
        let out = compile(&query);
        // Group summaries land on lines 4 and 8, the keyword on line 9.
        assert!(out.contains("4. or/1-3\n"));
        assert!(out.contains("8. or/5-7\n"));
        assert!(out.ends_with("10. 4 and 8 and 9\n"));
    }

    #[test]
    fn mesh_keywords_render_with_slash() {
        let mut exploded = keyword("Sleep Apnea Syndromes", &[fields::MESH_HEADINGS]);
        exploded.exploded = true;
        let query = BooleanQuery {
            operator: "or".into(),
            keywords: vec![exploded, keyword("Neoplasms", &[fields::MESH_HEADINGS])],
            ..BooleanQuery::default()
        };
        let out = compile(&query);
        assert!(out.contains("1. exp Sleep Apnea Syndromes/\n"));
        assert!(out.contains("2. Neoplasms/\n"));
    }

    #[test]
    fn title_abstract_set_renders_ti_ab() {
        let query = BooleanQuery {
            operator: "or".into(),
            keywords: vec![keyword("stroke", &[fields::TITLE, fields::ABSTRACT])],
            ..BooleanQuery::default()
        };
        assert!(compile(&query).starts_with("1. stroke.ti,ab.\n"));
    }

    #[test]
    fn wrapper_nodes_are_transparent() {
        let inner = BooleanQuery {
            operator: "or".into(),
            keywords: vec![mp_keyword("a"), mp_keyword("b"), mp_keyword("c")],
            ..BooleanQuery::default()
        };
        let mut wrapper = BooleanQuery::default();
        wrapper.children.push(inner.clone());
        assert_eq!(compile(&wrapper), compile(&inner));
    }
}
