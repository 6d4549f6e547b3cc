//! Emitter for PubMed query strings.

use sift_ir::{fields, BooleanQuery, Keyword};

use crate::{error::BackendError, Backend, CompiledQuery};

/// Exact reverse mappings from a single canonical field to the PubMed
/// display name.
const SINGLE_FIELD_NAMES: &[(&str, &str)] = &[
    ("Affiliation", fields::AFFILIATION),
    ("All Fields", fields::ALL_FIELDS),
    ("Abstract", fields::ABSTRACT),
    ("Author", fields::AUTHOR),
    ("Author - Corporate", fields::AUTHOR_CORPORATE),
    ("Author - First", fields::AUTHOR_FIRST),
    ("Author - Full", fields::AUTHOR_FULL),
    ("Author - Identifier", fields::AUTHOR_IDENTIFIER),
    ("Author - Last", fields::AUTHOR_LAST),
    ("Author", fields::AUTHORS),
    ("Book", fields::BOOK),
    (
        "Conflict of Interest Statements",
        fields::CONFLICT_OF_INTEREST_STATEMENTS,
    ),
    ("Date - Completion", fields::DATE_COMPLETION),
    ("Date - Create", fields::DATE_CREATE),
    ("Date - Entrez", fields::DATE_ENTREZ),
    ("Date - MeSH", fields::DATE_MESH),
    ("Date - Modification", fields::DATE_MODIFICATION),
    ("Date - Publication", fields::DATE_PUBLICATION),
    ("EC/RN Number", fields::EC_RN_NUMBER),
    ("Editor", fields::EDITOR),
    ("Filter", fields::FILTER),
    ("Grant Number", fields::GRANT_NUMBER),
    ("ISBN", fields::ISBN),
    ("Investigator", fields::INVESTIGATOR),
    ("Investigator - Full", fields::INVESTIGATOR_FULL),
    ("Issue", fields::ISSUE),
    ("Journal", fields::JOURNAL),
    ("Language", fields::LANGUAGE),
    ("Location ID", fields::LOCATION_ID),
    ("MeSH Major Topic", fields::MESH_MAJOR_TOPIC),
    ("MeSH Subheading", fields::MESH_SUBHEADING),
    ("MeSH Terms", fields::MESH_TERMS),
    ("Other Term", fields::OTHER_TERM),
    ("Pagination", fields::PAGINATION),
    ("Pharmacological Action", fields::PHARMACOLOGICAL_ACTION),
    ("Publication Date", fields::PUBLICATION_DATE),
    ("Publication Type", fields::PUBLICATION_TYPE),
    ("Publisher", fields::PUBLISHER),
    ("Secondary Source ID", fields::SECONDARY_SOURCE_ID),
    ("Subject - Personal Name", fields::SUBJECT_PERSONAL_NAME),
    ("Supplementary Concept", fields::SUPPLEMENTARY_CONCEPT),
    ("Text Word", fields::TEXT_WORD),
    ("Title", fields::TITLE),
    ("Transliterated Title", fields::TRANSLITERATED_TITLE),
    ("Volume", fields::VOLUME),
];

/// Reverse mappings matched by sorted field set.
const MULTI_FIELD_NAMES: &[(&str, &[&str])] =
    &[("Title/Abstract", &[fields::ABSTRACT, fields::TITLE])];

/// The PubMed emitter.
#[derive(Debug, Default, Clone, Copy)]
pub struct PubmedBackend;

impl PubmedBackend {
    /// A new PubMed emitter.
    pub fn new() -> Self {
        Self
    }
}

impl Backend for PubmedBackend {
    fn compile(&self, query: &BooleanQuery) -> Result<CompiledQuery, BackendError> {
        Ok(CompiledQuery::Pubmed(compile_query(query)))
    }
}

fn compile_query(query: &BooleanQuery) -> String {
    if query.is_wrapper() {
        return query.children.iter().map(compile_query).collect();
    }

    let mut parts: Vec<String> = query.keywords.iter().map(render_keyword).collect();
    parts.extend(query.children.iter().map(compile_query));

    // PubMed has no proximity operator.
    let operator = if query.operator.to_lowercase().contains("adj") {
        "AND".to_string()
    } else {
        query.operator.to_uppercase()
    };

    format!("({})", parts.join(&format!(" {operator} ")))
}

fn render_keyword(keyword: &Keyword) -> String {
    let text = truncate_wildcards(&keyword.query_string);
    let field = display_field(&keyword.fields, keyword.exploded);
    format!("{text}[{field}]")
}

/// Rewrites wildcards into the only form PubMed supports: a single trailing
/// `*`. A leading wildcard is dropped, and everything after the first
/// internal wildcard is cut, restoring the closing quote for phrases.
fn truncate_wildcards(text: &str) -> String {
    let mut out = String::new();
    for (index, ch) in text.chars().enumerate() {
        if matches!(ch, '*' | '?' | '$') {
            if index == 0 {
                continue;
            }
            out.push('*');
            if text.starts_with('"') {
                out.push('"');
            }
            return out;
        }
        out.push(ch);
    }
    out
}

/// Chooses the PubMed field name for a keyword's canonical fields.
///
/// Single MeSH-flavored fields render as their Mesh name, with `:noexp`
/// appended when the keyword is not exploded. Everything else goes through
/// the exact reverse mapping, then the multi-field set mapping, then falls
/// back to `All Fields`.
fn display_field(field_list: &[String], exploded: bool) -> String {
    if let [field] = field_list {
        let mesh = match field.as_str() {
            fields::MESH_HEADINGS => Some("Mesh Terms"),
            fields::FLOATING_MESH_HEADINGS => Some("MeSH Subheading"),
            fields::MAJOR_MESH_HEADINGS => Some("MeSH Major Topic"),
            _ => None,
        };
        if let Some(name) = mesh {
            return if exploded {
                name.to_string()
            } else {
                format!("{name}:noexp")
            };
        }
        if let Some((name, _)) = SINGLE_FIELD_NAMES
            .iter()
            .find(|(_, canonical)| canonical == field)
        {
            return name.to_string();
        }
    }

    let mut sorted: Vec<&str> = field_list.iter().map(String::as_str).collect();
    sorted.sort_unstable();
    sorted.dedup();
    if let Some((name, _)) = MULTI_FIELD_NAMES
        .iter()
        .find(|(_, canonical)| *canonical == sorted.as_slice())
    {
        return name.to_string();
    }

    "All Fields".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keyword(text: &str, field_list: &[&str]) -> Keyword {
        Keyword::new(text, field_list.iter().map(|f| f.to_string()).collect())
    }

    fn compile(query: &BooleanQuery) -> String {
        let CompiledQuery::Pubmed(text) = PubmedBackend::new().compile(query).unwrap() else {
            panic!("expected a PubMed query");
        };
        text
    }

    #[test]
    fn keywords_join_with_uppercased_operator() {
        let query = BooleanQuery {
            operator: "or".into(),
            keywords: vec![
                keyword("a", &[fields::TITLE]),
                keyword("b", &[fields::TITLE]),
                keyword("c", &[fields::TITLE]),
            ],
            ..BooleanQuery::default()
        };
        assert_eq!(compile(&query), "(a[Title] OR b[Title] OR c[Title])");
    }

    #[test]
    fn title_abstract_set_maps_back() {
        let query = BooleanQuery {
            operator: "and".into(),
            keywords: vec![keyword("stroke", &[fields::TITLE, fields::ABSTRACT])],
            ..BooleanQuery::default()
        };
        assert_eq!(compile(&query), "(stroke[Title/Abstract])");
    }

    #[test]
    fn unexploded_mesh_gets_noexp() {
        let query = BooleanQuery {
            operator: "and".into(),
            keywords: vec![keyword("Neoplasms", &[fields::MESH_HEADINGS])],
            ..BooleanQuery::default()
        };
        assert_eq!(compile(&query), "(Neoplasms[Mesh Terms:noexp])");
    }

    #[test]
    fn exploded_mesh_has_no_suffix() {
        let mut mesh = keyword("Neoplasms", &[fields::MESH_HEADINGS]);
        mesh.exploded = true;
        let query = BooleanQuery {
            operator: "and".into(),
            keywords: vec![mesh],
            ..BooleanQuery::default()
        };
        assert_eq!(compile(&query), "(Neoplasms[Mesh Terms])");
    }

    #[test]
    fn unknown_field_set_falls_back_to_all_fields() {
        let query = BooleanQuery {
            operator: "and".into(),
            keywords: vec![keyword("a", &["title", "journal"])],
            ..BooleanQuery::default()
        };
        assert_eq!(compile(&query), "(a[All Fields])");
    }

    #[test]
    fn adjacency_is_rewritten_to_and() {
        let query = BooleanQuery {
            operator: "adj3".into(),
            keywords: vec![
                keyword("sleep", &[fields::TITLE]),
                keyword("apnea", &[fields::TITLE]),
            ],
            ..BooleanQuery::default()
        };
        assert_eq!(compile(&query), "(sleep[Title] AND apnea[Title])");
    }

    #[test]
    fn internal_wildcard_truncates() {
        assert_eq!(truncate_wildcards("child?en"), "child*");
        assert_eq!(truncate_wildcards("sleep$"), "sleep*");
        assert_eq!(truncate_wildcards("colo*rectal"), "colo*");
    }

    #[test]
    fn leading_wildcard_is_dropped() {
        assert_eq!(truncate_wildcards("*ectomy"), "ectomy");
    }

    #[test]
    fn quoted_phrase_truncation_restores_the_quote() {
        assert_eq!(
            truncate_wildcards(r#""mini mental stat*""#),
            r#""mini mental stat*""#
        );
    }

    #[test]
    fn nested_children_emit_nested_parens() {
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
        assert_eq!(
            compile(&query),
            "(c[Title] AND (a[Title] OR b[Title]))"
        );
    }
}
