//! Parser for PubMed keyword expressions.

use sift_ir::{fields, BooleanQuery, FieldMapping, Keyword};

use crate::{
    error::ParseError,
    shunting::{infix_to_prefix, pubmed_precedence},
    tokens::{is_operator, tokenize},
    QueryTransformer,
};

/// The PubMed field vocabulary: human-readable names, short tags, and the
/// canonical identifiers themselves, so already-canonical queries map
/// unchanged.
pub fn pubmed_mapping() -> FieldMapping {
    let one = |field: &str| vec![field.to_string()];
    let title_abstract = || vec![fields::TITLE.to_string(), fields::ABSTRACT.to_string()];

    let mut mapping = FieldMapping::new();
    for name in ["Mesh", "mesh", "MeSH", "MESH", "Mesh Terms", "mesh terms"] {
        mapping.insert(name.into(), one(fields::MESH_HEADINGS));
    }
    mapping.insert("MAJR".into(), one(fields::MAJOR_MESH_HEADINGS));
    mapping.insert("mesh major topic".into(), one(fields::MAJOR_MESH_HEADINGS));
    mapping.insert("Subheading".into(), one(fields::FLOATING_MESH_HEADINGS));
    mapping.insert("subheading".into(), one(fields::FLOATING_MESH_HEADINGS));
    mapping.insert("Abstract".into(), one(fields::ABSTRACT));
    mapping.insert("Publication".into(), one(fields::PUBLICATION_TYPE));
    mapping.insert("publication type".into(), one(fields::PUBLICATION_TYPE));
    mapping.insert("Publication Date".into(), one(fields::PUBLICATION_DATE));
    mapping.insert("journal".into(), one(fields::JOURNAL));

    mapping.insert("Affiliation".into(), one(fields::AFFILIATION));
    mapping.insert("All Fields".into(), one(fields::ALL_FIELDS));
    mapping.insert("Author".into(), one(fields::AUTHOR));
    mapping.insert("Author - Corporate".into(), one(fields::AUTHOR_CORPORATE));
    mapping.insert("Author - First".into(), one(fields::AUTHOR_FIRST));
    mapping.insert("Author - Full".into(), one(fields::AUTHOR_FULL));
    mapping.insert("Author - Identifier".into(), one(fields::AUTHOR_IDENTIFIER));
    mapping.insert("Author - Last".into(), one(fields::AUTHOR_LAST));
    mapping.insert("Book".into(), one(fields::BOOK));
    mapping.insert(
        "Conflict of Interest Statements".into(),
        one(fields::CONFLICT_OF_INTEREST_STATEMENTS),
    );
    mapping.insert("Date - Completion".into(), one(fields::DATE_COMPLETION));
    mapping.insert("Date - Create".into(), one(fields::DATE_CREATE));
    mapping.insert("Date - Entrez".into(), one(fields::DATE_ENTREZ));
    mapping.insert("Date - MeSH".into(), one(fields::DATE_MESH));
    mapping.insert("Date - Modification".into(), one(fields::DATE_MODIFICATION));
    mapping.insert("Date - Publication".into(), one(fields::DATE_PUBLICATION));
    mapping.insert("EC/RN Number".into(), one(fields::EC_RN_NUMBER));
    mapping.insert("Editor".into(), one(fields::EDITOR));
    mapping.insert("Filter".into(), one(fields::FILTER));
    mapping.insert("Grant Number".into(), one(fields::GRANT_NUMBER));
    mapping.insert("ISBN".into(), one(fields::ISBN));
    mapping.insert("Investigator".into(), one(fields::INVESTIGATOR));
    mapping.insert("Investigator - Full".into(), one(fields::INVESTIGATOR_FULL));
    mapping.insert("Issue".into(), one(fields::ISSUE));
    mapping.insert("Journal".into(), one(fields::JOURNAL));
    mapping.insert("Language".into(), one(fields::LANGUAGE));
    mapping.insert("Location ID".into(), one(fields::LOCATION_ID));
    mapping.insert("MeSH Major Topic".into(), one(fields::MESH_MAJOR_TOPIC));
    mapping.insert("MeSH Subheading".into(), one(fields::MESH_SUBHEADING));
    mapping.insert("MeSH Terms".into(), one(fields::MESH_TERMS));
    mapping.insert("Other Term".into(), one(fields::OTHER_TERM));
    mapping.insert("Pagination".into(), one(fields::PAGINATION));
    mapping.insert(
        "Pharmacological Action".into(),
        one(fields::PHARMACOLOGICAL_ACTION),
    );
    mapping.insert("Publication Type".into(), one(fields::PUBLICATION_TYPE));
    mapping.insert("Publisher".into(), one(fields::PUBLISHER));
    mapping.insert(
        "Secondary Source ID".into(),
        one(fields::SECONDARY_SOURCE_ID),
    );
    mapping.insert(
        "Subject - Personal Name".into(),
        one(fields::SUBJECT_PERSONAL_NAME),
    );
    mapping.insert(
        "Supplementary Concept".into(),
        one(fields::SUPPLEMENTARY_CONCEPT),
    );
    mapping.insert("Text Word".into(), one(fields::TEXT_WORD));
    mapping.insert("Title".into(), one(fields::TITLE));
    mapping.insert("Title/Abstract".into(), title_abstract());
    mapping.insert(
        "Transliterated Title".into(),
        one(fields::TRANSLITERATED_TITLE),
    );
    mapping.insert("Volume".into(), one(fields::VOLUME));

    mapping.insert("mh".into(), one(fields::MESH_HEADINGS));
    mapping.insert("sh".into(), one(fields::FLOATING_MESH_HEADINGS));
    mapping.insert("tw".into(), one(fields::TEXT_WORD));
    mapping.insert("ti".into(), one(fields::TITLE));
    mapping.insert("pt".into(), one(fields::PUBLICATION_TYPE));
    mapping.insert("sb".into(), one(fields::PUBLICATION_STATUS));
    mapping.insert("tiab".into(), title_abstract());
    mapping.insert("text".into(), title_abstract());

    for canonical in [
        fields::AFFILIATION,
        fields::ALL_FIELDS,
        fields::AUTHOR,
        fields::AUTHORS,
        fields::AUTHOR_CORPORATE,
        fields::AUTHOR_FIRST,
        fields::AUTHOR_FULL,
        fields::AUTHOR_IDENTIFIER,
        fields::AUTHOR_LAST,
        fields::BOOK,
        fields::CONFLICT_OF_INTEREST_STATEMENTS,
        fields::DATE_COMPLETION,
        fields::DATE_CREATE,
        fields::DATE_ENTREZ,
        fields::DATE_MESH,
        fields::DATE_MODIFICATION,
        fields::DATE_PUBLICATION,
        fields::EC_RN_NUMBER,
        fields::EDITOR,
        fields::FILTER,
        fields::GRANT_NUMBER,
        fields::ISBN,
        fields::INVESTIGATOR,
        fields::INVESTIGATOR_FULL,
        fields::ISSUE,
        fields::JOURNAL,
        fields::LANGUAGE,
        fields::LOCATION_ID,
        fields::MESH_MAJOR_TOPIC,
        fields::MESH_SUBHEADING,
        fields::MESH_TERMS,
        fields::MESH_HEADINGS,
        fields::MAJOR_MESH_HEADINGS,
        fields::FLOATING_MESH_HEADINGS,
        fields::OTHER_TERM,
        fields::PAGINATION,
        fields::PHARMACOLOGICAL_ACTION,
        fields::PMID,
        fields::PUBLICATION_DATE,
        fields::PUBLICATION_STATUS,
        fields::PUBLICATION_TYPE,
        fields::PUBLISHER,
        fields::SECONDARY_SOURCE_ID,
        fields::SUBJECT_PERSONAL_NAME,
        fields::SUPPLEMENTARY_CONCEPT,
        fields::TEXT_WORD,
        fields::TITLE,
        fields::TRANSLITERATED_TITLE,
        fields::VOLUME,
    ] {
        mapping.insert(canonical.into(), one(canonical));
    }

    mapping.insert("default".into(), one(fields::ALL_FIELDS));
    mapping
}

/// Transforms PubMed keyword expressions into the canonical tree.
#[derive(Debug, Default, Clone, Copy)]
pub struct PubMedTransformer;

impl PubMedTransformer {
    /// Transforms one `term[Field]` token.
    ///
    /// `:noexp` inside the brackets clears the explosion flag; otherwise any
    /// MeSH-flavored field is exploded by default. A field name with no
    /// mapping logs a warning and falls back to `default` so a single broken
    /// query does not abort a batch.
    fn transform_single(&self, query: &str, mapping: &FieldMapping) -> Keyword {
        let mut query_string;
        let mut query_fields = Vec::new();
        let mut mesh_field = false;
        let mut no_explosion = false;

        if let Some((term, bracketed)) = query.split_once('[') {
            query_string = term.to_string();
            let mut name = bracketed.replace(']', "");

            if name.to_lowercase().contains(":noexp") {
                no_explosion = true;
                name = name.to_lowercase().replace(":noexp", "");
            }

            let lowered = name.to_lowercase();
            mesh_field = lowered.contains("mesh") || lowered.contains("heading");

            if let Some(mapped) = mapping.get(&name) {
                query_fields = mapped.clone();
            } else {
                log::warn!("the field `{name}` does not have a mapping defined");
                query_fields = mapping.get("default").cloned().unwrap_or_default();
            }
        } else {
            query_string = query.to_string();
        }

        if query_fields.is_empty() {
            query_fields = mapping.get("default").cloned().unwrap_or_default();
        }

        let truncated = query_string.contains(['*', '?', '$', '~']);
        query_string = query_string.replace(['$', '?', '~'], "*");

        Keyword {
            query_string: query_string.trim().to_string(),
            fields: query_fields,
            exploded: mesh_field && !no_explosion,
            truncated,
        }
    }

    /// Consumes a prefix token stream into a query group. An operator-less
    /// subgroup dissolves into its parent.
    fn transform_prefix(
        &self,
        prefix: &[String],
        position: &mut usize,
        mapping: &FieldMapping,
    ) -> BooleanQuery {
        let mut group = BooleanQuery::default();

        while *position < prefix.len() {
            let token = &prefix[*position];
            if is_operator(token) {
                group.operator = token.clone();
                *position += 1;
            } else if token == "(" {
                *position += 1;
                let sub = self.transform_prefix(prefix, position, mapping);
                if sub.operator.is_empty() {
                    group.keywords.extend(sub.keywords);
                    group.children.extend(sub.children);
                } else {
                    group.children.push(sub);
                }
            } else if token == ")" {
                *position += 1;
                return group;
            } else {
                if !token.is_empty() {
                    let keyword = self.transform_single(token, mapping);
                    if !keyword.query_string.is_empty() {
                        group.keywords.push(keyword);
                    }
                }
                *position += 1;
            }
        }

        group
    }
}

impl QueryTransformer for PubMedTransformer {
    fn transform_nested(
        &self,
        query: &str,
        mapping: &FieldMapping,
    ) -> Result<BooleanQuery, ParseError> {
        let tokens = tokenize(query)?;
        let mut prefix = infix_to_prefix(&tokens, pubmed_precedence);

        // Group the whole expression, then squash the redundancy that the
        // extra pair (and hand-written queries) introduce.
        prefix.insert(0, "(".to_string());
        prefix.push(")".to_string());
        let prefix = remove_redundant_parens(prefix);
        let prefix = collapse_duplicates(prefix);

        let mut position = 0;
        let mut group = self.transform_prefix(&prefix, &mut position, mapping);
        while group.is_wrapper() && group.children.len() == 1 {
            group = group.children.remove(0);
        }
        Ok(group)
    }
}

/// Drops directly-nested duplicate parenthesis pairs (`((X))` → `(X)`),
/// repeating until none remain.
fn remove_redundant_parens(mut tokens: Vec<String>) -> Vec<String> {
    loop {
        let mut redundant = None;
        for open in 0..tokens.len().saturating_sub(1) {
            if tokens[open] != "(" || tokens[open + 1] != "(" {
                continue;
            }
            let outer = matching_paren(&tokens, open);
            let inner = matching_paren(&tokens, open + 1);
            if let (Some(outer), Some(inner)) = (outer, inner) {
                if outer == inner + 1 {
                    redundant = Some((open, outer));
                    break;
                }
            }
        }
        match redundant {
            Some((open, close)) => {
                tokens.remove(close);
                tokens.remove(open);
            }
            None => return tokens,
        }
    }
}

/// Finds the index of the parenthesis closing the one opened at `open`.
fn matching_paren(tokens: &[String], open: usize) -> Option<usize> {
    let mut depth = 0i64;
    for (index, token) in tokens.iter().enumerate().skip(open) {
        if token == "(" {
            depth += 1;
        } else if token == ")" {
            depth -= 1;
            if depth == 0 {
                return Some(index);
            }
        }
    }
    None
}

/// Collapses consecutive duplicate tokens, parentheses excepted.
fn collapse_duplicates(tokens: Vec<String>) -> Vec<String> {
    let mut collapsed: Vec<String> = Vec::new();
    for token in tokens {
        if token != "(" && token != ")" && collapsed.last() == Some(&token) {
            continue;
        }
        collapsed.push(token);
    }
    collapsed
}
