//! Parser for Medline/Ovid keyword expressions.

use sift_ir::{fields, BooleanQuery, FieldMapping, Keyword};

use crate::{
    error::ParseError,
    shunting::{infix_to_prefix, medline_precedence},
    tokens::{is_operator, tokenize},
    QueryTransformer,
};

/// The Ovid Medline two-letter field codes.
///
/// `mp` ("multi-purpose") and its aliases search the usual free-text trio of
/// title, abstract and MeSH headings, which is also the `default`.
pub fn medline_mapping() -> FieldMapping {
    let free_text = || {
        vec![
            fields::TITLE.to_string(),
            fields::ABSTRACT.to_string(),
            fields::MESH_HEADINGS.to_string(),
        ]
    };
    let one = |field: &str| vec![field.to_string()];

    let mut mapping = FieldMapping::new();
    mapping.insert("ab".into(), one(fields::ABSTRACT));
    mapping.insert("af".into(), free_text());
    mapping.insert("ai".into(), one(fields::AUTHOR_FULL));
    mapping.insert("as".into(), one(fields::PUBLICATION_DATE));
    mapping.insert("au".into(), one(fields::AUTHORS));
    mapping.insert("ax".into(), one(fields::AUTHOR_LAST));
    mapping.insert("ba".into(), one(fields::AUTHORS));
    mapping.insert("bd".into(), one(fields::PUBLICATION_DATE));
    mapping.insert("be".into(), one(fields::EDITOR));
    mapping.insert("bf".into(), one(fields::AUTHORS));
    mapping.insert("bk".into(), free_text());
    mapping.insert("ed".into(), one(fields::PUBLICATION_DATE));
    mapping.insert("em".into(), one(fields::PUBLICATION_DATE));
    mapping.insert("fa".into(), one(fields::AUTHOR_FULL));
    mapping.insert("fe".into(), one(fields::EDITOR));
    mapping.insert("fs".into(), one(fields::FLOATING_MESH_HEADINGS));
    mapping.insert("fx".into(), one(fields::FLOATING_MESH_HEADINGS));
    mapping.insert("ja".into(), one(fields::JOURNAL));
    mapping.insert("jn".into(), one(fields::JOURNAL));
    mapping.insert("jw".into(), one(fields::JOURNAL));
    mapping.insert("kf".into(), free_text());
    mapping.insert("mh".into(), one(fields::MESH_HEADINGS));
    mapping.insert("mp".into(), free_text());
    mapping.insert("nm".into(), free_text());
    mapping.insert("ot".into(), one(fields::TITLE));
    mapping.insert("pt".into(), one(fields::PUBLICATION_TYPE));
    mapping.insert("px".into(), one(fields::MESH_HEADINGS));
    mapping.insert("rn".into(), free_text());
    mapping.insert("rs".into(), free_text());
    mapping.insert("sb".into(), one(fields::PUBLICATION_TYPE));
    mapping.insert("sh".into(), one(fields::MESH_SUBHEADING));
    mapping.insert("ti".into(), one(fields::TITLE));
    mapping.insert("tw".into(), one(fields::TEXT_WORD));
    mapping.insert(
        "ti,ab".into(),
        vec![fields::TITLE.to_string(), fields::ABSTRACT.to_string()],
    );
    mapping.insert("default".into(), free_text());
    mapping
}

/// Transforms Medline keyword expressions into the canonical tree.
#[derive(Debug, Default, Clone, Copy)]
pub struct MedlineTransformer;

impl MedlineTransformer {
    /// Maps a comma-separated field code list (`ti,ab`) through the mapping.
    /// Unknown codes contribute nothing; the result is sorted.
    fn transform_fields(&self, codes: &str, mapping: &FieldMapping) -> Vec<String> {
        let mut mapped = Vec::new();
        for code in codes.split(',') {
            if let Some(canonical) = mapping.get(code) {
                mapped.extend(canonical.iter().cloned());
            }
        }
        mapped.sort();
        mapped.dedup();
        mapped
    }

    /// Transforms one stand-alone keyword token.
    ///
    /// Three shapes are recognized: a MeSH heading with a trailing `/` (an
    /// `exp ` prefix marks it exploded), a `stem.ff.` form whose last two
    /// dot-delimited segments split the term from its field codes, and a bare
    /// term whose fields are left for the enclosing group to supply.
    fn transform_single(&self, query: &str, mapping: &FieldMapping) -> Keyword {
        let query = query.trim();
        let mut exploded = false;
        let mut query_fields = Vec::new();
        let mut query_string;

        if query.ends_with('/') {
            let text = match query.strip_prefix("exp ") {
                Some(rest) => {
                    exploded = true;
                    rest
                }
                None => query,
            };
            query_string = text.replace('/', "");
            query_fields = mapping.get("sh").cloned().unwrap_or_default();
        } else {
            let parts: Vec<&str> = query.split('.').collect();
            if parts.len() > 1 {
                query_string = parts[..parts.len() - 2].join(".");
                query_fields = self.transform_fields(parts[parts.len() - 2], mapping);
            } else {
                query_string = query.to_string();
            }
        }

        let truncated = query_string.contains(['*', '?', '$', '~']);
        query_string = query_string.replace(['$', '~'], "*");

        Keyword {
            query_string: query_string.trim().to_string(),
            fields: query_fields,
            exploded,
            truncated,
        }
    }

    /// Consumes a prefix token stream into a query group.
    ///
    /// Operators set the group operator, `(` opens a nested group, and on `)`
    /// an immediately following `.xx[,yy…].` token is consumed as the group's
    /// field list, filling every keyword in the group that has none of its
    /// own. Keyword-local fields always win over group fields.
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
                group.children.push(sub);
            } else if token == ")" {
                *position += 1;
                let mut group_fields = None;
                if *position < prefix.len() {
                    if let Some(codes) = field_suffix(&prefix[*position]) {
                        group_fields = Some(self.transform_fields(codes, mapping));
                        *position += 1;
                    }
                }
                let group_fields = group_fields
                    .or_else(|| mapping.get("default").cloned())
                    .unwrap_or_default();
                for keyword in &mut group.keywords {
                    if keyword.fields.is_empty() {
                        keyword.fields = group_fields.clone();
                    }
                }
                return group;
            } else {
                let mut keyword = self.transform_single(token, mapping);
                if keyword.fields.is_empty() && *position + 1 < prefix.len() {
                    // The field suffix for this keyword may sit at the very
                    // end of the expression, after the closing parenthesis.
                    if let Some(last) = prefix.last() {
                        if field_suffix(last).is_some() {
                            let glued = format!("{token}{last}");
                            keyword = self.transform_single(&glued, mapping);
                        }
                    }
                }
                if !keyword.query_string.is_empty() {
                    group.keywords.push(keyword);
                }
                *position += 1;
            }
        }

        group
    }
}

impl QueryTransformer for MedlineTransformer {
    fn transform_nested(
        &self,
        query: &str,
        mapping: &FieldMapping,
    ) -> Result<BooleanQuery, ParseError> {
        let tokens = tokenize(query)?;
        let mut prefix = infix_to_prefix(&tokens, medline_precedence);

        if prefix.len() >= 2 && prefix.first().is_some_and(|t| t == "(") && prefix.last().is_some_and(|t| t == ")")
        {
            prefix = prefix[1..prefix.len() - 1].to_vec();
        }

        let mut position = 0;
        let mut group = self.transform_prefix(&prefix, &mut position, mapping);
        while group.is_wrapper() && group.children.len() == 1 {
            group = group.children.remove(0);
        }
        Ok(group)
    }
}

/// Matches a Medline field suffix token: `.xx.` or `.xx,yy.` with two-letter
/// codes, returning the inner code list.
fn field_suffix(token: &str) -> Option<&str> {
    let inner = token.strip_prefix('.')?.strip_suffix('.')?;
    if inner.is_empty() {
        return None;
    }
    let valid = inner
        .split(',')
        .all(|code| code.len() == 2 && code.chars().all(|c| c.is_ascii_alphabetic()));
    valid.then_some(inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transform(query: &str) -> BooleanQuery {
        MedlineTransformer
            .transform_nested(query, &medline_mapping())
            .unwrap()
    }

    #[test]
    fn mesh_heading_with_explosion() {
        let query = transform("exp Sleep Apnea Syndromes/");
        assert_eq!(query.keywords.len(), 1);
        let keyword = &query.keywords[0];
        assert_eq!(keyword.query_string, "Sleep Apnea Syndromes");
        assert!(keyword.exploded);
        assert_eq!(keyword.fields, vec![fields::MESH_SUBHEADING]);
    }

    #[test]
    fn plain_mesh_heading() {
        let query = transform("Neoplasms/");
        let keyword = &query.keywords[0];
        assert_eq!(keyword.query_string, "Neoplasms");
        assert!(!keyword.exploded);
    }

    #[test]
    fn field_suffix_splits_term() {
        let query = transform("OSA.mp.");
        let keyword = &query.keywords[0];
        assert_eq!(keyword.query_string, "OSA");
        assert_eq!(
            keyword.fields,
            vec![fields::MESH_HEADINGS, fields::ABSTRACT, fields::TITLE]
        );
    }

    #[test]
    fn truncation_rewrites_wildcards() {
        let query = transform("hypopnoea$.mp.");
        let keyword = &query.keywords[0];
        assert_eq!(keyword.query_string, "hypopnoea*");
        assert!(keyword.truncated);
    }

    #[test]
    fn tilde_also_rewrites() {
        let keyword = &transform("stenos~s.ti.").keywords[0];
        assert_eq!(keyword.query_string, "stenos*s");
        assert!(keyword.truncated);
    }

    #[test]
    fn question_mark_marks_truncated_but_stays() {
        let keyword = &transform("isch?emia.ti.").keywords[0];
        assert_eq!(keyword.query_string, "isch?emia");
        assert!(keyword.truncated);
    }

    #[test]
    fn adjacency_group_inherits_suffix_fields() {
        let query = transform("(sleep$ adj3 (apnea$ or apnoea$)).mp.");
        assert_eq!(query.operator, "adj3");
        assert_eq!(query.keywords.len(), 1);
        assert_eq!(query.keywords[0].query_string, "sleep*");
        assert!(query.keywords[0].truncated);
        let expected = vec![
            fields::MESH_HEADINGS.to_string(),
            fields::ABSTRACT.to_string(),
            fields::TITLE.to_string(),
        ];
        assert_eq!(query.keywords[0].fields, expected);

        assert_eq!(query.children.len(), 1);
        let inner = &query.children[0];
        assert_eq!(inner.operator, "or");
        assert_eq!(inner.keywords.len(), 2);
        for keyword in &inner.keywords {
            assert_eq!(keyword.fields, expected);
            assert!(keyword.truncated);
        }
    }

    #[test]
    fn group_suffix_only_fills_fieldless_keywords() {
        let query = transform("(heart.ti. or attack).tw.");
        assert_eq!(query.operator, "or");
        assert_eq!(query.keywords[0].fields, vec![fields::TITLE]);
        assert_eq!(query.keywords[1].fields, vec![fields::TEXT_WORD]);
    }

    #[test]
    fn comma_separated_suffix_maps_every_code() {
        let keyword = &transform("pressure.ti,ab.").keywords[0];
        assert_eq!(
            keyword.fields,
            vec![fields::ABSTRACT.to_string(), fields::TITLE.to_string()]
        );
    }

    #[test]
    fn quoted_phrase_keeps_quotes() {
        let keyword = &transform(r#""blood pressure".ti."#).keywords[0];
        assert_eq!(keyword.query_string, r#""blood pressure""#);
    }

    #[test]
    fn dotted_terms_keep_their_dots() {
        let keyword = &transform("h. pylori.tw.").keywords[0];
        assert_eq!(keyword.query_string, "h. pylori");
        assert_eq!(keyword.fields, vec![fields::TEXT_WORD]);
    }

    #[test]
    fn boolean_expression_builds_children() {
        let query = transform("(migraine.ti. and aura.ti.)");
        assert_eq!(query.operator, "and");
        assert_eq!(query.keywords.len(), 2);
        assert!(query.children.is_empty());
    }

    #[test]
    fn field_suffix_shapes() {
        assert_eq!(field_suffix(".mp."), Some("mp"));
        assert_eq!(field_suffix(".ti,ab."), Some("ti,ab"));
        assert_eq!(field_suffix(".title."), None);
        assert_eq!(field_suffix("mp"), None);
        assert_eq!(field_suffix(".."), None);
    }
}
