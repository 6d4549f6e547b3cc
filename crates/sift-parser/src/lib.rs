//! Dialect parsers for Boolean search strategies.
//!
//! Each supported input dialect (Medline/Ovid, PubMed, and CQR JSON)
//! implements [`QueryTransformer`], turning one keyword expression into the
//! canonical [`BooleanQuery`] tree. A [`QueryParser`] pairs a transformer
//! with a field mapping and walks the lexer's line-reference tree, so a
//! numbered multi-line strategy and a one-line query parse the same way.
//!
//! The infix dialects share a tokenizer and a shunting-yard pass; the field
//! syntax (`.mp.` suffixes versus `[tiab]` brackets) and operator precedence
//! are what set them apart.

#![warn(missing_docs)]

mod cqr;
mod error;
mod medline;
mod pubmed;
mod shunting;
mod tokens;

use sift_ir::{BooleanQuery, FieldMapping};
use sift_lexer::Node;

pub use cqr::{cqr_mapping, CqrTransformer};
pub use error::ParseError;
pub use medline::{medline_mapping, MedlineTransformer};
pub use pubmed::{pubmed_mapping, PubMedTransformer};

/// A dialect-specific transformation from raw keyword expressions to the
/// canonical tree.
pub trait QueryTransformer: Send + Sync {
    /// Parses one keyword expression (a single lexer-node value, which may
    /// itself contain nested parenthesized groups).
    fn transform_nested(
        &self,
        query: &str,
        mapping: &FieldMapping,
    ) -> Result<BooleanQuery, ParseError>;
}

/// A dialect parser: a transformer plus the field mapping it consults.
pub struct QueryParser {
    field_mapping: FieldMapping,
    transformer: Box<dyn QueryTransformer>,
}

impl QueryParser {
    /// Pairs a transformer with a field mapping.
    pub fn new(transformer: Box<dyn QueryTransformer>, field_mapping: FieldMapping) -> Self {
        Self {
            field_mapping,
            transformer,
        }
    }

    /// A parser for Ovid Medline search strategies.
    pub fn medline() -> Self {
        Self::new(Box::new(MedlineTransformer), medline_mapping())
    }

    /// A parser for PubMed queries.
    pub fn pubmed() -> Self {
        Self::new(Box::new(PubMedTransformer), pubmed_mapping())
    }

    /// A parser for CQR JSON documents.
    pub fn cqr() -> Self {
        Self::new(Box::new(CqrTransformer), cqr_mapping())
    }

    /// Replaces the field mapping, e.g. with one loaded from disk.
    pub fn set_field_mapping(&mut self, mapping: FieldMapping) {
        self.field_mapping = mapping;
    }

    /// The mapping currently in use.
    pub fn field_mapping(&self) -> &FieldMapping {
        &self.field_mapping
    }

    /// Parses a lexer tree into the canonical query tree.
    ///
    /// Terminal nodes hold raw keyword expressions for the transformer;
    /// reference nodes become operator groups. A terminal that transforms to
    /// a lone operator-less keyword is hoisted into its parent's keywords, so
    /// `or/1-6` over six keyword lines yields one `or` node with six
    /// keywords.
    pub fn parse(&self, node: &Node) -> Result<BooleanQuery, ParseError> {
        if node.operator.is_empty() && node.children.is_empty() {
            return self
                .transformer
                .transform_nested(&node.value, &self.field_mapping);
        }

        let mut query = BooleanQuery::with_operator(node.operator.clone());
        for child in &node.children {
            if child.operator.is_empty() && child.children.is_empty() {
                let sub = self
                    .transformer
                    .transform_nested(&child.value, &self.field_mapping)?;
                if sub.operator.is_empty() && sub.children.is_empty() {
                    query.keywords.extend(sub.keywords);
                } else {
                    query.children.push(sub);
                }
            } else {
                query.children.push(self.parse(child)?);
            }
        }
        Ok(query)
    }
}
