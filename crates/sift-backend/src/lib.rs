//! Backends compiling the canonical query tree into concrete queries.
//!
//! A [`Backend`] consumes a [`BooleanQuery`] and produces a
//! [`CompiledQuery`], a tagged value holding whichever shape the target
//! system wants: a JSON query DSL for Elasticsearch, line-numbered text for
//! Medline, a parenthesized string for PubMed and Terrier, the CQR
//! interchange tree, or the untouched intermediate representation.
//!
//! Backends are immutable once constructed and safe to share across threads;
//! each compile call builds its own output.

#![warn(missing_docs)]

mod cqr;
mod elasticsearch;
mod error;
mod ir;
mod medline;
mod mesh;
mod pubmed;
mod terrier;

use serde_json::Value;
use sift_ir::{cqr::CqrNode, BooleanQuery};

pub use cqr::CqrBackend;
pub use elasticsearch::ElasticsearchBackend;
pub use error::BackendError;
pub use ir::IrBackend;
pub use medline::MedlineBackend;
pub use mesh::{MeshError, MeshProvider, StaticMeshTree};
pub use pubmed::PubmedBackend;
pub use terrier::TerrierBackend;

/// A compiler from the canonical tree to one target query language.
pub trait Backend: Send + Sync {
    /// Compiles a query tree into the backend's output shape.
    fn compile(&self, query: &BooleanQuery) -> Result<CompiledQuery, BackendError>;
}

/// The output of a backend compilation.
#[derive(Debug, Clone, PartialEq)]
pub enum CompiledQuery {
    /// An Elasticsearch query DSL body.
    Elasticsearch(Value),
    /// A line-numbered Medline search strategy.
    Medline(String),
    /// A parenthesized PubMed query.
    Pubmed(String),
    /// A Terrier query string.
    Terrier(String),
    /// The CQR interchange tree.
    Cqr(CqrNode),
    /// The intermediate representation itself.
    Ir(BooleanQuery),
}

impl CompiledQuery {
    /// The typed representation as a JSON value.
    pub fn representation(&self) -> Result<Value, BackendError> {
        match self {
            Self::Elasticsearch(value) => Ok(value.clone()),
            Self::Medline(text) | Self::Pubmed(text) | Self::Terrier(text) => {
                Ok(Value::String(text.clone()))
            }
            Self::Cqr(node) => Ok(serde_json::to_value(node)?),
            Self::Ir(query) => Ok(serde_json::to_value(query)?),
        }
    }

    /// The compact string form: JSON on one line, or the text itself for the
    /// text dialects.
    pub fn to_compact_string(&self) -> Result<String, BackendError> {
        match self {
            Self::Medline(text) | Self::Pubmed(text) | Self::Terrier(text) => Ok(text.clone()),
            Self::Elasticsearch(value) => Ok(serde_json::to_string(value)?),
            Self::Cqr(node) => Ok(serde_json::to_string(node)?),
            Self::Ir(query) => Ok(serde_json::to_string(query)?),
        }
    }

    /// The indented string form.
    pub fn to_pretty_string(&self) -> Result<String, BackendError> {
        match self {
            Self::Medline(text) | Self::Pubmed(text) | Self::Terrier(text) => Ok(text.clone()),
            Self::Elasticsearch(value) => Ok(serde_json::to_string_pretty(value)?),
            Self::Cqr(node) => Ok(serde_json::to_string_pretty(node)?),
            Self::Ir(query) => Ok(serde_json::to_string_pretty(query)?),
        }
    }
}
