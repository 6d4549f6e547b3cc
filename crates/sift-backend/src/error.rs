//! Error types for query compilation.

use thiserror::Error;

use crate::mesh::MeshError;

/// Errors raised while compiling the canonical tree into a backend query.
#[derive(Debug, Error)]
pub enum BackendError {
    /// A `not` node with nothing to subtract from.
    #[error("a not query cannot have fewer than two operands")]
    NotOperands,

    /// A group reached the Elasticsearch lowering without an operator.
    #[error("no operator was defined for a boolean group")]
    MissingOperator,

    /// A keyword reached the Elasticsearch lowering without fields.
    #[error("the query `{0}` does not contain any fields")]
    MissingFields(String),

    /// An adjacency group contains a child that is not an `or` group.
    #[error("unsupported operator for slop `{0}`")]
    UnsupportedSlopChild(String),

    /// An adjacency operator whose distance is not in 1..=99.
    #[error("invalid adjacency operator `{0}`")]
    InvalidAdjacency(String),

    /// A MeSH tree lookup failed during explosion.
    #[error("mesh tree lookup failed: {0}")]
    Mesh(#[from] MeshError),

    /// JSON encoding failed.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}
