//! Error types for dialect parsing.

use thiserror::Error;

/// Errors raised while parsing a keyword expression into the canonical tree.
#[derive(Debug, Error)]
pub enum ParseError {
    /// A double quote was opened but never closed.
    #[error("unclosed quote in `{0}`")]
    UnclosedQuote(String),

    /// Parentheses do not balance.
    #[error("mismatched parentheses in `{0}`")]
    MismatchedParentheses(String),

    /// A CQR document failed to deserialize.
    #[error("invalid CQR document: {0}")]
    Cqr(#[from] serde_json::Error),
}
