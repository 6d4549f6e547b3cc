//! Error types for search-strategy lexing.

use thiserror::Error;

/// Errors raised while resolving line references in a search strategy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    /// A token where a line number was expected did not parse as an integer.
    #[error("invalid line reference `{token}` on line {line}")]
    InvalidReference {
        /// The offending token.
        token: String,
        /// The line the reference appears on.
        line: usize,
    },

    /// A reference names a line that does not exist in the strategy.
    #[error("line {line} references line {referenced}, which is not defined")]
    UnknownLine {
        /// The line holding the reference.
        line: usize,
        /// The missing line number.
        referenced: usize,
    },

    /// A range reference `OP/N-M` with `N > M`.
    #[error("inverted range {from}-{to} on line {line}")]
    InvertedRange {
        /// Range start.
        from: usize,
        /// Range end.
        to: usize,
        /// The line holding the range.
        line: usize,
    },

    /// Reference expansion exceeded the recursion bound, which indicates a
    /// circular reference.
    #[error("found a possible recursive rule while expanding line {line}")]
    RecursionLimit {
        /// The root line being expanded.
        line: usize,
    },
}
