//! Intermediate representation for Boolean search strategies.
//!
//! Search strategies from biomedical literature databases are parsed into a
//! single canonical tree: a [`BooleanQuery`] whose operators are `and`, `or`,
//! `not`, or a proximity operator (`adj`, `adj2`, …) and whose leaves are
//! fielded [`Keyword`]s. Every dialect parser produces this tree and every
//! backend consumes it, so no backend ever needs to understand another
//! dialect.
//!
//! The crate also carries the canonical [field vocabulary](fields), the
//! dialect [field mappings](FieldMapping), and the [CQR](cqr) interchange
//! form used to round-trip queries through JSON.

#![warn(missing_docs)]

pub mod cqr;
pub mod fields;
mod mapping;
mod tree;

pub use mapping::{mapping_from_file, mapping_from_json, FieldMapping, MappingError};
pub use tree::{BooleanQuery, Keyword};
