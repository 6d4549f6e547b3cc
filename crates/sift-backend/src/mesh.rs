//! The MeSH tree seam.
//!
//! Exploding a MeSH heading means searching the heading and everything below
//! it in the thesaurus. The tree itself is external; backends only need a
//! lookup from heading to descendants, loaded once at construction and shared
//! read-only afterwards.

use std::collections::HashMap;

use thiserror::Error;

/// Errors raised by a MeSH tree lookup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MeshError {
    /// The heading is not present in the tree.
    #[error("heading `{0}` is not present in the tree")]
    UnknownHeading(String),

    /// The provider failed for its own reasons.
    #[error("{0}")]
    Provider(String),
}

/// A read-only view of the MeSH hierarchy.
pub trait MeshProvider: Send + Sync {
    /// Returns the descendant headings of `heading`, not including itself.
    fn descendants(&self, heading: &str) -> Result<Vec<String>, MeshError>;
}

/// An in-memory MeSH tree, mainly for tests and small vocabularies.
#[derive(Debug, Clone, Default)]
pub struct StaticMeshTree {
    descendants: HashMap<String, Vec<String>>,
}

impl StaticMeshTree {
    /// Builds a tree from `(heading, descendants)` pairs.
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<S>)>,
        S: Into<String>,
    {
        let descendants = entries
            .into_iter()
            .map(|(heading, children)| {
                (
                    heading.into(),
                    children.into_iter().map(Into::into).collect(),
                )
            })
            .collect();
        Self { descendants }
    }
}

impl MeshProvider for StaticMeshTree {
    fn descendants(&self, heading: &str) -> Result<Vec<String>, MeshError> {
        self.descendants
            .get(heading)
            .cloned()
            .ok_or_else(|| MeshError::UnknownHeading(heading.to_string()))
    }
}
