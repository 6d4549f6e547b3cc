//! Dialect field mappings.

use std::{collections::HashMap, fs, io, path::Path, path::PathBuf};

use thiserror::Error;

/// A many-to-many mapping from dialect field names to canonical fields.
///
/// Every mapping must carry a `default` entry; it is used whenever a keyword
/// reaches a backend or parser without fields of its own.
pub type FieldMapping = HashMap<String, Vec<String>>;

/// Errors raised when loading a field mapping.
#[derive(Debug, Error)]
pub enum MappingError {
    /// Failed to read the mapping file.
    #[error("failed to read field mapping {path}: {source}")]
    ReadFile {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The mapping file is not a JSON object of string arrays.
    #[error("failed to parse field mapping: {0}")]
    Parse(#[from] serde_json::Error),

    /// The mapping has no `default` entry.
    #[error("a `default` entry must exist in the field mapping")]
    MissingDefault,
}

/// Parses a field mapping from a JSON object `{name: [field, …]}`.
pub fn mapping_from_json(contents: &str) -> Result<FieldMapping, MappingError> {
    let mapping: FieldMapping = serde_json::from_str(contents)?;
    if !mapping.contains_key("default") {
        return Err(MappingError::MissingDefault);
    }
    Ok(mapping)
}

/// Loads a field mapping from a JSON file.
pub fn mapping_from_file(path: &Path) -> Result<FieldMapping, MappingError> {
    let contents = fs::read_to_string(path).map_err(|source| MappingError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    mapping_from_json(&contents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_mapping() {
        let mapping =
            mapping_from_json(r#"{"default": ["title", "text"], "ti": ["title"]}"#).unwrap();
        assert_eq!(mapping["ti"], vec!["title"]);
        assert_eq!(mapping["default"].len(), 2);
    }

    #[test]
    fn rejects_missing_default() {
        let err = mapping_from_json(r#"{"ti": ["title"]}"#).unwrap_err();
        assert!(matches!(err, MappingError::MissingDefault));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(mapping_from_json(r#"{"ti": "title"}"#).is_err());
    }
}
