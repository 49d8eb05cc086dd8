//! Error types for the fieldsearch-fields crate.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors raised while reading field definitions from a registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Failed to read a field-definition file.
    #[error("failed to read field definitions {path}: {source}")]
    ReadFile {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to parse a field-definition file.
    #[error("failed to parse field definitions {path}: {source}")]
    Parse {
        /// Path to the file that could not be parsed.
        path: PathBuf,
        /// Underlying TOML parse error.
        source: toml::de::Error,
    },
}

/// Configuration defects found while deriving storage-key patterns.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The parent chain of a field loops back on itself.
    #[error("field '{field}' has a cyclic parent chain: {}", chain.join(" -> "))]
    Cycle {
        /// Key of the field whose pattern was being derived.
        field: String,
        /// Keys visited, ending with the repeated one.
        chain: Vec<String>,
    },

    /// The parent chain of a field is deeper than the supported maximum.
    #[error("field '{field}' is nested deeper than {max} levels")]
    DepthExceeded {
        /// Key of the field whose pattern was being derived.
        field: String,
        /// The depth limit.
        max: usize,
    },

    /// The combined key patterns could not be compiled.
    #[error("failed to compile storage-key patterns: {0}")]
    Pattern(#[from] regex::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_display_shows_chain() {
        let err = ResolveError::Cycle {
            field: "a".into(),
            chain: vec!["a".into(), "b".into(), "a".into()],
        };
        assert_eq!(
            err.to_string(),
            "field 'a' has a cyclic parent chain: a -> b -> a"
        );
    }
}
