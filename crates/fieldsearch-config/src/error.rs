//! Error types for fieldsearch configuration.

use std::io;
use std::path::PathBuf;

use thiserror::Error;
use toml::de;

/// Errors that can occur when loading or processing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to parse TOML configuration.
    #[error("failed to parse config file {path}: {source}")]
    ParseToml {
        /// Path to the file that could not be parsed.
        path: PathBuf,
        /// Underlying TOML parse error.
        source: de::Error,
    },

    /// Failed to determine home directory.
    #[error("could not determine home directory")]
    NoHomeDirectory,
}
