//! Error types for the fieldsearch-store crate.

use std::path::PathBuf;

use fieldsearch_sql::SqlError;
use thiserror::Error;

/// Errors that can occur when reading from or writing to the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to open the database.
    #[error("failed to open store at {path}: {source}")]
    Open {
        /// Path to the database file.
        path: PathBuf,
        /// Underlying SQLite error.
        source: rusqlite::Error,
    },

    /// A statement failed.
    #[error("store query failed: {0}")]
    Query(#[from] rusqlite::Error),

    /// A configured table name is not a valid identifier.
    #[error("invalid table name: {0}")]
    Table(#[from] SqlError),
}
