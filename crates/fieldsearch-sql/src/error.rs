//! Error types for SQL building and keyword scanning.

use std::{error::Error, fmt};

use thiserror::Error as ThisError;

/// Errors raised while composing SQL.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum SqlError {
    /// A table or column name is not a plain SQL identifier.
    #[error("invalid SQL identifier: {name:?}")]
    InvalidIdentifier {
        /// The rejected name.
        name: String,
    },
}

/// Scanner error with position information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanError {
    /// Error message.
    pub message: String,
    /// Byte position in input where the error occurred.
    pub position: usize,
    /// The scanned SQL fragment.
    pub input: String,
}

impl ScanError {
    /// Creates a new scanner error.
    pub fn new(message: impl Into<String>, position: usize, input: &str) -> Self {
        Self {
            message: message.into(),
            position,
            input: input.to_string(),
        }
    }

    /// Formats the error with a position indicator showing where the error occurred.
    pub fn format_with_context(&self) -> String {
        let mut result = String::new();
        result.push_str(&format!("sql scan error: {}\n", self.message));
        result.push_str(&format!("  {}\n", self.input));
        result.push_str(&format!(
            "  {}^",
            " ".repeat(self.position.min(self.input.len()))
        ));
        result
    }
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_with_context())
    }
}

impl Error for ScanError {}
