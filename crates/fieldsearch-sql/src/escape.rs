//! Escaping layer for values interpolated into generated SQL.
//!
//! Every keyword and storage key that ends up in rewritten SQL passes through
//! [`quote_literal`], and every `LIKE` needle through [`escape_like`]. Table and
//! column names are never quoted; they must be plain identifiers instead.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::SqlError;

/// Escape character used in every generated `LIKE` comparison.
pub const LIKE_ESCAPE: char = '!';

/// SQL dialect of the relational store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// SQLite: only the quote character needs escaping.
    #[default]
    Sqlite,
    /// MySQL/MariaDB with backslash escapes enabled.
    MySql,
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sqlite => write!(f, "sqlite"),
            Self::MySql => write!(f, "mysql"),
        }
    }
}

/// Renders `value` as a single-quoted SQL string literal.
///
/// NUL characters are dropped since neither dialect accepts them inside
/// statement text.
pub fn quote_literal(value: &str, dialect: Dialect) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for ch in value.chars() {
        match ch {
            '\'' => out.push_str("''"),
            '\\' if dialect == Dialect::MySql => out.push_str("\\\\"),
            '\0' => {}
            _ => out.push(ch),
        }
    }
    out.push('\'');
    out
}

/// Escapes `LIKE` wildcards in `value` using [`LIKE_ESCAPE`].
pub fn escape_like(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        if ch == '%' || ch == '_' || ch == LIKE_ESCAPE {
            out.push(LIKE_ESCAPE);
        }
        out.push(ch);
    }
    out
}

/// Returns true if `name` is a plain SQL identifier (`[A-Za-z_][A-Za-z0-9_]*`).
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// A validated SQL identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ident(String);

impl Ident {
    /// Validates `name` as an identifier.
    pub fn new(name: impl Into<String>) -> Result<Self, SqlError> {
        let name = name.into();
        if is_identifier(&name) {
            Ok(Self(name))
        } else {
            Err(SqlError::InvalidIdentifier { name })
        }
    }

    /// Wraps an identifier literal without a fallible check.
    ///
    /// For names fixed in source; debug builds still assert they are plain
    /// identifiers.
    pub fn from_static(name: &'static str) -> Self {
        debug_assert!(is_identifier(name), "not an identifier: {name:?}");
        Self(name.to_string())
    }

    /// Returns the identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A table-qualified column reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Column {
    /// Table name or alias.
    pub table: Ident,
    /// Column name.
    pub name: Ident,
}

impl Column {
    /// Creates a column reference, validating both parts.
    pub fn new(table: &str, name: &str) -> Result<Self, SqlError> {
        Ok(Self {
            table: Ident::new(table)?,
            name: Ident::new(name)?,
        })
    }

    /// Creates a column on an already validated table identifier.
    pub fn of(table: &Ident, name: &str) -> Result<Self, SqlError> {
        Ok(Self {
            table: table.clone(),
            name: Ident::new(name)?,
        })
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.table, self.name)
    }
}
