//! SQL building blocks for fieldsearch.
//!
//! This crate provides everything the query rewriter needs to produce SQL text safely:
//!
//! - **Escaping**: dialect-aware string literals and `LIKE` patterns
//! - **Identifiers**: validated table and column names
//! - **Conditions**: a small boolean condition tree rendered as SQL
//! - **Keyword scanning**: recovering search keywords from host-templated SQL
//!
//! # Example
//!
//! ```
//! use fieldsearch_sql::{Column, Condition, Dialect, extract_keywords};
//!
//! let fragment = "AND (posts.post_content LIKE '%Rust%')";
//! let keywords = extract_keywords(fragment, Dialect::Sqlite).unwrap();
//! assert_eq!(keywords, vec!["Rust".to_string()]);
//!
//! let content = Column::new("posts", "post_content").unwrap();
//! let cond = Condition::contains(content, &keywords[0]);
//! assert_eq!(
//!     cond.to_sql(Dialect::Sqlite),
//!     "LOWER(posts.post_content) LIKE '%rust%' ESCAPE '!'"
//! );
//! ```

#![warn(missing_docs)]

mod error;
mod escape;
mod expr;
mod keywords;

pub use error::{ScanError, SqlError};
pub use escape::{Column, Dialect, Ident, LIKE_ESCAPE, escape_like, is_identifier, quote_literal};
pub use expr::Condition;
pub use keywords::extract_keywords;
