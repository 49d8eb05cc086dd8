//! Post and field-value store access for fieldsearch.
//!
//! Structured field values live in a generic key/value row table (one row per
//! post, storage key and value). This crate defines the [`MetaStore`] seam the
//! key resolver and excerpt builder read through, and a SQLite implementation
//! that registers a `REGEXP` function so storage keys can be matched in SQL.
//!
//! # Example
//!
//! ```
//! use fieldsearch_store::{MetaStore, NewPost, SqliteStore, StoreTables};
//!
//! let store = SqliteStore::open_in_memory(StoreTables::default()).unwrap();
//! store.create_schema().unwrap();
//! let id = store.insert_post(&NewPost::new("Hello")).unwrap();
//! store.insert_meta(id, "team_0_member_name", "Ada").unwrap();
//!
//! let keys = store
//!     .distinct_keys_matching(&["^team_[0-9]+_member_name$".to_string()])
//!     .unwrap();
//! assert_eq!(keys, vec!["team_0_member_name".to_string()]);
//! ```

#![warn(missing_docs)]

mod error;
mod row;
mod schema;
mod sqlite;

pub use error::StoreError;
pub use row::{MetaRow, MetaValue, NewPost, PostRow};
pub use schema::StoreTables;
pub use sqlite::SqliteStore;

/// Read access to stored field values.
///
/// Implementations must be safe to call repeatedly; both operations are
/// read-only.
pub trait MetaStore {
    /// Returns every distinct storage key matching at least one of the anchored
    /// regular expressions in `patterns`.
    ///
    /// An empty pattern list returns an empty result without querying the store.
    fn distinct_keys_matching(&self, patterns: &[String]) -> Result<Vec<String>, StoreError>;

    /// Returns all field-value rows for a post, in storage order.
    fn post_meta(&self, post_id: i64) -> Result<Vec<MetaRow>, StoreError>;
}
