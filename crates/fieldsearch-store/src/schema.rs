//! Table names and schema for the SQLite store.

use fieldsearch_sql::Ident;

use crate::StoreError;

/// Table names used by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreTables {
    /// Posts table (`ID`, `post_title`, `post_excerpt`, `post_content`, `post_password`).
    pub posts: Ident,
    /// Field-value table (`meta_id`, `post_id`, `meta_key`, `meta_value`).
    pub meta: Ident,
}

impl StoreTables {
    /// Validates and creates a table-name pair.
    pub fn new(posts: &str, meta: &str) -> Result<Self, StoreError> {
        Ok(Self {
            posts: Ident::new(posts)?,
            meta: Ident::new(meta)?,
        })
    }

    /// Returns the DDL creating both tables if they do not exist.
    pub(crate) fn ddl(&self) -> String {
        format!(
            "CREATE TABLE IF NOT EXISTS {posts} (
                ID INTEGER PRIMARY KEY AUTOINCREMENT,
                post_title TEXT NOT NULL DEFAULT '',
                post_excerpt TEXT NOT NULL DEFAULT '',
                post_content TEXT NOT NULL DEFAULT '',
                post_password TEXT NOT NULL DEFAULT ''
            );
            CREATE TABLE IF NOT EXISTS {meta} (
                meta_id INTEGER PRIMARY KEY AUTOINCREMENT,
                post_id INTEGER NOT NULL,
                meta_key TEXT,
                meta_value
            );
            CREATE INDEX IF NOT EXISTS {meta}_post_id ON {meta} (post_id);
            CREATE INDEX IF NOT EXISTS {meta}_meta_key ON {meta} (meta_key);",
            posts = self.posts,
            meta = self.meta,
        )
    }
}

impl Default for StoreTables {
    fn default() -> Self {
        Self {
            posts: Ident::from_static("posts"),
            meta: Ident::from_static("postmeta"),
        }
    }
}
