//! SQLite-backed store.

use std::{error::Error, path::Path, str, sync::Arc};

use regex::Regex;
use rusqlite::{
    Connection, OptionalExtension, Row, ToSql,
    functions::FunctionFlags,
    params, params_from_iter,
    types::ValueRef,
};
use tracing::debug;

use crate::{MetaRow, MetaStore, MetaValue, NewPost, PostRow, StoreError, StoreTables};

/// Boxed error type accepted by SQLite user functions.
type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// A store backed by a SQLite database.
#[derive(Debug)]
pub struct SqliteStore {
    /// Open connection with the `regexp` function registered.
    conn: Connection,
    /// Table names.
    tables: StoreTables,
}

impl SqliteStore {
    /// Opens (or creates) a database file.
    pub fn open(path: &Path, tables: StoreTables) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|source| StoreError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::with_connection(conn, tables)
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory(tables: StoreTables) -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?, tables)
    }

    /// Wraps an existing connection, registering the `regexp` function on it.
    pub fn with_connection(conn: Connection, tables: StoreTables) -> Result<Self, StoreError> {
        register_regexp(&conn)?;
        Ok(Self { conn, tables })
    }

    /// Returns the configured table names.
    pub fn tables(&self) -> &StoreTables {
        &self.tables
    }

    /// Creates the posts and field-value tables if they do not exist.
    pub fn create_schema(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(&self.tables.ddl())?;
        Ok(())
    }

    /// Inserts a post and returns its identifier.
    pub fn insert_post(&self, post: &NewPost) -> Result<i64, StoreError> {
        let sql = format!(
            "INSERT INTO {} (post_title, post_excerpt, post_content, post_password) VALUES (?1, ?2, ?3, ?4)",
            self.tables.posts
        );
        self.conn.execute(
            &sql,
            params![post.title, post.excerpt, post.content, post.password],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Inserts a field value for a post.
    pub fn insert_meta(&self, post_id: i64, key: &str, value: impl ToSql) -> Result<(), StoreError> {
        let sql = format!(
            "INSERT INTO {} (post_id, meta_key, meta_value) VALUES (?1, ?2, ?3)",
            self.tables.meta
        );
        self.conn.execute(&sql, params![post_id, key, value])?;
        Ok(())
    }

    /// Looks up a single post by identifier.
    pub fn post(&self, post_id: i64) -> Result<Option<PostRow>, StoreError> {
        let sql = format!(
            "SELECT ID, post_title, post_excerpt, post_content FROM {} WHERE ID = ?1",
            self.tables.posts
        );
        let row = self
            .conn
            .query_row(&sql, [post_id], read_post_row)
            .optional()?;
        Ok(row)
    }

    /// Executes a search statement selecting `ID, post_title, post_excerpt, post_content`.
    pub fn search_posts(&self, sql: &str) -> Result<Vec<PostRow>, StoreError> {
        debug!(sql, "executing search statement");
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt
            .query_map([], read_post_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

impl MetaStore for SqliteStore {
    fn distinct_keys_matching(&self, patterns: &[String]) -> Result<Vec<String>, StoreError> {
        if patterns.is_empty() {
            debug!("no key patterns; skipping key query");
            return Ok(Vec::new());
        }

        let predicate = (1..=patterns.len())
            .map(|i| format!("meta_key REGEXP ?{i}"))
            .collect::<Vec<_>>()
            .join(" OR ");
        let sql = format!(
            "SELECT DISTINCT meta_key FROM {} WHERE {predicate} ORDER BY meta_key",
            self.tables.meta
        );
        debug!(patterns = patterns.len(), "resolving storage keys");

        let mut stmt = self.conn.prepare(&sql)?;
        let keys = stmt
            .query_map(params_from_iter(patterns), |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(keys)
    }

    fn post_meta(&self, post_id: i64) -> Result<Vec<MetaRow>, StoreError> {
        let sql = format!(
            "SELECT meta_id, post_id, meta_key, meta_value FROM {} WHERE post_id = ?1 ORDER BY meta_id",
            self.tables.meta
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map([post_id], |row| {
                let value = match row.get_ref(3)? {
                    ValueRef::Text(bytes) => String::from_utf8(bytes.to_vec())
                        .map_or(MetaValue::NonText, MetaValue::Text),
                    _ => MetaValue::NonText,
                };
                Ok(MetaRow {
                    meta_id: row.get(0)?,
                    post_id: row.get(1)?,
                    key: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                    value,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

/// Maps a `ID, post_title, post_excerpt, post_content` row.
fn read_post_row(row: &Row<'_>) -> rusqlite::Result<PostRow> {
    Ok(PostRow {
        id: row.get(0)?,
        title: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
        excerpt: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        content: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
    })
}

/// Registers `regexp(pattern, text)` so `text REGEXP pattern` works.
///
/// Compiled patterns are cached per statement argument. NULL text never matches.
fn register_regexp(conn: &Connection) -> Result<(), StoreError> {
    conn.create_scalar_function(
        "regexp",
        2,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let pattern: Arc<Regex> = ctx.get_or_create_aux(0, |vr| -> Result<_, BoxError> {
                Ok(Regex::new(vr.as_str()?)?)
            })?;
            let matched = match ctx.get_raw(1) {
                ValueRef::Text(bytes) => {
                    str::from_utf8(bytes).is_ok_and(|text| pattern.is_match(text))
                }
                _ => false,
            };
            Ok(matched)
        },
    )?;
    Ok(())
}
