//! fieldsearch: structured custom-field search.
//!
//! A content platform's native search only looks at post excerpts and bodies.
//! fieldsearch widens it to searchable custom fields, including values nested
//! inside repeatable field groups, by rewriting the host's search SQL:
//!
//! 1. [`SearchContext::detect`] classifies each incoming query.
//! 2. [`QueryRewriter`] requests `DISTINCT`, joins the field-value table and
//!    replaces the free-text clause with one that ORs native columns and every
//!    resolved storage key, per keyword.
//! 3. [`ExcerptBuilder`] stitches an excerpt from the matching field values.
//!
//! [`FieldSearch`] wires these together around a field catalog and a store.
//!
//! # Example
//!
//! ```
//! use fieldsearch::{FieldSearch, HostQuery, NativeSearch, QueryRewriter};
//! use fieldsearch_fields::{FieldDefinition, FieldKind, StaticRegistry};
//! use fieldsearch_sql::Dialect;
//! use fieldsearch_store::{NewPost, SqliteStore, StoreTables};
//!
//! let store = SqliteStore::open_in_memory(StoreTables::default()).unwrap();
//! store.create_schema().unwrap();
//! let id = store.insert_post(&NewPost::new("About")).unwrap();
//! store.insert_meta(id, "bio", "Ada writes compilers").unwrap();
//!
//! let registry = StaticRegistry(vec![
//!     FieldDefinition::new("bio", "bio", FieldKind::TextLike).with_searchable(true),
//! ]);
//! let rewriter = QueryRewriter::new(store.tables(), Dialect::Sqlite).unwrap();
//! let search = FieldSearch::open(&registry, &store, rewriter);
//! let native = NativeSearch::new(store.tables(), Dialect::Sqlite).unwrap();
//!
//! let mut query = HostQuery::search("compilers");
//! let ctx = search.detect(&mut query);
//! let clauses = search.rewrite_clauses(ctx, native.clauses(&query));
//! let posts = store.search_posts(&native.select(&clauses, None)).unwrap();
//! assert_eq!(posts.len(), 1);
//! ```

#![warn(missing_docs)]

mod context;
mod excerpt;
mod native;
mod rewriter;
mod service;

pub use context::{SearchContext, SearchQuery};
pub use excerpt::{ExcerptBuilder, ExcerptOptions, compose_excerpt, strip_markup};
pub use native::{HostQuery, NativeSearch, split_terms};
pub use rewriter::{META_ALIAS, QueryClauses, QueryRewriter};
pub use service::{FieldSearch, FieldState};
