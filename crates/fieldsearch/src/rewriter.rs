//! Search SQL rewriting.
//!
//! The host assembles a post query from separate clauses. For searches the
//! rewriter asks for `DISTINCT`, joins the field-value table under a fixed
//! alias, and replaces the host's free-text clause with one that also matches
//! resolved field values.
//!
//! Field matches are correlated `EXISTS` tests rather than comparisons on the
//! joined row, so each keyword may be found in a different field of the same
//! post.

use fieldsearch_fields::ResolvedMetaKeys;
use fieldsearch_sql::{Column, Condition, Dialect, Ident, SqlError, extract_keywords};
use fieldsearch_store::StoreTables;
use tracing::{debug, warn};

use crate::SearchContext;

/// Alias under which the field-value table is joined.
pub const META_ALIAS: &str = "fieldsearch_meta";

/// Alias of the field-value table inside each `EXISTS` subquery.
const MATCH_ALIAS: &str = "fieldsearch_match";

/// The clauses of a host post query that the rewriter touches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryClauses {
    /// Duplicate-elimination clause (`""` or `"DISTINCT"`).
    pub distinct: String,
    /// Join clauses appended after `FROM <posts>`.
    pub join: String,
    /// Free-text search clause appended to `WHERE 1=1`.
    pub search: String,
}

/// Rewrites search clauses for a fixed pair of tables.
#[derive(Debug, Clone)]
pub struct QueryRewriter {
    /// Literal quoting rules.
    dialect: Dialect,
    /// Field-value table.
    meta: Ident,
    /// Subquery alias of the field-value table.
    match_alias: Ident,
    /// `posts.ID`.
    post_id: Column,
    /// `posts.post_excerpt`.
    post_excerpt: Column,
    /// `posts.post_content`.
    post_content: Column,
    /// `posts.post_password`.
    post_password: Column,
    /// Joined `post_id`.
    meta_post_id: Column,
    /// Subquery `post_id`.
    match_post_id: Column,
    /// Subquery `meta_key`.
    match_key: Column,
    /// Subquery `meta_value`.
    match_value: Column,
}

impl QueryRewriter {
    /// Creates a rewriter for the given tables.
    pub fn new(tables: &StoreTables, dialect: Dialect) -> Result<Self, SqlError> {
        let alias = Ident::new(META_ALIAS)?;
        let match_alias = Ident::new(MATCH_ALIAS)?;
        Ok(Self {
            dialect,
            meta: tables.meta.clone(),
            post_id: Column::of(&tables.posts, "ID")?,
            post_excerpt: Column::of(&tables.posts, "post_excerpt")?,
            post_content: Column::of(&tables.posts, "post_content")?,
            post_password: Column::of(&tables.posts, "post_password")?,
            meta_post_id: Column::of(&alias, "post_id")?,
            match_post_id: Column::of(&match_alias, "post_id")?,
            match_key: Column::of(&match_alias, "meta_key")?,
            match_value: Column::of(&match_alias, "meta_value")?,
            match_alias,
        })
    }

    /// Ensures the query requests duplicate elimination.
    pub fn shape_distinct(
        &self,
        ctx: SearchContext,
        keys: &ResolvedMetaKeys,
        distinct: &str,
    ) -> String {
        if !augments(ctx, keys) || distinct.to_ascii_uppercase().contains("DISTINCT") {
            return distinct.to_string();
        }
        String::from("DISTINCT")
    }

    /// Appends the field-value join unless it is already present.
    pub fn shape_join(&self, ctx: SearchContext, keys: &ResolvedMetaKeys, join: &str) -> String {
        if !augments(ctx, keys) || join.contains(META_ALIAS) {
            return join.to_string();
        }
        format!(
            "{join} LEFT JOIN {} AS {META_ALIAS} ON ({} = {})",
            self.meta, self.post_id, self.meta_post_id
        )
    }

    /// Replaces the host's free-text clause.
    ///
    /// The fragment is returned unchanged when the query is not a search, no
    /// storage keys are resolved, or no keywords can be recovered from it.
    pub fn rewrite_where(
        &self,
        ctx: SearchContext,
        keys: &ResolvedMetaKeys,
        search: &str,
    ) -> String {
        if !augments(ctx, keys) {
            return search.to_string();
        }

        let keywords = match extract_keywords(search, self.dialect) {
            Ok(keywords) => keywords,
            Err(e) => {
                warn!("leaving search clause unchanged:\n{}", e.format_with_context());
                return search.to_string();
            }
        };
        if keywords.is_empty() {
            debug!("no keywords in search clause");
            return search.to_string();
        }
        debug!(?keywords, keys = keys.len(), "rewriting search clause");

        let condition = self.search_condition(&keywords, keys);
        let guard = Condition::empty(self.post_password.clone());
        format!(
            " AND {} AND ({}) ",
            condition.to_sql(self.dialect),
            guard.to_sql(self.dialect)
        )
    }

    /// Runs all three stages over a set of clauses.
    pub fn rewrite(
        &self,
        ctx: SearchContext,
        keys: &ResolvedMetaKeys,
        clauses: &QueryClauses,
    ) -> QueryClauses {
        QueryClauses {
            distinct: self.shape_distinct(ctx, keys, &clauses.distinct),
            join: self.shape_join(ctx, keys, &clauses.join),
            search: self.rewrite_where(ctx, keys, &clauses.search),
        }
    }

    /// Builds the keyword condition: one OR-group per keyword, ANDed together.
    ///
    /// Each group holds one `EXISTS` test per resolved key (a field-value row
    /// of the post with that key whose value contains the keyword), followed by
    /// the excerpt and content comparisons.
    pub fn search_condition(&self, keywords: &[String], keys: &ResolvedMetaKeys) -> Condition {
        let groups = keywords
            .iter()
            .map(|keyword| {
                let mut alternatives: Vec<Condition> = keys
                    .iter()
                    .map(|key| self.field_contains(key, keyword))
                    .collect();
                alternatives.push(Condition::contains(self.post_excerpt.clone(), keyword));
                alternatives.push(Condition::contains(self.post_content.clone(), keyword));
                Condition::or(alternatives)
            })
            .collect();
        Condition::and(groups)
    }

    /// Tests whether the post has a `key` row whose value contains `keyword`.
    fn field_contains(&self, key: &str, keyword: &str) -> Condition {
        Condition::exists(
            self.meta.clone(),
            self.match_alias.clone(),
            self.match_post_id.clone(),
            self.post_id.clone(),
            Condition::and(vec![
                Condition::equals(self.match_key.clone(), key),
                Condition::contains(self.match_value.clone(), keyword),
            ]),
        )
    }
}

/// Returns true if structured-field augmentation applies.
fn augments(ctx: SearchContext, keys: &ResolvedMetaKeys) -> bool {
    ctx.is_search() && !keys.is_empty()
}
