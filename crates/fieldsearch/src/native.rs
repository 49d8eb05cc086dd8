//! The host's own search template.
//!
//! [`NativeSearch`] renders the free-text clause the way the host platform
//! does before any rewriting: each term becomes a `LIKE` literal wrapped in
//! percent signs (or a random placeholder standing in for them), matched
//! against the excerpt and content columns. [`NativeSearch::select`] then
//! assembles a complete post query from (possibly rewritten) clauses.

use std::sync::LazyLock;

use fieldsearch_sql::{Column, Dialect, Ident, SqlError, quote_literal};
use fieldsearch_store::StoreTables;
use regex::Regex;

use crate::{QueryClauses, SearchQuery};

/// A double-quoted phrase or a run of non-separator characters.
static TERM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""[^"]*(?:"|$)|[^\s",+]+"#).expect("term pattern is valid"));

/// Splits a search string into distinct terms.
///
/// Double-quoted phrases are kept whole; everything else splits on whitespace,
/// commas and plus signs.
pub fn split_terms(search: &str) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();
    for m in TERM.find_iter(search) {
        let term = m.as_str().trim_matches('"').trim();
        if !term.is_empty() && !terms.iter().any(|t| t == term) {
            terms.push(term.to_string());
        }
    }
    terms
}

/// Host-style search clause generator.
#[derive(Debug, Clone)]
pub struct NativeSearch {
    /// Literal quoting rules.
    dialect: Dialect,
    /// Placeholder replacing `%` in rendered literals, if any.
    placeholder: Option<String>,
    /// Posts table.
    posts: Ident,
    /// `posts.ID`.
    id: Column,
    /// `posts.post_title`.
    title: Column,
    /// `posts.post_excerpt`.
    excerpt: Column,
    /// `posts.post_content`.
    content: Column,
    /// `posts.post_password`.
    password: Column,
}

impl NativeSearch {
    /// Creates a generator for the given tables.
    pub fn new(tables: &StoreTables, dialect: Dialect) -> Result<Self, SqlError> {
        let posts = &tables.posts;
        Ok(Self {
            dialect,
            placeholder: None,
            posts: posts.clone(),
            id: Column::of(posts, "ID")?,
            title: Column::of(posts, "post_title")?,
            excerpt: Column::of(posts, "post_excerpt")?,
            content: Column::of(posts, "post_content")?,
            password: Column::of(posts, "post_password")?,
        })
    }

    /// Renders `%` as `{placeholder}` in search literals.
    ///
    /// The placeholder must be alphanumeric; it is removed again by
    /// [`NativeSearch::select`].
    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Renders the free-text clause for `search`.
    ///
    /// Returns an empty string when `search` holds no terms.
    pub fn search_clause(&self, search: &str) -> String {
        let terms = split_terms(search);
        if terms.is_empty() {
            return String::new();
        }

        let escape = match self.dialect {
            Dialect::Sqlite => " ESCAPE char(92)",
            Dialect::MySql => "",
        };
        let groups: Vec<String> = terms
            .iter()
            .map(|term| {
                let literal = quote_literal(&self.mark(term), self.dialect);
                format!(
                    "(({} LIKE {literal}{escape}) OR ({} LIKE {literal}{escape}))",
                    self.excerpt, self.content
                )
            })
            .collect();

        format!(
            " AND ({}) AND ({} = '') ",
            groups.join(" AND "),
            self.password
        )
    }

    /// Returns the unmodified clauses the host would generate for `query`.
    pub fn clauses<Q: SearchQuery + ?Sized>(&self, query: &Q) -> QueryClauses {
        let search = match query.search_term() {
            Some(term) if query.is_search_query() => self.search_clause(term),
            _ => String::new(),
        };
        QueryClauses {
            distinct: String::new(),
            join: String::new(),
            search,
        }
    }

    /// Assembles the post query for `clauses`, newest first.
    pub fn select(&self, clauses: &QueryClauses, limit: Option<usize>) -> String {
        let mut sql = format!(
            "SELECT {} {}, {}, {}, {} FROM {}{} WHERE 1=1{} ORDER BY {} DESC",
            clauses.distinct,
            self.id,
            self.title,
            self.excerpt,
            self.content,
            self.posts,
            clauses.join,
            clauses.search,
            self.id,
        );
        if let Some(limit) = limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }
        self.remove_placeholder(&sql)
    }

    /// Wraps an escaped term in `%` markers, substituting the placeholder.
    fn mark(&self, term: &str) -> String {
        let pattern = format!("%{}%", escape_like_backslash(term));
        match &self.placeholder {
            Some(p) => pattern.replace('%', &format!("{{{p}}}")),
            None => pattern,
        }
    }

    /// Turns placeholders back into `%`.
    fn remove_placeholder(&self, sql: &str) -> String {
        match &self.placeholder {
            Some(p) => sql.replace(&format!("{{{p}}}"), "%"),
            None => sql.to_string(),
        }
    }
}

/// Escapes `\`, `%` and `_` with a backslash.
fn escape_like_backslash(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// A minimal host query: a search term plus front-end/admin flag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostQuery {
    /// Search term, if this is a search.
    term: Option<String>,
    /// Whether the query comes from the back office.
    admin: bool,
}

impl HostQuery {
    /// A front-end search for `term`.
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            term: Some(term.into()),
            admin: false,
        }
    }

    /// A plain listing query.
    pub fn listing() -> Self {
        Self::default()
    }

    /// Marks the query as coming from the back office.
    #[must_use]
    pub fn in_admin(mut self) -> Self {
        self.admin = true;
        self
    }
}

impl SearchQuery for HostQuery {
    fn is_search_query(&self) -> bool {
        self.term.is_some()
    }

    fn is_admin(&self) -> bool {
        self.admin
    }

    fn search_term(&self) -> Option<&str> {
        self.term.as_deref()
    }

    fn set_search_term(&mut self, term: String) {
        self.term = Some(term);
    }
}

#[cfg(test)]
mod tests {
    use fieldsearch_sql::extract_keywords;

    use super::*;

    fn native(dialect: Dialect) -> NativeSearch {
        NativeSearch::new(&StoreTables::default(), dialect).unwrap()
    }

    #[test]
    fn splits_words_and_phrases() {
        assert_eq!(
            split_terms(r#"red  "blue sky" car,red +boat"#),
            vec!["red", "blue sky", "car", "boat"]
        );
        assert_eq!(split_terms(r#""unterminated phrase"#), vec!["unterminated phrase"]);
        assert!(split_terms("  ").is_empty());
    }

    #[test]
    fn mysql_clause_shape() {
        let clause = native(Dialect::MySql).search_clause("red");
        assert_eq!(
            clause,
            " AND (((posts.post_excerpt LIKE '%red%') OR (posts.post_content LIKE '%red%'))) AND (posts.post_password = '') "
        );
    }

    #[test]
    fn sqlite_clause_uses_backslash_escape() {
        let clause = native(Dialect::Sqlite).search_clause("50%");
        assert!(clause.contains(r"LIKE '%50\%%' ESCAPE char(92)"));
    }

    #[test]
    fn keywords_round_trip_through_template() {
        for dialect in [Dialect::Sqlite, Dialect::MySql] {
            let clause = native(dialect).search_clause(r#"red "o'brien" 100%_off a\b"#);
            assert_eq!(
                extract_keywords(&clause, dialect).unwrap(),
                vec!["red", "o'brien", "100%_off", r"a\b"],
                "{dialect}"
            );
        }
    }

    #[test]
    fn placeholder_keywords_round_trip() {
        let search = native(Dialect::MySql).with_placeholder("a1b2c3");
        let clause = search.search_clause("50% off");
        assert!(clause.contains("'{a1b2c3}50\\\\{a1b2c3}{a1b2c3}'"));
        assert_eq!(
            extract_keywords(&clause, Dialect::MySql).unwrap(),
            vec!["50%", "off"]
        );
    }

    #[test]
    fn select_removes_placeholders() {
        let search = native(Dialect::Sqlite).with_placeholder("zz9");
        let clauses = search.clauses(&HostQuery::search("red"));
        let sql = search.select(&clauses, Some(5));
        assert!(!sql.contains("{zz9}"));
        assert!(sql.contains("'%red%'"));
        assert!(sql.ends_with("ORDER BY posts.ID DESC LIMIT 5"));
    }

    #[test]
    fn listing_has_no_search_clause() {
        let search = native(Dialect::Sqlite);
        assert_eq!(search.clauses(&HostQuery::listing()), QueryClauses::default());
    }
}
