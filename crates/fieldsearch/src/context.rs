//! Per-query search classification.

/// The host's view of a query being built.
///
/// Only the parts the rewriter needs are exposed: whether the host classified
/// the query as a search, and the search term itself.
pub trait SearchQuery {
    /// Returns true if the host classified this query as a free-text search.
    fn is_search_query(&self) -> bool;

    /// Returns true for back-office queries, which are never augmented.
    fn is_admin(&self) -> bool {
        false
    }

    /// The raw search term, if any.
    fn search_term(&self) -> Option<&str>;

    /// Replaces the search term.
    fn set_search_term(&mut self, term: String);
}

/// Search classification for a single query.
///
/// A fresh value is produced for every query and handed to each rewriting
/// stage, so concurrent requests never observe each other's state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchContext {
    /// Whether the query is a front-end free-text search.
    is_search: bool,
}

impl SearchContext {
    /// Classifies a query. Admin queries are never treated as searches.
    pub fn detect<Q: SearchQuery + ?Sized>(query: &Q) -> Self {
        Self {
            is_search: query.is_search_query() && !query.is_admin(),
        }
    }

    /// A context for a query that is not a search.
    pub fn not_search() -> Self {
        Self::default()
    }

    /// Returns true if the rewriting stages should run.
    pub fn is_search(self) -> bool {
        self.is_search
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Query {
        search: bool,
        admin: bool,
        term: Option<String>,
    }

    impl SearchQuery for Query {
        fn is_search_query(&self) -> bool {
            self.search
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

    #[test]
    fn detects_front_end_search() {
        let query = Query {
            search: true,
            admin: false,
            term: Some("red".into()),
        };
        assert!(SearchContext::detect(&query).is_search());
    }

    #[test]
    fn admin_search_is_not_a_search() {
        let query = Query {
            search: true,
            admin: true,
            term: Some("red".into()),
        };
        assert!(!SearchContext::detect(&query).is_search());
    }

    #[test]
    fn plain_listing_is_not_a_search() {
        let query = Query {
            search: false,
            admin: false,
            term: None,
        };
        assert_eq!(SearchContext::detect(&query), SearchContext::not_search());
    }
}
