//! The field-search service.
//!
//! [`FieldSearch`] is constructed once at startup from a field registry and a
//! store. It keeps the derived field state (catalog, key patterns, resolved
//! storage keys) behind an `Arc` so request handlers can read it concurrently,
//! and swaps in a new state only when the field definitions change.

use std::sync::{Arc, PoisonError, RwLock};

use fieldsearch_fields::{
    FieldCatalog, FieldRegistry, KeyMatcher, ResolvedMetaKeys, SearchableFieldPattern,
    resolve_keys, resolve_patterns,
};
use fieldsearch_store::MetaStore;
use tracing::{debug, info, warn};

use crate::{
    ExcerptBuilder, ExcerptOptions, QueryClauses, QueryRewriter, SearchContext, SearchQuery,
};

/// Field metadata derived from one version of the registry.
#[derive(Debug)]
pub struct FieldState {
    /// Loaded field definitions.
    catalog: FieldCatalog,
    /// Patterns for searchable fields; empty if the catalog is misconfigured.
    patterns: Vec<SearchableFieldPattern>,
    /// Compiled form of `patterns`.
    matcher: KeyMatcher,
    /// Storage keys present in the store.
    keys: ResolvedMetaKeys,
    /// Catalog fingerprint the state was derived from.
    fingerprint: String,
}

impl FieldState {
    /// Derives patterns and resolves keys for `catalog`.
    ///
    /// Every failure degrades to an empty pattern or key set.
    fn derive<S: MetaStore + ?Sized>(catalog: FieldCatalog, store: &S) -> Self {
        let fingerprint = catalog.fingerprint();
        let patterns = match resolve_patterns(&catalog) {
            Ok(patterns) => patterns,
            Err(e) => {
                warn!(error = %e, "invalid field configuration; structured-field search disabled");
                Vec::new()
            }
        };
        let (patterns, matcher) = match KeyMatcher::new(&patterns) {
            Ok(matcher) => (patterns, matcher),
            Err(e) => {
                warn!(error = %e, "could not compile key patterns; structured-field search disabled");
                (Vec::new(), KeyMatcher::empty())
            }
        };
        let keys = resolve_or_empty(&patterns, store);
        info!(
            fields = catalog.len(),
            patterns = patterns.len(),
            keys = keys.len(),
            "field search ready"
        );
        Self {
            catalog,
            patterns,
            matcher,
            keys,
            fingerprint,
        }
    }

    /// The field catalog.
    pub fn catalog(&self) -> &FieldCatalog {
        &self.catalog
    }

    /// Storage-key patterns of the searchable fields, in catalog order.
    pub fn patterns(&self) -> &[SearchableFieldPattern] {
        &self.patterns
    }

    /// Matcher over the searchable-field patterns.
    pub fn matcher(&self) -> &KeyMatcher {
        &self.matcher
    }

    /// Resolved storage keys.
    pub fn keys(&self) -> &ResolvedMetaKeys {
        &self.keys
    }

    /// Fingerprint of the catalog this state was derived from.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

/// Resolves keys, logging and returning an empty set on failure.
fn resolve_or_empty<S: MetaStore + ?Sized>(
    patterns: &[SearchableFieldPattern],
    store: &S,
) -> ResolvedMetaKeys {
    resolve_keys(patterns, store).unwrap_or_else(|e| {
        warn!(error = %e, "could not resolve storage keys; structured-field search disabled");
        ResolvedMetaKeys::default()
    })
}

/// Structured-field search over a host's post queries.
pub struct FieldSearch {
    /// SQL rewriter for the configured tables.
    rewriter: QueryRewriter,
    /// Current field state.
    state: RwLock<Arc<FieldState>>,
}

impl FieldSearch {
    /// Loads the catalog from `registry` and resolves storage keys from `store`.
    ///
    /// Never fails: an unavailable registry or store leaves only native search.
    pub fn open<R, S>(registry: &R, store: &S, rewriter: QueryRewriter) -> Self
    where
        R: FieldRegistry + ?Sized,
        S: MetaStore + ?Sized,
    {
        let catalog = FieldCatalog::load(registry);
        Self {
            rewriter,
            state: RwLock::new(Arc::new(FieldState::derive(catalog, store))),
        }
    }

    /// Returns the current field state.
    pub fn fields(&self) -> Arc<FieldState> {
        Arc::clone(&self.state.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Returns the SQL rewriter.
    pub fn rewriter(&self) -> &QueryRewriter {
        &self.rewriter
    }

    /// Reloads field definitions, re-resolving keys only if they changed.
    ///
    /// Returns true if the field state was replaced.
    pub fn reload<R, S>(&self, registry: &R, store: &S) -> bool
    where
        R: FieldRegistry + ?Sized,
        S: MetaStore + ?Sized,
    {
        let catalog = FieldCatalog::load(registry);
        if catalog.fingerprint() == self.fields().fingerprint() {
            debug!("field definitions unchanged");
            return false;
        }
        self.replace(FieldState::derive(catalog, store));
        true
    }

    /// Re-resolves storage keys with the current patterns.
    ///
    /// New repeater rows only become searchable after a refresh.
    pub fn refresh_keys<S: MetaStore + ?Sized>(&self, store: &S) {
        let current = self.fields();
        let keys = resolve_or_empty(&current.patterns, store);
        debug!(keys = keys.len(), "storage keys refreshed");
        self.replace(FieldState {
            catalog: current.catalog.clone(),
            patterns: current.patterns.clone(),
            matcher: current.matcher.clone(),
            keys,
            fingerprint: current.fingerprint.clone(),
        });
    }

    /// Installs a new field state.
    fn replace(&self, state: FieldState) {
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(state);
    }

    /// Classifies a query at construction time, trimming its search term.
    pub fn detect<Q: SearchQuery + ?Sized>(&self, query: &mut Q) -> SearchContext {
        let trimmed = query
            .search_term()
            .filter(|term| term.trim().len() != term.len())
            .map(|term| term.trim().to_string());
        if let Some(term) = trimmed {
            query.set_search_term(term);
        }
        let ctx = SearchContext::detect(query);
        debug!(is_search = ctx.is_search(), "query classified");
        ctx
    }

    /// See [`QueryRewriter::shape_distinct`].
    pub fn shape_distinct(&self, ctx: SearchContext, distinct: &str) -> String {
        self.rewriter
            .shape_distinct(ctx, self.fields().keys(), distinct)
    }

    /// See [`QueryRewriter::shape_join`].
    pub fn shape_join(&self, ctx: SearchContext, join: &str) -> String {
        self.rewriter.shape_join(ctx, self.fields().keys(), join)
    }

    /// See [`QueryRewriter::rewrite_where`].
    pub fn rewrite_where(&self, ctx: SearchContext, search: &str) -> String {
        self.rewriter.rewrite_where(ctx, self.fields().keys(), search)
    }

    /// Runs all rewriting stages against one consistent field state.
    pub fn rewrite_clauses(&self, ctx: SearchContext, clauses: QueryClauses) -> QueryClauses {
        let fields = self.fields();
        self.rewriter.rewrite(ctx, fields.keys(), &clauses)
    }

    /// Builds the excerpt for a search result.
    pub fn build_excerpt<S: MetaStore + ?Sized>(
        &self,
        store: &S,
        post_id: i64,
        original: &str,
        term: &str,
        options: &ExcerptOptions,
    ) -> String {
        let fields = self.fields();
        ExcerptBuilder::new(fields.matcher()).build(store, post_id, original, term, options)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use fieldsearch_fields::{FieldDefinition, FieldKind, StaticRegistry};
    use fieldsearch_sql::Dialect;
    use fieldsearch_store::{MetaRow, StoreError, StoreTables};

    use super::*;
    use crate::HostQuery;

    /// Store returning fixed keys and counting key queries.
    struct CountingStore {
        keys: Vec<&'static str>,
        queries: Cell<usize>,
    }

    impl CountingStore {
        fn new(keys: Vec<&'static str>) -> Self {
            Self {
                keys,
                queries: Cell::new(0),
            }
        }
    }

    impl MetaStore for CountingStore {
        fn distinct_keys_matching(&self, patterns: &[String]) -> Result<Vec<String>, StoreError> {
            self.queries.set(self.queries.get() + 1);
            let set = regex::RegexSet::new(patterns).unwrap();
            Ok(self
                .keys
                .iter()
                .filter(|k| set.is_match(k))
                .map(|k| k.to_string())
                .collect())
        }

        fn post_meta(&self, _post_id: i64) -> Result<Vec<MetaRow>, StoreError> {
            Ok(Vec::new())
        }
    }

    fn scenario() -> StaticRegistry {
        StaticRegistry(vec![
            FieldDefinition::new("bio", "bio", FieldKind::TextLike).with_searchable(true),
            FieldDefinition::new("team", "team", FieldKind::Repeater),
            FieldDefinition::new("member_name", "member_name", FieldKind::TextLike)
                .with_parent("team")
                .with_searchable(true),
        ])
    }

    fn rewriter() -> QueryRewriter {
        QueryRewriter::new(&StoreTables::default(), Dialect::Sqlite).unwrap()
    }

    fn scenario_store() -> CountingStore {
        CountingStore::new(vec![
            "bio",
            "team_0_member_name",
            "team_1_member_name",
            "unrelated_key",
        ])
    }

    #[test]
    fn open_resolves_scenario_keys() {
        let store = scenario_store();
        let search = FieldSearch::open(&scenario(), &store, rewriter());
        let fields = search.fields();
        let keys: Vec<&String> = fields.keys().iter().collect();
        assert_eq!(keys, vec!["bio", "team_0_member_name", "team_1_member_name"]);
        assert_eq!(store.queries.get(), 1);
    }

    #[test]
    fn reload_is_fingerprint_gated() {
        let store = scenario_store();
        let search = FieldSearch::open(&scenario(), &store, rewriter());
        let before = search.fields();

        assert!(!search.reload(&scenario(), &store));
        assert_eq!(store.queries.get(), 1);
        assert_eq!(search.fields().keys(), before.keys());

        let mut changed = scenario();
        changed.0[0].searchable = false;
        assert!(search.reload(&changed, &store));
        assert_eq!(store.queries.get(), 2);
        assert_eq!(search.fields().keys().len(), 2);
    }

    #[test]
    fn refresh_keys_picks_up_new_rows() {
        let search = FieldSearch::open(&scenario(), &CountingStore::new(vec!["bio"]), rewriter());
        assert_eq!(search.fields().keys().len(), 1);

        search.refresh_keys(&scenario_store());
        assert_eq!(search.fields().keys().len(), 3);
    }

    #[test]
    fn cyclic_catalog_degrades_to_native() {
        let registry = StaticRegistry(vec![
            FieldDefinition::new("a", "a", FieldKind::Repeater).with_parent("b"),
            FieldDefinition::new("b", "b", FieldKind::Repeater)
                .with_parent("a")
                .with_searchable(true),
        ]);
        let store = scenario_store();
        let search = FieldSearch::open(&registry, &store, rewriter());
        assert!(search.fields().patterns().is_empty());
        assert!(search.fields().keys().is_empty());
        assert_eq!(store.queries.get(), 0);

        let mut query = HostQuery::search("red");
        let ctx = search.detect(&mut query);
        assert!(ctx.is_search());
        assert_eq!(search.shape_join(ctx, ""), "");
    }

    #[test]
    fn detect_trims_the_term() {
        let search = FieldSearch::open(&scenario(), &scenario_store(), rewriter());
        let mut query = HostQuery::search("  red car ");
        let ctx = search.detect(&mut query);
        assert!(ctx.is_search());
        assert_eq!(query.search_term(), Some("red car"));
    }

    #[test]
    fn stages_run_together() {
        let search = FieldSearch::open(&scenario(), &scenario_store(), rewriter());
        let mut query = HostQuery::search("red");
        let ctx = search.detect(&mut query);
        let clauses = search.rewrite_clauses(
            ctx,
            QueryClauses {
                distinct: String::new(),
                join: String::new(),
                search: " AND ((posts.post_content LIKE '%red%')) ".into(),
            },
        );
        assert_eq!(clauses.distinct, "DISTINCT");
        assert!(clauses.join.contains("AS fieldsearch_meta"));
        assert!(clauses.search.contains("'team_1_member_name'"));
        assert!(clauses.search.contains("COALESCE(posts.post_password, '') = ''"));
    }
}
