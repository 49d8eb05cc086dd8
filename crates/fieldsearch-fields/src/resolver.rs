//! Materialising concrete storage keys from patterns.

use std::collections::{BTreeSet, btree_set};

use fieldsearch_store::{MetaStore, StoreError};
use tracing::debug;

use crate::SearchableFieldPattern;

/// The concrete storage keys present in the store for searchable fields.
///
/// Keys are deduplicated and iterate in sorted order, so SQL generated from
/// them is reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedMetaKeys(BTreeSet<String>);

impl ResolvedMetaKeys {
    /// Iterates keys in sorted order.
    pub fn iter(&self) -> btree_set::Iter<'_, String> {
        self.0.iter()
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no keys were resolved.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns true if `key` was resolved.
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains(key)
    }
}

impl FromIterator<String> for ResolvedMetaKeys {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a ResolvedMetaKeys {
    type Item = &'a String;
    type IntoIter = btree_set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Resolves the storage keys matching any of `patterns` with one store query.
///
/// No query is issued when there are no patterns.
pub fn resolve_keys<S: MetaStore + ?Sized>(
    patterns: &[SearchableFieldPattern],
    store: &S,
) -> Result<ResolvedMetaKeys, StoreError> {
    if patterns.is_empty() {
        debug!("no searchable fields; nothing to resolve");
        return Ok(ResolvedMetaKeys::default());
    }
    let regexes: Vec<String> = patterns.iter().map(|p| p.key_pattern.clone()).collect();
    let keys: ResolvedMetaKeys = store.distinct_keys_matching(&regexes)?.into_iter().collect();
    debug!(keys = keys.len(), "storage keys resolved");
    Ok(keys)
}
