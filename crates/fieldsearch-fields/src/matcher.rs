//! Matching individual storage keys back to searchable fields.

use regex::RegexSet;

use crate::{ResolveError, SearchableFieldPattern};

/// Compiled set of storage-key patterns.
#[derive(Debug, Clone)]
pub struct KeyMatcher {
    /// One regex per searchable field, in catalog order.
    set: RegexSet,
}

impl KeyMatcher {
    /// Compiles the patterns of all searchable fields.
    pub fn new(patterns: &[SearchableFieldPattern]) -> Result<Self, ResolveError> {
        let set = RegexSet::new(patterns.iter().map(|p| p.key_pattern.as_str()))?;
        Ok(Self { set })
    }

    /// A matcher that matches nothing.
    pub fn empty() -> Self {
        Self {
            set: RegexSet::empty(),
        }
    }

    /// Returns the index, among the searchable patterns this matcher was
    /// built from, of the first pattern matching `key`.
    ///
    /// Patterns keep catalog order, so a lower index means an earlier
    /// searchable field; non-searchable fields are not counted.
    pub fn field_index(&self, key: &str) -> Option<usize> {
        self.set.matches(key).iter().next()
    }

    /// Returns true if `key` belongs to any searchable field.
    pub fn is_match(&self, key: &str) -> bool {
        self.set.is_match(key)
    }

    /// Number of compiled patterns.
    pub fn len(&self) -> usize {
        self.set.len()
    }

    /// Returns true if no patterns were compiled.
    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }
}

impl Default for KeyMatcher {
    fn default() -> Self {
        Self::empty()
    }
}
