//! Storage-key pattern derivation.
//!
//! A field nested inside repeaters is stored once per row of every enclosing
//! repeater, under a key like `team_2_members_0_name`. The pattern for a field
//! is its own storage name, prefixed by its repeater parent's pattern and an
//! index segment, recursively up to the first non-repeater ancestor.

use tracing::debug;

use crate::{FieldCatalog, FieldDefinition, ResolveError};

/// Maximum ancestor depth followed before the chain is treated as broken.
pub const MAX_FIELD_DEPTH: usize = 32;

/// Index segment inserted between a repeater and its sub-field.
const INDEX_SEGMENT: &str = "_[0-9]+_";

/// A searchable field with its anchored storage-key pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchableFieldPattern {
    /// The searchable field.
    pub field: FieldDefinition,
    /// Anchored regular expression matching the field's storage keys.
    pub key_pattern: String,
}

/// Derives a pattern for every searchable field, in catalog order.
///
/// Fails on the first field whose parent chain is cyclic or too deep; such a
/// catalog is misconfigured and callers should fall back to native search.
pub fn resolve_patterns(catalog: &FieldCatalog) -> Result<Vec<SearchableFieldPattern>, ResolveError> {
    let patterns = catalog
        .searchable()
        .map(|field| {
            let mut chain = Vec::new();
            let body = key_regex(catalog, field, &mut chain)?;
            Ok(SearchableFieldPattern {
                field: field.clone(),
                key_pattern: format!("^{body}$"),
            })
        })
        .collect::<Result<Vec<_>, ResolveError>>()?;
    debug!(patterns = patterns.len(), "storage-key patterns derived");
    Ok(patterns)
}

/// Builds the unanchored pattern for `field`.
///
/// `chain` holds the keys already visited on the way up from the searchable
/// field; it bounds the recursion and detects cycles.
fn key_regex(
    catalog: &FieldCatalog,
    field: &FieldDefinition,
    chain: &mut Vec<String>,
) -> Result<String, ResolveError> {
    let origin = chain.first().unwrap_or(&field.key).clone();
    if chain.contains(&field.key) {
        chain.push(field.key.clone());
        return Err(ResolveError::Cycle {
            field: origin,
            chain: chain.clone(),
        });
    }
    if chain.len() >= MAX_FIELD_DEPTH {
        return Err(ResolveError::DepthExceeded {
            field: origin,
            max: MAX_FIELD_DEPTH,
        });
    }
    chain.push(field.key.clone());

    let own = regex::escape(&field.name);
    match catalog.parent_of(field).filter(|p| p.is_repeater()) {
        Some(parent) => {
            let prefix = key_regex(catalog, parent, chain)?;
            Ok(format!("{prefix}{INDEX_SEGMENT}{own}"))
        }
        None => Ok(own),
    }
}
