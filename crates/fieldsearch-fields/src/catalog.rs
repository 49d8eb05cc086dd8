//! The field catalog.

use std::{
    collections::HashMap,
    hash::{Hash, Hasher},
};

use siphasher::sip::SipHasher24;
use tracing::{debug, warn};

use crate::{FieldDefinition, FieldRegistry, MAX_FIELD_DEPTH};

/// All known field definitions, keyed by registry key, in registry order.
///
/// A catalog is immutable once built and cheap to share behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct FieldCatalog {
    /// Definitions in catalog order.
    fields: Vec<FieldDefinition>,
    /// Registry key to position in `fields`.
    index: HashMap<String, usize>,
}

impl FieldCatalog {
    /// Loads the catalog from a registry.
    ///
    /// An unavailable or unreadable registry yields an empty catalog, which
    /// disables structured-field search without failing the caller.
    pub fn load<R: FieldRegistry + ?Sized>(registry: &R) -> Self {
        match registry.definitions() {
            Ok(definitions) => Self::from_definitions(definitions),
            Err(e) => {
                warn!(error = %e, "field registry unavailable; structured-field search disabled");
                Self::default()
            }
        }
    }

    /// Builds a catalog from definitions. The first definition of a key wins.
    pub fn from_definitions(definitions: impl IntoIterator<Item = FieldDefinition>) -> Self {
        let mut catalog = Self::default();
        for definition in definitions {
            if catalog.index.contains_key(&definition.key) {
                warn!(key = %definition.key, "duplicate field definition ignored");
                continue;
            }
            catalog.index.insert(definition.key.clone(), catalog.fields.len());
            catalog.fields.push(definition);
        }
        debug!(
            fields = catalog.fields.len(),
            searchable = catalog.searchable().count(),
            "field catalog loaded"
        );
        catalog
    }

    /// Looks up a definition by registry key.
    pub fn get(&self, key: &str) -> Option<&FieldDefinition> {
        self.index.get(key).map(|&i| &self.fields[i])
    }

    /// Returns the parent of `field` if it is present in the catalog.
    pub fn parent_of(&self, field: &FieldDefinition) -> Option<&FieldDefinition> {
        field.parent.as_deref().and_then(|key| self.get(key))
    }

    /// Iterates all definitions in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.fields.iter()
    }

    /// Iterates searchable definitions in catalog order.
    pub fn searchable(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.fields.iter().filter(|f| f.searchable)
    }

    /// Number of definitions.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the catalog has no definitions.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fingerprint of everything that influences storage-key resolution.
    ///
    /// Covers each searchable definition and its ancestor chain, so resolved
    /// keys only need recomputing when this value changes.
    pub fn fingerprint(&self) -> String {
        let mut hasher = SipHasher24::new();
        for field in self.searchable() {
            field.hash(&mut hasher);
            let mut current = self.parent_of(field);
            let mut depth = 0;
            while let Some(parent) = current
                && depth < MAX_FIELD_DEPTH
            {
                parent.hash(&mut hasher);
                current = self.parent_of(parent);
                depth += 1;
            }
        }
        format!("{:016x}", hasher.finish())
    }
}
