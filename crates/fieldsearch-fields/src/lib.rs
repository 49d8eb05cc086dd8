//! Field catalog and storage-key resolution for fieldsearch.
//!
//! Structured custom fields are described by an external registry. This crate:
//!
//! - loads field definitions into a [`FieldCatalog`], degrading to an empty
//!   catalog when the registry cannot be read
//! - derives an anchored storage-key pattern for every searchable field,
//!   accounting for repeater ancestors ([`resolve_patterns`])
//! - materialises the concrete storage keys present in the store with a single
//!   query ([`resolve_keys`])
//! - matches individual storage keys back to searchable fields ([`KeyMatcher`])
//!
//! # Example
//!
//! ```
//! use fieldsearch_fields::{FieldCatalog, FieldDefinition, FieldKind, resolve_patterns};
//!
//! let catalog = FieldCatalog::from_definitions(vec![
//!     FieldDefinition::new("field_team", "team", FieldKind::Repeater),
//!     FieldDefinition::new("field_member", "member_name", FieldKind::TextLike)
//!         .with_parent("field_team")
//!         .with_searchable(true),
//! ]);
//! let patterns = resolve_patterns(&catalog).unwrap();
//! assert_eq!(patterns[0].key_pattern, "^team_[0-9]+_member_name$");
//! ```

#![warn(missing_docs)]

mod catalog;
mod definition;
mod error;
mod matcher;
mod pattern;
mod registry;
mod resolver;

pub use catalog::FieldCatalog;
pub use definition::{FieldDefinition, FieldKind};
pub use error::{RegistryError, ResolveError};
pub use matcher::KeyMatcher;
pub use pattern::{MAX_FIELD_DEPTH, SearchableFieldPattern, resolve_patterns};
pub use registry::{FieldRegistry, StaticRegistry, TomlRegistry};
pub use resolver::{ResolvedMetaKeys, resolve_keys};
