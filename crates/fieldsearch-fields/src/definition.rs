//! Field definitions as supplied by the registry.

use serde::Deserialize;

/// Broad classification of a field type.
///
/// Only repeaters influence storage keys; the rest of the distinction is kept
/// for callers that want to report on field types.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum FieldKind {
    /// Free-text style fields (text, textarea, wysiwyg, email, url, number).
    TextLike,
    /// A field whose rows repeat an indexed sub-structure.
    Repeater,
    /// Anything else (images, relationships, groups, ...).
    #[default]
    Other,
}

impl From<String> for FieldKind {
    fn from(kind: String) -> Self {
        Self::from(kind.as_str())
    }
}

impl From<&str> for FieldKind {
    fn from(kind: &str) -> Self {
        match kind.to_ascii_lowercase().as_str() {
            "text" | "textarea" | "wysiwyg" | "email" | "url" | "number" => Self::TextLike,
            "repeater" => Self::Repeater,
            _ => Self::Other,
        }
    }
}

/// A structured custom-field definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct FieldDefinition {
    /// Registry identifier; what child fields reference as their parent.
    pub key: String,
    /// Storage name; the segment that appears in storage keys.
    pub name: String,
    /// Field type.
    #[serde(rename = "type", default)]
    pub kind: FieldKind,
    /// Registry identifier of the parent field, if nested.
    #[serde(default, alias = "parent_key")]
    pub parent: Option<String>,
    /// Whether the registry marks this field as searchable.
    #[serde(default)]
    pub searchable: bool,
}

impl FieldDefinition {
    /// Creates a root-level, non-searchable definition.
    pub fn new(key: impl Into<String>, name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            kind,
            parent: None,
            searchable: false,
        }
    }

    /// Sets the parent field key.
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Sets the searchable flag.
    pub fn with_searchable(mut self, searchable: bool) -> Self {
        self.searchable = searchable;
        self
    }

    /// Returns true if this field is a repeater.
    pub fn is_repeater(&self) -> bool {
        self.kind == FieldKind::Repeater
    }
}
