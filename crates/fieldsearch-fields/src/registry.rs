//! Field-definition registries.
//!
//! The registry is the read-only source of field metadata. Definitions are
//! returned in registry order, which becomes catalog order.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::{FieldDefinition, RegistryError};

/// A source of field definitions.
pub trait FieldRegistry {
    /// Returns all field definitions, searchable or not.
    fn definitions(&self) -> Result<Vec<FieldDefinition>, RegistryError>;
}

/// A registry backed by an in-memory list.
#[derive(Debug, Clone, Default)]
pub struct StaticRegistry(pub Vec<FieldDefinition>);

impl FieldRegistry for StaticRegistry {
    fn definitions(&self) -> Result<Vec<FieldDefinition>, RegistryError> {
        Ok(self.0.clone())
    }
}

/// A registry backed by one or more TOML files of `[[field]]` tables.
#[derive(Debug, Clone, Default)]
pub struct TomlRegistry {
    /// Files in registry order.
    paths: Vec<PathBuf>,
}

/// On-disk layout of a field-definition file.
#[derive(Debug, Default, Deserialize)]
struct RegistryFile {
    /// Field definitions in declaration order.
    #[serde(default)]
    field: Vec<FieldDefinition>,
}

impl TomlRegistry {
    /// Creates a registry reading the given files in order.
    pub fn new(paths: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            paths: paths.into_iter().collect(),
        }
    }

    /// Returns the files this registry reads.
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }
}

impl FieldRegistry for TomlRegistry {
    fn definitions(&self) -> Result<Vec<FieldDefinition>, RegistryError> {
        let mut definitions = Vec::new();
        for path in &self.paths {
            definitions.extend(read_registry_file(path)?);
        }
        Ok(definitions)
    }
}

/// Reads and parses a single field-definition file.
fn read_registry_file(path: &Path) -> Result<Vec<FieldDefinition>, RegistryError> {
    let contents = fs::read_to_string(path).map_err(|source| RegistryError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    let file: RegistryFile = toml::from_str(&contents).map_err(|source| RegistryError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(file.field)
}
