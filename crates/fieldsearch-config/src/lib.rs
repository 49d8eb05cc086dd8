//! Configuration system for fieldsearch.
//!
//! fieldsearch uses TOML configuration files named `.fieldsearch.toml`. Configuration is
//! resolved by walking up the directory tree from the current working directory, collecting
//! any `.fieldsearch.toml` files found, then loading `~/.fieldsearch.toml` as the global
//! config with lowest precedence.

#![warn(missing_docs)]

mod discovery;
mod error;
mod merge;
mod parse;
mod resolve;
mod templates;
#[cfg(test)]
mod test_support;
mod validate;

use std::path::{Path, PathBuf};

pub use discovery::{CONFIG_FILENAME, discover_config_files, global_config_path, is_global_config};
pub use error::ConfigError;
use fieldsearch_sql::Dialect;
pub use merge::{ParsedConfig, merge_configs};
pub use parse::{
    RawConfig, RawExcerptSettings, RawRegistrySettings, RawStoreSettings, parse_config_file,
    parse_config_str,
};
pub use resolve::resolve_config_path;
use serde::{Deserialize, Serialize};
pub use templates::{global_template, local_template};
pub use validate::ConfigWarning;
use validate::validate_config;

/// Top-level merged configuration for fieldsearch.
///
/// This represents the fully resolved configuration after merging all discovered
/// `.fieldsearch.toml` files according to precedence rules.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Relational store settings.
    pub store: StoreSettings,
    /// Field registry settings.
    pub registry: RegistrySettings,
    /// Excerpt settings.
    pub excerpt: ExcerptSettings,
    /// Directory containing the most specific config file.
    pub config_root: Option<PathBuf>,
}

impl Config {
    /// Loads configuration by discovering and merging all relevant `.fieldsearch.toml` files.
    ///
    /// Returns `Ok(Config::default())` if no configuration files are found.
    pub fn load(cwd: &Path) -> Result<Self, ConfigError> {
        let config_files = discover_config_files(cwd);
        Self::load_from_files(&config_files)
    }

    /// Loads configuration from a specific list of config file paths.
    ///
    /// Files should be provided in precedence order: highest precedence first.
    pub fn load_from_files(files: &[PathBuf]) -> Result<Self, ConfigError> {
        if files.is_empty() {
            return Ok(Self::default());
        }

        let parsed: Vec<ParsedConfig> = files
            .iter()
            .map(|path| {
                let config = parse_config_file(path)?;
                Ok(ParsedConfig {
                    path: path.clone(),
                    config,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        merge_configs(&parsed)
    }

    /// Validates the configuration and returns any warnings.
    ///
    /// This checks for:
    /// - No field registry files configured, or configured files that don't exist
    /// - A configured database file that doesn't exist
    /// - Table names that aren't plain SQL identifiers
    /// - A zero excerpt length
    pub fn validate(&self) -> Vec<ConfigWarning> {
        validate_config(self)
    }

    /// Serializes the effective settings to TOML format.
    pub fn settings_to_toml(&self) -> String {
        let serializable = SerializableSettings {
            store: &self.store,
            registry: &self.registry,
            excerpt: &self.excerpt,
        };
        toml::to_string_pretty(&serializable).expect("settings serialization should not fail")
    }
}

/// Relational store settings.
#[derive(Debug, Clone, Serialize)]
pub struct StoreSettings {
    /// Resolved path to the SQLite database, if configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<PathBuf>,
    /// Posts table name.
    pub posts_table: String,
    /// Field-value table name.
    pub meta_table: String,
    /// SQL dialect used when rendering literals.
    pub dialect: Dialect,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            database: None,
            posts_table: String::from("posts"),
            meta_table: String::from("postmeta"),
            dialect: Dialect::Sqlite,
        }
    }
}

/// Field registry settings.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RegistrySettings {
    /// Resolved field-definition files, in registry order.
    pub files: Vec<PathBuf>,
}

/// Excerpt settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ExcerptSettings {
    /// Maximum excerpt length in characters before truncation.
    pub length: usize,
    /// Text appended when the excerpt was truncated.
    pub suffix: String,
}

impl Default for ExcerptSettings {
    fn default() -> Self {
        Self {
            length: 200,
            suffix: String::from(" [...]"),
        }
    }
}

/// Internal struct for TOML serialization of settings.
#[derive(Serialize)]
struct SerializableSettings<'a> {
    /// Store settings.
    store: &'a StoreSettings,
    /// Registry settings.
    registry: &'a RegistrySettings,
    /// Excerpt settings.
    excerpt: &'a ExcerptSettings,
}
