//! Configuration file parsing.
//!
//! Parses individual `.fieldsearch.toml` files into intermediate `RawConfig` structures
//! that preserve the optional nature of all fields before merging.

use std::{fs, path::Path};

use fieldsearch_sql::Dialect;
use serde::Deserialize;
use serde_with::{OneOrMany, serde_as};

use crate::ConfigError;

/// Raw configuration as parsed directly from a TOML file.
///
/// All fields are optional to support partial configs that will be merged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawConfig {
    /// When true, stop discovery here - ignore parent and global configs.
    pub root: Option<bool>,
    /// Store section.
    pub store: Option<RawStoreSettings>,
    /// Registry section.
    pub registry: Option<RawRegistrySettings>,
    /// Excerpt section.
    pub excerpt: Option<RawExcerptSettings>,
}

/// Raw store settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawStoreSettings {
    /// Path to the SQLite database (relative to the config file).
    pub database: Option<String>,
    /// Posts table name.
    pub posts_table: Option<String>,
    /// Field-value table name.
    pub meta_table: Option<String>,
    /// SQL dialect.
    pub dialect: Option<Dialect>,
}

/// Raw registry settings.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawRegistrySettings {
    /// Field-definition file(s), relative to the config file.
    /// Accepts either a single string or an array of strings.
    #[serde_as(as = "Option<OneOrMany<_>>")]
    pub files: Option<Vec<String>>,
}

/// Raw excerpt settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawExcerptSettings {
    /// Maximum excerpt length in characters.
    pub length: Option<usize>,
    /// Suffix appended on truncation.
    pub suffix: Option<String>,
}

/// Parses a configuration file from disk.
///
/// Returns a `RawConfig` with all fields as optionals, ready for merging.
pub fn parse_config_file(path: &Path) -> Result<RawConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    parse_config_str(&contents, path)
}

/// Parses configuration from a TOML string.
///
/// The `path` parameter is used for error reporting.
pub fn parse_config_str(contents: &str, path: &Path) -> Result<RawConfig, ConfigError> {
    toml::from_str(contents).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })
}

/// Checks if a config file has `root = true` set.
///
/// Returns false if the file cannot be read or parsed.
pub fn is_root_config(path: &Path) -> bool {
    let Ok(contents) = fs::read_to_string(path) else {
        return false;
    };
    let Ok(config) = toml::from_str::<RawConfig>(&contents) else {
        return false;
    };
    config.root == Some(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_config() {
        let config = parse_config_str("", Path::new("test.toml")).unwrap();
        assert!(config.root.is_none());
        assert!(config.store.is_none());
        assert!(config.registry.is_none());
        assert!(config.excerpt.is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
root = true

[store]
database = "site.db"
posts_table = "wp_posts"
meta_table = "wp_postmeta"
dialect = "mysql"

[registry]
files = ["fields.toml", "more.toml"]

[excerpt]
length = 120
suffix = "..."
"#;
        let config = parse_config_str(toml, Path::new("test.toml")).unwrap();
        assert_eq!(config.root, Some(true));
        let store = config.store.unwrap();
        assert_eq!(store.database.as_deref(), Some("site.db"));
        assert_eq!(store.posts_table.as_deref(), Some("wp_posts"));
        assert_eq!(store.meta_table.as_deref(), Some("wp_postmeta"));
        assert_eq!(store.dialect, Some(Dialect::MySql));
        assert_eq!(
            config.registry.unwrap().files.unwrap(),
            vec!["fields.toml", "more.toml"]
        );
        let excerpt = config.excerpt.unwrap();
        assert_eq!(excerpt.length, Some(120));
        assert_eq!(excerpt.suffix.as_deref(), Some("..."));
    }

    #[test]
    fn test_parse_single_registry_file() {
        let toml = r#"
[registry]
files = "fields.toml"
"#;
        let config = parse_config_str(toml, Path::new("test.toml")).unwrap();
        assert_eq!(config.registry.unwrap().files.unwrap(), vec!["fields.toml"]);
    }

    #[test]
    fn test_parse_unknown_dialect_fails() {
        let toml = r#"
[store]
dialect = "oracle"
"#;
        let err = parse_config_str(toml, Path::new("bad.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::ParseToml { .. }));
        assert!(err.to_string().contains("bad.toml"));
    }

    #[test]
    fn test_parse_unknown_key_fails() {
        let toml = r#"
[excerpt]
lenght = 10
"#;
        assert!(parse_config_str(toml, Path::new("bad.toml")).is_err());
    }

    #[test]
    fn test_is_root_config() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("root.toml");
        let plain = dir.path().join("plain.toml");
        fs::write(&root, "root = true\n").unwrap();
        fs::write(&plain, "[excerpt]\nlength = 5\n").unwrap();
        assert!(is_root_config(&root));
        assert!(!is_root_config(&plain));
        assert!(!is_root_config(&dir.path().join("missing.toml")));
    }
}
