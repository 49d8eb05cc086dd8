//! Configuration validation.
//!
//! Validates a loaded configuration and reports warnings for potential issues.

use std::fmt;

use fieldsearch_sql::is_identifier;

use crate::Config;

/// A non-fatal warning about the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// No field-definition files are configured.
    NoRegistryFiles,
    /// A configured field-definition file does not exist.
    RegistryFileMissing {
        /// Path that doesn't exist.
        path: String,
    },
    /// The configured database file does not exist.
    DatabaseMissing {
        /// Path that doesn't exist.
        path: String,
    },
    /// A table name is not a plain SQL identifier.
    InvalidTableName {
        /// Setting name (`posts_table` or `meta_table`).
        setting: &'static str,
        /// The configured value.
        name: String,
    },
    /// The excerpt length is zero, so excerpts are always empty.
    ZeroExcerptLength,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoRegistryFiles => {
                write!(
                    f,
                    "no field registry files configured; only native search is available"
                )
            }
            Self::RegistryFileMissing { path } => {
                write!(f, "field registry file does not exist: {path}")
            }
            Self::DatabaseMissing { path } => write!(f, "database does not exist: {path}"),
            Self::InvalidTableName { setting, name } => {
                write!(f, "{setting} '{name}' is not a valid SQL identifier")
            }
            Self::ZeroExcerptLength => write!(f, "excerpt length is 0; excerpts will be empty"),
        }
    }
}

/// Validates the configuration and returns any warnings.
pub fn validate_config(config: &Config) -> Vec<ConfigWarning> {
    let mut warnings = Vec::new();

    if config.registry.files.is_empty() {
        warnings.push(ConfigWarning::NoRegistryFiles);
    }
    for file in &config.registry.files {
        if !file.is_file() {
            warnings.push(ConfigWarning::RegistryFileMissing {
                path: file.display().to_string(),
            });
        }
    }

    if let Some(ref database) = config.store.database
        && !database.is_file()
    {
        warnings.push(ConfigWarning::DatabaseMissing {
            path: database.display().to_string(),
        });
    }

    for (setting, name) in [
        ("posts_table", &config.store.posts_table),
        ("meta_table", &config.store.meta_table),
    ] {
        if !is_identifier(name) {
            warnings.push(ConfigWarning::InvalidTableName {
                setting,
                name: name.clone(),
            });
        }
    }

    if config.excerpt.length == 0 {
        warnings.push(ConfigWarning::ZeroExcerptLength);
    }

    warnings
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::test_support::TestDir;

    #[test]
    fn test_default_config_warns_about_registry() {
        let warnings = validate_config(&Config::default());
        assert_eq!(warnings, vec![ConfigWarning::NoRegistryFiles]);
    }

    #[test]
    fn test_existing_files_are_clean() {
        let dir = TestDir::new();
        let fields = dir.create_file("fields.toml", "");
        let db = dir.create_file("site.db", "");
        let mut config = Config::default();
        config.registry.files.push(fields);
        config.store.database = Some(db);
        assert!(validate_config(&config).is_empty());
    }

    #[test]
    fn test_missing_files_warn() {
        let mut config = Config::default();
        config.registry.files.push(PathBuf::from("/nonexistent/fields.toml"));
        config.store.database = Some(PathBuf::from("/nonexistent/site.db"));
        let warnings = validate_config(&config);
        assert!(warnings.contains(&ConfigWarning::RegistryFileMissing {
            path: "/nonexistent/fields.toml".into()
        }));
        assert!(warnings.contains(&ConfigWarning::DatabaseMissing {
            path: "/nonexistent/site.db".into()
        }));
    }

    #[test]
    fn test_invalid_table_name_warns() {
        let mut config = Config::default();
        config.store.meta_table = "meta; DROP TABLE x".into();
        let warnings = validate_config(&config);
        assert!(warnings.contains(&ConfigWarning::InvalidTableName {
            setting: "meta_table",
            name: "meta; DROP TABLE x".into(),
        }));
    }

    #[test]
    fn test_zero_length_warns() {
        let mut config = Config::default();
        config.excerpt.length = 0;
        assert!(validate_config(&config).contains(&ConfigWarning::ZeroExcerptLength));
    }

    #[test]
    fn test_warning_display() {
        let w = ConfigWarning::InvalidTableName {
            setting: "posts_table",
            name: "a b".into(),
        };
        assert_eq!(w.to_string(), "posts_table 'a b' is not a valid SQL identifier");
    }
}
