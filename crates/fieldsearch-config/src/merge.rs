//! Configuration merging.
//!
//! Merges multiple `RawConfig` files into a single resolved `Config`,
//! applying precedence rules and resolving paths.

use std::path::{Path, PathBuf};

use crate::{
    Config, ConfigError, ExcerptSettings, RegistrySettings, StoreSettings,
    parse::{RawConfig, RawExcerptSettings, RawStoreSettings},
    resolve::resolve_config_path,
};

/// A parsed config file with its source path.
pub struct ParsedConfig {
    /// Path to the config file.
    pub path: PathBuf,
    /// Parsed raw configuration.
    pub config: RawConfig,
}

impl ParsedConfig {
    /// Directory containing the config file; relative paths resolve against it.
    fn dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }
}

/// Merges multiple configuration files into a single resolved `Config`.
///
/// Configs should be provided in precedence order: highest precedence first (closest to CWD),
/// lowest precedence last (global config).
///
/// Merge rules:
/// - Scalar settings: first defined value wins (highest precedence)
/// - Registry files: the first config that lists any files wins completely
/// - Paths resolve relative to the config file that declared them
pub fn merge_configs(configs: &[ParsedConfig]) -> Result<Config, ConfigError> {
    if configs.is_empty() {
        return Ok(Config::default());
    }

    let store = merge_store_settings(configs)?;
    let registry = merge_registry_settings(configs)?;
    let excerpt = merge_excerpt_settings(configs);
    let config_root = configs.first().map(|c| c.dir().to_path_buf());

    Ok(Config {
        store,
        registry,
        excerpt,
        config_root,
    })
}

/// Merges store settings, taking first defined value for each field.
fn merge_store_settings(configs: &[ParsedConfig]) -> Result<StoreSettings, ConfigError> {
    let mut result = StoreSettings::default();

    // Iterate in reverse (lowest precedence first) so higher precedence overwrites
    for parsed in configs.iter().rev() {
        if let Some(ref store) = parsed.config.store {
            apply_raw_store(&mut result, store, parsed.dir())?;
        }
    }

    Ok(result)
}

/// Applies raw store settings to result, overwriting any present values.
fn apply_raw_store(
    result: &mut StoreSettings,
    raw: &RawStoreSettings,
    config_dir: &Path,
) -> Result<(), ConfigError> {
    if let Some(ref v) = raw.database {
        result.database = Some(resolve_config_path(v, config_dir)?);
    }
    if let Some(ref v) = raw.posts_table {
        result.posts_table = v.clone();
    }
    if let Some(ref v) = raw.meta_table {
        result.meta_table = v.clone();
    }
    if let Some(v) = raw.dialect {
        result.dialect = v;
    }
    Ok(())
}

/// Merges registry settings: the highest-precedence file list wins.
fn merge_registry_settings(configs: &[ParsedConfig]) -> Result<RegistrySettings, ConfigError> {
    for parsed in configs {
        let Some(files) = parsed
            .config
            .registry
            .as_ref()
            .and_then(|r| r.files.as_ref())
        else {
            continue;
        };
        let files = files
            .iter()
            .map(|f| resolve_config_path(f, parsed.dir()))
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(RegistrySettings { files });
    }
    Ok(RegistrySettings::default())
}

/// Merges excerpt settings.
fn merge_excerpt_settings(configs: &[ParsedConfig]) -> ExcerptSettings {
    let mut result = ExcerptSettings::default();

    for parsed in configs.iter().rev() {
        if let Some(ref excerpt) = parsed.config.excerpt {
            apply_raw_excerpt(&mut result, excerpt);
        }
    }

    result
}

/// Applies raw excerpt settings to result.
fn apply_raw_excerpt(result: &mut ExcerptSettings, raw: &RawExcerptSettings) {
    if let Some(v) = raw.length {
        result.length = v;
    }
    if let Some(ref v) = raw.suffix {
        result.suffix = v.clone();
    }
}
