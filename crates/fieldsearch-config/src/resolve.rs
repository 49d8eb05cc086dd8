//! Path resolution for configured files.
//!
//! Resolves relative and tilde-prefixed paths to absolute paths.

use std::path::{Path, PathBuf};

use directories::BaseDirs;

use crate::ConfigError;

/// Resolves a configured path to an absolute path.
///
/// Handles three cases:
/// - Tilde paths (`~/site.db`) - expanded to home directory
/// - Relative paths (`./fields.toml`) - resolved relative to `config_dir`
/// - Absolute paths - returned as-is
///
/// The path does not need to exist; validation reports missing files.
pub fn resolve_config_path(path: &str, config_dir: &Path) -> Result<PathBuf, ConfigError> {
    let expanded = expand_tilde(path)?;

    if expanded.is_absolute() {
        Ok(expanded)
    } else {
        Ok(config_dir.join(expanded))
    }
}

/// Expands a tilde prefix to the home directory.
fn expand_tilde(path: &str) -> Result<PathBuf, ConfigError> {
    if path == "~" {
        return home_dir();
    }

    if let Some(rest) = path.strip_prefix("~/") {
        let home = home_dir()?;
        return Ok(home.join(rest));
    }

    Ok(PathBuf::from(path))
}

/// Returns the home directory.
fn home_dir() -> Result<PathBuf, ConfigError> {
    BaseDirs::new()
        .map(|dirs| dirs.home_dir().to_path_buf())
        .ok_or(ConfigError::NoHomeDirectory)
}
