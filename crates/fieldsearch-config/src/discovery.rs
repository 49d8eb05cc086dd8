//! Configuration file discovery.
//!
//! Discovers `.fieldsearch.toml` files by walking up the directory tree from a starting point,
//! then appending the global `~/.fieldsearch.toml` if present.

use std::path::{Path, PathBuf};

use directories::BaseDirs;

use crate::parse::is_root_config;

/// The configuration filename.
pub const CONFIG_FILENAME: &str = ".fieldsearch.toml";

/// Discovers all configuration files relevant to the given directory.
///
/// Returns paths in precedence order: closest to `cwd` first, global last.
/// Discovery stops at the first file with `root = true`; the global config is
/// only appended when no such file was found.
pub fn discover_config_files(cwd: &Path) -> Vec<PathBuf> {
    let mut configs = Vec::new();
    let mut found_root = false;

    let mut current = Some(cwd);
    while let Some(dir) = current {
        let config_path = dir.join(CONFIG_FILENAME);
        if config_path.is_file() {
            let is_root = is_root_config(&config_path);
            configs.push(config_path);
            if is_root {
                found_root = true;
                break;
            }
        }
        current = dir.parent();
    }

    if !found_root
        && let Some(global_path) = global_config_path()
        && global_path.is_file()
        && !configs.contains(&global_path)
    {
        configs.push(global_path);
    }

    configs
}

/// Returns the path to the global configuration file (`~/.fieldsearch.toml`).
///
/// Returns `None` if the home directory cannot be determined.
pub fn global_config_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().join(CONFIG_FILENAME))
}

/// Checks if a path is the global configuration file.
pub fn is_global_config(path: &Path) -> bool {
    global_config_path().is_some_and(|global| path == global)
}
