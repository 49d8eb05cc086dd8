//! Temporary site layouts for fieldsearch-config unit tests.

use std::{
    fs,
    path::{Path, PathBuf},
};

use tempfile::TempDir;

use crate::discovery::CONFIG_FILENAME;

/// A temporary directory tree holding site configs and data files.
pub struct TestDir {
    /// Owned temporary directory.
    root: TempDir,
}

impl TestDir {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self {
            root: tempfile::tempdir().unwrap(),
        }
    }

    /// Root of the tree.
    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Creates `rel` and its parents.
    pub fn create_dir(&self, rel: &str) -> PathBuf {
        let path = self.path().join(rel);
        fs::create_dir_all(&path).unwrap();
        path
    }

    /// Writes a file below the root, creating parent directories.
    pub fn create_file(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    /// Writes a `.fieldsearch.toml` into directory `rel` ("" for the root).
    pub fn create_config(&self, rel: &str, content: &str) -> PathBuf {
        self.create_dir(rel);
        let name = Path::new(rel).join(CONFIG_FILENAME);
        self.create_file(&name.to_string_lossy(), content)
    }
}
