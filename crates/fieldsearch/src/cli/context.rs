//! Shared context for running CLI commands.

use std::{
    env,
    path::{Path, PathBuf},
    process::ExitCode,
};

use fieldsearch::{FieldSearch, NativeSearch, QueryRewriter};
use fieldsearch_config::Config;
use fieldsearch_fields::TomlRegistry;
use fieldsearch_store::{SqliteStore, StoreTables};

/// Command execution context built once per CLI invocation.
pub struct CommandContext {
    /// Current working directory.
    pub cwd: PathBuf,
    /// Loaded configuration (may be default if no config files found).
    pub config: Config,
}

impl CommandContext {
    /// Loads the current directory and configuration.
    pub fn load() -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        let config = load_config_or_failure(&cwd)?;
        Ok(Self { cwd, config })
    }

    /// Loads only the current directory, skipping configuration parsing.
    ///
    /// Used by `init`, which must work even when an existing config is invalid.
    pub fn load_cwd_only() -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        Ok(Self {
            cwd,
            config: Config::default(),
        })
    }

    /// The field registry described by `[registry] files`.
    pub fn registry(&self) -> TomlRegistry {
        TomlRegistry::new(self.config.registry.files.clone())
    }

    /// Validated table names.
    pub fn tables_or_failure(&self) -> Result<StoreTables, ExitCode> {
        let store = &self.config.store;
        StoreTables::new(&store.posts_table, &store.meta_table).map_err(|e| {
            eprintln!("error: invalid table configuration: {e}");
            ExitCode::FAILURE
        })
    }

    /// Opens the configured SQLite database.
    pub fn store_or_failure(&self) -> Result<SqliteStore, ExitCode> {
        let Some(path) = self.config.store.database.as_deref() else {
            eprintln!("error: no database configured");
            eprintln!("Set [store] database in .fieldsearch.toml.");
            return Err(ExitCode::FAILURE);
        };
        if !path.is_file() {
            eprintln!("error: database does not exist: {}", path.display());
            return Err(ExitCode::FAILURE);
        }
        let tables = self.tables_or_failure()?;
        SqliteStore::open(path, tables).map_err(|e| {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        })
    }

    /// Builds the field-search service over `store`.
    pub fn field_search_or_failure(&self, store: &SqliteStore) -> Result<FieldSearch, ExitCode> {
        let rewriter = QueryRewriter::new(store.tables(), self.config.store.dialect).map_err(|e| {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        })?;
        Ok(FieldSearch::open(&self.registry(), store, rewriter))
    }

    /// Builds the host search template for `tables`.
    pub fn native_or_failure(&self, tables: &StoreTables) -> Result<NativeSearch, ExitCode> {
        NativeSearch::new(tables, self.config.store.dialect).map_err(|e| {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        })
    }
}

/// Returns the current working directory or exits with a consistent error.
fn current_dir_or_failure() -> Result<PathBuf, ExitCode> {
    env::current_dir().map_err(|e| {
        eprintln!("error: could not determine current directory: {e}");
        ExitCode::FAILURE
    })
}

/// Loads configuration from the provided directory or exits with an error.
fn load_config_or_failure(cwd: &Path) -> Result<Config, ExitCode> {
    Config::load(cwd).map_err(|e| {
        eprintln!("error: failed to load configuration: {e}");
        ExitCode::FAILURE
    })
}
