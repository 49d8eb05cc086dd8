//! Clap argument definitions for the `fieldsearch` CLI.

use clap::{ArgAction, Args, Parser, Subcommand};

/// Default number of results for `fieldsearch search`.
pub const DEFAULT_SEARCH_LIMIT: usize = 10;

/// Top-level CLI options.
#[derive(Parser)]
#[command(name = "fieldsearch")]
#[command(about = "Search structured custom fields alongside native post search")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Parses process arguments, exiting on error or `--help`.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Arguments for `fieldsearch init`.
#[derive(Args, Debug, Clone)]
pub struct InitCommand {
    /// Create global ~/.fieldsearch.toml instead
    #[arg(long)]
    pub global: bool,

    /// Overwrite existing configuration file
    #[arg(long)]
    pub force: bool,
}

/// Arguments for `fieldsearch rewrite`.
#[derive(Args, Debug, Clone)]
pub struct RewriteCommand {
    /// Search string, as a visitor would type it
    pub query: String,

    /// Print SQL without syntax highlighting
    #[arg(long)]
    pub plain: bool,

    /// Render the host clause with brace placeholders instead of `%`
    #[arg(long)]
    pub placeholder: bool,
}

/// Arguments for `fieldsearch search`.
#[derive(Args, Debug, Clone)]
pub struct SearchCommand {
    /// Search string, as a visitor would type it
    pub query: String,

    /// Maximum results to show
    #[arg(short = 'n', long, default_value_t = DEFAULT_SEARCH_LIMIT)]
    pub limit: usize,
}

/// Arguments for `fieldsearch excerpt`.
#[derive(Args, Debug, Clone)]
pub struct ExcerptCommand {
    /// Post identifier
    pub post_id: i64,

    /// Search term to prioritise
    pub term: String,
}

/// Supported `fieldsearch` subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Initialize fieldsearch configuration in the current directory
    Init(InitCommand),

    /// Validate configuration and field definitions
    Check,

    /// List searchable fields and their storage-key patterns
    Fields,

    /// List the storage keys resolved from the store
    Keys,

    /// Show the host search SQL and its rewritten form
    #[command(after_help = "\
EXAMPLES:
  fieldsearch rewrite 'ada lovelace'
  fieldsearch rewrite '\"analytical engine\"' --plain
  fieldsearch rewrite compilers --placeholder")]
    Rewrite(RewriteCommand),

    /// Run a search against the store, with field excerpts
    Search(SearchCommand),

    /// Build the search excerpt for one post
    Excerpt(ExcerptCommand),
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn search_limit_defaults() {
        let cli = Cli::try_parse_from(["fieldsearch", "search", "red"]).unwrap();
        let Commands::Search(cmd) = cli.command else {
            panic!("expected search");
        };
        assert_eq!(cmd.limit, DEFAULT_SEARCH_LIMIT);
    }

    #[test]
    fn verbose_is_global() {
        let cli = Cli::try_parse_from(["fieldsearch", "keys", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }
}
