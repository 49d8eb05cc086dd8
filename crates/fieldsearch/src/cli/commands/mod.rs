//! Command implementations and dispatch.

pub mod check;
pub mod excerpt;
pub mod fields;
pub mod init;
pub mod keys;
pub mod rewrite;
pub mod search;

use std::process::ExitCode;

use super::{args::Commands, context::CommandContext};

/// Dispatches to the selected subcommand.
pub fn run(command: Commands, ctx: &CommandContext) -> ExitCode {
    match command {
        Commands::Init(cmd) => init::run(ctx, &cmd),
        Commands::Check => check::run(ctx),
        Commands::Fields => fields::run(ctx),
        Commands::Keys => keys::run(ctx),
        Commands::Rewrite(cmd) => rewrite::run(ctx, &cmd),
        Commands::Search(cmd) => search::run(ctx, &cmd),
        Commands::Excerpt(cmd) => excerpt::run(ctx, &cmd),
    }
}
