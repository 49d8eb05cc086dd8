//! Command-line interface for the `fieldsearch` tool.

mod cli;

use std::process::ExitCode;

use cli::{
    args::{Cli, Commands},
    commands,
    context::CommandContext,
    logging::init_tracing,
};

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    init_tracing(cli.verbose);

    let ctx = match &cli.command {
        Commands::Init(_) => CommandContext::load_cwd_only(),
        _ => CommandContext::load(),
    };
    match ctx {
        Ok(ctx) => commands::run(cli.command, &ctx),
        Err(code) => code,
    }
}
