//! Diagnostic logging for the CLI.

use std::io;

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Environment variable holding a `tracing` filter directive.
pub const LOG_ENV: &str = "FIELDSEARCH_LOG";

/// Installs the global subscriber, writing to stderr.
///
/// `FIELDSEARCH_LOG` takes precedence; otherwise `-v` raises the level from
/// `warn` to `info` (`-v`) or `debug` (`-vv`).
pub fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(default_level(verbose)))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .with(filter)
        .init();
}

/// Maps the `-v` count to a level directive.
fn default_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}
