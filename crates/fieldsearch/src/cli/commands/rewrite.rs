//! Implementation of `fieldsearch rewrite`.

use std::process::ExitCode;

use fieldsearch::{HostQuery, QueryClauses};
use fieldsearch_highlight::{Highlighter, Syntax, dim, header};

use crate::cli::{args::RewriteCommand, context::CommandContext};

/// Placeholder standing in for `%` with `--placeholder`.
const PLACEHOLDER: &str = "9c1e5b7a";

/// Prints the host clauses for a search and their rewritten form.
pub fn run(ctx: &CommandContext, cmd: &RewriteCommand) -> ExitCode {
    let store = match ctx.store_or_failure() {
        Ok(store) => store,
        Err(code) => return code,
    };
    let search = match ctx.field_search_or_failure(&store) {
        Ok(search) => search,
        Err(code) => return code,
    };
    let mut native = match ctx.native_or_failure(store.tables()) {
        Ok(native) => native,
        Err(code) => return code,
    };
    if cmd.placeholder {
        native = native.with_placeholder(PLACEHOLDER);
    }

    let mut query = HostQuery::search(cmd.query.as_str());
    let ctx_search = search.detect(&mut query);
    let host = native.clauses(&query);
    let rewritten = search.rewrite_clauses(ctx_search, host.clone());

    let printer = SqlPrinter::new(cmd.plain);
    println!("{}", header("Host clauses:"));
    printer.clauses(&host);
    println!();
    println!("{}", header("Rewritten clauses:"));
    printer.clauses(&rewritten);
    println!();
    println!("{}", header("Statement:"));
    printer.line(&native.select(&rewritten, None));

    if rewritten == host {
        println!();
        println!("{}", dim("No structured fields apply; native search is unchanged."));
    }
    ExitCode::SUCCESS
}

/// Prints SQL, highlighted unless plain output was requested.
struct SqlPrinter {
    /// Highlighter, absent for plain output or when stdout is not a terminal.
    highlighter: Option<Highlighter>,
}

impl SqlPrinter {
    /// Creates a printer.
    fn new(plain: bool) -> Self {
        Self {
            highlighter: Highlighter::for_stdout(plain),
        }
    }

    /// Prints the three clauses of a query.
    fn clauses(&self, clauses: &QueryClauses) {
        for (label, sql) in [
            ("distinct", &clauses.distinct),
            ("join", &clauses.join),
            ("where", &clauses.search),
        ] {
            print!("   {} ", dim(&format!("{label:>8}:")));
            self.line(sql.trim());
        }
    }

    /// Prints one SQL line.
    fn line(&self, sql: &str) {
        match &self.highlighter {
            Some(highlighter) => println!("{}", highlighter.highlight(sql, Syntax::Sql)),
            None => println!("{sql}"),
        }
    }
}
