//! Implementation of `fieldsearch keys`.

use std::process::ExitCode;

use fieldsearch_highlight::{dim, header};

use crate::cli::context::CommandContext;

/// Lists the storage keys resolved for searchable fields.
pub fn run(ctx: &CommandContext) -> ExitCode {
    let store = match ctx.store_or_failure() {
        Ok(store) => store,
        Err(code) => return code,
    };
    let search = match ctx.field_search_or_failure(&store) {
        Ok(search) => search,
        Err(code) => return code,
    };

    let fields = search.fields();
    println!("{}", header(&format!("Resolved keys ({}):", fields.keys().len())));
    if fields.keys().is_empty() {
        println!("   {}", dim("(none)"));
    }
    for key in fields.keys() {
        println!("   {key}");
    }
    ExitCode::SUCCESS
}
