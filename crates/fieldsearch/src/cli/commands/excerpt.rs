//! Implementation of `fieldsearch excerpt`.

use std::process::ExitCode;

use fieldsearch::ExcerptOptions;
use fieldsearch_highlight::dim;

use crate::cli::{args::ExcerptCommand, context::CommandContext};

/// Prints the search excerpt for a single post.
pub fn run(ctx: &CommandContext, cmd: &ExcerptCommand) -> ExitCode {
    let store = match ctx.store_or_failure() {
        Ok(store) => store,
        Err(code) => return code,
    };
    let post = match store.post(cmd.post_id) {
        Ok(Some(post)) => post,
        Ok(None) => {
            eprintln!("error: no post with id {}", cmd.post_id);
            return ExitCode::FAILURE;
        }
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    let search = match ctx.field_search_or_failure(&store) {
        Ok(search) => search,
        Err(code) => return code,
    };

    let options = ExcerptOptions::from(&ctx.config.excerpt);
    let excerpt = search.build_excerpt(&store, post.id, &post.excerpt, cmd.term.trim(), &options);
    if excerpt.is_empty() {
        println!("{}", dim("(empty excerpt)"));
    } else {
        println!("{excerpt}");
    }
    ExitCode::SUCCESS
}
