//! Implementation of `fieldsearch search`.

use std::process::ExitCode;

use fieldsearch::{ExcerptOptions, HostQuery, SearchQuery};
use fieldsearch_highlight::{dim, header, rule};

use crate::cli::{args::SearchCommand, context::CommandContext};

/// Runs the rewritten search against the store and prints matching posts.
pub fn run(ctx: &CommandContext, cmd: &SearchCommand) -> ExitCode {
    let store = match ctx.store_or_failure() {
        Ok(store) => store,
        Err(code) => return code,
    };
    let search = match ctx.field_search_or_failure(&store) {
        Ok(search) => search,
        Err(code) => return code,
    };
    let native = match ctx.native_or_failure(store.tables()) {
        Ok(native) => native,
        Err(code) => return code,
    };

    let mut query = HostQuery::search(cmd.query.as_str());
    let search_ctx = search.detect(&mut query);
    let clauses = search.rewrite_clauses(search_ctx, native.clauses(&query));
    let sql = native.select(&clauses, Some(cmd.limit));

    let posts = match store.search_posts(&sql) {
        Ok(posts) => posts,
        Err(e) => {
            eprintln!("error: search failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    if posts.is_empty() {
        println!("{}", dim("No results."));
        return ExitCode::SUCCESS;
    }

    let term = query.search_term().unwrap_or_default();
    let options = ExcerptOptions::from(&ctx.config.excerpt);
    for (i, post) in posts.iter().enumerate() {
        if i > 0 {
            println!("{}", rule(40));
        }
        println!("{} {}", header(&post.title), dim(&format!("#{}", post.id)));
        let original = if post.excerpt.is_empty() {
            &post.content
        } else {
            &post.excerpt
        };
        let excerpt = search.build_excerpt(&store, post.id, original, term, &options);
        if !excerpt.is_empty() {
            println!("{excerpt}");
        }
    }
    ExitCode::SUCCESS
}
