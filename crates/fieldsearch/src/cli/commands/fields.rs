//! Implementation of `fieldsearch fields`.

use std::process::ExitCode;

use fieldsearch_fields::{FieldCatalog, FieldKind, resolve_patterns};
use fieldsearch_highlight::{dim, header};

use crate::cli::context::CommandContext;

/// Lists searchable fields with their storage-key patterns.
pub fn run(ctx: &CommandContext) -> ExitCode {
    let catalog = FieldCatalog::load(&ctx.registry());
    if catalog.is_empty() {
        println!("{}", dim("No field definitions loaded."));
        return ExitCode::SUCCESS;
    }

    let patterns = match resolve_patterns(&catalog) {
        Ok(patterns) => patterns,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    println!("{}", header("Searchable fields:"));
    if patterns.is_empty() {
        println!("   {}", dim("(none)"));
    }
    for pattern in &patterns {
        println!(
            "   {} {} {}",
            pattern.field.key,
            dim(&format!("({})", kind_label(pattern.field.kind))),
            pattern.key_pattern
        );
    }
    ExitCode::SUCCESS
}

/// Short label for a field kind.
fn kind_label(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::TextLike => "text",
        FieldKind::Repeater => "repeater",
        FieldKind::Other => "other",
    }
}
