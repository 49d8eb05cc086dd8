//! Implementation of `fieldsearch check`.

use std::process::ExitCode;

use fieldsearch_config::{ConfigWarning, discover_config_files};
use fieldsearch_fields::{FieldCatalog, FieldRegistry, resolve_patterns};
use fieldsearch_highlight::{dim, header, success, warning};

use crate::cli::context::CommandContext;

/// Shows configuration files and reports configuration problems.
///
/// Exits with failure if any warning or error is found.
pub fn run(ctx: &CommandContext) -> ExitCode {
    let config_files = discover_config_files(&ctx.cwd);
    if config_files.is_empty() {
        println!("{}", dim("No configuration files found."));
        println!();
        println!("Run 'fieldsearch init' to create a configuration file.");
        return ExitCode::SUCCESS;
    }

    println!("{}", header("Config files (highest precedence first):"));
    for path in &config_files {
        println!("   {}", path.display());
    }
    println!();

    let mut problems: Vec<String> = ctx.config.validate().iter().map(format_warning).collect();

    let registry = ctx.registry();
    match registry.definitions() {
        Ok(definitions) => {
            let catalog = FieldCatalog::from_definitions(definitions);
            println!(
                "{} {} fields, {} searchable",
                header("Fields:"),
                catalog.len(),
                catalog.searchable().count()
            );
            if let Err(e) = resolve_patterns(&catalog) {
                problems.push(format!("field configuration: {e}"));
            }
        }
        Err(e) if !ctx.config.registry.files.is_empty() => problems.push(e.to_string()),
        Err(_) => {}
    }
    println!();

    if problems.is_empty() {
        println!("{}", success("No issues found."));
        return ExitCode::SUCCESS;
    }

    println!("{}", header(&format!("Warnings ({}):", problems.len())));
    for problem in &problems {
        println!("   {}", warning(problem));
    }
    ExitCode::FAILURE
}

/// Formats a warning with a hint where one helps.
fn format_warning(w: &ConfigWarning) -> String {
    match w {
        ConfigWarning::NoRegistryFiles => {
            format!("{w} (add [registry] files to .fieldsearch.toml)")
        }
        _ => w.to_string(),
    }
}
