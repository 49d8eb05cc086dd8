//! CLI support for the `fieldsearch` binary.

pub mod args;
pub mod commands;
pub mod context;
pub mod logging;
