//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Loads the document and applies the configured registrations
//! 2. Runs container operations
//! 3. Saves the document if it changed, and formats output
//!
//! Handlers never bypass the container: every write goes through the same
//! type and permission checks as library callers.

mod check;
mod completion;
pub mod document;
mod get;
mod import;
mod normalize;
mod register;
mod registered;
mod set;
mod show;
mod unset;

// Re-export command functions for testing and direct invocation
pub use check::check;
pub use completion::completion;
pub use get::get;
pub use import::{import, ImportSource};
pub use normalize::normalize;
pub use register::register;
pub use registered::registered;
pub use set::set;
pub use show::show;
pub use unset::unset;

use crate::cli::args::Command;
use crate::cli::Context;
use anyhow::Result;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Show { file } => show::show(ctx, &file),
        Command::Get { file, key } => get::get(ctx, &file, &key),
        Command::Set {
            file,
            key,
            value,
            meta_type,
        } => set::set(ctx, &file, &key, &value, meta_type.as_deref()),
        Command::Unset { file, key } => unset::unset(ctx, &file, &key),
        Command::Import {
            file,
            text,
            from,
            strict,
        } => {
            let source = match (&text, &from) {
                (Some(text), _) => ImportSource::Text(text),
                (None, Some(path)) => ImportSource::File(path),
                (None, None) => anyhow::bail!("Nothing to import: give TEXT or --from"),
            };
            import::import(ctx, &file, source, strict)
        }
        Command::Check { file } => check::check(ctx, &file),
        Command::Normalize { file, write } => normalize::normalize(ctx, &file, write),
        Command::Registered => registered::registered(ctx),
        Command::Register {
            schema_file,
            key,
            meta_type,
            flags,
            default,
        } => register::register(
            ctx,
            &schema_file,
            &key,
            &meta_type,
            &flags,
            default.as_deref(),
        ),
        Command::Completion { shell } => completion::completion(shell),
    }
}
