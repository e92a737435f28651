//! cli::commands::show
//!
//! List every meta in a document.

use std::path::Path;

use anyhow::Result;

use super::document;
use crate::cli::Context;
use crate::ui::output;

/// List every meta in a document.
pub fn show(ctx: &Context, file: &Path) -> Result<()> {
    let metas = document::load_registered(ctx, file, false)?;

    if ctx.json {
        return output::json(&metas);
    }

    if metas.is_empty() {
        output::print("No metas.", ctx.verbosity);
        return Ok(());
    }

    for (key, value) in metas.iter() {
        let read_only = metas
            .check_meta_registered(key)
            .is_ok_and(|reg| !reg.flags.is_writable());
        let mut line = output::format_entry(key, value);
        if read_only {
            line.push_str("  [read-only]");
        }
        output::data(line);
    }

    Ok(())
}
