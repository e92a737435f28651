//! cli::commands::unset
//!
//! Remove one meta.
//!
//! Removal is not subject to the writable flag, and a registered key keeps
//! its registration.

use std::path::Path;

use anyhow::Result;

use super::document;
use crate::cli::Context;
use crate::ui::output;

/// Remove one meta.
pub fn unset(ctx: &Context, file: &Path, key: &str) -> Result<()> {
    let mut metas = document::load_registered(ctx, file, false)?;

    match metas.remove_meta(key) {
        Some(_) => {
            document::save(file, &metas)?;
            output::print(format!("Removed '{}'", key), ctx.verbosity);
        }
        None => output::print(format!("'{}' is not set", key), ctx.verbosity),
    }

    Ok(())
}
