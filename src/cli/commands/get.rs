//! cli::commands::get
//!
//! Print the value of one meta.

use std::path::Path;

use anyhow::{anyhow, Result};

use super::document;
use crate::cli::Context;
use crate::ui::output;

/// Print the value of one meta.
///
/// Strings are printed raw; `--json` prints the typed value.
pub fn get(ctx: &Context, file: &Path, key: &str) -> Result<()> {
    let metas = document::load_registered(ctx, file, false)?;
    let value = metas
        .get_meta(key)
        .ok_or_else(|| anyhow!("No meta '{}' in '{}'", key, file.display()))?;

    if ctx.json {
        output::json(value)
    } else {
        output::data(value);
        Ok(())
    }
}
