//! cli::commands::normalize
//!
//! Print or rewrite a document in canonical form.

use std::path::Path;

use anyhow::Result;

use super::document;
use crate::cli::Context;
use crate::ui::output;

/// Print a document in canonical form, or rewrite it with `write`.
pub fn normalize(ctx: &Context, file: &Path, write: bool) -> Result<()> {
    let metas = document::load_registered(ctx, file, false)?;

    if write {
        document::save(file, &metas)?;
        output::print(format!("Normalized '{}'", file.display()), ctx.verbosity);
    } else {
        output::data(metas.metas_to_string());
    }

    Ok(())
}
