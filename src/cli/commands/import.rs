//! cli::commands::import
//!
//! Merge a serialized document into a document file.
//!
//! # Strict mode
//!
//! By default refused keys are listed and everything else is saved. In
//! strict mode (`--strict` or `strict_import`) one refused key fails the
//! whole import and the file is not written.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context as _, Result};
use serde::Serialize;

use super::document;
use crate::cli::Context;
use crate::core::container::ImportReport;
use crate::ui::output;

/// Where the serialized document comes from.
pub enum ImportSource<'a> {
    Text(&'a str),
    File(&'a Path),
}

#[derive(Serialize)]
struct ImportSummary<'a> {
    applied: &'a [String],
    rejected: Vec<Rejection<'a>>,
}

#[derive(Serialize)]
struct Rejection<'a> {
    key: &'a str,
    reason: String,
}

/// Merge a serialized document into `file`.
pub fn import(ctx: &Context, file: &Path, source: ImportSource<'_>, strict: bool) -> Result<()> {
    let text = match source {
        ImportSource::Text(text) => text.to_string(),
        ImportSource::File(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read '{}'", path.display()))?,
    };

    let mut metas = document::load_registered(ctx, file, true)?;
    let report = metas
        .add_metas_from_string(text.trim())
        .context("Failed to import metas")?;

    let strict = strict || ctx.config.strict_import();
    if strict && !report.is_clean() {
        print_rejected(ctx, &report);
        bail!(
            "{} key(s) refused; '{}' left unchanged",
            report.rejected.len(),
            file.display()
        );
    }

    document::save(file, &metas)?;

    if ctx.json {
        return output::json(&ImportSummary {
            applied: &report.applied,
            rejected: report
                .rejected
                .iter()
                .map(|(key, err)| Rejection {
                    key,
                    reason: err.to_string(),
                })
                .collect(),
        });
    }

    output::print(
        format!("Imported {} key(s)", report.applied.len()),
        ctx.verbosity,
    );
    print_rejected(ctx, &report);
    Ok(())
}

fn print_rejected(ctx: &Context, report: &ImportReport) {
    for (key, err) in &report.rejected {
        output::warn(format!("refused '{}': {}", key, err), ctx.verbosity);
    }
}
