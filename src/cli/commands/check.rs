//! cli::commands::check
//!
//! Validate a document against the configured registrations.

use std::path::Path;

use anyhow::{bail, Result};
use serde::Serialize;

use super::document;
use crate::cli::Context;
use crate::ui::output;

#[derive(Serialize)]
struct CheckReport {
    ok: bool,
    metas: usize,
    violations: Vec<Violation>,
}

#[derive(Serialize)]
struct Violation {
    key: String,
    reason: String,
}

/// Validate a document; fails if any registration is contradicted.
pub fn check(ctx: &Context, file: &Path) -> Result<()> {
    let mut metas = document::load(file, false)?;
    let violations: Vec<Violation> = document::register(ctx, &mut metas, false)
        .into_iter()
        .map(|(key, err)| Violation {
            key,
            reason: err.to_string(),
        })
        .collect();
    let count = violations.len();

    if ctx.json {
        output::json(&CheckReport {
            ok: violations.is_empty(),
            metas: metas.len(),
            violations,
        })?;
    } else {
        for violation in &violations {
            output::data(format!("{}: {}", violation.key, violation.reason));
        }
    }

    if count > 0 {
        bail!("{} violation(s) in '{}'", count, file.display());
    }

    if !ctx.json {
        output::print(
            format!("{}: ok ({} metas)", file.display(), metas.len()),
            ctx.verbosity,
        );
    }
    Ok(())
}
