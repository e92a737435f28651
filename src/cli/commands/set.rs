//! cli::commands::set
//!
//! Set the value of one meta.
//!
//! # Value types
//!
//! The value text is parsed, in order of preference:
//! 1. as the type given with `--type`
//! 2. as the registered type of the key
//! 3. by inference (see [`format::parse_untyped`])

use std::path::Path;

use anyhow::{Context as _, Result};

use super::document;
use crate::cli::Context;
use crate::core::format;
use crate::core::value::MetaType;
use crate::ui::output;

/// Set the value of one meta, creating the document if needed.
pub fn set(
    ctx: &Context,
    file: &Path,
    key: &str,
    value: &str,
    meta_type: Option<&str>,
) -> Result<()> {
    let mut metas = document::load_registered(ctx, file, true)?;

    let meta_type = match meta_type {
        Some(name) => Some(MetaType::from_name(name)?),
        None => metas.check_meta_registered(key).ok().map(|reg| reg.meta_type),
    };
    let value = match meta_type {
        Some(ty) => format::parse_value(ty, value),
        None => format::parse_untyped(value),
    }
    .with_context(|| format!("Invalid value for '{}'", key))?;

    let entry = output::format_entry(key, &value);
    metas
        .set_meta(key, Some(value))
        .with_context(|| format!("Cannot set '{}'", key))?;
    document::save(file, &metas)?;

    output::print(format!("Set {}", entry), ctx.verbosity);
    Ok(())
}
