//! cli::commands::document
//!
//! Loading and saving metadata document files.
//!
//! A document file holds one serialized container. Writes go through a
//! temporary file in the same directory and a rename, so a failed write never
//! leaves a truncated document behind.

use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use tracing::debug;

use crate::cli::Context;
use crate::core::container::{MetaContainer, MetaError};
use crate::ui::output;

/// Read and parse a document.
///
/// With `create`, a missing file yields an empty container. An empty file
/// is an empty container.
pub fn load(path: &Path, create: bool) -> Result<MetaContainer> {
    if create && !path.exists() {
        debug!(path = %path.display(), "document does not exist yet");
        return Ok(MetaContainer::new());
    }

    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read '{}'", path.display()))?;
    if text.trim().is_empty() {
        return Ok(MetaContainer::new());
    }
    text.trim()
        .parse::<MetaContainer>()
        .with_context(|| format!("Failed to parse '{}'", path.display()))
}

/// Apply the configured registrations, returning the refused ones.
///
/// Defaults fill missing keys only when `created`; a saved document keeps
/// whatever keys its last writer left, so removed keys stay removed.
pub fn register(
    ctx: &Context,
    metas: &mut MetaContainer,
    created: bool,
) -> Vec<(String, MetaError)> {
    if created {
        ctx.config.register_all(metas)
    } else {
        ctx.config.register_all_static(metas)
    }
}

/// Load a document and apply the configured registrations.
///
/// With `create`, a missing file yields a new container holding the
/// registered defaults. Registrations the document contradicts are reported
/// as warnings; use `cmeta check` to treat them as errors.
pub fn load_registered(ctx: &Context, path: &Path, create: bool) -> Result<MetaContainer> {
    let created = create && !path.exists();
    let mut metas = load(path, create)?;
    for (key, err) in register(ctx, &mut metas, created) {
        output::warn(
            format!("{}: cannot register '{}': {}", path.display(), key, err),
            ctx.verbosity,
        );
    }
    Ok(metas)
}

/// Write a document atomically.
pub fn save(path: &Path, metas: &MetaContainer) -> Result<()> {
    let mut contents = metas.metas_to_string();
    contents.push('\n');

    let temp_path = temp_path(path);
    let mut file = fs::File::create(&temp_path)
        .with_context(|| format!("Failed to create '{}'", temp_path.display()))?;
    file.write_all(contents.as_bytes())
        .and_then(|()| file.sync_all())
        .with_context(|| format!("Failed to write '{}'", temp_path.display()))?;

    fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to replace '{}'", path.display()))?;

    debug!(path = %path.display(), metas = metas.len(), "saved document");
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}
