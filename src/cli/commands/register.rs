//! cli::commands::register
//!
//! Add a registration to a schema file.

use std::path::Path;

use anyhow::{Context as _, Result};

use crate::cli::Context;
use crate::core::config::{Config, RegisterEntry, SchemaConfig};
use crate::ui::output;

/// Add or replace the registration of `key` in `schema_file`.
pub fn register(
    ctx: &Context,
    schema_file: &Path,
    key: &str,
    meta_type: &str,
    flags: &[String],
    default: Option<&str>,
) -> Result<()> {
    let mut schema = if schema_file.exists() {
        Config::load_from(None, Some(schema_file))
            .with_context(|| format!("Failed to load '{}'", schema_file.display()))?
            .config
            .schema
            .unwrap_or_default()
    } else {
        SchemaConfig::default()
    };

    let entry = RegisterEntry {
        key: key.to_string(),
        meta_type: meta_type.to_string(),
        flags: flags.to_vec(),
        default: default.map(str::to_string),
    };
    let registration = entry.resolve()?;

    match schema.register.iter_mut().find(|e| e.key == key) {
        Some(existing) => *existing = entry,
        None => schema.register.push(entry),
    }

    Config::write_schema(schema_file, &schema)
        .with_context(|| format!("Failed to write '{}'", schema_file.display()))?;

    output::print(
        format!(
            "Registered {} ({}) [{}] in '{}'",
            registration.key,
            registration.meta_type,
            registration.flags,
            schema_file.display()
        ),
        ctx.verbosity,
    );
    Ok(())
}
