//! cli::commands::registered
//!
//! List the registrations of the global configuration and schema file.

use anyhow::Result;
use serde::Serialize;

use crate::cli::Context;
use crate::core::format;
use crate::core::value::MetaType;
use crate::ui::output;

#[derive(Serialize)]
struct Entry<'a> {
    key: &'a str,
    #[serde(rename = "type")]
    meta_type: MetaType,
    flags: String,
    default: Option<String>,
}

/// List registered keys in declaration order.
pub fn registered(ctx: &Context) -> Result<()> {
    let entries: Vec<Entry<'_>> = ctx
        .config
        .registrations()
        .iter()
        .map(|reg| Entry {
            key: &reg.key,
            meta_type: reg.meta_type,
            flags: reg.flags.to_string(),
            default: reg.default.as_ref().map(format::value_to_string),
        })
        .collect();

    if ctx.json {
        return output::json(&entries);
    }

    if entries.is_empty() {
        output::print("No registered keys.", ctx.verbosity);
        return Ok(());
    }

    for entry in &entries {
        let mut line = format!("{} ({}) [{}]", entry.key, entry.meta_type, entry.flags);
        if let Some(default) = &entry.default {
            line.push_str(" default=");
            line.push_str(default);
        }
        output::data(line);
    }

    Ok(())
}
