//! cli
//!
//! Command-line interface layer for clipmeta.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Install the log subscriber
//! - Load configuration and delegate to command handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. Command handlers load a document into a
//! [`MetaContainer`](crate::core::container::MetaContainer), apply the
//! configured registrations, and run container operations; every rule about
//! types and permissions lives in [`crate::core`].

pub mod args;
pub mod commands;

pub use args::{Cli, Command, Shell};

use std::io::IsTerminal;

use anyhow::{Context as _, Result};
use tracing_subscriber::EnvFilter;

use crate::core::config::Config;
use crate::ui::output::{self, Verbosity};

/// Settings shared by every command handler.
#[derive(Debug, Clone)]
pub struct Context {
    pub verbosity: Verbosity,
    /// Print JSON instead of text
    pub json: bool,
    pub config: Config,
}

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();
    let verbosity = Verbosity::from_flags(cli.quiet, cli.debug);
    init_tracing(verbosity);

    // Completions must work even with a broken configuration.
    if let Command::Completion { shell } = cli.command {
        return commands::completion(shell);
    }

    let loaded = Config::load(cli.schema.as_deref()).context("Failed to load configuration")?;
    for warning in &loaded.warnings {
        output::warn(
            format!("{}: {}", warning.path.display(), warning.message),
            verbosity,
        );
    }

    let ctx = Context {
        verbosity,
        json: cli.json || loaded.config.json(),
        config: loaded.config,
    };

    commands::dispatch(cli.command, &ctx)
}

/// Install the stderr log subscriber.
///
/// `RUST_LOG` wins over the verbosity flags.
fn init_tracing(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.log_directive()));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .try_init();
}
