//! ui
//!
//! User interaction utilities.
//!
//! # Modules
//!
//! - [`output`] - Output formatting and display
//!
//! # Design
//!
//! All command output goes through this module so that quiet mode and JSON
//! output behave the same in every command. Diagnostics go through `tracing`
//! instead.

pub mod output;
