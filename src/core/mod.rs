//! core
//!
//! Core domain types and operations for clipmeta.
//!
//! # Modules
//!
//! - [`types`] - Strong types: MetaKey, MetaFlags
//! - [`value`] - Typed values and their type tags
//! - [`marker`] - Position-ordered marker lists
//! - [`container`] - The metadata container and its notifications
//! - [`format`] - Text form of a container
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid states at compile time
//! - Registered keys are enforced on every write
//! - Serialized output is deterministic

pub mod config;
pub mod container;
pub mod format;
pub mod marker;
pub mod types;
pub mod value;
