//! clipmeta - typed metadata for timeline entities
//!
//! clipmeta provides the metadata container attached to clips, tracks and
//! markers of a non-linear editing timeline: a keyed store of typed values,
//! optional per-key registrations that pin a type and permission flags,
//! change notifications, and a round-trippable text form.
//!
//! # Architecture
//!
//! - [`core`] - Container, values, marker lists, text format, configuration
//! - [`timeline`] - Host entities that carry a container
//! - [`cli`] - Command-line interface layer (`cmeta`)
//! - [`ui`] - Output utilities
//!
//! # Correctness Invariants
//!
//! 1. A registered key only ever holds a value of its registered type
//! 2. A registered key without the writable flag never changes through the
//!    normal write path
//! 3. Writing a container and parsing it back yields an equal container

pub mod cli;
pub mod core;
pub mod timeline;
pub mod ui;
