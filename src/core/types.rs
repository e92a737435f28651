//! core::types
//!
//! Strong types for metadata keys and permissions.
//!
//! # Types
//!
//! - [`MetaKey`] - Validated metadata key (usable as a field name)
//! - [`MetaFlags`] - Permission bits of a registered key
//!
//! # Validation
//!
//! Keys are validated at construction time so that every stored key can be
//! written out and read back through the text format.
//!
//! # Examples
//!
//! ```
//! use clipmeta::core::types::{MetaFlags, MetaKey};
//!
//! let key = MetaKey::new("author").unwrap();
//! assert_eq!(key.as_str(), "author");
//! assert!(MetaKey::new("9lives").is_err());
//!
//! let flags = MetaFlags::READ_WRITE;
//! assert!(flags.is_writable());
//! ```

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid meta key: {0}")]
    InvalidKey(String),

    #[error("unknown meta flag: {0}")]
    UnknownFlag(String),
}

/// A validated metadata key.
///
/// Keys follow the field-name rules of the text format:
/// - Cannot be empty
/// - Must start with an ASCII letter
/// - May only contain ASCII alphanumerics and `/`, `-`, `_`, `.`, `:`, `+`
///
/// # Example
///
/// ```
/// use clipmeta::core::types::MetaKey;
///
/// assert!(MetaKey::new("video-width").is_ok());
/// assert!(MetaKey::new("ges:title").is_ok());
/// assert!(MetaKey::new("").is_err());
/// assert!(MetaKey::new("has space").is_err());
/// assert!(MetaKey::new("_hidden").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MetaKey(String);

impl MetaKey {
    /// Create a new validated key.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidKey` if the key violates the field-name rules.
    pub fn new(key: impl Into<String>) -> Result<Self, TypeError> {
        let key = key.into();
        Self::validate(&key)?;
        Ok(Self(key))
    }

    /// Check a key without allocating.
    pub fn validate(key: &str) -> Result<(), TypeError> {
        let mut chars = key.chars();

        match chars.next() {
            None => return Err(TypeError::InvalidKey("key cannot be empty".into())),
            Some(c) if !c.is_ascii_alphabetic() => {
                return Err(TypeError::InvalidKey(format!(
                    "key '{}' must start with an ASCII letter",
                    key
                )));
            }
            Some(_) => {}
        }

        if let Some(bad) = chars.find(|c| !Self::is_key_char(*c)) {
            return Err(TypeError::InvalidKey(format!(
                "key '{}' contains invalid character '{}'",
                key, bad
            )));
        }

        Ok(())
    }

    /// Whether `c` may appear after the first character of a key.
    pub(crate) fn is_key_char(c: char) -> bool {
        c.is_ascii_alphanumeric() || matches!(c, '/' | '-' | '_' | '.' | ':' | '+')
    }

    /// Get the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MetaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for MetaKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for MetaKey {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MetaKey> for String {
    fn from(key: MetaKey) -> Self {
        key.0
    }
}

/// Permission bits of a registered meta key.
///
/// Only [`MetaFlags::WRITABLE`] affects behaviour: a registered key without
/// it rejects every write through the normal set path. Removal is never
/// gated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MetaFlags(u32);

impl MetaFlags {
    /// No permissions.
    pub const NONE: MetaFlags = MetaFlags(0);
    /// The value may be read.
    pub const READABLE: MetaFlags = MetaFlags(1 << 0);
    /// The value may be changed after registration.
    pub const WRITABLE: MetaFlags = MetaFlags(1 << 1);
    /// Readable and writable.
    pub const READ_WRITE: MetaFlags = MetaFlags(Self::READABLE.0 | Self::WRITABLE.0);

    /// Whether every bit of `other` is set.
    pub fn contains(self, other: MetaFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_readable(self) -> bool {
        self.contains(Self::READABLE)
    }

    pub fn is_writable(self) -> bool {
        self.contains(Self::WRITABLE)
    }

    /// Parse a single flag name (`readable`, `writable`, `readwrite`, `none`).
    pub fn from_name(name: &str) -> Result<Self, TypeError> {
        match name.to_ascii_lowercase().as_str() {
            "none" => Ok(Self::NONE),
            "readable" | "read" => Ok(Self::READABLE),
            "writable" | "write" => Ok(Self::WRITABLE),
            "readwrite" | "read-write" => Ok(Self::READ_WRITE),
            _ => Err(TypeError::UnknownFlag(name.to_string())),
        }
    }

    /// Combine a list of flag names.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, TypeError> {
        names
            .iter()
            .try_fold(Self::NONE, |acc, n| Ok(acc | Self::from_name(n.as_ref())?))
    }
}

impl BitOr for MetaFlags {
    type Output = MetaFlags;

    fn bitor(self, rhs: MetaFlags) -> MetaFlags {
        MetaFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for MetaFlags {
    fn bitor_assign(&mut self, rhs: MetaFlags) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for MetaFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.is_readable(), self.is_writable()) {
            (true, true) => f.write_str("readable|writable"),
            (true, false) => f.write_str("readable"),
            (false, true) => f.write_str("writable"),
            (false, false) => f.write_str("none"),
        }
    }
}
