//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Global Config
//!
//! Located at (in order of precedence):
//! 1. `$CLIPMETA_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/clipmeta/config.toml`
//! 3. `~/.clipmeta/config.toml` (canonical write location)
//!
//! # Schema Files
//!
//! Passed explicitly (`cmeta --schema <path>`). A schema file declares the
//! registered keys of a metadata document and overrides global
//! registrations of the same key.
//!
//! # Validation
//!
//! Registrations are resolved after parsing: keys must be valid meta keys,
//! types and flags must be known names, and defaults must parse as the
//! declared type.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::core::format::parse_value;
use crate::core::types::{MetaFlags, MetaKey};
use crate::core::value::{MetaType, MetaValue};

/// Global configuration (user scope).
///
/// # Example
///
/// ```toml
/// json = false
/// strict_import = true
///
/// [[register]]
/// key = "ges:uri"
/// type = "string"
/// flags = ["readable"]
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Default to JSON output
    pub json: Option<bool>,

    /// Refuse imports that would drop any key
    pub strict_import: Option<bool>,

    /// Keys registered on every document
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub register: Vec<RegisterEntry>,
}

impl GlobalConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any registration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        resolve_all(&self.register).map(|_| ())
    }
}

/// Per-document schema.
///
/// # Example
///
/// ```toml
/// [[register]]
/// key = "width"
/// type = "int"
/// default = "1920"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SchemaConfig {
    /// Overrides the global `strict_import`
    pub strict_import: Option<bool>,

    /// Keys registered on the document
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub register: Vec<RegisterEntry>,
}

impl SchemaConfig {
    /// Validate the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        resolve_all(&self.register).map(|_| ())
    }
}

/// One `[[register]]` table, as written in TOML.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RegisterEntry {
    /// Meta key
    pub key: String,

    /// Type name (`int`, `string`, `marker-list`, ...)
    #[serde(rename = "type")]
    pub meta_type: String,

    /// Flag names; defaults to `["readable", "writable"]`
    #[serde(default = "default_flags")]
    pub flags: Vec<String>,

    /// Initial value, written in the text format's value syntax
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

fn default_flags() -> Vec<String> {
    vec!["readable".to_string(), "writable".to_string()]
}

impl RegisterEntry {
    /// Create an entry with default flags and no default value.
    pub fn new(key: impl Into<String>, meta_type: MetaType) -> Self {
        Self {
            key: key.into(),
            meta_type: meta_type.name().to_string(),
            flags: default_flags(),
            default: None,
        }
    }

    /// Resolve names into typed values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the offending key.
    pub fn resolve(&self) -> Result<Registration, ConfigError> {
        let invalid = |what: String| {
            ConfigError::InvalidValue(format!("register '{}': {}", self.key, what))
        };

        MetaKey::validate(&self.key).map_err(|e| invalid(e.to_string()))?;
        let meta_type = MetaType::from_name(&self.meta_type).map_err(|e| invalid(e.to_string()))?;
        let flags = MetaFlags::from_names(&self.flags).map_err(|e| invalid(e.to_string()))?;
        let default = self
            .default
            .as_deref()
            .map(|text| parse_value(meta_type, text))
            .transpose()
            .map_err(|e| invalid(format!("invalid default: {}", e)))?;

        Ok(Registration {
            key: self.key.clone(),
            meta_type,
            flags,
            default,
        })
    }
}

/// A validated registration.
#[derive(Debug, Clone, PartialEq)]
pub struct Registration {
    pub key: String,
    pub meta_type: MetaType,
    pub flags: MetaFlags,
    pub default: Option<MetaValue>,
}

/// Resolve a list of entries, rejecting duplicate keys.
pub(super) fn resolve_all(entries: &[RegisterEntry]) -> Result<Vec<Registration>, ConfigError> {
    let mut seen = HashSet::new();
    entries
        .iter()
        .map(|entry| {
            if !seen.insert(entry.key.as_str()) {
                return Err(ConfigError::InvalidValue(format!(
                    "key '{}' is registered twice",
                    entry.key
                )));
            }
            entry.resolve()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    mod register_entry {
        use super::*;

        #[test]
        fn defaults_to_read_write() {
            let entry: RegisterEntry = toml::from_str("key = \"width\"\ntype = \"int\"").unwrap();
            let reg = entry.resolve().unwrap();
            assert_eq!(reg.meta_type, MetaType::Int);
            assert_eq!(reg.flags, MetaFlags::READ_WRITE);
            assert!(reg.default.is_none());
        }

        #[test]
        fn default_value_parsed_as_type() {
            let entry = RegisterEntry {
                default: Some("1920".into()),
                ..RegisterEntry::new("width", MetaType::UInt)
            };
            assert_eq!(entry.resolve().unwrap().default, Some(MetaValue::UInt(1920)));
        }

        #[test]
        fn invalid_default() {
            let entry = RegisterEntry {
                default: Some("wide".into()),
                ..RegisterEntry::new("width", MetaType::Int)
            };
            assert!(matches!(entry.resolve(), Err(ConfigError::InvalidValue(_))));
        }

        #[test]
        fn invalid_names() {
            let bad_key = RegisterEntry::new("not a key", MetaType::Int);
            assert!(bad_key.resolve().is_err());

            let bad_type = RegisterEntry {
                meta_type: "complex".into(),
                ..RegisterEntry::new("k", MetaType::Int)
            };
            assert!(bad_type.resolve().is_err());

            let bad_flag = RegisterEntry {
                flags: vec!["sticky".into()],
                ..RegisterEntry::new("k", MetaType::Int)
            };
            assert!(bad_flag.resolve().is_err());
        }

        #[test]
        fn read_only_flags() {
            let entry = RegisterEntry {
                flags: vec!["readable".into()],
                ..RegisterEntry::new("k", MetaType::String)
            };
            assert!(!entry.resolve().unwrap().flags.is_writable());
        }
    }

    mod global_config {
        use super::*;

        #[test]
        fn defaults() {
            let config = GlobalConfig::default();
            assert!(config.json.is_none());
            assert!(config.register.is_empty());
            assert!(config.validate().is_ok());
        }

        #[test]
        fn duplicate_keys_rejected() {
            let config = GlobalConfig {
                register: vec![
                    RegisterEntry::new("k", MetaType::Int),
                    RegisterEntry::new("k", MetaType::String),
                ],
                ..Default::default()
            };
            assert!(config.validate().is_err());
        }

        #[test]
        fn unknown_fields_rejected() {
            let result: Result<GlobalConfig, _> = toml::from_str("colour = true");
            assert!(result.is_err());
        }

        #[test]
        fn roundtrip() {
            let config = GlobalConfig {
                json: Some(true),
                strict_import: Some(false),
                register: vec![RegisterEntry {
                    default: Some("\"x\"".into()),
                    ..RegisterEntry::new("title", MetaType::String)
                }],
            };

            let toml = toml::to_string_pretty(&config).unwrap();
            let parsed: GlobalConfig = toml::from_str(&toml).unwrap();
            assert_eq!(config, parsed);
        }
    }

    mod schema_config {
        use super::*;

        #[test]
        fn parse_tables() {
            let schema: SchemaConfig = toml::from_str(
                r#"
                strict_import = true

                [[register]]
                key = "width"
                type = "int"
                default = "1920"

                [[register]]
                key = "ges:uri"
                type = "string"
                flags = ["readable"]
                "#,
            )
            .unwrap();

            assert_eq!(schema.strict_import, Some(true));
            assert_eq!(schema.register.len(), 2);
            assert!(schema.validate().is_ok());
        }
    }
}
