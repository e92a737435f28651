//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! clipmeta has two configuration scopes:
//! - **Global**: User-level settings and registrations
//! - **Schema**: Per-document registrations, passed with `--schema`
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Global config file
//! 3. Schema file
//! 4. CLI flags (not handled here)
//!
//! # Global Config Locations
//!
//! Searched in order:
//! 1. `$CLIPMETA_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/clipmeta/config.toml`
//! 3. `~/.clipmeta/config.toml` (canonical write location)
//!
//! # Example
//!
//! ```no_run
//! use clipmeta::core::config::Config;
//! use clipmeta::core::container::MetaContainer;
//! use std::path::Path;
//!
//! let result = Config::load(Some(Path::new("clip.schema.toml"))).unwrap();
//! let config = result.config;
//!
//! let mut metas = MetaContainer::new();
//! for (key, err) in config.register_all(&mut metas) {
//!     eprintln!("{}: {}", key, err);
//! }
//! ```

pub mod schema;

pub use schema::{GlobalConfig, RegisterEntry, Registration, SchemaConfig};

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::core::container::{MetaContainer, MetaError};

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("failed to write config file '{path}': {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Warnings generated during config loading.
#[derive(Debug, Clone)]
pub struct ConfigWarning {
    /// The warning message.
    pub message: String,
    /// The path that triggered the warning.
    pub path: PathBuf,
}

/// Result of loading configuration.
#[derive(Debug)]
pub struct ConfigLoadResult {
    /// The loaded configuration.
    pub config: Config,
    /// Any warnings generated during loading.
    pub warnings: Vec<ConfigWarning>,
}

/// Merged configuration from all sources.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Global configuration
    pub global: GlobalConfig,
    /// Schema file (if given)
    pub schema: Option<SchemaConfig>,
    /// Resolved registrations, schema entries replacing global ones
    registrations: Vec<Registration>,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// If `schema_path` is provided, the schema file must exist.
    ///
    /// # Errors
    ///
    /// Returns an error if config files exist but cannot be parsed or
    /// contain invalid registrations. A missing global config file is not an
    /// error (defaults are used).
    pub fn load(schema_path: Option<&Path>) -> Result<ConfigLoadResult, ConfigError> {
        let global_path = Self::find_global();
        Self::load_from(global_path.as_deref(), schema_path)
    }

    /// Load configuration from explicit paths.
    pub fn load_from(
        global_path: Option<&Path>,
        schema_path: Option<&Path>,
    ) -> Result<ConfigLoadResult, ConfigError> {
        let mut warnings = Vec::new();

        let global = match global_path {
            Some(path) => Self::read_toml::<GlobalConfig>(path)?,
            None => GlobalConfig::default(),
        };
        let schema = schema_path
            .map(Self::read_toml::<SchemaConfig>)
            .transpose()?;

        let mut registrations = schema::resolve_all(&global.register)?;
        if let (Some(schema), Some(path)) = (&schema, schema_path) {
            for reg in schema::resolve_all(&schema.register)? {
                if let Some(pos) = registrations.iter().position(|r| r.key == reg.key) {
                    warnings.push(ConfigWarning {
                        message: format!("'{}' overrides the global registration", reg.key),
                        path: path.to_path_buf(),
                    });
                    registrations[pos] = reg;
                } else {
                    registrations.push(reg);
                }
            }
        }

        debug!(
            global = ?global_path,
            schema = ?schema_path,
            registrations = registrations.len(),
            "loaded configuration"
        );

        Ok(ConfigLoadResult {
            config: Config {
                global,
                schema,
                registrations,
            },
            warnings,
        })
    }

    /// Locate the global configuration file.
    fn find_global() -> Option<PathBuf> {
        // 1. Check $CLIPMETA_CONFIG
        if let Ok(path) = std::env::var("CLIPMETA_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        // 2. Check $XDG_CONFIG_HOME/clipmeta/config.toml
        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("clipmeta/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        // 3. Check ~/.clipmeta/config.toml
        let path = dirs::home_dir()?.join(".clipmeta/config.toml");
        path.exists().then_some(path)
    }

    /// Read, parse and validate a config file.
    fn read_toml<T>(path: &Path) -> Result<T, ConfigError>
    where
        T: serde::de::DeserializeOwned,
    {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Write a schema file atomically.
    ///
    /// Creates parent directories if needed.
    pub fn write_schema(path: &Path, schema: &SchemaConfig) -> Result<(), ConfigError> {
        schema.validate()?;
        Self::write_config_atomic(path, schema)
    }

    /// Write a config file atomically.
    fn write_config_atomic<T: serde::Serialize>(
        path: &Path,
        config: &T,
    ) -> Result<(), ConfigError> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
                path: path.to_path_buf(),
                source: e,
            })?;
        }

        let contents =
            toml::to_string_pretty(config).map_err(|e| ConfigError::InvalidValue(e.to_string()))?;

        // Write to temp file in same directory (for atomic rename)
        let temp_path = path.with_extension("toml.tmp");
        let mut file = fs::File::create(&temp_path).map_err(|e| ConfigError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;

        file.write_all(contents.as_bytes())
            .map_err(|e| ConfigError::WriteError {
                path: temp_path.clone(),
                source: e,
            })?;

        file.sync_all().map_err(|e| ConfigError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;

        fs::rename(&temp_path, path).map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(())
    }

    // =========================================================================
    // Accessor methods with precedence
    // =========================================================================

    /// Resolved registrations, in declaration order.
    pub fn registrations(&self) -> &[Registration] {
        &self.registrations
    }

    /// Apply every registration to `container`.
    ///
    /// A key with a default and no current value is registered together with
    /// its default; any other key is registered statically, so existing
    /// values are kept (and must match the declared type). Returns the keys
    /// that could not be registered.
    pub fn register_all(&self, container: &mut MetaContainer) -> Vec<(String, MetaError)> {
        self.apply(container, true)
    }

    /// Apply every registration to `container` without filling defaults.
    ///
    /// Used for containers whose contents are already settled, such as a
    /// saved document: a key its owner removed stays absent.
    pub fn register_all_static(&self, container: &mut MetaContainer) -> Vec<(String, MetaError)> {
        self.apply(container, false)
    }

    fn apply(&self, container: &mut MetaContainer, defaults: bool) -> Vec<(String, MetaError)> {
        let mut failures = Vec::new();

        for reg in &self.registrations {
            let result = match &reg.default {
                Some(default) if defaults && !container.contains_meta(&reg.key) => {
                    container.register_meta(reg.flags, &reg.key, default.clone())
                }
                _ => container.register_static_meta(reg.flags, &reg.key, reg.meta_type),
            };

            if let Err(err) = result {
                failures.push((reg.key.clone(), err));
            }
        }

        failures
    }

    /// Whether output defaults to JSON.
    ///
    /// Defaults to `false` if not configured.
    pub fn json(&self) -> bool {
        self.global.json.unwrap_or(false)
    }

    /// Whether imports must apply every key.
    ///
    /// The schema file overrides the global setting. Defaults to `false`.
    pub fn strict_import(&self) -> bool {
        self.schema
            .as_ref()
            .and_then(|s| s.strict_import)
            .or(self.global.strict_import)
            .unwrap_or(false)
    }
}
