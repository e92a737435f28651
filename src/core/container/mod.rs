//! core::container
//!
//! Typed, flag-governed metadata containers.
//!
//! # Overview
//!
//! A [`MetaContainer`] stores dynamically typed values under string keys and
//! is owned by exactly one host (a clip, a track, a marker). Hosts expose it
//! through the [`HasMetas`] trait.
//!
//! Keys can optionally be *registered* with a declared [`MetaType`] and
//! [`MetaFlags`]. A registered key only accepts values of its declared type,
//! and only while its flags include [`MetaFlags::WRITABLE`]. Registration and
//! values live side by side: a key may be registered without a value, and a
//! value may exist without a registration.
//!
//! # Lifecycle
//!
//! The backing store is created on the first write (accepted or not) or the
//! first registration. Until then every read reports nothing.
//!
//! # Invariants
//!
//! - Removing a value always succeeds, even for read-only keys
//! - Rejected writes neither mutate nor notify
//! - Typed getters never coerce between types
//!
//! # Example
//!
//! ```
//! use clipmeta::core::container::{MetaContainer, MetaError};
//! use clipmeta::core::types::MetaFlags;
//! use clipmeta::core::value::MetaType;
//!
//! let mut metas = MetaContainer::new();
//! metas.register_static_meta(MetaFlags::READ_WRITE, "width", MetaType::Int).unwrap();
//! metas.set_int("width", 1920).unwrap();
//!
//! let err = metas.set_string("width", "wide").unwrap_err();
//! assert!(matches!(err, MetaError::TypeConflict { .. }));
//! assert_eq!(metas.get_int("width").unwrap(), 1920);
//! ```

pub mod notify;

pub use notify::{HandlerId, NotifyBus, NotifyCallback};

use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::ser::{Serialize, SerializeMap, Serializer};
use thiserror::Error;
use tracing::{debug, warn};

use super::format::{self, FormatError};
use super::marker::MarkerList;
use super::types::{MetaFlags, MetaKey, TypeError};
use super::value::{MetaType, MetaValue};

/// Errors from container operations.
#[derive(Debug, Error, PartialEq)]
pub enum MetaError {
    #[error(transparent)]
    InvalidKey(#[from] TypeError),

    #[error("meta '{key}' is already registered")]
    DuplicateRegistration { key: String },

    #[error("meta '{key}' has type {expected}, got {found}")]
    TypeConflict {
        key: String,
        expected: MetaType,
        found: MetaType,
    },

    #[error("meta '{key}' is not writable")]
    PermissionDenied { key: String },

    #[error("meta '{key}' not found")]
    NotFound { key: String },

    #[error("meta '{key}' is not registered")]
    NotRegistered { key: String },

    #[error("could not parse metas: {0}")]
    Parse(#[from] FormatError),
}

/// Declared type and permissions of a registered key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisteredMeta {
    pub meta_type: MetaType,
    pub flags: MetaFlags,
}

/// Outcome of [`MetaContainer::add_metas_from_string`].
///
/// A document that parses is merged key by key; keys refused by the
/// container's registrations are listed in `rejected` and the rest are
/// applied.
#[derive(Debug, Default, PartialEq)]
pub struct ImportReport {
    /// Keys that were written.
    pub applied: Vec<String>,
    /// Keys that were refused, with the reason.
    pub rejected: Vec<(String, MetaError)>,
}

impl ImportReport {
    /// True if nothing was rejected.
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Anything that owns a metadata container.
pub trait HasMetas {
    fn metas(&self) -> &MetaContainer;
    fn metas_mut(&mut self) -> &mut MetaContainer;
}

#[derive(Debug, Clone, Default)]
struct ContainerData {
    entries: BTreeMap<String, MetaValue>,
    registered: HashMap<String, RegisteredMeta>,
}

/// Metadata container owned by a single host.
///
/// Cloning copies values and registrations but not observers. Equality
/// compares stored values only.
#[derive(Debug, Default)]
pub struct MetaContainer {
    data: Option<ContainerData>,
    notify: NotifyBus,
}

impl MetaContainer {
    /// Create an empty, uninitialized container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the backing store has been created.
    pub fn is_initialized(&self) -> bool {
        self.data.is_some()
    }

    // ------------------------------------------------------------------
    // Notification
    // ------------------------------------------------------------------

    /// Subscribe to changes. With `detail` set, only that key is delivered.
    pub fn connect_notify<F>(&mut self, detail: Option<&str>, callback: F) -> HandlerId
    where
        F: FnMut(&str, Option<&MetaValue>) + Send + 'static,
    {
        self.notify.connect(detail, callback)
    }

    /// Unsubscribe. Returns `false` if the handler was not connected.
    pub fn disconnect_notify(&mut self, id: HandlerId) -> bool {
        self.notify.disconnect(id)
    }

    // ------------------------------------------------------------------
    // Writing
    // ------------------------------------------------------------------

    /// Set or remove a value.
    ///
    /// `None` removes the key and always succeeds; its registration, if any,
    /// is kept.
    ///
    /// # Errors
    ///
    /// - [`MetaError::InvalidKey`] if `key` is not a valid key
    /// - [`MetaError::PermissionDenied`] if `key` is registered without
    ///   [`MetaFlags::WRITABLE`]
    /// - [`MetaError::TypeConflict`] if `key` is registered with another type
    pub fn set_meta(&mut self, key: &str, value: Option<MetaValue>) -> Result<(), MetaError> {
        match value {
            None => {
                self.remove_meta(key);
                Ok(())
            }
            Some(value) => {
                self.check_writable(key, value.meta_type())?;
                self.store(key, value);
                Ok(())
            }
        }
    }

    /// Remove a value, returning it.
    ///
    /// Observers are notified whether or not a value existed. An invalid key
    /// can hold nothing, so removing one does nothing at all.
    pub fn remove_meta(&mut self, key: &str) -> Option<MetaValue> {
        if MetaKey::validate(key).is_err() {
            return None;
        }

        let data = self.data.get_or_insert_with(ContainerData::default);
        let removed = data.entries.remove(key);
        debug!(key, existed = removed.is_some(), "removing meta");
        self.notify.emit(key, None);
        removed
    }

    /// Set a string value.
    pub fn set_string(&mut self, key: &str, value: impl Into<String>) -> Result<(), MetaError> {
        self.set_meta(key, Some(MetaValue::String(value.into())))
    }

    /// Set a marker list value.
    pub fn set_marker_list(&mut self, key: &str, value: MarkerList) -> Result<(), MetaError> {
        self.set_meta(key, Some(MetaValue::MarkerList(value)))
    }

    fn check_writable(&mut self, key: &str, meta_type: MetaType) -> Result<(), MetaError> {
        if let Err(e) = MetaKey::validate(key) {
            warn!(key, "refusing write: {}", e);
            return Err(e.into());
        }

        let data = self.data.get_or_insert_with(ContainerData::default);
        let Some(registered) = data.registered.get(key) else {
            return Ok(());
        };

        if !registered.flags.is_writable() {
            warn!(key, "can not write read-only meta");
            return Err(MetaError::PermissionDenied {
                key: key.to_string(),
            });
        }

        if registered.meta_type != meta_type {
            warn!(
                key,
                expected = %registered.meta_type,
                found = %meta_type,
                "can not set value of another type on registered meta"
            );
            return Err(MetaError::TypeConflict {
                key: key.to_string(),
                expected: registered.meta_type,
                found: meta_type,
            });
        }

        Ok(())
    }

    /// Store without permission checks and notify.
    fn store(&mut self, key: &str, value: MetaValue) {
        debug!(key, meta_type = %value.meta_type(), %value, "setting meta");
        let data = self.data.get_or_insert_with(ContainerData::default);
        data.entries.insert(key.to_string(), value);
        self.notify.emit(key, data.entries.get(key));
    }

    // ------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------

    /// Declare the type and permissions of `key` without setting a value.
    ///
    /// # Errors
    ///
    /// - [`MetaError::TypeConflict`] if a value of another type is stored
    /// - [`MetaError::DuplicateRegistration`] if `key` is already registered
    pub fn register_static_meta(
        &mut self,
        flags: MetaFlags,
        key: &str,
        meta_type: MetaType,
    ) -> Result<(), MetaError> {
        MetaKey::validate(key)?;
        let data = self.data.get_or_insert_with(ContainerData::default);

        if let Some(existing) = data.entries.get(key) {
            if existing.meta_type() != meta_type {
                warn!(
                    key,
                    value = %existing,
                    "meta already holds a value of a different type"
                );
                return Err(MetaError::TypeConflict {
                    key: key.to_string(),
                    expected: meta_type,
                    found: existing.meta_type(),
                });
            }
        }

        Self::register(data, flags, key, meta_type)
    }

    /// Register `key` with the type of `value` and store `value`.
    ///
    /// The initial write is not gated on [`MetaFlags::WRITABLE`].
    ///
    /// # Errors
    ///
    /// - [`MetaError::DuplicateRegistration`] if `key` is already registered
    pub fn register_meta(
        &mut self,
        flags: MetaFlags,
        key: &str,
        value: MetaValue,
    ) -> Result<(), MetaError> {
        MetaKey::validate(key)?;
        let data = self.data.get_or_insert_with(ContainerData::default);
        Self::register(data, flags, key, value.meta_type())?;
        self.store(key, value);
        Ok(())
    }

    /// Register a string meta and set its value.
    pub fn register_meta_string(
        &mut self,
        flags: MetaFlags,
        key: &str,
        value: impl Into<String>,
    ) -> Result<(), MetaError> {
        self.register_meta(flags, key, MetaValue::String(value.into()))
    }

    /// Register a marker list meta and set its value.
    pub fn register_meta_marker_list(
        &mut self,
        flags: MetaFlags,
        key: &str,
        value: MarkerList,
    ) -> Result<(), MetaError> {
        self.register_meta(flags, key, MetaValue::MarkerList(value))
    }

    fn register(
        data: &mut ContainerData,
        flags: MetaFlags,
        key: &str,
        meta_type: MetaType,
    ) -> Result<(), MetaError> {
        if data.registered.contains_key(key) {
            warn!(key, "static meta already registered");
            return Err(MetaError::DuplicateRegistration {
                key: key.to_string(),
            });
        }

        debug!(key, %meta_type, %flags, "registering meta");
        data.registered
            .insert(key.to_string(), RegisteredMeta { meta_type, flags });
        Ok(())
    }

    /// Look up the registration of `key`.
    ///
    /// # Errors
    ///
    /// [`MetaError::NotRegistered`] if `key` was never registered, whether or
    /// not it holds a value.
    pub fn check_meta_registered(&self, key: &str) -> Result<RegisteredMeta, MetaError> {
        self.data
            .as_ref()
            .and_then(|d| d.registered.get(key))
            .copied()
            .ok_or_else(|| {
                debug!(key, "meta has not been registered");
                MetaError::NotRegistered {
                    key: key.to_string(),
                }
            })
    }

    /// All registrations, sorted by key.
    pub fn registrations(&self) -> Vec<(&str, RegisteredMeta)> {
        let mut out: Vec<_> = self
            .data
            .iter()
            .flat_map(|d| d.registered.iter())
            .map(|(k, r)| (k.as_str(), *r))
            .collect();
        out.sort_by(|a, b| a.0.cmp(b.0));
        out
    }

    // ------------------------------------------------------------------
    // Reading
    // ------------------------------------------------------------------

    /// Get a value of any type.
    pub fn get_meta(&self, key: &str) -> Option<&MetaValue> {
        self.data.as_ref()?.entries.get(key)
    }

    /// Get a string value.
    pub fn get_string(&self, key: &str) -> Result<&str, MetaError> {
        match self.get_meta(key) {
            Some(MetaValue::String(s)) => Ok(s),
            _ => Err(not_found(key)),
        }
    }

    /// Get a marker list value.
    pub fn get_marker_list(&self, key: &str) -> Result<&MarkerList, MetaError> {
        match self.get_meta(key) {
            Some(MetaValue::MarkerList(list)) => Ok(list),
            _ => Err(not_found(key)),
        }
    }

    pub fn contains_meta(&self, key: &str) -> bool {
        self.get_meta(key).is_some()
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.data.as_ref().map_or(0, |d| d.entries.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over stored values in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetaValue)> + '_ {
        self.data
            .iter()
            .flat_map(|d| d.entries.iter())
            .map(|(k, v)| (k.as_str(), v))
    }

    /// Call `func` once for every stored value, in key order.
    ///
    /// Registered keys without a value are not visited. Nothing is visited
    /// for an empty container.
    pub fn foreach_meta<F>(&self, mut func: F)
    where
        F: FnMut(&str, &MetaValue),
    {
        for (key, value) in self.iter() {
            func(key, value);
        }
    }

    // ------------------------------------------------------------------
    // Text form
    // ------------------------------------------------------------------

    /// Serialize every stored value to the text format.
    pub fn metas_to_string(&self) -> String {
        format::to_string(self.iter())
    }

    /// Merge a serialized document into this container.
    ///
    /// The whole text is parsed before anything is written: on a parse error
    /// the container is left untouched. Each parsed value then goes through
    /// [`set_meta`](Self::set_meta); refused keys are reported, not fatal.
    ///
    /// # Errors
    ///
    /// [`MetaError::Parse`] if `text` is not a valid document.
    pub fn add_metas_from_string(&mut self, text: &str) -> Result<ImportReport, MetaError> {
        let document = format::parse(text).map_err(|e| {
            warn!(error = %e, "could not add metas");
            MetaError::from(e)
        })?;

        let mut report = ImportReport::default();
        for (key, value) in document.fields {
            match self.set_meta(&key, Some(value)) {
                Ok(()) => report.applied.push(key),
                Err(err) => {
                    warn!(key = %key, error = %err, "meta refused during import");
                    report.rejected.push((key, err));
                }
            }
        }

        Ok(report)
    }
}

fn not_found(key: &str) -> MetaError {
    MetaError::NotFound {
        key: key.to_string(),
    }
}

macro_rules! typed_accessors {
    ($($name:literal, $ty:ty, $variant:ident, $set:ident, $get:ident, $register:ident;)*) => {
        impl MetaContainer {
            $(
                #[doc = concat!("Set a ", $name, " value.")]
                pub fn $set(&mut self, key: &str, value: $ty) -> Result<(), MetaError> {
                    self.set_meta(key, Some(MetaValue::$variant(value)))
                }

                #[doc = concat!("Get a ", $name, " value; other types report `NotFound`.")]
                pub fn $get(&self, key: &str) -> Result<$ty, MetaError> {
                    match self.get_meta(key) {
                        Some(MetaValue::$variant(v)) => Ok(*v),
                        _ => Err(not_found(key)),
                    }
                }

                #[doc = concat!("Register a ", $name, " meta and set its value.")]
                pub fn $register(
                    &mut self,
                    flags: MetaFlags,
                    key: &str,
                    value: $ty,
                ) -> Result<(), MetaError> {
                    self.register_meta(flags, key, MetaValue::$variant(value))
                }
            )*
        }
    };
}

typed_accessors! {
    "boolean", bool, Boolean, set_boolean, get_boolean, register_meta_boolean;
    "int", i32, Int, set_int, get_int, register_meta_int;
    "uint", u32, UInt, set_uint, get_uint, register_meta_uint;
    "int64", i64, Int64, set_int64, get_int64, register_meta_int64;
    "uint64", u64, UInt64, set_uint64, get_uint64, register_meta_uint64;
    "float", f32, Float, set_float, get_float, register_meta_float;
    "double", f64, Double, set_double, get_double, register_meta_double;
    "date", NaiveDate, Date, set_date, get_date, register_meta_date;
    "date-time", DateTime<FixedOffset>, DateTime, set_date_time, get_date_time, register_meta_date_time;
}

impl Clone for MetaContainer {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            notify: NotifyBus::new(),
        }
    }
}

impl PartialEq for MetaContainer {
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

impl FromStr for MetaContainer {
    type Err = MetaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut container = MetaContainer::new();
        container.add_metas_from_string(s)?;
        Ok(container)
    }
}

impl Serialize for MetaContainer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
