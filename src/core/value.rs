//! core::value
//!
//! Dynamically typed metadata values.
//!
//! # Design
//!
//! A metadata value is a closed sum type ([`MetaValue`]) with one variant per
//! supported kind, and a matching runtime tag ([`MetaType`]). Type checks
//! anywhere in the crate compare tags exactly; there is no implicit
//! coercion between kinds (an `Int` is never an `Int64`).
//!
//! # Example
//!
//! ```
//! use clipmeta::core::value::{MetaType, MetaValue};
//!
//! let v = MetaValue::from(1920);
//! assert_eq!(v.meta_type(), MetaType::Int);
//! assert_eq!(MetaType::from_name("gint64").unwrap(), MetaType::Int64);
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::Serialize;
use thiserror::Error;

use super::marker::MarkerList;

/// Error returned for an unknown type name.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown meta type '{0}'")]
pub struct UnknownTypeError(pub String);

/// Runtime type tag of a [`MetaValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub enum MetaType {
    Boolean,
    Int,
    UInt,
    Int64,
    UInt64,
    Float,
    Double,
    String,
    Date,
    DateTime,
    MarkerList,
}

impl MetaType {
    /// All supported types, in declaration order.
    pub const ALL: [MetaType; 11] = [
        MetaType::Boolean,
        MetaType::Int,
        MetaType::UInt,
        MetaType::Int64,
        MetaType::UInt64,
        MetaType::Float,
        MetaType::Double,
        MetaType::String,
        MetaType::Date,
        MetaType::DateTime,
        MetaType::MarkerList,
    ];

    /// Canonical name, as written by the text format.
    pub fn name(self) -> &'static str {
        match self {
            MetaType::Boolean => "boolean",
            MetaType::Int => "int",
            MetaType::UInt => "uint",
            MetaType::Int64 => "int64",
            MetaType::UInt64 => "uint64",
            MetaType::Float => "float",
            MetaType::Double => "double",
            MetaType::String => "string",
            MetaType::Date => "date",
            MetaType::DateTime => "datetime",
            MetaType::MarkerList => "marker-list",
        }
    }

    /// Resolve a type name, accepting the aliases found in older dumps.
    pub fn from_name(name: &str) -> Result<Self, UnknownTypeError> {
        let ty = match name {
            "boolean" | "bool" | "b" | "gboolean" => MetaType::Boolean,
            "int" | "i" | "gint" => MetaType::Int,
            "uint" | "u" | "guint" => MetaType::UInt,
            "int64" | "gint64" => MetaType::Int64,
            "uint64" | "guint64" => MetaType::UInt64,
            "float" | "f" | "gfloat" => MetaType::Float,
            "double" | "d" | "gdouble" => MetaType::Double,
            "string" | "str" | "s" | "gchararray" => MetaType::String,
            "date" | "GDate" => MetaType::Date,
            "datetime" | "date-time" | "GstDateTime" => MetaType::DateTime,
            "marker-list" | "GESMarkerList" => MetaType::MarkerList,
            other => return Err(UnknownTypeError(other.to_string())),
        };
        Ok(ty)
    }
}

impl fmt::Display for MetaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MetaType {
    type Err = UnknownTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

impl From<MetaType> for String {
    fn from(ty: MetaType) -> Self {
        ty.name().to_string()
    }
}

/// A single metadata value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value")]
pub enum MetaValue {
    #[serde(rename = "boolean")]
    Boolean(bool),
    #[serde(rename = "int")]
    Int(i32),
    #[serde(rename = "uint")]
    UInt(u32),
    #[serde(rename = "int64")]
    Int64(i64),
    #[serde(rename = "uint64")]
    UInt64(u64),
    #[serde(rename = "float")]
    Float(f32),
    #[serde(rename = "double")]
    Double(f64),
    #[serde(rename = "string")]
    String(String),
    #[serde(rename = "date")]
    Date(NaiveDate),
    #[serde(rename = "datetime")]
    DateTime(DateTime<FixedOffset>),
    #[serde(rename = "marker-list")]
    MarkerList(MarkerList),
}

impl MetaValue {
    /// Runtime type tag of this value.
    pub fn meta_type(&self) -> MetaType {
        match self {
            MetaValue::Boolean(_) => MetaType::Boolean,
            MetaValue::Int(_) => MetaType::Int,
            MetaValue::UInt(_) => MetaType::UInt,
            MetaValue::Int64(_) => MetaType::Int64,
            MetaValue::UInt64(_) => MetaType::UInt64,
            MetaValue::Float(_) => MetaType::Float,
            MetaValue::Double(_) => MetaType::Double,
            MetaValue::String(_) => MetaType::String,
            MetaValue::Date(_) => MetaType::Date,
            MetaValue::DateTime(_) => MetaType::DateTime,
            MetaValue::MarkerList(_) => MetaType::MarkerList,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetaValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_marker_list(&self) -> Option<&MarkerList> {
        match self {
            MetaValue::MarkerList(list) => Some(list),
            _ => None,
        }
    }
}

/// Human readable rendering, without type annotation.
///
/// Strings are shown raw; use [`crate::core::format`] for the escaped form.
impl fmt::Display for MetaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetaValue::Boolean(v) => write!(f, "{}", v),
            MetaValue::Int(v) => write!(f, "{}", v),
            MetaValue::UInt(v) => write!(f, "{}", v),
            MetaValue::Int64(v) => write!(f, "{}", v),
            MetaValue::UInt64(v) => write!(f, "{}", v),
            MetaValue::Float(v) => write!(f, "{}", v),
            MetaValue::Double(v) => write!(f, "{}", v),
            MetaValue::String(v) => f.write_str(v),
            MetaValue::Date(v) => write!(f, "{}", v.format("%Y-%m-%d")),
            MetaValue::DateTime(v) => f.write_str(&super::format::date_time_to_string(v)),
            MetaValue::MarkerList(list) => write!(f, "{} marker(s)", list.len()),
        }
    }
}

macro_rules! impl_from_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for MetaValue {
                fn from(v: $ty) -> Self {
                    MetaValue::$variant(v)
                }
            }
        )*
    };
}

impl_from_value! {
    bool => Boolean,
    i32 => Int,
    u32 => UInt,
    i64 => Int64,
    u64 => UInt64,
    f32 => Float,
    f64 => Double,
    String => String,
    NaiveDate => Date,
    DateTime<FixedOffset> => DateTime,
    MarkerList => MarkerList,
}

impl From<&str> for MetaValue {
    fn from(v: &str) -> Self {
        MetaValue::String(v.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod meta_type {
        use super::*;

        #[test]
        fn names_roundtrip() {
            for ty in MetaType::ALL {
                assert_eq!(MetaType::from_name(ty.name()).unwrap(), ty);
            }
        }

        #[test]
        fn aliases() {
            assert_eq!("gboolean".parse::<MetaType>().unwrap(), MetaType::Boolean);
            assert_eq!("i".parse::<MetaType>().unwrap(), MetaType::Int);
            assert_eq!("guint64".parse::<MetaType>().unwrap(), MetaType::UInt64);
            assert_eq!("gchararray".parse::<MetaType>().unwrap(), MetaType::String);
            assert_eq!("GstDateTime".parse::<MetaType>().unwrap(), MetaType::DateTime);
            assert_eq!(
                "GESMarkerList".parse::<MetaType>().unwrap(),
                MetaType::MarkerList
            );
        }

        #[test]
        fn unknown_name() {
            assert_eq!(
                MetaType::from_name("complex"),
                Err(UnknownTypeError("complex".into()))
            );
        }
    }

    mod meta_value {
        use super::*;

        #[test]
        fn from_picks_exact_variant() {
            assert_eq!(MetaValue::from(true).meta_type(), MetaType::Boolean);
            assert_eq!(MetaValue::from(1i32).meta_type(), MetaType::Int);
            assert_eq!(MetaValue::from(1u32).meta_type(), MetaType::UInt);
            assert_eq!(MetaValue::from(1i64).meta_type(), MetaType::Int64);
            assert_eq!(MetaValue::from(1u64).meta_type(), MetaType::UInt64);
            assert_eq!(MetaValue::from(1.0f32).meta_type(), MetaType::Float);
            assert_eq!(MetaValue::from(1.0f64).meta_type(), MetaType::Double);
            assert_eq!(MetaValue::from("x").meta_type(), MetaType::String);
            assert_eq!(
                MetaValue::from(MarkerList::new()).meta_type(),
                MetaType::MarkerList
            );
        }

        #[test]
        fn int_and_int64_differ() {
            assert_ne!(MetaValue::Int(5), MetaValue::Int64(5));
        }

        #[test]
        fn display() {
            assert_eq!(MetaValue::from("Intro").to_string(), "Intro");
            let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
            assert_eq!(MetaValue::from(date).to_string(), "2024-03-09");
        }

        #[test]
        fn json_shape() {
            let json = serde_json::to_value(MetaValue::Int(3)).unwrap();
            assert_eq!(json, serde_json::json!({"type": "int", "value": 3}));
        }
    }
}
