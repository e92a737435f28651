//! core::format
//!
//! Text form of a metadata container.
//!
//! # Grammar
//!
//! ```text
//! document    := name ( "," field )* [ ";" ]
//! field       := key "=" [ "(" type ")" ] value
//! value       := quoted-string | bare-token | marker-list
//! marker-list := "{" [ "flags" "=" flag-name ] ( "," "[" uint64 "," quoted-string "]" )* "}"
//! ```
//!
//! Documents are written as `metadatas, key=(type)value, ...;` with keys in
//! lexical order and every value annotated with its type, so that parsing a
//! written document yields exactly the same typed values. The parser is more
//! lenient than the writer: it accepts any document name, type aliases from
//! older dumps, quoted or bare scalars, and untyped values (whose type is
//! inferred).
//!
//! Marker lists nest: each marker's own container is written as a quoted
//! document.
//!
//! Date-times are written as quoted local time plus UTC offset, e.g.
//! `"2024-02-29T12:00:00.25+01:00"`. Years outside `0..=9999` carry a sign
//! and offsets with a seconds part are written as `+HH:MM:SS`, so every
//! representable value survives the text form. RFC 3339 is accepted on input.
//!
//! # Example
//!
//! ```
//! use clipmeta::core::format;
//! use clipmeta::core::value::MetaValue;
//!
//! let title = MetaValue::from("Intro");
//! let width = MetaValue::Int(1920);
//! let text = format::to_string([("title", &title), ("width", &width)]);
//! assert_eq!(text, r#"metadatas, title=(string)"Intro", width=(int)1920;"#);
//!
//! let doc = format::parse(&text).unwrap();
//! assert_eq!(doc.fields[1], ("width".to_string(), width));
//! ```

mod parser;

use chrono::{DateTime, FixedOffset};
use thiserror::Error;

use super::container::HasMetas;
use super::value::MetaValue;

pub use parser::{parse, parse_untyped, parse_value};

/// Name written at the head of every document.
pub const DOCUMENT_NAME: &str = "metadatas";

/// Layout of the local part of a written date-time.
pub(crate) const LOCAL_DATE_TIME: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Error produced when a document cannot be parsed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message} at offset {offset}")]
pub struct FormatError {
    /// Byte offset into the parsed text.
    pub offset: usize,
    pub message: String,
}

impl FormatError {
    pub(crate) fn new(offset: usize, message: impl Into<String>) -> Self {
        Self {
            offset,
            message: message.into(),
        }
    }
}

/// A parsed document.
///
/// Keys are unique; when a document repeats a key the last value wins and
/// keeps the position of the first occurrence.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub name: String,
    pub fields: Vec<(String, MetaValue)>,
}

/// Write fields as a document.
pub fn to_string<'a, I>(fields: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a MetaValue)>,
{
    let mut out = String::from(DOCUMENT_NAME);
    for (key, value) in fields {
        out.push_str(", ");
        out.push_str(key);
        out.push_str("=(");
        out.push_str(value.meta_type().name());
        out.push(')');
        write_value(&mut out, value);
    }
    out.push(';');
    out
}

/// Write a single value without its type annotation.
///
/// The result parses back with [`parse_value`] given the value's type.
pub fn value_to_string(value: &MetaValue) -> String {
    let mut out = String::new();
    write_value(&mut out, value);
    out
}

fn write_value(out: &mut String, value: &MetaValue) {
    match value {
        MetaValue::Boolean(v) => out.push_str(if *v { "true" } else { "false" }),
        MetaValue::Int(v) => out.push_str(&v.to_string()),
        MetaValue::UInt(v) => out.push_str(&v.to_string()),
        MetaValue::Int64(v) => out.push_str(&v.to_string()),
        MetaValue::UInt64(v) => out.push_str(&v.to_string()),
        MetaValue::Float(v) => out.push_str(&v.to_string()),
        MetaValue::Double(v) => out.push_str(&v.to_string()),
        MetaValue::String(v) => write_quoted(out, v),
        MetaValue::Date(v) => out.push_str(&v.format("%Y-%m-%d").to_string()),
        MetaValue::DateTime(v) => write_quoted(out, &date_time_to_string(v)),
        MetaValue::MarkerList(list) => {
            out.push_str("{ flags=");
            out.push_str(list.flags().name());
            for marker in list {
                out.push_str(", [");
                out.push_str(&marker.position().to_string());
                out.push_str(", ");
                write_quoted(out, &to_string(marker.metas().iter()));
                out.push(']');
            }
            out.push_str(" }");
        }
    }
}

/// Write a date-time in the lossless text form, without quotes.
pub(crate) fn date_time_to_string(value: &DateTime<FixedOffset>) -> String {
    let mut text = value.naive_local().format(LOCAL_DATE_TIME).to_string();

    let offset = value.offset().local_minus_utc();
    let secs = offset.unsigned_abs();
    text.push(if offset < 0 { '-' } else { '+' });
    text.push_str(&format!("{:02}:{:02}", secs / 3600, secs / 60 % 60));
    if secs % 60 != 0 {
        text.push_str(&format!(":{:02}", secs % 60));
    }
    text
}

fn write_quoted(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
}

/// Characters allowed in unquoted tokens.
pub(crate) fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '/' | '-' | '_' | '.' | ':' | '+')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::marker::{MarkerFlags, MarkerList};
    use chrono::{NaiveDate, TimeZone};

    mod writer {
        use super::*;

        #[test]
        fn empty_document() {
            assert_eq!(to_string(std::iter::empty()), "metadatas;");
        }

        #[test]
        fn scalars() {
            let values = [
                ("b", MetaValue::Boolean(false)),
                ("d", MetaValue::Double(0.5)),
                ("i", MetaValue::Int(-3)),
                ("u64", MetaValue::UInt64(18_446_744_073_709_551_615)),
            ];
            let text = to_string(values.iter().map(|(k, v)| (*k, v)));
            assert_eq!(
                text,
                "metadatas, b=(boolean)false, d=(double)0.5, i=(int)-3, \
                 u64=(uint64)18446744073709551615;"
            );
        }

        #[test]
        fn strings_are_escaped() {
            let v = MetaValue::from(r#"a "quoted" \ path"#);
            assert_eq!(value_to_string(&v), r#""a \"quoted\" \\ path""#);
        }

        #[test]
        fn dates() {
            let date = MetaValue::Date(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
            assert_eq!(value_to_string(&date), "2024-02-29");

            let dt = DateTime::parse_from_rfc3339("2024-02-29T12:00:00+01:00").unwrap();
            assert_eq!(
                value_to_string(&MetaValue::DateTime(dt)),
                "\"2024-02-29T12:00:00+01:00\""
            );
        }

        #[test]
        fn date_times_outside_rfc3339() {
            let far = FixedOffset::east_opt(0)
                .unwrap()
                .with_ymd_and_hms(10_000, 1, 1, 0, 0, 0)
                .unwrap();
            assert_eq!(
                value_to_string(&MetaValue::DateTime(far)),
                "\"+10000-01-01T00:00:00+00:00\""
            );

            let odd = FixedOffset::west_opt(3600 + 30)
                .unwrap()
                .with_ymd_and_hms(2020, 1, 1, 0, 0, 0)
                .unwrap();
            assert_eq!(
                value_to_string(&MetaValue::DateTime(odd)),
                "\"2020-01-01T00:00:00-01:00:30\""
            );

            let early = NaiveDate::from_ymd_opt(-44, 3, 15).unwrap();
            assert_eq!(value_to_string(&MetaValue::Date(early)), "-0044-03-15");
        }

        #[test]
        fn marker_list() {
            let mut list = MarkerList::with_flags(MarkerFlags::Snappable);
            list.add(42).metas_mut().set_string("name", "cue").unwrap();
            list.add(7);

            assert_eq!(
                value_to_string(&MetaValue::MarkerList(list)),
                r#"{ flags=snappable, [7, "metadatas;"], [42, "metadatas, name=(string)\"cue\";"] }"#
            );
        }

        #[test]
        fn empty_marker_list() {
            assert_eq!(
                value_to_string(&MetaValue::MarkerList(MarkerList::new())),
                "{ flags=none }"
            );
        }
    }
}
