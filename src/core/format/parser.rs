//! core::format::parser
//!
//! Recursive-descent parser for the document grammar.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone};

use super::{is_token_char, Document, FormatError, LOCAL_DATE_TIME};
use crate::core::container::MetaContainer;
use crate::core::marker::{Marker, MarkerFlags, MarkerList};
use crate::core::types::MetaKey;
use crate::core::value::{MetaType, MetaValue};

/// Parse a complete document.
///
/// # Errors
///
/// Returns a [`FormatError`] pointing at the first offending byte. Nothing
/// is returned for a partially valid document.
pub fn parse(text: &str) -> Result<Document, FormatError> {
    let mut parser = Parser::new(text);
    parser.document()
}

/// Parse a single value of a known type.
///
/// Strings that do not start with a quote are taken verbatim, so
/// `parse_value(MetaType::String, "Hello world")` needs no quoting.
///
/// # Example
///
/// ```
/// use clipmeta::core::format::parse_value;
/// use clipmeta::core::value::{MetaType, MetaValue};
///
/// assert_eq!(parse_value(MetaType::UInt, "42").unwrap(), MetaValue::UInt(42));
/// assert_eq!(
///     parse_value(MetaType::String, "Hello world").unwrap(),
///     MetaValue::from("Hello world")
/// );
/// assert!(parse_value(MetaType::Int, "4.2").is_err());
/// ```
pub fn parse_value(meta_type: MetaType, text: &str) -> Result<MetaValue, FormatError> {
    if meta_type == MetaType::String && !text.trim_start().starts_with('"') {
        return Ok(MetaValue::String(text.to_string()));
    }

    let mut parser = Parser::new(text);
    parser.skip_ws();
    let value = parser.value(Some(meta_type))?;
    parser.skip_ws();
    parser.expect_end()?;
    Ok(value)
}

/// Parse a single value of unknown type.
///
/// Quoted strings and marker lists are parsed as written; anything else is
/// inferred as boolean, int or double, falling back to the verbatim text as
/// a string.
///
/// ```
/// use clipmeta::core::format::parse_untyped;
/// use clipmeta::core::value::MetaValue;
///
/// assert_eq!(parse_untyped("1920").unwrap(), MetaValue::Int(1920));
/// assert_eq!(parse_untyped("0.5").unwrap(), MetaValue::Double(0.5));
/// assert_eq!(parse_untyped("Hello world").unwrap(), MetaValue::from("Hello world"));
/// ```
pub fn parse_untyped(text: &str) -> Result<MetaValue, FormatError> {
    let trimmed = text.trim();
    if trimmed.starts_with('"') || trimmed.starts_with('{') {
        let mut parser = Parser::new(text);
        parser.skip_ws();
        let value = parser.value(None)?;
        parser.skip_ws();
        parser.expect_end()?;
        return Ok(value);
    }

    Ok(infer(trimmed).unwrap_or_else(|| MetaValue::String(text.to_string())))
}

/// Infer the type of an unannotated bare token.
pub(crate) fn infer(token: &str) -> Option<MetaValue> {
    if token.eq_ignore_ascii_case("true") {
        return Some(MetaValue::Boolean(true));
    }
    if token.eq_ignore_ascii_case("false") {
        return Some(MetaValue::Boolean(false));
    }
    if let Ok(v) = token.parse::<i32>() {
        return Some(MetaValue::Int(v));
    }
    if token.chars().any(|c| c.is_ascii_digit()) {
        if let Ok(v) = token.parse::<f64>() {
            return Some(MetaValue::Double(v));
        }
    }
    None
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        let src = self.src;
        &src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn error(&self, message: impl Into<String>) -> FormatError {
        FormatError::new(self.pos, message)
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), FormatError> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(self.unexpected(&format!("'{}'", expected)))
        }
    }

    fn expect_end(&self) -> Result<(), FormatError> {
        match self.peek() {
            None => Ok(()),
            Some(_) => Err(self.unexpected("end of input")),
        }
    }

    fn unexpected(&self, wanted: &str) -> FormatError {
        match self.peek() {
            Some(c) => self.error(format!("expected {}, found '{}'", wanted, c)),
            None => self.error(format!("expected {}, found end of input", wanted)),
        }
    }

    /// Consume a run of token characters.
    fn token(&mut self) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(is_token_char) {
            self.bump();
        }
        let src = self.src;
        &src[start..self.pos]
    }

    fn document(&mut self) -> Result<Document, FormatError> {
        self.skip_ws();
        let name_at = self.pos;
        let name = self.token();
        if name.is_empty() {
            return Err(self.unexpected("document name"));
        }
        MetaKey::validate(name).map_err(|e| FormatError::new(name_at, e.to_string()))?;

        let mut fields: Vec<(String, MetaValue)> = Vec::new();
        loop {
            self.skip_ws();
            match self.peek() {
                None => break,
                Some(';') => {
                    self.bump();
                    self.skip_ws();
                    self.expect_end()?;
                    break;
                }
                Some(',') => {
                    self.bump();
                    self.skip_ws();
                    let (key, value) = self.field()?;
                    match fields.iter_mut().find(|(k, _)| *k == key) {
                        Some(slot) => slot.1 = value,
                        None => fields.push((key, value)),
                    }
                }
                Some(_) => return Err(self.unexpected("',' or ';'")),
            }
        }

        Ok(Document {
            name: name.to_string(),
            fields,
        })
    }

    fn field(&mut self) -> Result<(String, MetaValue), FormatError> {
        let key_at = self.pos;
        let key = self.token();
        if key.is_empty() {
            return Err(self.unexpected("field name"));
        }
        MetaKey::validate(key).map_err(|e| FormatError::new(key_at, e.to_string()))?;

        self.skip_ws();
        self.expect('=')?;
        self.skip_ws();

        let meta_type = if self.eat('(') {
            self.skip_ws();
            let type_at = self.pos;
            let name = self.token();
            let meta_type = MetaType::from_name(name)
                .map_err(|e| FormatError::new(type_at, e.to_string()))?;
            self.skip_ws();
            self.expect(')')?;
            self.skip_ws();
            Some(meta_type)
        } else {
            None
        };

        let value = self.value(meta_type)?;
        Ok((key.to_string(), value))
    }

    fn value(&mut self, meta_type: Option<MetaType>) -> Result<MetaValue, FormatError> {
        let start = self.pos;
        match self.peek() {
            Some('"') => {
                let text = self.quoted()?;
                match meta_type {
                    None | Some(MetaType::String) => Ok(MetaValue::String(text)),
                    Some(MetaType::MarkerList) => {
                        // older dumps carry marker lists as quoted strings
                        let mut inner = Parser::new(&text);
                        inner.skip_ws();
                        let list = inner
                            .marker_list()
                            .map_err(|e| FormatError::new(start, e.to_string()))?;
                        inner.skip_ws();
                        inner
                            .expect_end()
                            .map_err(|e| FormatError::new(start, e.to_string()))?;
                        Ok(MetaValue::MarkerList(list))
                    }
                    Some(ty) => convert(ty, &text).map_err(|m| FormatError::new(start, m)),
                }
            }
            Some('{') => match meta_type {
                None | Some(MetaType::MarkerList) => Ok(MetaValue::MarkerList(self.marker_list()?)),
                Some(ty) => Err(self.error(format!("a marker list is not a {} value", ty))),
            },
            _ => {
                let token = self.token();
                if token.is_empty() {
                    return Err(self.unexpected("a value"));
                }
                match meta_type {
                    Some(ty) => convert(ty, token).map_err(|m| FormatError::new(start, m)),
                    None => Ok(infer(token).unwrap_or_else(|| MetaValue::String(token.to_string()))),
                }
            }
        }
    }

    fn quoted(&mut self) -> Result<String, FormatError> {
        let start = self.pos;
        self.expect('"')?;
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(FormatError::new(start, "unterminated string")),
                Some('"') => return Ok(out),
                Some('\\') => match self.bump() {
                    Some(c) => out.push(c),
                    None => return Err(FormatError::new(start, "unterminated string")),
                },
                Some(c) => out.push(c),
            }
        }
    }

    fn marker_list(&mut self) -> Result<MarkerList, FormatError> {
        self.expect('{')?;
        let mut list = MarkerList::new();
        let mut first = true;

        loop {
            self.skip_ws();
            if self.eat('}') {
                return Ok(list);
            }
            if !first {
                self.expect(',')?;
                self.skip_ws();
            }
            first = false;

            if self.peek() == Some('[') {
                list.insert(self.marker()?);
            } else {
                let at = self.pos;
                let word = self.token();
                if word != "flags" {
                    return Err(FormatError::new(at, "expected 'flags' or '['"));
                }
                self.skip_ws();
                self.expect('=')?;
                self.skip_ws();
                let flags_at = self.pos;
                let name = self.token();
                let flags = MarkerFlags::from_name(name).ok_or_else(|| {
                    FormatError::new(flags_at, format!("unknown marker flags '{}'", name))
                })?;
                list.set_flags(flags);
            }
        }
    }

    fn marker(&mut self) -> Result<Marker, FormatError> {
        self.expect('[')?;
        self.skip_ws();

        let at = self.pos;
        let position = self
            .token()
            .parse::<u64>()
            .map_err(|_| FormatError::new(at, "expected a marker position"))?;

        self.skip_ws();
        self.expect(',')?;
        self.skip_ws();

        let metas_at = self.pos;
        let text = self.quoted()?;
        let document = parse(&text).map_err(|e| {
            FormatError::new(metas_at, format!("invalid marker metas: {}", e))
        })?;

        let mut metas = MetaContainer::new();
        for (key, value) in document.fields {
            metas
                .set_meta(&key, Some(value))
                .map_err(|e| FormatError::new(metas_at, e.to_string()))?;
        }

        self.skip_ws();
        self.expect(']')?;
        Ok(Marker::with_metas(position, metas))
    }
}

/// Convert scalar text to a value of `meta_type`.
fn convert(meta_type: MetaType, text: &str) -> Result<MetaValue, String> {
    let bad = || format!("invalid {} value '{}'", meta_type, text);

    let value = match meta_type {
        MetaType::Boolean => match text.to_ascii_lowercase().as_str() {
            "true" | "yes" | "t" | "1" => MetaValue::Boolean(true),
            "false" | "no" | "f" | "0" => MetaValue::Boolean(false),
            _ => return Err(bad()),
        },
        MetaType::Int => MetaValue::Int(integer(text).ok_or_else(bad)?),
        MetaType::UInt => MetaValue::UInt(integer(text).ok_or_else(bad)?),
        MetaType::Int64 => MetaValue::Int64(integer(text).ok_or_else(bad)?),
        MetaType::UInt64 => MetaValue::UInt64(integer(text).ok_or_else(bad)?),
        MetaType::Float => MetaValue::Float(text.parse().map_err(|_| bad())?),
        MetaType::Double => MetaValue::Double(text.parse().map_err(|_| bad())?),
        MetaType::String => MetaValue::String(text.to_string()),
        MetaType::Date => {
            MetaValue::Date(NaiveDate::parse_from_str(text, "%Y-%m-%d").map_err(|_| bad())?)
        }
        MetaType::DateTime => MetaValue::DateTime(
            date_time(text)
                .or_else(|| DateTime::parse_from_rfc3339(text).ok())
                .ok_or_else(bad)?,
        ),
        MetaType::MarkerList => return Err(bad()),
    };
    Ok(value)
}

/// Parse a written date-time: local time followed by `+HH:MM[:SS]`.
fn date_time(text: &str) -> Option<DateTime<FixedOffset>> {
    let time_at = text.find('T')?;
    let offset_at = time_at + text[time_at..].rfind(|c: char| c == '+' || c == '-')?;
    let (local, offset) = text.split_at(offset_at);

    let local = NaiveDateTime::parse_from_str(local, LOCAL_DATE_TIME).ok()?;
    utc_offset(offset)?.from_local_datetime(&local).single()
}

fn utc_offset(text: &str) -> Option<FixedOffset> {
    let sign = match text.chars().next()? {
        '+' => 1,
        '-' => -1,
        _ => return None,
    };

    let parts: Vec<&str> = text[1..].split(':').collect();
    if !(2..=3).contains(&parts.len()) {
        return None;
    }

    let mut secs = 0;
    for (part, unit) in parts.iter().zip([3600, 60, 1]) {
        if part.len() != 2 || !part.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        secs += part.parse::<i32>().ok()? * unit;
    }
    FixedOffset::east_opt(sign * secs)
}

/// Parse a decimal or `0x` hexadecimal integer that fits in `T`.
fn integer<T: TryFrom<i128>>(text: &str) -> Option<T> {
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };

    let magnitude = match digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        Some(hex) => i128::from_str_radix(hex, 16).ok()?,
        None if digits.chars().all(|c| c.is_ascii_digit()) && !digits.is_empty() => {
            digits.parse::<i128>().ok()?
        }
        None => return None,
    };

    let value = if negative { -magnitude } else { magnitude };
    T::try_from(value).ok()
}
