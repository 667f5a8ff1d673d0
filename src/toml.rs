//! TOML decoding and encoding.
//!
//! Decoding goes through the `toml` crate. Integers stay
//! [`Number::Integer`], floats become [`Number::Float`] and date-times become
//! [`Value::Timestamp`]:
//!
//! | TOML                 | Value                                   |
//! |----------------------|-----------------------------------------|
//! | offset date-time     | timestamp with the literal's offset     |
//! | local date-time      | timestamp at UTC                        |
//! | local date           | timestamp at midnight UTC               |
//! | local time           | string, since there is no date          |
//!
//! The encoder needs a mapping at the root with string keys. Plain entries
//! of a table come first, then its sub-tables and arrays of tables, each
//! group sorted by key. Nested table headers are indented two spaces per
//! level:
//!
//! ```rust
//! use serde_datafmt::{toml, value};
//!
//! let v = value!({"name": "app", "db": {"pool": {"size": 4}}});
//! assert_eq!(
//!     toml::to_string(&v).unwrap(),
//!     "name = \"app\"\n\n[db]\n  [db.pool]\n    size = 4\n"
//! );
//! ```

use crate::de::expect_mapping;
use crate::value::format_timestamp;
use crate::{Error, Format, Mapping, Number, Position, Result, Value};
use chrono::DateTime;

/// Decodes a TOML document. The root of a TOML document is always a table,
/// so the result is always a [`Value::Mapping`].
///
/// # Errors
///
/// Returns [`Error::Parse`] for malformed input, located by the byte span the
/// parser reports.
pub fn decode(text: &str) -> Result<Value> {
    let table: ::toml::Table = ::toml::from_str(text).map_err(|e| parse_error(text, &e))?;
    expect_mapping(Format::Toml, convert_table(table)?)
}

fn parse_error(text: &str, err: &::toml::de::Error) -> Error {
    let msg = err.message().trim_end();
    match err.span() {
        Some(span) => Error::parse_at(Format::Toml, Position::from_offset(text, span.start), msg),
        None => Error::parse(Format::Toml, msg),
    }
}

fn convert_table(table: ::toml::Table) -> Result<Value> {
    let mut map = Mapping::with_capacity(table.len());
    for (key, value) in table {
        map.insert(key, convert(value)?);
    }
    Ok(Value::Mapping(map))
}

fn convert(value: ::toml::Value) -> Result<Value> {
    Ok(match value {
        ::toml::Value::String(s) => Value::String(s),
        ::toml::Value::Integer(i) => Value::Number(Number::Integer(i)),
        ::toml::Value::Float(f) => Value::Number(Number::Float(f)),
        ::toml::Value::Boolean(b) => Value::Bool(b),
        ::toml::Value::Datetime(dt) => convert_datetime(&dt)?,
        ::toml::Value::Array(items) => Value::Sequence(
            items
                .into_iter()
                .map(convert)
                .collect::<Result<Vec<_>>>()?,
        ),
        ::toml::Value::Table(table) => convert_table(table)?,
    })
}

fn convert_datetime(dt: &::toml::value::Datetime) -> Result<Value> {
    let text = match (&dt.date, &dt.time, &dt.offset) {
        (Some(_), Some(_), Some(_)) => dt.to_string(),
        (Some(_), Some(_), None) => format!("{}Z", dt),
        (Some(date), None, _) => format!("{}T00:00:00Z", date),
        (None, _, _) => return Ok(Value::String(dt.to_string())),
    };
    DateTime::parse_from_rfc3339(&text)
        .map(Value::Timestamp)
        .map_err(|e| Error::parse(Format::Toml, format!("invalid date-time {}: {}", dt, e)))
}

/// Encodes `value` as a TOML document.
///
/// # Errors
///
/// Returns [`Error::Encode`] if the root is not a mapping, a mapping has a
/// non-string key, or an array holds a null.
pub fn to_string(value: &Value) -> Result<String> {
    let map = value.as_mapping().ok_or_else(|| {
        Error::encode(
            Format::Toml,
            format!("document root must be a mapping, found {}", value.kind()),
        )
    })?;
    let mut output = String::with_capacity(256);
    write_table_body(&mut output, &[], map)?;
    Ok(output)
}

fn string_entries(map: &Mapping) -> Result<Vec<(&str, &Value)>> {
    map.sorted_entries()
        .into_iter()
        .map(|(key, value)| {
            key.as_str().map(|k| (k, value)).ok_or_else(|| {
                Error::encode(
                    Format::Toml,
                    format!("mapping key {} is a {}, not a string", key, key.kind()),
                )
            })
        })
        .collect()
}

fn is_table_array(items: &[Value]) -> bool {
    !items.is_empty() && items.iter().all(Value::is_mapping)
}

/// Entries written as `[table]` or `[[table]]` sections rather than
/// `key = value` lines.
fn is_section(value: &Value) -> bool {
    match value {
        Value::Mapping(_) => true,
        Value::Sequence(items) => is_table_array(items),
        _ => false,
    }
}

fn write_table_body(output: &mut String, path: &[&str], map: &Mapping) -> Result<()> {
    let entries = string_entries(map)?;
    let indent = "  ".repeat(path.len());

    for &(key, value) in &entries {
        if value.is_null() || is_section(value) {
            continue;
        }
        output.push_str(&indent);
        write_key(output, key);
        output.push_str(" = ");
        write_inline(output, value)?;
        output.push('\n');
    }

    for &(key, value) in &entries {
        let mut child: Vec<&str> = path.to_vec();
        child.push(key);
        match value {
            Value::Mapping(table) => {
                if path.is_empty() && !output.is_empty() {
                    output.push('\n');
                }
                output.push_str(&indent);
                output.push('[');
                write_path(output, &child);
                output.push_str("]\n");
                write_table_body(output, &child, table)?;
            }
            Value::Sequence(items) if is_table_array(items) => {
                for table in items.iter().filter_map(Value::as_mapping) {
                    if !output.is_empty() {
                        output.push('\n');
                    }
                    output.push_str(&indent);
                    output.push_str("[[");
                    write_path(output, &child);
                    output.push_str("]]\n");
                    write_table_body(output, &child, table)?;
                }
            }
            _ => {}
        }
    }
    Ok(())
}

fn write_path(output: &mut String, path: &[&str]) {
    for (i, key) in path.iter().enumerate() {
        if i > 0 {
            output.push('.');
        }
        write_key(output, key);
    }
}

fn is_bare_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

fn write_key(output: &mut String, key: &str) {
    if is_bare_key(key) {
        output.push_str(key);
    } else {
        write_string(output, key);
    }
}

fn write_inline(output: &mut String, value: &Value) -> Result<()> {
    match value {
        Value::Null => {
            return Err(Error::encode(
                Format::Toml,
                "null has no representation inside an array",
            ))
        }
        Value::Bool(b) => output.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => write_number(output, *n),
        Value::String(s) => write_string(output, s),
        Value::Timestamp(ts) => output.push_str(&format_timestamp(ts)),
        Value::Sequence(items) => {
            output.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    output.push_str(", ");
                }
                write_inline(output, item)?;
            }
            output.push(']');
        }
        Value::Mapping(map) => {
            let entries: Vec<_> = string_entries(map)?
                .into_iter()
                .filter(|(_, v)| !v.is_null())
                .collect();
            if entries.is_empty() {
                output.push_str("{}");
                return Ok(());
            }
            output.push_str("{ ");
            for (i, (key, value)) in entries.into_iter().enumerate() {
                if i > 0 {
                    output.push_str(", ");
                }
                write_key(output, key);
                output.push_str(" = ");
                write_inline(output, value)?;
            }
            output.push_str(" }");
        }
    }
    Ok(())
}

fn write_number(output: &mut String, n: Number) {
    match n {
        Number::Integer(i) => output.push_str(&i.to_string()),
        Number::Float(f) if f.is_nan() => output.push_str("nan"),
        Number::Float(f) if f.is_infinite() => {
            output.push_str(if f > 0.0 { "inf" } else { "-inf" });
        }
        Number::Float(f) => {
            let text = f.to_string();
            output.push_str(&text);
            if !text.contains(['.', 'e', 'E']) {
                output.push_str(".0");
            }
        }
    }
}

fn write_string(output: &mut String, s: &str) {
    output.push('"');
    for ch in s.chars() {
        match ch {
            '"' => output.push_str("\\\""),
            '\\' => output.push_str("\\\\"),
            '\n' => output.push_str("\\n"),
            '\r' => output.push_str("\\r"),
            '\t' => output.push_str("\\t"),
            '\u{0008}' => output.push_str("\\b"),
            '\u{000C}' => output.push_str("\\f"),
            c if c.is_control() => output.push_str(&format!("\\u{:04X}", u32::from(c))),
            c => output.push(c),
        }
    }
    output.push('"');
}
