//! # serde_datafmt
//!
//! Decoding JSON, YAML, TOML and CSV into one dynamic [`Value`] model and
//! encoding it back out again.
//!
//! ## Overview
//!
//! Every decoder produces a [`Value`] and every encoder consumes one, so
//! converting between formats is a decode followed by an encode:
//!
//! ```rust
//! use serde_datafmt::{to_json, yaml};
//!
//! let value = yaml("name: web\nports:\n- 80\n- 443\n").unwrap();
//! assert_eq!(to_json(&value).unwrap(), r#"{"name":"web","ports":[80,443]}"#);
//! ```
//!
//! YAML allows mapping keys that JSON and TOML cannot express. The crate-root
//! encoders ([`to_json`], [`to_json_pretty`], [`to_yaml`], [`to_toml`]) run
//! [`normalize_keys`] first; the per-format modules ([`json`](mod@json),
//! [`yaml`](mod@yaml), [`toml`](mod@toml)) do not, and report an
//! [`Error::Encode`] when they meet a key they cannot write.
//!
//! ## CSV
//!
//! CSV decodes either as a matrix of cells or as a [`CsvTable`] addressed by
//! column label. When there is no header line the labels are generated with
//! [`auto_index`]:
//!
//! ```rust
//! use serde_datafmt::{csv_by_column, value, CsvOptions};
//!
//! let options = CsvOptions::new().with_header("");
//! let columns = csv_by_column("1,2\n3,4", &options).unwrap();
//! assert_eq!(columns, value!({"A": ["1", "3"], "B": ["2", "4"]}));
//! ```
//!
//! ## Rust types
//!
//! Anything implementing `Serialize` can be turned into a [`Value`] with
//! [`to_value`] and handed to an encoder:
//!
//! ```rust
//! use serde::Serialize;
//! use serde_datafmt::{to_toml, to_value};
//!
//! #[derive(Serialize)]
//! struct Server { host: String, port: u16 }
//!
//! let value = to_value(&Server { host: "localhost".into(), port: 8080 }).unwrap();
//! assert_eq!(to_toml(&value).unwrap(), "host = \"localhost\"\nport = 8080\n");
//! ```
//!
//! ## Logging
//!
//! Decode and encode entry points emit `tracing` events at `debug` level. The
//! crate never installs a subscriber.

pub mod csv;
mod de;
pub mod error;
pub mod format;
pub mod json;
mod macros;
pub mod map;
pub mod normalize;
pub mod options;
pub mod ser;
pub mod toml;
pub mod value;
pub mod yaml;

pub use crate::csv::{auto_index, CsvTable};
pub use error::{Error, Position, Result};
pub use format::Format;
pub use map::Mapping;
pub use normalize::{has_string_keys, normalize_keys, normalize_keys_for};
pub use options::{CsvOptions, Delimiter, HeaderSource, JsonOptions};
pub use ser::{to_value, ValueSerializer};
pub use value::{Key, Number, Timestamp, Value};

/// Decodes a JSON document whose root is an object.
///
/// All numbers decode as [`Number::Float`].
///
/// # Errors
///
/// Returns [`Error::Parse`] for malformed input or a non-object root.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn json(text: &str) -> Result<Value> {
    tracing::debug!(format = %Format::Json, len = text.len(), "decoding");
    crate::json::decode(text)
}

/// Decodes a JSON document whose root is an array.
///
/// # Errors
///
/// Returns [`Error::Parse`] for malformed input or a non-array root.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn json_array(text: &str) -> Result<Value> {
    tracing::debug!(format = %Format::Json, len = text.len(), "decoding array");
    crate::json::decode_array(text)
}

/// Decodes a YAML document whose root is a mapping. An empty document is an
/// empty mapping.
///
/// # Errors
///
/// Returns [`Error::Parse`] for malformed input or a root of another kind.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn yaml(text: &str) -> Result<Value> {
    tracing::debug!(format = %Format::Yaml, len = text.len(), "decoding");
    crate::yaml::decode(text)
}

/// Decodes a YAML document whose root is a sequence. An empty document is an
/// empty sequence.
///
/// # Errors
///
/// Returns [`Error::Parse`] for malformed input or a root of another kind.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn yaml_array(text: &str) -> Result<Value> {
    tracing::debug!(format = %Format::Yaml, len = text.len(), "decoding array");
    crate::yaml::decode_array(text)
}

/// Decodes a TOML document.
///
/// # Errors
///
/// Returns [`Error::Parse`] for malformed input.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn toml(text: &str) -> Result<Value> {
    tracing::debug!(format = %Format::Toml, len = text.len(), "decoding");
    crate::toml::decode(text)
}

/// Decodes CSV as a matrix of cells, header line included.
///
/// Only the delimiter of `options` is used. Input without any record decodes
/// as one empty row.
///
/// # Errors
///
/// Returns [`Error::Parse`] for malformed input.
///
/// # Examples
///
/// ```rust
/// use serde_datafmt::{csv, CsvOptions};
///
/// let (options, data) = CsvOptions::from_args(&[";", "a;b\n1;2"]).unwrap();
/// assert_eq!(csv(data, &options).unwrap(), vec![vec!["a", "b"], vec!["1", "2"]]);
/// ```
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn csv(text: &str, options: &CsvOptions) -> Result<Vec<Vec<String>>> {
    tracing::debug!(format = %Format::Csv, len = text.len(), delimiter = %options.delimiter, "decoding matrix");
    crate::csv::decode_matrix(text, options.delimiter)
}

/// Decodes CSV as a sequence of mappings, one per data row, from column
/// label to cell.
///
/// # Errors
///
/// Returns [`Error::Parse`] for malformed input.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn csv_by_row(text: &str, options: &CsvOptions) -> Result<Value> {
    tracing::debug!(format = %Format::Csv, len = text.len(), delimiter = %options.delimiter, "decoding rows");
    Ok(crate::csv::decode_table(text, options)?.to_rows())
}

/// Decodes CSV as a mapping from column label to the sequence of cells in
/// that column.
///
/// # Errors
///
/// Returns [`Error::Parse`] for malformed input.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn csv_by_column(text: &str, options: &CsvOptions) -> Result<Value> {
    tracing::debug!(format = %Format::Csv, len = text.len(), delimiter = %options.delimiter, "decoding columns");
    Ok(crate::csv::decode_table(text, options)?.to_columns())
}

fn normalized(value: &Value, format: Format) -> Result<Value> {
    if has_string_keys(value) {
        return Ok(value.clone());
    }
    normalize_keys_for(value.clone(), format)
}

/// Normalizes keys, then encodes `value` as compact JSON with sorted keys.
///
/// # Errors
///
/// Returns [`Error::Encode`] if a mapping has a collection as a key.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_json(value: &Value) -> Result<String> {
    tracing::debug!(format = %Format::Json, kind = value.kind(), "encoding");
    crate::json::to_string(&normalized(value, Format::Json)?)
}

/// Normalizes keys, then encodes `value` as JSON indented with `indent` per
/// nesting level.
///
/// # Errors
///
/// Returns [`Error::Encode`] if a mapping has a collection as a key.
///
/// # Examples
///
/// ```rust
/// use serde_datafmt::{to_json_pretty, value};
///
/// let v = value!({"a": [1, 2]});
/// assert_eq!(to_json_pretty("  ", &v).unwrap(), "{\n  \"a\": [\n    1,\n    2\n  ]\n}");
/// ```
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_json_pretty(indent: &str, value: &Value) -> Result<String> {
    tracing::debug!(format = %Format::Json, kind = value.kind(), indent = indent.len(), "encoding pretty");
    crate::json::to_string_pretty(&normalized(value, Format::Json)?, indent)
}

/// Normalizes keys, then encodes `value` as block-style YAML.
///
/// # Errors
///
/// Returns [`Error::Encode`] if a mapping has a collection as a key.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_yaml(value: &Value) -> Result<String> {
    tracing::debug!(format = %Format::Yaml, kind = value.kind(), "encoding");
    crate::yaml::to_string(&normalized(value, Format::Yaml)?)
}

/// Normalizes keys, then encodes `value` as TOML.
///
/// # Errors
///
/// Returns [`Error::Encode`] if the root is not a mapping, a mapping has a
/// collection as a key, or an array holds a null.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_toml(value: &Value) -> Result<String> {
    tracing::debug!(format = %Format::Toml, kind = value.kind(), "encoding");
    crate::toml::to_string(&normalized(value, Format::Toml)?)
}

/// Writes rows of cells as CSV with CRLF line endings.
///
/// # Errors
///
/// Returns [`Error::Encode`] if the CSV writer fails.
///
/// # Examples
///
/// ```rust
/// use serde_datafmt::{to_csv, Delimiter};
///
/// let rows = vec![vec!["a".to_string(), "b".to_string()], vec!["1".to_string(), "2".to_string()]];
/// assert_eq!(to_csv(&rows, Delimiter::COMMA).unwrap(), "a,b\r\n1,2\r\n");
/// ```
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_csv(rows: &[Vec<String>], delimiter: Delimiter) -> Result<String> {
    tracing::debug!(format = %Format::Csv, rows = rows.len(), %delimiter, "encoding");
    crate::csv::to_csv(rows, delimiter)
}

/// Writes a sequence of sequences of scalars as CSV.
///
/// # Errors
///
/// Returns [`Error::Encode`] if `value` is not a sequence of rows of scalars.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_csv_value(value: &Value, delimiter: Delimiter) -> Result<String> {
    let rows = crate::csv::matrix_from_value(value)?;
    to_csv(&rows, delimiter)
}

/// Decodes `text` as `format`.
///
/// JSON and YAML accept any root; TOML always yields a mapping; CSV yields
/// the comma-delimited matrix as a sequence of sequences of strings.
///
/// # Errors
///
/// Returns [`Error::Parse`] for malformed input.
///
/// # Examples
///
/// ```rust
/// use serde_datafmt::{decode, Format, Value};
///
/// let value = decode("yaml".parse::<Format>().unwrap(), "- a\n- b\n").unwrap();
/// assert_eq!(value, Value::from(vec![Value::from("a"), Value::from("b")]));
/// ```
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn decode(format: Format, text: &str) -> Result<Value> {
    tracing::debug!(%format, len = text.len(), "decoding");
    match format {
        Format::Json => crate::json::decode_value(text),
        Format::Yaml => crate::yaml::decode_value(text),
        Format::Toml => crate::toml::decode(text),
        Format::Csv => Ok(crate::csv::decode_matrix(text, Delimiter::COMMA)?
            .into_iter()
            .map(Value::from_iter)
            .collect()),
    }
}

/// Encodes `value` as `format`, normalizing keys the way the crate-root
/// encoders do. JSON is compact; CSV is comma-delimited.
///
/// # Errors
///
/// Returns [`Error::Encode`] if `value` breaks a precondition of the encoder.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn encode(format: Format, value: &Value) -> Result<String> {
    match format {
        Format::Json => to_json(value),
        Format::Yaml => to_yaml(value),
        Format::Toml => to_toml(value),
        Format::Csv => to_csv_value(value, Delimiter::COMMA),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Point {
        x: i32,
        y: i32,
    }

    #[test]
    fn test_cross_format_conversion() {
        let value = yaml("b: [1, 2]\na: {c: true}\n").unwrap();
        assert_eq!(to_json(&value).unwrap(), r#"{"a":{"c":true},"b":[1,2]}"#);

        let back = json(&to_json(&value).unwrap()).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn test_crate_root_encoders_normalize() {
        let value = yaml("1: one\ntrue: yes\n").unwrap();
        assert!(json::to_string(&value).unwrap_err().is_encode());
        assert_eq!(to_json(&value).unwrap(), r#"{"1":"one","true":"yes"}"#);
        assert_eq!(to_toml(&value).unwrap(), "1 = \"one\"\ntrue = \"yes\"\n");
        assert_eq!(to_yaml(&value).unwrap(), "\"1\": one\n\"true\": \"yes\"\n");
    }

    #[test]
    fn test_to_value_feeds_encoders() {
        let value = to_value(&Point { x: 1, y: 2 }).unwrap();
        assert_eq!(to_yaml(&value).unwrap(), "x: 1\ny: 2\n");
        assert_eq!(to_toml(&value).unwrap(), "x = 1\ny = 2\n");
    }

    #[test]
    fn test_generic_dispatch() {
        for format in [Format::Json, Format::Yaml, Format::Toml] {
            let value = value!({"k": "v", "n": 2});
            let text = encode(format, &value).unwrap();
            assert_eq!(decode(format, &text).unwrap(), value, "{}", format);
        }

        let matrix = decode(Format::Csv, "a,b\n1,2\n").unwrap();
        assert_eq!(encode(Format::Csv, &matrix).unwrap(), "a,b\r\n1,2\r\n");
    }

    #[test]
    fn test_csv_views() {
        let options = CsvOptions::new();
        let rows = csv_by_row("first,second\n1,2\n", &options).unwrap();
        assert_eq!(rows, value!([{"first": "1", "second": "2"}]));

        let columns = csv_by_column("first,second\n1,2\n3,4\n", &options).unwrap();
        assert_eq!(columns, value!({"first": ["1", "3"], "second": ["2", "4"]}));
    }
}
