//! JSON decoding and encoding.
//!
//! Decoding is strict: the whole input must be one JSON document, trailing
//! non-whitespace is an error. Every numeric literal becomes
//! [`Number::Float`].
//!
//! Encoding writes mapping keys in sorted order so output is reproducible.
//! Floats without a fractional part are written as integers (`1`, not
//! `1.0`), non-finite floats as `null` and timestamps as RFC 3339 strings.
//! Keys must already be strings; these functions do not normalize.
//!
//! ```rust
//! use serde_datafmt::json;
//!
//! let value = json::decode(r#"{"b": [1, 2.5], "a": null}"#).unwrap();
//! assert_eq!(json::to_string(&value).unwrap(), r#"{"a":null,"b":[1,2.5]}"#);
//! ```

use crate::de::{expect_mapping, expect_sequence, ScalarRules, ValueSeed};
use crate::value::format_timestamp;
use crate::{Error, Format, JsonOptions, Key, Number, Position, Result, Value};
use serde::de::DeserializeSeed;
use serde::ser::{self, Serialize, SerializeMap, SerializeSeq, Serializer};

// Largest magnitude below which every integral f64 is exactly an integer.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Decodes any JSON document.
///
/// # Errors
///
/// Returns [`Error::Parse`] with the line, column and byte offset reported by
/// the parser.
pub fn decode_value(text: &str) -> Result<Value> {
    let mut de = serde_json::Deserializer::from_str(text);
    let value = ValueSeed::new(ScalarRules::JSON)
        .deserialize(&mut de)
        .map_err(|e| parse_error(text, &e))?;
    de.end().map_err(|e| parse_error(text, &e))?;
    Ok(value)
}

/// Decodes a JSON document whose root is an object.
///
/// # Errors
///
/// Returns [`Error::Parse`] for malformed input or a non-object root.
pub fn decode(text: &str) -> Result<Value> {
    expect_mapping(Format::Json, decode_value(text)?)
}

/// Decodes a JSON document whose root is an array.
///
/// # Errors
///
/// Returns [`Error::Parse`] for malformed input or a non-array root.
pub fn decode_array(text: &str) -> Result<Value> {
    expect_sequence(Format::Json, decode_value(text)?)
}

fn parse_error(text: &str, err: &serde_json::Error) -> Error {
    if err.line() == 0 {
        Error::parse(Format::Json, err)
    } else {
        let position = Position::from_line_column(text, err.line(), err.column());
        Error::parse_at(Format::Json, position, err)
    }
}

/// Encodes `value` as compact JSON with sorted keys.
///
/// # Errors
///
/// Returns [`Error::Encode`] if any mapping has a non-string key.
pub fn to_string(value: &Value) -> Result<String> {
    to_string_with_options(value, &JsonOptions::compact())
}

/// Encodes `value` as indented JSON, repeating `indent` once per nesting
/// level. There is no trailing newline.
///
/// # Errors
///
/// Returns [`Error::Encode`] if any mapping has a non-string key.
///
/// # Examples
///
/// ```rust
/// use serde_datafmt::{json, value};
///
/// let v = value!({"outer": {"inner": true}});
/// assert_eq!(
///     json::to_string_pretty(&v, "\t").unwrap(),
///     "{\n\t\"outer\": {\n\t\t\"inner\": true\n\t}\n}"
/// );
/// ```
pub fn to_string_pretty(value: &Value, indent: &str) -> Result<String> {
    to_string_with_options(value, &JsonOptions::pretty(indent))
}

/// Encodes `value` according to `options`.
///
/// # Errors
///
/// Returns [`Error::Encode`] if any mapping has a non-string key.
pub fn to_string_with_options(value: &Value, options: &JsonOptions) -> Result<String> {
    if let Some(key) = first_non_string_key(value) {
        return Err(Error::encode(
            Format::Json,
            format!("mapping key {} is a {}, not a string", key, key.kind()),
        ));
    }

    let encoded = match &options.indent {
        None => serde_json::to_string(&JsonValue(value)),
        Some(indent) => {
            let mut out = Vec::with_capacity(128);
            let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
            let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
            JsonValue(value)
                .serialize(&mut serializer)
                .map(|()| String::from_utf8_lossy(&out).into_owned())
        }
    };
    encoded.map_err(|e| Error::encode(Format::Json, e))
}

fn first_non_string_key(value: &Value) -> Option<&Key> {
    match value {
        Value::Mapping(map) => map
            .iter()
            .find_map(|(k, v)| if k.is_string() { first_non_string_key(v) } else { Some(k) }),
        Value::Sequence(seq) => seq.iter().find_map(first_non_string_key),
        _ => None,
    }
}

/// Serializes a [`Value`] the way the JSON encoder wants it: sorted keys,
/// integral floats as integers and timestamps as strings.
struct JsonValue<'a>(&'a Value);

impl Serialize for JsonValue<'_> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.0 {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(Number::Integer(i)) => serializer.serialize_i64(*i),
            Value::Number(Number::Float(f)) => {
                if f.fract() == 0.0 && f.abs() < MAX_EXACT_INTEGER {
                    serializer.serialize_i64(*f as i64)
                } else {
                    // serde_json writes NaN and the infinities as null
                    serializer.serialize_f64(*f)
                }
            }
            Value::String(s) => serializer.serialize_str(s),
            Value::Timestamp(ts) => serializer.serialize_str(&format_timestamp(ts)),
            Value::Sequence(seq) => {
                let mut out = serializer.serialize_seq(Some(seq.len()))?;
                for element in seq {
                    out.serialize_element(&JsonValue(element))?;
                }
                out.end()
            }
            Value::Mapping(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (key, value) in map.sorted_entries() {
                    let name = key.as_str().ok_or_else(|| {
                        <S::Error as ser::Error>::custom(format!("non-string mapping key {}", key))
                    })?;
                    out.serialize_entry(name, &JsonValue(value))?;
                }
                out.end()
            }
        }
    }
}
