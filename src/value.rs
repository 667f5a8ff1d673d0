//! The dynamic value model shared by every decoder and encoder.
//!
//! [`Value`] is a tagged union with one variant per kind of data the supported
//! formats can express. Decoders produce it, encoders consume it, and the key
//! normalizer rewrites it in between.
//!
//! ## Numbers
//!
//! [`Number`] keeps integers and floats apart because TOML distinguishes them,
//! but compares them numerically: `Integer(1) == Float(1.0)`. JSON and YAML
//! decode every numeric literal as a float, so this is what lets a value
//! survive a trip through a format that does not keep the distinction.
//!
//! ## Keys
//!
//! Mapping keys are [`Key`]s rather than plain strings since YAML allows
//! booleans, numbers and even collections as keys. JSON and TOML only accept
//! [`Key::String`]; see [`normalize_keys`](crate::normalize_keys).
//!
//! ## Examples
//!
//! ```rust
//! use serde_datafmt::{value, Number, Value};
//!
//! let v = value!({
//!     "name": "Alice",
//!     "age": 30,
//!     "tags": ["a", "b"]
//! });
//!
//! assert_eq!(v.get("name").and_then(Value::as_str), Some("Alice"));
//! assert_eq!(v.get("age"), Some(&Value::Number(Number::Float(30.0))));
//! assert!(v.get("tags").map_or(false, Value::is_sequence));
//! ```

use crate::de::ValueSeed;
use crate::Mapping;
use chrono::{DateTime, FixedOffset, SecondsFormat};
use serde::de::DeserializeSeed;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A point in time with the zone offset it was written with.
pub type Timestamp = DateTime<FixedOffset>;

/// Any value a supported format can represent.
///
/// # Examples
///
/// ```rust
/// use serde_datafmt::{Number, Value};
///
/// let null = Value::Null;
/// let num = Value::Number(Number::Integer(42));
/// let text = Value::String("hello".to_string());
///
/// assert!(null.is_null());
/// assert!(num.is_number());
/// assert!(text.is_string());
/// ```
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Sequence(Vec<Value>),
    Mapping(Mapping),
    Timestamp(Timestamp),
}

/// A numeric value, either a 64-bit signed integer or a 64-bit float.
///
/// # Examples
///
/// ```rust
/// use serde_datafmt::Number;
///
/// assert!(Number::Integer(42).is_integer());
/// assert_eq!(Number::Float(42.0).as_i64(), Some(42));
/// assert_eq!(Number::Integer(1), Number::Float(1.0));
/// assert_eq!(Number::Float(1.5).to_string(), "1.5");
/// ```
#[derive(Clone, Copy, Debug)]
pub enum Number {
    Integer(i64),
    Float(f64),
}

impl Number {
    /// Returns `true` if this is an integer value.
    #[inline]
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(self, Number::Integer(_))
    }

    /// Returns `true` if this is a floating-point value.
    #[inline]
    #[must_use]
    pub const fn is_float(&self) -> bool {
        matches!(self, Number::Float(_))
    }

    /// Converts this number to an `i64` if it holds a whole number in range.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_datafmt::Number;
    ///
    /// assert_eq!(Number::Integer(42).as_i64(), Some(42));
    /// assert_eq!(Number::Float(42.5).as_i64(), None);
    /// assert_eq!(Number::Float(f64::INFINITY).as_i64(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Number::Integer(i) => Some(i),
            Number::Float(f) => {
                if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
                    Some(f as i64)
                } else {
                    None
                }
            }
        }
    }

    /// Converts this number to an `f64`.
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        match *self {
            Number::Integer(i) => i as f64,
            Number::Float(f) => f,
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (*self, *other) {
            (Number::Integer(a), Number::Integer(b)) => a == b,
            (Number::Float(a), Number::Float(b)) => a == b,
            (Number::Integer(i), f @ Number::Float(_))
            | (f @ Number::Float(_), Number::Integer(i)) => f.as_i64() == Some(i),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(i) => write!(f, "{}", i),
            Number::Float(fl) => write!(f, "{}", fl),
        }
    }
}

macro_rules! number_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Number {
                fn from(value: $ty) -> Self {
                    Number::Integer(i64::from(value))
                }
            }

            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Number(Number::Integer(i64::from(value)))
                }
            }
        )*
    };
}

number_from_integer!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for Number {
    fn from(value: f32) -> Self {
        Number::Float(f64::from(value))
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number::Float(value)
    }
}

/// A mapping key.
///
/// Most keys are strings, but YAML also produces booleans, numbers, null and
/// (through the explicit `? key` syntax) whole collections as keys.
///
/// Keys compare structurally; two keys that would print the same are still
/// different keys (`Key::Bool(true) != Key::from("true")`) until
/// [`normalize_keys`](crate::normalize_keys) folds them together.
#[derive(Clone, Debug, PartialEq)]
pub enum Key {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Composite(Box<Value>),
}

impl Key {
    /// Converts a decoded value into a key.
    ///
    /// Timestamps become their RFC 3339 string, collections become
    /// [`Key::Composite`].
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Null => Key::Null,
            Value::Bool(b) => Key::Bool(b),
            Value::Number(n) => Key::Number(n),
            Value::String(s) => Key::String(s),
            Value::Timestamp(ts) => Key::String(format_timestamp(&ts)),
            other @ (Value::Sequence(_) | Value::Mapping(_)) => Key::Composite(Box::new(other)),
        }
    }

    /// Converts the key back into a value.
    #[must_use]
    pub fn into_value(self) -> Value {
        match self {
            Key::Null => Value::Null,
            Key::Bool(b) => Value::Bool(b),
            Key::Number(n) => Value::Number(n),
            Key::String(s) => Value::String(s),
            Key::Composite(v) => *v,
        }
    }

    /// Returns `true` for [`Key::String`].
    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Key::String(_))
    }

    /// Returns `true` for [`Key::Composite`].
    #[inline]
    #[must_use]
    pub const fn is_composite(&self) -> bool {
        matches!(self, Key::Composite(_))
    }

    /// The key's text if it is a string key.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Key::String(s) => Some(s),
            _ => None,
        }
    }

    /// The canonical string form of a scalar key, or `None` for composite
    /// keys.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_datafmt::{Key, Number};
    ///
    /// assert_eq!(Key::Bool(true).to_key_string().as_deref(), Some("true"));
    /// assert_eq!(Key::Number(Number::Float(2.0)).to_key_string().as_deref(), Some("2"));
    /// assert_eq!(Key::Null.to_key_string().as_deref(), Some("null"));
    /// ```
    #[must_use]
    pub fn to_key_string(&self) -> Option<String> {
        match self {
            Key::Null => Some("null".to_string()),
            Key::Bool(b) => Some(b.to_string()),
            Key::Number(n) => Some(n.to_string()),
            Key::String(s) => Some(s.clone()),
            Key::Composite(_) => None,
        }
    }

    /// Human-readable kind, for error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Key::Null => "null",
            Key::Bool(_) => "bool",
            Key::Number(_) => "number",
            Key::String(_) => "string",
            Key::Composite(_) => "composite",
        }
    }
}

// Floats never compare equal to NaN, so a NaN key is never found again once
// inserted. Everything else behaves as a proper equivalence.
impl Eq for Key {}

impl Hash for Key {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Key::Null | Key::Composite(_) => {}
            Key::Bool(b) => b.hash(state),
            // must agree with the numeric equality of `Number`
            Key::Number(n) => match n.as_i64() {
                Some(i) => i.hash(state),
                None => n.as_f64().to_bits().hash(state),
            },
            Key::String(s) => s.hash(state),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Composite(v) => write!(f, "{}", v),
            scalar => f.write_str(&scalar.to_key_string().unwrap_or_default()),
        }
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Key::String(value.to_string())
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Key::String(value)
    }
}

impl From<bool> for Key {
    fn from(value: bool) -> Self {
        Key::Bool(value)
    }
}

impl From<i64> for Key {
    fn from(value: i64) -> Self {
        Key::Number(Number::Integer(value))
    }
}

impl From<f64> for Key {
    fn from(value: f64) -> Self {
        Key::Number(Number::Float(value))
    }
}

impl Serialize for Key {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Key::Null => serializer.serialize_unit(),
            Key::Bool(b) => serializer.serialize_bool(*b),
            Key::Number(Number::Integer(i)) => serializer.serialize_i64(*i),
            Key::Number(Number::Float(f)) => serializer.serialize_f64(*f),
            Key::String(s) => serializer.serialize_str(s),
            Key::Composite(v) => v.serialize(serializer),
        }
    }
}

/// Formats a timestamp as RFC 3339 with as many fractional digits as needed
/// and `Z` for a zero offset.
pub(crate) fn format_timestamp(ts: &Timestamp) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Recognizes a complete RFC 3339 date-time with an explicit offset.
pub(crate) fn parse_timestamp(s: &str) -> Option<Timestamp> {
    let bytes = s.as_bytes();
    if bytes.len() < 20 || bytes[4] != b'-' || !bytes[0].is_ascii_digit() {
        return None;
    }
    DateTime::parse_from_rfc3339(s).ok()
}

impl Value {
    /// Returns `true` if the value is null.
    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns `true` if the value is a boolean.
    #[inline]
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    /// Returns `true` if the value is a number.
    #[inline]
    #[must_use]
    pub const fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    /// Returns `true` if the value is a string.
    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    /// Returns `true` if the value is a sequence.
    #[inline]
    #[must_use]
    pub const fn is_sequence(&self) -> bool {
        matches!(self, Value::Sequence(_))
    }

    /// Returns `true` if the value is a mapping.
    #[inline]
    #[must_use]
    pub const fn is_mapping(&self) -> bool {
        matches!(self, Value::Mapping(_))
    }

    /// Returns `true` if the value is a timestamp.
    #[inline]
    #[must_use]
    pub const fn is_timestamp(&self) -> bool {
        matches!(self, Value::Timestamp(_))
    }

    /// Returns `true` for everything except sequences and mappings.
    #[inline]
    #[must_use]
    pub const fn is_scalar(&self) -> bool {
        !matches!(self, Value::Sequence(_) | Value::Mapping(_))
    }

    /// Human-readable kind, for error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Sequence(_) => "sequence",
            Value::Mapping(_) => "mapping",
            Value::Timestamp(_) => "timestamp",
        }
    }

    /// If the value is a boolean, returns it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_datafmt::Value;
    ///
    /// assert_eq!(Value::Bool(true).as_bool(), Some(true));
    /// assert_eq!(Value::from(42).as_bool(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// If the value is a string, returns a reference to it.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// If the value is a whole number that fits an `i64`, returns it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_datafmt::{Number, Value};
    ///
    /// assert_eq!(Value::Number(Number::Float(42.0)).as_i64(), Some(42));
    /// assert_eq!(Value::Number(Number::Float(42.5)).as_i64(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    /// If the value is a number, returns it as an `f64`.
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(n.as_f64()),
            _ => None,
        }
    }

    /// If the value is a sequence, returns its elements.
    #[inline]
    #[must_use]
    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(seq) => Some(seq),
            _ => None,
        }
    }

    /// If the value is a mapping, returns a reference to it.
    #[inline]
    #[must_use]
    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Value::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// If the value is a timestamp, returns a reference to it.
    #[inline]
    #[must_use]
    pub fn as_timestamp(&self) -> Option<&Timestamp> {
        match self {
            Value::Timestamp(ts) => Some(ts),
            _ => None,
        }
    }

    /// Looks up a string key if the value is a mapping.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_mapping().and_then(|map| map.get(key))
    }

    /// The lexical form of a scalar, as used for CSV cells and key strings.
    ///
    /// Null renders as the empty string. Returns `None` for sequences and
    /// mappings.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_datafmt::Value;
    ///
    /// assert_eq!(Value::from(3.0).to_scalar_string().as_deref(), Some("3"));
    /// assert_eq!(Value::Null.to_scalar_string().as_deref(), Some(""));
    /// assert_eq!(Value::Sequence(vec![]).to_scalar_string(), None);
    /// ```
    #[must_use]
    pub fn to_scalar_string(&self) -> Option<String> {
        match self {
            Value::Null => Some(String::new()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Number(n) => Some(n.to_string()),
            Value::String(s) => Some(s.clone()),
            Value::Timestamp(ts) => Some(format_timestamp(ts)),
            Value::Sequence(_) | Value::Mapping(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Sequence(seq) => {
                f.write_str("[")?;
                for (i, elem) in seq.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", elem)?;
                }
                f.write_str("]")
            }
            Value::Mapping(map) => {
                f.write_str("{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}:{}", k, v)?;
                }
                f.write_str("}")
            }
            scalar => f.write_str(&scalar.to_scalar_string().unwrap_or_default()),
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(Number::Integer(i)) => serializer.serialize_i64(*i),
            Value::Number(Number::Float(f)) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::Sequence(seq) => {
                use serde::ser::SerializeSeq;
                let mut out = serializer.serialize_seq(Some(seq.len()))?;
                for element in seq {
                    out.serialize_element(element)?;
                }
                out.end()
            }
            Value::Mapping(map) => {
                use serde::ser::SerializeMap;
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map.iter() {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }
            Value::Timestamp(ts) => serializer.serialize_str(&format_timestamp(ts)),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        ValueSeed::default().deserialize(deserializer)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Number(Number::Float(f64::from(value)))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(Number::Float(value))
    }
}

impl From<Number> for Value {
    fn from(value: Number) -> Self {
        Value::Number(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Sequence(value)
    }
}

impl From<Mapping> for Value {
    fn from(value: Mapping) -> Self {
        Value::Mapping(value)
    }
}

impl From<Timestamp> for Value {
    fn from(value: Timestamp) -> Self {
        Value::Timestamp(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> FromIterator<T> for Value {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Value::Sequence(iter.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(key: &Key) -> u64 {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_numeric_equality() {
        assert_eq!(Number::Integer(1), Number::Float(1.0));
        assert_eq!(Number::Float(1.0), Number::Integer(1));
        assert_ne!(Number::Integer(1), Number::Float(1.5));
        assert_ne!(Number::Float(f64::NAN), Number::Float(f64::NAN));
    }

    #[test]
    fn test_number_display() {
        assert_eq!(Number::Integer(-7).to_string(), "-7");
        assert_eq!(Number::Float(1.0).to_string(), "1");
        assert_eq!(Number::Float(0.25).to_string(), "0.25");
    }

    #[test]
    fn test_key_hash_agrees_with_eq() {
        let int = Key::Number(Number::Integer(3));
        let float = Key::Number(Number::Float(3.0));
        assert_eq!(int, float);
        assert_eq!(hash_of(&int), hash_of(&float));
        assert_ne!(Key::Bool(true), Key::from("true"));
    }

    #[test]
    fn test_key_from_value() {
        assert_eq!(Key::from_value(Value::from("a")), Key::from("a"));
        assert_eq!(Key::from_value(Value::Null), Key::Null);
        assert!(Key::from_value(Value::Sequence(vec![])).is_composite());
        assert_eq!(Key::from(true).into_value(), Value::Bool(true));
    }

    #[test]
    fn test_parse_timestamp() {
        let ts = parse_timestamp("1979-05-27T07:32:00Z").unwrap();
        assert_eq!(format_timestamp(&ts), "1979-05-27T07:32:00Z");

        let ts = parse_timestamp("2006-01-02T15:04:05.999999999-07:00").unwrap();
        assert_eq!(ts.offset().local_minus_utc(), -7 * 3600);
        assert_eq!(
            format_timestamp(&ts),
            "2006-01-02T15:04:05.999999999-07:00"
        );

        assert!(parse_timestamp("2006-01-02").is_none());
        assert!(parse_timestamp("not a timestamp at all").is_none());
        assert!(parse_timestamp("1979-05-27T07:32:00").is_none());
    }

    #[test]
    fn test_accessors() {
        let v = Value::from(vec![Value::from(1), Value::from("x")]);
        assert!(v.is_sequence());
        assert_eq!(v.as_sequence().map(<[Value]>::len), Some(2));
        assert_eq!(v.kind(), "sequence");
        assert!(!v.is_scalar());
        assert_eq!(Value::from(2.5).as_f64(), Some(2.5));
        assert_eq!(Value::from(Some("a")), Value::from("a"));
        assert_eq!(Value::from(None::<&str>), Value::Null);
    }

    #[test]
    fn test_from_iterator() {
        let v: Value = vec!["a", "b"].into_iter().collect();
        assert_eq!(v, Value::Sequence(vec![Value::from("a"), Value::from("b")]));
    }

    #[test]
    fn test_display() {
        let v = Value::from(vec![Value::from(1), Value::Null, Value::from(true)]);
        assert_eq!(v.to_string(), "[1,null,true]");
    }
}
