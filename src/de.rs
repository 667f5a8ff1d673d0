//! Building [`Value`]s from self-describing serde deserializers.
//!
//! JSON text is parsed by `serde_json`; this module supplies the visitor that
//! turns its event stream into a [`Value`]. [`ScalarRules::JSON`] widens every
//! number to [`Number::Float`]. The plain `Deserialize` impl for [`Value`]
//! uses [`ScalarRules::NATIVE`], which keeps integers as integers.

use crate::{Error, Format, Key, Mapping, Number, Value};
use serde::de::{self, DeserializeSeed, Deserializer, Visitor};
use std::fmt;

/// How scalars reported by a deserializer are mapped onto [`Value`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct ScalarRules {
    pub integers_as_float: bool,
}

impl ScalarRules {
    pub const NATIVE: ScalarRules = ScalarRules {
        integers_as_float: false,
    };

    pub const JSON: ScalarRules = ScalarRules {
        integers_as_float: true,
    };

    fn integer(self, value: i64) -> Value {
        if self.integers_as_float {
            Value::Number(Number::Float(value as f64))
        } else {
            Value::Number(Number::Integer(value))
        }
    }
}

/// Deserializes one [`Value`] under a set of [`ScalarRules`].
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct ValueSeed {
    rules: ScalarRules,
}

impl ValueSeed {
    pub(crate) const fn new(rules: ScalarRules) -> Self {
        ValueSeed { rules }
    }
}

impl<'de> DeserializeSeed<'de> for ValueSeed {
    type Value = Value;

    fn deserialize<D>(self, deserializer: D) -> Result<Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ValueVisitor { rules: self.rules })
    }
}

/// Deserializes a mapping key.
struct KeySeed {
    rules: ScalarRules,
}

impl<'de> DeserializeSeed<'de> for KeySeed {
    type Value = Key;

    fn deserialize<D>(self, deserializer: D) -> Result<Key, D::Error>
    where
        D: Deserializer<'de>,
    {
        ValueSeed::new(self.rules)
            .deserialize(deserializer)
            .map(Key::from_value)
    }
}

struct ValueVisitor {
    rules: ScalarRules,
}

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("any data value")
    }

    fn visit_bool<E>(self, value: bool) -> Result<Value, E> {
        Ok(Value::Bool(value))
    }

    fn visit_i64<E>(self, value: i64) -> Result<Value, E> {
        Ok(self.rules.integer(value))
    }

    fn visit_u64<E>(self, value: u64) -> Result<Value, E> {
        match i64::try_from(value) {
            Ok(i) => Ok(self.rules.integer(i)),
            Err(_) => Ok(Value::Number(Number::Float(value as f64))),
        }
    }

    fn visit_f64<E>(self, value: f64) -> Result<Value, E> {
        Ok(Value::Number(Number::Float(value)))
    }

    fn visit_str<E>(self, value: &str) -> Result<Value, E> {
        Ok(Value::String(value.to_string()))
    }

    fn visit_string<E>(self, value: String) -> Result<Value, E> {
        Ok(Value::String(value))
    }

    fn visit_unit<E>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        ValueSeed::new(self.rules).deserialize(deserializer)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Value, A::Error>
    where
        A: de::SeqAccess<'de>,
    {
        let mut vec = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(elem) = seq.next_element_seed(ValueSeed::new(self.rules))? {
            vec.push(elem);
        }
        Ok(Value::Sequence(vec))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Value, A::Error>
    where
        A: de::MapAccess<'de>,
    {
        let mut values = Mapping::with_capacity(map.size_hint().unwrap_or(0));
        while let Some(key) = map.next_key_seed(KeySeed { rules: self.rules })? {
            let value = map.next_value_seed(ValueSeed::new(self.rules))?;
            values.insert(key, value);
        }
        Ok(Value::Mapping(values))
    }
}

/// Checks that a decoded document has a mapping at its root.
pub(crate) fn expect_mapping(format: Format, value: Value) -> crate::Result<Value> {
    match value {
        Value::Mapping(_) => Ok(value),
        other => Err(Error::parse(
            format,
            format!("expected a mapping at document root, found {}", other.kind()),
        )),
    }
}

/// Checks that a decoded document has a sequence at its root.
pub(crate) fn expect_sequence(format: Format, value: Value) -> crate::Result<Value> {
    match value {
        Value::Sequence(_) => Ok(value),
        other => Err(Error::parse(
            format,
            format!("expected a sequence at document root, found {}", other.kind()),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json_with(rules: ScalarRules, text: &str) -> Value {
        let mut de = serde_json::Deserializer::from_str(text);
        ValueSeed::new(rules).deserialize(&mut de).unwrap()
    }

    #[test]
    fn test_root_kind_checks() {
        let seq = json_with(ScalarRules::JSON, "[1]");
        assert!(expect_sequence(Format::Json, seq.clone()).is_ok());
        let err = expect_mapping(Format::Yaml, seq).unwrap_err();
        assert!(err.is_parse());
        assert!(err.to_string().contains("found sequence"));
    }

    #[test]
    fn test_native_rules_keep_integers() {
        let v = json_with(ScalarRules::NATIVE, "[1, 2.5]");
        let seq = v.as_sequence().unwrap();
        assert!(matches!(seq[0], Value::Number(Number::Integer(1))));
        assert!(matches!(seq[1], Value::Number(Number::Float(_))));
    }

    #[test]
    fn test_json_rules_widen_integers() {
        let v = json_with(ScalarRules::JSON, "{\"one\": 1}");
        assert!(matches!(
            v.get("one"),
            Some(Value::Number(Number::Float(f))) if *f == 1.0
        ));
    }

    #[test]
    fn test_date_strings_stay_strings() {
        let date = "1979-05-27T07:32:00Z";
        let v = json_with(ScalarRules::JSON, &format!("{{\"{0}\": \"{0}\"}}", date));
        let map = v.as_mapping().unwrap();
        assert!(map.has_string_keys());
        assert_eq!(map.get(date), Some(&Value::from(date)));
    }

    #[test]
    fn test_huge_unsigned_becomes_float() {
        let v = json_with(ScalarRules::NATIVE, "18446744073709551615");
        assert!(matches!(v, Value::Number(Number::Float(_))));
    }
}
