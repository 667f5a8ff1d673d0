//! Rewriting mapping keys into strings.
//!
//! YAML can produce boolean, numeric and null keys; JSON and TOML cannot
//! represent them. [`normalize_keys`] walks a value and converts every key of
//! every nested mapping into its string form, descending through sequences to
//! reach mappings inside them. It is the explicit step that must run before a
//! string-keyed encoder sees a value decoded from YAML (the crate-root
//! `to_json`/`to_toml` helpers run it for you).
//!
//! ```rust
//! use serde_datafmt::{normalize_keys, yaml};
//!
//! let value = yaml("true: yes\n1: one\n").unwrap();
//! let value = normalize_keys(value).unwrap();
//!
//! let map = value.as_mapping().unwrap();
//! assert!(map.has_string_keys());
//! assert!(map.contains_key("true"));
//! assert!(map.contains_key("1"));
//! ```

use crate::{Error, Format, Key, Mapping, Result, Value};

/// Converts every mapping key in `value` to [`Key::String`].
///
/// Booleans become `"true"`/`"false"`, numbers their lexical form (`1`,
/// `2.5`) and null becomes `"null"`. Sequence order is left untouched.
/// Applying it twice gives the same result as applying it once.
///
/// When two keys of one mapping normalize to the same string (`true` and
/// `"true"`), the entry seen last wins.
///
/// # Errors
///
/// Returns [`Error::Encode`] if a mapping has a sequence or mapping as a key,
/// which has no string form. The error names JSON as the target; use
/// [`normalize_keys_for`] to name another.
pub fn normalize_keys(value: Value) -> Result<Value> {
    normalize_keys_for(value, Format::Json)
}

/// Same as [`normalize_keys`], reporting failures against `target`.
///
/// # Errors
///
/// Returns [`Error::Encode`] for composite keys.
pub fn normalize_keys_for(value: Value, target: Format) -> Result<Value> {
    match value {
        Value::Mapping(map) => normalize_mapping(map, target).map(Value::Mapping),
        Value::Sequence(seq) => seq
            .into_iter()
            .map(|v| normalize_keys_for(v, target))
            .collect::<Result<Vec<_>>>()
            .map(Value::Sequence),
        scalar => Ok(scalar),
    }
}

fn normalize_mapping(map: Mapping, target: Format) -> Result<Mapping> {
    let mut out = Mapping::with_capacity(map.len());
    for (key, value) in map {
        let name = key.to_key_string().ok_or_else(|| {
            Error::encode(target, format!("mapping key {} has no string form", key))
        })?;
        if out.insert(name.as_str(), normalize_keys_for(value, target)?).is_some() {
            tracing::warn!(key = %name, "mapping keys collapsed into one during normalization");
        }
    }
    Ok(out)
}

/// Returns `true` if every mapping in `value`, at any depth, has only string
/// keys.
#[must_use]
pub fn has_string_keys(value: &Value) -> bool {
    match value {
        Value::Mapping(map) => map.has_string_keys() && map.values().all(has_string_keys),
        Value::Sequence(seq) => seq.iter().all(has_string_keys),
        _ => true,
    }
}
