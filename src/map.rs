//! Mapping type for decoded objects, tables and YAML maps.
//!
//! [`Mapping`] wraps an [`IndexMap`] keyed by [`Key`]. Iteration follows
//! insertion order, which is the order the decoder saw the entries in, but that
//! order carries no meaning: two mappings with the same entries are equal
//! regardless of order, and encoders that need reproducible output sort the
//! entries with [`Mapping::sorted_entries`].
//!
//! ## Examples
//!
//! ```rust
//! use serde_datafmt::{Mapping, Value};
//!
//! let mut map = Mapping::new();
//! map.insert("name", Value::from("Alice"));
//! map.insert(true, Value::from(1));
//!
//! assert_eq!(map.len(), 2);
//! assert_eq!(map.get("name").and_then(|v| v.as_str()), Some("Alice"));
//! assert!(!map.has_string_keys());
//! ```

use crate::{Key, Value};
use indexmap::IndexMap;
use std::collections::HashMap;

/// A map from [`Key`] to [`Value`].
///
/// # Examples
///
/// ```rust
/// use serde_datafmt::{Mapping, Value};
///
/// let mut map = Mapping::new();
/// map.insert("b", Value::from(2));
/// map.insert("a", Value::from(1));
///
/// let keys: Vec<_> = map.sorted_entries().into_iter().map(|(k, _)| k.to_string()).collect();
/// assert_eq!(keys, vec!["a", "b"]);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mapping(IndexMap<Key, Value>);

impl Mapping {
    /// Creates an empty `Mapping`.
    #[must_use]
    pub fn new() -> Self {
        Mapping(IndexMap::new())
    }

    /// Creates an empty `Mapping` with the specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Mapping(IndexMap::with_capacity(capacity))
    }

    /// Inserts a key-value pair, returning the previous value for the key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_datafmt::{Mapping, Value};
    ///
    /// let mut map = Mapping::new();
    /// assert!(map.insert("key", Value::from(42)).is_none());
    /// assert!(map.insert("key", Value::from(43)).is_some());
    /// ```
    pub fn insert<K: Into<Key>>(&mut self, key: K, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    /// Returns the value stored under a string key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(&Key::from(key))
    }

    /// Returns the value stored under an arbitrary key.
    #[must_use]
    pub fn get_key(&self, key: &Key) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns a mutable reference to the value stored under a string key.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.0.get_mut(&Key::from(key))
    }

    /// Returns `true` if the map holds a string key equal to `key`.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(&Key::from(key))
    }

    /// Removes a string key, keeping the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.shift_remove(&Key::from(key))
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the map has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `true` if every key (not counting nested mappings) is a
    /// [`Key::String`].
    #[must_use]
    pub fn has_string_keys(&self) -> bool {
        self.0.keys().all(Key::is_string)
    }

    /// Returns an iterator over the keys, in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, Key, Value> {
        self.0.keys()
    }

    /// Returns an iterator over the values, in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, Key, Value> {
        self.0.values()
    }

    /// Returns an iterator over the entries, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, Key, Value> {
        self.0.iter()
    }

    /// Returns a mutable iterator over the entries, in insertion order.
    pub fn iter_mut(&mut self) -> indexmap::map::IterMut<'_, Key, Value> {
        self.0.iter_mut()
    }

    /// The entries ordered lexicographically by the string form of their keys.
    ///
    /// This is the order every reproducible encoder writes entries in.
    #[must_use]
    pub fn sorted_entries(&self) -> Vec<(&Key, &Value)> {
        let mut entries: Vec<_> = self.0.iter().collect();
        entries.sort_by_cached_key(|(k, _)| k.to_string());
        entries
    }
}

impl From<HashMap<String, Value>> for Mapping {
    fn from(map: HashMap<String, Value>) -> Self {
        map.into_iter().collect()
    }
}

impl From<IndexMap<String, Value>> for Mapping {
    fn from(map: IndexMap<String, Value>) -> Self {
        map.into_iter().collect()
    }
}

impl IntoIterator for Mapping {
    type Item = (Key, Value);
    type IntoIter = indexmap::map::IntoIter<Key, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Mapping {
    type Item = (&'a Key, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, Key, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<K: Into<Key>> FromIterator<(K, Value)> for Mapping {
    fn from_iter<T: IntoIterator<Item = (K, Value)>>(iter: T) -> Self {
        Mapping(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl<K: Into<Key>> Extend<(K, Value)> for Mapping {
    fn extend<T: IntoIterator<Item = (K, Value)>>(&mut self, iter: T) {
        self.0.extend(iter.into_iter().map(|(k, v)| (k.into(), v)));
    }
}
