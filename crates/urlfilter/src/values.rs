//! Raw query values.
//!
//! [`Values`] is the multimap handed to decoders: every key maps to the list
//! of raw strings supplied for it, in the order they were supplied.

use std::collections::{btree_map, BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::scan;

/// Ordered multimap of query keys to raw string values.
///
/// # Example
///
/// ```
/// use urlfilter::Values;
///
/// let values: Values = [("id", "5"), ("tag", "a"), ("tag", "b")].into_iter().collect();
///
/// assert_eq!(values.first("id"), Some("5"));
/// assert_eq!(values.strings("tag"), ["a", "b"]);
/// assert_eq!(values.int("id").unwrap(), 5);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Values(BTreeMap<String, Vec<String>>);

impl Values {
    /// Creates an empty set of values.
    pub fn new() -> Self {
        Values(BTreeMap::new())
    }

    /// Replaces the values of `key`, returning the previous ones.
    pub fn insert(&mut self, key: impl Into<String>, values: Vec<String>) -> Option<Vec<String>> {
        self.0.insert(key.into(), values)
    }

    /// Appends a single value to `key`.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.entry(key.into()).or_default().push(value.into());
    }

    /// Returns all values of `key`.
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.0.get(key).map(Vec::as_slice)
    }

    /// Returns the first value of `key`.
    pub fn first(&self, key: &str) -> Option<&str> {
        self.get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns the first value of `key`, or `""` when it is absent.
    pub fn string(&self, key: &str) -> &str {
        self.first(key).unwrap_or_default()
    }

    /// Returns all values of `key`, or an empty slice when it is absent.
    pub fn strings(&self, key: &str) -> &[String] {
        self.get(key).unwrap_or_default()
    }

    /// Parses the first value of `key` as a boolean. Absent or empty is `false`.
    pub fn bool(&self, key: &str) -> Result<bool> {
        match self.first(key) {
            None | Some("") => Ok(false),
            Some(raw) => scan::parse_bool(raw).map_err(|source| Error::Scan {
                key: key.to_string(),
                source,
            }),
        }
    }

    /// Parses the first value of `key` as an integer. Absent or empty is `0`.
    pub fn int(&self, key: &str) -> Result<i64> {
        match self.first(key) {
            None | Some("") => Ok(0),
            Some(raw) => scan::parse_value::<i64>(raw).map_err(|source| Error::Scan {
                key: key.to_string(),
                source,
            }),
        }
    }

    /// Returns `true` if `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Returns the number of distinct keys.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no keys.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over keys and their values in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0
            .iter()
            .map(|(key, values)| (key.as_str(), values.as_slice()))
    }

    /// Iterates over the keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl<K, V> FromIterator<(K, V)> for Values
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut values = Values::new();
        values.extend(iter);
        values
    }
}

impl<K, V> Extend<(K, V)> for Values
where
    K: Into<String>,
    V: Into<String>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.append(key, value);
        }
    }
}

impl From<BTreeMap<String, Vec<String>>> for Values {
    fn from(map: BTreeMap<String, Vec<String>>) -> Self {
        Values(map)
    }
}

impl From<HashMap<String, Vec<String>>> for Values {
    fn from(map: HashMap<String, Vec<String>>) -> Self {
        Values(map.into_iter().collect())
    }
}

impl From<Values> for BTreeMap<String, Vec<String>> {
    fn from(values: Values) -> Self {
        values.0
    }
}

impl IntoIterator for Values {
    type Item = (String, Vec<String>);
    type IntoIter = btree_map::IntoIter<String, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Values {
        [
            ("id", "5"),
            ("name", "bob"),
            ("tag", "a"),
            ("tag", "b"),
            ("empty", ""),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn collect_appends_repeated_keys() {
        let values = sample();
        assert_eq!(values.len(), 4);
        assert_eq!(values.strings("tag"), ["a", "b"]);
    }

    #[test]
    fn string_accessors() {
        let values = sample();
        assert_eq!(values.first("name"), Some("bob"));
        assert_eq!(values.string("name"), "bob");
        assert_eq!(values.string("missing"), "");
        assert!(values.strings("missing").is_empty());
        assert_eq!(values.get("missing"), None);
    }

    #[test]
    fn int_accessor() {
        let values = sample();
        assert_eq!(values.int("id").unwrap(), 5);
        assert_eq!(values.int("missing").unwrap(), 0);
        assert_eq!(values.int("empty").unwrap(), 0);

        let err = values.int("name").unwrap_err();
        assert!(matches!(err, Error::Scan { ref key, .. } if key == "name"));
    }

    #[test]
    fn bool_accessor() {
        let values: Values = [("a", "true"), ("b", "0"), ("c", "yes")].into_iter().collect();
        assert!(values.bool("a").unwrap());
        assert!(!values.bool("b").unwrap());
        assert!(!values.bool("missing").unwrap());
        assert!(values.bool("c").is_err());
    }

    #[test]
    fn insert_replaces() {
        let mut values = sample();
        let old = values.insert("tag", vec!["c".to_string()]);
        assert_eq!(old, Some(vec!["a".to_string(), "b".to_string()]));
        assert_eq!(values.strings("tag"), ["c"]);
    }

    #[test]
    fn iteration_is_key_ordered() {
        let values = sample();
        let keys: Vec<&str> = values.keys().collect();
        assert_eq!(keys, ["empty", "id", "name", "tag"]);
    }
}
