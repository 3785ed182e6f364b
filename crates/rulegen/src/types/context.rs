use std::collections::{BTreeMap, BTreeSet};
use std::collections::btree_map::Iter;

use serde::{Deserialize, Serialize};

use super::Value;

/// The named values available to conditions and data rules during one
/// generation run.
///
/// Keys are kept in sorted order so that iteration, serialization and error
/// reports are deterministic. The engine only ever reads a context.
///
/// # Example
///
/// ```
/// use rulegen::{DataContext, Value};
///
/// let mut data = DataContext::new();
/// data.insert("first name", "Ada");
/// data.insert("age", 36);
///
/// assert_eq!(data.get("age"), Some(&Value::Number(36.0)));
/// assert!(data.contains_key("first name"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataContext {
    values: BTreeMap<String, Value>,
}

impl DataContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    /// Look up a value by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Whether the context has a value for `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Iterate over the keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// The set of keys, as consumed by [`validate_rules`](crate::validate_rules).
    pub fn key_set(&self) -> BTreeSet<String> {
        self.values.keys().cloned().collect()
    }

    /// Iterate over key/value pairs in sorted key order.
    pub fn iter(&self) -> Iter<'_, String, Value> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for DataContext {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a DataContext {
    type Item = (&'a String, &'a Value);
    type IntoIter = Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}
