//! Per-instance attribute state: the raw backing store plus the fully-loaded flag.

use indexmap::IndexMap;

use crate::error::{AttrError, Result};
use crate::value::AttrValue;

/// Raw attribute values of one instance.
///
/// Starts as a verbatim copy of whatever the instance was constructed with and
/// only ever grows (writes and reloads add or overwrite keys, nothing removes
/// them). `fully_loaded` starts out `false` and is only changed explicitly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeSet {
    raw: IndexMap<String, AttrValue>,
    fully_loaded: bool,
}

impl AttributeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the top-level keys of a JSON object.
    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        match value {
            serde_json::Value::Object(map) => Ok(map.into_iter().collect()),
            other => Err(AttrError::InvalidInput(format!(
                "expected a JSON object, found {}",
                AttrValue::from(other).kind()
            ))),
        }
    }

    /// Presence of the key decides, not the value: a `Nil` entry is returned.
    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        self.raw.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.raw.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<AttrValue>) {
        self.raw.insert(key.into(), value.into());
    }

    /// Insert every pair, overwriting existing keys.
    pub fn merge<I, K, V>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<AttrValue>,
    {
        for (key, value) in pairs {
            self.insert(key, value);
        }
    }

    pub fn raw(&self) -> &IndexMap<String, AttrValue> {
        &self.raw
    }

    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    pub fn is_fully_loaded(&self) -> bool {
        self.fully_loaded
    }

    pub fn set_fully_loaded(&mut self, loaded: bool) {
        self.fully_loaded = loaded;
    }
}

impl<K, V> FromIterator<(K, V)> for AttributeSet
where
    K: Into<String>,
    V: Into<AttrValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = AttributeSet::new();
        set.merge(iter);
        set
    }
}
