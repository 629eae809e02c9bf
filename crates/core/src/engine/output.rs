use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::schema::{Record, Value};

/// Flat key/value result of one collection run, ordered by key.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct OutputMap(BTreeMap<String, Value>);

impl OutputMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Fold `other` in; keys already present are overwritten.
    pub fn merge(&mut self, other: OutputMap) {
        for (key, value) in other.0 {
            if self.0.contains_key(&key) {
                debug!(key = %key, "later unit overwrites output key");
            }
            self.0.insert(key, value);
        }
    }
}

impl From<Record> for OutputMap {
    fn from(record: Record) -> Self {
        Self(record)
    }
}

impl FromIterator<(String, Value)> for OutputMap {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
