//! Document model: field name → partition → value.

use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::value::JsonValue;

/// Partition key used by fields that are not localized.
pub const INVARIANT: &str = "iv";

/// Values of one field, keyed by partition (language code or [`INVARIANT`]).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentFieldData(IndexMap<String, JsonValue>);

impl ContentFieldData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self(IndexMap::with_capacity(capacity))
    }

    /// Field data holding a single invariant value.
    pub fn invariant(value: impl Into<JsonValue>) -> Self {
        let mut data = Self::with_capacity(1);
        data.insert(INVARIANT, value);
        data
    }

    /// Builder-style insert.
    pub fn with(mut self, partition: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.insert(partition, value);
        self
    }

    pub fn get(&self, partition: &str) -> Option<&JsonValue> {
        self.0.get(partition)
    }

    pub fn contains_key(&self, partition: &str) -> bool {
        self.0.contains_key(partition)
    }

    /// Insert or replace a partition value, keeping the position of an
    /// existing key.
    pub fn insert(&mut self, partition: impl Into<String>, value: impl Into<JsonValue>) {
        self.0.insert(partition.into(), value.into());
    }

    /// Remove a partition, keeping the order of the remaining ones.
    pub fn remove(&mut self, partition: &str) -> Option<JsonValue> {
        self.0.shift_remove(partition)
    }

    pub fn retain(&mut self, keep: impl FnMut(&String, &mut JsonValue) -> bool) {
        self.0.retain(keep);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &JsonValue)> {
        self.0.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<JsonValue>> FromIterator<(K, V)> for ContentFieldData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// A content document.
///
/// Field data is shared through [`Arc`] so unchanged fields move from input
/// to output without copying. A `None` entry is a field explicitly set to
/// null; the converter skips it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentData(IndexMap<String, Option<Arc<ContentFieldData>>>);

impl ContentData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self(IndexMap::with_capacity(capacity))
    }

    /// Builder-style insert of owned field data.
    pub fn with_field(mut self, name: impl Into<String>, data: ContentFieldData) -> Self {
        self.insert(name, Arc::new(data));
        self
    }

    pub fn get(&self, name: &str) -> Option<&Arc<ContentFieldData>> {
        self.0.get(name).and_then(Option::as_ref)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, data: Arc<ContentFieldData>) {
        self.0.insert(name.into(), Some(data));
    }

    /// Store an explicit null for a field.
    pub fn insert_null(&mut self, name: impl Into<String>) {
        self.0.insert(name.into(), None);
    }

    /// Remove a field, keeping the order of the remaining ones.
    pub fn remove(&mut self, name: &str) -> Option<Arc<ContentFieldData>> {
        self.0.shift_remove(name).flatten()
    }

    /// Mutable access to a field's data, copying it first if it is shared.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut ContentFieldData> {
        self.0
            .get_mut(name)
            .and_then(Option::as_mut)
            .map(Arc::make_mut)
    }

    /// Iterate all entries, including explicit nulls.
    pub fn iter(&self) -> impl Iterator<Item = (&String, Option<&Arc<ContentFieldData>>)> {
        self.0.iter().map(|(k, v)| (k, v.as_ref()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, ContentFieldData)> for ContentData {
    fn from_iter<I: IntoIterator<Item = (K, ContentFieldData)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), Some(Arc::new(v))))
                .collect(),
        )
    }
}
