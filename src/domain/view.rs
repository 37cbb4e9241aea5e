//! Flat, ordered field views of items.

use indexmap::IndexMap;
use serde::{Serialize, Serializer};

use super::item::{fields, ItemKind};

/// Ordered field → value mapping produced by [`Item::locate`].
///
/// Tagged with the kind of the item it came from, so it can still be
/// partitioned after the `Type` field has been removed.
///
/// [`Item::locate`]: super::item::Item::locate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemView {
    kind: ItemKind,
    fields: IndexMap<String, String>,
}

impl ItemView {
    pub fn new(kind: ItemKind) -> Self {
        Self {
            kind,
            fields: IndexMap::new(),
        }
    }

    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    /// Title value, or an empty string if the field was removed.
    pub fn title(&self) -> &str {
        self.get(fields::TITLE).unwrap_or_default()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn get_mut(&mut self, field: &str) -> Option<&mut String> {
        self.fields.get_mut(field)
    }

    /// Insert or overwrite a field. An existing field keeps its position.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Remove a field, keeping the order of the rest.
    pub fn remove(&mut self, field: &str) -> Option<String> {
        self.fields.shift_remove(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for ItemView {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}
