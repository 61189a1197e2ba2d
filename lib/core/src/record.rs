use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A source or target record: an identifier plus multi-valued properties
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Record {
    pub id: String,
    /// Property name to its values. Most properties carry a single value.
    #[serde(default)]
    pub properties: BTreeMap<String, Vec<String>>,
}

impl Record {
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            properties: BTreeMap::new(),
        }
    }

    /// Append a value to a property
    #[inline]
    #[must_use]
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.add_value(name, value);
        self
    }

    pub fn add_value(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.properties.entry(name.into()).or_default().push(value.into());
    }

    /// Values of a property, empty when the record does not carry it
    #[inline]
    pub fn values(&self, name: &str) -> &[String] {
        self.properties.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    #[inline]
    pub fn has_property(&self, name: &str) -> bool {
        !self.values(name).is_empty()
    }
}
