use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Host-persisted per-wrapper settings, keyed by descriptor id.
///
/// The host stores and restores this table as part of its own configuration;
/// the registry hands each fragment unchanged to the owning wrapper's
/// factory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WrapperSettings {
    entries: BTreeMap<String, toml::Value>,
}

impl WrapperSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&toml::Value> {
        self.entries.get(id)
    }

    pub fn insert(&mut self, id: impl Into<String>, value: toml::Value) {
        self.entries.insert(id.into(), value);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
