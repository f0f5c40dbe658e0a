use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableParameterCollection {
    required: BTreeMap<String, JsonValue>,
    optional: BTreeMap<String, JsonValue>,
}

impl TableParameterCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_required(mut self, name: impl Into<String>, value: JsonValue) -> Self {
        self.required.insert(name.into(), value);
        self
    }

    pub fn with_optional(mut self, name: impl Into<String>, value: JsonValue) -> Self {
        self.optional.insert(name.into(), value);
        self
    }

    pub fn required(&self) -> &BTreeMap<String, JsonValue> {
        &self.required
    }

    pub fn optional(&self) -> &BTreeMap<String, JsonValue> {
        &self.optional
    }

    pub fn get(&self, name: &str) -> Option<&JsonValue> {
        self.required.get(name).or_else(|| self.optional.get(name))
    }

    pub fn is_empty(&self) -> bool {
        self.required.is_empty() && self.optional.is_empty()
    }
}
