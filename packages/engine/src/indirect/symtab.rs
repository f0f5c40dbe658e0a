use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SymTabEntry {
    pub column_type: String,
    pub location: String,
    pub data: JsonValue,
}

impl SymTabEntry {
    pub fn new(column_type: impl Into<String>, location: impl Into<String>, data: JsonValue) -> Self {
        Self {
            column_type: column_type.into(),
            location: location.into(),
            data,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SymTab {
    symbols: BTreeMap<String, SymTabEntry>,
    leaves: BTreeMap<String, SymTab>,
}

impl SymTab {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_symbol(&mut self, key: impl Into<String>, entry: SymTabEntry) -> Option<SymTabEntry> {
        self.symbols.insert(key.into(), entry)
    }

    // Local symbols shadow anything defined in a leaf.
    pub fn get_symbol(&self, key: &str) -> Option<&SymTabEntry> {
        if let Some(entry) = self.symbols.get(key) {
            return Some(entry);
        }
        self.leaves.values().find_map(|leaf| leaf.get_symbol(key))
    }

    pub fn new_leaf(&mut self, name: impl Into<String>) -> &mut SymTab {
        self.leaves.entry(name.into()).or_default()
    }

    pub fn leaf(&self, name: &str) -> Option<&SymTab> {
        self.leaves.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty() && self.leaves.values().all(SymTab::is_empty)
    }
}
