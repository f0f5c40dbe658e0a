use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::errors;
use crate::sql::{DrmConfig, SqlDialect, StandardSqlSystem};
use crate::EngineError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub dialect: SqlDialect,
    pub control_attributes: ControlAttributes,
    pub namespaces: NamespaceCollection,
    pub template: TemplateConfig,
    pub pretty_printer: PrettyPrinterConfig,
}

impl EngineConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, EngineError> {
        serde_json::from_str(raw)
            .map_err(|error| errors::config_error(format!("invalid engine config: {error}")))
    }

    pub fn drm_config(&self) -> DrmConfig {
        DrmConfig::new(
            self.control_attributes.clone(),
            Arc::new(StandardSqlSystem::new(
                self.dialect,
                self.control_attributes.clone(),
            )),
            self.namespaces.clone(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlAttributes {
    pub generation_id_column: String,
    pub session_id_column: String,
    pub transaction_id_column: String,
    pub insert_id_column: String,
    pub insert_encoded_id_column: String,
}

impl Default for ControlAttributes {
    fn default() -> Self {
        Self {
            generation_id_column: "iql_generation_id".to_string(),
            session_id_column: "iql_session_id".to_string(),
            transaction_id_column: "iql_txn_id".to_string(),
            insert_id_column: "iql_insert_id".to_string(),
            insert_encoded_id_column: "iql_insert_encoded".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamespaceCollection {
    pub analytics_cache_prefix: Option<String>,
    pub views_prefix: Option<String>,
}

impl NamespaceCollection {
    pub fn is_view_table(&self, table_name: &str) -> bool {
        self.views_prefix
            .as_deref()
            .is_some_and(|prefix| table_name.starts_with(prefix))
    }

    pub fn is_analytics_cache_table(&self, table_name: &str) -> bool {
        self.analytics_cache_prefix
            .as_deref()
            .is_some_and(|prefix| table_name.starts_with(prefix))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    pub max_depth: usize,
    // When unset, only cycle detection bounds the walk.
    pub enforce_max_depth: bool,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            max_depth: 2,
            enforce_max_depth: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrettyPrinterConfig {
    pub indent_width: usize,
    pub initial_offset: usize,
}

impl Default for PrettyPrinterConfig {
    fn default() -> Self {
        Self {
            indent_width: 2,
            initial_offset: 2,
        }
    }
}
