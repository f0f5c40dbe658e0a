mod operation;
mod schema;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors;
use crate::EngineError;

pub use operation::{Operation, Parameter, ParameterLocation, RequestBody};
pub use schema::{AdditionalProperties, Schema, SchemaKind, SchemaNode};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceCatalog {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub schemas: BTreeMap<String, SchemaNode>,
    #[serde(default)]
    pub operations: BTreeMap<String, Operation>,
}

impl ServiceCatalog {
    pub fn from_json_str(raw: &str) -> Result<Self, EngineError> {
        let mut catalog: Self = serde_json::from_str(raw).map_err(|error| {
            errors::schema_traversal_error(format!("invalid service catalog: {error}"))
        })?;
        for (name, operation) in &mut catalog.operations {
            if operation.name.is_empty() {
                operation.name = name.clone();
            }
        }
        Ok(catalog)
    }

    pub fn schema(&self, name: &str) -> Result<Schema<'_>, EngineError> {
        let Some((key, node)) = self.schemas.get_key_value(name) else {
            return Err(errors::schema_traversal_error(format!(
                "schema '{name}' is not declared in service '{}'",
                self.name
            )));
        };
        Schema::component(self, node, key)
    }

    pub fn operation(&self, name: &str) -> Option<&Operation> {
        self.operations.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operation_names_default_to_their_keys() {
        let catalog = ServiceCatalog::from_json_str(
            r#"{ "name": "compute", "operations": { "insert": {} } }"#,
        )
        .expect("parse catalog");
        assert_eq!(
            catalog.operation("insert").expect("insert operation").name,
            "insert"
        );
        assert!(catalog.operation("delete").is_none());
    }

    #[test]
    fn malformed_catalog_is_rejected() {
        let error = ServiceCatalog::from_json_str("{ \"schemas\": [] }")
            .expect_err("schemas must be a map");
        assert_eq!(error.code, "SQLAPI_ERROR_SCHEMA_TRAVERSAL");
    }
}
