use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::EngineError;

use super::{Schema, SchemaNode, ServiceCatalog};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    #[default]
    Query,
    Header,
    Body,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    #[serde(rename = "in", default)]
    pub location: ParameterLocation,
    #[serde(rename = "type", default = "default_parameter_type")]
    pub param_type: String,
    #[serde(default)]
    pub required: bool,
}

fn default_parameter_type() -> String {
    "string".to_string()
}

impl Parameter {
    pub fn is_string(&self) -> bool {
        self.param_type == "string"
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestBody {
    pub schema: SchemaNode,
    // Body properties the operation itself forces, independent of schema `required`.
    #[serde(default)]
    pub required: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub parameters: BTreeMap<String, Parameter>,
    #[serde(default)]
    pub request_body: Option<RequestBody>,
}

impl Operation {
    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.get(name)
    }

    pub fn non_body_parameters(&self) -> BTreeMap<&str, &Parameter> {
        self.parameters
            .iter()
            .filter(|(_, parameter)| parameter.location != ParameterLocation::Body)
            .map(|(name, parameter)| (name.as_str(), parameter))
            .collect()
    }

    pub fn required_parameters(&self) -> BTreeMap<&str, &Parameter> {
        self.parameters
            .iter()
            .filter(|(_, parameter)| parameter.required)
            .map(|(name, parameter)| (name.as_str(), parameter))
            .collect()
    }

    pub fn is_required_request_body_property(&self, property: &str) -> bool {
        self.request_body
            .as_ref()
            .is_some_and(|body| body.required.iter().any(|required| required == property))
    }

    pub fn request_body_schema<'a>(
        &'a self,
        catalog: &'a ServiceCatalog,
    ) -> Result<Option<Schema<'a>>, EngineError> {
        let Some(body) = self.request_body.as_ref() else {
            return Ok(None);
        };
        Schema::resolve(catalog, &body.schema, "requestBody").map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn operation() -> Operation {
        serde_json::from_str(
            r#"{
                "name": "insert",
                "parameters": {
                    "project": { "in": "path", "required": true },
                    "zone": { "in": "path", "required": true },
                    "requestId": { "in": "query" },
                    "maxResults": { "in": "query", "type": "integer" },
                    "data__name": { "in": "body", "required": true }
                },
                "requestBody": {
                    "schema": { "type": "object", "properties": { "name": { "type": "string" } } },
                    "required": ["name"]
                }
            }"#,
        )
        .expect("parse operation")
    }

    #[test]
    fn parameter_views_split_on_location_and_required() {
        let operation = operation();
        let non_body: Vec<&str> = operation.non_body_parameters().into_keys().collect();
        assert_eq!(non_body, vec!["maxResults", "project", "requestId", "zone"]);

        let required: Vec<&str> = operation.required_parameters().into_keys().collect();
        assert_eq!(required, vec!["data__name", "project", "zone"]);

        assert!(operation.parameter("project").expect("project").is_string());
        assert!(!operation.parameter("maxResults").expect("maxResults").is_string());
    }

    #[test]
    fn required_body_properties_come_from_the_operation() {
        let operation = operation();
        assert!(operation.is_required_request_body_property("name"));
        assert!(!operation.is_required_request_body_property("description"));
        assert!(!Operation::default().is_required_request_body_property("name"));
    }

    #[test]
    fn operation_without_body_has_no_schema() {
        let catalog = ServiceCatalog::default();
        let operation = Operation::default();
        let schema = operation
            .request_body_schema(&catalog)
            .expect("resolve body schema");
        assert!(schema.is_none());
    }
}
