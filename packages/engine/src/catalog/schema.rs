use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors;
use crate::EngineError;

use super::ServiceCatalog;

const COMPONENT_REF_PREFIX: &str = "#/components/schemas/";
const MAX_REF_HOPS: usize = 32;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaNode {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, SchemaNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<AdditionalProperties>,
    #[serde(default)]
    pub read_only: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    Allowed(bool),
    Schema(Box<SchemaNode>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaKind {
    Object,
    Array,
    String,
    Scalar(String),
}

impl SchemaKind {
    fn of(node: &SchemaNode) -> Self {
        match node.schema_type.as_deref() {
            Some("object") => Self::Object,
            Some("array") => Self::Array,
            Some("string") => Self::String,
            Some(other) => Self::Scalar(other.to_string()),
            None if !node.properties.is_empty() || node.additional_properties.is_some() => {
                Self::Object
            }
            None if node.items.is_some() => Self::Array,
            None => Self::Scalar(String::new()),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Schema<'a> {
    catalog: &'a ServiceCatalog,
    node: &'a SchemaNode,
    name: &'a str,
    component: Option<&'a str>,
}

impl<'a> Schema<'a> {
    pub(crate) fn resolve(
        catalog: &'a ServiceCatalog,
        node: &'a SchemaNode,
        name: &'a str,
    ) -> Result<Self, EngineError> {
        let mut current = node;
        let mut component = None;
        for _ in 0..=MAX_REF_HOPS {
            let Some(reference) = current.reference.as_deref() else {
                return Ok(Self {
                    catalog,
                    node: current,
                    name: component.unwrap_or(name),
                    component,
                });
            };
            let target = reference
                .strip_prefix(COMPONENT_REF_PREFIX)
                .unwrap_or(reference);
            let Some((key, resolved)) = catalog.schemas.get_key_value(target) else {
                return Err(errors::schema_traversal_error(format!(
                    "schema '{name}' references unknown component '{reference}'"
                )));
            };
            current = resolved;
            component = Some(key.as_str());
        }
        Err(errors::schema_traversal_error(format!(
            "schema '{name}' exceeds {MAX_REF_HOPS} reference hops"
        )))
    }

    pub(crate) fn component(
        catalog: &'a ServiceCatalog,
        node: &'a SchemaNode,
        key: &'a str,
    ) -> Result<Self, EngineError> {
        let mut schema = Self::resolve(catalog, node, key)?;
        schema.component = schema.component.or(Some(key));
        Ok(schema)
    }

    pub fn name(&self) -> &'a str {
        self.name
    }

    pub fn title(&self) -> Option<&'a str> {
        self.node.title.as_deref().filter(|title| !title.is_empty())
    }

    pub fn cycle_key(&self) -> Option<&'a str> {
        self.title().or(self.component)
    }

    pub fn kind(&self) -> SchemaKind {
        SchemaKind::of(self.node)
    }

    pub fn is_read_only(&self) -> bool {
        self.node.read_only
    }

    pub fn is_required(&self, property: &str) -> bool {
        self.node.required.iter().any(|required| required == property)
    }

    pub fn properties(&self) -> Result<Vec<(&'a str, Schema<'a>)>, EngineError> {
        self.node
            .properties
            .iter()
            .map(|(key, node)| Ok((key.as_str(), Schema::resolve(self.catalog, node, key)?)))
            .collect()
    }

    pub fn items(&self) -> Result<Schema<'a>, EngineError> {
        let Some(items) = self.node.items.as_deref() else {
            return Err(errors::schema_traversal_error(format!(
                "array schema '{}' declares no items schema",
                self.name
            )));
        };
        Schema::resolve(self.catalog, items, "items")
    }

    pub fn additional_properties(&self) -> Result<Option<Schema<'a>>, EngineError> {
        match self.node.additional_properties.as_ref() {
            Some(AdditionalProperties::Schema(node)) => {
                Schema::resolve(self.catalog, node, "additionalProperties").map(Some)
            }
            Some(AdditionalProperties::Allowed(_)) | None => Ok(None),
        }
    }
}
