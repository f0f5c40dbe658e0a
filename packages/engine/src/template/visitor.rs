use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::catalog::{Operation, Schema, SchemaKind};
use crate::config::TemplateConfig;
use crate::errors;
use crate::EngineError;

use super::{PrettyPrinter, TemplateNode, TemplatedProduct, REQUEST_BODY_BASE_KEY};

// Field name given to a bare map payload (object with only additionalProperties).
const ADDITIONAL_PROPERTIES_FIELD: &str = "k1";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RenderMode {
    Body,
    Placeholder,
}

impl RenderMode {
    fn root_key(self, field_key: &str) -> String {
        match self {
            Self::Body => format!(".values.{field_key}"),
            Self::Placeholder => field_key.to_string(),
        }
    }

    // Placeholders always bind the last path segment, never the dotted prefix.
    fn template_name(self, object_key: &str) -> String {
        match self {
            Self::Body => object_key.to_string(),
            Self::Placeholder => object_key
                .rsplit('.')
                .next()
                .unwrap_or(object_key)
                .to_string(),
        }
    }

    fn delimit(self, path: &str) -> String {
        match self {
            Self::Body => format!("{{{{ {path} }}}}"),
            Self::Placeholder => format!("<< {path} >>"),
        }
    }

    fn leaf(self, path: &str, is_string: bool) -> TemplateNode {
        TemplateNode::leaf(self.delimit(path), is_string && self == Self::Body)
    }
}

#[derive(Debug, Clone, Default)]
struct VisitPath {
    visited: BTreeSet<String>,
    depth: usize,
}

impl VisitPath {
    fn rooted_at(key: &str) -> Self {
        Self {
            visited: BTreeSet::from([key.to_string()]),
            depth: 0,
        }
    }

    fn descend(&self) -> Self {
        Self {
            visited: self.visited.clone(),
            depth: self.depth + 1,
        }
    }

    fn contains(&self, key: &str) -> bool {
        self.visited.contains(key)
    }
}

pub struct SchemaRequestTemplateVisitor<'p> {
    config: TemplateConfig,
    printer: &'p PrettyPrinter,
    placeholder_printer: &'p PrettyPrinter,
    required_only: bool,
    resolved: BTreeSet<String>,
}

impl<'p> SchemaRequestTemplateVisitor<'p> {
    pub fn new(
        config: TemplateConfig,
        printer: &'p PrettyPrinter,
        placeholder_printer: &'p PrettyPrinter,
        required_only: bool,
    ) -> Self {
        Self {
            config,
            printer,
            placeholder_printer,
            required_only,
            resolved: BTreeSet::new(),
        }
    }

    pub fn retrieve_template(
        &mut self,
        schema: Schema<'_>,
        operation: &Operation,
        extended: bool,
    ) -> Result<BTreeMap<String, TemplatedProduct>, EngineError> {
        debug!(
            schema = schema.name(),
            operation = operation.name.as_str(),
            extended,
            "retrieving request body template"
        );
        self.resolved.insert(schema.name().to_string());
        if schema.kind() != SchemaKind::Object {
            return Err(errors::unsupported_payload_shape_error(schema.name()));
        }

        let properties = schema.properties()?;
        let products = self.process_properties(&schema, operation, &properties)?;
        if !products.is_empty() {
            return Ok(products);
        }
        let Some(additional) = schema.additional_properties()? else {
            return Ok(products);
        };
        self.process_properties(
            &schema,
            operation,
            &[(ADDITIONAL_PROPERTIES_FIELD, additional)],
        )
    }

    fn is_visited(&self, key: &str, path: &VisitPath) -> bool {
        path.contains(key) || self.resolved.contains(key)
    }

    fn process_properties(
        &self,
        owner: &Schema<'_>,
        operation: &Operation,
        properties: &[(&str, Schema<'_>)],
    ) -> Result<BTreeMap<String, TemplatedProduct>, EngineError> {
        let mut products = BTreeMap::new();
        for (key, property) in properties {
            if !key.is_empty() && self.resolved.contains(*key) {
                continue;
            }
            if !operation.is_required_request_body_property(key)
                && (property.is_read_only() || (self.required_only && !owner.is_required(key)))
            {
                debug!(property = *key, "property will be skipped");
                continue;
            }

            let path = VisitPath::rooted_at(key);
            let field_key = format!("{REQUEST_BODY_BASE_KEY}{key}");
            let Some(body) = self.render(
                *property,
                RenderMode::Body,
                &RenderMode::Body.root_key(&field_key),
                path.clone(),
            )?
            else {
                continue;
            };
            let Some(placeholder) = self.render(
                *property,
                RenderMode::Placeholder,
                &RenderMode::Placeholder.root_key(&field_key),
                path,
            )?
            else {
                continue;
            };

            let placeholder_text = format!(
                "{}: {}",
                self.placeholder_printer.render_placeholder_key(&field_key),
                self.placeholder_printer.print_placeholder(&placeholder)
            );
            products.insert(
                key.to_string(),
                TemplatedProduct::new(self.printer.print_templated(&body), placeholder_text),
            );
        }
        Ok(products)
    }

    fn render(
        &self,
        schema: Schema<'_>,
        mode: RenderMode,
        object_key: &str,
        path: VisitPath,
    ) -> Result<Option<TemplateNode>, EngineError> {
        let name = mode.template_name(object_key);
        if self.config.enforce_max_depth && path.depth > self.config.max_depth {
            debug!(path = object_key, depth = path.depth, "maximum template depth reached");
            return Ok(Some(mode.leaf(&name, true)));
        }

        match schema.kind() {
            SchemaKind::Object => {
                let mut fields = BTreeMap::new();
                for (key, property) in schema.properties()? {
                    let cycle_key = property.cycle_key();
                    if property.kind() == SchemaKind::Array
                        && cycle_key.is_some_and(|cycle_key| self.is_visited(cycle_key, &path))
                    {
                        debug!(path = object_key, property = key, "array schema already visited");
                        continue;
                    }
                    let mut property_path = path.descend();
                    if let Some(cycle_key) = cycle_key {
                        if path.contains(cycle_key) {
                            debug!(path = object_key, schema = cycle_key, "schema cycle cut");
                            return Ok(Some(mode.leaf(&name, true)));
                        }
                        property_path.visited.insert(cycle_key.to_string());
                    }
                    let child_key = format!("{name}.{key}");
                    if let Some(rendered) = self.render(property, mode, &child_key, property_path)? {
                        fields.insert(key.to_string(), rendered);
                    }
                }
                if fields.is_empty() {
                    if let Some(additional) = schema.additional_properties()? {
                        synthesize_map_entry(additional, mode, &name, &mut fields)?;
                    }
                }
                Ok((!fields.is_empty()).then_some(TemplateNode::Mapping(fields)))
            }
            SchemaKind::Array => {
                let items = schema.items()?;
                let mut item_path = path.descend();
                if let Some(cycle_key) = items.cycle_key() {
                    if path.contains(cycle_key) {
                        debug!(path = object_key, schema = cycle_key, "array item cycle cut");
                        return Ok(Some(mode.leaf(&name, true)));
                    }
                    item_path.visited.insert(cycle_key.to_string());
                }
                let item = self.render(items, mode, &format!("{name}[0]"), item_path)?;
                Ok(Some(TemplateNode::Sequence(item.into_iter().collect())))
            }
            SchemaKind::String => Ok(Some(mode.leaf(&name, true))),
            SchemaKind::Scalar(_) => Ok(Some(mode.leaf(&name, false))),
        }
    }
}

// A map is represented by exactly one illustrative `[0]` entry.
fn synthesize_map_entry(
    additional: Schema<'_>,
    mode: RenderMode,
    name: &str,
    fields: &mut BTreeMap<String, TemplateNode>,
) -> Result<(), EngineError> {
    let value_properties = additional.properties()?;
    if value_properties.is_empty() {
        fields.insert(
            mode.delimit(&format!("{name}[0].key")),
            map_value_leaf(additional, mode, name),
        );
        return Ok(());
    }
    for (key, property) in value_properties {
        let key = if key.is_empty() { "key" } else { key };
        fields.insert(
            mode.delimit(&format!("{name}[0].{key}")),
            map_value_leaf(property, mode, name),
        );
    }
    Ok(())
}

fn map_value_leaf(value: Schema<'_>, mode: RenderMode, name: &str) -> TemplateNode {
    mode.leaf(
        &format!("{name}[0].val"),
        value.kind() == SchemaKind::String,
    )
}
