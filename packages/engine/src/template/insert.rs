use std::collections::{BTreeMap, BTreeSet};

use tracing::info;

use crate::catalog::{Operation, Parameter, ServiceCatalog};
use crate::config::{EngineConfig, TemplateConfig};
use crate::errors;
use crate::EngineError;

use super::{
    PrettyPrinter, SchemaRequestTemplateVisitor, TemplatedProduct, REQUEST_BODY_BASE_KEY,
    REQUEST_BODY_KEY_PREFIX,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertColumn {
    pub name: String,
    pub column: String,
    pub expression: String,
    pub placeholder: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InsertTemplate {
    pub columns: Vec<InsertColumn>,
}

impl InsertTemplate {
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|column| column.name.as_str()).collect()
    }

    // `%s` is left for the table name, substituted by a later stage.
    pub fn render(&self) -> String {
        let placeholders: Vec<&str> = self
            .columns
            .iter()
            .map(|column| column.placeholder.as_str())
            .collect();
        let columns: Vec<&str> = self
            .columns
            .iter()
            .map(|column| column.column.as_str())
            .collect();
        let expressions: Vec<&str> = self
            .columns
            .iter()
            .map(|column| column.expression.as_str())
            .collect();
        format!(
            "<<<jsonnet\n{{\n{}\n}}\n>>>\nINSERT INTO %s(\n{}\n)\nSELECT\n{}\n;\n",
            placeholders.join(",\n"),
            columns.join(",\n"),
            expressions.join(",\n")
        )
    }
}

pub struct InsertStatementCompiler<'a> {
    catalog: &'a ServiceCatalog,
    template_config: TemplateConfig,
    printer: PrettyPrinter,
    placeholder_printer: PrettyPrinter,
}

impl<'a> InsertStatementCompiler<'a> {
    pub fn new(catalog: &'a ServiceCatalog, config: &EngineConfig) -> Self {
        Self {
            catalog,
            template_config: config.template.clone(),
            printer: PrettyPrinter::new(config.pretty_printer.clone()),
            placeholder_printer: PrettyPrinter::new(config.pretty_printer.clone()),
        }
    }

    pub fn with_placeholder_printer(mut self, placeholder_printer: PrettyPrinter) -> Self {
        self.placeholder_printer = placeholder_printer;
        self
    }

    pub fn to_insert_statement(
        &self,
        columns: Option<&[String]>,
        operation: &Operation,
        extended: bool,
        required_only: bool,
    ) -> Result<String, EngineError> {
        self.compile(columns, operation, extended, required_only)
            .map(|template| template.render())
    }

    pub fn compile(
        &self,
        columns: Option<&[String]>,
        operation: &Operation,
        extended: bool,
        required_only: bool,
    ) -> Result<InsertTemplate, EngineError> {
        let mut resolved: BTreeSet<&str> = BTreeSet::new();
        let parameters: BTreeMap<&str, &Parameter> = match columns {
            None if extended => operation.non_body_parameters(),
            None => {
                let mut required = operation.required_parameters();
                required.retain(|name, _| !name.starts_with(REQUEST_BODY_KEY_PREFIX));
                required
            }
            Some(columns) => columns
                .iter()
                .filter(|column| !is_body_param(column))
                .filter_map(|column| {
                    operation
                        .parameter(column)
                        .map(|parameter| (column.as_str(), parameter))
                })
                .collect(),
        };
        resolved.extend(parameters.keys().copied());

        let mut template = InsertTemplate::default();
        for (name, parameter) in &parameters {
            template.columns.push(self.parameter_column(name, parameter));
        }

        if let Some(schema) = operation.request_body_schema(self.catalog)? {
            let mut visitor = SchemaRequestTemplateVisitor::new(
                self.template_config.clone(),
                &self.printer,
                &self.placeholder_printer,
                required_only,
            );
            let products = visitor.retrieve_template(schema, operation, extended)?;
            info!(
                operation = operation.name.as_str(),
                fields = ?products.keys().collect::<Vec<_>>(),
                "request body template resolved"
            );

            match columns {
                Some(columns) => {
                    for column in columns {
                        let Some(suffix) = column.strip_prefix(REQUEST_BODY_BASE_KEY) else {
                            continue;
                        };
                        if let Some(product) = products.get(suffix) {
                            template.columns.push(self.body_column(column, product));
                            resolved.insert(column.as_str());
                        }
                    }
                }
                None => {
                    for (field, product) in &products {
                        let name = format!("{REQUEST_BODY_BASE_KEY}{field}");
                        template.columns.push(self.body_column(&name, product));
                    }
                }
            }
        }

        match columns {
            Some(columns) => check_all_columns_present(columns, &resolved)?,
            None => template
                .columns
                .sort_by(|left, right| left.name.cmp(&right.name)),
        }
        Ok(template)
    }

    fn parameter_column(&self, name: &str, parameter: &Parameter) -> InsertColumn {
        let expression = if parameter.is_string() {
            self.printer.render_template_var_and_delimit(name)
        } else {
            self.printer.render_template_var_no_delimit(name)
        };
        InsertColumn {
            name: name.to_string(),
            column: self.printer.render_column_name(name),
            expression,
            placeholder: self.placeholder_printer.render_placeholder_binding(name),
        }
    }

    fn body_column(&self, name: &str, product: &TemplatedProduct) -> InsertColumn {
        InsertColumn {
            name: name.to_string(),
            column: self.printer.render_column_name(name),
            expression: product.body().to_string(),
            placeholder: product.placeholder().to_string(),
        }
    }
}

fn is_body_param(name: &str) -> bool {
    name.starts_with(REQUEST_BODY_BASE_KEY)
}

fn check_all_columns_present(
    columns: &[String],
    resolved: &BTreeSet<&str>,
) -> Result<(), EngineError> {
    let missing: Vec<String> = columns
        .iter()
        .filter(|column| !resolved.contains(column.as_str()))
        .cloned()
        .collect();
    if missing.is_empty() {
        return Ok(());
    }
    Err(errors::unresolved_columns_error(&missing))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PrettyPrinterConfig;

    fn catalog() -> ServiceCatalog {
        ServiceCatalog::from_json_str(
            r##"{
                "name": "compute",
                "schemas": {
                    "Instance": {
                        "type": "object",
                        "properties": {
                            "name": { "type": "string" },
                            "canIpForward": { "type": "boolean" }
                        }
                    }
                },
                "operations": {
                    "insert": {
                        "parameters": {
                            "zone": { "in": "path", "required": true },
                            "project": { "in": "path", "required": true },
                            "maxResults": { "in": "query", "type": "integer" },
                            "data__name": { "in": "body", "required": true },
                            "dataset": { "in": "query" }
                        },
                        "requestBody": {
                            "schema": { "$ref": "#/components/schemas/Instance" }
                        }
                    },
                    "get": {
                        "parameters": {
                            "zone": { "in": "path", "required": true },
                            "instance": { "in": "path", "required": true }
                        }
                    }
                }
            }"##,
        )
        .expect("parse catalog")
    }

    fn config() -> EngineConfig {
        EngineConfig {
            pretty_printer: PrettyPrinterConfig {
                indent_width: 2,
                initial_offset: 2,
            },
            ..EngineConfig::default()
        }
    }

    #[test]
    fn renders_exact_statement_without_request_body() {
        let catalog = catalog();
        let config = config();
        let compiler = InsertStatementCompiler::new(&catalog, &config);
        let operation = catalog.operation("get").expect("get");

        let statement = compiler
            .to_insert_statement(None, operation, false, false)
            .expect("compile insert");

        assert_eq!(
            statement,
            "<<<jsonnet\n{\n  instance: << instance >>,\n  zone: << zone >>\n}\n>>>\n\
             INSERT INTO %s(\n  instance,\n  zone\n)\nSELECT\n  '{{ .values.instance }}',\n  '{{ .values.zone }}'\n;\n"
        );
    }

    #[test]
    fn required_parameters_drop_body_prefixed_names() {
        let catalog = catalog();
        let config = config();
        let compiler = InsertStatementCompiler::new(&catalog, &config);
        let operation = catalog.operation("insert").expect("insert");

        let template = compiler
            .compile(None, operation, false, false)
            .expect("compile insert");

        assert_eq!(
            template.column_names(),
            vec!["data__canIpForward", "data__name", "project", "zone"]
        );
    }

    #[test]
    fn extended_includes_optional_parameters_in_sorted_order() {
        let catalog = catalog();
        let config = config();
        let compiler = InsertStatementCompiler::new(&catalog, &config);
        let operation = catalog.operation("insert").expect("insert");

        let template = compiler
            .compile(None, operation, true, false)
            .expect("compile insert");

        assert_eq!(
            template.column_names(),
            vec![
                "data__canIpForward",
                "data__name",
                "dataset",
                "maxResults",
                "project",
                "zone"
            ]
        );
        let max_results = template
            .columns
            .iter()
            .find(|column| column.name == "maxResults")
            .expect("maxResults column");
        assert_eq!(max_results.expression, "  {{ .values.maxResults }}");
    }

    #[test]
    fn explicit_columns_list_parameters_before_body_fields() {
        let catalog = catalog();
        let config = config();
        let compiler = InsertStatementCompiler::new(&catalog, &config);
        let operation = catalog.operation("insert").expect("insert");
        let columns = vec![
            "zone".to_string(),
            "data__name".to_string(),
            "project".to_string(),
        ];

        let template = compiler
            .compile(Some(&columns), operation, false, false)
            .expect("compile insert");

        assert_eq!(template.column_names(), vec!["project", "zone", "data__name"]);
        let name = &template.columns[2];
        assert_eq!(name.expression, "  '{{ .values.data__name }}'");
        assert_eq!(name.placeholder, "  data__name: << data__name >>");
    }

    #[test]
    fn unresolved_columns_are_all_reported() {
        let catalog = catalog();
        let config = config();
        let compiler = InsertStatementCompiler::new(&catalog, &config);
        let operation = catalog.operation("insert").expect("insert");
        let columns = vec![
            "zone".to_string(),
            "region".to_string(),
            "data__bogus".to_string(),
        ];

        let error = compiler
            .to_insert_statement(Some(&columns), operation, false, false)
            .expect_err("unknown columns should fail");

        assert_eq!(error.code, "SQLAPI_ERROR_UNRESOLVED_COLUMN");
        assert_eq!(
            error.message,
            "cannot find the following columns: region, data__bogus"
        );
    }
}
