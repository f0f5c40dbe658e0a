use serde_json::Value as JsonValue;

use crate::config::PrettyPrinterConfig;

use super::TemplateNode;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrettyPrinter {
    config: PrettyPrinterConfig,
}

impl PrettyPrinter {
    pub fn new(config: PrettyPrinterConfig) -> Self {
        Self { config }
    }

    fn indentation(&self, level: usize) -> String {
        " ".repeat(self.config.initial_offset + level * self.config.indent_width)
    }

    pub fn render_column_name(&self, name: &str) -> String {
        format!("{}{name}", self.indentation(0))
    }

    pub fn render_template_var_and_delimit(&self, name: &str) -> String {
        format!("{}'{{{{ .values.{name} }}}}'", self.indentation(0))
    }

    pub fn render_template_var_no_delimit(&self, name: &str) -> String {
        format!("{}{{{{ .values.{name} }}}}", self.indentation(0))
    }

    pub fn render_placeholder_binding(&self, name: &str) -> String {
        format!("{}{name}: << {name} >>", self.indentation(0))
    }

    pub fn render_placeholder_key(&self, name: &str) -> String {
        format!("{}{name}", self.indentation(0))
    }

    // Body text sits in a SELECT list, so composites and quoted leaves become SQL string literals.
    pub fn print_templated(&self, node: &TemplateNode) -> String {
        let rendered = match node {
            TemplateNode::Leaf {
                expression,
                quoted: true,
            } => format!("'{expression}'"),
            TemplateNode::Leaf {
                expression,
                quoted: false,
            } => expression.clone(),
            composite => format!("'{}'", self.print_json(composite, 0)),
        };
        format!("{}{rendered}", self.indentation(0))
    }

    pub fn print_placeholder(&self, node: &TemplateNode) -> String {
        self.print_json(node, 0)
    }

    fn print_json(&self, node: &TemplateNode, level: usize) -> String {
        match node {
            TemplateNode::Leaf {
                expression,
                quoted: true,
            } => format!("\"{expression}\""),
            TemplateNode::Leaf {
                expression,
                quoted: false,
            } => expression.clone(),
            TemplateNode::Sequence(items) if items.is_empty() => "[]".to_string(),
            TemplateNode::Sequence(items) => {
                let inner = self.indentation(level + 1);
                let lines: Vec<String> = items
                    .iter()
                    .map(|item| format!("{inner}{}", self.print_json(item, level + 1)))
                    .collect();
                format!("[\n{}\n{}]", lines.join(",\n"), self.indentation(level))
            }
            TemplateNode::Mapping(fields) if fields.is_empty() => "{}".to_string(),
            TemplateNode::Mapping(fields) => {
                let inner = self.indentation(level + 1);
                let lines: Vec<String> = fields
                    .iter()
                    .map(|(key, value)| {
                        format!(
                            "{inner}{}: {}",
                            JsonValue::String(key.clone()),
                            self.print_json(value, level + 1)
                        )
                    })
                    .collect();
                format!("{{\n{}\n{}}}", lines.join(",\n"), self.indentation(level))
            }
        }
    }
}
