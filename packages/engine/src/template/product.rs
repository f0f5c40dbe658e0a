use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplatedProduct {
    body: String,
    placeholder: String,
}

impl TemplatedProduct {
    pub fn new(body: impl Into<String>, placeholder: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            placeholder: placeholder.into(),
        }
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }
}

/// Rendered shape of one request-body field before it is printed to text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateNode {
    Leaf { expression: String, quoted: bool },
    Sequence(Vec<TemplateNode>),
    Mapping(BTreeMap<String, TemplateNode>),
}

impl TemplateNode {
    pub fn leaf(expression: impl Into<String>, quoted: bool) -> Self {
        Self::Leaf {
            expression: expression.into(),
            quoted,
        }
    }

    /// Structural paths of every node below this one, e.g. `disks[0].autoDelete`.
    pub fn field_paths(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        self.collect_field_paths("", &mut out);
        out
    }

    fn collect_field_paths(&self, prefix: &str, out: &mut BTreeSet<String>) {
        match self {
            Self::Leaf { .. } => {}
            Self::Sequence(items) => {
                for item in items {
                    let path = format!("{prefix}[0]");
                    out.insert(path.clone());
                    item.collect_field_paths(&path, out);
                }
            }
            Self::Mapping(fields) => {
                for (key, child) in fields {
                    let path = if prefix.is_empty() {
                        key.clone()
                    } else {
                        format!("{prefix}.{key}")
                    };
                    out.insert(path.clone());
                    child.collect_field_paths(&path, out);
                }
            }
        }
    }
}
