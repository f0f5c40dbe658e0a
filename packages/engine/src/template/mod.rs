mod insert;
mod printer;
mod product;
mod visitor;

pub use insert::{InsertColumn, InsertStatementCompiler, InsertTemplate};
pub use printer::PrettyPrinter;
pub use product::{TemplateNode, TemplatedProduct};
pub use visitor::SchemaRequestTemplateVisitor;

/// Column-name prefix marking a field synthesised from the request-body schema.
pub const REQUEST_BODY_BASE_KEY: &str = "data__";
pub const REQUEST_BODY_KEY_PREFIX: &str = "data";
