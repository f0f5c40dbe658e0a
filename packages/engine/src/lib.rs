pub mod catalog;
pub mod config;
mod error;
mod errors;
pub mod indirect;
pub mod sql;
pub mod template;
pub mod types;

pub use catalog::ServiceCatalog;
pub use config::EngineConfig;
pub use error::EngineError;
pub use errors::ErrorCode;
pub use indirect::{Indirect, View, ViewDefinition};
pub use sql::{generate_select_dml, PreparedStatementCtx, SqlRewriteInput};
pub use template::InsertStatementCompiler;
