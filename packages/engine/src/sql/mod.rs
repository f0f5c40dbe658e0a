mod dialect;
mod parse;
mod prepared;
mod rewrite;

pub use dialect::{DrmConfig, SqlDialect, SqlSystem, StandardSqlSystem};
pub use parse::{parse_query, relation_names};
pub(crate) use parse::statement_kind;
pub use prepared::PreparedStatementCtx;
pub use rewrite::{generate_select_dml, SqlRewriteInput};
