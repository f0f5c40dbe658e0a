mod params;
mod symtab;
mod view;

use std::collections::BTreeMap;

use sqlparser::ast::Query;

use crate::catalog::Parameter;
use crate::sql::PreparedStatementCtx;
use crate::types::ColumnMetadata;
use crate::EngineError;

pub use params::TableParameterCollection;
pub use symtab::{SymTab, SymTabEntry};
pub use view::{View, ViewDefinition};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndirectType {
    View,
}

pub trait Indirect {
    fn indirect_type(&self) -> IndirectType;
    fn name(&self) -> &str;
    fn parse(&mut self) -> Result<(), EngineError>;
    fn select_ast(&self) -> Option<&Query>;
    fn columns(&self) -> &[ColumnMetadata];
    fn column_by_name(&self, name: &str) -> Option<&ColumnMetadata>;
    fn set_select_context(&mut self, select_context: PreparedStatementCtx);
    fn select_context(&self) -> Option<&PreparedStatementCtx>;
    fn assigned_parameters(&self) -> Option<&TableParameterCollection>;
    fn set_assigned_parameters(&mut self, parameters: TableParameterCollection);
    fn underlying_symtab(&self) -> &SymTab;
    fn set_underlying_symtab(&mut self, symtab: SymTab);
    fn required_parameters(&self) -> BTreeMap<String, Parameter>;
    fn optional_parameters(&self) -> BTreeMap<String, Parameter>;
}
