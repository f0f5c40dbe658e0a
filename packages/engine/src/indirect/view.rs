use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use sqlparser::ast::{Query, Statement};
use tracing::debug;

use crate::catalog::Parameter;
use crate::errors;
use crate::sql::{parse_query, relation_names, statement_kind, PreparedStatementCtx};
use crate::types::ColumnMetadata;
use crate::EngineError;

use super::{Indirect, IndirectType, SymTab, TableParameterCollection};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewDefinition {
    pub name: String,
    pub raw_query: String,
}

impl ViewDefinition {
    pub fn new(name: impl Into<String>, raw_query: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            raw_query: raw_query.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct View {
    definition: ViewDefinition,
    select_statement: Option<Query>,
    select_context: Option<PreparedStatementCtx>,
    assigned_parameters: Option<TableParameterCollection>,
    underlying_symtab: SymTab,
}

impl View {
    pub fn new(definition: ViewDefinition) -> Self {
        Self {
            definition,
            select_statement: None,
            select_context: None,
            assigned_parameters: None,
            underlying_symtab: SymTab::new(),
        }
    }

    pub fn definition(&self) -> &ViewDefinition {
        &self.definition
    }

    pub fn referenced_relations(&self) -> BTreeSet<String> {
        self.select_statement
            .as_ref()
            .map(relation_names)
            .unwrap_or_default()
    }
}

impl Indirect for View {
    fn indirect_type(&self) -> IndirectType {
        IndirectType::View
    }

    fn name(&self) -> &str {
        &self.definition.name
    }

    // Re-parses from the raw query on every call.
    fn parse(&mut self) -> Result<(), EngineError> {
        let statement = parse_query(&self.definition.raw_query)
            .map_err(|error| errors::view_parse_error(&self.definition.name, &error.message))?;
        match statement {
            Statement::Query(query) => {
                debug!(view = self.definition.name.as_str(), "parsed view select");
                self.select_statement = Some(*query);
                Ok(())
            }
            other => Err(errors::view_not_select_error(
                &self.definition.name,
                statement_kind(&other),
            )),
        }
    }

    fn select_ast(&self) -> Option<&Query> {
        self.select_statement.as_ref()
    }

    fn columns(&self) -> &[ColumnMetadata] {
        self.select_context
            .as_ref()
            .map(PreparedStatementCtx::non_control_columns)
            .unwrap_or_default()
    }

    fn column_by_name(&self, name: &str) -> Option<&ColumnMetadata> {
        self.columns()
            .iter()
            .find(|column| column.identifier() == name)
    }

    fn set_select_context(&mut self, select_context: PreparedStatementCtx) {
        self.select_context = Some(select_context);
    }

    fn select_context(&self) -> Option<&PreparedStatementCtx> {
        self.select_context.as_ref()
    }

    fn assigned_parameters(&self) -> Option<&TableParameterCollection> {
        self.assigned_parameters.as_ref()
    }

    fn set_assigned_parameters(&mut self, parameters: TableParameterCollection) {
        self.assigned_parameters = Some(parameters);
    }

    fn underlying_symtab(&self) -> &SymTab {
        &self.underlying_symtab
    }

    fn set_underlying_symtab(&mut self, symtab: SymTab) {
        self.underlying_symtab = symtab;
    }

    fn required_parameters(&self) -> BTreeMap<String, Parameter> {
        BTreeMap::new()
    }

    fn optional_parameters(&self) -> BTreeMap<String, Parameter> {
        BTreeMap::new()
    }
}
