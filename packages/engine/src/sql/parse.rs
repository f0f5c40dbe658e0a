use std::collections::BTreeSet;
use std::ops::ControlFlow;

use sqlparser::ast::{visit_relations, Statement, Visit};
use sqlparser::dialect::GenericDialect;
use sqlparser::parser::Parser;

use crate::errors;
use crate::EngineError;

pub fn parse_query(raw_sql: &str) -> Result<Statement, EngineError> {
    let mut statements = Parser::parse_sql(&GenericDialect {}, raw_sql)
        .map_err(|error| errors::sql_parse_error(error.to_string()))?;
    if statements.len() != 1 {
        return Err(errors::sql_parse_error(format!(
            "expected a single statement, found {}",
            statements.len()
        )));
    }
    Ok(statements.remove(0))
}

pub(crate) fn statement_kind(statement: &Statement) -> &'static str {
    match statement {
        Statement::Query(_) => "Query",
        Statement::Insert(_) => "Insert",
        Statement::Update(_) => "Update",
        Statement::Delete(_) => "Delete",
        Statement::Merge { .. } => "Merge",
        Statement::Truncate(_) => "Truncate",
        Statement::CreateTable(_) => "CreateTable",
        Statement::CreateView(_) => "CreateView",
        Statement::CreateIndex(_) => "CreateIndex",
        Statement::AlterTable(_) => "AlterTable",
        Statement::Drop { .. } => "Drop",
        Statement::Explain { .. } => "Explain",
        _ => "Other",
    }
}

pub fn relation_names<V: Visit>(node: &V) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    let _ = visit_relations(node, |relation| {
        names.insert(relation.to_string().to_ascii_lowercase());
        ControlFlow::<()>::Continue(())
    });
    names
}
