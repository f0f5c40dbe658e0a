use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::{ControlAttributes, NamespaceCollection};
use crate::errors;
use crate::types::RelationalColumn;
use crate::EngineError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SqlDialect {
    #[default]
    Sqlite,
    Postgres,
}

impl SqlDialect {
    pub fn placeholder(self, index_1_based: usize) -> String {
        match self {
            Self::Sqlite => format!("?{index_1_based}"),
            Self::Postgres => format!("${index_1_based}"),
        }
    }
}

pub(crate) fn quote_ident(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

pub trait SqlSystem: std::fmt::Debug + Send + Sync {
    fn dialect(&self) -> SqlDialect;

    fn compose_select_query(
        &self,
        columns: &[RelationalColumn],
        table_aliases: &[String],
        from_clause: &str,
        where_clause: &str,
        suffix: &str,
    ) -> Result<String, EngineError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandardSqlSystem {
    dialect: SqlDialect,
    control_attributes: ControlAttributes,
}

impl StandardSqlSystem {
    pub fn new(dialect: SqlDialect, control_attributes: ControlAttributes) -> Self {
        Self {
            dialect,
            control_attributes,
        }
    }

    fn render_column(&self, column: &RelationalColumn) -> String {
        if let Some(decorated) = column.decorated.as_deref() {
            return decorated.to_string();
        }
        let reference = match column.table_alias.as_deref() {
            Some(table_alias) if !table_alias.is_empty() => {
                format!("{}.{}", quote_ident(table_alias), quote_ident(&column.name))
            }
            _ => quote_ident(&column.name),
        };
        match column.alias.as_deref() {
            Some(alias) => format!("{reference} AS {}", quote_ident(alias)),
            None => reference,
        }
    }

    fn qualified_control_column(table_alias: &str, column: &str) -> String {
        if table_alias.is_empty() {
            quote_ident(column)
        } else {
            format!("{}.{}", quote_ident(table_alias), quote_ident(column))
        }
    }
}

impl SqlSystem for StandardSqlSystem {
    fn dialect(&self) -> SqlDialect {
        self.dialect
    }

    fn compose_select_query(
        &self,
        columns: &[RelationalColumn],
        table_aliases: &[String],
        from_clause: &str,
        where_clause: &str,
        suffix: &str,
    ) -> Result<String, EngineError> {
        if columns.is_empty() {
            return Err(errors::query_composition_error(
                "cannot compose select query without columns",
            ));
        }
        if from_clause.trim().is_empty() {
            return Err(errors::query_composition_error(
                "cannot compose select query without a FROM clause",
            ));
        }

        let projections: Vec<String> = columns
            .iter()
            .map(|column| self.render_column(column))
            .collect();

        // Each table is pinned to the generation and session it was populated under.
        let mut predicates = Vec::with_capacity(table_aliases.len() + 1);
        let mut next_placeholder = 1;
        for table_alias in table_aliases {
            let generation = Self::qualified_control_column(
                table_alias,
                &self.control_attributes.generation_id_column,
            );
            let session = Self::qualified_control_column(
                table_alias,
                &self.control_attributes.session_id_column,
            );
            predicates.push(format!(
                "( {generation} = {} AND {session} = {} )",
                self.dialect.placeholder(next_placeholder),
                self.dialect.placeholder(next_placeholder + 1)
            ));
            next_placeholder += 2;
        }
        if !where_clause.trim().is_empty() {
            predicates.push(format!("( {} )", where_clause.trim()));
        }

        let mut query = format!("SELECT {} FROM {}", projections.join(", "), from_clause.trim());
        if !predicates.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&predicates.join(" AND "));
        }
        if !suffix.trim().is_empty() {
            query.push(' ');
            query.push_str(suffix.trim());
        }
        Ok(query)
    }
}

#[derive(Debug, Clone)]
pub struct DrmConfig {
    control_attributes: ControlAttributes,
    sql_system: Arc<dyn SqlSystem>,
    namespace_collection: NamespaceCollection,
}

impl DrmConfig {
    pub fn new(
        control_attributes: ControlAttributes,
        sql_system: Arc<dyn SqlSystem>,
        namespace_collection: NamespaceCollection,
    ) -> Self {
        Self {
            control_attributes,
            sql_system,
            namespace_collection,
        }
    }

    pub fn control_attributes(&self) -> &ControlAttributes {
        &self.control_attributes
    }

    pub fn sql_system(&self) -> &Arc<dyn SqlSystem> {
        &self.sql_system
    }

    pub fn namespace_collection(&self) -> &NamespaceCollection {
        &self.namespace_collection
    }
}
