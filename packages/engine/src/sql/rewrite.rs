use std::collections::BTreeMap;

use tracing::info;

use crate::types::{
    ColumnMetadata, ControlCounters, RelationalColumn, TableInsertionContainer, TableMetadata,
};
use crate::EngineError;

use super::{DrmConfig, PreparedStatementCtx};

#[derive(Debug, Clone)]
pub struct SqlRewriteInput {
    drm_config: DrmConfig,
    column_descriptors: Vec<RelationalColumn>,
    base_control_counters: ControlCounters,
    select_suffix: String,
    rewritten_where: String,
    secondary_control_counters: Vec<ControlCounters>,
    tables: BTreeMap<String, TableMetadata>,
    from_string: String,
    table_insertion_containers: Vec<TableInsertionContainer>,
    indirect_contexts: Vec<PreparedStatementCtx>,
}

impl SqlRewriteInput {
    pub fn new(
        drm_config: DrmConfig,
        column_descriptors: Vec<RelationalColumn>,
        base_control_counters: ControlCounters,
    ) -> Self {
        Self {
            drm_config,
            column_descriptors,
            base_control_counters,
            select_suffix: String::new(),
            rewritten_where: String::new(),
            secondary_control_counters: Vec::new(),
            tables: BTreeMap::new(),
            from_string: String::new(),
            table_insertion_containers: Vec::new(),
            indirect_contexts: Vec::new(),
        }
    }

    pub fn with_from_string(mut self, from_string: impl Into<String>) -> Self {
        self.from_string = from_string.into();
        self
    }

    pub fn with_rewritten_where(mut self, rewritten_where: impl Into<String>) -> Self {
        self.rewritten_where = rewritten_where.into();
        self
    }

    pub fn with_select_suffix(mut self, select_suffix: impl Into<String>) -> Self {
        self.select_suffix = select_suffix.into();
        self
    }

    pub fn with_secondary_control_counters(mut self, counters: Vec<ControlCounters>) -> Self {
        self.secondary_control_counters = counters;
        self
    }

    pub fn with_tables(mut self, tables: BTreeMap<String, TableMetadata>) -> Self {
        self.tables = tables;
        self
    }

    pub fn with_table_insertion_containers(
        mut self,
        containers: Vec<TableInsertionContainer>,
    ) -> Self {
        self.table_insertion_containers = containers;
        self
    }

    pub fn with_indirect_contexts(mut self, indirect_contexts: Vec<PreparedStatementCtx>) -> Self {
        self.indirect_contexts = indirect_contexts;
        self
    }

    pub fn drm_config(&self) -> &DrmConfig {
        &self.drm_config
    }

    pub fn column_descriptors(&self) -> &[RelationalColumn] {
        &self.column_descriptors
    }

    pub fn tables(&self) -> &BTreeMap<String, TableMetadata> {
        &self.tables
    }

    pub fn table_insertion_containers(&self) -> &[TableInsertionContainer] {
        &self.table_insertion_containers
    }
}

pub fn generate_select_dml(input: &SqlRewriteInput) -> Result<PreparedStatementCtx, EngineError> {
    let drm_config = input.drm_config();
    let non_control_columns: Vec<ColumnMetadata> = input
        .column_descriptors
        .iter()
        .map(|column| ColumnMetadata::relayed(column.clone(), column.column_type.clone()))
        .collect();

    // Containers, when present, supersede the caller-supplied counters entirely.
    let (control_counters, secondary_control_counters) =
        match input.table_insertion_containers.split_first() {
            Some((primary, rest)) => (
                primary.table_control_counters().1.clone(),
                rest.iter()
                    .map(|container| container.table_control_counters().1.clone())
                    .collect(),
            ),
            None => (
                input.base_control_counters.clone(),
                input.secondary_control_counters.clone(),
            ),
        };

    let table_aliases: Vec<String> = input
        .table_insertion_containers
        .iter()
        .map(|container| container.table_metadata().alias.clone())
        .collect();

    let query = drm_config.sql_system().compose_select_query(
        &input.column_descriptors,
        &table_aliases,
        &input.from_string,
        &input.rewritten_where,
        &input.select_suffix,
    )?;
    info!(
        tables = input.tables.len(),
        secondary_counters = secondary_control_counters.len(),
        indirect_contexts = input.indirect_contexts.len(),
        "composed select dml"
    );

    let mut context = PreparedStatementCtx {
        query,
        control_columns: drm_config.control_attributes().clone(),
        non_control_columns,
        table_count: input.tables.len(),
        control_counters,
        secondary_control_counters,
        namespace_collection: drm_config.namespace_collection().clone(),
        sql_system: drm_config.sql_system().clone(),
        indirect_contexts: Vec::new(),
    };
    context.set_indirect_contexts(input.indirect_contexts.clone());
    Ok(context)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::{ControlAttributes, EngineConfig, NamespaceCollection};
    use crate::sql::SqlSystem;

    fn container(alias: &str, generation_id: i64) -> TableInsertionContainer {
        TableInsertionContainer::new(
            TableMetadata::new(format!("compute.{alias}"), alias),
            ControlCounters::new(generation_id, 7, 1, generation_id * 10, "enc"),
        )
    }

    fn input(containers: Vec<TableInsertionContainer>) -> SqlRewriteInput {
        let tables = containers
            .iter()
            .map(|container| {
                let metadata = container.table_metadata().clone();
                (metadata.alias.clone(), metadata)
            })
            .collect();
        SqlRewriteInput::new(
            EngineConfig::default().drm_config(),
            vec![RelationalColumn::new("name", "text")],
            ControlCounters::new(99, 99, 99, 99, "base"),
        )
        .with_from_string("instances a")
        .with_tables(tables)
        .with_table_insertion_containers(containers)
    }

    #[test]
    fn single_container_has_no_secondary_counters() {
        let context = generate_select_dml(&input(vec![container("a", 1)])).expect("compile");

        assert_eq!(context.control_counters().generation_id, 1);
        assert!(context.secondary_control_counters().is_empty());
        assert_eq!(context.table_count(), 1);
        assert_eq!(context.generation_id_column(), "iql_generation_id");
        assert_eq!(
            context.query(),
            "SELECT \"name\" FROM instances a WHERE ( \"a\".\"iql_generation_id\" = ?1 AND \"a\".\"iql_session_id\" = ?2 )"
        );
    }

    #[test]
    fn trailing_containers_become_secondary_counters_in_order() {
        let context = generate_select_dml(&input(vec![
            container("a", 1),
            container("b", 2),
            container("c", 3),
        ]))
        .expect("compile");

        let secondary: Vec<i64> = context
            .secondary_control_counters()
            .iter()
            .map(|counters| counters.generation_id)
            .collect();
        assert_eq!(secondary, vec![2, 3]);
        assert_eq!(context.all_control_counters().len(), 3);
    }

    #[test]
    fn base_counters_apply_without_containers() {
        let input = input(Vec::new())
            .with_secondary_control_counters(vec![ControlCounters::new(5, 5, 5, 5, "s")]);
        let context = generate_select_dml(&input).expect("compile");

        assert_eq!(context.control_counters().insert_encoded_id, "base");
        assert_eq!(context.secondary_control_counters().len(), 1);
        assert_eq!(context.query(), "SELECT \"name\" FROM instances a");
    }

    #[test]
    fn indirect_contexts_round_trip() {
        let nested = generate_select_dml(&input(vec![container("v", 4)])).expect("compile view");
        let mut context = generate_select_dml(
            &input(vec![container("a", 1)]).with_indirect_contexts(vec![nested.clone()]),
        )
        .expect("compile");
        assert_eq!(context.indirect_contexts().len(), 1);
        assert_eq!(context.indirect_contexts()[0].query(), nested.query());

        context.set_indirect_contexts(vec![nested.clone(), nested]);
        let queries: Vec<&str> = context
            .indirect_contexts()
            .iter()
            .map(PreparedStatementCtx::query)
            .collect();
        assert_eq!(queries.len(), 2);
        assert!(queries.iter().all(|query| query.contains("\"v\".")));
    }

    #[derive(Debug)]
    struct FailingSystem;

    impl SqlSystem for FailingSystem {
        fn dialect(&self) -> crate::sql::SqlDialect {
            crate::sql::SqlDialect::Sqlite
        }

        fn compose_select_query(
            &self,
            _columns: &[RelationalColumn],
            _table_aliases: &[String],
            _from_clause: &str,
            _where_clause: &str,
            _suffix: &str,
        ) -> Result<String, EngineError> {
            Err(EngineError::new("SQLAPI_ERROR_QUERY_COMPOSITION", "boom"))
        }
    }

    #[test]
    fn composer_failure_propagates_verbatim() {
        let drm_config = DrmConfig::new(
            ControlAttributes::default(),
            Arc::new(FailingSystem),
            NamespaceCollection::default(),
        );
        let input = SqlRewriteInput::new(
            drm_config,
            vec![RelationalColumn::new("name", "text")],
            ControlCounters::default(),
        )
        .with_from_string("instances");

        let error = generate_select_dml(&input).expect_err("composition should fail");
        assert_eq!(error.code, "SQLAPI_ERROR_QUERY_COMPOSITION");
        assert_eq!(error.message, "boom");
    }
}
