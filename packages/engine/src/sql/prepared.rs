use std::sync::Arc;

use crate::config::{ControlAttributes, NamespaceCollection};
use crate::types::{ColumnMetadata, ControlCounters};

use super::SqlSystem;

#[derive(Debug, Clone)]
pub struct PreparedStatementCtx {
    pub(crate) query: String,
    pub(crate) control_columns: ControlAttributes,
    pub(crate) non_control_columns: Vec<ColumnMetadata>,
    pub(crate) table_count: usize,
    pub(crate) control_counters: ControlCounters,
    pub(crate) secondary_control_counters: Vec<ControlCounters>,
    pub(crate) namespace_collection: NamespaceCollection,
    pub(crate) sql_system: Arc<dyn SqlSystem>,
    pub(crate) indirect_contexts: Vec<PreparedStatementCtx>,
}

impl PreparedStatementCtx {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn generation_id_column(&self) -> &str {
        &self.control_columns.generation_id_column
    }

    pub fn session_id_column(&self) -> &str {
        &self.control_columns.session_id_column
    }

    pub fn transaction_id_column(&self) -> &str {
        &self.control_columns.transaction_id_column
    }

    pub fn insert_id_column(&self) -> &str {
        &self.control_columns.insert_id_column
    }

    pub fn insert_encoded_id_column(&self) -> &str {
        &self.control_columns.insert_encoded_id_column
    }

    pub fn non_control_columns(&self) -> &[ColumnMetadata] {
        &self.non_control_columns
    }

    pub fn table_count(&self) -> usize {
        self.table_count
    }

    pub fn control_counters(&self) -> &ControlCounters {
        &self.control_counters
    }

    pub fn secondary_control_counters(&self) -> &[ControlCounters] {
        &self.secondary_control_counters
    }

    // Primary first, then secondaries in table order; one pair of bind values per entry.
    pub fn all_control_counters(&self) -> Vec<&ControlCounters> {
        std::iter::once(&self.control_counters)
            .chain(self.secondary_control_counters.iter())
            .collect()
    }

    pub fn namespace_collection(&self) -> &NamespaceCollection {
        &self.namespace_collection
    }

    pub fn sql_system(&self) -> &dyn SqlSystem {
        self.sql_system.as_ref()
    }

    pub fn set_indirect_contexts(&mut self, indirect_contexts: Vec<PreparedStatementCtx>) {
        self.indirect_contexts = indirect_contexts;
    }

    pub fn indirect_contexts(&self) -> &[PreparedStatementCtx] {
        &self.indirect_contexts
    }
}
