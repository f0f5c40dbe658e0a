use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ControlCounters {
    pub generation_id: i64,
    pub session_id: i64,
    pub transaction_id: i64,
    pub insert_id: i64,
    pub insert_encoded_id: String,
}

impl ControlCounters {
    pub fn new(
        generation_id: i64,
        session_id: i64,
        transaction_id: i64,
        insert_id: i64,
        insert_encoded_id: impl Into<String>,
    ) -> Self {
        Self {
            generation_id,
            session_id,
            transaction_id,
            insert_id,
            insert_encoded_id: insert_encoded_id.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableMetadata {
    pub name: String,
    pub alias: String,
}

impl TableMetadata {
    pub fn new(name: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: alias.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableInsertionContainer {
    table_metadata: TableMetadata,
    control_counters: ControlCounters,
}

impl TableInsertionContainer {
    pub fn new(table_metadata: TableMetadata, control_counters: ControlCounters) -> Self {
        Self {
            table_metadata,
            control_counters,
        }
    }

    pub fn table_metadata(&self) -> &TableMetadata {
        &self.table_metadata
    }

    pub fn table_control_counters(&self) -> (&str, &ControlCounters) {
        (&self.table_metadata.name, &self.control_counters)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationalColumn {
    pub name: String,
    pub column_type: String,
    pub alias: Option<String>,
    pub table_alias: Option<String>,
    // Raw SQL expression rendered verbatim in place of the column reference.
    pub decorated: Option<String>,
}

impl RelationalColumn {
    pub fn new(name: impl Into<String>, column_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column_type: column_type.into(),
            ..Self::default()
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_table_alias(mut self, table_alias: impl Into<String>) -> Self {
        self.table_alias = Some(table_alias.into());
        self
    }

    pub fn with_decorated(mut self, decorated: impl Into<String>) -> Self {
        self.decorated = Some(decorated.into());
        self
    }

    pub fn identifier(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMetadata {
    column: RelationalColumn,
    column_type: String,
}

impl ColumnMetadata {
    pub fn relayed(column: RelationalColumn, column_type: impl Into<String>) -> Self {
        Self {
            column,
            column_type: column_type.into(),
        }
    }

    pub fn identifier(&self) -> &str {
        self.column.identifier()
    }

    pub fn name(&self) -> &str {
        &self.column.name
    }

    pub fn column_type(&self) -> &str {
        &self.column_type
    }

    pub fn relational_column(&self) -> &RelationalColumn {
        &self.column
    }
}
