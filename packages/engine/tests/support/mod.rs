#![allow(dead_code)]

use sqlapi_engine::catalog::Operation;
use sqlapi_engine::types::{ControlCounters, TableInsertionContainer, TableMetadata};
use sqlapi_engine::{EngineConfig, ServiceCatalog};

pub fn compute_catalog() -> ServiceCatalog {
    ServiceCatalog::from_json_str(include_str!("../fixtures/compute_catalog.json"))
        .expect("fixture catalog should parse")
}

pub fn operation<'a>(catalog: &'a ServiceCatalog, name: &str) -> &'a Operation {
    catalog
        .operation(name)
        .unwrap_or_else(|| panic!("fixture operation '{name}' should exist"))
}

pub fn default_config() -> EngineConfig {
    EngineConfig::default()
}

pub fn container(table: &str, alias: &str, generation_id: i64) -> TableInsertionContainer {
    TableInsertionContainer::new(
        TableMetadata::new(table, alias),
        ControlCounters::new(generation_id, 1, 1, generation_id, format!("enc-{alias}")),
    )
}
