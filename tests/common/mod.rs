//! Shared test utilities for integration tests

#![allow(dead_code)]

use facetq::{
    parser, CatalogDocument, FilterDefinition, QueryConfiguration, RegistrySnapshot, RunTrigger,
};

/// Load the catalog fixture from the tests/test_data directory
pub fn load_catalog(name: &str) -> CatalogDocument {
    let path = format!("tests/test_data/{}", name);
    parser::parse_catalog_file(&path)
        .unwrap_or_else(|e| panic!("Failed to load test data {}: {}", name, e))
}

/// Load a registry snapshot fixture
pub fn load_registry(name: &str) -> RegistrySnapshot {
    let path = format!("tests/test_data/{}", name);
    parser::parse_registry_file(&path)
        .unwrap_or_else(|e| panic!("Failed to load test data {}: {}", name, e))
}

/// Load a stored query configuration fixture
pub fn load_query(name: &str) -> QueryConfiguration {
    let path = format!("tests/test_data/{}", name);
    parser::parse_query_file(&path)
        .unwrap_or_else(|e| panic!("Failed to load test data {}: {}", name, e))
}

/// Get a definition from the catalog fixture by id
pub fn definition(id: &str) -> FilterDefinition {
    load_catalog("catalog.yaml")
        .filter_definitions
        .into_iter()
        .find(|d| d.id == id)
        .unwrap_or_else(|| panic!("No definition {} in catalog.yaml", id))
}

// =============================================================================
// Run trigger
// =============================================================================

/// Records every configuration the editor asked to run
#[derive(Debug, Default)]
pub struct RecordingTrigger {
    pub runs: Vec<QueryConfiguration>,
}

impl RecordingTrigger {
    pub fn count(&self) -> usize {
        self.runs.len()
    }

    pub fn last(&self) -> Option<&QueryConfiguration> {
        self.runs.last()
    }
}

impl RunTrigger for RecordingTrigger {
    fn run(&mut self, config: &QueryConfiguration) {
        self.runs.push(config.clone());
    }
}
