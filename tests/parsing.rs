//! Integration tests for document loading
//!
//! Loads fixtures and temporary files in YAML and JSON, and round trips a
//! configuration through the host's JSON format.

mod common;

use std::io::Write;
use common::{load_catalog, load_query, load_registry};
use facetq::editor::{hydrate_definition, set_grouping_binding};
use facetq::{parser, CatalogService, GroupingBinding, LimitType, ParseError, QueryMode, StaticCatalog};
use tempfile::NamedTempFile;

fn temp_file(suffix: &str) -> NamedTempFile {
    tempfile::Builder::new().suffix(suffix).tempfile().unwrap()
}

#[test]
fn test_catalog_fixture() {
    let catalog = load_catalog("catalog.yaml");
    assert_eq!(catalog.filter_definitions.len(), 3);

    // Null lists read as empty
    let empty = &catalog.filter_definitions[2];
    assert!(empty.groupings.is_empty());
    assert!(empty.aggregations.is_empty());

    let service = StaticCatalog::from(catalog);
    assert_eq!(service.list_grouping_values("f2", "status").unwrap(), vec!["200", "404", "500"]);
    assert!(service.list_grouping_values("f9", "status").is_err());
}

#[test]
fn test_stored_query_defaults() {
    let config = load_query("stored_query.json");
    assert_eq!(config.datasource_id(), Some(7));
    assert_eq!(config.limit_type(), LimitType::Bottom);
    assert_eq!(config.mode(), QueryMode::Query);
    assert_eq!(config.alias(), None);
    // null falls back to the default
    assert!(config.include_incomplete_intervals());
    assert!(config.filter_definition().is_none());
    assert_eq!(config.include_flag("region"), Some(false));
}

#[test]
fn test_registry_fixture() {
    let snapshot = load_registry("registry.yaml");
    assert_eq!(snapshot.variables().len(), 5);
    let env = snapshot.find_reference("envcorr1").unwrap();
    assert_eq!(env.registry_id, "env");
    assert_eq!(env.query.as_ref().and_then(|q| q.grouping_name()), Some("env"));

    // Query text of another datasource reads as a plain variable
    let job = snapshot.find_reference("job").unwrap();
    assert!(job.query.is_none());
}

#[test]
fn test_json_round_trip() {
    let catalog = load_catalog("catalog.yaml");
    let config = hydrate_definition(load_query("stored_query.json"), &catalog.filter_definitions);
    let config = set_grouping_binding(config, "service", Some(GroupingBinding::variable("envcorr1", "env"))).unwrap();

    let json = serde_json::to_string(&config).unwrap();
    let reloaded = parser::parse_query_json(&json).unwrap();

    assert_eq!(reloaded, config);
    assert_eq!(reloaded.binding_summary(), r#"service="$env"|status="$$__agg""#);
}

#[test]
fn test_parse_json_file_by_extension() {
    let mut file = temp_file(".json");
    write!(file, r#"{{"filterId": "f1", "mode": "variables", "groupingName": "env"}}"#).unwrap();

    let config = parser::parse_query_file(file.path()).unwrap();
    assert_eq!(config.mode(), QueryMode::Variables);
    assert_eq!(config.grouping_name(), Some("env"));
    assert_eq!(config.correlation_id().map(str::len), Some(facetq::query::CORRELATION_ID_LEN));
}

#[test]
fn test_parse_yaml_file() {
    let mut file = temp_file(".yaml");
    writeln!(file, "variables:\n  - id: v1\n    name: host\n    current: web-1").unwrap();

    let snapshot = parser::parse_registry_file(file.path()).unwrap();
    assert_eq!(snapshot.variables()[0].current.to_filters(), vec!["web-1"]);
}

#[test]
fn test_invalid_file_reports_parse_error() {
    let mut file = temp_file(".json");
    write!(file, "{{ not json").unwrap();

    let err = parser::parse_catalog_file(file.path()).unwrap_err();
    assert!(matches!(err, ParseError::Json { .. }));
    assert!(err.to_string().starts_with("Invalid JSON"));
}
