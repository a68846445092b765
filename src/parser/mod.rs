//! Document parser (verb module)
//!
//! Loads catalog documents, query configurations and variable registry
//! snapshots from YAML or JSON. Files ending in `.json` are read as JSON,
//! everything else as YAML.

use std::path::Path;
use serde::de::DeserializeOwned;
use crate::catalog::CatalogDocument;
use crate::error::ParseError;
use crate::query::QueryConfiguration;
use crate::variables::RegistrySnapshot;

/// Parse a catalog document from a file
pub fn parse_catalog_file<P: AsRef<Path>>(path: P) -> Result<CatalogDocument, ParseError> {
    parse_file(path)
}

/// Parse a catalog document from a YAML string
pub fn parse_catalog_str(yaml: &str) -> Result<CatalogDocument, ParseError> {
    serde_yaml::from_str(yaml).map_err(ParseError::from)
}

/// Parse a stored query configuration from a file, applying defaults
pub fn parse_query_file<P: AsRef<Path>>(path: P) -> Result<QueryConfiguration, ParseError> {
    parse_file::<QueryConfiguration, _>(path).map(QueryConfiguration::with_defaults)
}

/// Parse a stored query configuration from a YAML string, applying defaults
pub fn parse_query_str(yaml: &str) -> Result<QueryConfiguration, ParseError> {
    let config: QueryConfiguration = serde_yaml::from_str(yaml)?;
    Ok(config.with_defaults())
}

/// Parse a stored query configuration in the host's JSON format, applying
/// defaults
pub fn parse_query_json(json: &str) -> Result<QueryConfiguration, ParseError> {
    let config: QueryConfiguration = serde_json::from_str(json)?;
    Ok(config.with_defaults())
}

/// Parse a variable registry snapshot from a file
pub fn parse_registry_file<P: AsRef<Path>>(path: P) -> Result<RegistrySnapshot, ParseError> {
    parse_file(path)
}

/// Parse a variable registry snapshot from a YAML string
pub fn parse_registry_str(yaml: &str) -> Result<RegistrySnapshot, ParseError> {
    serde_yaml::from_str(yaml).map_err(ParseError::from)
}

fn parse_file<T, P>(path: P) -> Result<T, ParseError>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|e| ParseError::Io {
        path: path.display().to_string(),
        source: e,
    })?;

    if path.extension().is_some_and(|ext| ext == "json") {
        serde_json::from_str(&contents).map_err(ParseError::from)
    } else {
        serde_yaml::from_str(&contents).map_err(ParseError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Calculation;
    use crate::query::GroupingBinding;

    #[test]
    fn test_parse_catalog() {
        let catalog = parse_catalog_str(
            r#"
filter_definitions:
  - id: f1
    name: Requests
    groupings: [region, env]
    aggregations:
      - id: 1
        name: Latency
        calculations: [AVG, PERCENTILES]
        calculationField: latency_ms
grouping_values:
  f1:
    region: [us-east, us-west]
"#,
        )
        .unwrap();

        assert_eq!(catalog.filter_definitions.len(), 1);
        let aggregation = &catalog.filter_definitions[0].aggregations[0];
        assert_eq!(aggregation.calculations, vec![Calculation::Avg, Calculation::Percentiles]);
        assert_eq!(aggregation.calculation_field.as_deref(), Some("latency_ms"));
        assert_eq!(catalog.grouping_values["f1"]["region"].len(), 2);
    }

    #[test]
    fn test_parse_query_json_host_format() {
        let config = parse_query_json(
            r#"{
                "refId": "A",
                "filterId": "f1",
                "aggregationId": 1,
                "calculation": "PERCENTILES",
                "percentile": 0.95,
                "limit": null,
                "limitType": null,
                "includeGroupingLabels": null,
                "grouping_filter_mapping": {
                    "region": {"id": "$__manual", "name": "$__manual", "manual_values": ["us-east"]},
                    "env": {"id": "x1y2z3w4", "name": "env"}
                }
            }"#,
        )
        .unwrap();

        assert_eq!(config.ref_id(), Some("A"));
        assert_eq!(config.calculation(), Some(Calculation::Percentiles));
        assert_eq!(config.limit(), None);
        assert!(config.include_grouping_labels());
        assert!(config.correlation_id().is_some());
        assert_eq!(config.binding("region"), Some(&GroupingBinding::manual(["us-east"])));
        assert_eq!(config.binding_summary(), r#"env="$env""#);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(parse_query_str("limit: [1"), Err(ParseError::Yaml { .. })));
        assert!(matches!(parse_query_json("{"), Err(ParseError::Json { .. })));
        assert!(matches!(
            parse_catalog_file("does/not/exist.yaml"),
            Err(ParseError::Io { path, .. }) if path == "does/not/exist.yaml"
        ));
    }

    #[test]
    fn test_parse_registry() {
        let snapshot = parse_registry_str(
            r#"
variables:
  - id: v1
    name: region
    current: us-east
  - id: v2
    name: env
    current: [prod, dev]
"#,
        )
        .unwrap();
        assert_eq!(snapshot.variables().len(), 2);
        assert_eq!(snapshot.variables()[0].current.to_filters(), vec!["us-east"]);
        assert_eq!(snapshot.variables()[1].current.to_filters(), vec!["prod", "dev"]);
    }
}
