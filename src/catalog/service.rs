//! Catalog collaborator: the source of filter definitions and candidate
//! grouping values.

use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use crate::query::AGGREGATE_SENTINEL;
use super::definition::FilterDefinition;

/// Errors reported by a catalog implementation
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Filter definition '{0}' not found")]
    UnknownFilter(String),

    #[error("Grouping '{grouping}' is not declared by filter '{filter_id}'")]
    UnknownGrouping { filter_id: String, grouping: String },

    #[error("Catalog unavailable: {0}")]
    Unavailable(String),
}

/// Source of filter definitions and candidate grouping values
pub trait CatalogService {
    /// All filter definitions visible to the current data source
    fn list_filter_definitions(&self) -> Result<Vec<FilterDefinition>, CatalogError>;

    /// Distinct values observed for one grouping of one filter
    fn list_grouping_values(&self, filter_id: &str, grouping: &str) -> Result<Vec<String>, CatalogError>;
}

/// Catalog contents as stored in a YAML/JSON document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogDocument {
    #[serde(default)]
    pub filter_definitions: Vec<FilterDefinition>,
    /// filter id -> grouping name -> candidate values
    #[serde(default)]
    pub grouping_values: BTreeMap<String, BTreeMap<String, Vec<String>>>,
}

/// In-memory catalog backed by a [`CatalogDocument`]
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    document: CatalogDocument,
}

impl StaticCatalog {
    pub fn new(document: CatalogDocument) -> Self {
        Self { document }
    }

    /// Get a definition by id
    pub fn get_definition(&self, id: &str) -> Option<&FilterDefinition> {
        self.document.filter_definitions.iter().find(|d| d.id == id)
    }
}

impl From<CatalogDocument> for StaticCatalog {
    fn from(document: CatalogDocument) -> Self {
        Self::new(document)
    }
}

impl CatalogService for StaticCatalog {
    fn list_filter_definitions(&self) -> Result<Vec<FilterDefinition>, CatalogError> {
        Ok(self.document.filter_definitions.clone())
    }

    fn list_grouping_values(&self, filter_id: &str, grouping: &str) -> Result<Vec<String>, CatalogError> {
        let definition = self
            .get_definition(filter_id)
            .ok_or_else(|| CatalogError::UnknownFilter(filter_id.to_string()))?;
        if !definition.has_grouping(grouping) {
            return Err(CatalogError::UnknownGrouping {
                filter_id: filter_id.to_string(),
                grouping: grouping.to_string(),
            });
        }
        Ok(self
            .document
            .grouping_values
            .get(filter_id)
            .and_then(|by_grouping| by_grouping.get(grouping))
            .cloned()
            .unwrap_or_default())
    }
}

/// One selectable value of a grouping variable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupingValueOption {
    pub value: String,
    pub text: String,
}

/// Build the option rows a variable-mode query returns for a grouping.
///
/// With `include_aggregate` set, a leading "Aggregate All" row carrying the
/// aggregate sentinel lets the dashboard user opt out of filtering.
pub fn grouping_value_options(values: &[String], include_aggregate: bool) -> Vec<GroupingValueOption> {
    let mut options = Vec::with_capacity(values.len() + 1);
    if include_aggregate {
        options.push(GroupingValueOption {
            value: AGGREGATE_SENTINEL.to_string(),
            text: "Aggregate All".to_string(),
        });
    }
    options.extend(values.iter().map(|v| GroupingValueOption {
        value: v.clone(),
        text: v.clone(),
    }));
    options
}
