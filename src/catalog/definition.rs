//! Filter definitions provided by the catalog

use serde::{Deserialize, Deserializer, Serialize};
use super::types::Calculation;

/// A named, catalog-provided template describing the aggregations and
/// groupings available for a class of query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterDefinition {
    pub id: String,
    pub name: String,
    /// Backend filter expression; opaque to this crate
    #[serde(default)]
    pub filter: String,
    /// Grouping dimensions, in catalog order
    #[serde(default, deserialize_with = "null_as_empty")]
    pub groupings: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub aggregations: Vec<FilterDefinitionAggregation>,
}

/// An aggregation offered by exactly one filter definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterDefinitionAggregation {
    pub id: i64,
    pub name: String,
    #[serde(rename = "subFilter", default)]
    pub sub_filter: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub calculations: Vec<Calculation>,
    #[serde(rename = "calculationField", default)]
    pub calculation_field: Option<String>,
}

impl FilterDefinition {
    /// Get an aggregation by id
    pub fn get_aggregation(&self, id: i64) -> Option<&FilterDefinitionAggregation> {
        self.aggregations.iter().find(|a| a.id == id)
    }

    /// The aggregation to auto-select: present only when there is exactly one
    pub fn sole_aggregation(&self) -> Option<&FilterDefinitionAggregation> {
        match self.aggregations.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }

    /// Whether `aggregation` is one of this definition's aggregations
    pub fn owns_aggregation(&self, aggregation: &FilterDefinitionAggregation) -> bool {
        self.aggregations.iter().any(|a| a == aggregation)
    }

    /// Whether this definition declares the grouping
    pub fn has_grouping(&self, name: &str) -> bool {
        self.groupings.iter().any(|g| g == name)
    }
}

impl FilterDefinitionAggregation {
    /// Whether this aggregation offers the calculation
    pub fn offers(&self, calculation: Calculation) -> bool {
        self.calculations.contains(&calculation)
    }

    /// The calculation to auto-select: present only when there is exactly one
    pub fn sole_calculation(&self) -> Option<Calculation> {
        match self.calculations.as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }
}

/// Treat an explicit `null` list the same as a missing one
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
