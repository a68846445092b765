//! The query configuration being edited

use std::collections::BTreeMap;
use serde::{Deserialize, Deserializer, Serialize};
use crate::catalog::{Calculation, FilterDefinition, FilterDefinitionAggregation, LimitType};
use super::binding::GroupingBinding;
use super::id::generate_correlation_id;

/// Which surface a configuration drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryMode {
    /// A panel query: aggregation, calculation and grouping filters
    #[default]
    Query,
    /// A dashboard variable listing the values of one grouping
    Variables,
}

/// One query being edited.
///
/// Fields are only changed through the transforms in [`crate::editor`], which
/// keep the selection chain consistent and re-derive the cached label and
/// mapping string. Field names on the wire follow the host's storage format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryConfiguration {
    #[serde(rename = "refId", default, skip_serializing_if = "Option::is_none")]
    pub(crate) ref_id: Option<String>,
    #[serde(rename = "datasourceId", default)]
    pub(crate) datasource_id: Option<i64>,
    /// Stable identity other configurations use to reference this one
    #[serde(rename = "rand_id", default)]
    pub(crate) correlation_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub(crate) mode: QueryMode,

    // Selection chain
    #[serde(rename = "filterId", default)]
    pub(crate) filter_id: Option<String>,
    #[serde(rename = "filter_definition", default)]
    pub(crate) filter_definition: Option<FilterDefinition>,
    #[serde(rename = "aggregationId", default)]
    pub(crate) aggregation_id: Option<i64>,
    #[serde(rename = "selected_agg", default)]
    pub(crate) selected_aggregation: Option<FilterDefinitionAggregation>,
    #[serde(default)]
    pub(crate) calculation: Option<Calculation>,
    #[serde(default)]
    pub(crate) percentile: Option<f64>,

    // Result shaping
    #[serde(default)]
    pub(crate) limit: Option<i64>,
    #[serde(rename = "limitType", default, deserialize_with = "null_as_default")]
    pub(crate) limit_type: LimitType,
    #[serde(default)]
    pub(crate) alias: Option<String>,

    // Groupings
    #[serde(rename = "groupingName", default)]
    pub(crate) grouping_name: Option<String>,
    #[serde(rename = "grouping_filter_mapping", default, deserialize_with = "null_as_default")]
    pub(crate) bindings: BTreeMap<String, GroupingBinding>,
    /// Compact `g="$var"|...` form of the non-manual bindings (derived)
    #[serde(rename = "grouping_filter_mapping_str", default, deserialize_with = "null_as_default")]
    pub(crate) binding_summary: String,
    #[serde(rename = "grouping_filter_includes", default, deserialize_with = "null_as_default")]
    pub(crate) include_flags: BTreeMap<String, bool>,

    // Presentation toggles
    #[serde(rename = "longResult", default, deserialize_with = "null_as_default")]
    pub(crate) long_result: bool,
    #[serde(rename = "includeGroupingLabels", default = "default_true", deserialize_with = "null_as_true")]
    pub(crate) include_grouping_labels: bool,
    #[serde(rename = "includeIncompleteIntervals", default = "default_true", deserialize_with = "null_as_true")]
    pub(crate) include_incomplete_intervals: bool,
    #[serde(rename = "shouldRecalculate", default, deserialize_with = "null_as_default")]
    pub(crate) should_recalculate: bool,
    #[serde(rename = "includeAggregateOption", default = "default_true", deserialize_with = "null_as_true")]
    pub(crate) include_aggregate_option: bool,
    #[serde(rename = "excludeEmptyGroupings", default, deserialize_with = "null_as_default")]
    pub(crate) exclude_empty_groupings: bool,

    // Derived
    #[serde(rename = "filterDefinitionName", default)]
    pub(crate) display_label: Option<String>,
    #[serde(rename = "fast_mode", default, deserialize_with = "null_as_default")]
    pub(crate) fast_mode: bool,
}

impl Default for QueryConfiguration {
    fn default() -> Self {
        Self {
            ref_id: None,
            datasource_id: None,
            correlation_id: None,
            mode: QueryMode::Query,
            filter_id: None,
            filter_definition: None,
            aggregation_id: None,
            selected_aggregation: None,
            calculation: None,
            percentile: None,
            limit: None,
            limit_type: LimitType::Top,
            alias: None,
            grouping_name: None,
            bindings: BTreeMap::new(),
            binding_summary: String::new(),
            include_flags: BTreeMap::new(),
            long_result: false,
            include_grouping_labels: true,
            include_incomplete_intervals: true,
            should_recalculate: false,
            include_aggregate_option: true,
            exclude_empty_groupings: false,
            display_label: None,
            fast_mode: false,
        }
    }
}

impl QueryConfiguration {
    /// A fresh configuration with defaults applied and a new correlation id
    pub fn new() -> Self {
        Self::default().with_defaults()
    }

    /// Complete a configuration loaded from storage: generate the correlation
    /// id if it is missing and re-derive the cached label and mapping string.
    pub fn with_defaults(mut self) -> Self {
        if self.correlation_id.as_deref().map_or(true, |id| id.trim().is_empty()) {
            self.correlation_id = Some(generate_correlation_id());
        }
        self.refresh_derived()
    }

    pub fn with_mode(mut self, mode: QueryMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_ref_id(mut self, ref_id: impl Into<String>) -> Self {
        self.ref_id = Some(ref_id.into());
        self
    }

    pub fn with_datasource_id(mut self, datasource_id: i64) -> Self {
        self.datasource_id = Some(datasource_id);
        self
    }

    /// Re-derive the display label and compact mapping string
    pub(crate) fn refresh_derived(mut self) -> Self {
        self.display_label = crate::label::derive_display_label(&self);
        self.binding_summary = crate::mapping::serialize_bindings(&self.bindings);
        self
    }

    pub fn ref_id(&self) -> Option<&str> {
        self.ref_id.as_deref()
    }

    pub fn datasource_id(&self) -> Option<i64> {
        self.datasource_id
    }

    pub fn correlation_id(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }

    pub fn mode(&self) -> QueryMode {
        self.mode
    }

    pub fn filter_id(&self) -> Option<&str> {
        self.filter_id.as_deref()
    }

    pub fn filter_definition(&self) -> Option<&FilterDefinition> {
        self.filter_definition.as_ref()
    }

    pub fn aggregation_id(&self) -> Option<i64> {
        self.aggregation_id
    }

    pub fn selected_aggregation(&self) -> Option<&FilterDefinitionAggregation> {
        self.selected_aggregation.as_ref()
    }

    pub fn calculation(&self) -> Option<Calculation> {
        self.calculation
    }

    pub fn percentile(&self) -> Option<f64> {
        self.percentile
    }

    pub fn limit(&self) -> Option<i64> {
        self.limit
    }

    pub fn limit_type(&self) -> LimitType {
        self.limit_type
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn grouping_name(&self) -> Option<&str> {
        self.grouping_name.as_deref()
    }

    pub fn bindings(&self) -> &BTreeMap<String, GroupingBinding> {
        &self.bindings
    }

    pub fn binding(&self, grouping: &str) -> Option<&GroupingBinding> {
        self.bindings.get(grouping)
    }

    /// Compact mapping string, e.g. `region="$region"|env="$env"`
    pub fn binding_summary(&self) -> &str {
        &self.binding_summary
    }

    pub fn include_flags(&self) -> &BTreeMap<String, bool> {
        &self.include_flags
    }

    /// Include flag as explicitly set, if it was
    pub fn include_flag(&self, grouping: &str) -> Option<bool> {
        self.include_flags.get(grouping).copied()
    }

    pub fn long_result(&self) -> bool {
        self.long_result
    }

    pub fn include_grouping_labels(&self) -> bool {
        self.include_grouping_labels
    }

    pub fn include_incomplete_intervals(&self) -> bool {
        self.include_incomplete_intervals
    }

    pub fn should_recalculate(&self) -> bool {
        self.should_recalculate
    }

    pub fn include_aggregate_option(&self) -> bool {
        self.include_aggregate_option
    }

    pub fn exclude_empty_groupings(&self) -> bool {
        self.exclude_empty_groupings
    }

    pub fn display_label(&self) -> Option<&str> {
        self.display_label.as_deref()
    }

    pub fn fast_mode(&self) -> bool {
        self.fast_mode
    }

    /// Groupings the resolution engine iterates: those declared by the
    /// current definition, in catalog order, followed by any other grouping
    /// that still has a binding.
    pub fn binding_keyset(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self
            .filter_definition
            .as_ref()
            .map(|def| def.groupings.iter().map(String::as_str).collect())
            .unwrap_or_default();
        for name in self.bindings.keys() {
            if !keys.contains(&name.as_str()) {
                keys.push(name);
            }
        }
        keys
    }
}

fn default_true() -> bool {
    true
}

/// Treat an explicit `null` the same as a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Like [`null_as_default`] for flags that default to true
fn null_as_true<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(true))
}
