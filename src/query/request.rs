use serde::{Deserialize, Serialize};
use super::config::QueryConfiguration;

/// Concrete filter values for one grouping, produced at run time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedGroupingFilter {
    pub grouping: String,
    pub filters: Vec<String>,
    /// Whether the grouping contributes a labeled result axis
    pub return_grouping_values: bool,
}

/// Request handed to the execution backend.
///
/// Carries every configuration field (with `fast_mode` forced on) plus the
/// resolved grouping filters. `grouping_filters` is `None` when no grouping
/// produced a binding, which is distinct from filtering to nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionRequest {
    #[serde(flatten)]
    pub query: QueryConfiguration,
    #[serde(rename = "groupingFilters")]
    pub grouping_filters: Option<Vec<ResolvedGroupingFilter>>,
}

impl ExecutionRequest {
    /// Resolved filter for a grouping, if one was produced
    pub fn grouping_filter(&self, grouping: &str) -> Option<&ResolvedGroupingFilter> {
        self.grouping_filters
            .as_ref()?
            .iter()
            .find(|f| f.grouping == grouping)
    }
}
