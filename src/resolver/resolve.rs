use tracing::debug;
use crate::query::{
    ExecutionRequest, GroupingBinding, QueryConfiguration, ResolvedGroupingFilter, AGGREGATE_SENTINEL,
};
use crate::variables::{RegistrySnapshot, ScopedVars};

/// Resolve every bound grouping to concrete filter values
///
/// Groupings are visited in binding keyset order (definition groupings
/// first, then any other bound grouping). Returns `None` when no grouping
/// produced a filter, which is distinct from `Some` of an empty filter list.
///
/// # Arguments
/// * `config` - The configuration being executed
/// * `snapshot` - Variables defined by the host at execution time
/// * `scoped` - Values already bound by the enclosing execution context
pub fn resolve_grouping_filters(
    config: &QueryConfiguration,
    snapshot: &RegistrySnapshot,
    scoped: &ScopedVars,
) -> Option<Vec<ResolvedGroupingFilter>> {
    let resolved: Vec<ResolvedGroupingFilter> = config
        .binding_keyset()
        .into_iter()
        .filter_map(|grouping| resolve_grouping(config, grouping, snapshot, scoped))
        .collect();

    if resolved.is_empty() {
        None
    } else {
        Some(resolved)
    }
}

/// Assemble the request handed to the execution backend
///
/// Every configuration field is carried over with the display label
/// re-derived, `fast_mode` forced on and `excludeEmptyGroupings` forced off.
pub fn build_execution_request(
    config: &QueryConfiguration,
    snapshot: &RegistrySnapshot,
    scoped: &ScopedVars,
) -> ExecutionRequest {
    let grouping_filters = resolve_grouping_filters(config, snapshot, scoped);

    let mut query = config.clone().refresh_derived();
    query.fast_mode = true;
    query.exclude_empty_groupings = false;

    debug!(
        filter_id = query.filter_id(),
        groupings = grouping_filters.as_ref().map_or(0, Vec::len),
        "built execution request"
    );

    ExecutionRequest { query, grouping_filters }
}

fn resolve_grouping(
    config: &QueryConfiguration,
    grouping: &str,
    snapshot: &RegistrySnapshot,
    scoped: &ScopedVars,
) -> Option<ResolvedGroupingFilter> {
    let binding = config.binding(grouping)?;
    let included = config.include_flag(grouping).unwrap_or(true);

    let (filters, return_grouping_values) = match binding {
        // 1. Aggregate across the grouping, never returned as an axis
        GroupingBinding::Ignored => (vec![AGGREGATE_SENTINEL.to_string()], false),

        // 2. Values typed in by the user
        GroupingBinding::Manual(values) => (values.clone(), included),

        // 3. Dashboard variable, by registry id or embedded correlation id
        GroupingBinding::VariableRef { id, .. } => {
            let Some(variable) = snapshot.find_reference(id) else {
                debug!(grouping, reference = %id, "variable reference not found, grouping omitted");
                return None;
            };
            let filters = match scoped.get(&variable.registry_id) {
                Some(value) => vec![value.to_string()],
                None => variable.current.to_filters(),
            };
            (filters, included)
        }
    };

    Some(ResolvedGroupingFilter {
        grouping: grouping.to_string(),
        filters,
        return_grouping_values,
    })
}
