//! Configuration transforms
//!
//! Each transform takes a configuration by value and returns the edited
//! configuration, so a partially applied edit is never observable. Transforms
//! that touch the selection chain or the bindings re-derive the display label
//! and compact mapping string before returning.

use tracing::trace;
use crate::catalog::{Calculation, FilterDefinition, FilterDefinitionAggregation, LimitType};
use crate::query::{is_sentinel, GroupingBinding, QueryConfiguration, QueryMode};
use super::error::EditError;

/// Ref id given to candidate-values requests
pub const CANDIDATE_VALUES_REF_ID: &str = "variableCheck";

/// A single field-level edit, as issued by the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub enum Edit {
    Filter(FilterDefinition),
    Aggregation(FilterDefinitionAggregation),
    AggregationId(i64),
    Calculation(Option<Calculation>),
    /// Raw percentile text; blank or unparsable clears it
    Percentile(String),
    /// Raw limit text; blank or unparsable clears it
    Limit(String),
    LimitType(LimitType),
    Alias(String),
    GroupingName(Option<String>),
    /// `None` removes the grouping's binding
    Binding { grouping: String, binding: Option<GroupingBinding> },
    IncludeFlag { grouping: String, included: bool },
    ManualValues { grouping: String, values: Vec<String> },
    AppendManualValue { grouping: String, value: String },
    LongResult(bool),
    IncludeGroupingLabels(bool),
    IncludeIncompleteIntervals(bool),
    ShouldRecalculate(bool),
    IncludeAggregateOption(bool),
}

impl Edit {
    /// Whether a successful edit of this kind should re-run a runnable
    /// query. The aggregate option only affects variable option listing.
    pub fn triggers_run(&self) -> bool {
        !matches!(self, Edit::IncludeAggregateOption(_))
    }
}

/// Apply one edit
pub fn apply_edit(config: QueryConfiguration, edit: Edit) -> Result<QueryConfiguration, EditError> {
    match edit {
        Edit::Filter(definition) => Ok(set_filter(config, &definition)),
        Edit::Aggregation(aggregation) => set_aggregation(config, &aggregation),
        Edit::AggregationId(id) => select_aggregation_by_id(config, id),
        Edit::Calculation(calculation) => set_calculation(config, calculation),
        Edit::Percentile(text) => Ok(set_percentile(config, &text)),
        Edit::Limit(text) => Ok(set_limit(config, &text)),
        Edit::LimitType(limit_type) => Ok(set_limit_type(config, limit_type)),
        Edit::Alias(text) => Ok(set_alias(config, &text)),
        Edit::GroupingName(name) => Ok(set_grouping_name(config, name.as_deref())),
        Edit::Binding { grouping, binding } => set_grouping_binding(config, &grouping, binding),
        Edit::IncludeFlag { grouping, included } => Ok(set_include_flag(config, &grouping, included)),
        Edit::ManualValues { grouping, values } => set_manual_values(config, &grouping, values),
        Edit::AppendManualValue { grouping, value } => append_manual_value(config, &grouping, value),
        Edit::LongResult(on) => Ok(set_long_result(config, on)),
        Edit::IncludeGroupingLabels(on) => Ok(set_include_grouping_labels(config, on)),
        Edit::IncludeIncompleteIntervals(on) => Ok(set_include_incomplete_intervals(config, on)),
        Edit::ShouldRecalculate(on) => Ok(set_should_recalculate(config, on)),
        Edit::IncludeAggregateOption(on) => Ok(set_include_aggregate_option(config, on)),
    }
}

// ============================================================================
// Selection chain
// ============================================================================

/// Select a filter definition.
///
/// Auto-selects the aggregation when the definition has exactly one, and the
/// calculation when that aggregation has exactly one. All bindings are
/// cleared.
pub fn set_filter(mut config: QueryConfiguration, definition: &FilterDefinition) -> QueryConfiguration {
    let aggregation = definition.sole_aggregation().cloned();
    config.calculation = aggregation.as_ref().and_then(|a| a.sole_calculation());
    config.aggregation_id = aggregation.as_ref().map(|a| a.id);
    config.selected_aggregation = aggregation;
    config.filter_id = Some(definition.id.clone());
    config.filter_definition = Some(definition.clone());
    config.bindings.clear();
    config.refresh_derived()
}

/// Select an aggregation of the current filter.
///
/// The current calculation survives if the new aggregation offers it;
/// otherwise it falls back to the aggregation's sole calculation, if any.
pub fn set_aggregation(
    mut config: QueryConfiguration,
    aggregation: &FilterDefinitionAggregation,
) -> Result<QueryConfiguration, EditError> {
    let definition = config.filter_definition.as_ref().ok_or(EditError::NoFilterSelected)?;
    if !definition.owns_aggregation(aggregation) {
        return Err(EditError::UnknownAggregation {
            filter_id: definition.id.clone(),
            aggregation_id: aggregation.id,
        });
    }

    config.calculation = config
        .calculation
        .filter(|c| aggregation.offers(*c))
        .or_else(|| aggregation.sole_calculation());
    config.aggregation_id = Some(aggregation.id);
    config.selected_aggregation = Some(aggregation.clone());
    Ok(config.refresh_derived())
}

/// Select an aggregation of the current filter by id
pub fn select_aggregation_by_id(config: QueryConfiguration, id: i64) -> Result<QueryConfiguration, EditError> {
    let definition = config.filter_definition.as_ref().ok_or(EditError::NoFilterSelected)?;
    let aggregation = definition
        .get_aggregation(id)
        .cloned()
        .ok_or_else(|| EditError::UnknownAggregation {
            filter_id: definition.id.clone(),
            aggregation_id: id,
        })?;
    set_aggregation(config, &aggregation)
}

/// Set or clear the calculation. A calculation must be offered by the
/// selected aggregation.
pub fn set_calculation(
    mut config: QueryConfiguration,
    calculation: Option<Calculation>,
) -> Result<QueryConfiguration, EditError> {
    if let Some(calculation) = calculation {
        let aggregation = config
            .selected_aggregation
            .as_ref()
            .ok_or(EditError::NoAggregationSelected)?;
        if !aggregation.offers(calculation) {
            return Err(EditError::CalculationNotOffered {
                aggregation: aggregation.name.clone(),
                calculation,
            });
        }
    }
    config.calculation = calculation;
    Ok(config.refresh_derived())
}

/// Set the percentile from user text
pub fn set_percentile(config: QueryConfiguration, text: &str) -> QueryConfiguration {
    let value = parse_optional(text, "percentile");
    set_percentile_value(config, value)
}

/// Set or clear the percentile. Out-of-range values are kept and block
/// execution rather than being rejected here.
pub fn set_percentile_value(mut config: QueryConfiguration, percentile: Option<f64>) -> QueryConfiguration {
    config.percentile = percentile.filter(|p| p.is_finite());
    config
}

/// Set the limit from user text
pub fn set_limit(config: QueryConfiguration, text: &str) -> QueryConfiguration {
    let value = parse_optional(text, "limit");
    set_limit_value(config, value)
}

pub fn set_limit_value(mut config: QueryConfiguration, limit: Option<i64>) -> QueryConfiguration {
    config.limit = limit;
    config
}

pub fn set_limit_type(mut config: QueryConfiguration, limit_type: LimitType) -> QueryConfiguration {
    config.limit_type = limit_type;
    config
}

/// Set the series alias; blank text clears it
pub fn set_alias(mut config: QueryConfiguration, text: &str) -> QueryConfiguration {
    config.alias = (!text.trim().is_empty()).then(|| text.to_string());
    config
}

/// Set the grouping a variables-mode configuration lists; blank clears it
pub fn set_grouping_name(mut config: QueryConfiguration, name: Option<&str>) -> QueryConfiguration {
    config.grouping_name = name
        .filter(|n| !n.trim().is_empty())
        .map(str::to_string);
    config
}

// ============================================================================
// Bindings
// ============================================================================

/// Replace a grouping's binding, or remove it with `None`.
///
/// Binding a grouping to `Ignored` forces its include flag off. The flag
/// is kept when the binding is later cleared or replaced. A variable
/// reference may not use one of the sentinel ids, since it would be read
/// back as `Ignored` or `Manual` once stored.
pub fn set_grouping_binding(
    mut config: QueryConfiguration,
    grouping: &str,
    binding: Option<GroupingBinding>,
) -> Result<QueryConfiguration, EditError> {
    if let Some(GroupingBinding::VariableRef { id, .. }) = &binding {
        if is_sentinel(id) {
            return Err(EditError::ReservedVariableId {
                grouping: grouping.to_string(),
                id: id.clone(),
            });
        }
    }

    match binding {
        None => {
            config.bindings.remove(grouping);
        }
        Some(binding) => {
            if binding.is_ignored() {
                config.include_flags.insert(grouping.to_string(), false);
            }
            config.bindings.insert(grouping.to_string(), binding);
        }
    }
    Ok(config.refresh_derived())
}

/// Set whether a grouping contributes a labeled result axis. No effect on an
/// ignored grouping.
pub fn set_include_flag(mut config: QueryConfiguration, grouping: &str, included: bool) -> QueryConfiguration {
    if config.bindings.get(grouping).is_some_and(GroupingBinding::is_ignored) {
        trace!(grouping, "include flag ignored for an ignored grouping");
        return config;
    }
    config.include_flags.insert(grouping.to_string(), included);
    config
}

/// Replace a manual binding's values wholesale
pub fn set_manual_values(
    mut config: QueryConfiguration,
    grouping: &str,
    values: Vec<String>,
) -> Result<QueryConfiguration, EditError> {
    match config.bindings.get_mut(grouping) {
        Some(GroupingBinding::Manual(current)) => *current = values,
        _ => {
            return Err(EditError::NotManual {
                grouping: grouping.to_string(),
            })
        }
    }
    Ok(config.refresh_derived())
}

/// Add one value to a manual binding; a value already present is not
/// repeated
pub fn append_manual_value(
    config: QueryConfiguration,
    grouping: &str,
    value: String,
) -> Result<QueryConfiguration, EditError> {
    let mut values = config
        .bindings
        .get(grouping)
        .and_then(GroupingBinding::manual_values)
        .ok_or_else(|| EditError::NotManual {
            grouping: grouping.to_string(),
        })?
        .to_vec();
    if !values.contains(&value) {
        values.push(value);
    }
    set_manual_values(config, grouping, values)
}

// ============================================================================
// Toggles
// ============================================================================

pub fn set_long_result(mut config: QueryConfiguration, on: bool) -> QueryConfiguration {
    config.long_result = on;
    config
}

pub fn set_include_grouping_labels(mut config: QueryConfiguration, on: bool) -> QueryConfiguration {
    config.include_grouping_labels = on;
    config
}

pub fn set_include_incomplete_intervals(mut config: QueryConfiguration, on: bool) -> QueryConfiguration {
    config.include_incomplete_intervals = on;
    config
}

pub fn set_should_recalculate(mut config: QueryConfiguration, on: bool) -> QueryConfiguration {
    config.should_recalculate = on;
    config
}

pub fn set_include_aggregate_option(mut config: QueryConfiguration, on: bool) -> QueryConfiguration {
    config.include_aggregate_option = on;
    config
}

// ============================================================================
// Derived state and catalog results
// ============================================================================

/// Re-derive the display label
pub fn recompute_display_label(mut config: QueryConfiguration) -> QueryConfiguration {
    config.display_label = crate::label::derive_display_label(&config);
    config
}

/// Attach the definition for a configuration loaded with only a filter id.
///
/// The selected aggregation is re-derived from the stored aggregation id.
/// Configurations that already carry a definition, or whose filter id is
/// not among `definitions`, are returned unchanged.
pub fn hydrate_definition(mut config: QueryConfiguration, definitions: &[FilterDefinition]) -> QueryConfiguration {
    if config.filter_definition.is_some() {
        return config;
    }
    let Some(filter_id) = config.filter_id.as_deref() else {
        return config;
    };
    let Some(definition) = definitions.iter().find(|d| d.id == filter_id) else {
        return config;
    };

    if config.selected_aggregation.is_none() {
        config.selected_aggregation = config
            .aggregation_id
            .and_then(|id| definition.get_aggregation(id))
            .cloned();
    }
    config.filter_definition = Some(definition.clone());
    config.refresh_derived()
}

/// The variables-mode copy of a configuration used to ask the catalog for a
/// grouping's candidate values
pub fn candidate_values_request(config: &QueryConfiguration, grouping: &str) -> QueryConfiguration {
    let mut request = config.clone();
    request.grouping_name = Some(grouping.to_string());
    request.include_aggregate_option = false;
    request.mode = QueryMode::Variables;
    request.ref_id = Some(CANDIDATE_VALUES_REF_ID.to_string());
    request
}

/// Parse optional numeric user input from its longest numeric prefix, so
/// `"12.5"` as a limit reads as 12 and `"10abc"` as 10. Blank input, or
/// input with no numeric prefix, yields `None`.
fn parse_optional<T: std::str::FromStr>(text: &str, field: &str) -> Option<T> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    let value = (1..=trimmed.len())
        .rev()
        .filter(|end| trimmed.is_char_boundary(*end))
        .find_map(|end| trimmed[..end].parse().ok());
    if value.is_none() {
        trace!(field, input = trimmed, "unparsable numeric input cleared");
    }
    value
}
