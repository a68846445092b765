//! Query editing (verb module)
//!
//! Edits → QueryConfiguration, with runnability re-evaluated after each one
//!
//! The transforms in [`mutate`] are pure: configuration in, configuration
//! out. [`QueryEditor`] drives them for one editing session and invokes a
//! [`RunTrigger`] whenever an edit leaves the configuration runnable.

mod error;
mod mutate;
mod session;

pub use error::EditError;
pub use mutate::{
    append_manual_value, apply_edit, candidate_values_request, hydrate_definition,
    recompute_display_label, select_aggregation_by_id, set_aggregation, set_alias,
    set_calculation, set_filter, set_grouping_binding, set_grouping_name,
    set_include_aggregate_option, set_include_flag, set_include_grouping_labels,
    set_include_incomplete_intervals, set_limit, set_limit_type, set_limit_value,
    set_long_result, set_manual_values, set_percentile, set_percentile_value,
    set_should_recalculate, Edit, CANDIDATE_VALUES_REF_ID,
};
pub use session::{EditOutcome, QueryEditor, RunTrigger};
