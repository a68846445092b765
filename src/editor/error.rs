use thiserror::Error;
use crate::catalog::Calculation;

/// Errors rejecting an edit. A rejected edit leaves the configuration
/// untouched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditError {
    #[error("No filter selected")]
    NoFilterSelected,

    #[error("Aggregation {aggregation_id} does not belong to filter '{filter_id}'")]
    UnknownAggregation { filter_id: String, aggregation_id: i64 },

    #[error("No aggregation selected")]
    NoAggregationSelected,

    #[error("Aggregation '{aggregation}' does not offer {calculation}")]
    CalculationNotOffered { aggregation: String, calculation: Calculation },

    #[error("Grouping '{grouping}' is not bound to manual values")]
    NotManual { grouping: String },

    #[error("Variable id '{id}' bound to grouping '{grouping}' is reserved")]
    ReservedVariableId { grouping: String, id: String },
}
