//! Runnability evaluation (verb module)
//!
//! A configuration is either Runnable or Blocked. There is no stored
//! transition history: the state is recomputed from the configuration after
//! every edit.

use std::fmt;
use crate::query::{QueryConfiguration, QueryMode};

/// Why a configuration cannot run yet
#[derive(Debug, Clone, PartialEq)]
pub enum Blocker {
    /// No filter id, or a blank one
    NoFilter,
    /// Filter id set but its definition has not been resolved
    DefinitionNotLoaded(String),
    /// No aggregation id, or one that is not positive
    NoAggregation,
    /// Aggregation id set but the aggregation object is missing
    AggregationNotResolved(i64),
    NoCalculation,
    /// Limit set to zero or a negative number
    InvalidLimit(i64),
    /// Percentiles selected without a percentile
    MissingPercentile,
    /// Percentile outside (0, 1]
    PercentileOutOfRange(f64),
    /// A variables-mode configuration without a grouping to list
    NoGroupingName,
}

impl fmt::Display for Blocker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Blocker::NoFilter => write!(f, "No filter selected"),
            Blocker::DefinitionNotLoaded(id) => write!(f, "Filter definition '{}' not loaded", id),
            Blocker::NoAggregation => write!(f, "No aggregation selected"),
            Blocker::AggregationNotResolved(id) => write!(f, "Aggregation {} not resolved", id),
            Blocker::NoCalculation => write!(f, "No calculation selected"),
            Blocker::InvalidLimit(n) => write!(f, "Limit must be positive, got {}", n),
            Blocker::MissingPercentile => write!(f, "Percentiles requires a percentile"),
            Blocker::PercentileOutOfRange(p) => {
                write!(f, "Percentile must be in (0, 1], got {}", p)
            }
            Blocker::NoGroupingName => write!(f, "No grouping selected for variable"),
        }
    }
}

/// The two editor states
#[derive(Debug, Clone, PartialEq)]
pub enum Runnability {
    Runnable,
    Blocked(Blocker),
}

impl Runnability {
    pub fn is_runnable(&self) -> bool {
        matches!(self, Runnability::Runnable)
    }

    pub fn blocker(&self) -> Option<&Blocker> {
        match self {
            Runnability::Runnable => None,
            Runnability::Blocked(blocker) => Some(blocker),
        }
    }
}

/// Evaluate the run predicate, reporting the first blocking condition
pub fn evaluate(config: &QueryConfiguration) -> Runnability {
    match check(config) {
        Ok(()) => Runnability::Runnable,
        Err(blocker) => Runnability::Blocked(blocker),
    }
}

/// Whether the configuration is complete enough to execute
pub fn is_runnable(config: &QueryConfiguration) -> bool {
    check(config).is_ok()
}

/// Whether a percentile lies in (0, 1]
pub fn percentile_in_range(p: f64) -> bool {
    p > 0.0 && p <= 1.0
}

fn check(config: &QueryConfiguration) -> Result<(), Blocker> {
    // 1. Filter chosen and resolved
    let filter_id = config
        .filter_id()
        .filter(|id| !id.is_empty())
        .ok_or(Blocker::NoFilter)?;
    if config.filter_definition().is_none() {
        return Err(Blocker::DefinitionNotLoaded(filter_id.to_string()));
    }

    // 2. Aggregation chosen and resolved
    let aggregation_id = config
        .aggregation_id()
        .filter(|id| *id > 0)
        .ok_or(Blocker::NoAggregation)?;
    if config.selected_aggregation().is_none() {
        return Err(Blocker::AggregationNotResolved(aggregation_id));
    }

    // 3. Calculation
    let calculation = config.calculation().ok_or(Blocker::NoCalculation)?;

    // 4. Limit, when set, is positive
    if let Some(limit) = config.limit() {
        if limit <= 0 {
            return Err(Blocker::InvalidLimit(limit));
        }
    }

    // 5. Percentile parameter
    if calculation.requires_percentile() {
        let p = config.percentile().ok_or(Blocker::MissingPercentile)?;
        if !percentile_in_range(p) {
            return Err(Blocker::PercentileOutOfRange(p));
        }
    }

    // 6. Variables mode lists one grouping
    if config.mode() == QueryMode::Variables
        && config.grouping_name().map_or(true, |g| g.trim().is_empty())
    {
        return Err(Blocker::NoGroupingName);
    }

    Ok(())
}
