//! Scalar types shared by the catalog and query configurations

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Calculation
// ============================================================================

/// Statistical reducer applied within an aggregation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Calculation {
    /// Number of events
    Count,
    /// Sum of the calculation field
    Sum,
    /// Average of the calculation field
    Avg,
    /// Maximum value
    Max,
    /// Minimum value
    Min,
    /// Approximate number of distinct values
    ApproxCountDistinct,
    /// Percentile of the calculation field; needs a percentile parameter
    Percentiles,
}

impl Calculation {
    /// All calculations, in catalog order
    pub const ALL: [Calculation; 7] = [
        Calculation::Count,
        Calculation::Sum,
        Calculation::Avg,
        Calculation::Max,
        Calculation::Min,
        Calculation::ApproxCountDistinct,
        Calculation::Percentiles,
    ];

    /// Wire token, e.g. `APPROX_COUNT_DISTINCT`
    pub fn as_str(&self) -> &'static str {
        match self {
            Calculation::Count => "COUNT",
            Calculation::Sum => "SUM",
            Calculation::Avg => "AVG",
            Calculation::Max => "MAX",
            Calculation::Min => "MIN",
            Calculation::ApproxCountDistinct => "APPROX_COUNT_DISTINCT",
            Calculation::Percentiles => "PERCENTILES",
        }
    }

    /// Human-readable name used in display labels
    pub fn pretty(&self) -> &'static str {
        match self {
            Calculation::Count => "Count",
            Calculation::Sum => "Sum",
            Calculation::Avg => "Avg",
            Calculation::Max => "Max",
            Calculation::Min => "Min",
            Calculation::ApproxCountDistinct => "Approx. Count Distinct",
            Calculation::Percentiles => "Percentiles",
        }
    }

    /// Whether this calculation needs a percentile parameter
    pub fn requires_percentile(&self) -> bool {
        matches!(self, Calculation::Percentiles)
    }
}

impl fmt::Display for Calculation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error when parsing a calculation token
#[derive(Debug, Clone)]
pub struct ParseCalculationError {
    pub input: String,
}

impl fmt::Display for ParseCalculationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unknown calculation '{}'. Valid options: COUNT, SUM, AVG, MAX, MIN, APPROX_COUNT_DISTINCT, PERCENTILES",
            self.input
        )
    }
}

impl std::error::Error for ParseCalculationError {}

impl FromStr for Calculation {
    type Err = ParseCalculationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Calculation::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ParseCalculationError { input: s.to_string() })
    }
}

impl<'de> Deserialize<'de> for Calculation {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Calculation::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl Serialize for Calculation {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

// ============================================================================
// LimitType
// ============================================================================

/// Which end of the ranking a limit keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LimitType {
    /// Keep the N largest grouped values per time slice
    #[default]
    Top,
    /// Keep the N smallest grouped values per time slice
    Bottom,
}

impl fmt::Display for LimitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LimitType::Top => write!(f, "Top"),
            LimitType::Bottom => write!(f, "Bottom"),
        }
    }
}
