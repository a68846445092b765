//! Display label derivation (verb module)
//!
//! QueryConfiguration → "Filter - Aggregation - Calculation"

use crate::query::QueryConfiguration;

/// Separator between label parts
pub const LABEL_SEPARATOR: &str = " - ";

/// Derive the human-readable label for a configuration.
///
/// `None` until a filter definition is selected. The aggregation name is
/// appended when an aggregation is selected, and the calculation's pretty
/// name is appended after it when a calculation is also set. Never fails,
/// even for a calculation the aggregation does not offer.
pub fn derive_display_label(config: &QueryConfiguration) -> Option<String> {
    let definition = config.filter_definition()?;
    let mut label = definition.name.clone();

    if let Some(aggregation) = config.selected_aggregation() {
        label.push_str(LABEL_SEPARATOR);
        label.push_str(&aggregation.name);

        if let Some(calculation) = config.calculation() {
            label.push_str(LABEL_SEPARATOR);
            label.push_str(calculation.pretty());
        }
    }

    Some(label)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(yaml: &str) -> QueryConfiguration {
        serde_yaml::from_str(yaml).unwrap()
    }

    const DEFINITION: &str = r#"
filterId: f1
filter_definition:
  id: f1
  name: Requests
  groupings: []
  aggregations:
    - {id: 1, name: Latency, calculations: [AVG]}
"#;

    #[test]
    fn test_no_definition_no_label() {
        assert_eq!(derive_display_label(&QueryConfiguration::default()), None);
    }

    #[test]
    fn test_definition_only() {
        assert_eq!(derive_display_label(&config(DEFINITION)).as_deref(), Some("Requests"));
    }

    #[test]
    fn test_full_label() {
        let yaml = format!(
            "{}aggregationId: 1\nselected_agg: {{id: 1, name: Latency, calculations: [AVG, APPROX_COUNT_DISTINCT]}}\ncalculation: APPROX_COUNT_DISTINCT\n",
            DEFINITION
        );
        assert_eq!(
            derive_display_label(&config(&yaml)).as_deref(),
            Some("Requests - Latency - Approx. Count Distinct")
        );
    }

    #[test]
    fn test_calculation_without_aggregation_is_not_shown() {
        let yaml = format!("{}calculation: SUM\n", DEFINITION);
        assert_eq!(derive_display_label(&config(&yaml)).as_deref(), Some("Requests"));
    }

    #[test]
    fn test_inconsistent_pairing_does_not_panic() {
        // Calculation not offered by the selected aggregation
        let yaml = format!(
            "{}aggregationId: 1\nselected_agg: {{id: 1, name: Latency, calculations: [AVG]}}\ncalculation: PERCENTILES\n",
            DEFINITION
        );
        assert_eq!(
            derive_display_label(&config(&yaml)).as_deref(),
            Some("Requests - Latency - Percentiles")
        );
    }
}
