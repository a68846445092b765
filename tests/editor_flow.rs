//! Integration tests for editing sessions
//!
//! Drives a QueryEditor through the edits a user makes and checks the
//! Blocked/Runnable transitions and when the run trigger fires.

mod common;

use common::{definition, load_catalog, load_query, RecordingTrigger};
use facetq::{
    Blocker, Calculation, Edit, EditError, GroupingBinding, QueryConfiguration, QueryEditor, Runnability,
};

fn new_editor() -> QueryEditor<RecordingTrigger> {
    QueryEditor::new(QueryConfiguration::new(), RecordingTrigger::default())
}

#[test]
fn test_single_aggregation_filter_runs_immediately() {
    let mut editor = new_editor();

    let outcome = editor.apply(Edit::Filter(definition("f1"))).unwrap();

    assert_eq!(outcome.state, Runnability::Runnable);
    assert!(outcome.triggered);
    assert_eq!(editor.config().selected_aggregation().map(|a| a.name.as_str()), Some("a1"));
    assert_eq!(editor.config().calculation(), Some(Calculation::Sum));
    assert_eq!(editor.config().display_label(), Some("Orders - a1 - Sum"));
    assert_eq!(editor.trigger().count(), 1);
}

#[test]
fn test_multi_aggregation_filter_stays_blocked() {
    let mut editor = new_editor();

    let outcome = editor.apply(Edit::Filter(definition("f2"))).unwrap();
    assert_eq!(outcome.state, Runnability::Blocked(Blocker::NoAggregation));

    let outcome = editor.apply(Edit::AggregationId(10)).unwrap();
    assert_eq!(outcome.state, Runnability::Blocked(Blocker::NoCalculation));

    let outcome = editor.apply(Edit::Calculation(Some(Calculation::Percentiles))).unwrap();
    assert_eq!(outcome.state, Runnability::Blocked(Blocker::MissingPercentile));

    let outcome = editor.apply(Edit::Percentile("1.5".to_string())).unwrap();
    assert_eq!(outcome.state, Runnability::Blocked(Blocker::PercentileOutOfRange(1.5)));
    assert_eq!(editor.trigger().count(), 0);

    let outcome = editor.apply(Edit::Percentile("0.99".to_string())).unwrap();
    assert!(outcome.triggered);
    assert_eq!(editor.trigger().count(), 1);
    assert_eq!(
        editor.trigger().last().and_then(|c| c.display_label()),
        Some("Requests - Latency - Percentiles")
    );
}

#[test]
fn test_one_run_per_qualifying_edit() {
    let mut editor = new_editor();
    editor.apply(Edit::Filter(definition("f1"))).unwrap();

    editor.apply(Edit::Alias("orders".to_string())).unwrap();
    editor.apply(Edit::LongResult(true)).unwrap();
    editor.apply(Edit::Binding {
        grouping: "region".to_string(),
        binding: Some(GroupingBinding::manual(["us-east"])),
    })
    .unwrap();
    assert_eq!(editor.trigger().count(), 4);

    // Same value again: nothing changed, nothing runs
    editor.apply(Edit::LongResult(true)).unwrap();
    assert_eq!(editor.trigger().count(), 4);
}

#[test]
fn test_blocking_edit_suppresses_run() {
    let mut editor = new_editor();
    editor.apply(Edit::Filter(definition("f1"))).unwrap();

    let outcome = editor.apply(Edit::Limit("0".to_string())).unwrap();
    assert_eq!(outcome.state, Runnability::Blocked(Blocker::InvalidLimit(0)));
    assert!(!outcome.triggered);

    // Garbage clears the limit, which unblocks
    let outcome = editor.apply(Edit::Limit("many".to_string())).unwrap();
    assert!(outcome.triggered);
    assert_eq!(editor.config().limit(), None);
    assert_eq!(editor.trigger().count(), 2);
}

#[test]
fn test_switching_aggregation_keeps_offered_calculation() {
    let mut editor = new_editor();
    editor.apply(Edit::Filter(definition("f2"))).unwrap();
    editor.apply(Edit::AggregationId(10)).unwrap();
    editor.apply(Edit::Calculation(Some(Calculation::Avg))).unwrap();

    editor.apply(Edit::AggregationId(12)).unwrap();
    assert_eq!(editor.config().calculation(), Some(Calculation::Avg));

    editor.apply(Edit::AggregationId(11)).unwrap();
    assert_eq!(editor.config().calculation(), Some(Calculation::Count));
    assert_eq!(editor.config().display_label(), Some("Requests - Volume - Count"));
}

#[test]
fn test_inconsistent_selection_rejected() {
    let mut editor = new_editor();
    editor.apply(Edit::Filter(definition("f2"))).unwrap();
    editor.apply(Edit::AggregationId(11)).unwrap();
    let before = editor.config().clone();

    let err = editor.apply(Edit::Calculation(Some(Calculation::Sum))).unwrap_err();
    assert!(matches!(err, EditError::CalculationNotOffered { .. }));

    let foreign = definition("f1").aggregations[0].clone();
    let err = editor.apply(Edit::Aggregation(foreign)).unwrap_err();
    assert!(matches!(err, EditError::UnknownAggregation { aggregation_id: 1, .. }));

    assert_eq!(editor.config(), &before);
}

#[test]
fn test_variables_mode_needs_grouping() {
    let config = QueryConfiguration::new().with_mode(facetq::QueryMode::Variables);
    let mut editor = QueryEditor::new(config, RecordingTrigger::default());

    let outcome = editor.apply(Edit::Filter(definition("f1"))).unwrap();
    assert_eq!(outcome.state, Runnability::Blocked(Blocker::NoGroupingName));

    let outcome = editor.apply(Edit::GroupingName(Some("env".to_string()))).unwrap();
    assert!(outcome.triggered);
}

#[test]
fn test_stored_query_hydrates_on_definitions() {
    let stored = load_query("stored_query.json");
    let mut editor = QueryEditor::new(stored, RecordingTrigger::default());
    assert_eq!(
        editor.state(),
        &Runnability::Blocked(Blocker::DefinitionNotLoaded("f2".to_string()))
    );
    assert_eq!(editor.config().correlation_id(), Some("k3j9x0qa"));

    let ticket = editor.request_definitions().unwrap();
    let outcome = editor
        .receive_definitions(&ticket, load_catalog("catalog.yaml").filter_definitions)
        .unwrap();

    assert!(outcome.triggered);
    assert_eq!(editor.config().display_label(), Some("Requests - Latency - Percentiles"));
    assert_eq!(editor.config().limit(), Some(5));
    assert_eq!(editor.config().binding_summary(), r#"service="$service"|status="$$__agg""#);
}

#[test]
fn test_stale_definitions_discarded() {
    let stored = load_query("stored_query.json");
    let mut editor = QueryEditor::new(stored, RecordingTrigger::default());
    let ticket = editor.request_definitions().unwrap();

    // User picks another filter before the response arrives
    editor.apply(Edit::Filter(definition("f1"))).unwrap();

    let outcome = editor.receive_definitions(&ticket, load_catalog("catalog.yaml").filter_definitions);
    assert!(outcome.is_none());
    assert!(editor.cache().definitions().is_none());
}

#[test]
fn test_grouping_values_cached_per_filter() {
    let mut editor = new_editor();
    editor.apply(Edit::Filter(definition("f1"))).unwrap();

    let (ticket, request) = editor.request_grouping_values("region").unwrap();
    assert_eq!(request.grouping_name(), Some("region"));
    assert!(!request.include_aggregate_option());
    // Already in flight
    assert!(editor.request_grouping_values("region").is_none());

    assert!(editor.receive_grouping_values(&ticket, vec!["us-east".to_string()]));
    assert_eq!(editor.grouping_values("region"), Some(&["us-east".to_string()][..]));
    // Cached
    assert!(editor.request_grouping_values("region").is_none());

    editor.apply(Edit::Filter(definition("f2"))).unwrap();
    assert!(editor.grouping_values("region").is_none());
    assert!(editor.request_grouping_values("region").is_some());
}
