//! Variable registry snapshot

use std::collections::BTreeMap;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::trace;
use crate::query::QueryConfiguration;

/// Current value of a dashboard variable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VariableValue {
    Single(String),
    Multi(Vec<String>),
}

impl Default for VariableValue {
    fn default() -> Self {
        VariableValue::Multi(Vec::new())
    }
}

impl VariableValue {
    /// Values as a filter list; a scalar becomes a one-element list
    pub fn to_filters(&self) -> Vec<String> {
        match self {
            VariableValue::Single(value) => vec![value.clone()],
            VariableValue::Multi(values) => values.clone(),
        }
    }
}

/// A named variable defined by the host dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDescriptor {
    /// Id assigned by the host registry; may differ across dashboards
    #[serde(rename = "id")]
    pub registry_id: String,
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    /// Embedded configuration, present when the variable's options are
    /// computed by a query configuration of this crate. Variables of other
    /// datasources carry their own query text here, which is read as `None`.
    #[serde(default, deserialize_with = "own_query_or_none")]
    pub query: Option<QueryConfiguration>,
    #[serde(default)]
    pub current: VariableValue,
}

impl VariableDescriptor {
    /// A plain (not query-driven) variable
    pub fn new(registry_id: impl Into<String>, name: impl Into<String>, current: VariableValue) -> Self {
        Self {
            registry_id: registry_id.into(),
            name: name.into(),
            label: None,
            query: None,
            current,
        }
    }

    /// Attach the configuration that drives this variable
    pub fn driven_by(mut self, query: QueryConfiguration) -> Self {
        self.query = Some(query);
        self
    }

    /// Correlation id of the embedded configuration, if query-driven
    pub fn local_correlation_id(&self) -> Option<&str> {
        self.query.as_ref()?.correlation_id()
    }

    /// Whether a binding reference points at this variable
    pub fn matches_reference(&self, reference: &str) -> bool {
        correlation_matches(&self.registry_id, self.local_correlation_id(), reference)
    }

    /// Label shown to users, falling back to the name
    pub fn display_name(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }
}

/// Two-way identity match: a reference matches either the registry id or the
/// embedded configuration's correlation id.
pub fn correlation_matches(registry_id: &str, local_correlation_id: Option<&str>, reference: &str) -> bool {
    registry_id == reference || local_correlation_id == Some(reference)
}

/// Host collaborator listing the currently defined variables
pub trait VariableRegistry {
    fn list_variables(&self) -> Vec<VariableDescriptor>;

    fn current_value(&self, registry_id: &str) -> Option<VariableValue>;
}

/// Read-only copy of the registry taken at resolution time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    #[serde(default)]
    variables: Vec<VariableDescriptor>,
}

impl RegistrySnapshot {
    pub fn new(variables: Vec<VariableDescriptor>) -> Self {
        Self { variables }
    }

    /// Snapshot a live registry, reading each variable's current value
    pub fn capture<R: VariableRegistry + ?Sized>(registry: &R) -> Self {
        let variables = registry
            .list_variables()
            .into_iter()
            .map(|mut var| {
                if let Some(current) = registry.current_value(&var.registry_id) {
                    var.current = current;
                }
                var
            })
            .collect();
        Self { variables }
    }

    pub fn variables(&self) -> &[VariableDescriptor] {
        &self.variables
    }

    /// First variable matching a binding reference by registry id or by
    /// embedded correlation id
    pub fn find_reference(&self, reference: &str) -> Option<&VariableDescriptor> {
        self.variables.iter().find(|v| v.matches_reference(reference))
    }
}

impl VariableRegistry for RegistrySnapshot {
    fn list_variables(&self) -> Vec<VariableDescriptor> {
        self.variables.clone()
    }

    fn current_value(&self, registry_id: &str) -> Option<VariableValue> {
        self.variables
            .iter()
            .find(|v| v.registry_id == registry_id)
            .map(|v| v.current.clone())
    }
}

/// Values already bound by an enclosing execution context (e.g. a repeated
/// panel), keyed by registry id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScopedVars(BTreeMap<String, String>);

impl ScopedVars {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, registry_id: impl Into<String>, value: impl Into<String>) {
        self.0.insert(registry_id.into(), value.into());
    }

    pub fn get(&self, registry_id: &str) -> Option<&str> {
        self.0.get(registry_id).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ScopedVars {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Read an embedded configuration, or `None` when the variable's query is
/// not one (a query string, another datasource's object)
fn own_query_or_none<'de, D>(deserializer: D) -> Result<Option<QueryConfiguration>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    if !value.is_object() {
        return Ok(None);
    }
    match serde_json::from_value(value) {
        Ok(query) => Ok(Some(query)),
        Err(err) => {
            trace!(error = %err, "variable query is not a query configuration");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn driven(registry_id: &str, correlation_id: &str) -> VariableDescriptor {
        let query: QueryConfiguration =
            serde_json::from_value(serde_json::json!({ "rand_id": correlation_id })).unwrap();
        VariableDescriptor::new(registry_id, "region", VariableValue::Single("us-east".into()))
            .driven_by(query)
    }

    #[test]
    fn test_value_to_filters() {
        assert_eq!(VariableValue::Single("a".into()).to_filters(), vec!["a"]);
        assert_eq!(
            VariableValue::Multi(vec!["a".into(), "b".into()]).to_filters(),
            vec!["a", "b"]
        );
    }

    #[test]
    fn test_value_untagged_wire_form() {
        let single: VariableValue = serde_json::from_str("\"prod\"").unwrap();
        assert_eq!(single, VariableValue::Single("prod".into()));
        let multi: VariableValue = serde_json::from_str("[\"a\", \"b\"]").unwrap();
        assert_eq!(multi, VariableValue::Multi(vec!["a".into(), "b".into()]));
    }

    #[test]
    fn test_correlation_matches_both_ways() {
        assert!(correlation_matches("region", None, "region"));
        assert!(correlation_matches("region", Some("x1y2"), "x1y2"));
        assert!(!correlation_matches("region", Some("x1y2"), "env"));
        assert!(!correlation_matches("region", None, "x1y2"));
    }

    #[test]
    fn test_foreign_query_read_as_plain_variable() {
        let variables: Vec<VariableDescriptor> = serde_json::from_value(serde_json::json!([
            { "id": "job", "name": "job", "current": "node", "query": "label_values(up, job)" },
            { "id": "n", "name": "n", "query": null },
            { "id": "env", "name": "env", "query": { "rand_id": "e1" } },
        ]))
        .unwrap();
        assert!(variables[0].query.is_none());
        assert_eq!(variables[0].current, VariableValue::Single("node".into()));
        assert!(variables[1].query.is_none());
        assert_eq!(variables[2].local_correlation_id(), Some("e1"));
    }

    #[test]
    fn test_find_reference_by_embedded_id() {
        let snapshot = RegistrySnapshot::new(vec![
            VariableDescriptor::new("env", "env", VariableValue::Single("prod".into())),
            driven("region", "x1y2"),
        ]);
        assert_eq!(snapshot.find_reference("x1y2").unwrap().registry_id, "region");
        assert_eq!(snapshot.find_reference("env").unwrap().registry_id, "env");
        assert!(snapshot.find_reference("corr123").is_none());
    }

    struct LiveRegistry;

    impl VariableRegistry for LiveRegistry {
        fn list_variables(&self) -> Vec<VariableDescriptor> {
            vec![VariableDescriptor::new("env", "env", VariableValue::default())]
        }

        fn current_value(&self, registry_id: &str) -> Option<VariableValue> {
            (registry_id == "env").then(|| VariableValue::Single("staging".into()))
        }
    }

    #[test]
    fn test_capture_reads_current_values() {
        let snapshot = RegistrySnapshot::capture(&LiveRegistry);
        assert_eq!(snapshot.variables().len(), 1);
        assert_eq!(
            snapshot.current_value("env"),
            Some(VariableValue::Single("staging".into()))
        );
    }

    #[test]
    fn test_scoped_vars() {
        let scoped: ScopedVars = [("env", "prod")].into_iter().collect();
        assert_eq!(scoped.get("env"), Some("prod"));
        assert!(scoped.get("region").is_none());
        assert!(ScopedVars::new().is_empty());
    }
}
