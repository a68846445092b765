//! Per-grouping bindings

use serde::{Deserialize, Serialize};

/// Reserved binding id: aggregate across all values of the grouping
pub const AGGREGATE_SENTINEL: &str = "$__agg";

/// Reserved binding id: filter on manually entered values
pub const MANUAL_SENTINEL: &str = "$__manual";

/// Whether an id is one of the reserved sentinel ids
pub fn is_sentinel(id: &str) -> bool {
    id == AGGREGATE_SENTINEL || id == MANUAL_SENTINEL
}

/// How one grouping dimension's filter values are determined
///
/// Stored on the wire as a mapping item `{id, name, manual_values?}` where
/// the sentinel ids select the `Ignored` and `Manual` variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "MappingItem", into = "MappingItem")]
pub enum GroupingBinding {
    /// Excluded from filtering and from the result's grouping axis
    Ignored,
    /// Literal candidate values entered by the user
    Manual(Vec<String>),
    /// Reference to a dashboard variable, resolved at run time
    VariableRef {
        /// Registry id or embedded correlation id of the variable
        id: String,
        /// Variable name, used in the compact mapping string
        name: String,
    },
}

/// Wire form of a [`GroupingBinding`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingItem {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manual_values: Option<Vec<String>>,
}

impl GroupingBinding {
    /// Bind to a variable by id and name
    pub fn variable(id: impl Into<String>, name: impl Into<String>) -> Self {
        GroupingBinding::VariableRef {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Bind to a list of literal values
    pub fn manual<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        GroupingBinding::Manual(values.into_iter().map(Into::into).collect())
    }

    /// Id carried in the mapping item (a sentinel for Ignored/Manual)
    pub fn id(&self) -> &str {
        match self {
            GroupingBinding::Ignored => AGGREGATE_SENTINEL,
            GroupingBinding::Manual(_) => MANUAL_SENTINEL,
            GroupingBinding::VariableRef { id, .. } => id,
        }
    }

    /// Name carried in the mapping item (a sentinel for Ignored/Manual)
    pub fn name(&self) -> &str {
        match self {
            GroupingBinding::Ignored => AGGREGATE_SENTINEL,
            GroupingBinding::Manual(_) => MANUAL_SENTINEL,
            GroupingBinding::VariableRef { name, .. } => name,
        }
    }

    pub fn is_ignored(&self) -> bool {
        matches!(self, GroupingBinding::Ignored)
    }

    pub fn is_manual(&self) -> bool {
        matches!(self, GroupingBinding::Manual(_))
    }

    /// Manual values, for manual bindings only
    pub fn manual_values(&self) -> Option<&[String]> {
        match self {
            GroupingBinding::Manual(values) => Some(values),
            _ => None,
        }
    }
}

impl From<MappingItem> for GroupingBinding {
    fn from(item: MappingItem) -> Self {
        match item.id.as_str() {
            AGGREGATE_SENTINEL => GroupingBinding::Ignored,
            MANUAL_SENTINEL => GroupingBinding::Manual(item.manual_values.unwrap_or_default()),
            _ => GroupingBinding::VariableRef {
                id: item.id,
                name: item.name,
            },
        }
    }
}

impl From<GroupingBinding> for MappingItem {
    fn from(binding: GroupingBinding) -> Self {
        match binding {
            GroupingBinding::Ignored => MappingItem {
                id: AGGREGATE_SENTINEL.to_string(),
                name: AGGREGATE_SENTINEL.to_string(),
                manual_values: None,
            },
            GroupingBinding::Manual(values) => MappingItem {
                id: MANUAL_SENTINEL.to_string(),
                name: MANUAL_SENTINEL.to_string(),
                manual_values: Some(values),
            },
            GroupingBinding::VariableRef { id, name } => MappingItem {
                id,
                name,
                manual_values: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_items_select_variants() {
        let ignored: GroupingBinding =
            serde_json::from_str(r#"{"id": "$__agg", "name": "$__agg"}"#).unwrap();
        assert_eq!(ignored, GroupingBinding::Ignored);

        let manual: GroupingBinding = serde_json::from_str(
            r#"{"id": "$__manual", "name": "$__manual", "manual_values": ["a", "b"]}"#,
        )
        .unwrap();
        assert_eq!(manual, GroupingBinding::manual(["a", "b"]));

        let variable: GroupingBinding =
            serde_json::from_str(r#"{"id": "x7k2p", "name": "region"}"#).unwrap();
        assert_eq!(variable, GroupingBinding::variable("x7k2p", "region"));
    }

    #[test]
    fn test_manual_without_values_is_empty() {
        let manual: GroupingBinding =
            serde_json::from_str(r#"{"id": "$__manual", "name": "$__manual"}"#).unwrap();
        assert_eq!(manual.manual_values(), Some(&[][..]));
    }

    #[test]
    fn test_serialize_as_mapping_item() {
        let json = serde_json::to_value(GroupingBinding::Ignored).unwrap();
        assert_eq!(json, serde_json::json!({"id": "$__agg", "name": "$__agg"}));

        let json = serde_json::to_value(GroupingBinding::manual(["us-east"])).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": "$__manual", "name": "$__manual", "manual_values": ["us-east"]})
        );
    }

    #[test]
    fn test_accessors() {
        let var = GroupingBinding::variable("abc123", "env");
        assert_eq!(var.id(), "abc123");
        assert_eq!(var.name(), "env");
        assert!(!var.is_ignored());
        assert!(var.manual_values().is_none());

        assert_eq!(GroupingBinding::Ignored.id(), AGGREGATE_SENTINEL);
        assert!(GroupingBinding::manual(Vec::<String>::new()).is_manual());
        assert!(is_sentinel("$__manual"));
        assert!(!is_sentinel("$region"));
    }
}
