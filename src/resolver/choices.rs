//! What a grouping may be bound to, and what its include checkbox shows

use serde::Serialize;
use tracing::debug;
use crate::query::{is_sentinel, GroupingBinding, QueryConfiguration, AGGREGATE_SENTINEL, MANUAL_SENTINEL};
use crate::variables::{RegistrySnapshot, VariableDescriptor};

/// Description of a query-driven variable that cannot be bound yet
pub const INCOMPLETE_VARIABLE: &str = "Incomplete variable definition";

/// One entry of a grouping's binding selector
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BindingChoice {
    /// Identity stored in the binding
    pub id: String,
    /// Variable name stored in the binding
    pub name: String,
    pub label: String,
    pub description: Option<String>,
    pub disabled: bool,
}

impl BindingChoice {
    fn sentinel(id: &str, label: &str, description: &str) -> Self {
        Self {
            id: id.to_string(),
            name: id.to_string(),
            label: label.to_string(),
            description: Some(description.to_string()),
            disabled: false,
        }
    }

    fn variable(variable: &VariableDescriptor) -> Self {
        let mut choice = Self {
            id: variable.registry_id.clone(),
            name: variable.name.clone(),
            label: variable.display_name().to_string(),
            description: None,
            disabled: false,
        };

        // Query-driven variables are offered under the correlation id of
        // their configuration
        if let Some(query) = &variable.query {
            if let Some(correlation_id) = query.correlation_id() {
                choice.id = correlation_id.to_string();
            }
            let grouping = query.grouping_name().filter(|g| !g.trim().is_empty());
            match (query.filter_id(), grouping) {
                (Some(filter_id), Some(grouping)) => {
                    let on = query.display_label().unwrap_or(filter_id);
                    choice.description = Some(format!("{} on {}", grouping, on));
                }
                _ => {
                    choice.description = Some(INCOMPLETE_VARIABLE.to_string());
                    choice.disabled = true;
                }
            }
        }
        choice
    }

    /// The binding selecting this choice produces
    pub fn binding(&self) -> GroupingBinding {
        match self.id.as_str() {
            AGGREGATE_SENTINEL => GroupingBinding::Ignored,
            MANUAL_SENTINEL => GroupingBinding::Manual(Vec::new()),
            _ => GroupingBinding::variable(self.id.clone(), self.name.clone()),
        }
    }
}

/// List binding choices: MANUAL, IGNORED, then every registry variable.
///
/// Variables whose choice id collides with a sentinel are skipped, since
/// binding them could not be told apart from MANUAL or IGNORED.
pub fn binding_choices(snapshot: &RegistrySnapshot) -> Vec<BindingChoice> {
    let mut choices = vec![
        BindingChoice::sentinel(MANUAL_SENTINEL, "MANUAL", "input manual options to include in this filter"),
        BindingChoice::sentinel(AGGREGATE_SENTINEL, "IGNORED", "do not include this grouping"),
    ];
    for variable in snapshot.variables() {
        let choice = BindingChoice::variable(variable);
        if is_sentinel(&choice.id) {
            debug!(variable = %variable.name, id = %choice.id, "variable with reserved id skipped");
            continue;
        }
        choices.push(choice);
    }
    choices
}

/// State of a grouping's include checkbox
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncludeState {
    /// Ignored groupings are never included
    ForcedExcluded,
    /// Unbound groupings are always included
    ForcedIncluded,
    Editable(bool),
}

impl IncludeState {
    pub fn value(self) -> bool {
        match self {
            IncludeState::ForcedExcluded => false,
            IncludeState::ForcedIncluded => true,
            IncludeState::Editable(included) => included,
        }
    }

    pub fn is_editable(self) -> bool {
        matches!(self, IncludeState::Editable(_))
    }
}

pub fn include_state(config: &QueryConfiguration, grouping: &str) -> IncludeState {
    match config.binding(grouping) {
        None => IncludeState::ForcedIncluded,
        Some(GroupingBinding::Ignored) => IncludeState::ForcedExcluded,
        Some(_) => IncludeState::Editable(config.include_flag(grouping).unwrap_or(true)),
    }
}
