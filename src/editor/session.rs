//! The editing session: one configuration, its catalog cache and the hook
//! that executes it

use tracing::{debug, trace};
use crate::catalog::{CatalogCache, FetchTicket, FilterDefinition};
use crate::query::QueryConfiguration;
use crate::runnable::{evaluate, Runnability};
use super::error::EditError;
use super::mutate::{apply_edit, candidate_values_request, hydrate_definition, Edit};

/// Executes a configuration once it is runnable
pub trait RunTrigger {
    fn run(&mut self, config: &QueryConfiguration);
}

impl<F> RunTrigger for F
where
    F: FnMut(&QueryConfiguration),
{
    fn run(&mut self, config: &QueryConfiguration) {
        self(config)
    }
}

/// Result of an edit or an accepted catalog response
#[derive(Debug, Clone, PartialEq)]
pub struct EditOutcome {
    pub state: Runnability,
    /// The configuration differs from before
    pub changed: bool,
    /// The run trigger was invoked
    pub triggered: bool,
}

/// Owns the configuration being edited.
///
/// After every change the run predicate is re-evaluated. The trigger fires
/// when a qualifying change leaves the configuration runnable, either as a
/// transition out of Blocked or as an edit while already Runnable.
pub struct QueryEditor<T> {
    config: QueryConfiguration,
    state: Runnability,
    cache: CatalogCache,
    trigger: T,
}

impl<T: RunTrigger> QueryEditor<T> {
    pub fn new(config: QueryConfiguration, trigger: T) -> Self {
        let config = config.with_defaults();
        let state = evaluate(&config);
        let cache = CatalogCache::new(config.filter_id());
        Self { config, state, cache, trigger }
    }

    pub fn config(&self) -> &QueryConfiguration {
        &self.config
    }

    pub fn state(&self) -> &Runnability {
        &self.state
    }

    pub fn cache(&self) -> &CatalogCache {
        &self.cache
    }

    pub fn trigger(&self) -> &T {
        &self.trigger
    }

    /// Apply one edit. A rejected edit leaves the session unchanged.
    pub fn apply(&mut self, edit: Edit) -> Result<EditOutcome, EditError> {
        let qualifying = edit.triggers_run();
        let next = apply_edit(self.config.clone(), edit)?;
        let changed = next != self.config;

        if next.filter_id() != self.config.filter_id() {
            self.cache.invalidate_for_filter(next.filter_id());
        }
        self.config = next;
        Ok(self.settle(changed, qualifying))
    }

    /// Start a definitions fetch; `None` if one is already in flight
    pub fn request_definitions(&mut self) -> Option<FetchTicket> {
        self.cache.begin_definitions_fetch()
    }

    /// Accept a definitions response. A loaded configuration that carried
    /// only a filter id gets its definition attached. Returns `None` for a
    /// stale response.
    pub fn receive_definitions(
        &mut self,
        ticket: &FetchTicket,
        definitions: Vec<FilterDefinition>,
    ) -> Option<EditOutcome> {
        if !self.cache.accept_definitions(ticket, definitions) {
            return None;
        }
        let definitions = self.cache.definitions().unwrap_or_default();
        let next = hydrate_definition(self.config.clone(), definitions);
        let changed = next != self.config;
        self.config = next;
        Some(self.settle(changed, true))
    }

    /// Start a candidate-values fetch for a grouping of the current filter.
    /// Returns the ticket and the request to send, or `None` when no filter
    /// is selected or the fetch is already in flight.
    pub fn request_grouping_values(&mut self, grouping: &str) -> Option<(FetchTicket, QueryConfiguration)> {
        let ticket = self.cache.begin_values_fetch(grouping)?;
        Some((ticket, candidate_values_request(&self.config, grouping)))
    }

    /// Accept a candidate-values response; `false` if it was stale
    pub fn receive_grouping_values(&mut self, ticket: &FetchTicket, values: Vec<String>) -> bool {
        self.cache.accept_values(ticket, values)
    }

    /// Cached candidate values of a grouping of the current filter
    pub fn grouping_values(&self, grouping: &str) -> Option<&[String]> {
        let filter_id = self.config.filter_id()?;
        self.cache.values(grouping, filter_id)
    }

    fn settle(&mut self, changed: bool, qualifying: bool) -> EditOutcome {
        self.state = evaluate(&self.config);
        if let Runnability::Blocked(blocker) = &self.state {
            trace!(%blocker, "configuration blocked");
        }

        let triggered = changed && qualifying && self.state.is_runnable();
        if triggered {
            debug!(
                filter_id = self.config.filter_id(),
                label = self.config.display_label(),
                "running configuration"
            );
            self.trigger.run(&self.config);
        }

        EditOutcome {
            state: self.state.clone(),
            changed,
            triggered,
        }
    }
}
