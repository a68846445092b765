//! Per-configuration catalog cache with stale-response suppression.
//!
//! Catalog requests complete asynchronously; the user may pick another
//! filter before an earlier request resolves. Every request is issued
//! against a [`FetchTicket`] that captures the filter context at request
//! time, and results are only applied while that context is still current.

use std::collections::{HashMap, HashSet};
use tracing::debug;
use super::definition::FilterDefinition;

/// What a pending request was for
#[derive(Debug, Clone, PartialEq, Eq)]
enum FetchTarget {
    Definitions,
    GroupingValues { grouping: String, filter_id: String },
}

/// Handle for one in-flight catalog request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    filter_id: Option<String>,
    target: FetchTarget,
}

impl FetchTicket {
    /// Filter context the request was issued under
    pub fn filter_id(&self) -> Option<&str> {
        self.filter_id.as_deref()
    }

    /// Grouping the request asks values for, if it is a values request
    pub fn grouping(&self) -> Option<&str> {
        match &self.target {
            FetchTarget::GroupingValues { grouping, .. } => Some(grouping),
            FetchTarget::Definitions => None,
        }
    }
}

/// Cache of filter definitions and candidate grouping values
#[derive(Debug, Default)]
pub struct CatalogCache {
    generation: u64,
    filter_id: Option<String>,
    definitions: Option<Vec<FilterDefinition>>,
    definitions_in_flight: bool,
    /// (grouping name, filter id) -> candidate values
    values: HashMap<(String, String), Vec<String>>,
    values_in_flight: HashSet<(String, String)>,
}

impl CatalogCache {
    /// Create a cache for a configuration currently on `filter_id`
    pub fn new(filter_id: Option<&str>) -> Self {
        Self {
            filter_id: filter_id.map(str::to_string),
            ..Default::default()
        }
    }

    /// Loaded definitions, if the fetch has completed
    pub fn definitions(&self) -> Option<&[FilterDefinition]> {
        self.definitions.as_deref()
    }

    /// Cached candidate values for a grouping of a filter
    pub fn values(&self, grouping: &str, filter_id: &str) -> Option<&[String]> {
        self.values
            .get(&(grouping.to_string(), filter_id.to_string()))
            .map(Vec::as_slice)
    }

    /// Start a definitions fetch.
    ///
    /// Returns `None` when the definitions are already loaded or a fetch for
    /// the current context is still pending.
    pub fn begin_definitions_fetch(&mut self) -> Option<FetchTicket> {
        if self.definitions.is_some() || self.definitions_in_flight {
            return None;
        }
        self.definitions_in_flight = true;
        Some(self.ticket(FetchTarget::Definitions))
    }

    /// Apply a definitions result. Returns false when the result was stale
    /// and has been discarded.
    pub fn accept_definitions(&mut self, ticket: &FetchTicket, definitions: Vec<FilterDefinition>) -> bool {
        if ticket.target != FetchTarget::Definitions || !self.is_current(ticket) {
            debug!(
                ticket_filter = ?ticket.filter_id,
                current_filter = ?self.filter_id,
                "discarding stale filter definitions response"
            );
            return false;
        }
        self.definitions_in_flight = false;
        self.definitions = Some(definitions);
        true
    }

    /// Start a candidate values fetch for `grouping` under the current filter.
    ///
    /// Returns `None` when no filter is selected, the values are cached, or a
    /// fetch is already pending.
    pub fn begin_values_fetch(&mut self, grouping: &str) -> Option<FetchTicket> {
        let filter_id = self.filter_id.clone()?;
        let key = (grouping.to_string(), filter_id.clone());
        if self.values.contains_key(&key) || self.values_in_flight.contains(&key) {
            return None;
        }
        self.values_in_flight.insert(key);
        Some(self.ticket(FetchTarget::GroupingValues {
            grouping: grouping.to_string(),
            filter_id,
        }))
    }

    /// Apply a candidate values result. Returns false when the result was
    /// stale and has been discarded.
    pub fn accept_values(&mut self, ticket: &FetchTicket, values: Vec<String>) -> bool {
        let FetchTarget::GroupingValues { grouping, filter_id } = &ticket.target else {
            return false;
        };
        if !self.is_current(ticket) || self.filter_id.as_deref() != Some(filter_id.as_str()) {
            debug!(
                grouping = %grouping,
                ticket_filter = %filter_id,
                current_filter = ?self.filter_id,
                "discarding stale grouping values response"
            );
            return false;
        }
        let key = (grouping.clone(), filter_id.clone());
        self.values_in_flight.remove(&key);
        self.values.insert(key, values);
        true
    }

    /// Switch the filter context. Pending requests become stale and cached
    /// candidate values are dropped. Returns false when the filter is
    /// unchanged, in which case nothing is invalidated.
    pub fn invalidate_for_filter(&mut self, filter_id: Option<&str>) -> bool {
        if self.filter_id.as_deref() == filter_id {
            return false;
        }
        self.generation += 1;
        self.filter_id = filter_id.map(str::to_string);
        self.definitions_in_flight = false;
        self.values.clear();
        self.values_in_flight.clear();
        true
    }

    fn ticket(&self, target: FetchTarget) -> FetchTicket {
        FetchTicket {
            generation: self.generation,
            filter_id: self.filter_id.clone(),
            target,
        }
    }

    fn is_current(&self, ticket: &FetchTicket) -> bool {
        ticket.generation == self.generation
    }
}
