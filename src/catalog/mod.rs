//! Catalog types (nouns)
//!
//! Filter definitions, their aggregations and calculations, as provided by
//! the catalog service, plus the per-configuration cache of catalog results.

mod cache;
mod definition;
mod service;
mod types;

pub use cache::{CatalogCache, FetchTicket};
pub use definition::{FilterDefinition, FilterDefinitionAggregation};
pub use service::{grouping_value_options, CatalogDocument, CatalogError, CatalogService, GroupingValueOption, StaticCatalog};
pub use types::{Calculation, LimitType, ParseCalculationError};
