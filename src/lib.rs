//! facetq - Faceted query configuration editing and grouping-filter resolution
//!
//! This library provides:
//! - Catalog types (FilterDefinition, FilterDefinitionAggregation, Calculation)
//! - The query configuration being edited and its wire format
//! - Atomic configuration edits with automatic aggregation/calculation selection
//! - Runnability evaluation (Blocked / Runnable) and run signaling
//! - Resolution of grouping bindings against dashboard variables
//! - Document parsing from YAML and JSON
//!
//! # Architecture
//!
//! **Noun modules** (data structures):
//! - `catalog/` - filter definitions, calculations, catalog service and cache
//! - `query/` - QueryConfiguration, GroupingBinding, ExecutionRequest
//! - `variables/` - VariableDescriptor, RegistrySnapshot, ScopedVars
//!
//! **Verb modules** (transformations):
//! - `parser/` - YAML/JSON → documents
//! - `editor/` - QueryConfiguration + Edit → QueryConfiguration
//! - `runnable/` - QueryConfiguration → Runnable | Blocked
//! - `label/` - QueryConfiguration → display label
//! - `mapping/` - bindings ↔ compact `g="$var"` string
//! - `resolver/` - QueryConfiguration + RegistrySnapshot → ExecutionRequest
//!
//! # Example
//!
//! ```ignore
//! use facetq::{parser, Edit, QueryConfiguration, QueryEditor, build_execution_request};
//!
//! let catalog = parser::parse_catalog_file("catalog.yaml")?;
//! let registry = parser::parse_registry_file("registry.yaml")?;
//!
//! let mut editor = QueryEditor::new(QueryConfiguration::new(), |config: &QueryConfiguration| {
//!     let request = build_execution_request(config, &registry, &Default::default());
//!     println!("{}", serde_json::to_string(&request).unwrap());
//! });
//! editor.apply(Edit::Filter(catalog.filter_definitions[0].clone()))?;
//! ```

pub mod catalog;
pub mod query;
pub mod variables;
pub mod editor;
pub mod runnable;
pub mod label;
pub mod mapping;
pub mod resolver;
pub mod parser;
pub mod error;

// Re-export commonly used types
pub use catalog::{Calculation, CatalogCache, CatalogDocument, CatalogError, CatalogService, FetchTicket, FilterDefinition, FilterDefinitionAggregation, GroupingValueOption, LimitType, StaticCatalog, grouping_value_options};
pub use query::{ExecutionRequest, GroupingBinding, QueryConfiguration, QueryMode, ResolvedGroupingFilter, AGGREGATE_SENTINEL, MANUAL_SENTINEL};
pub use variables::{RegistrySnapshot, ScopedVars, VariableDescriptor, VariableRegistry, VariableValue};
pub use editor::{apply_edit, Edit, EditError, EditOutcome, QueryEditor, RunTrigger};
pub use runnable::{evaluate, is_runnable, Blocker, Runnability};
pub use label::derive_display_label;
pub use mapping::{parse_bindings, serialize_bindings, MappingError};
pub use resolver::{binding_choices, build_execution_request, include_state, resolve_grouping_filters, BindingChoice, IncludeState};
pub use error::ParseError;
