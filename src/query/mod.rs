//! Query configuration types (nouns)

mod binding;
mod config;
mod id;
mod request;

pub use binding::{is_sentinel, GroupingBinding, MappingItem, AGGREGATE_SENTINEL, MANUAL_SENTINEL};
pub use config::{QueryConfiguration, QueryMode};
pub use id::{generate_correlation_id, CORRELATION_ID_LEN};
pub use request::{ExecutionRequest, ResolvedGroupingFilter};
