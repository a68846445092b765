//! Grouping-filter resolution (verb module)
//!
//! QueryConfiguration + RegistrySnapshot + ScopedVars → ExecutionRequest
//!
//! Resolution never fails. A binding that cannot be resolved is omitted from
//! the output and the rest of the request is still produced.

mod choices;
mod resolve;

pub use choices::{binding_choices, include_state, BindingChoice, IncludeState, INCOMPLETE_VARIABLE};
pub use resolve::{build_execution_request, resolve_grouping_filters};
