//! Dashboard variable types (nouns)
//!
//! The host's variable registry is consumed as a read-only snapshot so that
//! resolution stays a pure function of its inputs.

mod registry;

pub use registry::{correlation_matches, RegistrySnapshot, ScopedVars, VariableDescriptor, VariableRegistry, VariableValue};
