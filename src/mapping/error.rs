use thiserror::Error;

/// Errors parsing a compact grouping mapping string
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MappingError {
    #[error("Malformed mapping entry '{0}', expected grouping=\"$variable\"")]
    MalformedEntry(String),

    #[error("Empty grouping name in mapping entry '{0}'")]
    EmptyGrouping(String),

    #[error("Grouping '{0}' appears more than once")]
    DuplicateGrouping(String),
}
