use thiserror::Error;

/// Failure taxonomy for the node engine.
///
/// Every fault is raised synchronously to the immediate caller; nothing is
/// retried or recovered internally. Structural edits validate before they
/// mutate, so a rejected edit leaves the topology untouched.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum NetError {
    /// A layer, network, or sample was requested with an invalid size.
    #[error("invalid construction: {0}")]
    Construction(&'static str),

    /// A structural edit was attempted at an invalid boundary.
    #[error("invalid topology edit: {0}")]
    Topology(&'static str),

    /// A cursor-relative operation had no cursor, or no neighbor in the
    /// requested direction.
    #[error("empty structure: {0}")]
    EmptyStructure(&'static str),

    /// A search or removal by value found no match.
    #[error("value not found")]
    NotFound,
}
