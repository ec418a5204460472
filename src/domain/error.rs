//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::arena::NodeId;

/// Domain errors represent violations of the tree's structural rules.
/// These are independent of data-source concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A required argument was missing or empty. Caller bug.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The operation is not allowed in the node's current state.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// The handle does not resolve in the arena (removed, or replaced by a reload).
    #[error("unknown or stale node handle: {0:?}")]
    UnknownNode(NodeId),

    /// A newer load for the same node started before this one completed.
    #[error("load superseded by a newer load of node {0:?}")]
    LoadSuperseded(NodeId),
}
