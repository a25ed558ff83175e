//! Domain-level errors (no I/O concerns)

use thiserror::Error;

use crate::domain::node::NodeRef;
use crate::domain::node_id::NodeId;

/// Domain errors represent violations of the tree invariants.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The identifier is null or already registered in the owning tree.
    #[error("cannot add node with id {0}")]
    DuplicateIdentifier(NodeId),

    /// The handle does not resolve in this tree (foreign tree or stale index).
    #[error("node not found in tree: {0}")]
    UnknownNode(NodeRef),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
