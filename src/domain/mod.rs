//! Domain layer: tree entities and their invariants
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod error;
pub mod node;
pub mod node_id;
pub mod record;
pub mod tree;

pub use error::{DomainError, DomainResult};
pub use node::{Node, NodeRef, TreeId, TreeNode};
pub use node_id::NodeId;
pub use record::{Payload, Record, TreeRecord};
pub use tree::{PostOrderIterator, Tree, TreeIterator};
