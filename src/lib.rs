//! Core of a hierarchical tree editor.
//!
//! Trees are built from and exported to a nested-array form
//! (`[{"id": .., "children": [..]}, ..]`). Every node id is unique within its
//! tree, and `null` is reserved for the root. [`EditController`] tracks per-node
//! editing state and drag-and-drop nesting on top of a [`Tree`].

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

pub use application::{ApplicationError, CommitOutcome, EditController, EditorOutcome, NodeEditor, NodeState};
pub use domain::{DomainError, Node, NodeId, NodeRef, Payload, Record, Tree, TreeNode, TreeRecord};
