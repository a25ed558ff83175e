//! Application layer: interaction logic on top of the domain tree
//!
//! This layer drives domain mutations from user actions and hands results to
//! caller-supplied collaborators (editor, label renderer, save and error callbacks).

pub mod controller;
pub mod drag;
pub mod error;
pub mod error_ext;
pub mod render;

pub use controller::{
    add_child_callback, decode_payload, upsert_callback, CommitOutcome, EditController,
    EditorOutcome, NodeEditor, NodeState,
};
pub use drag::DragTracker;
pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use render::{default_label, render_tree, TreeNodeConvert, DROP_PLACEHOLDER};
