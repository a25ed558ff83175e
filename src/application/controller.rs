//! Edit controller: turns user interactions into tree mutations.
//!
//! Each node is either viewing or editing. Editing is entered explicitly and
//! left by a cancel or by a successful commit. Commits run through a
//! replaceable data callback; its errors go to the error handler when one is
//! registered and are returned to the caller otherwise.

use std::collections::HashSet;

use itertools::Itertools;
use serde::de::DeserializeOwned;
use termtree::Tree as TermTree;
use tracing::{debug, info, instrument, warn};

use crate::application::drag::DragTracker;
use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::render::{default_label, render_tree};
use crate::domain::{Node, NodeRef, Payload, Record, Tree, TreeNode, TreeRecord};

pub type DataCallback<T> = Box<dyn FnMut(&mut Tree<T>, NodeRef, Record<T>) -> ApplicationResult<()>>;
pub type ErrorHandler = Box<dyn FnMut(&ApplicationError)>;
pub type SaveHandler<T> = Box<dyn FnMut(Vec<TreeRecord<T>>)>;
pub type LabelRenderer<T> = Box<dyn Fn(&TreeNode<T>) -> String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    Viewing,
    Editing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The data callback succeeded
    Committed,
    /// The data callback failed and the error handler consumed the error
    Rejected,
    /// The editor was cancelled
    Cancelled,
}

/// What an editor session produced.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorOutcome<T> {
    Commit(Record<T>),
    Cancel,
}

/// Caller-supplied editor form.
///
/// One call is one editing session and yields exactly one outcome.
pub trait NodeEditor<T> {
    fn edit(&mut self, parent: &TreeNode<T>) -> ApplicationResult<EditorOutcome<T>>;
}

impl<T, F> NodeEditor<T> for F
where
    F: FnMut(&TreeNode<T>) -> ApplicationResult<EditorOutcome<T>>,
{
    fn edit(&mut self, parent: &TreeNode<T>) -> ApplicationResult<EditorOutcome<T>> {
        self(parent)
    }
}

/// Default data callback: attach the record as a new last child of `parent`.
pub fn add_child_callback<T>(tree: &mut Tree<T>, parent: NodeRef, record: Record<T>) -> ApplicationResult<()> {
    tree.add_child(parent, Node::from_record(record))?;
    Ok(())
}

/// Relabels the node carrying `record.id` if it exists, adds a child otherwise.
pub fn upsert_callback<T>(tree: &mut Tree<T>, parent: NodeRef, record: Record<T>) -> ApplicationResult<()> {
    match tree.find(&record.id) {
        Some(existing) if !record.id.is_null() => {
            debug!("updating payload of {}", record.id);
            tree.set_data(existing, Some(record.data))?;
            Ok(())
        }
        _ => add_child_callback(tree, parent, record),
    }
}

pub struct EditController<T = Payload> {
    tree: Tree<T>,
    editing: HashSet<NodeRef>,
    drag: DragTracker,
    editor: Box<dyn NodeEditor<T>>,
    data_callback: DataCallback<T>,
    label_renderer: LabelRenderer<T>,
    on_save: SaveHandler<T>,
    on_error: Option<ErrorHandler>,
}

impl<T: Clone + Default + 'static> EditController<T> {
    pub fn new(
        tree: Tree<T>,
        editor: impl NodeEditor<T> + 'static,
        on_save: impl FnMut(Vec<TreeRecord<T>>) + 'static,
    ) -> Self {
        Self {
            tree,
            editing: HashSet::new(),
            drag: DragTracker::new(),
            editor: Box::new(editor),
            data_callback: Box::new(add_child_callback::<T>),
            label_renderer: Box::new(default_label::<T>),
            on_save: Box::new(on_save),
            on_error: None,
        }
    }

    pub fn with_data_callback(
        mut self,
        callback: impl FnMut(&mut Tree<T>, NodeRef, Record<T>) -> ApplicationResult<()> + 'static,
    ) -> Self {
        self.data_callback = Box::new(callback);
        self
    }

    pub fn with_error_handler(mut self, handler: impl FnMut(&ApplicationError) + 'static) -> Self {
        self.on_error = Some(Box::new(handler));
        self
    }

    pub fn with_label_renderer(mut self, renderer: impl Fn(&TreeNode<T>) -> String + 'static) -> Self {
        self.label_renderer = Box::new(renderer);
        self
    }

    pub fn tree(&self) -> &Tree<T> {
        &self.tree
    }

    pub fn into_tree(self) -> Tree<T> {
        self.tree
    }

    pub fn state(&self, node: NodeRef) -> NodeState {
        if self.editing.contains(&node) {
            NodeState::Editing
        } else {
            NodeState::Viewing
        }
    }

    pub fn is_drop_active(&self) -> bool {
        self.drag.is_active()
    }

    pub fn drag(&self) -> &DragTracker {
        &self.drag
    }

    #[instrument(level = "debug", skip(self))]
    pub fn begin_edit(&mut self, node: NodeRef) -> ApplicationResult<()> {
        self.tree.node(node)?;
        self.editing.insert(node);
        Ok(())
    }

    #[instrument(level = "debug", skip(self))]
    pub fn cancel_edit(&mut self, node: NodeRef) {
        self.editing.remove(&node);
    }

    /// Commits `record` under `node`; the node leaves editing only on success.
    #[instrument(level = "debug", skip(self, record), fields(id = %record.id))]
    pub fn commit(&mut self, node: NodeRef, record: Record<T>) -> ApplicationResult<CommitOutcome> {
        let outcome = self.apply(node, record)?;
        if outcome == CommitOutcome::Committed {
            self.editing.remove(&node);
        }
        Ok(outcome)
    }

    fn apply(&mut self, parent: NodeRef, record: Record<T>) -> ApplicationResult<CommitOutcome> {
        match (self.data_callback)(&mut self.tree, parent, record) {
            Ok(()) => Ok(CommitOutcome::Committed),
            Err(e) => match self.on_error.as_mut() {
                Some(handler) => {
                    warn!("commit rejected: {}", e);
                    handler(&e);
                    Ok(CommitOutcome::Rejected)
                }
                None => Err(e),
            },
        }
    }

    /// Runs one editor session for a new child of `node`.
    #[instrument(level = "debug", skip(self))]
    pub fn open_editor(&mut self, node: NodeRef) -> ApplicationResult<CommitOutcome> {
        self.begin_edit(node)?;
        let parent = self.tree.node(node)?;
        let outcome = match self.editor.edit(parent) {
            Ok(outcome) => outcome,
            Err(e) => {
                self.cancel_edit(node);
                return Err(e);
            }
        };

        match outcome {
            EditorOutcome::Commit(record) => self.commit(node, record),
            EditorOutcome::Cancel => {
                self.cancel_edit(node);
                Ok(CommitOutcome::Cancelled)
            }
        }
    }

    pub fn drag_enter(&mut self) {
        self.drag.on_enter();
    }

    pub fn drag_leave(&mut self) {
        self.drag.on_leave();
    }

    /// Accepts a dragover; no state changes.
    pub fn drag_over(&self) {
        self.drag.on_over();
    }

    pub fn drag_drop(&mut self) {
        self.drag.on_drop();
    }

    /// Drop of an already decoded payload onto `target`.
    #[instrument(level = "debug", skip(self, record), fields(id = %record.id))]
    pub fn drop_on(&mut self, target: NodeRef, record: Record<T>) -> ApplicationResult<CommitOutcome> {
        self.drag.on_drop();
        self.apply(target, record)
    }

    /// Hands the exported nested array to the save callback.
    #[instrument(level = "debug", skip(self))]
    pub fn save(&mut self) {
        let data = self.tree.to_array();
        info!(
            "saving {} top-level nodes: {}",
            data.len(),
            data.iter().map(|record| &record.id).join(", ")
        );
        (self.on_save)(data);
    }

    pub fn render(&self) -> TermTree<String> {
        render_tree(
            &self.tree,
            self.label_renderer.as_ref(),
            &self.editing,
            self.drag.is_active(),
        )
    }
}

impl<T: Clone + Default + DeserializeOwned + 'static> EditController<T> {
    /// Drop of a JSON payload onto `target`.
    ///
    /// Undecodable payloads are returned as `Payload` errors and never reach
    /// the error handler.
    #[instrument(level = "debug", skip(self, payload))]
    pub fn drop_json(&mut self, target: NodeRef, payload: &str) -> ApplicationResult<CommitOutcome> {
        self.drag.on_drop();
        let record = decode_payload::<T>(payload)?;
        self.apply(target, record)
    }
}

pub fn decode_payload<T: DeserializeOwned>(payload: &str) -> ApplicationResult<Record<T>> {
    serde_json::from_str(payload).map_err(|e| ApplicationError::Payload {
        message: e.to_string(),
    })
}
