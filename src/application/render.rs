//! Text rendering of a tree with `termtree`

use std::collections::HashSet;

use termtree::Tree as TermTree;
use tracing::instrument;

use crate::domain::{NodeRef, Tree, TreeNode};

/// Placeholder child shown under every node while a drag is in progress.
pub const DROP_PLACEHOLDER: &str = "DROP HERE";

/// Marker appended to the label of a node in editing state.
pub const EDITING_MARKER: &str = "[editing]";

/// Default label: the node id, `root` for the synthetic root.
pub fn default_label<T>(node: &TreeNode<T>) -> String {
    if node.is_root() {
        "root".to_string()
    } else {
        node.id().to_string()
    }
}

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> TermTree<String>;
}

impl<T> TreeNodeConvert for Tree<T> {
    fn to_tree_string(&self) -> TermTree<String> {
        render_tree(self, &default_label::<T>, &HashSet::new(), false)
    }
}

/// Builds the display tree starting at the root.
#[instrument(level = "trace", skip(tree, label, editing))]
pub fn render_tree<T>(
    tree: &Tree<T>,
    label: &dyn Fn(&TreeNode<T>) -> String,
    editing: &HashSet<NodeRef>,
    drop_active: bool,
) -> TermTree<String> {
    fn build<T>(
        tree: &Tree<T>,
        node_ref: NodeRef,
        label: &dyn Fn(&TreeNode<T>) -> String,
        editing: &HashSet<NodeRef>,
        drop_active: bool,
    ) -> Option<TermTree<String>> {
        let node = tree.get(node_ref)?;
        let mut text = label(node);
        if editing.contains(&node_ref) {
            text = format!("{} {}", text, EDITING_MARKER);
        }

        let mut leaves: Vec<_> = node
            .children()
            .iter()
            .filter_map(|&c| build(tree, c, label, editing, drop_active))
            .collect();
        if drop_active {
            leaves.push(TermTree::new(DROP_PLACEHOLDER.to_string()));
        }
        Some(TermTree::new(text).with_leaves(leaves))
    }

    build(tree, tree.root(), label, editing, drop_active)
        .unwrap_or_else(|| TermTree::new("Empty tree".to_string()))
}
