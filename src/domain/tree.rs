use std::collections::HashSet;

use generational_arena::Arena;
use tracing::{debug, instrument, warn};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::node::{Node, NodeRef, TreeId, TreeNode};
use crate::domain::node_id::NodeId;
use crate::domain::record::{Payload, TreeRecord};

/// Arena-based tree owning a synthetic root and every attached node.
///
/// The identifier registry is pre-seeded with `NodeId::Null`, so the root id
/// can never be attached a second time. Registry membership is the only
/// uniqueness check; `add_child` consults nothing else.
#[derive(Debug)]
pub struct Tree<T = Payload> {
    id: TreeId,
    arena: Arena<TreeNode<T>>,
    root: NodeRef,
    node_ids: HashSet<NodeId>,
}

impl<T> Default for Tree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Tree<T> {
    pub fn new() -> Self {
        let id = TreeId::new();
        let mut arena = Arena::new();
        let index = arena.insert(TreeNode {
            id: NodeId::Null,
            data: None,
            parent: None,
            children: Vec::new(),
            tree: id,
        });
        Self {
            id,
            arena,
            root: NodeRef { tree: id, index },
            node_ids: HashSet::from([NodeId::Null]),
        }
    }

    /// Rebuilds a tree from its nested-array form, depth-first in array order.
    ///
    /// Any duplicate identifier aborts the whole construction.
    #[instrument(level = "debug", skip(records), fields(top_level = records.len()))]
    pub fn from_records(records: Vec<TreeRecord<T>>) -> DomainResult<Self> {
        let mut tree = Self::new();
        let root = tree.root;
        tree.attach_records(root, records)?;
        debug!("built tree with {} nodes", tree.len());
        Ok(tree)
    }

    fn attach_records(&mut self, parent: NodeRef, records: Vec<TreeRecord<T>>) -> DomainResult<()> {
        for record in records {
            let node = Node::new(record.id, Some(record.data));
            let child = self.add_child(parent, node)?;
            self.attach_records(child, record.children)?;
        }
        Ok(())
    }

    pub fn id(&self) -> TreeId {
        self.id
    }

    pub fn root(&self) -> NodeRef {
        self.root
    }

    pub fn get(&self, node: NodeRef) -> Option<&TreeNode<T>> {
        if node.tree != self.id {
            return None;
        }
        self.arena.get(node.index)
    }

    pub fn node(&self, node: NodeRef) -> DomainResult<&TreeNode<T>> {
        self.get(node).ok_or(DomainError::UnknownNode(node))
    }

    fn node_mut(&mut self, node: NodeRef) -> DomainResult<&mut TreeNode<T>> {
        if node.tree != self.id {
            return Err(DomainError::UnknownNode(node));
        }
        self.arena
            .get_mut(node.index)
            .ok_or(DomainError::UnknownNode(node))
    }

    /// Registers an identifier; false without mutation when it is null or taken.
    #[instrument(level = "trace", skip(self))]
    pub fn add_node_id(&mut self, id: &NodeId) -> bool {
        if id.is_null() || self.node_ids.contains(id) {
            return false;
        }
        self.node_ids.insert(id.clone())
    }

    /// Attaches a detached node as the last child of `parent`.
    ///
    /// The node's id is registered first; on failure nothing is attached and
    /// the registry is unchanged.
    #[instrument(level = "debug", skip(self, node), fields(id = %node.id))]
    pub fn add_child(&mut self, parent: NodeRef, node: Node<T>) -> DomainResult<NodeRef> {
        self.node(parent)?;

        if !self.add_node_id(&node.id) {
            warn!("rejected node with id {}", node.id);
            return Err(DomainError::DuplicateIdentifier(node.id));
        }

        let index = self.arena.insert(TreeNode {
            id: node.id,
            data: node.data,
            parent: Some(parent),
            children: Vec::new(),
            tree: self.id,
        });
        let child = NodeRef {
            tree: self.id,
            index,
        };
        self.node_mut(parent)?.children.push(child);

        debug!("attached {} under {}", child, parent);
        Ok(child)
    }

    /// Replaces the payload of an attached node, returning the previous one.
    #[instrument(level = "debug", skip(self, data))]
    pub fn set_data(&mut self, node: NodeRef, data: Option<T>) -> DomainResult<Option<T>> {
        let node = self.node_mut(node)?;
        Ok(std::mem::replace(&mut node.data, data))
    }

    /// Number of attached nodes, root excluded.
    pub fn len(&self) -> usize {
        self.arena.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Registry membership; `NodeId::Null` is always taken by the root.
    pub fn contains_id(&self, id: &NodeId) -> bool {
        self.node_ids.contains(id)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn find(&self, id: &NodeId) -> Option<NodeRef> {
        if !self.contains_id(id) {
            return None;
        }
        self.iter()
            .find(|(_, node)| node.id == *id)
            .map(|(node_ref, _)| node_ref)
    }

    /// Levels below the root; 0 for an empty tree.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.calculate_depth(self.root) - 1
    }

    fn calculate_depth(&self, node: NodeRef) -> usize {
        if let Some(node) = self.get(node) {
            1 + node
                .children
                .iter()
                .map(|&child| self.calculate_depth(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }

    /// Ids of nodes without children, left to right. The root is never a leaf.
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_ids(&self) -> Vec<NodeId> {
        self.iter()
            .filter(|(_, node)| !node.is_root() && !node.has_children())
            .map(|(_, node)| node.id.clone())
            .collect()
    }

    pub fn iter(&self) -> TreeIterator<'_, T> {
        TreeIterator::new(self)
    }

    pub fn iter_postorder(&self) -> PostOrderIterator<'_, T> {
        PostOrderIterator::new(self)
    }
}

impl<T: Clone + Default> Tree<T> {
    /// Nested-array form of the tree, root omitted.
    ///
    /// Inverse of `from_records` for any tree built by it or by `add_child`.
    #[instrument(level = "debug", skip(self))]
    pub fn to_array(&self) -> Vec<TreeRecord<T>> {
        self.get(self.root)
            .map(|root| root.children.iter().filter_map(|&c| self.extract(c)).collect())
            .unwrap_or_default()
    }

    fn extract(&self, node: NodeRef) -> Option<TreeRecord<T>> {
        let node = self.get(node)?;
        Some(TreeRecord {
            id: node.id.clone(),
            data: node.data.clone().unwrap_or_default(),
            children: node
                .children
                .iter()
                .filter_map(|&child| self.extract(child))
                .collect(),
        })
    }
}

/// Pre-order traversal, root first, children left to right.
pub struct TreeIterator<'a, T> {
    tree: &'a Tree<T>,
    stack: Vec<NodeRef>,
}

impl<'a, T> TreeIterator<'a, T> {
    fn new(tree: &'a Tree<T>) -> Self {
        Self {
            tree,
            stack: vec![tree.root],
        }
    }
}

impl<'a, T> Iterator for TreeIterator<'a, T> {
    type Item = (NodeRef, &'a TreeNode<T>);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current) = self.stack.pop() {
            if let Some(node) = self.tree.get(current) {
                // Push children in reverse order for left-to-right traversal
                self.stack.extend(node.children.iter().rev());
                return Some((current, node));
            }
        }
        None
    }
}

/// Post-order traversal, root last.
pub struct PostOrderIterator<'a, T> {
    tree: &'a Tree<T>,
    stack: Vec<(NodeRef, bool)>,
}

impl<'a, T> PostOrderIterator<'a, T> {
    fn new(tree: &'a Tree<T>) -> Self {
        Self {
            tree,
            stack: vec![(tree.root, false)],
        }
    }
}

impl<'a, T> Iterator for PostOrderIterator<'a, T> {
    type Item = (NodeRef, &'a TreeNode<T>);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current, visited)) = self.stack.pop() {
            if let Some(node) = self.tree.get(current) {
                if visited {
                    return Some((current, node));
                }
                self.stack.push((current, true));
                for &child in node.children.iter().rev() {
                    self.stack.push((child, false));
                }
            }
        }
        None
    }
}
