use std::fmt;

use generational_arena::Index;
use uuid::Uuid;

use crate::domain::node_id::NodeId;
use crate::domain::record::Record;

/// Identity of one tree instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TreeId(Uuid);

impl TreeId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for TreeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Non-owning handle to an attached node.
///
/// Carries the owning tree's identity, so a handle can only resolve in the
/// tree that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeRef {
    pub(crate) tree: TreeId,
    pub(crate) index: Index,
}

impl NodeRef {
    pub fn tree_id(&self) -> TreeId {
        self.tree
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (slot, generation) = self.index.into_raw_parts();
        write!(f, "{}#{}.{}", self.tree, slot, generation)
    }
}

/// A detached node, not yet part of any tree.
///
/// The only way into a tree is `Tree::add_child`, which registers the id and
/// sets the parent and tree back-references.
#[derive(Debug, Clone, PartialEq)]
pub struct Node<T> {
    pub(crate) id: NodeId,
    pub(crate) data: Option<T>,
}

impl<T> Node<T> {
    pub fn new(id: impl Into<NodeId>, data: Option<T>) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }

    pub fn from_record(record: Record<T>) -> Self {
        Self {
            id: record.id,
            data: Some(record.data),
        }
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }
}

/// Tree node stored in the arena of its owning tree.
#[derive(Debug)]
pub struct TreeNode<T> {
    pub(crate) id: NodeId,
    pub(crate) data: Option<T>,
    /// Parent handle, None for the root
    pub(crate) parent: Option<NodeRef>,
    /// Children in insertion order
    pub(crate) children: Vec<NodeRef>,
    /// Owning tree, stamped once at attach time
    pub(crate) tree: TreeId,
}

impl<T> TreeNode<T> {
    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn parent(&self) -> Option<NodeRef> {
        self.parent
    }

    pub fn children(&self) -> &[NodeRef] {
        &self.children
    }

    pub fn tree_id(&self) -> TreeId {
        self.tree
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::Payload;

    #[test]
    fn test_detached_node_from_record() {
        let mut data = Payload::new();
        data.insert("name".into(), "toys".into());
        let node = Node::from_record(Record::new(3, data.clone()));

        assert_eq!(node.id(), &NodeId::from(3));
        assert_eq!(node.data(), Some(&data));
    }

    #[test]
    fn test_tree_ids_are_unique() {
        assert_ne!(TreeId::new(), TreeId::new());
    }
}
