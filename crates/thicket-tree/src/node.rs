//! Tree nodes and their stable indices.

use smallvec::SmallVec;
use std::fmt;

/// Stable position of a node inside a [`TimeTree`](crate::TimeTree) arena.
///
/// Indices never change once assigned, even when the topology is rebuilt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(pub u32);

impl NodeIndex {
    /// The index as a `usize` for slice access.
    pub fn get(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for NodeIndex {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// A single node of a time tree.
///
/// Owns no other nodes directly: children and parent are indices into the
/// owning tree's arena, so the parent link is a plain back-reference.
#[derive(Clone, Debug, PartialEq)]
pub struct TimeTreeNode {
    pub(crate) index: NodeIndex,
    pub(crate) age: f64,
    pub(crate) taxon: Option<String>,
    pub(crate) parent: Option<NodeIndex>,
    pub(crate) children: SmallVec<[NodeIndex; 2]>,
}

impl TimeTreeNode {
    pub(crate) fn new(index: NodeIndex, age: f64, taxon: Option<String>) -> Self {
        Self {
            index,
            age,
            taxon,
            parent: None,
            children: SmallVec::new(),
        }
    }

    /// This node's arena index.
    pub fn index(&self) -> NodeIndex {
        self.index
    }

    /// Age in time units before the present.
    pub fn age(&self) -> f64 {
        self.age
    }

    /// Taxon label, if this node carries one.
    pub fn taxon(&self) -> Option<&str> {
        self.taxon.as_deref()
    }

    /// The parent node, or `None` for a root (or a detached node).
    pub fn parent(&self) -> Option<NodeIndex> {
        self.parent
    }

    /// Child indices in left-to-right order.
    pub fn children(&self) -> &[NodeIndex] {
        &self.children
    }

    /// The first child.
    pub fn left(&self) -> Option<NodeIndex> {
        self.children.first().copied()
    }

    /// The second child.
    pub fn right(&self) -> Option<NodeIndex> {
        self.children.get(1).copied()
    }

    /// Whether this node currently has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Whether this node currently has no parent.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}
