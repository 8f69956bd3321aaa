//! Tree-specific error types.

use std::error::Error;
use std::fmt;

use crate::node::NodeIndex;

/// Errors raised while building, checking, or rebuilding a [`TimeTree`](crate::TimeTree).
#[derive(Clone, Debug, PartialEq)]
pub enum TreeError {
    /// A node index that does not exist in the tree.
    UnknownNode {
        /// The unrecognised index.
        index: NodeIndex,
    },
    /// A leaf was inserted after internal nodes, breaking the leaves-first layout.
    LeafAfterInternal {
        /// Number of nodes already present when the leaf was offered.
        node_count: usize,
    },
    /// A node was offered as a child but already has a parent.
    AlreadyAttached {
        /// The node that is already attached.
        index: NodeIndex,
    },
    /// Both children of a new internal node are the same node.
    SelfPairing {
        /// The duplicated child.
        index: NodeIndex,
    },
    /// The tree has no root set.
    MissingRoot,
    /// More than one parentless node was found.
    MultipleRoots {
        /// Number of parentless nodes.
        count: usize,
    },
    /// A node has a child count other than zero or two.
    NotBinary {
        /// The offending node.
        index: NodeIndex,
        /// Its child count.
        children: usize,
    },
    /// Some nodes cannot be reached from the root.
    Disconnected {
        /// Nodes reachable from the root.
        reachable: usize,
        /// Total nodes in the arena.
        total: usize,
    },
    /// A child is strictly older than its parent.
    AgeInversion {
        /// The child node.
        child: NodeIndex,
        /// The parent node.
        parent: NodeIndex,
    },
    /// A leaf has a negative or non-finite age.
    InvalidLeafAge {
        /// The leaf.
        index: NodeIndex,
        /// Its age.
        age: f64,
    },
    /// A caller-supplied ages buffer does not match the internal node count.
    AgesLengthMismatch {
        /// Internal nodes in the tree.
        expected: usize,
        /// Length of the supplied buffer.
        actual: usize,
    },
    /// The oldest-first reconstruction could not find a child candidate.
    ReconstructionFailed {
        /// Description of the failure.
        reason: String,
    },
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownNode { index } => write!(f, "unknown node {index}"),
            Self::LeafAfterInternal { node_count } => write!(
                f,
                "leaf inserted after internal nodes ({node_count} nodes present)"
            ),
            Self::AlreadyAttached { index } => {
                write!(f, "node {index} already has a parent")
            }
            Self::SelfPairing { index } => {
                write!(f, "node {index} cannot be paired with itself")
            }
            Self::MissingRoot => write!(f, "tree has no root"),
            Self::MultipleRoots { count } => {
                write!(f, "tree has {count} parentless nodes, expected 1")
            }
            Self::NotBinary { index, children } => {
                write!(f, "node {index} has {children} children, expected 0 or 2")
            }
            Self::Disconnected { reachable, total } => write!(
                f,
                "only {reachable} of {total} nodes are reachable from the root"
            ),
            Self::AgeInversion { child, parent } => {
                write!(f, "node {child} is older than its parent {parent}")
            }
            Self::InvalidLeafAge { index, age } => {
                write!(f, "leaf {index} has invalid age {age}")
            }
            Self::AgesLengthMismatch { expected, actual } => write!(
                f,
                "ages buffer has length {actual}, tree has {expected} internal nodes"
            ),
            Self::ReconstructionFailed { reason } => {
                write!(f, "tree reconstruction failed: {reason}")
            }
        }
    }
}

impl Error for TreeError {}
