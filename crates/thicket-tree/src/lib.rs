//! Time-calibrated binary trees for Thicket phylogenetic models.
//!
//! This is the leaf crate of the workspace. A [`TimeTree`] is an arena of
//! [`TimeTreeNode`]s addressed by stable [`NodeIndex`] values; every node
//! carries an age measured backwards from the present.
//!
//! # Index layout
//!
//! Leaves are always inserted before internal nodes, so for a tree with
//! `n` taxa the leaves occupy indices `0..n` and internal nodes occupy
//! `n..2n-1`. Tree generators rely on this layout to tell tips from
//! internal nodes by index alone while the topology is being rebuilt.
//!
//! # Invariants of a well-formed tree
//!
//! - exactly one root, reachable from which are all nodes;
//! - every node has zero or two children;
//! - no child is older than its parent;
//! - leaf ages are non-negative.
//!
//! [`TimeTree::validate`] checks all of them. The invariants may be broken
//! transiently while a generator is working on a tree, but never on a tree
//! handed back to a caller.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
mod newick;
pub mod node;
pub mod reconstruct;
pub mod tree;

pub use error::TreeError;
pub use node::{NodeIndex, TimeTreeNode};
pub use reconstruct::reconstruct_oldest_first;
pub use tree::TimeTree;
