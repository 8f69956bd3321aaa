//! The [`TimeTree`] arena.

use crate::error::TreeError;
use crate::node::{NodeIndex, TimeTreeNode};

/// A binary tree annotated with per-node ages (time before present).
///
/// Nodes are stored in an arena and addressed by [`NodeIndex`]. Leaves
/// occupy `0..n_taxa`; internal nodes follow in creation order. The tree
/// exclusively owns its nodes: a published tree is only ever read.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TimeTree {
    nodes: Vec<TimeTreeNode>,
    root: Option<NodeIndex>,
    n_taxa: usize,
}

impl TimeTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a rootless tree holding only the given leaves.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvalidLeafAge`] for a negative or non-finite age.
    pub fn from_leaves<I, S>(leaves: I) -> Result<Self, TreeError>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut tree = Self::new();
        for (taxon, age) in leaves {
            tree.add_leaf(taxon, age)?;
        }
        Ok(tree)
    }

    /// Append a leaf with a taxon label.
    ///
    /// # Errors
    ///
    /// Leaves must be added before any internal node
    /// ([`TreeError::LeafAfterInternal`]) and must have a finite,
    /// non-negative age ([`TreeError::InvalidLeafAge`]).
    pub fn add_leaf(&mut self, taxon: impl Into<String>, age: f64) -> Result<NodeIndex, TreeError> {
        if self.nodes.len() != self.n_taxa {
            return Err(TreeError::LeafAfterInternal {
                node_count: self.nodes.len(),
            });
        }
        let index = NodeIndex(self.nodes.len() as u32);
        if !age.is_finite() || age < 0.0 {
            return Err(TreeError::InvalidLeafAge { index, age });
        }
        self.nodes
            .push(TimeTreeNode::new(index, age, Some(taxon.into())));
        self.n_taxa += 1;
        Ok(index)
    }

    /// Append an internal node joining two parentless nodes.
    ///
    /// The age is stored as given; it is not checked against the children
    /// here because generators may assign ages before the final topology
    /// is known. [`validate`](Self::validate) enforces monotonicity.
    pub fn add_internal(
        &mut self,
        age: f64,
        left: NodeIndex,
        right: NodeIndex,
    ) -> Result<NodeIndex, TreeError> {
        if left == right {
            return Err(TreeError::SelfPairing { index: left });
        }
        for child in [left, right] {
            if self.node_ref(child)?.parent.is_some() {
                return Err(TreeError::AlreadyAttached { index: child });
            }
        }
        let index = NodeIndex(self.nodes.len() as u32);
        self.nodes.push(TimeTreeNode::new(index, age, None));
        self.attach(index, left, right);
        Ok(index)
    }

    /// Designate the root.
    ///
    /// # Errors
    ///
    /// The node must exist and must not have a parent.
    pub fn set_root(&mut self, root: NodeIndex) -> Result<(), TreeError> {
        if self.node_ref(root)?.parent.is_some() {
            return Err(TreeError::AlreadyAttached { index: root });
        }
        self.root = Some(root);
        Ok(())
    }

    /// The designated root, if set.
    pub fn root(&self) -> Option<NodeIndex> {
        self.root
    }

    /// Age of the root, if a root is set.
    pub fn root_age(&self) -> Option<f64> {
        self.root.map(|r| self.nodes[r.get()].age)
    }

    /// Look up a node.
    pub fn node(&self, index: NodeIndex) -> Option<&TimeTreeNode> {
        self.nodes.get(index.get())
    }

    fn node_ref(&self, index: NodeIndex) -> Result<&TimeTreeNode, TreeError> {
        self.nodes
            .get(index.get())
            .ok_or(TreeError::UnknownNode { index })
    }

    /// Age of a node.
    pub fn age(&self, index: NodeIndex) -> Result<f64, TreeError> {
        Ok(self.node_ref(index)?.age)
    }

    /// Overwrite the age of a node.
    pub fn set_age(&mut self, index: NodeIndex, age: f64) -> Result<(), TreeError> {
        let node = self
            .nodes
            .get_mut(index.get())
            .ok_or(TreeError::UnknownNode { index })?;
        node.age = age;
        Ok(())
    }

    /// All nodes in index order.
    pub fn nodes(&self) -> &[TimeTreeNode] {
        &self.nodes
    }

    /// Number of leaves.
    pub fn n_taxa(&self) -> usize {
        self.n_taxa
    }

    /// Total number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of internal nodes.
    pub fn internal_count(&self) -> usize {
        self.nodes.len() - self.n_taxa
    }

    /// Whether `index` falls in the leaf range `0..n_taxa`.
    pub fn is_tip_index(&self, index: NodeIndex) -> bool {
        index.get() < self.n_taxa
    }

    /// Leaves in index order.
    pub fn leaves(&self) -> impl Iterator<Item = &TimeTreeNode> {
        self.nodes[..self.n_taxa].iter()
    }

    /// Internal nodes in index order.
    pub fn internal_nodes(&self) -> impl Iterator<Item = &TimeTreeNode> {
        self.nodes[self.n_taxa..].iter()
    }

    /// Taxon labels of the leaves, in index order.
    pub fn taxa(&self) -> Vec<&str> {
        self.leaves().filter_map(|n| n.taxon()).collect()
    }

    /// In-order (left, node, right) sequence of the nodes reachable from the root.
    ///
    /// For a full binary tree the result alternates leaf, internal, leaf.
    pub fn in_order(&self) -> Result<Vec<NodeIndex>, TreeError> {
        let root = self.root.ok_or(TreeError::MissingRoot)?;
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = Vec::new();
        let mut current = Some(root);
        loop {
            while let Some(index) = current {
                stack.push(index);
                current = self.node_ref(index)?.left();
            }
            let Some(index) = stack.pop() else {
                break;
            };
            out.push(index);
            current = self.nodes[index.get()].right();
        }
        Ok(out)
    }

    /// Sum of all branch lengths.
    pub fn tree_length(&self) -> f64 {
        self.nodes
            .iter()
            .filter_map(|n| n.parent.map(|p| self.nodes[p.get()].age - n.age))
            .sum()
    }

    /// Copy the internal node ages, in index order, into `ages`.
    ///
    /// # Errors
    ///
    /// [`TreeError::AgesLengthMismatch`] if `ages.len()` differs from the
    /// internal node count.
    pub fn internal_node_ages(&self, ages: &mut [f64]) -> Result<(), TreeError> {
        if ages.len() != self.internal_count() {
            return Err(TreeError::AgesLengthMismatch {
                expected: self.internal_count(),
                actual: ages.len(),
            });
        }
        for (slot, node) in ages.iter_mut().zip(self.internal_nodes()) {
            *slot = node.age;
        }
        Ok(())
    }

    /// Check every structural and age invariant of a published tree.
    pub fn validate(&self) -> Result<(), TreeError> {
        let root = self.root.ok_or(TreeError::MissingRoot)?;
        let parentless = self.nodes.iter().filter(|n| n.parent.is_none()).count();
        if parentless != 1 {
            return Err(TreeError::MultipleRoots { count: parentless });
        }
        if self.node_ref(root)?.parent.is_some() {
            return Err(TreeError::MissingRoot);
        }

        for node in &self.nodes {
            let expected = if self.is_tip_index(node.index) { 0 } else { 2 };
            if node.children.len() != expected {
                return Err(TreeError::NotBinary {
                    index: node.index,
                    children: node.children.len(),
                });
            }
            if expected == 0 && (!node.age.is_finite() || node.age < 0.0) {
                return Err(TreeError::InvalidLeafAge {
                    index: node.index,
                    age: node.age,
                });
            }
            if let Some(parent) = node.parent {
                if node.age > self.nodes[parent.get()].age {
                    return Err(TreeError::AgeInversion {
                        child: node.index,
                        parent,
                    });
                }
            }
        }

        let reachable = self.in_order()?.len();
        if reachable != self.nodes.len() {
            return Err(TreeError::Disconnected {
                reachable,
                total: self.nodes.len(),
            });
        }
        Ok(())
    }

    /// Drop every parent/child link and the root designation.
    pub(crate) fn detach_all(&mut self) {
        for node in &mut self.nodes {
            node.parent = None;
            node.children.clear();
        }
        self.root = None;
    }

    pub(crate) fn attach(&mut self, parent: NodeIndex, left: NodeIndex, right: NodeIndex) {
        let node = &mut self.nodes[parent.get()];
        node.children.clear();
        node.children.push(left);
        node.children.push(right);
        self.nodes[left.get()].parent = Some(parent);
        self.nodes[right.get()].parent = Some(parent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// ((A:1,B:1):2,C:3) with ages A=0, B=0, C=0, (AB)=1, root=3.
    fn three_taxon() -> TimeTree {
        let mut tree = TimeTree::from_leaves([("A", 0.0), ("B", 0.0), ("C", 0.0)]).unwrap();
        let ab = tree.add_internal(1.0, NodeIndex(0), NodeIndex(1)).unwrap();
        let root = tree.add_internal(3.0, ab, NodeIndex(2)).unwrap();
        tree.set_root(root).unwrap();
        tree
    }

    #[test]
    fn counts_and_layout() {
        let tree = three_taxon();
        assert_eq!(tree.n_taxa(), 3);
        assert_eq!(tree.node_count(), 5);
        assert_eq!(tree.internal_count(), 2);
        assert!(tree.is_tip_index(NodeIndex(2)));
        assert!(!tree.is_tip_index(NodeIndex(3)));
        assert_eq!(tree.root(), Some(NodeIndex(4)));
        assert_eq!(tree.root_age(), Some(3.0));
        assert_eq!(tree.taxa(), vec!["A", "B", "C"]);
    }

    #[test]
    fn valid_tree_passes_validation() {
        three_taxon().validate().unwrap();
    }

    #[test]
    fn in_order_alternates_leaves_and_internals() {
        let order = three_taxon().in_order().unwrap();
        let raw: Vec<u32> = order.iter().map(|i| i.0).collect();
        assert_eq!(raw, vec![0, 3, 1, 4, 2]);
    }

    #[test]
    fn tree_length_sums_branches() {
        // A:1 + B:1 + AB:2 + C:3
        assert!((three_taxon().tree_length() - 7.0).abs() < 1e-12);
    }

    #[test]
    fn internal_ages_buffer_checked() {
        let tree = three_taxon();
        let mut ages = [0.0; 2];
        tree.internal_node_ages(&mut ages).unwrap();
        assert_eq!(ages, [1.0, 3.0]);

        let mut short = [0.0; 1];
        assert_eq!(
            tree.internal_node_ages(&mut short),
            Err(TreeError::AgesLengthMismatch {
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn leaf_after_internal_rejected() {
        let mut tree = three_taxon();
        assert!(matches!(
            tree.add_leaf("D", 0.0),
            Err(TreeError::LeafAfterInternal { .. })
        ));
    }

    #[test]
    fn negative_leaf_age_rejected() {
        let mut tree = TimeTree::new();
        assert!(matches!(
            tree.add_leaf("A", -1.0),
            Err(TreeError::InvalidLeafAge { .. })
        ));
    }

    #[test]
    fn double_attach_rejected() {
        let mut tree = TimeTree::from_leaves([("A", 0.0), ("B", 0.0), ("C", 0.0)]).unwrap();
        tree.add_internal(1.0, NodeIndex(0), NodeIndex(1)).unwrap();
        assert_eq!(
            tree.add_internal(2.0, NodeIndex(1), NodeIndex(2)),
            Err(TreeError::AlreadyAttached {
                index: NodeIndex(1)
            })
        );
        assert_eq!(
            tree.add_internal(2.0, NodeIndex(2), NodeIndex(2)),
            Err(TreeError::SelfPairing {
                index: NodeIndex(2)
            })
        );
    }

    #[test]
    fn age_inversion_detected() {
        let mut tree = three_taxon();
        tree.set_age(NodeIndex(3), 5.0).unwrap();
        assert_eq!(
            tree.validate(),
            Err(TreeError::AgeInversion {
                child: NodeIndex(3),
                parent: NodeIndex(4)
            })
        );
    }

    #[test]
    fn missing_root_detected() {
        let tree = TimeTree::from_leaves([("A", 0.0)]).unwrap();
        assert_eq!(tree.validate(), Err(TreeError::MissingRoot));
    }

    #[test]
    fn dangling_subtree_detected() {
        let mut tree = TimeTree::from_leaves([("A", 0.0), ("B", 0.0), ("C", 0.0)]).unwrap();
        let ab = tree.add_internal(1.0, NodeIndex(0), NodeIndex(1)).unwrap();
        tree.set_root(ab).unwrap();
        assert_eq!(tree.validate(), Err(TreeError::MultipleRoots { count: 2 }));
    }

    #[test]
    fn single_leaf_tree_is_valid() {
        let mut tree = TimeTree::from_leaves([("A", 0.5)]).unwrap();
        tree.set_root(NodeIndex(0)).unwrap();
        tree.validate().unwrap();
        assert_eq!(tree.tree_length(), 0.0);
    }
}
