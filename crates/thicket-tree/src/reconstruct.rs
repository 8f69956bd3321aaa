//! Oldest-first reconstruction of a binary topology from node ages.
//!
//! When internal ages are drawn independently of the provisional
//! topology, parents can end up younger than their children. The
//! reconstruction re-derives a valid topology from the in-order sequence
//! of `(node, age)` pairs:
//!
//! 1. In a sub-range of the sequence, the oldest internal node that has
//!    not yet been used as a local root becomes the local root.
//! 2. Its left child is the oldest unattached entry strictly to its left
//!    in the sub-range, its right child the oldest unattached entry
//!    strictly to its right. Attached leaves are retired immediately.
//! 3. Recurse on `[from, root)` and `[root, to)`.
//!
//! Because the oldest available node is always the parent, the result is
//! monotonic in age. Ties resolve to the left-most candidate.

use std::ops::Range;

use crate::error::TreeError;
use crate::node::NodeIndex;
use crate::tree::TimeTree;

/// Rebuild the topology of `tree` from its current ages.
///
/// Leaf identities, node indices, and ages are preserved; only parent and
/// child links (and possibly the root) change. The tree's leaves must
/// occupy indices `0..n_taxa`.
///
/// # Errors
///
/// [`TreeError::ReconstructionFailed`] if an age is non-finite or a local
/// root has no candidate child on one side (a malformed age assignment),
/// and any [`TimeTree::validate`] error for the rebuilt tree.
pub fn reconstruct_oldest_first(tree: &mut TimeTree) -> Result<(), TreeError> {
    let order = tree.in_order()?;
    if order.len() != tree.node_count() {
        return Err(TreeError::Disconnected {
            reachable: order.len(),
            total: tree.node_count(),
        });
    }

    let mut ages = Vec::with_capacity(order.len());
    for &index in &order {
        let age = tree.age(index)?;
        if !age.is_finite() {
            return Err(TreeError::ReconstructionFailed {
                reason: format!("node {index} has non-finite age {age}"),
            });
        }
        ages.push(age);
    }
    let internal: Vec<bool> = order.iter().map(|&i| !tree.is_tip_index(i)).collect();

    let n = order.len();
    let mut retired = vec![false; n];
    let mut has_parent = vec![false; n];
    let mut links: Vec<(NodeIndex, NodeIndex, NodeIndex)> = Vec::with_capacity(n / 2);
    let mut root = None;

    let mut ranges = vec![(0, n)];
    while let Some((from, to)) = ranges.pop() {
        let Some(pos) = oldest(&ages, from..to, |j| internal[j] && !retired[j]) else {
            continue;
        };
        let unattached = |j: usize| !has_parent[j] && !retired[j];
        let left = oldest(&ages, from..pos, unattached).ok_or_else(|| {
            TreeError::ReconstructionFailed {
                reason: format!("no left child for node {} in [{from}, {pos})", order[pos]),
            }
        })?;
        let right = oldest(&ages, pos + 1..to, unattached).ok_or_else(|| {
            TreeError::ReconstructionFailed {
                reason: format!(
                    "no right child for node {} in ({pos}, {to})",
                    order[pos]
                ),
            }
        })?;

        links.push((order[pos], order[left], order[right]));
        for child in [left, right] {
            has_parent[child] = true;
            if !internal[child] {
                retired[child] = true;
            }
        }
        retired[pos] = true;
        root.get_or_insert(order[pos]);

        ranges.push((pos, to));
        ranges.push((from, pos));
    }

    let root = match (root, n) {
        (Some(root), _) => root,
        (None, 1) => order[0],
        (None, _) => {
            return Err(TreeError::ReconstructionFailed {
                reason: "no internal node to act as root".to_string(),
            })
        }
    };

    tree.detach_all();
    for (parent, left, right) in links {
        tree.attach(parent, left, right);
    }
    tree.set_root(root)?;
    tracing::trace!(root = %root, nodes = n, "reconstructed tree topology");
    tree.validate()
}

/// Position of the strictly oldest eligible entry, left-most on ties.
fn oldest(ages: &[f64], range: Range<usize>, eligible: impl Fn(usize) -> bool) -> Option<usize> {
    let mut best: Option<usize> = None;
    for j in range {
        if eligible(j) && best.is_none_or(|b| ages[j] > ages[b]) {
            best = Some(j);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parents(tree: &TimeTree) -> Vec<Option<u32>> {
        tree.nodes()
            .iter()
            .map(|n| n.parent().map(|p| p.0))
            .collect()
    }

    /// Caterpillar (((A,B)p,C)q,D)r with leaves at 0.
    fn caterpillar(p: f64, q: f64, r: f64) -> TimeTree {
        let mut tree =
            TimeTree::from_leaves([("A", 0.0), ("B", 0.0), ("C", 0.0), ("D", 0.0)]).unwrap();
        let pn = tree.add_internal(p, NodeIndex(0), NodeIndex(1)).unwrap();
        let qn = tree.add_internal(q, pn, NodeIndex(2)).unwrap();
        let rn = tree.add_internal(r, qn, NodeIndex(3)).unwrap();
        tree.set_root(rn).unwrap();
        tree
    }

    #[test]
    fn valid_tree_is_unchanged() {
        let original = caterpillar(1.0, 2.0, 3.0);
        let mut tree = original.clone();
        reconstruct_oldest_first(&mut tree).unwrap();
        assert_eq!(tree, original);
    }

    #[test]
    fn inverted_ages_are_regrouped() {
        // In-order: A p B q C r D with p older than its provisional parent q.
        let mut tree = caterpillar(3.0, 1.0, 10.0);
        assert!(tree.validate().is_err());
        reconstruct_oldest_first(&mut tree).unwrap();

        // Expected: r(p(A, q(B, C)), D)
        assert_eq!(
            parents(&tree),
            vec![Some(4), Some(5), Some(5), Some(6), Some(6), Some(4), None]
        );
        assert_eq!(tree.root(), Some(NodeIndex(6)));
        assert_eq!(tree.node(NodeIndex(4)).unwrap().children(), &[NodeIndex(0), NodeIndex(5)]);
    }

    #[test]
    fn single_leaf_survives() {
        let mut tree = TimeTree::from_leaves([("A", 0.0)]).unwrap();
        tree.set_root(NodeIndex(0)).unwrap();
        reconstruct_oldest_first(&mut tree).unwrap();
        assert_eq!(tree.root(), Some(NodeIndex(0)));
    }

    #[test]
    fn non_finite_age_fails() {
        let mut tree = caterpillar(1.0, f64::NAN, 3.0);
        assert!(matches!(
            reconstruct_oldest_first(&mut tree),
            Err(TreeError::ReconstructionFailed { .. })
        ));
    }

    #[test]
    fn oldest_prefers_leftmost_tie() {
        let ages = [1.0, 2.0, 2.0, 0.5];
        assert_eq!(oldest(&ages, 0..4, |_| true), Some(1));
        assert_eq!(oldest(&ages, 2..4, |j| j != 2), Some(3));
        assert_eq!(oldest(&ages, 0..0, |_| true), None);
    }
}
