//! Hand-built trees with known shapes and ages.

use thicket_core::{NodeIndex, TimeTree};

/// `((A:2,B:2):3,C:4);`: leaves A, B at age 0 and C at age 1; the
/// cherry at age 2; the root at age 5.
pub fn three_taxon() -> TimeTree {
    let mut tree = TimeTree::from_leaves([("A", 0.0), ("B", 0.0), ("C", 1.0)])
        .expect("valid leaves");
    let ab = tree
        .add_internal(2.0, NodeIndex(0), NodeIndex(1))
        .expect("fresh nodes");
    let root = tree.add_internal(5.0, ab, NodeIndex(2)).expect("fresh nodes");
    tree.set_root(root).expect("parentless root");
    tree
}

/// A caterpillar over `n` contemporary leaves `t0..t{n-1}`: internal node
/// `k` joins the previous subtree with leaf `k + 1` at age `(k + 1) * step`.
pub fn caterpillar(n: usize, step: f64) -> TimeTree {
    assert!(n >= 2, "a caterpillar needs two leaves");
    let mut tree = TimeTree::from_leaves((0..n).map(|i| (format!("t{i}"), 0.0)))
        .expect("valid leaves");
    let mut current = NodeIndex(0);
    for k in 0..n - 1 {
        current = tree
            .add_internal((k + 1) as f64 * step, current, NodeIndex(k as u32 + 1))
            .expect("fresh nodes");
    }
    tree.set_root(current).expect("parentless root");
    tree
}

/// `n` taxon names `t0..t{n-1}`.
pub fn taxon_names(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("t{i}")).collect()
}
