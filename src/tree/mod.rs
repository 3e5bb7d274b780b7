/*
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! The weight-balanced bulk-update B-tree (§4.1): the hardest leaf of the
//! system. Generic over [`TreeKey`] so the same implementation backs both
//! the per-vertex [`Label`]-keyed trees of [`crate::label_set`] and the
//! global `(w1, w2, node)`-keyed priority queue of [`crate::queue`].

mod build;
mod key;
mod node;
mod params;
mod query;
mod update;

pub use key::{QueueKey, TreeKey};
pub use params::TreeParams;

use crate::op::{BatchKind, Operation};
use node::Node;

/// A weight-balanced, bulk-update B-tree keyed on `K`.
///
/// This is the baseline ordered-set container; [`crate::label_set`] builds
/// the per-vertex Pareto-set semantics on top of `ParetoBTree<Label>`, and
/// [`crate::queue::ParetoQueue`] uses `ParetoBTree<QueueKey>` directly,
/// ordered by `(w1, w2, node)`.
#[derive(Debug)]
pub struct ParetoBTree<K: TreeKey> {
    root: Option<Box<Node<K>>>,
    size: usize,
    params: TreeParams,
}

impl<K: TreeKey> ParetoBTree<K> {
    /// Creates an empty tree with the given parameters.
    pub fn new(params: TreeParams) -> Self {
        Self {
            root: None,
            size: 0,
            params,
        }
    }

    /// Applies a sorted, duplicate-free batch of insertions/deletions
    /// (§3, §4.1). `kind` selects the O(1)-per-range weight-delta shortcut;
    /// pass [`BatchKind::infer`] if the caller does not already know it.
    pub fn apply_updates(&mut self, batch: &[Operation<K>], kind: BatchKind) {
        update::apply_updates(&mut self.root, &mut self.size, batch, kind, &self.params);
        #[cfg(feature = "selfverify")]
        self.verify_invariants();
    }

    /// Appends to `out` every key that is a Pareto minimum in tree order
    /// relative to `prefix_min` (§4.1). Runs sequentially below the
    /// adaptive cut-off of §4.3, in parallel above it.
    pub fn find_pareto_minima(&self, prefix_min: u32, out: &mut Vec<K>) {
        let cutoff = query::adaptive_cutoff(
            self.size,
            rayon::current_num_threads(),
            self.params.max_weight(1),
        );
        query::find_pareto_minima(&self.root, prefix_min, out, self.size > cutoff);
    }

    /// Deallocates every node, resetting the tree to empty.
    pub fn clear(&mut self) {
        self.root = None;
        self.size = 0;
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn empty(&self) -> bool {
        self.size == 0
    }

    /// The tree's height (0 for an empty tree or a tree with a single
    /// leaf root).
    pub fn height(&self) -> usize {
        self.root.as_ref().map(|r| r.height()).unwrap_or(0)
    }

    /// Returns every key, in tree order. `O(n)`; intended for tests and
    /// diagnostics, not the hot path.
    pub fn iter_sorted(&self) -> Vec<K> {
        let mut out = Vec::with_capacity(self.size);
        if let Some(root) = &self.root {
            root.collect_into(&mut out);
        }
        out
    }

    /// Re-validates every structural invariant in §8, panicking on the
    /// first violation. Only meant for `selfverify` builds and tests: a
    /// violated precondition is a programmer error, not a recoverable
    /// runtime condition (§4.1 "Failure semantics").
    pub fn verify_invariants(&self) {
        let keys = self.iter_sorted();
        assert!(
            keys.windows(2).all(|w| w[0] < w[1]),
            "keys must be strictly ascending in tree order"
        );
        assert_eq!(keys.len(), self.size, "size() must match key count");
        if let Some(root) = &self.root {
            verify_node(root, &self.params, true);
        }
    }
}

fn verify_node<K: TreeKey>(node: &Node<K>, params: &TreeParams, is_root: bool) {
    let level = node.level();
    let weight = node.weight();
    if !is_root {
        assert!(
            weight >= params.min_weight(level) && weight <= params.max_weight(level),
            "weight {weight} out of bounds [{}, {}] at level {level}",
            params.min_weight(level),
            params.max_weight(level)
        );
    }
    if let Node::Inner { children, .. } = node {
        for slot in children {
            assert_eq!(slot.router, slot.node.router(), "stale router");
            assert_eq!(slot.weight, slot.node.weight(), "stale weight cache");
            assert_eq!(slot.minimum, slot.node.minimum(), "stale minimum cache");
            verify_node(&slot.node, params, false);
        }
    }
}
