/*
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! The sentinel-padded sorted vector set (§3): the baseline per-vertex
//! Pareto label set, used directly when the tree-backed variant is not
//! warranted and as the oracle the tree-backed variant is tested against.

use crate::label::{Label, NodeLabel};
use crate::op::Operation;

/// A label bound that can represent the `±∞` sentinels bracketing the set,
/// which fall outside the range of any real, non-negative `u32` weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Bound {
    w1: i64,
    w2: i64,
}

impl Bound {
    const NEG_INF: Bound = Bound {
        w1: i64::MIN,
        w2: i64::MAX,
    };
    const POS_INF: Bound = Bound {
        w1: i64::MAX,
        w2: i64::MIN,
    };

    #[inline]
    fn of(label: Label) -> Bound {
        Bound {
            w1: label.w1 as i64,
            w2: label.w2 as i64,
        }
    }

    #[inline]
    fn to_label(self) -> Label {
        Label::new(self.w1 as u32, self.w2 as u32)
    }
}

/// A per-vertex Pareto set: strictly increasing in `w1`, strictly
/// decreasing in `w2`, bracketed by `±∞` sentinels.
#[derive(Debug, Clone)]
pub struct SortedVecLabelSet {
    labels: Vec<Bound>,
}

impl Default for SortedVecLabelSet {
    fn default() -> Self {
        Self::new()
    }
}

impl SortedVecLabelSet {
    /// Creates an empty set (just the two sentinels).
    pub fn new() -> Self {
        Self {
            labels: vec![Bound::NEG_INF, Bound::POS_INF],
        }
    }

    /// Rebuilds a set from an already Pareto-optimal, ascending-`w1`
    /// sequence of labels (debug builds verify the ordering holds).
    pub(crate) fn from_sorted(labels: Vec<Label>) -> Self {
        debug_assert!(labels.windows(2).all(|w| w[0].w1 < w[1].w1 && w[0].w2 > w[1].w2));
        let mut bounds = Vec::with_capacity(labels.len() + 2);
        bounds.push(Bound::NEG_INF);
        bounds.extend(labels.into_iter().map(Bound::of));
        bounds.push(Bound::POS_INF);
        Self { labels: bounds }
    }

    /// The number of real (non-sentinel) labels in the set.
    pub fn len(&self) -> usize {
        self.labels.len() - 2
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns every real label, in ascending `w1` order.
    pub fn labels(&self) -> Vec<Label> {
        self.labels[1..self.labels.len() - 1]
            .iter()
            .map(|b| b.to_label())
            .collect()
    }

    /// Updates the set with a batch of candidates sorted by `(w1, w2)`
    /// (§4.2, vector variant). Returns the exact insert/delete operations
    /// performed, annotated with `node` for propagation to the global
    /// queue.
    pub fn update(&mut self, node: usize, candidates: &[Label]) -> Vec<Operation<NodeLabel>> {
        let mut updates = Vec::new();
        let mut running_min_w2 = i64::MAX;

        for &cand in candidates {
            let c = Bound::of(cand);
            if c.w2 >= running_min_w2 {
                // Dominated by an earlier candidate in this same batch.
                continue;
            }

            // x-predecessor: last element with w1 <= c.w1. The NEG_INF
            // sentinel guarantees this always exists.
            let pos = self.labels.partition_point(|b| b.w1 <= c.w1);
            let pred_idx = pos - 1;
            let pred = self.labels[pred_idx];

            if pred.w2 <= c.w2 {
                // Dominated by an existing member of the set.
                running_min_w2 = pred.w2;
                continue;
            }

            // Non-dominated: find the y-predecessor, the first element
            // (scanning forward) with w2 strictly less than c.w2. The
            // POS_INF sentinel guarantees this terminates.
            let mut y_idx = pred_idx + 1;
            while self.labels[y_idx].w2 >= c.w2 {
                y_idx += 1;
            }

            for removed in &self.labels[pred_idx + 1..y_idx] {
                updates.push(Operation::delete(NodeLabel {
                    node,
                    label: removed.to_label(),
                }));
            }
            self.labels.splice(pred_idx + 1..y_idx, [c]);
            updates.push(Operation::insert(NodeLabel { node, label: cand }));
            running_min_w2 = c.w2;
        }

        updates
    }

    /// Applies a list of previously emitted [`Operation`]s to this set,
    /// reproducing the exact sequence of inserts/deletes without
    /// recomputing dominance. Used to test the "emitted updates reproduce
    /// the new set exactly" property of §8.
    pub fn apply_updates(&mut self, updates: &[Operation<NodeLabel>]) {
        for op in updates {
            let b = Bound::of(op.payload.label);
            if op.is_insert() {
                let pos = self.labels.partition_point(|x| x.w1 < b.w1);
                self.labels.insert(pos, b);
            } else {
                let pos = self
                    .labels
                    .iter()
                    .position(|&x| x == b)
                    .expect("delete of a label absent from the set");
                self.labels.remove(pos);
            }
        }
    }
}
