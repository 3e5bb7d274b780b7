/*
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! The parallel Pareto priority queue (§4.3): a [`ParetoBTree`] of
//! [`NodeLabel`]s ordered `(w1, w2, node)`, used as the global frontier of
//! tentative labels across every vertex in the graph.

use rayon::prelude::*;
use sync_cell_slice::SyncSlice;

use crate::buffers::{SlotCounter, WriteBuffer};
use crate::graph::WeightedGraph;
use crate::label::{Label, NodeLabel};
use crate::op::{BatchKind, Operation};
use crate::tree::{ParetoBTree, QueueKey, TreeParams};

/// The per-thread output of one `find_pareto_minima` round: a DELETE of
/// every extracted minimum, plus the candidates relaxed along its
/// out-edges (§4.3 "Per-thread derivation").
#[derive(Debug, Default)]
pub struct MinimaBatch {
    pub deletes: Vec<Operation<NodeLabel>>,
    pub candidates: Vec<NodeLabel>,
}

/// The global frontier: a B-tree of `NodeLabel` keyed by `(w1, w2, node)`.
#[derive(Debug)]
pub struct ParetoQueue {
    tree: ParetoBTree<QueueKey>,
}

impl ParetoQueue {
    pub fn new(params: TreeParams) -> Self {
        Self {
            tree: ParetoBTree::new(params),
        }
    }

    /// Seeds the queue with a single label, typically the source's
    /// `(0, 0)` (§4.5 step 1).
    pub fn init(&mut self, seed: NodeLabel) {
        self.tree
            .apply_updates(&[Operation::insert(QueueKey(seed))], BatchKind::InsertsOnly);
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.tree.size()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tree.empty()
    }

    /// Applies a sorted, duplicate-free batch of `(w1, w2, node)`-ordered
    /// insertions/deletions (§4.3 `apply_updates`).
    pub fn apply_updates(&mut self, batch: &[Operation<NodeLabel>], kind: BatchKind) {
        let mut keyed: Vec<Operation<QueueKey>> = batch
            .iter()
            .map(|op| Operation {
                kind: op.kind,
                payload: QueueKey(op.payload),
            })
            .collect();
        keyed.sort_by(|a, b| a.payload.cmp(&b.payload));
        self.tree.apply_updates(&keyed, kind);
    }

    /// Finds every Pareto-minimal `NodeLabel` currently in the queue
    /// (`w2` strictly less than any predecessor in tree order, or equal to
    /// `prefix_min`), and derives the DELETE-of-minimum and relaxed
    /// candidate streams from them against `graph` (§4.3, §4.5 step 2).
    ///
    /// `prefix_min` is fixed at `u32::MAX` by the driver: the queue never
    /// narrows it, since every vertex's frontier is independently
    /// Pareto-relevant (unlike a per-vertex label set, which tracks a
    /// single running y-predecessor).
    pub fn find_pareto_minima(&self, prefix_min: u32, graph: &dyn WeightedGraph) -> MinimaBatch {
        let mut minima = Vec::new();
        self.tree.find_pareto_minima(prefix_min, &mut minima);

        let deletes: Vec<Operation<NodeLabel>> = minima
            .par_iter()
            .map(|key| Operation::delete(key.0))
            .collect();

        // Per-thread derivation (§4.3, §4.4): the relaxed successor stream
        // is the largest fan-out step of a round, so it is written through
        // the same write-buffer machinery as the driver's label-set update
        // phase rather than collected on one thread. Each minimum's exact
        // out-degree is known up front, so the scratch array is sized
        // exactly and a block size of 1 claims slots with no padding
        // waste (no sentinel filtering needed afterwards).
        let total_candidates: usize = minima
            .par_iter()
            .map(|key| graph.out_degree(key.0.node))
            .sum();
        let sentinel = NodeLabel::MAX;
        let mut scratch = vec![sentinel; total_candidates];
        let counter = SlotCounter::new(total_candidates);
        let sync = scratch.as_sync_slice();

        minima.par_iter().for_each(|key| {
            let m = key.0;
            let mut buf = WriteBuffer::new(&counter, &sync, 1, sentinel);
            for arc in graph.successors(m.node) {
                let relaxed = Label::new(m.w1() + arc.w1, m.w2() + arc.w2);
                buf.emplace(NodeLabel {
                    node: arc.target,
                    label: relaxed,
                });
            }
            buf.finish();
        });
        drop(sync);

        MinimaBatch {
            deletes,
            candidates: scratch,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::VecWeightedGraph;

    fn diamond() -> VecWeightedGraph {
        // 0 -> 2 (1,2), 2 -> 1 (1,1), 0 -> 3 (2,1), 3 -> 1 (1,1)
        VecWeightedGraph::from_arcs([(0, 2, 1, 2), (2, 1, 1, 1), (0, 3, 2, 1), (3, 1, 1, 1)])
    }

    #[test]
    fn init_seeds_a_single_label() {
        let mut q = ParetoQueue::new(TreeParams::DEFAULT);
        q.init(NodeLabel::new(0, 0, 0));
        assert_eq!(q.size(), 1);
        assert!(!q.is_empty());
    }

    #[test]
    fn find_pareto_minima_drains_the_source_and_relaxes_successors() {
        let graph = diamond();
        let mut q = ParetoQueue::new(TreeParams::DEFAULT);
        q.init(NodeLabel::new(0, 0, 0));

        let batch = q.find_pareto_minima(u32::MAX, &graph);
        assert_eq!(batch.deletes.len(), 1);
        assert_eq!(batch.deletes[0].payload, NodeLabel::new(0, 0, 0));

        let mut candidates = batch.candidates.clone();
        candidates.sort_by(|a, b| a.cmp_by_node(b));
        assert_eq!(
            candidates,
            vec![NodeLabel::new(2, 1, 2), NodeLabel::new(3, 2, 1)]
        );
    }

    #[test]
    fn apply_updates_removes_deletes_and_inserts_candidates() {
        let mut q = ParetoQueue::new(TreeParams::DEFAULT);
        q.init(NodeLabel::new(0, 0, 0));

        let mut batch = vec![
            Operation::delete(NodeLabel::new(0, 0, 0)),
            Operation::insert(NodeLabel::new(2, 1, 2)),
            Operation::insert(NodeLabel::new(3, 2, 1)),
        ];
        batch.sort_by(|a, b| a.payload.cmp_by_weight(&b.payload));
        q.apply_updates(&batch, BatchKind::InsertsAndDeletes);
        assert_eq!(q.size(), 2);
    }
}
