/*
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! The parallel label-setting driver (§4.5): the bulk-synchronous loop that
//! ties the queue, the per-vertex label sets, the sort primitives and the
//! write buffers together.
//!
//! ```text
//! queue_nonempty? -> FIND_MINIMA -> SORT_CANDIDATES_BY_NODE
//!                 -> PER_NODE_UPDATE_LABELSETS -> SORT_UPDATES
//!                 -> APPLY_UPDATES_TO_QUEUE -> loop
//! ```

use std::ops::Range;

use rayon::prelude::*;
use sync_cell_slice::SyncSlice;

use crate::buffers::{SlotCounter, WriteBuffer};
use crate::graph::WeightedGraph;
use crate::label::{Label, NodeLabel};
use crate::label_set::{ParetoLabelSet, TreeLabelSet};
use crate::op::{BatchKind, Operation};
use crate::queue::ParetoQueue;
use crate::sort::parallel_radix_sort;
use crate::sorted_vec_set::SortedVecLabelSet;
use crate::stats::{progress_logger, timed, Phase, RunStats};
use crate::tree::TreeParams;

/// Which per-vertex [`ParetoLabelSet`] implementation the driver should
/// instantiate for every vertex (§4.2, §9's open question).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelSetKind {
    Vector,
    Tree,
}

fn new_label_set(kind: LabelSetKind, params: TreeParams) -> Box<dyn ParetoLabelSet> {
    match kind {
        LabelSetKind::Vector => Box::new(SortedVecLabelSet::new()),
        LabelSetKind::Tree => Box::new(TreeLabelSet::new(params)),
    }
}

/// Splits `candidates` (already sorted ascending by `node`) into
/// contiguous per-node ranges.
fn node_segments(candidates: &[NodeLabel]) -> Vec<Range<usize>> {
    let mut segments = Vec::new();
    let mut start = 0;
    for i in 1..=candidates.len() {
        if i == candidates.len() || candidates[i].node != candidates[start].node {
            segments.push(start..i);
            start = i;
        }
    }
    segments
}

/// Computes the complete Pareto frontier from `source` to every reachable
/// vertex of `graph` (§1, §4.5).
pub struct Solver<'g> {
    graph: &'g dyn WeightedGraph,
    params: TreeParams,
    queue: ParetoQueue,
    label_sets: Vec<Box<dyn ParetoLabelSet>>,
    stats: RunStats,
}

impl<'g> Solver<'g> {
    pub fn new(graph: &'g dyn WeightedGraph, params: TreeParams, kind: LabelSetKind) -> Self {
        let label_sets = (0..graph.num_nodes())
            .map(|_| new_label_set(kind, params))
            .collect();
        Self {
            graph,
            params,
            queue: ParetoQueue::new(params),
            label_sets,
            stats: RunStats::new(),
        }
    }

    /// The computed Pareto frontier for `node`, in ascending `w1` order.
    /// Empty until [`Solver::run`] has been called.
    pub fn frontier(&self, node: usize) -> Vec<Label> {
        self.label_sets[node].labels()
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    /// Runs the complete BSP loop from `source` until the queue empties
    /// (§4.5 "Termination").
    pub fn run(&mut self, source: usize) {
        self.queue.init(NodeLabel::new(source, 0, 0));
        self.label_sets[source].update(source, &[Label::new(0, 0)]);

        let mut pl = progress_logger("iteration");
        pl.start("running parallel label-setting loop");

        while !self.queue.is_empty() {
            let minima = timed(&mut self.stats, Phase::FindMinima, self.queue.size() as u64, || {
                self.queue.find_pareto_minima(u32::MAX, self.graph)
            });

            let mut candidates = minima.candidates;
            let batch_size = self.params.batch_size;
            timed(
                &mut self.stats,
                Phase::SortCandidates,
                candidates.len() as u64,
                || parallel_radix_sort(&mut candidates, |c| c.node, batch_size),
            );

            let n = candidates.len() as u64;
            let label_updates = timed(&mut self.stats, Phase::UpdateLabelSets, n, || {
                self.update_label_sets(&candidates)
            });

            let mut all_updates = minima.deletes;
            all_updates.extend(label_updates);
            timed(
                &mut self.stats,
                Phase::SortUpdates,
                all_updates.len() as u64,
                || all_updates.sort_by(|a, b| a.payload.cmp_by_weight(&b.payload)),
            );

            let inserted = all_updates.iter().filter(|op| op.is_insert()).count() as u64;
            let deleted = all_updates.iter().filter(|op| op.is_delete()).count() as u64;

            timed(
                &mut self.stats,
                Phase::ApplyUpdates,
                all_updates.len() as u64,
                || {
                    let kind = BatchKind::infer(&all_updates);
                    self.queue.apply_updates(&all_updates, kind);
                },
            );

            self.stats.record_iteration(inserted, deleted);
            pl.light_update();
        }

        pl.done();
        self.stats.log_summary();
    }

    /// Partitions `candidates` (sorted by node) into per-vertex segments
    /// and updates each vertex's label set on its own worker, so a single
    /// thread ever owns a given set at a time (§4.5 step 4, §5 "Within a
    /// single label set update").
    ///
    /// Each vertex's set is temporarily swapped out for a placeholder
    /// while its owning worker runs, the same "take ownership, recurse,
    /// put back" idiom the B-tree's bulk update uses for its child slots
    /// (see `tree::update::apply_in_place`).
    fn update_label_sets(&mut self, candidates: &[NodeLabel]) -> Vec<Operation<NodeLabel>> {
        if candidates.is_empty() {
            return Vec::new();
        }
        let segments = node_segments(candidates);

        let taken: Vec<(usize, Box<dyn ParetoLabelSet>)> = segments
            .iter()
            .map(|seg| {
                let node = candidates[seg.start].node;
                let placeholder = new_label_set(LabelSetKind::Vector, self.params);
                (node, std::mem::replace(&mut self.label_sets[node], placeholder))
            })
            .collect();

        // Worst case a single candidate evicts every existing member of
        // its vertex's set, so size the shared scratch array for one
        // insert per candidate plus one delete per currently-held label.
        let existing: usize = taken.iter().map(|(_, s)| s.len()).sum();
        let capacity = candidates.len() + existing + 1;
        let sentinel = Operation::insert(NodeLabel::MAX);
        let mut scratch = vec![sentinel; capacity];
        let counter = SlotCounter::new(capacity);
        let sync = scratch.as_sync_slice();
        let block_size = self.params.batch_size.max(1);

        let restored: Vec<(usize, Box<dyn ParetoLabelSet>)> = taken
            .into_par_iter()
            .zip(segments.into_par_iter())
            .map(|((node, mut set), seg)| {
                let mut seg_candidates: Vec<NodeLabel> = candidates[seg].to_vec();
                seg_candidates.sort_by(|a, b| a.label.cmp(&b.label));
                let labels: Vec<Label> = seg_candidates.iter().map(|c| c.label).collect();

                let mut buf = WriteBuffer::new(&counter, &sync, block_size, sentinel);
                for op in set.update(node, &labels) {
                    buf.emplace(op);
                }
                buf.finish();
                (node, set)
            })
            .collect();
        drop(sync);

        for (node, set) in restored {
            self.label_sets[node] = set;
        }

        let mut updates = scratch[..counter.claimed_len()].to_vec();
        updates.retain(|op| op.payload != NodeLabel::MAX);
        updates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::VecWeightedGraph;

    fn diamond() -> VecWeightedGraph {
        VecWeightedGraph::from_arcs([
            (0, 2, 1, 2),
            (2, 1, 1, 1),
            (0, 3, 2, 1),
            (3, 1, 1, 1),
            (0, 4, 1, 1),
            (4, 1, 4, 4),
        ])
    }

    #[test]
    fn diamond_graph_produces_the_expected_frontier() {
        let graph = diamond();
        let mut solver = Solver::new(&graph, TreeParams::DEFAULT, LabelSetKind::Vector);
        solver.run(0);

        let mut frontier = solver.frontier(1);
        frontier.sort();
        // (0,0) -> 2 (1,2) -> 1 (1,1): total (2,3)
        // (0,0) -> 3 (2,1) -> 1 (1,1): total (3,2)
        // (0,0) -> 4 (1,1) -> 1 (4,4): total (5,5), dominated by (3,2)
        assert_eq!(frontier, vec![Label::new(2, 3), Label::new(3, 2)]);
    }

    #[test]
    fn vector_and_tree_label_sets_agree_on_the_diamond() {
        let graph = diamond();

        let mut vec_solver = Solver::new(&graph, TreeParams::DEFAULT, LabelSetKind::Vector);
        vec_solver.run(0);

        let mut tree_solver = Solver::new(&graph, TreeParams::DEFAULT, LabelSetKind::Tree);
        tree_solver.run(0);

        for node in 0..graph.num_nodes() {
            let mut a = vec_solver.frontier(node);
            let mut b = tree_solver.frontier(node);
            a.sort();
            b.sort();
            assert_eq!(a, b, "frontier mismatch at node {node}");
        }
    }

    #[test]
    fn unreachable_vertex_gets_an_empty_frontier() {
        let mut graph = VecWeightedGraph::new();
        graph.add_arc(0, 1, 1, 1);
        graph.add_node(2);
        let mut solver = Solver::new(&graph, TreeParams::DEFAULT, LabelSetKind::Vector);
        solver.run(0);
        assert!(solver.frontier(2).is_empty());
    }
}
