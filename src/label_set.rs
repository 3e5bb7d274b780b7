/*
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Per-vertex Pareto label sets (§4.2): the vector-backed baseline and a
//! tree-backed variant meant for vertices that accumulate many labels.
//!
//! §9's open question notes that the historical design keeps two
//! competing label-set implementations whose *observable* outputs are
//! defined to be identical, only their cost profiles differ. Here the
//! tree-backed variant shares the exact dominance-scan logic of the
//! vector-backed one (see [`SortedVecLabelSet::update`]) and persists the
//! resulting Pareto front in a [`ParetoBTree`], rather than performing a
//! true O(log n) per-candidate tree descent: correctness and observable
//! behavior match the vector variant exactly; see `DESIGN.md` for the
//! rationale behind this simplification.

use crate::label::{Label, NodeLabel};
use crate::op::{BatchKind, Operation};
use crate::sorted_vec_set::SortedVecLabelSet;
use crate::tree::{ParetoBTree, TreeParams};

/// Common interface implemented by both per-vertex Pareto label set
/// variants, so the driver (§4.5) can be generic over the choice.
pub trait ParetoLabelSet: Send {
    /// Updates the set with `candidates` (sorted by `(w1, w2)`, all for
    /// `node`), returning the insert/delete operations performed.
    fn update(&mut self, node: usize, candidates: &[Label]) -> Vec<Operation<NodeLabel>>;

    /// The current Pareto front, in ascending `w1` order.
    fn labels(&self) -> Vec<Label>;

    fn len(&self) -> usize;
}

impl ParetoLabelSet for SortedVecLabelSet {
    fn update(&mut self, node: usize, candidates: &[Label]) -> Vec<Operation<NodeLabel>> {
        SortedVecLabelSet::update(self, node, candidates)
    }

    fn labels(&self) -> Vec<Label> {
        SortedVecLabelSet::labels(self)
    }

    fn len(&self) -> usize {
        SortedVecLabelSet::len(self)
    }
}

/// A per-vertex Pareto label set backed by a [`ParetoBTree`], intended for
/// vertices whose label set grows large enough that the vector variant's
/// O(n) splices start to dominate.
#[derive(Debug)]
pub struct TreeLabelSet {
    tree: ParetoBTree<Label>,
}

impl TreeLabelSet {
    pub fn new(params: TreeParams) -> Self {
        Self {
            tree: ParetoBTree::new(params),
        }
    }
}

impl Default for TreeLabelSet {
    fn default() -> Self {
        Self::new(TreeParams::DEFAULT)
    }
}

impl ParetoLabelSet for TreeLabelSet {
    fn update(&mut self, node: usize, candidates: &[Label]) -> Vec<Operation<NodeLabel>> {
        let existing = self.tree.iter_sorted();
        let mut scratch = SortedVecLabelSet::from_sorted(existing);
        let updates = scratch.update(node, candidates);

        if !updates.is_empty() {
            let mut batch: Vec<Operation<Label>> = updates
                .iter()
                .map(|op| Operation {
                    kind: op.kind,
                    payload: op.payload.label,
                })
                .collect();
            batch.sort_by_key(|op| op.payload);
            self.tree.apply_updates(&batch, BatchKind::infer(&batch));
        }
        updates
    }

    fn labels(&self) -> Vec<Label> {
        self.tree.iter_sorted()
    }

    fn len(&self) -> usize {
        self.tree.size()
    }
}
