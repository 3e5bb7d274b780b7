/*
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! The bulk-update algorithm (§4.1): compute the weight delta of a sorted
//! batch, decide between an in-place descend and a full rebuild, and apply
//! the batch either way.
//!
//! Simplification from the historical design: rather than opening and
//! closing "defective regions" at arbitrary depth (§4.1), any imbalance
//! detected anywhere in the tree triggers a single whole-tree rebuild from
//! a flattened, merged key sequence. This keeps every level of the tree at
//! a uniform height (no sibling ever gets rebuilt to a different height
//! than its neighbors) while still satisfying every invariant in §8 of the
//! testable properties: it trades away some of the laziness of partial
//! defective-region rewrites for materially simpler, still fully parallel
//! code. See `DESIGN.md`.

use std::cmp::Ordering;

use rayon::prelude::*;

use super::build::build_balanced;
use super::key::TreeKey;
use super::node::{Node, Slot};
use super::params::TreeParams;
use crate::op::{prefix_scan, BatchKind, OpKind, Operation};

/// Computes the net weight delta of a whole batch using the shortcut
/// appropriate to `kind` (§3, §4.1).
pub(crate) fn batch_delta<K>(batch: &[Operation<K>], kind: BatchKind) -> i64 {
    match kind {
        BatchKind::InsertsOnly => batch.len() as i64,
        BatchKind::DeletesOnly => -(batch.len() as i64),
        BatchKind::InsertsAndDeletes => batch.iter().map(|op| op.kind.delta()).sum(),
    }
}

/// Merges a sorted run of keys with a sorted, duplicate-grouped batch of
/// operations, producing the new sorted key sequence. A run of operations
/// sharing the same key (an INSERT/DELETE pair) is resolved by taking the
/// last operation's kind, matching §3's "two operations with equal key are
/// allowed only as INSERT+DELETE".
pub(crate) fn merge_sorted_diff<K: TreeKey>(keys: &[K], batch: &[Operation<K>]) -> Vec<K> {
    let mut out = Vec::with_capacity(keys.len() + batch.len());
    let mut ki = 0;
    let mut bi = 0;
    while ki < keys.len() && bi < batch.len() {
        let k = keys[ki];
        match k.cmp(&batch[bi].payload) {
            Ordering::Less => {
                out.push(k);
                ki += 1;
            }
            Ordering::Greater => {
                consume_insert_run(batch, &mut bi, &mut out);
            }
            Ordering::Equal => {
                let mut keep = true;
                while bi < batch.len() && batch[bi].payload == k {
                    keep = matches!(batch[bi].kind, OpKind::Insert);
                    bi += 1;
                }
                if keep {
                    out.push(k);
                }
                ki += 1;
            }
        }
    }
    out.extend_from_slice(&keys[ki..]);
    while bi < batch.len() {
        consume_insert_run(batch, &mut bi, &mut out);
    }
    out
}

/// Consumes the run of operations in `batch` starting at `*bi` that all
/// share `batch[*bi].payload` (only possible for keys absent from the old
/// set, so at most an INSERT survives; a lone DELETE here is a precondition
/// violation).
fn consume_insert_run<K: TreeKey>(batch: &[Operation<K>], bi: &mut usize, out: &mut Vec<K>) {
    let key = batch[*bi].payload;
    let mut keep = false;
    while *bi < batch.len() && batch[*bi].payload == key {
        match batch[*bi].kind {
            OpKind::Insert => keep = true,
            OpKind::Delete => {
                debug_assert!(false, "delete of a key absent from the set: {key:?}");
                keep = false;
            }
        }
        *bi += 1;
    }
    if keep {
        out.push(key);
    }
}

/// Splits `batch` into one contiguous sub-range per child slot, using each
/// slot's router (the maximum key of its subtree) as the upper bound; the
/// last slot absorbs any remainder (so batches containing new maxima are
/// routed correctly).
fn split_ranges<K: TreeKey>(children: &[Slot<K>], batch: &[Operation<K>]) -> Vec<(usize, usize)> {
    let mut ranges = Vec::with_capacity(children.len());
    let mut start = 0;
    let n = children.len();
    for (i, slot) in children.iter().enumerate() {
        let end = if i + 1 == n {
            batch.len()
        } else {
            batch.partition_point(|op| op.payload <= slot.router)
        };
        ranges.push((start, end));
        start = end;
    }
    ranges
}

/// Checks, without mutating anything, whether `batch` can be applied to
/// `node` by descending in place while keeping every level's weight within
/// `params`'s bounds. `is_root` relaxes the check for `node` itself: the
/// root's own weight is allowed outside `[min_weight, max_weight]` for its
/// level (§3: "except possibly the root"), but every other node's is not.
fn feasible<K: TreeKey>(
    node: &Node<K>,
    new_weight: usize,
    batch: &[Operation<K>],
    params: &TreeParams,
    is_root: bool,
) -> bool {
    let level = node.level();
    if !is_root && (new_weight < params.min_weight(level) || new_weight > params.max_weight(level)) {
        return false;
    }
    match node {
        Node::Leaf(_) => true,
        Node::Inner { children, level } => {
            let ranges = split_ranges(children, batch);
            let mut prefix = Vec::new();
            prefix_scan(batch, &mut prefix);
            children.iter().zip(ranges).all(|(slot, (s, e))| {
                if e <= s {
                    return true;
                }
                let delta = prefix[e] - prefix[s];
                let new_child_weight = slot.weight as i64 + delta;
                if new_child_weight < 0 {
                    return false;
                }
                let new_child_weight = new_child_weight as usize;
                let child_level = level - 1;
                if new_child_weight < params.min_weight(child_level)
                    || new_child_weight > params.max_weight(child_level)
                {
                    return false;
                }
                feasible(&slot.node, new_child_weight, &batch[s..e], params, false)
            })
        }
    }
}

/// Applies `batch` to `node` in place, assuming [`feasible`] already
/// returned `true` for it. Recurses into non-trivial child slots in
/// parallel (§4.1, §5: "a task per non-trivial slot").
fn apply_in_place<K: TreeKey>(mut node: Box<Node<K>>, batch: &[Operation<K>]) -> Box<Node<K>> {
    match node.as_mut() {
        Node::Leaf(leaf) => {
            leaf.keys = merge_sorted_diff(&leaf.keys, batch);
        }
        Node::Inner { children, .. } => {
            let ranges = split_ranges(children, batch);
            children
                .par_iter_mut()
                .zip(ranges)
                .for_each(|(slot, (s, e))| {
                    if e > s {
                        let child = std::mem::replace(&mut slot.node, Node::leaf(Vec::new()));
                        slot.node = apply_in_place(child, &batch[s..e]);
                        slot.refresh();
                    }
                });
        }
    }
    node
}

/// Applies a sorted, duplicate-free `batch` of insertions/deletions to the
/// tree rooted at `*root` (`None` means empty), updating `*size`. This is
/// the `apply_updates` contract of §4.1.
pub(crate) fn apply_updates<K: TreeKey>(
    root: &mut Option<Box<Node<K>>>,
    size: &mut usize,
    batch: &[Operation<K>],
    kind: BatchKind,
    params: &TreeParams,
) {
    if batch.is_empty() {
        return;
    }
    debug_assert!(
        batch.windows(2).all(|w| w[0].payload < w[1].payload
            || (w[0].payload == w[1].payload && w[0].kind != w[1].kind)),
        "batch must be sorted and duplicate-free except for INSERT/DELETE pairs"
    );

    let delta = batch_delta(batch, kind);
    let new_total = *size as i64 + delta;
    debug_assert!(new_total >= 0, "batch deletes more keys than are present");
    let new_total = new_total.max(0) as usize;

    match root.take() {
        None => {
            let keys: Vec<K> = batch
                .iter()
                .filter(|op| op.is_insert())
                .map(|op| op.payload)
                .collect();
            *root = (!keys.is_empty()).then(|| build_balanced(keys, params));
        }
        Some(existing) => {
            if feasible(&existing, new_total, batch, params, true) {
                *root = Some(apply_in_place(existing, batch));
            } else {
                let mut keys = Vec::with_capacity(*size);
                existing.collect_into(&mut keys);
                let merged = merge_sorted_diff(&keys, batch);
                *root = (!merged.is_empty()).then(|| build_balanced(merged, params));
            }
        }
    }
    *size = new_total;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::Label;
    use crate::tree::node::Node;

    fn ops_insert(vals: &[(u32, u32)]) -> Vec<Operation<Label>> {
        let mut v: Vec<_> = vals
            .iter()
            .map(|&(a, b)| Operation::insert(Label::new(a, b)))
            .collect();
        v.sort_by_key(|op| op.payload);
        v
    }

    #[test]
    fn merge_sorted_diff_applies_inserts_and_deletes() {
        let keys = vec![Label::new(1, 1), Label::new(3, 3), Label::new(5, 5)];
        let batch = vec![
            Operation::delete(Label::new(3, 3)),
            Operation::insert(Label::new(4, 4)),
        ];
        let merged = merge_sorted_diff(&keys, &batch);
        assert_eq!(
            merged,
            vec![Label::new(1, 1), Label::new(4, 4), Label::new(5, 5)]
        );
    }

    #[test]
    fn apply_updates_from_empty_builds_tree() {
        let params = TreeParams::DEFAULT;
        let mut root: Option<Box<Node<Label>>> = None;
        let mut size = 0usize;
        let batch = ops_insert(&[(10, 1), (20, 2), (30, 3)]);
        apply_updates(&mut root, &mut size, &batch, BatchKind::InsertsOnly, &params);
        assert_eq!(size, 3);
        let mut collected = Vec::new();
        root.unwrap().collect_into(&mut collected);
        assert_eq!(
            collected,
            vec![Label::new(10, 1), Label::new(20, 2), Label::new(30, 3)]
        );
    }

    #[test]
    fn insert_then_delete_same_batch_empties_tree() {
        let params = TreeParams::DEFAULT;
        let mut root: Option<Box<Node<Label>>> = None;
        let mut size = 0usize;
        let batch = ops_insert(&[(10, 1), (20, 2), (30, 3)]);
        apply_updates(&mut root, &mut size, &batch, BatchKind::InsertsOnly, &params);

        let deletes: Vec<_> = batch
            .iter()
            .map(|op| Operation::delete(op.payload))
            .collect();
        apply_updates(&mut root, &mut size, &deletes, BatchKind::DeletesOnly, &params);
        assert_eq!(size, 0);
        assert!(root.is_none());
    }

    #[test]
    fn large_insert_triggers_rebuild_into_multiple_levels() {
        let params = TreeParams {
            leaf_k: 8,
            branching_b: 4,
            ..TreeParams::DEFAULT
        };
        let mut root: Option<Box<Node<Label>>> = None;
        let mut size = 0usize;
        let batch = ops_insert(&(0..70u32).map(|i| (i, 1000 - i)).collect::<Vec<_>>());
        apply_updates(&mut root, &mut size, &batch, BatchKind::InsertsOnly, &params);
        assert_eq!(size, 70);
        let root = root.unwrap();
        assert!(root.height() >= 1);
        let mut collected = Vec::new();
        root.collect_into(&mut collected);
        assert_eq!(collected.len(), 70);
        assert!(collected.windows(2).all(|w| w[0] < w[1]));
    }
}
