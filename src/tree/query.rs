/*
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Pareto-minimum descent (§4.1, §4.3): walk the tree in key order,
//! skipping any subtree whose cached minimum cannot contribute to the
//! frontier.

use rayon::prelude::*;

use super::key::TreeKey;
use super::node::Node;

/// Sequential Pareto-minima scan. Appends to `out` every key whose metric
/// is strictly less than the running minimum seen so far (seeded at
/// `prefix_min`) or exactly equal to `prefix_min`.
fn seq_find<K: TreeKey>(node: &Node<K>, running_min: u32, prefix_min: u32, out: &mut Vec<K>) {
    match node {
        Node::Leaf(leaf) => {
            let mut running = running_min;
            for &key in &leaf.keys {
                let m = key.metric();
                if m < running || m == prefix_min {
                    out.push(key);
                }
                running = running.min(m);
            }
        }
        Node::Inner { children, .. } => {
            let mut running = running_min;
            for slot in children {
                let m = slot.minimum.metric();
                if m < running || m == prefix_min {
                    seq_find(&slot.node, running, prefix_min, out);
                }
                running = running.min(m);
            }
        }
    }
}

/// Parallel Pareto-minima scan: the per-child running minimum is a cheap
/// sequential prefix computed over the (already cached) child minima, and
/// the actual descent into each qualifying child is fanned out with rayon
/// (§5: "a task per non-trivial slot").
fn par_find<K: TreeKey>(node: &Node<K>, running_min: u32, prefix_min: u32) -> Vec<K> {
    match node {
        Node::Leaf(_) => {
            let mut out = Vec::new();
            seq_find(node, running_min, prefix_min, &mut out);
            out
        }
        Node::Inner { children, .. } => {
            let mut prefixes = Vec::with_capacity(children.len());
            let mut running = running_min;
            for slot in children {
                prefixes.push(running);
                running = running.min(slot.minimum.metric());
            }
            children
                .par_iter()
                .zip(prefixes)
                .map(|(slot, pre)| {
                    let m = slot.minimum.metric();
                    if m < pre || m == prefix_min {
                        par_find(&slot.node, pre, prefix_min)
                    } else {
                        Vec::new()
                    }
                })
                .reduce(Vec::new, |mut a, b| {
                    a.extend(b);
                    a
                })
        }
    }
}

/// Runs [`seq_find`] or [`par_find`] depending on `parallel`, appending
/// results to `out`.
pub(crate) fn find_pareto_minima<K: TreeKey>(
    root: &Option<Box<Node<K>>>,
    prefix_min: u32,
    out: &mut Vec<K>,
    parallel: bool,
) {
    let Some(root) = root else { return };
    if parallel {
        out.extend(par_find(root, u32::MAX, prefix_min));
    } else {
        seq_find(root, u32::MAX, prefix_min, out);
    }
}

/// The adaptive sequential/parallel cut-off of §4.3:
/// `max(size/p / (log(size/p)+1), maxweight(1))`.
pub(crate) fn adaptive_cutoff(size: usize, num_threads: usize, max_weight_1: usize) -> usize {
    let per_thread = (size / num_threads.max(1)).max(1);
    let denom = (per_thread as f64).ln() + 1.0;
    let grain = ((per_thread as f64) / denom) as usize;
    grain.max(max_weight_1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::Label;
    use crate::tree::build::build_balanced;
    use crate::tree::params::TreeParams;

    #[test]
    fn finds_exactly_the_pareto_minima() {
        // Strictly decreasing w2 as w1 increases: every key is a minimum.
        let keys: Vec<Label> = (0..20u32).map(|i| Label::new(i, 100 - i)).collect();
        let params = TreeParams {
            leaf_k: 8,
            branching_b: 4,
            ..TreeParams::DEFAULT
        };
        let root = Some(build_balanced(keys.clone(), &params));
        let mut out = Vec::new();
        find_pareto_minima(&root, u32::MAX, &mut out, false);
        assert_eq!(out, keys);

        let mut out_par = Vec::new();
        find_pareto_minima(&root, u32::MAX, &mut out_par, true);
        out_par.sort();
        let mut expected_sorted = keys.clone();
        expected_sorted.sort();
        assert_eq!(out_par, expected_sorted);
    }

    #[test]
    fn ties_at_the_smallest_leaf_all_match_prefix_min() {
        // 70 keys, 14 slots of 5 with identical w2 across the 5 smallest w1.
        let mut keys = Vec::new();
        for i in 0..14u32 {
            for j in 0..5u32 {
                // smallest leaf (i == 0) shares w2 = 1
                let w2 = if i == 0 { 1 } else { 100 + i };
                keys.push(Label::new(i * 5 + j, w2));
            }
        }
        let params = TreeParams {
            leaf_k: 5,
            branching_b: 4,
            ..TreeParams::DEFAULT
        };
        let root = Some(build_balanced(keys, &params));
        let mut out = Vec::new();
        find_pareto_minima(&root, 1, &mut out, false);
        assert_eq!(out.len(), 5);
        assert!(out.iter().all(|l| l.w2 == 1));
    }
}
