/*
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Bottom-up construction of a fresh, balanced subtree from a flat sorted
//! key sequence (the "rewrite mode" target of §4.1).

use super::key::TreeKey;
use super::node::{Node, Slot};
use super::params::TreeParams;
use rayon::prelude::*;

/// Splits `keys` into chunks of (close to) the designated leaf size and
/// turns each chunk into a fresh leaf, in parallel.
fn build_leaves<K: TreeKey>(keys: Vec<K>, params: &TreeParams) -> Vec<Box<Node<K>>> {
    if keys.is_empty() {
        return vec![Node::leaf(Vec::new())];
    }
    let designated = params.designated_leaf_size().max(1);
    let num_leaves = keys.len().div_ceil(designated).max(1);
    let base = keys.len() / num_leaves;
    let extra = keys.len() % num_leaves;

    let mut bounds = Vec::with_capacity(num_leaves + 1);
    let mut pos = 0;
    bounds.push(0);
    for i in 0..num_leaves {
        pos += base + if i < extra { 1 } else { 0 };
        bounds.push(pos);
    }
    debug_assert_eq!(*bounds.last().unwrap(), keys.len());

    (0..num_leaves)
        .into_par_iter()
        .map(|i| Node::leaf(keys[bounds[i]..bounds[i + 1]].to_vec()))
        .collect()
}

/// Groups a level of nodes into parent slots of at most `branching_b`
/// children each, recursing upward until a single root remains.
fn build_levels<K: TreeKey>(
    mut level_nodes: Vec<Box<Node<K>>>,
    params: &TreeParams,
    mut level: usize,
) -> Box<Node<K>> {
    while level_nodes.len() > 1 {
        let b = params.branching_b;
        let num_parents = level_nodes.len().div_ceil(b);
        let mut parents = Vec::with_capacity(num_parents);
        let mut iter = level_nodes.into_iter();
        for _ in 0..num_parents {
            let children: Vec<Slot<K>> = (&mut iter).by_ref().take(b).map(Slot::new).collect();
            parents.push(Node::inner(level + 1, children));
        }
        level_nodes = parents;
        level += 1;
    }
    level_nodes.into_iter().next().unwrap()
}

/// Builds a fresh, balanced subtree over `keys` (sorted ascending, no
/// duplicates), honoring `params`'s leaf and branching sizes.
pub(crate) fn build_balanced<K: TreeKey>(keys: Vec<K>, params: &TreeParams) -> Box<Node<K>> {
    let leaves = build_leaves(keys, params);
    build_levels(leaves, params, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::Label;

    #[test]
    fn build_balanced_respects_leaf_bounds() {
        let params = TreeParams {
            leaf_k: 8,
            branching_b: 4,
            ..TreeParams::DEFAULT
        };
        let keys: Vec<Label> = (0..70u32).map(|i| Label::new(i, 1000 - i)).collect();
        let root = build_balanced(keys.clone(), &params);
        let mut collected = Vec::new();
        root.collect_into(&mut collected);
        assert_eq!(collected, keys);
        assert_eq!(root.weight(), keys.len());
    }

    #[test]
    fn build_balanced_handles_empty_input() {
        let params = TreeParams::DEFAULT;
        let root = build_balanced::<Label>(Vec::new(), &params);
        assert_eq!(root.weight(), 0);
        assert_eq!(root.height(), 0);
    }
}
