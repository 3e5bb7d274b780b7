/*
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Cross-checks between the vector-backed and tree-backed per-vertex
//! Pareto label sets (§4.2, §9) under randomized batches, beyond the
//! small fixed scenarios already covered by `label_set.rs`'s own unit
//! tests.

use pareto_sssp::prelude::{Label, ParetoLabelSet, SortedVecLabelSet, TreeLabelSet};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

fn random_batch(rng: &mut SmallRng, n: usize) -> Vec<Label> {
    let mut v: Vec<Label> = (0..n)
        .map(|_| Label::new(rng.random_range(0..200), rng.random_range(0..200)))
        .collect();
    v.sort();
    v.dedup();
    v
}

#[test]
fn vector_and_tree_sets_agree_across_many_random_batches() {
    let mut rng = SmallRng::seed_from_u64(1234);
    let mut vec_set = SortedVecLabelSet::new();
    let mut tree_set = TreeLabelSet::default();

    for _ in 0..25 {
        let batch = random_batch(&mut rng, 30);
        let a = ParetoLabelSet::update(&mut vec_set, 3, &batch);
        let b = ParetoLabelSet::update(&mut tree_set, 3, &batch);
        assert_eq!(a.len(), b.len());

        let mut va = vec_set.labels();
        let mut vb = tree_set.labels();
        va.sort();
        vb.sort();
        assert_eq!(va, vb);

        for i in 0..va.len() {
            for j in 0..va.len() {
                if i != j {
                    assert!(!va[i].dominates(&va[j]));
                }
            }
        }
    }
}
