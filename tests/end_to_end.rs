/*
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! End-to-end correctness scenarios (§8): the 5-node diamond, an
//! exponential-blowup chain, random-grid sequential/parallel agreement,
//! and the "source has exactly one label" property.

use pareto_sssp::driver::{LabelSetKind, Solver};
use pareto_sssp::graph::{VecWeightedGraph, WeightedGraph};
use pareto_sssp::label::Label;
use pareto_sssp::tree::TreeParams;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

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
fn five_node_diamond_has_the_exact_expected_frontier() {
    let graph = diamond();
    let mut solver = Solver::new(&graph, TreeParams::DEFAULT, LabelSetKind::Vector);
    solver.run(0);

    let mut frontier = solver.frontier(1);
    frontier.sort();
    assert_eq!(frontier, vec![Label::new(2, 3), Label::new(3, 2)]);
}

/// Builds a chain of `n` milestone nodes `0..=n` where consecutive
/// milestones are joined by two parallel arcs with weights `(2^k, 0)` and
/// `(0, 2^k)`. Because the weights are distinct powers of two, every one
/// of the `2^k` paths from milestone 0 to milestone `k` sums to a
/// distinct `(w1, w2)` pair with `w1 + w2 = 2^k - 1` constant, so all
/// `2^k` of them lie on one anti-diagonal and are pairwise
/// non-dominated: the Pareto frontier at milestone `k` has exactly `2^k`
/// members (§8 "exponential DAG", adapted to this crate's 0-based node
/// numbering rather than the narrative example's `node 2k` numbering).
fn exponential_chain(n: usize) -> VecWeightedGraph {
    let mut g = VecWeightedGraph::empty(n + 1);
    for k in 0..n {
        let w = 1u32 << k;
        g.add_arc(k, k + 1, w, 0);
        g.add_arc(k, k + 1, 0, w);
    }
    g
}

#[test]
fn exponential_chain_doubles_the_frontier_every_layer() {
    let n = 8;
    let graph = exponential_chain(n);
    let mut solver = Solver::new(&graph, TreeParams::DEFAULT, LabelSetKind::Vector);
    solver.run(0);

    for k in 0..=n {
        assert_eq!(
            solver.frontier(k).len(),
            1usize << k,
            "milestone {k} should have exactly 2^{k} non-dominated labels"
        );
    }
}

#[test]
fn source_always_has_exactly_one_label() {
    let mut rng = SmallRng::seed_from_u64(2024);
    let mut g = VecWeightedGraph::empty(10);
    for _ in 0..30 {
        let u = rng.random_range(0..9);
        let v = rng.random_range(u + 1..10);
        g.add_arc(u, v, rng.random_range(1..100), rng.random_range(1..100));
    }
    let mut solver = Solver::new(&g, TreeParams::DEFAULT, LabelSetKind::Vector);
    solver.run(0);
    assert_eq!(solver.frontier(0), vec![Label::new(0, 0)]);
}

/// A 30x40 grid with random edge weights, run once sequentially (thread
/// pool of 1) and once with the default global pool, asserting identical
/// per-vertex frontiers as *sets* (§8 "parallel determinism").
#[test]
fn random_grid_gives_identical_frontiers_regardless_of_thread_count() {
    let rows = 30;
    let cols = 40;
    let mut rng = SmallRng::seed_from_u64(777);
    let mut g = VecWeightedGraph::empty(rows * cols);
    let id = |r: usize, c: usize| r * cols + c;
    for r in 0..rows {
        for c in 0..cols {
            if c + 1 < cols {
                g.add_arc(
                    id(r, c),
                    id(r, c + 1),
                    rng.random_range(0..10_000),
                    rng.random_range(0..10_000),
                );
            }
            if r + 1 < rows {
                g.add_arc(
                    id(r, c),
                    id(r + 1, c),
                    rng.random_range(0..10_000),
                    rng.random_range(0..10_000),
                );
            }
        }
    }

    fn run_once(g: &VecWeightedGraph) -> Vec<Vec<Label>> {
        let mut solver = Solver::new(g, TreeParams::DEFAULT, LabelSetKind::Vector);
        solver.run(0);
        let mut frontiers: Vec<Vec<Label>> = (0..g.num_nodes())
            .map(|n| {
                let mut f = solver.frontier(n);
                f.sort();
                f.dedup();
                f
            })
            .collect();
        frontiers.shrink_to_fit();
        frontiers
    }

    let sequential_pool = rayon::ThreadPoolBuilder::new().num_threads(1).build().unwrap();
    let sequential_result = sequential_pool.install(|| run_once(&g));
    let default_pool_result = run_once(&g);

    assert_eq!(sequential_result, default_pool_result);
}
