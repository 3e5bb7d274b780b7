/*
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Read-only weighted adjacency view (§3, §6).
//!
//! This is the "external collaborator" the core label-setting engine
//! consumes: a graph of `n` nodes where every arc carries two non-negative
//! 32-bit weights. The trait is the seam the engine depends on; the
//! [`VecWeightedGraph`] implementation is the in-memory convenience
//! container used by tests, generators and the CLI.

/// An arc `(target, w1, w2)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WeightedArc {
    pub target: usize,
    pub w1: u32,
    pub w2: u32,
}

/// A read-only, random-access graph whose arcs carry two non-negative
/// integer weights.
///
/// Implementors only need to expose the node count and, for each node, its
/// outgoing arcs; the label-setting engine never mutates the graph.
pub trait WeightedGraph: Sync {
    /// The number of nodes. Nodes are addressed as `0..num_nodes()`.
    fn num_nodes(&self) -> usize;

    /// The outgoing arcs of `node`, in unspecified order.
    fn successors(&self, node: usize) -> &[WeightedArc];

    /// The number of outgoing arcs of `node`.
    #[inline]
    fn out_degree(&self, node: usize) -> usize {
        self.successors(node).len()
    }

    /// Total number of arcs in the graph.
    fn num_arcs(&self) -> u64 {
        (0..self.num_nodes())
            .map(|n| self.out_degree(n) as u64)
            .sum()
    }
}

/// A mutable weighted graph backed by a vector of adjacency lists.
///
/// Mirrors the `VecGraph`/`LabeledVecGraph` family in spirit: a simple,
/// allocation-friendly container meant for construction (by a parser or a
/// generator) before being handed, read-only, to the engine.
#[derive(Debug, Clone, Default)]
pub struct VecWeightedGraph {
    succ: Vec<Vec<WeightedArc>>,
}

impl VecWeightedGraph {
    /// Creates a new empty graph.
    pub fn new() -> Self {
        Self { succ: Vec::new() }
    }

    /// Creates a new empty graph with `n` nodes and no arcs.
    pub fn empty(n: usize) -> Self {
        Self {
            succ: (0..n).map(|_| Vec::new()).collect(),
        }
    }

    /// Ensures `node` exists, extending the node set if needed.
    pub fn add_node(&mut self, node: usize) {
        if node >= self.succ.len() {
            self.succ.resize_with(node + 1, Vec::new);
        }
    }

    /// Adds a directed arc `u -> v` with weights `(w1, w2)`. Extends the
    /// node set on either endpoint as needed.
    pub fn add_arc(&mut self, u: usize, v: usize, w1: u32, w2: u32) {
        self.add_node(u);
        self.add_node(v);
        self.succ[u].push(WeightedArc { target: v, w1, w2 });
    }

    /// Builds a graph from an iterator of `(u, v, w1, w2)` tuples.
    pub fn from_arcs<I: IntoIterator<Item = (usize, usize, u32, u32)>>(arcs: I) -> Self {
        let mut g = Self::new();
        for (u, v, w1, w2) in arcs {
            g.add_arc(u, v, w1, w2);
        }
        g
    }
}

impl WeightedGraph for VecWeightedGraph {
    #[inline]
    fn num_nodes(&self) -> usize {
        self.succ.len()
    }

    #[inline]
    fn successors(&self, node: usize) -> &[WeightedArc] {
        self.succ.get(node).map(Vec::as_slice).unwrap_or(&[])
    }
}
