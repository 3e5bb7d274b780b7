/*
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

#![doc = include_str!("../README.md")]
#![deny(unstable_features)]
#![deny(trivial_casts)]
#![deny(unconditional_recursion)]
#![deny(clippy::empty_loop)]
#![deny(unreachable_code)]
#![deny(unreachable_patterns)]
#![deny(unused_macro_rules)]
#![deny(unused_doc_comments)]
#![allow(clippy::type_complexity)]

pub mod buffers;
pub mod driver;
pub mod error;
pub mod graph;
pub mod io;
pub mod label;
pub mod label_set;
pub mod op;
pub mod queue;
pub mod sort;
pub mod sorted_vec_set;
pub mod stats;
pub mod tree;

pub mod prelude {
    pub use crate::driver::{LabelSetKind, Solver};
    pub use crate::graph::{VecWeightedGraph, WeightedArc, WeightedGraph};
    pub use crate::label::{Label, NodeLabel};
    pub use crate::label_set::{ParetoLabelSet, TreeLabelSet};
    pub use crate::op::{BatchKind, Operation, OpKind};
    pub use crate::queue::{MinimaBatch, ParetoQueue};
    pub use crate::sorted_vec_set::SortedVecLabelSet;
    pub use crate::stats::{Phase, RunStats};
    pub use crate::tree::{ParetoBTree, QueueKey, TreeKey, TreeParams};
}
