/*
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! The key contract the bulk-update B-tree is generic over: a total order
//! (the tree's key order) plus a `u32` metric used to maintain the cached
//! subtree minimum for Pareto descent (§3: inner slots carry "the key with
//! smallest `w2` in that subtree").

use std::fmt::Debug;

use crate::label::{Label, NodeLabel};

/// A key usable in a [`crate::tree::ParetoBTree`].
pub trait TreeKey: Copy + Ord + Send + Sync + Debug + 'static {
    /// The component minimized by the cached subtree minimum (`w2`).
    fn metric(&self) -> u32;

    /// The sentinel representing "no key can be smaller", used to seed a
    /// fresh minimum aggregation.
    const METRIC_SENTINEL: Self;
}

impl TreeKey for Label {
    #[inline(always)]
    fn metric(&self) -> u32 {
        self.w2
    }

    const METRIC_SENTINEL: Self = Label::MAX;
}

/// The priority queue's key: `(w1, w2, node)`, ordered exactly that way
/// (§3, §4.3), with the same `w2` metric as a plain [`Label`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QueueKey(pub NodeLabel);

impl PartialOrd for QueueKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.cmp_by_weight(&other.0)
    }
}

impl TreeKey for QueueKey {
    #[inline(always)]
    fn metric(&self) -> u32 {
        self.0.w2()
    }

    const METRIC_SENTINEL: Self = QueueKey(NodeLabel::MAX);
}
