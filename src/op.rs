/*
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Tagged insert/delete operations and sorted batches thereof (§3).

use rayon::prelude::*;

/// The kind of a single operation in a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i8)]
pub enum OpKind {
    Insert = 1,
    Delete = -1,
}

impl OpKind {
    /// The signed weight contribution of this kind, used by the prefix-sum
    /// weight-delta scan (§3, §4.6).
    #[inline(always)]
    pub fn delta(self) -> i64 {
        self as i64
    }
}

/// A tagged update: an [`OpKind`] plus the payload it applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Operation<T> {
    pub kind: OpKind,
    pub payload: T,
}

impl<T> Operation<T> {
    #[inline(always)]
    pub fn insert(payload: T) -> Self {
        Self {
            kind: OpKind::Insert,
            payload,
        }
    }

    #[inline(always)]
    pub fn delete(payload: T) -> Self {
        Self {
            kind: OpKind::Delete,
            payload,
        }
    }

    #[inline(always)]
    pub fn is_insert(&self) -> bool {
        matches!(self.kind, OpKind::Insert)
    }

    #[inline(always)]
    pub fn is_delete(&self) -> bool {
        matches!(self.kind, OpKind::Delete)
    }
}

/// Which shortcut the bulk-update algorithm may take when computing weight
/// deltas for a batch (§4.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BatchKind {
    /// Every operation in the batch is an insertion: the delta of any
    /// prefix is simply its length.
    InsertsOnly,
    /// Every operation in the batch is a deletion: the delta of any prefix
    /// is the negation of its length.
    DeletesOnly,
    /// A mix of insertions and deletions: an exclusive prefix sum over
    /// `kind.delta()` is required (computed once, reused for every
    /// sub-range query during the descent).
    InsertsAndDeletes,
}

impl BatchKind {
    /// Infers the batch kind by scanning `ops`. `O(n)`; callers that already
    /// know the kind (e.g. the driver, which tracks it per phase) should
    /// prefer constructing the variant directly.
    pub fn infer<T>(ops: &[Operation<T>]) -> Self {
        let mut saw_insert = false;
        let mut saw_delete = false;
        for op in ops {
            match op.kind {
                OpKind::Insert => saw_insert = true,
                OpKind::Delete => saw_delete = true,
            }
            if saw_insert && saw_delete {
                return BatchKind::InsertsAndDeletes;
            }
        }
        match (saw_insert, saw_delete) {
            (true, false) | (false, false) => BatchKind::InsertsOnly,
            (false, true) => BatchKind::DeletesOnly,
            (true, true) => unreachable!(),
        }
    }
}

/// Computes the exclusive prefix sum of `op.kind.delta()` over `ops`,
/// appending `ops.len() + 1` entries to `out` (the delta *before* each
/// operation, plus the total delta after the last one). This is the
/// `prefix_scan` primitive of §4.6: once computed, the weight delta of any
/// sub-range `[lo, hi)` is `out[hi] - out[lo]` in O(1).
///
/// A tbb-style two-level scan: `ops` is split into chunks, each chunk's
/// total is reduced in parallel, the (small) per-chunk totals are scanned
/// sequentially into chunk base offsets, and each chunk's own prefix is
/// then written in parallel starting from its base offset. Below
/// `PREFIX_SCAN_GRAIN` elements this degenerates to a single sequential
/// chunk, so the cost of spawning chunks is never paid on small batches.
pub fn prefix_scan<T: Sync>(ops: &[Operation<T>], out: &mut Vec<i64>) {
    out.clear();
    out.resize(ops.len() + 1, 0);
    if ops.is_empty() {
        return;
    }

    const PREFIX_SCAN_GRAIN: usize = 4096;
    let chunk_size = ops.len().min(ops.len().div_ceil(4).max(PREFIX_SCAN_GRAIN));

    let chunk_totals: Vec<i64> = ops
        .par_chunks(chunk_size)
        .map(|chunk| chunk.iter().map(|op| op.kind.delta()).sum())
        .collect();

    let mut chunk_base = vec![0i64; chunk_totals.len()];
    let mut acc = 0i64;
    for (i, &total) in chunk_totals.iter().enumerate() {
        chunk_base[i] = acc;
        acc += total;
    }

    let (head, tail) = out.split_at_mut(1);
    head[0] = 0;
    tail.par_chunks_mut(chunk_size)
        .zip(ops.par_chunks(chunk_size))
        .zip(chunk_base.par_iter())
        .for_each(|((out_chunk, ops_chunk), &base)| {
            let mut running = base;
            for (o, op) in out_chunk.iter_mut().zip(ops_chunk.iter()) {
                running += op.kind.delta();
                *o = running;
            }
        });
}
