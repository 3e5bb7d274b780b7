/*
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Thread-local write buffers (§4.4): block-allocated scratch in a shared
//! arena, filled by many threads without contention and flushed in bulk by
//! a single downstream sort.
//!
//! Usage: the driver owns the backing `Vec<T>` for a phase, obtains one
//! [`SyncSlice`] from it, and hands out `(&SlotCounter, &SyncSlice)` pairs
//! to each worker's [`WriteBuffer`]. Once the parallel phase's join
//! barrier passes and the `SyncSlice` borrow ends, the driver reads
//! `counter.claimed_len()` slots back out of the plain `Vec<T>`.

use std::ops::Range;
use std::sync::atomic::{AtomicUsize, Ordering};

use sync_cell_slice::SyncSlice;

/// The atomic "next free slot" counter shared by every [`WriteBuffer`]
/// writing into one phase array (§4.4).
pub struct SlotCounter {
    next: AtomicUsize,
    capacity: usize,
}

impl SlotCounter {
    pub fn new(capacity: usize) -> Self {
        Self {
            next: AtomicUsize::new(0),
            capacity,
        }
    }

    /// Resets the counter to zero for a fresh phase.
    pub fn reset(&mut self) {
        *self.next.get_mut() = 0;
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The logical length claimed so far, clamped to capacity (slots past
    /// this were never touched by any writer this phase).
    pub fn claimed_len(&self) -> usize {
        self.next.load(Ordering::Relaxed).min(self.capacity)
    }

    /// Atomically claims a contiguous block of `block_size` slots,
    /// returning their index range (possibly past `capacity`, which the
    /// caller must check before writing).
    fn claim_block(&self, block_size: usize) -> Range<usize> {
        let start = self.next.fetch_add(block_size, Ordering::Relaxed);
        start..start + block_size
    }
}

/// A per-thread writer into a shared phase array: claims blocks from the
/// shared counter on demand and writes locally without contending with
/// other threads (§4.4 `emplace`).
pub struct WriteBuffer<'a, T: Copy> {
    counter: &'a SlotCounter,
    sync: &'a SyncSlice<'a, T>,
    sentinel: T,
    block_size: usize,
    cursor: usize,
    block_end: usize,
}

impl<'a, T: Copy> WriteBuffer<'a, T> {
    pub fn new(
        counter: &'a SlotCounter,
        sync: &'a SyncSlice<'a, T>,
        block_size: usize,
        sentinel: T,
    ) -> Self {
        Self {
            counter,
            sync,
            sentinel,
            block_size,
            cursor: 0,
            block_end: 0,
        }
    }

    /// Appends `value` at the next local slot, claiming a fresh block from
    /// the shared counter when the current one is exhausted.
    pub fn emplace(&mut self, value: T) {
        if self.cursor == self.block_end {
            let range = self.counter.claim_block(self.block_size);
            self.cursor = range.start;
            self.block_end = range.end;
        }
        if self.cursor < self.counter.capacity() {
            unsafe { self.sync[self.cursor].set(value) };
        }
        self.cursor += 1;
    }

    /// Fills any claimed-but-unwritten slots in the thread's last block
    /// with the sentinel, returning how many were left unused so the
    /// driver can shrink the logical array size after merging (§4.4
    /// `reset`).
    pub fn finish(mut self) -> usize {
        let mut unused = 0;
        while self.cursor < self.block_end {
            if self.cursor < self.counter.capacity() {
                unsafe { self.sync[self.cursor].set(self.sentinel) };
            }
            self.cursor += 1;
            unused += 1;
        }
        unused
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rayon::prelude::*;

    #[test]
    fn concurrent_writers_fill_disjoint_blocks_without_loss() {
        let sentinel = -1i64;
        let mut data = vec![sentinel; 64];
        let counter = SlotCounter::new(data.len());
        let sync = data.as_sync_slice();

        (0..8usize).into_par_iter().for_each(|t| {
            let mut buf = WriteBuffer::new(&counter, &sync, 4, sentinel);
            for i in 0..4 {
                buf.emplace((t * 4 + i) as i64);
            }
            buf.finish();
        });
        drop(sync);

        let mut values: Vec<i64> = data[..counter.claimed_len()].to_vec();
        values.sort_unstable();
        assert_eq!(values, (0..32).collect::<Vec<_>>());
    }

    #[test]
    fn finish_pads_a_partially_filled_block_with_sentinels() {
        let sentinel = u32::MAX;
        let mut data = vec![sentinel; 8];
        let counter = SlotCounter::new(data.len());
        let sync = data.as_sync_slice();
        let mut buf = WriteBuffer::new(&counter, &sync, 4, sentinel);
        buf.emplace(10);
        let unused = buf.finish();
        drop(sync);

        assert_eq!(unused, 3);
        assert_eq!(data[0], 10);
        assert_eq!(data[1], sentinel);
    }
}
