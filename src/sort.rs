/*
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Parallel sort and prefix-scan primitives (§4.6) used between the
//! driver's phases: candidates are radix-sorted by target node, update
//! batches are comparison-sorted by key.
//!
//! `rayon`'s work-stealing parallel sort is already the sorting primitive
//! this codebase standardizes on (it is what the B-tree's own parallel
//! descent and the driver's phase barriers are built against), so
//! [`parallel_sort`] is a thin, named wrapper around it rather than a
//! hand-rolled quicksort: re-deriving pivot selection and partitioning
//! would duplicate what `rayon::slice::ParallelSliceMut` already solves
//! well. [`parallel_radix_sort`] is a genuinely different algorithm (LSD
//! radix keyed on an extracted integer), so it is written out in full: each
//! pass builds a per-chunk histogram in parallel, derives each chunk's
//! exact per-bucket write offset from the two-level (bucket, then chunk)
//! exclusive prefix sum, then scatters every chunk into the shared
//! destination buffer in parallel through [`sync_cell_slice::SyncSlice`],
//! since the offsets are disjoint by construction and need no atomic
//! claiming (§4.6 "grain-sized ranges").

use rayon::prelude::*;
use sync_cell_slice::SyncSlice;

/// Sorts `data` in place using `key`, choosing `rayon`'s parallel merge
/// sort above `min_grain` elements and a sequential sort below it.
pub fn parallel_sort<T, K, F>(data: &mut [T], key: F, min_grain: usize)
where
    T: Send,
    K: Ord,
    F: Fn(&T) -> K + Sync,
{
    if data.len() <= min_grain {
        data.sort_unstable_by_key(&key);
    } else {
        data.par_sort_unstable_by_key(&key);
    }
}

/// 8-bit LSD radix sort of `data` by the `usize` key extracted by
/// `key_extractor`, falling back to a comparison sort below `min_grain`
/// (§4.6). Stable across passes so ties on the extracted key preserve
/// their relative order, matching `(node, w1, w2)` grouping when `node`
/// is the radix key and the input was already `(w1, w2)`-sorted per node.
pub fn parallel_radix_sort<T, F>(data: &mut [T], key_extractor: F, min_grain: usize)
where
    T: Copy + Send,
    F: Fn(&T) -> usize + Sync,
{
    if data.is_empty() {
        return;
    }
    if data.len() <= min_grain {
        data.sort_by_key(|v| key_extractor(v));
        return;
    }

    let max_key = data
        .par_iter()
        .map(|v| key_extractor(v))
        .max()
        .unwrap_or(0);
    let mut passes = 0;
    let mut bound = max_key;
    while bound > 0 {
        bound >>= 8;
        passes += 1;
    }
    let passes = passes.max(1);
    let grain = min_grain.max(1);

    let mut scratch = data.to_vec();
    let mut src = data;
    let mut dst = &mut scratch[..];

    for pass in 0..passes {
        let shift = pass * 8;
        radix_pass(&*src, dst, &key_extractor, shift, grain);
        std::mem::swap(&mut src, &mut dst);
    }

    if passes % 2 == 1 {
        dst.copy_from_slice(src);
    }
}

/// One LSD radix pass: scatters `src` into `dst` by the byte of the
/// extracted key at `shift`. Splits `src` into grain-sized chunks, computes
/// each chunk's per-bucket histogram in parallel, derives each chunk's
/// exact write offset per bucket from a two-level exclusive prefix sum
/// (bucket totals first, then each chunk's position within its bucket),
/// and scatters every chunk concurrently since those offsets never
/// collide.
fn radix_pass<T, F>(src: &[T], dst: &mut [T], key_extractor: &F, shift: u32, grain: usize)
where
    T: Copy + Send,
    F: Fn(&T) -> usize + Sync,
{
    let bucket_of = |v: &T| (key_extractor(v) >> shift) & 0xff;

    let histograms: Vec<[usize; 256]> = src
        .par_chunks(grain)
        .map(|chunk| {
            let mut counts = [0usize; 256];
            for v in chunk {
                counts[bucket_of(v)] += 1;
            }
            counts
        })
        .collect();

    let mut bucket_base = [0usize; 256];
    let mut acc = 0usize;
    for bucket in 0..256 {
        bucket_base[bucket] = acc;
        acc += histograms.iter().map(|h| h[bucket]).sum::<usize>();
    }

    let mut chunk_offsets = vec![bucket_base; histograms.len()];
    for (chunk, hist) in histograms.iter().enumerate() {
        if chunk + 1 < histograms.len() {
            let next = chunk_offsets[chunk];
            chunk_offsets[chunk + 1] = std::array::from_fn(|b| next[b] + hist[b]);
        }
    }

    let sync = dst.as_sync_slice();
    src.par_chunks(grain)
        .zip(chunk_offsets.par_iter())
        .for_each(|(chunk, offsets)| {
            let mut local = *offsets;
            for v in chunk {
                let bucket = bucket_of(v);
                unsafe { sync[local[bucket]].set(*v) };
                local[bucket] += 1;
            }
        });
    drop(sync);
}
