/*
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Per-phase timers and counter aggregation (§2 "Supporting memory/timing/
//! stats", §6 "-v print statistics", §7 "optional per-phase timings and
//! counters surfaced to stdout").

use std::time::{Duration, Instant};

use dsi_progress_logger::prelude::*;
use log::info;

/// The six phases of one outer iteration of the label-setting loop (§4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    FindMinima,
    SortCandidates,
    UpdateLabelSets,
    SortUpdates,
    ApplyUpdates,
}

const PHASES: [Phase; 5] = [
    Phase::FindMinima,
    Phase::SortCandidates,
    Phase::UpdateLabelSets,
    Phase::SortUpdates,
    Phase::ApplyUpdates,
];

impl Phase {
    fn label(self) -> &'static str {
        match self {
            Phase::FindMinima => "find_minima",
            Phase::SortCandidates => "sort_candidates",
            Phase::UpdateLabelSets => "update_label_sets",
            Phase::SortUpdates => "sort_updates",
            Phase::ApplyUpdates => "apply_updates",
        }
    }
}

/// Accumulated wall-clock time and item counts per phase, across every
/// outer iteration of one run.
#[derive(Debug, Default)]
pub struct RunStats {
    elapsed: [Duration; 5],
    items: [u64; 5],
    iterations: u64,
    labels_inserted: u64,
    labels_deleted: u64,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn index(phase: Phase) -> usize {
        PHASES.iter().position(|p| *p == phase).unwrap()
    }

    /// Adds `duration` spent in `phase`, processing `items` records, to the
    /// running totals.
    pub fn record(&mut self, phase: Phase, duration: Duration, items: u64) {
        let i = Self::index(phase);
        self.elapsed[i] += duration;
        self.items[i] += items;
    }

    pub fn record_iteration(&mut self, inserted: u64, deleted: u64) {
        self.iterations += 1;
        self.labels_inserted += inserted;
        self.labels_deleted += deleted;
    }

    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    pub fn total_elapsed(&self) -> Duration {
        self.elapsed.iter().sum()
    }

    /// Writes a human-readable summary through the `log` crate at `info`
    /// level (§6 `-v`).
    pub fn log_summary(&self) {
        info!(
            "completed {} iterations in {:.3}s ({} labels inserted, {} deleted)",
            self.iterations,
            self.total_elapsed().as_secs_f64(),
            self.labels_inserted,
            self.labels_deleted
        );
        for (i, phase) in PHASES.iter().enumerate() {
            info!(
                "  {:<18} {:>10.3}s  {:>12} items",
                phase.label(),
                self.elapsed[i].as_secs_f64(),
                self.items[i]
            );
        }
    }
}

/// Times the execution of `f`, recording its duration and `items` against
/// `phase` in `stats`.
pub fn timed<T>(stats: &mut RunStats, phase: Phase, items: u64, f: impl FnOnce() -> T) -> T {
    let start = Instant::now();
    let result = f();
    stats.record(phase, start.elapsed(), items);
    result
}

/// Builds the driver's top-level progress logger, configured to also
/// display process RSS (§2 "RSS probes") the way `dsi-progress-logger`
/// surfaces it.
pub fn progress_logger(item_name: &'static str) -> ProgressLogger {
    let mut pl = ProgressLogger::default();
    pl.display_memory(true).item_name(item_name);
    pl
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_accumulate_across_iterations() {
        let mut stats = RunStats::new();
        stats.record(Phase::FindMinima, Duration::from_millis(5), 10);
        stats.record(Phase::FindMinima, Duration::from_millis(7), 20);
        stats.record_iteration(3, 1);
        stats.record_iteration(2, 0);

        assert_eq!(stats.iterations(), 2);
        assert_eq!(stats.elapsed[RunStats::index(Phase::FindMinima)].as_millis(), 12);
        assert_eq!(stats.items[RunStats::index(Phase::FindMinima)], 30);
    }

    #[test]
    fn timed_records_duration_against_the_given_phase() {
        let mut stats = RunStats::new();
        let value = timed(&mut stats, Phase::ApplyUpdates, 5, || 2 + 2);
        assert_eq!(value, 4);
        assert_eq!(stats.items[RunStats::index(Phase::ApplyUpdates)], 5);
    }
}
