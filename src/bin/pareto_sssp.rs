/*
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Illustrative CLI driver for the parallel Pareto label-setting engine
//! (§6): reads a `DIR/NAME.gr` graph and a `DIR/NAME.p2p` problem-pairs
//! file, runs one solve per source, and reports the resulting frontier
//! sizes.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;

use pareto_sssp::driver::{LabelSetKind, Solver};
use pareto_sssp::io::{read_graph, read_problem_pairs};
use pareto_sssp::tree::TreeParams;

/// Parallel bi-objective (Pareto) shortest-path engine.
#[derive(Debug, Parser)]
#[command(name = "pareto-sssp", version, about)]
struct Cli {
    /// Input directory containing `NAME.gr` and `NAME.p2p`.
    #[arg(short = 'd', long = "dir")]
    dir: PathBuf,

    /// Instance name (file stem shared by the graph and problem files).
    #[arg(short = 'g', long = "name")]
    name: String,

    /// Number of repetitions to average timings over.
    #[arg(short = 'c', long = "count", default_value_t = 1)]
    count: u32,

    /// Thread count; `0` falls back to sequential execution.
    #[arg(short = 'p', long = "threads", default_value_t = 0)]
    threads: usize,

    /// Print per-phase statistics after each run.
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,

    /// Use the tree-backed label set variant instead of the vector one.
    #[arg(long = "tree-label-sets")]
    tree_label_sets: bool,
}

fn main() -> Result<()> {
    init_env_logger()?;
    let cli = Cli::parse();

    rayon::ThreadPoolBuilder::new()
        .num_threads(cli.threads.max(1))
        .build_global()
        .context("failed to configure the global thread pool")?;

    let graph_path = cli.dir.join(format!("{}.gr", cli.name));
    let problems_path = cli.dir.join(format!("{}.p2p", cli.name));

    let graph = read_graph(BufReader::new(
        File::open(&graph_path).with_context(|| format!("opening {}", graph_path.display()))?,
    ))?;
    let problems = read_problem_pairs(BufReader::new(
        File::open(&problems_path)
            .with_context(|| format!("opening {}", problems_path.display()))?,
    ))?;

    let kind = if cli.tree_label_sets {
        LabelSetKind::Tree
    } else {
        LabelSetKind::Vector
    };

    for rep in 0..cli.count {
        let start = Instant::now();
        for &(source, target) in &problems {
            let mut solver = Solver::new(&graph, TreeParams::DEFAULT, kind);
            solver.run(source);
            println!(
                "source={source} target={target} frontier_size={}",
                solver.frontier(target).len()
            );
            if cli.verbose {
                solver.stats().log_summary();
            }
        }
        log::info!("repetition {}/{} took {:?}", rep + 1, cli.count, start.elapsed());
    }

    Ok(())
}

/// Initializes `env_logger` with auto-color output, `RUST_LOG`-controlled
/// verbosity.
fn init_env_logger() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init()
        .context("failed to initialize the logger")
}
