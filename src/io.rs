/*
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! The external `p sp N M` / `a u v w1 w2` text graph format (§6), and the
//! companion problem-pairs format used to pick sources.
//!
//! Node ids are 1-based on the wire and 0-based once loaded into a
//! [`VecWeightedGraph`].

use std::io::BufRead;

use log::debug;

use crate::error::GraphIoError;
use crate::graph::VecWeightedGraph;

/// Parses the `p sp N M` / `a u v w1 w2` edge-list format from `reader`.
/// Lines starting with `c` are comments and ignored; blank lines are
/// ignored.
pub fn read_graph<R: BufRead>(reader: R) -> Result<VecWeightedGraph, GraphIoError> {
    let mut graph: Option<VecWeightedGraph> = None;
    let mut num_nodes = 0usize;
    let mut num_arcs_declared = 0usize;
    let mut num_arcs_read = 0usize;

    for (lineno, line) in reader.lines().enumerate() {
        let lineno = lineno + 1;
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('c') {
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        match fields.first().copied() {
            Some("p") => {
                if graph.is_some() {
                    return Err(GraphIoError::DuplicateHeader { line: lineno });
                }
                if fields.len() != 4 || fields[1] != "sp" {
                    return Err(GraphIoError::MalformedRecord {
                        line: lineno,
                        expected: 4,
                        found: fields.len(),
                        text: line.to_string(),
                    });
                }
                num_nodes = parse_usize(fields[2], lineno)?;
                num_arcs_declared = parse_usize(fields[3], lineno)?;
                graph = Some(VecWeightedGraph::empty(num_nodes));
            }
            Some("a") => {
                let Some(g) = graph.as_mut() else {
                    return Err(GraphIoError::MissingHeader { line: lineno });
                };
                if fields.len() != 5 {
                    return Err(GraphIoError::MalformedRecord {
                        line: lineno,
                        expected: 5,
                        found: fields.len(),
                        text: line.to_string(),
                    });
                }
                let u = parse_node(fields[1], lineno, num_nodes)?;
                let v = parse_node(fields[2], lineno, num_nodes)?;
                let w1 = parse_u32(fields[3], lineno)?;
                let w2 = parse_u32(fields[4], lineno)?;
                g.add_arc(u, v, w1, w2);
                num_arcs_read += 1;
            }
            _ => {
                return Err(GraphIoError::MalformedRecord {
                    line: lineno,
                    expected: 1,
                    found: fields.len(),
                    text: line.to_string(),
                });
            }
        }
    }

    let graph = graph.unwrap_or_default();
    if num_arcs_read != num_arcs_declared {
        debug!(
            "declared M={num_arcs_declared} edges but read {num_arcs_read}; proceeding with what was read"
        );
    }
    Ok(graph)
}

/// Parses the blank-line-separated list of `(source, target)` pairs used to
/// pick sources (§6 "Problem specification"). Only the source column is
/// consumed by the core; targets are retained for CLI reporting.
pub fn read_problem_pairs<R: BufRead>(
    reader: R,
) -> Result<Vec<(usize, usize)>, GraphIoError> {
    let mut pairs = Vec::new();
    for (lineno, line) in reader.lines().enumerate() {
        let lineno = lineno + 1;
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 2 {
            return Err(GraphIoError::MalformedRecord {
                line: lineno,
                expected: 2,
                found: fields.len(),
                text: line.to_string(),
            });
        }
        let source = parse_usize(fields[0], lineno)?;
        let target = parse_usize(fields[1], lineno)?;
        pairs.push((source.saturating_sub(1), target.saturating_sub(1)));
    }
    Ok(pairs)
}

fn parse_usize(text: &str, line: usize) -> Result<usize, GraphIoError> {
    text.parse().map_err(|_| GraphIoError::InvalidInteger {
        line,
        text: text.to_string(),
    })
}

fn parse_u32(text: &str, line: usize) -> Result<u32, GraphIoError> {
    text.parse().map_err(|_| GraphIoError::InvalidInteger {
        line,
        text: text.to_string(),
    })
}

/// Parses a 1-based node id and converts it to the 0-based id used
/// internally, checking it against the declared node count.
fn parse_node(text: &str, line: usize, num_nodes: usize) -> Result<usize, GraphIoError> {
    let id = parse_usize(text, line)?;
    if id == 0 || id > num_nodes {
        return Err(GraphIoError::NodeOutOfRange {
            line,
            id,
            num_nodes,
        });
    }
    Ok(id - 1)
}
