/*
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Errors surfaced at the I/O boundary (§7): the text graph parser is the
//! only part of this crate that can fail on malformed external input; the
//! core label-setting engine has no user-facing error path.

use thiserror::Error;

/// Errors produced while parsing the `p sp` / `a` edge-list text format
/// (§6).
#[derive(Error, Debug)]
pub enum GraphIoError {
    /// The input stream could not be read.
    #[error("I/O error reading graph input: {0}")]
    Io(#[from] std::io::Error),

    /// A record did not have the expected number of whitespace-separated
    /// fields.
    #[error("line {line}: expected {expected} fields, found {found}: {text:?}")]
    MalformedRecord {
        line: usize,
        expected: usize,
        found: usize,
        text: String,
    },

    /// A numeric field could not be parsed.
    #[error("line {line}: invalid integer {text:?}")]
    InvalidInteger { line: usize, text: String },

    /// An edge referenced a node id outside the declared `1..=N` range.
    #[error("line {line}: node id {id} out of declared range 1..={num_nodes}")]
    NodeOutOfRange {
        line: usize,
        id: usize,
        num_nodes: usize,
    },

    /// An `a` record appeared before the mandatory `p sp N M` header.
    #[error("line {line}: edge record before 'p sp N M' header")]
    MissingHeader { line: usize },

    /// The header line appeared more than once.
    #[error("line {line}: duplicate 'p sp N M' header")]
    DuplicateHeader { line: usize },
}
