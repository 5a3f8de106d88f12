/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Structured error types for the `dagsched` list scheduler.
//!
//! Two layers, mirroring how admission failures are modeled in a typical
//! scheduler: a top-level [`SchedulerError`] returned from every public
//! entry point, and nested detail enums ([`DescriptorIssue`],
//! [`GraphIssue`]) that carry the exact values involved so a caller can log
//! or report them without re-deriving context.
//!
//! `CapacityExceeded` from the specification is **not** represented here —
//! a peak-liveness count exceeding total tier capacity is a modeling fact,
//! not a failure, and is reported via a `tracing::debug!` event from
//! [`crate::state::ProcessorState`] instead.

use thiserror::Error;

/// Why a processor descriptor failed construction-time validation.
#[derive(Debug, Clone, PartialEq)]
pub enum DescriptorIssue {
    /// An operation was declared with zero admissible ports.
    EmptyPortList,

    /// An operation or memory tier referenced a port index `>= n_ports`.
    UnknownPort { port: usize, n_ports: usize },

    /// An operation's latency was negative or non-finite.
    InvalidLatency { len_t: f64 },

    /// A memory tier's load time was negative or non-finite.
    InvalidLoadTime { load_time: f64 },

    /// A memory tier's capacity was zero.
    ZeroTierCapacity,
}

impl std::fmt::Display for DescriptorIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DescriptorIssue::EmptyPortList => {
                write!(f, "operation declares an empty port list")
            }
            DescriptorIssue::UnknownPort { port, n_ports } => write!(
                f,
                "port {port} is out of range for a processor with {n_ports} port(s)"
            ),
            DescriptorIssue::InvalidLatency { len_t } => {
                write!(f, "operation latency must be non-negative and finite, got {len_t}")
            }
            DescriptorIssue::InvalidLoadTime { load_time } => write!(
                f,
                "memory tier load_time must be non-negative and finite, got {load_time}"
            ),
            DescriptorIssue::ZeroTierCapacity => {
                write!(f, "memory tier capacity must be at least 1")
            }
        }
    }
}

/// Why a DAG (or a node within it) failed validation or traversal.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphIssue {
    /// `edges.len()` did not match the declared node count.
    AdjacencyLengthMismatch { expected: usize, got: usize },

    /// A node's `op_id` referenced an operation outside the catalog.
    UnknownOperation { node: usize, op_id: usize, op_count: usize },

    /// A node's priority window had `start_pos > end_pos`.
    InvalidPriorityWindow { node: usize, start_pos: i64, end_pos: i64 },

    /// An edge referenced a node index outside `0..n`.
    EdgeOutOfRange { from: usize, to: usize, n: usize },

    /// The readiness queue drained before every node was emitted — the
    /// graph contains a cycle.
    Cycle { emitted: usize, total: usize },

    /// No memory tier is configured; the tier list must be total (the last
    /// tier absorbs all overflow).
    NoMemoryTiers,
}

impl std::fmt::Display for GraphIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GraphIssue::AdjacencyLengthMismatch { expected, got } => write!(
                f,
                "adjacency list has {got} entries but {expected} nodes were declared"
            ),
            GraphIssue::UnknownOperation { node, op_id, op_count } => write!(
                f,
                "node {node} references operation {op_id}, but only {op_count} operation(s) are defined"
            ),
            GraphIssue::InvalidPriorityWindow { node, start_pos, end_pos } => write!(
                f,
                "node {node} has start_pos {start_pos} > end_pos {end_pos}"
            ),
            GraphIssue::EdgeOutOfRange { from, to, n } => write!(
                f,
                "edge {from} -> {to} references a node outside 0..{n}"
            ),
            GraphIssue::Cycle { emitted, total } => write!(
                f,
                "graph contains a cycle — only {emitted} of {total} node(s) could be topologically emitted"
            ),
            GraphIssue::NoMemoryTiers => write!(f, "processor has no memory tiers configured"),
        }
    }
}

/// Top-level error type returned by every `dagsched` entry point.
///
/// | Variant | Suggested CLI exit code |
/// |---|---|
/// | `InvalidDescriptor` | 2 |
/// | `InvalidGraph` | 3 |
/// | `InvalidOrderLength` | 4 |
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SchedulerError {
    /// The processor descriptor failed construction-time validation.
    #[error("invalid processor descriptor: {0}")]
    InvalidDescriptor(DescriptorIssue),

    /// The DAG (or a node's fields within it) failed validation or contains
    /// a cycle.
    #[error("invalid graph: {0}")]
    InvalidGraph(GraphIssue),

    /// The caller supplied a priority/position vector whose length does not
    /// match the program's node count.
    #[error("order vector has length {got}, expected {expected}")]
    InvalidOrderLength { expected: usize, got: usize },
}

impl SchedulerError {
    /// Suggested process exit code for the reference CLI driver.
    pub fn exit_code(&self) -> i32 {
        match self {
            SchedulerError::InvalidDescriptor(_) => 2,
            SchedulerError::InvalidGraph(_) => 3,
            SchedulerError::InvalidOrderLength { .. } => 4,
        }
    }
}
