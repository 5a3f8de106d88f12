/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Problem-file loading.
//!
//! A problem file is a single JSON document describing a processor (ports,
//! operation catalog, memory tiers) and a program (per-node operation
//! references, priority windows, and predecessor adjacency). This mirrors
//! how a node-config file is loaded elsewhere in this codebase — parse into
//! a private deserialization shape, validate while building the public
//! types, and attach file-path context to every error.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, info};

use crate::processor::ProcessorDescriptor;
use crate::program::{NodeSpec, Program};

// ── Private JSON deserialization shapes ─────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ProblemFile {
    n_ports: usize,
    mem_tiers: Vec<TierSpec>,
    ops: Vec<OpSpec>,
    nodes: Vec<NodeFileSpec>,
    edges: Vec<Vec<usize>>,
}

#[derive(Debug, Deserialize)]
struct TierSpec {
    size: usize,
    port_n: usize,
    load_time: f64,
}

#[derive(Debug, Deserialize)]
struct OpSpec {
    len_t: f64,
    ports: Vec<usize>,
}

#[derive(Debug, Deserialize)]
struct NodeFileSpec {
    op: usize,
    #[serde(default)]
    start_pos: i64,
    #[serde(default = "default_end_pos")]
    end_pos: i64,
    #[serde(default)]
    exp_use: f64,
    /// Initial priority for this node. Defaults to `-(index as i64)` when
    /// absent, matching the descending seed priority the original search
    /// driver assigns before its first sweep.
    priority: Option<i64>,
}

fn default_end_pos() -> i64 {
    i64::MAX
}

/// A loaded problem: a ready-to-schedule [`Program`] plus the priority
/// vector declared (or defaulted) in the file.
pub struct LoadedProblem {
    pub program: Program,
    pub initial_order: Vec<i64>,
}

/// Parse and validate a problem file at `path`, building a [`Program`] and
/// its initial priority vector.
///
/// # Errors
/// Returns an error if the file cannot be read, if its JSON is malformed, or
/// if the processor/program fails construction-time validation (wrapped
/// with file-path context so the caller doesn't need to re-derive it).
pub fn load_problem(path: &Path) -> Result<LoadedProblem> {
    info!(path = %path.display(), "loading problem file");

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot open problem file: {}", path.display()))?;

    let file: ProblemFile = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse problem file: {}", path.display()))?;

    let mut proc = ProcessorDescriptor::new(file.n_ports);
    for tier in &file.mem_tiers {
        proc.new_mem_level(tier.size, tier.port_n, tier.load_time)
            .with_context(|| format!("invalid memory tier in {}", path.display()))?;
    }
    for op in &file.ops {
        proc.new_op(op.len_t, op.ports.clone())
            .with_context(|| format!("invalid operation in {}", path.display()))?;
    }
    debug!(
        n_ports = file.n_ports,
        mem_tiers = proc.mem_tiers().len(),
        ops = proc.op_count(),
        "processor descriptor built"
    );

    let mut initial_order = Vec::with_capacity(file.nodes.len());
    let nodes = file
        .nodes
        .iter()
        .enumerate()
        .map(|(i, n)| {
            initial_order.push(n.priority.unwrap_or(-(i as i64)));
            NodeSpec {
                op_id: n.op,
                start_pos: n.start_pos,
                end_pos: n.end_pos,
                exp_use: n.exp_use,
            }
        })
        .collect();

    let program = Program::new(Arc::new(proc), nodes, file.edges)
        .with_context(|| format!("invalid program graph in {}", path.display()))?;

    info!(nodes = program.size(), "problem file loaded");
    Ok(LoadedProblem {
        program,
        initial_order,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn json_tempfile(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    #[test]
    fn loads_a_minimal_chain_problem() {
        let json = r#"
        {
            "n_ports": 1,
            "mem_tiers": [{"size": 4, "port_n": 0, "load_time": 0.0}],
            "ops": [{"len_t": 2.0, "ports": [0]}],
            "nodes": [
                {"op": 0, "start_pos": 0, "end_pos": 2, "exp_use": 0.0},
                {"op": 0, "start_pos": 0, "end_pos": 2, "exp_use": 0.0},
                {"op": 0, "start_pos": 0, "end_pos": 2, "exp_use": 0.0}
            ],
            "edges": [[], [0], [1]]
        }
        "#;
        let f = json_tempfile(json);
        let problem = load_problem(f.path()).unwrap();
        assert_eq!(problem.program.size(), 3);
        assert_eq!(problem.initial_order, vec![0, -1, -2]);
    }

    #[test]
    fn explicit_priority_overrides_default() {
        let json = r#"
        {
            "n_ports": 1,
            "mem_tiers": [{"size": 4, "port_n": 0, "load_time": 0.0}],
            "ops": [{"len_t": 1.0, "ports": [0]}],
            "nodes": [
                {"op": 0, "start_pos": 0, "end_pos": 1, "priority": 7},
                {"op": 0, "start_pos": 0, "end_pos": 1}
            ],
            "edges": [[], []]
        }
        "#;
        let f = json_tempfile(json);
        let problem = load_problem(f.path()).unwrap();
        assert_eq!(problem.initial_order, vec![7, -1]);
    }

    #[test]
    fn missing_file_returns_error() {
        let result = load_problem(Path::new("/nonexistent/problem.json"));
        assert!(result.is_err());
    }

    #[test]
    fn malformed_json_returns_error() {
        let f = json_tempfile("{ not valid json");
        let result = load_problem(f.path());
        assert!(result.is_err());
    }

    #[test]
    fn invalid_graph_surfaces_as_error_with_path_context() {
        let json = r#"
        {
            "n_ports": 1,
            "mem_tiers": [{"size": 4, "port_n": 0, "load_time": 0.0}],
            "ops": [{"len_t": 1.0, "ports": [0]}],
            "nodes": [{"op": 5, "start_pos": 0, "end_pos": 0}],
            "edges": [[]]
        }
        "#;
        let f = json_tempfile(json);
        let err = load_problem(f.path()).unwrap_err();
        assert!(format!("{err:#}").contains("invalid program graph"));
    }

    #[test]
    fn default_end_pos_is_unbounded() {
        let json = r#"
        {
            "n_ports": 1,
            "mem_tiers": [{"size": 4, "port_n": 0, "load_time": 0.0}],
            "ops": [{"len_t": 1.0, "ports": [0]}],
            "nodes": [{"op": 0}],
            "edges": [[]]
        }
        "#;
        let f = json_tempfile(json);
        let problem = load_problem(f.path()).unwrap();
        assert_eq!(problem.initial_order, vec![0]);
    }
}
