/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Mutable per-attempt processor simulator.
//!
//! [`ProcessorState`] is constructed once per node count and reused across
//! every attempt the search driver makes — [`ProcessorState::clear`]
//! rewinds it to a pristine state without reallocating, which matters on
//! the search driver's hot path (one `clear()` + one traversal per
//! candidate priority vector).

use std::collections::BTreeMap;

use crate::error::{GraphIssue, SchedulerError};
use crate::processor::{MemoryTier, OperationDescriptor, ProcessorDescriptor};
use crate::range_tree::RangeTree;

/// Mutable simulation state for one scheduling attempt.
pub struct ProcessorState {
    mt: RangeTree,
    ports_free_time: Vec<f64>,
    end_t: Vec<Option<f64>>,
    last_usage: Vec<Option<usize>>,
    m_port_map: BTreeMap<usize, f64>,
    op_start_t: f64,
}

impl ProcessorState {
    /// Allocate state for a processor with `n_ports` ports and a program
    /// with `n_ops` nodes. The range tree is sized `n_ops + 1` leaves per
    /// the specification.
    pub fn new(n_ports: usize, n_ops: usize) -> Self {
        Self {
            mt: RangeTree::new(n_ops + 1),
            ports_free_time: vec![0.0; n_ports],
            end_t: vec![None; n_ops],
            last_usage: vec![None; n_ops],
            m_port_map: BTreeMap::new(),
            op_start_t: 0.0,
        }
    }

    /// Rewind to a pristine state, reusing all existing allocations.
    pub fn clear(&mut self) {
        self.op_start_t = 0.0;
        self.mt.clear();
        self.ports_free_time.iter_mut().for_each(|t| *t = 0.0);
        self.end_t.iter_mut().for_each(|t| *t = None);
        self.last_usage.iter_mut().for_each(|t| *t = None);
        self.m_port_map.clear();
    }

    /// Select the memory tier holding a value with peak concurrent
    /// liveness `q`.
    ///
    /// Walks tiers in order; the first whose cumulative capacity is `>= q`
    /// is selected. If `q` exceeds total capacity, the last tier absorbs
    /// the overflow — logged, not an error (`CapacityExceeded` is a
    /// modeling fact per the specification, not a failure).
    fn mem_level_select<'a>(
        mem_tiers: &'a [MemoryTier],
        q: i64,
    ) -> Result<&'a MemoryTier, SchedulerError> {
        let mut remaining = q;
        for tier in mem_tiers {
            if remaining <= tier.size as i64 {
                return Ok(tier);
            }
            remaining -= tier.size as i64;
        }
        match mem_tiers.last() {
            Some(last) => {
                tracing::debug!(
                    peak_liveness = q,
                    total_capacity = q - remaining,
                    "peak liveness exceeds total tier capacity — degrading to slowest tier"
                );
                Ok(last)
            }
            None => Err(SchedulerError::InvalidGraph(GraphIssue::NoMemoryTiers)),
        }
    }

    /// Record the consumption of predecessor `u`'s value at `step_num`.
    ///
    /// Updates the transient per-port traffic map, advances `op_start_t` to
    /// respect the data dependency on `u`, and marks `u` as last-used at
    /// this step.
    fn use_mem(
        &mut self,
        proc: &ProcessorDescriptor,
        u: usize,
        step_num: usize,
    ) -> Result<(), SchedulerError> {
        let src_step = self.last_usage[u].expect("predecessor must be emitted before use");
        let q = self.mt.inc(src_step, step_num);
        let tier = Self::mem_level_select(proc.mem_tiers(), q)?;

        *self.m_port_map.entry(tier.port_n).or_insert(0.0) += tier.load_time;
        if let Some(end) = self.end_t[u] {
            self.op_start_t = self.op_start_t.max(end);
        }
        self.last_usage[u] = Some(step_num);
        Ok(())
    }

    /// Commit the operation for node `v`: charge traffic for every
    /// predecessor, then serialize that traffic onto the affected ports and
    /// pick an execution port for `op`.
    ///
    /// This is the full "operation commit protocol" from the
    /// specification, steps 1-3, folded into one call since no caller needs
    /// to interleave other work between them.
    pub fn commit_node(
        &mut self,
        proc: &ProcessorDescriptor,
        v: usize,
        op: &OperationDescriptor,
        step_num: usize,
        predecessors: &[usize],
    ) -> Result<(), SchedulerError> {
        self.m_port_map.clear();
        for &u in predecessors {
            self.use_mem(proc, u, step_num)?;
        }
        self.perform(v, op, step_num);
        Ok(())
    }

    /// Serialize accumulated memory traffic onto its ports, then choose an
    /// execution port for `op` and advance that port's free time.
    fn perform(&mut self, v: usize, op: &OperationDescriptor, step_num: usize) {
        for (&port_n, &use_t) in &self.m_port_map {
            let next = (self.ports_free_time[port_n] + use_t).max(self.op_start_t);
            self.ports_free_time[port_n] = next;
            self.op_start_t = next;
        }

        let mut chosen = op.ports[0];
        let mut ot = self.ports_free_time[chosen];
        for &p in &op.ports[1..] {
            if self.ports_free_time[p] < ot {
                ot = self.ports_free_time[p];
                chosen = p;
            }
        }

        let start = self.op_start_t.max(ot);
        let end = start + op.len_t;
        self.ports_free_time[chosen] = end;
        self.end_t[v] = Some(end);
        self.last_usage[v] = Some(step_num);
        self.op_start_t = start;
    }

    /// Completion time of `v`, once it has been emitted.
    pub fn end_time(&self, v: usize) -> Option<f64> {
        self.end_t[v]
    }

    /// Overall makespan for this attempt: the latest port free-time.
    pub fn finish_time(&self) -> f64 {
        self.ports_free_time.iter().cloned().fold(0.0, f64::max)
    }
}
