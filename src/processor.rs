/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! The abstract processor model: ports, the operation catalog, and the
//! memory-tier hierarchy.
//!
//! [`ProcessorDescriptor`] is purely a builder + read-only accessor, as
//! specified — no mutation is possible once a field has been pushed, and
//! nothing here simulates time. [`crate::state::ProcessorState`] is the
//! mutable counterpart that drives one scheduling attempt against a shared,
//! immutable `ProcessorDescriptor`.

use crate::error::{DescriptorIssue, SchedulerError};

/// An abstract machine instruction: a fixed latency and the ports it may
/// execute on.
#[derive(Debug, Clone)]
pub struct OperationDescriptor {
    /// Latency of this operation, in the same time unit as port free-times.
    pub len_t: f64,
    /// Non-empty, ordered list of ports this operation may execute on.
    pub ports: Vec<usize>,
}

/// A capacity-bounded, port-bound storage level.
///
/// Tiers are ordered fastest/smallest to slowest/largest; the last tier in
/// [`ProcessorDescriptor::mem_tiers`] absorbs all overflow regardless of
/// its own declared size.
#[derive(Debug, Clone)]
pub struct MemoryTier {
    /// Capacity of this tier, in "live values".
    pub size: usize,
    /// The port through which loads from this tier are charged.
    pub port_n: usize,
    /// Per-value load cost.
    pub load_time: f64,
}

/// Immutable description of the target processor: its ports, operation
/// catalog, and memory-tier hierarchy.
///
/// Built incrementally via [`new_mem_level`](Self::new_mem_level) and
/// [`new_op`](Self::new_op); every push is validated immediately so
/// construction fails fast rather than surfacing a confusing error deep
/// inside a scheduling attempt.
#[derive(Debug, Clone)]
pub struct ProcessorDescriptor {
    n_ports: usize,
    ops: Vec<OperationDescriptor>,
    mem_tiers: Vec<MemoryTier>,
}

impl ProcessorDescriptor {
    /// Create a processor with `n_ports` execution/memory-transfer ports and
    /// an empty operation catalog and memory hierarchy.
    pub fn new(n_ports: usize) -> Self {
        Self {
            n_ports,
            ops: Vec::new(),
            mem_tiers: Vec::new(),
        }
    }

    /// Number of ports on this processor.
    pub fn n_ports(&self) -> usize {
        self.n_ports
    }

    /// Append a memory tier and return its id.
    ///
    /// Tiers are total: a later call is always slower/bigger in intent than
    /// earlier ones, though this is a convention this constructor does not
    /// itself enforce — callers decide insertion order.
    pub fn new_mem_level(
        &mut self,
        size: usize,
        port_n: usize,
        load_time: f64,
    ) -> Result<usize, SchedulerError> {
        if size == 0 {
            return Err(SchedulerError::InvalidDescriptor(
                DescriptorIssue::ZeroTierCapacity,
            ));
        }
        if port_n >= self.n_ports {
            return Err(SchedulerError::InvalidDescriptor(
                DescriptorIssue::UnknownPort {
                    port: port_n,
                    n_ports: self.n_ports,
                },
            ));
        }
        if !load_time.is_finite() || load_time < 0.0 {
            return Err(SchedulerError::InvalidDescriptor(
                DescriptorIssue::InvalidLoadTime { load_time },
            ));
        }

        let id = self.mem_tiers.len();
        self.mem_tiers.push(MemoryTier {
            size,
            port_n,
            load_time,
        });
        tracing::debug!(tier_id = id, size, port_n, load_time, "memory tier registered");
        Ok(id)
    }

    /// Append an operation and return its id.
    pub fn new_op(&mut self, len_t: f64, ports: Vec<usize>) -> Result<usize, SchedulerError> {
        if ports.is_empty() {
            return Err(SchedulerError::InvalidDescriptor(
                DescriptorIssue::EmptyPortList,
            ));
        }
        if !len_t.is_finite() || len_t < 0.0 {
            return Err(SchedulerError::InvalidDescriptor(
                DescriptorIssue::InvalidLatency { len_t },
            ));
        }
        for &p in &ports {
            if p >= self.n_ports {
                return Err(SchedulerError::InvalidDescriptor(
                    DescriptorIssue::UnknownPort {
                        port: p,
                        n_ports: self.n_ports,
                    },
                ));
            }
        }

        let id = self.ops.len();
        tracing::debug!(op_id = id, len_t, ports = ?ports, "operation registered");
        self.ops.push(OperationDescriptor { len_t, ports });
        Ok(id)
    }

    /// Look up an operation by id.
    ///
    /// # Panics
    /// Panics if `op_id` is out of range. Callers that accept `op_id` from
    /// untrusted input should validate it against [`op_count`](Self::op_count)
    /// first — [`crate::program::Program::new`] does this for every node.
    pub fn get_op(&self, op_id: usize) -> &OperationDescriptor {
        &self.ops[op_id]
    }

    /// Number of operations registered so far.
    pub fn op_count(&self) -> usize {
        self.ops.len()
    }

    /// The memory-tier list, fastest/smallest first.
    pub fn mem_tiers(&self) -> &[MemoryTier] {
        &self.mem_tiers
    }
}
