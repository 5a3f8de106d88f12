/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! `dagsched` – priority-driven list scheduler for DAG operation graphs.
//!
//! Simulates an abstract processor with a fixed number of ports and a
//! tiered memory hierarchy, and schedules the operations of a directed
//! acyclic graph onto it via a priority-ordered topological walk. A
//! coordinate-descent search driver perturbs the priority vector to look
//! for a lower makespan.
//!
//! Module layout:
//!
//! ```text
//! lib.rs
//! ├── error       – SchedulerError and its nested detail enums
//! ├── range_tree  – value-liveness range tree (peak concurrent use)
//! ├── processor   – ProcessorDescriptor: ports, operations, memory tiers
//! ├── state       – ProcessorState: the mutable per-attempt simulator
//! ├── program     – Program: the DAG, forward/backward traversal
//! ├── search      – SearchDriver: coordinate-descent over the priority vector
//! └── config      – problem-file loading
//! ```

pub mod config;
pub mod error;
pub mod processor;
pub mod program;
pub mod range_tree;
pub mod search;
pub mod state;
