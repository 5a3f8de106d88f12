/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Coordinate-descent search over the priority vector.
//!
//! [`SearchDriver`] repeatedly perturbs a candidate priority vector one
//! coordinate at a time, re-scoring with [`Program::schedule_forward`] after
//! each sweep and keeping whichever vector scored no worse. A
//! [`Program::schedule_backward`] pass seeds/regularizes the vector between
//! outer iterations, exactly as the forward pass leaves its output (a
//! position permutation) to be read back in as next round's priority.

use crate::error::SchedulerError;
use crate::program::Program;

/// Largest coordinate perturbation tried in a sweep, and the starting point
/// of the descending `j` loop.
const MAX_STEP: i64 = 25;

/// Default number of outer forward/backward sweep pairs.
pub const DEFAULT_OUTER_ITERS: usize = 20;

/// Result of a search run: the best priority vector found and its makespan.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub order: Vec<i64>,
    pub makespan: f64,
}

/// Drives coordinate-descent search over a [`Program`]'s priority vector.
pub struct SearchDriver<'a> {
    program: &'a Program,
    outer_iters: usize,
}

impl<'a> SearchDriver<'a> {
    /// Build a driver over `program`, running `outer_iters` forward/backward
    /// sweep pairs per [`run`](Self::run).
    pub fn new(program: &'a Program, outer_iters: usize) -> Self {
        Self {
            program,
            outer_iters,
        }
    }

    /// Run the search starting from `initial`, an already-valid priority
    /// vector (e.g. the identity permutation or a loaded problem's declared
    /// priorities).
    ///
    /// Returns the best vector found (as an emission-position permutation)
    /// and its makespan. `initial` is read but not mutated; the returned
    /// vector is a fresh allocation.
    pub fn run(&self, initial: &[i64]) -> Result<SearchResult, SchedulerError> {
        let mut order = initial.to_vec();
        let mut score = self.program.schedule_forward(&mut order)?;
        tracing::info!(initial_makespan = score, "search starting");

        for outer in 0..self.outer_iters {
            self.forward_sweep(&mut order, &mut score)?;
            self.backward_sweep(&mut order, &mut score)?;
            tracing::debug!(outer, score, "outer iteration complete");
        }

        tracing::info!(final_makespan = score, "search complete");
        Ok(SearchResult { order, makespan: score })
    }

    /// One forward sweep: for `j` from [`MAX_STEP`] down to 1, for each node
    /// `i` in ascending index order, try `order[i] += j` and keep the change
    /// if the resulting makespan is no worse.
    fn forward_sweep(&self, order: &mut Vec<i64>, score: &mut f64) -> Result<(), SchedulerError> {
        let n = order.len();
        for j in (1..=MAX_STEP).rev() {
            for i in 0..n {
                self.try_move(order, score, i, j)?;
            }
        }
        Ok(())
    }

    /// One backward sweep: for `j` from [`MAX_STEP`] down to 1, for each node
    /// `i` in descending index order, try `order[i] -= j`.
    fn backward_sweep(&self, order: &mut Vec<i64>, score: &mut f64) -> Result<(), SchedulerError> {
        let n = order.len();
        for j in (1..=MAX_STEP).rev() {
            for i in (0..n).rev() {
                self.try_move(order, score, i, -j)?;
            }
        }
        Ok(())
    }

    /// Apply `order[i] += delta`, re-score, and keep the move iff the new
    /// makespan is `<= *score` (a plateau move is accepted, matching the
    /// non-strict acceptance rule used throughout the search).
    fn try_move(
        &self,
        order: &mut Vec<i64>,
        score: &mut f64,
        i: usize,
        delta: i64,
    ) -> Result<(), SchedulerError> {
        let prev = order[i];
        order[i] = prev + delta;
        let mut candidate = order.clone();
        let candidate_score = self.program.schedule_forward(&mut candidate)?;

        if candidate_score <= *score {
            *order = candidate;
            *score = candidate_score;
        } else {
            order[i] = prev;
        }
        Ok(())
    }
}
