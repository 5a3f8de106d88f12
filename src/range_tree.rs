/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Value-liveness range tree (`smtree` in the original implementation).
//!
//! Models an integer array `a[1..=N]`, all zero-initialized. The single
//! operation, [`RangeTree::inc`], increments the half-open-on-left interval
//! `(b, e]` by one and returns the maximum value currently held on the
//! suffix `[b+1, N]` — the peak simultaneous live-value count observed
//! since position `b`.
//!
//! The original C++ `smtree` packs this into one bottom-up pass over a
//! classic iterative segment tree with lazy `s`/`m` pairs. That shape is
//! not the contract — any structure that satisfies the algebraic semantics
//! above does. This implementation is a conventional recursive
//! lazy-propagation segment tree (range-add, range-max), which is easier to
//! verify against P6 than the finger-walking version.

#[derive(Debug)]
pub struct RangeTree {
    /// Number of leaves, rounded up to the next power of two.
    size: usize,
    max: Vec<i64>,
    lazy: Vec<i64>,
}

impl RangeTree {
    /// Create a tree over at least `capacity` leaves (positions `1..=capacity`).
    pub fn new(capacity: usize) -> Self {
        let mut size = 1usize;
        while size < capacity.max(1) {
            size *= 2;
        }
        Self {
            size,
            max: vec![0; 2 * size],
            lazy: vec![0; 2 * size],
        }
    }

    /// Reset every counter to zero, preserving the allocated shape.
    pub fn clear(&mut self) {
        self.max.iter_mut().for_each(|v| *v = 0);
        self.lazy.iter_mut().for_each(|v| *v = 0);
    }

    fn push_down(&mut self, node: usize) {
        let delta = self.lazy[node];
        if delta != 0 {
            for child in [2 * node, 2 * node + 1] {
                self.max[child] += delta;
                self.lazy[child] += delta;
            }
            self.lazy[node] = 0;
        }
    }

    fn add_range(&mut self, node: usize, node_lo: usize, node_hi: usize, lo: usize, hi: usize) {
        if hi < node_lo || node_hi < lo {
            return;
        }
        if lo <= node_lo && node_hi <= hi {
            self.max[node] += 1;
            self.lazy[node] += 1;
            return;
        }
        self.push_down(node);
        let mid = node_lo + (node_hi - node_lo) / 2;
        self.add_range(2 * node, node_lo, mid, lo, hi);
        self.add_range(2 * node + 1, mid + 1, node_hi, lo, hi);
        self.max[node] = self.max[2 * node].max(self.max[2 * node + 1]);
    }

    fn query_max(&mut self, node: usize, node_lo: usize, node_hi: usize, lo: usize, hi: usize) -> i64 {
        if hi < node_lo || node_hi < lo {
            return i64::MIN;
        }
        if lo <= node_lo && node_hi <= hi {
            return self.max[node];
        }
        self.push_down(node);
        let mid = node_lo + (node_hi - node_lo) / 2;
        let left = self.query_max(2 * node, node_lo, mid, lo, hi);
        let right = self.query_max(2 * node + 1, mid + 1, node_hi, lo, hi);
        left.max(right)
    }

    /// Increment `(b, e]` by one and return `max(a[b+1..=N])` after the
    /// increment is applied.
    ///
    /// `b` and `e` are 1-indexed positions into the modeled array; `e` must
    /// be strictly greater than `b` and no larger than the tree's capacity.
    pub fn inc(&mut self, b: usize, e: usize) -> i64 {
        debug_assert!(b < e, "inc requires b < e, got b={b} e={e}");
        // position p (1-indexed) lives at 0-indexed leaf p-1.
        let update_lo = b;
        let update_hi = e - 1;
        self.add_range(1, 0, self.size - 1, update_lo, update_hi);
        self.query_max(1, 0, self.size - 1, b, self.size - 1)
    }
}
