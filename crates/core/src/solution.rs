// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Candidate solutions produced by one coloring pass
//!
//! A candidate is a fixed-size value: it carries the true conflict count and
//! a bounded sample of the conflicting edges, so it can be copied verbatim
//! into a shared-memory slot.

use crate::graph::{Edge, NodeId};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::fmt;

/// Maximum number of conflicting edges stored in a candidate
pub const MAX_EDGES: usize = 8;

/// Conflicting edges found by one heuristic pass
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(C)]
pub struct CandidateSolution {
    count: u32,
    len: u32,
    edges: [Edge; MAX_EDGES],
}

impl CandidateSolution {
    /// A candidate with no conflicts (a valid 3-coloring)
    pub const PERFECT: CandidateSolution = CandidateSolution {
        count: 0,
        len: 0,
        edges: [Edge {
            from: NodeId(0),
            to: NodeId(0),
        }; MAX_EDGES],
    };

    /// Build from every conflicting edge; only the first [`MAX_EDGES`] are kept
    pub fn from_conflicts<I>(conflicts: I) -> Self
    where
        I: IntoIterator<Item = Edge>,
    {
        let mut solution = Self::PERFECT;
        for edge in conflicts {
            if (solution.len as usize) < MAX_EDGES {
                solution.edges[solution.len as usize] = edge;
                solution.len += 1;
            }
            solution.count = solution.count.saturating_add(1);
        }
        solution
    }

    /// True number of conflicting edges, possibly above [`MAX_EDGES`]
    pub fn conflict_count(&self) -> u32 {
        self.count
    }

    /// The stored sample of conflicting edges
    pub fn conflicts(&self) -> &[Edge] {
        &self.edges[..(self.len as usize).min(MAX_EDGES)]
    }

    pub fn is_perfect(&self) -> bool {
        self.count == 0
    }

    /// True if the sample holds every conflicting edge
    pub fn fits_sample(&self) -> bool {
        self.count as usize <= MAX_EDGES
    }
}

impl Default for CandidateSolution {
    fn default() -> Self {
        Self::PERFECT
    }
}

impl fmt::Display for CandidateSolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for edge in self.conflicts() {
            if !first {
                f.write_str(" ")?;
            }
            write!(f, "{}", edge)?;
            first = false;
        }
        Ok(())
    }
}

impl Serialize for CandidateSolution {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("CandidateSolution", 2)?;
        state.serialize_field("conflicts", &self.count)?;
        state.serialize_field("edges", self.conflicts())?;
        state.end()
    }
}

#[cfg(test)]
#[path = "solution_tests.rs"]
mod tests;
