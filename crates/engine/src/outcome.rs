// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Supervisor results as shown to the user

use serde::Serialize;
use std::fmt;
use tri_core::{CandidateSolution, Edge};

/// Final verdict on the graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum Outcome {
    Colorable,
    /// Fewest conflicts seen; removing `edges` makes the graph 3-colorable
    BestAttempt { removed_edges: u32, edges: Vec<Edge> },
    /// The run ended before any candidate was consumed
    NoSolutions,
}

impl Outcome {
    pub fn from_best(best: Option<&CandidateSolution>) -> Self {
        match best {
            None => Outcome::NoSolutions,
            Some(best) if best.is_perfect() => Outcome::Colorable,
            Some(best) => Outcome::BestAttempt {
                removed_edges: best.conflict_count(),
                edges: best.conflicts().to_vec(),
            },
        }
    }

    /// Edges the best attempt would remove; empty otherwise
    pub fn edges(&self) -> &[Edge] {
        match self {
            Outcome::BestAttempt { edges, .. } => edges,
            _ => &[],
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Colorable => write!(f, "The graph is 3-colorable!"),
            Outcome::BestAttempt { removed_edges, .. } => write!(
                f,
                "The graph might not be 3-colorable, best solution removes {} edges.",
                removed_edges
            ),
            Outcome::NoSolutions => write!(f, "No solutions were received."),
        }
    }
}

/// Why the consume loop ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StopReason {
    Perfect,
    LimitReached,
    Interrupted { reason: String },
}

/// Result of [`crate::Supervisor::run`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub outcome: Outcome,
    pub stop: StopReason,
    pub consumed: u64,
}

impl RunReport {
    pub fn interrupted(&self) -> bool {
        matches!(self.stop, StopReason::Interrupted { .. })
    }
}

/// Result of [`crate::Supervisor::shutdown`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ShutdownReport {
    /// Free-slot permits posted to wake blocked generators
    pub released: u32,
    /// Generators that had not detached when the grace period ran out
    pub still_attached: u32,
}

#[cfg(test)]
#[path = "outcome_tests.rs"]
mod tests;
