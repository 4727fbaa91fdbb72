// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Best-solution tracking for the supervisor

use tri_core::CandidateSolution;

/// What a consumed candidate meant for the search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Zero conflicts; the graph is 3-colorable
    Perfect,
    /// Fewer conflicts than any earlier candidate
    Improved { conflicts: u32 },
    Unchanged,
}

#[derive(Debug, Clone, Default)]
pub struct SolutionTracker {
    best: Option<CandidateSolution>,
    consumed: u64,
}

impl SolutionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a consumed candidate
    ///
    /// Ties keep the earlier candidate.
    pub fn observe(&mut self, candidate: &CandidateSolution) -> Verdict {
        self.consumed += 1;
        let improved = match self.best {
            Some(best) => candidate.conflict_count() < best.conflict_count(),
            None => true,
        };
        if !improved {
            return Verdict::Unchanged;
        }

        self.best = Some(*candidate);
        if candidate.is_perfect() {
            Verdict::Perfect
        } else {
            Verdict::Improved {
                conflicts: candidate.conflict_count(),
            }
        }
    }

    pub fn best(&self) -> Option<&CandidateSolution> {
        self.best.as_ref()
    }

    pub fn consumed(&self) -> u64 {
        self.consumed
    }

    /// True once more than `limit` candidates were consumed
    ///
    /// The consume loop continues while `consumed <= limit`, so a limit of
    /// zero still consumes exactly one candidate. `None` never stops.
    pub fn limit_reached(&self, limit: Option<u64>) -> bool {
        limit.is_some_and(|limit| self.consumed > limit)
    }
}

#[cfg(test)]
#[path = "tracker_tests.rs"]
mod tests;
