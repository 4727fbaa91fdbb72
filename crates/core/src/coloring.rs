// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Randomized single-pass 3-coloring heuristic
//!
//! Edges are visited in list order. Unassigned endpoints get a uniformly
//! random color, and every decided color is pushed forward to the matching
//! endpoints of later edges, so one node value carries one color for the
//! whole pass. This is a greedy guess, not a solver: repeated independent
//! passes are what eventually find a valid coloring.

use crate::graph::{Edge, Graph};
use crate::solution::CandidateSolution;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// One of the three colors
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Color {
    Red = 0,
    Green = 1,
    Blue = 2,
}

impl Color {
    pub const ALL: [Color; 3] = [Color::Red, Color::Green, Color::Blue];

    /// Draw a color uniformly at random
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

/// Colors chosen for the endpoints of one edge
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EdgeColors {
    pub edge: Edge,
    pub from: Color,
    pub to: Color,
}

impl EdgeColors {
    pub fn is_conflict(&self) -> bool {
        self.from == self.to
    }
}

/// Assign a color to every endpoint of every edge
pub fn assign_colors<R: Rng + ?Sized>(graph: &Graph, rng: &mut R) -> Vec<EdgeColors> {
    let edges = graph.edges();
    let mut slots: Vec<[Option<Color>; 2]> = vec![[None, None]; edges.len()];

    for (i, edge) in edges.iter().enumerate() {
        let (from, to) = match (slots[i][0], slots[i][1]) {
            (None, None) => {
                let from = Color::random(rng);
                // A self-loop names one node, so both ends take the same draw
                let to = if edge.is_self_loop() {
                    from
                } else {
                    Color::random(rng)
                };
                (from, to)
            }
            (None, Some(to)) => (Color::random(rng), to),
            (Some(from), None) => (from, Color::random(rng)),
            (Some(from), Some(to)) => (from, to),
        };
        slots[i] = [Some(from), Some(to)];

        for (later, slot) in edges[i + 1..].iter().zip(slots[i + 1..].iter_mut()) {
            let [later_from, later_to] = slot;
            for (node, color) in [(later.from, later_from), (later.to, later_to)] {
                if node == edge.from {
                    *color = Some(from);
                } else if node == edge.to {
                    *color = Some(to);
                }
            }
        }
    }

    edges
        .iter()
        .zip(slots)
        .map(|(edge, [from, to])| EdgeColors {
            edge: *edge,
            // Every slot was filled when its own edge was visited
            from: from.unwrap_or(Color::Red),
            to: to.unwrap_or(Color::Red),
        })
        .collect()
}

/// Run one coloring pass and collect the conflicting edges
pub fn color_graph<R: Rng + ?Sized>(graph: &Graph, rng: &mut R) -> CandidateSolution {
    CandidateSolution::from_conflicts(
        assign_colors(graph, rng)
            .into_iter()
            .filter(EdgeColors::is_conflict)
            .map(|c| c.edge),
    )
}

#[cfg(test)]
#[path = "coloring_tests.rs"]
mod tests;
