// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! tri-core: graph model and coloring heuristic for the tricolor pipeline
//!
//! This crate provides:
//! - The immutable graph model and `a-b` edge parsing
//! - The randomized coloring pass that yields candidate solutions
//! - Fixed-size candidate solutions suitable for shared-memory slots
//! - A cancellation token for signal-driven shutdown

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod cancel;
pub mod coloring;
pub mod graph;
pub mod solution;

pub use cancel::CancellationToken;
pub use coloring::{assign_colors, color_graph, Color, EdgeColors};
pub use graph::{Edge, Graph, GraphError, NodeId};
pub use solution::{CandidateSolution, MAX_EDGES};
