// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Graph model: node identifiers, edges, and the immutable edge list
//!
//! Nodes are identified purely by value. Two edges that mention the same
//! integer refer to the same logical node.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while building a graph from its textual description
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("graph has no edges")]
    Empty,
    #[error("edge '{0}' is missing an endpoint (expected 'a-b')")]
    MissingEndpoint(String),
    #[error("edge '{0}' connects more than two nodes")]
    TooManyEndpoints(String),
    #[error("edge '{edge}' has an invalid node '{node}'")]
    InvalidNode { edge: String, node: String },
    #[error("edge #{position}: {source}")]
    AtPosition {
        position: usize,
        #[source]
        source: Box<GraphError>,
    },
}

/// Node identifier
///
/// Parsed values above [`NodeId::MAX`] saturate instead of failing.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[repr(transparent)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const MAX: NodeId = NodeId(u32::MAX);

    pub fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for NodeId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(());
        }
        // All digits, so the only possible parse failure is overflow
        Ok(s.parse::<u32>().map(NodeId).unwrap_or(NodeId::MAX))
    }
}

/// An edge between two nodes
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(C)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
}

impl Edge {
    pub fn new(from: u32, to: u32) -> Self {
        Self {
            from: NodeId(from),
            to: NodeId(to),
        }
    }

    /// True if the edge shares a node with `other`
    pub fn is_linked(&self, other: &Edge) -> bool {
        self.from == other.from
            || self.from == other.to
            || self.to == other.from
            || self.to == other.to
    }

    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.from, self.to)
    }
}

impl FromStr for Edge {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        let mut parts = token.split('-');

        let (from, to) = match (parts.next(), parts.next()) {
            (Some(from), Some(to)) if !from.is_empty() && !to.is_empty() => (from, to),
            _ => return Err(GraphError::MissingEndpoint(token.to_string())),
        };
        if parts.next().is_some() {
            return Err(GraphError::TooManyEndpoints(token.to_string()));
        }

        let parse = |node: &str| {
            node.parse::<NodeId>().map_err(|_| GraphError::InvalidNode {
                edge: token.to_string(),
                node: node.to_string(),
            })
        };

        Ok(Edge {
            from: parse(from)?,
            to: parse(to)?,
        })
    }
}

/// Immutable, ordered edge list
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Graph {
    edges: Vec<Edge>,
}

impl Graph {
    pub fn new(edges: Vec<Edge>) -> Result<Self, GraphError> {
        if edges.is_empty() {
            return Err(GraphError::Empty);
        }
        Ok(Self { edges })
    }

    /// Parse `a-b` tokens, reporting the first malformed one with its position
    pub fn parse<I, S>(tokens: I) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let edges = tokens
            .into_iter()
            .enumerate()
            .map(|(i, token)| {
                token
                    .as_ref()
                    .parse::<Edge>()
                    .map_err(|e| GraphError::AtPosition {
                        position: i + 1,
                        source: Box::new(e),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(edges)
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Number of distinct node values
    pub fn node_count(&self) -> usize {
        self.edges
            .iter()
            .flat_map(|e| [e.from, e.to])
            .collect::<HashSet<_>>()
            .len()
    }
}

#[cfg(test)]
#[path = "graph_tests.rs"]
mod tests;
