// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Output formatting for the executables

use clap::ValueEnum;
use serde::Serialize;
use std::fmt;
use tri_engine::{RunReport, ShutdownReport};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Print output in the specified format
pub fn print<T: Serialize + fmt::Display>(value: &T, format: OutputFormat) {
    println!("{}", render(value, format));
}

pub fn render<T: Serialize + fmt::Display>(value: &T, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => value.to_string(),
        OutputFormat::Json => serde_json::to_string_pretty(value).unwrap_or_default(),
    }
}

/// Everything the supervisor reports once it has shut down
#[derive(Debug, Clone, Serialize)]
pub struct SupervisorSummary {
    #[serde(flatten)]
    pub run: RunReport,
    pub shutdown: ShutdownReport,
}

impl fmt::Display for SupervisorSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.run.outcome)?;
        let edges = self.run.outcome.edges();
        if !edges.is_empty() {
            write!(f, "\nEdges to remove:")?;
            for edge in edges {
                write!(f, " {}", edge)?;
            }
        }
        Ok(())
    }
}
