// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! tri-engine: the generator and supervisor roles of the coloring pipeline

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod config;
mod error;
pub mod generator;
pub mod outcome;
pub mod supervisor;
pub mod tracker;

pub use config::{parse_duration, ConfigFile, GeneratorConfig, SupervisorConfig, MAX_DURATION};
pub use error::{ConfigError, EngineError};
pub use generator::{Generator, GeneratorReport, GeneratorState};
pub use outcome::{Outcome, RunReport, ShutdownReport, StopReason};
pub use supervisor::Supervisor;
pub use tracker::{SolutionTracker, Verdict};
