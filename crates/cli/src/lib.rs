// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared plumbing for the `supervisor` and `generator` executables

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod error;
pub mod logging;
pub mod output;
pub mod signals;

pub use error::TriError;
pub use output::OutputFormat;

/// Environment variable selecting the instance name
pub const INSTANCE_ENV: &str = "TRI_INSTANCE";
