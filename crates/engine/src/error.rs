// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the generator and supervisor roles

use std::path::PathBuf;
use thiserror::Error;
use tri_channel::ChannelError;
use tri_core::GraphError;

/// Errors loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid duration '{value}': expected seconds or a duration like 500ms")]
    InvalidDuration {
        value: String,
        #[source]
        source: humantime::DurationError,
    },
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Errors raised while running a role
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Channel(#[from] ChannelError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("invalid graph: {0}")]
    Graph(#[from] GraphError),
}

impl EngineError {
    /// True when a generator started before its supervisor
    pub fn is_channel_missing(&self) -> bool {
        matches!(self, EngineError::Channel(e) if e.is_not_found())
    }
}
