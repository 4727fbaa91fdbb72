// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User-friendly error display with context and suggestions.
//!
//! Errors reach the user as:
//! - What went wrong (message)
//! - Why it might have happened (context)
//! - How to fix it (suggestions)

use std::fmt;
use tri_channel::ChannelError;
use tri_engine::{ConfigError, EngineError};

/// Error with context and recovery suggestions for user-friendly display.
#[derive(Debug)]
pub struct TriError {
    /// What went wrong
    pub message: String,
    /// Why it might have happened
    pub context: Vec<String>,
    /// How to fix it
    pub suggestions: Vec<String>,
}

impl TriError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        self.context.push(ctx.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Append every `source()` below `err` as context
    fn with_causes(mut self, err: &(dyn std::error::Error + 'static)) -> Self {
        let mut cause = err.source();
        while let Some(e) = cause {
            self.context.push(e.to_string());
            cause = e.source();
        }
        self
    }

    /// Translate a fatal error from either executable
    pub fn from_anyhow(err: &anyhow::Error, instance: &str) -> Self {
        if let Some(e) = err.downcast_ref::<EngineError>() {
            return Self::from_engine(e, instance);
        }
        if let Some(e) = err.downcast_ref::<ConfigError>() {
            return Self::invalid_config(e);
        }
        let mut chain = err.chain();
        let mut out = TriError::new(chain.next().map(ToString::to_string).unwrap_or_default());
        for cause in chain {
            out = out.with_context(cause.to_string());
        }
        out
    }

    pub fn from_engine(err: &EngineError, instance: &str) -> Self {
        match err {
            EngineError::Channel(e) if e.is_not_found() => Self::supervisor_not_running(instance),
            EngineError::Channel(ChannelError::AlreadyExists { name }) => {
                Self::instance_in_use(instance, name)
            }
            EngineError::Channel(e) => TriError::new(e.to_string()).with_causes(e),
            EngineError::Config(e) => Self::invalid_config(e),
            EngineError::Graph(_) => TriError::new(err.to_string())
                .with_suggestion("Edges are written as two decimal node ids: 0-1 1-2 2-0"),
        }
    }

    /// A generator started before any supervisor created the instance
    pub fn supervisor_not_running(instance: &str) -> Self {
        TriError::new(format!("No supervisor is running for instance '{}'", instance))
            .with_context("Generators attach to shared memory the supervisor creates")
            .with_suggestion("Start the supervisor first: supervisor &")
            .with_suggestion(format!(
                "Check that both processes use the same instance (--instance or {})",
                crate::INSTANCE_ENV
            ))
    }

    /// Shared names already exist, from a live supervisor or a crashed one
    pub fn instance_in_use(instance: &str, name: &str) -> Self {
        TriError::new(format!("Instance '{}' is already in use", instance))
            .with_context(format!("'{}' already exists", name))
            .with_context("Another supervisor may be running, or a previous one crashed")
            .with_suggestion("Pick another instance: supervisor --instance <NAME>")
            .with_suggestion("If no supervisor is running, remove stale names: supervisor --reclaim")
    }

    pub fn invalid_config(err: &ConfigError) -> Self {
        TriError::new(err.to_string())
            .with_causes(err)
            .with_suggestion("Check the command-line flags and the --config file")
    }
}

impl fmt::Display for TriError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "error: {}", self.message)?;

        if !self.context.is_empty() {
            writeln!(f)?;
            for ctx in &self.context {
                writeln!(f, "  -> {}", ctx)?;
            }
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            writeln!(f, "suggestions:")?;
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for TriError {}

#[cfg(test)]
mod tests {
    use super::*;
    use tri_core::Graph;

    #[test]
    fn test_error_display() {
        let err = TriError::new("Something went wrong")
            .with_context("First context")
            .with_context("Second context")
            .with_suggestion("Try this")
            .with_suggestion("Or this");

        let output = format!("{}", err);
        assert!(output.contains("error: Something went wrong"));
        assert!(output.contains("-> First context"));
        assert!(output.contains("-> Second context"));
        assert!(output.contains("1. Try this"));
        assert!(output.contains("2. Or this"));
    }

    #[test]
    fn test_missing_channel_suggests_starting_supervisor() {
        let err = EngineError::Channel(ChannelError::NotFound {
            name: "/lab_shm".to_string(),
        });
        let output = TriError::from_engine(&err, "lab").to_string();
        assert!(output.contains("No supervisor is running for instance 'lab'"));
        assert!(output.contains("Start the supervisor first"));
    }

    #[test]
    fn test_collision_suggests_reclaim() {
        let err = EngineError::Channel(ChannelError::AlreadyExists {
            name: "/lab_free".to_string(),
        });
        let output = TriError::from_engine(&err, "lab").to_string();
        assert!(output.contains("'/lab_free' already exists"));
        assert!(output.contains("--reclaim"));
    }

    #[test]
    fn test_graph_error_lists_position() {
        let graph_err = Graph::parse(["0-1", "2-x"]).unwrap_err();
        let err = anyhow::Error::from(EngineError::from(graph_err));
        let output = TriError::from_anyhow(&err, "lab").to_string();
        assert!(output.contains("invalid graph"));
        assert!(output.contains("2-x"));
    }

    #[test]
    fn test_plain_anyhow_keeps_chain() {
        let err = anyhow::anyhow!("disk full").context("failed to open log file");
        let output = TriError::from_anyhow(&err, "lab").to_string();
        assert!(output.contains("error: failed to open log file"));
        assert!(output.contains("-> disk full"));
    }
}
