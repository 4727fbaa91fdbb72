// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Role configuration
//!
//! Values are layered: built-in defaults, then an optional TOML file with
//! `[supervisor]` and `[generator]` tables, then command-line overrides
//! applied by the binaries.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tri_channel::{ResourceNames, Ring, DEFAULT_CAPACITY, DEFAULT_INSTANCE, DEFAULT_POLL_INTERVAL};

/// Default time the supervisor waits for generators to detach
pub const DEFAULT_SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// Longest duration accepted on the command line (`i32::MAX` seconds)
pub const MAX_DURATION: Duration = Duration::from_secs(i32::MAX as u64);

/// Supervisor settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SupervisorConfig {
    /// Instance name the shared resource names derive from
    pub instance: String,
    /// Ring slots
    pub capacity: u32,
    /// Stop once more than this many solutions were consumed
    pub limit: Option<u64>,
    /// Wait before consuming the first solution
    #[serde(with = "humantime_serde")]
    pub delay: Duration,
    /// Longest a blocked wait goes between cancellation checks
    #[serde(with = "humantime_serde")]
    pub poll_interval: Duration,
    /// How long shutdown waits for generators to detach
    #[serde(with = "humantime_serde")]
    pub shutdown_grace: Duration,
    /// Unlink names left behind by a crashed instance before creating
    pub reclaim_stale: bool,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            instance: DEFAULT_INSTANCE.to_string(),
            capacity: DEFAULT_CAPACITY,
            limit: None,
            delay: Duration::ZERO,
            poll_interval: DEFAULT_POLL_INTERVAL,
            shutdown_grace: DEFAULT_SHUTDOWN_GRACE,
            reclaim_stale: false,
        }
    }
}

impl SupervisorConfig {
    pub fn validate(&self) -> Result<ResourceNames, ConfigError> {
        Ring::validate_capacity(self.capacity).map_err(|e| ConfigError::Invalid {
            field: "capacity",
            reason: e.to_string(),
        })?;
        require_nonzero("poll_interval", self.poll_interval)?;
        require_at_most_max("poll_interval", self.poll_interval)?;
        require_at_most_max("delay", self.delay)?;
        require_at_most_max("shutdown_grace", self.shutdown_grace)?;
        names(&self.instance)
    }
}

/// Generator settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    pub instance: String,
    #[serde(with = "humantime_serde")]
    pub poll_interval: Duration,
    /// Fixed RNG seed for reproducible runs
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            instance: DEFAULT_INSTANCE.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            seed: None,
        }
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> Result<ResourceNames, ConfigError> {
        require_nonzero("poll_interval", self.poll_interval)?;
        require_at_most_max("poll_interval", self.poll_interval)?;
        names(&self.instance)
    }
}

/// Contents of a config file; both tables are optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub supervisor: SupervisorConfig,
    pub generator: GeneratorConfig,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `path` if given, otherwise defaults
    pub fn load_optional(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

/// Parse a command-line duration: bare integer seconds or humantime (`500ms`, `2s`)
///
/// Values above [`MAX_DURATION`] are clamped to it.
pub fn parse_duration(value: &str) -> Result<Duration, ConfigError> {
    let value = value.trim();
    let duration = if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
        Duration::from_secs(value.parse::<u64>().unwrap_or(u64::MAX))
    } else {
        humantime::parse_duration(value).map_err(|source| ConfigError::InvalidDuration {
            value: value.to_string(),
            source,
        })?
    };
    Ok(duration.min(MAX_DURATION))
}

fn require_nonzero(field: &'static str, value: Duration) -> Result<(), ConfigError> {
    if value.is_zero() {
        return Err(ConfigError::Invalid {
            field,
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(())
}

fn require_at_most_max(field: &'static str, value: Duration) -> Result<(), ConfigError> {
    if value > MAX_DURATION {
        return Err(ConfigError::Invalid {
            field,
            reason: format!("must be at most {}s", MAX_DURATION.as_secs()),
        });
    }
    Ok(())
}

fn names(instance: &str) -> Result<ResourceNames, ConfigError> {
    ResourceNames::for_instance(instance).map_err(|e| ConfigError::Invalid {
        field: "instance",
        reason: e.to_string(),
    })
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
