// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the shared channel

use nix::errno::Errno;
use thiserror::Error;

/// Errors raised by shared-memory and semaphore operations
#[derive(Debug, Error)]
pub enum ChannelError {
    /// A named resource does not exist (the supervisor is not running)
    #[error("shared resource '{name}' does not exist; is the supervisor running?")]
    NotFound { name: String },

    /// A named resource is left over from another instance
    #[error("shared resource '{name}' already exists; another supervisor may be running")]
    AlreadyExists { name: String },

    /// The region exists but its header was never initialized
    #[error("shared region '{name}' is not initialized")]
    NotReady { name: String },

    /// Creating, opening, sizing or mapping a resource failed
    #[error("{op} '{name}' failed: {errno}")]
    Resource {
        op: &'static str,
        name: String,
        #[source]
        errno: Errno,
    },

    /// A semaphore wait or post failed for a reason other than interruption
    #[error("semaphore {op} on '{name}' failed: {errno}")]
    Sync {
        op: &'static str,
        name: String,
        #[source]
        errno: Errno,
    },

    #[error("invalid instance name '{0}': use 1-200 characters from [A-Za-z0-9._-]")]
    InvalidName(String),

    #[error("invalid capacity {0}: must be between 1 and {max}", max = crate::ring::MAX_CAPACITY)]
    InvalidCapacity(u32),
}

impl ChannelError {
    /// Map an errno from an open/create call onto the matching variant
    pub(crate) fn from_open(op: &'static str, name: &str, errno: Errno) -> Self {
        match errno {
            Errno::ENOENT => ChannelError::NotFound {
                name: name.to_string(),
            },
            Errno::EEXIST => ChannelError::AlreadyExists {
                name: name.to_string(),
            },
            errno => ChannelError::Resource {
                op,
                name: name.to_string(),
                errno,
            },
        }
    }

    /// True for errors that mean "start the supervisor first"
    pub fn is_not_found(&self) -> bool {
        matches!(self, ChannelError::NotFound { .. })
    }
}
