// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! POSIX names for one pipeline instance's shared resources

use crate::error::ChannelError;

/// Instance name used when none is configured
pub const DEFAULT_INSTANCE: &str = "tricolor";

const MAX_INSTANCE_LEN: usize = 200;

/// Names of the shared region and the three semaphores of one instance
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceNames {
    pub instance: String,
    pub region: String,
    pub free_slots: String,
    pub used_slots: String,
    pub writer_lock: String,
}

impl ResourceNames {
    pub fn for_instance(instance: &str) -> Result<Self, ChannelError> {
        let valid = !instance.is_empty()
            && instance.len() <= MAX_INSTANCE_LEN
            && instance
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'_' | b'-'));
        if !valid {
            return Err(ChannelError::InvalidName(instance.to_string()));
        }

        Ok(Self {
            instance: instance.to_string(),
            region: format!("/{}_shm", instance),
            free_slots: format!("/{}_free", instance),
            used_slots: format!("/{}_used", instance),
            writer_lock: format!("/{}_writer", instance),
        })
    }

    /// Semaphore names in creation order
    pub fn semaphores(&self) -> [&str; 3] {
        [&self.free_slots, &self.used_slots, &self.writer_lock]
    }
}
