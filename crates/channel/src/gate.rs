// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The three semaphores guarding the ring
//!
//! - **free slots** starts at capacity; producers take one before writing
//! - **used slots** starts at zero; the consumer takes one before reading
//! - **writer lock** starts at one; serializes producers on the write cursor

use crate::error::ChannelError;
use crate::names::ResourceNames;
use crate::semaphore::NamedSemaphore;

#[derive(Debug)]
pub struct SemaphoreGate {
    pub(crate) free: NamedSemaphore,
    pub(crate) used: NamedSemaphore,
    pub(crate) writer: NamedSemaphore,
}

impl SemaphoreGate {
    /// Create all three semaphores; on failure none are left behind
    pub fn create(names: &ResourceNames, capacity: u32) -> Result<Self, ChannelError> {
        let mut created: Vec<&str> = Vec::with_capacity(3);
        let result = (|| -> Result<Self, ChannelError> {
            let free = NamedSemaphore::create(&names.free_slots, capacity)?;
            created.push(&names.free_slots);
            let used = NamedSemaphore::create(&names.used_slots, 0)?;
            created.push(&names.used_slots);
            let writer = NamedSemaphore::create(&names.writer_lock, 1)?;
            Ok(Self { free, used, writer })
        })();

        if result.is_err() {
            for name in created {
                let _ = NamedSemaphore::unlink(name);
            }
        }
        result
    }

    /// Open the semaphores of a running instance
    pub fn open(names: &ResourceNames) -> Result<Self, ChannelError> {
        Ok(Self {
            free: NamedSemaphore::open(&names.free_slots)?,
            used: NamedSemaphore::open(&names.used_slots)?,
            writer: NamedSemaphore::open(&names.writer_lock)?,
        })
    }

    /// Unlink all three names, trying each even if an earlier one fails
    ///
    /// Returns how many names existed.
    pub fn unlink(names: &ResourceNames) -> Result<usize, ChannelError> {
        let mut removed = 0;
        let mut first_error = None;
        for name in names.semaphores() {
            match NamedSemaphore::unlink(name) {
                Ok(true) => removed += 1,
                Ok(false) => {}
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(removed),
        }
    }

    pub fn free_slots(&self) -> &NamedSemaphore {
        &self.free
    }

    pub fn used_slots(&self) -> &NamedSemaphore {
        &self.used
    }

    pub fn writer_lock(&self) -> &NamedSemaphore {
        &self.writer
    }
}

/// Held writer lock; posted on drop if not released explicitly
pub(crate) struct WriterLock<'a> {
    sem: &'a NamedSemaphore,
    held: bool,
}

impl<'a> WriterLock<'a> {
    /// Wrap a writer-lock permit the caller has already taken
    pub(crate) fn held(sem: &'a NamedSemaphore) -> Self {
        Self { sem, held: true }
    }

    pub(crate) fn release(mut self) -> Result<(), ChannelError> {
        self.held = false;
        self.sem.post()
    }
}

impl Drop for WriterLock<'_> {
    fn drop(&mut self) {
        if self.held {
            if let Err(e) = self.sem.post() {
                tracing::error!(error = %e, "failed to release writer lock");
            }
        }
    }
}
