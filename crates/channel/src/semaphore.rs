// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Named POSIX semaphores
//!
//! Thin RAII wrapper around `sem_open` handles. Every blocking wait in the
//! pipeline goes through [`NamedSemaphore::acquire`], which polls with a
//! bounded deadline so cancellation and stop requests are noticed even when
//! a signal handler restarts the interrupted call.

use crate::error::ChannelError;
use nix::errno::Errno;
use std::ffi::CString;
use std::ptr::NonNull;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Permission bits for semaphores created by the supervisor
const MODE: libc::mode_t = 0o600;

/// Longest single timed wait; callers that need longer loop
pub const MAX_WAIT: Duration = Duration::from_secs(24 * 60 * 60);

/// Result of one timed wait
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WaitStatus {
    Acquired,
    TimedOut,
    Interrupted,
}

/// Result of an interruptible blocking acquire
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Acquire {
    /// One permit was taken
    Acquired,
    /// The abort predicate fired before a permit was available
    Aborted,
}

/// Handle to a named semaphore; closed on drop, never unlinked implicitly
#[derive(Debug)]
pub struct NamedSemaphore {
    sem: NonNull<libc::sem_t>,
    name: String,
}

// SAFETY: POSIX semaphore operations are thread-safe and the handle stays
// valid until sem_close in Drop.
unsafe impl Send for NamedSemaphore {}
// SAFETY: see above; all methods take &self and only call thread-safe sem_* functions.
unsafe impl Sync for NamedSemaphore {}

impl NamedSemaphore {
    /// Create a new semaphore, failing if the name is taken
    pub fn create(name: &str, initial: u32) -> Result<Self, ChannelError> {
        Self::open_with(name, libc::O_CREAT | libc::O_EXCL, initial, "sem_open(create)")
    }

    /// Open an existing semaphore; never creates one
    pub fn open(name: &str) -> Result<Self, ChannelError> {
        Self::open_with(name, 0, 0, "sem_open")
    }

    fn open_with(
        name: &str,
        oflag: libc::c_int,
        initial: u32,
        op: &'static str,
    ) -> Result<Self, ChannelError> {
        let c_name =
            CString::new(name).map_err(|_| ChannelError::InvalidName(name.to_string()))?;

        // SAFETY: c_name is NUL-terminated and outlives the call. The mode and
        // initial value are only read when O_CREAT is set; variadic arguments
        // are promoted to unsigned int as sem_open expects.
        let sem = unsafe {
            libc::sem_open(
                c_name.as_ptr(),
                oflag,
                MODE as libc::c_uint,
                initial as libc::c_uint,
            )
        };
        if sem == libc::SEM_FAILED {
            return Err(ChannelError::from_open(op, name, Errno::last()));
        }

        let sem = NonNull::new(sem).ok_or_else(|| ChannelError::Resource {
            op,
            name: name.to_string(),
            errno: Errno::EINVAL,
        })?;

        Ok(Self {
            sem,
            name: name.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Release one permit
    pub fn post(&self) -> Result<(), ChannelError> {
        // SAFETY: self.sem is a live handle returned by sem_open.
        let rc = unsafe { libc::sem_post(self.sem.as_ptr()) };
        if rc == -1 {
            return Err(self.sync_error("post", Errno::last()));
        }
        Ok(())
    }

    /// Take a permit if one is available right now
    pub fn try_acquire(&self) -> Result<bool, ChannelError> {
        loop {
            // SAFETY: self.sem is a live handle returned by sem_open.
            let rc = unsafe { libc::sem_trywait(self.sem.as_ptr()) };
            if rc == 0 {
                return Ok(true);
            }
            match Errno::last() {
                Errno::EAGAIN => return Ok(false),
                Errno::EINTR => continue,
                errno => return Err(self.sync_error("trywait", errno)),
            }
        }
    }

    /// Wait for a permit until `timeout` elapses
    ///
    /// Timeouts above [`MAX_WAIT`] are shortened to it.
    pub fn wait_timeout(&self, timeout: Duration) -> Result<WaitStatus, ChannelError> {
        let deadline = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            + timeout.min(MAX_WAIT);
        let ts = libc::timespec {
            tv_sec: deadline.as_secs() as libc::time_t,
            tv_nsec: deadline.subsec_nanos() as libc::c_long,
        };

        // SAFETY: self.sem is a live handle and ts outlives the call.
        let rc = unsafe { libc::sem_timedwait(self.sem.as_ptr(), &ts) };
        if rc == 0 {
            return Ok(WaitStatus::Acquired);
        }
        match Errno::last() {
            Errno::ETIMEDOUT => Ok(WaitStatus::TimedOut),
            Errno::EINTR => Ok(WaitStatus::Interrupted),
            errno => Err(self.sync_error("wait", errno)),
        }
    }

    /// Block until a permit is taken or `should_abort` returns true
    ///
    /// `should_abort` is consulted before the first wait and after every
    /// timeout or interruption, at most `poll` apart. Interruptions are
    /// retried; any other wait failure is returned as [`ChannelError::Sync`].
    pub fn acquire<F>(&self, poll: Duration, mut should_abort: F) -> Result<Acquire, ChannelError>
    where
        F: FnMut() -> bool,
    {
        loop {
            if should_abort() {
                return Ok(Acquire::Aborted);
            }
            match self.wait_timeout(poll)? {
                WaitStatus::Acquired => return Ok(Acquire::Acquired),
                WaitStatus::Interrupted => {
                    tracing::trace!(semaphore = %self.name, "wait interrupted, retrying");
                }
                WaitStatus::TimedOut => {}
            }
        }
    }

    /// Current permit count
    pub fn value(&self) -> Result<u32, ChannelError> {
        let mut value: libc::c_int = 0;
        // SAFETY: self.sem is a live handle and value is a valid out pointer.
        let rc = unsafe { libc::sem_getvalue(self.sem.as_ptr(), &mut value) };
        if rc == -1 {
            return Err(self.sync_error("getvalue", Errno::last()));
        }
        // Linux reports 0 rather than a negative waiter count
        Ok(value.max(0) as u32)
    }

    /// Remove a semaphore name. Returns false if it did not exist.
    pub fn unlink(name: &str) -> Result<bool, ChannelError> {
        let c_name =
            CString::new(name).map_err(|_| ChannelError::InvalidName(name.to_string()))?;
        // SAFETY: c_name is NUL-terminated and outlives the call.
        let rc = unsafe { libc::sem_unlink(c_name.as_ptr()) };
        if rc == 0 {
            return Ok(true);
        }
        match Errno::last() {
            Errno::ENOENT => Ok(false),
            errno => Err(ChannelError::Resource {
                op: "sem_unlink",
                name: name.to_string(),
                errno,
            }),
        }
    }

    fn sync_error(&self, op: &'static str, errno: Errno) -> ChannelError {
        ChannelError::Sync {
            op,
            name: self.name.clone(),
            errno,
        }
    }
}

impl Drop for NamedSemaphore {
    fn drop(&mut self) {
        // SAFETY: self.sem came from sem_open and is closed exactly once here.
        let rc = unsafe { libc::sem_close(self.sem.as_ptr()) };
        if rc == -1 {
            tracing::warn!(semaphore = %self.name, error = %Errno::last(), "sem_close failed");
        }
    }
}

#[cfg(test)]
#[path = "semaphore_tests.rs"]
mod tests;
