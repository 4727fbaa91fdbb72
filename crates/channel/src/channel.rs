// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Producer and consumer sides of the shared ring channel
//!
//! [`ChannelOwner`] is the supervisor's handle: it creates every shared
//! resource, drains the ring, and tears everything down. [`ChannelProducer`]
//! is a generator's handle: it attaches to resources that must already exist
//! and never unlinks anything.
//!
//! Publish: free slots -> writer lock -> copy + advance -> unlock -> used slots.
//! Consume: used slots -> copy + advance -> free slots.

use crate::error::ChannelError;
use crate::gate::{SemaphoreGate, WriterLock};
use crate::names::ResourceNames;
use crate::region::SharedRegion;
use crate::ring::{Ring, RingHeader};
use crate::semaphore::Acquire;
use std::time::{Duration, Instant};
use tracing::{debug, info, trace, warn};
use tri_core::{CancellationToken, CandidateSolution};

/// Longest a blocked wait goes without re-checking stop and cancellation
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Result of a publish attempt
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Publish {
    /// The candidate was copied into this slot
    Published { slot: u32 },
    /// The pipeline is stopping or this process was cancelled; nothing written
    Stopped,
}

/// Supervisor-side handle owning every shared resource of one instance
#[derive(Debug)]
pub struct ChannelOwner {
    names: ResourceNames,
    ring: Ring,
    gate: SemaphoreGate,
    poll: Duration,
    torn_down: bool,
}

impl ChannelOwner {
    /// Create the gate and the ring region for a new instance
    ///
    /// The gate is created first and the region header is published last,
    /// so a generator that can see an initialized region can also open the
    /// semaphores.
    pub fn create(names: ResourceNames, capacity: u32) -> Result<Self, ChannelError> {
        Ring::validate_capacity(capacity)?;

        let gate = SemaphoreGate::create(&names, capacity)?;
        let ring = SharedRegion::create(&names.region, Ring::required_len(capacity)).and_then(
            |region| {
                Ring::initialize(region, capacity).inspect_err(|_| {
                    let _ = SharedRegion::unlink(&names.region);
                })
            },
        );
        let ring = match ring {
            Ok(ring) => ring,
            Err(e) => {
                // Only the semaphores are ours to remove here; a region name
                // that already existed belongs to someone else
                let _ = SemaphoreGate::unlink(&names);
                return Err(e);
            }
        };

        info!(instance = %names.instance, capacity, "shared channel created");
        Ok(Self {
            names,
            ring,
            gate,
            poll: DEFAULT_POLL_INTERVAL,
            torn_down: false,
        })
    }

    /// Unlink names left behind by an instance that did not shut down cleanly
    ///
    /// Returns how many names were removed.
    pub fn reclaim(names: &ResourceNames) -> Result<usize, ChannelError> {
        let region = usize::from(SharedRegion::unlink(&names.region)?);
        let removed = region + SemaphoreGate::unlink(names)?;
        if removed > 0 {
            warn!(instance = %names.instance, removed, "reclaimed stale shared resources");
        }
        Ok(removed)
    }

    pub fn with_poll_interval(mut self, poll: Duration) -> Self {
        self.poll = poll;
        self
    }

    pub fn names(&self) -> &ResourceNames {
        &self.names
    }

    pub fn capacity(&self) -> u32 {
        self.ring.capacity()
    }

    pub fn header(&self) -> &RingHeader {
        self.ring.header()
    }

    pub fn gate(&self) -> &SemaphoreGate {
        &self.gate
    }

    /// Take the next published candidate, blocking while the ring is empty
    ///
    /// Returns `None` once `token` is cancelled.
    pub fn consume(
        &self,
        token: &CancellationToken,
    ) -> Result<Option<CandidateSolution>, ChannelError> {
        if self.gate.used.acquire(self.poll, || token.is_cancelled())? == Acquire::Aborted {
            return Ok(None);
        }

        // SAFETY: the supervisor is the only consumer and holds a used-slot
        // permit, so the slot at the read cursor is fully published.
        let (slot, solution) = unsafe { self.ring.read_next() };
        trace!(slot, conflicts = solution.conflict_count(), "consumed candidate");

        self.gate.free.post()?;
        Ok(Some(solution))
    }

    /// Set the stop flag every generator polls
    pub fn request_stop(&self) {
        self.ring.header().request_stop();
        debug!(instance = %self.names.instance, "stop flag set");
    }

    /// Post one free-slot permit per generator that may still be blocked
    ///
    /// Returns the number of permits posted.
    pub fn release_producers(&self) -> Result<u32, ChannelError> {
        let pending = self.ring.header().attached();
        for _ in 0..pending {
            self.gate.free.post()?;
        }
        debug!(pending, "released blocked generators");
        Ok(pending)
    }

    /// Wait until every registered generator has detached or `grace` expires
    ///
    /// Returns how many generators are still attached.
    pub fn await_detached(&self, grace: Duration) -> u32 {
        let deadline = Instant::now().checked_add(grace);
        let step = self.poll.min(Duration::from_millis(10));
        loop {
            let attached = self.ring.header().attached();
            let expired = deadline.is_some_and(|deadline| Instant::now() >= deadline);
            if attached == 0 || expired {
                return attached;
            }
            std::thread::sleep(step);
        }
    }

    /// Unlink every name of this instance; mappings and handles close on drop
    ///
    /// Generators that are still attached keep valid mappings until they
    /// exit, but no new generator can attach afterwards.
    pub fn teardown(mut self) -> Result<(), ChannelError> {
        self.torn_down = true;
        let region = SharedRegion::unlink(&self.names.region);
        let semaphores = SemaphoreGate::unlink(&self.names);
        info!(instance = %self.names.instance, "shared channel torn down");
        region?;
        semaphores?;
        Ok(())
    }
}

impl Drop for ChannelOwner {
    fn drop(&mut self) {
        if self.torn_down {
            return;
        }
        // Error paths still must not leak names into the next run
        self.ring.header().request_stop();
        let _ = self.release_producers();
        let _ = SharedRegion::unlink(&self.names.region);
        let _ = SemaphoreGate::unlink(&self.names);
        warn!(instance = %self.names.instance, "shared channel dropped without teardown");
    }
}

/// Generator-side handle to a running instance
#[derive(Debug)]
pub struct ChannelProducer {
    names: ResourceNames,
    ring: Ring,
    gate: SemaphoreGate,
    poll: Duration,
    detached: bool,
}

impl ChannelProducer {
    /// Attach to an existing instance and register as a producer
    ///
    /// Fails with [`ChannelError::NotFound`] when the supervisor has not
    /// created the channel yet.
    pub fn attach(names: ResourceNames) -> Result<Self, ChannelError> {
        let ring = Ring::attach(SharedRegion::open(&names.region)?)?;
        let gate = SemaphoreGate::open(&names)?;
        let registered = ring.header().register();

        debug!(instance = %names.instance, registered, "attached to shared channel");
        Ok(Self {
            names,
            ring,
            gate,
            poll: DEFAULT_POLL_INTERVAL,
            detached: false,
        })
    }

    pub fn with_poll_interval(mut self, poll: Duration) -> Self {
        self.poll = poll;
        self
    }

    pub fn names(&self) -> &ResourceNames {
        &self.names
    }

    pub fn capacity(&self) -> u32 {
        self.ring.capacity()
    }

    pub fn header(&self) -> &RingHeader {
        self.ring.header()
    }

    pub fn stop_requested(&self) -> bool {
        self.ring.header().stop_requested()
    }

    /// Copy a finished candidate into the ring
    ///
    /// Blocks while the ring is full. Returns [`Publish::Stopped`] without
    /// writing if the stop flag is set or `token` is cancelled.
    pub fn publish(
        &self,
        solution: &CandidateSolution,
        token: &CancellationToken,
    ) -> Result<Publish, ChannelError> {
        let header = self.ring.header();
        let abort = || token.is_cancelled() || header.stop_requested();

        if self.gate.free.acquire(self.poll, &abort)? == Acquire::Aborted {
            return Ok(Publish::Stopped);
        }
        // Shutdown wakes blocked producers by posting free slots; a permit
        // taken while the pipeline keeps running goes back to the ring
        if abort() {
            if !header.stop_requested() {
                self.gate.free.post()?;
            }
            return Ok(Publish::Stopped);
        }

        if self.gate.writer.acquire(self.poll, &abort)? == Acquire::Aborted {
            self.gate.free.post()?;
            return Ok(Publish::Stopped);
        }
        let lock = WriterLock::held(&self.gate.writer);
        // SAFETY: a free-slot permit and the writer lock are both held.
        let slot = unsafe { self.ring.write_next(solution) };
        lock.release()?;

        self.gate.used.post()?;
        trace!(slot, conflicts = solution.conflict_count(), "published candidate");
        Ok(Publish::Published { slot })
    }

    /// Acknowledge detachment to the supervisor; idempotent
    pub fn detach(&mut self) {
        if !self.detached {
            self.detached = true;
            self.ring.header().acknowledge_detach();
            debug!(instance = %self.names.instance, "detached from shared channel");
        }
    }
}

impl Drop for ChannelProducer {
    fn drop(&mut self) {
        self.detach();
    }
}

#[cfg(test)]
#[path = "channel_tests.rs"]
mod tests;
