// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fixed-capacity ring of candidate slots laid out in a shared region
//!
//! ```text
//! +----------------------------------------------+
//! | RingHeader                                   |
//! |   magic, capacity                            |
//! |   stop                 (supervisor writes)   |
//! |   registered, detached (generators write)    |
//! |   read_pos             (supervisor writes)   |
//! |   write_pos            (writer-lock holder)  |
//! |   published, consumed  (statistics)          |
//! +----------------------------------------------+
//! | slot[0] .. slot[capacity - 1]                |
//! |   CandidateSolution, fixed size              |
//! +----------------------------------------------+
//! ```
//!
//! The ring does no blocking of its own. Exclusive access to a slot comes
//! from the semaphore protocol in [`crate::channel`].

use crate::error::ChannelError;
use crate::region::SharedRegion;
use std::mem::size_of;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use tri_core::CandidateSolution;

/// Slot count used when none is configured
pub const DEFAULT_CAPACITY: u32 = 32;

/// Upper bound on configurable slot count
pub const MAX_CAPACITY: u32 = 4096;

/// Written last during initialization; "TRIC"
const MAGIC: u32 = 0x5452_4943;

/// Control block at the start of the shared region
#[derive(Debug)]
#[repr(C)]
pub struct RingHeader {
    magic: AtomicU32,
    capacity: AtomicU32,
    stop: AtomicBool,
    registered: AtomicU32,
    detached: AtomicU32,
    read_pos: AtomicU32,
    write_pos: AtomicU32,
    published: AtomicU64,
    consumed: AtomicU64,
}

impl RingHeader {
    pub fn capacity(&self) -> u32 {
        self.capacity.load(Ordering::Acquire)
    }

    pub fn stop_requested(&self) -> bool {
        self.stop.load(Ordering::Acquire)
    }

    pub(crate) fn request_stop(&self) {
        self.stop.store(true, Ordering::Release);
    }

    /// Generators that have attached since creation
    pub fn registered(&self) -> u32 {
        self.registered.load(Ordering::Acquire)
    }

    /// Generators that have acknowledged detachment
    pub fn detached(&self) -> u32 {
        self.detached.load(Ordering::Acquire)
    }

    /// Generators attached but not yet detached
    pub fn attached(&self) -> u32 {
        self.registered().saturating_sub(self.detached())
    }

    pub(crate) fn register(&self) -> u32 {
        self.registered.fetch_add(1, Ordering::AcqRel) + 1
    }

    pub(crate) fn acknowledge_detach(&self) {
        self.detached.fetch_add(1, Ordering::AcqRel);
    }

    pub fn read_pos(&self) -> u32 {
        self.read_pos.load(Ordering::Acquire)
    }

    pub fn write_pos(&self) -> u32 {
        self.write_pos.load(Ordering::Acquire)
    }

    pub fn published(&self) -> u64 {
        self.published.load(Ordering::Acquire)
    }

    pub fn consumed(&self) -> u64 {
        self.consumed.load(Ordering::Acquire)
    }

    /// Entries published but not yet consumed
    pub fn in_flight(&self) -> u64 {
        self.published().saturating_sub(self.consumed())
    }
}

/// A ring view over a mapped region
#[derive(Debug)]
pub struct Ring {
    region: SharedRegion,
    capacity: u32,
}

impl Ring {
    /// Bytes needed for a ring of `capacity` slots
    pub fn required_len(capacity: u32) -> usize {
        size_of::<RingHeader>() + capacity as usize * size_of::<CandidateSolution>()
    }

    pub fn validate_capacity(capacity: u32) -> Result<u32, ChannelError> {
        if capacity == 0 || capacity > MAX_CAPACITY {
            return Err(ChannelError::InvalidCapacity(capacity));
        }
        Ok(capacity)
    }

    /// Lay out a fresh ring in `region` and publish its header
    pub fn initialize(region: SharedRegion, capacity: u32) -> Result<Self, ChannelError> {
        let capacity = Self::validate_capacity(capacity)?;
        if region.len() < Self::required_len(capacity) {
            return Err(ChannelError::InvalidCapacity(capacity));
        }

        let ring = Self { region, capacity };
        let header = ring.header();
        header.capacity.store(capacity, Ordering::Relaxed);
        header.stop.store(false, Ordering::Relaxed);
        header.registered.store(0, Ordering::Relaxed);
        header.detached.store(0, Ordering::Relaxed);
        header.read_pos.store(0, Ordering::Relaxed);
        header.write_pos.store(0, Ordering::Relaxed);
        header.published.store(0, Ordering::Relaxed);
        header.consumed.store(0, Ordering::Relaxed);
        header.magic.store(MAGIC, Ordering::Release);
        Ok(ring)
    }

    /// View a ring previously initialized by another process
    pub fn attach(region: SharedRegion) -> Result<Self, ChannelError> {
        let not_ready = || ChannelError::NotReady {
            name: region.name().unwrap_or("anonymous").to_string(),
        };
        if region.len() < size_of::<RingHeader>() {
            return Err(not_ready());
        }

        // SAFETY: the region is large enough for a header and every bit
        // pattern is a valid RingHeader (all fields are atomics).
        let header = unsafe { &*(region.as_ptr() as *const RingHeader) };
        if header.magic.load(Ordering::Acquire) != MAGIC {
            return Err(not_ready());
        }
        let capacity = header.capacity();
        if Self::validate_capacity(capacity).is_err() || region.len() < Self::required_len(capacity)
        {
            return Err(not_ready());
        }

        Ok(Self { region, capacity })
    }

    pub fn header(&self) -> &RingHeader {
        // SAFETY: construction checked the region holds a header; the mapping
        // is page-aligned and lives as long as self.
        unsafe { &*(self.region.as_ptr() as *const RingHeader) }
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn region(&self) -> &SharedRegion {
        &self.region
    }

    fn slot(&self, index: u32) -> *mut CandidateSolution {
        debug_assert!(index < self.capacity);
        // SAFETY: index < capacity and the region holds `capacity` slots after
        // the header; header size keeps slots 4-byte aligned.
        unsafe {
            self.region
                .as_ptr()
                .add(size_of::<RingHeader>())
                .cast::<CandidateSolution>()
                .add(index as usize)
        }
    }

    /// Copy `solution` into the slot at the write cursor and advance it
    ///
    /// # Safety
    ///
    /// The caller must hold a free-slot permit and the writer lock, so the
    /// slot is unread and no other producer moves the write cursor.
    pub(crate) unsafe fn write_next(&self, solution: &CandidateSolution) -> u32 {
        let header = self.header();
        let pos = header.write_pos.load(Ordering::Acquire) % self.capacity;
        // SAFETY: the caller guarantees exclusive access to this slot.
        unsafe { self.slot(pos).write_volatile(*solution) };
        header
            .write_pos
            .store((pos + 1) % self.capacity, Ordering::Release);
        header.published.fetch_add(1, Ordering::AcqRel);
        pos
    }

    /// Copy out the slot at the read cursor and advance it
    ///
    /// # Safety
    ///
    /// The caller must be the only consumer and hold a used-slot permit, so
    /// the slot has been fully published.
    pub(crate) unsafe fn read_next(&self) -> (u32, CandidateSolution) {
        let header = self.header();
        let pos = header.read_pos.load(Ordering::Acquire) % self.capacity;
        // SAFETY: the caller guarantees the slot is published and unread.
        let solution = unsafe { self.slot(pos).read_volatile() };
        header
            .read_pos
            .store((pos + 1) % self.capacity, Ordering::Release);
        header.consumed.fetch_add(1, Ordering::AcqRel);
        (pos, solution)
    }
}

#[cfg(test)]
#[path = "ring_tests.rs"]
mod tests;
