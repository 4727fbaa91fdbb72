// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! tri-channel: bounded multi-producer/single-consumer channel in shared memory
//!
//! This crate provides:
//! - **SharedRegion** - `shm_open` + `mmap` backed memory
//! - **NamedSemaphore** - POSIX named semaphores with an interruptible acquire
//! - **Ring** - fixed-capacity slot ring laid out in a region
//! - **SemaphoreGate** - free/used/writer semaphores over the ring
//! - **ChannelOwner / ChannelProducer** - the consume and publish protocols

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod channel;
pub mod error;
pub mod gate;
pub mod names;
pub mod region;
pub mod ring;
pub mod semaphore;

pub use channel::{ChannelOwner, ChannelProducer, Publish, DEFAULT_POLL_INTERVAL};
pub use error::ChannelError;
pub use gate::SemaphoreGate;
pub use names::{ResourceNames, DEFAULT_INSTANCE};
pub use region::SharedRegion;
pub use ring::{Ring, RingHeader, DEFAULT_CAPACITY, MAX_CAPACITY};
pub use semaphore::{Acquire, NamedSemaphore, WaitStatus};
