// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Supervisor role: own the channel, consume candidates, track the best
//!
//! Shutdown is two-phase. The stop flag is set and one free-slot permit is
//! posted per attached generator so none stays blocked; the supervisor then
//! waits for detach acknowledgments before unlinking every shared name.

use crate::config::SupervisorConfig;
use crate::error::EngineError;
use crate::outcome::{Outcome, RunReport, ShutdownReport, StopReason};
use crate::tracker::{SolutionTracker, Verdict};
use std::time::{Duration, Instant};
use tri_channel::ChannelOwner;
use tri_core::CancellationToken;

pub struct Supervisor {
    config: SupervisorConfig,
    channel: ChannelOwner,
    tracker: SolutionTracker,
}

impl Supervisor {
    /// Create the shared channel; generators may attach once this returns
    pub fn create(config: SupervisorConfig) -> Result<Self, EngineError> {
        let names = config.validate()?;
        if config.reclaim_stale {
            ChannelOwner::reclaim(&names)?;
        }
        let channel =
            ChannelOwner::create(names, config.capacity)?.with_poll_interval(config.poll_interval);

        tracing::info!(
            instance = %config.instance,
            capacity = config.capacity,
            limit = ?config.limit,
            "supervisor ready"
        );
        Ok(Self {
            config,
            channel,
            tracker: SolutionTracker::new(),
        })
    }

    pub fn config(&self) -> &SupervisorConfig {
        &self.config
    }

    pub fn channel(&self) -> &ChannelOwner {
        &self.channel
    }

    pub fn tracker(&self) -> &SolutionTracker {
        &self.tracker
    }

    /// Consume candidates until a perfect one arrives, the limit is passed,
    /// or `token` is cancelled
    ///
    /// The stop flag is set before returning, also on error.
    pub fn run(&mut self, token: &CancellationToken) -> Result<RunReport, EngineError> {
        let result = self.consume_loop(token);
        self.channel.request_stop();
        let stop = result?;

        let outcome = Outcome::from_best(self.tracker.best());
        tracing::info!(
            consumed = self.tracker.consumed(),
            stop = ?stop,
            "supervisor finished consuming"
        );
        Ok(RunReport {
            outcome,
            stop,
            consumed: self.tracker.consumed(),
        })
    }

    fn consume_loop(&mut self, token: &CancellationToken) -> Result<StopReason, EngineError> {
        if !self.delay(token) {
            return Ok(interrupted(token));
        }

        loop {
            if token.is_cancelled() {
                return Ok(interrupted(token));
            }
            if self.tracker.limit_reached(self.config.limit) {
                return Ok(StopReason::LimitReached);
            }

            let Some(candidate) = self.channel.consume(token)? else {
                return Ok(interrupted(token));
            };
            match self.tracker.observe(&candidate) {
                Verdict::Perfect => {
                    tracing::info!("found a valid 3-coloring");
                    return Ok(StopReason::Perfect);
                }
                Verdict::Improved { conflicts } => {
                    tracing::info!(conflicts, edges = %candidate, "new best solution");
                }
                Verdict::Unchanged => {}
            }
        }
    }

    /// Sleep through the start delay; false if cancelled first
    fn delay(&self, token: &CancellationToken) -> bool {
        if self.config.delay.is_zero() {
            return true;
        }
        tracing::debug!(delay = ?self.config.delay, "delaying first consume");

        // An unrepresentable deadline waits until cancelled
        let deadline = Instant::now().checked_add(self.config.delay);
        loop {
            if token.is_cancelled() {
                return false;
            }
            let remaining = match deadline {
                Some(deadline) => deadline.saturating_duration_since(Instant::now()),
                None => self.config.delay,
            };
            if remaining == Duration::ZERO {
                return true;
            }
            std::thread::sleep(remaining.min(self.config.poll_interval));
        }
    }

    /// Stop generators, wait for them to detach, and unlink every name
    pub fn shutdown(self) -> Result<ShutdownReport, EngineError> {
        self.channel.request_stop();
        let released = self.channel.release_producers()?;
        let still_attached = self.channel.await_detached(self.config.shutdown_grace);
        if still_attached > 0 {
            tracing::warn!(
                still_attached,
                grace = ?self.config.shutdown_grace,
                "generators did not detach before teardown"
            );
        }

        self.channel.teardown()?;
        Ok(ShutdownReport {
            released,
            still_attached,
        })
    }
}

fn interrupted(token: &CancellationToken) -> StopReason {
    StopReason::Interrupted {
        reason: token.reason().unwrap_or("cancelled").to_string(),
    }
}

#[cfg(test)]
#[path = "supervisor_tests.rs"]
mod tests;
