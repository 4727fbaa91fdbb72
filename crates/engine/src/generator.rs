// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Generator role: color the graph at random and publish small candidates

use crate::config::GeneratorConfig;
use crate::error::EngineError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tri_channel::{ChannelProducer, Publish};
use tri_core::{color_graph, CancellationToken, Graph};

/// Lifecycle of one generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GeneratorState {
    /// Attached, not yet looping
    Init,
    Running,
    /// Detached; never publishes again
    Stopped,
}

/// Counters for one generator run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GeneratorReport {
    /// Heuristic passes computed
    pub attempts: u64,
    pub published: u64,
    /// Candidates with more conflicts than a slot can hold
    pub discarded: u64,
}

pub struct Generator<R = StdRng> {
    graph: Graph,
    channel: ChannelProducer,
    rng: R,
    state: GeneratorState,
    report: GeneratorReport,
}

impl Generator<StdRng> {
    /// Attach to a running supervisor
    ///
    /// Fails fast when the supervisor has not created the channel yet.
    pub fn attach(config: &GeneratorConfig, graph: Graph) -> Result<Self, EngineError> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, graph, rng)
    }
}

impl<R: Rng> Generator<R> {
    pub fn with_rng(config: &GeneratorConfig, graph: Graph, rng: R) -> Result<Self, EngineError> {
        let names = config.validate()?;
        let channel = ChannelProducer::attach(names)?.with_poll_interval(config.poll_interval);

        tracing::info!(
            instance = %channel.names().instance,
            edges = graph.len(),
            nodes = graph.node_count(),
            capacity = channel.capacity(),
            "generator attached"
        );
        Ok(Self {
            graph,
            channel,
            rng,
            state: GeneratorState::Init,
            report: GeneratorReport::default(),
        })
    }

    pub fn state(&self) -> GeneratorState {
        self.state
    }

    pub fn report(&self) -> GeneratorReport {
        self.report
    }

    /// Produce candidates until the supervisor stops the pipeline or `token`
    /// is cancelled, then detach
    pub fn run(&mut self, token: &CancellationToken) -> Result<GeneratorReport, EngineError> {
        if self.state == GeneratorState::Stopped {
            return Ok(self.report);
        }
        self.transition(GeneratorState::Running);

        let result = self.produce(token);
        self.channel.detach();
        self.transition(GeneratorState::Stopped);

        result?;
        tracing::info!(
            attempts = self.report.attempts,
            published = self.report.published,
            discarded = self.report.discarded,
            "generator finished"
        );
        Ok(self.report)
    }

    fn produce(&mut self, token: &CancellationToken) -> Result<(), EngineError> {
        while !token.is_cancelled() && !self.channel.stop_requested() {
            let candidate = color_graph(&self.graph, &mut self.rng);
            self.report.attempts += 1;

            if !candidate.fits_sample() {
                self.report.discarded += 1;
                tracing::trace!(conflicts = candidate.conflict_count(), "discarded candidate");
                continue;
            }

            match self.channel.publish(&candidate, token)? {
                Publish::Published { .. } => self.report.published += 1,
                Publish::Stopped => break,
            }
        }
        Ok(())
    }

    fn transition(&mut self, next: GeneratorState) {
        tracing::debug!(from = ?self.state, to = ?next, "generator state");
        self.state = next;
    }
}

#[cfg(test)]
#[path = "generator_tests.rs"]
mod tests;
