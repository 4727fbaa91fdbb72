// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! SIGINT/SIGTERM handling
//!
//! The handler only cancels the token. Every blocking wait in the pipeline
//! is timed, so the main loop sees the cancellation within one poll interval.

use tri_core::CancellationToken;

pub fn install(token: &CancellationToken) -> Result<(), ctrlc::Error> {
    let token = token.clone();
    ctrlc::set_handler(move || {
        tracing::info!("termination signal received");
        token.cancel("signal");
    })
}
