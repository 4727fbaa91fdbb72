// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared helpers for process-level tests.

#![allow(dead_code)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::path::Path;
use std::process::{Child, Command, ExitStatus, Output, Stdio};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

pub const TRIANGLE: &[&str] = &["0-1", "1-2", "2-0"];
pub const K4: &[&str] = &["0-1", "0-2", "0-3", "1-2", "1-3", "2-3"];

/// Where Linux exposes POSIX shared memory and named semaphores
const SHM_DIR: &str = "/dev/shm";

/// Instance name unique across parallel tests and test binaries.
pub fn unique_instance(prefix: &str) -> String {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_nanos();
    let counter = COUNTER.fetch_add(1, Ordering::SeqCst);
    format!(
        "tri-cli-{}-{}-{}-{}",
        prefix,
        std::process::id(),
        timestamp % 1_000_000,
        counter
    )
}

pub fn supervisor(instance: &str) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_supervisor"));
    cmd.args(["--instance", instance, "--grace", "2s"])
        .env_remove("TRI_INSTANCE")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    cmd
}

pub fn generator(instance: &str, edges: &[&str]) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_generator"));
    cmd.args(["--instance", instance])
        .args(edges)
        .env_remove("TRI_INSTANCE")
        .stdout(Stdio::null())
        .stderr(Stdio::piped());
    cmd
}

/// Block until the supervisor's region exists and is sized.
pub fn wait_for_instance(instance: &str) {
    let region = Path::new(SHM_DIR).join(format!("{}_shm", instance));
    let deadline = Instant::now() + Duration::from_secs(10);
    while Instant::now() < deadline {
        let sized = std::fs::metadata(&region)
            .map(|m| m.len() > 0)
            .unwrap_or(false);
        if sized {
            // The header magic is written right after sizing
            std::thread::sleep(Duration::from_millis(50));
            return;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    panic!("supervisor for {} never created its region", instance);
}

/// Names under /dev/shm that still belong to `instance`.
pub fn leftovers(instance: &str) -> Vec<String> {
    std::fs::read_dir(SHM_DIR)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .filter(|name| name.contains(&format!("{}_", instance)))
                .collect()
        })
        .unwrap_or_default()
}

pub fn wait_with_timeout(child: &mut Child, timeout: Duration) -> ExitStatus {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait().expect("Failed to poll child") {
            return status;
        }
        if Instant::now() >= deadline {
            let _ = child.kill();
            panic!("process did not exit within {:?}", timeout);
        }
        std::thread::sleep(Duration::from_millis(20));
    }
}

/// Wait for a child and collect its output, killing it on timeout.
pub fn output_with_timeout(mut child: Child, timeout: Duration) -> Output {
    wait_with_timeout(&mut child, timeout);
    child.wait_with_output().expect("Failed to collect output")
}
