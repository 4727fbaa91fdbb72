// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! supervisor - consume candidate 3-colorings and report the best one

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tri::output::{self, OutputFormat, SupervisorSummary};
use tri::{logging, signals, TriError};
use tri_core::CancellationToken;
use tri_engine::{parse_duration, ConfigFile, Supervisor, SupervisorConfig};

#[derive(Parser)]
#[command(
    name = "supervisor",
    version,
    about = "Create the shared channel, consume candidate colorings, report the best"
)]
struct Args {
    /// Stop after consuming more than N solutions
    #[arg(short = 'n', long, value_name = "N")]
    limit: Option<u64>,

    /// Wait before consuming (seconds, or a duration like 500ms)
    #[arg(short = 'w', long, value_name = "DURATION", value_parser = parse_duration)]
    delay: Option<Duration>,

    /// Number of ring slots
    #[arg(long, value_name = "SLOTS")]
    capacity: Option<u32>,

    /// Instance name shared with the generators
    #[arg(long, env = tri::INSTANCE_ENV)]
    instance: Option<String>,

    /// How long shutdown waits for generators to detach
    #[arg(long, value_name = "DURATION", value_parser = parse_duration)]
    grace: Option<Duration>,

    /// Remove names left behind by a crashed supervisor first
    #[arg(long)]
    reclaim: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// TOML file with a [supervisor] table
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

impl Args {
    fn apply(&self, config: &mut SupervisorConfig) {
        if let Some(limit) = self.limit {
            config.limit = Some(limit);
        }
        if let Some(delay) = self.delay {
            config.delay = delay;
        }
        if let Some(capacity) = self.capacity {
            config.capacity = capacity;
        }
        if let Some(instance) = &self.instance {
            config.instance = instance.clone();
        }
        if let Some(grace) = self.grace {
            config.shutdown_grace = grace;
        }
        if self.reclaim {
            config.reclaim_stale = true;
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    let _guard = match logging::init(args.log_file.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprint!("{}", TriError::new(format!("{:#}", e)));
            return ExitCode::FAILURE;
        }
    };

    let mut config = SupervisorConfig::default();
    match run(&args, &mut config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %format!("{:#}", e), "supervisor failed");
            eprint!("{}", TriError::from_anyhow(&e, &config.instance));
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args, config: &mut SupervisorConfig) -> Result<()> {
    *config = ConfigFile::load_optional(args.config.as_deref())?.supervisor;
    args.apply(config);

    let token = CancellationToken::new();
    signals::install(&token)?;

    let mut supervisor = Supervisor::create(config.clone())?;
    let run = supervisor.run(&token);
    let shutdown = supervisor.shutdown();
    let summary = SupervisorSummary {
        run: run?,
        shutdown: shutdown?,
    };

    if summary.run.interrupted() {
        eprintln!("Interrupted; reporting the best solution received so far.");
    }
    if summary.shutdown.still_attached > 0 {
        eprintln!(
            "warning: {} generator(s) had not detached when shared resources were removed",
            summary.shutdown.still_attached
        );
    }
    output::print(&summary, args.format);
    Ok(())
}
