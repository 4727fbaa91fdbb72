// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! generator - publish random 3-colorings of a graph to a running supervisor

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tri::{logging, signals, TriError};
use tri_core::{CancellationToken, Graph};
use tri_engine::{ConfigFile, EngineError, Generator, GeneratorConfig};

#[derive(Parser)]
#[command(
    name = "generator",
    version,
    about = "Color a graph at random and publish candidates with few conflicts"
)]
struct Args {
    /// Graph edges, e.g. 0-1 1-2 2-0
    #[arg(value_name = "EDGE", required = true)]
    edges: Vec<String>,

    /// Instance name of the supervisor to attach to
    #[arg(long, env = tri::INSTANCE_ENV)]
    instance: Option<String>,

    /// Seed for reproducible colorings
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// TOML file with a [generator] table
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
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

    let mut config = GeneratorConfig::default();
    match run(&args, &mut config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %format!("{:#}", e), "generator failed");
            eprint!("{}", TriError::from_anyhow(&e, &config.instance));
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args, config: &mut GeneratorConfig) -> Result<()> {
    // Input errors are fatal before any shared resource is touched
    let graph = Graph::parse(&args.edges).map_err(EngineError::from)?;

    *config = ConfigFile::load_optional(args.config.as_deref())?.generator;
    if let Some(instance) = &args.instance {
        config.instance = instance.clone();
    }
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }

    let token = CancellationToken::new();
    signals::install(&token)?;

    let mut generator = Generator::attach(config, graph)?;
    generator.run(&token)?;
    Ok(())
}
