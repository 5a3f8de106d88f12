/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! `dagsched` CLI: load a problem file, schedule it, and optionally search
//! for a better priority vector.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use dagsched::config;
use dagsched::search::{SearchDriver, DEFAULT_OUTER_ITERS};

/// Schedule a DAG operation graph onto an abstract multi-port, tiered-memory
/// processor.
#[derive(Debug, Parser)]
#[command(name = "dagsched", version, about)]
struct Cli {
    /// Path to the problem JSON file.
    problem: PathBuf,

    /// Run coordinate-descent search instead of a single forward pass.
    #[arg(long)]
    search: bool,

    /// Number of forward/backward sweep pairs when `--search` is set.
    #[arg(long, default_value_t = DEFAULT_OUTER_ITERS)]
    outer_iters: usize,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let sched_err = err
                .chain()
                .find_map(|cause| cause.downcast_ref::<dagsched::error::SchedulerError>());
            match sched_err {
                Some(sched_err) => {
                    tracing::error!(error = %sched_err, "scheduling failed");
                    ExitCode::from(sched_err.exit_code() as u8)
                }
                None => {
                    tracing::error!(error = %err, "failed to load problem");
                    ExitCode::from(1)
                }
            }
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let loaded = config::load_problem(&cli.problem)?;
    let mut order = loaded.initial_order.clone();
    let initial_makespan = loaded.program.schedule_forward(&mut order)?;

    if !cli.search {
        println!("makespan={initial_makespan} order={order:?}");
        return Ok(());
    }

    let driver = SearchDriver::new(&loaded.program, cli.outer_iters);
    let result = driver.run(&loaded.initial_order)?;
    println!(
        "initial_makespan={initial_makespan} final_makespan={} order={:?}",
        result.makespan, result.order,
    );
    Ok(())
}
