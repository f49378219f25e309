//! Command-line front end for the pipeline simulator.
//!
//! Thin glue: parse arguments, initialize logging, build the pipeline
//! configuration, run to the horizon, print the report. All interesting
//! behavior lives in `latgate-components`.

use clap::error::ErrorKind;
use clap::Parser;
use latgate_components::{PipelineConfig, Simulation, StageConfig};
use latgate_core::{init_logging, init_logging_with_level, ProcessKind};
use std::process::ExitCode;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(
    name = "latgate",
    about = "Simulate a producer/dispatcher/consumer pipeline under latency-goal admission control"
)]
struct Args {
    /// Simulation horizon in seconds
    horizon_secs: u64,

    /// Producer arrival process: uniform | poisson | expdelay | capdelay
    producer_process: ProcessKind,

    /// Producer rate in requests per second
    producer_rate: u64,

    /// Dispatcher cadence process: uniform | poisson | expdelay | capdelay
    dispatcher_process: ProcessKind,

    /// Consumer service process: uniform | poisson | expdelay | capdelay
    consumer_process: ProcessKind,

    /// Consumer rate in requests per second
    consumer_rate: u64,

    /// Latency goal in microseconds
    #[arg(default_value_t = 500)]
    latency_goal_us: u64,

    /// Concurrency multiplier applied to the latency goal
    #[arg(default_value_t = 1.5)]
    goal_factor: f64,

    /// Jitter ceiling for capdelay processes
    #[arg(long, default_value_t = 3.0)]
    cap_factor: f64,

    /// Seed the stage generators for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Clock step in microseconds
    #[arg(long, default_value_t = 1)]
    quantum_us: u64,

    /// Emit a progress line roughly once per simulated second
    #[arg(short, long)]
    verbose: bool,

    /// Print the report as JSON instead of text
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let _ = err.print();
            return match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                // Missing or malformed arguments: usage already printed.
                _ => ExitCode::from(1),
            };
        }
    };

    if args.verbose {
        init_logging_with_level("debug");
    } else {
        init_logging();
    }

    let mut config = PipelineConfig::new(
        Duration::from_secs(args.horizon_secs),
        StageConfig::new(args.producer_process, args.producer_rate),
        args.dispatcher_process,
        StageConfig::new(args.consumer_process, args.consumer_rate),
    );
    config.latency_goal = Duration::from_micros(args.latency_goal_us);
    config.goal_factor = args.goal_factor;
    config.cap_factor = args.cap_factor;
    config.quantum = Duration::from_micros(args.quantum_us);
    config.seed = args.seed;
    config.progress = args.verbose;

    let mut simulation = match Simulation::new(config) {
        Ok(simulation) => simulation,
        Err(err) => {
            eprintln!("configuration error: {err}");
            return ExitCode::from(1);
        }
    };

    let report = simulation.run();

    if args.json {
        match report.to_json_pretty() {
            Ok(json) => println!("{json}"),
            Err(err) => {
                eprintln!("failed to serialize report: {err}");
                return ExitCode::from(1);
            }
        }
    } else {
        println!("{report}");
    }

    ExitCode::SUCCESS
}
