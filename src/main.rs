//! smartbot - SMART Recovery tool recommender CLI
//!
//! Decide, learn and explain over a persisted LinUCB bandit.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use smartbot::Result;
use smartbot::app::{AppContext, robot_mode_requested};
use smartbot::cli::Cli;
use smartbot::cli::output::robot_error;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let robot_mode = robot_mode_requested(&cli);
    init_tracing(&cli, robot_mode);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if robot_mode {
                // Robot mode: JSON error output to stdout
                println!(
                    "{}",
                    serde_json::to_string(&robot_error(&e)).unwrap_or_default()
                );
            } else {
                eprintln!("Error: {e}");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let ctx = AppContext::from_cli(cli)?;
    smartbot::cli::commands::run(&ctx, &cli.command)
}

fn init_tracing(cli: &Cli, robot_mode: bool) {
    if cli.quiet {
        return;
    }

    let filter = match cli.verbose {
        0 => "warn,smartbot=info",
        1 => "info,smartbot=debug",
        2 => "debug,smartbot=trace",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    if robot_mode {
        // JSON logging for robot mode
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
