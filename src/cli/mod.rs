//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod commands;
pub mod output;

use commands::{bandit, decide, explain, learn, serve};

#[derive(Parser, Debug)]
#[command(
    name = "smartbot",
    version,
    about = "Contextual bandit that recommends SMART Recovery tools"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Machine-readable JSON output on stdout
    #[arg(long, global = true)]
    pub robot: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all logging
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Explicit config file (otherwise global + project config)
    #[arg(long, global = true, env = "SMARTBOT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Bandit state file (overrides engine.state_path)
    #[arg(long, global = true)]
    pub state: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Recommend a tool for a context
    Decide(decide::DecideArgs),

    /// Record feedback for a recommendation and update the model
    Learn(learn::LearnArgs),

    /// Explain why a tool would be recommended
    Explain(explain::ExplainArgs),

    /// Show bandit statistics
    Stats(bandit::StatsArgs),

    /// Reset bandit state to the prior
    Reset(bandit::ResetArgs),

    /// Serve decide/learn/explain as JSON-RPC over stdio
    Serve(serve::ServeArgs),
}
