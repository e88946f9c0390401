//! CLI command implementations
//!
//! Each subcommand has its own module with:
//! - Args struct for command-line arguments
//! - run() function to execute the command

pub mod bandit;
pub mod decide;
pub mod explain;
pub mod learn;
pub mod serve;

use crate::app::AppContext;
use crate::cli::Commands;
use crate::error::Result;

/// Dispatch a command to its handler
pub fn run(ctx: &AppContext, command: &Commands) -> Result<()> {
    match command {
        Commands::Decide(args) => decide::run(ctx, args),
        Commands::Learn(args) => learn::run(ctx, args),
        Commands::Explain(args) => explain::run(ctx, args),
        Commands::Stats(args) => bandit::stats(ctx, args),
        Commands::Reset(args) => bandit::reset(ctx, args),
        Commands::Serve(args) => serve::run(ctx, args),
    }
}
