//! Command implementations and dispatch.

pub mod compile;
pub mod config;
pub mod explain;

use std::process::ExitCode;

use super::{args::Commands, context::CommandContext};

/// Dispatches to the selected subcommand.
pub fn run(command: Commands, ctx: &CommandContext) -> ExitCode {
    match command {
        Commands::Compile(cmd) => compile::run(ctx, &cmd),
        Commands::Explain(cmd) => explain::run(ctx, &cmd),
        Commands::Config => config::run(ctx),
    }
}
