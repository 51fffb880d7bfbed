//! Command implementations.
//!
//! Each submodule handles one CLI command.

mod annotate;
mod graph;
mod stats;

use crate::cli::{Cli, Commands};

/// Dispatch CLI command to the appropriate handler.
pub fn run_command(cli: &Cli) -> i32 {
    match &cli.command {
        Commands::Graph {
            input,
            output,
            jobs,
            tables,
        } => graph::cmd_graph(input, output, *jobs, &tables.options()),
        Commands::Annotate { input, tables } => annotate::cmd_annotate(input, &tables.options()),
        Commands::Stats { input, tables } => stats::cmd_stats(input, &tables.options()),
    }
}
