//! CLI definitions and argument types.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use picgraph::{AnalysisOptions, ExportConfig};

/// Exit code for success.
pub const EXIT_SUCCESS: i32 = 0;
/// Exit code for failure.
pub const EXIT_FAILURE: i32 = 1;

#[derive(Parser)]
#[command(name = "picgraph")]
#[command(about = "Recover control flow and call graphs from PIC24 disassembly listings")]
#[command(version)]
pub struct Cli {
    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress output (only show errors)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub silent: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Default log directive for the chosen verbosity.
    pub const fn log_directive(&self) -> &'static str {
        if self.verbose {
            "picgraph=debug"
        } else if self.silent {
            "picgraph=error"
        } else {
            "picgraph=info"
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write one DOT graph per function plus the call graph
    Graph {
        /// Input disassembly listing
        #[arg(value_name = "LISTING")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = picgraph::DEFAULT_OUTPUT_DIR)]
        output: PathBuf,

        /// Number of parallel render jobs (0 = auto)
        #[arg(short = 'j', long, default_value = "0")]
        jobs: usize,

        #[command(flatten)]
        tables: TableArgs,
    },
    /// Print the listing with operand annotations
    Annotate {
        /// Input disassembly listing
        #[arg(value_name = "LISTING")]
        input: PathBuf,

        #[command(flatten)]
        tables: TableArgs,
    },
    /// Print per-function block and call counts
    Stats {
        /// Input disassembly listing
        #[arg(value_name = "LISTING")]
        input: PathBuf,

        #[command(flatten)]
        tables: TableArgs,
    },
}

/// Name table arguments shared by every command.
#[derive(Args, Clone, Debug, Default)]
pub struct TableArgs {
    /// Function alias table (`address,name` per line)
    #[arg(long, value_name = "FILE")]
    pub aliases: Option<PathBuf>,

    /// Interrupt vector table (`slot address,name` per line)
    #[arg(long, value_name = "FILE")]
    pub vectors: Option<PathBuf>,
}

impl TableArgs {
    pub fn options(&self) -> AnalysisOptions {
        AnalysisOptions {
            aliases: self.aliases.clone(),
            vectors: self.vectors.clone(),
        }
    }
}

/// Export configuration for the `graph` command.
pub fn export_config(output: &Path, jobs: usize) -> ExportConfig {
    ExportConfig::default().with_output_dir(output).with_jobs(jobs)
}
