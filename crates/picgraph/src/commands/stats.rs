//! Statistics command.

use std::path::Path;

use picgraph::{AnalysisOptions, ExportConfig, ProgramStats, analyze_listing};
use tracing::error;

use crate::cli::{EXIT_FAILURE, EXIT_SUCCESS};
use crate::terminal::{self, Alignment, Table};

/// Handle the `stats` command.
pub fn cmd_stats(input: &Path, options: &AnalysisOptions) -> i32 {
    let prefix = ExportConfig::default().prefix;
    let stats = match analyze_listing(input, options).and_then(|pipeline| pipeline.stats(&prefix)) {
        Ok(stats) => stats,
        Err(err) => {
            error!(error = %err, "analysis failed");
            terminal::error(&err.to_string());
            return EXIT_FAILURE;
        }
    };

    stats_table(&stats).print();
    terminal::info(&format!(
        "{} instructions, {} functions, {} blocks",
        stats.instructions,
        stats.functions.len(),
        stats.blocks
    ));
    EXIT_SUCCESS
}

fn stats_table(stats: &ProgramStats) -> Table {
    let mut table = Table::new(&["Function", "Entry", "Blocks", "Callees"]).with_alignments(vec![
        Alignment::Left,
        Alignment::Left,
        Alignment::Right,
        Alignment::Right,
    ]);
    for function in &stats.functions {
        table.add_row(vec![
            function.name.clone(),
            format!("{:#06x}", function.entry),
            function.blocks.to_string(),
            function.callees.to_string(),
        ]);
    }
    table
}
