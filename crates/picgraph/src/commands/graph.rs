//! Graph export command.

use std::path::Path;

use picgraph::{AnalysisOptions, Pipeline};
use tracing::error;

use crate::cli::{EXIT_FAILURE, EXIT_SUCCESS, export_config};
use crate::terminal::{self, Spinner};

/// Handle the `graph` command.
pub fn cmd_graph(input: &Path, output: &Path, jobs: usize, options: &AnalysisOptions) -> i32 {
    let spinner = Spinner::new(format!("Analyzing {}", input.display()));

    let mut pipeline = match Pipeline::load(input, options) {
        Ok(pipeline) => pipeline,
        Err(err) => {
            error!(error = %err, "failed to load listing");
            spinner.finish_with_failure(&err.to_string());
            return EXIT_FAILURE;
        }
    };
    let functions = match pipeline.analyze() {
        Ok(result) => result.functions.len(),
        Err(err) => {
            error!(error = %err, "analysis failed");
            spinner.finish_with_failure(&err.to_string());
            return EXIT_FAILURE;
        }
    };

    spinner.set_message(format!("Writing graphs of {functions} functions"));
    match pipeline.export(export_config(output, jobs)) {
        Ok(summary) => {
            spinner.finish_with_success(&format!("Wrote {} graphs", summary.file_count()));
            terminal::path_output(output);
            EXIT_SUCCESS
        }
        Err(err) => {
            error!(error = %err, "graph export failed");
            spinner.finish_with_failure(&err.to_string());
            EXIT_FAILURE
        }
    }
}
