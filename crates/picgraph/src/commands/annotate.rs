//! Annotated listing command.

use std::io::{self, BufWriter, Write};
use std::path::Path;

use picgraph::{AnalysisOptions, ExportConfig, Pipeline};
use tracing::error;

use crate::cli::{EXIT_FAILURE, EXIT_SUCCESS};
use crate::terminal;

/// Handle the `annotate` command.
pub fn cmd_annotate(input: &Path, options: &AnalysisOptions) -> i32 {
    let result = Pipeline::load(input, options).and_then(|pipeline| {
        let prefix = ExportConfig::default().prefix;
        let mut out = BufWriter::new(io::stdout().lock());
        pipeline.write_listing(&mut out, &prefix)?;
        out.flush()?;
        Ok(())
    });

    match result {
        Ok(()) => EXIT_SUCCESS,
        Err(err) => {
            error!(error = %err, "annotation failed");
            terminal::error(&err.to_string());
            EXIT_FAILURE
        }
    }
}
