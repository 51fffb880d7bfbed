//! GraphProject - writes every graph of an analysis to an output directory.
//!
//! Function graphs render in parallel over the read-only analysis result;
//! files are written afterwards in function order.

use std::fs;
use std::path::PathBuf;

use picgraph_cfg::{CfgResult, Program};
use rayon::prelude::*;
use rustc_hash::FxHashSet;
use tracing::{debug, info, trace};

use crate::{Annotator, DotGraph, EmitError, ExportConfig, Result, call_graph, function_graph};

/// Files written by an export.
#[derive(Clone, Debug, Default)]
pub struct ExportSummary {
    /// Function graph files, in function order.
    pub function_graphs: Vec<PathBuf>,
    /// Call graph file.
    pub call_graph: PathBuf,
}

impl ExportSummary {
    /// Total number of files written.
    pub fn file_count(&self) -> usize {
        self.function_graphs.len() + 1
    }
}

/// Graph export project.
pub struct GraphProject<'a> {
    program: &'a Program,
    result: &'a CfgResult,
    config: ExportConfig,
}

impl<'a> GraphProject<'a> {
    pub const fn new(program: &'a Program, result: &'a CfgResult, config: ExportConfig) -> Self {
        Self {
            program,
            result,
            config,
        }
    }

    pub const fn config(&self) -> &ExportConfig {
        &self.config
    }

    fn annotator(&self) -> Annotator<'_> {
        Annotator::new(self.program, &self.config.prefix)
    }

    /// Render one graph per function that has an entry block, paired with
    /// the function's entry address.
    pub fn render_function_graphs(&self) -> Result<Vec<(u16, DotGraph)>> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.jobs)
            .build()?;
        let annotator = self.annotator();

        let graphs: Vec<(u16, DotGraph)> = pool.install(|| {
            self.result
                .functions
                .par_iter()
                .filter_map(|function| {
                    function_graph(&annotator, self.result, function, &self.config)
                        .map(|graph| (function.entry, graph))
                })
                .collect()
        });
        debug!(graphs = graphs.len(), threads = pool.current_num_threads(), "rendered function graphs");
        Ok(graphs)
    }

    /// Render the program-wide call graph.
    pub fn render_call_graph(&self) -> DotGraph {
        call_graph(&self.annotator(), self.result, &self.config)
    }

    fn write_graph(&self, graph: &DotGraph, stem: &str) -> Result<PathBuf> {
        let path = self.config.graph_path(stem);
        trace!(path = %path.display(), "writing graph");
        fs::write(&path, graph.to_string()).map_err(|source| EmitError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }

    /// Render and write every graph. Creates the output directory if missing.
    pub fn write_all(&self) -> Result<ExportSummary> {
        let dir = &self.config.output_dir;
        fs::create_dir_all(dir).map_err(|source| EmitError::Io {
            path: dir.clone(),
            source,
        })?;

        let graphs = self.render_function_graphs()?;
        let call = self.render_call_graph();
        let mut stems = FileStems::default();
        let call_stem = stems.claim(&call.name, None);

        let function_graphs = graphs
            .iter()
            .map(|(entry, graph)| self.write_graph(graph, &stems.claim(&graph.name, Some(*entry))))
            .collect::<Result<Vec<_>>>()?;
        let call_graph = self.write_graph(&call, &call_stem)?;

        info!(
            graphs = function_graphs.len() + 1,
            dir = %dir.display(),
            "wrote graphs"
        );
        Ok(ExportSummary {
            function_graphs,
            call_graph,
        })
    }
}

/// File stems already used by one export.
///
/// Two functions can share a display name (the same alias on two entries).
/// The second one gets its entry address appended.
#[derive(Default)]
struct FileStems {
    claimed: FxHashSet<String>,
}

impl FileStems {
    fn claim(&mut self, name: &str, entry: Option<u16>) -> String {
        let mut stem = ExportConfig::file_stem(name);
        if self.claimed.contains(&stem) {
            if let Some(entry) = entry {
                stem = format!("{stem}_{entry:04x}");
            }
            while self.claimed.contains(&stem) {
                stem.push('_');
            }
            debug!(graph = name, stem = %stem, "graph file name already used");
        }
        self.claimed.insert(stem.clone());
        stem
    }
}
