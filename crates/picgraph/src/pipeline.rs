//! Analysis pipeline - listing → program → CFG → graphs.

use std::io::Write;
use std::path::{Path, PathBuf};

use picgraph_cfg::{CfgAnalyzer, CfgResult, Program};
use picgraph_emit::{Annotator, ExportConfig, ExportSummary, GraphProject};
use picgraph_listing::{NameTable, parse_listing, read_listing};
use tracing::{debug, info};

use crate::{Error, Result};

/// Input tables for an analysis.
#[derive(Clone, Debug, Default)]
pub struct AnalysisOptions {
    /// `address,name` table naming function entries.
    pub aliases: Option<PathBuf>,
    /// `address,name` table of interrupt vector slots.
    pub vectors: Option<PathBuf>,
}

impl AnalysisOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set alias table path.
    #[must_use]
    pub fn with_aliases(mut self, path: impl AsRef<Path>) -> Self {
        self.aliases = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set vector table path.
    #[must_use]
    pub fn with_vectors(mut self, path: impl AsRef<Path>) -> Self {
        self.vectors = Some(path.as_ref().to_path_buf());
        self
    }
}

/// Per-function statistics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionStats {
    pub name: String,
    pub entry: u16,
    /// Blocks reachable from the entry block.
    pub blocks: usize,
    /// Distinct callees.
    pub callees: usize,
}

/// Whole-program statistics.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProgramStats {
    pub instructions: usize,
    pub blocks: usize,
    pub functions: Vec<FunctionStats>,
}

/// Analysis pipeline.
pub struct Pipeline {
    /// Program context (instructions, memory image, names).
    pub program: Program,
    /// CFG analysis result.
    pub result: Option<CfgResult>,
}

impl Pipeline {
    /// Create a pipeline over an already built program.
    pub const fn new(program: Program) -> Self {
        Self {
            program,
            result: None,
        }
    }

    /// Read a listing and its name tables.
    ///
    /// Vectors are applied before aliases so an alias wins for the same entry.
    pub fn load(listing: impl AsRef<Path>, options: &AnalysisOptions) -> Result<Self> {
        let listing = listing.as_ref();
        info!(listing = %listing.display(), "loading listing");
        let mut program = Program::new(read_listing(listing)?);

        if let Some(path) = &options.vectors {
            debug!(path = %path.display(), "reading vector table");
            program = program.with_vectors(&NameTable::read(path)?);
        }
        if let Some(path) = &options.aliases {
            debug!(path = %path.display(), "reading alias table");
            program = program.with_aliases(&NameTable::read(path)?);
        }

        Ok(Self::new(program))
    }

    /// Build a pipeline from listing text, without name tables.
    pub fn from_source(source: &str) -> Result<Self> {
        Ok(Self::new(Program::new(parse_listing(source)?)))
    }

    /// Run CFG analysis.
    pub fn analyze(&mut self) -> Result<&CfgResult> {
        let result = CfgAnalyzer::new(&self.program).analyze()?;
        Ok(self.result.insert(result))
    }

    /// Analysis result, if [`Pipeline::analyze`] ran.
    pub fn result(&self, action: &'static str) -> Result<&CfgResult> {
        self.result.as_ref().ok_or(Error::NotAnalyzed(action))
    }

    /// Write every graph to the configured output directory.
    pub fn export(&self, config: ExportConfig) -> Result<ExportSummary> {
        let result = self.result("export")?;
        let project = GraphProject::new(&self.program, result, config);
        Ok(project.write_all()?)
    }

    /// Print the annotated listing.
    pub fn write_listing(&self, out: &mut impl Write, prefix: &str) -> Result<()> {
        Annotator::new(&self.program, prefix).write_listing(out)?;
        Ok(())
    }

    /// Collect per-function statistics.
    pub fn stats(&self, prefix: &str) -> Result<ProgramStats> {
        let result = self.result("stats")?;
        let annotator = Annotator::new(&self.program, prefix);

        let functions = result
            .functions
            .iter()
            .map(|function| FunctionStats {
                name: annotator.function_name(function.entry),
                entry: function.entry,
                blocks: result.function_blocks(function.entry).len(),
                callees: result
                    .call_graph
                    .callees(function.entry)
                    .map_or(0, |callees| callees.len()),
            })
            .collect();

        Ok(ProgramStats {
            instructions: self.program.code.len(),
            blocks: result.blocks.len(),
            functions,
        })
    }
}

/// Load and analyze a listing.
pub fn analyze_listing(listing: impl AsRef<Path>, options: &AnalysisOptions) -> Result<Pipeline> {
    let mut pipeline = Pipeline::load(listing, options)?;
    pipeline.analyze()?;
    Ok(pipeline)
}

/// Load, analyze and export a listing in one call.
pub fn export_graphs(
    listing: impl AsRef<Path>,
    options: &AnalysisOptions,
    config: ExportConfig,
) -> Result<ExportSummary> {
    analyze_listing(listing, options)?.export(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = "\
0x0000: 0x00070003 rcall _helper
0x0002: 0x00060000 return
0x0008: 0x00000000 nop
0x000a: 0x00060000 return
";

    #[test]
    fn test_result_requires_analysis() {
        let pipeline = Pipeline::from_source(LISTING).unwrap();
        assert!(matches!(pipeline.stats("sub_"), Err(Error::NotAnalyzed("stats"))));
        assert!(matches!(
            pipeline.export(ExportConfig::default()),
            Err(Error::NotAnalyzed("export"))
        ));
    }

    #[test]
    fn test_stats() {
        let mut pipeline = Pipeline::from_source(LISTING).unwrap();
        pipeline.analyze().unwrap();
        let stats = pipeline.stats("sub_").unwrap();

        assert_eq!(stats.instructions, 4);
        assert_eq!(stats.blocks, 1);
        assert_eq!(
            stats.functions,
            vec![FunctionStats {
                name: "sub_0008".to_string(),
                entry: 0x0008,
                blocks: 1,
                callees: 0,
            }]
        );
    }

    #[test]
    fn test_invalid_listing() {
        let err = Pipeline::from_source("0x0000: 0x0006 return\n").err().unwrap();
        assert!(matches!(err, Error::Listing(_)));
    }
}
