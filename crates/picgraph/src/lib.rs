//! picgraph - control flow recovery for PIC24 disassembly listings
//!
//! Reads a linear `ADDR: OPCODE  MNEMONIC` listing, classifies every word,
//! discovers functions, splits them into basic blocks and writes one
//! Graphviz graph per function plus the program-wide call graph.
//!
//! # Example
//!
//! ```ignore
//! use picgraph::{AnalysisOptions, ExportConfig, Pipeline};
//!
//! let options = AnalysisOptions::new().with_aliases("aliases.csv");
//! let mut pipeline = Pipeline::load("firmware.lst", &options)?;
//! pipeline.analyze()?;
//! pipeline.export(ExportConfig::default().with_output_dir("out"))?;
//! ```

// Re-export from sub-crates
pub use picgraph_cfg::{
    BasicBlock, BlockBuilder, BlockTable, CallGraph, CfgAnalyzer, CfgError, CfgResult, Function,
    FunctionNames, InstructionTable, MemoryImage, Program,
};
pub use picgraph_emit::{
    Annotator, DEFAULT_OUTPUT_DIR, DotGraph, EmitError, ExportConfig, ExportSummary, GraphProject,
};
pub use picgraph_isa::{InstrKind, Instruction, Opcode, OpcodeError};
pub use picgraph_listing::{ListingError, NameTable, parse_listing, read_listing};

mod error;
mod pipeline;

pub use error::*;
pub use pipeline::*;
