//! Whole-program analysis context.

use picgraph_isa::Instruction;
use picgraph_listing::NameTable;
use tracing::{info, info_span};

use crate::{
    BlockBuilder, CfgResult, FunctionNames, InstructionTable, MemoryImage, Result,
    collect_entries, unique_functions,
};

/// Read-only program state shared by every analysis step.
///
/// Built in a fixed order: instructions, then the memory image, then the
/// name tables (which may dereference the image).
#[derive(Clone, Debug, Default)]
pub struct Program {
    pub code: InstructionTable,
    pub memory: MemoryImage,
    pub names: FunctionNames,
}

impl Program {
    pub fn new(instructions: Vec<Instruction>) -> Self {
        let code = InstructionTable::new(instructions);
        let memory = MemoryImage::from_instructions(&code);
        Self {
            code,
            memory,
            names: FunctionNames::new(),
        }
    }

    /// Seed named entries from an interrupt vector table.
    #[must_use]
    pub fn with_vectors(mut self, table: &NameTable) -> Self {
        self.names.add_vectors(table, &self.memory);
        self
    }

    /// Seed named entries from an alias table. Overrides vector names.
    #[must_use]
    pub fn with_aliases(mut self, table: &NameTable) -> Self {
        self.names.add_aliases(table);
        self
    }

    /// Display name for a function entry.
    pub fn function_name(&self, entry: u16) -> Option<&str> {
        self.names.get(entry)
    }
}

/// Control flow analyzer over a [`Program`].
pub struct CfgAnalyzer<'a> {
    program: &'a Program,
}

impl<'a> CfgAnalyzer<'a> {
    pub const fn new(program: &'a Program) -> Self {
        Self { program }
    }

    /// Discover functions, build blocks and the call graph.
    pub fn analyze(&self) -> Result<CfgResult> {
        let _span = info_span!("analyze").entered();
        let program = self.program;

        let entries = collect_entries(&program.code, &program.names);
        let functions = unique_functions(&entries, &program.names);
        info!("creating graph of {} functions", functions.len());

        let mut builder = BlockBuilder::new(&program.code);
        builder.build(&entries)?;
        let (blocks, call_graph, boundaries) = builder.finish();
        info!("created {} blocks", blocks.len());

        Ok(CfgResult {
            functions,
            entries,
            blocks,
            call_graph,
            boundaries,
        })
    }
}
