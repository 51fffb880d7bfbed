//! Basic block and call graph recovery for PIC24 disassembly listings.

mod analyzer;
mod block_table;
mod builder;
mod call_graph;
mod functions;
mod instruction_table;
mod memory;

pub use analyzer::*;
pub use block_table::*;
pub use builder::*;
pub use call_graph::*;
pub use functions::*;
pub use instruction_table::*;
pub use memory::*;

use rustc_hash::FxHashSet;
use thiserror::Error;

/// Internal invariant violations of the block builder.
///
/// Bad input never produces these; they indicate a bug in the
/// discovery/materialization contract.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CfgError {
    #[error("block at {0:#06x} constructed twice")]
    DuplicateBlock(u16),
    #[error("block start {addr:#06x} of function {function:#06x} has no block")]
    MissingBlock { function: u16, addr: u16 },
}

pub type Result<T> = std::result::Result<T, CfgError>;

/// Whole-program analysis result.
#[derive(Clone, Debug, Default)]
pub struct CfgResult {
    /// Unique functions in seed order.
    pub functions: Vec<Function>,
    /// Seeds passed to the builder, duplicates included.
    pub entries: Vec<u16>,
    /// Every materialized block.
    pub blocks: BlockTable,
    /// Caller -> callees.
    pub call_graph: CallGraph,
    /// Program-wide block start addresses.
    pub boundaries: FxHashSet<u16>,
}

impl CfgResult {
    /// Blocks reachable from a function's entry block, in DFS order.
    pub fn function_blocks(&self, entry: u16) -> Vec<&BasicBlock> {
        self.blocks.reachable_from(entry)
    }
}
