//! Two-pass basic block builder.
//!
//! Pass 1 (discovery) walks every function from its entry and records each
//! address where a block must start: branch and jump targets, conditional
//! fallthroughs, and function entries. Call edges fall out of the same walk.
//!
//! Pass 2 (materialization) walks again and cuts blocks exactly at those
//! addresses. Discovery runs for every function before any block is built, so
//! a join found late (or found by a different function) can never land inside
//! a block that already exists.
//!
//! Both passes use an explicit worklist; cyclic flow terminates through the
//! visited set (pass 1) and the block table (pass 2).

use picgraph_isa::{InstrKind, Instruction};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, trace, warn};

use crate::{BasicBlock, BlockTable, CallGraph, CfgError, InstructionTable, Result};

/// Builds the block table and call graph for a set of function entries.
pub struct BlockBuilder<'a> {
    code: &'a InstructionTable,
    /// Program-wide block start addresses.
    boundaries: FxHashSet<u16>,
    /// Block starts discovered from each function entry.
    function_boundaries: FxHashMap<u16, FxHashSet<u16>>,
    blocks: BlockTable,
    call_graph: CallGraph,
}

impl<'a> BlockBuilder<'a> {
    pub fn new(code: &'a InstructionTable) -> Self {
        Self {
            code,
            boundaries: FxHashSet::default(),
            function_boundaries: FxHashMap::default(),
            blocks: BlockTable::new(),
            call_graph: CallGraph::new(),
        }
    }

    /// Run discovery for every entry, then materialize every entry.
    ///
    /// Entries may repeat; repeats are no-ops.
    pub fn build(&mut self, entries: &[u16]) -> Result<()> {
        for &entry in entries {
            self.discover(entry);
        }
        for &entry in entries {
            self.materialize(entry)?;
        }
        Ok(())
    }

    /// Pass 1: record block starts and call edges reachable from `entry`.
    pub fn discover(&mut self, entry: u16) {
        let code = self.code;
        self.call_graph.add_function(entry);

        let mut walk = Discovery::new(entry);
        if code.contains(entry) {
            walk.starts.insert(entry);
        } else {
            warn!(entry = format_args!("{entry:#06x}"), "function entry is not in the listing");
        }

        while let Some(start) = walk.worklist.pop() {
            let mut addr = start;

            loop {
                if !walk.visited.insert(addr) {
                    break;
                }
                let Some(instr) = code.get(addr) else {
                    if addr != entry {
                        warn!(
                            addr = format_args!("{addr:#06x}"),
                            function = format_args!("{entry:#06x}"),
                            "flow runs past the end of the listing"
                        );
                    }
                    break;
                };

                match instr.kind {
                    InstrKind::Bra { unconditional } => {
                        walk.mark(code, instr, instr.relative_target());
                        if !unconditional {
                            walk.mark(code, instr, instr.next_addr());
                        }
                        break;
                    }
                    InstrKind::Goto => {
                        walk.mark(code, instr, instr.absolute_target());
                        break;
                    }
                    InstrKind::CallIndirect | InstrKind::GotoIndirect | InstrKind::Return => break,
                    InstrKind::RCall | InstrKind::Call => {
                        if let Some(callee) = instr.call_target() {
                            if !code.contains(callee) {
                                warn!(
                                    from = format_args!("{:#06x}", instr.addr),
                                    callee = format_args!("{callee:#06x}"),
                                    "call to missing location"
                                );
                            }
                            self.call_graph.add_call(entry, callee);
                        }
                    }
                    InstrKind::Nop | InstrKind::Other => {}
                }

                addr = instr.next_addr();
            }
        }

        trace!(
            entry = format_args!("{entry:#06x}"),
            starts = walk.starts.len(),
            "discovered block starts"
        );
        self.boundaries.extend(walk.starts.iter().copied());
        self.function_boundaries
            .entry(entry)
            .or_default()
            .extend(walk.starts);
    }

    /// Pass 2: build every block reachable from `entry` that doesn't exist yet.
    ///
    /// Returns the number of blocks created.
    pub fn materialize(&mut self, entry: u16) -> Result<usize> {
        let before = self.blocks.len();
        let mut worklist = vec![entry];

        while let Some(start) = worklist.pop() {
            if self.blocks.contains(start) || !self.code.contains(start) {
                continue;
            }

            let block = self.walk_block(start);
            for &succ in &block.successors {
                if !self.blocks.contains(succ) && succ != start {
                    worklist.push(succ);
                }
            }
            self.blocks.insert(block)?;
        }

        self.check_boundaries(entry)?;

        let created = self.blocks.len() - before;
        debug!(entry = format_args!("{entry:#06x}"), created, "materialized blocks");
        Ok(created)
    }

    /// Extend one block from `start` until a control transfer or a block start.
    fn walk_block(&self, start: u16) -> BasicBlock {
        let mut block = BasicBlock::new(start);
        let mut addr = start;

        while let Some(instr) = self.code.get(addr) {
            block.push(instr.clone());

            match instr.kind {
                InstrKind::Bra { unconditional } => {
                    block.add_successor(instr.relative_target());
                    if !unconditional {
                        block.add_successor(instr.next_addr());
                    }
                    break;
                }
                InstrKind::Goto => {
                    block.add_successor(instr.absolute_target());
                    break;
                }
                InstrKind::CallIndirect | InstrKind::GotoIndirect | InstrKind::Return => break,
                InstrKind::RCall | InstrKind::Call | InstrKind::Nop | InstrKind::Other => {}
            }

            let next = instr.next_addr();
            if self.boundaries.contains(&next) {
                // forced join: a block starts at the next word
                block.add_successor(next);
                if let Some(ret) = self.code.get(next).filter(|i| i.kind == InstrKind::Return) {
                    block.push_join_return(ret.clone());
                }
                break;
            }
            addr = next;
        }

        block
    }

    /// Every block start discovered from `entry` must own a block by now.
    fn check_boundaries(&self, entry: u16) -> Result<()> {
        let Some(starts) = self.function_boundaries.get(&entry) else {
            return Ok(());
        };
        match starts.iter().find(|&&addr| !self.blocks.contains(addr)) {
            Some(&addr) => Err(CfgError::MissingBlock {
                function: entry,
                addr,
            }),
            None => Ok(()),
        }
    }

    /// Block starts discovered from one function entry.
    pub fn function_boundaries(&self, entry: u16) -> Option<&FxHashSet<u16>> {
        self.function_boundaries.get(&entry)
    }

    pub fn blocks(&self) -> &BlockTable {
        &self.blocks
    }

    /// Consume the builder, returning the block table, call graph and block starts.
    pub fn finish(self) -> (BlockTable, CallGraph, FxHashSet<u16>) {
        (self.blocks, self.call_graph, self.boundaries)
    }
}

/// Per-function state of the discovery walk.
struct Discovery {
    entry: u16,
    starts: FxHashSet<u16>,
    visited: FxHashSet<u16>,
    worklist: Vec<u16>,
}

impl Discovery {
    fn new(entry: u16) -> Self {
        Self {
            entry,
            starts: FxHashSet::default(),
            visited: FxHashSet::default(),
            worklist: vec![entry],
        }
    }

    /// Record `target` as a block start and queue it for walking.
    ///
    /// Targets outside the listing are logged and dropped.
    fn mark(&mut self, code: &InstructionTable, from: &Instruction, target: u16) {
        if !code.contains(target) {
            warn!(
                from = format_args!("{:#06x}", from.addr),
                target = format_args!("{target:#06x}"),
                function = format_args!("{:#06x}", self.entry),
                "jump to missing location"
            );
            return;
        }
        self.starts.insert(target);
        if !self.visited.contains(&target) {
            self.worklist.push(target);
        }
    }
}
