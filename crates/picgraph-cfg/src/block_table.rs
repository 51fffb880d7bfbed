//! Basic blocks and the program-wide block table.

use std::collections::BTreeMap;

use picgraph_isa::{InstrKind, Instruction};
use rustc_hash::FxHashSet;

use crate::{CfgError, Result};

/// Basic block: a straight-line run of instructions with its successors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BasicBlock {
    /// Starting address (block identity).
    pub addr: u16,
    /// Instructions in address order.
    pub instructions: Vec<Instruction>,
    /// Successor block addresses. For a conditional branch: taken, then fallthrough.
    pub successors: Vec<u16>,
    /// The last instruction is a copy of the return that starts the successor
    /// block. It's shown here for readability but owned by the successor.
    pub join_return: bool,
}

impl BasicBlock {
    pub fn new(addr: u16) -> Self {
        Self {
            addr,
            instructions: Vec::with_capacity(4),
            successors: Vec::with_capacity(2),
            join_return: false,
        }
    }

    /// Append an instruction.
    pub fn push(&mut self, instr: Instruction) {
        self.instructions.push(instr);
    }

    /// Append a successor address.
    pub fn add_successor(&mut self, addr: u16) {
        self.successors.push(addr);
    }

    /// Append the return that starts the forced-join successor.
    pub fn push_join_return(&mut self, instr: Instruction) {
        self.instructions.push(instr);
        self.join_return = true;
    }

    /// Last instruction, including a join return copy.
    pub fn last(&self) -> Option<&Instruction> {
        self.instructions.last()
    }

    /// Instruction that decided how the block ends.
    pub fn terminator(&self) -> Option<&Instruction> {
        let owned = self.owned_len();
        owned.checked_sub(1).map(|i| &self.instructions[i])
    }

    /// Check if the last listed instruction is a return.
    pub fn is_returned(&self) -> bool {
        self.last().is_some_and(|i| i.kind == InstrKind::Return)
    }

    /// Number of instructions this block owns (excludes a join return copy).
    pub fn owned_len(&self) -> usize {
        self.instructions.len() - usize::from(self.join_return)
    }

    /// Addresses of the instructions this block owns.
    pub fn owned_addresses(&self) -> impl Iterator<Item = u16> + '_ {
        self.instructions[..self.owned_len()].iter().map(|i| i.addr)
    }

    /// Taken target of a conditional branch block.
    pub fn taken(&self) -> Option<u16> {
        if self.successors.len() == 2 { Some(self.successors[0]) } else { None }
    }

    /// Fallthrough target of a conditional branch block.
    pub fn fallthrough(&self) -> Option<u16> {
        if self.successors.len() == 2 { Some(self.successors[1]) } else { None }
    }
}

/// Table of every materialized block, keyed by start address.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BlockTable {
    blocks: BTreeMap<u16, BasicBlock>,
}

impl BlockTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a newly built block. Each address may own at most one block.
    pub fn insert(&mut self, block: BasicBlock) -> Result<()> {
        if self.blocks.contains_key(&block.addr) {
            return Err(CfgError::DuplicateBlock(block.addr));
        }
        self.blocks.insert(block.addr, block);
        Ok(())
    }

    /// Get block starting at address.
    pub fn get(&self, addr: u16) -> Option<&BasicBlock> {
        self.blocks.get(&addr)
    }

    /// Check if an address owns a block.
    pub fn contains(&self, addr: u16) -> bool {
        self.blocks.contains_key(&addr)
    }

    /// Iterate blocks in address order.
    pub fn iter(&self) -> impl Iterator<Item = &BasicBlock> {
        self.blocks.values()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Blocks reachable from `entry` through successors, in DFS discovery order.
    ///
    /// Successors without a block (targets outside the listing) are skipped.
    pub fn reachable_from(&self, entry: u16) -> Vec<&BasicBlock> {
        let mut order = Vec::new();
        let mut visited = FxHashSet::default();
        let mut stack = vec![entry];

        while let Some(addr) = stack.pop() {
            if !visited.insert(addr) {
                continue;
            }
            let Some(block) = self.get(addr) else {
                continue;
            };
            order.push(block);
            // push in reverse so the first successor is visited first
            for &succ in block.successors.iter().rev() {
                if !visited.contains(&succ) {
                    stack.push(succ);
                }
            }
        }

        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(addr: u16, words: &[(u16, u32)], successors: &[u16]) -> BasicBlock {
        let mut block = BasicBlock::new(addr);
        for &(a, raw) in words {
            block.push(Instruction::new(a, raw, ""));
        }
        for &s in successors {
            block.add_successor(s);
        }
        block
    }

    #[test]
    fn test_duplicate_insert_rejected() {
        let mut table = BlockTable::new();
        table.insert(BasicBlock::new(0x10)).unwrap();
        assert!(matches!(
            table.insert(BasicBlock::new(0x10)),
            Err(CfgError::DuplicateBlock(0x10))
        ));
    }

    #[test]
    fn test_join_return_is_not_owned() {
        let mut b = block(0x10, &[(0x10, 0)], &[0x12]);
        b.push_join_return(Instruction::new(0x12, 0x0006_0000_u32, "return"));
        assert!(b.is_returned());
        assert_eq!(b.owned_len(), 1);
        assert_eq!(b.owned_addresses().collect::<Vec<_>>(), vec![0x10]);
        assert_eq!(b.terminator().map(|i| i.addr), Some(0x10));
    }

    #[test]
    fn test_taken_and_fallthrough() {
        let b = block(0x00, &[(0x00, 0x0032_0007)], &[0x10, 0x02]);
        assert_eq!(b.taken(), Some(0x10));
        assert_eq!(b.fallthrough(), Some(0x02));
        let single = block(0x00, &[(0x00, 0x0037_0007)], &[0x10]);
        assert_eq!(single.taken(), None);
    }

    #[test]
    fn test_reachable_from() {
        let mut table = BlockTable::new();
        table.insert(block(0x00, &[(0x00, 0x0032_0007)], &[0x10, 0x02])).unwrap();
        table.insert(block(0x02, &[(0x02, 0)], &[0x10])).unwrap();
        table.insert(block(0x10, &[(0x10, 0x0006_0000)], &[])).unwrap();
        table.insert(block(0x20, &[(0x20, 0x0006_0000)], &[])).unwrap();

        let order: Vec<u16> = table.reachable_from(0x00).iter().map(|b| b.addr).collect();
        assert_eq!(order, vec![0x00, 0x10, 0x02]);
        assert!(table.reachable_from(0x40).is_empty());
    }
}
