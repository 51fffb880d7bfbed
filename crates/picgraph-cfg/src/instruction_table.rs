//! Instruction table keyed by word address.

use picgraph_isa::Instruction;
use rustc_hash::FxHashMap;
use tracing::warn;

/// Program-wide table of decoded instructions.
///
/// Keeps listing order for display and an address index for the walkers.
#[derive(Clone, Debug, Default)]
pub struct InstructionTable {
    /// Instructions in listing order.
    instructions: Vec<Instruction>,
    /// Address -> position in `instructions`.
    index: FxHashMap<u16, usize>,
}

impl InstructionTable {
    /// Build the table. A word listed twice keeps its last definition.
    pub fn new(instructions: Vec<Instruction>) -> Self {
        let mut table = Self {
            instructions: Vec::with_capacity(instructions.len()),
            index: FxHashMap::default(),
        };

        for instr in instructions {
            if let Some(&pos) = table.index.get(&instr.addr) {
                warn!(addr = format_args!("{:#06x}", instr.addr), "address listed twice, keeping last");
                table.instructions[pos] = instr;
            } else {
                table.index.insert(instr.addr, table.instructions.len());
                table.instructions.push(instr);
            }
        }

        table
    }

    /// Get instruction at address.
    pub fn get(&self, addr: u16) -> Option<&Instruction> {
        self.index.get(&addr).map(|&pos| &self.instructions[pos])
    }

    /// Check if an address holds an instruction.
    pub fn contains(&self, addr: u16) -> bool {
        self.index.contains_key(&addr)
    }

    /// Iterate in listing order.
    pub fn iter(&self) -> impl Iterator<Item = &Instruction> {
        self.instructions.iter()
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}

impl<'a> IntoIterator for &'a InstructionTable {
    type Item = &'a Instruction;
    type IntoIter = std::slice::Iter<'a, Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.instructions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let table = InstructionTable::new(vec![
            Instruction::new(0x0010, 0u32, "nop"),
            Instruction::new(0x0012, 0x0006_0000_u32, "return"),
        ]);
        assert_eq!(table.len(), 2);
        assert!(table.contains(0x0012));
        assert!(!table.contains(0x0014));
        assert_eq!(table.get(0x0012).map(|i| i.text.as_str()), Some("return"));
    }

    #[test]
    fn test_duplicate_address_keeps_last() {
        let table = InstructionTable::new(vec![
            Instruction::new(0x0010, 0u32, "nop"),
            Instruction::new(0x0012, 0u32, "nop"),
            Instruction::new(0x0010, 0x0006_0000_u32, "return"),
        ]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(0x0010).map(|i| i.text.as_str()), Some("return"));
        let order: Vec<u16> = table.iter().map(|i| i.addr).collect();
        assert_eq!(order, vec![0x0010, 0x0012]);
    }
}
