//! Decoded instruction words.

use std::fmt;

use crate::{INSTR_STRIDE, InstrKind, Opcode};

/// One word of the disassembly listing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Instruction {
    /// Word address.
    pub addr: u16,
    /// Raw opcode bytes.
    pub opcode: Opcode,
    /// Mnemonic text as printed by the disassembler.
    pub text: String,
    /// Control flow class, computed once from `opcode`.
    pub kind: InstrKind,
}

impl Instruction {
    pub fn new(addr: u16, opcode: impl Into<Opcode>, text: impl Into<String>) -> Self {
        let opcode = opcode.into();
        Self {
            addr,
            opcode,
            text: text.into(),
            kind: InstrKind::classify(opcode),
        }
    }

    /// Address of the following word.
    pub const fn next_addr(&self) -> u16 {
        self.addr.wrapping_add(INSTR_STRIDE)
    }

    /// Target of a relative transfer: `addr + (operand << 1) + 2`.
    ///
    /// The operand is not sign-extended, so backward branches wrap around the
    /// 16-bit address space instead of going backwards.
    pub const fn relative_target(&self) -> u16 {
        let offset = self.opcode.operand() << 1;
        self.addr.wrapping_add(offset).wrapping_add(INSTR_STRIDE)
    }

    /// Target of an absolute transfer: the operand field itself.
    pub const fn absolute_target(&self) -> u16 {
        self.opcode.operand()
    }

    /// Statically known transfer target, if any.
    pub const fn target(&self) -> Option<u16> {
        match self.kind {
            InstrKind::RCall | InstrKind::Bra { .. } => Some(self.relative_target()),
            InstrKind::Call | InstrKind::Goto => Some(self.absolute_target()),
            _ => None,
        }
    }

    /// Target of a call with a known destination.
    pub const fn call_target(&self) -> Option<u16> {
        if self.kind.is_static_call() {
            self.target()
        } else {
            None
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#06x}: [{}] {}", self.addr, self.opcode, self.text)
    }
}
