//! Control flow classification of opcode words.

use crate::Opcode;

/// Control flow class of an instruction word.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InstrKind {
    /// `nop` (also data words that happen to decode as one).
    Nop,
    /// Relative call.
    RCall,
    /// Relative branch; `unconditional` for `bra` without a condition code.
    Bra { unconditional: bool },
    /// Absolute call (first word of the two-word form).
    Call,
    /// Call through a working register.
    CallIndirect,
    /// Absolute jump (first word of the two-word form).
    Goto,
    /// Jump through a working register.
    GotoIndirect,
    /// Function return.
    Return,
    /// Any other straight-line instruction.
    Other,
}

impl InstrKind {
    /// Classify an opcode word.
    pub const fn classify(op: Opcode) -> Self {
        let [b0, b1, b2, b3] = op.bytes();
        if b0 != 0 {
            return Self::Other;
        }
        match b1 {
            0x00 => Self::Nop,
            0x01 if b2 == 0x00 && b3 & 0xF0 == 0 => Self::CallIndirect,
            0x01 if b2 == 0x40 && b3 & 0xF0 == 0 => Self::GotoIndirect,
            0x02 if b3 & 0x01 == 0 => Self::Call,
            0x04 => Self::Goto,
            0x06 if b2 == 0 && b3 == 0 => Self::Return,
            0x07 => Self::RCall,
            0x30..=0x3F => Self::Bra {
                unconditional: b1 == 0x37,
            },
            _ => Self::Other,
        }
    }

    /// Check if this is a call with a statically known target.
    pub const fn is_static_call(self) -> bool {
        matches!(self, Self::RCall | Self::Call)
    }
}
