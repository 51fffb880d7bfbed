//! Instruction model for PIC24-family control flow recovery.
//!
//! Only decodes what's needed for control flow analysis: calls, branches,
//! absolute jumps, register-indirect transfers and returns. Everything else
//! is straight-line code.

mod instr;
mod kind;
mod opcode;

pub use instr::*;
pub use kind::*;
pub use opcode::*;

/// Address units occupied by one instruction word.
pub const INSTR_STRIDE: u16 = 2;
