//! Instruction display with operand annotations.
//!
//! Every instruction renders as `ADDR: [OPCODE] MNEMONIC    [note][note]`.
//! Notes come from `#literal` operands (a string in program memory at
//! `literal - 0x8000`, then the literal's low byte as a character) and from
//! static calls (`call <callee>()`).

use std::io::{self, Write};
use std::sync::OnceLock;

use picgraph_cfg::{BasicBlock, Program, is_printable};
use picgraph_isa::{InstrKind, Instruction};
use picgraph_listing::parse_int_literal;
use regex::Regex;
use tracing::debug;

use crate::escape_id;

static LITERAL_PATTERN: OnceLock<Regex> = OnceLock::new();

/// Offset between an immediate operand and the program-memory address it
/// points at.
pub const STRING_WINDOW_BASE: i64 = 0x8000;

/// Parse a `#literal` operand token. Returns `None` for anything else.
pub fn operand_literal(token: &str) -> Option<i64> {
    let pattern =
        LITERAL_PATTERN.get_or_init(|| Regex::new(r"^#([+-]?[0-9A-Za-z]+)$").unwrap());
    let caps = pattern.captures(token)?;
    let value = parse_int_literal(caps.get(1)?.as_str())?;
    // immediates are at most 32 bits wide
    i32::try_from(value).ok().map(i64::from)
}

/// Program-memory address an immediate operand refers to.
pub fn string_address(literal: i64) -> u16 {
    let [low, high, ..] = literal.wrapping_sub(STRING_WINDOW_BASE).to_le_bytes();
    u16::from_le_bytes([low, high])
}

/// Formats instructions and blocks against a program.
pub struct Annotator<'a> {
    program: &'a Program,
    prefix: &'a str,
}

impl<'a> Annotator<'a> {
    pub const fn new(program: &'a Program, prefix: &'a str) -> Self {
        Self { program, prefix }
    }

    /// Display name of a function: the prefix plus its name or 4-digit address.
    pub fn function_name(&self, entry: u16) -> String {
        match self.program.function_name(entry) {
            Some(name) => format!("{}{name}", self.prefix),
            None => format!("{}{entry:04x}", self.prefix),
        }
    }

    /// Notes derived from `#literal` operands.
    pub fn operand_annotations(&self, instr: &Instruction) -> Vec<String> {
        let memory = &self.program.memory;
        let mut notes = Vec::new();

        for token in instr.text.split(' ') {
            let token = token.trim_end_matches(',');
            if token.len() <= 1 || !token.starts_with('#') {
                continue;
            }
            let Some(value) = operand_literal(token) else {
                debug!(
                    addr = format_args!("{:#06x}", instr.addr),
                    token, "skipping unparsable operand literal"
                );
                continue;
            };

            if let Some(text) = memory.find_string(string_address(value)) {
                notes.push(text);
            }
            let low = value.to_le_bytes()[0];
            if is_printable(low) {
                notes.push(char::from(low).to_string());
            }
        }

        notes
    }

    /// All notes for an instruction, in display order.
    pub fn annotations(&self, instr: &Instruction) -> Vec<String> {
        let mut notes = self.operand_annotations(instr);
        if let Some(callee) = instr.call_target() {
            notes.push(format!("call {}()", self.function_name(callee)));
        }
        notes
    }

    /// One display line, unescaped.
    pub fn display(&self, instr: &Instruction) -> String {
        let mut notes = String::new();
        for note in self.annotations(instr) {
            notes.push('[');
            notes.push_str(&note);
            notes.push(']');
        }
        format!("{:#06x}: [{}] {}    {notes}", instr.addr, instr.opcode, instr.text)
    }

    /// One display line with quotes escaped for a DOT label.
    pub fn label_line(&self, instr: &Instruction) -> String {
        escape_id(&self.display(instr))
    }

    /// Left-justified DOT label for a whole block.
    pub fn block_label(&self, block: &BasicBlock) -> String {
        let mut label = String::new();
        for instr in &block.instructions {
            label.push_str(&self.label_line(instr));
            label.push_str("\\l");
        }
        label
    }

    /// String stored in a NOP word, preferring a run that starts at its high byte.
    pub fn nop_string(&self, instr: &Instruction) -> Option<String> {
        if instr.kind != InstrKind::Nop {
            return None;
        }
        let memory = &self.program.memory;
        let high = instr.addr.wrapping_add(1);
        let start = if memory.is_string_start(high) {
            high
        } else if memory.is_string_start(instr.addr) {
            instr.addr
        } else {
            return None;
        };
        memory.find_string(start)
    }

    /// Print every instruction in listing order.
    pub fn write_listing(&self, out: &mut impl Write) -> io::Result<()> {
        for instr in &self.program.code {
            write!(out, "{}", self.display(instr))?;
            if let Some(text) = self.nop_string(instr) {
                write!(out, "\t\t\t[{text}]")?;
            }
            writeln!(out)?;
        }
        Ok(())
    }
}
