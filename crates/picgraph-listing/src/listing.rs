//! Disassembly listing tokenizer.

use std::path::Path;

use picgraph_isa::{Instruction, Opcode};
use tracing::debug;

use crate::{ListingError, Result, read_file};

/// Prefix every instruction line starts with.
const ADDRESS_PREFIX: &str = "0x";

/// Parse a disassembly listing into instruction records.
///
/// Each instruction line has the shape `ADDR: OPCODE MNEMONIC  COMMENT`.
/// Fields are separated by single spaces; the mnemonic runs up to the first
/// double space. Lines that don't start with `0x` (section headers, labels,
/// blank lines) are skipped.
pub fn parse_listing(source: &str) -> Result<Vec<Instruction>> {
    let mut instructions = Vec::new();

    for (index, line) in source.lines().enumerate() {
        if let Some(instr) = parse_line(line, index + 1)? {
            instructions.push(instr);
        }
    }

    debug!(count = instructions.len(), "parsed listing");
    Ok(instructions)
}

/// Read and parse a listing file.
pub fn read_listing(path: &Path) -> Result<Vec<Instruction>> {
    let source = read_file(path)?;
    parse_listing(&source).map_err(|err| err.in_file(path))
}

/// Parse a single listing line. Returns `None` for lines that carry no instruction.
pub fn parse_line(line: &str, line_no: usize) -> Result<Option<Instruction>> {
    if !line.starts_with(ADDRESS_PREFIX) {
        return Ok(None);
    }

    let mut fields = line.splitn(3, ' ');
    let addr_field = fields.next().unwrap_or_default();
    let Some(opcode_field) = fields.next() else {
        return Err(ListingError::MissingOpcode {
            line: line_no,
            text: line.to_string(),
        });
    };
    let text = fields
        .next()
        .map(|rest| rest.split_once("  ").map_or(rest, |(mnemonic, _)| mnemonic))
        .unwrap_or_default();

    let addr = parse_listing_address(addr_field.trim_end_matches(':'), line_no)?;
    let opcode: Opcode = opcode_field
        .parse()
        .map_err(|source| ListingError::InvalidOpcode {
            line: line_no,
            source,
        })?;

    Ok(Some(Instruction::new(addr, opcode, text)))
}

fn parse_listing_address(field: &str, line_no: usize) -> Result<u16> {
    let invalid = || ListingError::InvalidAddress {
        line: line_no,
        text: field.to_string(),
    };
    let digits = field.strip_prefix(ADDRESS_PREFIX).ok_or_else(invalid)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    let value = u64::from_str_radix(digits, 16).map_err(|_| invalid())?;
    u16::try_from(value).map_err(|_| ListingError::AddressOutOfRange {
        line: line_no,
        value,
    })
}
