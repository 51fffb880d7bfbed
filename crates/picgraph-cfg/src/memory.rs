//! Byte-addressed view of the program words.

use picgraph_isa::Instruction;
use rustc_hash::FxHashMap;

/// Check if a byte is a printable ASCII character.
pub const fn is_printable(byte: u8) -> bool {
    byte >= 32 && byte < 127
}

/// Address -> byte map built from the listing.
///
/// Each word at `a` contributes its low data byte (opcode byte 3) at `a` and
/// its high data byte (opcode byte 2) at `a + 1`. Read-only after construction.
#[derive(Clone, Debug, Default)]
pub struct MemoryImage {
    bytes: FxHashMap<u16, u8>,
}

impl MemoryImage {
    /// Build the image from instruction words.
    pub fn from_instructions<'a>(instructions: impl IntoIterator<Item = &'a Instruction>) -> Self {
        let mut bytes = FxHashMap::default();
        for instr in instructions {
            bytes.insert(instr.addr, instr.opcode.low_byte());
            bytes.insert(instr.addr.wrapping_add(1), instr.opcode.high_byte());
        }
        Self { bytes }
    }

    /// Get the byte at an address.
    pub fn get(&self, addr: u16) -> Option<u8> {
        self.bytes.get(&addr).copied()
    }

    /// Read a little-endian 16-bit pointer at `addr`.
    ///
    /// Returns `None` unless both bytes are present.
    pub fn read_u16(&self, addr: u16) -> Option<u16> {
        let low = self.get(addr)?;
        let high = self.get(addr.wrapping_add(1))?;
        Some(u16::from_le_bytes([low, high]))
    }

    /// Printable run starting at `addr`, if the first byte is printable.
    pub fn find_string(&self, addr: u16) -> Option<String> {
        let mut text = String::new();
        let mut cursor = addr;
        while let Some(byte) = self.get(cursor).filter(|&b| is_printable(b)) {
            text.push(char::from(byte));
            cursor = cursor.wrapping_add(1);
            // a full wrap means every byte is printable; stop at the start
            if cursor == addr {
                break;
            }
        }
        if text.is_empty() { None } else { Some(text) }
    }

    /// Check if a printable run starts exactly at `addr`.
    pub fn is_string_start(&self, addr: u16) -> bool {
        let before = self.get(addr.wrapping_sub(1)).unwrap_or(0);
        let at = self.get(addr).unwrap_or(0);
        !is_printable(before) && is_printable(at)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
