//! Raw 4-byte opcode words.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Opcode parsing errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OpcodeError {
    #[error("opcode `{0}` is missing the 0x prefix")]
    MissingPrefix(String),
    #[error("opcode `{0}` must be exactly 4 bytes (8 hex digits)")]
    WrongLength(String),
    #[error("opcode `{0}` is not valid hex")]
    InvalidHex(String),
}

/// Four opcode bytes in the order they are written in the listing.
///
/// `0x00070005` is `[0x00, 0x07, 0x00, 0x05]`: byte 0 is the most significant
/// byte of the written literal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Opcode([u8; 4]);

impl Opcode {
    /// Get the raw bytes.
    pub const fn bytes(&self) -> [u8; 4] {
        self.0
    }

    /// Low data byte (byte 3), stored at the word's own address.
    pub const fn low_byte(&self) -> u8 {
        self.0[3]
    }

    /// High data byte (byte 2), stored at the word's address + 1.
    pub const fn high_byte(&self) -> u8 {
        self.0[2]
    }

    /// The opcode as the 32-bit literal it was written as.
    pub const fn as_u32(&self) -> u32 {
        u32::from_be_bytes(self.0)
    }

    /// The 16-bit operand field formed by bytes 2 and 3.
    pub const fn operand(&self) -> u16 {
        u16::from_be_bytes([self.0[2], self.0[3]])
    }
}

impl From<[u8; 4]> for Opcode {
    fn from(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }
}

impl From<u32> for Opcode {
    fn from(raw: u32) -> Self {
        Self(raw.to_be_bytes())
    }
}

impl FromStr for Opcode {
    type Err = OpcodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or_else(|| OpcodeError::MissingPrefix(s.to_string()))?;
        if digits.len() != 8 {
            return Err(OpcodeError::WrongLength(s.to_string()));
        }
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(OpcodeError::InvalidHex(s.to_string()));
        }
        let raw =
            u32::from_str_radix(digits, 16).map_err(|_| OpcodeError::InvalidHex(s.to_string()))?;
        Ok(Self::from(raw))
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.as_u32())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_opcode() {
        let op: Opcode = "0x00070005".parse().unwrap();
        assert_eq!(op.bytes(), [0x00, 0x07, 0x00, 0x05]);
        assert_eq!(op.operand(), 0x0005);
        assert_eq!(op.to_string(), "0x00070005");
    }

    #[test]
    fn test_data_bytes() {
        let op = Opcode::from(0x0000_4142_u32);
        assert_eq!(op.low_byte(), 0x42);
        assert_eq!(op.high_byte(), 0x41);
    }

    #[test]
    fn test_parse_opcode_uppercase() {
        let op: Opcode = "0x0004ABCD".parse().unwrap();
        assert_eq!(op.bytes(), [0x00, 0x04, 0xab, 0xcd]);
    }

    #[test]
    fn test_parse_opcode_errors() {
        assert_eq!(
            "00070005".parse::<Opcode>(),
            Err(OpcodeError::MissingPrefix("00070005".to_string()))
        );
        assert_eq!(
            "0x000700".parse::<Opcode>(),
            Err(OpcodeError::WrongLength("0x000700".to_string()))
        );
        assert_eq!(
            "0x0007000g".parse::<Opcode>(),
            Err(OpcodeError::InvalidHex("0x0007000g".to_string()))
        );
        // from_str_radix would accept a leading sign, the digit check must not
        assert!("0x+0070005".parse::<Opcode>().is_err());
    }
}
