//! Readers for the textual inputs of the analysis.
//!
//! - the disassembly listing (`ADDR: OPCODE  MNEMONIC` lines)
//! - two-column `address,name` tables (function aliases, interrupt vectors)

mod listing;
mod literal;
mod table;

pub use listing::*;
pub use literal::*;
pub use table::*;

use std::path::{Path, PathBuf};

use picgraph_isa::OpcodeError;
use thiserror::Error;

/// Input parsing errors. All of them are fatal for the run.
#[derive(Error, Debug)]
pub enum ListingError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{}: {source}", path.display())]
    InFile {
        path: PathBuf,
        #[source]
        source: Box<ListingError>,
    },
    #[error("line {line}: missing opcode field: `{text}`")]
    MissingOpcode { line: usize, text: String },
    #[error("line {line}: invalid address `{text}`")]
    InvalidAddress { line: usize, text: String },
    #[error("line {line}: address {value:#x} does not fit in 16 bits")]
    AddressOutOfRange { line: usize, value: u64 },
    #[error("line {line}: {source}")]
    InvalidOpcode {
        line: usize,
        #[source]
        source: OpcodeError,
    },
    #[error("line {line}: expected `address,name`, got `{text}`")]
    MalformedRow { line: usize, text: String },
}

impl ListingError {
    /// Attach the file the error came from.
    pub fn in_file(self, path: &Path) -> Self {
        match self {
            err @ (Self::Io { .. } | Self::InFile { .. }) => err,
            err => Self::InFile {
                path: path.to_path_buf(),
                source: Box::new(err),
            },
        }
    }

    /// 1-based line number of the offending input line, if known.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Io { .. } => None,
            Self::InFile { source, .. } => source.line(),
            Self::MissingOpcode { line, .. }
            | Self::InvalidAddress { line, .. }
            | Self::AddressOutOfRange { line, .. }
            | Self::InvalidOpcode { line, .. }
            | Self::MalformedRow { line, .. } => Some(*line),
        }
    }
}

pub type Result<T> = std::result::Result<T, ListingError>;

/// Read a whole input file, tagging errors with its path.
fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| ListingError::Io {
        path: path.to_path_buf(),
        source,
    })
}
