//! Two-column `address,name` tables.
//!
//! Used for both the function alias table (address names a function entry)
//! and the interrupt vector table (address names a pointer slot whose
//! contents are the function entry).

use std::path::Path;

use crate::{ListingError, Result, parse_address, read_file};

/// One `address,name` row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableRow {
    /// 1-based source line.
    pub line: usize,
    pub addr: u16,
    pub name: String,
}

/// A parsed name table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NameTable {
    pub rows: Vec<TableRow>,
}

impl NameTable {
    /// Parse table text. Blank lines are skipped; any other line must have
    /// exactly two comma-separated columns with a parsable 16-bit address.
    pub fn parse(source: &str) -> Result<Self> {
        let mut rows = Vec::new();

        for (index, line) in source.lines().enumerate() {
            let line_no = index + 1;
            if line.trim().is_empty() {
                continue;
            }

            let malformed = || ListingError::MalformedRow {
                line: line_no,
                text: line.to_string(),
            };
            let columns: Vec<&str> = line.split(',').collect();
            let [addr, name] = columns.as_slice() else {
                return Err(malformed());
            };
            let addr = parse_address(addr.trim()).ok_or_else(malformed)?;

            rows.push(TableRow {
                line: line_no,
                addr,
                name: name.trim().to_string(),
            });
        }

        Ok(Self { rows })
    }

    /// Read and parse a table file.
    pub fn read(path: &Path) -> Result<Self> {
        let source = read_file(path)?;
        Self::parse(&source).map_err(|err| err.in_file(path))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TableRow> {
        self.rows.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_table() {
        let table = NameTable::parse("0x0200,main\n\n0x0300, uart_isr \n768,dup\n").unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(
            table.rows[0],
            TableRow {
                line: 1,
                addr: 0x0200,
                name: "main".to_string()
            }
        );
        assert_eq!(table.rows[1].name, "uart_isr");
        assert_eq!(table.rows[1].line, 3);
        assert_eq!(table.rows[2].addr, 0x0300);
    }

    #[test]
    fn test_parse_table_wrong_column_count() {
        let err = NameTable::parse("0x0200,main,extra\n").unwrap_err();
        assert!(matches!(err, ListingError::MalformedRow { line: 1, .. }));

        let err = NameTable::parse("0x0200\n").unwrap_err();
        assert!(matches!(err, ListingError::MalformedRow { line: 1, .. }));
    }

    #[test]
    fn test_parse_table_bad_address() {
        let err = NameTable::parse("main,0x0200\n").unwrap_err();
        assert!(matches!(err, ListingError::MalformedRow { line: 1, .. }));

        let err = NameTable::parse("0x0100,a\n0x12345,b\n").unwrap_err();
        assert_eq!(err.line(), Some(2));
    }

    #[test]
    fn test_read_table_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aliases.csv");
        std::fs::write(&path, "0x0040,reset\n").unwrap();

        let table = NameTable::read(&path).unwrap();
        assert_eq!(table.rows[0].name, "reset");
    }
}
