//! Function entry discovery and naming.

use std::collections::BTreeMap;

use picgraph_isa::InstrKind;
use picgraph_listing::NameTable;
use rustc_hash::FxHashSet;
use tracing::{debug, warn};

use crate::{InstructionTable, MemoryImage};

/// A function entry point.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Function {
    pub entry: u16,
    /// Name from the alias or vector table, if any.
    pub name: Option<String>,
}

/// Names seeded from the vector and alias tables.
///
/// Every named address is also a function entry.
#[derive(Clone, Debug, Default)]
pub struct FunctionNames {
    names: BTreeMap<u16, String>,
}

impl FunctionNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name a function entry, replacing any earlier name.
    pub fn insert(&mut self, entry: u16, name: impl Into<String>) {
        self.names.insert(entry, name.into());
    }

    /// Seed names from an alias table (address is the entry itself).
    pub fn add_aliases(&mut self, table: &NameTable) {
        for row in table.iter() {
            debug!(entry = format_args!("{:#06x}", row.addr), name = %row.name, "naming function");
            self.insert(row.addr, row.name.clone());
        }
    }

    /// Seed names from an interrupt vector table.
    ///
    /// Each row's address is a pointer slot; the entry is the little-endian
    /// word stored there. Slots outside the image are skipped.
    pub fn add_vectors(&mut self, table: &NameTable, memory: &MemoryImage) {
        for row in table.iter() {
            let Some(entry) = memory.read_u16(row.addr) else {
                warn!(
                    vector = format_args!("{:#06x}", row.addr),
                    name = %row.name,
                    "vector slot outside listing, skipping"
                );
                continue;
            };
            debug!(entry = format_args!("{entry:#06x}"), name = %row.name, "adding function");
            self.insert(entry, row.name.clone());
        }
    }

    /// Get the name for an entry.
    pub fn get(&self, entry: u16) -> Option<&str> {
        self.names.get(&entry).map(String::as_str)
    }

    /// Named entries in address order.
    pub fn entries(&self) -> impl Iterator<Item = u16> + '_ {
        self.names.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Collect unique call destinations in listing order.
///
/// Relative call targets come first, then absolute call targets.
pub fn discover_call_targets(table: &InstructionTable) -> Vec<u16> {
    let mut seen = FxHashSet::default();
    let mut targets = Vec::new();

    let rcalls = table.iter().filter(|i| i.kind == InstrKind::RCall);
    let calls = table.iter().filter(|i| i.kind == InstrKind::Call);
    for instr in rcalls.chain(calls) {
        if let Some(dest) = instr.call_target() {
            if seen.insert(dest) {
                targets.push(dest);
            }
        }
    }

    targets
}

/// Function seeds: discovered call targets followed by every named entry.
///
/// An address may appear twice when a call target is also named; consumers
/// must treat the list as a multiset.
pub fn collect_entries(table: &InstructionTable, names: &FunctionNames) -> Vec<u16> {
    let mut entries = discover_call_targets(table);
    entries.extend(names.entries());
    entries
}

/// Deduplicate seeds, keeping first-seen order, and attach names.
pub fn unique_functions(entries: &[u16], names: &FunctionNames) -> Vec<Function> {
    let mut seen = FxHashSet::default();
    entries
        .iter()
        .filter(|&&entry| seen.insert(entry))
        .map(|&entry| Function {
            entry,
            name: names.get(entry).map(str::to_string),
        })
        .collect()
}
