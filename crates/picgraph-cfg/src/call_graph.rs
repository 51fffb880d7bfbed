//! Inter-procedural call graph.

use std::collections::{BTreeMap, BTreeSet};

/// Caller entry -> set of callee entries.
///
/// Every analyzed function has a node, even if it calls nothing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CallGraph {
    edges: BTreeMap<u16, BTreeSet<u16>>,
}

impl CallGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensure a function has a node.
    pub fn add_function(&mut self, entry: u16) {
        self.edges.entry(entry).or_default();
    }

    /// Record a call edge. Returns `true` if the edge is new.
    pub fn add_call(&mut self, caller: u16, callee: u16) -> bool {
        self.edges.entry(caller).or_default().insert(callee)
    }

    /// Callees of a function.
    pub fn callees(&self, caller: u16) -> Option<&BTreeSet<u16>> {
        self.edges.get(&caller)
    }

    /// Check if a function has a node.
    pub fn contains(&self, entry: u16) -> bool {
        self.edges.contains_key(&entry)
    }

    /// Function nodes in address order.
    pub fn functions(&self) -> impl Iterator<Item = u16> + '_ {
        self.edges.keys().copied()
    }

    /// Every `(caller, callee)` edge, sorted.
    pub fn edges(&self) -> impl Iterator<Item = (u16, u16)> + '_ {
        self.edges
            .iter()
            .flat_map(|(&caller, callees)| callees.iter().map(move |&callee| (caller, callee)))
    }

    /// Number of function nodes.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Number of call edges.
    pub fn edge_count(&self) -> usize {
        self.edges.values().map(BTreeSet::len).sum()
    }
}
