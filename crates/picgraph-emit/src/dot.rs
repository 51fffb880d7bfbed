//! Graphviz DOT graph model and builders.

use std::fmt;

use picgraph_cfg::{CfgResult, Function};
use tracing::warn;

use crate::{Annotator, ExportConfig};

/// Escape backslashes and double quotes for use inside a quoted DOT ID.
pub fn escape_id(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

/// DOT node ID of a block.
pub fn block_id(addr: u16) -> String {
    format!("{addr:#06x}")
}

/// Ordered `key = value` attribute list. Values are written verbatim inside
/// quotes, so callers escape them first.
pub type Attributes = Vec<(&'static str, String)>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DotNode {
    pub id: String,
    pub attrs: Attributes,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DotEdge {
    pub from: String,
    pub to: String,
    pub attrs: Attributes,
}

/// A directed graph ready to be written as DOT.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DotGraph {
    pub name: String,
    /// Strict graphs merge parallel edges.
    pub strict: bool,
    pub nodes: Vec<DotNode>,
    pub edges: Vec<DotEdge>,
}

impl DotGraph {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            strict: true,
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    pub fn add_node(&mut self, id: impl Into<String>, attrs: Attributes) {
        self.nodes.push(DotNode {
            id: id.into(),
            attrs,
        });
    }

    pub fn add_edge(&mut self, from: impl Into<String>, to: impl Into<String>, attrs: Attributes) {
        self.edges.push(DotEdge {
            from: from.into(),
            to: to.into(),
            attrs,
        });
    }
}

fn write_attrs(f: &mut fmt::Formatter<'_>, attrs: &Attributes) -> fmt::Result {
    if attrs.is_empty() {
        return Ok(());
    }
    write!(f, " [")?;
    for (i, (key, value)) in attrs.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{key}=\"{value}\"")?;
    }
    write!(f, "]")
}

impl fmt::Display for DotGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.strict {
            write!(f, "strict ")?;
        }
        writeln!(f, "digraph \"{}\" {{", escape_id(&self.name))?;
        for node in &self.nodes {
            write!(f, "\t\"{}\"", node.id)?;
            write_attrs(f, &node.attrs)?;
            writeln!(f, ";")?;
        }
        for edge in &self.edges {
            write!(f, "\t\"{}\" -> \"{}\"", edge.from, edge.to)?;
            write_attrs(f, &edge.attrs)?;
            writeln!(f, ";")?;
        }
        writeln!(f, "}}")
    }
}

/// Control flow graph of one function: every block reachable from its entry.
///
/// Returns `None` when the entry has no block (entry outside the listing).
/// Edges to addresses without a block are left out.
pub fn function_graph(
    annotator: &Annotator<'_>,
    result: &CfgResult,
    function: &Function,
    config: &ExportConfig,
) -> Option<DotGraph> {
    if !result.blocks.contains(function.entry) {
        warn!(
            entry = format_args!("{:#06x}", function.entry),
            "function has no entry block, skipping graph"
        );
        return None;
    }

    let mut graph = DotGraph::new(annotator.function_name(function.entry));
    for block in result.function_blocks(function.entry) {
        let id = block_id(block.addr);
        graph.add_node(
            id.clone(),
            vec![
                ("label", annotator.block_label(block)),
                ("shape", "box".to_string()),
                ("fontname", config.font_name.clone()),
                ("fontsize", config.font_size.to_string()),
                ("width", config.node_width.to_string()),
            ],
        );

        if let (Some(taken), Some(fallthrough)) = (block.taken(), block.fallthrough()) {
            if result.blocks.contains(fallthrough) {
                graph.add_edge(
                    id.clone(),
                    block_id(fallthrough),
                    vec![("color", config.fallthrough_color.clone())],
                );
            }
            if result.blocks.contains(taken) {
                graph.add_edge(id, block_id(taken), vec![("color", config.taken_color.clone())]);
            }
        } else if let &[next] = block.successors.as_slice() {
            if result.blocks.contains(next) {
                graph.add_edge(id, block_id(next), Vec::new());
            }
        }
    }

    Some(graph)
}

/// Program-wide call graph: one node per function, one edge per call.
pub fn call_graph(annotator: &Annotator<'_>, result: &CfgResult, config: &ExportConfig) -> DotGraph {
    let mut graph = DotGraph::new(config.call_graph_name.clone());
    for entry in result.call_graph.functions() {
        graph.add_node(escape_id(&annotator.function_name(entry)), Vec::new());
    }
    for (caller, callee) in result.call_graph.edges() {
        graph.add_edge(
            escape_id(&annotator.function_name(caller)),
            escape_id(&annotator.function_name(callee)),
            Vec::new(),
        );
    }
    graph
}
