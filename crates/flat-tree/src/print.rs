//! Diagnostic text rendering.

use std::fmt::{self, Write};

use crate::graph::NodeGraph;
use crate::node::NodeIndex;

/// Writes one `- id` line per reachable node, indented two spaces per level
/// below the top level. Continuation lines of multi-line ids line up under
/// the first line.
pub(crate) fn write_outline(graph: &NodeGraph, out: &mut impl Write) -> fmt::Result {
    let top = graph.node(graph.root()).children();
    let mut stack: Vec<(NodeIndex, usize)> = top.iter().rev().map(|&c| (c, 0)).collect();
    let mut first = true;
    while let Some((index, depth)) = stack.pop() {
        let node = graph.node(index);
        stack.extend(node.children().iter().rev().map(|&c| (c, depth + 1)));
        let tab = "  ".repeat(depth);
        if !first {
            out.write_char('\n')?;
        }
        first = false;
        let label = node.id().to_string();
        let mut lines = label.split('\n');
        write!(out, "{tab}- {}", lines.next().unwrap_or_default())?;
        for line in lines {
            write!(out, "\n{tab}  {line}")?;
        }
    }
    Ok(())
}
