//! Conversion of per-line node groups into renderable rows.
use std::collections::BTreeMap;

use serde::Serialize;

use crate::node::Node;
use crate::numbering::LINE_SEPARATOR;
use crate::range::{compute_highlighted, LineRange};

/// Rendered form of a token node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RenderNode {
    Element {
        /// Positional identity, `lo-<depth>-<index>`.
        key: String,
        tag: String,
        attributes: BTreeMap<String, String>,
        children: Vec<RenderNode>,
    },
    Text {
        value: String,
    },
}

/// One rendered source line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderLine {
    /// Zero-based line index.
    pub index: usize,
    /// Element id used to scroll to this line, `L<index>`.
    pub anchor_id: String,
    pub highlighted: bool,
    pub content: Vec<RenderNode>,
}

impl RenderLine {
    /// The line's text without its trailing separator.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for node in &self.content {
            node.collect_text(&mut out);
        }
        if out.ends_with(LINE_SEPARATOR) {
            out.pop();
        }
        out
    }
}

impl RenderNode {
    fn collect_text(&self, out: &mut String) {
        match self {
            Self::Text { value } => out.push_str(value),
            Self::Element { children, .. } => {
                for child in children {
                    child.collect_text(out);
                }
            }
        }
    }
}

/// Anchor id of a zero-based line.
pub fn anchor_id(index: usize) -> String {
    format!("L{index}")
}

/// Positional key of a node at `depth`, `index` among its siblings.
pub fn node_key(depth: usize, index: usize) -> String {
    format!("lo-{depth}-{index}")
}

/// Renders grouped lines, marking those inside `range` as highlighted.
pub fn render_lines(lines: Vec<Vec<Node>>, range: Option<LineRange>) -> Vec<RenderLine> {
    lines
        .into_iter()
        .enumerate()
        .map(|(index, nodes)| RenderLine {
            index,
            anchor_id: anchor_id(index),
            highlighted: compute_highlighted(range, index),
            content: render_nodes(nodes, 0),
        })
        .collect()
}

fn render_nodes(nodes: Vec<Node>, depth: usize) -> Vec<RenderNode> {
    nodes
        .into_iter()
        .enumerate()
        .map(|(index, node)| render_node(node, depth, index))
        .collect()
}

fn render_node(node: Node, depth: usize, index: usize) -> RenderNode {
    match node {
        Node::Text(leaf) => RenderNode::Text { value: leaf.value },
        Node::Container(container) => RenderNode::Element {
            key: node_key(depth, index),
            tag: container.tag,
            attributes: container.attributes,
            children: render_nodes(container.children, depth + 1),
        },
    }
}
