//! Logical line numbering for token trees.
//!
//! Every node receives the one-based line it starts on, and text leaves that
//! span several lines are split into one leaf per line. The running counter is
//! threaded by value: each step returns the transformed nodes together with the
//! counter that applies to whatever follows them.
//!
//! A leaf keeps the separator that ends its line, so a value may carry a
//! trailing `\n` but never an internal one. The trailing separator advances the
//! counter for the *next* node without changing the leaf's own line, and no empty
//! leaf is emitted after it. Text ending in `\n` therefore does not gain an extra
//! empty line, and numbering an already numbered tree changes nothing.

use crate::node::{Container, Node, TextLeaf};

/// The logical line separator.
pub const LINE_SEPARATOR: char = '\n';

/// Line number assigned to the first line of a document.
pub const FIRST_LINE: usize = 1;

/// Numbers a sequence of sibling nodes starting at `line`.
///
/// Returns the numbered siblings and the counter in effect after the last one.
pub fn number_lines(nodes: Vec<Node>, line: usize) -> (Vec<Node>, usize) {
    nodes
        .into_iter()
        .fold((Vec::new(), line), |(mut numbered, line), node| {
            let (mut out, next) = number_node(node, line);
            numbered.append(&mut out);
            (numbered, next)
        })
}

/// Numbers a whole tree from the first line, discarding the final counter.
pub fn number_tree(nodes: Vec<Node>) -> Vec<Node> {
    number_lines(nodes, FIRST_LINE).0
}

/// Numbers a single node. A text leaf may come back as several leaves.
pub fn number_node(node: Node, line: usize) -> (Vec<Node>, usize) {
    match node {
        Node::Text(leaf) => split_leaf(leaf.value, line),
        Node::Container(container) => {
            let (children, next) = number_lines(container.children, line);
            let numbered = Container {
                children,
                line,
                ..container
            };
            (vec![Node::Container(numbered)], next)
        }
    }
}

fn split_leaf(value: String, line: usize) -> (Vec<Node>, usize) {
    if !value.contains(LINE_SEPARATOR) {
        return (vec![Node::Text(TextLeaf { value, line })], line);
    }

    let mut next = line;
    let leaves = value
        .split_inclusive(LINE_SEPARATOR)
        .map(|segment| {
            let leaf = Node::Text(TextLeaf {
                value: segment.to_string(),
                line: next,
            });
            if segment.ends_with(LINE_SEPARATOR) {
                next += 1;
            }
            leaf
        })
        .collect();
    (leaves, next)
}
