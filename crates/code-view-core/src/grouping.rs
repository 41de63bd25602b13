//! Bucketing of numbered top-level nodes into per-line groups.
use crate::node::Node;

/// Groups numbered top-level nodes by line.
///
/// Bucket `i` holds the nodes whose line is `i + 1`, in their original order.
/// The result is dense: every line up to the highest one observed has a bucket,
/// empty when no node starts on it. Nodes left at line 0 (never numbered) fall
/// into the first bucket.
pub fn group_lines(nodes: Vec<Node>) -> Vec<Vec<Node>> {
    let mut lines: Vec<Vec<Node>> = Vec::new();
    for node in nodes {
        let index = node.line().saturating_sub(1);
        if lines.len() <= index {
            lines.resize_with(index + 1, Vec::new);
        }
        lines[index].push(node);
    }
    lines
}
