//! Wrapping of marked lines for per-line styling.
use serde::{Deserialize, Serialize};

use crate::node::{Container, Node, CLASS_ATTRIBUTE};
use crate::range::LineRange;

/// Tag of the wrapper container emitted for each marker.
pub const MARKER_TAG: &str = "div";

/// Requests that every top-level node of one line be wrapped for styling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marker {
    /// One-based logical line.
    pub line: usize,
    /// Class applied to the wrapper. Empty means `<prefix>marker`.
    pub class_name: String,
}

impl Marker {
    pub fn new(line: usize, class_name: impl Into<String>) -> Self {
        Self {
            line,
            class_name: class_name.into(),
        }
    }
}

/// Styling options for marker wrappers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerOptions {
    /// Prefix used to build the default wrapper class.
    pub prefix: String,
}

impl Default for MarkerOptions {
    fn default() -> Self {
        Self {
            prefix: "hl-".to_string(),
        }
    }
}

impl MarkerOptions {
    fn class_for(&self, marker: &Marker) -> String {
        if marker.class_name.is_empty() {
            format!("{}marker", self.prefix)
        } else {
            marker.class_name.clone()
        }
    }
}

/// Wraps the numbered top-level `nodes` of each marked line in a wrapper container.
///
/// `markers` must be sorted ascending by line. The scan position only ever moves
/// forward: nodes before a marker's line pass through, nodes on its line become the
/// wrapper's children, and the first node past it ends that marker's scan. One
/// wrapper is emitted per marker, in marker order, even when it collects nothing.
pub fn wrap_lines(nodes: Vec<Node>, markers: &[Marker], options: &MarkerOptions) -> Vec<Node> {
    let mut remaining = nodes.into_iter().peekable();
    let mut wrapped = Vec::new();

    for marker in markers {
        let mut children = Vec::new();
        while let Some(node) = remaining.next_if(|node| node.line() <= marker.line) {
            if node.line() < marker.line {
                wrapped.push(node);
            } else {
                children.push(node);
            }
        }

        let mut wrapper = Container::new(MARKER_TAG, children)
            .with_attribute(CLASS_ATTRIBUTE, options.class_for(marker));
        wrapper.line = marker.line;
        wrapped.push(Node::Container(wrapper));
    }

    wrapped.extend(remaining);
    wrapped
}

/// Builds one marker per line of `range`, converting its zero-based indices to
/// one-based line numbers. Lines past `last_line` are skipped.
pub fn markers_for_range(range: LineRange, class_name: &str, last_line: usize) -> Vec<Marker> {
    (range.start().saturating_add(1)..=range.end().saturating_add(1))
        .take_while(|&line| line <= last_line)
        .map(|line| Marker::new(line, class_name))
        .collect()
}
