/// Token tree model shared by every pipeline stage.
use std::collections::BTreeMap;

use serde::Serialize;

/// Attribute name used for CSS classes on containers.
pub const CLASS_ATTRIBUTE: &str = "class";

/// A node of the token tree: either literal text or a tagged container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    Text(TextLeaf),
    Container(Container),
}

/// A run of literal source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextLeaf {
    pub value: String,
    /// One-based logical source line. Zero until the tree is numbered.
    pub line: usize,
}

/// A tagged element wrapping other nodes (a highlighted token, a line marker).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Container {
    pub tag: String,
    pub attributes: BTreeMap<String, String>,
    pub children: Vec<Node>,
    /// One-based logical source line of the first descendant.
    pub line: usize,
}

impl Node {
    /// Creates an unnumbered text leaf.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(TextLeaf {
            value: value.into(),
            line: 0,
        })
    }

    /// Creates an unnumbered container with no attributes.
    pub fn container(tag: impl Into<String>, children: Vec<Node>) -> Self {
        Self::Container(Container::new(tag, children))
    }

    /// Creates an unnumbered container carrying a `class` attribute.
    pub fn classed(tag: impl Into<String>, class: impl Into<String>, children: Vec<Node>) -> Self {
        Self::Container(Container::new(tag, children).with_attribute(CLASS_ATTRIBUTE, class))
    }

    /// Returns the logical line assigned to this node.
    pub fn line(&self) -> usize {
        match self {
            Self::Text(leaf) => leaf.line,
            Self::Container(container) => container.line,
        }
    }

    /// Returns a copy of this node with its own line replaced (children untouched).
    pub fn at_line(mut self, line: usize) -> Self {
        match &mut self {
            Self::Text(leaf) => leaf.line = line,
            Self::Container(container) => container.line = line,
        }
        self
    }

    /// Concatenates all text beneath this node, in document order.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Self::Text(leaf) => out.push_str(&leaf.value),
            Self::Container(container) => {
                for child in &container.children {
                    child.collect_text(out);
                }
            }
        }
    }
}

impl Container {
    pub fn new(tag: impl Into<String>, children: Vec<Node>) -> Self {
        Self {
            tag: tag.into(),
            attributes: BTreeMap::new(),
            children,
            line: 0,
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Returns the `class` attribute, if any.
    pub fn class(&self) -> Option<&str> {
        self.attributes.get(CLASS_ATTRIBUTE).map(String::as_str)
    }
}
