//! The render pipeline: tokenize, number, mark, group, render.
use crate::grouping::group_lines;
use crate::markers::{markers_for_range, wrap_lines, MarkerOptions};
use crate::node::Node;
use crate::numbering::{number_lines, FIRST_LINE};
use crate::range::{parse_range, LineRange};
use crate::render::{render_lines, RenderLine};
use crate::tokenizer::Tokenizer;

/// Options controlling how a selection is styled in the rendered tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Prefix for the default marker class.
    pub marker_prefix: String,
    /// Class given to marker wrappers around selected lines.
    pub highlight_class: String,
    /// Wrap each selected line's nodes in a marker container.
    pub wrap_highlighted: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            marker_prefix: MarkerOptions::default().prefix,
            highlight_class: "highlighted".to_string(),
            wrap_highlighted: false,
        }
    }
}

/// Line-addressable source viewer.
///
/// Holds no state between calls besides its configuration: every `render`
/// rebuilds the whole tree from its inputs.
pub struct CodeView<T> {
    tokenizer: T,
    options: RenderOptions,
}

impl<T: Tokenizer> CodeView<T> {
    pub fn new(tokenizer: T) -> Self {
        Self::with_options(tokenizer, RenderOptions::default())
    }

    pub fn with_options(tokenizer: T, options: RenderOptions) -> Self {
        Self { tokenizer, options }
    }

    /// Renders `code` into one row per logical line.
    ///
    /// Absent code means there is nothing to show and yields `None`.
    pub fn render(
        &self,
        code: Option<&str>,
        language: Option<&str>,
        range: Option<LineRange>,
    ) -> Option<Vec<RenderLine>> {
        let code = code?;
        let tree = self.tokenizer.tokenize(code, language);
        let (numbered, _) = number_lines(tree, FIRST_LINE);
        let last_line = numbered.iter().map(Node::line).max().unwrap_or(0);

        let markers = match range {
            Some(range) if self.options.wrap_highlighted => {
                markers_for_range(range, &self.options.highlight_class, last_line)
            }
            _ => Vec::new(),
        };
        let marker_options = MarkerOptions {
            prefix: self.options.marker_prefix.clone(),
        };
        let wrapped = wrap_lines(numbered, &markers, &marker_options);

        let nodes = wrapped.len();
        let lines = render_lines(group_lines(wrapped), range);
        tracing::debug!(
            lines = lines.len(),
            nodes,
            markers = markers.len(),
            ?range,
            "rendered source"
        );
        Some(lines)
    }

    /// Like [`render`](Self::render), taking the range as a descriptor.
    ///
    /// A malformed descriptor highlights nothing.
    pub fn render_with_descriptor(
        &self,
        code: Option<&str>,
        language: Option<&str>,
        descriptor: Option<&str>,
    ) -> Option<Vec<RenderLine>> {
        let range = descriptor.and_then(parse_range);
        self.render(code, language, range)
    }
}
