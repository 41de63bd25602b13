//! Line-addressable source rendering.
//!
//! Raw text is tokenized into a tree, every node is assigned the logical line
//! it starts on, selected lines can be wrapped for styling, and the nodes are
//! grouped into one rendered row per line, each with a stable `L<index>`
//! anchor. Line ranges travel as `#L<start>[-L<end>]` descriptors.

pub mod grouping;
pub mod html;
pub mod markers;
pub mod node;
pub mod numbering;
pub mod range;
pub mod render;
pub mod source;
pub mod tokenizer;
pub mod view;

pub use grouping::group_lines;
pub use html::{theme_stylesheet, to_html, HtmlOptions};
pub use markers::{markers_for_range, wrap_lines, Marker, MarkerOptions};
pub use node::{Container, Node, TextLeaf};
pub use numbering::{number_lines, number_tree};
pub use range::{
    compute_highlighted, format_range, on_line_click, on_line_extend, parse_range, scroll_target,
    LineRange, RangeParseError,
};
pub use render::{anchor_id, render_lines, RenderLine, RenderNode};
pub use source::{decode_source, read_source};
pub use tokenizer::{LanguageTable, PlainTokenizer, SyntectTokenizer, Tokenizer};
pub use view::{CodeView, RenderOptions};
