//! HTML serialization of rendered lines.

use syntect::highlighting::ThemeSet;
use syntect::html::{css_for_theme_with_class_style, ClassStyle};

use crate::render::{RenderLine, RenderNode};
use crate::tokenizer::DEFAULT_CLASS_PREFIX;

/// Class names used for the table structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlOptions {
    pub table_class: String,
    pub gutter_class: String,
    pub code_class: String,
    /// Added to rows inside the selected range.
    pub highlight_class: String,
}

impl Default for HtmlOptions {
    fn default() -> Self {
        Self {
            table_class: "code-table".to_string(),
            gutter_class: "line-number".to_string(),
            code_class: "code".to_string(),
            highlight_class: "highlighted".to_string(),
        }
    }
}

/// Writes `lines` as a `<table>` with one row per line.
///
/// Each row has a gutter cell carrying the line's anchor id and a code cell
/// holding the rendered nodes inside `<code>`.
pub fn to_html(lines: &[RenderLine], options: &HtmlOptions) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "<table class=\"{}\">\n",
        escape(&options.table_class)
    ));
    out.push_str("<tbody>\n");
    for line in lines {
        if line.highlighted {
            out.push_str(&format!(
                "<tr class=\"{}\">",
                escape(&options.highlight_class)
            ));
        } else {
            out.push_str("<tr>");
        }
        out.push_str(&format!(
            "<td class=\"{}\" data-line-number=\"{}\" id=\"{}\"></td>",
            escape(&options.gutter_class),
            line.index,
            escape(&line.anchor_id),
        ));
        out.push_str(&format!(
            "<td class=\"{}\"><code>",
            escape(&options.code_class)
        ));
        for node in &line.content {
            write_node(&mut out, node);
        }
        out.push_str("</code></td></tr>\n");
    }
    out.push_str("</tbody>\n</table>\n");
    out
}

fn write_node(out: &mut String, node: &RenderNode) {
    match node {
        RenderNode::Text { value } => out.push_str(&escape(value)),
        RenderNode::Element {
            tag,
            attributes,
            children,
            ..
        } => {
            out.push('<');
            out.push_str(tag);
            for (name, value) in attributes {
                out.push_str(&format!(" {name}=\"{}\"", escape(value)));
            }
            out.push('>');
            for child in children {
                write_node(out, child);
            }
            out.push_str(&format!("</{tag}>"));
        }
    }
}

/// Escapes text for use in HTML content and quoted attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// CSS for a bundled syntect theme, matching the token classes.
///
/// Only the default class prefix (or no prefix) can be styled; other prefixes
/// and unknown themes yield `None`.
pub fn theme_stylesheet(theme_name: &str, class_prefix: &str) -> Option<String> {
    let style = match class_prefix {
        "" => ClassStyle::Spaced,
        DEFAULT_CLASS_PREFIX => ClassStyle::SpacedPrefixed {
            prefix: DEFAULT_CLASS_PREFIX,
        },
        other => {
            tracing::warn!(prefix = other, "no stylesheet available for class prefix");
            return None;
        }
    };

    let themes = ThemeSet::load_defaults();
    let Some(theme) = themes.themes.get(theme_name) else {
        tracing::warn!(theme = theme_name, "unknown theme");
        return None;
    };

    match css_for_theme_with_class_style(theme, style) {
        Ok(css) => Some(css),
        Err(e) => {
            tracing::warn!(theme = theme_name, "failed to build stylesheet: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;
    use crate::range::LineRange;
    use crate::render::render_lines;

    #[test]
    fn rows_carry_anchor_and_line_number() {
        let lines = render_lines(
            vec![vec![Node::text("a\n")], vec![Node::text("b")]],
            Some(LineRange::single(1)),
        );
        let html = to_html(&lines, &HtmlOptions::default());
        assert!(html.contains("<td class=\"line-number\" data-line-number=\"0\" id=\"L0\"></td>"));
        assert!(html.contains("<tr class=\"highlighted\"><td class=\"line-number\" data-line-number=\"1\" id=\"L1\">"));
        assert_eq!(html.matches("<tr").count(), 2);
    }

    #[test]
    fn elements_and_text_are_escaped() {
        let lines = render_lines(
            vec![vec![Node::classed(
                "span",
                "a\"b",
                vec![Node::text("x < y && y > \"z\"")],
            )]],
            None,
        );
        let html = to_html(&lines, &HtmlOptions::default());
        assert!(html.contains("<span class=\"a&quot;b\">x &lt; y &amp;&amp; y &gt; &quot;z&quot;</span>"));
    }

    #[test]
    fn document_layout() {
        let lines = render_lines(
            vec![vec![Node::classed("span", "k", vec![Node::text("x")])]],
            None,
        );
        assert_eq!(
            to_html(&lines, &HtmlOptions::default()),
            "<table class=\"code-table\">\n<tbody>\n\
             <tr><td class=\"line-number\" data-line-number=\"0\" id=\"L0\"></td>\
             <td class=\"code\"><code><span class=\"k\">x</span></code></td></tr>\n\
             </tbody>\n</table>\n"
        );
        assert_eq!(
            to_html(&[], &HtmlOptions::default()),
            "<table class=\"code-table\">\n<tbody>\n</tbody>\n</table>\n"
        );
    }

    #[test]
    fn escape_leaves_plain_text_alone() {
        assert_eq!(escape("SELECT 1"), "SELECT 1");
        assert_eq!(escape("it's"), "it&#39;s");
    }

    #[test]
    fn stylesheet_for_default_prefix() {
        let css = theme_stylesheet("InspiredGitHub", DEFAULT_CLASS_PREFIX).unwrap();
        assert!(css.contains(".hl-"));
    }

    #[test]
    fn stylesheet_rejects_unknown_theme_and_prefix() {
        assert!(theme_stylesheet("no-such-theme", DEFAULT_CLASS_PREFIX).is_none());
        assert!(theme_stylesheet("InspiredGitHub", "custom-").is_none());
    }
}
