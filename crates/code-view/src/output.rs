//! Writers for the supported output formats.
use anyhow::{Context, Result};
use clap::ValueEnum;
use code_view_config::ViewerConfig;
use code_view_core::{theme_stylesheet, to_html, HtmlOptions, RenderLine};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Html,
    Json,
    Text,
}

impl OutputFormat {
    /// Reads the format named in the config, falling back to HTML.
    pub fn from_config(config: &ViewerConfig) -> Self {
        <Self as ValueEnum>::from_str(&config.default_format, true).unwrap_or(Self::Html)
    }
}

/// Formats rendered lines for printing.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_lines(
    lines: &[RenderLine],
    format: OutputFormat,
    config: &ViewerConfig,
) -> Result<String> {
    match format {
        OutputFormat::Html => Ok(html(lines, config)),
        OutputFormat::Json => {
            serde_json::to_string_pretty(lines).context("failed to serialize rendered lines")
        }
        OutputFormat::Text => Ok(text(lines)),
    }
}

fn html(lines: &[RenderLine], config: &ViewerConfig) -> String {
    let options = HtmlOptions {
        table_class: config.table_class.clone(),
        gutter_class: config.gutter_class.clone(),
        code_class: config.code_class.clone(),
        highlight_class: config.highlight_class.clone(),
    };

    let mut out = String::new();
    if config.emit_stylesheet {
        if let Some(css) = theme_stylesheet(&config.theme, &config.class_prefix) {
            out.push_str("<style>\n");
            out.push_str(&css);
            out.push_str("</style>\n");
        }
    }
    out.push_str(&to_html(lines, &options));
    out
}

/// Plain listing with a zero-based gutter; selected lines are marked with `>`.
fn text(lines: &[RenderLine]) -> String {
    let width = lines.len().saturating_sub(1).to_string().len();
    let mut out = String::new();
    for line in lines {
        let mark = if line.highlighted { '>' } else { ' ' };
        out.push_str(&format!(
            "{mark}{:>width$} | {}\n",
            line.index,
            line.plain_text()
        ));
    }
    out
}
