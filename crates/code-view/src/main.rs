mod output;

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use code_view_config::ViewerConfig;
use code_view_core::{
    decode_source, on_line_click, on_line_extend, parse_range, read_source, scroll_target,
    CodeView, LanguageTable, PlainTokenizer, RenderLine, RenderOptions, SyntectTokenizer,
    Tokenizer,
};

use output::{format_lines, OutputFormat};

/// Renders source code as numbered, highlighted lines with linkable ranges.
#[derive(Parser, Debug)]
#[command(name = "code-view", version, about)]
struct Cli {
    /// Source file to render. Reads stdin when omitted or `-`.
    file: Option<PathBuf>,

    /// Language hint (e.g. `sql`, `json`). Detected from content when omitted.
    #[arg(short, long)]
    language: Option<String>,

    /// Selected line range, e.g. `#L3` or `#L3-L7`.
    #[arg(short, long)]
    range: Option<String>,

    /// Click the given zero-based line and render with the resulting range.
    #[arg(long)]
    click: Option<usize>,

    /// Extend the current range to the clicked line instead of replacing it.
    #[arg(long, requires = "click")]
    extend: bool,

    /// Output format. Defaults to the configured format.
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Config file. Defaults to `code-view.json` next to the executable.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Skip syntax highlighting.
    #[arg(long)]
    no_highlight: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays clean for the rendered output
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config_path = cli.config.clone().unwrap_or_else(ViewerConfig::config_path);
    let config = ViewerConfig::load_or_create(&config_path);
    tracing::debug!("Using config at {}", config_path.display());

    let code = read_input(cli.file.as_deref())?;
    let descriptor = resolve_descriptor(&cli);

    let options = RenderOptions {
        marker_prefix: config.marker_prefix.clone(),
        highlight_class: config.highlight_class.clone(),
        wrap_highlighted: config.wrap_highlighted_lines,
    };
    let language = config.language_or_default(cli.language.as_deref());

    let lines = if cli.no_highlight {
        let view = CodeView::with_options(PlainTokenizer, options);
        render(&view, &code, language, descriptor.as_deref())
    } else {
        let mut languages = LanguageTable::default();
        for (hint, token) in &config.languages {
            languages.insert(hint, token);
        }
        let tokenizer =
            SyntectTokenizer::new(languages).with_class_prefix(config.class_prefix.clone());
        let view = CodeView::with_options(tokenizer, options);
        render(&view, &code, language, descriptor.as_deref())
    };

    let format = cli.format.unwrap_or_else(|| OutputFormat::from_config(&config));
    let rendered = format_lines(&lines, format, &config)?;

    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(rendered.as_bytes())
        .context("failed to write output")?;
    stdout.flush().context("failed to write output")?;

    Ok(())
}

/// Reads the source from `path`, or stdin for `None` / `-`.
fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => read_source(path),
        _ => {
            let mut bytes = Vec::new();
            std::io::stdin()
                .read_to_end(&mut bytes)
                .context("failed to read stdin")?;
            decode_source(&bytes).context("failed to decode stdin")
        }
    }
}

/// Applies a simulated click to the requested range and reports the result.
fn resolve_descriptor(cli: &Cli) -> Option<String> {
    let current = cli.range.as_deref().and_then(parse_range);
    if cli.range.is_some() && current.is_none() {
        tracing::warn!("Ignoring malformed range {:?}", cli.range);
    }

    let Some(line) = cli.click else {
        return cli.range.clone();
    };

    let descriptor = if cli.extend {
        on_line_extend(current, line)
    } else {
        on_line_click(line)
    };
    eprintln!("range: {descriptor}");
    if let Some(anchor) = scroll_target(current, parse_range(&descriptor)) {
        tracing::info!(anchor = %anchor, "scroll into view");
    }
    Some(descriptor)
}

fn render<T: Tokenizer>(
    view: &CodeView<T>,
    code: &str,
    language: Option<&str>,
    descriptor: Option<&str>,
) -> Vec<RenderLine> {
    view.render_with_descriptor(Some(code), language, descriptor)
        .unwrap_or_default()
}
