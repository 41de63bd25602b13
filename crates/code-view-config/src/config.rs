/// Viewer configuration: load, save and sanitize.
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Output formats the command line host can produce.
pub const OUTPUT_FORMATS: [&str; 3] = ["html", "json", "text"];

/// Top-level viewer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Prefix applied to every token class (e.g. `hl-keyword`).
    pub class_prefix: String,
    /// Prefix for the default marker class (`<prefix>marker`).
    pub marker_prefix: String,
    /// Class for selected rows and, when wrapping, their marker wrappers.
    pub highlight_class: String,
    pub table_class: String,
    pub gutter_class: String,
    pub code_class: String,
    /// Wrap the nodes of each selected line in a marker container.
    pub wrap_highlighted_lines: bool,
    /// Language hint used when none is given. Empty = detect.
    pub default_language: String,
    /// Bundled syntect theme used for the generated stylesheet.
    pub theme: String,
    /// Prepend a `<style>` block to HTML output.
    pub emit_stylesheet: bool,
    /// One of [`OUTPUT_FORMATS`].
    pub default_format: String,
    /// Extra language hints, mapped to a syntax name or file extension.
    pub languages: BTreeMap<String, String>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            class_prefix: "hl-".to_string(),
            marker_prefix: "hl-".to_string(),
            highlight_class: "highlighted".to_string(),
            table_class: "code-table".to_string(),
            gutter_class: "line-number".to_string(),
            code_class: "code".to_string(),
            wrap_highlighted_lines: false,
            default_language: String::new(),
            theme: "InspiredGitHub".to_string(),
            emit_stylesheet: false,
            default_format: "html".to_string(),
            languages: BTreeMap::new(),
        }
    }
}

impl ViewerConfig {
    /// Returns the config file path: exe directory + `code-view.json`.
    pub fn config_path() -> PathBuf {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|d| d.join("code-view.json")))
            .unwrap_or_else(|| PathBuf::from("code-view.json"))
    }

    /// Loads config from `path`, creating a default file if it doesn't exist.
    /// Returns defaults on any error (unreadable file, parse error, etc.).
    pub fn load_or_create(path: &Path) -> Self {
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(contents) => match serde_json::from_str::<ViewerConfig>(&contents) {
                    Ok(mut config) => {
                        config.sanitize();
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {}: {e}", path.display());
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {}: {e}", path.display());
                }
            }
            // Don't overwrite a broken file
            Self::default()
        } else {
            let config = Self::default();
            if let Err(e) = config.save(path) {
                tracing::warn!("Failed to create default config at {}: {e:#}", path.display());
            }
            config
        }
    }

    /// Saves config to `path` as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize config")?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write config: {}", path.display()))
    }

    /// The language hint to use when the caller gave none.
    pub fn language_or_default<'a>(&'a self, language: Option<&'a str>) -> Option<&'a str> {
        language.or_else(|| {
            (!self.default_language.is_empty()).then_some(self.default_language.as_str())
        })
    }

    /// Resets empty class names and unknown formats, and lower-cases language hints.
    pub fn sanitize(&mut self) {
        let defaults = Self::default();
        let fields = [
            (&mut self.marker_prefix, defaults.marker_prefix),
            (&mut self.highlight_class, defaults.highlight_class),
            (&mut self.table_class, defaults.table_class),
            (&mut self.gutter_class, defaults.gutter_class),
            (&mut self.code_class, defaults.code_class),
            (&mut self.theme, defaults.theme),
        ];
        for (field, default) in fields {
            if field.trim().is_empty() {
                *field = default;
            }
        }

        self.default_format = self.default_format.to_lowercase();
        if !OUTPUT_FORMATS.contains(&self.default_format.as_str()) {
            self.default_format = defaults.default_format;
        }

        self.languages = std::mem::take(&mut self.languages)
            .into_iter()
            .filter(|(hint, token)| !hint.trim().is_empty() && !token.trim().is_empty())
            .map(|(hint, token)| (hint.trim().to_lowercase(), token.trim().to_string()))
            .collect();
    }
}
