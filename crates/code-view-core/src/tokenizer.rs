/// Tokenizers that turn raw source text into a token tree.
use std::collections::BTreeMap;

use anyhow::Result;
use syntect::parsing::{
    BasicScopeStackOp, ParseState, Scope, ScopeStack, SyntaxReference, SyntaxSet,
};
use syntect::util::LinesWithEndings;

use crate::node::{Container, Node, CLASS_ATTRIBUTE};

/// Class prefix applied to every scope atom by default.
pub const DEFAULT_CLASS_PREFIX: &str = "hl-";

/// Tag used for highlighted token containers.
pub const TOKEN_TAG: &str = "span";

/// Produces a token tree for a piece of source text.
///
/// Implementations must be total: any input yields a well-formed tree, falling
/// back to plain text when highlighting is not possible.
pub trait Tokenizer {
    fn tokenize(&self, text: &str, language: Option<&str>) -> Vec<Node>;
}

/// Tokenizer that performs no highlighting.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTokenizer;

impl Tokenizer for PlainTokenizer {
    fn tokenize(&self, text: &str, _language: Option<&str>) -> Vec<Node> {
        plain_tree(text)
    }
}

fn plain_tree(text: &str) -> Vec<Node> {
    if text.is_empty() {
        Vec::new()
    } else {
        vec![Node::text(text)]
    }
}

/// Maps language hints to syntax tokens understood by the highlighter.
///
/// Hints are matched case-insensitively. The table is handed to the tokenizer
/// at construction; there is no global registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageTable {
    entries: BTreeMap<String, String>,
}

impl Default for LanguageTable {
    fn default() -> Self {
        Self::new()
            .register("json", "json")
            .register("sql", "sql")
            .register("mysql", "sql")
    }
}

impl LanguageTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Registers `hint` as resolving to the syntax found by `syntax_token`
    /// (a syntax name or file extension).
    pub fn register(mut self, hint: &str, syntax_token: &str) -> Self {
        self.insert(hint, syntax_token);
        self
    }

    pub fn insert(&mut self, hint: &str, syntax_token: &str) {
        self.entries
            .insert(hint.to_lowercase(), syntax_token.to_string());
    }

    /// Returns the syntax token registered for `hint`.
    pub fn lookup(&self, hint: &str) -> Option<&str> {
        self.entries.get(&hint.to_lowercase()).map(String::as_str)
    }
}

/// Syntax highlighting tokenizer backed by syntect.
///
/// Every scope becomes a `span` whose `class` lists the scope atoms with the
/// class prefix (`keyword.other.sql` → `hl-keyword hl-other hl-sql`). Scopes
/// still open at the end of a line are closed there and reopened on the next
/// line, so each top-level node belongs to a single line.
pub struct SyntectTokenizer {
    syntax_set: SyntaxSet,
    languages: LanguageTable,
    class_prefix: String,
}

impl SyntectTokenizer {
    /// Creates a tokenizer with the default syntax definitions.
    pub fn new(languages: LanguageTable) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            languages,
            class_prefix: DEFAULT_CLASS_PREFIX.to_string(),
        }
    }

    pub fn with_class_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.class_prefix = prefix.into();
        self
    }

    /// Picks the syntax for `text`.
    ///
    /// A registered hint wins. Otherwise the content is sniffed for one of the
    /// registered JSON or SQL hints, then the first line is matched against the
    /// bundled syntaxes, and plain text is the last resort.
    pub fn resolve_syntax(&self, text: &str, language: Option<&str>) -> &SyntaxReference {
        if let Some(hint) = language {
            if let Some(syntax) = self.registered_syntax(hint) {
                return syntax;
            }
            tracing::debug!(hint, "unknown language hint, detecting from content");
        }

        if let Some(syntax) = sniff_language(text).and_then(|hint| self.registered_syntax(hint)) {
            tracing::debug!(syntax = %syntax.name, "detected language from content");
            return syntax;
        }

        text.lines()
            .next()
            .and_then(|first| self.syntax_set.find_syntax_by_first_line(first))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text())
    }

    fn registered_syntax(&self, hint: &str) -> Option<&SyntaxReference> {
        self.languages
            .lookup(hint)
            .and_then(|token| self.syntax_set.find_syntax_by_token(token))
    }

    fn highlight(&self, text: &str, syntax: &SyntaxReference) -> Result<Vec<Node>> {
        let mut state = ParseState::new(syntax);
        let mut scopes = ScopeStack::new();
        let mut nodes = Vec::new();

        for line in LinesWithEndings::from(text) {
            let ops = state.parse_line(line, &self.syntax_set)?;
            let mut builder = LineBuilder::reopen(scopes.as_slice(), &self.class_prefix);
            let mut pos = 0;
            for (at, op) in ops {
                if at > pos {
                    builder.text(&line[pos..at]);
                    pos = at;
                }
                scopes.apply_with_hook(&op, |basic, _| match basic {
                    BasicScopeStackOp::Push(scope) => builder.open(scope),
                    BasicScopeStackOp::Pop => builder.close(),
                })?;
            }
            builder.text(&line[pos..]);
            nodes.extend(builder.finish());
        }

        Ok(nodes)
    }
}

impl Tokenizer for SyntectTokenizer {
    fn tokenize(&self, text: &str, language: Option<&str>) -> Vec<Node> {
        let syntax = self.resolve_syntax(text, language);
        tracing::debug!(syntax = %syntax.name, "tokenizing");
        match self.highlight(text, syntax) {
            Ok(nodes) => nodes,
            Err(e) => {
                tracing::warn!(syntax = %syntax.name, "highlighting failed, using plain text: {e}");
                plain_tree(text)
            }
        }
    }
}

/// Builds the token nodes of one source line from scope push/pop events.
struct LineBuilder<'a> {
    prefix: &'a str,
    root: Vec<Node>,
    open: Vec<Container>,
}

impl<'a> LineBuilder<'a> {
    /// Starts a line with the scopes carried over from the previous one.
    fn reopen(scopes: &[Scope], prefix: &'a str) -> Self {
        let mut builder = Self {
            prefix,
            root: Vec::new(),
            open: Vec::new(),
        };
        for &scope in scopes {
            builder.open(scope);
        }
        builder
    }

    fn open(&mut self, scope: Scope) {
        let class = scope_class(scope, self.prefix);
        self.open
            .push(Container::new(TOKEN_TAG, Vec::new()).with_attribute(CLASS_ATTRIBUTE, class));
    }

    fn close(&mut self) {
        if let Some(container) = self.open.pop() {
            if !container.children.is_empty() {
                self.attach(Node::Container(container));
            }
        }
    }

    fn text(&mut self, text: &str) {
        if !text.is_empty() {
            self.attach(Node::text(text));
        }
    }

    fn attach(&mut self, node: Node) {
        match self.open.last_mut() {
            Some(parent) => parent.children.push(node),
            None => self.root.push(node),
        }
    }

    fn finish(mut self) -> Vec<Node> {
        while !self.open.is_empty() {
            self.close();
        }
        self.root
    }
}

/// Statements that open an SQL script.
const SQL_KEYWORDS: &[&str] = &[
    "ALTER", "BEGIN", "COMMIT", "CREATE", "DELETE", "DESCRIBE", "DROP", "EXPLAIN", "GRANT",
    "INSERT", "REPLACE", "REVOKE", "ROLLBACK", "SELECT", "SET", "SHOW", "TRUNCATE", "UPDATE",
    "USE", "WITH",
];

/// Guesses a language hint from the content alone.
///
/// An object or array that parses as JSON is `json`; text whose first word is
/// an SQL statement keyword is `sql`.
pub fn sniff_language(text: &str) -> Option<&'static str> {
    let trimmed = text.trim_start();
    if trimmed.starts_with(['{', '['])
        && serde_json::from_str::<serde::de::IgnoredAny>(trimmed).is_ok()
    {
        return Some("json");
    }

    let word: String = trimmed
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();
    let word = word.to_ascii_uppercase();
    SQL_KEYWORDS.contains(&word.as_str()).then_some("sql")
}

fn scope_class(scope: Scope, prefix: &str) -> String {
    scope
        .build_string()
        .split('.')
        .map(|atom| format!("{prefix}{atom}"))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(nodes: &[Node]) -> String {
        nodes.iter().map(Node::text_content).collect()
    }

    fn classes(nodes: &[Node], out: &mut Vec<String>) {
        for node in nodes {
            if let Node::Container(c) = node {
                if let Some(class) = c.class() {
                    out.push(class.to_string());
                }
                classes(&c.children, out);
            }
        }
    }

    #[test]
    fn plain_tokenizer_returns_single_leaf() {
        assert_eq!(PlainTokenizer.tokenize("a\nb", None), vec![Node::text("a\nb")]);
        assert!(PlainTokenizer.tokenize("", None).is_empty());
    }

    #[test]
    fn default_table_knows_json_and_sql() {
        let table = LanguageTable::default();
        assert_eq!(table.lookup("json"), Some("json"));
        assert_eq!(table.lookup("SQL"), Some("sql"));
        assert_eq!(table.lookup("MySQL"), Some("sql"));
        assert_eq!(table.lookup("cobol"), None);
    }

    #[test]
    fn resolves_registered_hints() {
        let tokenizer = SyntectTokenizer::new(LanguageTable::default());
        assert_eq!(tokenizer.resolve_syntax("", Some("sql")).name, "SQL");
        assert_eq!(tokenizer.resolve_syntax("", Some("json")).name, "JSON");
    }

    #[test]
    fn unregistered_hint_falls_back_to_detection() {
        let tokenizer = SyntectTokenizer::new(LanguageTable::new());
        assert_eq!(tokenizer.resolve_syntax("SELECT 1", Some("sql")).name, "Plain Text");
        assert_eq!(
            tokenizer.resolve_syntax("#!/bin/bash\necho hi", Some("sql")).name,
            "Bourne Again Shell (bash)"
        );
    }

    #[test]
    fn no_hint_and_no_signal_is_plain_text() {
        let tokenizer = SyntectTokenizer::new(LanguageTable::default());
        assert_eq!(tokenizer.resolve_syntax("hello world", None).name, "Plain Text");
        assert_eq!(tokenizer.resolve_syntax("", None).name, "Plain Text");
    }

    #[test]
    fn no_hint_detects_json_and_sql_from_content() {
        let tokenizer = SyntectTokenizer::new(LanguageTable::default());
        assert_eq!(tokenizer.resolve_syntax("{\"name\": \"commerce\"}", None).name, "JSON");
        assert_eq!(tokenizer.resolve_syntax("  [1, 2]\n", None).name, "JSON");
        assert_eq!(tokenizer.resolve_syntax("SELECT id FROM product;", None).name, "SQL");
        assert_eq!(tokenizer.resolve_syntax("create table t (id int)", None).name, "SQL");
    }

    #[test]
    fn unknown_hint_still_sniffs_content() {
        let tokenizer = SyntectTokenizer::new(LanguageTable::default());
        assert_eq!(tokenizer.resolve_syntax("SELECT 1", Some("cobol")).name, "SQL");
    }

    #[test]
    fn sniffing_needs_a_registered_hint() {
        let tokenizer = SyntectTokenizer::new(LanguageTable::new().register("json", "json"));
        assert_eq!(tokenizer.resolve_syntax("SELECT 1", None).name, "Plain Text");
    }

    #[test]
    fn sniff_language_cases() {
        assert_eq!(sniff_language("{\"a\": [1, 2]}"), Some("json"));
        assert_eq!(sniff_language("{ not json"), None);
        assert_eq!(sniff_language("42"), None);
        assert_eq!(sniff_language("\n  Update t SET x = 1"), Some("sql"));
        assert_eq!(sniff_language("SELECTED works"), None);
        assert_eq!(sniff_language("fn main() {}"), None);
    }

    #[test]
    fn highlighting_preserves_text() {
        let tokenizer = SyntectTokenizer::new(LanguageTable::default());
        let code = "SELECT id, name\nFROM users -- all of them\nWHERE id = 'x';\n";
        let nodes = tokenizer.tokenize(code, Some("sql"));
        assert_eq!(text_of(&nodes), code);
    }

    #[test]
    fn scopes_become_prefixed_classes() {
        let tokenizer = SyntectTokenizer::new(LanguageTable::default()).with_class_prefix("tok-");
        let nodes = tokenizer.tokenize("{\"a\": 1}", Some("json"));
        let mut found = Vec::new();
        classes(&nodes, &mut found);
        assert!(!found.is_empty());
        assert!(found
            .iter()
            .all(|class| class.split(' ').all(|atom| atom.starts_with("tok-"))));
        assert!(found.iter().any(|class| class.contains("tok-json")));
    }

    #[test]
    fn top_level_nodes_never_span_lines() {
        let tokenizer = SyntectTokenizer::new(LanguageTable::default());
        let code = "SELECT /* a\nmulti-line\ncomment */ 1;\n";
        for node in tokenizer.tokenize(code, Some("sql")) {
            let text = node.text_content();
            let body = text.strip_suffix('\n').unwrap_or(&text);
            assert!(!body.contains('\n'), "node spans lines: {text:?}");
        }
    }

    #[test]
    fn scope_class_prefixes_every_atom() {
        let scope = Scope::new("keyword.other.sql").unwrap();
        assert_eq!(scope_class(scope, "hl-"), "hl-keyword hl-other hl-sql");
    }
}
