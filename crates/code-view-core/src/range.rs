//! Line range descriptors (`#L12`, `#L12-L34`) for deep links and line clicks.
//!
//! Everything here is a pure function of its arguments. The active descriptor
//! belongs to the host's navigation state; this module only parses it, tests
//! lines against it and proposes new descriptors.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Start of the location fragment that carries a descriptor.
const FRAGMENT_MARK: char = '#';

static DESCRIPTOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#L(\d+)(?:-L(\d+))?$").expect("descriptor pattern is valid"));

/// Inclusive, zero-based range of lines. Always `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct LineRange {
    start: usize,
    end: usize,
}

impl LineRange {
    /// Creates a range, swapping the bounds if they are reversed.
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start: start.min(end),
            end: start.max(end),
        }
    }

    /// A range covering exactly one line.
    pub fn single(line: usize) -> Self {
        Self {
            start: line,
            end: line,
        }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn contains(&self, line: usize) -> bool {
        self.start <= line && line <= self.end
    }

    /// Number of lines covered.
    pub fn line_count(&self) -> usize {
        (self.end - self.start).saturating_add(1)
    }
}

impl fmt::Display for LineRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "#L{}", self.start)
        } else {
            write!(f, "#L{}-L{}", self.start, self.end)
        }
    }
}

/// Returned when a string is not a line range descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeParseError {
    input: String,
}

impl fmt::Display for RangeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "not a line range descriptor: {:?}", self.input)
    }
}

impl std::error::Error for RangeParseError {}

impl FromStr for LineRange {
    type Err = RangeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_range(s).ok_or_else(|| RangeParseError {
            input: s.to_string(),
        })
    }
}

/// Parses a descriptor such as `#L12` or `#L12-L34`.
///
/// Any text before the first `#` is ignored, so a full location may be passed.
/// The fragment itself must be exactly one descriptor; anything else, including
/// numbers too large for `usize`, yields `None`.
pub fn parse_range(descriptor: &str) -> Option<LineRange> {
    let fragment = &descriptor[descriptor.find(FRAGMENT_MARK)?..];
    let captures = DESCRIPTOR.captures(fragment)?;
    let start: usize = captures.get(1)?.as_str().parse().ok()?;
    let end = match captures.get(2) {
        Some(end) => end.as_str().parse().ok()?,
        None => start,
    };
    Some(LineRange::new(start, end))
}

/// Formats a range back into its descriptor.
pub fn format_range(range: LineRange) -> String {
    range.to_string()
}

/// Whether line `index` falls inside `range`. No range highlights nothing.
pub fn compute_highlighted(range: Option<LineRange>, index: usize) -> bool {
    range.is_some_and(|range| range.contains(index))
}

/// Descriptor selecting only the clicked line.
pub fn on_line_click(line_index: usize) -> String {
    format_range(LineRange::single(line_index))
}

/// Descriptor extending `current` from its start to the clicked line.
///
/// The current start stays the anchor; without a current range this is a plain
/// click.
pub fn on_line_extend(current: Option<LineRange>, line_index: usize) -> String {
    match current {
        Some(current) => format_range(LineRange::new(current.start, line_index)),
        None => on_line_click(line_index),
    }
}

/// Anchor id the host should scroll into view after the range changed.
pub fn scroll_target(previous: Option<LineRange>, current: Option<LineRange>) -> Option<String> {
    let current = current?;
    match previous {
        Some(previous) if previous.start == current.start => None,
        _ => Some(crate::render::anchor_id(current.start)),
    }
}
