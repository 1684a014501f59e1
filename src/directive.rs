//! Inline directive parsing for `-- sqlprettier:` comments
//!
//! Supports a per-file formatting opt-out via a special comment:
//! `-- sqlprettier: off` anywhere in the file returns the input unchanged.
//! `-- sqlprettier: on` is recognized and is a no-op. Only the first
//! directive found is used.

use std::sync::LazyLock;

use regex::Regex;

/// Pattern to match sqlprettier directives
static DIRECTIVE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*--\s*sqlprettier:\s*(\S+)").unwrap());

/// Parsed directive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    On,
    Off,
}

/// Check if a line contains a sqlprettier directive
#[must_use]
pub fn is_directive_line(line: &str) -> bool {
    DIRECTIVE_RE.is_match(line)
}

/// Parse a directive line
///
/// Returns `None` when the line is not a directive or carries an unknown
/// argument (unknown arguments are ignored, never an error).
#[must_use]
pub fn parse_directive(line: &str) -> Option<Directive> {
    let caps = DIRECTIVE_RE.captures(line)?;
    match caps[1].to_ascii_lowercase().as_str() {
        "off" => Some(Directive::Off),
        "on" => Some(Directive::On),
        _ => None,
    }
}

/// Scan input for a sqlprettier directive and return the first found
#[must_use]
pub fn find_directive(text: &str) -> Option<Directive> {
    text.lines().find_map(parse_directive)
}

/// True when a `-- sqlprettier: off` directive disables formatting.
#[must_use]
pub fn formatting_disabled(text: &str) -> bool {
    find_directive(text) == Some(Directive::Off)
}
