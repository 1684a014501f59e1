//! Whitespace normalization for T-SQL code
//!
//! Per line, preserving leading indentation: collapse runs of spaces, force
//! one space after commas, and pad comparison operators symmetrically.
//! String literals and comments are placeholder atoms at this point, so
//! nothing here can touch protected content.

use std::sync::LazyLock;

use regex::Regex;

static COMMA_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]*,[ \t]*").unwrap());
static COMPARISON_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]*(<>|!=|<=|>=|=|<|>)[ \t]*").unwrap());
static MULTISPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]{2,}").unwrap());

/// Normalize comma and comparison-operator spacing, collapse space runs.
#[must_use]
pub fn normalize_spacing(text: &str) -> String {
    text.split('\n')
        .map(format_line)
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_line(line: &str) -> String {
    let body_start = line.len() - line.trim_start_matches([' ', '\t']).len();
    let (indent, body) = line.split_at(body_start);
    let out = COMMA_RE.replace_all(body, ", ");
    let out = COMPARISON_RE.replace_all(&out, " $1 ");
    let out = MULTISPACE_RE.replace_all(&out, " ");
    format!("{indent}{out}")
}
