//! Comment-adjacency fixes and trailing-whitespace trim
//!
//! Both run on the masked text, where comments are placeholder atoms: a line
//! comment that directly abuts code gets one separating space, and a block
//! comment directly followed by a statement-starting keyword (or another
//! comment) gets a newline after it. Because protected content is atomic
//! here, neither rule can ever modify the inside of a literal or comment.

use std::sync::LazyLock;

use regex::Regex;

use crate::parser::patterns::build_re;
use crate::parser::segmenter::{atom_kind, Segment, SegmentKind, MASK_OPEN};

static ATOM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("\u{E000}([0-9]+)\u{E001}").unwrap());

/// Statement starters that should begin on a fresh line after a block comment.
static STATEMENT_AHEAD_RE: LazyLock<Regex> =
    LazyLock::new(|| build_re(r"^[ \t]*(SELECT|WITH|INSERT|UPDATE|DELETE|CREATE)\b"));

/// Horizontal gap directly ahead (used to swallow it when inserting a newline).
static GAP_AHEAD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[ \t]+").unwrap());

/// Enforce comment-adjacency spacing on masked text.
#[must_use]
pub fn fix_comment_adjacency(masked: &str, store: &[Segment]) -> String {
    let mut out = String::with_capacity(masked.len() + 8);
    let mut last = 0;

    for caps in ATOM_RE.captures_iter(masked) {
        let whole = caps.get(0).unwrap();
        out.push_str(&masked[last..whole.start()]);
        last = whole.end();

        let kind = atom_kind(&caps[1], store);

        // single space before a line comment that abuts code
        if kind == Some(SegmentKind::LineComment) {
            if let Some(prev) = out.chars().next_back() {
                if !prev.is_whitespace() {
                    out.push(' ');
                }
            }
        }

        out.push_str(whole.as_str());

        // newline after a block comment preceding a statement or line comment
        if kind == Some(SegmentKind::BlockComment) {
            let rest = &masked[last..];
            let gap = GAP_AHEAD_RE.find(rest).map_or(0, |m| m.end());
            let after_gap = &rest[gap..];
            let next_comment = after_gap
                .starts_with(MASK_OPEN)
                .then(|| ATOM_RE.captures(after_gap))
                .flatten()
                .filter(|c| c.get(0).unwrap().start() == 0)
                .and_then(|c| atom_kind(&c[1], store));
            if STATEMENT_AHEAD_RE.is_match(after_gap)
                || next_comment == Some(SegmentKind::LineComment)
            {
                out.push('\n');
                last += gap;
            }
        }
    }

    out.push_str(&masked[last..]);
    out
}

/// Trim trailing whitespace per line and surrounding blank space.
#[must_use]
pub fn trim_trailing(text: &str) -> String {
    text.split('\n')
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
