//! `WITH(NOLOCK)` hint maintenance
//!
//! Three passes live here:
//! - the collapser, which runs first so no later pass sees duplicated hints
//! - the inserter, which appends the hint after FROM/JOIN table references
//! - the residual collapser, the final safety net for duplicate hints and
//!   doubled brackets
//!
//! Write targets never receive the read hint: `INSERT INTO` and `UPDATE`
//! are not in the trigger set, and a `FROM` directly preceded by `DELETE`
//! is skipped.

use std::sync::LazyLock;

use regex::Regex;

use crate::parser::patterns::{
    ALIAS_AHEAD_RE, DELETE_TAIL_RE, FROM_JOIN_RE, HINT_AHEAD_RE, NOLOCK_RUN_RE, TABLE_REF_RE,
    WITH_WITH_NOLOCK_RE,
};
use crate::parser::tokens::{is_keyword, pascal_case};

static NOLOCK_PAREN_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\(NOLOCK\)(?:\s*\(NOLOCK\))+").unwrap());
static DOUBLE_OPEN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[\s*\[+").unwrap());
static DOUBLE_CLOSE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\]+\s*\]").unwrap());

/// Collapse pre-existing repeated hints into the canonical `WITH(NOLOCK)`.
#[must_use]
pub fn collapse_nolock(text: &str) -> String {
    let out = NOLOCK_RUN_RE.replace_all(text, "WITH(NOLOCK)");
    WITH_WITH_NOLOCK_RE
        .replace_all(&out, "WITH(NOLOCK)")
        .into_owned()
}

/// Append `WITH(NOLOCK)` after each unhinted FROM/JOIN table reference.
///
/// The reference is skipped when it is a variable, a parenthesized subquery,
/// already hinted (directly or past its alias), or the FROM of a DELETE.
/// Single-part references gain the default `[dbo].` schema prefix here; all
/// parts are re-rendered bracketed and PascalCased.
#[must_use]
pub fn insert_nolock(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 32);
    let mut last = 0;

    for caps in FROM_JOIN_RE.captures_iter(text) {
        let whole = caps.get(0).unwrap();
        if whole.start() < last {
            continue;
        }
        let op = normalize_phrase(&caps[1]);
        if op == "FROM" && DELETE_TAIL_RE.is_match(&text[..whole.start()]) {
            continue;
        }

        let rest = &text[whole.end()..];
        let Some(ref_match) = TABLE_REF_RE.find(rest) else {
            // variable, subquery or placeholder follows; nothing to hint
            continue;
        };
        let table = ref_match.as_str();
        let parts = split_table_parts(table);
        if parts.len() == 1 && is_keyword(strip_brackets_part(parts[0])) {
            continue;
        }

        let after_ref = &rest[ref_match.end()..];
        let (alias, alias_len) = match ALIAS_AHEAD_RE.captures(after_ref) {
            Some(alias_caps) if !is_keyword(&alias_caps[1]) => {
                let m = alias_caps.get(0).unwrap();
                (Some(alias_caps.get(1).unwrap().as_str()), m.end())
            }
            _ => (None, 0),
        };
        if HINT_AHEAD_RE.is_match(&after_ref[alias_len..]) {
            continue;
        }

        let mapped = render_table(&parts);
        out.push_str(&text[last..whole.start()]);
        out.push_str(&op);
        out.push(' ');
        out.push_str(&mapped);
        if let Some(alias) = alias {
            out.push(' ');
            out.push_str(alias);
        }
        out.push_str(" WITH(NOLOCK)");
        last = whole.end() + ref_match.end() + alias_len;
    }

    out.push_str(&text[last..]);
    out
}

/// Final safety pass: residual duplicate hints and doubled brackets.
#[must_use]
pub fn collapse_residual(text: &str) -> String {
    let out = collapse_nolock(text);
    let out = NOLOCK_PAREN_RUN_RE.replace_all(&out, "(NOLOCK)");
    let out = DOUBLE_OPEN_RE.replace_all(&out, "[");
    DOUBLE_CLOSE_RE.replace_all(&out, "]").into_owned()
}

fn normalize_phrase(phrase: &str) -> String {
    phrase
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

/// Split a table reference on dots, keeping bracketed parts whole
/// (`[my.table]` is one part).
fn split_table_parts(table: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let bytes = table.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let start = i;
        if bytes[i] == b'[' {
            while i < bytes.len() && bytes[i] != b']' {
                i += 1;
            }
            i = (i + 1).min(bytes.len());
        } else {
            while i < bytes.len() && bytes[i] != b'.' {
                i += 1;
            }
        }
        parts.push(&table[start..i]);
        if i < bytes.len() && bytes[i] == b'.' {
            i += 1;
        }
    }
    parts
}

fn strip_brackets_part(part: &str) -> &str {
    part.trim_start_matches('[').trim_end_matches(']')
}

fn render_table(parts: &[&str]) -> String {
    if parts.len() == 1 {
        format!("[dbo].[{}]", pascal_case(strip_brackets_part(parts[0])))
    } else {
        parts
            .iter()
            .map(|p| format!("[{}]", pascal_case(strip_brackets_part(p))))
            .collect::<Vec<_>>()
            .join(".")
    }
}
