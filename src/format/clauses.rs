//! Clause normalization - major clauses start their own line
//!
//! `FROM`, `WHERE`, `GROUP BY`, `ORDER BY`, `HAVING`, `UNION [ALL]`,
//! `VALUES`, `SET`, `ON` and the JOIN family are each forced onto a new
//! line. The `FROM` of a `DELETE` statement stays attached to its `DELETE`.
//! The pass is gated by `break_join_on_sections` in the pipeline.

use std::sync::LazyLock;

use regex::Regex;

use crate::parser::patterns::{build_re, DELETE_TAIL_RE};

static JOIN_BREAK_RE: LazyLock<Regex> = LazyLock::new(|| {
    build_re(
        r"\s+((?:INNER|LEFT(?:\s+OUTER)?|RIGHT(?:\s+OUTER)?|FULL(?:\s+OUTER)?|CROSS)\s+JOIN|JOIN)\s+",
    )
});
static FROM_BREAK_RE: LazyLock<Regex> = LazyLock::new(|| build_re(r"\s+FROM\s+"));
static WHERE_BREAK_RE: LazyLock<Regex> = LazyLock::new(|| build_re(r"\s+WHERE\s+"));
static GROUP_BY_BREAK_RE: LazyLock<Regex> = LazyLock::new(|| build_re(r"\s+GROUP\s+BY\s+"));
static ORDER_BY_BREAK_RE: LazyLock<Regex> = LazyLock::new(|| build_re(r"\s+ORDER\s+BY\s+"));
static HAVING_BREAK_RE: LazyLock<Regex> = LazyLock::new(|| build_re(r"\s+HAVING\s+"));
static UNION_ALL_BREAK_RE: LazyLock<Regex> = LazyLock::new(|| build_re(r"\s+UNION\s+ALL\s+"));
static UNION_BREAK_RE: LazyLock<Regex> = LazyLock::new(|| build_re(r"\s+UNION\s+"));
static ALL_AHEAD_RE: LazyLock<Regex> = LazyLock::new(|| build_re(r"^ALL\b"));
static VALUES_BREAK_RE: LazyLock<Regex> = LazyLock::new(|| build_re(r"\s+VALUES\s+"));
static SET_BREAK_RE: LazyLock<Regex> = LazyLock::new(|| build_re(r"\s+SET\s+"));
// ON must have a condition on the same line (`SET NOCOUNT ON` stays put)
static ON_BREAK_RE: LazyLock<Regex> = LazyLock::new(|| build_re(r"\s+ON[ \t]+(\S)"));
static AS_BODY_BREAK_RE: LazyLock<Regex> =
    LazyLock::new(|| build_re(r"\bAS\s+(SELECT|INSERT|UPDATE|DELETE|DECLARE|BEGIN|WITH)\b"));

/// Force each major clause keyword onto its own line.
#[must_use]
pub fn normalize_clauses(text: &str) -> String {
    let mut s = JOIN_BREAK_RE
        .replace_all(text, |caps: &regex::Captures| {
            let phrase = caps[1]
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
                .to_uppercase();
            format!("\n{phrase} ")
        })
        .into_owned();

    // FROM stays attached when it belongs to a DELETE
    let from_broken = FROM_BREAK_RE
        .replace_all(&s, |caps: &regex::Captures| {
            let start = caps.get(0).unwrap().start();
            if DELETE_TAIL_RE.is_match(&s[..start]) {
                caps[0].to_string()
            } else {
                "\nFROM ".to_string()
            }
        })
        .into_owned();
    s = from_broken;

    s = WHERE_BREAK_RE.replace_all(&s, "\nWHERE ").into_owned();
    s = GROUP_BY_BREAK_RE.replace_all(&s, "\nGROUP BY ").into_owned();
    s = ORDER_BY_BREAK_RE.replace_all(&s, "\nORDER BY ").into_owned();
    s = HAVING_BREAK_RE.replace_all(&s, "\nHAVING ").into_owned();
    s = UNION_ALL_BREAK_RE.replace_all(&s, "\nUNION ALL\n").into_owned();
    let union_broken = UNION_BREAK_RE
        .replace_all(&s, |caps: &regex::Captures| {
            // UNION ALL was already broken above; leave its UNION alone
            if ALL_AHEAD_RE.is_match(&s[caps.get(0).unwrap().end()..]) {
                caps[0].to_string()
            } else {
                "\nUNION\n".to_string()
            }
        })
        .into_owned();
    s = union_broken;
    s = VALUES_BREAK_RE.replace_all(&s, "\nVALUES ").into_owned();
    s = SET_BREAK_RE.replace_all(&s, "\nSET ").into_owned();
    s = ON_BREAK_RE.replace_all(&s, "\nON $1").into_owned();
    // a statement directly after AS starts the procedure body
    s = AS_BODY_BREAK_RE.replace_all(&s, "AS\n$1").into_owned();
    s
}
