//! Regex patterns shared across the rewrite passes and the linter
//!
//! All patterns are compiled once at startup using `LazyLock`.
//! Pass-local patterns live next to their pass; only the ones needed by more
//! than one module are collected here.

use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

/// Build a case-insensitive regex from a compile-time constant pattern.
///
/// # Panics
///
/// Panics if the pattern is invalid. This is acceptable because all patterns
/// in this module are compile-time constants that are verified by tests.
/// The panic occurs at first access of the `LazyLock` static.
pub(crate) fn build_re(pattern: &str) -> Regex {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .unwrap_or_else(|_| panic!("Invalid regex pattern: {pattern}"))
}

// ===== NOLOCK HINTS =====

/// One or more consecutive `WITH(NOLOCK)` hints, any internal spacing.
pub static NOLOCK_RUN_RE: LazyLock<Regex> = LazyLock::new(|| {
    build_re(r"WITH\s*\(\s*NOLOCK\s*\)(?:\s*WITH\s*\(\s*NOLOCK\s*\))*")
});

/// The `WITH WITH(NOLOCK)` artifact left by manual edits.
pub static WITH_WITH_NOLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| build_re(r"\bWITH\s+WITH\s*\(\s*NOLOCK\s*\)"));

/// A hint directly ahead of the cursor (used after a table reference).
pub static HINT_AHEAD_RE: LazyLock<Regex> =
    LazyLock::new(|| build_re(r"^\s*WITH\s*\(\s*NOLOCK\s*\)"));

// ===== TABLE REFERENCES =====

/// A FROM/JOIN-family keyword introducing a table reference.
/// Longer phrases first so `INNER JOIN` is not matched as bare `JOIN`.
pub static FROM_JOIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    build_re(
        r"\b(FROM|INNER\s+JOIN|LEFT\s+OUTER\s+JOIN|LEFT\s+JOIN|RIGHT\s+OUTER\s+JOIN|RIGHT\s+JOIN|FULL\s+OUTER\s+JOIN|FULL\s+JOIN|CROSS\s+JOIN|JOIN)\s+",
    )
});

/// A (possibly bracketed, possibly dotted) table reference at the cursor.
pub static TABLE_REF_RE: LazyLock<Regex> = LazyLock::new(|| {
    build_re(
        r"^(?:\[[^\]\r\n]+\]|[A-Za-z_][A-Za-z0-9_]*)(?:\.(?:\[[^\]\r\n]+\]|[A-Za-z_][A-Za-z0-9_]*))*",
    )
});

/// A candidate alias word after a table reference (same line only).
pub static ALIAS_AHEAD_RE: LazyLock<Regex> =
    LazyLock::new(|| build_re(r"^[ \t]+([A-Za-z_][A-Za-z0-9_]*)"));

/// `DELETE` directly before the cursor: its FROM is a write target.
pub static DELETE_TAIL_RE: LazyLock<Regex> = LazyLock::new(|| build_re(r"\bDELETE\s*$"));

// ===== VARIABLES =====

/// A variable starting with an uppercase letter (house style is camelCase).
pub static UPPER_VAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@([A-Z][A-Za-z0-9_]*)").unwrap());

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nolock_run() {
        assert!(NOLOCK_RUN_RE.is_match("WITH(NOLOCK)"));
        assert!(NOLOCK_RUN_RE.is_match("with ( nolock )"));
        let m = NOLOCK_RUN_RE
            .find("x WITH(NOLOCK) WITH (NOLOCK) y")
            .unwrap();
        assert_eq!(m.as_str(), "WITH(NOLOCK) WITH (NOLOCK)");
    }

    #[test]
    fn test_from_join_prefers_longest() {
        let caps = FROM_JOIN_RE.captures("INNER JOIN t").unwrap();
        assert_eq!(&caps[1], "INNER JOIN");
        let caps = FROM_JOIN_RE.captures("LEFT OUTER JOIN t").unwrap();
        assert_eq!(&caps[1], "LEFT OUTER JOIN");
    }

    #[test]
    fn test_table_ref() {
        for (input, expected) in [
            ("Users x", "Users"),
            ("[dbo].[Users] u", "[dbo].[Users]"),
            ("dbo.Users WHERE", "dbo.Users"),
            ("[My Table] t", "[My Table]"),
        ] {
            assert_eq!(TABLE_REF_RE.find(input).unwrap().as_str(), expected);
        }
        assert!(TABLE_REF_RE.find("(SELECT 1)").is_none());
        assert!(TABLE_REF_RE.find("@tableVar").is_none());
    }

    #[test]
    fn test_delete_tail() {
        assert!(DELETE_TAIL_RE.is_match("x DELETE "));
        assert!(DELETE_TAIL_RE.is_match("delete"));
        assert!(!DELETE_TAIL_RE.is_match("DELETE FROM x "));
    }

    #[test]
    fn test_hint_ahead() {
        assert!(HINT_AHEAD_RE.is_match(" WITH(NOLOCK)"));
        assert!(HINT_AHEAD_RE.is_match("  with ( nolock ) x"));
        assert!(!HINT_AHEAD_RE.is_match("alias WITH(NOLOCK)"));
    }
}
