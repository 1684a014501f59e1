//! Style diagnostics for T-SQL source
//!
//! The linter is a secondary consumer of the token rules: it re-tokenizes the
//! raw text line by line with targeted patterns and emits positioned
//! diagnostics. It shares the keyword set with the formatter but no mutable
//! state; `lint` is a pure function of (text, config snapshot) and always
//! returns a (possibly empty) list. Ranges are zero-based with half-open
//! columns, one diagnostic per violation occurrence.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::config::LintConfig;
use crate::parser::patterns::{build_re, HINT_AHEAD_RE, TABLE_REF_RE, UPPER_VAR_RE};
use crate::parser::tokens::{camel_case, is_keyword};

static SELECT_STAR_RE: LazyLock<Regex> = LazyLock::new(|| build_re(r"SELECT\s+\*"));
static FROM_JOIN_WORD_RE: LazyLock<Regex> = LazyLock::new(|| build_re(r"\b(FROM|JOIN)\s+"));
static WRITE_TARGET_TAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| build_re(r"\b(INSERT\s+INTO|UPDATE|DELETE)\s*$"));
static ALIAS_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s+([A-Za-z_][A-Za-z0-9_]*)").unwrap());
static DECIMAL_RE: LazyLock<Regex> =
    LazyLock::new(|| build_re(r"DECIMAL\s*\(\s*(\d+)\s*,\s*(\d+)\s*\)"));
static NVARCHAR_RE: LazyLock<Regex> = LazyLock::new(|| build_re(r"NVARCHAR\s*\(\s*(\d+)\s*\)"));
// case-sensitive on purpose: only capitalized names look like table names
static NO_SCHEMA_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?i:(FROM|JOIN|INTO|UPDATE))\s+\[?([A-Z][A-Za-z0-9_]+)\]?").unwrap()
});
static PROC_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    build_re(r"CREATE\s+PROCEDURE\s+(\[?[A-Za-z0-9_]+\]?\.)?\[?([A-Za-z0-9_.]+)\]?")
});
static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.\d+\.\d+$").unwrap());

/// Diagnostic severity, mirroring the editor-host levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Information,
    Hint,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Information => write!(f, "information"),
            Severity::Hint => write!(f, "hint"),
        }
    }
}

/// A positioned style violation. Zero-based line/column, half-open columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub start_line: usize,
    pub start_column: usize,
    pub end_line: usize,
    pub end_column: usize,
    pub message: String,
    pub severity: Severity,
}

impl Diagnostic {
    fn on_line(line: usize, start: usize, end: usize, message: String, severity: Severity) -> Self {
        Diagnostic {
            start_line: line,
            start_column: start,
            end_line: line,
            end_column: end,
            message,
            severity,
        }
    }
}

/// Lint T-SQL text. Always returns a (possibly empty) list.
#[must_use]
pub fn lint(text: &str, config: &LintConfig) -> Vec<Diagnostic> {
    if !config.enable_linting {
        return Vec::new();
    }

    let mut diagnostics = Vec::new();
    check_procedure_naming(text, &mut diagnostics);

    for (line_index, line) in text.lines().enumerate() {
        check_select_star(line, line_index, &mut diagnostics);
        check_nolock_hints(line, line_index, &mut diagnostics);
        check_variable_naming(line, line_index, &mut diagnostics);
        check_decimal_precision(line, line_index, &mut diagnostics);
        check_schema_prefix(line, line_index, &mut diagnostics);
        check_nvarchar_length(line, line_index, config.min_nvarchar_length, &mut diagnostics);
    }

    diagnostics
}

/// `SELECT *` hides column dependencies.
fn check_select_star(line: &str, line_index: usize, diagnostics: &mut Vec<Diagnostic>) {
    for m in SELECT_STAR_RE.find_iter(line) {
        diagnostics.push(Diagnostic::on_line(
            line_index,
            m.start(),
            m.end(),
            "Avoid SELECT *. Use explicit column names.".to_string(),
            Severity::Warning,
        ));
    }
}

/// FROM/JOIN table references without `WITH(NOLOCK)`.
///
/// Variables, subqueries and write targets (`INSERT INTO`, `UPDATE`,
/// `DELETE FROM`) are skipped, mirroring the formatter's insertion rule so
/// the two halves never disagree.
fn check_nolock_hints(line: &str, line_index: usize, diagnostics: &mut Vec<Diagnostic>) {
    for caps in FROM_JOIN_WORD_RE.captures_iter(line) {
        let whole = caps.get(0).unwrap();
        if WRITE_TARGET_TAIL_RE.is_match(&line[..whole.start()]) {
            continue;
        }
        let rest = &line[whole.end()..];
        let Some(table) = TABLE_REF_RE.find(rest) else {
            continue; // variable or subquery
        };
        let mut span_end = whole.end() + table.end();
        let after_ref = &rest[table.end()..];
        let alias_len = match ALIAS_WORD_RE.captures(after_ref) {
            Some(alias) if !is_keyword(&alias[1]) => alias.get(0).unwrap().end(),
            _ => 0,
        };
        if HINT_AHEAD_RE.is_match(&after_ref[alias_len..]) {
            continue;
        }
        span_end += alias_len;
        diagnostics.push(Diagnostic::on_line(
            line_index,
            whole.start(),
            span_end,
            "Consider adding WITH(NOLOCK) after table reference for read operations.".to_string(),
            Severity::Information,
        ));
    }
}

/// Variables should be camelCase.
fn check_variable_naming(line: &str, line_index: usize, diagnostics: &mut Vec<Diagnostic>) {
    for caps in UPPER_VAR_RE.captures_iter(line) {
        let whole = caps.get(0).unwrap();
        diagnostics.push(Diagnostic::on_line(
            line_index,
            whole.start(),
            whole.end(),
            format!("Variable should be in camelCase: @{}", camel_case(&caps[1])),
            Severity::Information,
        ));
    }
}

/// Amount fields use `DECIMAL(19,6)`.
fn check_decimal_precision(line: &str, line_index: usize, diagnostics: &mut Vec<Diagnostic>) {
    for caps in DECIMAL_RE.captures_iter(line) {
        if &caps[1] == "19" && &caps[2] == "6" {
            continue;
        }
        let whole = caps.get(0).unwrap();
        diagnostics.push(Diagnostic::on_line(
            line_index,
            whole.start(),
            whole.end(),
            "Use DECIMAL(19,6) for amount fields.".to_string(),
            Severity::Information,
        ));
    }
}

/// Capitalized table names without a schema prefix.
fn check_schema_prefix(line: &str, line_index: usize, diagnostics: &mut Vec<Diagnostic>) {
    const SKIP_WORDS: &[&str] = &["TOP", "SET", "ALL", "DISTINCT", "INTO", "OUTPUT", "VALUES"];
    for caps in NO_SCHEMA_RE.captures_iter(line) {
        let whole = caps.get(0).unwrap();
        let name = &caps[2];
        // short names are almost always aliases
        if name.len() <= 3 {
            continue;
        }
        if SKIP_WORDS.contains(&name.to_ascii_uppercase().as_str()) {
            continue;
        }
        // already qualified
        if line[whole.end()..].trim_start().starts_with('.') {
            continue;
        }
        diagnostics.push(Diagnostic::on_line(
            line_index,
            whole.start(),
            whole.end(),
            format!("Consider adding schema prefix: [dbo].[{name}]"),
            Severity::Hint,
        ));
    }
}

/// `NVARCHAR(n)` below the configured minimum.
fn check_nvarchar_length(
    line: &str,
    line_index: usize,
    min_length: usize,
    diagnostics: &mut Vec<Diagnostic>,
) {
    for caps in NVARCHAR_RE.captures_iter(line) {
        let Ok(length) = caps[1].parse::<usize>() else {
            continue;
        };
        if length >= min_length {
            continue;
        }
        let whole = caps.get(0).unwrap();
        diagnostics.push(Diagnostic::on_line(
            line_index,
            whole.start(),
            whole.end(),
            format!(
                "NVARCHAR length {length} is below minimum {min_length}. Consider NVARCHAR({min_length}) if size is unknown."
            ),
            Severity::Information,
        ));
    }
}

/// Stored procedures follow `[dbo].[ProjectName_FeatureName_Version]` with a
/// `Major.Minor.Patch` version suffix. Document-wide scan.
fn check_procedure_naming(text: &str, diagnostics: &mut Vec<Diagnostic>) {
    for caps in PROC_NAME_RE.captures_iter(text) {
        let whole = caps.get(0).unwrap();
        let proc_name = &caps[2];
        let (line_index, column) = line_col_at(text, whole.start());
        let line_len = text.lines().nth(line_index).map_or(column, str::len);
        let span_end = (column + whole.len()).min(line_len);

        let parts: Vec<&str> = proc_name.split('_').collect();
        if parts.len() < 2 {
            diagnostics.push(Diagnostic::on_line(
                line_index,
                column,
                span_end,
                "SP naming should follow: [dbo].[ProjectName_FeatureName_Version] (e.g. Coloris_GetMember_1.0.0)"
                    .to_string(),
                Severity::Warning,
            ));
            continue;
        }
        let last = parts[parts.len() - 1];
        if !VERSION_RE.is_match(last) {
            diagnostics.push(Diagnostic::on_line(
                line_index,
                column,
                span_end,
                format!(
                    "SP should include version suffix (Major.Minor.Patch). Suggested: \"{proc_name}_1.0.0\""
                ),
                Severity::Warning,
            ));
        }
    }
}

/// Zero-based (line, column) of a byte offset.
fn line_col_at(text: &str, offset: usize) -> (usize, usize) {
    let before = &text[..offset];
    let line = before.matches('\n').count();
    let column = before.rfind('\n').map_or(offset, |pos| offset - pos - 1);
    (line, column)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(text: &str) -> Vec<Diagnostic> {
        lint(text, &LintConfig::default())
    }

    fn messages(diags: &[Diagnostic]) -> Vec<&str> {
        diags.iter().map(|d| d.message.as_str()).collect()
    }

    #[test]
    fn test_select_star() {
        let diags = run("SELECT * FROM [dbo].[Users] WITH(NOLOCK)");
        assert!(diags
            .iter()
            .any(|d| d.severity == Severity::Warning && d.message.contains("SELECT *")));
        let star = diags.iter().find(|d| d.message.contains("SELECT *")).unwrap();
        assert_eq!(star.start_line, 0);
        assert_eq!(star.start_column, 0);
        assert_eq!(star.end_column, "SELECT *".len());
    }

    #[test]
    fn test_missing_nolock() {
        let diags = run("SELECT [Id]\nFROM [dbo].[Users]");
        let hint = diags
            .iter()
            .find(|d| d.message.contains("WITH(NOLOCK)"))
            .unwrap();
        assert_eq!(hint.severity, Severity::Information);
        assert_eq!(hint.start_line, 1);
    }

    #[test]
    fn test_hinted_table_is_clean() {
        let diags = run("SELECT [Id]\nFROM [dbo].[Users] u WITH(NOLOCK)");
        assert!(!diags.iter().any(|d| d.message.contains("WITH(NOLOCK)")));
    }

    #[test]
    fn test_write_targets_not_flagged_for_nolock() {
        for text in [
            "INSERT INTO [dbo].[Users] ([Id]) VALUES (1)",
            "UPDATE [dbo].[Users] SET [Age] = 1",
            "DELETE FROM [dbo].[Users] WHERE [Age] < 18",
        ] {
            let diags = run(text);
            assert!(
                !diags.iter().any(|d| d.message.contains("WITH(NOLOCK)")),
                "flagged write target in {text:?}"
            );
        }
    }

    #[test]
    fn test_variable_naming() {
        let diags = run("WHERE [Id] = @WebId");
        let var = diags.iter().find(|d| d.message.contains("camelCase")).unwrap();
        assert_eq!(var.message, "Variable should be in camelCase: @webId");
        assert_eq!(var.severity, Severity::Information);
    }

    #[test]
    fn test_decimal_precision() {
        let diags = run("@amount DECIMAL(10,2)");
        assert!(messages(&diags).iter().any(|m| m.contains("DECIMAL(19,6)")));
        let clean = run("@amount DECIMAL(19,6)");
        assert!(!messages(&clean).iter().any(|m| m.contains("DECIMAL(19,6)")));
    }

    #[test]
    fn test_nvarchar_below_minimum() {
        let diags = run("@name NVARCHAR(50)");
        let nv: Vec<_> = diags
            .iter()
            .filter(|d| d.message.contains("NVARCHAR length"))
            .collect();
        assert_eq!(nv.len(), 1);
        assert_eq!(nv[0].severity, Severity::Information);
        assert_eq!(nv[0].start_column, "@name ".len());
        assert_eq!(nv[0].end_column, "@name NVARCHAR(50)".len());
        assert!(nv[0].message.contains("below minimum 200"));
    }

    #[test]
    fn test_nvarchar_threshold_config() {
        let config = LintConfig {
            min_nvarchar_length: 40,
            ..LintConfig::default()
        };
        assert!(lint("@name NVARCHAR(50)", &config)
            .iter()
            .all(|d| !d.message.contains("NVARCHAR length")));
    }

    #[test]
    fn test_schema_prefix_hint() {
        let diags = run("SELECT [Id] FROM Customers");
        let hint = diags.iter().find(|d| d.message.contains("schema prefix")).unwrap();
        assert_eq!(hint.severity, Severity::Hint);
        assert!(hint.message.contains("[dbo].[Customers]"));
        // qualified and short names are clean
        assert!(!run("SELECT [Id] FROM dbo.Customers")
            .iter()
            .any(|d| d.message.contains("schema prefix")));
    }

    #[test]
    fn test_procedure_naming() {
        let diags = run("CREATE PROCEDURE [dbo].[GetUsers] AS SELECT 1");
        assert!(messages(&diags).iter().any(|m| m.contains("SP naming")));

        let diags = run("CREATE PROCEDURE dbo.Coloris_GetMember AS SELECT 1");
        assert!(messages(&diags).iter().any(|m| m.contains("version suffix")));

        let diags = run("CREATE PROCEDURE dbo.Coloris_GetMember_1.0.0 AS SELECT 1");
        assert!(!messages(&diags).iter().any(|m| m.contains("SP")));
    }

    #[test]
    fn test_disabled_linting_returns_empty() {
        let config = LintConfig {
            enable_linting: false,
            ..LintConfig::default()
        };
        assert!(lint("SELECT * FROM t", &config).is_empty());
    }

    #[test]
    fn test_one_diagnostic_per_occurrence() {
        let diags = run("SELECT * FROM a\nSELECT * FROM b");
        let stars: Vec<_> = diags
            .iter()
            .filter(|d| d.message.contains("SELECT *"))
            .collect();
        assert_eq!(stars.len(), 2);
        assert_eq!(stars[0].start_line, 0);
        assert_eq!(stars[1].start_line, 1);
    }

    #[test]
    fn test_line_col_at() {
        let text = "abc\ndef\nghi";
        assert_eq!(line_col_at(text, 0), (0, 0));
        assert_eq!(line_col_at(text, 5), (1, 1));
        assert_eq!(line_col_at(text, 8), (2, 0));
    }
}
