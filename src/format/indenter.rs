//! Structural re-flow and indentation
//!
//! Works line by line over clause-normalized text and re-derives every
//! line's indentation from content alone, which is what makes the pass
//! idempotent: the same input lines always produce the same levels.
//!
//! - SELECT column lists are split on top-level commas (one per line past the
//!   configured threshold, or when the joined line would exceed the line
//!   width); `SELECT *` stays inline and `DISTINCT`/`TOP n` stay on the
//!   SELECT line
//! - WHERE conditions are split on top-level AND/OR (`BETWEEN x AND y` is
//!   kept whole), continuations one level deeper
//! - UPDATE SET assignment lists are split on top-level commas
//! - `ON`, `AND`, `OR` and list continuation lines indent one extra level
//! - net-positive parentheses deepen subsequent lines (subqueries), a
//!   line-leading `)` dedents itself; `BEGIN`/`IF`/`WHILE`/`TRY`/`CATCH`
//!   open a block, a line-leading `END` closes it, `ELSE` sits one level
//!   shallower than its body
//! - blank lines are dropped

use std::sync::LazyLock;

use regex::Regex;

use crate::config::FormatConfig;
use crate::parser::patterns::build_re;
use crate::parser::tokens::split_top_level_commas;

static SELECT_MODS_RE: LazyLock<Regex> = LazyLock::new(|| {
    build_re(r"^(DISTINCT\s+TOP\s+\d+(?:\s+PERCENT)?|TOP\s+\d+(?:\s+PERCENT)?|DISTINCT)\b")
});
static BOOL_OP_RE: LazyLock<Regex> = LazyLock::new(|| build_re(r"\b(AND|OR)\b"));
static BETWEEN_RE: LazyLock<Regex> = LazyLock::new(|| build_re(r"\bBETWEEN\b"));

/// Words that start a clause line and therefore end a hanging list.
const CLAUSE_STARTERS: &[&str] = &[
    "SELECT", "FROM", "WHERE", "GROUP", "ORDER", "HAVING", "UNION", "VALUES", "SET", "ON", "AND",
    "OR", "INSERT", "UPDATE", "DELETE", "CREATE", "ALTER", "DECLARE", "BEGIN", "END", "IF", "ELSE",
    "WHILE", "AS", "WITH", "INNER", "LEFT", "RIGHT", "FULL", "CROSS", "JOIN", "GO",
];

/// Hanging-list state: lines after a SELECT, SET or procedure header indent
/// one extra level until the next clause line at the same depth.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Hang {
    None,
    SelectList(usize),
    SetList(usize),
    ProcParams,
}

/// Re-flow statements and assign indentation.
#[must_use]
pub fn reindent(text: &str, config: &FormatConfig) -> String {
    let unit = config.indent_unit.as_str();
    let mut out: Vec<String> = Vec::new();
    let mut depth: usize = 0;
    let mut hang = Hang::None;

    for raw in text.split('\n') {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        let first = first_word(line).to_uppercase();

        let block_close = first == "END";
        let paren_close = line.starts_with(')');
        let level = if block_close || paren_close || first == "ELSE" {
            depth.saturating_sub(1)
        } else {
            depth
        };

        // a clause line at (or above) the hang's depth ends the hanging list
        match hang {
            Hang::ProcParams if first == "AS" => hang = Hang::None,
            Hang::SelectList(d) | Hang::SetList(d)
                if is_clause_starter(&first) && level <= d =>
            {
                hang = Hang::None;
            }
            _ => {}
        }

        let extra = match (hang, first.as_str()) {
            (_, "AND" | "OR" | "ON") => 1,
            (Hang::SelectList(d) | Hang::SetList(d), w)
                if !is_clause_starter(w) && level == d =>
            {
                1
            }
            (Hang::ProcParams, w) if !is_clause_starter(w) => 1,
            _ => 0,
        };

        if first == "SELECT" {
            emit_select(line, level, unit, config, &mut out);
            hang = Hang::SelectList(level);
        } else if first == "WHERE" {
            emit_where(line, level, unit, &mut out);
            hang = Hang::None;
        } else if first == "SET" && line.contains('=') {
            emit_set(line, level, unit, config, &mut out);
            hang = Hang::SetList(level);
        } else {
            out.push(format!("{}{}", unit.repeat(level + extra), line));
            if first == "CREATE" && line.to_uppercase().contains("PROCEDURE") {
                hang = Hang::ProcParams;
            }
        }

        let mut next_depth = depth as isize;
        if block_close {
            next_depth -= 1;
        }
        if matches!(first.as_str(), "BEGIN" | "IF" | "WHILE" | "TRY" | "CATCH") {
            next_depth += 1;
        }
        next_depth += paren_net(line);
        depth = usize::try_from(next_depth.max(0)).unwrap_or(0);
    }

    out.join("\n")
}

fn first_word(line: &str) -> &str {
    line.split(|c: char| !c.is_ascii_alphanumeric() && c != '_')
        .next()
        .unwrap_or("")
}

fn is_clause_starter(word: &str) -> bool {
    CLAUSE_STARTERS.contains(&word)
}

fn paren_net(line: &str) -> isize {
    let mut net: isize = 0;
    for c in line.chars() {
        match c {
            '(' => net += 1,
            ')' => net -= 1,
            _ => {}
        }
    }
    net
}

fn emit_select(line: &str, level: usize, unit: &str, config: &FormatConfig, out: &mut Vec<String>) {
    let rest = line[6..].trim_start();
    let (header, cols) = match SELECT_MODS_RE.find(rest) {
        Some(m) => {
            let mods = m
                .as_str()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
                .to_uppercase();
            (format!("SELECT {mods}"), rest[m.end()..].trim())
        }
        None => ("SELECT".to_string(), rest),
    };
    let indent = unit.repeat(level);

    if cols.is_empty() {
        out.push(format!("{indent}{header}"));
        return;
    }
    if cols == "*" {
        out.push(format!("{indent}{header} *"));
        return;
    }

    out.push(format!("{indent}{header}"));
    let parts = split_top_level_commas(cols);
    let continuation = unit.repeat(level + 1);
    let joined_width = continuation.len() + cols.len();
    let expand = config.expand_comma_lists
        && (parts.len() > config.select_column_threshold || joined_width > config.max_line_width);

    if !expand || parts.len() == 1 {
        out.push(format!("{continuation}{}", parts.join(", ")));
    } else {
        emit_comma_list(&parts, &continuation, config.trailing_commas, out);
    }
}

fn emit_where(line: &str, level: usize, unit: &str, out: &mut Vec<String>) {
    let rest = line[5..].trim_start();
    let conditions = split_bool_ops(rest);
    let indent = unit.repeat(level);
    let continuation = unit.repeat(level + 1);
    match conditions.first() {
        Some((_, first)) => out.push(format!("{indent}WHERE {first}")),
        None => out.push(format!("{indent}WHERE")),
    }
    for (op, condition) in conditions.iter().skip(1) {
        out.push(format!("{continuation}{op} {condition}"));
    }
}

fn emit_set(line: &str, level: usize, unit: &str, config: &FormatConfig, out: &mut Vec<String>) {
    let rest = line[3..].trim_start();
    let parts = split_top_level_commas(rest);
    let indent = unit.repeat(level);
    let continuation = unit.repeat(level + 1);
    match parts.split_first() {
        Some((head, tail)) => {
            let comma = if !tail.is_empty() && config.trailing_commas {
                ","
            } else {
                ""
            };
            out.push(format!("{indent}SET {head}{comma}"));
            emit_comma_list_tail(tail, &continuation, config.trailing_commas, out);
        }
        None => out.push(format!("{indent}SET")),
    }
}

fn emit_comma_list(parts: &[&str], continuation: &str, trailing: bool, out: &mut Vec<String>) {
    for (i, part) in parts.iter().enumerate() {
        if trailing {
            let comma = if i + 1 < parts.len() { "," } else { "" };
            out.push(format!("{continuation}{part}{comma}"));
        } else {
            let lead = if i == 0 { "" } else { ", " };
            out.push(format!("{continuation}{lead}{part}"));
        }
    }
}

fn emit_comma_list_tail(parts: &[&str], continuation: &str, trailing: bool, out: &mut Vec<String>) {
    for (i, part) in parts.iter().enumerate() {
        if trailing {
            let comma = if i + 1 < parts.len() { "," } else { "" };
            out.push(format!("{continuation}{part}{comma}"));
        } else {
            out.push(format!("{continuation}, {part}"));
        }
    }
}

/// Split on top-level AND/OR; the first entry carries no operator.
/// The AND that closes a `BETWEEN x AND y` does not split.
fn split_bool_ops(s: &str) -> Vec<(String, String)> {
    let mut cuts: Vec<(usize, usize, String)> = Vec::new();
    let mut scan_depth: i32 = 0;
    let mut scan_pos = 0;
    let mut last_cut_end = 0;

    for m in BOOL_OP_RE.find_iter(s) {
        // advance depth up to this operator
        for c in s[scan_pos..m.start()].chars() {
            match c {
                '(' => scan_depth += 1,
                ')' => scan_depth -= 1,
                _ => {}
            }
        }
        scan_pos = m.start();
        if scan_depth != 0 {
            continue;
        }
        let op = m.as_str().to_uppercase();
        if op == "AND" && between_pending(&s[last_cut_end..m.start()]) {
            continue;
        }
        cuts.push((m.start(), m.end(), op));
        last_cut_end = m.end();
    }

    let mut parts: Vec<(String, String)> = Vec::new();
    let mut prev_end = 0;
    let mut prev_op = String::new();
    for (start, end, op) in cuts {
        let condition = s[prev_end..start].trim();
        if !condition.is_empty() {
            parts.push((prev_op, condition.to_string()));
        }
        prev_op = op;
        prev_end = end;
    }
    let tail = s[prev_end..].trim();
    if !tail.is_empty() {
        parts.push((prev_op, tail.to_string()));
    }
    parts
}

/// True when the chunk ends inside a `BETWEEN ... AND` pair.
fn between_pending(chunk: &str) -> bool {
    match BETWEEN_RE.find_iter(chunk).last() {
        Some(between) => !BOOL_OP_RE
            .find_iter(&chunk[between.end()..])
            .any(|m| m.as_str().eq_ignore_ascii_case("AND")),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> FormatConfig {
        FormatConfig::default()
    }

    fn run(text: &str) -> String {
        reindent(text, &config())
    }

    #[test]
    fn test_two_columns_share_a_line() {
        assert_eq!(
            run("SELECT [Id], [Name]\nFROM [dbo].[Users] WITH(NOLOCK)"),
            "SELECT\n    [Id], [Name]\nFROM [dbo].[Users] WITH(NOLOCK)"
        );
    }

    #[test]
    fn test_many_columns_one_per_line() {
        assert_eq!(
            run("SELECT [A], [B], [C]"),
            "SELECT\n    [A],\n    [B],\n    [C]"
        );
    }

    #[test]
    fn test_select_star_stays_inline() {
        assert_eq!(run("SELECT *\nFROM t"), "SELECT *\nFROM t");
    }

    #[test]
    fn test_top_distinct_modifiers() {
        assert_eq!(
            run("SELECT DISTINCT TOP 10 [Name]"),
            "SELECT DISTINCT TOP 10\n    [Name]"
        );
    }

    #[test]
    fn test_where_split_on_and() {
        assert_eq!(
            run("WHERE c.[WebId] = @webId AND c.[Username] = @username"),
            "WHERE c.[WebId] = @webId\n    AND c.[Username] = @username"
        );
    }

    #[test]
    fn test_between_not_split() {
        assert_eq!(
            run("WHERE [Age] BETWEEN 18 AND 65 AND [Active] = 1"),
            "WHERE [Age] BETWEEN 18 AND 65\n    AND [Active] = 1"
        );
    }

    #[test]
    fn test_on_lines_indent() {
        assert_eq!(
            run("INNER JOIN [dbo].[Orders] o WITH(NOLOCK)\nON o.[Id] = c.[Id]"),
            "INNER JOIN [dbo].[Orders] o WITH(NOLOCK)\n    ON o.[Id] = c.[Id]"
        );
    }

    #[test]
    fn test_set_list_split() {
        assert_eq!(
            run("UPDATE [dbo].[Users]\nSET [Name] = 'J', [Age] = 25\nWHERE [Id] = 1"),
            "UPDATE [dbo].[Users]\nSET [Name] = 'J',\n    [Age] = 25\nWHERE [Id] = 1"
        );
    }

    #[test]
    fn test_subquery_paren_depth() {
        assert_eq!(
            run("SELECT [Id], (SELECT COUNT(*)\nFROM [dbo].[Orders] WITH(NOLOCK)\nWHERE [X] = 1) AS [N]\nFROM t"),
            "SELECT\n    [Id], (SELECT COUNT(*)\n    FROM [dbo].[Orders] WITH(NOLOCK)\n    WHERE [X] = 1) AS [N]\nFROM t"
        );
    }

    #[test]
    fn test_begin_end_block() {
        assert_eq!(
            run("IF @x = 1\nBEGIN\nSELECT *\nFROM t\nEND"),
            "IF @x = 1\nBEGIN\n        SELECT *\n        FROM t\n    END"
        );
    }

    #[test]
    fn test_proc_params_hang() {
        assert_eq!(
            run("CREATE PROCEDURE [dbo].[P]\n@a INT,\n@b BIT\nAS\nSELECT *\nFROM t"),
            "CREATE PROCEDURE [dbo].[P]\n    @a INT,\n    @b BIT\nAS\nSELECT *\nFROM t"
        );
    }

    #[test]
    fn test_blank_lines_dropped() {
        assert_eq!(run("SELECT *\n\n\nFROM t"), "SELECT *\nFROM t");
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "SELECT [A], [B], [C]\nFROM t",
            "WHERE a = 1 AND b = 2 OR c = 3",
            "SELECT [Id], (SELECT COUNT(*)\nFROM x\nWHERE y = 1) AS [N]\nFROM t",
            "UPDATE t\nSET a = 1, b = 2\nWHERE c = 3",
        ];
        for input in inputs {
            let once = run(input);
            assert_eq!(run(&once), once, "reindent not idempotent for {input:?}");
        }
    }
}
