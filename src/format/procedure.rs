//! `CREATE PROCEDURE` header and parameter-block formatting
//!
//! Rewrites `CREATE PROCEDURE <name> <params> AS` so that the name is
//! `[schema].[Name]` (default schema `dbo` when absent) and each parameter
//! sits on its own line with an uppercased type and `= default` spacing.
//! A parameter list that does not parse is passed through with only the
//! assignment spacing normalized; the pass never fails.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::FormatConfig;
use crate::parser::tokens::{pascal_case, split_top_level_commas};

static PROC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)\bCREATE\s+PROCEDURE\s+([^\s(]+)[ \t]*(.*?)\bAS\b").unwrap()
});

/// `@name TYPE` or `@name TYPE = default`, type optionally parenthesized.
static PARAM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(@?[A-Za-z_][A-Za-z0-9_]*)\s+([A-Za-z_][A-Za-z0-9_]*\s*(?:\([^)]*\))?)\s*(?:=\s*(.*))?$")
        .unwrap()
});

static EQ_SPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*=\s*").unwrap());

/// Normalize every `CREATE PROCEDURE ... AS` construct in the text.
#[must_use]
pub fn format_procedure_params(text: &str, config: &FormatConfig) -> String {
    PROC_RE
        .replace_all(text, |caps: &regex::Captures| {
            let header = render_header(caps[1].trim());
            let params = caps[2].trim();
            if params.is_empty() {
                format!("{header}\nAS")
            } else {
                format!("{header}\n{}\nAS", render_params(params, config))
            }
        })
        .into_owned()
}

fn render_header(raw: &str) -> String {
    let clean = |part: &str| {
        part.trim()
            .trim_matches(|c| c == '[' || c == ']')
            .to_string()
    };
    let (schema, name) = match raw.split_once('.') {
        Some((schema, name)) => (clean(schema), clean(name)),
        None => ("dbo".to_string(), clean(raw)),
    };
    format!(
        "CREATE PROCEDURE [{}].[{}]",
        pascal_case(&schema),
        pascal_case(&name)
    )
}

fn render_params(params: &str, config: &FormatConfig) -> String {
    let flat = params.split_whitespace().collect::<Vec<_>>().join(" ");
    let flat = strip_wrapping_parens(&flat);
    let parts = split_top_level_commas(flat);
    let indent = &config.indent_unit;
    parts
        .iter()
        .enumerate()
        .map(|(i, part)| {
            let comma = if i + 1 < parts.len() { "," } else { "" };
            format!("{indent}{}{comma}", render_param(part))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_param(part: &str) -> String {
    if let Some(caps) = PARAM_RE.captures(part) {
        let name = &caps[1];
        let type_name = normalize_type(&caps[2]);
        match caps.get(3) {
            Some(default) => format!("{name} {type_name} = {}", default.as_str().trim()),
            None => format!("{name} {type_name}"),
        }
    } else {
        // unknown shape: only normalize assignment spacing
        EQ_SPACE_RE.replace_all(part, " = ").into_owned()
    }
}

fn normalize_type(raw: &str) -> String {
    // `nvarchar (50)` -> `NVARCHAR(50)`
    match raw.find('(') {
        Some(pos) => format!(
            "{}{}",
            raw[..pos].trim_end().to_uppercase(),
            raw[pos..].to_uppercase()
        ),
        None => raw.to_uppercase(),
    }
}

/// Remove one pair of parens wrapping the whole list, if balanced.
fn strip_wrapping_parens(s: &str) -> &str {
    let trimmed = s.trim();
    if !trimmed.starts_with('(') || !trimmed.ends_with(')') {
        return trimmed;
    }
    let inner = &trimmed[1..trimmed.len() - 1];
    let mut depth: i32 = 0;
    for c in inner.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            _ => {}
        }
        if depth < 0 {
            return trimmed;
        }
    }
    inner.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> FormatConfig {
        FormatConfig::default()
    }

    #[test]
    fn test_header_gains_default_schema() {
        let out = format_procedure_params("CREATE PROCEDURE GetUsers AS", &config());
        assert_eq!(out, "CREATE PROCEDURE [dbo].[GetUsers]\nAS");
    }

    #[test]
    fn test_header_keeps_existing_schema() {
        let out = format_procedure_params("CREATE PROCEDURE sales.GetUsers AS", &config());
        assert_eq!(out, "CREATE PROCEDURE [Sales].[GetUsers]\nAS");
    }

    #[test]
    fn test_params_one_per_line() {
        let out = format_procedure_params(
            "CREATE PROCEDURE dbo.GetCustomerData @webId int,@username nvarchar(50) AS",
            &config(),
        );
        assert_eq!(
            out,
            "CREATE PROCEDURE [dbo].[GetCustomerData]\n    @webId INT,\n    @username NVARCHAR(50)\nAS"
        );
    }

    #[test]
    fn test_default_value_spacing() {
        let out = format_procedure_params(
            "CREATE PROCEDURE dbo.P @page int=1 AS",
            &config(),
        );
        assert_eq!(out, "CREATE PROCEDURE [dbo].[P]\n    @page INT = 1\nAS");
    }

    #[test]
    fn test_type_with_comma_not_split() {
        let out = format_procedure_params(
            "CREATE PROCEDURE dbo.P @amount decimal(19,6),@x int AS",
            &config(),
        );
        assert_eq!(
            out,
            "CREATE PROCEDURE [dbo].[P]\n    @amount DECIMAL(19,6),\n    @x INT\nAS"
        );
    }

    #[test]
    fn test_parenthesized_list_unwrapped() {
        let out = format_procedure_params("CREATE PROCEDURE dbo.P (@a int) AS", &config());
        assert_eq!(out, "CREATE PROCEDURE [dbo].[P]\n    @a INT\nAS");
    }

    #[test]
    fn test_multiline_params_flattened() {
        let out = format_procedure_params(
            "CREATE PROCEDURE dbo.P\n  @a int,\n  @b bit\nAS",
            &config(),
        );
        assert_eq!(
            out,
            "CREATE PROCEDURE [dbo].[P]\n    @a INT,\n    @b BIT\nAS"
        );
    }

    #[test]
    fn test_idempotent_on_own_output() {
        let input = "CREATE PROCEDURE dbo.GetCustomerData @webId int,@username nvarchar(50),@page int=1 AS";
        let once = format_procedure_params(input, &config());
        assert_eq!(format_procedure_params(&once, &config()), once);
    }

    #[test]
    fn test_no_procedure_no_change() {
        let input = "SELECT 1 FROM t";
        assert_eq!(format_procedure_params(input, &config()), input);
    }
}
