//! Bracket stripping and identifier bracketing
//!
//! The stripper removes nested or redundant bracket pairs so the bracketer
//! always starts from a canonical unbracketed form (that is what makes the
//! pair idempotent). The bracketer then wraps identifiers in `[...]`,
//! PascalCasing each dotted segment, with the exclusions decided by the
//! shared token classifier: variables, keywords, function calls, short
//! lowercase aliases and already-bracketed tokens are left alone, as are
//! short lowercase qualifiers at the head of a dotted chain.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::FormatConfig;
use crate::parser::segmenter::MASK_CLOSE;
use crate::parser::tokens::{
    classify, is_keyword, pascal_case, TokenClass, HEAD_QUALIFIER_MAX_LEN,
};

/// Nested/duplicated brackets around a plain identifier chain.
static BRACKETED_CHAIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[+\s*([A-Za-z_][A-Za-z0-9_]*(?:\.[A-Za-z_][A-Za-z0-9_]*)*)\s*\]+").unwrap()
});

/// Brackets around a variable: `@[name]` -> `@name`.
static VAR_BRACKET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@\[([^\]]+)\]").unwrap());

/// A bare identifier chain (words joined by dots).
static IDENT_CHAIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z_][A-Za-z0-9_]*(?:\.[A-Za-z_][A-Za-z0-9_]*)*").unwrap()
});

/// Remove redundant brackets so the bracketer starts from canonical form.
///
/// Bracketed names that are not plain identifier chains (names containing
/// spaces) are deliberately left bracketed, and so are keyword-named
/// identifiers like `[Select]`: stripped, the bracketer could never
/// rebracket them.
#[must_use]
pub fn strip_brackets(text: &str) -> String {
    let out = VAR_BRACKET_RE.replace_all(text, "@$1");
    BRACKETED_CHAIN_RE
        .replace_all(&out, |caps: &regex::Captures| {
            let chain = &caps[1];
            if !chain.contains('.') && is_keyword(chain) {
                caps[0].to_string()
            } else {
                chain.to_string()
            }
        })
        .into_owned()
}

/// Wrap identifiers in `[...]`, PascalCasing each dotted segment.
#[must_use]
pub fn bracket_identifiers(text: &str, config: &FormatConfig) -> String {
    let mut out = String::with_capacity(text.len() + 32);
    let mut last = 0;

    for m in IDENT_CHAIN_RE.find_iter(text) {
        out.push_str(&text[last..m.start()]);
        last = m.end();

        let token = m.as_str();
        let prev = text[..m.start()].chars().next_back();
        let next = text[m.end()..].chars().find(|c| !c.is_whitespace());

        if skip_for_context(prev) {
            out.push_str(token);
            continue;
        }

        match classify(token, prev, next, config.alias_max_length) {
            TokenClass::Keyword
            | TokenClass::Variable
            | TokenClass::FunctionCall
            | TokenClass::Alias => out.push_str(token),
            TokenClass::QualifiedIdentifier => out.push_str(&bracket_chain(token)),
            TokenClass::PlainIdentifier => {
                out.push('[');
                out.push_str(&pascal_case(token));
                out.push(']');
            }
        }
    }

    out.push_str(&text[last..]);
    out
}

/// Context in which a matched chain must not be rewritten: already bracketed,
/// part of a variable, directly attached to a bracketed name or placeholder,
/// or glued to a preceding word/number character.
fn skip_for_context(prev: Option<char>) -> bool {
    matches!(prev, Some('[' | '@' | '.' | ']'))
        || prev == Some(MASK_CLOSE)
        || prev.is_some_and(|c| c.is_alphanumeric() || c == '_')
}

fn bracket_chain(chain: &str) -> String {
    let parts: Vec<&str> = chain.split('.').collect();
    let head = parts[0];
    let head_is_alias = head.len() <= HEAD_QUALIFIER_MAX_LEN
        && head.chars().all(|c| c.is_ascii_lowercase());
    if head_is_alias {
        let rest = parts[1..]
            .iter()
            .map(|p| format!("[{}]", pascal_case(p)))
            .collect::<Vec<_>>()
            .join(".");
        format!("{head}.{rest}")
    } else {
        parts
            .iter()
            .map(|p| format!("[{}]", pascal_case(p)))
            .collect::<Vec<_>>()
            .join(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> FormatConfig {
        FormatConfig::default()
    }

    fn bracket(text: &str) -> String {
        bracket_identifiers(text, &config())
    }

    #[test]
    fn test_strip_nested_brackets() {
        assert_eq!(strip_brackets("[[[x]]]"), "x");
        assert_eq!(strip_brackets("[dbo].[Users]"), "dbo.Users");
        assert_eq!(strip_brackets("@[name]"), "@name");
    }

    #[test]
    fn test_strip_keeps_spaced_names() {
        assert_eq!(strip_brackets("[Order Details]"), "[Order Details]");
    }

    #[test]
    fn test_strip_keeps_keyword_named_identifiers() {
        assert_eq!(strip_brackets("[Select]"), "[Select]");
        assert_eq!(strip_brackets("[End] [Users]"), "[End] Users");
    }

    #[test]
    fn test_plain_identifier_bracketed() {
        assert_eq!(bracket("SELECT customer"), "SELECT [Customer]");
    }

    #[test]
    fn test_qualified_identifier_bracketed_per_segment() {
        assert_eq!(bracket("dbo.Users"), "[dbo].[Users]");
        assert_eq!(bracket("dbo.customer"), "[dbo].[Customer]");
    }

    #[test]
    fn test_short_alias_head_preserved() {
        assert_eq!(bracket("c.webid"), "c.[WebId]");
        assert_eq!(bracket("o.customerid"), "o.[CustomerId]");
    }

    #[test]
    fn test_keywords_never_bracketed() {
        assert_eq!(bracket("SELECT FROM WHERE"), "SELECT FROM WHERE");
        assert_eq!(bracket("WITH(NOLOCK)"), "WITH(NOLOCK)");
    }

    #[test]
    fn test_variables_never_bracketed() {
        assert_eq!(bracket("@webId"), "@webId");
        assert_eq!(bracket("[Age] = @age"), "[Age] = @age");
    }

    #[test]
    fn test_function_calls_never_bracketed() {
        assert_eq!(bracket("COUNT(*)"), "COUNT(*)");
        assert_eq!(bracket("MyFunc(1)"), "MyFunc(1)");
        assert_eq!(bracket("GETDATE()"), "GETDATE()");
    }

    #[test]
    fn test_single_lowercase_alias_preserved() {
        assert_eq!(bracket("FROM [dbo].[Person] p"), "FROM [dbo].[Person] p");
    }

    #[test]
    fn test_already_bracketed_untouched() {
        assert_eq!(bracket("[Id]"), "[Id]");
        assert_eq!(bracket("[dbo].[Users]"), "[dbo].[Users]");
    }

    #[test]
    fn test_author_casing_preserved() {
        assert_eq!(bracket("AgeGroup"), "[AgeGroup]");
        assert_eq!(bracket("isActive"), "[isActive]");
    }

    #[test]
    fn test_strip_then_bracket_is_idempotent() {
        let input = "SELECT [Id], [Name] FROM [dbo].[Users] u WHERE u.[Age] > 1";
        let once = bracket(&strip_brackets(input));
        let twice = bracket(&strip_brackets(&once));
        assert_eq!(once, twice);
        assert_eq!(once, input);
    }
}
