//! Token classification shared by every rewrite pass and the linter
//!
//! This is the single source of truth for what counts as a keyword, a
//! built-in function, an alias or an identifier. Passes must never carry
//! their own keyword lists; the Identifier Bracketer and the NoLock Inserter
//! in particular have to agree on what a table reference is.

use std::collections::HashSet;
use std::sync::LazyLock;

/// Canonical keyword phrases, in their house-style rendering.
///
/// Multi-word phrases are matched with flexible internal whitespace and must
/// be applied longest-first so that e.g. "INNER JOIN" wins over bare "JOIN".
pub const KEYWORD_PHRASES: &[&str] = &[
    "SELECT",
    "FROM",
    "WHERE",
    "INNER JOIN",
    "LEFT OUTER JOIN",
    "RIGHT OUTER JOIN",
    "FULL OUTER JOIN",
    "LEFT JOIN",
    "RIGHT JOIN",
    "FULL JOIN",
    "CROSS JOIN",
    "JOIN",
    "ORDER BY",
    "GROUP BY",
    "PARTITION BY",
    "HAVING",
    "UNION ALL",
    "UNION",
    "INSERT",
    "INTO",
    "VALUES",
    "UPDATE",
    "SET",
    "DELETE",
    "CREATE",
    "ALTER",
    "DROP",
    "TABLE",
    "VIEW",
    "INDEX",
    "PROCEDURE",
    "FUNCTION",
    "TRIGGER",
    "DECLARE",
    "BEGIN",
    "END",
    "IF",
    "ELSE",
    "WHILE",
    "BREAK",
    "CONTINUE",
    "RETURN",
    "EXEC",
    "EXECUTE",
    "TRY",
    "CATCH",
    "THROW",
    "AS",
    "ON",
    "WITH",
    "NOLOCK",
    "TOP",
    "PERCENT",
    "DISTINCT",
    "CASE",
    "WHEN",
    "THEN",
    "AND",
    "OR",
    "NOT",
    "IN",
    "IS",
    "NULL",
    "EXISTS",
    "BETWEEN",
    "LIKE",
    "PRIMARY KEY",
    "FOREIGN KEY",
    "REFERENCES",
    "CONSTRAINT",
    "IDENTITY",
    "DEFAULT",
    "COUNT",
    "SUM",
    "AVG",
    "MIN",
    "MAX",
    "CAST",
    "CONVERT",
    "GETDATE",
    "ISNULL",
    "COALESCE",
    "ROW_NUMBER",
    "RANK",
    "DENSE_RANK",
    "INT",
    "BIGINT",
    "SMALLINT",
    "TINYINT",
    "BIT",
    "DECIMAL",
    "NUMERIC",
    "FLOAT",
    "REAL",
    "MONEY",
    "CHAR",
    "VARCHAR",
    "NCHAR",
    "NVARCHAR",
    "TEXT",
    "NTEXT",
    "DATETIME",
    "DATETIME2",
    "DATE",
    "TIME",
    "UNIQUEIDENTIFIER",
    "OVER",
    "OFFSET",
    "FETCH",
    "NEXT",
    "ROWS",
    "ONLY",
    "DESC",
    "ASC",
    "GO",
];

/// Built-in functions that must never be bracketed, even when not directly
/// followed by a parenthesis (e.g. passed as an argument name).
pub const BUILTIN_FUNCTIONS: &[&str] = &[
    "GETDATE",
    "DATEADD",
    "DATEDIFF",
    "DATENAME",
    "DATEPART",
    "CAST",
    "CONVERT",
    "ISNULL",
    "COALESCE",
    "SUBSTRING",
    "LEN",
    "LTRIM",
    "RTRIM",
    "UPPER",
    "LOWER",
    "REPLACE",
    "COUNT",
    "SUM",
    "AVG",
    "MIN",
    "MAX",
    "ROW_NUMBER",
    "RANK",
    "DENSE_RANK",
    "NTILE",
    "NEWID",
    "SCOPE_IDENTITY",
];

/// Every individual word of every keyword phrase, for single-token lookup.
static KEYWORD_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    KEYWORD_PHRASES
        .iter()
        .flat_map(|phrase| phrase.split_whitespace())
        .collect()
});

static BUILTIN_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| BUILTIN_FUNCTIONS.iter().copied().collect());

/// Maximum length of a lowercase qualifier at the head of a dotted chain
/// that is preserved bare (`c.webid` keeps `c`, `dbo.users` does not keep
/// `dbo` bare because of its length).
pub const HEAD_QUALIFIER_MAX_LEN: usize = 2;

/// Classification of a single token, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenClass {
    Keyword,
    Variable,
    FunctionCall,
    Alias,
    QualifiedIdentifier,
    PlainIdentifier,
}

/// Case-insensitive keyword membership for a single word.
#[must_use]
pub fn is_keyword(word: &str) -> bool {
    KEYWORD_WORDS.contains(word.to_ascii_uppercase().as_str())
}

/// Case-insensitive built-in function membership.
#[must_use]
pub fn is_builtin_function(word: &str) -> bool {
    BUILTIN_SET.contains(word.to_ascii_uppercase().as_str())
}

/// Classify a token given its immediate context.
///
/// `prev` is the character directly before the token, `next` the first
/// non-whitespace character after it. The same precedence is used everywhere:
/// variable, keyword, function call, alias, then qualified/plain identifier.
#[must_use]
pub fn classify(
    token: &str,
    prev: Option<char>,
    next: Option<char>,
    alias_max_len: usize,
) -> TokenClass {
    if token.starts_with('@') || prev == Some('@') {
        return TokenClass::Variable;
    }
    if !token.contains('.') && is_keyword(token) {
        return TokenClass::Keyword;
    }
    if next == Some('(') || is_builtin_function(token) {
        return TokenClass::FunctionCall;
    }
    if !token.contains('.')
        && token.len() <= alias_max_len
        && token.chars().all(|c| c.is_ascii_lowercase())
    {
        return TokenClass::Alias;
    }
    if token.contains('.') {
        TokenClass::QualifiedIdentifier
    } else {
        TokenClass::PlainIdentifier
    }
}

/// Convert an identifier to house-style PascalCase.
///
/// Case already decided by the author is preserved: any identifier containing
/// an uppercase letter is returned verbatim. The schema name `dbo` is always
/// kept lowercase. All-lowercase identifiers get a leading capital; a
/// trailing `id` on words of five letters or more becomes `Id`
/// (`customerid` -> `CustomerId`, but `grid` -> `Grid`). Underscores are kept
/// in place with each word capitalized, so identifiers keep their SQL
/// meaning.
#[must_use]
pub fn pascal_case(s: &str) -> String {
    if s.eq_ignore_ascii_case("dbo") {
        return "dbo".to_string();
    }
    if s.chars().any(|c| c.is_ascii_uppercase()) {
        return s.to_string();
    }
    s.split('_')
        .map(pascal_word)
        .collect::<Vec<_>>()
        .join("_")
}

fn pascal_word(word: &str) -> String {
    if word.len() >= 5 && word.ends_with("id") {
        let stem = &word[..word.len() - 2];
        return format!("{}Id", capitalize(stem));
    }
    capitalize(word)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

/// Convert a variable name to camelCase (first character lowercased).
#[must_use]
pub fn camel_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

/// Split on commas at paren depth zero, trimming each part.
///
/// Used for procedure parameter lists, SELECT column lists and UPDATE SET
/// lists, where commas inside `DECIMAL(19,6)` or function calls must not
/// split.
#[must_use]
pub fn split_top_level_commas(s: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth: i32 = 0;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            ',' if depth <= 0 => {
                let part = s[start..i].trim();
                if !part.is_empty() {
                    parts.push(part);
                }
                start = i + 1;
            }
            _ => {}
        }
    }
    let tail = s[start..].trim();
    if !tail.is_empty() {
        parts.push(tail);
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_keyword() {
        assert!(is_keyword("select"));
        assert!(is_keyword("SELECT"));
        assert!(is_keyword("Join"));
        assert!(is_keyword("by"));
        assert!(!is_keyword("customer"));
        assert!(!is_keyword("webid"));
    }

    #[test]
    fn test_classify_variable() {
        assert_eq!(classify("@webId", None, None, 1), TokenClass::Variable);
        assert_eq!(classify("webId", Some('@'), None, 1), TokenClass::Variable);
    }

    #[test]
    fn test_classify_keyword_beats_function() {
        assert_eq!(classify("COUNT", None, Some('('), 1), TokenClass::Keyword);
    }

    #[test]
    fn test_classify_function_call() {
        assert_eq!(
            classify("MyFunc", None, Some('('), 1),
            TokenClass::FunctionCall
        );
        assert_eq!(classify("dateadd", None, None, 1), TokenClass::FunctionCall);
    }

    #[test]
    fn test_classify_alias() {
        assert_eq!(classify("c", None, None, 1), TokenClass::Alias);
        assert_eq!(classify("cu", None, None, 1), TokenClass::PlainIdentifier);
        assert_eq!(classify("cu", None, None, 2), TokenClass::Alias);
        // uppercase single letters are identifiers, not aliases
        assert_eq!(classify("C", None, None, 1), TokenClass::PlainIdentifier);
    }

    #[test]
    fn test_classify_identifiers() {
        assert_eq!(
            classify("dbo.Users", None, None, 1),
            TokenClass::QualifiedIdentifier
        );
        assert_eq!(
            classify("customer", None, None, 1),
            TokenClass::PlainIdentifier
        );
    }

    #[test]
    fn test_pascal_preserves_author_casing() {
        assert_eq!(pascal_case("GetCustomerData"), "GetCustomerData");
        assert_eq!(pascal_case("isActive"), "isActive");
        assert_eq!(pascal_case("AgeGroup"), "AgeGroup");
    }

    #[test]
    fn test_pascal_dbo_stays_lowercase() {
        assert_eq!(pascal_case("dbo"), "dbo");
        assert_eq!(pascal_case("DBO"), "dbo");
    }

    #[test]
    fn test_pascal_lowercase_words() {
        assert_eq!(pascal_case("customer"), "Customer");
        assert_eq!(pascal_case("age"), "Age");
        assert_eq!(pascal_case("id"), "Id");
    }

    #[test]
    fn test_pascal_id_suffix() {
        assert_eq!(pascal_case("customerid"), "CustomerId");
        assert_eq!(pascal_case("webid"), "WebId");
        assert_eq!(pascal_case("userid"), "UserId");
        // short words keep their tail
        assert_eq!(pascal_case("grid"), "Grid");
        assert_eq!(pascal_case("valid"), "ValId");
    }

    #[test]
    fn test_pascal_keeps_underscores() {
        assert_eq!(pascal_case("user_name"), "User_Name");
        assert_eq!(pascal_case("order_id"), "Order_Id");
    }

    #[test]
    fn test_camel_case() {
        assert_eq!(camel_case("WebId"), "webId");
        assert_eq!(camel_case("username"), "username");
        assert_eq!(camel_case("X"), "x");
    }

    #[test]
    fn test_split_top_level_commas() {
        assert_eq!(
            split_top_level_commas("@a INT, @b DECIMAL(19,6), @c NVARCHAR(50)"),
            vec!["@a INT", "@b DECIMAL(19,6)", "@c NVARCHAR(50)"]
        );
        assert_eq!(split_top_level_commas("a"), vec!["a"]);
        assert_eq!(split_top_level_commas("a, , b"), vec!["a", "b"]);
        assert_eq!(
            split_top_level_commas("[Id], ISNULL(x, 0)"),
            vec!["[Id]", "ISNULL(x, 0)"]
        );
    }
}
