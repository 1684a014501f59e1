//! Case conversion for T-SQL keywords and variables
//!
//! Keywords are uppercased against the canonical phrase list, longest phrase
//! first, so that "INNER JOIN" is matched before bare "JOIN". Multi-word
//! phrases match with flexible internal whitespace and are rewritten to the
//! canonical single-spaced form. Variables follow the camelCase house rule:
//! only the first character is touched.

use std::sync::LazyLock;

use regex::Regex;

use crate::parser::patterns::UPPER_VAR_RE;
use crate::parser::tokens::{camel_case, KEYWORD_PHRASES};

/// One rule per keyword phrase, sorted longest-first.
static CASE_RULES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    let mut phrases: Vec<&'static str> = KEYWORD_PHRASES.to_vec();
    phrases.sort_by_key(|p| std::cmp::Reverse(p.len()));
    phrases
        .into_iter()
        .map(|phrase| {
            let words: Vec<&str> = phrase.split_whitespace().collect();
            let pattern = format!(r"(?i)\b{}\b", words.join(r"\s+"));
            (Regex::new(&pattern).unwrap(), phrase)
        })
        .collect()
});

/// Uppercase every keyword occurrence, leaving non-keyword text untouched.
#[must_use]
pub fn uppercase_keywords(text: &str) -> String {
    let mut out = text.to_string();
    for (re, canonical) in CASE_RULES.iter() {
        if re.is_match(&out) {
            out = re.replace_all(&out, *canonical).into_owned();
        }
    }
    out
}

/// Lowercase the first letter of `@Variable` names.
#[must_use]
pub fn camelcase_variables(text: &str) -> String {
    UPPER_VAR_RE
        .replace_all(text, |caps: &regex::Captures| {
            format!("@{}", camel_case(&caps[1]))
        })
        .into_owned()
}
