//! The formatting pipeline
//!
//! `format_text` is a pure function of (input, config snapshot): it
//! segments the input, masks protected segments, applies the rewrite passes
//! in order, trims, and restores the protected segments. Every pass is total;
//! malformed fragments pass through unchanged, so formatting never fails.

use std::io::{BufRead, Read, Write};

use crate::config::{Config, FormatConfig};
use crate::directive::formatting_disabled;
use crate::format::{
    bracket_identifiers, camelcase_variables, collapse_nolock, collapse_residual,
    fix_comment_adjacency, format_procedure_params, insert_nolock, normalize_clauses,
    normalize_spacing, reindent, strip_brackets, trim_trailing, uppercase_keywords,
};
use crate::parser::segmenter::{mask_segments, restore_segments, segment};
use crate::Result;

/// Format T-SQL text to the house style. Total: never fails, never panics.
#[must_use]
pub fn format_text(input: &str, config: &FormatConfig) -> String {
    if formatting_disabled(input) {
        return input.to_string();
    }

    let segments = segment(input);
    let (mut code, store) = mask_segments(&segments);

    code = collapse_nolock(&code);
    code = uppercase_keywords(&code);
    code = format_procedure_params(&code, config);
    code = strip_brackets(&code);
    code = bracket_identifiers(&code, config);
    code = camelcase_variables(&code);
    if config.add_nolock {
        code = insert_nolock(&code);
    }
    if config.break_join_on_sections {
        code = normalize_clauses(&code);
    }
    code = normalize_spacing(&code);
    code = fix_comment_adjacency(&code, &store);
    code = reindent(&code, config);
    code = collapse_residual(&code);
    code = trim_trailing(&code);

    restore_segments(&code, &store)
}

/// True when the input is already in house style.
#[must_use]
pub fn check_text(input: &str, config: &FormatConfig) -> bool {
    let formatted = format_text(input, config);
    formatted == input || format!("{formatted}\n") == input
}

/// Format from a buffered reader into a writer (one trailing newline).
pub fn format_file<R: BufRead, W: Write>(
    mut input: R,
    output: &mut W,
    config: &Config,
) -> Result<()> {
    let mut text = String::new();
    input.read_to_string(&mut text)?;
    let formatted = format_text(&text, &config.format);
    output.write_all(formatted.as_bytes())?;
    if !formatted.is_empty() && !formatted.ends_with('\n') {
        output.write_all(b"\n")?;
    }
    Ok(())
}
