//! Formatting pipeline orchestration.
//!
//! The pipeline runs the rewrite passes over masked code in a fixed order:
//!
//! 1. NoLock Collapser
//! 2. Keyword Caser
//! 3. Procedure-Parameter Formatter
//! 4. Bracket Stripper
//! 5. Identifier Bracketer (then the variable camelCaser)
//! 6. NoLock Inserter (gated by `add_nolock`)
//! 7. Clause Normalizer (gated by `break_join_on_sections`)
//! 8. Spacing Normalizer (then comment adjacency)
//! 9. Indent/Structure Formatter
//! 10. Idempotency Collapser
//!
//! The order is load-bearing: the collapser runs before anything else so no
//! pass sees duplicate hints, the stripper canonicalizes before the
//! bracketer, and the inserter relies on identifiers being bracketed.
//! The main entry point is [`format_text`]; [`format_file`] wraps it for
//! buffered readers and writers.

pub mod pipeline;

pub use pipeline::{check_text, format_file, format_text};
