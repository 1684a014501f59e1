//! T-SQL house-style formatting.
//!
//! This module contains the rewrite passes, each a pure text transform over
//! masked code (string literals and comments are placeholder atoms):
//! - [`nolock`]: Collapses duplicate `WITH(NOLOCK)` hints, inserts missing
//!   ones after FROM/JOIN table references, and the final residual collapse
//! - [`case_convert`]: Uppercases keywords (longest phrase first) and
//!   camelCases variables
//! - [`procedure`]: Normalizes `CREATE PROCEDURE` headers and parameter blocks
//! - [`brackets`]: Strips redundant brackets and wraps identifiers in
//!   `[...]` with PascalCase
//! - [`clauses`]: Puts major clauses (FROM/WHERE/JOIN/...) on their own lines
//! - [`whitespace`]: Comma and comparison-operator spacing
//! - [`indenter`]: Structural re-flow (SELECT lists, WHERE conditions,
//!   indent levels for blocks and subqueries)
//! - [`finalize`]: Comment-adjacency spacing and trailing-whitespace trim
//!
//! Pass order is load-bearing; the pipeline in [`crate::process`] applies
//! them in the documented sequence. Every pass is idempotent on its own
//! output and leaves unrecognized fragments unchanged.

pub mod brackets;
pub mod case_convert;
pub mod clauses;
pub mod finalize;
pub mod indenter;
pub mod nolock;
pub mod procedure;
pub mod whitespace;

pub use brackets::{bracket_identifiers, strip_brackets};
pub use case_convert::{camelcase_variables, uppercase_keywords};
pub use clauses::normalize_clauses;
pub use finalize::{fix_comment_adjacency, trim_trailing};
pub use indenter::reindent;
pub use nolock::{collapse_nolock, collapse_residual, insert_nolock};
pub use procedure::format_procedure_params;
pub use whitespace::normalize_spacing;
