//! T-SQL source scanning utilities.
//!
//! This module provides the infrastructure the rewrite passes build on:
//! - [`segmenter`]: Finite-state scanner that splits input into code, string
//!   and comment segments, plus masking of protected segments
//! - [`tokens`]: Token classification (keywords, aliases, identifiers) shared
//!   by every pass and the linter
//! - [`patterns`]: Precompiled regex patterns for T-SQL syntax elements
//!
//! Segmentation is lossless: concatenating all segment texts in order
//! reconstructs the input exactly, which is what makes content preservation
//! of literals and comments testable.

pub mod patterns;
pub mod segmenter;
pub mod tokens;

pub use segmenter::{mask_segments, restore_segments, segment, Segment, SegmentKind};
pub use tokens::{classify, is_keyword, pascal_case, TokenClass};
