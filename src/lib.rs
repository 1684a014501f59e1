//! sqlprettier - Auto-formatter and linter for T-SQL source code
//!
//! Normalizes T-SQL to a house style (uppercase keywords, bracketed
//! PascalCase identifiers, camelCase parameters, `WITH(NOLOCK)` read hints,
//! canonical indentation) and flags style violations as diagnostics.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::struct_excessive_bools)]

pub mod cli;
pub mod config;
pub mod directive;
pub mod error;
pub mod format;
pub mod lint;
pub mod parser;
pub mod process;

// Re-export commonly used types
pub use cli::{build_cli, parse_args, parse_args_from, CliArgs};
pub use config::{Config, FormatConfig, LintConfig};
pub use directive::{find_directive, formatting_disabled, Directive};
pub use error::Result;
pub use lint::{lint, Diagnostic, Severity};
pub use process::{check_text, format_text};
