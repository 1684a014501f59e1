//! Command-line interface for sqlprettier.
//!
//! Defines CLI arguments using clap builder API

use std::path::PathBuf;

use clap::{Arg, ArgAction, Command};

/// CLI arguments parsed from command line
#[derive(Debug, Clone)]
pub struct CliArgs {
    /// Files or directories to format (`-` for stdin)
    pub inputs: Vec<PathBuf>,

    /// Output to stdout instead of in-place
    pub stdout: bool,

    /// Check whether files are already formatted (exit code 1 if not)
    pub check: bool,

    /// Lint files and print diagnostics instead of formatting
    pub lint: bool,

    /// Disable WITH(NOLOCK) insertion
    pub no_nolock: bool,

    /// Indent unit override (a tab or N spaces)
    pub indent_unit: Option<String>,

    /// Advisory maximum line width override
    pub max_line_width: Option<usize>,

    /// Minimum NVARCHAR length override for the linter
    pub min_nvarchar_length: Option<usize>,

    /// Config file path
    pub config: Option<PathBuf>,

    /// Recursive directory processing
    pub recursive: bool,

    /// Exclude patterns for files/directories (glob patterns)
    pub exclude: Vec<String>,

    /// Number of parallel jobs (0 = auto, 1 = sequential)
    pub jobs: Option<usize>,

    /// Silent mode (no output)
    pub silent: bool,

    /// Enable debug output
    pub debug: bool,
}

/// Build the clap Command for parsing CLI arguments
#[must_use]
pub fn build_cli() -> Command {
    Command::new("sqlprettier")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Auto-formatter and linter for T-SQL source code")
        .arg(
            Arg::new("inputs")
                .help("Files or directories to format (use - for stdin)")
                .value_name("FILE")
                .num_args(1..)
                .required(false)
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("stdout")
                .long("stdout")
                .help("Write formatted output to stdout instead of in-place")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("check")
                .long("check")
                .help("Check if files are formatted (exit code 1 if not)")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("lint")
                .long("lint")
                .help("Print style diagnostics instead of formatting")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no-nolock")
                .long("no-nolock")
                .help("Do not insert WITH(NOLOCK) hints")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("indent-unit")
                .short('i')
                .long("indent-unit")
                .help("Indent unit: a tab or N spaces [default: 4 spaces]")
                .value_name("STR"),
        )
        .arg(
            Arg::new("max-line-width")
                .short('l')
                .long("max-line-width")
                .help("Advisory maximum line width [default: 120]")
                .value_name("NUM")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("min-nvarchar-length")
                .long("min-nvarchar-length")
                .help("Flag NVARCHAR(n) below this length [default: 200]")
                .value_name("NUM")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("Config file path (default: discover sqlprettier.toml)")
                .value_name("FILE")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("recursive")
                .short('r')
                .long("recursive")
                .help("Process directories recursively")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("exclude")
                .short('e')
                .long("exclude")
                .help("Exclude files/directories matching glob pattern (repeatable)")
                .value_name("GLOB")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("jobs")
                .short('j')
                .long("jobs")
                .help("Number of parallel jobs (0 = auto, 1 = sequential)")
                .value_name("NUM")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("silent")
                .short('s')
                .long("silent")
                .help("Suppress informational output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .help("Enable debug output")
                .action(ArgAction::SetTrue),
        )
}

/// Parse CLI arguments from the process environment
#[must_use]
pub fn parse_args() -> CliArgs {
    extract_args(&build_cli().get_matches())
}

/// Parse CLI arguments from an explicit iterator (for tests)
#[must_use]
pub fn parse_args_from<I, T>(iter: I) -> CliArgs
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    extract_args(&build_cli().get_matches_from(iter))
}

fn extract_args(matches: &clap::ArgMatches) -> CliArgs {
    CliArgs {
        inputs: matches
            .get_many::<PathBuf>("inputs")
            .map(|v| v.cloned().collect())
            .unwrap_or_default(),
        stdout: matches.get_flag("stdout"),
        check: matches.get_flag("check"),
        lint: matches.get_flag("lint"),
        no_nolock: matches.get_flag("no-nolock"),
        indent_unit: matches.get_one::<String>("indent-unit").cloned(),
        max_line_width: matches.get_one::<usize>("max-line-width").copied(),
        min_nvarchar_length: matches.get_one::<usize>("min-nvarchar-length").copied(),
        config: matches.get_one::<PathBuf>("config").cloned(),
        recursive: matches.get_flag("recursive"),
        exclude: matches
            .get_many::<String>("exclude")
            .map(|v| v.cloned().collect())
            .unwrap_or_default(),
        jobs: matches.get_one::<usize>("jobs").copied(),
        silent: matches.get_flag("silent"),
        debug: matches.get_flag("debug"),
    }
}
