//! sqlprettier - Auto-formatter and linter for T-SQL source code

#![warn(clippy::all)]
#![warn(clippy::pedantic)]

use std::fs;
use std::io::{self, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::atomic::{AtomicUsize, Ordering};

use glob::Pattern;
use rayon::prelude::*;
use sqlprettier::process::{check_text, format_text};
use sqlprettier::{lint, parse_args, CliArgs, Config, Result};
use walkdir::WalkDir;

/// SQL file extensions to process
const SQL_EXTENSIONS: &[&str] = &["sql", "tsql", "ddl", "dml", "SQL", "TSQL", "DDL", "DML"];

/// Default maximum file size in bytes (100 MB)
/// Files larger than this are skipped to prevent memory exhaustion
const DEFAULT_MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;

fn main() -> ExitCode {
    let args = parse_args();

    // Check if we should read from stdin
    let use_stdin =
        args.inputs.is_empty() || (args.inputs.len() == 1 && args.inputs[0].as_os_str() == "-");

    // If no inputs and running interactively, print usage
    if args.inputs.is_empty() && io::stdin().is_terminal() {
        let _ = sqlprettier::build_cli().print_help();
        return ExitCode::SUCCESS;
    }

    if use_stdin {
        let config = match build_config(&args, None) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {e}");
                return ExitCode::FAILURE;
            }
        };
        return process_stdin(&config, &args);
    }

    // Configure thread pool if --jobs specified
    if let Some(jobs) = args.jobs {
        if jobs > 0 {
            if let Err(e) = rayon::ThreadPoolBuilder::new()
                .num_threads(jobs)
                .build_global()
            {
                eprintln!("Warning: failed to configure thread pool: {e}");
            }
        }
    }

    let files = collect_files(&args);
    if files.is_empty() {
        if !args.silent {
            eprintln!("No SQL files found to format.");
        }
        return ExitCode::SUCCESS;
    }

    // One config for all files with an explicit --config; per-file discovery
    // otherwise
    let base_config = if args.config.is_some() {
        match build_config(&args, None) {
            Ok(config) => Some(config),
            Err(e) => {
                eprintln!("Error: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        None
    };

    let failures = AtomicUsize::new(0);
    let unformatted = AtomicUsize::new(0);

    let process = |path: &PathBuf| {
        if let Err(e) = process_file(path, base_config.as_ref(), &args, &unformatted) {
            failures.fetch_add(1, Ordering::Relaxed);
            eprintln!("Error: {}: {e}", path.display());
        }
    };

    // Sequential for stdout/lint output ordering, parallel for in-place work
    let use_sequential = args.stdout || args.lint || args.jobs == Some(1);
    if use_sequential {
        files.iter().for_each(process);
    } else {
        files.par_iter().for_each(process);
    }

    if failures.load(Ordering::Relaxed) > 0 {
        return ExitCode::FAILURE;
    }
    if args.check && unformatted.load(Ordering::Relaxed) > 0 {
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

/// Build configuration from CLI args and optional config file
///
/// If `for_path` is provided and no explicit config file is specified,
/// uses auto-discovery to find config files in parent directories.
fn build_config(args: &CliArgs, for_path: Option<&Path>) -> Result<Config> {
    let mut config = if let Some(config_path) = &args.config {
        if args.debug {
            eprintln!(
                "[DEBUG] Using explicit config file: {}",
                config_path.display()
            );
        }
        Config::from_toml_file(config_path)?
    } else {
        let start = for_path
            .map(Path::to_path_buf)
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_default();
        if args.debug {
            let discovered = Config::discover_config_files(&start);
            if discovered.is_empty() {
                eprintln!("[DEBUG] No config files discovered for: {}", start.display());
            } else {
                eprintln!("[DEBUG] Discovered config files for {}:", start.display());
                for f in &discovered {
                    eprintln!("[DEBUG]   - {}", f.display());
                }
            }
        }
        Config::from_discovered_files(&start)
    };

    // Override with CLI arguments
    if args.no_nolock {
        config.format.add_nolock = false;
    }
    if let Some(unit) = &args.indent_unit {
        config.format.indent_unit = resolve_indent_unit(unit);
    }
    if let Some(width) = args.max_line_width {
        config.format.max_line_width = width;
    }
    if let Some(min) = args.min_nvarchar_length {
        config.lint.min_nvarchar_length = min;
    }

    if let Some(message) = config.validate() {
        anyhow::bail!("invalid configuration: {message}");
    }
    Ok(config)
}

/// `"tab"` or a number of spaces, else the literal string.
fn resolve_indent_unit(raw: &str) -> String {
    if raw.eq_ignore_ascii_case("tab") {
        return "\t".to_string();
    }
    if let Ok(n) = raw.parse::<usize>() {
        return " ".repeat(n.clamp(1, 16));
    }
    raw.to_string()
}

/// Collect all SQL files to process from the input paths
fn collect_files(args: &CliArgs) -> Vec<PathBuf> {
    let exclude_patterns: Vec<Pattern> = args
        .exclude
        .iter()
        .filter_map(|p| match Pattern::new(p) {
            Ok(pattern) => Some(pattern),
            Err(e) => {
                eprintln!("Warning: invalid exclude pattern {p:?}: {e}");
                None
            }
        })
        .collect();

    let excluded = |path: &Path| {
        exclude_patterns
            .iter()
            .any(|pattern| pattern.matches_path(path))
    };

    let mut files = Vec::new();
    for input in &args.inputs {
        if input.is_dir() {
            let max_depth = if args.recursive { usize::MAX } else { 1 };
            for entry in WalkDir::new(input)
                .max_depth(max_depth)
                .into_iter()
                .filter_map(std::result::Result::ok)
            {
                let path = entry.path();
                if path.is_file() && has_sql_extension(path) && !excluded(path) {
                    files.push(path.to_path_buf());
                }
            }
        } else if input.is_file() {
            if !excluded(input) {
                files.push(input.clone());
            }
        } else if !args.silent {
            eprintln!("Warning: {} not found, skipping", input.display());
        }
    }
    files.sort();
    files.dedup();
    files
}

fn has_sql_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SQL_EXTENSIONS.contains(&ext))
}

/// Format, check or lint a single file
fn process_file(
    path: &PathBuf,
    base_config: Option<&Config>,
    args: &CliArgs,
    unformatted: &AtomicUsize,
) -> Result<()> {
    let metadata = fs::metadata(path)?;
    if metadata.len() > DEFAULT_MAX_FILE_SIZE {
        if !args.silent {
            eprintln!("Warning: {} exceeds size limit, skipping", path.display());
        }
        return Ok(());
    }

    let config = match base_config {
        Some(config) => config.clone(),
        None => build_config(args, Some(path))?,
    };
    let text = fs::read_to_string(path)?;

    if args.lint {
        let diagnostics = lint(&text, &config.lint);
        let stdout = io::stdout();
        let mut out = stdout.lock();
        for d in &diagnostics {
            writeln!(
                out,
                "{}:{}:{}: {}: {}",
                path.display(),
                d.start_line + 1,
                d.start_column + 1,
                d.severity,
                d.message
            )?;
        }
        return Ok(());
    }

    if args.check {
        if !check_text(&text, &config.format) {
            unformatted.fetch_add(1, Ordering::Relaxed);
            if !args.silent {
                eprintln!("{} is not formatted", path.display());
            }
        }
        return Ok(());
    }

    let formatted = format_text(&text, &config.format);
    let with_newline = ensure_trailing_newline(formatted);
    if args.stdout {
        print!("{with_newline}");
    } else if with_newline != text {
        fs::write(path, with_newline)?;
        if !args.silent {
            eprintln!("Formatted {}", path.display());
        }
    }
    Ok(())
}

fn ensure_trailing_newline(mut text: String) -> String {
    if !text.is_empty() && !text.ends_with('\n') {
        text.push('\n');
    }
    text
}

/// Process stdin to stdout
fn process_stdin(config: &Config, args: &CliArgs) -> ExitCode {
    let mut text = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut text) {
        eprintln!("Error: failed to read stdin: {e}");
        return ExitCode::FAILURE;
    }

    if args.lint {
        for d in lint(&text, &config.lint) {
            println!(
                "stdin:{}:{}: {}: {}",
                d.start_line + 1,
                d.start_column + 1,
                d.severity,
                d.message
            );
        }
        return ExitCode::SUCCESS;
    }

    if args.check {
        return if check_text(&text, &config.format) {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        };
    }

    print!("{}", ensure_trailing_newline(format_text(&text, &config.format)));
    ExitCode::SUCCESS
}
