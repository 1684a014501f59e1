//! Configuration management for sqlprettier.
//!
//! This module provides the [`Config`] struct which controls formatting and
//! linting behavior. Configuration can be loaded from:
//! - TOML files (`sqlprettier.toml`, `[format]` and `[lint]` tables)
//! - CLI arguments (which override file settings)
//!
//! Config files are auto-discovered by searching parent directories from the
//! file being formatted up to the filesystem root, plus the user's home
//! directory. The core never reads configuration from ambient state; callers
//! pass an immutable snapshot into `format_text`/`lint` per call.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Config file names to search for (in order of priority, later overrides earlier)
const CONFIG_FILE_NAMES: &[&str] = &["sqlprettier.toml"];

/// Get the user's home directory
fn dirs_home() -> Option<PathBuf> {
    // Try HOME environment variable first (works on Unix and some Windows setups)
    if let Ok(home) = std::env::var("HOME") {
        return Some(PathBuf::from(home));
    }
    // Fallback for Windows
    if let Ok(userprofile) = std::env::var("USERPROFILE") {
        return Some(PathBuf::from(userprofile));
    }
    None
}

// Serde default functions
fn default_true() -> bool {
    true
}
fn default_max_line_width() -> usize {
    120
}
fn default_indent_unit() -> String {
    "    ".to_string()
}
fn default_select_column_threshold() -> usize {
    2
}
fn default_alias_max_length() -> usize {
    1
}
fn default_min_nvarchar_length() -> usize {
    200
}

/// Formatting options (an immutable snapshot per `format_text` call)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatConfig {
    /// Append `WITH(NOLOCK)` after FROM/JOIN table references (default: true)
    #[serde(default = "default_true")]
    pub add_nolock: bool,

    /// Expand SELECT/SET comma lists past the threshold, one item per line
    /// (default: true)
    #[serde(default = "default_true")]
    pub expand_comma_lists: bool,

    /// Trailing commas on expanded lists; leading commas when false
    /// (default: true)
    #[serde(default = "default_true")]
    pub trailing_commas: bool,

    /// Put major clauses (FROM/WHERE/JOIN/ON/...) on their own lines
    /// (default: true)
    #[serde(default = "default_true")]
    pub break_join_on_sections: bool,

    /// Advisory maximum line width; long SELECT lists expand past it
    /// (default: 120)
    #[serde(default = "default_max_line_width")]
    pub max_line_width: usize,

    /// Indent unit: a tab or N spaces (default: four spaces)
    #[serde(default = "default_indent_unit")]
    pub indent_unit: String,

    /// SELECT lists with more columns than this go one per line (default: 2)
    #[serde(default = "default_select_column_threshold")]
    pub select_column_threshold: usize,

    /// Maximum length of a standalone lowercase alias left unbracketed
    /// (default: 1)
    #[serde(default = "default_alias_max_length")]
    pub alias_max_length: usize,
}

impl Default for FormatConfig {
    fn default() -> Self {
        FormatConfig {
            add_nolock: true,
            expand_comma_lists: true,
            trailing_commas: true,
            break_join_on_sections: true,
            max_line_width: 120,
            indent_unit: "    ".to_string(),
            select_column_threshold: 2,
            alias_max_length: 1,
        }
    }
}

/// Linting options (an immutable snapshot per `lint` call)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LintConfig {
    /// Flag `NVARCHAR(n)` below this length (default: 200)
    #[serde(default = "default_min_nvarchar_length")]
    pub min_nvarchar_length: usize,

    /// Master switch for all lint rules (default: true)
    #[serde(default = "default_true")]
    pub enable_linting: bool,
}

impl Default for LintConfig {
    fn default() -> Self {
        LintConfig {
            min_nvarchar_length: 200,
            enable_linting: true,
        }
    }
}

/// Main configuration struct for sqlprettier
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub format: FormatConfig,
    #[serde(default)]
    pub lint: LintConfig,
}

/// Partial configuration for TOML parsing
///
/// All fields are `Option<T>` so we can distinguish between
/// "explicitly set" and "not specified" when merging configs.
#[derive(Debug, Clone, Default, Deserialize)]
struct PartialConfig {
    #[serde(default)]
    format: PartialFormatConfig,
    #[serde(default)]
    lint: PartialLintConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct PartialFormatConfig {
    add_nolock: Option<bool>,
    expand_comma_lists: Option<bool>,
    trailing_commas: Option<bool>,
    break_join_on_sections: Option<bool>,
    max_line_width: Option<usize>,
    indent_unit: Option<String>,
    select_column_threshold: Option<usize>,
    alias_max_length: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct PartialLintConfig {
    min_nvarchar_length: Option<usize>,
    enable_linting: Option<bool>,
}

impl Config {
    /// Minimum reasonable line width (must fit at least some code)
    const MIN_LINE_WIDTH: usize = 40;
    /// Maximum reasonable line width
    const MAX_LINE_WIDTH: usize = 1000;
    /// Maximum reasonable indent unit width
    const MAX_INDENT_WIDTH: usize = 16;
    /// Maximum standalone alias length worth recognizing
    const MAX_ALIAS_LENGTH: usize = 4;

    /// Validate configuration values are within reasonable bounds
    ///
    /// Returns an error message if validation fails, None if valid.
    #[must_use]
    pub fn validate(&self) -> Option<String> {
        let format = &self.format;
        if format.max_line_width < Self::MIN_LINE_WIDTH {
            return Some(format!(
                "max_line_width {} is below minimum of {}",
                format.max_line_width,
                Self::MIN_LINE_WIDTH
            ));
        }
        if format.max_line_width > Self::MAX_LINE_WIDTH {
            return Some(format!(
                "max_line_width {} exceeds maximum of {}",
                format.max_line_width,
                Self::MAX_LINE_WIDTH
            ));
        }
        if format.indent_unit.is_empty() || format.indent_unit.len() > Self::MAX_INDENT_WIDTH {
            return Some(format!(
                "indent_unit must be 1 to {} characters",
                Self::MAX_INDENT_WIDTH
            ));
        }
        if format.indent_unit != "\t" && !format.indent_unit.chars().all(|c| c == ' ') {
            return Some("indent_unit must be a tab or spaces".to_string());
        }
        if format.select_column_threshold == 0 {
            return Some("select_column_threshold must be at least 1".to_string());
        }
        if format.alias_max_length > Self::MAX_ALIAS_LENGTH {
            return Some(format!(
                "alias_max_length {} exceeds maximum of {}",
                format.alias_max_length,
                Self::MAX_ALIAS_LENGTH
            ));
        }
        None
    }

    /// Load configuration from a TOML file
    pub fn from_toml_file(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let partial: PartialConfig = toml::from_str(&contents)?;
        let mut config = Self::default();
        config.apply_partial(&partial);
        Ok(config)
    }

    /// Apply a partial config, only overriding fields that are explicitly set
    fn apply_partial(&mut self, partial: &PartialConfig) {
        let f = &partial.format;
        if let Some(v) = f.add_nolock {
            self.format.add_nolock = v;
        }
        if let Some(v) = f.expand_comma_lists {
            self.format.expand_comma_lists = v;
        }
        if let Some(v) = f.trailing_commas {
            self.format.trailing_commas = v;
        }
        if let Some(v) = f.break_join_on_sections {
            self.format.break_join_on_sections = v;
        }
        if let Some(v) = f.max_line_width {
            self.format.max_line_width = v;
        }
        if let Some(v) = &f.indent_unit {
            self.format.indent_unit.clone_from(v);
        }
        if let Some(v) = f.select_column_threshold {
            self.format.select_column_threshold = v;
        }
        if let Some(v) = f.alias_max_length {
            self.format.alias_max_length = v;
        }
        let l = &partial.lint;
        if let Some(v) = l.min_nvarchar_length {
            self.lint.min_nvarchar_length = v;
        }
        if let Some(v) = l.enable_linting {
            self.lint.enable_linting = v;
        }
    }

    /// Discover config files from parent directories of a given path
    ///
    /// Searches from the file's directory up to the root, then adds home
    /// directory config. Returns paths in order of priority (least specific
    /// first).
    #[must_use]
    pub fn discover_config_files(start_path: &Path) -> Vec<PathBuf> {
        let mut config_files = Vec::new();

        // Add home directory config first (lowest priority)
        if let Some(home) = dirs_home() {
            for config_name in CONFIG_FILE_NAMES {
                let home_config = home.join(config_name);
                if home_config.is_file() {
                    config_files.push(home_config);
                }
            }
        }

        // Start from the file's parent directory (or the path itself if it's a directory)
        let start_dir = if start_path.is_file() {
            start_path.parent().map(Path::to_path_buf)
        } else if start_path.is_dir() {
            Some(start_path.to_path_buf())
        } else {
            // Path doesn't exist, use current directory
            std::env::current_dir().ok()
        };

        // Collect config files from parent directories (from root to current)
        if let Some(dir) = start_dir {
            let mut ancestors: Vec<PathBuf> = dir.ancestors().map(Path::to_path_buf).collect();
            // Reverse so we go from root to current (less specific to more specific)
            ancestors.reverse();

            for ancestor in ancestors {
                for config_name in CONFIG_FILE_NAMES {
                    let config_path = ancestor.join(config_name);
                    if config_path.is_file() && !config_files.contains(&config_path) {
                        config_files.push(config_path);
                    }
                }
            }
        }

        config_files
    }

    /// Load and merge configuration from discovered config files
    ///
    /// Later files override earlier ones (only explicitly set values).
    /// Returns default config if no files found.
    #[must_use]
    pub fn from_discovered_files(start_path: &Path) -> Self {
        let config_files = Self::discover_config_files(start_path);

        if config_files.is_empty() {
            return Self::default();
        }

        let mut config = Self::default();
        for path in &config_files {
            match std::fs::read_to_string(path) {
                Ok(contents) => match toml::from_str::<PartialConfig>(&contents) {
                    Ok(partial) => config.apply_partial(&partial),
                    Err(e) => eprintln!("Warning: failed to parse {}: {e}", path.display()),
                },
                Err(e) => eprintln!("Warning: failed to read {}: {e}", path.display()),
            }
        }
        config
    }
}
