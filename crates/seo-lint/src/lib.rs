//! Library interface for the `seo-lint` CLI.
//!
//! This crate exposes the CLI's argument parser and command structure as a library,
//! primarily for documentation generation and testing. The actual entry point is
//! in `main.rs`.
//!
//! # Structure
//!
//! - [`Cli`] - The root argument parser (clap derive)
//! - [`Commands`] - Available subcommands
//! - [`commands`] - Command implementations
//!
//! # Documentation Generation
//!
//! The [`command()`] function returns the clap `Command` for generating man pages
//! and shell completions via `xtask`.

pub mod commands;

#[cfg(feature = "mcp")]
pub mod server;

use clap::{CommandFactory, Parser, Subcommand};
use seo_lint_core::LogLevel;
use std::path::PathBuf;

/// Color output preference.
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Detect terminal capabilities automatically.
    #[default]
    Auto,
    /// Always emit colors.
    Always,
    /// Never emit colors.
    Never,
}

impl ColorChoice {
    /// Configure global color output based on this choice.
    ///
    /// Call this once at startup to set the color mode.
    pub fn apply(self) {
        match self {
            Self::Auto => {} // owo-colors auto-detects by default
            Self::Always => owo_colors::set_override(true),
            Self::Never => owo_colors::set_override(false),
        }
    }
}

const ENV_HELP: &str = "\
ENVIRONMENT VARIABLES:
    RUST_LOG               Log filter (e.g., debug, seo_lint=trace)
    SEO_LINT_LOG_PATH      Explicit log file path
    SEO_LINT_LOG_DIR       Log directory
    SEO_LINT_<KEY>         Override any config key; nest with __
                           (e.g., SEO_LINT_KEYWORD_DENSITY__MAX_DENSITY=3)
";
/// Command-line interface definition for seo-lint.
#[derive(Parser)]
#[command(name = "seo-lint")]
#[command(about = "Heuristic SEO content and internal-link analysis", long_about = None)]
#[command(version, arg_required_else_help = true)]
#[command(after_long_help = ENV_HELP)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Print only the version number (for scripting)
    #[arg(long)]
    pub version_only: bool,

    /// Path to configuration file (overrides discovery)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Run as if started in DIR
    #[arg(short = 'C', long, global = true)]
    pub chdir: Option<PathBuf>,

    /// Only print errors (suppresses warnings/info)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// More detail (repeatable; e.g. -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Log level when neither RUST_LOG nor -q/-v is given (overrides config)
    #[arg(long, global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Colorize output
    #[arg(long, global = true, value_enum, default_value_t)]
    pub color: ColorChoice,

    /// Output as JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,
}

/// Available subcommands for the CLI.
#[derive(Subcommand)]
pub enum Commands {
    /// Measure keyword density and suggest on-page fixes
    Keywords(commands::keywords::KeywordsArgs),

    /// Score vague wording and optionally rewrite it
    Precision(commands::precision::PrecisionArgs),

    /// Mine related terms from competitor pages and weave them in
    Lsi(commands::lsi::LsiArgs),

    /// Check that content answers the reader's problems
    Align(commands::align::AlignArgs),

    /// Analyze internal link distribution and click depth
    Links(commands::links::LinksArgs),

    /// Find broken links in a page link graph over HTTP
    BrokenLinks(commands::broken_links::BrokenLinksArgs),

    /// Run every content check on one document
    Analyze(commands::analyze::AnalyzeArgs),

    /// Show package information
    Info(commands::info::InfoArgs),

    /// Start MCP (Model Context Protocol) server on stdio
    #[cfg(feature = "mcp")]
    Serve(commands::serve::ServeArgs),
}

/// Returns the clap command for documentation generation
pub fn command() -> clap::Command {
    Cli::command()
}
