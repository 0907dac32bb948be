//! Logging setup for the CLI.
//!
//! Human-readable events go to stderr (stdout carries command output and the
//! MCP transport). When a log directory or path is configured, a JSONL copy
//! of every event is written there through a non-blocking appender.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

const ENV_LOG_PATH: &str = "SEO_LINT_LOG_PATH";
const ENV_LOG_DIR: &str = "SEO_LINT_LOG_DIR";
const LOG_FILE_PREFIX: &str = "seo-lint";
const LOG_FILE_SUFFIX: &str = "jsonl";

/// Library targets kept at `warn` unless `RUST_LOG` says otherwise.
const NOISY_MODULES: &[&str] = &["hyper", "hyper_util", "reqwest", "h2", "rustls", "rmcp"];

/// Where file logs go, if anywhere.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservabilityConfig {
    /// Exact log file; never rotated.
    pub log_path: Option<PathBuf>,
    /// Directory for daily-rotated log files.
    pub log_dir: Option<PathBuf>,
}

/// Keeps the file writer flushing until dropped.
#[derive(Debug)]
pub struct ObservabilityGuard {
    _file: Option<WorkerGuard>,
}

impl ObservabilityConfig {
    /// Read `SEO_LINT_LOG_PATH` / `SEO_LINT_LOG_DIR`, falling back to the
    /// configured directory.
    pub fn from_env_with_overrides(config_log_dir: Option<PathBuf>) -> Self {
        let log_path = std::env::var_os(ENV_LOG_PATH)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        let log_dir = std::env::var_os(ENV_LOG_DIR)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .or(config_log_dir);
        Self { log_path, log_dir }
    }

    /// The file appender for this config. An explicit path wins over a directory.
    fn appender(&self) -> anyhow::Result<Option<RollingFileAppender>> {
        if let Some(ref path) = self.log_path {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let file_name = path
                .file_name()
                .and_then(|name| name.to_str())
                .with_context(|| format!("invalid log file name: {}", path.display()))?;
            let appender = RollingFileAppender::builder()
                .rotation(Rotation::NEVER)
                .filename_prefix(file_name)
                .build(dir)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            return Ok(Some(appender));
        }

        let Some(ref dir) = self.log_dir else {
            return Ok(None);
        };
        let appender = RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix(LOG_FILE_PREFIX)
            .filename_suffix(LOG_FILE_SUFFIX)
            .build(dir)
            .with_context(|| format!("failed to open log directory {}", dir.display()))?;
        Ok(Some(appender))
    }
}

/// Directive string for the flags and configured level, noisy crates capped.
fn directives(quiet: bool, verbose: u8, config_level: &str) -> String {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => config_level,
            1 => "debug",
            _ => "trace",
        }
    };
    let mut directives = level.to_string();
    for module in NOISY_MODULES {
        directives.push_str(&format!(",{module}=warn"));
    }
    directives
}

/// Build the event filter. `RUST_LOG` wins over `-q`/`-v`, which win over
/// the configured level.
pub fn env_filter(quiet: bool, verbose: u8, config_level: &str) -> EnvFilter {
    if std::env::var_os("RUST_LOG").is_some()
        && let Ok(filter) = EnvFilter::try_from_default_env()
    {
        return filter;
    }
    EnvFilter::new(directives(quiet, verbose, config_level))
}

/// Install the global subscriber.
pub fn init_observability(
    config: &ObservabilityConfig,
    filter: EnvFilter,
) -> anyhow::Result<ObservabilityGuard> {
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let (file_layer, guard) = match config.appender()? {
        Some(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .with_target(true)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("a global tracing subscriber is already installed")?;

    tracing::debug!(
        log_path = ?config.log_path,
        log_dir = ?config.log_dir,
        "logging initialized"
    );
    Ok(ObservabilityGuard { _file: guard })
}
