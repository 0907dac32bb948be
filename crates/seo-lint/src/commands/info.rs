//! Info command implementation

use clap::Args;
use owo_colors::OwoColorize;
use seo_lint_core::config::{Config, ConfigSources};
use serde::Serialize;
use tracing::{debug, instrument};

/// Arguments for the `info` subcommand.
#[derive(Args, Debug, Default)]
pub struct InfoArgs {
    // No subcommand-specific arguments; uses global --json flag
}

#[derive(Serialize)]
struct PackageInfo {
    name: &'static str,
    version: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    description: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    repository: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    license: &'static str,
}

impl PackageInfo {
    const fn new() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            description: env!("CARGO_PKG_DESCRIPTION"),
            repository: env!("CARGO_PKG_REPOSITORY"),
            license: env!("CARGO_PKG_LICENSE"),
        }
    }
}

#[derive(Serialize)]
struct ConfigInfo<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    config_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    input_limit: Option<usize>,
    #[serde(flatten)]
    config: &'a Config,
}

impl<'a> ConfigInfo<'a> {
    fn from_config(config: &'a Config, sources: &ConfigSources) -> Self {
        Self {
            config_file: sources.primary_file().map(|p| p.to_string()),
            input_limit: config.input_limit(),
            config,
        }
    }
}

#[derive(Serialize)]
struct FullInfo<'a> {
    #[serde(flatten)]
    package: PackageInfo,
    config: ConfigInfo<'a>,
}

/// Print package information and the effective configuration.
///
/// # Arguments
/// * `global_json` - Global `--json` flag from CLI
/// * `config` - Loaded configuration
/// * `sources` - Config source metadata from loading
#[instrument(name = "cmd_info", skip_all, fields(json_output))]
pub fn cmd_info(
    _args: InfoArgs,
    global_json: bool,
    config: &Config,
    sources: &ConfigSources,
) -> anyhow::Result<()> {
    debug!(json_output = global_json, "executing info command");

    let full_info = FullInfo {
        package: PackageInfo::new(),
        config: ConfigInfo::from_config(config, sources),
    };

    if global_json {
        println!("{}", serde_json::to_string_pretty(&full_info)?);
        return Ok(());
    }

    println!(
        "{} {}",
        full_info.package.name.bold(),
        full_info.package.version.green()
    );
    if !full_info.package.description.is_empty() {
        println!("{}", full_info.package.description);
    }
    if !full_info.package.license.is_empty() {
        println!("{}: {}", "License".dimmed(), full_info.package.license);
    }
    if !full_info.package.repository.is_empty() {
        println!(
            "{}: {}",
            "Repository".dimmed(),
            full_info.package.repository.cyan()
        );
    }

    println!();
    println!("{}", "Configuration".bold().underline());
    match full_info.config.config_file {
        Some(ref path) => println!("{}: {}", "Config file".dimmed(), path.cyan()),
        None => println!("{}: {}", "Config file".dimmed(), "none loaded".yellow()),
    }
    println!("{}: {}", "Log level".dimmed(), config.log_level.as_str());
    if let Some(ref dir) = config.log_dir {
        println!("{}: {}", "Log directory".dimmed(), dir);
    }
    match full_info.config.input_limit {
        Some(limit) => println!("{}: {} bytes", "Input limit".dimmed(), limit),
        None => println!("{}: {}", "Input limit".dimmed(), "disabled".yellow()),
    }

    println!();
    println!("{}", "Thresholds".bold().underline());
    let density = &config.keyword_density;
    println!(
        "{}: {}%–{}%",
        "Keyword density".dimmed(),
        density.min_density,
        density.max_density
    );
    println!(
        "{}: {} words",
        "Long sentence".dimmed(),
        density.max_sentence_words
    );
    println!(
        "{}: {}",
        "Precision penalty".dimmed(),
        config.precision.penalty_weight
    );
    print_opt("Precision min score", &config.precision.min_score);
    println!(
        "{}: {}",
        "LSI min semantic score".dimmed(),
        config.lsi.min_semantic_score
    );
    println!(
        "{}: {}",
        "Max click depth".dimmed(),
        config.links.max_accessible_depth
    );
    println!(
        "{}: {} at a time, {} ms each",
        "Link checks".dimmed(),
        config.broken_links.concurrency,
        config.broken_links.request_timeout_ms
    );

    Ok(())
}

/// Print an optional value or "(not set)".
fn print_opt<T: std::fmt::Display>(label: &str, value: &Option<T>) {
    match value {
        Some(v) => println!("{}: {}", label.dimmed(), v),
        None => println!("{}: {}", label.dimmed(), "(not set)".dimmed()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cmd_info_text_succeeds() {
        let sources = ConfigSources::default();
        assert!(cmd_info(InfoArgs::default(), false, &Config::default(), &sources).is_ok());
    }

    #[test]
    fn test_cmd_info_json_via_global() {
        let sources = ConfigSources::default();
        assert!(cmd_info(InfoArgs::default(), true, &Config::default(), &sources).is_ok());
    }

    #[test]
    fn test_config_info_no_file() {
        let config = Config::default();
        let sources = ConfigSources::default();
        let info = ConfigInfo::from_config(&config, &sources);
        assert!(info.config_file.is_none());
        assert_eq!(info.input_limit, Some(seo_lint_core::DEFAULT_MAX_INPUT_BYTES));

        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["log_level"], "info");
        assert_eq!(json["keyword_density"]["max_density"], 2.0);
    }
}
