//! Keywords command — keyword density and on-page suggestions.

use anyhow::bail;
use camino::Utf8PathBuf;
use clap::Args;
use owo_colors::OwoColorize;
use tracing::{debug, instrument};

use seo_lint_core::keywords::{self, DensityPolicy, DensityStatus, SuggestionKind};
use seo_lint_core::markdown;

use super::{is_markdown, read_input_file};

/// Arguments for the `keywords` subcommand.
#[derive(Args, Debug)]
pub struct KeywordsArgs {
    /// File to analyze.
    pub file: Utf8PathBuf,

    /// Target keyword (repeatable or comma-separated).
    #[arg(short, long, value_delimiter = ',')]
    pub keyword: Vec<String>,

    /// Minimum keyword density in percent (overrides config).
    #[arg(long)]
    pub min_density: Option<f64>,

    /// Maximum keyword density in percent (overrides config).
    #[arg(long)]
    pub max_density: Option<f64>,

    /// Exit with an error when any suggestion is produced.
    #[arg(long)]
    pub strict: bool,
}

/// Measure keyword density in a file.
#[instrument(name = "cmd_keywords", skip_all, fields(file = %args.file))]
pub fn cmd_keywords(
    args: KeywordsArgs,
    global_json: bool,
    config_policy: &DensityPolicy,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    debug!(file = %args.file, keywords = ?args.keyword, "executing keywords command");

    let content = read_input_file(&args.file, max_input_bytes)?;

    let mut policy = config_policy.clone();
    if let Some(min) = args.min_density {
        policy.min_density = min;
    }
    if let Some(max) = args.max_density {
        policy.max_density = max;
    }

    let markdown_input = is_markdown(&args.file);
    let prose = if markdown_input {
        markdown::strip_to_prose(&content)
    } else {
        content.clone()
    };

    let mut report = keywords::analyze_keyword_density(&prose, &args.keyword, &policy);
    // Stripping drops the `#` markers, so headings are judged on the source.
    if markdown_input && markdown::has_headings(&content) {
        report
            .suggestions
            .retain(|s| s.kind != SuggestionKind::MissingHeadings);
    }

    if global_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", args.file.bold());
        println!("\n  {} {}", "Words:".cyan(), report.total_words);

        for k in &report.keywords {
            let status = match k.status {
                DensityStatus::Optimal => "optimal".green().to_string(),
                DensityStatus::Low => "low".yellow().to_string(),
                DensityStatus::High => "high".red().to_string(),
            };
            println!(
                "  {} \"{}\" {} occurrences, {:.2}% ({})",
                "Keyword:".cyan(),
                k.keyword,
                k.occurrences,
                k.density,
                status,
            );
        }

        if report.looks_good() {
            println!("\n  {} content looks good", "PASS:".green().bold());
        } else {
            println!("\n  {}", "Suggestions:".yellow());
            for s in &report.suggestions {
                println!("    - {}", s.message);
            }
        }
    }

    if args.strict && !report.looks_good() {
        bail!(
            "{} has {} keyword suggestion(s)",
            args.file,
            report.suggestions.len()
        );
    }

    Ok(())
}
