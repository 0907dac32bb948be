//! Analyze command — every content check on one document.

use anyhow::{Context, bail};
use camino::Utf8PathBuf;
use clap::Args;
use owo_colors::OwoColorize;
use tracing::{debug, instrument};

use seo_lint_core::audit::{self, AuditOptions};
use seo_lint_core::lsi::LsiKeyword;

use super::{is_markdown, read_input_file};

/// Arguments for the `analyze` subcommand.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// File to analyze.
    pub file: Utf8PathBuf,

    /// Checks to run (comma-separated). Omit for all checks.
    #[arg(long, value_delimiter = ',', conflicts_with = "exclude")]
    pub checks: Option<Vec<String>>,

    /// Checks to skip (comma-separated).
    #[arg(long, value_delimiter = ',')]
    pub exclude: Option<Vec<String>>,

    /// Target keyword (repeatable or comma-separated).
    #[arg(short, long, value_delimiter = ',')]
    pub keyword: Vec<String>,

    /// A problem the reader has (repeatable).
    #[arg(short, long = "problem", value_name = "PROBLEM")]
    pub problems: Vec<String>,

    /// JSON file with related terms for the LSI check.
    #[arg(long, value_name = "FILE")]
    pub lsi_keywords: Option<Utf8PathBuf>,

    /// Minimum acceptable precision score (0–100).
    #[arg(long)]
    pub min_precision: Option<f64>,
}

/// Run the content audit on a file.
#[instrument(name = "cmd_analyze", skip_all, fields(file = %args.file))]
pub fn cmd_analyze(
    args: AnalyzeArgs,
    global_json: bool,
    mut options: AuditOptions,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    debug!(file = %args.file, checks = ?args.checks, exclude = ?args.exclude, "executing analyze command");

    let content = read_input_file(&args.file, max_input_bytes)?;
    let strip_md = is_markdown(&args.file);

    options.keywords = args.keyword;
    options.problems = args.problems;
    if let Some(ref path) = args.lsi_keywords {
        let json = read_input_file(path, max_input_bytes)?;
        options.lsi_keywords = serde_json::from_str::<Vec<LsiKeyword>>(&json)
            .with_context(|| format!("invalid keyword list in {path}"))?;
    }
    if args.min_precision.is_some() {
        options.min_precision_score = args.min_precision;
    }

    let checks = audit::resolve_checks(args.checks.as_deref(), args.exclude.as_deref())?;
    let report = audit::run_content_audit(&content, strip_md, checks.as_deref(), &options)
        .with_context(|| format!("failed to analyze {}", args.file))?;

    if global_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", args.file.bold());
        println!(
            "\n  {} {} words, {} sentences",
            "Content:".cyan(),
            report.word_count,
            report.sentence_count,
        );

        if let Some(ref k) = report.keywords {
            let densities: Vec<String> = k
                .keywords
                .iter()
                .map(|d| format!("\"{}\" {:.2}%", d.keyword, d.density))
                .collect();
            if !densities.is_empty() {
                println!("\n  {} {}", "Keywords:".cyan(), densities.join(", "));
            }
            for s in &k.suggestions {
                println!("    - {}", s.message);
            }
        }

        if let Some(ref p) = report.precision {
            println!(
                "\n  {} {:.1}/100, {} vague instances",
                "Precision:".cyan(),
                p.score,
                p.vague_instances,
            );
        }

        if let Some(ref a) = report.alignment
            && !options.problems.is_empty()
        {
            println!(
                "\n  {} score {:.2}, {} of {} problems named",
                "Alignment:".cyan(),
                a.alignment_score,
                a.problems_found.len(),
                a.problems_found.len() + a.gap_analysis.len(),
            );
        }

        if let Some(ref l) = report.lsi
            && !options.lsi_keywords.is_empty()
        {
            println!(
                "\n  {} coverage {:.1}%, {} term(s) could be added",
                "LSI:".cyan(),
                l.semantic_coverage,
                l.integrated_terms,
            );
        }
    }

    if !report.pass {
        bail!("{} failed: {}", args.file, report.failures.join("; "));
    }

    Ok(())
}
