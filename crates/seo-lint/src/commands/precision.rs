//! Precision command — vague-language scoring and rewriting.

use anyhow::bail;
use camino::Utf8PathBuf;
use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

use seo_lint_core::markdown;
use seo_lint_core::precision::{PrecisionEngine, PrecisionEnhancement, PrecisionReport};

use super::{is_markdown, read_input_file, write_output};

/// Arguments for the `precision` subcommand.
#[derive(Args, Debug)]
pub struct PrecisionArgs {
    /// File to analyze.
    pub file: Utf8PathBuf,

    /// Rewrite replaceable vague terms.
    #[arg(long)]
    pub enhance: bool,

    /// Write the rewritten content here instead of stdout (implies --enhance).
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<Utf8PathBuf>,

    /// Minimum acceptable precision score (0–100).
    #[arg(long)]
    pub min_score: Option<f64>,
}

#[derive(Serialize)]
struct PrecisionOutput {
    #[serde(flatten)]
    report: PrecisionReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    enhancement: Option<PrecisionEnhancement>,
}

/// Score (and optionally rewrite) the wording of a file.
#[instrument(name = "cmd_precision", skip_all, fields(file = %args.file))]
pub fn cmd_precision(
    args: PrecisionArgs,
    global_json: bool,
    engine: &PrecisionEngine,
    config_min_score: Option<f64>,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    debug!(file = %args.file, enhance = args.enhance, "executing precision command");

    let content = read_input_file(&args.file, max_input_bytes)?;
    let markdown_input = is_markdown(&args.file);
    let prose = if markdown_input {
        markdown::strip_to_prose(&content)
    } else {
        content.clone()
    };
    let min_score = args.min_score.or(config_min_score);

    let report = engine.analyze(&prose);
    let enhancement = (args.enhance || args.output.is_some()).then(|| {
        if markdown_input {
            engine.enhance_markdown(&content)
        } else {
            engine.enhance_precision(&content)
        }
    });

    if let (Some(path), Some(e)) = (&args.output, &enhancement) {
        write_output(Some(path), &e.content)?;
    }

    if global_json {
        let output = PrecisionOutput {
            report: report.clone(),
            enhancement: enhancement.clone(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_report(&args, &report, enhancement.as_ref())?;
    }

    if let Some(min) = min_score
        && report.score < min
    {
        bail!(
            "{} precision score {:.1} is below minimum {:.1}",
            args.file,
            report.score,
            min,
        );
    }

    Ok(())
}

fn print_report(
    args: &PrecisionArgs,
    report: &PrecisionReport,
    enhancement: Option<&PrecisionEnhancement>,
) -> anyhow::Result<()> {
    println!("{}", args.file.bold());

    let score = if report.score >= 80.0 {
        format!("{:.1}", report.score).green().to_string()
    } else if report.score >= 60.0 {
        format!("{:.1}", report.score).yellow().to_string()
    } else {
        format!("{:.1}", report.score).red().to_string()
    };
    println!(
        "\n  {} {}/100, {} vague instances in {} words",
        "Precision:".cyan(),
        score,
        report.vague_instances,
        report.total_words,
    );

    if !report.word_choice.suggestions.is_empty() {
        println!("\n  {}", "Suggestions:".yellow());
        for s in &report.word_choice.suggestions {
            println!("    - {s}");
        }
    }

    let Some(enhancement) = enhancement else {
        return Ok(());
    };
    println!(
        "\n  {} {} substitution(s)",
        "Enhanced:".cyan(),
        enhancement.changes.len()
    );
    for change in &enhancement.changes {
        println!(
            "    {} {} {}",
            change.original.red(),
            "→".dimmed(),
            change.optimized.green()
        );
    }
    match args.output {
        Some(ref path) => println!("\n  {} {}", "Wrote:".dimmed(), path),
        None => {
            println!();
            write_output(None, &enhancement.content)?;
        }
    }
    Ok(())
}
