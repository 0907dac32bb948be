//! Align command — problem–solution alignment.

use anyhow::bail;
use camino::Utf8PathBuf;
use clap::Args;
use owo_colors::OwoColorize;
use tracing::{debug, instrument};

use seo_lint_core::alignment::ProblemSolutionAligner;
use seo_lint_core::markdown;

use super::{is_markdown, read_input_file};

/// Arguments for the `align` subcommand.
#[derive(Args, Debug)]
pub struct AlignArgs {
    /// File to check.
    pub file: Utf8PathBuf,

    /// A problem the reader has (repeatable).
    #[arg(short, long = "problem", value_name = "PROBLEM", required = true)]
    pub problems: Vec<String>,

    /// Minimum acceptable alignment score (0–1).
    #[arg(long)]
    pub min_score: Option<f64>,
}

/// Check that a file addresses the given problems.
#[instrument(name = "cmd_align", skip_all, fields(file = %args.file))]
pub fn cmd_align(
    args: AlignArgs,
    global_json: bool,
    aligner: &ProblemSolutionAligner,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    debug!(file = %args.file, problems = args.problems.len(), "executing align command");

    let content = read_input_file(&args.file, max_input_bytes)?;
    let prose = if is_markdown(&args.file) {
        markdown::strip_to_prose(&content)
    } else {
        content
    };

    let report = aligner.validate_alignment(&prose, &args.problems);

    if global_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", args.file.bold());
        println!(
            "\n  {} {:.0}% of problems named, {} solution sentence(s)",
            "Coverage:".cyan(),
            report.problem_coverage * 100.0,
            report.solution_sentences,
        );
        println!(
            "  {} alignment {:.2}, completeness {:.2}, effectiveness {:.2}",
            "Scores:".cyan(),
            report.alignment_score,
            report.solution_completeness,
            report.solution_effectiveness,
        );
        if !report.gap_analysis.is_empty() {
            println!("\n  {}", "Not addressed:".yellow());
            for gap in &report.gap_analysis {
                println!("    - {gap}");
            }
        }
    }

    if let Some(min) = args.min_score
        && report.alignment_score < min
    {
        bail!(
            "{} alignment score {:.2} is below minimum {:.2}",
            args.file,
            report.alignment_score,
            min,
        );
    }

    Ok(())
}
