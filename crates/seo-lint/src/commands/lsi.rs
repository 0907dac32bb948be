//! LSI command — mine related terms from competitor pages and weave them in.

use anyhow::{Context, bail};
use camino::Utf8PathBuf;
use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

use seo_lint_core::lsi::{CompetitorLsiAnalysis, LsiIntegrator, LsiKeyword, SemanticIntegration};

use super::{read_input_file, write_output};

/// Arguments for the `lsi` subcommand.
#[derive(Args, Debug)]
pub struct LsiArgs {
    /// File to enrich.
    pub file: Utf8PathBuf,

    /// Competitor page to mine for related terms (repeatable).
    #[arg(long = "competitor", value_name = "FILE")]
    pub competitors: Vec<Utf8PathBuf>,

    /// JSON file with an array of keywords
    /// (`term`, `relevance`, `semantic_score`, `context_strength`).
    /// Skips keyword mining.
    #[arg(long, value_name = "FILE")]
    pub keywords: Option<Utf8PathBuf>,

    /// Write the enriched content here.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<Utf8PathBuf>,
}

#[derive(Serialize)]
struct LsiOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    competitor_analysis: Option<CompetitorLsiAnalysis>,
    keywords: Vec<LsiKeyword>,
    integration: SemanticIntegration,
}

/// Integrate related terms into a file.
#[instrument(name = "cmd_lsi", skip_all, fields(file = %args.file))]
pub fn cmd_lsi(
    args: LsiArgs,
    global_json: bool,
    integrator: &LsiIntegrator,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    debug!(
        file = %args.file,
        competitors = args.competitors.len(),
        keywords = ?args.keywords,
        "executing lsi command"
    );

    if args.competitors.is_empty() && args.keywords.is_none() {
        bail!("nothing to integrate: pass --competitor files or a --keywords file");
    }

    let content = read_input_file(&args.file, max_input_bytes)?;

    let competitor_analysis = if args.competitors.is_empty() {
        None
    } else {
        let docs = args
            .competitors
            .iter()
            .map(|path| read_input_file(path, max_input_bytes))
            .collect::<anyhow::Result<Vec<_>>>()?;
        Some(integrator.analyze_competitor_patterns(&docs))
    };

    let keywords = match args.keywords {
        Some(ref path) => {
            let json = read_input_file(path, max_input_bytes)?;
            serde_json::from_str::<Vec<LsiKeyword>>(&json)
                .with_context(|| format!("invalid keyword list in {path}"))?
        }
        None => competitor_analysis
            .as_ref()
            .map(|a| integrator.suggest_keywords(a))
            .unwrap_or_default(),
    };

    let patterns = competitor_analysis
        .as_ref()
        .map(|a| a.patterns.as_slice())
        .unwrap_or_default();
    let integration = integrator.integrate_semantic_terms(&content, &keywords, patterns);

    if let Some(ref path) = args.output {
        write_output(Some(path), &integration.optimized_content)?;
    }

    if global_json {
        let output = LsiOutput {
            competitor_analysis,
            keywords,
            integration,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{}", args.file.bold());
    if let Some(ref a) = competitor_analysis {
        println!(
            "\n  {} {} documents, {} terms, density {:.2}",
            "Competitors:".cyan(),
            a.documents,
            a.terms.len(),
            a.semantic_density,
        );
        if !a.terms.is_empty() {
            let top: Vec<&str> = a.terms.iter().take(10).map(String::as_str).collect();
            println!("  {} {}", "Top terms:".cyan(), top.join(", "));
        }
    }
    println!(
        "\n  {} {} inserted, coverage {:.1}%, naturalness {:.1}, preservation {:.1}%",
        "Integration:".cyan(),
        integration.integrated_terms,
        integration.semantic_coverage,
        integration.naturalness_score,
        integration.context_preservation,
    );
    if !integration.integrated.is_empty() {
        println!("  {} {}", "Added:".green(), integration.integrated.join(", "));
    }
    match args.output {
        Some(ref path) => println!("\n  {} {}", "Wrote:".dimmed(), path),
        None if integration.integrated_terms > 0 => {
            println!();
            write_output(None, &integration.optimized_content)?;
        }
        None => {}
    }

    Ok(())
}
