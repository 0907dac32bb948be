//! Broken-links command — HTTP checks over a page link graph.

use std::io::IsTerminal;

use anyhow::{Context, bail};
use camino::Utf8PathBuf;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use tracing::{debug, instrument};

use seo_lint_core::links::{BrokenLinkChecker, BrokenLinkPolicy};

use super::read_link_graph;

/// Arguments for the `broken-links` subcommand.
#[derive(Args, Debug)]
pub struct BrokenLinksArgs {
    /// JSON page link graph (array of `{url, internalLinksTo, internalLinksFrom}`).
    pub graph: Utf8PathBuf,

    /// Maximum requests in flight (overrides config).
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Per-request timeout in milliseconds (overrides config).
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Deadline for the whole run in milliseconds (overrides config).
    #[arg(long)]
    pub overall_timeout_ms: Option<u64>,

    /// Origin for site-relative page URLs such as `/` (overrides config).
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Glob for link targets to skip (repeatable; adds to config).
    #[arg(long, value_name = "GLOB")]
    pub ignore: Vec<String>,
}

/// Check every link in a graph file; fails when any link is broken.
#[instrument(name = "cmd_broken_links", skip_all, fields(graph = %args.graph))]
pub async fn cmd_broken_links(
    args: BrokenLinksArgs,
    global_json: bool,
    quiet: bool,
    config_policy: &BrokenLinkPolicy,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    debug!(graph = %args.graph, "executing broken-links command");

    let graph = read_link_graph(&args.graph, max_input_bytes)?;

    let mut policy = config_policy.clone();
    if let Some(concurrency) = args.concurrency {
        policy.concurrency = concurrency;
    }
    if let Some(ms) = args.timeout_ms {
        policy.request_timeout_ms = ms;
    }
    if let Some(ms) = args.overall_timeout_ms {
        policy.overall_timeout_ms = ms;
    }
    if args.base_url.is_some() {
        policy.base_url = args.base_url.clone();
    }
    policy.ignore.extend(args.ignore.iter().cloned());

    let bar = if global_json || quiet || !std::io::stderr().is_terminal() {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} links checked")
                .context("invalid progress template")?
                .progress_chars("=> "),
        );
        bar
    };

    let progress = bar.clone();
    let checker = BrokenLinkChecker::new(policy)
        .context("failed to set up link checker")?
        .with_progress(move |done, total| {
            progress.set_length(total as u64);
            progress.set_position(done as u64);
        });

    let report = checker.detect_broken_links(graph.pages()).await;
    bar.finish_and_clear();

    if global_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", args.graph.bold());
        println!(
            "\n  {} {} checked, {} skipped, {} unchecked",
            "Targets:".cyan(),
            report.checked,
            report.skipped.len(),
            report.unchecked.len(),
        );
        if report.broken.is_empty() {
            println!("\n  {} no broken links", "PASS:".green().bold());
        } else {
            println!("\n  {}", "Broken:".red());
            for link in &report.broken {
                let status = link
                    .status_code
                    .map_or_else(|| "no response".to_string(), |c| c.to_string());
                println!(
                    "    {} {} {} ({})",
                    link.source_url,
                    "→".dimmed(),
                    link.target_url.red(),
                    status,
                );
                println!("      {}", link.suggestion.dimmed());
            }
        }
        if !report.unchecked.is_empty() {
            println!(
                "\n  {} deadline reached before {} target(s) were checked",
                "WARN:".yellow(),
                report.unchecked.len()
            );
        }
    }

    if !report.broken.is_empty() {
        bail!(
            "{} has {} broken link(s)",
            args.graph,
            report.broken.len()
        );
    }

    Ok(())
}
