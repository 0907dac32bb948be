//! Links command — internal link distribution and click depth.

use anyhow::bail;
use camino::Utf8PathBuf;
use clap::Args;
use owo_colors::OwoColorize;
use tracing::{debug, instrument};

use seo_lint_core::links::{self, LinkPolicy};

use super::read_link_graph;

/// Arguments for the `links` subcommand.
#[derive(Args, Debug)]
pub struct LinksArgs {
    /// JSON page link graph (array of `{url, internalLinksTo, internalLinksFrom}`).
    pub graph: Utf8PathBuf,

    /// Homepage URL; depths are counted from here.
    #[arg(long)]
    pub homepage: String,

    /// Derive `internalLinksFrom` from the other pages' outgoing links.
    #[arg(long)]
    pub infer_backlinks: bool,

    /// Deepest acceptable click depth (overrides config).
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Exit with an error on orphan, unreachable, or too-deep pages.
    #[arg(long)]
    pub strict: bool,
}

/// Analyze the link graph in a file.
#[instrument(name = "cmd_links", skip_all, fields(graph = %args.graph))]
pub fn cmd_links(
    args: LinksArgs,
    global_json: bool,
    config_policy: &LinkPolicy,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    debug!(graph = %args.graph, homepage = %args.homepage, "executing links command");

    let mut graph = read_link_graph(&args.graph, max_input_bytes)?;
    if args.infer_backlinks {
        graph = graph.with_inferred_backlinks();
    }

    let mut policy = config_policy.clone();
    if let Some(depth) = args.max_depth {
        policy.max_accessible_depth = depth;
    }

    let report = links::analyze_link_distribution(&graph, &args.homepage, &policy);

    if global_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", args.graph.bold());
        println!(
            "\n  {} {} pages, {} links, {:.2} per page",
            "Links:".cyan(),
            report.total_pages,
            report.total_internal_links,
            report.average_links_per_page,
        );
        println!(
            "  {} equity {:.1}/100, max depth {}",
            "Distribution:".cyan(),
            report.link_equity_distribution_score,
            report.max_depth,
        );
        print_list("Hubs:", &report.hub_pages);
        print_list("Authorities:", &report.authority_pages);
        print_list("Orphans:", &report.orphan_pages);
        print_list("Unreachable:", &report.unreachable_pages);
        if !report.accessibility_issues.is_empty() {
            let deep: Vec<String> = report
                .accessibility_issues
                .iter()
                .map(|p| format!("{} ({})", p.url, p.depth))
                .collect();
            print_list("Too deep:", &deep);
        }
        if !report.recommendations.is_empty() {
            println!("\n  {}", "Recommendations:".yellow());
            for r in &report.recommendations {
                println!("    - {r}");
            }
        }
    }

    let problems = report.orphan_pages.len()
        + report.unreachable_pages.len()
        + report.accessibility_issues.len();
    if args.strict && problems > 0 {
        bail!("{} has {problems} link structure problem(s)", args.graph);
    }

    Ok(())
}

fn print_list(label: &str, items: &[String]) {
    if !items.is_empty() {
        println!("  {} {}", label.cyan(), items.join(", "));
    }
}
