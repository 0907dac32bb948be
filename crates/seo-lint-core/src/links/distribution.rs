//! Internal link distribution analysis.

use std::collections::VecDeque;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::graph::LinkGraph;
use crate::text;

/// Thresholds for hub, authority, and depth classification.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LinkPolicy {
    /// A page is a hub when its outgoing links exceed this multiple of the
    /// average links per page.
    pub hub_multiplier: f64,
    /// A page is an authority when its incoming links exceed this multiple
    /// of the average links per page.
    pub authority_multiplier: f64,
    /// Pages deeper than this many clicks from the homepage are flagged.
    pub max_accessible_depth: usize,
}

impl Default for LinkPolicy {
    fn default() -> Self {
        Self {
            hub_multiplier: 2.0,
            authority_multiplier: 2.0,
            max_accessible_depth: 3,
        }
    }
}

/// Click depth of a page from the homepage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PageDepth {
    /// Page URL.
    pub url: String,
    /// Hops from the homepage (the homepage itself is 0).
    pub depth: usize,
}

/// Link distribution report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LinkDistributionReport {
    /// Number of pages analyzed.
    pub total_pages: usize,
    /// Sum of outgoing internal links over all pages.
    pub total_internal_links: usize,
    /// Outgoing links per page (0 with no pages).
    pub average_links_per_page: f64,
    /// Non-homepage pages with no incoming links.
    pub orphan_pages: Vec<String>,
    /// Evenness of incoming links (0–100, higher is more even).
    pub link_equity_distribution_score: f64,
    /// Pages with unusually many outgoing links.
    pub hub_pages: Vec<String>,
    /// Pages with unusually many incoming links.
    pub authority_pages: Vec<String>,
    /// Depth of every page reachable from the homepage, in input order.
    pub link_depth_analysis: Vec<PageDepth>,
    /// Pages with no link path from the homepage.
    pub unreachable_pages: Vec<String>,
    /// Reachable pages deeper than the accessible depth.
    pub accessibility_issues: Vec<PageDepth>,
    /// Deepest reachable page depth.
    pub max_depth: usize,
    /// Suggested fixes.
    pub recommendations: Vec<String>,
}

/// Analyze how internal links are spread across a site.
///
/// Depth is the breadth-first hop count from `homepage_url` over
/// `internal_links_to`, counting only targets that are pages in the graph.
/// Pages with no path are listed in `unreachable_pages` instead of
/// `link_depth_analysis`.
#[tracing::instrument(skip_all, fields(pages = graph.len(), homepage = homepage_url))]
pub fn analyze_link_distribution(
    graph: &LinkGraph,
    homepage_url: &str,
    policy: &LinkPolicy,
) -> LinkDistributionReport {
    let pages = graph.pages();
    let total_pages = pages.len();
    let total_internal_links: usize = pages.iter().map(|p| p.internal_links_to.len()).sum();
    let average = if total_pages == 0 {
        0.0
    } else {
        total_internal_links as f64 / total_pages as f64
    };

    let orphan_pages: Vec<String> = pages
        .iter()
        .filter(|p| p.url != homepage_url && p.internal_links_from.is_empty())
        .map(|p| p.url.clone())
        .collect();

    let incoming: Vec<f64> = pages
        .iter()
        .map(|p| p.internal_links_from.len() as f64)
        .collect();
    let link_equity_distribution_score = equity_score(&incoming);

    let hub_pages: Vec<String> = pages
        .iter()
        .filter(|p| p.internal_links_to.len() as f64 > policy.hub_multiplier * average)
        .map(|p| p.url.clone())
        .collect();
    let authority_pages: Vec<String> = pages
        .iter()
        .filter(|p| p.internal_links_from.len() as f64 > policy.authority_multiplier * average)
        .map(|p| p.url.clone())
        .collect();

    let depths = bfs_depths(graph, homepage_url);
    let mut link_depth_analysis = Vec::new();
    let mut unreachable_pages = Vec::new();
    for (page, depth) in pages.iter().zip(&depths) {
        match depth {
            Some(depth) => link_depth_analysis.push(PageDepth {
                url: page.url.clone(),
                depth: *depth,
            }),
            None => unreachable_pages.push(page.url.clone()),
        }
    }
    let accessibility_issues: Vec<PageDepth> = link_depth_analysis
        .iter()
        .filter(|d| d.depth > policy.max_accessible_depth)
        .cloned()
        .collect();
    let max_depth = link_depth_analysis.iter().map(|d| d.depth).max().unwrap_or(0);

    let mut recommendations = Vec::new();
    if !orphan_pages.is_empty() {
        recommendations.push(format!(
            "Link to {} orphan page(s) from related content",
            orphan_pages.len()
        ));
    }
    if !unreachable_pages.is_empty() {
        recommendations.push(format!(
            "Add a link path from the homepage to {} unreachable page(s)",
            unreachable_pages.len()
        ));
    }
    if !accessibility_issues.is_empty() {
        recommendations.push(format!(
            "Bring {} page(s) within {} clicks of the homepage",
            accessibility_issues.len(),
            policy.max_accessible_depth
        ));
    }
    if total_pages > 1 && link_equity_distribution_score < 50.0 {
        recommendations.push(
            "Spread internal links more evenly so link equity reaches more pages".to_string(),
        );
    }

    tracing::debug!(
        orphans = orphan_pages.len(),
        unreachable = unreachable_pages.len(),
        max_depth,
        "link distribution analyzed"
    );

    LinkDistributionReport {
        total_pages,
        total_internal_links,
        average_links_per_page: text::round2(average),
        orphan_pages,
        link_equity_distribution_score: text::round1(link_equity_distribution_score),
        hub_pages,
        authority_pages,
        link_depth_analysis,
        unreachable_pages,
        accessibility_issues,
        max_depth,
        recommendations,
    }
}

/// `(1 − σ/μ) × 100` of incoming counts, clamped to [0, 100]; 0 when μ = 0.
fn equity_score(incoming: &[f64]) -> f64 {
    if incoming.is_empty() {
        return 0.0;
    }
    let n = incoming.len() as f64;
    let mean = incoming.iter().sum::<f64>() / n;
    if mean == 0.0 {
        return 0.0;
    }
    let variance = incoming.iter().map(|c| (c - mean).powi(2)).sum::<f64>() / n;
    ((1.0 - variance.sqrt() / mean) * 100.0).clamp(0.0, 100.0)
}

/// Hop count from the homepage per page, in input order.
fn bfs_depths(graph: &LinkGraph, homepage_url: &str) -> Vec<Option<usize>> {
    let mut depths = vec![None; graph.len()];
    let Some(start) = graph.position(homepage_url) else {
        if !graph.is_empty() {
            tracing::warn!(homepage = homepage_url, "homepage not in link graph");
        }
        return depths;
    };

    depths[start] = Some(0);
    let mut queue = VecDeque::from([start]);
    while let Some(current) = queue.pop_front() {
        let next_depth = depths[current].map_or(0, |d| d + 1);
        for target in &graph.pages()[current].internal_links_to {
            if let Some(i) = graph.position(target)
                && depths[i].is_none()
            {
                depths[i] = Some(next_depth);
                queue.push_back(i);
            }
        }
    }
    depths
}
