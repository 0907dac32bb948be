//! Broken-link policy and report types.
//!
//! The HTTP checker that produces these lives in `checker` and needs the
//! `net` feature.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Limits for broken-link checking.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct BrokenLinkPolicy {
    /// Maximum requests in flight.
    pub concurrency: usize,
    /// Per-request timeout in milliseconds.
    pub request_timeout_ms: u64,
    /// Deadline for the whole run in milliseconds.
    pub overall_timeout_ms: u64,
    /// Glob patterns; matching link targets are not checked.
    pub ignore: Vec<String>,
    /// User-Agent header override.
    pub user_agent: Option<String>,
    /// Site origin for graphs whose page URLs are site-relative (`/`, `/blog`).
    pub base_url: Option<String>,
}

impl Default for BrokenLinkPolicy {
    fn default() -> Self {
        Self {
            concurrency: 8,
            request_timeout_ms: 5_000,
            overall_timeout_ms: 60_000,
            ignore: Vec::new(),
            user_agent: None,
            base_url: None,
        }
    }
}

/// A link whose target could not be fetched successfully.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
pub struct BrokenLink {
    /// Page carrying the link.
    pub source_url: String,
    /// Link target, resolved against the source page when relative.
    pub target_url: String,
    /// HTTP status, or `None` when no response was received.
    pub status_code: Option<u16>,
    /// Suggested fix.
    pub suggestion: String,
}

/// Result of a broken-link run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BrokenLinkReport {
    /// Unique targets that received a response or a transport error.
    pub checked: usize,
    /// Broken links, one per (source, target) pair, sorted.
    pub broken: Vec<BrokenLink>,
    /// Targets not checked before the overall deadline, sorted.
    pub unchecked: Vec<String>,
    /// Targets skipped by ignore patterns or a non-HTTP scheme, sorted.
    pub skipped: Vec<String>,
}
