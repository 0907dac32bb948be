//! Broken-link detection over HTTP.
//!
//! Each unique link target is checked once with a `HEAD` request. Checks run
//! concurrently under a semaphore, each with its own timeout, and the whole
//! run is bounded by an overall deadline. Failures are recorded per link and
//! never abort the run. There are no retries.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::Duration;

use globset::{Glob, GlobSet, GlobSetBuilder};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::Instant;
use url::Url;

use super::broken::{BrokenLink, BrokenLinkPolicy, BrokenLinkReport};
use super::graph::PageLinkData;
use crate::error::{AnalysisError, AnalysisResult};

/// Progress callback: `(completed, total)` unique targets.
pub type ProgressFn = Arc<dyn Fn(usize, usize) + Send + Sync>;

#[derive(Debug)]
enum Outcome {
    Ok,
    Status(u16),
    Unreachable(String),
}

/// Concurrent broken-link checker.
#[derive(Clone)]
pub struct BrokenLinkChecker {
    client: reqwest::Client,
    policy: BrokenLinkPolicy,
    ignore: GlobSet,
    base: Option<Url>,
    progress: Option<ProgressFn>,
}

impl std::fmt::Debug for BrokenLinkChecker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrokenLinkChecker")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl BrokenLinkChecker {
    /// Build a checker with its own HTTP client.
    pub fn new(policy: BrokenLinkPolicy) -> AnalysisResult<Self> {
        if policy.concurrency == 0 {
            return Err(AnalysisError::ConflictingConfig(
                "broken_links.concurrency must be at least 1".to_string(),
            ));
        }

        let mut builder = GlobSetBuilder::new();
        for pattern in &policy.ignore {
            let glob = Glob::new(pattern).map_err(|e| {
                AnalysisError::ConflictingConfig(format!("invalid ignore pattern {pattern:?}: {e}"))
            })?;
            builder.add(glob);
        }
        let ignore = builder
            .build()
            .map_err(|e| AnalysisError::ConflictingConfig(e.to_string()))?;

        let base = policy
            .base_url
            .as_deref()
            .map(|raw| match Url::parse(raw.trim()) {
                Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(url),
                _ => Err(AnalysisError::ConflictingConfig(format!(
                    "broken_links.base_url must be an absolute http(s) URL, got {raw:?}"
                ))),
            })
            .transpose()?;

        let user_agent = policy.user_agent.clone().unwrap_or_else(|| {
            concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string()
        });
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(policy.request_timeout_ms))
            .user_agent(user_agent)
            .build()
            .map_err(|e| AnalysisError::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            policy,
            ignore,
            base,
            progress: None,
        })
    }

    /// Report progress after each completed target.
    #[must_use]
    pub fn with_progress<F>(mut self, progress: F) -> Self
    where
        F: Fn(usize, usize) + Send + Sync + 'static,
    {
        self.progress = Some(Arc::new(progress));
        self
    }

    /// Check every outgoing link of `pages`.
    #[tracing::instrument(skip_all, fields(pages = pages.len()))]
    pub async fn detect_broken_links(&self, pages: &[PageLinkData]) -> BrokenLinkReport {
        let mut report = BrokenLinkReport::default();

        // target -> sources
        let mut targets: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        let mut skipped = BTreeSet::new();
        let mut broken = BTreeSet::new();

        for page in pages {
            for link in &page.internal_links_to {
                match resolve(self.base.as_ref(), &page.url, link) {
                    Some(url) => {
                        let target = url.to_string();
                        if !matches!(url.scheme(), "http" | "https")
                            || self.ignore.is_match(link)
                            || self.ignore.is_match(&target)
                        {
                            skipped.insert(target);
                        } else {
                            targets.entry(target).or_default().insert(page.url.clone());
                        }
                    }
                    None => {
                        let suggestion = if self.base.is_none() && Url::parse(&page.url).is_err() {
                            "Set broken_links.base_url to resolve site-relative pages"
                        } else {
                            "Fix the malformed URL"
                        };
                        broken.insert(BrokenLink {
                            source_url: page.url.clone(),
                            target_url: link.clone(),
                            status_code: None,
                            suggestion: suggestion.to_string(),
                        });
                    }
                }
            }
        }

        let total = targets.len();
        tracing::debug!(targets = total, skipped = skipped.len(), "checking link targets");

        let semaphore = Arc::new(Semaphore::new(self.policy.concurrency));
        let mut join_set: JoinSet<(String, Outcome)> = JoinSet::new();
        for target in targets.keys() {
            let client = self.client.clone();
            let semaphore = Arc::clone(&semaphore);
            let target = target.clone();
            join_set.spawn(async move {
                let outcome = match semaphore.acquire_owned().await {
                    Ok(_permit) => check(&client, &target).await,
                    Err(e) => Outcome::Unreachable(e.to_string()),
                };
                (target, outcome)
            });
        }

        let deadline = Instant::now() + Duration::from_millis(self.policy.overall_timeout_ms);
        let mut completed: BTreeSet<String> = BTreeSet::new();
        loop {
            match tokio::time::timeout_at(deadline, join_set.join_next()).await {
                Ok(Some(Ok((target, outcome)))) => {
                    completed.insert(target.clone());
                    if let Some(progress) = &self.progress {
                        progress(completed.len(), total);
                    }
                    let (status_code, suggestion) = match outcome {
                        Outcome::Ok => continue,
                        Outcome::Status(code) => (Some(code), status_suggestion(code)),
                        Outcome::Unreachable(reason) => {
                            tracing::debug!(url = %target, reason, "link unreachable");
                            (None, format!("Could not reach {target}; check that the page exists"))
                        }
                    };
                    for source in &targets[&target] {
                        broken.insert(BrokenLink {
                            source_url: source.clone(),
                            target_url: target.clone(),
                            status_code,
                            suggestion: suggestion.clone(),
                        });
                    }
                }
                Ok(Some(Err(e))) => tracing::warn!(error = %e, "link check task failed"),
                Ok(None) => break,
                Err(_) => {
                    tracing::warn!(
                        remaining = total - completed.len(),
                        "broken-link deadline reached"
                    );
                    join_set.abort_all();
                    break;
                }
            }
        }

        report.checked = completed.len();
        report.unchecked = targets
            .keys()
            .filter(|t| !completed.contains(*t))
            .cloned()
            .collect();
        report.skipped = skipped.into_iter().collect();
        report.broken = broken.into_iter().collect();
        tracing::info!(
            checked = report.checked,
            broken = report.broken.len(),
            unchecked = report.unchecked.len(),
            "broken-link check finished"
        );
        report
    }
}

/// Resolve `link` on its own or relative to the page it appears on. A
/// site-relative page URL is first resolved against `base`.
fn resolve(base: Option<&Url>, source: &str, link: &str) -> Option<Url> {
    let link = link.trim();
    if link.is_empty() {
        return None;
    }
    if let Ok(url) = Url::parse(link) {
        return Some(url);
    }
    let page = match Url::parse(source) {
        Ok(page) => page,
        Err(_) => base?.join(source.trim()).ok()?,
    };
    page.join(link).ok()
}

async fn check(client: &reqwest::Client, url: &str) -> Outcome {
    match client.head(url).send().await {
        Ok(response) if response.status().is_success() => Outcome::Ok,
        Ok(response) => Outcome::Status(response.status().as_u16()),
        Err(e) if e.is_timeout() => Outcome::Unreachable("request timed out".to_string()),
        Err(e) => Outcome::Unreachable(e.to_string()),
    }
}

fn status_suggestion(code: u16) -> String {
    match code {
        404 | 410 => "Remove the link or point it at a live page".to_string(),
        401 | 403 => "Link to a publicly accessible page".to_string(),
        500..=599 => format!("Target returned a server error ({code}); check the page"),
        _ => format!("Update the link (HTTP {code})"),
    }
}
