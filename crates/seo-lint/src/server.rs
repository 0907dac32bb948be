//! MCP (Model Context Protocol) server implementation.
//!
//! This module exposes the analyzers over the MCP protocol, making them
//! available to AI assistants (Claude Code, Cursor, etc.) via stdio transport.
//!
//! # Architecture
//!
//! The MCP server is a presentation layer: it wraps the same core library
//! that the CLI commands use. Each `#[tool]` method delegates to core library
//! functions rather than implementing business logic directly. Analyzers are
//! compiled once from the loaded configuration and shared across calls.
//!
//! # Adding Tools
//!
//! 1. Define a parameter struct with `Deserialize` + `JsonSchema`
//! 2. Add a `#[tool(description = "...")]` method to the `#[tool_router]` impl
//! 3. Call core library functions, convert errors to `McpError`
//! 4. Return the report through [`json_result`]

use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo};
use rmcp::schemars;
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};
use serde::Serialize;

use seo_lint_core::audit::{self, AuditOptions};
use seo_lint_core::config::Config;
use seo_lint_core::error::AnalysisResult;
use seo_lint_core::keywords;
use seo_lint_core::links::{self, BrokenLinkChecker, LinkGraph, PageLinkData};
use seo_lint_core::lsi::LsiKeyword;
use seo_lint_core::markdown;

/// Parameters for the `get_info` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct GetInfoParams {
    /// Output format: "text" or "json"
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_format() -> String {
    "text".to_string()
}

/// Parameters for the `analyze_keyword_density` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct KeywordDensityParams {
    /// The content to analyze.
    pub text: String,
    /// Target keywords.
    pub keywords: Vec<String>,
    /// Minimum density in percent (defaults to the configured value).
    pub min_density: Option<f64>,
    /// Maximum density in percent (defaults to the configured value).
    pub max_density: Option<f64>,
}

/// Parameters for the `enhance_precision` and `score_precision` tools.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct PrecisionParams {
    /// The content to rewrite or score.
    pub text: String,
    /// Treat the content as markdown: score only prose and leave links,
    /// code, and frontmatter untouched when rewriting.
    #[serde(default)]
    pub strip_markdown: bool,
}

/// Parameters for the `integrate_semantic_terms` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct SemanticTermsParams {
    /// The content to enrich.
    pub text: String,
    /// Related terms with their scores. When omitted, terms are mined from
    /// `competitor_texts`.
    #[serde(default)]
    pub keywords: Vec<LsiKeyword>,
    /// Competitor page texts to mine for terms and placement context.
    #[serde(default)]
    pub competitor_texts: Vec<String>,
}

/// Parameters for the `validate_alignment` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct AlignmentParams {
    /// The content to check.
    pub text: String,
    /// Problems the reader has.
    pub problems: Vec<String>,
    /// Whether to strip markdown formatting before analysis.
    #[serde(default)]
    pub strip_markdown: bool,
}

/// Parameters for the `analyze_link_distribution` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct LinkDistributionParams {
    /// Pages with their internal links.
    pub pages: Vec<PageLinkData>,
    /// Homepage URL; depths are counted from here.
    pub homepage: String,
    /// Derive `internalLinksFrom` from outgoing links.
    #[serde(default)]
    pub infer_backlinks: bool,
}

/// Parameters for the `detect_broken_links` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct BrokenLinksParams {
    /// Pages whose outgoing links are checked.
    pub pages: Vec<PageLinkData>,
    /// Maximum requests in flight (defaults to the configured value).
    pub concurrency: Option<usize>,
    /// Per-request timeout in milliseconds (defaults to the configured value).
    pub timeout_ms: Option<u64>,
    /// Origin for site-relative page URLs such as `/` (defaults to the
    /// configured value).
    pub base_url: Option<String>,
}

/// Parameters for the `audit_content` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct AuditParams {
    /// The content to audit.
    pub text: String,
    /// Whether to strip markdown formatting before analysis.
    #[serde(default)]
    pub strip_markdown: bool,
    /// Checks to run. Omit for all checks.
    pub checks: Option<Vec<String>>,
    /// Checks to skip. Cannot be combined with `checks`.
    pub exclude: Option<Vec<String>>,
    /// Target keywords for the density check.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Reader problems for the alignment check.
    #[serde(default)]
    pub problems: Vec<String>,
    /// Related terms for the LSI check.
    #[serde(default)]
    pub lsi_keywords: Vec<LsiKeyword>,
    /// Minimum acceptable precision score.
    pub min_precision: Option<f64>,
}

/// Serialize a report as the tool's text content.
fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("serialization error: {e}"), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

fn invalid_params(e: impl std::fmt::Display) -> McpError {
    McpError::invalid_params(e.to_string(), None)
}

/// MCP server exposing the analyzers to AI assistants.
///
/// Each `#[tool]` method in the `#[tool_router]` impl block is automatically
/// registered and callable via the MCP protocol.
#[derive(Clone)]
pub struct ProjectServer {
    tool_router: ToolRouter<Self>,
    config: Arc<Config>,
    options: Arc<AuditOptions>,
    max_input_bytes: Option<usize>,
}

impl Default for ProjectServer {
    fn default() -> Self {
        let config = Config::default();
        let limit = config.input_limit();
        Self::new(config, limit).expect("default configuration compiles")
    }
}

impl ProjectServer {
    /// Create a server whose analyzers follow `config`.
    pub fn new(config: Config, max_input_bytes: Option<usize>) -> AnalysisResult<Self> {
        let options = AuditOptions::from_config(&config)?;
        Ok(Self {
            tool_router: Self::tool_router(),
            config: Arc::new(config),
            options: Arc::new(options),
            max_input_bytes,
        })
    }

    fn check_size(&self, len: usize) -> Result<(), McpError> {
        match self.max_input_bytes {
            Some(max) if len > max => Err(invalid_params(format!(
                "input too large: {len} bytes (limit: {max} bytes)"
            ))),
            _ => Ok(()),
        }
    }

    fn prose(&self, text: &str, strip_markdown: bool) -> Result<String, McpError> {
        self.check_size(text.len())?;
        Ok(if strip_markdown {
            markdown::strip_to_prose(text)
        } else {
            text.to_string()
        })
    }
}

#[tool_router]
impl ProjectServer {
    /// Get project information.
    #[tool(description = "Get project name, version, and description")]
    #[tracing::instrument(skip(self), fields(otel.kind = "server"))]
    fn get_info(
        &self,
        Parameters(params): Parameters<GetInfoParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "get_info", format = %params.format, "executing MCP tool");

        let info = serde_json::json!({
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "description": env!("CARGO_PKG_DESCRIPTION"),
        });

        let text = if params.format == "json" {
            serde_json::to_string_pretty(&info)
                .map_err(|e| McpError::internal_error(format!("serialization error: {e}"), None))?
        } else {
            format!(
                "{} v{}\n{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION"),
                env!("CARGO_PKG_DESCRIPTION"),
            )
        };

        tracing::info!(tool = "get_info", "MCP tool completed");
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    /// Keyword density and suggestions.
    #[tool(
        description = "Measure keyword density (occurrences per 100 words) and suggest fixes for low or high density, long sentences, missing headings, missing questions, and short content."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn analyze_keyword_density(
        &self,
        Parameters(params): Parameters<KeywordDensityParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(
            tool = "analyze_keyword_density",
            keywords = params.keywords.len(),
            "executing MCP tool"
        );
        self.check_size(params.text.len())?;

        let mut policy = self.config.keyword_density.clone();
        if let Some(min) = params.min_density {
            policy.min_density = min;
        }
        if let Some(max) = params.max_density {
            policy.max_density = max;
        }
        let report = keywords::analyze_keyword_density(&params.text, &params.keywords, &policy);

        tracing::info!(
            tool = "analyze_keyword_density",
            suggestions = report.suggestions.len(),
            "MCP tool completed"
        );
        json_result(&report)
    }

    /// Rewrite vague wording.
    #[tool(
        description = "Replace vague words and wordy phrases with precise alternatives. Returns the rewritten content and every substitution made."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn enhance_precision(
        &self,
        Parameters(params): Parameters<PrecisionParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "enhance_precision", "executing MCP tool");
        self.check_size(params.text.len())?;

        let enhancement = if params.strip_markdown {
            self.options.precision.enhance_markdown(&params.text)
        } else {
            self.options.precision.enhance_precision(&params.text)
        };

        tracing::info!(
            tool = "enhance_precision",
            changes = enhancement.changes.len(),
            "MCP tool completed"
        );
        json_result(&enhancement)
    }

    /// Score wording precision.
    #[tool(
        description = "Score how precise the wording is (0-100) and list vague words, hedging phrases, and suggestions."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn score_precision(
        &self,
        Parameters(params): Parameters<PrecisionParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(
            tool = "score_precision",
            strip_md = params.strip_markdown,
            "executing MCP tool"
        );
        let prose = self.prose(&params.text, params.strip_markdown)?;

        let report = self.options.precision.analyze(&prose);

        tracing::info!(tool = "score_precision", score = report.score, "MCP tool completed");
        json_result(&report)
    }

    /// Weave related terms into content.
    #[tool(
        description = "Insert related (LSI) terms the content does not yet mention. Terms come from `keywords` or are mined from `competitor_texts`; competitor context guides placement."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn integrate_semantic_terms(
        &self,
        Parameters(params): Parameters<SemanticTermsParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(
            tool = "integrate_semantic_terms",
            keywords = params.keywords.len(),
            competitors = params.competitor_texts.len(),
            "executing MCP tool"
        );
        let total: usize = params.text.len()
            + params
                .competitor_texts
                .iter()
                .map(String::len)
                .sum::<usize>();
        self.check_size(total)?;

        let integrator = &self.options.lsi;
        let analysis = integrator.analyze_competitor_patterns(&params.competitor_texts);
        let keywords = if params.keywords.is_empty() {
            integrator.suggest_keywords(&analysis)
        } else {
            params.keywords
        };
        let result = integrator.integrate_semantic_terms(&params.text, &keywords, &analysis.patterns);

        tracing::info!(
            tool = "integrate_semantic_terms",
            integrated = result.integrated_terms,
            "MCP tool completed"
        );
        json_result(&result)
    }

    /// Problem–solution alignment.
    #[tool(
        description = "Check how well content names the reader's problems and offers actionable solutions. Scores are fractions from 0 to 1."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn validate_alignment(
        &self,
        Parameters(params): Parameters<AlignmentParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(
            tool = "validate_alignment",
            problems = params.problems.len(),
            "executing MCP tool"
        );
        let prose = self.prose(&params.text, params.strip_markdown)?;

        let report = self.options.aligner.validate_alignment(&prose, &params.problems);

        tracing::info!(
            tool = "validate_alignment",
            score = report.alignment_score,
            "MCP tool completed"
        );
        json_result(&report)
    }

    /// Link distribution over a page graph.
    #[tool(
        description = "Analyze internal link distribution: orphan pages, hubs, authorities, equity evenness, and click depth from the homepage."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server", homepage = %params.homepage))]
    fn analyze_link_distribution(
        &self,
        Parameters(params): Parameters<LinkDistributionParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(
            tool = "analyze_link_distribution",
            pages = params.pages.len(),
            "executing MCP tool"
        );

        let mut graph = LinkGraph::new(params.pages).map_err(invalid_params)?;
        if params.infer_backlinks {
            graph = graph.with_inferred_backlinks();
        }
        let report =
            links::analyze_link_distribution(&graph, &params.homepage, &self.config.links);

        tracing::info!(
            tool = "analyze_link_distribution",
            orphans = report.orphan_pages.len(),
            "MCP tool completed"
        );
        json_result(&report)
    }

    /// Broken-link detection over HTTP.
    #[tool(
        description = "Check every outgoing link of the given pages over HTTP and report broken targets with status codes and fixes."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    async fn detect_broken_links(
        &self,
        Parameters(params): Parameters<BrokenLinksParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(
            tool = "detect_broken_links",
            pages = params.pages.len(),
            "executing MCP tool"
        );

        let graph = LinkGraph::new(params.pages).map_err(invalid_params)?;
        let mut policy = self.config.broken_links.clone();
        if let Some(concurrency) = params.concurrency {
            policy.concurrency = concurrency;
        }
        if let Some(ms) = params.timeout_ms {
            policy.request_timeout_ms = ms;
        }
        if params.base_url.is_some() {
            policy.base_url = params.base_url;
        }
        let checker = BrokenLinkChecker::new(policy).map_err(invalid_params)?;
        let report = checker.detect_broken_links(graph.pages()).await;

        tracing::info!(
            tool = "detect_broken_links",
            checked = report.checked,
            broken = report.broken.len(),
            "MCP tool completed"
        );
        json_result(&report)
    }

    /// All content checks at once.
    #[tool(
        description = "Audit content with every text check (keywords, precision, alignment, lsi) or a chosen subset. Returns each report plus an overall pass flag."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn audit_content(
        &self,
        Parameters(params): Parameters<AuditParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(
            tool = "audit_content",
            strip_md = params.strip_markdown,
            "executing MCP tool"
        );
        self.check_size(params.text.len())?;

        let checks = audit::resolve_checks(params.checks.as_deref(), params.exclude.as_deref())
            .map_err(invalid_params)?;
        let mut options = (*self.options).clone();
        options.keywords = params.keywords;
        options.problems = params.problems;
        options.lsi_keywords = params.lsi_keywords;
        if params.min_precision.is_some() {
            options.min_precision_score = params.min_precision;
        }

        let report =
            audit::run_content_audit(&params.text, params.strip_markdown, checks.as_deref(), &options)
                .map_err(invalid_params)?;

        tracing::info!(tool = "audit_content", pass = report.pass, "MCP tool completed");
        json_result(&report)
    }
}

#[tool_handler]
impl ServerHandler for ProjectServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(format!(
                "{} MCP server. Use tools to analyze keyword density, wording precision, related terms, problem-solution alignment, and internal links.",
                env!("CARGO_PKG_NAME"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::RawContent;

    #[test]
    fn server_info_has_correct_name() {
        let server = ProjectServer::default();
        let info = ServerHandler::get_info(&server);

        assert_eq!(info.server_info.name, env!("CARGO_PKG_NAME"));
        assert_eq!(info.server_info.version, env!("CARGO_PKG_VERSION"));
        assert!(info.capabilities.tools.is_some());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = Config::default();
        config.precision.penalty_weight = f64::NAN;
        assert!(ProjectServer::new(config, None).is_err());
    }

    /// Extract text from the first content item in a `CallToolResult`.
    fn extract_text(result: &CallToolResult) -> Option<&str> {
        result.content.first().and_then(|c| match &c.raw {
            RawContent::Text(t) => Some(t.text.as_str()),
            _ => None,
        })
    }

    fn json_of(result: &CallToolResult) -> serde_json::Value {
        assert!(!result.is_error.unwrap_or(false));
        let text = extract_text(result).expect("should have text content");
        serde_json::from_str(text).expect("valid JSON")
    }

    #[test]
    fn get_info_tool_returns_json_when_requested() {
        let server = ProjectServer::default();
        let params = Parameters(GetInfoParams {
            format: "json".to_string(),
        });

        let result = server.get_info(params).expect("get_info should succeed");
        let json = json_of(&result);
        assert_eq!(json["name"], env!("CARGO_PKG_NAME"));
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn keyword_density_tool_works() {
        let server = ProjectServer::default();
        let params = Parameters(KeywordDensityParams {
            text: "SEO matters. Good SEO brings visitors. Why care about SEO?".to_string(),
            keywords: vec!["seo".to_string()],
            min_density: None,
            max_density: None,
        });

        let result = server.analyze_keyword_density(params).unwrap();
        let json = json_of(&result);
        assert_eq!(json["keywords"][0]["occurrences"], 3);
        assert_eq!(json["keywords"][0]["status"], "high");
    }

    #[test]
    fn enhance_precision_tool_records_changes() {
        let server = ProjectServer::default();
        let params = Parameters(PrecisionParams {
            text: "This is very good.".to_string(),
            strip_markdown: false,
        });

        let result = server.enhance_precision(params).unwrap();
        let json = json_of(&result);
        assert_eq!(json["content"], "This is excellent.");
        assert_eq!(json["changes"][0]["type"], "precision");
    }

    #[test]
    fn enhance_precision_tool_keeps_markdown_links() {
        let server = ProjectServer::default();
        let params = Parameters(PrecisionParams {
            text: "A [good read](https://example.com/good).".to_string(),
            strip_markdown: true,
        });

        let result = server.enhance_precision(params).unwrap();
        let json = json_of(&result);
        assert_eq!(json["content"], "A [effective read](https://example.com/good).");
    }

    #[test]
    fn score_precision_tool_rejects_oversized_input() {
        let server = ProjectServer::new(Config::default(), Some(8)).unwrap();
        let params = Parameters(PrecisionParams {
            text: "far more than eight bytes".to_string(),
            strip_markdown: false,
        });
        assert!(server.score_precision(params).is_err());
    }

    #[test]
    fn semantic_terms_tool_inserts_keyword() {
        let server = ProjectServer::default();
        let params = Parameters(SemanticTermsParams {
            text: "SEO is important.".to_string(),
            keywords: vec![LsiKeyword {
                term: "optimization".to_string(),
                relevance: 0.9,
                semantic_score: 0.8,
                context_strength: 0.7,
            }],
            competitor_texts: Vec::new(),
        });

        let result = server.integrate_semantic_terms(params).unwrap();
        let json = json_of(&result);
        assert_eq!(json["optimized_content"], "SEO is important, including optimization.");
        assert_eq!(json["integrated_terms"], 1);
    }

    #[test]
    fn alignment_tool_reports_gaps() {
        let server = ProjectServer::default();
        let params = Parameters(AlignmentParams {
            text: "Slow pages hurt. The solution: compress images first.".to_string(),
            problems: vec!["slow pages".to_string(), "broken forms".to_string()],
            strip_markdown: false,
        });

        let result = server.validate_alignment(params).unwrap();
        let json = json_of(&result);
        assert_eq!(json["gap_analysis"][0], "broken forms");
        assert_eq!(json["problem_coverage"], 0.5);
    }

    #[test]
    fn link_distribution_tool_finds_orphans() {
        let server = ProjectServer::default();
        let params = Parameters(LinkDistributionParams {
            pages: vec![
                PageLinkData::new("/", vec!["/a".to_string()]),
                PageLinkData::new("/a", vec!["/".to_string()]),
                PageLinkData::new("/lonely", Vec::new()),
            ],
            homepage: "/".to_string(),
            infer_backlinks: true,
        });

        let result = server.analyze_link_distribution(params).unwrap();
        let json = json_of(&result);
        assert_eq!(json["orphan_pages"][0], "/lonely");
        assert_eq!(json["unreachable_pages"][0], "/lonely");
    }

    #[test]
    fn link_distribution_tool_rejects_duplicate_pages() {
        let server = ProjectServer::default();
        let params = Parameters(LinkDistributionParams {
            pages: vec![
                PageLinkData::new("/", Vec::new()),
                PageLinkData::new("/", Vec::new()),
            ],
            homepage: "/".to_string(),
            infer_backlinks: false,
        });
        assert!(server.analyze_link_distribution(params).is_err());
    }

    #[tokio::test]
    async fn broken_links_tool_skips_non_http_targets() {
        let server = ProjectServer::default();
        let params = Parameters(BrokenLinksParams {
            pages: vec![PageLinkData::new(
                "https://example.com/",
                vec!["mailto:team@example.com".to_string()],
            )],
            concurrency: None,
            timeout_ms: None,
            base_url: None,
        });

        let result = server.detect_broken_links(params).await.unwrap();
        let json = json_of(&result);
        assert_eq!(json["checked"], 0);
        assert_eq!(json["skipped"][0], "mailto:team@example.com");
    }

    #[test]
    fn audit_tool_runs_selected_checks() {
        let server = ProjectServer::default();
        let params = Parameters(AuditParams {
            text: "# Title\n\nThis is really very good stuff.".to_string(),
            strip_markdown: true,
            checks: Some(vec!["precision".to_string()]),
            exclude: None,
            keywords: Vec::new(),
            problems: Vec::new(),
            lsi_keywords: Vec::new(),
            min_precision: Some(99.0),
        });

        let result = server.audit_content(params).unwrap();
        let json = json_of(&result);
        assert!(json["precision"].is_object());
        assert!(json.get("keywords").is_none());
        assert_eq!(json["pass"], false);
    }

    #[test]
    fn audit_tool_rejects_unknown_check() {
        let server = ProjectServer::default();
        let params = Parameters(AuditParams {
            text: "Some text here.".to_string(),
            strip_markdown: false,
            checks: Some(vec!["readability".to_string()]),
            exclude: None,
            keywords: Vec::new(),
            problems: Vec::new(),
            lsi_keywords: Vec::new(),
            min_precision: None,
        });
        assert!(server.audit_content(params).is_err());
    }
}
