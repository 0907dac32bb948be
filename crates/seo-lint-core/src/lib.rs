//! Core library for seo-lint.
//!
//! Heuristic SEO analysis for page drafts and internal link graphs. Every
//! analyzer is a pure function of its inputs except broken-link detection,
//! which needs the network (`net` feature).
//!
//! # Modules
//!
//! - [`keywords`] - Keyword density and on-page suggestions
//! - [`precision`] - Vague-language replacement and precision scoring
//! - [`lsi`] - Semantic term mining and insertion
//! - [`alignment`] - Problem–solution alignment scoring
//! - [`links`] - Link distribution, depth, and broken-link detection
//! - [`audit`] - All text checks over one document
//! - [`config`] - Configuration loading and management
//! - [`error`] - Error types and result aliases
//!
//! # Quick Start
//!
//! ```
//! use seo_lint_core::keywords::{DensityPolicy, analyze_keyword_density};
//! use seo_lint_core::precision::PrecisionEngine;
//!
//! let draft = "SEO is really very important for small shops.";
//! let report = analyze_keyword_density(draft, &["seo".to_string()], &DensityPolicy::default());
//! assert_eq!(report.keywords[0].occurrences, 1);
//!
//! let engine = PrecisionEngine::default();
//! let enhanced = engine.enhance_precision(draft);
//! assert!(!enhanced.changes.is_empty());
//! ```
#![deny(unsafe_code)]

pub mod alignment;
pub mod audit;
pub mod config;
pub mod error;
pub mod keywords;
pub mod lexicon;
pub mod links;
pub mod lsi;
pub mod markdown;
pub mod precision;
pub mod text;

pub use alignment::{AlignmentReport, ProblemSolutionAligner};
pub use audit::{AuditOptions, ContentAuditReport, run_content_audit};
pub use config::{Config, ConfigLoader, LogLevel};
pub use error::{
    AnalysisError, AnalysisResult, ConfigError, ConfigResult, LinkGraphError, LinkGraphResult,
};
pub use keywords::{DensityPolicy, KeywordDensityReport, analyze_keyword_density};
pub use links::{LinkDistributionReport, LinkGraph, PageLinkData, analyze_link_distribution};
pub use lsi::{LsiIntegrator, LsiKeyword, SemanticIntegration};
pub use precision::{PrecisionEngine, PrecisionReport};

/// Default maximum input size: 5 MiB.
pub const DEFAULT_MAX_INPUT_BYTES: usize = 5 * 1024 * 1024;
