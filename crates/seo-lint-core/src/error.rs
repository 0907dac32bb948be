//! Error types for seo-lint-core.

use thiserror::Error;

/// Errors that can occur when working with configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to deserialize configuration.
    #[error("invalid configuration: {0}")]
    Deserialize(#[from] Box<figment::Error>),

    /// Configuration file not found after searching all locations.
    #[error("no configuration file found")]
    NotFound,
}

/// Result type alias using [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while setting up or orchestrating analysis.
///
/// The analyzers themselves degrade to zero-valued reports on empty or
/// degenerate text; these errors only surface at construction and
/// orchestration boundaries.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// The input text is empty or has no scorable content.
    #[error("no scorable text in input")]
    EmptyInput,

    /// An unknown audit check name was provided.
    #[error("unknown check: {name}. Use: {available}")]
    UnknownCheck {
        /// The check name that was requested.
        name: String,
        /// Comma-separated list of available check names.
        available: String,
    },

    /// Mutually exclusive settings were supplied together.
    #[error("conflicting configuration: {0}")]
    ConflictingConfig(String),

    /// A lexicon entry could not be compiled into a matcher.
    #[error("invalid lexicon: {0}")]
    InvalidLexicon(String),

    /// The HTTP client used for link checking could not be built.
    #[error("http client initialization failed: {0}")]
    HttpClient(String),
}

/// Result type alias using [`AnalysisError`].
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Errors raised while validating a caller-supplied page link graph.
#[derive(Error, Debug)]
pub enum LinkGraphError {
    /// The graph document is not valid JSON or has missing fields.
    #[error("malformed link graph: {0}")]
    Parse(#[from] serde_json::Error),

    /// A page record has a blank URL.
    #[error("page #{index} has an empty url")]
    EmptyUrl {
        /// Zero-based position of the offending page.
        index: usize,
    },

    /// The same URL appears on more than one page record.
    #[error("duplicate page url: {0}")]
    DuplicateUrl(String),
}

/// Result type alias using [`LinkGraphError`].
pub type LinkGraphResult<T> = Result<T, LinkGraphError>;
