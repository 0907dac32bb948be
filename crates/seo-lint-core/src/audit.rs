//! Content audit.
//!
//! Runs the text analyzers over one document and gathers their reports, so
//! a page draft can be checked in a single call. Link analysis works on a
//! whole site graph and is not part of the audit.

use std::collections::HashSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::alignment::{AlignmentReport, ProblemSolutionAligner};
use crate::config::Config;
use crate::error::{AnalysisError, AnalysisResult};
use crate::keywords::{self, DensityPolicy, KeywordDensityReport};
use crate::lsi::{LsiIntegrator, LsiKeyword, LsiPattern, SemanticIntegration};
use crate::markdown;
use crate::precision::{PrecisionEngine, PrecisionReport};
use crate::text;

/// All available check names.
pub const ALL_CHECKS: &[&str] = &["keywords", "precision", "alignment", "lsi"];

/// Inputs and analyzers for [`run_content_audit`].
#[derive(Debug, Clone, Default)]
pub struct AuditOptions {
    /// Target keywords for the density check.
    pub keywords: Vec<String>,
    /// Reader problems for the alignment check.
    pub problems: Vec<String>,
    /// Related terms for the LSI check.
    pub lsi_keywords: Vec<LsiKeyword>,
    /// Competitor patterns guiding LSI placement.
    pub competitor_patterns: Vec<LsiPattern>,
    /// Density thresholds.
    pub density: DensityPolicy,
    /// Precision engine (built-in or configured lexicon).
    pub precision: PrecisionEngine,
    /// Problem–solution aligner.
    pub aligner: ProblemSolutionAligner,
    /// LSI integrator.
    pub lsi: LsiIntegrator,
    /// Fail the audit when the precision score is below this.
    pub min_precision_score: Option<f64>,
}

impl AuditOptions {
    /// Analyzers and thresholds taken from `config`; inputs are left empty.
    pub fn from_config(config: &Config) -> AnalysisResult<Self> {
        Ok(Self {
            density: config.keyword_density.clone(),
            precision: config.precision.engine()?,
            aligner: ProblemSolutionAligner::from_config(&config.alignment)?,
            lsi: LsiIntegrator::new(config.lsi.clone()),
            min_precision_score: config.precision.min_score,
            ..Self::default()
        })
    }
}

/// Combined audit report.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ContentAuditReport {
    /// Words in the analyzed prose.
    pub word_count: usize,
    /// Sentences in the analyzed prose.
    pub sentence_count: usize,
    /// Keyword density results.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<KeywordDensityReport>,
    /// Precision score and word-choice findings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precision: Option<PrecisionReport>,
    /// Problem–solution alignment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alignment: Option<AlignmentReport>,
    /// Semantic term integration preview.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lsi: Option<SemanticIntegration>,
    /// Whether every configured gate passed.
    pub pass: bool,
    /// Why the audit failed, if it did.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<String>,
}

/// Resolve include/exclude lists into the checks to run.
///
/// `None` means all checks. Supplying both lists is a conflict; unknown
/// names in `exclude` are rejected.
pub fn resolve_checks(
    checks: Option<&[String]>,
    exclude: Option<&[String]>,
) -> AnalysisResult<Option<Vec<String>>> {
    match (checks, exclude) {
        (Some(checks), None) => Ok(Some(checks.to_vec())),
        (None, Some(exclude)) => {
            if let Some(unknown) = exclude.iter().find(|c| !ALL_CHECKS.contains(&c.as_str())) {
                return Err(AnalysisError::UnknownCheck {
                    name: unknown.clone(),
                    available: ALL_CHECKS.join(", "),
                });
            }
            let excluded: HashSet<&str> = exclude.iter().map(String::as_str).collect();
            Ok(Some(
                ALL_CHECKS
                    .iter()
                    .filter(|name| !excluded.contains(*name))
                    .map(|s| (*s).to_string())
                    .collect(),
            ))
        }
        (Some(_), Some(_)) => Err(AnalysisError::ConflictingConfig(
            "cannot specify both checks and exclude".to_string(),
        )),
        (None, None) => Ok(None),
    }
}

/// Run the selected checks over `input`.
///
/// # Arguments
///
/// * `input` — The text to audit.
/// * `strip_md` — If `true`, strip markdown formatting before analysis.
///   Heading detection always looks at the raw input.
/// * `checks` — Optional list of check names to run. If `None`, runs all.
/// * `options` — Keywords, problems, and analyzers.
#[tracing::instrument(skip(input, options), fields(text_len = input.len(), strip_md))]
pub fn run_content_audit(
    input: &str,
    strip_md: bool,
    checks: Option<&[String]>,
    options: &AuditOptions,
) -> AnalysisResult<ContentAuditReport> {
    if let Some(list) = checks
        && let Some(unknown) = list.iter().find(|c| !ALL_CHECKS.contains(&c.as_str()))
    {
        return Err(AnalysisError::UnknownCheck {
            name: unknown.clone(),
            available: ALL_CHECKS.join(", "),
        });
    }

    let prose = if strip_md {
        markdown::strip_to_prose(input)
    } else {
        input.to_string()
    };
    if prose.trim().is_empty() {
        return Err(AnalysisError::EmptyInput);
    }

    let enabled: HashSet<&str> = checks.map_or_else(
        || ALL_CHECKS.iter().copied().collect(),
        |list| list.iter().map(String::as_str).collect(),
    );

    let keywords_report = enabled.contains("keywords").then(|| {
        let mut report = keywords::analyze_keyword_density(&prose, &options.keywords, &options.density);
        if strip_md && markdown::has_headings(input) {
            report
                .suggestions
                .retain(|s| s.kind != keywords::SuggestionKind::MissingHeadings);
        }
        report
    });

    let precision_report = enabled
        .contains("precision")
        .then(|| options.precision.analyze(&prose));

    let alignment_report = enabled
        .contains("alignment")
        .then(|| options.aligner.validate_alignment(&prose, &options.problems));

    let lsi_report = enabled.contains("lsi").then(|| {
        options
            .lsi
            .integrate_semantic_terms(&prose, &options.lsi_keywords, &options.competitor_patterns)
    });

    let mut failures = Vec::new();
    if let (Some(min), Some(report)) = (options.min_precision_score, &precision_report)
        && report.score < min
    {
        failures.push(format!(
            "precision score {:.1} is below minimum {min:.1}",
            report.score
        ));
    }

    Ok(ContentAuditReport {
        word_count: text::word_count(&prose),
        sentence_count: text::sentence_spans(&prose).len(),
        keywords: keywords_report,
        precision: precision_report,
        alignment: alignment_report,
        lsi: lsi_report,
        pass: failures.is_empty(),
        failures,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    const DRAFT: &str = "# Fixing slow pages\n\n\
        Why are slow pages a problem? Slow pages lose visitors.\n\n\
        The fix: first compress images, then cache assets.";

    #[test]
    fn runs_all_checks_by_default() {
        let options = AuditOptions {
            keywords: strings(&["slow pages"]),
            problems: strings(&["slow pages"]),
            ..AuditOptions::default()
        };
        let report = run_content_audit(DRAFT, true, None, &options).unwrap();
        assert!(report.keywords.is_some());
        assert!(report.precision.is_some());
        assert!(report.alignment.is_some());
        assert!(report.lsi.is_some());
        assert!(report.pass);

        let keywords = report.keywords.unwrap();
        assert_eq!(keywords.keywords[0].occurrences, 3);
        assert!(
            !keywords
                .suggestions
                .iter()
                .any(|s| s.kind == keywords::SuggestionKind::MissingHeadings)
        );
        assert!(report.alignment.unwrap().alignment_score > 0.0);
    }

    #[test]
    fn selected_checks_only() {
        let checks = strings(&["precision"]);
        let report =
            run_content_audit(DRAFT, true, Some(&checks), &AuditOptions::default()).unwrap();
        assert!(report.precision.is_some());
        assert!(report.keywords.is_none());
        assert!(report.alignment.is_none());
        assert!(report.lsi.is_none());
    }

    #[test]
    fn unknown_check_rejected() {
        let checks = strings(&["readability"]);
        let err = run_content_audit(DRAFT, false, Some(&checks), &AuditOptions::default())
            .unwrap_err();
        assert!(matches!(err, AnalysisError::UnknownCheck { ref name, .. } if name == "readability"));
    }

    #[test]
    fn empty_input_rejected() {
        let err = run_content_audit("```\ncode only\n```", true, None, &AuditOptions::default())
            .unwrap_err();
        assert!(matches!(err, AnalysisError::EmptyInput));
    }

    #[test]
    fn precision_gate_fails_audit() {
        let options = AuditOptions {
            min_precision_score: Some(95.0),
            ..AuditOptions::default()
        };
        let report =
            run_content_audit("This is really very good stuff.", false, None, &options).unwrap();
        assert!(!report.pass);
        assert_eq!(report.failures.len(), 1);
    }

    #[test]
    fn options_follow_config() {
        let mut config = Config::default();
        config.precision.min_score = Some(99.0);
        config.keyword_density.max_density = 10.0;
        let options = AuditOptions::from_config(&config).unwrap();
        assert_eq!(options.min_precision_score, Some(99.0));
        assert!((options.density.max_density - 10.0).abs() < f64::EPSILON);

        config.precision.penalty_weight = -1.0;
        assert!(matches!(
            AuditOptions::from_config(&config),
            Err(AnalysisError::InvalidLexicon(_))
        ));
    }

    #[test]
    fn resolve_checks_handles_exclude_and_conflict() {
        let exclude = strings(&["lsi", "keywords"]);
        let checks = resolve_checks(None, Some(&exclude)).unwrap().unwrap();
        assert_eq!(checks, vec!["precision", "alignment"]);
        assert!(resolve_checks(None, None).unwrap().is_none());
        assert!(matches!(
            resolve_checks(None, Some(&strings(&["bogus"]))),
            Err(AnalysisError::UnknownCheck { .. })
        ));
        assert!(matches!(
            resolve_checks(Some(&exclude), Some(&exclude)),
            Err(AnalysisError::ConflictingConfig(_))
        ));
    }
}
