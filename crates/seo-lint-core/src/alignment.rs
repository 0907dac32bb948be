//! Problem–solution alignment.
//!
//! Checks that the reader problems a page targets are actually named in the
//! content, and that the content offers solution sentences for them.

use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, AnalysisResult};
use crate::lexicon::{ACTIONABLE_MARKERS, SOLUTION_MARKERS};
use crate::text;

/// Extra markers layered on top of the built-in tables.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct AlignmentConfig {
    /// Additional words that mark a sentence as offering a solution.
    pub solution_markers: Vec<String>,
    /// Additional words that make a solution sentence actionable.
    pub actionable_markers: Vec<String>,
}

/// Alignment between stated problems and offered solutions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AlignmentReport {
    /// Fraction of problems named in the content (0–1).
    pub problem_coverage: f64,
    /// Solution sentences relative to problems found, capped at 1.
    pub solution_completeness: f64,
    /// Harmonic mean of coverage and completeness (0–1).
    pub alignment_score: f64,
    /// Problems not found in the content, in input order.
    pub gap_analysis: Vec<String>,
    /// Completeness blended with how actionable the solutions are (0–1).
    pub solution_effectiveness: f64,
    /// Problems found in the content, in input order.
    pub problems_found: Vec<String>,
    /// Number of sentences carrying a solution marker.
    pub solution_sentences: usize,
}

/// Problem–solution alignment checker.
#[derive(Debug, Clone)]
pub struct ProblemSolutionAligner {
    solution: Option<Regex>,
    actionable: Option<Regex>,
}

impl Default for ProblemSolutionAligner {
    fn default() -> Self {
        Self::new(SOLUTION_MARKERS, ACTIONABLE_MARKERS).expect("built-in markers compile")
    }
}

impl ProblemSolutionAligner {
    /// Build an aligner from explicit marker lists.
    pub fn new<S: AsRef<str>>(
        solution_markers: &[S],
        actionable_markers: &[S],
    ) -> AnalysisResult<Self> {
        let compile = |terms: &[S]| {
            text::alternation_matcher(terms)
                .map_err(|e| AnalysisError::InvalidLexicon(e.to_string()))
        };
        Ok(Self {
            solution: compile(solution_markers)?,
            actionable: compile(actionable_markers)?,
        })
    }

    /// Build an aligner from the built-in markers plus configured extras.
    pub fn from_config(config: &AlignmentConfig) -> AnalysisResult<Self> {
        let solution: Vec<String> = SOLUTION_MARKERS
            .iter()
            .map(|m| (*m).to_string())
            .chain(config.solution_markers.iter().cloned())
            .collect();
        let actionable: Vec<String> = ACTIONABLE_MARKERS
            .iter()
            .map(|m| (*m).to_string())
            .chain(config.actionable_markers.iter().cloned())
            .collect();
        Self::new(&solution, &actionable)
    }

    /// Score how well the content addresses `user_problems`.
    ///
    /// Blank problems are ignored. With no problems, coverage is 1.0 and the
    /// gap list is empty; the alignment score is still 0 because no problem
    /// is present in the content.
    #[tracing::instrument(skip_all, fields(content_len = content.len(), problems = user_problems.len()))]
    pub fn validate_alignment(&self, content: &str, user_problems: &[String]) -> AlignmentReport {
        let haystack = content.to_lowercase();
        let problems: Vec<&str> = user_problems
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .collect();

        let (problems_found, gap_analysis): (Vec<&str>, Vec<&str>) = problems
            .iter()
            .copied()
            .partition(|p| haystack.contains(&p.to_lowercase()));

        let problem_coverage = if problems.is_empty() {
            1.0
        } else {
            problems_found.len() as f64 / problems.len() as f64
        };

        let sentences = text::split_sentences(content);
        let solution_sentences: Vec<&String> = sentences
            .iter()
            .filter(|s| self.solution.as_ref().is_some_and(|re| re.is_match(s)))
            .collect();
        let actionable = solution_sentences
            .iter()
            .filter(|s| self.actionable.as_ref().is_some_and(|re| re.is_match(s)))
            .count();

        let (solution_completeness, solution_effectiveness) = if solution_sentences.is_empty() {
            (0.0, 0.0)
        } else {
            let completeness =
                (solution_sentences.len() as f64 / problems_found.len().max(1) as f64).min(1.0);
            let actionable_ratio = actionable as f64 / solution_sentences.len() as f64;
            (completeness, 0.5 * completeness + 0.5 * actionable_ratio)
        };

        let alignment_score = if problems_found.is_empty() || solution_sentences.is_empty() {
            0.0
        } else {
            2.0 * problem_coverage * solution_completeness / (problem_coverage + solution_completeness)
        };

        tracing::debug!(
            found = problems_found.len(),
            gaps = gap_analysis.len(),
            solutions = solution_sentences.len(),
            "alignment validated"
        );

        AlignmentReport {
            problem_coverage: text::round2(problem_coverage),
            solution_completeness: text::round2(solution_completeness),
            alignment_score: text::round2(alignment_score),
            gap_analysis: gap_analysis.into_iter().map(str::to_string).collect(),
            solution_effectiveness: text::round2(solution_effectiveness),
            problems_found: problems_found.into_iter().map(str::to_string).collect(),
            solution_sentences: solution_sentences.len(),
        }
    }
}
