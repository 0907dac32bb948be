//! Keyword density and content-structure suggestions.
//!
//! Counts each target keyword as a case-insensitive substring of the content
//! and flags keywords that fall outside the density band, along with a few
//! structural issues (long sentences, missing headings, no questions, short
//! content).

use std::collections::HashSet;

use aho_corasick::AhoCorasick;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::markdown;
use crate::text;

/// Thresholds used by [`analyze_keyword_density`].
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct DensityPolicy {
    /// Density (percent) below which a keyword is under-used.
    pub min_density: f64,
    /// Density (percent) above which a keyword is over-used.
    pub max_density: f64,
    /// Sentences with more words than this are flagged.
    pub max_sentence_words: usize,
    /// Content with fewer words than this is flagged as too short.
    pub min_word_count: usize,
}

impl Default for DensityPolicy {
    fn default() -> Self {
        Self {
            min_density: 0.5,
            max_density: 2.0,
            max_sentence_words: 30,
            min_word_count: 300,
        }
    }
}

/// Kind of suggestion produced by the density analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKind {
    /// A keyword appears too rarely.
    LowDensity,
    /// A keyword appears too often.
    HighDensity,
    /// A sentence is longer than the policy allows.
    LongSentence,
    /// The content has no headings.
    MissingHeadings,
    /// The content asks no questions.
    NoQuestions,
    /// The content is shorter than the policy minimum.
    TooShort,
}

/// A single actionable suggestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Suggestion {
    /// What the suggestion is about.
    pub kind: SuggestionKind,
    /// Human-readable message.
    pub message: String,
    /// The keyword concerned, for density suggestions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    /// 1-based sentence number, for long-sentence suggestions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentence: Option<usize>,
}

/// Where a keyword's density falls relative to the policy band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum DensityStatus {
    /// Below `min_density`.
    Low,
    /// Within the band.
    Optimal,
    /// Above `max_density`.
    High,
}

/// Density measurement for one keyword.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct KeywordDensity {
    /// The keyword, lowercased.
    pub keyword: String,
    /// Case-insensitive substring occurrences (overlaps counted).
    pub occurrences: usize,
    /// Occurrences per 100 words.
    pub density: f64,
    /// Band classification.
    pub status: DensityStatus,
}

/// Keyword density report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct KeywordDensityReport {
    /// Total words in the content.
    pub total_words: usize,
    /// Per-keyword densities, in input order.
    pub keywords: Vec<KeywordDensity>,
    /// Suggestions; empty when the content looks good.
    pub suggestions: Vec<Suggestion>,
}

impl KeywordDensityReport {
    /// Whether there is nothing to suggest.
    pub fn looks_good(&self) -> bool {
        self.suggestions.is_empty()
    }
}

/// Analyze keyword density and content structure.
///
/// Whitespace-only content yields an empty report. Blank keywords are
/// ignored and case-insensitive duplicates are reported once.
#[tracing::instrument(skip_all, fields(content_len = content.len(), keywords = target_keywords.len()))]
pub fn analyze_keyword_density(
    content: &str,
    target_keywords: &[String],
    policy: &DensityPolicy,
) -> KeywordDensityReport {
    let total_words = text::word_count(content);
    if content.trim().is_empty() || total_words == 0 {
        return KeywordDensityReport {
            total_words: 0,
            keywords: Vec::new(),
            suggestions: Vec::new(),
        };
    }

    let mut seen = HashSet::new();
    let keywords: Vec<String> = target_keywords
        .iter()
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty() && seen.insert(k.clone()))
        .collect();

    let counts = count_occurrences(&content.to_lowercase(), &keywords);
    let mut suggestions = Vec::new();
    let mut densities = Vec::with_capacity(keywords.len());

    for (keyword, occurrences) in keywords.into_iter().zip(counts) {
        let density = occurrences as f64 / total_words as f64 * 100.0;
        let status = if density < policy.min_density {
            suggestions.push(Suggestion {
                kind: SuggestionKind::LowDensity,
                message: format!(
                    "\"{keyword}\" has low density ({:.2}%); aim for at least {}%",
                    density, policy.min_density
                ),
                keyword: Some(keyword.clone()),
                sentence: None,
            });
            DensityStatus::Low
        } else if density > policy.max_density {
            suggestions.push(Suggestion {
                kind: SuggestionKind::HighDensity,
                message: format!(
                    "\"{keyword}\" has high density ({:.2}%); keep it under {}% to avoid keyword stuffing",
                    density, policy.max_density
                ),
                keyword: Some(keyword.clone()),
                sentence: None,
            });
            DensityStatus::High
        } else {
            DensityStatus::Optimal
        };
        densities.push(KeywordDensity {
            keyword,
            occurrences,
            density: text::round2(density),
            status,
        });
    }

    let sentences = text::split_sentences(content);
    for (idx, sentence) in sentences.iter().enumerate() {
        let words = text::word_count(sentence);
        if words > policy.max_sentence_words {
            suggestions.push(Suggestion {
                kind: SuggestionKind::LongSentence,
                message: format!(
                    "Sentence {} has {words} words; split sentences longer than {}",
                    idx + 1,
                    policy.max_sentence_words
                ),
                keyword: None,
                sentence: Some(idx + 1),
            });
        }
    }

    if !markdown::has_headings(content) {
        suggestions.push(Suggestion {
            kind: SuggestionKind::MissingHeadings,
            message: "Add headings to structure the content".to_string(),
            keyword: None,
            sentence: None,
        });
    }

    if !sentences.iter().any(|s| is_question(s)) {
        suggestions.push(Suggestion {
            kind: SuggestionKind::NoQuestions,
            message: "Add questions to match how readers search".to_string(),
            keyword: None,
            sentence: None,
        });
    }

    if total_words < policy.min_word_count {
        suggestions.push(Suggestion {
            kind: SuggestionKind::TooShort,
            message: format!(
                "Content has {total_words} words; expand it to at least {}",
                policy.min_word_count
            ),
            keyword: None,
            sentence: None,
        });
    }

    tracing::debug!(
        total_words,
        suggestions = suggestions.len(),
        "keyword density analyzed"
    );

    KeywordDensityReport {
        total_words,
        keywords: densities,
        suggestions,
    }
}

/// Overlapping occurrence counts for each (lowercased) keyword.
fn count_occurrences(haystack: &str, keywords: &[String]) -> Vec<usize> {
    let mut counts = vec![0; keywords.len()];
    if keywords.is_empty() {
        return counts;
    }
    match AhoCorasick::new(keywords) {
        Ok(ac) => {
            for m in ac.find_overlapping_iter(haystack) {
                counts[m.pattern().as_usize()] += 1;
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "keyword automaton unavailable, counting directly");
            for (count, keyword) in counts.iter_mut().zip(keywords) {
                *count = (0..haystack.len())
                    .filter(|&i| haystack.is_char_boundary(i) && haystack[i..].starts_with(keyword.as_str()))
                    .count();
            }
        }
    }
    counts
}

fn is_question(sentence: &str) -> bool {
    sentence
        .trim_end_matches(['"', '\'', ')', ']', '\u{201d}', '\u{2019}'])
        .ends_with('?')
}
