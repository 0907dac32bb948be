//! Language precision engine.
//!
//! Finds vague words, wordy phrases, and hedges; rewrites the replaceable ones
//! and scores how precise the wording is.
//!
//! All lookup tables live in a [`PrecisionLexicon`] handed to
//! [`PrecisionEngine::new`]. Terms are compiled into a single alternation,
//! longest first, so overlapping entries ("very good" vs "good") resolve to
//! the longer phrase and no span is counted twice.

use std::collections::{HashMap, HashSet};
use std::ops::Range;

use regex::{Captures, Regex};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, AnalysisResult};
use crate::lexicon::{UNCLEAR_PHRASES, VAGUE_REPLACEMENTS, VAGUE_WORDS};
use crate::{markdown, text};

/// Score points deducted per percent of vague wording.
pub const DEFAULT_PENALTY_WEIGHT: f64 = 4.0;

/// A vague term with its preferred replacements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LexiconEntry {
    /// The vague word or phrase.
    pub term: String,
    /// Replacement candidates, preferred first.
    pub replacements: Vec<String>,
    /// Explanation recorded on each substitution.
    #[serde(default = "default_reason")]
    pub reason: String,
}

fn default_reason() -> String {
    crate::lexicon::REASON_GENERIC.to_string()
}

/// The word tables a [`PrecisionEngine`] works from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PrecisionLexicon {
    /// Terms that are rewritten by [`PrecisionEngine::enhance_precision`].
    pub replacements: Vec<LexiconEntry>,
    /// Weak words that are flagged but not rewritten.
    pub vague_words: Vec<String>,
    /// Hedging phrases that are flagged but not rewritten.
    pub unclear_phrases: Vec<String>,
}

impl Default for PrecisionLexicon {
    fn default() -> Self {
        Self {
            replacements: VAGUE_REPLACEMENTS
                .iter()
                .map(|(term, candidates, reason)| LexiconEntry {
                    term: (*term).to_string(),
                    replacements: candidates.iter().map(|c| (*c).to_string()).collect(),
                    reason: (*reason).to_string(),
                })
                .collect(),
            vague_words: VAGUE_WORDS.iter().map(|w| (*w).to_string()).collect(),
            unclear_phrases: UNCLEAR_PHRASES.iter().map(|w| (*w).to_string()).collect(),
        }
    }
}

impl PrecisionLexicon {
    /// Add entries on top of this lexicon.
    ///
    /// A replacement entry whose term already exists overrides the existing
    /// entry.
    #[must_use]
    pub fn extended(
        mut self,
        replacements: &[LexiconEntry],
        vague_words: &[String],
        unclear_phrases: &[String],
    ) -> Self {
        for entry in replacements {
            let key = entry.term.trim().to_lowercase();
            self.replacements
                .retain(|existing| existing.term.trim().to_lowercase() != key);
            self.replacements.push(entry.clone());
        }
        self.vague_words.extend(vague_words.iter().cloned());
        self.unclear_phrases.extend(unclear_phrases.iter().cloned());
        self
    }
}

/// Kind of content change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    /// Word-choice substitution.
    Precision,
}

/// A single substitution made to the content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ContentChange {
    /// What kind of change this is.
    #[serde(rename = "type")]
    pub change_type: ChangeType,
    /// The text as it appeared in the content.
    pub original: String,
    /// The text that replaced it.
    pub optimized: String,
    /// Why the change was made.
    pub reason: String,
}

/// Rewritten content plus the substitutions that produced it.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PrecisionEnhancement {
    /// The rewritten content.
    pub content: String,
    /// Substitutions in document order.
    pub changes: Vec<ContentChange>,
}

/// Word-choice findings, without modifying the content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct WordChoiceReport {
    /// Distinct vague words and phrases, in order of first appearance.
    pub vague_words: Vec<String>,
    /// Distinct hedging phrases, in order of first appearance.
    pub unclear_phrases: Vec<String>,
    /// One suggestion per distinct finding.
    pub suggestions: Vec<String>,
}

/// Precision score together with the findings behind it.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PrecisionReport {
    /// Precision score (0–100, higher is more precise).
    pub score: f64,
    /// Number of vague or unclear instances found.
    pub vague_instances: usize,
    /// Total words in the content.
    pub total_words: usize,
    /// Word-choice findings.
    pub word_choice: WordChoiceReport,
}

#[derive(Debug, Clone)]
enum TermKind {
    Replaceable { replacement: String, reason: String },
    Vague,
    Unclear,
}

/// Compiled precision analyzer.
#[derive(Debug, Clone)]
pub struct PrecisionEngine {
    /// Alternation over replaceable terms only.
    replace_re: Option<Regex>,
    /// Alternation over every known term.
    all_re: Option<Regex>,
    kinds: HashMap<String, TermKind>,
    penalty_weight: f64,
}

impl Default for PrecisionEngine {
    fn default() -> Self {
        Self::new(&PrecisionLexicon::default(), DEFAULT_PENALTY_WEIGHT)
            .expect("built-in lexicon compiles")
    }
}

impl PrecisionEngine {
    /// Compile a lexicon.
    ///
    /// Fails on blank terms, entries without replacements, or a negative or
    /// non-finite penalty weight.
    pub fn new(lexicon: &PrecisionLexicon, penalty_weight: f64) -> AnalysisResult<Self> {
        if !penalty_weight.is_finite() || penalty_weight < 0.0 {
            return Err(AnalysisError::InvalidLexicon(format!(
                "penalty weight must be a non-negative number, got {penalty_weight}"
            )));
        }

        let mut kinds: HashMap<String, TermKind> = HashMap::new();
        for entry in &lexicon.replacements {
            let key = normalize_term(&entry.term)?;
            let replacement = entry
                .replacements
                .iter()
                .map(|r| r.trim())
                .find(|r| !r.is_empty())
                .ok_or_else(|| {
                    AnalysisError::InvalidLexicon(format!("\"{key}\" has no replacement"))
                })?;
            kinds.entry(key).or_insert_with(|| TermKind::Replaceable {
                replacement: replacement.to_string(),
                reason: entry.reason.clone(),
            });
        }
        for phrase in &lexicon.unclear_phrases {
            kinds.entry(normalize_term(phrase)?).or_insert(TermKind::Unclear);
        }
        for word in &lexicon.vague_words {
            kinds.entry(normalize_term(word)?).or_insert(TermKind::Vague);
        }

        let replaceable: Vec<&str> = kinds
            .iter()
            .filter(|(_, kind)| matches!(kind, TermKind::Replaceable { .. }))
            .map(|(term, _)| term.as_str())
            .collect();
        let all: Vec<&str> = kinds.keys().map(String::as_str).collect();

        let engine = Self {
            replace_re: compile_alternation(&replaceable)?,
            all_re: compile_alternation(&all)?,
            kinds,
            penalty_weight,
        };
        tracing::debug!(terms = engine.kinds.len(), "precision engine compiled");
        Ok(engine)
    }

    /// Rewrite replaceable vague terms, recording every substitution.
    ///
    /// The first replacement candidate is used; an initial capital (or an
    /// all-caps match) carries over to the replacement.
    #[tracing::instrument(skip_all, fields(content_len = content.len()))]
    pub fn enhance_precision(&self, content: &str) -> PrecisionEnhancement {
        self.rewrite_ranges(content, &[0..content.len()])
    }

    /// Like [`enhance_precision`](Self::enhance_precision), but only prose
    /// text of a markdown document is rewritten.
    ///
    /// Link targets, code, HTML, and frontmatter come through byte for byte.
    #[tracing::instrument(skip_all, fields(content_len = content.len()))]
    pub fn enhance_markdown(&self, content: &str) -> PrecisionEnhancement {
        self.rewrite_ranges(content, &markdown::prose_ranges(content))
    }

    /// Apply substitutions inside the given sorted, non-overlapping ranges.
    fn rewrite_ranges(&self, content: &str, ranges: &[Range<usize>]) -> PrecisionEnhancement {
        let Some(ref re) = self.replace_re else {
            return PrecisionEnhancement {
                content: content.to_string(),
                changes: Vec::new(),
            };
        };

        let mut changes = Vec::new();
        let mut rewritten = String::with_capacity(content.len());
        let mut cursor = 0;
        for range in ranges {
            rewritten.push_str(&content[cursor..range.start]);
            let part = re.replace_all(&content[range.clone()], |caps: &Captures<'_>| {
                self.substitute(&caps[0], &mut changes)
            });
            rewritten.push_str(&part);
            cursor = range.end;
        }
        rewritten.push_str(&content[cursor..]);

        tracing::debug!(changes = changes.len(), "precision enhancement applied");
        PrecisionEnhancement {
            content: rewritten,
            changes,
        }
    }

    fn substitute(&self, original: &str, changes: &mut Vec<ContentChange>) -> String {
        match self.kinds.get(&original.to_lowercase()) {
            Some(TermKind::Replaceable {
                replacement,
                reason,
            }) => {
                let optimized = match_case(original, replacement);
                changes.push(ContentChange {
                    change_type: ChangeType::Precision,
                    original: original.to_string(),
                    optimized: optimized.clone(),
                    reason: reason.clone(),
                });
                optimized
            }
            _ => original.to_string(),
        }
    }

    /// Score word precision from 0 to 100.
    ///
    /// `100 − penalty_weight × (words inside vague matches / total words × 100)`,
    /// clamped. Empty content scores 100. Adding vague instances never raises
    /// the score.
    #[tracing::instrument(skip_all, fields(content_len = content.len()))]
    pub fn calculate_precision_score(&self, content: &str) -> f64 {
        let total = text::word_count(content);
        if total == 0 {
            return 100.0;
        }
        let vague_words: usize = self
            .all_re
            .as_ref()
            .map(|re| re.find_iter(content).map(|m| text::word_count(m.as_str())).sum())
            .unwrap_or(0);
        let density = vague_words as f64 / total as f64 * 100.0;
        text::round1(self.penalty_weight.mul_add(-density, 100.0).clamp(0.0, 100.0))
    }

    /// List vague words, hedges, and suggestions without touching the content.
    #[tracing::instrument(skip_all, fields(content_len = content.len()))]
    pub fn analyze_word_choice(&self, content: &str) -> WordChoiceReport {
        self.scan(content).1
    }

    /// Score and word-choice findings in one pass.
    pub fn analyze(&self, content: &str) -> PrecisionReport {
        let (instances, word_choice) = self.scan(content);
        PrecisionReport {
            score: self.calculate_precision_score(content),
            vague_instances: instances,
            total_words: text::word_count(content),
            word_choice,
        }
    }

    fn scan(&self, content: &str) -> (usize, WordChoiceReport) {
        let mut report = WordChoiceReport::default();
        let Some(ref re) = self.all_re else {
            return (0, report);
        };

        let mut seen = HashSet::new();
        let mut instances = 0;
        for m in re.find_iter(content) {
            instances += 1;
            let term = m.as_str().to_lowercase();
            if !seen.insert(term.clone()) {
                continue;
            }
            match self.kinds.get(&term) {
                Some(TermKind::Replaceable { replacement, .. }) => {
                    report
                        .suggestions
                        .push(format!("Replace \"{term}\" with \"{replacement}\""));
                    report.vague_words.push(term);
                }
                Some(TermKind::Vague) => {
                    report
                        .suggestions
                        .push(format!("Remove or quantify \"{term}\""));
                    report.vague_words.push(term);
                }
                Some(TermKind::Unclear) => {
                    report
                        .suggestions
                        .push(format!("State the claim directly instead of \"{term}\""));
                    report.unclear_phrases.push(term);
                }
                None => {}
            }
        }
        (instances, report)
    }
}

fn normalize_term(term: &str) -> AnalysisResult<String> {
    let key = term.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
    if key.is_empty() {
        return Err(AnalysisError::InvalidLexicon("blank term".to_string()));
    }
    Ok(key)
}

fn compile_alternation(terms: &[&str]) -> AnalysisResult<Option<Regex>> {
    text::alternation_matcher(terms).map_err(|e| AnalysisError::InvalidLexicon(e.to_string()))
}

fn match_case(original: &str, replacement: &str) -> String {
    let letters: Vec<char> = original.chars().filter(|c| c.is_alphabetic()).collect();
    if letters.len() > 1 && letters.iter().all(|c| c.is_uppercase()) {
        return replacement.to_uppercase();
    }
    if original.chars().next().is_some_and(char::is_uppercase) {
        let mut chars = replacement.chars();
        return chars
            .next()
            .map(|first| first.to_uppercase().chain(chars).collect())
            .unwrap_or_default();
    }
    replacement.to_string()
}
