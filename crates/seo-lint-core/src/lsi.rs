//! Semantic (LSI) term mining and integration.
//!
//! [`LsiIntegrator::analyze_competitor_patterns`] mines frequent terms and
//! their neighbouring words from competitor documents.
//! [`LsiIntegrator::integrate_semantic_terms`] weaves missing related terms
//! into content, placing each one in the sentence whose closing words best
//! match the term's competitor context.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::ops::Range;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::lexicon::STOPWORDS;
use crate::{markdown, text};

/// Connective clauses used for insertions, rotated in order.
const CONNECTIVES: &[&str] = &["including", "particularly", "along with"];

/// Context words kept per mined term.
const MAX_CONTEXT_WORDS: usize = 10;

/// Naturalness credited to an insertion backed by context words.
const SUPPORTED_NATURALNESS: f64 = 100.0;
/// Naturalness credited to a fallback insertion.
const FALLBACK_NATURALNESS: f64 = 50.0;
/// Naturalness deducted per insertion beyond one per sentence.
const CROWDING_PENALTY: f64 = 10.0;

/// A related term supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LsiKeyword {
    /// The term to integrate.
    pub term: String,
    /// Topical relevance (0–1).
    pub relevance: f64,
    /// Semantic closeness to the main topic (0–1).
    pub semantic_score: f64,
    /// How strongly the term is tied to its context (0–1).
    pub context_strength: f64,
}

/// Where a term occurs in the competitor corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TermPosition {
    /// Zero-based index of the competitor document.
    pub document: usize,
    /// Zero-based word offset within that document.
    pub offset: usize,
}

/// Usage pattern of one term across competitor documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LsiPattern {
    /// The term, lowercased.
    pub term: String,
    /// Total occurrences across all documents.
    pub frequency: usize,
    /// Every occurrence.
    pub positions: Vec<TermPosition>,
    /// Most frequent neighbouring words, most frequent first.
    pub context_words: Vec<String>,
    /// Weight in (0, 1]; the strongest term has weight 1.
    pub semantic_weight: f64,
}

/// Result of mining competitor documents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CompetitorLsiAnalysis {
    /// Number of documents analyzed.
    pub documents: usize,
    /// Kept terms, strongest first.
    pub terms: Vec<String>,
    /// Pattern per kept term, in the same order as `terms`.
    pub patterns: Vec<LsiPattern>,
    /// Kept-term occurrences per 100 corpus words.
    pub semantic_density: f64,
    /// Term → context words.
    pub context_mapping: BTreeMap<String, Vec<String>>,
}

/// Result of integrating related terms into content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SemanticIntegration {
    /// Content with the inserted terms.
    pub optimized_content: String,
    /// Number of terms inserted.
    pub integrated_terms: usize,
    /// The inserted terms, in insertion order.
    pub integrated: Vec<String>,
    /// Eligible terms present after integration (0–100).
    pub semantic_coverage: f64,
    /// How naturally the insertions sit in the text (0–100).
    pub naturalness_score: f64,
    /// Share of the result that is original wording (0–100).
    pub context_preservation: f64,
}

/// Thresholds for term mining and integration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LsiPolicy {
    /// Keywords scoring below this are not integrated.
    pub min_semantic_score: f64,
    /// Words considered on each side of a term (mining) and at the end of a
    /// sentence (placement).
    pub context_window: usize,
    /// Maximum number of terms inserted per call.
    pub max_insertions: usize,
    /// Minimum corpus frequency for a mined term.
    pub min_term_frequency: usize,
    /// Maximum number of mined terms kept.
    pub max_terms: usize,
}

impl Default for LsiPolicy {
    fn default() -> Self {
        Self {
            min_semantic_score: 0.3,
            context_window: 5,
            max_insertions: 10,
            min_term_frequency: 2,
            max_terms: 50,
        }
    }
}

/// Semantic term miner and integrator.
#[derive(Debug, Clone, Default)]
pub struct LsiIntegrator {
    policy: LsiPolicy,
}

struct Insertion {
    sentence: usize,
    term: String,
    supported: bool,
}

impl LsiIntegrator {
    /// Create an integrator with the given policy.
    pub const fn new(policy: LsiPolicy) -> Self {
        Self { policy }
    }

    /// The active policy.
    pub const fn policy(&self) -> &LsiPolicy {
        &self.policy
    }

    /// Insert eligible keywords that the content does not already mention.
    ///
    /// Empty content is returned unchanged with zero coverage. Without
    /// eligible keywords nothing is inserted.
    #[tracing::instrument(skip_all, fields(content_len = content.len(), keywords = lsi_keywords.len()))]
    pub fn integrate_semantic_terms(
        &self,
        content: &str,
        lsi_keywords: &[LsiKeyword],
        competitor_patterns: &[LsiPattern],
    ) -> SemanticIntegration {
        let unchanged = |coverage: f64| SemanticIntegration {
            optimized_content: content.to_string(),
            integrated_terms: 0,
            integrated: Vec::new(),
            semantic_coverage: coverage,
            naturalness_score: 100.0,
            context_preservation: 100.0,
        };

        if content.trim().is_empty() {
            return unchanged(0.0);
        }

        let eligible = self.eligible_keywords(lsi_keywords);
        if eligible.is_empty() {
            tracing::debug!("no eligible semantic keywords");
            return unchanged(0.0);
        }

        let context: HashMap<String, HashSet<String>> = competitor_patterns
            .iter()
            .map(|p| {
                (
                    p.term.trim().to_lowercase(),
                    p.context_words.iter().map(|w| w.to_lowercase()).collect(),
                )
            })
            .collect();

        let spans = text::sentence_spans(content);
        let prose = markdown::prose_ranges(content);
        let sentence_tails: Vec<Vec<String>> = spans
            .iter()
            .map(|span| {
                let words = text::extract_words(&content[span.clone()]);
                let skip = words.len().saturating_sub(self.policy.context_window);
                words[skip..].to_vec()
            })
            .collect();

        let mut covered = 0usize;
        let mut insertions: Vec<Insertion> = Vec::new();
        for keyword in &eligible {
            let term = keyword.term.trim();
            let present = text::word_matcher(term).map_or_else(
                |e| {
                    tracing::warn!(term, error = %e, "cannot match term, skipping");
                    None
                },
                |re| Some(re.is_match(content)),
            );
            match present {
                Some(true) => covered += 1,
                Some(false) if insertions.len() < self.policy.max_insertions => {
                    let words = context
                        .get(&term.to_lowercase())
                        .cloned()
                        .unwrap_or_default();
                    let Some((sentence, supported)) =
                        choose_sentence(content, &spans, &prose, &sentence_tails, &words)
                    else {
                        tracing::debug!(term, "no prose sentence to extend");
                        continue;
                    };
                    insertions.push(Insertion {
                        sentence,
                        term: term.to_string(),
                        supported,
                    });
                    covered += 1;
                }
                _ => {}
            }
        }

        let optimized_content = apply_insertions(content, &spans, &insertions);
        let original_words = text::word_count(content);
        let optimized_words = text::word_count(&optimized_content);

        let naturalness_score = if insertions.is_empty() {
            100.0
        } else {
            let base = insertions
                .iter()
                .map(|i| {
                    if i.supported {
                        SUPPORTED_NATURALNESS
                    } else {
                        FALLBACK_NATURALNESS
                    }
                })
                .sum::<f64>()
                / insertions.len() as f64;
            let crowding = insertions.len().saturating_sub(spans.len()) as f64;
            (CROWDING_PENALTY.mul_add(-crowding, base)).clamp(0.0, 100.0)
        };
        let context_preservation = if optimized_words == 0 {
            100.0
        } else {
            original_words as f64 / optimized_words as f64 * 100.0
        };

        tracing::debug!(
            eligible = eligible.len(),
            covered,
            inserted = insertions.len(),
            "semantic terms integrated"
        );

        SemanticIntegration {
            optimized_content,
            integrated_terms: insertions.len(),
            integrated: insertions.into_iter().map(|i| i.term).collect(),
            semantic_coverage: text::round1(covered as f64 / eligible.len() as f64 * 100.0),
            naturalness_score: text::round1(naturalness_score),
            context_preservation: text::round1(context_preservation),
        }
    }

    /// Mine term frequencies, positions, and context words from competitor
    /// documents.
    #[tracing::instrument(skip_all, fields(documents = competitor_contents.len()))]
    pub fn analyze_competitor_patterns(
        &self,
        competitor_contents: &[String],
    ) -> CompetitorLsiAnalysis {
        #[derive(Default)]
        struct Acc {
            positions: Vec<TermPosition>,
            documents: HashSet<usize>,
            context: HashMap<String, usize>,
        }

        let window = self.policy.context_window;
        let mut acc: HashMap<String, Acc> = HashMap::new();
        let mut corpus_words = 0usize;

        for (doc_idx, doc) in competitor_contents.iter().enumerate() {
            let words = text::extract_words(doc);
            corpus_words += words.len();
            for (offset, word) in words.iter().enumerate() {
                if !is_content_word(word) {
                    continue;
                }
                let entry = acc.entry(word.clone()).or_default();
                entry.positions.push(TermPosition {
                    document: doc_idx,
                    offset,
                });
                entry.documents.insert(doc_idx);
                let lo = offset.saturating_sub(window);
                let hi = (offset + window + 1).min(words.len());
                for neighbour in &words[lo..hi] {
                    if neighbour != word && is_content_word(neighbour) {
                        *entry.context.entry(neighbour.clone()).or_default() += 1;
                    }
                }
            }
        }

        let doc_count = competitor_contents.len().max(1) as f64;
        let mut patterns: Vec<LsiPattern> = acc
            .into_iter()
            .filter(|(_, a)| a.positions.len() >= self.policy.min_term_frequency)
            .map(|(term, a)| {
                let frequency = a.positions.len();
                let mut context: Vec<(String, usize)> = a.context.into_iter().collect();
                context.sort_by(|x, y| y.1.cmp(&x.1).then_with(|| x.0.cmp(&y.0)));
                LsiPattern {
                    term,
                    frequency,
                    positions: a.positions,
                    context_words: context
                        .into_iter()
                        .take(MAX_CONTEXT_WORDS)
                        .map(|(w, _)| w)
                        .collect(),
                    semantic_weight: a.documents.len() as f64 / doc_count
                        * (frequency as f64).ln_1p(),
                }
            })
            .collect();

        let max_weight = patterns
            .iter()
            .map(|p| p.semantic_weight)
            .fold(0.0_f64, f64::max);
        for p in &mut patterns {
            p.semantic_weight = if max_weight > 0.0 {
                text::round2(p.semantic_weight / max_weight)
            } else {
                0.0
            };
        }
        patterns.sort_by(|a, b| {
            b.semantic_weight
                .total_cmp(&a.semantic_weight)
                .then_with(|| b.frequency.cmp(&a.frequency))
                .then_with(|| a.term.cmp(&b.term))
        });
        patterns.truncate(self.policy.max_terms);

        let kept_occurrences: usize = patterns.iter().map(|p| p.frequency).sum();
        let semantic_density = if corpus_words == 0 {
            0.0
        } else {
            text::round2(kept_occurrences as f64 / corpus_words as f64 * 100.0)
        };

        tracing::debug!(terms = patterns.len(), corpus_words, "competitor patterns mined");

        CompetitorLsiAnalysis {
            documents: competitor_contents.len(),
            terms: patterns.iter().map(|p| p.term.clone()).collect(),
            context_mapping: patterns
                .iter()
                .map(|p| (p.term.clone(), p.context_words.clone()))
                .collect(),
            patterns,
            semantic_density,
        }
    }

    /// Derive integration candidates from mined competitor patterns.
    ///
    /// Relevance is the pattern weight, semantic score the share of
    /// documents using the term, and context strength the fullness of its
    /// context-word list.
    pub fn suggest_keywords(&self, analysis: &CompetitorLsiAnalysis) -> Vec<LsiKeyword> {
        let docs = analysis.documents.max(1) as f64;
        analysis
            .patterns
            .iter()
            .map(|p| {
                let documents: HashSet<usize> = p.positions.iter().map(|pos| pos.document).collect();
                LsiKeyword {
                    term: p.term.clone(),
                    relevance: p.semantic_weight,
                    semantic_score: text::round2(documents.len() as f64 / docs),
                    context_strength: text::round2(
                        p.context_words.len() as f64 / MAX_CONTEXT_WORDS as f64,
                    ),
                }
            })
            .collect()
    }

    /// Keywords above the score threshold, deduplicated, strongest first.
    fn eligible_keywords<'a>(&self, keywords: &'a [LsiKeyword]) -> Vec<&'a LsiKeyword> {
        let mut seen = HashSet::new();
        let mut eligible: Vec<&LsiKeyword> = keywords
            .iter()
            .filter(|k| k.semantic_score >= self.policy.min_semantic_score)
            .filter(|k| {
                let term = k.term.trim().to_lowercase();
                !term.is_empty() && seen.insert(term)
            })
            .collect();
        eligible.sort_by(|a, b| {
            (b.relevance * b.semantic_score).total_cmp(&(a.relevance * a.semantic_score))
        });
        eligible
    }
}

fn is_content_word(word: &str) -> bool {
    word.chars().count() >= 3
        && word.chars().any(char::is_alphabetic)
        && !STOPWORDS.contains(word)
}

/// Pick the sentence whose closing words share the most context words.
///
/// Only sentences whose insertion point sits in prose text qualify, so
/// frontmatter and code never receive a clause. Headings are skipped unless
/// nothing else exists. Returns the sentence index and whether any context
/// word supported the choice.
fn choose_sentence(
    content: &str,
    spans: &[Range<usize>],
    prose: &[Range<usize>],
    tails: &[Vec<String>],
    context_words: &HashSet<String>,
) -> Option<(usize, bool)> {
    let in_prose = |idx: usize| {
        let at = insertion_point(content, &spans[idx]);
        prose.iter().any(|r| r.start <= at && at <= r.end)
    };
    let is_heading = |idx: usize| content[spans[idx].clone()].starts_with('#');
    let eligible: Vec<usize> = (0..spans.len()).filter(|&i| in_prose(i)).collect();
    let body: Vec<usize> = eligible.iter().copied().filter(|&i| !is_heading(i)).collect();
    let candidates = if body.is_empty() { eligible } else { body };

    let mut best = (*candidates.first()?, 0usize);
    for &idx in &candidates {
        let hits = tails[idx]
            .iter()
            .filter(|w| context_words.contains(*w))
            .count();
        if hits > best.1 {
            best = (idx, hits);
        }
    }
    Some((best.0, best.1 > 0))
}

/// Byte offset just before a sentence's closing punctuation.
fn insertion_point(content: &str, span: &Range<usize>) -> usize {
    let body = content[span.clone()].trim_end_matches(|c: char| {
        matches!(c, '.' | '!' | '?' | '"' | '\'' | ')' | ']' | '\u{201d}' | '\u{2019}')
    });
    span.start + body.len()
}

/// Splice connective clauses into their sentences, last sentence first so
/// earlier byte offsets stay valid.
fn apply_insertions(content: &str, spans: &[Range<usize>], insertions: &[Insertion]) -> String {
    if insertions.is_empty() || spans.is_empty() {
        return content.to_string();
    }

    let mut per_sentence: BTreeMap<usize, String> = BTreeMap::new();
    for (idx, insertion) in insertions.iter().enumerate() {
        let connective = CONNECTIVES[idx % CONNECTIVES.len()];
        per_sentence
            .entry(insertion.sentence)
            .or_default()
            .push_str(&format!(", {connective} {}", insertion.term));
    }

    let mut out = content.to_string();
    for (sentence, clause) in per_sentence.iter().rev() {
        out.insert_str(insertion_point(content, &spans[*sentence]), clause);
    }
    out
}
