//! Text processing utilities.
//!
//! Provides sentence spans, word extraction, and word-boundary matchers
//! shared by the analyzers.

use std::ops::Range;

use regex::Regex;

/// Abbreviations whose trailing period does not end a sentence.
const ABBREVIATIONS: &[&str] = &[
    "e.g.", "i.e.", "etc.", "vs.", "mr.", "mrs.", "ms.", "dr.", "st.", "approx.", "inc.", "no.",
];

/// Byte ranges of the sentences in `text`.
///
/// A sentence ends at `.`, `!` or `?` followed by whitespace or the end of
/// input, at a blank line, or at the end of a markdown heading line. Closing
/// quotes and brackets after the terminator stay with the sentence. Ranges
/// exclude surrounding whitespace and are returned in document order.
pub fn sentence_spans(text: &str) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, ch)) = chars.next() {
        if is_sentence_terminator(ch) {
            let mut end = idx + ch.len_utf8();
            while let Some(&(next_idx, next)) = chars.peek() {
                if is_sentence_terminator(next) || is_closing(next) {
                    end = next_idx + next.len_utf8();
                    chars.next();
                } else {
                    break;
                }
            }
            let at_boundary = chars.peek().is_none_or(|&(_, next)| next.is_whitespace());
            if at_boundary && !ends_with_abbreviation(&text[start..end]) {
                push_trimmed(text, start..end, &mut spans);
                start = end;
            }
        } else if ch == '\n' {
            let rest = text[idx + 1..].trim_start_matches([' ', '\t', '\r']);
            let heading_line = text[start..idx].trim_start().starts_with('#');
            if rest.starts_with('\n') || heading_line {
                push_trimmed(text, start..idx, &mut spans);
                start = idx + 1;
            }
        }
    }

    push_trimmed(text, start..text.len(), &mut spans);
    spans
}

/// Split text into sentences.
#[tracing::instrument(skip_all, fields(text_len = text.len()))]
pub fn split_sentences(text: &str) -> Vec<String> {
    sentence_spans(text)
        .into_iter()
        .map(|span| text[span].to_string())
        .collect()
}

/// Extract words from text, splitting on whitespace and stripping punctuation.
///
/// Words are lowercased; inner apostrophes and hyphens are kept.
pub fn extract_words(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(trim_word)
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Count words the same way [`extract_words`] does, without allocating.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace()
        .filter(|w| !trim_word(w).is_empty())
        .count()
}

/// Build a case-insensitive regex matching `term` as a whole word or phrase.
///
/// Word boundaries are only asserted on sides where the term starts or ends
/// with a word character, so terms such as `c++` still match.
pub fn word_matcher(term: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("(?i){}", word_pattern(term)))
}

/// The unanchored, escaped pattern behind [`word_matcher`], for building
/// alternations.
pub fn word_pattern(term: &str) -> String {
    let term = term.trim();
    let lead = if term.starts_with(is_word_char) { r"\b" } else { "" };
    let tail = if term.ends_with(is_word_char) { r"\b" } else { "" };
    format!("{lead}{}{tail}", regex::escape(term))
}

/// Build one case-insensitive matcher for many terms, longest first so that
/// overlapping entries resolve to the longer phrase.
///
/// Returns `None` when `terms` is empty.
pub fn alternation_matcher<S: AsRef<str>>(terms: &[S]) -> Result<Option<Regex>, regex::Error> {
    let mut terms: Vec<&str> = terms
        .iter()
        .map(|t| t.as_ref().trim())
        .filter(|t| !t.is_empty())
        .collect();
    if terms.is_empty() {
        return Ok(None);
    }
    terms.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then(a.cmp(b)));
    terms.dedup();
    let alternation = terms
        .iter()
        .map(|t| word_pattern(t))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!("(?i)(?:{alternation})")).map(Some)
}

/// Round to one decimal place.
pub fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Round to two decimal places.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn trim_word(w: &str) -> &str {
    w.trim_matches(|c: char| !c.is_alphanumeric() && c != '\'' && c != '-')
        .trim_matches(|c: char| c == '\'' || c == '-')
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

const fn is_sentence_terminator(ch: char) -> bool {
    matches!(ch, '.' | '!' | '?')
}

const fn is_closing(ch: char) -> bool {
    matches!(ch, '"' | '\'' | ')' | ']' | '\u{201d}' | '\u{2019}')
}

fn ends_with_abbreviation(segment: &str) -> bool {
    segment
        .split_whitespace()
        .last()
        .map(str::to_lowercase)
        .is_some_and(|last| ABBREVIATIONS.contains(&last.as_str()))
}

fn push_trimmed(text: &str, range: Range<usize>, spans: &mut Vec<Range<usize>>) {
    let segment = &text[range.clone()];
    let trimmed = segment.trim();
    if trimmed.is_empty() {
        return;
    }
    let lead = segment.len() - segment.trim_start().len();
    let start = range.start + lead;
    spans.push(start..start + trimmed.len());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_sentences() {
        let sentences = split_sentences("This is a sentence. This is another sentence.");
        assert_eq!(sentences, vec!["This is a sentence.", "This is another sentence."]);
    }

    #[test]
    fn decimals_and_domains_not_split() {
        let sentences = split_sentences("Version 3.14 ships on example.com today. Enjoy.");
        assert_eq!(sentences.len(), 2);
        assert!(sentences[0].contains("3.14"));
        assert!(sentences[0].contains("example.com"));
    }

    #[test]
    fn abbreviations_not_split() {
        let sentences = split_sentences("Use tools, e.g. crawlers. They help.");
        assert_eq!(sentences.len(), 2);
        assert!(sentences[0].contains("e.g. crawlers"));
    }

    #[test]
    fn question_and_exclamation() {
        let sentences = split_sentences("Are you serious? I can't believe it! This is amazing.");
        assert_eq!(sentences.len(), 3);
        assert!(sentences[0].ends_with('?'));
    }

    #[test]
    fn closing_quote_stays_with_sentence() {
        let sentences = split_sentences("He said \"stop.\" Then left.");
        assert_eq!(sentences[0], "He said \"stop.\"");
    }

    #[test]
    fn blank_lines_and_headings_break_sentences() {
        let text = "# Guide to SEO\nSearch matters\n\nKeywords matter too.";
        let sentences = split_sentences(text);
        assert_eq!(
            sentences,
            vec!["# Guide to SEO", "Search matters", "Keywords matter too."]
        );
    }

    #[test]
    fn spans_index_original_text() {
        let text = "  First one.   Second one!  ";
        let spans = sentence_spans(text);
        assert_eq!(&text[spans[0].clone()], "First one.");
        assert_eq!(&text[spans[1].clone()], "Second one!");
    }

    #[test]
    fn empty_input() {
        assert!(split_sentences("").is_empty());
        assert!(split_sentences("   ").is_empty());
    }

    #[test]
    fn extract_words_basic() {
        let words = extract_words("Hello, world! This is a test -- really.");
        assert_eq!(
            words,
            vec!["hello", "world", "this", "is", "a", "test", "really"]
        );
        assert_eq!(word_count("Hello, world! This is a test -- really."), 7);
    }

    #[test]
    fn word_matcher_respects_boundaries() {
        let re = word_matcher("seo").unwrap();
        assert!(re.is_match("Good SEO matters"));
        assert!(!re.is_match("seoul is a city"));

        let plus = word_matcher("c++").unwrap();
        assert!(plus.is_match("written in C++ today"));
    }

    #[test]
    fn alternation_prefers_longest_term() {
        let re = alternation_matcher(&["good", "very good"]).unwrap().unwrap();
        let found: Vec<&str> = re.find_iter("Very good, good.").map(|m| m.as_str()).collect();
        assert_eq!(found, vec!["Very good", "good"]);
        assert!(alternation_matcher::<&str>(&[]).unwrap().is_none());
    }
}
