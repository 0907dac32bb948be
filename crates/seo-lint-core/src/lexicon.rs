//! Built-in word tables for content analysis.
//!
//! These are immutable defaults. Analyzers copy them into their own lexicon
//! at construction time, where configuration can extend them.

use std::collections::HashSet;
use std::sync::LazyLock;

/// Why a replacement is suggested.
pub const REASON_INTENSIFIER: &str = "Replace a vague intensifier with a precise word";
/// Why a wordy phrase is shortened.
pub const REASON_WORDY: &str = "Shorten a wordy phrase";
/// Why a quantity is made explicit.
pub const REASON_QUANTITY: &str = "Use a more specific quantity";
/// Why a generic noun or adjective is replaced.
pub const REASON_GENERIC: &str = "Replace a generic word with a specific one";

/// Vague term → replacement candidates (first is preferred) and reason.
///
/// No replacement is itself a key, so applying the table twice is stable.
pub const VAGUE_REPLACEMENTS: &[(&str, &[&str], &str)] = &[
    ("very good", &["excellent", "outstanding"], REASON_INTENSIFIER),
    ("very bad", &["poor", "substandard"], REASON_INTENSIFIER),
    ("very big", &["substantial", "massive"], REASON_INTENSIFIER),
    ("very large", &["substantial", "extensive"], REASON_INTENSIFIER),
    ("very small", &["minimal", "tiny"], REASON_INTENSIFIER),
    ("very important", &["critical", "essential"], REASON_INTENSIFIER),
    ("very fast", &["rapid", "swift"], REASON_INTENSIFIER),
    ("very quick", &["rapid", "swift"], REASON_INTENSIFIER),
    ("very easy", &["effortless", "straightforward"], REASON_INTENSIFIER),
    ("very difficult", &["challenging", "demanding"], REASON_INTENSIFIER),
    ("very useful", &["invaluable", "practical"], REASON_INTENSIFIER),
    ("a lot of", &["numerous", "many"], REASON_QUANTITY),
    ("lots of", &["many", "numerous"], REASON_QUANTITY),
    ("a number of", &["several"], REASON_QUANTITY),
    ("a majority of", &["most"], REASON_QUANTITY),
    ("in order to", &["to"], REASON_WORDY),
    ("due to the fact that", &["because"], REASON_WORDY),
    ("at this point in time", &["now"], REASON_WORDY),
    ("has the ability to", &["can"], REASON_WORDY),
    ("in the event that", &["if"], REASON_WORDY),
    ("for the purpose of", &["for"], REASON_WORDY),
    ("stuff", &["materials", "items"], REASON_GENERIC),
    ("things", &["elements", "factors"], REASON_GENERIC),
    ("thing", &["element", "factor"], REASON_GENERIC),
    ("nice", &["pleasant", "appealing"], REASON_GENERIC),
    ("good", &["effective", "strong"], REASON_GENERIC),
    ("bad", &["poor", "weak"], REASON_GENERIC),
    ("big", &["significant", "major"], REASON_GENERIC),
];

/// Weak intensifiers and fillers with no single replacement.
pub const VAGUE_WORDS: &[&str] = &[
    "very",
    "really",
    "quite",
    "rather",
    "pretty",
    "fairly",
    "basically",
    "actually",
    "literally",
    "somewhat",
];

/// Hedging phrases that blur a claim.
pub const UNCLEAR_PHRASES: &[&str] = &[
    "sort of",
    "kind of",
    "more or less",
    "to some extent",
    "in some cases",
    "it seems",
    "it appears that",
    "as far as i know",
    "probably",
    "maybe",
    "perhaps",
];

/// Words that mark a sentence as offering a solution.
pub const SOLUTION_MARKERS: &[&str] = &[
    "solution",
    "solutions",
    "solve",
    "solves",
    "solved",
    "approach",
    "fix",
    "fixes",
    "resolve",
    "resolves",
    "remedy",
    "strategy",
    "method",
    "technique",
    "workaround",
    "answer",
    "recommend",
    "prevent",
];

/// Words that make a solution sentence actionable.
pub const ACTIONABLE_MARKERS: &[&str] = &[
    "step", "steps", "first", "then", "start", "use", "install", "configure", "set", "add",
    "run", "check", "how to", "by",
];

/// Function words ignored when mining competitor terms.
pub static STOPWORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
        "from", "up", "about", "into", "through", "during", "that", "this", "these", "those",
        "it", "its", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had",
        "do", "does", "did", "will", "would", "should", "could", "may", "might", "must", "can",
        "which", "who", "when", "where", "why", "how", "if", "than", "then", "as", "so", "not",
        "no", "you", "your", "we", "our", "they", "their", "he", "she", "his", "her", "them",
        "what", "all", "any", "more", "most", "also", "just", "only", "other", "some", "such",
        "there", "here", "out", "over", "very", "each", "one", "get", "can't", "don't", "it's",
    ]
    .into_iter()
    .collect()
});
