//! Text normalization and tokenization.
//!
//! Three pure functions make up the normalizer used by every later stage:
//!
//! - [`normalize_markup`]: strip `<tag>`-shaped substrings and collapse whitespace
//! - [`clean_text`]: markup normalization plus lowercasing and punctuation removal
//! - [`tokenize`]: split cleaned text, drop short tokens and stopwords
//!
//! The stopword list is a fixed constant wrapped in [`Stopwords`], built once
//! by the caller and passed in explicitly.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Fixed English stopword list.
pub const DEFAULT_STOPWORDS: &[&str] = &[
    "the", "and", "to", "a", "in", "of", "for", "is", "on", "that", "with", "as", "it", "are",
    "this", "be", "by", "an", "from", "or", "at", "but", "not", "your", "you", "we", "i", "our",
    "they", "was", "were", "has", "have", "had", "will", "would", "can", "could", "may",
    "might", "also", "these", "those", "which",
];

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());
// `\s` is Unicode-aware and covers NBSP, U+2007 and U+202F.
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static DISALLOWED_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s\-]").unwrap());

/// Immutable set of words ignored by [`tokenize`].
#[derive(Debug, Clone)]
pub struct Stopwords {
    words: HashSet<String>,
}

impl Stopwords {
    /// Build a stopword set from arbitrary words (stored lowercased).
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .map(|w| w.as_ref().to_lowercase())
                .collect(),
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for Stopwords {
    fn default() -> Self {
        Self::from_words(DEFAULT_STOPWORDS.iter().copied())
    }
}

/// Remove HTML-like tags and collapse whitespace runs to single spaces.
///
/// Tags are replaced with a space so that `a<br>b` stays two words.
/// Returns an empty string for empty input.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(normalize_markup("<p>Hello\u{a0}\n world</p>"), "Hello world");
/// ```
pub fn normalize_markup(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let without_tags = TAG_RE.replace_all(text, " ");
    WHITESPACE_RE
        .replace_all(&without_tags, " ")
        .trim()
        .to_string()
}

/// Normalize text for counting and vectorizing.
///
/// Applies [`normalize_markup`], lowercases, replaces every character that is
/// not a word character, whitespace or hyphen with a space, then collapses
/// whitespace again. Lowercasing happens before the character filter so the
/// result only ever contains characters the filter keeps, which makes the
/// function idempotent.
pub fn clean_text(text: &str) -> String {
    let markup_free = normalize_markup(text);
    if markup_free.is_empty() {
        return markup_free;
    }
    let lowered = markup_free.to_lowercase();
    let filtered = DISALLOWED_RE.replace_all(&lowered, " ");
    WHITESPACE_RE
        .replace_all(&filtered, " ")
        .trim()
        .to_string()
}

/// Split text into content tokens.
///
/// The input is passed through [`clean_text`] first, so raw or already
/// cleaned text both work. Tokens of one character or fewer and tokens in
/// `stopwords` are dropped.
pub fn tokenize(text: &str, stopwords: &Stopwords) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    clean_text(text)
        .split_whitespace()
        .filter(|t| t.chars().count() > 1 && !stopwords.contains(t))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_markup_strips_tags_and_whitespace() {
        assert_eq!(
            normalize_markup("  <p>Hello\u{a0}\u{a0}world</p>\n\n<b>again</b> "),
            "Hello world again"
        );
        assert_eq!(normalize_markup("a<br>b"), "a b");
        assert_eq!(normalize_markup(""), "");
        assert_eq!(normalize_markup("   \t\n "), "");
    }

    #[test]
    fn test_normalize_markup_keeps_case_and_punctuation() {
        assert_eq!(normalize_markup("Time, Blindness!"), "Time, Blindness!");
    }

    #[test]
    fn test_clean_text_basic() {
        assert_eq!(
            clean_text("Hello, World! It's <em>time</em>-management\u{202f}101."),
            "hello world it s time -management 101"
        );
        assert_eq!(clean_text("well-known self_care"), "well-known self_care");
        assert_eq!(clean_text(""), "");
        assert_eq!(clean_text("!!! ???"), "");
    }

    #[test]
    fn test_clean_text_is_idempotent() {
        let samples = [
            "",
            "Plain words",
            "<div class=\"x\">Nested <span>tags</span></div>",
            "Émigré CAFÉ naïve — “quotes” and ‘apostrophes’",
            "İstanbul ΣΊΣΥΦΟΣ straße",
            "tabs\tand\nnewlines\u{a0}and\u{2007}figure spaces",
            "a < b > c",
            "--- hyphen-only --- _under_score_",
            "emoji 😀 and ellipsis…",
            "ADHD: 5 tips (for real) — #1?",
        ];
        for s in samples {
            let once = clean_text(s);
            assert_eq!(clean_text(&once), once, "not idempotent for {s:?}");
        }
    }

    #[test]
    fn test_tokenize_filters_short_and_stopwords() {
        let stop = Stopwords::default();
        let tokens = tokenize(
            "Hello world, this is a test article about time management for people with ADHD who struggle with planning.",
            &stop,
        );
        assert_eq!(
            tokens,
            vec![
                "hello",
                "world",
                "test",
                "article",
                "about",
                "time",
                "management",
                "people",
                "adhd",
                "who",
                "struggle",
                "planning"
            ]
        );
    }

    #[test]
    fn test_tokenize_never_yields_short_or_stopword_tokens() {
        let stop = Stopwords::default();
        let samples = [
            "I a x y z THE The tHe and AND",
            "A to-do list is a tool; you can use it.",
            "<p>We WILL plan</p> i.e. e g",
            "",
        ];
        for s in samples {
            for token in tokenize(s, &stop) {
                assert!(token.chars().count() > 1, "short token {token:?}");
                assert!(!stop.contains(&token), "stopword {token:?}");
            }
        }
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize("", &Stopwords::default()).is_empty());
    }

    #[test]
    fn test_stopwords_default_set() {
        let stop = Stopwords::default();
        assert_eq!(stop.len(), DEFAULT_STOPWORDS.len());
        assert!(stop.contains("which"));
        assert!(!stop.contains("adhd"));
    }

    #[test]
    fn test_custom_stopwords_lowercased() {
        let stop = Stopwords::from_words(["ADHD"]);
        assert_eq!(tokenize("ADHD brains", &stop), vec!["brains"]);
    }
}
