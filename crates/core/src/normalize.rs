//! Text normalization for slide content.
//!
//! Two flavours exist: [`clean_line`] tidies text that is shown on a slide,
//! while [`TextNormalizer`] produces comparison keys used by the corpus
//! cleaning passes.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Regex to collapse any whitespace run into one space.
static WHITESPACE_COLLAPSE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Regex for http(s) and bare www URLs.
static URL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)https?://\S+|www\.\S+").unwrap());

/// Sentence end: terminal punctuation followed by whitespace.
static SENTENCE_BREAK_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.!?]\s+").unwrap());

/// Curly quotes folded to their ASCII forms.
const QUOTE_FOLDS: &[(char, char)] = &[
    ('\u{2019}', '\''),
    ('\u{2018}', '\''),
    ('\u{201C}', '"'),
    ('\u{201D}', '"'),
];

/// Trim and collapse internal whitespace to single spaces.
pub fn clean_line(text: &str) -> String {
    WHITESPACE_COLLAPSE_REGEX
        .replace_all(text.trim(), " ")
        .into_owned()
}

/// Split text after `.`, `!` or `?` when followed by whitespace.
///
/// Pieces are cleaned and empty pieces dropped.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut start = 0;

    for m in SENTENCE_BREAK_REGEX.find_iter(text) {
        // The punctuation mark is a single byte and stays with its sentence.
        parts.push(&text[start..m.start() + 1]);
        start = m.end();
    }
    parts.push(&text[start..]);

    parts
        .into_iter()
        .filter(|p| !p.trim().is_empty())
        .map(clean_line)
        .collect()
}

/// Drop later case-insensitive repeats, keeping first occurrences in order.
pub fn dedup_case_insensitive(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.to_lowercase()))
        .collect()
}

/// Builds comparison keys for displayed slide text.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    /// Whether to remove URLs before comparing.
    strip_urls: bool,
    /// Whether to fold curly quotes to ASCII.
    fold_quotes: bool,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self {
            strip_urls: true,
            fold_quotes: true,
        }
    }
}

impl TextNormalizer {
    /// Create a normalizer with URL stripping and quote folding enabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether URLs are removed.
    pub fn with_strip_urls(mut self, strip: bool) -> Self {
        self.strip_urls = strip;
        self
    }

    /// Set whether curly quotes are folded.
    pub fn with_fold_quotes(mut self, fold: bool) -> Self {
        self.fold_quotes = fold;
        self
    }

    /// Normalize a line for comparison.
    ///
    /// - Lowercases
    /// - Folds curly quotes
    /// - Removes URLs
    /// - Collapses whitespace and trims
    pub fn normalize(&self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }

        let mut result = text.to_lowercase();

        if self.fold_quotes {
            result = result
                .chars()
                .map(|c| {
                    QUOTE_FOLDS
                        .iter()
                        .find(|(from, _)| *from == c)
                        .map(|(_, to)| *to)
                        .unwrap_or(c)
                })
                .collect();
        }

        if self.strip_urls {
            result = URL_REGEX.replace_all(&result, "").into_owned();
        }

        clean_line(&result)
    }

    /// Normalize every line, dropping the ones that end up empty.
    pub fn normalize_all<'a, I>(&self, lines: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a String>,
    {
        lines
            .into_iter()
            .map(|l| self.normalize(l))
            .filter(|l| !l.is_empty())
            .collect()
    }
}
