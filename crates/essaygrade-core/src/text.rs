//! Text normalization and segmentation.
//!
//! Every matcher in the engine works on *folded* text: lowercase, diacritics
//! removed, punctuation turned into spaces and whitespace collapsed. Folding
//! the essay and the vocabulary the same way is what makes matching
//! case- and accent-insensitive.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Paragraph boundary: a line break, optional blank space, another line break.
static PARAGRAPH_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").unwrap());

/// Fold text for matching.
///
/// `"Não obstante, é PRECISO!"` becomes `"nao obstante e preciso"`.
pub fn fold(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;

    for c in text.nfd().filter(|c| !is_combining_mark(*c)) {
        if c.is_alphanumeric() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.extend(c.to_lowercase());
        } else {
            pending_space = true;
        }
    }

    out
}

/// Split folded text into word tokens.
pub fn words(folded: &str) -> Vec<String> {
    folded.split_whitespace().map(str::to_string).collect()
}

/// Count words in raw (unfolded) text.
pub fn count_words(text: &str) -> usize {
    fold(text).split_whitespace().count()
}

/// Split raw text into trimmed, non-empty paragraphs.
pub fn split_paragraphs(text: &str) -> Vec<String> {
    let normalized = text.replace("\r\n", "\n");
    PARAGRAPH_BREAK
        .split(&normalized)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

/// Count sentences: non-empty segments between runs of `.`, `!` or `?`.
pub fn count_sentences(text: &str) -> usize {
    text.split(['.', '!', '?'])
        .filter(|s| s.chars().any(char::is_alphanumeric))
        .count()
}

/// A paragraph in both its original and folded forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    /// Trimmed original text.
    pub raw: String,
    /// Folded text used for matching.
    pub folded: String,
    /// Number of word tokens.
    pub word_count: usize,
}

impl Paragraph {
    fn new(raw: String) -> Self {
        let folded = fold(&raw);
        let word_count = folded.split_whitespace().count();
        Self {
            raw,
            folded,
            word_count,
        }
    }
}

/// A segmented essay ready for analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedDocument {
    /// The untouched input, kept for quote and number detection.
    pub raw: String,
    /// Folded full text.
    pub folded: String,
    /// Paragraphs in reading order. Never contains an empty paragraph.
    pub paragraphs: Vec<Paragraph>,
    /// Word tokens of the folded text.
    pub words: Vec<String>,
    /// Always equal to `words.len()`.
    pub word_count: usize,
    pub sentence_count: usize,
}

impl NormalizedDocument {
    /// Normalize and segment raw essay text. Never fails.
    pub fn new(raw: &str) -> Self {
        let folded = fold(raw);
        let words = words(&folded);
        let paragraphs = split_paragraphs(raw)
            .into_iter()
            .map(Paragraph::new)
            .filter(|p| p.word_count > 0)
            .collect();

        Self {
            raw: raw.to_string(),
            word_count: words.len(),
            sentence_count: count_sentences(raw),
            folded,
            paragraphs,
            words,
        }
    }

    pub fn paragraph_count(&self) -> usize {
        self.paragraphs.len()
    }

    /// The opening paragraph, if any.
    pub fn introduction(&self) -> Option<&Paragraph> {
        self.paragraphs.first()
    }

    /// Paragraphs between the first and the last.
    pub fn development(&self) -> &[Paragraph] {
        if self.paragraphs.len() < 3 {
            &[]
        } else {
            &self.paragraphs[1..self.paragraphs.len() - 1]
        }
    }

    /// The closing paragraph, if any. A single-paragraph text is its own
    /// conclusion.
    pub fn conclusion(&self) -> Option<&Paragraph> {
        self.paragraphs.last()
    }

    /// Average word count of the development paragraphs (0 when there are none).
    pub fn average_development_length(&self) -> f64 {
        let devs = self.development();
        if devs.is_empty() {
            return 0.0;
        }
        devs.iter().map(|p| p.word_count).sum::<usize>() as f64 / devs.len() as f64
    }

    /// Distinct words longer than four characters over total words.
    pub fn lexical_variety(&self) -> f64 {
        if self.words.is_empty() {
            return 0.0;
        }
        let distinct: std::collections::HashSet<&str> = self
            .words
            .iter()
            .filter(|w| w.chars().count() > 4)
            .map(String::as_str)
            .collect();
        distinct.len() as f64 / self.words.len() as f64
    }
}
