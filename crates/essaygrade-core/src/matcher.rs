//! Lexical matching of vocabulary phrases against folded text.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::vocabulary::VocabularySet;

/// How a phrase must sit inside the text to count as present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// The phrase must start and end on word boundaries.
    #[default]
    WordBoundary,
    /// Plain containment; "lei" also matches inside "leitura".
    Substring,
}

impl std::fmt::Display for MatchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchMode::WordBoundary => write!(f, "word_boundary"),
            MatchMode::Substring => write!(f, "substring"),
        }
    }
}

impl std::str::FromStr for MatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "word_boundary" | "word" => Ok(MatchMode::WordBoundary),
            "substring" => Ok(MatchMode::Substring),
            other => Err(format!("unknown match mode: {other}")),
        }
    }
}

/// The phrases of one vocabulary set found in a text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Canonical spellings of the matched phrases.
    pub matched_terms: BTreeSet<String>,
    /// Always equal to `matched_terms.len()`.
    pub count: usize,
}

impl MatchResult {
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Up to `n` matched terms, for observations.
    pub fn sample(&self, n: usize) -> Vec<&str> {
        self.matched_terms.iter().take(n).map(String::as_str).collect()
    }
}

/// Folded text prepared for repeated lookups.
///
/// Folded text has single spaces between tokens and none at the ends, so
/// padding it with one space on each side turns a word-boundary search into
/// a plain `contains` on `" phrase "`.
#[derive(Debug, Clone)]
pub struct Haystack {
    padded: String,
    mode: MatchMode,
}

impl Haystack {
    pub fn new(folded: &str, mode: MatchMode) -> Self {
        Self {
            padded: format!(" {folded} "),
            mode,
        }
    }

    /// Whether a single folded phrase occurs in the text.
    pub fn contains(&self, folded_phrase: &str) -> bool {
        if folded_phrase.is_empty() {
            return false;
        }
        match self.mode {
            MatchMode::WordBoundary => self.padded.contains(&format!(" {folded_phrase} ")),
            MatchMode::Substring => self.padded.contains(folded_phrase),
        }
    }

    /// Find every phrase of `set` present in the text.
    pub fn find(&self, set: &VocabularySet) -> MatchResult {
        let matched_terms: BTreeSet<String> = set
            .phrases()
            .iter()
            .filter(|p| self.contains(&p.folded))
            .map(|p| p.canonical.clone())
            .collect();

        MatchResult {
            count: matched_terms.len(),
            matched_terms,
        }
    }

    /// Whether any phrase of `set` is present.
    pub fn any(&self, set: &VocabularySet) -> bool {
        set.phrases().iter().any(|p| self.contains(&p.folded))
    }
}

/// One-shot convenience over [`Haystack::find`].
pub fn find_matches(folded: &str, set: &VocabularySet, mode: MatchMode) -> MatchResult {
    Haystack::new(folded, mode).find(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::fold;

    fn set(phrases: &[&str]) -> VocabularySet {
        VocabularySet::new("test", phrases.iter().map(|s| s.to_string()))
    }

    #[test]
    fn matches_are_accent_and_case_insensitive() {
        let vocab = set(&["Constituição Federal", "não obstante"]);
        let text = fold("A CONSTITUICAO federal, nao obstante, garante direitos.");
        let result = find_matches(&text, &vocab, MatchMode::WordBoundary);
        assert_eq!(result.count, 2);
        assert!(result.matched_terms.contains("Constituição Federal"));
    }

    #[test]
    fn word_boundary_rejects_partial_words() {
        let vocab = set(&["lei", "marx"]);
        let text = fold("A leitura de textos marxistas.");
        assert!(find_matches(&text, &vocab, MatchMode::WordBoundary).is_empty());
        assert_eq!(find_matches(&text, &vocab, MatchMode::Substring).count, 2);
    }

    #[test]
    fn phrase_at_text_edges() {
        let vocab = set(&["portanto", "por fim"]);
        let text = fold("Portanto, vale insistir por fim");
        let result = find_matches(&text, &vocab, MatchMode::WordBoundary);
        assert_eq!(result.count, 2);
    }

    #[test]
    fn empty_text_matches_nothing() {
        let vocab = set(&["qualquer"]);
        assert!(find_matches("", &vocab, MatchMode::Substring).is_empty());
    }

    #[test]
    fn sample_is_ordered_and_bounded() {
        let vocab = set(&["bauman", "kant", "marx"]);
        let text = fold("Marx, Kant e Bauman");
        let result = find_matches(&text, &vocab, MatchMode::WordBoundary);
        assert_eq!(result.sample(2), vec!["bauman", "kant"]);
    }

    #[test]
    fn match_mode_parse() {
        assert_eq!("word-boundary".parse::<MatchMode>().unwrap(), MatchMode::WordBoundary);
        assert_eq!("SUBSTRING".parse::<MatchMode>().unwrap(), MatchMode::Substring);
        assert!("fuzzy".parse::<MatchMode>().is_err());
        assert_eq!(MatchMode::default().to_string(), "word_boundary");
    }
}
