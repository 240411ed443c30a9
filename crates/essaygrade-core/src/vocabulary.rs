//! Vocabulary loading and validation.
//!
//! All curated phrase lists live in versioned TOML data rather than in code.
//! A bundled default (`vocab/enem.toml`) is compiled into the crate; an
//! external file with the same schema can replace it through
//! [`FileVocabulary`].

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::VocabularyError;
use crate::text::fold;

/// Bundled vocabulary source text.
pub const EMBEDDED_VOCABULARY: &str = include_str!("../vocab/enem.toml");

static EMBEDDED_LEXICON: Lazy<Arc<Lexicon>> = Lazy::new(|| {
    Arc::new(Lexicon::from_toml_str(EMBEDDED_VOCABULARY).expect("bundled vocabulary is valid"))
});

/// A vocabulary phrase in its canonical and folded forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phrase {
    /// Spelling as written in the vocabulary file.
    pub canonical: String,
    /// Folded form used for matching.
    pub folded: String,
}

/// An immutable, named collection of phrases.
///
/// Phrases are folded on construction and deduplicated by folded form, so
/// accent variants of the same phrase collapse into the first spelling seen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VocabularySet {
    name: String,
    phrases: Vec<Phrase>,
}

impl VocabularySet {
    pub fn new(name: impl Into<String>, phrases: impl IntoIterator<Item = String>) -> Self {
        let mut seen = HashSet::new();
        let phrases = phrases
            .into_iter()
            .filter_map(|canonical| {
                let folded = fold(&canonical);
                if folded.is_empty() || !seen.insert(folded.clone()) {
                    return None;
                }
                Some(Phrase {
                    canonical: canonical.trim().to_string(),
                    folded,
                })
            })
            .collect();

        Self {
            name: name.into(),
            phrases,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phrases(&self) -> &[Phrase] {
        &self.phrases
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }
}

/// Name and version of a loaded vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyMeta {
    pub name: String,
    pub version: String,
}

/// Cue phrases for the five proposal slots and the safety override.
#[derive(Debug, Clone)]
pub struct ProposalVocabulary {
    pub agent: VocabularySet,
    pub action: VocabularySet,
    pub means: VocabularySet,
    pub purpose: VocabularySet,
    pub elaboration: VocabularySet,
    /// Concrete nouns that count as elaboration without an explicit cue.
    pub detail: VocabularySet,
    pub rights_violation: VocabularySet,
}

/// Every vocabulary set the engine reads.
#[derive(Debug, Clone)]
pub struct Lexicon {
    pub meta: VocabularyMeta,
    /// Sociocultural repertoire, one set per category.
    pub repertoire: Vec<VocabularySet>,
    /// Cohesion connectives, one set per rhetorical category.
    pub connectives: Vec<VocabularySet>,
    /// Thesis-signaling phrases looked up in the introduction.
    pub thesis: VocabularySet,
    /// Argumentative connectors, distinct from cohesion connectives.
    pub argumentative: VocabularySet,
    pub referential: VocabularySet,
    pub informal: VocabularySet,
    pub proposal: ProposalVocabulary,
}

impl Lexicon {
    /// The bundled vocabulary, parsed once per process and shared.
    pub fn embedded() -> Arc<Lexicon> {
        Arc::clone(&EMBEDDED_LEXICON)
    }

    /// Parse and build a lexicon from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, VocabularyError> {
        let raw = parse_raw_vocabulary(content)?;
        Self::from_raw(raw)
    }

    /// Build a lexicon from an already parsed vocabulary file.
    pub fn from_raw(raw: RawVocabulary) -> Result<Self, VocabularyError> {
        let repertoire = categorized("repertoire", raw.repertoire)?;
        let connectives = categorized("connectives", raw.connectives)?;

        Ok(Self {
            meta: VocabularyMeta {
                name: raw.meta.name,
                version: raw.meta.version,
            },
            repertoire,
            connectives,
            thesis: required("argumentation.thesis", raw.argumentation.thesis)?,
            argumentative: required("argumentation.connectors", raw.argumentation.connectors)?,
            referential: required("cohesion.referential", raw.cohesion.referential)?,
            informal: required("register.informal", raw.register.informal)?,
            proposal: ProposalVocabulary {
                agent: required("proposal.agent", raw.proposal.agent)?,
                action: required("proposal.action", raw.proposal.action)?,
                means: required("proposal.means", raw.proposal.means)?,
                purpose: required("proposal.purpose", raw.proposal.purpose)?,
                elaboration: required("proposal.elaboration", raw.proposal.elaboration)?,
                detail: VocabularySet::new("proposal.detail", raw.proposal.detail),
                rights_violation: required(
                    "proposal.rights_violation",
                    raw.proposal.rights_violation,
                )?,
            },
        })
    }
}

fn required(name: &str, phrases: Vec<String>) -> Result<VocabularySet, VocabularyError> {
    let set = VocabularySet::new(name, phrases);
    if set.is_empty() {
        return Err(VocabularyError::MissingSet(name.to_string()));
    }
    Ok(set)
}

fn categorized(
    name: &str,
    categories: BTreeMap<String, Vec<String>>,
) -> Result<Vec<VocabularySet>, VocabularyError> {
    let sets: Vec<VocabularySet> = categories
        .into_iter()
        .map(|(category, phrases)| VocabularySet::new(category, phrases))
        .filter(|set| !set.is_empty())
        .collect();
    if sets.is_empty() {
        return Err(VocabularyError::MissingSet(name.to_string()));
    }
    Ok(sets)
}

// ---------------------------------------------------------------------------
// File schema
// ---------------------------------------------------------------------------

/// Vocabulary file as written on disk.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawVocabulary {
    pub meta: RawMeta,
    #[serde(default)]
    pub repertoire: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub connectives: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub argumentation: RawArgumentation,
    #[serde(default)]
    pub cohesion: RawCohesion,
    #[serde(default)]
    pub register: RawRegister,
    #[serde(default)]
    pub proposal: RawProposal,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMeta {
    pub name: String,
    #[serde(default = "default_version")]
    pub version: String,
}

fn default_version() -> String {
    "0".to_string()
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawArgumentation {
    #[serde(default)]
    pub thesis: Vec<String>,
    #[serde(default)]
    pub connectors: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCohesion {
    #[serde(default)]
    pub referential: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRegister {
    #[serde(default)]
    pub informal: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawProposal {
    #[serde(default)]
    pub agent: Vec<String>,
    #[serde(default)]
    pub action: Vec<String>,
    #[serde(default)]
    pub means: Vec<String>,
    #[serde(default)]
    pub purpose: Vec<String>,
    #[serde(default)]
    pub elaboration: Vec<String>,
    #[serde(default)]
    pub detail: Vec<String>,
    #[serde(default)]
    pub rights_violation: Vec<String>,
}

impl RawVocabulary {
    /// Every phrase list in the file, with its dotted set name.
    fn named_lists(&self) -> Vec<(String, &[String])> {
        let mut lists: Vec<(String, &[String])> = Vec::new();
        for (category, phrases) in &self.repertoire {
            lists.push((format!("repertoire.{category}"), phrases.as_slice()));
        }
        for (category, phrases) in &self.connectives {
            lists.push((format!("connectives.{category}"), phrases.as_slice()));
        }
        let fixed: [(&str, &Vec<String>); 11] = [
            ("argumentation.thesis", &self.argumentation.thesis),
            ("argumentation.connectors", &self.argumentation.connectors),
            ("cohesion.referential", &self.cohesion.referential),
            ("register.informal", &self.register.informal),
            ("proposal.agent", &self.proposal.agent),
            ("proposal.action", &self.proposal.action),
            ("proposal.means", &self.proposal.means),
            ("proposal.purpose", &self.proposal.purpose),
            ("proposal.elaboration", &self.proposal.elaboration),
            ("proposal.detail", &self.proposal.detail),
            ("proposal.rights_violation", &self.proposal.rights_violation),
        ];
        for (name, phrases) in fixed {
            lists.push((name.to_string(), phrases.as_slice()));
        }
        lists
    }
}

/// Parse vocabulary TOML without building the lexicon.
pub fn parse_raw_vocabulary(content: &str) -> Result<RawVocabulary, VocabularyError> {
    Ok(toml::from_str(content)?)
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// Something the engine can load its vocabulary from.
pub trait VocabularySource {
    /// Human-readable origin, for logs.
    fn describe(&self) -> String;

    /// Load and build the lexicon.
    fn load(&self) -> Result<Lexicon, VocabularyError>;
}

/// The vocabulary compiled into the crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedVocabulary;

impl VocabularySource for EmbeddedVocabulary {
    fn describe(&self) -> String {
        "embedded".to_string()
    }

    fn load(&self) -> Result<Lexicon, VocabularyError> {
        Lexicon::from_toml_str(EMBEDDED_VOCABULARY)
    }
}

/// A vocabulary file on disk.
#[derive(Debug, Clone)]
pub struct FileVocabulary {
    path: PathBuf,
}

impl FileVocabulary {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl VocabularySource for FileVocabulary {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<Lexicon, VocabularyError> {
        let content = std::fs::read_to_string(&self.path).map_err(|source| VocabularyError::Io {
            path: self.path.display().to_string(),
            source,
        })?;
        let lexicon = Lexicon::from_toml_str(&content)?;
        tracing::info!(
            "loaded vocabulary {} v{} from {}",
            lexicon.meta.name,
            lexicon.meta.version,
            self.path.display()
        );
        Ok(lexicon)
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// A warning from vocabulary validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// Dotted set name (e.g. "connectives.adversative").
    pub set: String,
    /// Warning message.
    pub message: String,
}

/// Check a vocabulary file for issues that do not prevent loading.
pub fn validate_vocabulary(raw: &RawVocabulary) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    for (set, phrases) in raw.named_lists() {
        if phrases.is_empty() && set != "proposal.detail" {
            warnings.push(ValidationWarning {
                set: set.clone(),
                message: "set has no phrases".into(),
            });
            continue;
        }

        let mut seen: HashSet<String> = HashSet::new();
        for phrase in phrases {
            let folded = fold(phrase);
            if folded.is_empty() {
                warnings.push(ValidationWarning {
                    set: set.clone(),
                    message: format!("phrase {phrase:?} is empty after folding"),
                });
            } else if !seen.insert(folded.clone()) {
                warnings.push(ValidationWarning {
                    set: set.clone(),
                    message: format!("duplicate phrase after folding: {folded}"),
                });
            }
        }
    }

    if raw.connectives.len() < 4 {
        warnings.push(ValidationWarning {
            set: "connectives".into(),
            message: format!(
                "only {} connective categories; the top cohesion band needs 4",
                raw.connectives.len()
            ),
        });
    }

    if raw.repertoire.len() < 3 {
        warnings.push(ValidationWarning {
            set: "repertoire".into(),
            message: format!(
                "only {} repertoire categories; the top repertoire band needs 3 signals",
                raw.repertoire.len()
            ),
        });
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
[meta]
name = "minimal"
version = "1"

[repertoire]
philosophy = ["Kant"]

[connectives]
adversative = ["porém", "porem"]

[argumentation]
thesis = ["é evidente"]
connectors = ["segundo"]

[cohesion]
referential = ["isso"]

[register]
informal = ["vc"]

[proposal]
agent = ["governo"]
action = ["criar"]
means = ["por meio de"]
purpose = ["a fim de"]
elaboration = ["sobretudo"]
rights_violation = ["tortura"]
"#;

    #[test]
    fn embedded_vocabulary_loads() {
        let lexicon = Lexicon::embedded();
        assert_eq!(lexicon.meta.name, "enem");
        assert!(lexicon.repertoire.len() >= 6);
        assert_eq!(lexicon.connectives.len(), 7);
        assert!(!lexicon.proposal.rights_violation.is_empty());
        assert!(!lexicon.proposal.detail.is_empty());
    }

    #[test]
    fn embedded_source_matches_shared_instance() {
        let loaded = EmbeddedVocabulary.load().unwrap();
        assert_eq!(loaded.meta, Lexicon::embedded().meta);
        assert_eq!(EmbeddedVocabulary.describe(), "embedded");
    }

    #[test]
    fn embedded_vocabulary_has_no_warnings() {
        let raw = parse_raw_vocabulary(EMBEDDED_VOCABULARY).unwrap();
        let warnings = validate_vocabulary(&raw);
        assert!(
            warnings.is_empty(),
            "unexpected warnings: {:?}",
            warnings.iter().map(|w| &w.message).collect::<Vec<_>>()
        );
    }

    #[test]
    fn accent_variants_collapse() {
        let lexicon = Lexicon::from_toml_str(MINIMAL).unwrap();
        assert_eq!(lexicon.connectives[0].len(), 1);
        assert_eq!(lexicon.connectives[0].phrases()[0].canonical, "porém");
        assert_eq!(lexicon.connectives[0].phrases()[0].folded, "porem");
    }

    #[test]
    fn missing_detail_is_allowed() {
        let lexicon = Lexicon::from_toml_str(MINIMAL).unwrap();
        assert!(lexicon.proposal.detail.is_empty());
    }

    #[test]
    fn missing_required_set_is_an_error() {
        let without_violations = MINIMAL.replace("rights_violation = [\"tortura\"]", "");
        let err = Lexicon::from_toml_str(&without_violations).unwrap_err();
        assert!(matches!(err, VocabularyError::MissingSet(ref s) if s == "proposal.rights_violation"));
    }

    #[test]
    fn malformed_toml_is_an_error() {
        let err = Lexicon::from_toml_str("this is not [valid toml }{").unwrap_err();
        assert!(matches!(err, VocabularyError::Parse(_)));
    }

    #[test]
    fn validation_reports_duplicates_and_few_categories() {
        let raw = parse_raw_vocabulary(MINIMAL).unwrap();
        let warnings = validate_vocabulary(&raw);
        assert!(warnings
            .iter()
            .any(|w| w.set == "connectives.adversative" && w.message.contains("duplicate")));
        assert!(warnings.iter().any(|w| w.set == "connectives"));
        assert!(warnings.iter().any(|w| w.set == "repertoire"));
    }

    #[test]
    fn file_source_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vocab.toml");
        std::fs::write(&path, MINIMAL).unwrap();

        let source = FileVocabulary::new(&path);
        let lexicon = source.load().unwrap();
        assert_eq!(lexicon.meta.name, "minimal");
        assert_eq!(source.describe(), path.display().to_string());
    }

    #[test]
    fn file_source_missing_file() {
        let err = FileVocabulary::new("/no/such/vocab.toml").load().unwrap_err();
        assert!(matches!(err, VocabularyError::Io { .. }));
    }
}
