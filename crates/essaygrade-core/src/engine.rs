//! The scoring engine.
//!
//! Normalizes the essay once, extracts the proposal slots, and runs the five
//! competency evaluators over the shared context.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::competency::{AnalysisContext, EVALUATORS};
use crate::error::VocabularyError;
use crate::matcher::MatchMode;
use crate::model::{AnalysisResult, Band, CompetencyId, CompetencyScore, DocumentStats, Observation};
use crate::proposal::extract_proposal;
use crate::text::NormalizedDocument;
use crate::vocabulary::{Lexicon, VocabularySource};

/// Tunable thresholds for the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// How vocabulary phrases are matched.
    #[serde(default)]
    pub match_mode: MatchMode,
    /// Texts with fewer words score 0 in every competency.
    #[serde(default = "default_min_words")]
    pub min_words: usize,
    /// Final paragraphs with fewer words score 0 in C5.
    #[serde(default = "default_proposal_min_words")]
    pub proposal_min_words: usize,
    /// Final paragraphs longer than this count as elaborated.
    #[serde(default = "default_elaboration_min_words")]
    pub elaboration_min_words: usize,
}

fn default_min_words() -> usize {
    20
}

fn default_proposal_min_words() -> usize {
    20
}

fn default_elaboration_min_words() -> usize {
    80
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            match_mode: MatchMode::default(),
            min_words: default_min_words(),
            proposal_min_words: default_proposal_min_words(),
            elaboration_min_words: default_elaboration_min_words(),
        }
    }
}

/// A configured, shareable scoring engine.
///
/// Cloning is cheap: the vocabulary is behind an `Arc` and never mutated.
#[derive(Debug, Clone)]
pub struct Engine {
    lexicon: Arc<Lexicon>,
    config: EngineConfig,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(Lexicon::embedded(), EngineConfig::default())
    }
}

impl Engine {
    pub fn new(lexicon: Arc<Lexicon>, config: EngineConfig) -> Self {
        Self { lexicon, config }
    }

    /// Build an engine from any vocabulary source.
    pub fn from_source(
        source: &dyn VocabularySource,
        config: EngineConfig,
    ) -> Result<Self, VocabularyError> {
        let lexicon = source.load()?;
        tracing::debug!("engine built from {} vocabulary", source.describe());
        Ok(Self::new(Arc::new(lexicon), config))
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Score an essay. Never fails; identical input yields identical output.
    pub fn analyze(&self, text: &str) -> AnalysisResult {
        let doc = NormalizedDocument::new(text);
        let stats = DocumentStats {
            word_count: doc.word_count,
            paragraph_count: doc.paragraph_count(),
            sentence_count: doc.sentence_count,
        };
        let proposal = extract_proposal(&doc, &self.lexicon.proposal, &self.config);

        if doc.word_count < self.config.min_words {
            tracing::debug!(words = doc.word_count, "text below minimum length");
            let message = format!(
                "Texto insuficiente para avaliação ({} palavras; mínimo de {}).",
                doc.word_count, self.config.min_words
            );
            let scores = CompetencyId::ALL.map(|id| {
                CompetencyScore::new(id, Band::ZERO, vec![Observation::negative(message.clone())])
            });
            return AnalysisResult::new(scores, proposal, stats);
        }

        let ctx = AnalysisContext::new(&doc, &self.lexicon, &self.config, &proposal);
        let scores = EVALUATORS.map(|evaluator| evaluator.evaluate(&ctx));
        let result = AnalysisResult::new(scores, proposal, stats);

        tracing::debug!(
            grade = result.final_grade,
            words = stats.word_count,
            paragraphs = stats.paragraph_count,
            "essay analyzed"
        );
        result
    }
}
