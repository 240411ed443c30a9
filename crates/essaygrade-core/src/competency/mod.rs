//! Competency evaluators.
//!
//! Each evaluator reads the shared [`AnalysisContext`] and returns a banded
//! [`CompetencyScore`]. Evaluators are stateless unit structs; the engine runs
//! them in rubric order.

mod argumentation;
mod cohesion;
mod formal_language;
mod repertoire;

pub use argumentation::Argumentation;
pub use cohesion::Cohesion;
pub use formal_language::FormalLanguage;
pub use repertoire::Repertoire;

use crate::engine::EngineConfig;
use crate::matcher::Haystack;
use crate::model::{CompetencyId, CompetencyScore, ProposalElements};
use crate::proposal::InterventionProposal;
use crate::text::NormalizedDocument;
use crate::vocabulary::Lexicon;

/// Everything an evaluator may look at for one essay.
pub struct AnalysisContext<'a> {
    pub doc: &'a NormalizedDocument,
    pub lexicon: &'a Lexicon,
    pub config: &'a EngineConfig,
    /// Proposal slots, extracted once and shared with the C5 evaluator.
    pub proposal: &'a ProposalElements,
    text: Haystack,
}

impl<'a> AnalysisContext<'a> {
    pub fn new(
        doc: &'a NormalizedDocument,
        lexicon: &'a Lexicon,
        config: &'a EngineConfig,
        proposal: &'a ProposalElements,
    ) -> Self {
        Self {
            text: Haystack::new(&doc.folded, config.match_mode),
            doc,
            lexicon,
            config,
            proposal,
        }
    }

    /// The whole essay, ready for lookups.
    pub fn text(&self) -> &Haystack {
        &self.text
    }

    /// A haystack over some other folded text (a single paragraph).
    pub fn haystack(&self, folded: &str) -> Haystack {
        Haystack::new(folded, self.config.match_mode)
    }
}

/// Scores one rubric competency.
pub trait CompetencyEvaluator: Send + Sync {
    /// Which competency this evaluator scores.
    fn id(&self) -> CompetencyId;

    /// Produce the banded score and its observations.
    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> CompetencyScore;
}

/// The five evaluators in rubric order.
pub static EVALUATORS: [&dyn CompetencyEvaluator; 5] = [
    &FormalLanguage,
    &Repertoire,
    &Argumentation,
    &Cohesion,
    &InterventionProposal,
];

/// Join up to `n` matched terms for an observation message.
pub(crate) fn list_terms<'s>(terms: impl IntoIterator<Item = &'s str>, n: usize) -> String {
    terms.into_iter().take(n).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::proposal::extract_proposal;

    /// Run one evaluator over `text` with the bundled vocabulary.
    pub fn evaluate(evaluator: &dyn CompetencyEvaluator, text: &str) -> CompetencyScore {
        let lexicon = Lexicon::embedded();
        let config = EngineConfig::default();
        let doc = NormalizedDocument::new(text);
        let proposal = extract_proposal(&doc, &lexicon.proposal, &config);
        let ctx = AnalysisContext::new(&doc, &lexicon, &config, &proposal);
        evaluator.evaluate(&ctx)
    }

    /// `count` words of neutral filler with no vocabulary hits.
    pub fn filler(count: usize) -> String {
        const WORDS: [&str; 8] = [
            "lorem", "ipsum", "dolor", "sit", "amet", "consectetur", "adipiscing", "elit",
        ];
        (0..count)
            .map(|i| WORDS[i % WORDS.len()])
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Paragraphs of filler joined by blank lines.
    pub fn paragraphs(sizes: &[usize]) -> String {
        sizes
            .iter()
            .map(|&n| format!("{}.", filler(n)))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
