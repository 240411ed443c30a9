//! C3: selection and organization of arguments.

use super::{AnalysisContext, CompetencyEvaluator};
use crate::model::{Band, CompetencyId, CompetencyScore, Observation};

/// Average words per development paragraph for a fully developed argument.
const DEVELOPED_PARAGRAPH_WORDS: f64 = 80.0;
/// Below this average the development is considered shallow.
const SHALLOW_PARAGRAPH_WORDS: f64 = 40.0;
/// Argumentative connectors expected in a well-supported essay.
const EXPECTED_CONNECTORS: usize = 5;

/// Scores development depth, thesis presence, and argumentative connectors.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argumentation;

impl CompetencyEvaluator for Argumentation {
    fn id(&self) -> CompetencyId {
        CompetencyId::C3
    }

    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> CompetencyScore {
        let developments = ctx.doc.development();
        if developments.is_empty() {
            tracing::debug!("C3 evaluated without development paragraphs");
            return CompetencyScore::new(
                self.id(),
                Band::floor(40),
                vec![Observation::negative(
                    "Desenvolvimento argumentativo insuficiente: não há parágrafos de desenvolvimento.",
                )],
            );
        }

        let mut observations = Vec::new();
        let mut missing = 0usize;

        let average = ctx.doc.average_development_length();
        if average < SHALLOW_PARAGRAPH_WORDS {
            missing += 2;
            observations.push(Observation::negative(format!(
                "Parágrafos de desenvolvimento muito curtos (média de {average:.0} palavras)."
            )));
        } else if average < DEVELOPED_PARAGRAPH_WORDS {
            missing += 1;
            observations.push(Observation::neutral(format!(
                "Parágrafos pouco desenvolvidos (média de {average:.0} palavras); aprofunde os argumentos."
            )));
        } else {
            observations.push(Observation::positive(format!(
                "Parágrafos bem desenvolvidos e aprofundados ({} de desenvolvimento).",
                developments.len()
            )));
        }

        let has_thesis = ctx
            .doc
            .introduction()
            .map(|intro| ctx.haystack(&intro.folded).any(&ctx.lexicon.thesis))
            .unwrap_or(false);
        if has_thesis {
            observations.push(Observation::positive("Tese claramente apresentada na introdução."));
        } else {
            missing += 1;
            observations.push(Observation::negative("Tese não identificada na introdução."));
        }

        let connectors = ctx.text().find(&ctx.lexicon.argumentative).count;
        if connectors == 0 {
            missing += 2;
            observations.push(Observation::negative(
                "Nenhum conector argumentativo identificado.",
            ));
        } else if connectors < EXPECTED_CONNECTORS {
            missing += 1;
            observations.push(Observation::neutral(format!(
                "Argumentação básica presente ({connectors} conectores argumentativos); relacione melhor as ideias."
            )));
        } else {
            observations.push(Observation::positive(
                "Argumentação excepcional com múltiplos elementos de sustentação.",
            ));
        }

        let score = Band::MAX.lower(missing).max(Band::floor(80));
        tracing::debug!(average, has_thesis, connectors, %score, "C3 evaluated");
        CompetencyScore::new(self.id(), score, observations)
    }
}
