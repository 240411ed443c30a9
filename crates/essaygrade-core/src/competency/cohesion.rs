//! C4: cohesion mechanisms.

use std::collections::BTreeSet;

use super::{list_terms, AnalysisContext, CompetencyEvaluator};
use crate::model::{Band, CompetencyId, CompetencyScore, Observation};

/// Distinct referential terms that earn a bonus band.
const REFERENTIAL_BONUS: usize = 3;
/// Lexical variety above which the text earns a bonus band.
const VARIETY_BONUS: f64 = 0.6;

/// Scores connective volume and diversity, with referential and lexical bonuses.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cohesion;

/// Base band from the connective ladder.
fn ladder(volume: usize, diversity: usize) -> Band {
    match (volume, diversity) {
        (v, d) if v >= 8 && d >= 4 => Band::MAX,
        (v, d) if v >= 6 && d >= 3 => Band::floor(160),
        (v, d) if v >= 4 && d >= 2 => Band::floor(120),
        (v, _) if v >= 2 => Band::floor(80),
        _ => Band::floor(40),
    }
}

/// Highest band bonuses may reach for a given category diversity.
fn ceiling(diversity: usize) -> Band {
    match diversity {
        d if d >= 4 => Band::MAX,
        3 => Band::floor(160),
        _ => Band::floor(120),
    }
}

impl CompetencyEvaluator for Cohesion {
    fn id(&self) -> CompetencyId {
        CompetencyId::C4
    }

    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> CompetencyScore {
        let mut observations = Vec::new();

        let mut phrases: BTreeSet<String> = BTreeSet::new();
        let mut categories: Vec<&str> = Vec::new();
        for set in &ctx.lexicon.connectives {
            let found = ctx.text().find(set);
            if !found.is_empty() {
                categories.push(set.name());
                phrases.extend(found.matched_terms);
            }
        }
        let volume = phrases.len();
        let diversity = categories.len();
        let base = ladder(volume, diversity);

        match base.points() {
            200 => observations.push(Observation::positive(format!(
                "Uso excepcional de elementos coesivos com grande variedade ({diversity} tipos de conectivos)."
            ))),
            160 => observations.push(Observation::positive(
                "Excelente uso de elementos coesivos com boa variedade.",
            )),
            120 => observations.push(Observation::neutral(
                "Uso adequado de elementos coesivos; diversifique os tipos de conectivos.",
            )),
            80 => observations.push(Observation::neutral(
                "Uso limitado de elementos coesivos; empregue conectivos de diferentes tipos.",
            )),
            _ => observations.push(Observation::negative(
                "Elementos coesivos praticamente ausentes.",
            )),
        }

        let mut bonus = 0usize;
        let referential = ctx.text().find(&ctx.lexicon.referential);
        if referential.count >= REFERENTIAL_BONUS {
            bonus += 1;
            observations.push(Observation::positive(format!(
                "Bom uso de elementos referenciais: {}.",
                list_terms(referential.sample(3), 3)
            )));
        }
        let variety = ctx.doc.lexical_variety();
        if variety > VARIETY_BONUS {
            bonus += 1;
            observations.push(Observation::positive("Vocabulário variado, com pouca repetição."));
        }

        let score = base.raise(bonus).min(ceiling(diversity).max(base));
        tracing::debug!(volume, diversity, bonus, categories = ?categories, %score, "C4 evaluated");
        CompetencyScore::new(self.id(), score, observations)
    }
}
