//! C1: mastery of the formal written register.

use super::{list_terms, AnalysisContext, CompetencyEvaluator};
use crate::model::{Band, CompetencyId, CompetencyScore, Observation};

/// Caps the score by length, paragraphing, and informal markers.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormalLanguage;

impl CompetencyEvaluator for FormalLanguage {
    fn id(&self) -> CompetencyId {
        CompetencyId::C1
    }

    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> CompetencyScore {
        let words = ctx.doc.word_count;
        let paragraphs = ctx.doc.paragraph_count();
        let mut cap: u16 = 200;
        let mut observations = Vec::new();

        if words < 200 {
            cap = cap.min(80);
            observations.push(Observation::negative(format!(
                "Redação muito curta para desenvolvimento adequado ({words} palavras)."
            )));
        } else if words < 300 {
            cap = cap.min(160);
            observations.push(Observation::neutral(
                "Redação um pouco curta, mas dentro do aceitável.",
            ));
        } else if words > 1000 {
            cap = cap.min(180);
            observations.push(Observation::neutral(
                "Redação muito extensa, cuidado com a objetividade.",
            ));
        } else {
            observations.push(Observation::positive(
                "Extensão excelente para desenvolvimento completo dos argumentos.",
            ));
        }

        match paragraphs {
            0..=2 => {
                cap = cap.min(100);
                observations.push(Observation::negative(
                    "Estrutura insuficiente com poucos parágrafos.",
                ));
            }
            3 => {
                cap = cap.min(180);
                observations.push(Observation::neutral(
                    "Estrutura adequada, mas poderia ter mais desenvolvimento.",
                ));
            }
            4..=6 => observations.push(Observation::positive(
                "Estrutura perfeita com organização clara em parágrafos bem definidos.",
            )),
            _ => {
                cap = cap.min(180);
                observations.push(Observation::neutral(
                    "Texto fragmentado em muitos parágrafos; agrupe ideias relacionadas.",
                ));
            }
        }

        let informal = ctx.text().find(&ctx.lexicon.informal);
        if !informal.is_empty() {
            cap = cap.min(120);
            observations.push(Observation::negative(format!(
                "Presença de registro informal detectada: {}.",
                list_terms(informal.sample(3), 3)
            )));
        }

        let score = Band::floor(cap);
        if score == Band::MAX {
            observations.push(Observation::positive(
                "Excelente domínio da modalidade escrita formal da língua portuguesa.",
            ));
        }

        tracing::debug!(words, paragraphs, informal = informal.count, %score, "C1 evaluated");
        CompetencyScore::new(self.id(), score, observations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::competency::testing::{evaluate, paragraphs};
    use crate::model::Tone;

    #[test]
    fn well_sized_essay_reaches_top_band() {
        let result = evaluate(&FormalLanguage, &paragraphs(&[70, 90, 90, 90, 70]));
        assert_eq!(result.score.points(), 200);
        assert!(result.observations.iter().all(|o| o.tone == Tone::Positive));
    }

    #[test]
    fn short_text_caps_at_80() {
        let result = evaluate(&FormalLanguage, &paragraphs(&[40, 50, 50, 40]));
        assert_eq!(result.score.points(), 80);
    }

    #[test]
    fn three_paragraphs_snap_180_to_160() {
        let result = evaluate(&FormalLanguage, &paragraphs(&[100, 150, 100]));
        assert_eq!(result.score.points(), 160);
    }

    #[test]
    fn two_paragraphs_snap_100_to_80() {
        let result = evaluate(&FormalLanguage, &paragraphs(&[200, 200]));
        assert_eq!(result.score.points(), 80);
    }

    #[test]
    fn six_paragraphs_are_not_penalized() {
        let result = evaluate(&FormalLanguage, &paragraphs(&[60, 60, 60, 60, 60, 60]));
        assert_eq!(result.score.points(), 200);
    }

    #[test]
    fn seven_paragraphs_lose_a_band() {
        let result = evaluate(&FormalLanguage, &paragraphs(&[50; 7]));
        assert_eq!(result.score.points(), 160);
    }

    #[test]
    fn very_long_text_loses_a_band() {
        let result = evaluate(&FormalLanguage, &paragraphs(&[250, 260, 260, 250]));
        assert_eq!(result.score.points(), 160);
    }

    #[test]
    fn informal_register_caps_at_120() {
        let mut text = paragraphs(&[70, 90, 90, 90, 70]);
        text.push_str(" A gente sabe disso, né?");
        let result = evaluate(&FormalLanguage, &text);
        assert_eq!(result.score.points(), 120);
        assert!(result
            .observations
            .iter()
            .any(|o| o.tone == Tone::Negative && o.message.contains("informal")));
    }

    #[test]
    fn formal_dai_is_not_informal() {
        let mut text = paragraphs(&[70, 90, 90, 90, 70]);
        text.push_str(" Daí a relevância do debate. Aí reside o problema.");
        let result = evaluate(&FormalLanguage, &text);
        assert_eq!(result.score.points(), 200);
        assert!(result.observations.iter().all(|o| o.tone == Tone::Positive));
    }

    #[test]
    fn colloquial_ai_entao_is_informal() {
        let mut text = paragraphs(&[70, 90, 90, 90, 70]);
        text.push_str(" Aí então ninguém faz nada.");
        let result = evaluate(&FormalLanguage, &text);
        assert_eq!(result.score.points(), 120);
    }
}
