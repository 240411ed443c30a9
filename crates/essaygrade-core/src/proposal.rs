//! Intervention proposal: slot extraction and the C5 evaluator.
//!
//! A complete proposal names who acts (agent), what is done (action), how
//! (means), what for (purpose), and adds detail (elaboration). Only the final
//! paragraph is scanned.

use crate::competency::{list_terms, AnalysisContext, CompetencyEvaluator};
use crate::engine::EngineConfig;
use crate::matcher::Haystack;
use crate::model::{Band, CompetencyId, CompetencyScore, Observation, ProposalElements, SlotMatch};
use crate::text::NormalizedDocument;
use crate::vocabulary::{ProposalVocabulary, VocabularySet};

/// Scan the final paragraph for the five proposal slots and for
/// rights-violation markers.
pub fn extract_proposal(
    doc: &NormalizedDocument,
    vocab: &ProposalVocabulary,
    config: &EngineConfig,
) -> ProposalElements {
    let Some(conclusion) = doc.conclusion() else {
        return ProposalElements::empty();
    };
    let haystack = Haystack::new(&conclusion.folded, config.match_mode);
    let slot = |set: &VocabularySet| {
        SlotMatch::from_matches(haystack.find(set).matched_terms.into_iter().collect())
    };

    let mut elaboration: Vec<String> = haystack
        .find(&vocab.elaboration)
        .matched_terms
        .into_iter()
        .collect();
    elaboration.extend(haystack.find(&vocab.detail).matched_terms);
    let elaboration = SlotMatch {
        present: !elaboration.is_empty() || conclusion.word_count > config.elaboration_min_words,
        matches: elaboration,
    };

    let violations: Vec<String> = haystack
        .find(&vocab.rights_violation)
        .matched_terms
        .into_iter()
        .collect();

    let mut elements = ProposalElements {
        agent: slot(&vocab.agent),
        action: slot(&vocab.action),
        means: slot(&vocab.means),
        purpose: slot(&vocab.purpose),
        elaboration,
        elements_found: 0,
        respects_human_rights: violations.is_empty(),
        violations,
    };
    elements.elements_found = elements.slots().iter().filter(|(_, s)| s.present).count() as u8;
    elements
}

/// Scores the proposal from the extracted slots.
#[derive(Debug, Clone, Copy, Default)]
pub struct InterventionProposal;

impl CompetencyEvaluator for InterventionProposal {
    fn id(&self) -> CompetencyId {
        CompetencyId::C5
    }

    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> CompetencyScore {
        let proposal = ctx.proposal;
        let mut observations = Vec::new();

        let conclusion_words = ctx.doc.conclusion().map(|p| p.word_count).unwrap_or(0);
        let mut score = if conclusion_words < ctx.config.proposal_min_words {
            observations.push(Observation::negative(format!(
                "Proposta de intervenção insuficiente: parágrafo de conclusão com {conclusion_words} palavras."
            )));
            Band::ZERO
        } else {
            for (name, slot) in proposal.slots() {
                if slot.present {
                    let detail = if slot.matches.is_empty() {
                        String::new()
                    } else {
                        format!(": {}", list_terms(slot.matches.iter().map(String::as_str), 2))
                    };
                    observations.push(Observation::positive(format!(
                        "Elemento {name} identificado{detail}."
                    )));
                } else {
                    observations.push(Observation::negative(format!(
                        "Elemento {name} não identificado na proposta."
                    )));
                }
            }

            let found = proposal.elements_found;
            observations.push(match found {
                5 => Observation::positive(
                    "Proposta de intervenção completa com todos os 5 elementos.",
                ),
                4 => Observation::positive(format!(
                    "Proposta de intervenção muito boa ({found}/5 elementos)."
                )),
                1..=3 => Observation::neutral(format!(
                    "Proposta de intervenção parcial ({found}/5 elementos); detalhe os elementos ausentes."
                )),
                _ => Observation::negative("Proposta de intervenção não identificada."),
            });
            Band::from_level(found as usize)
        };

        if !proposal.respects_human_rights {
            score = Band::ZERO;
            observations.push(Observation::negative(format!(
                "Atenção: possível violação de direitos humanos na proposta ({}).",
                list_terms(proposal.violations.iter().map(String::as_str), 3)
            )));
        }

        tracing::debug!(
            elements = proposal.elements_found,
            respects_human_rights = proposal.respects_human_rights,
            %score,
            "C5 evaluated"
        );
        CompetencyScore::new(self.id(), score, observations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::competency::testing::{evaluate, filler};
    use crate::vocabulary::Lexicon;

    const COMPLETE: &str = "Portanto, cabe ao Ministério da Educação criar programas de \
        conscientização nas escolas, por meio de palestras ministradas por psicólogos, \
        a fim de reduzir a evasão escolar e garantir o futuro dos jovens brasileiros.";

    fn extract(text: &str) -> ProposalElements {
        let doc = NormalizedDocument::new(text);
        extract_proposal(&doc, &Lexicon::embedded().proposal, &EngineConfig::default())
    }

    #[test]
    fn complete_proposal_has_five_elements() {
        let elements = extract(COMPLETE);
        assert_eq!(elements.elements_found, 5);
        assert!(elements.agent.matches.iter().any(|m| m == "ministério da educação"));
        assert!(elements.respects_human_rights);
    }

    #[test]
    fn only_final_paragraph_is_scanned() {
        let text = format!("{COMPLETE}\n\n{}.", filler(30));
        let elements = extract(&text);
        assert_eq!(elements.elements_found, 0);
    }

    #[test]
    fn long_conclusion_counts_as_elaborated() {
        let elements = extract(&filler(90));
        assert!(elements.elaboration.present);
        assert!(elements.elaboration.matches.is_empty());
        assert_eq!(elements.elements_found, 1);
    }

    #[test]
    fn complete_proposal_scores_200() {
        let text = format!("{}.\n\n{}.\n\n{COMPLETE}", filler(40), filler(80));
        let result = evaluate(&InterventionProposal, &text);
        assert_eq!(result.score.points(), 200);
    }

    #[test]
    fn short_conclusion_scores_zero() {
        let text = format!("{}.\n\n{}.\n\nO governo deve criar leis.", filler(40), filler(80));
        let result = evaluate(&InterventionProposal, &text);
        assert_eq!(result.score, Band::ZERO);
        assert!(result.observations[0].message.contains("insuficiente"));
    }

    #[test]
    fn rights_violation_forces_zero() {
        let text = format!(
            "{}.\n\n{}.\n\n{COMPLETE} Caso contrário, o Estado deve exterminar os infratores.",
            filler(40),
            filler(80)
        );
        let result = evaluate(&InterventionProposal, &text);
        assert_eq!(result.score, Band::ZERO);
        assert!(result
            .observations
            .last()
            .is_some_and(|o| o.message.contains("direitos humanos")));
    }

    #[test]
    fn missing_slot_is_reported_as_negative() {
        let text = format!(
            "{}.\n\n{}.\n\nPortanto, é preciso criar programas de permanência estudantil, \
             por meio de bolsas e da contratação de psicólogos, a fim de reduzir a evasão escolar.",
            filler(40),
            filler(80)
        );
        let result = evaluate(&InterventionProposal, &text);
        assert_eq!(result.score.points(), 160);
        let missing = result
            .observations
            .iter()
            .find(|o| o.message == "Elemento agente não identificado na proposta.")
            .unwrap();
        assert_eq!(missing.tone, crate::model::Tone::Negative);
    }

    #[test]
    fn no_text_is_empty_proposal() {
        assert_eq!(extract(""), ProposalElements::empty());
    }
}
