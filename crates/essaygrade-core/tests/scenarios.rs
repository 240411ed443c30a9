//! Reference essays graded end to end.
//!
//! The fixtures are a complete five-paragraph essay and a short single
//! paragraph without connectives or repertoire.

use essaygrade_core::model::Tone;
use essaygrade_core::rubric::RubricTemplate;
use essaygrade_core::{assess, CompetencyId, Engine, TextQuality};

const COMPLETE_ESSAY: &str = include_str!("fixtures/complete_essay.txt");
const SHORT_PARAGRAPH: &str = include_str!("fixtures/short_paragraph.txt");

fn with_rights_violation() -> String {
    format!(
        "{} Caso isso não funcione, o Estado deve punir os responsáveis com pena de morte.",
        COMPLETE_ESSAY.trim_end()
    )
}

fn without_agent() -> String {
    let (body, _) = COMPLETE_ESSAY
        .trim_end()
        .rsplit_once("\n\n")
        .unwrap();
    format!(
        "{body}\n\nPortanto, medidas são necessárias para combater a evasão escolar no Brasil. \
         Nesse sentido, é preciso criar programas de permanência estudantil, por meio de bolsas \
         de auxílio financeiro e da contratação de psicólogos, a fim de garantir que os jovens \
         de baixa renda concluam seus estudos. Desse modo, a realidade de Fabiano deixará de \
         ser um retrato do Brasil contemporâneo."
    )
}

#[test]
fn complete_essay_scores_top_range() {
    let result = Engine::default().analyze(COMPLETE_ESSAY);

    assert!(
        (900..=1000).contains(&result.final_grade),
        "grade {} out of range",
        result.final_grade
    );
    for competency in &result.competency_scores {
        assert!(
            competency.score.points() >= 160,
            "{} scored {}",
            competency.id,
            competency.score
        );
    }
    assert_eq!(result.stats.paragraph_count, 5);
    assert!(result.stats.word_count > 400);
    assert_eq!(result.proposal.elements_found, 5);
    assert!(result.proposal.respects_human_rights);
}

#[test]
fn complete_essay_feedback() {
    let assessment = assess(
        &Engine::default(),
        COMPLETE_ESSAY,
        &RubricTemplate::enem().criteria,
    );

    assert_eq!(assessment.text_quality, TextQuality::High);
    assert!(assessment
        .strengths
        .iter()
        .any(|s| s.starts_with("Excelente:")));
    assert!(assessment.strengths.len() <= 8);
    assert!(assessment.improvements.len() <= 6);
    assert!(!assessment.improvements.is_empty());
    assert_eq!(assessment.criteria_scores.len(), 5);
}

#[test]
fn missing_proposal_slot_is_an_improvement_at_160() {
    let assessment = assess(&Engine::default(), &without_agent(), &[]);

    assert_eq!(assessment.analysis.score(CompetencyId::C5).points(), 160);
    assert!(
        assessment
            .improvements
            .iter()
            .any(|s| s == "Elemento agente não identificado na proposta."),
        "improvements: {:?}",
        assessment.improvements
    );
}

#[test]
fn formal_dai_sentence_keeps_register_score() {
    let engine = Engine::default();
    let clean = engine.analyze(COMPLETE_ESSAY);
    let text = COMPLETE_ESSAY.replacen(
        "sobretudo no que tange ao acesso à educação de qualidade.",
        "sobretudo no que tange ao acesso à educação de qualidade. Daí a relevância do debate.",
        1,
    );
    assert_ne!(text, COMPLETE_ESSAY);

    let result = engine.analyze(&text);
    assert_eq!(result.score(CompetencyId::C1), clean.score(CompetencyId::C1));
}

#[test]
fn short_paragraph_scores_low() {
    let result = Engine::default().analyze(SHORT_PARAGRAPH);

    assert!(result.final_grade <= 400, "grade {}", result.final_grade);
    assert_eq!(result.stats.paragraph_count, 1);
    assert_eq!(result.score(CompetencyId::C1).points(), 80);
    assert_eq!(result.score(CompetencyId::C2).points(), 80);
    assert_eq!(result.score(CompetencyId::C3).points(), 40);
    assert!(result.score(CompetencyId::C4).points() <= 120);
    assert_eq!(result.score(CompetencyId::C5).points(), 0);
}

#[test]
fn short_paragraph_feedback_lists_improvements() {
    let assessment = assess(&Engine::default(), SHORT_PARAGRAPH, &[]);

    assert_eq!(assessment.text_quality, TextQuality::Insufficient);
    assert!(assessment.strengths.is_empty());
    assert!(assessment
        .improvements
        .iter()
        .any(|s| s == "Melhorar: proposta de intervenção"));
    assert!(assessment.criteria_scores.is_empty());
}

#[test]
fn rights_violation_zeroes_proposal() {
    let engine = Engine::default();
    let clean = engine.analyze(COMPLETE_ESSAY);
    let violating = engine.analyze(&with_rights_violation());

    assert_eq!(violating.score(CompetencyId::C5).points(), 0);
    assert!(!violating.proposal.respects_human_rights);
    assert_eq!(violating.proposal.violations, vec!["pena de morte".to_string()]);
    assert_eq!(
        violating.final_grade,
        clean.final_grade - clean.score(CompetencyId::C5).points()
    );

    let warning = violating
        .competency(CompetencyId::C5)
        .observations
        .last()
        .unwrap();
    assert_eq!(warning.tone, Tone::Negative);
    assert!(warning.message.contains("direitos humanos"));
}

#[test]
fn other_competencies_ignore_rights_violation() {
    let engine = Engine::default();
    let clean = engine.analyze(COMPLETE_ESSAY);
    let violating = engine.analyze(&with_rights_violation());

    for id in [CompetencyId::C1, CompetencyId::C2, CompetencyId::C3, CompetencyId::C4] {
        assert_eq!(clean.score(id), violating.score(id), "{id} changed");
    }
}
