//! C2: theme comprehension and sociocultural repertoire.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{list_terms, AnalysisContext, CompetencyEvaluator};
use crate::model::{Band, CompetencyId, CompetencyScore, Observation};

/// Text between straight, curly, or angle quotes, at least three characters long.
static QUOTATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"["“«][^"“”«»\n]{3,}["”»]"#).unwrap());

/// Numbers with a unit (percent, thousands, millions, years) or spelled-out
/// proportions. Bare numbers such as years are not statistics.
static STATISTIC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\d+(?:[.,]\d+)?\s*(?:%|por\s+cento\b|porcento\b|mil\b|milh(?:ão|ões|ao|oes)\b|bilh(?:ão|ões|ao|oes)\b|anos?\b)|\bmetade\b|\bum terço\b",
    )
    .unwrap()
});

/// Legal or institutional references, matched on folded text.
static LEGAL_REFERENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(?:lei|leis|artigo|art|constituicao|decreto|estatuto|codigo|emenda constitucional|jurisprudencia|tratado)\b",
    )
    .unwrap()
});

/// Counts repertoire categories and supporting evidence.
#[derive(Debug, Clone, Copy, Default)]
pub struct Repertoire;

impl CompetencyEvaluator for Repertoire {
    fn id(&self) -> CompetencyId {
        CompetencyId::C2
    }

    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> CompetencyScore {
        let mut observations = Vec::new();

        let mut categories = 0usize;
        let mut sample: Vec<String> = Vec::new();
        for set in &ctx.lexicon.repertoire {
            let found = ctx.text().find(set);
            if !found.is_empty() {
                categories += 1;
                sample.extend(found.sample(1).into_iter().map(str::to_string));
            }
        }

        let has_quote = QUOTATION.is_match(&ctx.doc.raw);
        let has_statistic = STATISTIC.is_match(&ctx.doc.raw);
        let has_legal = LEGAL_REFERENCE.is_match(&ctx.doc.folded);
        let signal = categories + has_quote as usize + has_statistic as usize + has_legal as usize;

        let mut score = match signal {
            s if s >= 3 => Band::MAX,
            2 => Band::floor(160),
            _ => Band::floor(120),
        };

        match categories {
            0 => observations.push(Observation::negative("Repertório sociocultural limitado.")),
            1 => observations.push(Observation::neutral(format!(
                "Repertório sociocultural adequado ({}); amplie com referências de outras áreas.",
                list_terms(sample.iter().map(String::as_str), 1)
            ))),
            2 => observations.push(Observation::positive(format!(
                "Repertório sociocultural muito bom: {}.",
                list_terms(sample.iter().map(String::as_str), 2)
            ))),
            _ => observations.push(Observation::positive(format!(
                "Repertório sociocultural excepcional: {}.",
                list_terms(sample.iter().map(String::as_str), 3)
            ))),
        }
        if has_quote {
            observations.push(Observation::positive("Uso de citação direta como argumento de autoridade."));
        }
        if has_statistic {
            observations.push(Observation::positive("Dados numéricos fundamentam a discussão."));
        }
        if has_legal {
            observations.push(Observation::positive("Referência a legislação ou instituições."));
        }

        if ctx.doc.development().is_empty() {
            score = score.min(Band::floor(80));
            observations.push(Observation::negative(
                "Estrutura dissertativo-argumentativa deficiente: faltam parágrafos de desenvolvimento.",
            ));
        } else if ctx.doc.paragraph_count() >= 4 {
            score = score.max(Band::floor(120));
            observations.push(Observation::positive(
                "Estrutura dissertativo-argumentativa adequada.",
            ));
        }

        tracing::debug!(categories, has_quote, has_statistic, has_legal, %score, "C2 evaluated");
        CompetencyScore::new(self.id(), score, observations)
    }
}
