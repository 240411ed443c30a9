//! Feedback aggregation: strengths, improvements, and text quality.

use serde::{Deserialize, Serialize};

use crate::model::{AnalysisResult, Band, Tone};

/// Maximum strengths kept.
pub const MAX_STRENGTHS: usize = 8;
/// Maximum improvements kept.
pub const MAX_IMPROVEMENTS: usize = 6;

/// Bands at or above this value count as a strength.
const STRENGTH_BAND: u16 = 160;
/// Word count that earns the length strength when nothing else does.
const ADEQUATE_LENGTH_WORDS: usize = 300;

/// Student-facing summary derived from an analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
}

/// Build the strengths and improvements lists for an analysis.
pub fn aggregate(result: &AnalysisResult) -> Feedback {
    let mut strengths = Vec::new();
    let mut improvements = Vec::new();
    let strength_band = Band::floor(STRENGTH_BAND);

    for competency in &result.competency_scores {
        let name = competency.id.short_label();
        let strong = competency.score >= strength_band;

        if competency.score == Band::MAX {
            strengths.push(format!("Excelente: {name}"));
        } else if strong {
            strengths.push(format!("Muito bom: {name}"));
        } else {
            improvements.push(format!("Melhorar: {name}"));
        }

        for observation in &competency.observations {
            match observation.tone {
                Tone::Positive if strong => strengths.push(observation.message.clone()),
                Tone::Negative => improvements.push(observation.message.clone()),
                Tone::Neutral if !strong => improvements.push(observation.message.clone()),
                _ => {}
            }
        }
    }

    let mut strengths = dedup(strengths);
    let mut improvements = dedup(improvements);

    if strengths.is_empty() {
        if result.stats.paragraph_count >= 3 {
            strengths.push("Texto apresenta estrutura dissertativo-argumentativa.".to_string());
        }
        if result.stats.word_count >= ADEQUATE_LENGTH_WORDS {
            strengths.push("Extensão adequada para desenvolvimento completo.".to_string());
        }
    }
    if improvements.is_empty() {
        improvements.push("Continue praticando para aperfeiçoar ainda mais a técnica.".to_string());
    }

    strengths.truncate(MAX_STRENGTHS);
    improvements.truncate(MAX_IMPROVEMENTS);

    Feedback {
        strengths,
        improvements,
    }
}

/// Remove repeated messages, keeping first occurrences in order.
fn dedup(items: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}
