//! Guarded assessment: analysis plus feedback, with a zero-score fallback.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use serde::{Deserialize, Serialize};

use crate::engine::Engine;
use crate::feedback::aggregate;
use crate::model::{
    AnalysisResult, Band, CompetencyId, CompetencyScore, DocumentStats, Observation,
    ProposalElements, TextQuality,
};
use crate::rubric::{present, Criterion, CriterionScore};

/// Everything a caller shows for one essay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub analysis: AnalysisResult,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub text_quality: TextQuality,
    #[serde(default)]
    pub criteria_scores: Vec<CriterionScore>,
    /// Set when analysis faulted and the zero-score fallback was used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Assessment {
    pub fn grade(&self) -> u16 {
        self.analysis.final_grade
    }

    pub fn is_fallback(&self) -> bool {
        self.error.is_some()
    }
}

/// Analyze `text` and build feedback, never failing.
///
/// A fault inside the engine is caught and replaced by a zero-score
/// assessment that says analysis failed.
pub fn assess(engine: &Engine, text: &str, criteria: &[Criterion]) -> Assessment {
    guarded(text, criteria, |t| engine.analyze(t))
}

fn guarded(
    text: &str,
    criteria: &[Criterion],
    analyze: impl FnOnce(&str) -> AnalysisResult,
) -> Assessment {
    match panic::catch_unwind(AssertUnwindSafe(|| analyze(text))) {
        Ok(analysis) => {
            let feedback = aggregate(&analysis);
            Assessment {
                text_quality: TextQuality::from_word_count(analysis.stats.word_count),
                criteria_scores: present(&analysis, criteria),
                strengths: feedback.strengths,
                improvements: feedback.improvements,
                analysis,
                error: None,
            }
        }
        Err(payload) => {
            let reason = panic_message(payload.as_ref());
            tracing::warn!("analysis failed, using fallback assessment: {reason}");
            fallback(text, criteria, reason)
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown error".to_string()
    }
}

/// Zero-score assessment used when analysis faults.
fn fallback(text: &str, criteria: &[Criterion], reason: String) -> Assessment {
    let word_count = text.split_whitespace().count();
    let scores = CompetencyId::ALL.map(|id| {
        CompetencyScore::new(
            id,
            Band::ZERO,
            vec![Observation::negative("Erro na análise automática desta competência.")],
        )
    });
    let analysis = AnalysisResult::new(
        scores,
        ProposalElements::empty(),
        DocumentStats {
            word_count,
            ..DocumentStats::default()
        },
    );

    Assessment {
        text_quality: TextQuality::from_word_count(word_count),
        criteria_scores: present(&analysis, criteria),
        strengths: Vec::new(),
        improvements: vec![
            "Erro na análise da redação.".to_string(),
            "Revise o texto enviado e tente novamente.".to_string(),
        ],
        analysis,
        error: Some(reason),
    }
}
