//! Aggregate statistics over a batch of graded essays.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{CompetencyId, TextQuality};
use crate::report::EssayResult;

/// Summary of a graded batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub essay_count: usize,
    pub mean_grade: f64,
    pub median_grade: f64,
    pub min_grade: u16,
    pub max_grade: u16,
    /// Population standard deviation of the final grades.
    pub std_dev: f64,
    /// Mean score per competency.
    pub competency_means: BTreeMap<CompetencyId, f64>,
    /// Number of essays in each text-quality tier.
    pub quality_distribution: BTreeMap<TextQuality, usize>,
    /// Essays graded by the fallback after an analysis fault.
    #[serde(default)]
    pub fallback_count: usize,
}

/// Median of a sorted slice (0 when empty).
fn median(sorted: &[f64]) -> f64 {
    match sorted.len() {
        0 => 0.0,
        n if n % 2 == 1 => sorted[n / 2],
        n => (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0,
    }
}

/// Compute summary statistics for graded essays.
pub fn compute_summary(essays: &[EssayResult]) -> BatchSummary {
    if essays.is_empty() {
        return BatchSummary::default();
    }

    let n = essays.len() as f64;
    let mut grades: Vec<f64> = essays.iter().map(|e| f64::from(e.assessment.grade())).collect();
    grades.sort_by(|a, b| a.total_cmp(b));

    let mean = grades.iter().sum::<f64>() / n;
    let variance = grades.iter().map(|g| (g - mean).powi(2)).sum::<f64>() / n;

    let competency_means = CompetencyId::ALL
        .iter()
        .map(|&id| {
            let total: f64 = essays
                .iter()
                .map(|e| f64::from(e.assessment.analysis.score(id).points()))
                .sum();
            (id, total / n)
        })
        .collect();

    let mut quality_distribution = BTreeMap::new();
    for essay in essays {
        *quality_distribution
            .entry(essay.assessment.text_quality)
            .or_insert(0) += 1;
    }

    BatchSummary {
        essay_count: essays.len(),
        mean_grade: mean,
        median_grade: median(&grades),
        min_grade: essays.iter().map(|e| e.assessment.grade()).min().unwrap_or(0),
        max_grade: essays.iter().map(|e| e.assessment.grade()).max().unwrap_or(0),
        std_dev: variance.sqrt(),
        competency_means,
        quality_distribution,
        fallback_count: essays.iter().filter(|e| e.assessment.is_fallback()).count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::testing::essay;

    #[test]
    fn empty_batch() {
        let summary = compute_summary(&[]);
        assert_eq!(summary.essay_count, 0);
        assert_eq!(summary.mean_grade, 0.0);
        assert!(summary.competency_means.is_empty());
    }

    #[test]
    fn grades_and_competency_means() {
        let essays = vec![
            essay("a", [200, 200, 200, 200, 200]),
            essay("b", [120, 120, 80, 80, 0]),
            essay("c", [160, 160, 160, 160, 160]),
        ];
        let summary = compute_summary(&essays);

        assert_eq!(summary.essay_count, 3);
        assert_eq!(summary.min_grade, 400);
        assert_eq!(summary.max_grade, 1000);
        assert_eq!(summary.median_grade, 800.0);
        assert!((summary.mean_grade - 733.333).abs() < 0.01);
        assert!((summary.competency_means[&CompetencyId::C1] - 160.0).abs() < f64::EPSILON);
        assert!((summary.competency_means[&CompetencyId::C5] - 120.0).abs() < f64::EPSILON);
    }

    #[test]
    fn median_of_even_count() {
        assert_eq!(median(&[100.0, 200.0, 600.0, 800.0]), 400.0);
    }

    #[test]
    fn quality_distribution_counts_tiers() {
        let essays = vec![essay("a", [200; 5]), essay("b", [200; 5])];
        let summary = compute_summary(&essays);
        assert_eq!(summary.quality_distribution[&TextQuality::High], 2);
        assert_eq!(summary.fallback_count, 0);
    }
}
