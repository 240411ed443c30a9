//! Grading reports with JSON persistence and grade-shift detection.
//!
//! Comparing a fresh report against a baseline graded with an older
//! vocabulary or engine version shows which reference essays moved.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::CompetencyId;
use crate::service::Assessment;
use crate::statistics::{compute_summary, BatchSummary};
use crate::vocabulary::VocabularyMeta;

/// One graded essay inside a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EssayResult {
    /// Stable identifier used to match essays across reports.
    pub essay_id: String,
    /// Where the text came from (a file path, or "stdin").
    pub source: String,
    pub assessment: Assessment,
}

/// A complete grading report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradingReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Vocabulary the essays were graded with.
    pub vocabulary: VocabularyMeta,
    /// Graded essays, ordered by essay id.
    pub essays: Vec<EssayResult>,
    pub summary: BatchSummary,
    /// Total wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

impl GradingReport {
    /// Build a report, sorting essays and computing the summary.
    pub fn new(vocabulary: VocabularyMeta, mut essays: Vec<EssayResult>, duration_ms: u64) -> Self {
        essays.sort_by(|a, b| a.essay_id.cmp(&b.essay_id));
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            vocabulary,
            summary: compute_summary(&essays),
            essays,
            duration_ms,
        }
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: GradingReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Compare this report against a baseline.
    ///
    /// Essays are matched by id. A final-grade change larger than
    /// `threshold` points is a regression or an improvement.
    pub fn compare(&self, baseline: &GradingReport, threshold: f64) -> RegressionReport {
        let index = |report: &GradingReport| -> BTreeMap<String, Assessment> {
            report
                .essays
                .iter()
                .map(|e| (e.essay_id.clone(), e.assessment.clone()))
                .collect()
        };
        let baseline_essays = index(baseline);
        let current_essays = index(self);

        let mut regressions = Vec::new();
        let mut improvements = Vec::new();
        let mut unchanged = 0usize;
        let mut new_essays = 0usize;

        for (essay_id, current) in &current_essays {
            let Some(previous) = baseline_essays.get(essay_id) else {
                new_essays += 1;
                continue;
            };

            let change = GradeChange::between(essay_id, previous, current);
            if f64::from(change.delta) < -threshold {
                regressions.push(change);
            } else if f64::from(change.delta) > threshold {
                improvements.push(change);
            } else {
                unchanged += 1;
            }
        }

        let removed_essays = baseline_essays
            .keys()
            .filter(|k| !current_essays.contains_key(*k))
            .count();

        regressions.sort_by_key(|c| c.delta);
        improvements.sort_by_key(|c| std::cmp::Reverse(c.delta));

        RegressionReport {
            baseline_vocabulary: baseline.vocabulary.clone(),
            current_vocabulary: self.vocabulary.clone(),
            regressions,
            improvements,
            unchanged,
            new_essays,
            removed_essays,
        }
    }
}

/// Result of comparing two reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionReport {
    pub baseline_vocabulary: VocabularyMeta,
    pub current_vocabulary: VocabularyMeta,
    /// Essays whose grade went down, largest drop first.
    pub regressions: Vec<GradeChange>,
    /// Essays whose grade went up, largest gain first.
    pub improvements: Vec<GradeChange>,
    /// Essays with no significant change.
    pub unchanged: usize,
    /// Essays in current but not baseline.
    pub new_essays: usize,
    /// Essays in baseline but not current.
    pub removed_essays: usize,
}

/// How one essay's grade moved between reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeChange {
    pub essay_id: String,
    pub baseline_grade: u16,
    pub current_grade: u16,
    pub delta: i32,
    /// Competencies whose score moved, with the signed change.
    #[serde(default)]
    pub competency_deltas: BTreeMap<CompetencyId, i32>,
}

impl GradeChange {
    fn between(essay_id: &str, baseline: &Assessment, current: &Assessment) -> Self {
        let competency_deltas = CompetencyId::ALL
            .iter()
            .filter_map(|&id| {
                let before = i32::from(baseline.analysis.score(id).points());
                let after = i32::from(current.analysis.score(id).points());
                (before != after).then_some((id, after - before))
            })
            .collect();

        Self {
            essay_id: essay_id.to_string(),
            baseline_grade: baseline.grade(),
            current_grade: current.grade(),
            delta: i32::from(current.grade()) - i32::from(baseline.grade()),
            competency_deltas,
        }
    }

    fn describe_competencies(&self) -> String {
        if self.competency_deltas.is_empty() {
            return "-".to_string();
        }
        self.competency_deltas
            .iter()
            .map(|(id, d)| format!("{id} {d:+}"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl RegressionReport {
    /// Format the comparison as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!(
            "**Vocabulary:** {} v{} -> {} v{}\n\n",
            self.baseline_vocabulary.name,
            self.baseline_vocabulary.version,
            self.current_vocabulary.name,
            self.current_vocabulary.version
        ));
        md.push_str(&format!(
            "**Summary:** {} regressions, {} improvements, {} unchanged, {} new, {} removed\n\n",
            self.regressions.len(),
            self.improvements.len(),
            self.unchanged,
            self.new_essays,
            self.removed_essays
        ));

        for (title, changes) in [
            ("Regressions", &self.regressions),
            ("Improvements", &self.improvements),
        ] {
            if changes.is_empty() {
                continue;
            }
            md.push_str(&format!("### {title}\n\n"));
            md.push_str("| Essay | Baseline | Current | Delta | Competencies |\n");
            md.push_str("|-------|----------|---------|-------|--------------|\n");
            for c in changes {
                md.push_str(&format!(
                    "| {} | {} | {} | {:+} | {} |\n",
                    c.essay_id,
                    c.baseline_grade,
                    c.current_grade,
                    c.delta,
                    c.describe_competencies()
                ));
            }
            md.push('\n');
        }

        md
    }

    /// Returns true if there are any regressions.
    pub fn has_regressions(&self) -> bool {
        !self.regressions.is_empty()
    }
}
