//! The `essaygrade batch` command.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use essaygrade_core::batch::{grade_batch, EssayInput, ProgressReporter};
use essaygrade_core::report::{EssayResult, GradingReport};
use essaygrade_core::rubric::GradeScale;
use essaygrade_core::CompetencyId;

use crate::config::load_config_from;

/// Console progress reporter.
struct ConsoleReporter {
    scale: GradeScale,
}

impl ProgressReporter for ConsoleReporter {
    fn on_essay_start(&self, essay_id: &str) {
        tracing::debug!("queued {essay_id}");
    }

    fn on_essay_complete(&self, result: &EssayResult) {
        let status = if result.assessment.is_fallback() {
            "FALLBACK"
        } else {
            "OK"
        };
        eprintln!(
            "  Done: {} [{}] {}",
            result.essay_id,
            status,
            self.scale.format(result.assessment.grade())
        );
    }

    fn on_essay_error(&self, essay_id: &str, error: &str) {
        eprintln!("  ERROR: {essay_id}: {error}");
    }

    fn on_batch_complete(&self, total: usize, completed: usize, failed: usize, elapsed: Duration) {
        eprintln!(
            "\nComplete: {completed}/{total} graded, {failed} failed ({:.1}s)",
            elapsed.as_secs_f64()
        );
    }
}

pub async fn execute(
    dir: PathBuf,
    parallelism: Option<usize>,
    output: Option<PathBuf>,
    rubric: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let parallelism = parallelism.unwrap_or(config.parallelism);
    anyhow::ensure!(parallelism >= 1, "parallelism must be at least 1");
    let output = output.unwrap_or_else(|| config.output_dir.clone());

    let engine = config.build_engine()?;
    let criteria = config.criteria(rubric.as_deref())?;
    let essays = load_essays(&dir)?;
    anyhow::ensure!(
        !essays.is_empty(),
        "no .txt essays found in {}",
        dir.display()
    );

    let meta = &engine.lexicon().meta;
    eprintln!(
        "essaygrade v{}: grading {} essays with {} v{}",
        env!("CARGO_PKG_VERSION"),
        essays.len(),
        meta.name,
        meta.version
    );
    eprintln!();

    let reporter = ConsoleReporter {
        scale: config.grade_scale,
    };
    let report = grade_batch(&engine, essays, &criteria, parallelism, &reporter).await?;

    print_summary(&report, config.grade_scale);

    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H%M%S");
    let path = output.join(format!("report-{timestamp}.json"));
    report.save_json(&path)?;
    eprintln!("Results saved to: {}", path.display());

    Ok(())
}

/// Read every `.txt` file in `dir`, sorted by name. Unreadable files are
/// skipped with a warning.
fn load_essays(dir: &Path) -> Result<Vec<EssayInput>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "txt"))
        .collect();
    paths.sort();

    let mut essays = Vec::new();
    for path in paths {
        match std::fs::read_to_string(&path) {
            Ok(text) => {
                let essay_id = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default();
                essays.push(EssayInput {
                    essay_id,
                    source: path.display().to_string(),
                    text,
                });
            }
            Err(e) => tracing::warn!("skipping {}: {}", path.display(), e),
        }
    }
    Ok(essays)
}

fn print_summary(report: &GradingReport, scale: GradeScale) {
    let mut table = Table::new();
    let mut header = vec!["Essay".to_string(), "Grade".to_string()];
    header.extend(CompetencyId::ALL.iter().map(|id| id.to_string()));
    header.push("Quality".to_string());
    table.set_header(header);

    for essay in &report.essays {
        let analysis = &essay.assessment.analysis;
        let mut row = vec![
            Cell::new(&essay.essay_id),
            Cell::new(scale.format(analysis.final_grade)),
        ];
        row.extend(
            analysis
                .competency_scores
                .iter()
                .map(|c| Cell::new(c.score)),
        );
        row.push(Cell::new(essay.assessment.text_quality));
        table.add_row(row);
    }

    let summary = &report.summary;
    eprintln!("\n{table}");
    eprintln!(
        "Mean {:.1} | median {:.1} | min {} | max {} | std dev {:.1}",
        summary.mean_grade,
        summary.median_grade,
        summary.min_grade,
        summary.max_grade,
        summary.std_dev
    );
    if summary.fallback_count > 0 {
        eprintln!("{} essay(s) graded by fallback", summary.fallback_count);
    }
}
