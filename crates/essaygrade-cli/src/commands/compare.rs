//! The `essaygrade compare` command.

use std::path::PathBuf;

use anyhow::Result;

use essaygrade_core::report::{GradeChange, GradingReport};

pub fn execute(
    baseline_path: PathBuf,
    current_path: PathBuf,
    threshold: f64,
    fail_on_regression: bool,
    format: String,
) -> Result<()> {
    anyhow::ensure!(
        threshold.is_finite() && threshold >= 0.0,
        "threshold must be a non-negative number of points"
    );

    let baseline = GradingReport::load_json(&baseline_path)?;
    let current = GradingReport::load_json(&current_path)?;

    let report = current.compare(&baseline, threshold);

    match format.as_str() {
        "markdown" | "md" => {
            println!("{}", report.to_markdown());
        }
        "json" => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        _ => {
            println!(
                "Comparison: {} regressions, {} improvements, {} unchanged",
                report.regressions.len(),
                report.improvements.len(),
                report.unchanged
            );
            if report.baseline_vocabulary != report.current_vocabulary {
                println!(
                    "Vocabulary: {} v{} -> {} v{}",
                    report.baseline_vocabulary.name,
                    report.baseline_vocabulary.version,
                    report.current_vocabulary.name,
                    report.current_vocabulary.version
                );
            }

            for (title, changes) in [
                ("Regressions", &report.regressions),
                ("Improvements", &report.improvements),
            ] {
                if changes.is_empty() {
                    continue;
                }
                println!("\n{title}:");
                for change in changes {
                    println!("  {}", describe(change));
                }
            }

            if report.new_essays > 0 {
                println!("\n{} new essay(s)", report.new_essays);
            }
            if report.removed_essays > 0 {
                println!("{} removed essay(s)", report.removed_essays);
            }
        }
    }

    if fail_on_regression && report.has_regressions() {
        std::process::exit(1);
    }

    Ok(())
}

fn describe(change: &GradeChange) -> String {
    let mut line = format!(
        "{} {} -> {} ({:+})",
        change.essay_id, change.baseline_grade, change.current_grade, change.delta
    );
    if !change.competency_deltas.is_empty() {
        let parts: Vec<String> = change
            .competency_deltas
            .iter()
            .map(|(id, d)| format!("{id} {d:+}"))
            .collect();
        line.push_str(&format!(" [{}]", parts.join(", ")));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use essaygrade_core::CompetencyId;

    #[test]
    fn describes_competency_moves() {
        let change = GradeChange {
            essay_id: "redacao-01".into(),
            baseline_grade: 880,
            current_grade: 840,
            delta: -40,
            competency_deltas: [(CompetencyId::C5, -40)].into_iter().collect(),
        };
        assert_eq!(describe(&change), "redacao-01 880 -> 840 (-40) [C5 -40]");
    }
}
