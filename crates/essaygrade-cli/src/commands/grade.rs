//! The `essaygrade grade` command.

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use essaygrade_core::rubric::GradeScale;
use essaygrade_core::{assess, Assessment};

use crate::config::load_config_from;

pub fn execute(
    file: Option<PathBuf>,
    format: String,
    rubric: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let engine = config.build_engine()?;
    let criteria = config.criteria(rubric.as_deref())?;

    let (source, text) = match &file {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read essay: {}", path.display()))?;
            (path.display().to_string(), text)
        }
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("failed to read essay from stdin")?;
            ("stdin".to_string(), text)
        }
    };

    let assessment = assess(&engine, &text, &criteria);

    match format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&assessment)?),
        "text" => {
            let meta = &engine.lexicon().meta;
            println!("{source} (vocabulary {} v{})\n", meta.name, meta.version);
            print_assessment(&assessment, config.grade_scale);
        }
        other => anyhow::bail!("unknown format '{other}', expected text or json"),
    }

    Ok(())
}

fn print_assessment(assessment: &Assessment, scale: GradeScale) {
    let analysis = &assessment.analysis;

    let mut table = Table::new();
    table.set_header(vec!["Competency", "Area", "Score"]);
    for competency in &analysis.competency_scores {
        table.add_row(vec![
            Cell::new(competency.id),
            Cell::new(competency.id.short_label()),
            Cell::new(competency.score),
        ]);
    }
    println!("{table}\n");

    println!("Final grade: {}", scale.format(analysis.final_grade));
    println!(
        "Text quality: {} ({} words, {} paragraphs)",
        assessment.text_quality, analysis.stats.word_count, analysis.stats.paragraph_count
    );
    if let Some(error) = &assessment.error {
        println!("Warning: automatic analysis failed ({error})");
    }

    if !assessment.criteria_scores.is_empty() {
        println!("\nCriteria:");
        for criterion in &assessment.criteria_scores {
            println!(
                "  {}: {}/{} (weight {}%)",
                criterion.name,
                format_points(criterion.score),
                criterion.max_points,
                format_points(criterion.weight * 100.0)
            );
        }
    }

    for (title, items) in [
        ("Strengths", &assessment.strengths),
        ("Improvements", &assessment.improvements),
    ] {
        if items.is_empty() {
            continue;
        }
        println!("\n{title}:");
        for item in items {
            println!("  - {item}");
        }
    }
}

/// One decimal place, dropped for whole numbers.
fn format_points(value: f64) -> String {
    let rounded = (value * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{rounded:.0}")
    } else {
        format!("{rounded:.1}")
    }
}
