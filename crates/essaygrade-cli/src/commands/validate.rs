//! The `essaygrade validate` command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use essaygrade_core::rubric::{validate_rubric, RubricTemplate};
use essaygrade_core::vocabulary::{parse_raw_vocabulary, validate_vocabulary, Lexicon};

pub fn execute(vocabulary: Option<PathBuf>, rubric: Option<PathBuf>) -> Result<()> {
    anyhow::ensure!(
        vocabulary.is_some() || rubric.is_some(),
        "nothing to validate: pass --vocabulary and/or --rubric"
    );

    let mut total_warnings = 0;

    if let Some(path) = &vocabulary {
        total_warnings += check_vocabulary(path)?;
    }
    if let Some(path) = &rubric {
        total_warnings += check_rubric(path)?;
    }

    if total_warnings == 0 {
        println!("All files valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}

fn check_vocabulary(path: &Path) -> Result<usize> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read vocabulary: {}", path.display()))?;
    let raw = parse_raw_vocabulary(&content)
        .with_context(|| format!("invalid vocabulary: {}", path.display()))?;
    let warnings = validate_vocabulary(&raw);
    let lexicon = Lexicon::from_raw(raw)
        .with_context(|| format!("invalid vocabulary: {}", path.display()))?;

    println!(
        "Vocabulary: {} v{} ({} repertoire categories, {} connective categories)",
        lexicon.meta.name,
        lexicon.meta.version,
        lexicon.repertoire.len(),
        lexicon.connectives.len()
    );
    for w in &warnings {
        println!("  [{}] WARNING: {}", w.set, w.message);
    }
    Ok(warnings.len())
}

fn check_rubric(path: &Path) -> Result<usize> {
    let template = RubricTemplate::load(path)
        .with_context(|| format!("invalid rubric: {}", path.display()))?;

    println!(
        "Rubric: {} ({} criteria)",
        template.name,
        template.criteria.len()
    );
    let warnings = validate_rubric(&template);
    for w in &warnings {
        let prefix = w
            .criterion
            .as_ref()
            .map(|name| format!("  [{name}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }
    Ok(warnings.len())
}
