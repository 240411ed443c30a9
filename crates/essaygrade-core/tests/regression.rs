//! Report comparison workflow: grade, save, reload, and compare.

use essaygrade_core::batch::{grade_batch, EssayInput, NoopReporter};
use essaygrade_core::report::GradingReport;
use essaygrade_core::vocabulary::{Lexicon, EMBEDDED_VOCABULARY};
use essaygrade_core::{Engine, EngineConfig};

const COMPLETE_ESSAY: &str = include_str!("fixtures/complete_essay.txt");
const SHORT_PARAGRAPH: &str = include_str!("fixtures/short_paragraph.txt");

fn inputs() -> Vec<EssayInput> {
    vec![
        EssayInput {
            essay_id: "complete".into(),
            source: "fixtures/complete_essay.txt".into(),
            text: COMPLETE_ESSAY.into(),
        },
        EssayInput {
            essay_id: "short".into(),
            source: "fixtures/short_paragraph.txt".into(),
            text: SHORT_PARAGRAPH.into(),
        },
    ]
}

#[tokio::test]
async fn same_engine_reports_no_changes() {
    let engine = Engine::default();
    let baseline = grade_batch(&engine, inputs(), &[], 2, &NoopReporter)
        .await
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("baseline.json");
    baseline.save_json(&path).unwrap();
    let loaded = GradingReport::load_json(&path).unwrap();

    let current = grade_batch(&engine, inputs(), &[], 2, &NoopReporter)
        .await
        .unwrap();
    let comparison = current.compare(&loaded, 0.0);

    assert!(!comparison.has_regressions());
    assert!(comparison.improvements.is_empty());
    assert_eq!(comparison.unchanged, 2);
    assert_eq!(comparison.new_essays, 0);
    assert_eq!(comparison.removed_essays, 0);
}

#[tokio::test]
async fn vocabulary_change_is_detected() {
    let baseline = grade_batch(&Engine::default(), inputs(), &[], 2, &NoopReporter)
        .await
        .unwrap();

    // Dropping "a fim de" and "para" leaves the complete essay's proposal without a purpose slot.
    let trimmed = EMBEDDED_VOCABULARY
        .replace("version = \"2024.3\"", "version = \"test\"")
        .replace("\"a fim de\", ", "")
        .replace("\"para\",", "");
    let lexicon = Lexicon::from_toml_str(&trimmed).unwrap();
    let engine = Engine::new(lexicon.into(), EngineConfig::default());
    let current = grade_batch(&engine, inputs(), &[], 2, &NoopReporter)
        .await
        .unwrap();

    let comparison = current.compare(&baseline, 0.0);
    assert!(comparison.has_regressions());
    assert_eq!(comparison.regressions[0].essay_id, "complete");
    assert_eq!(comparison.regressions[0].delta, -40);
    assert_eq!(comparison.unchanged, 1);

    let md = comparison.to_markdown();
    assert!(md.contains("enem v2024.3 -> enem vtest"));
    assert!(md.contains("C5 -40"));
}
