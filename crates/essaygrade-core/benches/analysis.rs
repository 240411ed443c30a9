use criterion::{black_box, criterion_group, criterion_main, Criterion};

use essaygrade_core::rubric::RubricTemplate;
use essaygrade_core::vocabulary::{Lexicon, EMBEDDED_VOCABULARY};
use essaygrade_core::{assess, Engine};

const COMPLETE_ESSAY: &str = include_str!("../tests/fixtures/complete_essay.txt");
const SHORT_PARAGRAPH: &str = include_str!("../tests/fixtures/short_paragraph.txt");

fn bench_analyze(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyze");
    let engine = Engine::default();
    let long = format!("{COMPLETE_ESSAY}\n\n").repeat(4);

    group.bench_function("complete_essay", |b| {
        b.iter(|| engine.analyze(black_box(COMPLETE_ESSAY)))
    });

    group.bench_function("short_paragraph", |b| {
        b.iter(|| engine.analyze(black_box(SHORT_PARAGRAPH)))
    });

    group.bench_function("below_minimum", |b| {
        b.iter(|| engine.analyze(black_box("Texto curto demais.")))
    });

    group.bench_function("four_essays_concatenated", |b| {
        b.iter(|| engine.analyze(black_box(&long)))
    });

    group.finish();
}

fn bench_assess(c: &mut Criterion) {
    let engine = Engine::default();
    let criteria = RubricTemplate::enem().criteria;

    c.bench_function("assess/complete_essay", |b| {
        b.iter(|| assess(&engine, black_box(COMPLETE_ESSAY), &criteria))
    });
}

fn bench_vocabulary(c: &mut Criterion) {
    c.bench_function("vocabulary/parse_embedded", |b| {
        b.iter(|| Lexicon::from_toml_str(black_box(EMBEDDED_VOCABULARY)))
    });
}

criterion_group!(benches, bench_analyze, bench_assess, bench_vocabulary);
criterion_main!(benches);
