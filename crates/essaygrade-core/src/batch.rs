//! Concurrent grading of many essays.
//!
//! Analysis is CPU-bound, so each essay runs on the blocking pool; a
//! semaphore bounds how many run at once.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::Semaphore;

use crate::engine::Engine;
use crate::report::{EssayResult, GradingReport};
use crate::rubric::Criterion;
use crate::service::assess;

/// An essay waiting to be graded.
#[derive(Debug, Clone)]
pub struct EssayInput {
    pub essay_id: String,
    pub source: String,
    pub text: String,
}

/// Progress reporting trait.
pub trait ProgressReporter: Send + Sync {
    fn on_essay_start(&self, essay_id: &str);
    fn on_essay_complete(&self, result: &EssayResult);
    fn on_essay_error(&self, essay_id: &str, error: &str);
    fn on_batch_complete(&self, total: usize, completed: usize, failed: usize, elapsed: Duration);
}

/// No-op progress reporter.
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn on_essay_start(&self, _: &str) {}
    fn on_essay_complete(&self, _: &EssayResult) {}
    fn on_essay_error(&self, _: &str, _: &str) {}
    fn on_batch_complete(&self, _: usize, _: usize, _: usize, _: Duration) {}
}

/// Grade every essay with at most `parallelism` running at once.
///
/// Essays whose task could not complete are logged, reported to `progress`,
/// and left out of the report.
pub async fn grade_batch(
    engine: &Engine,
    essays: Vec<EssayInput>,
    criteria: &[Criterion],
    parallelism: usize,
    progress: &dyn ProgressReporter,
) -> Result<GradingReport> {
    let start = Instant::now();
    let semaphore = Arc::new(Semaphore::new(parallelism.max(1)));
    let criteria: Arc<[Criterion]> = criteria.into();

    let mut futures = FuturesUnordered::new();

    for essay in essays {
        progress.on_essay_start(&essay.essay_id);
        let engine = engine.clone();
        let semaphore = Arc::clone(&semaphore);
        let criteria = Arc::clone(&criteria);

        futures.push(async move {
            let essay_id = essay.essay_id.clone();
            let inner = async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|_| anyhow::anyhow!("semaphore closed"))?;

                let assessment =
                    tokio::task::spawn_blocking(move || assess(&engine, &essay.text, &criteria))
                        .await?;

                Ok::<_, anyhow::Error>(EssayResult {
                    essay_id: essay.essay_id,
                    source: essay.source,
                    assessment,
                })
            };
            (essay_id, inner.await)
        });
    }

    let mut results = Vec::new();
    let mut completed = 0usize;
    let mut failed = 0usize;
    let total = futures.len();

    while let Some((essay_id, result)) = futures.next().await {
        match result {
            Ok(essay_result) => {
                if essay_result.assessment.is_fallback() {
                    tracing::warn!("essay {essay_id} graded by fallback");
                }
                progress.on_essay_complete(&essay_result);
                results.push(essay_result);
                completed += 1;
            }
            Err(e) => {
                tracing::error!("grading failed for {essay_id}: {e:#}");
                progress.on_essay_error(&essay_id, &e.to_string());
                failed += 1;
            }
        }
    }

    let elapsed = start.elapsed();
    progress.on_batch_complete(total, completed, failed, elapsed);
    tracing::info!(
        "graded {completed}/{total} essays in {}ms",
        elapsed.as_millis()
    );

    Ok(GradingReport::new(
        engine.lexicon().meta.clone(),
        results,
        elapsed.as_millis() as u64,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingReporter {
        completed: AtomicUsize,
        batches: AtomicUsize,
    }

    impl ProgressReporter for CountingReporter {
        fn on_essay_start(&self, _: &str) {}
        fn on_essay_complete(&self, _: &EssayResult) {
            self.completed.fetch_add(1, Ordering::SeqCst);
        }
        fn on_essay_error(&self, _: &str, _: &str) {}
        fn on_batch_complete(&self, total: usize, completed: usize, failed: usize, _: Duration) {
            assert_eq!(total, completed + failed);
            self.batches.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn input(id: &str, text: &str) -> EssayInput {
        EssayInput {
            essay_id: id.into(),
            source: format!("{id}.txt"),
            text: text.into(),
        }
    }

    #[tokio::test]
    async fn grades_all_essays_in_id_order() {
        let essays = vec![
            input("c", "curto"),
            input("a", &"A educação transforma a sociedade brasileira. ".repeat(10)),
            input("b", ""),
        ];
        let reporter = CountingReporter::default();
        let report = grade_batch(&Engine::default(), essays, &[], 2, &reporter)
            .await
            .unwrap();

        let ids: Vec<&str> = report.essays.iter().map(|e| e.essay_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(report.summary.essay_count, 3);
        assert_eq!(report.vocabulary.name, "enem");
        assert_eq!(reporter.completed.load(Ordering::SeqCst), 3);
        assert_eq!(reporter.batches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn batch_matches_sequential_analysis() {
        let text = "Primeiramente, é inegável que a leitura importa.\n\n\
                    Segundo Paulo Freire, a educação liberta. Isso porque o saber emancipa.\n\n\
                    Portanto, o governo deve criar programas de leitura por meio de escolas \
                    públicas a fim de garantir o acesso ao conhecimento para todos os jovens.";
        let engine = Engine::default();
        let report = grade_batch(&engine, vec![input("x", text)], &[], 0, &NoopReporter)
            .await
            .unwrap();
        assert_eq!(report.essays[0].assessment.analysis, engine.analyze(text));
    }

    #[tokio::test]
    async fn empty_batch() {
        let report = grade_batch(&Engine::default(), vec![], &[], 4, &NoopReporter)
            .await
            .unwrap();
        assert!(report.essays.is_empty());
        assert_eq!(report.summary.essay_count, 0);
    }
}
