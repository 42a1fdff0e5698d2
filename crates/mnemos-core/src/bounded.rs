//! Bounded-time calls into external capabilities.
//!
//! Capabilities are synchronous trait objects that may block on the network.
//! Each call runs on a short-lived worker thread that hands its result back
//! over a `bounded(1)` channel; the caller waits at most `timeout`. A call
//! that overruns is abandoned: its thread finishes in the background and the
//! result is dropped.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::RecvTimeoutError;
use tracing::warn;

use crate::errors::{ExternalServiceError, MnemosResult};
use crate::traits::{IEmbeddingProvider, IImportanceScorer, ISummarizer, ITopicExtractor};

pub const EMBED: &str = "embed";
pub const SCORE_IMPORTANCE: &str = "score_importance";
pub const EXTRACT_TOPICS: &str = "extract_topics";
pub const SUMMARIZE: &str = "summarize";

/// Run `f` on a worker thread and wait at most `timeout` for its result.
pub fn call_bounded<T, F>(capability: &'static str, timeout: Duration, f: F) -> MnemosResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> MnemosResult<T> + Send + 'static,
{
    let (tx, rx) = crossbeam_channel::bounded(1);
    thread::Builder::new()
        .name(format!("mnemos-{capability}"))
        .spawn(move || {
            // Receiver may be gone after a timeout.
            let _ = tx.send(f());
        })
        .map_err(|e| ExternalServiceError::unavailable(capability, e.to_string()))?;

    match rx.recv_timeout(timeout) {
        Ok(result) => result,
        Err(RecvTimeoutError::Timeout) => {
            let timeout_ms = timeout.as_millis() as u64;
            warn!(capability, timeout_ms, "capability call timed out");
            Err(ExternalServiceError::Timeout {
                capability: capability.to_string(),
                timeout_ms,
            }
            .into())
        }
        Err(RecvTimeoutError::Disconnected) => Err(ExternalServiceError::unavailable(
            capability,
            "worker exited without a result",
        )
        .into()),
    }
}

/// Embed `text`. The vector must have the provider's fixed dimension and
/// only finite components.
pub fn embed(
    provider: &Arc<dyn IEmbeddingProvider>,
    text: &str,
    timeout: Duration,
) -> MnemosResult<Vec<f32>> {
    let dims = provider.dimensions();
    let provider = Arc::clone(provider);
    let text = text.to_string();
    let vector = call_bounded(EMBED, timeout, move || provider.embed(&text))?;
    check_embedding(&vector, dims)?;
    Ok(vector)
}

fn check_embedding(vector: &[f32], dims: usize) -> MnemosResult<()> {
    if vector.is_empty() || vector.len() != dims {
        return Err(ExternalServiceError::invalid_response(
            EMBED,
            format!("expected {dims} dimensions, got {}", vector.len()),
        )
        .into());
    }
    if vector.iter().any(|x| !x.is_finite()) {
        return Err(
            ExternalServiceError::invalid_response(EMBED, "non-finite component").into(),
        );
    }
    Ok(())
}

/// Score and clamp into [0.0, 1.0].
pub fn score_importance(
    scorer: &Arc<dyn IImportanceScorer>,
    text: &str,
    context: Option<&str>,
    timeout: Duration,
) -> MnemosResult<f64> {
    let scorer = Arc::clone(scorer);
    let text = text.to_string();
    let context = context.map(str::to_string);
    let raw = call_bounded(SCORE_IMPORTANCE, timeout, move || {
        scorer.score(&text, context.as_deref())
    })?;
    if raw.is_nan() {
        return Err(
            ExternalServiceError::invalid_response(SCORE_IMPORTANCE, "score is NaN").into(),
        );
    }
    Ok(raw.clamp(0.0, 1.0))
}

pub fn extract_topics(
    extractor: &Arc<dyn ITopicExtractor>,
    text: &str,
    max_count: usize,
    timeout: Duration,
) -> MnemosResult<Vec<String>> {
    let extractor = Arc::clone(extractor);
    let text = text.to_string();
    let mut topics = call_bounded(EXTRACT_TOPICS, timeout, move || {
        extractor.extract(&text, max_count)
    })?;
    topics.truncate(max_count);
    Ok(topics)
}

pub fn summarize(
    summarizer: &Arc<dyn ISummarizer>,
    contents: &[String],
    timeout: Duration,
) -> MnemosResult<String> {
    let summarizer = Arc::clone(summarizer);
    let contents = contents.to_vec();
    let summary = call_bounded(SUMMARIZE, timeout, move || summarizer.summarize(&contents))?;
    if summary.trim().is_empty() {
        return Err(ExternalServiceError::invalid_response(SUMMARIZE, "empty summary").into());
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::MnemosError;

    struct SlowScorer(Duration);

    impl IImportanceScorer for SlowScorer {
        fn score(&self, _text: &str, _context: Option<&str>) -> MnemosResult<f64> {
            thread::sleep(self.0);
            Ok(0.9)
        }
    }

    #[test]
    fn fast_call_returns_value() {
        let v = call_bounded("test", Duration::from_secs(1), || Ok(42)).unwrap();
        assert_eq!(v, 42);
    }

    #[test]
    fn slow_call_times_out() {
        let scorer: Arc<dyn IImportanceScorer> = Arc::new(SlowScorer(Duration::from_millis(500)));
        let err = score_importance(&scorer, "x", None, Duration::from_millis(20)).unwrap_err();
        match err {
            MnemosError::ExternalServiceError(ExternalServiceError::Timeout {
                capability,
                timeout_ms,
            }) => {
                assert_eq!(capability, SCORE_IMPORTANCE);
                assert_eq!(timeout_ms, 20);
            }
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[test]
    fn abandoned_worker_finishes_quietly() {
        let err = call_bounded("test", Duration::from_millis(10), || {
            thread::sleep(Duration::from_millis(60));
            Ok(7)
        })
        .unwrap_err();
        assert!(matches!(
            err,
            MnemosError::ExternalServiceError(ExternalServiceError::Timeout { .. })
        ));
        // The worker sends into a closed channel once it wakes.
        thread::sleep(Duration::from_millis(100));
        assert_eq!(call_bounded("test", Duration::from_secs(1), || Ok(1)).unwrap(), 1);
    }

    #[test]
    fn inner_error_passes_through() {
        let err = call_bounded::<(), _>("test", Duration::from_secs(1), || {
            Err(MnemosError::validation("x", "bad"))
        })
        .unwrap_err();
        assert!(matches!(err, MnemosError::ValidationError { .. }));
    }

    #[test]
    fn panicking_worker_is_unavailable() {
        let err = call_bounded::<(), _>("test", Duration::from_secs(1), || panic!("boom"))
            .unwrap_err();
        assert!(matches!(
            err,
            MnemosError::ExternalServiceError(ExternalServiceError::Unavailable { .. })
        ));
    }

    struct Fixed(Vec<f32>, usize);

    impl IEmbeddingProvider for Fixed {
        fn embed(&self, _text: &str) -> MnemosResult<Vec<f32>> {
            Ok(self.0.clone())
        }
        fn dimensions(&self) -> usize {
            self.1
        }
        fn name(&self) -> &str {
            "fixed"
        }
    }

    #[test]
    fn embeddings_must_match_dimensions() {
        let timeout = Duration::from_secs(1);
        let ok: Arc<dyn IEmbeddingProvider> = Arc::new(Fixed(vec![0.6, 0.8], 2));
        assert_eq!(embed(&ok, "x", timeout).unwrap(), vec![0.6, 0.8]);

        for provider in [Fixed(vec![1.0, 0.0, 0.0], 2), Fixed(vec![], 0)] {
            let provider: Arc<dyn IEmbeddingProvider> = Arc::new(provider);
            assert!(matches!(
                embed(&provider, "x", timeout).unwrap_err(),
                MnemosError::ExternalServiceError(ExternalServiceError::InvalidResponse { .. })
            ));
        }
    }

    #[test]
    fn non_finite_embeddings_are_rejected() {
        let nan: Arc<dyn IEmbeddingProvider> = Arc::new(Fixed(vec![f32::NAN, 1.0], 2));
        assert!(embed(&nan, "x", Duration::from_secs(1)).is_err());
        let inf: Arc<dyn IEmbeddingProvider> = Arc::new(Fixed(vec![f32::INFINITY, 1.0], 2));
        assert!(embed(&inf, "x", Duration::from_secs(1)).is_err());
    }

    #[test]
    fn scores_are_clamped() {
        struct Loud;
        impl IImportanceScorer for Loud {
            fn score(&self, _: &str, _: Option<&str>) -> MnemosResult<f64> {
                Ok(3.0)
            }
        }
        let scorer: Arc<dyn IImportanceScorer> = Arc::new(Loud);
        assert_eq!(
            score_importance(&scorer, "x", None, Duration::from_secs(1)).unwrap(),
            1.0
        );
    }
}
