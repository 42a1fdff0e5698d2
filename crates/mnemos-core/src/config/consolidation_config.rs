use serde::{Deserialize, Serialize};

use super::defaults;

/// Consolidation pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsolidationConfig {
    /// Short-term records need importance strictly above this to be admitted.
    pub significance_threshold: f64,
    /// Pairwise cosine similarity needed to join two fading memories.
    pub similarity_threshold: f64,
    pub min_cluster_size: usize,
    pub promotion_stability_threshold: f64,
    pub promotion_min_access_count: u64,
    /// Upper bound on any single embed/score/extract/summarize call.
    pub capability_timeout_ms: u64,
    /// Period of the background scheduler.
    pub interval_secs: u64,
    /// Topics requested from the extractor for admitted records.
    pub max_topics: usize,
    /// Sentences kept by the local extractive summarizer.
    pub summary_sentences: usize,
}

impl Default for ConsolidationConfig {
    fn default() -> Self {
        Self {
            significance_threshold: defaults::DEFAULT_SIGNIFICANCE_THRESHOLD,
            similarity_threshold: defaults::DEFAULT_SIMILARITY_THRESHOLD,
            min_cluster_size: defaults::DEFAULT_MIN_CLUSTER_SIZE,
            promotion_stability_threshold: defaults::DEFAULT_PROMOTION_STABILITY_THRESHOLD,
            promotion_min_access_count: defaults::DEFAULT_PROMOTION_MIN_ACCESS_COUNT,
            capability_timeout_ms: defaults::DEFAULT_CAPABILITY_TIMEOUT_MS,
            interval_secs: defaults::DEFAULT_CONSOLIDATION_INTERVAL_SECS,
            max_topics: defaults::DEFAULT_MAX_TOPICS,
            summary_sentences: defaults::DEFAULT_SUMMARY_SENTENCES,
        }
    }
}

impl ConsolidationConfig {
    pub fn capability_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.capability_timeout_ms)
    }
}
