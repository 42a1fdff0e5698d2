use serde::{Deserialize, Serialize};

use super::defaults;

/// Which retrieved results get reinforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReinforcePolicy {
    /// Only the top result, and only when its similarity clears the relevance threshold.
    #[default]
    TopHit,
    /// Every returned result whose similarity clears the relevance threshold.
    AllAboveThreshold,
}

/// Retrieval subsystem configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub default_limit: usize,
    /// Similarity a hit needs before it is reinforced.
    pub relevance_threshold: f64,
    /// Minimum link strength followed when collecting associations.
    pub association_threshold: f64,
    /// Similarity above which `store` reinforces the existing memory instead.
    pub dedup_threshold: f64,
    /// Candidates below this retention are dropped before ranking.
    pub min_retention: f64,
    /// Keep memories whose `expires_at` has passed.
    pub include_expired: bool,
    pub reinforce_policy: ReinforcePolicy,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            default_limit: defaults::DEFAULT_RETRIEVAL_LIMIT,
            relevance_threshold: defaults::DEFAULT_RELEVANCE_THRESHOLD,
            association_threshold: defaults::DEFAULT_ASSOCIATION_THRESHOLD,
            dedup_threshold: defaults::DEFAULT_DEDUP_THRESHOLD,
            min_retention: defaults::DEFAULT_MIN_RETENTION,
            include_expired: defaults::DEFAULT_INCLUDE_EXPIRED,
            reinforce_policy: ReinforcePolicy::default(),
        }
    }
}
