use serde::{Deserialize, Serialize};

use super::defaults;

/// Embedding subsystem configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Provider name: "tfidf" (local, deterministic) or "api" (OpenAI-compatible HTTP).
    pub provider: String,
    /// Model name sent to the API provider.
    pub model: String,
    pub dimensions: usize,
    /// API endpoint; required when `provider = "api"`.
    pub endpoint: Option<String>,
    /// Bearer token for the API provider.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub max_retries: u32,
    pub batch_size: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: defaults::DEFAULT_EMBEDDING_PROVIDER.to_string(),
            model: defaults::DEFAULT_EMBEDDING_MODEL.to_string(),
            dimensions: defaults::DEFAULT_EMBEDDING_DIMENSIONS,
            endpoint: None,
            api_key: None,
            max_retries: defaults::DEFAULT_EMBEDDING_MAX_RETRIES,
            batch_size: defaults::DEFAULT_EMBEDDING_BATCH_SIZE,
        }
    }
}
