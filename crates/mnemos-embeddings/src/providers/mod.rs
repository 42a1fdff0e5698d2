//! Provider registry.
//!
//! `tfidf` is local and always available. `api` is an OpenAI-compatible
//! endpoint wrapped in a [`FallbackChain`] that ends in `tfidf`.

pub mod api_provider;
pub mod tfidf;

pub use api_provider::ApiProvider;
pub use tfidf::HashedTfIdf;

use std::sync::Arc;

use tracing::{info, warn};

use mnemos_core::config::EmbeddingConfig;
use mnemos_core::traits::IEmbeddingProvider;

use crate::degradation::FallbackChain;

/// Build the configured provider. Never fails: a provider that cannot be
/// constructed is replaced by the TF-IDF fallback with a warning.
pub fn create_provider(config: &EmbeddingConfig) -> Arc<dyn IEmbeddingProvider> {
    match config.provider.as_str() {
        "api" => match ApiProvider::from_config(config) {
            Ok(api) => {
                info!(
                    provider = "api",
                    endpoint = api.endpoint(),
                    dims = config.dimensions,
                    "embedding provider ready"
                );
                let mut chain = FallbackChain::new();
                chain.push(Arc::new(api));
                chain.push(Arc::new(HashedTfIdf::new(config.dimensions)));
                Arc::new(chain)
            }
            Err(e) => {
                warn!(error = %e, "api embedding provider unavailable, using tfidf");
                Arc::new(HashedTfIdf::new(config.dimensions))
            }
        },
        "tfidf" => {
            info!(provider = "tfidf", dims = config.dimensions, "embedding provider ready");
            Arc::new(HashedTfIdf::new(config.dimensions))
        }
        other => {
            warn!(provider = other, "unknown embedding provider, using tfidf");
            Arc::new(HashedTfIdf::new(config.dimensions))
        }
    }
}
