//! Ordered provider fallback.
//!
//! Providers are tried in order; unavailable ones are skipped and failures
//! fall through to the next. Each fallback is logged and counted.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::warn;

use mnemos_core::errors::{ExternalServiceError, MnemosError, MnemosResult};
use mnemos_core::traits::IEmbeddingProvider;

#[derive(Default)]
pub struct FallbackChain {
    chain: Vec<Arc<dyn IEmbeddingProvider>>,
    fallbacks: AtomicU64,
}

impl FallbackChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a provider with lower priority than those already present.
    pub fn push(&mut self, provider: Arc<dyn IEmbeddingProvider>) {
        self.chain.push(provider);
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// Times a lower-priority provider served a request.
    pub fn fallback_count(&self) -> u64 {
        self.fallbacks.load(Ordering::Relaxed)
    }

    /// First available provider, or "none".
    pub fn active_provider_name(&self) -> &str {
        self.chain
            .iter()
            .find(|p| p.is_available())
            .map_or("none", |p| p.name())
    }

    fn run<T>(
        &self,
        op: &str,
        f: impl Fn(&dyn IEmbeddingProvider) -> MnemosResult<T>,
    ) -> MnemosResult<T> {
        let mut last_err: Option<MnemosError> = None;
        for (i, provider) in self.chain.iter().enumerate() {
            if !provider.is_available() {
                continue;
            }
            match f(provider.as_ref()) {
                Ok(value) => {
                    if i > 0 {
                        self.fallbacks.fetch_add(1, Ordering::Relaxed);
                        warn!(op, fallback = provider.name(), "embedding served by fallback provider");
                    }
                    return Ok(value);
                }
                Err(e) => {
                    warn!(op, provider = provider.name(), error = %e, "provider failed, trying next");
                    last_err = Some(e);
                }
            }
        }
        Err(last_err.unwrap_or_else(|| {
            ExternalServiceError::unavailable("embed", "no provider available").into()
        }))
    }
}

impl IEmbeddingProvider for FallbackChain {
    fn embed(&self, text: &str) -> MnemosResult<Vec<f32>> {
        self.run("embed", |p| p.embed(text))
    }

    fn embed_batch(&self, texts: &[String]) -> MnemosResult<Vec<Vec<f32>>> {
        self.run("embed_batch", |p| p.embed_batch(texts))
    }

    fn dimensions(&self) -> usize {
        self.chain.first().map_or(0, |p| p.dimensions())
    }

    fn name(&self) -> &str {
        self.active_provider_name()
    }

    fn is_available(&self) -> bool {
        self.chain.iter().any(|p| p.is_available())
    }
}
