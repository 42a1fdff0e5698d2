//! OpenAI-compatible HTTP embedding provider.
//!
//! Blocking client; callers bound the total wait with
//! [`mnemos_core::bounded::embed`]. Retries use exponential backoff. After all
//! retries fail the provider marks itself unavailable so a fallback chain
//! skips it until [`ApiProvider::reset_availability`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use mnemos_core::config::EmbeddingConfig;
use mnemos_core::errors::{ConfigError, ExternalServiceError, MnemosResult};
use mnemos_core::traits::IEmbeddingProvider;

const CAPABILITY: &str = "embed";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);
const BASE_BACKOFF_MS: u64 = 100;

pub struct ApiProvider {
    client: reqwest::blocking::Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
    dimensions: usize,
    max_retries: u32,
    available: AtomicBool,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbedResponse {
    data: Vec<EmbedData>,
}

#[derive(Deserialize)]
struct EmbedData {
    #[serde(default)]
    index: usize,
    embedding: Vec<f32>,
}

impl ApiProvider {
    pub fn from_config(config: &EmbeddingConfig) -> MnemosResult<Self> {
        let endpoint = config.endpoint.clone().ok_or_else(|| ConfigError::ValidationFailed {
            field: "embedding.endpoint".to_string(),
            message: "required for the api provider".to_string(),
        })?;
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ExternalServiceError::unavailable(CAPABILITY, e.to_string()))?;
        Ok(Self {
            client,
            endpoint,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            dimensions: config.dimensions,
            max_retries: config.max_retries,
            available: AtomicBool::new(true),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn reset_availability(&self) {
        self.available.store(true, Ordering::Relaxed);
    }

    fn request(&self, texts: &[String]) -> MnemosResult<Vec<Vec<f32>>> {
        if !self.is_available() {
            return Err(ExternalServiceError::unavailable(
                CAPABILITY,
                format!("{} marked unavailable", self.endpoint),
            )
            .into());
        }

        let mut last_err = None;
        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = Duration::from_millis(BASE_BACKOFF_MS * 2u64.pow(attempt - 1));
                std::thread::sleep(delay);
                debug!(attempt, "retrying embedding request");
            }
            match self.send(texts) {
                Ok(vectors) => return Ok(vectors),
                Err(e) => {
                    warn!(attempt, endpoint = %self.endpoint, error = %e, "embedding request failed");
                    last_err = Some(e);
                }
            }
        }

        self.available.store(false, Ordering::Relaxed);
        Err(last_err.unwrap_or_else(|| {
            ExternalServiceError::unavailable(CAPABILITY, "all retries exhausted").into()
        }))
    }

    fn send(&self, texts: &[String]) -> MnemosResult<Vec<Vec<f32>>> {
        let mut req = self.client.post(&self.endpoint).json(&EmbedRequest {
            model: &self.model,
            input: texts,
        });
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }

        let resp = req
            .send()
            .map_err(|e| ExternalServiceError::unavailable(CAPABILITY, e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(ExternalServiceError::unavailable(
                CAPABILITY,
                format!("HTTP {status}: {body}"),
            )
            .into());
        }
        let parsed: EmbedResponse = resp
            .json()
            .map_err(|e| ExternalServiceError::invalid_response(CAPABILITY, e.to_string()))?;
        self.unpack(parsed, texts.len())
    }

    fn unpack(&self, resp: EmbedResponse, expected: usize) -> MnemosResult<Vec<Vec<f32>>> {
        if resp.data.len() != expected {
            return Err(ExternalServiceError::invalid_response(
                CAPABILITY,
                format!("expected {expected} embeddings, got {}", resp.data.len()),
            )
            .into());
        }
        let mut data = resp.data;
        data.sort_by_key(|d| d.index);
        data.into_iter()
            .map(|d| {
                if d.embedding.len() != self.dimensions {
                    return Err(ExternalServiceError::invalid_response(
                        CAPABILITY,
                        format!(
                            "expected {} dimensions, got {}",
                            self.dimensions,
                            d.embedding.len()
                        ),
                    )
                    .into());
                }
                Ok(d.embedding)
            })
            .collect()
    }
}

impl IEmbeddingProvider for ApiProvider {
    fn embed(&self, text: &str) -> MnemosResult<Vec<f32>> {
        let mut vectors = self.request(std::slice::from_ref(&text.to_string()))?;
        vectors.pop().ok_or_else(|| {
            ExternalServiceError::invalid_response(CAPABILITY, "empty response").into()
        })
    }

    fn embed_batch(&self, texts: &[String]) -> MnemosResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.request(texts)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        &self.model
    }

    fn is_available(&self) -> bool {
        self.available.load(Ordering::Relaxed)
    }
}
