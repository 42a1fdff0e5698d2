//! Configuration. Every section deserializes with `#[serde(default)]`, so a
//! partial TOML file only overrides what it names.

pub mod consolidation_config;
pub mod decay_config;
pub mod defaults;
pub mod embedding_config;
pub mod observability_config;
pub mod retrieval_config;
pub mod storage_config;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use consolidation_config::ConsolidationConfig;
pub use decay_config::{DecayConfig, LinkConfig, ReinforcementConfig};
pub use embedding_config::EmbeddingConfig;
pub use observability_config::ObservabilityConfig;
pub use retrieval_config::{ReinforcePolicy, RetrievalConfig};
pub use storage_config::StorageConfig;

use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Environment variables (`MNEMOS_*`)
/// 2. Config file passed to [`MnemosConfig::load`]
/// 3. Compiled defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MnemosConfig {
    pub storage: StorageConfig,
    pub embedding: EmbeddingConfig,
    pub decay: DecayConfig,
    pub reinforcement: ReinforcementConfig,
    pub links: LinkConfig,
    pub retrieval: RetrievalConfig,
    pub consolidation: ConsolidationConfig,
    pub observability: ObservabilityConfig,
}

impl MnemosConfig {
    /// Load from an optional TOML file, apply `MNEMOS_*` overrides, then validate.
    /// A path that does not exist is treated as "no file".
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) if p.exists() => Self::from_file(p)?,
            _ => Self::default(),
        };
        config.apply_env_overrides_from(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Apply overrides from a key lookup. Split from [`MnemosConfig::load`]
    /// so tests can inject variables without touching the process environment.
    pub fn apply_env_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("MNEMOS_DB_PATH") {
            self.storage.db_path = v;
        }
        if let Some(v) = lookup("MNEMOS_LOG_LEVEL") {
            self.observability.log_level = v;
        }
        if let Some(v) = lookup("MNEMOS_EMBEDDING_ENDPOINT") {
            self.embedding.endpoint = Some(v);
            self.embedding.provider = "api".to_string();
        }
        if let Some(v) = lookup("MNEMOS_EMBEDDING_API_KEY") {
            self.embedding.api_key = Some(v);
        }
        if let Some(v) = lookup("MNEMOS_CAPABILITY_TIMEOUT_MS").and_then(|v| v.parse().ok()) {
            self.consolidation.capability_timeout_ms = v;
        }
    }

    /// Validate the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let unit_fields = [
            ("decay.fading_threshold", self.decay.fading_threshold),
            ("links.initial_strength", self.links.initial_strength),
            ("retrieval.relevance_threshold", self.retrieval.relevance_threshold),
            ("retrieval.association_threshold", self.retrieval.association_threshold),
            ("retrieval.dedup_threshold", self.retrieval.dedup_threshold),
            ("retrieval.min_retention", self.retrieval.min_retention),
            (
                "consolidation.significance_threshold",
                self.consolidation.significance_threshold,
            ),
            (
                "consolidation.similarity_threshold",
                self.consolidation.similarity_threshold,
            ),
            (
                "consolidation.promotion_stability_threshold",
                self.consolidation.promotion_stability_threshold,
            ),
        ];
        for (field, value) in unit_fields {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(field, "must be between 0.0 and 1.0"));
            }
        }

        let non_negative = [
            ("links.default_increment", self.links.default_increment),
            ("reinforcement.stability_gain", self.reinforcement.stability_gain),
            ("reinforcement.max_spacing_bonus", self.reinforcement.max_spacing_bonus),
        ];
        for (field, value) in non_negative {
            if value.is_nan() || value < 0.0 {
                return Err(invalid(field, "must be non-negative"));
            }
        }
        if self.reinforcement.spacing_interval_days.is_nan()
            || self.reinforcement.spacing_interval_days <= 0.0
        {
            return Err(invalid(
                "reinforcement.spacing_interval_days",
                "must be greater than 0",
            ));
        }

        let positive = [
            ("consolidation.min_cluster_size", self.consolidation.min_cluster_size as u64),
            ("consolidation.capability_timeout_ms", self.consolidation.capability_timeout_ms),
            ("consolidation.interval_secs", self.consolidation.interval_secs),
            ("embedding.dimensions", self.embedding.dimensions as u64),
            ("retrieval.default_limit", self.retrieval.default_limit as u64),
        ];
        for (field, value) in positive {
            if value == 0 {
                return Err(invalid(field, "must be greater than 0"));
            }
        }

        if self.embedding.provider == "api" && self.embedding.endpoint.is_none() {
            return Err(invalid(
                "embedding.endpoint",
                "required when embedding.provider = \"api\"",
            ));
        }
        if !matches!(self.embedding.provider.as_str(), "tfidf" | "api") {
            return Err(invalid("embedding.provider", "expected \"tfidf\" or \"api\""));
        }
        Ok(())
    }
}

fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::ValidationFailed {
        field: field.to_string(),
        message: message.to_string(),
    }
}
