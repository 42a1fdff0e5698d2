//! ConsolidationPipeline: owns the capabilities and the per-agent run guard.

use std::sync::Arc;

use dashmap::DashSet;
use tracing::info;

use mnemos_core::config::{ConsolidationConfig, DecayConfig};
use mnemos_core::errors::{MnemosError, MnemosResult};
use mnemos_core::models::ConsolidationReport;
use mnemos_core::traits::{
    Clock, IEmbeddingProvider, IImportanceScorer, IMemoryStorage, IShortTermSource, ISummarizer,
    ITopicExtractor,
};
use mnemos_decay::DecayEngine;

use crate::pipeline::{self, StageContext};

/// Runs consolidation for one agent at a time per agent.
///
/// Two runs for different agents may proceed in parallel; a second run for
/// an agent whose run is still in flight fails fast with `ConflictError`.
/// Across processes, the claim inside the compress transaction keeps
/// clusters from being compressed twice.
pub struct ConsolidationPipeline {
    storage: Arc<dyn IMemoryStorage>,
    embedder: Arc<dyn IEmbeddingProvider>,
    summarizer: Arc<dyn ISummarizer>,
    clock: Arc<dyn Clock>,
    scorer: Option<Arc<dyn IImportanceScorer>>,
    topic_extractor: Option<Arc<dyn ITopicExtractor>>,
    short_term: Option<Arc<dyn IShortTermSource>>,
    config: ConsolidationConfig,
    decay: DecayEngine,
    /// Agents with a run in flight.
    running: Arc<DashSet<String>>,
}

/// Releases the agent's slot when the run ends, panics included.
struct RunGuard {
    running: Arc<DashSet<String>>,
    agent_id: String,
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.running.remove(&self.agent_id);
    }
}

impl ConsolidationPipeline {
    pub fn new(
        storage: Arc<dyn IMemoryStorage>,
        embedder: Arc<dyn IEmbeddingProvider>,
        summarizer: Arc<dyn ISummarizer>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            storage,
            embedder,
            summarizer,
            clock,
            scorer: None,
            topic_extractor: None,
            short_term: None,
            config: ConsolidationConfig::default(),
            decay: DecayEngine::new(),
            running: Arc::new(DashSet::new()),
        }
    }

    pub fn with_config(mut self, config: ConsolidationConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_decay_config(mut self, config: &DecayConfig) -> Self {
        self.decay = DecayEngine::from_config(config);
        self
    }

    pub fn with_scorer(mut self, scorer: Arc<dyn IImportanceScorer>) -> Self {
        self.scorer = Some(scorer);
        self
    }

    pub fn with_topic_extractor(mut self, extractor: Arc<dyn ITopicExtractor>) -> Self {
        self.topic_extractor = Some(extractor);
        self
    }

    pub fn with_short_term_source(mut self, source: Arc<dyn IShortTermSource>) -> Self {
        self.short_term = Some(source);
        self
    }

    pub fn config(&self) -> &ConsolidationConfig {
        &self.config
    }

    /// Whether a run for `agent_id` is in flight in this process.
    pub fn is_running(&self, agent_id: &str) -> bool {
        self.running.contains(agent_id)
    }

    fn acquire(&self, agent_id: &str) -> MnemosResult<RunGuard> {
        if !self.running.insert(agent_id.to_string()) {
            return Err(MnemosError::conflict(format!(
                "consolidation already in progress for agent {agent_id}"
            )));
        }
        Ok(RunGuard {
            running: Arc::clone(&self.running),
            agent_id: agent_id.to_string(),
        })
    }

    /// Run scan, decay sweep, cluster, compress and promote for one agent.
    ///
    /// Returns `Err` only when the run cannot start (empty agent id, or a run
    /// already in flight). Everything that fails once running is reported in
    /// [`ConsolidationReport::errors`].
    pub fn consolidate(&self, agent_id: &str) -> MnemosResult<ConsolidationReport> {
        if agent_id.trim().is_empty() {
            return Err(MnemosError::validation("agent_id", "must not be empty"));
        }
        let _guard = self.acquire(agent_id)?;

        let now = self.clock.now();
        let mut report = ConsolidationReport::new(agent_id, now);
        let ctx = StageContext {
            storage: &self.storage,
            embedder: &self.embedder,
            summarizer: &self.summarizer,
            scorer: self.scorer.as_ref(),
            topic_extractor: self.topic_extractor.as_ref(),
            short_term: self.short_term.as_ref(),
            config: &self.config,
            decay: &self.decay,
            now,
        };
        pipeline::run_pipeline(&ctx, &mut report);

        info!(
            agent_id,
            admitted = report.admitted.len(),
            decayed = report.decayed.len(),
            compressed = report.compressed.len(),
            promotion_candidates = report.promotion_candidates.len(),
            errors = report.errors.len(),
            "consolidation complete"
        );
        Ok(report)
    }
}
