//! MemorySystem: owns every engine and exposes the core operations.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use mnemos_consolidation::{
    ConsolidationPipeline, ConsolidationScheduler, HeuristicImportanceScorer,
    KeywordTopicExtractor, TextRankSummarizer,
};
use mnemos_core::bounded;
use mnemos_core::config::MnemosConfig;
use mnemos_core::errors::{MnemosError, MnemosResult};
use mnemos_core::memory::Memory;
use mnemos_core::models::{ConsolidationReport, NewMemory};
use mnemos_core::traits::{
    Clock, IEmbeddingProvider, IImportanceScorer, IMemoryStorage, IShortTermSource, ISummarizer,
    ITopicExtractor, LinkUpdate, SystemClock,
};
use mnemos_decay::{ReinforcementEngine, ReinforcementOutcome, RetentionModel};
use mnemos_embeddings::{cosine_similarity, create_provider};
use mnemos_graph::{AssociativeGraph, RetrievalSession, SessionRegistry};
use mnemos_retrieval::{RetrievalQuery, RetrievalRanker, RetrievalResult};
use mnemos_storage::StorageEngine;

use crate::outcome::StoreOutcome;

/// One handle over a memory database.
///
/// Cheap operations (`get`, `reinforce`, `strengthen_link`) go straight to
/// storage. `store` and `retrieve` call the embedding capability with the
/// configured timeout. `consolidate` runs the five-stage pipeline for one
/// agent and refuses to overlap with itself.
pub struct MemorySystem {
    storage: Arc<StorageEngine>,
    embedder: Arc<dyn IEmbeddingProvider>,
    summarizer: Arc<dyn ISummarizer>,
    scorer: Option<Arc<dyn IImportanceScorer>>,
    topic_extractor: Option<Arc<dyn ITopicExtractor>>,
    clock: Arc<dyn Clock>,
    graph: Arc<AssociativeGraph>,
    reinforcement: ReinforcementEngine,
    ranker: RetrievalRanker,
    consolidation: Arc<ConsolidationPipeline>,
    sessions: SessionRegistry,
    config: MnemosConfig,
}

/// Builder for [`MemorySystem`]. Anything not supplied comes from config:
/// storage at `storage.db_path`, the configured embedding provider, and the
/// local TextRank summarizer.
pub struct MemorySystemBuilder {
    config: MnemosConfig,
    storage: Option<Arc<StorageEngine>>,
    in_memory: bool,
    embedder: Option<Arc<dyn IEmbeddingProvider>>,
    summarizer: Option<Arc<dyn ISummarizer>>,
    scorer: Option<Arc<dyn IImportanceScorer>>,
    topic_extractor: Option<Arc<dyn ITopicExtractor>>,
    short_term: Option<Arc<dyn IShortTermSource>>,
    clock: Option<Arc<dyn Clock>>,
}

impl MemorySystemBuilder {
    pub fn new(config: MnemosConfig) -> Self {
        Self {
            config,
            storage: None,
            in_memory: false,
            embedder: None,
            summarizer: None,
            scorer: None,
            topic_extractor: None,
            short_term: None,
            clock: None,
        }
    }

    pub fn storage(mut self, storage: Arc<StorageEngine>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Use a private in-memory database instead of `storage.db_path`.
    pub fn in_memory(mut self) -> Self {
        self.in_memory = true;
        self
    }

    pub fn embedder(mut self, embedder: Arc<dyn IEmbeddingProvider>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    pub fn summarizer(mut self, summarizer: Arc<dyn ISummarizer>) -> Self {
        self.summarizer = Some(summarizer);
        self
    }

    /// Enables automatic importance scoring for `store` and consolidation scan.
    pub fn scorer(mut self, scorer: Arc<dyn IImportanceScorer>) -> Self {
        self.scorer = Some(scorer);
        self
    }

    /// Enables automatic topic extraction for `store` and consolidation scan.
    pub fn topic_extractor(mut self, extractor: Arc<dyn ITopicExtractor>) -> Self {
        self.topic_extractor = Some(extractor);
        self
    }

    /// Heuristic scorer and keyword topic extractor, both offline.
    pub fn local_capabilities(self) -> Self {
        self.scorer(Arc::new(HeuristicImportanceScorer))
            .topic_extractor(Arc::new(KeywordTopicExtractor))
    }

    pub fn short_term_source(mut self, source: Arc<dyn IShortTermSource>) -> Self {
        self.short_term = Some(source);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn build(self) -> MnemosResult<MemorySystem> {
        let config = self.config;
        config.validate()?;

        let storage = match self.storage {
            Some(s) => s,
            None if self.in_memory => Arc::new(StorageEngine::open_in_memory()?),
            None => Arc::new(StorageEngine::open_with_config(
                Path::new(&config.storage.db_path),
                &config.storage,
            )?),
        };
        let embedder = self
            .embedder
            .unwrap_or_else(|| create_provider(&config.embedding));
        let summarizer = self.summarizer.unwrap_or_else(|| {
            Arc::new(TextRankSummarizer::new(config.consolidation.summary_sentences))
        });
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));

        let graph = Arc::new(AssociativeGraph::with_config(
            storage.clone(),
            clock.clone(),
            config.links.clone(),
        ));
        let reinforcement = ReinforcementEngine::new(storage.clone(), clock.clone())
            .with_params((&config.reinforcement).into());
        let ranker = RetrievalRanker::new(storage.clone(), graph.clone(), clock.clone())
            .with_config(config.retrieval.clone())
            .with_retention_model(RetentionModel::from_config(&config.decay))
            .with_reinforcement_params((&config.reinforcement).into());

        let mut pipeline = ConsolidationPipeline::new(
            storage.clone(),
            embedder.clone(),
            summarizer.clone(),
            clock.clone(),
        )
        .with_config(config.consolidation.clone())
        .with_decay_config(&config.decay);
        if let Some(scorer) = &self.scorer {
            pipeline = pipeline.with_scorer(scorer.clone());
        }
        if let Some(extractor) = &self.topic_extractor {
            pipeline = pipeline.with_topic_extractor(extractor.clone());
        }
        if let Some(source) = self.short_term {
            pipeline = pipeline.with_short_term_source(source);
        }

        info!(
            embedder = embedder.name(),
            dims = embedder.dimensions(),
            auto_score = self.scorer.is_some(),
            auto_topics = self.topic_extractor.is_some(),
            "memory system ready"
        );

        Ok(MemorySystem {
            storage,
            embedder,
            summarizer,
            scorer: self.scorer,
            topic_extractor: self.topic_extractor,
            clock,
            graph,
            reinforcement,
            ranker,
            consolidation: Arc::new(pipeline),
            sessions: SessionRegistry::new(),
            config,
        })
    }
}

impl MemorySystem {
    pub fn builder(config: MnemosConfig) -> MemorySystemBuilder {
        MemorySystemBuilder::new(config)
    }

    /// Load config from `path` (optional file plus `MNEMOS_*` overrides) and
    /// open the configured database.
    pub fn open(config_path: Option<&Path>) -> MnemosResult<Self> {
        let config = MnemosConfig::load(config_path)?;
        Self::builder(config).build()
    }

    /// Default config over a private in-memory database.
    pub fn in_memory() -> MnemosResult<Self> {
        Self::builder(MnemosConfig::default()).in_memory().build()
    }

    pub fn config(&self) -> &MnemosConfig {
        &self.config
    }

    pub fn storage(&self) -> &Arc<StorageEngine> {
        &self.storage
    }

    // ── Store ────────────────────────────────────────────────────────────

    /// Persist new content, or reinforce an existing near-duplicate.
    ///
    /// Unless `skip_dedup` is set, an active memory of the same agent whose
    /// cosine similarity exceeds `retrieval.dedup_threshold` is reinforced
    /// and returned instead of inserting a copy. Missing importance and
    /// topics are filled by the configured scorer and extractor; their
    /// failures fall back to defaults with a warning.
    pub fn store(&self, new: NewMemory) -> MnemosResult<StoreOutcome> {
        if new.agent_id.trim().is_empty() {
            return Err(MnemosError::validation("agent_id", "must not be empty"));
        }
        if new.content.trim().is_empty() {
            return Err(MnemosError::validation("content", "must not be empty"));
        }
        new.validate()?;

        let timeout = self.config.consolidation.capability_timeout();
        let embedding = bounded::embed(&self.embedder, &new.content, timeout)?;

        if !new.skip_dedup {
            if let Some((id, similarity)) = self.nearest_duplicate(&new.agent_id, &embedding)? {
                self.reinforcement.reinforce(&id)?;
                info!(agent_id = %new.agent_id, memory_id = %id, similarity, "near-duplicate reinforced");
                return Ok(StoreOutcome::Reinforced { id, similarity });
            }
        }

        let mut new = new;
        if new.importance.is_none() {
            if let Some(scorer) = &self.scorer {
                match bounded::score_importance(scorer, &new.content, None, timeout) {
                    Ok(score) => new.importance = Some(score),
                    Err(e) => warn!(error = %e, "importance scoring failed, using default"),
                }
            }
        }
        if new.topics.is_empty() {
            if let Some(extractor) = &self.topic_extractor {
                let max = self.config.consolidation.max_topics;
                match bounded::extract_topics(extractor, &new.content, max, timeout) {
                    Ok(topics) => new.topics = topics,
                    Err(e) => warn!(error = %e, "topic extraction failed, storing without topics"),
                }
            }
        }

        let memory = new.into_memory(Memory::new_id(), embedding, self.clock.now())?;
        self.storage.create(&memory)?;
        info!(
            agent_id = %memory.agent_id,
            memory_id = %memory.id,
            memory_type = memory.memory_type.as_str(),
            importance = memory.importance.value(),
            "memory stored"
        );
        Ok(StoreOutcome::Created { id: memory.id })
    }

    fn nearest_duplicate(
        &self,
        agent_id: &str,
        embedding: &[f32],
    ) -> MnemosResult<Option<(String, f64)>> {
        let threshold = self.config.retrieval.dedup_threshold;
        let best = self
            .storage
            .list_active(agent_id)?
            .into_iter()
            .map(|m| {
                let sim = cosine_similarity(embedding, &m.embedding);
                (m.id, sim)
            })
            .filter(|(_, sim)| *sim > threshold)
            .max_by(|a, b| a.1.total_cmp(&b.1));
        Ok(best)
    }

    // ── Retrieve ─────────────────────────────────────────────────────────

    /// Embed `query_text` and rank the agent's memories against it. If the
    /// embedding call fails the result is ranked by retention alone and
    /// flagged `degraded`.
    pub fn retrieve(
        &self,
        agent_id: &str,
        query_text: &str,
        limit: usize,
        include_associations: bool,
    ) -> MnemosResult<RetrievalResult> {
        let query = RetrievalQuery::new(agent_id, self.embed_query(query_text))
            .limit(limit)
            .with_associations(include_associations);
        self.ranker.retrieve(&query)
    }

    /// Retrieve with a fully specified query.
    pub fn retrieve_with(&self, query: &RetrievalQuery) -> MnemosResult<RetrievalResult> {
        self.ranker.retrieve(query)
    }

    /// Retrieve within a co-retrieval session: memories reinforced in the
    /// same session get linked to each other.
    pub fn retrieve_in_session(
        &self,
        session_id: &str,
        query: &RetrievalQuery,
    ) -> MnemosResult<RetrievalResult> {
        self.sessions
            .with_session(session_id, |session| {
                self.ranker.retrieve_in_session(query, session)
            })
    }

    /// Forget a session. Returns what it had reinforced.
    pub fn end_session(&self, session_id: &str) -> Option<RetrievalSession> {
        self.sessions.end(session_id)
    }

    /// Embed query text for [`RetrievalQuery`]. `None` when embedding fails.
    pub fn embed_query(&self, query_text: &str) -> Option<Vec<f32>> {
        let timeout = self.config.consolidation.capability_timeout();
        match bounded::embed(&self.embedder, query_text, timeout) {
            Ok(v) if !v.is_empty() => Some(v),
            Ok(_) => {
                warn!("query embedding empty, ranking by retention");
                None
            }
            Err(e) => {
                warn!(error = %e, kind = e.kind(), "query embedding failed, ranking by retention");
                None
            }
        }
    }

    // ── Reinforce / link ─────────────────────────────────────────────────

    pub fn reinforce(&self, memory_id: &str) -> MnemosResult<ReinforcementOutcome> {
        self.reinforcement.reinforce(memory_id)
    }

    /// `None` uses `links.default_increment`.
    pub fn strengthen_link(
        &self,
        source_id: &str,
        target_id: &str,
        increment: Option<f64>,
    ) -> MnemosResult<LinkUpdate> {
        self.graph.strengthen_link(source_id, target_id, increment)
    }

    // ── Consolidation ────────────────────────────────────────────────────

    pub fn consolidate(&self, agent_id: &str) -> MnemosResult<ConsolidationReport> {
        self.consolidation.consolidate(agent_id)
    }

    /// Periodic consolidation for `agents` at `consolidation.interval_secs`.
    /// Call [`ConsolidationScheduler::spawn`] inside a Tokio runtime.
    pub fn scheduler(&self, agents: Vec<String>) -> ConsolidationScheduler {
        ConsolidationScheduler::new(self.consolidation.clone(), agents)
    }

    // ── Lookup / summarize ───────────────────────────────────────────────

    /// Any memory by id, soft-deleted ones included.
    pub fn get(&self, memory_id: &str) -> MnemosResult<Option<Memory>> {
        self.storage.get(memory_id)
    }

    /// Summarize the chosen memories on demand without storing anything.
    /// Every id must name an active memory of `agent_id`.
    pub fn summarize_ids(&self, agent_id: &str, ids: &[String]) -> MnemosResult<String> {
        if ids.is_empty() {
            return Err(MnemosError::validation("ids", "must not be empty"));
        }
        let found = self.storage.get_bulk(ids)?;
        let mut contents = Vec::with_capacity(ids.len());
        for id in ids {
            let memory = found
                .iter()
                .find(|m| &m.id == id && m.agent_id == agent_id && m.is_active())
                .ok_or_else(|| MnemosError::not_found(id))?;
            contents.push(memory.content.clone());
        }
        debug!(agent_id, count = contents.len(), "summarizing on demand");
        bounded::summarize(
            &self.summarizer,
            &contents,
            self.config.consolidation.capability_timeout(),
        )
    }
}
