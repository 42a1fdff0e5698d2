//! RetrievalRanker: filter → retention → score → rank → reinforce → associate.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info, warn};

use mnemos_core::config::{ReinforcePolicy, RetrievalConfig};
use mnemos_core::errors::{MnemosError, MnemosResult};
use mnemos_core::traits::{Clock, IMemoryStorage};
use mnemos_decay::{ReinforcementEngine, ReinforcementParams, RetentionModel};
use mnemos_graph::{AssociativeGraph, RetrievalSession};

use crate::query::{AssociatedMemory, RankedMemory, RetrievalQuery, RetrievalResult};
use crate::ranking::{rank, score_candidate, CandidateFilter};

pub struct RetrievalRanker {
    storage: Arc<dyn IMemoryStorage>,
    graph: Arc<AssociativeGraph>,
    clock: Arc<dyn Clock>,
    retention: RetentionModel,
    reinforcement: ReinforcementEngine,
    config: RetrievalConfig,
}

impl RetrievalRanker {
    pub fn new(
        storage: Arc<dyn IMemoryStorage>,
        graph: Arc<AssociativeGraph>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let reinforcement = ReinforcementEngine::new(storage.clone(), clock.clone());
        Self {
            storage,
            graph,
            clock,
            retention: RetentionModel::new(),
            reinforcement,
            config: RetrievalConfig::default(),
        }
    }

    pub fn with_config(mut self, config: RetrievalConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_retention_model(mut self, model: RetentionModel) -> Self {
        self.retention = model;
        self
    }

    pub fn with_reinforcement_params(mut self, params: ReinforcementParams) -> Self {
        self.reinforcement = self.reinforcement.with_params(params);
        self
    }

    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    /// Rank the agent's memories against the query and reinforce strong hits.
    /// Hits reinforced by the same call are linked to each other.
    pub fn retrieve(&self, query: &RetrievalQuery) -> MnemosResult<RetrievalResult> {
        self.run(query, None)
    }

    /// As [`retrieve`](Self::retrieve), additionally linking every memory
    /// reinforced here to those reinforced earlier in `session`.
    pub fn retrieve_in_session(
        &self,
        query: &RetrievalQuery,
        session: &mut RetrievalSession,
    ) -> MnemosResult<RetrievalResult> {
        self.run(query, Some(session))
    }

    fn run(
        &self,
        query: &RetrievalQuery,
        session: Option<&mut RetrievalSession>,
    ) -> MnemosResult<RetrievalResult> {
        validate(query)?;
        let now = self.clock.now();
        let min_retention = query.min_retention.unwrap_or(self.config.min_retention);
        let query_embedding = query.query_embedding.as_deref();
        let degraded = query_embedding.is_none();

        let filter = CandidateFilter {
            agent_id: &query.agent_id,
            memory_types: &query.memory_types,
            include_expired: self.config.include_expired,
            now,
        };

        let candidates = self.storage.list_active(&query.agent_id)?;
        let total = candidates.len();
        let mut scored = Vec::with_capacity(total);
        for memory in candidates.into_iter().filter(|m| filter.admits(m)) {
            let retention = match self.retention.retention_of(&memory, now) {
                Ok(r) => r,
                Err(e) => {
                    warn!(memory_id = %memory.id, error = %e, "retention not computable, skipped");
                    continue;
                }
            };
            if retention < min_retention {
                continue;
            }
            scored.push(score_candidate(memory, query_embedding, retention));
        }
        let eligible = scored.len();
        let memories = rank(scored, query.limit);
        debug!(
            agent_id = %query.agent_id,
            total,
            eligible,
            returned = memories.len(),
            degraded,
            "ranking complete"
        );

        let reinforced = match session {
            _ if degraded => Vec::new(),
            Some(session) => self.reinforce_hits(&memories, session),
            None => {
                let mut call = RetrievalSession::new(format!("retrieve:{}", query.agent_id));
                self.reinforce_hits(&memories, &mut call)
            }
        };

        let associations = match memories.first() {
            Some(top) if query.include_associations => {
                self.associations_of(top, &memories, query, &filter)?
            }
            _ => Vec::new(),
        };

        info!(
            agent_id = %query.agent_id,
            memories = memories.len(),
            associations = associations.len(),
            reinforced = reinforced.len(),
            degraded,
            "retrieval complete"
        );

        Ok(RetrievalResult {
            memories,
            associations,
            reinforced,
            degraded,
        })
    }

    /// Reinforce per policy and record each hit in `session`. A failed
    /// reinforcement is logged and left out of the returned ids; ranking
    /// output is unaffected.
    fn reinforce_hits(
        &self,
        ranked: &[RankedMemory],
        session: &mut RetrievalSession,
    ) -> Vec<String> {
        let threshold = self.config.relevance_threshold;
        let above = |r: &&RankedMemory| r.similarity.is_some_and(|s| s > threshold);
        let targets: Vec<&RankedMemory> = match self.config.reinforce_policy {
            ReinforcePolicy::TopHit => ranked.first().filter(above).into_iter().collect(),
            ReinforcePolicy::AllAboveThreshold => ranked.iter().filter(above).collect(),
        };

        let mut reinforced = Vec::with_capacity(targets.len());
        for hit in targets {
            let id = &hit.memory.id;
            if let Err(e) = self.reinforcement.reinforce(id) {
                warn!(memory_id = %id, error = %e, kind = e.kind(), "reinforcement failed");
                continue;
            }
            if let Err(e) = session.record_reinforced(&self.graph, id) {
                warn!(memory_id = %id, error = %e, "session linking failed");
            }
            reinforced.push(id.clone());
        }
        reinforced
    }

    /// Memories linked to `top` above the association threshold, strongest
    /// first, excluding anything already ranked.
    fn associations_of(
        &self,
        top: &RankedMemory,
        ranked: &[RankedMemory],
        query: &RetrievalQuery,
        filter: &CandidateFilter<'_>,
    ) -> MnemosResult<Vec<AssociatedMemory>> {
        let seen: HashSet<&str> = ranked.iter().map(|r| r.memory.id.as_str()).collect();
        let links: Vec<_> = self
            .graph
            .neighbors(&top.memory.id, self.config.association_threshold)?
            .into_iter()
            .filter(|l| !seen.contains(l.target_id.as_str()))
            .collect();
        if links.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<String> = links.iter().map(|l| l.target_id.clone()).collect();
        let found = self.storage.get_bulk(&ids)?;

        let mut out = Vec::with_capacity(links.len().min(query.limit));
        for link in &links {
            let Some(memory) = found.iter().find(|m| m.id == link.target_id) else {
                continue;
            };
            // Links cross memory types; only ownership, liveness and expiry apply.
            let reachable = CandidateFilter {
                memory_types: &[],
                ..filter.clone()
            };
            if !reachable.admits(memory) {
                continue;
            }
            let retention = match self.retention.retention_of(memory, filter.now) {
                Ok(r) => r,
                Err(e) => {
                    warn!(memory_id = %memory.id, error = %e, "retention not computable, skipped");
                    continue;
                }
            };
            out.push(AssociatedMemory {
                memory: memory.clone(),
                strength: link.strength,
                retention,
            });
            if out.len() == query.limit {
                break;
            }
        }
        Ok(out)
    }
}

fn validate(query: &RetrievalQuery) -> MnemosResult<()> {
    if query.agent_id.trim().is_empty() {
        return Err(MnemosError::validation("agent_id", "must not be empty"));
    }
    if query.limit == 0 {
        return Err(MnemosError::validation("limit", "must be at least 1"));
    }
    if query.query_embedding.as_ref().is_some_and(Vec::is_empty) {
        return Err(MnemosError::validation(
            "query_embedding",
            "must not be empty; pass None to rank by retention alone",
        ));
    }
    if let Some(min) = query.min_retention {
        if !(0.0..=1.0).contains(&min) {
            return Err(MnemosError::validation(
                "min_retention",
                format!("{min} outside [0, 1]"),
            ));
        }
    }
    Ok(())
}
