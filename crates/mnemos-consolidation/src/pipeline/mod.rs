//! Five-stage consolidation pipeline.
//!
//! Stage 1: Scan → Stage 2: Decay sweep → Stage 3: Cluster →
//! Stage 4: Compress → Stage 5: Promote
//!
//! Every stage records its own failures in the report and hands whatever it
//! did produce to the next stage.

pub mod phase1_scan;
pub mod phase2_decay_sweep;
pub mod phase3_cluster;
pub mod phase4_compress;
pub mod phase5_promote;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use mnemos_core::config::ConsolidationConfig;
use mnemos_core::models::ConsolidationReport;
use mnemos_core::traits::{
    IEmbeddingProvider, IImportanceScorer, IMemoryStorage, IShortTermSource, ISummarizer,
    ITopicExtractor,
};
use mnemos_decay::DecayEngine;

/// Everything a stage may touch during one run.
pub(crate) struct StageContext<'a> {
    pub storage: &'a Arc<dyn IMemoryStorage>,
    pub embedder: &'a Arc<dyn IEmbeddingProvider>,
    pub summarizer: &'a Arc<dyn ISummarizer>,
    pub scorer: Option<&'a Arc<dyn IImportanceScorer>>,
    pub topic_extractor: Option<&'a Arc<dyn ITopicExtractor>>,
    pub short_term: Option<&'a Arc<dyn IShortTermSource>>,
    pub config: &'a ConsolidationConfig,
    pub decay: &'a DecayEngine,
    pub now: DateTime<Utc>,
}

impl StageContext<'_> {
    pub fn timeout(&self) -> std::time::Duration {
        self.config.capability_timeout()
    }
}

/// Run all stages for one agent. Never fails as a whole: unit and stage
/// failures land in `report.errors`.
pub(crate) fn run_pipeline(ctx: &StageContext<'_>, report: &mut ConsolidationReport) {
    let agent_id = report.agent_id.clone();

    phase1_scan::run(ctx, &agent_id, report);
    info!(agent_id = %agent_id, admitted = report.admitted.len(), "Stage 1: scan complete");

    let decayed = phase2_decay_sweep::run(ctx, &agent_id, report);
    info!(agent_id = %agent_id, decayed = decayed.len(), "Stage 2: decay sweep complete");

    let clusters = phase3_cluster::run(ctx, decayed);
    info!(agent_id = %agent_id, clusters = clusters.len(), "Stage 3: clustering complete");

    phase4_compress::run(ctx, &agent_id, clusters, report);
    info!(
        agent_id = %agent_id,
        compressed = report.compressed.len(),
        "Stage 4: compression complete"
    );

    phase5_promote::run(ctx, &agent_id, report);
    info!(
        agent_id = %agent_id,
        candidates = report.promotion_candidates.len(),
        "Stage 5: promotion scan complete"
    );
}
