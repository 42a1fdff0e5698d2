//! Stage 4: replace each cluster with one semantic summary.
//!
//! The summary insert and the soft-delete of every source happen in one
//! storage transaction that first claims the cluster. A claim that fails
//! (another run got there first) makes the cluster a no-op.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use mnemos_core::bounded;
use mnemos_core::errors::{ExternalServiceError, MnemosError, MnemosResult};
use mnemos_core::memory::{normalize_topics, Importance, Memory, MemoryType, Stability};
use mnemos_core::models::{CompressedCluster, ConsolidationReport, ConsolidationStage};
use mnemos_core::traits::CompressOutcome;
use mnemos_embeddings::centroid;

use super::StageContext;

/// Build the summary record for `sources`: semantic, highest stability and
/// importance of the cluster, union of topics in first-seen order.
pub fn build_summary(
    agent_id: &str,
    sources: &[Memory],
    content: String,
    embedding: Vec<f32>,
    now: DateTime<Utc>,
) -> MnemosResult<Memory> {
    if sources.is_empty() {
        return Err(MnemosError::validation("sources", "cluster is empty"));
    }
    let stability = sources
        .iter()
        .map(|m| m.stability.value())
        .fold(0.0, f64::max);
    let importance = sources
        .iter()
        .map(|m| m.importance.value())
        .fold(0.0, f64::max);
    let topics = normalize_topics(sources.iter().flat_map(|m| m.topics.iter()));
    let event_date = sources.iter().filter_map(|m| m.event_date).min();

    let summary = Memory {
        id: Memory::new_id(),
        agent_id: agent_id.to_string(),
        content_hash: Memory::compute_content_hash(&content),
        content,
        embedding,
        memory_type: MemoryType::Semantic,
        topics,
        created_at: now,
        event_date,
        expires_at: None,
        importance: Importance::try_new(importance)?,
        stability: Stability::try_new(stability)?,
        last_accessed: now,
        access_count: 0,
        source_channel: None,
        source_session: None,
        is_summary: true,
        summarizes: sources.iter().map(|m| m.id.clone()).collect(),
        is_deleted: false,
    };
    summary.validate()?;
    Ok(summary)
}

pub(crate) fn run(
    ctx: &StageContext<'_>,
    agent_id: &str,
    clusters: Vec<Vec<Memory>>,
    report: &mut ConsolidationReport,
) {
    for cluster in clusters {
        let unit = cluster.first().map(|m| m.id.clone());
        match compress_one(ctx, agent_id, &cluster) {
            Ok(Some(done)) => report.compressed.push(done),
            Ok(None) => {}
            Err(e) => {
                warn!(agent_id, cluster = ?unit, size = cluster.len(), error = %e, "cluster not compressed");
                report.record_error(ConsolidationStage::Compress, unit.as_deref(), e.to_string());
            }
        }
    }
}

fn compress_one(
    ctx: &StageContext<'_>,
    agent_id: &str,
    cluster: &[Memory],
) -> MnemosResult<Option<CompressedCluster>> {
    let contents: Vec<String> = cluster.iter().map(|m| m.content.clone()).collect();
    let text = bounded::summarize(ctx.summarizer, &contents, ctx.timeout())?;

    let embedding = match bounded::embed(ctx.embedder, &text, ctx.timeout()) {
        Ok(e) => e,
        Err(e) => {
            warn!(error = %e, "summary embedding failed, using cluster centroid");
            centroid(cluster.iter().map(|m| m.embedding.as_slice())).ok_or_else(|| {
                ExternalServiceError::invalid_response(
                    bounded::EMBED,
                    "no summary embedding and no usable centroid",
                )
            })?
        }
    };

    let summary = build_summary(agent_id, cluster, text, embedding, ctx.now)?;
    let source_ids = summary.summarizes.clone();

    match ctx.storage.compress_cluster(&summary, &source_ids)? {
        CompressOutcome::Compressed => {
            info!(
                agent_id,
                summary_id = %summary.id,
                sources = source_ids.len(),
                "cluster compressed"
            );
            Ok(Some(CompressedCluster {
                summary_id: summary.id,
                source_ids,
            }))
        }
        CompressOutcome::AlreadyClaimed { id } => {
            debug!(agent_id, claimed = %id, "cluster already claimed, skipping");
            Ok(None)
        }
    }
}
