//! Stage 1: admit significant short-term records as long-term memories.
//!
//! Re-running scan is idempotent: a record whose content hash already exists
//! for the agent is skipped. Rejected records stay in the source.

use tracing::{debug, info, warn};

use mnemos_core::bounded;
use mnemos_core::errors::{MnemosError, MnemosResult};
use mnemos_core::memory::{Importance, Memory};
use mnemos_core::models::{ConsolidationReport, ConsolidationStage, ShortTermRecord};

use super::StageContext;

/// What scan decided for one record.
#[derive(Debug, Clone, PartialEq)]
pub enum Admission {
    Admitted(String),
    /// Same content already stored for this agent.
    Duplicate,
    /// Importance at or below the significance threshold.
    BelowThreshold(f64),
}

pub(crate) fn run(ctx: &StageContext<'_>, agent_id: &str, report: &mut ConsolidationReport) {
    let Some(source) = ctx.short_term else {
        debug!(agent_id, "no short-term source configured, scan skipped");
        return;
    };

    let records = match source.pending(agent_id) {
        Ok(records) => records,
        Err(e) => {
            warn!(agent_id, error = %e, "short-term source unreadable");
            report.record_error(ConsolidationStage::Scan, None, e.to_string());
            return;
        }
    };

    let (mut duplicates, mut rejected) = (0usize, 0usize);
    for record in records.iter().filter(|r| r.agent_id == agent_id) {
        match admit(ctx, record) {
            Ok(Admission::Admitted(id)) => report.admitted.push(id),
            Ok(Admission::Duplicate) => duplicates += 1,
            Ok(Admission::BelowThreshold(importance)) => {
                debug!(agent_id, importance, "record below significance threshold");
                rejected += 1;
            }
            Err(e) => {
                let unit = Memory::compute_content_hash(&record.content);
                warn!(agent_id, record = %unit, error = %e, "record not admitted");
                report.record_error(ConsolidationStage::Scan, Some(&unit), e.to_string());
            }
        }
    }

    info!(
        agent_id,
        pending = records.len(),
        admitted = report.admitted.len(),
        duplicates,
        rejected,
        "short-term scan finished"
    );
}

/// Decide on one record and insert it when significant.
pub(crate) fn admit(ctx: &StageContext<'_>, record: &ShortTermRecord) -> MnemosResult<Admission> {
    if record.content.trim().is_empty() {
        return Err(MnemosError::validation("content", "must not be empty"));
    }

    let hash = Memory::compute_content_hash(&record.content);
    if ctx
        .storage
        .find_by_content_hash(&record.agent_id, &hash)?
        .is_some()
    {
        return Ok(Admission::Duplicate);
    }

    let importance = match (record.importance, ctx.scorer) {
        (Some(given), _) => Importance::try_new(given)?.value(),
        (None, Some(scorer)) => {
            bounded::score_importance(scorer, &record.content, None, ctx.timeout())?
        }
        (None, None) => Importance::default().value(),
    };
    if importance <= ctx.config.significance_threshold {
        return Ok(Admission::BelowThreshold(importance));
    }

    let embedding = bounded::embed(ctx.embedder, &record.content, ctx.timeout())?;

    let mut new = record.to_new_memory(importance);
    if new.topics.is_empty() {
        if let Some(extractor) = ctx.topic_extractor {
            match bounded::extract_topics(
                extractor,
                &record.content,
                ctx.config.max_topics,
                ctx.timeout(),
            ) {
                Ok(topics) => new.topics = topics,
                Err(e) => warn!(error = %e, "topic extraction failed, admitting without topics"),
            }
        }
    }

    let memory = new.into_memory(Memory::new_id(), embedding, ctx.now)?;
    ctx.storage.create(&memory)?;
    debug!(memory_id = %memory.id, importance, "short-term record admitted");
    Ok(Admission::Admitted(memory.id))
}
