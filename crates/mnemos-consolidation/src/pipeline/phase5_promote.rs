//! Stage 5: flag stable, frequently used memories for permanent context.
//! Report only; nothing is written.

use tracing::warn;

use mnemos_core::memory::Memory;
use mnemos_core::models::{ConsolidationReport, ConsolidationStage, PromotionCandidate};

use super::StageContext;

/// Active non-summary memories with stability and access count strictly
/// above the thresholds, most stable first.
pub fn promotion_candidates(
    memories: &[Memory],
    stability_threshold: f64,
    min_access_count: u64,
) -> Vec<PromotionCandidate> {
    let mut out: Vec<PromotionCandidate> = memories
        .iter()
        .filter(|m| m.is_active() && !m.is_summary)
        .filter(|m| m.stability.value() > stability_threshold && m.access_count > min_access_count)
        .map(|m| PromotionCandidate {
            id: m.id.clone(),
            stability: m.stability.value(),
            access_count: m.access_count,
        })
        .collect();
    out.sort_by(|a, b| b.stability.total_cmp(&a.stability).then_with(|| a.id.cmp(&b.id)));
    out
}

pub(crate) fn run(ctx: &StageContext<'_>, agent_id: &str, report: &mut ConsolidationReport) {
    match ctx.storage.list_active(agent_id) {
        Ok(active) => {
            report.promotion_candidates = promotion_candidates(
                &active,
                ctx.config.promotion_stability_threshold,
                ctx.config.promotion_min_access_count,
            );
        }
        Err(e) => {
            warn!(agent_id, error = %e, "cannot list memories for promotion");
            report.record_error(ConsolidationStage::Promote, None, e.to_string());
        }
    }
}
