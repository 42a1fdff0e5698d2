//! Stage 2: retention for every active memory, split at the fading threshold.

use tracing::warn;

use mnemos_core::memory::Memory;
use mnemos_core::models::{ConsolidationReport, ConsolidationStage, DecayedMemory};

use super::StageContext;

/// Returns the fading memories with their retention for clustering.
pub(crate) fn run(
    ctx: &StageContext<'_>,
    agent_id: &str,
    report: &mut ConsolidationReport,
) -> Vec<(Memory, f64)> {
    let active = match ctx.storage.list_active(agent_id) {
        Ok(active) => active,
        Err(e) => {
            warn!(agent_id, error = %e, "cannot list memories for decay sweep");
            report.record_error(ConsolidationStage::DecaySweep, None, e.to_string());
            return Vec::new();
        }
    };

    let sweep = ctx.decay.sweep(active, ctx.now);
    for (id, e) in &sweep.failed {
        report.record_error(ConsolidationStage::DecaySweep, Some(id), e.to_string());
    }
    report.decayed = sweep
        .decayed
        .iter()
        .map(|(m, retention)| DecayedMemory {
            id: m.id.clone(),
            retention: *retention,
        })
        .collect();
    sweep.decayed
}
