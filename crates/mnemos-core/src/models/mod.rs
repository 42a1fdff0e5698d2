//! Data transfer types shared across crates.

mod consolidation_report;
mod new_memory;
mod short_term;

pub use consolidation_report::{
    CompressedCluster, ConsolidationReport, ConsolidationStage, DecayedMemory,
    PromotionCandidate, StageError,
};
pub use new_memory::NewMemory;
pub use short_term::ShortTermRecord;
