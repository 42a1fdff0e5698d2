//! # mnemos
//!
//! Long-lived memory for autonomous agents. Memories fade unless reinforced,
//! important ones fade slower, related ones cluster and compress, and stable
//! ones are flagged for promotion.
//!
//! [`MemorySystem`] wires storage, embeddings, the associative graph, the
//! retrieval ranker and the consolidation pipeline behind one handle.

pub mod observability;
pub mod outcome;
pub mod system;

pub use outcome::StoreOutcome;
pub use system::{MemorySystem, MemorySystemBuilder};

pub use mnemos_consolidation::{ConsolidationScheduler, SchedulerHandle};
pub use mnemos_core::{
    Clock, ConsolidationReport, Importance, LinkType, Memory, MemoryLink, MemoryType,
    MnemosConfig, MnemosError, MnemosResult, NewMemory, Stability, SystemClock,
};
pub use mnemos_decay::ReinforcementOutcome;
pub use mnemos_graph::RetrievalSession;
pub use mnemos_retrieval::{AssociatedMemory, RankedMemory, RetrievalQuery, RetrievalResult};
