//! # mnemos-consolidation
//!
//! Five-stage pipeline: scan → decay sweep → cluster → compress → promote.
//! Ships offline implementations of the summarise, topic and importance
//! capabilities, and a tokio scheduler that consolidates agents periodically.

pub mod algorithms;
pub mod engine;
pub mod local;
pub mod pipeline;
pub mod scheduling;

pub use engine::ConsolidationPipeline;
pub use local::{HeuristicImportanceScorer, KeywordTopicExtractor, TextRankSummarizer};
pub use scheduling::{ConsolidationScheduler, SchedulerHandle};
