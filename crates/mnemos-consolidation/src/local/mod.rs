//! Offline implementations of the summarise, topic and importance capabilities.

mod importance;
mod summarizer;
mod topics;

pub use importance::HeuristicImportanceScorer;
pub use summarizer::TextRankSummarizer;
pub use topics::KeywordTopicExtractor;
