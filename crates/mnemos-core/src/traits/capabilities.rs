use crate::errors::MnemosResult;
use crate::models::ShortTermRecord;

/// Salience scoring, typically backed by a language model.
pub trait IImportanceScorer: Send + Sync {
    /// Score in [0.0, 1.0]. Out-of-range output is clamped by the caller.
    fn score(&self, text: &str, context: Option<&str>) -> MnemosResult<f64>;
}

/// Keyword/topic extraction.
pub trait ITopicExtractor: Send + Sync {
    /// At most `max_count` topics, most relevant first.
    fn extract(&self, text: &str, max_count: usize) -> MnemosResult<Vec<String>>;
}

/// Compresses several memory contents into one gist.
pub trait ISummarizer: Send + Sync {
    fn summarize(&self, contents: &[String]) -> MnemosResult<String>;
}

/// Reader over the short-term log. Parsing the log format is the
/// implementor's concern; scan never removes records from it.
pub trait IShortTermSource: Send + Sync {
    fn pending(&self, agent_id: &str) -> MnemosResult<Vec<ShortTermRecord>>;
}
