//! Deterministic stand-ins for the pluggable capabilities.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use mnemos_core::errors::{ExternalServiceError, MnemosResult};
use mnemos_core::models::ShortTermRecord;
use mnemos_core::traits::{
    IEmbeddingProvider, IImportanceScorer, IShortTermSource, ISummarizer, ITopicExtractor,
};

fn down(capability: &str) -> mnemos_core::MnemosError {
    ExternalServiceError::unavailable(capability, "scripted failure").into()
}

// ── Embedding ───────────────────────────────────────────────────────────────

/// Returns scripted vectors by exact text, `fallback` otherwise.
pub struct ScriptedEmbedder {
    vectors: HashMap<String, Vec<f32>>,
    fallback: Vec<f32>,
    calls: AtomicUsize,
}

impl ScriptedEmbedder {
    pub fn new(fallback: Vec<f32>) -> Self {
        Self {
            vectors: HashMap::new(),
            fallback,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with(mut self, text: &str, vector: Vec<f32>) -> Self {
        self.vectors.insert(text.to_string(), vector);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl IEmbeddingProvider for ScriptedEmbedder {
    fn embed(&self, text: &str) -> MnemosResult<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .vectors
            .get(text)
            .cloned()
            .unwrap_or_else(|| self.fallback.clone()))
    }

    fn dimensions(&self) -> usize {
        self.fallback.len()
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Always fails.
pub struct FailingEmbedder {
    pub dims: usize,
}

impl IEmbeddingProvider for FailingEmbedder {
    fn embed(&self, _text: &str) -> MnemosResult<Vec<f32>> {
        Err(down("embed"))
    }

    fn dimensions(&self) -> usize {
        self.dims
    }

    fn name(&self) -> &str {
        "failing"
    }

    fn is_available(&self) -> bool {
        false
    }
}

// ── Importance ──────────────────────────────────────────────────────────────

/// Scores by substring match, first match wins; `default` otherwise.
pub struct ScriptedScorer {
    rules: Vec<(String, f64)>,
    default: f64,
}

impl ScriptedScorer {
    pub fn constant(score: f64) -> Self {
        Self {
            rules: Vec::new(),
            default: score,
        }
    }

    pub fn when_contains(mut self, needle: &str, score: f64) -> Self {
        self.rules.push((needle.to_string(), score));
        self
    }
}

impl IImportanceScorer for ScriptedScorer {
    fn score(&self, text: &str, _context: Option<&str>) -> MnemosResult<f64> {
        Ok(self
            .rules
            .iter()
            .find(|(needle, _)| text.contains(needle.as_str()))
            .map_or(self.default, |(_, s)| *s))
    }
}

pub struct FailingScorer;

impl IImportanceScorer for FailingScorer {
    fn score(&self, _text: &str, _context: Option<&str>) -> MnemosResult<f64> {
        Err(down("score_importance"))
    }
}

/// Sleeps before answering. Used to drive capability timeouts.
pub struct SlowScorer {
    pub delay: Duration,
    pub score: f64,
}

impl IImportanceScorer for SlowScorer {
    fn score(&self, _text: &str, _context: Option<&str>) -> MnemosResult<f64> {
        thread::sleep(self.delay);
        Ok(self.score)
    }
}

// ── Topics ──────────────────────────────────────────────────────────────────

/// Returns the same topics for every text.
pub struct StaticTopics(pub Vec<String>);

impl ITopicExtractor for StaticTopics {
    fn extract(&self, _text: &str, max_count: usize) -> MnemosResult<Vec<String>> {
        Ok(self.0.iter().take(max_count).cloned().collect())
    }
}

pub struct FailingTopicExtractor;

impl ITopicExtractor for FailingTopicExtractor {
    fn extract(&self, _text: &str, _max_count: usize) -> MnemosResult<Vec<String>> {
        Err(down("extract_topics"))
    }
}

// ── Summaries ───────────────────────────────────────────────────────────────

/// "Summary of N: first | second | ...", counting calls.
#[derive(Default)]
pub struct JoinSummarizer {
    calls: AtomicUsize,
}

impl JoinSummarizer {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ISummarizer for JoinSummarizer {
    fn summarize(&self, contents: &[String]) -> MnemosResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("Summary of {}: {}", contents.len(), contents.join(" | ")))
    }
}

pub struct FailingSummarizer;

impl ISummarizer for FailingSummarizer {
    fn summarize(&self, _contents: &[String]) -> MnemosResult<String> {
        Err(down("summarize"))
    }
}

pub struct SlowSummarizer {
    pub delay: Duration,
}

impl ISummarizer for SlowSummarizer {
    fn summarize(&self, contents: &[String]) -> MnemosResult<String> {
        thread::sleep(self.delay);
        Ok(contents.join(" "))
    }
}

// ── Short-term log ──────────────────────────────────────────────────────────

/// In-memory short-term log. `pending` never drains it.
#[derive(Default)]
pub struct VecShortTermSource {
    records: Mutex<Vec<ShortTermRecord>>,
}

impl VecShortTermSource {
    pub fn new(records: Vec<ShortTermRecord>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }

    pub fn push(&self, record: ShortTermRecord) {
        self.records.lock().unwrap().push(record);
    }
}

impl IShortTermSource for VecShortTermSource {
    fn pending(&self, agent_id: &str) -> MnemosResult<Vec<ShortTermRecord>> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.agent_id == agent_id)
            .cloned()
            .collect())
    }
}

pub struct FailingShortTermSource;

impl IShortTermSource for FailingShortTermSource {
    fn pending(&self, _agent_id: &str) -> MnemosResult<Vec<ShortTermRecord>> {
        Err(down("short_term_log"))
    }
}
