use std::collections::HashSet;

use mnemos_core::config::defaults::DEFAULT_SUMMARY_SENTENCES;
use mnemos_core::errors::{MnemosError, MnemosResult};
use mnemos_core::traits::ISummarizer;

use crate::algorithms::sentence_splitter::split_sentences;
use crate::algorithms::textrank::top_sentences;

/// Extractive summariser: the highest-ranked sentences across all contents,
/// in the order they first appeared.
#[derive(Debug, Clone, Copy)]
pub struct TextRankSummarizer {
    max_sentences: usize,
}

impl TextRankSummarizer {
    pub fn new(max_sentences: usize) -> Self {
        Self {
            max_sentences: max_sentences.max(1),
        }
    }
}

impl Default for TextRankSummarizer {
    fn default() -> Self {
        Self::new(DEFAULT_SUMMARY_SENTENCES)
    }
}

impl ISummarizer for TextRankSummarizer {
    fn summarize(&self, contents: &[String]) -> MnemosResult<String> {
        let mut seen = HashSet::new();
        let sentences: Vec<String> = contents
            .iter()
            .flat_map(|c| split_sentences(c))
            .filter(|s| seen.insert(s.to_lowercase()))
            .collect();
        if sentences.is_empty() {
            return Err(MnemosError::validation("contents", "nothing to summarize"));
        }

        let picked = top_sentences(&sentences, self.max_sentences);
        Ok(picked
            .into_iter()
            .map(|i| sentences[i].as_str())
            .collect::<Vec<_>>()
            .join(" "))
    }
}
