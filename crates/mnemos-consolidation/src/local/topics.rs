use mnemos_core::errors::MnemosResult;
use mnemos_core::traits::ITopicExtractor;

use crate::algorithms::sentence_splitter::split_sentences;
use crate::algorithms::tfidf::extract_key_phrases;

/// Topics are the top TF-IDF keywords of the text, each sentence counted as
/// one document.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordTopicExtractor;

impl ITopicExtractor for KeywordTopicExtractor {
    fn extract(&self, text: &str, max_count: usize) -> MnemosResult<Vec<String>> {
        let sentences = split_sentences(text);
        Ok(extract_key_phrases(&sentences, max_count)
            .into_iter()
            .map(|(term, _)| term)
            .collect())
    }
}
