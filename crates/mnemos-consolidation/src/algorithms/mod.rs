//! Text algorithms behind the local summariser and topic extractor.

pub mod sentence_splitter;
pub mod textrank;
pub mod tfidf;
