//! # mnemos-embeddings
//!
//! Embedding providers behind [`IEmbeddingProvider`](mnemos_core::traits::IEmbeddingProvider),
//! a fallback chain that ends in the always-available hashed TF-IDF provider,
//! and the vector math shared by clustering, dedup and ranking.

pub mod degradation;
pub mod providers;
pub mod similarity;

pub use degradation::FallbackChain;
pub use providers::{create_provider, ApiProvider, HashedTfIdf};
pub use similarity::{centroid, cosine_similarity, l2_normalize};
