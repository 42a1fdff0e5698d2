//! Hashed TF-IDF embeddings.
//!
//! Terms are hashed (FNV-1a) into a fixed number of buckets and weighted by
//! sublinear term frequency times a length-based IDF approximation. A second
//! hash picks the sign so colliding terms tend to cancel rather than pile up.
//! Deterministic and offline; no corpus statistics are kept.

use std::collections::HashMap;

use mnemos_core::errors::MnemosResult;
use mnemos_core::traits::IEmbeddingProvider;

use crate::similarity::l2_normalize;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

pub struct HashedTfIdf {
    dimensions: usize,
}

impl HashedTfIdf {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
        }
    }

    fn fnv1a(term: &str) -> u64 {
        term.bytes().fold(FNV_OFFSET, |h, b| {
            (h ^ u64::from(b)).wrapping_mul(FNV_PRIME)
        })
    }

    /// Lowercase alphanumeric runs of at least two characters.
    pub fn tokenize(text: &str) -> Vec<String> {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|t| t.chars().count() >= 2)
            .map(str::to_lowercase)
            .collect()
    }

    fn vectorize(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0.0f32; self.dimensions];
        let tokens = Self::tokenize(text);
        if tokens.is_empty() {
            return v;
        }

        let mut counts: HashMap<&str, u32> = HashMap::new();
        for t in &tokens {
            *counts.entry(t.as_str()).or_default() += 1;
        }

        for (term, count) in counts {
            let tf = 1.0 + (count as f32).ln();
            // Longer terms are rarer; short ones behave like stop words.
            let idf = 1.0 + (term.chars().count() as f32).ln();
            let h = Self::fnv1a(term);
            let bucket = (h % self.dimensions as u64) as usize;
            let sign = if (h >> 63) == 0 { 1.0 } else { -1.0 };
            v[bucket] += sign * tf * idf;
        }

        l2_normalize(&mut v);
        v
    }
}

impl IEmbeddingProvider for HashedTfIdf {
    fn embed(&self, text: &str) -> MnemosResult<Vec<f32>> {
        Ok(self.vectorize(text))
    }

    fn embed_batch(&self, texts: &[String]) -> MnemosResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.vectorize(t)).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "tfidf"
    }
}
