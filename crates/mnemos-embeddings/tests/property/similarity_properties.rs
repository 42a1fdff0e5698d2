//! Property tests: cosine bounds and symmetry, TF-IDF determinism.

use proptest::prelude::*;

use mnemos_core::traits::IEmbeddingProvider;
use mnemos_embeddings::{centroid, cosine_similarity, HashedTfIdf};

proptest! {
    #[test]
    fn prop_cosine_bounded_and_symmetric(
        pair in (1usize..32).prop_flat_map(|n| (
            prop::collection::vec(-10.0f32..10.0, n),
            prop::collection::vec(-10.0f32..10.0, n),
        )),
    ) {
        let (a, b) = pair;
        let ab = cosine_similarity(&a, &b);
        let ba = cosine_similarity(&b, &a);
        prop_assert!((-1.0..=1.0).contains(&ab));
        prop_assert!((ab - ba).abs() < 1e-12);
    }

    #[test]
    fn prop_centroid_is_unit_or_zero(
        vectors in prop::collection::vec(prop::collection::vec(-1.0f32..1.0, 8), 1..10),
    ) {
        let c = centroid(vectors.iter().map(Vec::as_slice)).unwrap();
        let norm: f32 = c.iter().map(|x| x * x).sum::<f32>().sqrt();
        prop_assert!(norm < 1e-3 || (norm - 1.0).abs() < 1e-4);
    }

    #[test]
    fn prop_tfidf_deterministic_fixed_dimension(text in "[a-zA-Z ]{0,200}") {
        let p = HashedTfIdf::new(96);
        let a = p.embed(&text).unwrap();
        prop_assert_eq!(a.len(), 96);
        prop_assert_eq!(a, p.embed(&text).unwrap());
    }
}
