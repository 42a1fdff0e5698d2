//! Property tests: score validation, topic normalization, config roundtrip.

use proptest::prelude::*;

use mnemos_core::memory::normalize_topics;
use mnemos_core::{Importance, MnemosConfig, Stability};

proptest! {
    #[test]
    fn prop_try_new_accepts_exactly_unit_interval(v in -2.0f64..3.0) {
        let ok = Importance::try_new(v).is_ok();
        prop_assert_eq!(ok, (0.0..=1.0).contains(&v));
        prop_assert_eq!(Stability::try_new(v).is_ok(), ok);
    }

    #[test]
    fn prop_clamped_is_always_valid(v in proptest::num::f64::ANY) {
        let s = Stability::clamped(v).value();
        prop_assert!((0.0..=1.0).contains(&s));
    }

    #[test]
    fn prop_normalize_topics_is_idempotent(topics in prop::collection::vec("[a-zA-Z ]{0,8}", 0..12)) {
        let once = normalize_topics(&topics);
        let twice = normalize_topics(&once);
        prop_assert_eq!(&once, &twice);
        prop_assert!(once.iter().all(|t| !t.trim().is_empty()));
    }

    #[test]
    fn prop_config_toml_roundtrip(threshold in 0.0f64..=1.0, size in 1usize..50) {
        let mut config = MnemosConfig::default();
        config.consolidation.similarity_threshold = threshold;
        config.consolidation.min_cluster_size = size;
        let text = toml::to_string(&config).unwrap();
        let parsed = MnemosConfig::from_toml(&text).unwrap();
        prop_assert_eq!(parsed.consolidation.min_cluster_size, size);
        prop_assert!((parsed.consolidation.similarity_threshold - threshold).abs() < 1e-12);
        prop_assert!(parsed.validate().is_ok());
    }
}
