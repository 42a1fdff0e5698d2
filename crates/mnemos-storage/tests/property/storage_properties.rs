//! Property tests: insert→get roundtrip, link pair symmetry.

use chrono::Utc;
use proptest::prelude::*;

use mnemos_core::memory::LinkType;
use mnemos_core::traits::{ILinkStorage, IMemoryStorage};
use mnemos_storage::StorageEngine;
use test_fixtures::MemoryBuilder;

proptest! {
    #[test]
    fn prop_insert_get_roundtrip(
        content in "[a-zA-Z0-9 ,.]{1,120}",
        importance in 0.0f64..=1.0,
        stability in 0.0f64..=1.0,
        embedding in prop::collection::vec(-1.0f32..1.0, 0..16),
    ) {
        prop_assume!(!content.trim().is_empty());
        let engine = StorageEngine::open_in_memory().unwrap();
        let memory = MemoryBuilder::new("agent-p", &content)
            .importance(importance)
            .stability(stability)
            .embedding(embedding)
            .build();

        engine.create(&memory).unwrap();
        let loaded = engine.get(&memory.id).unwrap().unwrap();
        prop_assert_eq!(loaded, memory);
    }

    #[test]
    fn prop_link_pair_stays_symmetric(
        steps in prop::collection::vec((any::<bool>(), 0.0f64..0.4), 1..20),
    ) {
        let engine = StorageEngine::open_in_memory().unwrap();
        let a = MemoryBuilder::new("agent-p", "left").build();
        let b = MemoryBuilder::new("agent-p", "right").build();
        engine.create(&a).unwrap();
        engine.create(&b).unwrap();

        let mut last = 0.0;
        for (flip, inc) in steps {
            let (s, t) = if flip { (&b.id, &a.id) } else { (&a.id, &b.id) };
            let update = engine
                .upsert_link_pair(s, t, LinkType::Association, Utc::now(), &mut |cur| {
                    Ok(cur.map_or(0.5, |v| (v + inc).min(1.0)))
                })
                .unwrap();
            prop_assert!(update.strength >= last);
            last = update.strength;

            let ab = engine.get_link(&a.id, &b.id).unwrap().unwrap();
            let ba = engine.get_link(&b.id, &a.id).unwrap().unwrap();
            prop_assert_eq!(ab.strength, ba.strength);
            prop_assert!((0.0..=1.0).contains(&ab.strength));
        }
    }
}
