//! Property tests: retention bounds and monotonicity, reinforcement bounds.

use chrono::{Duration, Utc};
use proptest::prelude::*;

use mnemos_core::memory::{Importance, Stability};
use mnemos_decay::reinforcement::{apply, compute, ReinforcementParams};
use mnemos_decay::retention::{decay_constant, retention_after_days};
use test_fixtures::MemoryBuilder;

proptest! {
    #[test]
    fn prop_retention_in_unit_interval(
        s in 0.0f64..=1.0,
        i in 0.0f64..=1.0,
        days in 0.0f64..10_000.0,
    ) {
        let r = retention_after_days(
            Stability::try_new(s).unwrap(),
            Importance::try_new(i).unwrap(),
            days,
        ).unwrap();
        prop_assert!((0.0..=1.0).contains(&r));
    }

    #[test]
    fn prop_retention_monotone_in_time(
        s in 0.0f64..=1.0,
        i in 0.0f64..=1.0,
        d1 in 0.0f64..500.0,
        extra in 0.0f64..500.0,
    ) {
        let s = Stability::try_new(s).unwrap();
        let i = Importance::try_new(i).unwrap();
        let early = retention_after_days(s, i, d1).unwrap();
        let late = retention_after_days(s, i, d1 + extra).unwrap();
        prop_assert!(late <= early);
    }

    #[test]
    fn prop_retention_monotone_in_stability_and_importance(
        s in 0.0f64..0.9,
        i in 0.0f64..0.9,
        ds in 0.0f64..0.1,
        di in 0.0f64..0.1,
        days in 0.0f64..365.0,
    ) {
        let base = retention_after_days(
            Stability::try_new(s).unwrap(), Importance::try_new(i).unwrap(), days,
        ).unwrap();
        let boosted = retention_after_days(
            Stability::try_new(s + ds).unwrap(), Importance::try_new(i + di).unwrap(), days,
        ).unwrap();
        prop_assert!(boosted >= base);
    }

    #[test]
    fn prop_decay_constant_at_least_one_day(s in 0.0f64..=1.0, i in 0.0f64..=1.0) {
        let k = decay_constant(Stability::try_new(s).unwrap(), Importance::try_new(i).unwrap());
        prop_assert!(k >= 1.0);
    }

    #[test]
    fn prop_reinforcement_never_lowers_stability(
        s in 0.0f64..=1.0,
        days in -30.0f64..365.0,
    ) {
        let old = Stability::try_new(s).unwrap();
        let (_, new) = compute(&ReinforcementParams::default(), old, days);
        prop_assert!(new.value() >= old.value());
        prop_assert!(new.value() <= 1.0);
    }

    #[test]
    fn prop_apply_increments_access_and_never_rewinds(
        count in 0u64..1000,
        offset_hours in -48i64..48,
    ) {
        let now = Utc::now();
        let last = now + Duration::hours(offset_hours);
        let mut memory = MemoryBuilder::new("agent", "x").last_accessed(last).access_count(count).build();
        apply(&ReinforcementParams::default(), &mut memory, now);
        prop_assert_eq!(memory.access_count, count + 1);
        prop_assert!(memory.last_accessed >= last);
    }
}
