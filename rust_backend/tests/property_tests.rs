//! Property-based tests for the time map stages.

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use proptest::prelude::*;
use timemap::core::domain::{LogScale, SeparationPair};
use timemap::services::{
    DensitySmoother, LogGridBinner, LogTickPlanner, SeparationExtractor, TickSpace,
};

fn instants_from_offsets(offsets: &[i64]) -> Vec<DateTime<Utc>> {
    let base = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
    offsets
        .iter()
        .map(|s| base + TimeDelta::seconds(*s))
        .collect()
}

/// Sorted offsets built from non-negative steps, so zero gaps occur often
fn sorted_offsets() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(prop_oneof![Just(0i64), 1i64..100_000], 2..60).prop_map(|steps| {
        let mut acc = 0i64;
        let mut out = vec![0i64];
        for s in steps {
            acc += s;
            out.push(acc);
        }
        out
    })
}

fn positive_pairs() -> impl Strategy<Value = Vec<SeparationPair>> {
    prop::collection::vec((1.0f64..1e6, 1.0f64..1e6), 1..80).prop_map(|v| {
        v.into_iter()
            .map(|(a, b)| SeparationPair::from_secs(a, b))
            .collect()
    })
}

proptest! {
    #[test]
    fn prop_pair_count_is_n_minus_two(offsets in sorted_offsets()) {
        let n = offsets.len();
        let seps = SeparationExtractor::default()
            .extract(&instants_from_offsets(&offsets))
            .unwrap();
        prop_assert_eq!(seps.pairs.len(), n - 2);
        prop_assert_eq!(seps.time_of_day.len(), n - 2);
    }

    #[test]
    fn prop_gaps_strictly_positive(offsets in sorted_offsets()) {
        let seps = SeparationExtractor::default()
            .extract(&instants_from_offsets(&offsets))
            .unwrap();
        for pair in &seps.pairs {
            prop_assert!(pair.before.value() >= 1.0);
            prop_assert!(pair.after.value() >= 1.0);
        }
        // Consecutive pairs share their middle gap
        for w in seps.pairs.windows(2) {
            prop_assert_eq!(w[0].after, w[1].before);
        }
    }

    #[test]
    fn prop_time_of_day_in_range(offsets in sorted_offsets()) {
        let seps = SeparationExtractor::default()
            .extract(&instants_from_offsets(&offsets))
            .unwrap();
        for t in &seps.time_of_day {
            prop_assert!(t.value() >= 0.0 && t.value() < 1440.0);
        }
    }

    #[test]
    fn prop_binner_deterministic(pairs in positive_pairs(), side in 1usize..64) {
        let binner = LogGridBinner::new(side).unwrap();
        let a = binner.bin(&pairs).unwrap();
        let b = binner.bin(&pairs).unwrap();
        prop_assert_eq!(&a.grid, &b.grid);
        prop_assert_eq!(a.scale.min_val.to_bits(), b.scale.min_val.to_bits());
        prop_assert_eq!(a.scale.scale.to_bits(), b.scale.scale.to_bits());
    }

    #[test]
    fn prop_binned_mass_equals_pair_count(pairs in positive_pairs(), side in 1usize..64) {
        let binned = LogGridBinner::new(side).unwrap().bin(&pairs).unwrap();
        prop_assert_eq!(binned.grid.total(), pairs.len() as u64);
    }

    #[test]
    fn prop_boundary_alignment(lo in 0.5f64..1e3, factor in 1.5f64..1e4, side in 2usize..2048) {
        let hi = lo * factor;
        let scale = LogScale::from_range(lo, hi, side);
        let plan = LogTickPlanner::default().plan(lo, hi, TickSpace::Grid(scale));
        let positions = plan.positions();
        prop_assert!(positions[0].abs() < 1e-9);
        prop_assert!((positions[positions.len() - 1] - (side - 1) as f64).abs() < 1e-9);
        prop_assert!(positions.iter().all(|p| *p >= 0.0 && *p <= (side - 1) as f64));
    }

    #[test]
    fn prop_blur_preserves_mass(pairs in positive_pairs(), side in 1usize..24, sigma in 0.5f64..6.0) {
        let binned = LogGridBinner::new(side).unwrap().bin(&pairs).unwrap();
        let blurred = DensitySmoother::new(sigma).unwrap().blur(&binned.grid);
        let expected = pairs.len() as f64;
        prop_assert!((blurred.total() - expected).abs() < 1e-6 * expected.max(1.0));
    }

    #[test]
    fn prop_sqrt_preserves_order(pairs in positive_pairs(), side in 2usize..16) {
        let binned = LogGridBinner::new(side).unwrap().bin(&pairs).unwrap();
        let blurred = DensitySmoother::new(1.0).unwrap().blur(&binned.grid);
        let rooted = blurred.sqrt();
        let before = blurred.as_slice();
        let after = rooted.as_slice();
        for i in 1..before.len() {
            if before[i] >= before[i - 1] {
                prop_assert!(after[i] >= after[i - 1]);
            } else {
                prop_assert!(after[i] <= after[i - 1]);
            }
        }
    }
}
