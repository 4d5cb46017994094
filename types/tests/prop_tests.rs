use proptest::prelude::*;

use tally_types::{freeze_points, referral_cut, Timestamp, BPS_SCALE, DEFAULT_MULTIPLIER_BPS};

proptest! {
    /// Freezing at 1.0× is the identity.
    #[test]
    fn freeze_identity_at_one(points in 0u64..1_000_000_000) {
        prop_assert_eq!(freeze_points(points, DEFAULT_MULTIPLIER_BPS), points);
    }

    /// Frozen points are monotonic in both raw points and multiplier.
    #[test]
    fn freeze_monotonic(
        points in 0u64..1_000_000,
        extra in 0u64..1_000_000,
        bps in 1u32..100_000,
        extra_bps in 0u32..100_000,
    ) {
        prop_assert!(freeze_points(points + extra, bps) >= freeze_points(points, bps));
        prop_assert!(freeze_points(points, bps + extra_bps) >= freeze_points(points, bps));
    }

    /// Half-up rounding never deviates from the exact product by more than half.
    #[test]
    fn freeze_within_rounding_error(points in 0u64..1_000_000, bps in 1u32..100_000) {
        let exact = points as u128 * bps as u128;
        let frozen = freeze_points(points, bps) as u128 * BPS_SCALE as u128;
        let diff = exact.abs_diff(frozen);
        prop_assert!(diff <= BPS_SCALE as u128 / 2, "diff {} exceeds half-unit", diff);
    }

    /// The referral cut never exceeds the proportional share.
    #[test]
    fn referral_cut_is_floor(base in 0u64..1_000_000_000, bps in 0u32..BPS_SCALE) {
        let cut = referral_cut(base, bps);
        let exact = base as u128 * bps as u128;
        prop_assert!(cut as u128 * BPS_SCALE as u128 <= exact);
        prop_assert!((cut as u128 + 1) * BPS_SCALE as u128 > exact);
    }

    /// Splitting a base across rows can only lose points to truncation,
    /// never gain them: cut(a) + cut(b) <= cut(a + b).
    #[test]
    fn referral_cut_superadditive(a in 0u64..1_000_000, b in 0u64..1_000_000, bps in 0u32..BPS_SCALE) {
        prop_assert!(referral_cut(a, bps) + referral_cut(b, bps) <= referral_cut(a + b, bps));
    }

    /// Timestamp ordering follows the raw seconds.
    #[test]
    fn timestamp_ordering(a in 0u64..u64::MAX, b in 0u64..u64::MAX) {
        prop_assert_eq!(Timestamp::new(a) <= Timestamp::new(b), a <= b);
    }

    /// start_of_day is idempotent and never in the future of its input.
    #[test]
    fn start_of_day_idempotent(secs in 0u64..u64::MAX / 2) {
        let t = Timestamp::new(secs);
        let midnight = t.start_of_day();
        prop_assert!(midnight <= t);
        prop_assert_eq!(midnight.start_of_day(), midnight);
        prop_assert_eq!(midnight.day(), t.day());
    }
}
