//! Fixed-point multiplier arithmetic.
//!
//! Multipliers are integer basis points (10000 = 1.0×) to keep every scoring
//! path in exact integer arithmetic. Frozen global points round half-up;
//! the referral cut truncates (floor). Both rules are fixed program-wide so
//! historical totals are reproducible.

/// Basis-point scale: 10000 bps = 1.0×.
pub const BPS_SCALE: u32 = 10_000;

/// The 1.0× multiplier, used as the explicit fallback by forced freezes.
pub const DEFAULT_MULTIPLIER_BPS: u32 = BPS_SCALE;

/// Frozen global points for a contribution: `points × multiplier`, rounded
/// half-up. Captured once at contribution creation and never recomputed.
pub fn freeze_points(points: u64, multiplier_bps: u32) -> u64 {
    let scaled = points as u128 * multiplier_bps as u128 + (BPS_SCALE as u128 / 2);
    (scaled / BPS_SCALE as u128) as u64
}

/// The referrer's cut of a summed category base: `base × reward`, truncated.
pub fn referral_cut(base: u64, reward_bps: u32) -> u64 {
    (base as u128 * reward_bps as u128 / BPS_SCALE as u128) as u64
}
