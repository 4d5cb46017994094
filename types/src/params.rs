//! Program parameters.

use crate::points::DEFAULT_MULTIPLIER_BPS;
use serde::{Deserialize, Serialize};

/// Tunable knobs of the testnet program's scoring engine.
///
/// Kept together so deployments can adjust them in one place; the defaults
/// are the live program's configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProgramParams {
    /// Referrer's share of referred contribution points, in basis points.
    /// Default: 1000 (10%).
    pub referral_reward_bps: u32,

    /// Multiplier substituted when a forced freeze finds no active
    /// multiplier (automated generators with the force flag only).
    pub fallback_multiplier_bps: u32,

    /// Raw points per auto-generated daily uptime contribution.
    pub daily_uptime_points: u64,
}

impl ProgramParams {
    /// The live testnet program configuration.
    pub fn testnet_defaults() -> Self {
        Self {
            referral_reward_bps: 1_000, // 10%
            fallback_multiplier_bps: DEFAULT_MULTIPLIER_BPS,
            daily_uptime_points: 1,
        }
    }
}

impl Default for ProgramParams {
    fn default() -> Self {
        Self::testnet_defaults()
    }
}
