//! Referral-points storage trait.

use crate::StoreError;
use serde::{Deserialize, Serialize};
use tally_types::{referral_cut, UserId};

/// Per-referrer running totals of countable referred frozen points.
///
/// The row stores the raw per-category base sums; the referrer's actual
/// credit is derived by applying the reward cut once per category, so the
/// incremental path can update a base with a plain integer add and still
/// agree with the batch rebuild.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReferralPoints {
    pub user: UserId,
    /// Sum of countable referred builder-category frozen points.
    pub builder_base: u64,
    /// Sum of countable referred validator-category frozen points.
    pub validator_base: u64,
}

impl ReferralPoints {
    pub fn zero(user: UserId) -> Self {
        Self {
            user,
            builder_base: 0,
            validator_base: 0,
        }
    }

    /// Builder-category referral credit at the given reward rate.
    pub fn builder_points(&self, reward_bps: u32) -> u64 {
        referral_cut(self.builder_base, reward_bps)
    }

    /// Validator-category referral credit at the given reward rate.
    pub fn validator_points(&self, reward_bps: u32) -> u64 {
        referral_cut(self.validator_base, reward_bps)
    }

    /// Combined credit, as folded into waitlist leaderboard points.
    pub fn combined_points(&self, reward_bps: u32) -> u64 {
        self.builder_points(reward_bps) + self.validator_points(reward_bps)
    }
}

/// Trait for referral-points storage operations.
pub trait ReferralStore {
    fn get_referral(&self, user: UserId) -> Result<Option<ReferralPoints>, StoreError>;
    fn put_referral(&self, record: &ReferralPoints) -> Result<(), StoreError>;

    /// Bulk insert used by the batch rebuild.
    fn put_referrals(&self, records: &[ReferralPoints]) -> Result<(), StoreError> {
        for r in records {
            self.put_referral(r)?;
        }
        Ok(())
    }

    fn delete_referral(&self, user: UserId) -> Result<(), StoreError>;
    fn iter_referrals(&self) -> Result<Vec<ReferralPoints>, StoreError>;

    /// Wipe all referral rows (batch rebuild only).
    fn clear_referrals(&self) -> Result<(), StoreError>;
}
