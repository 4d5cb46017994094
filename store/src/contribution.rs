//! Contribution-ledger storage trait.

use crate::StoreError;
use serde::{Deserialize, Serialize};
use tally_types::{ContributionId, Timestamp, UserId};

/// A ledger row: one frozen, timestamped, point-bearing action.
///
/// `multiplier_bps` and `frozen_global_points` are captured exactly once at
/// creation; every aggregate in the program reads the frozen value, never
/// `points` times the current multiplier. Only the administrative re-freeze
/// operation may rewrite them.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Contribution {
    pub id: ContributionId,
    pub user: UserId,
    pub type_slug: String,
    /// Raw points as submitted.
    pub points: u64,
    /// Multiplier in force at `contribution_date`, frozen at creation.
    pub multiplier_bps: u32,
    /// `points × multiplier`, rounded half-up, frozen at creation.
    pub frozen_global_points: u64,
    pub contribution_date: Timestamp,
    pub notes: String,
}

/// A ledger row ready for insertion; the store assigns the id.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewContribution {
    pub user: UserId,
    pub type_slug: String,
    pub points: u64,
    pub multiplier_bps: u32,
    pub frozen_global_points: u64,
    pub contribution_date: Timestamp,
    pub notes: String,
}

/// Trait for contribution-ledger storage operations.
///
/// The ledger is append-only in normal operation; `update_contribution`
/// exists solely for the administrative re-freeze.
pub trait ContributionStore {
    fn append_contribution(&self, row: NewContribution) -> Result<Contribution, StoreError>;
    fn get_contribution(&self, id: ContributionId) -> Result<Contribution, StoreError>;
    fn update_contribution(&self, row: &Contribution) -> Result<(), StoreError>;

    /// Full ledger scan, ordered by id (insertion order).
    fn iter_contributions(&self) -> Result<Vec<Contribution>, StoreError>;

    fn contributions_for(&self, user: UserId) -> Result<Vec<Contribution>, StoreError> {
        Ok(self
            .iter_contributions()?
            .into_iter()
            .filter(|c| c.user == user)
            .collect())
    }

    /// Whether a row with the same user, type and date already exists.
    fn contribution_exists(
        &self,
        user: UserId,
        type_slug: &str,
        date: Timestamp,
    ) -> Result<bool, StoreError> {
        Ok(self
            .contributions_for(user)?
            .iter()
            .any(|c| c.type_slug == type_slug && c.contribution_date == date))
    }

    fn contribution_count(&self) -> Result<u64, StoreError> {
        self.iter_contributions().map(|v| v.len() as u64)
    }
}
