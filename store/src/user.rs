//! Participant storage trait.

use crate::StoreError;
use serde::{Deserialize, Serialize};
use tally_types::{Timestamp, UserId};

/// A program participant as the engine sees them: read-only inputs to
/// membership predicates, referral attribution and rank tie-breaking.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    /// Display name, second tie-breaker in ranking.
    pub name: String,
    /// Non-visible users keep their entries but never receive a rank.
    pub visible: bool,
    /// Account creation time, first tie-breaker in ranking.
    pub joined_at: Timestamp,
    /// The user who referred this one, if any.
    pub referred_by: Option<UserId>,
}

/// Trait for participant storage operations.
pub trait UserStore {
    fn get_user(&self, id: UserId) -> Result<UserRecord, StoreError>;
    fn put_user(&self, user: &UserRecord) -> Result<(), StoreError>;
    fn user_exists(&self, id: UserId) -> Result<bool, StoreError>;
    fn iter_users(&self) -> Result<Vec<UserRecord>, StoreError>;

    fn user_count(&self) -> Result<u64, StoreError> {
        self.iter_users().map(|v| v.len() as u64)
    }

    /// All users referred by `referrer`.
    fn referred_users(&self, referrer: UserId) -> Result<Vec<UserRecord>, StoreError> {
        Ok(self
            .iter_users()?
            .into_iter()
            .filter(|u| u.referred_by == Some(referrer))
            .collect())
    }
}
