//! Leaderboard-entry storage trait.

use crate::StoreError;
use serde::{Deserialize, Serialize};
use tally_types::{LeaderboardKind, Timestamp, UserId};

/// One row per (user, kind): derived state, fully reconstructible from the
/// contribution ledger plus multiplier history.
///
/// For the graduation kind, `total_points` and `graduation_date` are frozen
/// forever once the row exists. Every other kind is recomputed freely.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub user: UserId,
    pub kind: LeaderboardKind,
    pub total_points: u64,
    /// Dense 1..N among visible users; `None` for non-visible users.
    pub rank: Option<u32>,
    /// Set only for the graduation kind: the earliest graduation-marker date.
    pub graduation_date: Option<Timestamp>,
}

/// Trait for leaderboard-entry storage operations.
pub trait LeaderboardStore {
    fn get_entry(
        &self,
        user: UserId,
        kind: LeaderboardKind,
    ) -> Result<Option<LeaderboardEntry>, StoreError>;

    fn put_entry(&self, entry: &LeaderboardEntry) -> Result<(), StoreError>;

    /// Bulk insert used by the batch rebuild.
    fn put_entries(&self, entries: &[LeaderboardEntry]) -> Result<(), StoreError> {
        for e in entries {
            self.put_entry(e)?;
        }
        Ok(())
    }

    fn delete_entry(&self, user: UserId, kind: LeaderboardKind) -> Result<(), StoreError>;

    fn entries_for_kind(&self, kind: LeaderboardKind)
        -> Result<Vec<LeaderboardEntry>, StoreError>;

    fn entries_for_user(&self, user: UserId) -> Result<Vec<LeaderboardEntry>, StoreError>;

    /// Wipe all entries (batch rebuild only).
    fn clear_entries(&self) -> Result<(), StoreError>;
}
