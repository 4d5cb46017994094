//! LMDB implementation of LeaderboardStore.

use tally_store::{LeaderboardEntry, LeaderboardStore, StoreError};
use tally_types::{LeaderboardKind, UserId};

use crate::environment::{entry_key, entry_prefix};
use crate::{LmdbError, LmdbStore};

impl LeaderboardStore for LmdbStore {
    fn get_entry(
        &self,
        user: UserId,
        kind: LeaderboardKind,
    ) -> Result<Option<LeaderboardEntry>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        match self
            .entries
            .get(&rtxn, entry_key(user, kind).as_slice())
            .map_err(LmdbError::from)?
        {
            Some(bytes) => Ok(Some(bincode::deserialize(bytes).map_err(LmdbError::from)?)),
            None => Ok(None),
        }
    }

    fn put_entry(&self, entry: &LeaderboardEntry) -> Result<(), StoreError> {
        let bytes = bincode::serialize(entry).map_err(LmdbError::from)?;
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.entries
            .put(&mut wtxn, entry_key(entry.user, entry.kind).as_slice(), &bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    /// One transaction for the whole batch, unlike the default per-row loop.
    fn put_entries(&self, entries: &[LeaderboardEntry]) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        for entry in entries {
            let bytes = bincode::serialize(entry).map_err(LmdbError::from)?;
            self.entries
                .put(&mut wtxn, entry_key(entry.user, entry.kind).as_slice(), &bytes)
                .map_err(LmdbError::from)?;
        }
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn delete_entry(&self, user: UserId, kind: LeaderboardKind) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.entries
            .delete(&mut wtxn, entry_key(user, kind).as_slice())
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn entries_for_kind(
        &self,
        kind: LeaderboardKind,
    ) -> Result<Vec<LeaderboardEntry>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let mut entries = Vec::new();
        for item in self.entries.iter(&rtxn).map_err(LmdbError::from)? {
            let (_, bytes) = item.map_err(LmdbError::from)?;
            let entry: LeaderboardEntry = bincode::deserialize(bytes).map_err(LmdbError::from)?;
            if entry.kind == kind {
                entries.push(entry);
            }
        }
        Ok(entries)
    }

    fn entries_for_user(&self, user: UserId) -> Result<Vec<LeaderboardEntry>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let prefix = entry_prefix(user);
        let mut entries = Vec::new();
        for item in self
            .entries
            .prefix_iter(&rtxn, prefix.as_slice())
            .map_err(LmdbError::from)?
        {
            let (_, bytes) = item.map_err(LmdbError::from)?;
            entries.push(bincode::deserialize(bytes).map_err(LmdbError::from)?);
        }
        Ok(entries)
    }

    fn clear_entries(&self) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.entries.clear(&mut wtxn).map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }
}
