//! In-memory storage backend.
//!
//! Backs the test suites and lightweight single-process deployments.
//! BTreeMaps keep iteration order deterministic, which the recalculation
//! equivalence tests rely on.

use std::collections::BTreeMap;
use std::sync::RwLock;

use tally_types::{ContributionId, LeaderboardKind, Timestamp, UserId};

use crate::contribution::{Contribution, ContributionStore, NewContribution};
use crate::contribution_type::{ContributionType, ContributionTypeStore};
use crate::leaderboard::{LeaderboardEntry, LeaderboardStore};
use crate::multiplier::{MultiplierRecord, MultiplierStore};
use crate::referral::{ReferralPoints, ReferralStore};
use crate::user::{UserRecord, UserStore};
use crate::StoreError;

#[derive(Default)]
struct Inner {
    users: BTreeMap<UserId, UserRecord>,
    types: BTreeMap<String, ContributionType>,
    // Keyed by (type slug, valid_from seconds); one history entry per pair.
    multipliers: BTreeMap<(String, u64), MultiplierRecord>,
    contributions: BTreeMap<ContributionId, Contribution>,
    next_contribution_id: u64,
    entries: BTreeMap<(UserId, LeaderboardKind), LeaderboardEntry>,
    referrals: BTreeMap<UserId, ReferralPoints>,
}

/// All six store traits behind one in-process handle.
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
        }
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Inner>, StoreError> {
        self.inner
            .read()
            .map_err(|_| StoreError::Backend("memory store lock poisoned".into()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Inner>, StoreError> {
        self.inner
            .write()
            .map_err(|_| StoreError::Backend("memory store lock poisoned".into()))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl UserStore for MemoryStore {
    fn get_user(&self, id: UserId) -> Result<UserRecord, StoreError> {
        self.read()?
            .users
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("{id}")))
    }

    fn put_user(&self, user: &UserRecord) -> Result<(), StoreError> {
        self.write()?.users.insert(user.id, user.clone());
        Ok(())
    }

    fn user_exists(&self, id: UserId) -> Result<bool, StoreError> {
        Ok(self.read()?.users.contains_key(&id))
    }

    fn iter_users(&self) -> Result<Vec<UserRecord>, StoreError> {
        Ok(self.read()?.users.values().cloned().collect())
    }
}

impl ContributionTypeStore for MemoryStore {
    fn get_type(&self, slug: &str) -> Result<ContributionType, StoreError> {
        self.read()?
            .types
            .get(slug)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("contribution type '{slug}'")))
    }

    fn put_type(&self, ty: &ContributionType) -> Result<(), StoreError> {
        self.write()?.types.insert(ty.slug.clone(), ty.clone());
        Ok(())
    }

    fn iter_types(&self) -> Result<Vec<ContributionType>, StoreError> {
        Ok(self.read()?.types.values().cloned().collect())
    }
}

impl MultiplierStore for MemoryStore {
    fn put_multiplier(&self, record: &MultiplierRecord) -> Result<(), StoreError> {
        self.write()?.multipliers.insert(
            (record.type_slug.clone(), record.valid_from.as_secs()),
            record.clone(),
        );
        Ok(())
    }

    fn multipliers_for(&self, type_slug: &str) -> Result<Vec<MultiplierRecord>, StoreError> {
        // BTreeMap range over the (slug, secs) key space is already sorted
        // by valid_from within one slug.
        let inner = self.read()?;
        Ok(inner
            .multipliers
            .range((type_slug.to_string(), 0)..=(type_slug.to_string(), u64::MAX))
            .map(|(_, v)| v.clone())
            .collect())
    }

    fn iter_multipliers(&self) -> Result<Vec<MultiplierRecord>, StoreError> {
        Ok(self.read()?.multipliers.values().cloned().collect())
    }

    fn delete_multiplier(&self, type_slug: &str, valid_from: Timestamp) -> Result<(), StoreError> {
        self.write()?
            .multipliers
            .remove(&(type_slug.to_string(), valid_from.as_secs()));
        Ok(())
    }
}

impl ContributionStore for MemoryStore {
    fn append_contribution(&self, row: NewContribution) -> Result<Contribution, StoreError> {
        let mut inner = self.write()?;
        let id = ContributionId::new(inner.next_contribution_id);
        inner.next_contribution_id += 1;
        let contribution = Contribution {
            id,
            user: row.user,
            type_slug: row.type_slug,
            points: row.points,
            multiplier_bps: row.multiplier_bps,
            frozen_global_points: row.frozen_global_points,
            contribution_date: row.contribution_date,
            notes: row.notes,
        };
        inner.contributions.insert(id, contribution.clone());
        Ok(contribution)
    }

    fn get_contribution(&self, id: ContributionId) -> Result<Contribution, StoreError> {
        self.read()?
            .contributions
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("{id}")))
    }

    fn update_contribution(&self, row: &Contribution) -> Result<(), StoreError> {
        let mut inner = self.write()?;
        if !inner.contributions.contains_key(&row.id) {
            return Err(StoreError::NotFound(format!("{}", row.id)));
        }
        inner.contributions.insert(row.id, row.clone());
        Ok(())
    }

    fn iter_contributions(&self) -> Result<Vec<Contribution>, StoreError> {
        Ok(self.read()?.contributions.values().cloned().collect())
    }
}

impl LeaderboardStore for MemoryStore {
    fn get_entry(
        &self,
        user: UserId,
        kind: LeaderboardKind,
    ) -> Result<Option<LeaderboardEntry>, StoreError> {
        Ok(self.read()?.entries.get(&(user, kind)).cloned())
    }

    fn put_entry(&self, entry: &LeaderboardEntry) -> Result<(), StoreError> {
        self.write()?
            .entries
            .insert((entry.user, entry.kind), entry.clone());
        Ok(())
    }

    fn delete_entry(&self, user: UserId, kind: LeaderboardKind) -> Result<(), StoreError> {
        self.write()?.entries.remove(&(user, kind));
        Ok(())
    }

    fn entries_for_kind(
        &self,
        kind: LeaderboardKind,
    ) -> Result<Vec<LeaderboardEntry>, StoreError> {
        Ok(self
            .read()?
            .entries
            .values()
            .filter(|e| e.kind == kind)
            .cloned()
            .collect())
    }

    fn entries_for_user(&self, user: UserId) -> Result<Vec<LeaderboardEntry>, StoreError> {
        let inner = self.read()?;
        Ok(LeaderboardKind::ALL
            .iter()
            .filter_map(|kind| inner.entries.get(&(user, *kind)).cloned())
            .collect())
    }

    fn clear_entries(&self) -> Result<(), StoreError> {
        self.write()?.entries.clear();
        Ok(())
    }
}

impl ReferralStore for MemoryStore {
    fn get_referral(&self, user: UserId) -> Result<Option<ReferralPoints>, StoreError> {
        Ok(self.read()?.referrals.get(&user).cloned())
    }

    fn put_referral(&self, record: &ReferralPoints) -> Result<(), StoreError> {
        self.write()?.referrals.insert(record.user, record.clone());
        Ok(())
    }

    fn delete_referral(&self, user: UserId) -> Result<(), StoreError> {
        self.write()?.referrals.remove(&user);
        Ok(())
    }

    fn iter_referrals(&self) -> Result<Vec<ReferralPoints>, StoreError> {
        Ok(self.read()?.referrals.values().cloned().collect())
    }

    fn clear_referrals(&self) -> Result<(), StoreError> {
        self.write()?.referrals.clear();
        Ok(())
    }
}
